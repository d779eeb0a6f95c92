pub mod activity;
pub mod analysis;
pub mod calculations;
pub mod config;
pub mod crashing;
pub mod critical_path;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod io;
#[cfg(any(feature = "cli", feature = "http_api"))]
pub mod logging;
pub mod network;
pub mod probability;
pub mod report;

pub use activity::{Activity, EstimateMethod};
pub use analysis::{ActivityTiming, Analysis, analyze, analyze_batch, analyze_with};
pub use config::{ConfigError, EngineConfig};
pub use crashing::{
    CrashState, CrashingOption, CrashingOptions, CrashingScheme, CrashingStep,
    calculate_crashing_options, calculate_crashing_options_with, calculate_crashing_scheme,
    calculate_crashing_scheme_with,
};
pub use critical_path::CRITICAL_TOLERANCE;
pub use error::{ScheduleError, ScheduleResult};
pub use io::{
    ImportError, load_activities, load_activities_from_csv, load_activities_from_json,
    parse_activity_table, save_activities_to_csv, save_activities_to_json,
};
pub use network::ActivityNetwork;
pub use probability::{Probability, calculate_probability};
pub use report::{ProjectReport, ReportMetadata};
