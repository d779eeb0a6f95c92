//! Time-cost tradeoff analysis.
//!
//! [`calculate_crashing_options`] ranks what could be shortened right now;
//! [`calculate_crashing_scheme`] runs the greedy crashing loop to a target.
//! Both work on a [`CrashSnapshot`] and a private copy of the durations, so
//! caller-supplied activities are never modified.

pub mod options;
pub mod scheme;
pub mod snapshot;

pub use options::{
    CrashingOption, CrashingOptions, calculate_crashing_options, calculate_crashing_options_with,
};
pub use scheme::{
    CrashState, CrashingScheme, CrashingStep, calculate_crashing_scheme,
    calculate_crashing_scheme_with,
};
pub use snapshot::{CrashParameters, CrashSnapshot};
