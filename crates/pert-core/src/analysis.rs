use crate::activity::Activity;
use crate::calculations::ScheduleTimes;
use crate::config::EngineConfig;
use crate::critical_path::CriticalPath;
use crate::error::ScheduleResult;
use crate::network::ActivityNetwork;
use crate::probability;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Computed timing of one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTiming {
    #[serde(rename = "activityId")]
    pub activity_id: String,
    pub name: String,
    pub duration: f64,
    #[serde(rename = "ES")]
    pub early_start: f64,
    #[serde(rename = "EF")]
    pub early_finish: f64,
    #[serde(rename = "LS")]
    pub late_start: f64,
    #[serde(rename = "LF")]
    pub late_finish: f64,
    pub slack: f64,
    #[serde(rename = "isCritical")]
    pub is_critical: bool,
    pub variance: f64,
}

/// Result of [`analyze`]. Timing rows keep the input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub project_duration: f64,
    pub critical_path: Vec<String>,
    pub activities: Vec<ActivityTiming>,
    pub project_variance: f64,
}

impl Analysis {
    pub fn timing(&self, activity_id: &str) -> Option<&ActivityTiming> {
        self.activities
            .iter()
            .find(|timing| timing.activity_id == activity_id)
    }

    pub fn critical_count(&self) -> usize {
        self.activities.iter().filter(|t| t.is_critical).count()
    }

    pub fn std_deviation(&self) -> f64 {
        self.project_variance.sqrt()
    }

    /// Completion probability for `deadline` using this analysis' mean and
    /// variance.
    pub fn probability(&self, deadline: f64) -> probability::Probability {
        probability::calculate_probability(self.project_duration, self.project_variance, deadline)
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("activities={}", self.activities.len()));
        parts.push(format!("critical={}", self.critical_count()));
        parts.push(format!("duration={}", format_units(self.project_duration)));
        if self.project_variance > 0.0 {
            parts.push(format!("variance={:.4}", self.project_variance));
        }
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join("->")));
        }
        parts.join(", ")
    }

    /// Tabular view of the per-activity timing.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let ids: Vec<&str> = self.activities.iter().map(|t| t.activity_id.as_str()).collect();
        let names: Vec<&str> = self.activities.iter().map(|t| t.name.as_str()).collect();
        let critical: Vec<bool> = self.activities.iter().map(|t| t.is_critical).collect();

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("id"), ids).into_column(),
            Series::new(PlSmallStr::from_static("name"), names).into_column(),
            self.float_column("duration", |t| t.duration),
            self.float_column("ES", |t| t.early_start),
            self.float_column("EF", |t| t.early_finish),
            self.float_column("LS", |t| t.late_start),
            self.float_column("LF", |t| t.late_finish),
            self.float_column("slack", |t| t.slack),
            Series::new(PlSmallStr::from_static("critical"), critical).into_column(),
        ])
    }

    fn float_column(&self, name: &'static str, value: impl Fn(&ActivityTiming) -> f64) -> Column {
        let values: Vec<f64> = self.activities.iter().map(value).collect();
        Series::new(PlSmallStr::from_static(name), values).into_column()
    }
}

pub(crate) fn format_units(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Intermediate, index-based result shared with the crashing optimizer.
pub(crate) struct NetworkAnalysis {
    pub times: ScheduleTimes,
    pub critical: CriticalPath,
}

impl NetworkAnalysis {
    pub fn run(network: &ActivityNetwork<'_>, durations: &[f64]) -> ScheduleResult<Self> {
        let times = ScheduleTimes::compute(network, durations)?;
        let critical = CriticalPath::extract(network, &times);
        Ok(Self { times, critical })
    }

    pub fn project_duration(&self) -> f64 {
        self.times.project_duration
    }

    pub fn critical_path_ids(&self, network: &ActivityNetwork<'_>) -> Vec<String> {
        self.critical
            .path
            .iter()
            .map(|&idx| network.id(idx).to_string())
            .collect()
    }

    pub fn into_analysis(self, network: &ActivityNetwork<'_>, durations: &[f64]) -> Analysis {
        let activities = network.activities();
        let project_variance = probability::project_variance(activities, &self.critical.critical);
        let critical_path = self.critical_path_ids(network);
        let timings = activities
            .iter()
            .enumerate()
            .map(|(idx, activity)| ActivityTiming {
                activity_id: activity.id.clone(),
                name: activity.name.clone(),
                duration: durations[idx],
                early_start: self.times.early_start[idx],
                early_finish: self.times.early_finish[idx],
                late_start: self.times.late_start[idx],
                late_finish: self.times.late_finish[idx],
                slack: self.critical.slack[idx],
                is_critical: self.critical.critical[idx],
                variance: activity.variance(),
            })
            .collect();

        Analysis {
            project_duration: self.times.project_duration,
            critical_path,
            activities: timings,
            project_variance,
        }
    }
}

/// Full CPM/PERT analysis with default configuration.
pub fn analyze(activities: &[Activity]) -> ScheduleResult<Analysis> {
    analyze_with(activities, &EngineConfig::default())
}

#[instrument(level = "debug", skip_all, fields(activities = activities.len()))]
pub fn analyze_with(activities: &[Activity], config: &EngineConfig) -> ScheduleResult<Analysis> {
    let network = ActivityNetwork::build(activities, config.predecessor_delimiter)?;
    let durations = network.resolve_durations()?;
    let analysis = NetworkAnalysis::run(&network, &durations)?.into_analysis(&network, &durations);
    info!(
        project_duration = analysis.project_duration,
        critical = analysis.critical_count(),
        "analysis complete"
    );
    Ok(analysis)
}

/// Analyzes independent networks in parallel; results keep the input order.
pub fn analyze_batch(
    networks: &[Vec<Activity>],
    config: &EngineConfig,
) -> Vec<ScheduleResult<Analysis>> {
    networks
        .par_iter()
        .map(|activities| analyze_with(activities, config))
        .collect()
}
