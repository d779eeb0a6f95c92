use super::snapshot::CrashSnapshot;
use crate::activity::Activity;
use crate::analysis::NetworkAnalysis;
use crate::config::EngineConfig;
use crate::error::ScheduleResult;
use crate::network::ActivityNetwork;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A critical activity that can be shortened, with its time-cost data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashingOption {
    pub activity_id: String,
    pub activity_name: String,
    pub normal_time: f64,
    pub crash_time: f64,
    pub max_crashable: f64,
    pub crash_slope: f64,
    pub normal_cost: f64,
    pub crash_cost: f64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashingOptions {
    pub project_duration: f64,
    pub critical_path: Vec<String>,
    pub crashing_options: Vec<CrashingOption>,
}

impl CrashingOptions {
    /// Cheapest option, if any activity can be crashed.
    pub fn cheapest(&self) -> Option<&CrashingOption> {
        self.crashing_options.first()
    }
}

pub fn calculate_crashing_options(activities: &[Activity]) -> ScheduleResult<CrashingOptions> {
    calculate_crashing_options_with(activities, &EngineConfig::default())
}

/// Lists every critical activity with room to crash, cheapest slope first.
/// Equal slopes keep input order.
#[instrument(level = "debug", skip_all, fields(activities = activities.len()))]
pub fn calculate_crashing_options_with(
    activities: &[Activity],
    config: &EngineConfig,
) -> ScheduleResult<CrashingOptions> {
    let network = ActivityNetwork::build(activities, config.predecessor_delimiter)?;
    let durations = network.resolve_durations()?;
    let analysis = NetworkAnalysis::run(&network, &durations)?;
    let snapshot = CrashSnapshot::capture(activities, &durations);

    let mut options: Vec<CrashingOption> = analysis
        .critical
        .critical_indices()
        .filter_map(|idx| {
            let params = snapshot.get(idx);
            let (crash_time, slope) = (params.crash_time?, params.slope()?);
            let activity = network.activity(idx);
            Some(CrashingOption {
                activity_id: activity.id.clone(),
                activity_name: activity.name.clone(),
                normal_time: params.normal_time,
                crash_time,
                max_crashable: params.max_crashable(),
                crash_slope: slope,
                normal_cost: params.normal_cost,
                crash_cost: params.crash_cost,
                is_critical: true,
            })
        })
        .collect();
    options.sort_by(|a, b| a.crash_slope.total_cmp(&b.crash_slope));
    debug!(options = options.len(), "crashing options ranked");

    Ok(CrashingOptions {
        project_duration: analysis.project_duration(),
        critical_path: analysis.critical_path_ids(&network),
        crashing_options: options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_critical_crashable_activities_are_listed() {
        let activities = vec![
            Activity::new("A", "Design")
                .with_duration(3.0)
                .with_crash(100.0, 400.0, 2.0),
            Activity::new("B", "Build")
                .with_duration(4.0)
                .with_predecessors("A")
                .with_crash(200.0, 300.0, 2.0),
            // not critical
            Activity::new("C", "Buy")
                .with_duration(2.0)
                .with_predecessors("A")
                .with_crash(50.0, 60.0, 1.0),
            // critical but no crash time
            Activity::new("D", "Deploy").with_duration(5.0).with_predecessors("B,C"),
        ];
        let result = calculate_crashing_options(&activities).unwrap();
        assert_eq!(result.project_duration, 12.0);
        assert_eq!(result.critical_path, vec!["A", "B", "D"]);
        let ids: Vec<&str> = result
            .crashing_options
            .iter()
            .map(|o| o.activity_id.as_str())
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(result.cheapest().unwrap().crash_slope, 50.0);
        assert_eq!(result.crashing_options[1].max_crashable, 1.0);
    }

    #[test]
    fn equal_slopes_keep_input_order() {
        let activities = vec![
            Activity::new("X", "")
                .with_duration(2.0)
                .with_crash(0.0, 10.0, 1.0),
            Activity::new("Y", "")
                .with_duration(2.0)
                .with_predecessors("X")
                .with_crash(0.0, 10.0, 1.0),
        ];
        let result = calculate_crashing_options(&activities).unwrap();
        assert_eq!(result.crashing_options[0].activity_id, "X");
        assert_eq!(result.crashing_options[1].activity_id, "Y");
    }
}
