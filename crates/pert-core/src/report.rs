use crate::activity::{Activity, EstimateMethod};
use crate::analysis::{Analysis, analyze_with};
use crate::config::EngineConfig;
use crate::crashing::{CrashingOptions, calculate_crashing_options_with};
use crate::error::ScheduleResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    /// Detected from the activities when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<EstimateMethod>,
    #[serde(default = "default_time_unit")]
    pub time_unit: String,
}

fn default_time_unit() -> String {
    "days".to_string()
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self {
            project_name: "New Project".to_string(),
            project_description: String::new(),
            method: None,
            time_unit: default_time_unit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    pub project_name: String,
    pub project_description: String,
    pub method: EstimateMethod,
    pub time_unit: String,
    pub export_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatement {
    pub description: String,
    pub activities: Vec<Activity>,
    pub objectives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    #[serde(flatten)]
    pub analysis: Analysis,
    pub critical_activities_count: usize,
    pub total_activities: usize,
    pub critical_path_length: usize,
    /// `None` for deterministic (zero-variance) projects.
    pub standard_deviation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crashing: Option<CrashingOptions>,
}

/// Export bundle: what was asked, and what the engine answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub metadata: ReportHeader,
    pub problem: ProblemStatement,
    pub solution: Solution,
}

const OBJECTIVES: [&str; 4] = [
    "Determine project completion time",
    "Identify critical path",
    "Calculate activity slack times",
    "Evaluate time-cost tradeoffs",
];

impl ProjectReport {
    pub fn build(
        metadata: ReportMetadata,
        activities: &[Activity],
        config: &EngineConfig,
    ) -> ScheduleResult<Self> {
        let analysis = analyze_with(activities, config)?;
        let crashable = activities.iter().any(|a| a.crash_time.is_some());
        let crashing = if crashable {
            Some(calculate_crashing_options_with(activities, config)?)
        } else {
            None
        };
        let method = metadata
            .method
            .unwrap_or_else(|| EstimateMethod::detect(activities));

        let standard_deviation = (analysis.project_variance > 0.0).then(|| analysis.std_deviation());
        let solution = Solution {
            critical_activities_count: analysis.critical_count(),
            total_activities: activities.len(),
            critical_path_length: analysis.critical_path.len(),
            standard_deviation,
            crashing,
            analysis,
        };

        Ok(Self {
            metadata: ReportHeader {
                project_name: metadata.project_name,
                project_description: metadata.project_description,
                method,
                time_unit: metadata.time_unit,
                export_date: Utc::now(),
            },
            problem: ProblemStatement {
                description: format!("Project scheduling using {method} method"),
                activities: activities.to_vec(),
                objectives: OBJECTIVES.iter().map(|s| s.to_string()).collect(),
            },
            solution,
        })
    }

    /// `project_analysis_<name>_<timestamp>.json`
    pub fn suggested_file_name(&self) -> String {
        format!(
            "project_analysis_{}_{}.json",
            self.metadata.project_name.replace(' ', "_"),
            self.metadata.export_date.format("%Y%m%d_%H%M%S")
        )
    }

    pub fn write_json<W: Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Vec<Activity> {
        vec![
            Activity::new("A", "Design").with_duration(3.0).with_crash(100.0, 200.0, 2.0),
            Activity::new("B", "Build").with_duration(4.0).with_predecessors("A"),
            Activity::new("C", "Buy").with_duration(2.0).with_predecessors("A"),
            Activity::new("D", "Deploy").with_duration(5.0).with_predecessors("B,C"),
        ]
    }

    #[test]
    fn solution_counts() {
        let report =
            ProjectReport::build(ReportMetadata::default(), &example(), &EngineConfig::default())
                .unwrap();
        assert_eq!(report.metadata.method, EstimateMethod::Cpm);
        assert_eq!(report.solution.critical_activities_count, 3);
        assert_eq!(report.solution.total_activities, 4);
        assert_eq!(report.solution.critical_path_length, 3);
        assert_eq!(report.solution.standard_deviation, None);
        let crashing = report.solution.crashing.as_ref().unwrap();
        assert_eq!(crashing.crashing_options.len(), 1);
    }

    #[test]
    fn json_shape() {
        let metadata = ReportMetadata {
            project_name: "Office move".into(),
            ..ReportMetadata::default()
        };
        let report = ProjectReport::build(metadata, &example(), &EngineConfig::default()).unwrap();
        let mut buffer = Vec::new();
        report.write_json(&mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["metadata"]["projectName"], "Office move");
        assert_eq!(value["metadata"]["method"], "CPM");
        assert_eq!(value["solution"]["projectDuration"], 12.0);
        assert_eq!(value["solution"]["criticalPath"][1], "B");
        assert!(value["solution"]["standardDeviation"].is_null());
        assert!(report.suggested_file_name().starts_with("project_analysis_Office_move_"));
    }
}
