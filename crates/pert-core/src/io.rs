//! Activity list import and export.
//!
//! Supported inputs are JSON (a bare array or `{"activities": [...]}`), CSV
//! with camelCase headers, and the whitespace-separated "bulk table" that
//! project handouts usually print:
//!
//! ```text
//! ACTIVITY  DURATION  PREDECESSORS
//! A         3         -
//! B         4         A
//! ```

use crate::activity::{Activity, EstimateMethod};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Deserialize)]
#[serde(untagged)]
enum ActivityDocument {
    List(Vec<Activity>),
    Wrapped { activities: Vec<Activity> },
}

impl ActivityDocument {
    fn into_activities(self) -> Vec<Activity> {
        match self {
            ActivityDocument::List(activities) => activities,
            ActivityDocument::Wrapped { activities } => activities,
        }
    }
}

pub fn parse_activities_json(text: &str) -> ImportResult<Vec<Activity>> {
    let document: ActivityDocument = serde_json::from_str(text)?;
    Ok(document.into_activities())
}

pub fn load_activities_from_json<P: AsRef<Path>>(path: P) -> ImportResult<Vec<Activity>> {
    let file = File::open(path)?;
    let document: ActivityDocument = serde_json::from_reader(file)?;
    Ok(document.into_activities())
}

pub fn save_activities_to_json<P: AsRef<Path>>(activities: &[Activity], path: P) -> ImportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, activities)?;
    Ok(())
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityCsvRecord {
    activity_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    predecessors: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    optimistic: String,
    #[serde(default)]
    most_likely: String,
    #[serde(default)]
    pessimistic: String,
    #[serde(default)]
    cost: String,
    #[serde(default)]
    crash_time: String,
    #[serde(default)]
    crash_cost: String,
}

impl From<&Activity> for ActivityCsvRecord {
    fn from(activity: &Activity) -> Self {
        Self {
            activity_id: activity.id.clone(),
            name: activity.name.clone(),
            predecessors: activity.predecessors.clone(),
            duration: format_option_f64(activity.duration),
            optimistic: format_option_f64(activity.optimistic),
            most_likely: format_option_f64(activity.most_likely),
            pessimistic: format_option_f64(activity.pessimistic),
            cost: format_option_f64(activity.cost),
            crash_time: format_option_f64(activity.crash_time),
            crash_cost: format_option_f64(activity.crash_cost),
        }
    }
}

impl ActivityCsvRecord {
    fn into_activity(self) -> ImportResult<Activity> {
        let id = self.activity_id.trim().to_string();
        if id.is_empty() {
            return Err(ImportError::InvalidData("row without activityId".into()));
        }
        Ok(Activity {
            duration: parse_f64(&id, "duration", &self.duration)?,
            optimistic: parse_f64(&id, "optimistic", &self.optimistic)?,
            most_likely: parse_f64(&id, "mostLikely", &self.most_likely)?,
            pessimistic: parse_f64(&id, "pessimistic", &self.pessimistic)?,
            cost: parse_f64(&id, "cost", &self.cost)?,
            crash_time: parse_f64(&id, "crashTime", &self.crash_time)?,
            crash_cost: parse_f64(&id, "crashCost", &self.crash_cost)?,
            name: self.name,
            predecessors: self.predecessors,
            id,
        })
    }
}

pub fn read_activities_csv<R: Read>(reader: R) -> ImportResult<Vec<Activity>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut activities = Vec::new();
    for record in reader.deserialize::<ActivityCsvRecord>() {
        activities.push(record?.into_activity()?);
    }
    if activities.is_empty() {
        return Err(ImportError::InvalidData(
            "CSV file contained no activities".into(),
        ));
    }
    Ok(activities)
}

pub fn load_activities_from_csv<P: AsRef<Path>>(path: P) -> ImportResult<Vec<Activity>> {
    read_activities_csv(File::open(path)?)
}

pub fn save_activities_to_csv<P: AsRef<Path>>(activities: &[Activity], path: P) -> ImportResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for activity in activities {
        writer.serialize(ActivityCsvRecord::from(activity))?;
    }
    writer.flush()?;
    Ok(())
}

const HEADER_WORDS: [&str; 4] = ["activity", "predecessor", "duration", "immediate"];

/// A header names its columns: it mentions one of [`HEADER_WORDS`] and
/// carries no number where a data row has its first estimate.
fn is_header(line: &str, parts: &[&str]) -> bool {
    let lower = line.to_lowercase();
    HEADER_WORDS.iter().any(|word| lower.contains(word))
        && parts.get(1).is_none_or(|token| token.parse::<f64>().is_err())
}

fn is_placeholder(token: &str) -> bool {
    matches!(token, "-" | "—" | "–")
}

/// Parses the whitespace table format.
///
/// CPM rows are `ID DURATION [PREDS...]`, PERT rows are
/// `ID A M B [PREDS...]`. Header lines (column names such as "activity"
/// or "duration" with no estimate after the first token) and blank lines are skipped; `-` marks "no
/// predecessors". Predecessor tokens are joined with `delimiter`.
pub fn parse_activity_table(
    text: &str,
    method: EstimateMethod,
    delimiter: char,
) -> ImportResult<Vec<Activity>> {
    let numeric_columns = match method {
        EstimateMethod::Cpm => 1,
        EstimateMethod::Pert => 3,
    };
    let mut activities = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() || is_header(line, &parts) {
            continue;
        }
        if parts.len() < 1 + numeric_columns {
            return Err(ImportError::InvalidData(format!(
                "line {}: expected id and {numeric_columns} estimate column(s)",
                line_no + 1
            )));
        }

        let id = parts[0];
        let numbers = parts[1..=numeric_columns]
            .iter()
            .map(|token| {
                token.parse::<f64>().map_err(|e| {
                    ImportError::InvalidData(format!(
                        "line {}: invalid number '{token}': {e}",
                        line_no + 1
                    ))
                })
            })
            .collect::<ImportResult<Vec<f64>>>()?;
        let predecessors = parts[1 + numeric_columns..]
            .iter()
            .flat_map(|token| token.split(delimiter))
            .map(str::trim)
            .filter(|token| !token.is_empty() && !is_placeholder(token))
            .collect::<Vec<_>>()
            .join(&delimiter.to_string());

        let activity = Activity::new(id, id).with_predecessors(predecessors);
        let activity = match method {
            EstimateMethod::Cpm => activity.with_duration(numbers[0]),
            EstimateMethod::Pert => activity.with_estimates(numbers[0], numbers[1], numbers[2]),
        };
        activities.push(activity);
    }

    if activities.is_empty() {
        return Err(ImportError::InvalidData(
            "no activities could be parsed from the table".into(),
        ));
    }
    debug!(count = activities.len(), %method, "parsed activity table");
    Ok(activities)
}

/// Loads an activity file, choosing the reader from the extension: `.json`,
/// `.csv`, anything else is read as a bulk table in `method` format.
pub fn load_activities<P: AsRef<Path>>(
    path: P,
    method: EstimateMethod,
    delimiter: char,
) -> ImportResult<Vec<Activity>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => load_activities_from_json(path),
        Some("csv") => load_activities_from_csv(path),
        _ => {
            let text = std::fs::read_to_string(path)?;
            parse_activity_table(&text, method, delimiter)
        }
    }
}

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_f64(activity: &str, field: &str, input: &str) -> ImportResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input.trim().parse::<f64>().map(Some).map_err(|e| {
        ImportError::InvalidData(format!("activity {activity}: invalid {field} '{input}': {e}"))
    })
}
