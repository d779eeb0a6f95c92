use crate::error::{ScheduleError, ScheduleResult};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::str::FromStr;

/// One scheduling unit as supplied by the caller.
///
/// Field names follow the camelCase wire format (`activityId`, `mostLikely`,
/// `crashTime`, ...). Computed timing never lands here; it is returned in
/// [`crate::ActivityTiming`] instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "activityId", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Delimited list of predecessor ids; empty means source activity.
    #[serde(default, deserialize_with = "string_or_null")]
    pub predecessors: String,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub optimistic: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub most_likely: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pessimistic: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub crash_time: Option<f64>,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub crash_cost: Option<f64>,
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts `3`, `"3"`, `null` and `""`; any other text is an error.
pub(crate) fn number_or_numeric_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("expected a number, got {text:?}")))
        }
    }
}

impl Activity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_estimates(mut self, optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        self.optimistic = Some(optimistic);
        self.most_likely = Some(most_likely);
        self.pessimistic = Some(pessimistic);
        self
    }

    pub fn with_predecessors(mut self, predecessors: impl Into<String>) -> Self {
        self.predecessors = predecessors.into();
        self
    }

    pub fn with_crash(mut self, cost: f64, crash_cost: f64, crash_time: f64) -> Self {
        self.cost = Some(cost);
        self.crash_cost = Some(crash_cost);
        self.crash_time = Some(crash_time);
        self
    }

    /// Predecessor ids split on `delimiter`, trimmed, with empty tokens dropped.
    pub fn predecessor_ids(&self, delimiter: char) -> impl Iterator<Item = &str> {
        self.predecessors
            .split(delimiter)
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Display label, falling back to the id when no name was given.
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Which estimation mode drives this activity's duration, if any.
    pub fn method(&self) -> Option<EstimateMethod> {
        if self.duration.is_some() {
            Some(EstimateMethod::Cpm)
        } else if self.three_point().is_some() {
            Some(EstimateMethod::Pert)
        } else {
            None
        }
    }

    fn three_point(&self) -> Option<(f64, f64, f64)> {
        match (self.optimistic, self.most_likely, self.pessimistic) {
            (Some(o), Some(m), Some(p)) => Some((o, m, p)),
            _ => None,
        }
    }

    /// Expected duration: the direct estimate when present, otherwise the PERT
    /// mean `(o + 4m + p) / 6`.
    pub fn resolve_duration(&self) -> ScheduleResult<f64> {
        if let Some(duration) = self.duration {
            check_estimate(&self.id, "duration", duration)?;
            return Ok(duration);
        }

        match self.three_point() {
            Some((o, m, p)) => {
                check_estimate(&self.id, "optimistic", o)?;
                check_estimate(&self.id, "mostLikely", m)?;
                check_estimate(&self.id, "pessimistic", p)?;
                Ok((o + 4.0 * m + p) / 6.0)
            }
            None => Err(ScheduleError::undefined_duration(
                &self.id,
                "either 'duration' for CPM or 'optimistic', 'mostLikely', 'pessimistic' for PERT is required",
            )),
        }
    }

    /// PERT variance `((p - o) / 6)^2`; zero without both bounds.
    pub fn variance(&self) -> f64 {
        match (self.optimistic, self.pessimistic) {
            (Some(o), Some(p)) if o.is_finite() && p.is_finite() => ((p - o) / 6.0).powi(2),
            _ => 0.0,
        }
    }
}

fn check_estimate(activity: &str, field: &str, value: f64) -> ScheduleResult<()> {
    if !value.is_finite() {
        return Err(ScheduleError::undefined_duration(
            activity,
            format!("{field} is not a finite number"),
        ));
    }
    if value < 0.0 {
        return Err(ScheduleError::undefined_duration(
            activity,
            format!("{field} is negative ({value})"),
        ));
    }
    Ok(())
}

/// Estimation mode of an activity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EstimateMethod {
    Cpm,
    Pert,
}

impl EstimateMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateMethod::Cpm => "CPM",
            EstimateMethod::Pert => "PERT",
        }
    }

    /// PERT as soon as any activity is driven by a three-point estimate.
    pub fn detect(activities: &[Activity]) -> Self {
        if activities
            .iter()
            .any(|activity| activity.method() == Some(EstimateMethod::Pert))
        {
            EstimateMethod::Pert
        } else {
            EstimateMethod::Cpm
        }
    }
}

impl fmt::Display for EstimateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimateMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cpm" => Ok(EstimateMethod::Cpm),
            "pert" => Ok(EstimateMethod::Pert),
            other => Err(format!("unknown estimate method '{other}'")),
        }
    }
}
