use thiserror::Error;

/// Failure raised while building or analyzing an activity network.
///
/// Every variant aborts the whole call; no partial schedule is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("activity '{activity}' references undefined predecessor '{predecessor}'")]
    UndefinedReference {
        activity: String,
        predecessor: String,
    },
    #[error(
        "graph contains cycles - check your activity predecessors for circular dependencies"
    )]
    CyclicDependency,
    #[error("activity '{activity}' has no usable duration: {reason}")]
    UndefinedDuration { activity: String, reason: String },
    #[error("no start activity found - ensure at least one activity has no predecessors")]
    NoSourceActivity,
    #[error("no end activity found - ensure at least one activity has no successors")]
    NoSinkActivity,
    #[error("duplicate activity id '{activity}'")]
    DuplicateActivity { activity: String },
}

impl ScheduleError {
    /// Stable identifier for machine consumers (HTTP bodies, CLI exit output).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UndefinedReference { .. } => "E1001",
            Self::CyclicDependency => "E1002",
            Self::UndefinedDuration { .. } => "E1003",
            Self::NoSourceActivity => "E1004",
            Self::NoSinkActivity => "E1005",
            Self::DuplicateActivity { .. } => "E1006",
        }
    }

    pub(crate) fn undefined_duration(activity: &str, reason: impl Into<String>) -> Self {
        Self::UndefinedDuration {
            activity: activity.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_ids() {
        let err = ScheduleError::UndefinedReference {
            activity: "B".into(),
            predecessor: "Z".into(),
        };
        let text = err.to_string();
        assert!(text.contains("'B'"));
        assert!(text.contains("'Z'"));
        assert_eq!(err.code(), "E1001");
    }

    #[test]
    fn codes_are_unique() {
        let errors = [
            ScheduleError::UndefinedReference {
                activity: String::new(),
                predecessor: String::new(),
            },
            ScheduleError::CyclicDependency,
            ScheduleError::undefined_duration("A", "missing"),
            ScheduleError::NoSourceActivity,
            ScheduleError::NoSinkActivity,
            ScheduleError::DuplicateActivity {
                activity: String::new(),
            },
        ];
        let mut codes: Vec<&str> = errors.iter().map(ScheduleError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
