use super::ActivityNetwork;
use crate::activity::Activity;
use crate::config::DEFAULT_PREDECESSOR_DELIMITER;
use crate::error::{ScheduleError, ScheduleResult};
use std::collections::HashMap;
use tracing::trace;

/// Turns a flat activity list into forward and reverse adjacency.
///
/// The builder only checks referential integrity and id uniqueness; cycle
/// and endpoint validation happen in [`ActivityNetwork::build`].
pub struct NetworkBuilder<'a> {
    activities: &'a [Activity],
    delimiter: char,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(activities: &'a [Activity]) -> Self {
        Self {
            activities,
            delimiter: DEFAULT_PREDECESSOR_DELIMITER,
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn build(&self) -> ScheduleResult<ActivityNetwork<'a>> {
        // Step 1: index ids
        let index = self.build_index()?;

        // Step 2: edges from predecessor fields
        let (successors, predecessors) = self.build_adjacency(&index)?;

        Ok(ActivityNetwork::from_parts(
            self.activities,
            index,
            successors,
            predecessors,
        ))
    }

    fn build_index(&self) -> ScheduleResult<HashMap<&'a str, usize>> {
        let mut index = HashMap::with_capacity(self.activities.len());
        for (idx, activity) in self.activities.iter().enumerate() {
            if index.insert(activity.id.as_str(), idx).is_some() {
                return Err(ScheduleError::DuplicateActivity {
                    activity: activity.id.clone(),
                });
            }
        }
        Ok(index)
    }

    fn build_adjacency(
        &self,
        index: &HashMap<&'a str, usize>,
    ) -> ScheduleResult<(Vec<Vec<usize>>, Vec<Vec<usize>>)> {
        let n = self.activities.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (idx, activity) in self.activities.iter().enumerate() {
            for pred_id in activity.predecessor_ids(self.delimiter) {
                let pred_idx = index.get(pred_id).copied().ok_or_else(|| {
                    ScheduleError::UndefinedReference {
                        activity: activity.id.clone(),
                        predecessor: pred_id.to_string(),
                    }
                })?;
                // "A, A" is one dependency
                if predecessors[idx].contains(&pred_idx) {
                    continue;
                }
                trace!(from = pred_id, to = %activity.id, "edge");
                successors[pred_idx].push(idx);
                predecessors[idx].push(pred_idx);
            }
        }

        Ok((successors, predecessors))
    }
}
