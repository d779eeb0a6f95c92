use crate::activity::Activity;
use crate::error::ScheduleResult;
use std::collections::HashMap;

pub mod builder;
pub mod cycle;
pub mod diagram;

pub use builder::NetworkBuilder;

/// Index-based view of an activity list.
///
/// Node `i` is `activities[i]`. Adjacency lists are ordered by the input
/// position of the dependent activity, which fixes every tie-break downstream.
#[derive(Debug, Clone)]
pub struct ActivityNetwork<'a> {
    activities: &'a [Activity],
    index: HashMap<&'a str, usize>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl<'a> ActivityNetwork<'a> {
    /// Builds and validates the network: references, duplicates, acyclicity,
    /// and the presence of at least one source and one sink.
    pub fn build(activities: &'a [Activity], delimiter: char) -> ScheduleResult<Self> {
        let network = NetworkBuilder::new(activities)
            .delimiter(delimiter)
            .build()?;
        cycle::ensure_acyclic(&network)?;
        network.ensure_endpoints()?;
        Ok(network)
    }

    pub(crate) fn from_parts(
        activities: &'a [Activity],
        index: HashMap<&'a str, usize>,
        successors: Vec<Vec<usize>>,
        predecessors: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            activities,
            index,
            successors,
            predecessors,
        }
    }

    fn ensure_endpoints(&self) -> ScheduleResult<()> {
        if self.sources().next().is_none() {
            return Err(crate::ScheduleError::NoSourceActivity);
        }
        if self.sinks().next().is_none() {
            return Err(crate::ScheduleError::NoSinkActivity);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn activities(&self) -> &'a [Activity] {
        self.activities
    }

    pub fn activity(&self, idx: usize) -> &'a Activity {
        &self.activities[idx]
    }

    pub fn id(&self, idx: usize) -> &'a str {
        &self.activities[idx].id
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.successors[idx]
    }

    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.predecessors[idx]
    }

    /// Activities without predecessors, in input order.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&idx| self.predecessors[idx].is_empty())
    }

    /// Activities without successors, in input order.
    pub fn sinks(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&idx| self.successors[idx].is_empty())
    }

    /// Resolved duration of every activity, by index.
    pub fn resolve_durations(&self) -> ScheduleResult<Vec<f64>> {
        self.activities
            .iter()
            .map(Activity::resolve_duration)
            .collect()
    }
}
