use crate::error::{ScheduleError, ScheduleResult};
use crate::network::ActivityNetwork;
use std::collections::VecDeque;
use tracing::trace;

/// Earliest start/finish via Kahn's algorithm over predecessor in-degrees.
pub struct ForwardPass<'n, 'a> {
    network: &'n ActivityNetwork<'a>,
    durations: &'n [f64],
}

impl<'n, 'a> ForwardPass<'n, 'a> {
    pub fn new(network: &'n ActivityNetwork<'a>, durations: &'n [f64]) -> Self {
        Self { network, durations }
    }

    /// Returns `(early_start, early_finish)` indexed like the network.
    pub fn execute(&self) -> ScheduleResult<(Vec<f64>, Vec<f64>)> {
        let n = self.network.len();
        let mut early_starts = vec![0.0; n];
        let mut early_finishes = vec![0.0; n];

        let mut in_degree: Vec<usize> = (0..n)
            .map(|idx| self.network.predecessors(idx).len())
            .collect();
        let mut queue: VecDeque<usize> = self.network.sources().collect();
        let mut processed = 0usize;

        while let Some(current) = queue.pop_front() {
            processed += 1;

            // Early start is max of all predecessor finishes
            let early_start = self
                .network
                .predecessors(current)
                .iter()
                .map(|&pred| early_finishes[pred])
                .fold(0.0, f64::max);
            let early_finish = early_start + self.durations[current];
            early_starts[current] = early_start;
            early_finishes[current] = early_finish;
            trace!(
                activity = self.network.id(current),
                early_start, early_finish, "forward"
            );

            for &successor in self.network.successors(current) {
                in_degree[successor] -= 1;
                if in_degree[successor] == 0 {
                    queue.push_back(successor);
                }
            }
        }

        if processed < n {
            return Err(ScheduleError::CyclicDependency);
        }

        Ok((early_starts, early_finishes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Activity;
    use crate::network::NetworkBuilder;

    #[test]
    fn multiple_sources_start_at_zero() {
        let activities = vec![
            Activity::new("A", "").with_duration(2.0),
            Activity::new("B", "").with_duration(5.0),
            Activity::new("C", "").with_duration(1.0).with_predecessors("A,B"),
        ];
        let network = NetworkBuilder::new(&activities).build().unwrap();
        let durations = network.resolve_durations().unwrap();
        let (es, ef) = ForwardPass::new(&network, &durations).execute().unwrap();
        assert_eq!(es, vec![0.0, 0.0, 5.0]);
        assert_eq!(ef, vec![2.0, 5.0, 6.0]);
    }

    #[test]
    fn unprocessed_nodes_signal_a_cycle() {
        let activities = vec![
            Activity::new("S", "").with_duration(1.0),
            Activity::new("A", "").with_duration(1.0).with_predecessors("S,B"),
            Activity::new("B", "").with_duration(1.0).with_predecessors("A"),
        ];
        let network = NetworkBuilder::new(&activities).build().unwrap();
        let durations = network.resolve_durations().unwrap();
        let err = ForwardPass::new(&network, &durations).execute().unwrap_err();
        assert_eq!(err, ScheduleError::CyclicDependency);
    }
}
