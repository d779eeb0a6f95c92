use crate::error::{ScheduleError, ScheduleResult};
use crate::network::ActivityNetwork;
use std::collections::VecDeque;
use tracing::trace;

/// Latest start/finish, mirroring the forward pass over successor out-degrees.
pub struct BackwardPass<'n, 'a> {
    network: &'n ActivityNetwork<'a>,
    durations: &'n [f64],
}

impl<'n, 'a> BackwardPass<'n, 'a> {
    pub fn new(network: &'n ActivityNetwork<'a>, durations: &'n [f64]) -> Self {
        Self { network, durations }
    }

    /// Returns `(late_start, late_finish)`; sinks finish at `project_duration`.
    pub fn execute(&self, project_duration: f64) -> ScheduleResult<(Vec<f64>, Vec<f64>)> {
        let n = self.network.len();
        let mut late_starts = vec![0.0; n];
        let mut late_finishes = vec![0.0; n];

        let mut out_degree: Vec<usize> = (0..n)
            .map(|idx| self.network.successors(idx).len())
            .collect();
        let mut queue: VecDeque<usize> = self.network.sinks().collect();
        let mut processed = 0usize;

        while let Some(current) = queue.pop_front() {
            processed += 1;

            let successors = self.network.successors(current);
            let late_finish = if successors.is_empty() {
                project_duration
            } else {
                successors
                    .iter()
                    .map(|&succ| late_starts[succ])
                    .fold(f64::INFINITY, f64::min)
            };
            let late_start = late_finish - self.durations[current];
            late_starts[current] = late_start;
            late_finishes[current] = late_finish;
            trace!(
                activity = self.network.id(current),
                late_start, late_finish, "backward"
            );

            for &predecessor in self.network.predecessors(current) {
                out_degree[predecessor] -= 1;
                if out_degree[predecessor] == 0 {
                    queue.push_back(predecessor);
                }
            }
        }

        if processed < n {
            return Err(ScheduleError::CyclicDependency);
        }

        Ok((late_starts, late_finishes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Activity;
    use crate::network::NetworkBuilder;

    #[test]
    fn every_sink_finishes_at_project_duration() {
        let activities = vec![
            Activity::new("A", "").with_duration(3.0),
            Activity::new("B", "").with_duration(4.0).with_predecessors("A"),
            Activity::new("C", "").with_duration(1.0).with_predecessors("A"),
        ];
        let network = NetworkBuilder::new(&activities).build().unwrap();
        let durations = network.resolve_durations().unwrap();
        let (ls, lf) = BackwardPass::new(&network, &durations).execute(7.0).unwrap();
        assert_eq!(lf, vec![3.0, 7.0, 7.0]);
        assert_eq!(ls, vec![0.0, 3.0, 6.0]);
    }
}
