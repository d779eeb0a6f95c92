use crate::error::ScheduleResult;
use crate::network::ActivityNetwork;
use tracing::debug;

pub mod backward_pass;
pub mod forward_pass;

pub use backward_pass::BackwardPass;
pub use forward_pass::ForwardPass;

/// Early and late times of every activity, by network index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleTimes {
    pub early_start: Vec<f64>,
    pub early_finish: Vec<f64>,
    pub late_start: Vec<f64>,
    pub late_finish: Vec<f64>,
    pub project_duration: f64,
}

impl ScheduleTimes {
    /// Runs both passes over `durations` (indexed like the network).
    pub fn compute(network: &ActivityNetwork<'_>, durations: &[f64]) -> ScheduleResult<Self> {
        let (early_start, early_finish) = ForwardPass::new(network, durations).execute()?;
        let project_duration = early_finish.iter().copied().fold(0.0, f64::max);
        debug!(project_duration, "forward pass complete");

        let (late_start, late_finish) =
            BackwardPass::new(network, durations).execute(project_duration)?;
        debug!("backward pass complete");

        Ok(Self {
            early_start,
            early_finish,
            late_start,
            late_finish,
            project_duration,
        })
    }

    pub fn slack(&self, idx: usize) -> f64 {
        self.late_start[idx] - self.early_start[idx]
    }
}
