use crate::calculations::ScheduleTimes;
use crate::network::ActivityNetwork;

/// Slack below this (in absolute value) marks an activity critical.
pub const CRITICAL_TOLERANCE: f64 = 0.01;

pub fn is_critical(slack: f64) -> bool {
    slack.abs() < CRITICAL_TOLERANCE
}

/// Slack, critical flags, and one concrete critical path, by network index.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPath {
    pub slack: Vec<f64>,
    pub critical: Vec<bool>,
    pub path: Vec<usize>,
}

impl CriticalPath {
    pub fn extract(network: &ActivityNetwork<'_>, times: &ScheduleTimes) -> Self {
        let slack: Vec<f64> = (0..network.len()).map(|idx| times.slack(idx)).collect();
        let critical: Vec<bool> = slack.iter().copied().map(is_critical).collect();
        let path = trace_path(network, &critical);
        Self {
            slack,
            critical,
            path,
        }
    }

    pub fn critical_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.critical
            .iter()
            .enumerate()
            .filter_map(|(idx, &critical)| critical.then_some(idx))
    }
}

/// Starts at the first critical activity (input order) with no critical
/// predecessor and greedily follows the first unvisited critical successor.
///
/// When branches tie, adjacency order decides; callers may only rely on the
/// path being all-critical and edge-connected.
fn trace_path(network: &ActivityNetwork<'_>, critical: &[bool]) -> Vec<usize> {
    let start = (0..network.len()).find(|&idx| {
        critical[idx]
            && !network
                .predecessors(idx)
                .iter()
                .any(|&pred| critical[pred])
    });

    let Some(mut current) = start else {
        // Only reachable with a malformed network
        return critical.iter().position(|&c| c).into_iter().collect();
    };

    let mut visited = vec![false; network.len()];
    visited[current] = true;
    let mut path = vec![current];

    while let Some(&next) = network
        .successors(current)
        .iter()
        .find(|&&succ| critical[succ] && !visited[succ])
    {
        visited[next] = true;
        path.push(next);
        current = next;
    }

    path
}
