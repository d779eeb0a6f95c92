use super::ActivityNetwork;
use crate::error::{ScheduleError, ScheduleResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Fails with [`ScheduleError::CyclicDependency`] when any dependency chain
/// loops back on itself.
pub fn ensure_acyclic(network: &ActivityNetwork<'_>) -> ScheduleResult<()> {
    if has_cycle(network) {
        Err(ScheduleError::CyclicDependency)
    } else {
        Ok(())
    }
}

/// Iterative depth-first search over successor edges. An edge into a node
/// that is still on the active path closes a cycle.
pub fn has_cycle(network: &ActivityNetwork<'_>) -> bool {
    let n = network.len();
    let mut marks = vec![Mark::Unvisited; n];
    // (node, position of the next successor to inspect)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let successors = network.successors(node);
            if cursor < successors.len() {
                frame.1 += 1;
                let next = successors[cursor];
                match marks[next] {
                    Mark::OnStack => return true,
                    Mark::Unvisited => {
                        marks[next] = Mark::OnStack;
                        stack.push((next, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }

    false
}
