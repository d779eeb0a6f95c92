use crate::activity::Activity;
use crate::analysis::{Analysis, NetworkAnalysis};
use crate::config::EngineConfig;
use crate::error::ScheduleResult;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::fmt;

use super::ActivityNetwork;

/// Node weight of the rendered network.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub duration: f64,
    pub slack: f64,
    pub is_critical: bool,
}

impl fmt::Display for DiagramNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}\nd={} slack={}",
            self.id,
            self.label,
            crate::analysis::format_units(self.duration),
            crate::analysis::format_units(self.slack)
        )
    }
}

/// Edge weight; `true` when both endpoints are on the critical path.
pub type DiagramGraph = DiGraph<DiagramNode, bool>;

/// Builds a petgraph view of the analyzed network. Node `i` corresponds to
/// the `i`-th activity.
pub fn to_graph(activities: &[Activity], config: &EngineConfig) -> ScheduleResult<DiagramGraph> {
    let network = ActivityNetwork::build(activities, config.predecessor_delimiter)?;
    let durations = network.resolve_durations()?;
    let analysis = NetworkAnalysis::run(&network, &durations)?.into_analysis(&network, &durations);
    Ok(graph_from(&network, &analysis))
}

fn graph_from(network: &ActivityNetwork<'_>, analysis: &Analysis) -> DiagramGraph {
    let mut graph = DiGraph::with_capacity(network.len(), network.len());
    let nodes: Vec<NodeIndex> = analysis
        .activities
        .iter()
        .zip(network.activities())
        .map(|(timing, activity)| {
            graph.add_node(DiagramNode {
                id: timing.activity_id.clone(),
                label: activity.label().to_string(),
                duration: timing.duration,
                slack: timing.slack,
                is_critical: timing.is_critical,
            })
        })
        .collect();

    for (idx, &node) in nodes.iter().enumerate() {
        for &succ in network.successors(idx) {
            let critical = analysis.activities[idx].is_critical && analysis.activities[succ].is_critical;
            graph.add_edge(node, nodes[succ], critical);
        }
    }
    graph
}

/// Graphviz DOT text of the network; critical activities and the edges
/// between them are drawn in red.
pub fn to_dot(activities: &[Activity], config: &EngineConfig) -> ScheduleResult<String> {
    let graph = to_graph(activities, config)?;
    let dot = Dot::with_attr_getters(
        &graph,
        &[Config::EdgeNoLabel],
        &|_, edge| {
            if *edge.weight() {
                "color=red, penwidth=2".to_string()
            } else {
                String::new()
            }
        },
        &|_, (_, node)| {
            if node.is_critical {
                "shape=box, color=red".to_string()
            } else {
                "shape=box".to_string()
            }
        },
    );
    Ok(format!("{dot}"))
}
