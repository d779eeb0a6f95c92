use super::snapshot::{CRASH_EPSILON, CrashSnapshot};
use crate::activity::Activity;
use crate::analysis::{Analysis, NetworkAnalysis};
use crate::config::EngineConfig;
use crate::error::ScheduleResult;
use crate::network::ActivityNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

/// Phase of the crashing loop. `TargetReached` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrashState {
    Initialized,
    Analyzing,
    Selecting,
    Crashing,
    TargetReached,
    Exhausted,
}

impl CrashState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CrashState::TargetReached | CrashState::Exhausted)
    }
}

impl fmt::Display for CrashState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CrashState::Initialized => "initialized",
            CrashState::Analyzing => "analyzing",
            CrashState::Selecting => "selecting",
            CrashState::Crashing => "crashing",
            CrashState::TargetReached => "target reached",
            CrashState::Exhausted => "exhausted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashingStep {
    pub step: usize,
    pub activity_crashed: String,
    pub amount_crashed: f64,
    pub crash_slope: f64,
    pub cost_increase: f64,
    pub cumulative_cost: f64,
    pub new_duration: f64,
    pub time_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashingScheme {
    pub initial_duration: f64,
    pub target_duration: f64,
    pub final_duration: f64,
    pub total_time_saved: f64,
    pub total_cost_increase: f64,
    pub crashing_steps: Vec<CrashingStep>,
    pub initial_critical_path: Vec<String>,
    pub final_critical_path: Vec<String>,
    pub initial_analysis: Analysis,
    pub final_analysis: Analysis,
    pub state: CrashState,
}

impl CrashingScheme {
    pub fn reached_target(&self) -> bool {
        self.state == CrashState::TargetReached
    }
}

pub fn calculate_crashing_scheme(
    activities: &[Activity],
    target_duration: Option<f64>,
) -> ScheduleResult<CrashingScheme> {
    calculate_crashing_scheme_with(activities, target_duration, &EngineConfig::default())
}

/// Greedy time-cost tradeoff: repeatedly shortens the cheapest crashable
/// activity on the current critical path until the project meets the target
/// or nothing on the path can be shortened further.
///
/// Without a target (or with a non-finite one) the goal is
/// `default_target_ratio` of the initial duration.
#[instrument(level = "debug", skip_all, fields(activities = activities.len()))]
pub fn calculate_crashing_scheme_with(
    activities: &[Activity],
    target_duration: Option<f64>,
    config: &EngineConfig,
) -> ScheduleResult<CrashingScheme> {
    let network = ActivityNetwork::build(activities, config.predecessor_delimiter)?;
    let normal = network.resolve_durations()?;
    let initial = NetworkAnalysis::run(&network, &normal)?.into_analysis(&network, &normal);

    let target = target_duration
        .filter(|t| t.is_finite())
        .unwrap_or(initial.project_duration * config.default_target_ratio);
    info!(
        initial = initial.project_duration,
        target, "starting crashing run"
    );

    let snapshot = CrashSnapshot::capture(activities, &normal);
    let mut optimizer = CrashingOptimizer::new(&network, &snapshot, target, initial.project_duration);
    optimizer.run()?;

    let CrashingOptimizer {
        durations,
        steps,
        cumulative_cost,
        state,
        ..
    } = optimizer;
    let final_analysis = NetworkAnalysis::run(&network, &durations)?.into_analysis(&network, &durations);
    info!(
        final_duration = final_analysis.project_duration,
        steps = steps.len(),
        state = %state,
        "crashing run finished"
    );

    Ok(CrashingScheme {
        initial_duration: initial.project_duration,
        target_duration: target,
        final_duration: final_analysis.project_duration,
        total_time_saved: initial.project_duration - final_analysis.project_duration,
        total_cost_increase: cumulative_cost,
        crashing_steps: steps,
        initial_critical_path: initial.critical_path.clone(),
        final_critical_path: final_analysis.critical_path.clone(),
        initial_analysis: initial,
        final_analysis,
        state,
    })
}

/// Chosen activity for the next crash.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    slope: f64,
}

struct CrashingOptimizer<'n, 'a> {
    network: &'n ActivityNetwork<'a>,
    snapshot: &'n CrashSnapshot,
    target: f64,
    initial_duration: f64,
    durations: Vec<f64>,
    current: Option<NetworkAnalysis>,
    candidate: Option<Candidate>,
    pending: Option<CrashingStep>,
    steps: Vec<CrashingStep>,
    cumulative_cost: f64,
    state: CrashState,
}

impl<'n, 'a> CrashingOptimizer<'n, 'a> {
    fn new(
        network: &'n ActivityNetwork<'a>,
        snapshot: &'n CrashSnapshot,
        target: f64,
        initial_duration: f64,
    ) -> Self {
        Self {
            network,
            snapshot,
            target,
            initial_duration,
            durations: snapshot.normal_durations(),
            current: None,
            candidate: None,
            pending: None,
            steps: Vec::new(),
            cumulative_cost: 0.0,
            state: CrashState::Initialized,
        }
    }

    fn run(&mut self) -> ScheduleResult<()> {
        while !self.state.is_terminal() {
            let next = match self.state {
                CrashState::Initialized => CrashState::Analyzing,
                CrashState::Analyzing => self.analyze()?,
                CrashState::Selecting => self.select(),
                CrashState::Crashing => self.crash(),
                CrashState::TargetReached | CrashState::Exhausted => self.state,
            };
            debug!(from = %self.state, to = %next, "crash state");
            self.state = next;
        }
        Ok(())
    }

    /// Re-runs the timing engine on the working durations. A pending step
    /// gets the re-analyzed duration, since a parallel critical path can keep
    /// the project from shrinking by the full crash amount.
    fn analyze(&mut self) -> ScheduleResult<CrashState> {
        let analysis = NetworkAnalysis::run(self.network, &self.durations)?;
        let duration = analysis.project_duration();
        self.current = Some(analysis);

        if let Some(mut step) = self.pending.take() {
            step.new_duration = duration;
            step.time_saved = self.initial_duration - duration;
            info!(
                step = step.step,
                activity = %step.activity_crashed,
                amount = step.amount_crashed,
                new_duration = duration,
                "crashed activity"
            );
            self.steps.push(step);
        }

        if duration <= self.target + CRASH_EPSILON {
            Ok(CrashState::TargetReached)
        } else {
            Ok(CrashState::Selecting)
        }
    }

    /// Lowest slope on the critical path wins; the first one in path order
    /// wins ties.
    fn select(&mut self) -> CrashState {
        let Some(current) = self.current.as_ref() else {
            return CrashState::Analyzing;
        };

        let mut best: Option<Candidate> = None;
        for &idx in &current.critical.path {
            let params = self.snapshot.get(idx);
            let Some(slope) = params.slope() else {
                continue;
            };
            if params.remaining(self.durations[idx]) <= CRASH_EPSILON {
                continue;
            }
            if best.is_none_or(|b| slope < b.slope) {
                best = Some(Candidate { idx, slope });
            }
        }

        self.candidate = best;
        match best {
            Some(_) => CrashState::Crashing,
            None => CrashState::Exhausted,
        }
    }

    fn crash(&mut self) -> CrashState {
        let (Some(candidate), Some(current)) = (self.candidate.take(), self.current.as_ref()) else {
            return CrashState::Analyzing;
        };
        let idx = candidate.idx;
        let params = self.snapshot.get(idx);
        let remaining = params.remaining(self.durations[idx]);
        let gap = current.project_duration() - self.target;
        let amount = remaining.min(gap);

        self.durations[idx] = match params.crash_time {
            Some(crash_time) if amount >= remaining => crash_time,
            _ => self.durations[idx] - amount,
        };

        let cost_increase = candidate.slope * amount;
        self.cumulative_cost += cost_increase;
        self.pending = Some(CrashingStep {
            step: self.steps.len() + 1,
            activity_crashed: self.network.id(idx).to_string(),
            amount_crashed: amount,
            crash_slope: candidate.slope,
            cost_increase,
            cumulative_cost: self.cumulative_cost,
            new_duration: current.project_duration(),
            time_saved: 0.0,
        });
        CrashState::Analyzing
    }
}
