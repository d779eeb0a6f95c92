use pert_cpm::calculations::{BackwardPass, ForwardPass, ScheduleTimes};
use pert_cpm::{Activity, ActivityNetwork, ScheduleError};

// Graph: T1(2) -> {T2(3), T3(1)} -> T4(2)
fn diamond() -> Vec<Activity> {
    vec![
        Activity::new("T1", "").with_duration(2.0),
        Activity::new("T2", "").with_duration(3.0).with_predecessors("T1"),
        Activity::new("T3", "").with_duration(1.0).with_predecessors("T1"),
        Activity::new("T4", "").with_duration(2.0).with_predecessors("T2,T3"),
    ]
}

#[test]
fn forward_pass_computes_early_times_across_dag() {
    let activities = diamond();
    let network = ActivityNetwork::build(&activities, ',').unwrap();
    let durations = network.resolve_durations().unwrap();
    let (es, ef) = ForwardPass::new(&network, &durations).execute().unwrap();
    assert_eq!(es, vec![0.0, 2.0, 2.0, 5.0]);
    assert_eq!(ef, vec![2.0, 5.0, 3.0, 7.0]);
}

#[test]
fn backward_pass_sets_late_times_and_slack() {
    let activities = diamond();
    let network = ActivityNetwork::build(&activities, ',').unwrap();
    let durations = network.resolve_durations().unwrap();
    let (ls, lf) = BackwardPass::new(&network, &durations).execute(7.0).unwrap();
    assert_eq!(ls, vec![0.0, 2.0, 4.0, 5.0]);
    assert_eq!(lf, vec![2.0, 5.0, 5.0, 7.0]);

    let times = ScheduleTimes::compute(&network, &durations).unwrap();
    assert_eq!(times.project_duration, 7.0);
    assert_eq!(times.slack(2), 2.0);
    assert_eq!(times.slack(1), 0.0);
}

#[test]
fn input_order_does_not_need_to_be_topological() {
    let mut activities = diamond();
    activities.reverse();
    let network = ActivityNetwork::build(&activities, ',').unwrap();
    let durations = network.resolve_durations().unwrap();
    let times = ScheduleTimes::compute(&network, &durations).unwrap();
    // index 0 is now T4
    assert_eq!(times.early_start[0], 5.0);
    assert_eq!(times.late_finish[3], 2.0);
}

#[test]
fn zero_duration_milestones() {
    let activities = vec![
        Activity::new("start", "").with_duration(0.0),
        Activity::new("work", "").with_duration(4.0).with_predecessors("start"),
        Activity::new("done", "").with_duration(0.0).with_predecessors("work"),
    ];
    let network = ActivityNetwork::build(&activities, ',').unwrap();
    let durations = network.resolve_durations().unwrap();
    let times = ScheduleTimes::compute(&network, &durations).unwrap();
    assert_eq!(times.project_duration, 4.0);
    assert_eq!(times.early_start[2], 4.0);
    assert_eq!(times.late_start[0], 0.0);
}

#[test]
fn network_build_checks_cycles_before_endpoints() {
    // every node has a predecessor, so there is no source either
    let activities = vec![
        Activity::new("A", "").with_duration(1.0).with_predecessors("C"),
        Activity::new("B", "").with_duration(1.0).with_predecessors("A"),
        Activity::new("C", "").with_duration(1.0).with_predecessors("B"),
    ];
    assert_eq!(
        ActivityNetwork::build(&activities, ',').unwrap_err(),
        ScheduleError::CyclicDependency
    );
}

#[test]
fn sources_and_sinks_in_input_order() {
    let activities = diamond();
    let network = ActivityNetwork::build(&activities, ',').unwrap();
    assert_eq!(network.sources().collect::<Vec<_>>(), vec![0]);
    assert_eq!(network.sinks().collect::<Vec<_>>(), vec![3]);
    assert_eq!(network.index_of("T3"), Some(2));
}
