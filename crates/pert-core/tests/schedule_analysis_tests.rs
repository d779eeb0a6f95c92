use pert_cpm::{
    Activity, EngineConfig, ScheduleError, analyze, analyze_with, calculate_probability,
};

fn example() -> Vec<Activity> {
    vec![
        Activity::new("A", "Design").with_duration(3.0),
        Activity::new("B", "Build").with_duration(4.0).with_predecessors("A"),
        Activity::new("C", "Buy").with_duration(2.0).with_predecessors("A"),
        Activity::new("D", "Deploy").with_duration(5.0).with_predecessors("B,C"),
    ]
}

#[test]
fn example_network_timings() {
    let analysis = analyze(&example()).unwrap();
    assert_eq!(analysis.project_duration, 12.0);
    assert_eq!(analysis.critical_path, vec!["A", "B", "D"]);

    let c = analysis.timing("C").unwrap();
    assert_eq!((c.early_start, c.early_finish), (3.0, 5.0));
    assert_eq!((c.late_start, c.late_finish), (5.0, 7.0));
    assert_eq!(c.slack, 2.0);
    assert!(!c.is_critical);

    let d = analysis.timing("D").unwrap();
    assert_eq!((d.early_start, d.late_finish), (7.0, 12.0));
    assert!(d.is_critical);
    assert_eq!(analysis.project_variance, 0.0);
}

#[test]
fn timing_rows_keep_input_order() {
    let mut activities = example();
    activities.reverse();
    let analysis = analyze(&activities).unwrap();
    let ids: Vec<&str> = analysis
        .activities
        .iter()
        .map(|t| t.activity_id.as_str())
        .collect();
    assert_eq!(ids, vec!["D", "C", "B", "A"]);
    assert_eq!(analysis.critical_path, vec!["A", "B", "D"]);
}

#[test]
fn single_pert_activity() {
    let activities = vec![Activity::new("A", "").with_estimates(1.0, 2.0, 9.0)];
    let analysis = analyze(&activities).unwrap();
    assert!((analysis.project_duration - 3.0).abs() < 1e-12);
    assert!((analysis.project_variance - 16.0 / 9.0).abs() < 1e-9);
    assert!((analysis.activities[0].variance - 1.78).abs() < 0.01);
    assert_eq!(analysis.critical_path, vec!["A"]);
}

#[test]
fn explicit_duration_wins_over_estimates() {
    let activities = vec![
        Activity::new("A", "")
            .with_duration(4.0)
            .with_estimates(1.0, 2.0, 9.0),
    ];
    let analysis = analyze(&activities).unwrap();
    assert_eq!(analysis.project_duration, 4.0);
    // variance still comes from the bounds
    assert!(analysis.project_variance > 0.0);
}

#[test]
fn zero_optimistic_estimate_is_valid() {
    let activities = vec![Activity::new("A", "").with_estimates(0.0, 3.0, 6.0)];
    let analysis = analyze(&activities).unwrap();
    assert_eq!(analysis.project_duration, 3.0);
    assert_eq!(analysis.project_variance, 1.0);
}

#[test]
fn undefined_predecessor_is_reported() {
    let activities = vec![
        Activity::new("A", "").with_duration(1.0),
        Activity::new("B", "").with_duration(1.0).with_predecessors("A, Z"),
    ];
    assert_eq!(
        analyze(&activities).unwrap_err(),
        ScheduleError::UndefinedReference {
            activity: "B".into(),
            predecessor: "Z".into(),
        }
    );
}

#[test]
fn two_node_cycle_is_reported() {
    let activities = vec![
        Activity::new("A", "").with_duration(1.0).with_predecessors("B"),
        Activity::new("B", "").with_duration(1.0).with_predecessors("A"),
    ];
    let err = analyze(&activities).unwrap_err();
    assert_eq!(err, ScheduleError::CyclicDependency);
    assert_eq!(err.code(), "E1002");
}

#[test]
fn missing_duration_is_reported() {
    let activities = vec![
        Activity::new("A", "").with_duration(1.0),
        Activity::new("B", "").with_predecessors("A"),
    ];
    assert!(matches!(
        analyze(&activities),
        Err(ScheduleError::UndefinedDuration { activity, .. }) if activity == "B"
    ));
}

#[test]
fn negative_duration_is_reported() {
    let activities = vec![Activity::new("A", "").with_duration(-2.0)];
    assert!(matches!(
        analyze(&activities),
        Err(ScheduleError::UndefinedDuration { .. })
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let activities = vec![
        Activity::new("A", "").with_duration(1.0),
        Activity::new("A", "").with_duration(2.0),
    ];
    assert_eq!(
        analyze(&activities).unwrap_err(),
        ScheduleError::DuplicateActivity {
            activity: "A".into()
        }
    );
}

#[test]
fn multiple_sources_and_sinks() {
    let activities = vec![
        Activity::new("A", "").with_duration(2.0),
        Activity::new("B", "").with_duration(5.0),
        Activity::new("C", "").with_duration(1.0).with_predecessors("A"),
        Activity::new("D", "").with_duration(1.0).with_predecessors("B"),
    ];
    let analysis = analyze(&activities).unwrap();
    assert_eq!(analysis.project_duration, 6.0);
    assert_eq!(analysis.critical_path, vec!["B", "D"]);
    // sink C finishes at the project end in the backward pass
    assert_eq!(analysis.timing("C").unwrap().late_finish, 6.0);
    assert_eq!(analysis.timing("A").unwrap().slack, 3.0);
}

#[test]
fn custom_delimiter_from_config() {
    let config = EngineConfig::from_toml_str("predecessorDelimiter = ';'").unwrap();
    let activities = vec![
        Activity::new("A", "").with_duration(1.0),
        Activity::new("B", "").with_duration(2.0),
        Activity::new("C", "").with_duration(1.0).with_predecessors("A;B"),
    ];
    let analysis = analyze_with(&activities, &config).unwrap();
    assert_eq!(analysis.project_duration, 3.0);
}

#[test]
fn pert_network_probability() {
    let activities = vec![
        Activity::new("A", "").with_estimates(2.0, 4.0, 6.0),
        Activity::new("B", "")
            .with_estimates(3.0, 5.0, 13.0)
            .with_predecessors("A"),
    ];
    let analysis = analyze(&activities).unwrap();
    // means 4 and 6, variances 4/9 and 100/36
    assert!((analysis.project_duration - 10.0).abs() < 1e-12);
    let expected_variance = 4.0 / 9.0 + 100.0 / 36.0;
    assert!((analysis.project_variance - expected_variance).abs() < 1e-9);

    let at_mean = calculate_probability(analysis.project_duration, analysis.project_variance, 10.0);
    assert!((at_mean.probability - 0.5).abs() < 1e-6);
    let later = analysis.probability(13.0);
    assert!(later.probability > 0.9);
    assert!(later.zscore > 1.0);
}

#[test]
fn analysis_json_uses_wire_names() {
    let analysis = analyze(&example()).unwrap();
    let value = serde_json::to_value(&analysis).unwrap();
    assert_eq!(value["projectDuration"], 12.0);
    let first = &value["activities"][0];
    assert_eq!(first["activityId"], "A");
    assert_eq!(first["ES"], 0.0);
    assert_eq!(first["LF"], 3.0);
    assert_eq!(first["isCritical"], true);
}
