//! Cascade metric calculator tests.
//!
//! Tests cover: the 8-staff reference scenario, the empty-absence boundary,
//! degenerate rosters, redistribution load, recovery buckets, and the
//! validation errors an absence set can raise.

use coverage_resilience_core::{
    cascade::{compute_cascade, compute_cascade_with, RecoveryEstimate, SystemStatus},
    config::CascadeThresholds,
    AbsenceSet, ContingencyMode, CoverageModel, CriticalityTier, ResilienceError, RoleTier,
    StaffMember,
};

/// Weights [18,15,12,14,10,8,7,16] (total 100); every specialty has two holders.
fn reference_model() -> CoverageModel {
    use CriticalityTier::*;
    let rows = [
        ("s0", 18.0, Critical, RoleTier::Attending, "inpatient"),
        ("s1", 15.0, High,     RoleTier::Attending, "inpatient"),
        ("s2", 12.0, High,     RoleTier::Senior,    "clinic"),
        ("s3", 14.0, Critical, RoleTier::Attending, "clinic"),
        ("s4", 10.0, Medium,   RoleTier::Senior,    "procedures"),
        ("s5",  8.0, Low,      RoleTier::Junior,    "procedures"),
        ("s6",  7.0, Low,      RoleTier::Junior,    "night_call"),
        ("s7", 16.0, High,     RoleTier::Senior,    "night_call"),
    ];
    let staff = rows
        .iter()
        .map(|(id, w, tier, role, spec)| {
            StaffMember::new(*id, format!("Staff {id}"), *role, *spec, *w, *tier)
        })
        .collect();
    CoverageModel::new(staff).expect("reference roster is valid")
}

fn absent(model: &CoverageModel, ids: &[&str], mode: ContingencyMode) -> AbsenceSet {
    AbsenceSet::new(model, ids, mode).expect("valid absence set")
}

#[test]
fn single_critical_absence_is_strained() {
    let model = reference_model();
    let set = absent(&model, &["s0"], ContingencyMode::N1);
    let m = compute_cascade(&model, &set, ContingencyMode::N1).unwrap();

    assert_eq!(m.coverage_gap_pct, 18.0);
    assert_eq!(m.affected_slots, 36);
    assert_eq!(m.cascade_depth, 3);
    assert_eq!(m.system_status, SystemStatus::Strained);
    assert!(!m.is_failure(), "18% gap with covered specialties must not fail");
}

#[test]
fn two_critical_absences_are_critical_and_fail() {
    let model = reference_model();
    let set = absent(&model, &["s0", "s3"], ContingencyMode::N2);
    let m = compute_cascade(&model, &set, ContingencyMode::N2).unwrap();

    assert_eq!(m.coverage_gap_pct, 32.0);
    assert_eq!(m.affected_slots, 64);
    assert_eq!(m.cascade_depth, 6);
    assert_eq!(m.system_status, SystemStatus::Critical);
    assert_eq!(m.recovery_time_estimate, RecoveryEstimate::Long);
    assert!(m.is_failure(), "critical status is a failure");
    assert!(!m.is_structural_failure());
}

#[test]
fn empty_absence_is_stable_with_zero_gap() {
    let model = reference_model();
    for mode in [ContingencyMode::N1, ContingencyMode::N2] {
        let m = compute_cascade(&model, &AbsenceSet::empty(), mode).unwrap();
        assert_eq!(m.system_status, SystemStatus::Stable);
        assert_eq!(m.coverage_gap_pct, 0.0);
        assert_eq!(m.affected_slots, 0);
        assert_eq!(m.cascade_depth, 0);
        assert_eq!(m.redistribution_load, 0.0);
        assert!(!m.is_failure());
    }
}

#[test]
fn empty_roster_yields_degenerate_stable_result() {
    let model = CoverageModel::new(Vec::new()).unwrap();
    assert_eq!(model.total_coverage(), 0.0);

    let m = compute_cascade(&model, &AbsenceSet::empty(), ContingencyMode::N2).unwrap();
    assert_eq!(m.coverage_gap_pct, 0.0);
    assert_eq!(m.system_status, SystemStatus::Stable);
    assert!(m.redistribution_load.is_finite());
}

#[test]
fn redistribution_load_spreads_over_remaining_staff() {
    let model = reference_model();
    let set = absent(&model, &["s0"], ContingencyMode::N1);
    let m = compute_cascade(&model, &set, ContingencyMode::N1).unwrap();

    let expected = 10.0 * 18.0 / 7.0;
    assert!((m.redistribution_load - expected).abs() < 1e-12);
}

#[test]
fn nobody_left_means_worst_case_load() {
    let staff = vec![
        StaffMember::new("a", "A", RoleTier::Senior, "clinic", 5.0, CriticalityTier::Medium),
        StaffMember::new("b", "B", RoleTier::Senior, "clinic", 5.0, CriticalityTier::Medium),
    ];
    let model = CoverageModel::new(staff).unwrap();
    let set = absent(&model, &["a", "b"], ContingencyMode::N2);
    let m = compute_cascade(&model, &set, ContingencyMode::N2).unwrap();

    assert_eq!(m.redistribution_load, 100.0);
    assert_eq!(m.coverage_gap_pct, 100.0);
    assert_eq!(m.system_status, SystemStatus::Failed);
    assert_eq!(m.uncovered_capabilities, vec!["clinic".to_string()]);
}

#[test]
fn pair_evaluated_under_n1_limit_is_failed() {
    let model = reference_model();
    // Built under N-2, scored under N-1: exceeds the mode limit.
    let set = absent(&model, &["s5", "s6"], ContingencyMode::N2);
    let m = compute_cascade(&model, &set, ContingencyMode::N1).unwrap();
    assert_eq!(m.coverage_gap_pct, 15.0);
    assert_eq!(m.system_status, SystemStatus::Failed);
}

#[test]
fn recovery_buckets_follow_depth_thresholds() {
    let model = reference_model();
    let cases = [
        (vec!["s6"], RecoveryEstimate::Short),        // depth 1
        (vec!["s0"], RecoveryEstimate::Medium),       // depth 3
        (vec!["s1", "s2"], RecoveryEstimate::Medium), // depth 4
        (vec!["s0", "s3"], RecoveryEstimate::Long),   // depth 6
    ];
    for (ids, expected) in cases {
        let set = absent(&model, &ids, ContingencyMode::N2);
        let m = compute_cascade(&model, &set, ContingencyMode::N2).unwrap();
        assert_eq!(m.recovery_time_estimate, expected, "absentees {ids:?}");
    }

    let tight = CascadeThresholds {
        recovery_short_below: 1,
        recovery_medium_below: 2,
        recovery_long_below: 3,
        ..CascadeThresholds::default()
    };
    let set = absent(&model, &["s0"], ContingencyMode::N1);
    let m = compute_cascade_with(&model, &set, ContingencyMode::N1, &tight).unwrap();
    assert_eq!(m.recovery_time_estimate, RecoveryEstimate::Extended);
}

#[test]
fn overridden_gap_thresholds_change_status() {
    let model = reference_model();
    let strict = CascadeThresholds {
        strained_gap_pct: 10.0,
        critical_gap_pct: 15.0,
        ..CascadeThresholds::default()
    };
    let set = absent(&model, &["s0"], ContingencyMode::N1);
    let m = compute_cascade_with(&model, &set, ContingencyMode::N1, &strict).unwrap();
    assert_eq!(m.system_status, SystemStatus::Failed);
}

#[test]
fn losing_sole_holder_is_structural_failure() {
    let mut staff: Vec<StaffMember> = (0..6)
        .map(|i| {
            StaffMember::new(
                format!("m{i}"),
                format!("Member {i}"),
                RoleTier::Senior,
                "inpatient",
                10.0,
                CriticalityTier::Medium,
            )
        })
        .collect();
    staff[2] = staff[2].clone().with_credentials(["sedation"]);
    let model = CoverageModel::new(staff).unwrap();

    let set = absent(&model, &["m2"], ContingencyMode::N1);
    let m = compute_cascade(&model, &set, ContingencyMode::N1).unwrap();
    assert_eq!(m.system_status, SystemStatus::Strained);
    assert!(m.is_structural_failure());
    assert!(m.is_failure());
    assert_eq!(m.uncovered_capabilities, vec!["sedation".to_string()]);
}

#[test]
fn absence_set_rejects_unknown_ids() {
    let model = reference_model();
    let err = AbsenceSet::new(&model, &["nobody"], ContingencyMode::N1).unwrap_err();
    assert!(matches!(err, ResilienceError::UnknownStaffId { ref id } if id == "nobody"));
}

#[test]
fn absence_set_rejects_duplicates() {
    let model = reference_model();
    let err = AbsenceSet::new(&model, &["s1", "s1"], ContingencyMode::N2).unwrap_err();
    assert!(matches!(err, ResilienceError::DuplicateAbsentee { .. }));
}

#[test]
fn absence_set_rejects_oversize_sets() {
    let model = reference_model();
    let err = AbsenceSet::new(&model, &["s1", "s2"], ContingencyMode::N1).unwrap_err();
    assert!(matches!(
        err,
        ResilienceError::AbsenceExceedsMode { size: 2, limit: 1, .. }
    ));

    let err = AbsenceSet::new(&model, &["s1", "s2", "s3"], ContingencyMode::N2).unwrap_err();
    assert!(matches!(
        err,
        ResilienceError::AbsenceExceedsMode { size: 3, limit: 2, .. }
    ));
}

#[test]
fn absence_order_does_not_matter() {
    let model = reference_model();
    let a = absent(&model, &["s3", "s0"], ContingencyMode::N2);
    let b = absent(&model, &["s0", "s3"], ContingencyMode::N2);
    assert_eq!(a, b);
    assert_eq!(a.ids(), ["s0".to_string(), "s3".to_string()]);
    assert_eq!(
        compute_cascade(&model, &a, ContingencyMode::N2).unwrap(),
        compute_cascade(&model, &b, ContingencyMode::N2).unwrap()
    );
}

#[test]
fn model_rejects_bad_weights_and_ids() {
    let member = |id: &str, w: f64| {
        StaffMember::new(id, id, RoleTier::Junior, "clinic", w, CriticalityTier::Low)
    };

    let err = CoverageModel::new(vec![member("a", -1.0)]).unwrap_err();
    assert!(matches!(err, ResilienceError::InvalidCoverageWeight { .. }));

    let err = CoverageModel::new(vec![member("a", 0.0)]).unwrap_err();
    assert!(matches!(err, ResilienceError::InvalidCoverageWeight { .. }));

    let err = CoverageModel::new(vec![member("a", f64::NAN)]).unwrap_err();
    assert!(matches!(err, ResilienceError::InvalidCoverageWeight { .. }));

    let err = CoverageModel::new(vec![member("a", 1.0), member("a", 2.0)]).unwrap_err();
    assert!(matches!(err, ResilienceError::DuplicateStaffId { .. }));

    let err = CoverageModel::new(vec![member(" ", 1.0)]).unwrap_err();
    assert!(matches!(err, ResilienceError::EmptyStaffId { position: 0 }));
}

#[test]
fn roster_json_is_validated_on_deserialize() {
    let json = r#"[
        {"id": "a", "name": "A", "role": "senior", "specialty": "clinic",
         "coverage_weight": 4.0, "criticality": "high"},
        {"id": "b", "name": "B", "role": "junior", "specialty": "clinic",
         "credentials": ["peds"], "coverage_weight": 6.0, "criticality": "low"}
    ]"#;
    let model: CoverageModel = serde_json::from_str(json).unwrap();
    assert_eq!(model.len(), 2);
    assert_eq!(model.total_coverage(), 10.0);
    assert_eq!(model.unique_capabilities(1), vec!["peds"]);

    let bad = r#"[{"id": "a", "name": "A", "role": "senior", "specialty": "clinic",
                   "coverage_weight": -4.0, "criticality": "high"}]"#;
    assert!(serde_json::from_str::<CoverageModel>(bad).is_err());
}

#[test]
fn set_from_another_roster_is_rejected_not_panicking() {
    let wide = CoverageModel::new(vec![
        StaffMember::new("a", "A", RoleTier::Senior, "clinic", 5.0, CriticalityTier::Medium),
        StaffMember::new("b", "B", RoleTier::Senior, "clinic", 5.0, CriticalityTier::Medium),
        StaffMember::new("c", "C", RoleTier::Senior, "clinic", 5.0, CriticalityTier::Medium),
    ])
    .unwrap();
    let narrow = CoverageModel::new(vec![StaffMember::new(
        "a",
        "A",
        RoleTier::Senior,
        "clinic",
        5.0,
        CriticalityTier::Medium,
    )])
    .unwrap();

    let set = absent(&wide, &["c"], ContingencyMode::N1);
    let err = compute_cascade(&narrow, &set, ContingencyMode::N1).unwrap_err();
    assert!(matches!(err, ResilienceError::UnknownStaffId { ref id } if id == "c"));
}

#[test]
fn set_is_resolved_by_id_against_the_scored_roster() {
    let first = CoverageModel::new(vec![
        StaffMember::new("a", "A", RoleTier::Senior, "clinic", 5.0, CriticalityTier::Medium),
        StaffMember::new("b", "B", RoleTier::Senior, "clinic", 15.0, CriticalityTier::High),
    ])
    .unwrap();
    // Same member, different roster position and a different colleague.
    let second = CoverageModel::new(vec![
        StaffMember::new("b", "B", RoleTier::Senior, "clinic", 15.0, CriticalityTier::High),
        StaffMember::new("z", "Z", RoleTier::Senior, "clinic", 45.0, CriticalityTier::Medium),
    ])
    .unwrap();

    let set = absent(&first, &["b"], ContingencyMode::N1);
    let m = compute_cascade(&second, &set, ContingencyMode::N1).unwrap();
    assert_eq!(m.lost_coverage, 15.0);
    assert_eq!(m.coverage_gap_pct, 25.0);
    assert_eq!(m.cascade_depth, 2);
}
