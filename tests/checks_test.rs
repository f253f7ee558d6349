//! Integration tests for the geometric design checks

use dovetail_brackets::checks::{
    check_all, check_dovetail_fit, check_lower_bracket, check_upper_bracket,
};
use dovetail_brackets::{
    DesignConfig, DovetailProfile, LowerBracketParams, Severity, UpperBracketParams,
};

#[test]
fn test_default_design_passes_every_check() {
    let report = check_all(&DesignConfig::default()).unwrap();

    assert!(report.is_ok(), "{:?}", report.findings);
    assert!(report.findings.is_empty(), "{:?}", report.findings);

    for name in [
        "upper-holes-within-block",
        "upper-through-holes-span-block",
        "upper-counterbore-depth",
        "upper-channel-simple",
        "upper-channel-within-block",
        "lower-tongue-simple",
        "lower-holes-within-tongue",
        "lower-counterbore-depth",
        "lower-holes-symmetric",
        "dovetail-fit",
        "material-meshes-closed",
        "deterministic-build",
    ] {
        assert!(report.checks.contains(&name), "{} did not run", name);
    }
}

#[test]
fn test_hole_at_block_edge_is_reported() {
    let upper = UpperBracketParams {
        hole_positions: vec![[1.0, 1.0], [19.5, 3.0]],
        ..Default::default()
    };
    let report = check_upper_bracket(&DovetailProfile::default(), &upper).unwrap();

    assert!(!report.is_ok());
    let errors: Vec<_> = report.with_severity(Severity::Error).collect();
    // Both bores at (1, 1) overlap the edge; the other hole is fine
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|f| f.check == "upper-holes-within-block"));
    assert!(errors[0].message.contains("(1, 1)"));
}

#[test]
fn test_short_through_hole_is_reported() {
    let mut upper = UpperBracketParams::default();
    upper.hole.through.depth = 5.0;
    let report = check_upper_bracket(&DovetailProfile::default(), &upper).unwrap();

    assert!(
        report
            .findings
            .iter()
            .any(|f| f.check == "upper-through-holes-span-block")
    );
}

#[test]
fn test_sunken_counterbore_is_warning() {
    let mut upper = UpperBracketParams::default();
    upper.hole.counterbore.z_offset = 4.0;
    let report = check_upper_bracket(&DovetailProfile::default(), &upper).unwrap();

    assert!(report.is_ok());
    let warnings: Vec<_> = report.with_severity(Severity::Warning).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].check, "upper-counterbore-depth");
}

#[test]
fn test_tight_channel_fails_fit() {
    let design = DesignConfig::from_json_str(r#"{"upper": {"channel_clearance": -0.2}}"#).unwrap();
    let report = check_all(&design).unwrap();

    assert!(!report.is_ok());
    assert!(
        report
            .with_severity(Severity::Error)
            .any(|f| f.check == "dovetail-fit")
    );
}

#[test]
fn test_snug_channel_is_warning() {
    // Fits, but with less than the default gap
    let design = DesignConfig::from_json_str(r#"{"upper": {"channel_clearance": 0.02}}"#).unwrap();
    let report = check_all(&design).unwrap();

    assert!(report.is_ok(), "{:?}", report.findings);
    assert!(
        report
            .with_severity(Severity::Warning)
            .any(|f| f.check == "dovetail-fit")
    );
}

#[test]
fn test_channel_wider_than_block() {
    let upper = UpperBracketParams {
        channel_x: 5.0,
        ..Default::default()
    };
    let report = check_upper_bracket(&DovetailProfile::default(), &upper).unwrap();
    assert!(
        report
            .with_severity(Severity::Error)
            .any(|f| f.check == "upper-channel-within-block")
    );
}

#[test]
fn test_hole_off_tongue_is_reported() {
    let lower = LowerBracketParams {
        hole_grid: vec![12.0, -12.0],
        ..Default::default()
    };
    let report = check_lower_bracket(&DovetailProfile::default(), &lower).unwrap();

    assert!(!report.is_ok());
    assert!(
        report
            .findings
            .iter()
            .all(|f| f.check == "lower-holes-within-tongue")
    );
}

#[test]
fn test_asymmetric_holes_are_reported() {
    let lower = LowerBracketParams {
        hole_grid: vec![7.5, -5.0],
        ..Default::default()
    };
    let report = check_lower_bracket(&DovetailProfile::default(), &lower).unwrap();
    assert!(
        report
            .findings
            .iter()
            .any(|f| f.check == "lower-holes-symmetric")
    );
}

#[test]
fn test_collapsed_tongue_stops_lower_checks() {
    let lower = LowerBracketParams {
        inset: 20.0,
        ..Default::default()
    };
    let report = check_lower_bracket(&DovetailProfile::default(), &lower).unwrap();

    assert_eq!(report.checks, vec!["lower-tongue-simple"]);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].severity, Severity::Error);
}

#[test]
fn test_narrow_dovetail_fit_is_clean() {
    // Rounding and inset leave centi-grid steps on this tongue
    let dovetail = DovetailProfile {
        neck_width: 10.0,
        head_width: 11.0,
        neck_height: 1.0,
        head_height: 2.0,
    };
    let upper = UpperBracketParams {
        channel_clearance: 0.15,
        ..Default::default()
    };
    let lower = LowerBracketParams {
        rounding: 0.769,
        inset: 0.769,
        ..Default::default()
    };

    let report = check_dovetail_fit(&dovetail, &upper, &lower, 0.05).unwrap();
    assert!(report.findings.is_empty(), "{:?}", report.findings);

    let report = check_dovetail_fit(&dovetail, &upper, &lower, 0.1).unwrap();
    assert!(report.findings.is_empty(), "{:?}", report.findings);
}
