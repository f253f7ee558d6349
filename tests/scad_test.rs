//! Tests for OpenSCAD source output of both brackets

use dovetail_brackets::scad::{ScadSource, to_scad};
use dovetail_brackets::{
    DesignConfig, DovetailProfile, Error, LowerBracketParams, UpperBracketParams, lower_bracket,
    upper_bracket,
};

fn upper_source(facets: u32) -> String {
    let part = upper_bracket(&DovetailProfile::default(), &UpperBracketParams::default()).unwrap();
    to_scad(&part, facets).unwrap()
}

fn lower_source(facets: u32) -> String {
    let part = lower_bracket(&DovetailProfile::default(), &LowerBracketParams::default()).unwrap();
    to_scad(&part, facets).unwrap()
}

#[test]
fn test_upper_bracket_source() {
    let source = upper_source(64);

    assert!(source.starts_with("// upper-bracket\n$fn = 64;\n\ndifference() {\n"));
    assert!(source.contains("  cube([43, 35, 8]);\n"));
    assert!(source.contains(
        "  translate([21.5, 35, 0])\n    \
         rotate([90, 0, 0])\n      \
         linear_extrude(height = 35)\n        \
         offset(delta = 0.1)\n          \
         polygon(points = [[-11, -2], [11, -2], [11, 0], [13, 4], [-13, 4], [-11, 0]]);\n"
    ));
    assert!(source.contains("  translate([16.5, 20, -1])\n    cube([10, 15, 10]);\n"));
    assert!(source.contains("  translate([3.5, 32, -1])\n    cylinder(h = 10, d = 2.2);\n"));
    assert!(source.contains("  translate([19.5, 3, 6])\n    cylinder(h = 2, d = 4.5);\n"));
    assert_eq!(source.matches("cylinder(").count(), 6);
    assert!(source.ends_with("}\n"));
}

#[test]
fn test_lower_bracket_source() {
    let source = lower_source(64);

    assert!(source.starts_with("// lower-bracket\n$fn = 64;\n"));
    assert!(source.contains(
        "translate([0, 12.5, 0])\n    \
         rotate([90, 0, 0])\n      \
         linear_extrude(height = 25)\n        \
         offset(delta = -0.5)\n          \
         offset(r = 0.5)\n            \
         polygon(points = [[-11, 0], [11, 0], [11, 2], [13, 6], [-13, 6], [-11, 2]]);\n"
    ));
    assert!(source.contains("  translate([-7.5, -7.5, 3.5])\n    cylinder(h = 2.5, d = 5.5);\n"));
    assert!(source.contains("  translate([11.25, 4.5, 0])\n    cube([1, 8, 6]);\n"));
    assert_eq!(source.matches("cylinder(").count(), 8);
}

#[test]
fn test_facet_count_is_global() {
    let source = upper_source(12);
    assert!(source.contains("$fn = 12;"));
    assert_eq!(source.matches("$fn").count(), 1);
}

#[test]
fn test_source_is_deterministic() {
    for part in DesignConfig::default().parts().unwrap() {
        let a = to_scad(&part, 64).unwrap();
        let b = to_scad(&part, 64).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, ScadSource::new(&part, 64).unwrap().to_string());
    }
}

#[test]
fn test_parameters_flow_into_source() {
    let design = DesignConfig::from_json_str(
        r#"{"upper": {"channel_clearance": 0.15}, "lower": {"rounding": 0.75}}"#,
    )
    .unwrap();
    let upper = to_scad(&design.part("upper").unwrap(), design.facets).unwrap();
    let lower = to_scad(&design.part("lower").unwrap(), design.facets).unwrap();
    assert!(upper.contains("offset(delta = 0.15)"));
    assert!(lower.contains("offset(r = 0.75)"));
}

#[test]
fn test_two_facets_are_rejected() {
    let design = DesignConfig::from_json_str(r#"{"facets": 2}"#).unwrap();
    let part = design.part("upper").unwrap();

    let err = to_scad(&part, design.facets).unwrap_err();
    assert!(matches!(err, Error::InvalidGeometry(_)));
    assert!(ScadSource::new(&part, design.facets).is_err());
}
