//! Integration tests for the bracket definitions and their mating geometry

use dovetail_brackets::brackets::{LOWER_BRACKET, UPPER_BRACKET};
use dovetail_brackets::{
    DesignConfig, DovetailProfile, ExportConfig, LowerBracketParams, Model, Offset, Primitive,
    Solid, UpperBracketParams, lower_bracket, upper_bracket,
};

#[test]
fn test_both_parts_are_differences() {
    let parts = dovetail_brackets::default_parts().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].name, UPPER_BRACKET);
    assert_eq!(parts[1].name, LOWER_BRACKET);

    for part in &parts {
        assert!(
            matches!(part.solid, Solid::Difference { .. }),
            "{} should be a difference",
            part.name
        );
    }
}

#[test]
fn test_upper_bracket_leaf_inventory() {
    let part = upper_bracket(&DovetailProfile::default(), &UpperBracketParams::default()).unwrap();
    let leaves = part.solid.leaves();

    let cubes = leaves.iter().filter(|(_, p)| p.kind() == "cube").count();
    let cylinders = leaves.iter().filter(|(_, p)| p.kind() == "cylinder").count();
    let extrusions = leaves.iter().filter(|(_, p)| p.kind() == "extrusion").count();
    assert_eq!((cubes, cylinders, extrusions), (2, 6, 1));

    // Only the block contributes material
    let material = part.solid.material_leaves();
    assert_eq!(material.len(), 1);
    assert!(matches!(
        material[0].1,
        Primitive::Cube {
            size: [43.0, 35.0, 8.0]
        }
    ));
}

#[test]
fn test_lower_bracket_leaf_inventory() {
    let part = lower_bracket(&DovetailProfile::default(), &LowerBracketParams::default()).unwrap();
    let leaves = part.solid.leaves();

    let cylinders = leaves.iter().filter(|(_, p)| p.kind() == "cylinder").count();
    let cubes = leaves.iter().filter(|(_, p)| p.kind() == "cube").count();
    assert_eq!(cylinders, 8);
    assert_eq!(cubes, 1);

    let material = part.solid.material_leaves();
    assert_eq!(material.len(), 1);
    assert_eq!(material[0].1.kind(), "extrusion");
}

#[test]
fn test_lower_holes_symmetric_under_half_turn() {
    let params = LowerBracketParams::default();
    let positions = params.hole_positions();
    assert_eq!(positions.len(), 4);
    for [x, y] in &positions {
        assert!(positions.contains(&[-x, -y]));
    }
}

#[test]
fn test_tongue_fits_channel_with_clearance() {
    let dovetail = DovetailProfile::default();
    let channel = UpperBracketParams::default()
        .channel_sketch(&dovetail)
        .unwrap()
        .evaluate()
        .unwrap();
    let tongue = LowerBracketParams::default()
        .tongue_sketch(&dovetail)
        .unwrap()
        .evaluate()
        .unwrap()
        .translated(0.0, -dovetail.neck_height);

    assert!(channel.is_simple());
    assert!(tongue.is_simple());
    assert!(channel.contains_profile(&tongue, 0.0).unwrap());
    assert!(channel.fits_with_clearance(&tongue, 0.05).unwrap());
    // The fit is not loose either: 0.1 is the whole designed gap
    assert!(!channel.fits_with_clearance(&tongue, 0.2).unwrap());
}

#[test]
fn test_shared_profile_changes_both_parts() {
    let wide = DovetailProfile {
        head_width: 28.0,
        ..Default::default()
    };
    let design = DesignConfig {
        dovetail: wide,
        ..Default::default()
    };

    let report = dovetail_brackets::checks::check_dovetail_fit(
        &design.dovetail,
        &design.upper,
        &design.lower,
        0.05,
    )
    .unwrap();
    assert!(report.is_ok(), "{:?}", report.findings);

    let (_, max) = design
        .upper
        .channel_sketch(&design.dovetail)
        .unwrap()
        .evaluate()
        .unwrap()
        .bounds();
    assert!(max.x > 14.0);
}

#[test]
fn test_rebuild_is_identical() {
    let design = DesignConfig::default();
    assert_eq!(design.parts().unwrap(), design.parts().unwrap());

    let config = ExportConfig::new().with_facets(24);
    let a = Model::from_parts(&design.parts().unwrap(), &config).unwrap();
    let b = Model::from_parts(&design.parts().unwrap(), &config).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_xml_string().unwrap(), b.to_xml_string().unwrap());
}

#[test]
fn test_non_positive_parameters_are_rejected() {
    let dovetail = DovetailProfile::default();

    let upper = UpperBracketParams {
        channel_length: 0.0,
        ..Default::default()
    };
    assert!(upper_bracket(&dovetail, &upper).is_err());

    let mut lower = LowerBracketParams::default();
    lower.hole.through.diameter = -1.0;
    assert!(lower_bracket(&dovetail, &lower).is_err());
}

#[test]
fn test_collapsing_inset_is_offset_error() {
    let lower = LowerBracketParams {
        inset: 20.0,
        ..Default::default()
    };
    let part = lower_bracket(&DovetailProfile::default(), &lower).unwrap();
    let err = Model::from_parts(&[part], &ExportConfig::new()).unwrap_err();
    assert!(matches!(err, dovetail_brackets::Error::Offset(_)), "{:?}", err);
}

#[test]
fn test_grown_tongue_stays_near_its_outline() {
    let dovetail = DovetailProfile {
        neck_width: 10.0,
        head_width: 11.0,
        neck_height: 1.0,
        head_height: 2.0,
    };
    let lower = LowerBracketParams {
        rounding: 0.769,
        inset: 0.769,
        ..Default::default()
    };
    let tongue = lower.tongue_sketch(&dovetail).unwrap().evaluate().unwrap();
    let grown = tongue.offset(Offset::Delta(0.05)).unwrap();

    // Mitred growth is bounded by the miter limit; no spikes from grid steps
    let (min, max) = tongue.bounds();
    let (grown_min, grown_max) = grown.bounds();
    assert!(min.x - grown_min.x <= 0.11, "{} vs {}", grown_min.x, min.x);
    assert!(grown_max.x - max.x <= 0.11, "{} vs {}", grown_max.x, max.x);
    assert!(grown_max.y - max.y <= 0.11);
    assert!(dovetail.profile().unwrap().contains_profile(&tongue, 0.02).unwrap());
}

#[test]
fn test_non_finite_placement_is_rejected() {
    let lower = LowerBracketParams {
        slot_position: [f64::NAN, 4.5, 0.0],
        ..Default::default()
    };
    let err = lower_bracket(&DovetailProfile::default(), &lower).unwrap_err();
    assert!(matches!(err, dovetail_brackets::Error::InvalidGeometry(_)));
}
