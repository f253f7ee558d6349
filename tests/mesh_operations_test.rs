//! Tests for mesh volume and bounds on lowered parts

use dovetail_brackets::mesh_ops::{bounds, signed_volume, transform_mesh};
use dovetail_brackets::tessellate::tessellate;
use dovetail_brackets::{
    DovetailProfile, ExportConfig, Mesh, Model, Primitive, TransformOp, UpperBracketParams,
    upper_bracket,
};

fn upper_model(facets: u32) -> Model {
    let part = upper_bracket(&DovetailProfile::default(), &UpperBracketParams::default()).unwrap();
    Model::from_parts(&[part], &ExportConfig::new().with_facets(facets)).unwrap()
}

fn mesh_named<'a>(model: &'a Model, name: &str) -> &'a Mesh {
    model
        .resources
        .objects
        .iter()
        .find(|o| o.name.as_deref() == Some(name))
        .and_then(|o| o.mesh.as_ref())
        .unwrap_or_else(|| panic!("no mesh object named {}", name))
}

#[test]
fn test_block_mesh_volume_and_bounds() {
    let model = upper_model(16);
    let block = mesh_named(&model, "upper-bracket cube");

    assert!((signed_volume(block) - 43.0 * 35.0 * 8.0).abs() < 1e-9);
    let aabb = bounds(block).unwrap();
    assert_eq!(aabb.min, [0.0, 0.0, 0.0]);
    assert_eq!(aabb.max, [43.0, 35.0, 8.0]);
}

#[test]
fn test_channel_mesh_runs_along_y() {
    let model = upper_model(16);
    let channel = mesh_named(&model, "upper-bracket extrusion");

    let profile = UpperBracketParams::default()
        .channel_sketch(&DovetailProfile::default())
        .unwrap()
        .evaluate()
        .unwrap();

    // Rotated to run along -Y from y = 35, so the volume keeps its sign
    let expected = profile.area() * 35.0;
    assert!((signed_volume(channel) - expected).abs() < 1e-6 * expected);

    let aabb = bounds(channel).unwrap();
    assert!((aabb.min[1] - 0.0).abs() < 1e-9);
    assert!((aabb.max[1] - 35.0).abs() < 1e-9);
    // Channel head sits flush with the bottom face plus clearance
    assert!(aabb.max[2] < 8.0);
}

#[test]
fn test_hole_meshes_are_closed_and_outward() {
    let model = upper_model(24);
    let holes: Vec<_> = model
        .resources
        .objects
        .iter()
        .filter(|o| o.name.as_deref() == Some("upper-bracket cylinder"))
        .filter_map(|o| o.mesh.as_ref())
        .collect();

    assert_eq!(holes.len(), 6);
    for mesh in holes {
        assert!(signed_volume(mesh) > 0.0);
    }
}

#[test]
fn test_mirroring_keeps_volume_positive() {
    let mut mesh = tessellate(&Primitive::Cube { size: [1.0, 2.0, 3.0] }, 8).unwrap();
    let mut mirror = TransformOp::Translate([0.0, 0.0, 0.0]).matrix();
    mirror[(0, 0)] = -1.0;

    transform_mesh(&mut mesh, &mirror);
    assert!((signed_volume(&mesh) - 6.0).abs() < 1e-12);
    assert_eq!(bounds(&mesh).unwrap().min[0], -1.0);
}

#[test]
fn test_empty_mesh_has_no_bounds() {
    assert!(bounds(&Mesh::new()).is_err());
}

#[cfg(feature = "mesh-ops")]
mod parry {
    use super::*;
    use dovetail_brackets::mesh_ops::volume;

    #[test]
    fn test_parry_volume_matches_signed_volume() {
        let mesh = tessellate(&Primitive::Cube { size: [10.0, 20.0, 5.0] }, 8).unwrap();
        let v = volume(&mesh).unwrap();
        assert!((v - 1000.0).abs() < 0.1, "volume {}", v);
    }

    #[test]
    fn test_parry_volume_of_cylinder() {
        let mesh = tessellate(
            &Primitive::Cylinder {
                height: 10.0,
                diameter: 4.0,
            },
            64,
        )
        .unwrap();
        let v = volume(&mesh).unwrap();
        assert!((v - signed_volume(&mesh)).abs() < 0.05, "volume {}", v);
    }

    #[test]
    fn test_parry_volume_of_empty_mesh() {
        assert_eq!(volume(&Mesh::new()).unwrap(), 0.0);
    }
}
