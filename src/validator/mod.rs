//! Validation of lowered 3MF models
//!
//! Every model is checked before it is written, so a package that leaves
//! this crate can be opened by any consumer that supports the Boolean
//! Operations extension.

mod boolean_ops;
mod core;

use crate::error::Result;
use crate::model::Model;

pub use boolean_ops::validate_boolean_operations;
pub use core::{
    validate_build_references, validate_component_references, validate_mesh_geometry,
    validate_mesh_manifold,
};

/// Validate a 3MF model
///
/// Checks, in order:
/// - at least one object and one build item
/// - object IDs are positive and unique
/// - each object holds exactly one of a mesh, components or a booleanshape
/// - meshes are closed, outward-facing and index in range
/// - components and boolean references point at earlier objects
/// - boolean operands are plain meshes
/// - build items reference existing objects with proper transforms
/// - the Boolean Operations extension is declared when used
pub fn validate_model(model: &Model) -> Result<()> {
    core::validate_required_structure(model)?;
    core::validate_object_ids(model)?;
    core::validate_object_content(model)?;
    validate_mesh_geometry(model)?;
    validate_component_references(model)?;
    validate_boolean_operations(model)?;
    validate_build_references(model)?;
    core::validate_transform_matrices(model)?;
    core::validate_required_extensions(model)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::Primitive;
    use crate::error::Error;
    use crate::model::{
        BooleanOpType, BooleanRef, BooleanShape, BuildItem, Component, Extension, Object,
    };
    use crate::tessellate::tessellate;

    fn mesh_object(id: usize) -> Object {
        let mut object = Object::new(id);
        object.mesh = Some(tessellate(&Primitive::Cube { size: [1.0, 1.0, 1.0] }, 8).unwrap());
        object
    }

    fn boolean_model() -> Model {
        let mut model = Model::new();
        model.resources.objects.push(mesh_object(1));
        model.resources.objects.push(mesh_object(2));

        let mut shape = BooleanShape::new(1, BooleanOpType::Difference);
        shape.operands.push(BooleanRef::new(2));
        let mut object = Object::new(3);
        object.boolean_shape = Some(shape);
        model.resources.objects.push(object);

        model.build.items.push(BuildItem::new(3));
        model.require_extension(Extension::BooleanOperations);
        model
    }

    fn assert_invalid(model: &Model, needle: &str) {
        match validate_model(model) {
            Err(Error::InvalidModel(msg)) => {
                assert!(msg.contains(needle), "'{}' not in '{}'", needle, msg)
            }
            other => panic!("expected InvalidModel, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_boolean_model() {
        validate_model(&boolean_model()).unwrap();
    }

    #[test]
    fn test_empty_model_is_invalid() {
        assert_invalid(&Model::new(), "at least one object");
    }

    #[test]
    fn test_duplicate_object_id() {
        let mut model = boolean_model();
        model.resources.objects[1].id = 1;
        assert_invalid(&model, "Duplicate object ID");
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let mut model = boolean_model();
        let shape_object = model.resources.objects.remove(2);
        model.resources.objects.insert(0, shape_object);
        assert_invalid(&model, "defined after it");
    }

    #[test]
    fn test_operand_must_be_mesh() {
        let mut model = boolean_model();
        let mut assembly = Object::new(4);
        assembly.components.push(Component::new(2));
        model.resources.objects.insert(2, assembly);
        if let Some(shape) = model.resources.objects[3].boolean_shape.as_mut() {
            shape.operands.push(BooleanRef::new(4));
        }
        assert_invalid(&model, "must be a triangle mesh");
    }

    #[test]
    fn test_missing_extension_declaration() {
        let mut model = boolean_model();
        model.required_extensions.clear();
        assert_invalid(&model, "requiredextensions");
    }

    #[test]
    fn test_build_item_reference() {
        let mut model = boolean_model();
        model.build.items.push(BuildItem::new(42));
        assert_invalid(&model, "non-existent object ID: 42");
    }

    #[test]
    fn test_non_finite_vertex_is_rejected() {
        let mut model = boolean_model();
        if let Some(mesh) = model.resources.objects[1].mesh.as_mut() {
            mesh.vertices[0].x = f64::NAN;
        }
        assert_invalid(&model, "non-finite coordinates");
    }

    #[test]
    fn test_inverted_mesh_is_rejected() {
        let mut model = boolean_model();
        if let Some(mesh) = model.resources.objects[0].mesh.as_mut() {
            for t in &mut mesh.triangles {
                std::mem::swap(&mut t.v2, &mut t.v3);
            }
        }
        assert_invalid(&model, "signed volume");
    }

    #[test]
    fn test_open_mesh_is_rejected() {
        let mut model = boolean_model();
        if let Some(mesh) = model.resources.objects[1].mesh.as_mut() {
            mesh.triangles.pop();
        }
        assert_invalid(&model, "shared by 1 triangle");
    }

    #[test]
    fn test_mirroring_build_transform() {
        let mut model = boolean_model();
        model.build.items[0].transform =
            Some([-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_invalid(&model, "negative determinant");
    }
}
