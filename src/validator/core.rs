//! Core validation functions for lowered 3MF models

use crate::error::{Error, Result};
use crate::mesh_ops;
use crate::model::{Extension, Mesh, Model};
use std::collections::{HashMap, HashSet};

/// Validates that the model has something to build
pub(crate) fn validate_required_structure(model: &Model) -> Result<()> {
    if model.resources.objects.is_empty() {
        return Err(Error::InvalidModel(
            "Model must contain at least one object. \
             Lowering produced an empty <resources> section."
                .to_string(),
        ));
    }

    if model.build.items.is_empty() {
        return Err(Error::InvalidModel(
            "Build section must contain at least one item. \
             The build section specifies which objects should be printed."
                .to_string(),
        ));
    }

    Ok(())
}

/// Validates that object IDs are positive and unique
pub(crate) fn validate_object_ids(model: &Model) -> Result<()> {
    let mut seen_ids = HashSet::new();

    for object in &model.resources.objects {
        if object.id == 0 {
            return Err(Error::InvalidModel(
                "Object ID must be a positive integer (greater than 0). \
                 Found object with ID = 0, which is invalid."
                    .to_string(),
            ));
        }

        if !seen_ids.insert(object.id) {
            return Err(Error::InvalidModel(format!(
                "Duplicate object ID found: {}. \
                 Each object in the resources section must have a unique ID attribute.",
                object.id
            )));
        }
    }

    Ok(())
}

/// Validates that every object holds exactly one kind of shape
pub(crate) fn validate_object_content(model: &Model) -> Result<()> {
    for object in &model.resources.objects {
        let kinds = [
            object.mesh.is_some(),
            !object.components.is_empty(),
            object.boolean_shape.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        if kinds != 1 {
            return Err(Error::InvalidModel(format!(
                "Object {}: Must contain exactly one of a mesh, components, or a booleanshape, \
                 but contains {}.",
                object.id, kinds
            )));
        }
    }

    Ok(())
}

/// Validates mesh indices, degenerate triangles, manifold edges and orientation
pub fn validate_mesh_geometry(model: &Model) -> Result<()> {
    for object in &model.resources.objects {
        let Some(ref mesh) = object.mesh else {
            continue;
        };

        if mesh.triangles.is_empty() {
            return Err(Error::InvalidModel(format!(
                "Object {}: Mesh has no triangles.",
                object.id
            )));
        }

        if let Some((idx, v)) = mesh
            .vertices
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()))
        {
            return Err(Error::InvalidModel(format!(
                "Object {}: Vertex {} has non-finite coordinates ({}, {}, {}).",
                object.id, idx, v.x, v.y, v.z
            )));
        }

        let num_vertices = mesh.vertices.len();
        for (tri_idx, triangle) in mesh.triangles.iter().enumerate() {
            for (label, index) in [("v1", triangle.v1), ("v2", triangle.v2), ("v3", triangle.v3)] {
                if index >= num_vertices {
                    return Err(Error::InvalidModel(format!(
                        "Object {}: Triangle {} vertex {}={} is out of bounds (mesh has {} vertices).",
                        object.id, tri_idx, label, index, num_vertices
                    )));
                }
            }

            if triangle.v1 == triangle.v2
                || triangle.v2 == triangle.v3
                || triangle.v1 == triangle.v3
            {
                return Err(Error::InvalidModel(format!(
                    "Object {}: Triangle {} is degenerate (v1={}, v2={}, v3={}). \
                     All three vertices of a triangle must be distinct.",
                    object.id, tri_idx, triangle.v1, triangle.v2, triangle.v3
                )));
            }
        }

        validate_mesh_manifold(object.id, mesh)?;

        let volume = mesh_ops::signed_volume(mesh);
        if volume <= 0.0 {
            return Err(Error::InvalidModel(format!(
                "Object {}: Mesh has non-positive signed volume ({:.6}). \
                 Triangles must be wound counter-clockwise when seen from outside.",
                object.id, volume
            )));
        }
    }

    Ok(())
}

/// Validates that every edge is shared by exactly two triangles
pub fn validate_mesh_manifold(object_id: usize, mesh: &Mesh) -> Result<()> {
    let mut edge_count: HashMap<(usize, usize), usize> =
        HashMap::with_capacity(mesh.triangles.len() * 2);

    for triangle in &mesh.triangles {
        let edges = [
            (triangle.v1.min(triangle.v2), triangle.v1.max(triangle.v2)),
            (triangle.v2.min(triangle.v3), triangle.v2.max(triangle.v3)),
            (triangle.v3.min(triangle.v1), triangle.v3.max(triangle.v1)),
        ];

        for edge in edges {
            *edge_count.entry(edge).or_insert(0) += 1;
        }
    }

    let mut bad: Vec<_> = edge_count
        .into_iter()
        .filter(|(_, count)| *count != 2)
        .collect();
    bad.sort();

    if let Some(((a, b), count)) = bad.first() {
        return Err(Error::InvalidModel(format!(
            "Object {}: Edge (vertices {}-{}) is shared by {} triangle(s); a closed mesh \
             shares each edge between exactly 2 triangles.",
            object_id, a, b, count
        )));
    }

    Ok(())
}

/// Validates that components reference objects defined before them
pub fn validate_component_references(model: &Model) -> Result<()> {
    let mut defined = HashSet::new();

    for object in &model.resources.objects {
        for component in &object.components {
            if !defined.contains(&component.objectid) {
                return Err(Error::InvalidModel(format!(
                    "Object {}: Component references object {} which is not defined before it.\n\
                     Objects must be defined before they are referenced.",
                    object.id, component.objectid
                )));
            }
        }
        defined.insert(object.id);
    }

    Ok(())
}

/// Validates that all build items reference valid objects
pub fn validate_build_references(model: &Model) -> Result<()> {
    let valid_object_ids: HashSet<usize> =
        model.resources.objects.iter().map(|obj| obj.id).collect();

    for (item_idx, item) in model.build.items.iter().enumerate() {
        if !valid_object_ids.contains(&item.objectid) {
            return Err(Error::InvalidModel(format!(
                "Build item {} references non-existent object ID: {}. \
                 Available object IDs: {:?}",
                item_idx,
                item.objectid,
                sorted_ids_from_set(&valid_object_ids)
            )));
        }
    }

    Ok(())
}

/// Validates that build item transforms are finite, invertible and not mirroring
pub(crate) fn validate_transform_matrices(model: &Model) -> Result<()> {
    for (idx, item) in model.build.items.iter().enumerate() {
        let Some(ref t) = item.transform else {
            continue;
        };

        if t.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidModel(format!(
                "Build item {}: Transform contains non-finite values: {:?}",
                idx, t
            )));
        }

        // Rows of the 3x3 part are the images of the basis axes
        let det = t[0] * (t[4] * t[8] - t[5] * t[7]) - t[1] * (t[3] * t[8] - t[5] * t[6])
            + t[2] * (t[3] * t[7] - t[4] * t[6]);

        const DET_EPSILON: f64 = 1e-10;
        if det.abs() < DET_EPSILON {
            return Err(Error::InvalidModel(format!(
                "Build item {}: Transform matrix has zero determinant ({:.6}).",
                idx, det
            )));
        }
        if det < 0.0 {
            return Err(Error::InvalidModel(format!(
                "Build item {}: Transform matrix has negative determinant ({:.6}); \
                 mirroring transforms are not allowed.",
                idx, det
            )));
        }
    }

    Ok(())
}

/// Validates that extension features in use are declared as required
pub(crate) fn validate_required_extensions(model: &Model) -> Result<()> {
    let uses_boolean_ops = model
        .resources
        .objects
        .iter()
        .any(|o| o.boolean_shape.is_some());

    if uses_boolean_ops
        && !model
            .required_extensions
            .contains(&Extension::BooleanOperations)
    {
        return Err(Error::InvalidModel(
            "Model uses <booleanshape> but does not list the Boolean Operations \
             extension in requiredextensions."
                .to_string(),
        ));
    }

    Ok(())
}

/// Sorted copy of an ID set, for error messages
pub(crate) fn sorted_ids_from_set(ids: &HashSet<usize>) -> Vec<usize> {
    let mut sorted: Vec<usize> = ids.iter().copied().collect();
    sorted.sort();
    sorted
}
