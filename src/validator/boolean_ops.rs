//! Boolean operations validation

use crate::error::{Error, Result};
use crate::model::{Model, Object};
use std::collections::{HashMap, HashSet};

use super::core::sorted_ids_from_set;

/// Validates boolean shapes: references exist, are defined earlier, and
/// operands are plain meshes
pub fn validate_boolean_operations(model: &Model) -> Result<()> {
    let object_indices: HashMap<usize, usize> = model
        .resources
        .objects
        .iter()
        .enumerate()
        .map(|(idx, obj)| (obj.id, idx))
        .collect();

    for (current_idx, object) in model.resources.objects.iter().enumerate() {
        let Some(ref boolean_shape) = object.boolean_shape else {
            continue;
        };

        if boolean_shape.operands.is_empty() {
            return Err(Error::InvalidModel(format!(
                "Object {}: Boolean shape has no operands.\n\
                 <booleanshape> must contain one or more <boolean> elements.",
                object.id
            )));
        }

        let base = referenced_object(
            model,
            &object_indices,
            current_idx,
            object.id,
            "base",
            boolean_shape.objectid,
        )?;
        if base.mesh.is_none() && base.boolean_shape.is_none() {
            return Err(Error::InvalidModel(format!(
                "Object {}: Boolean shape base object {} does not define a shape.\n\
                 The base object must be a mesh or a booleanshape, not an assembly of components.",
                object.id, boolean_shape.objectid
            )));
        }

        for operand in &boolean_shape.operands {
            let operand_obj = referenced_object(
                model,
                &object_indices,
                current_idx,
                object.id,
                "operand",
                operand.objectid,
            )?;

            if operand_obj.mesh.is_none() {
                return Err(Error::InvalidModel(format!(
                    "Object {}: Boolean operand object {} must be a triangle mesh.",
                    object.id, operand.objectid
                )));
            }

            if operand_obj.boolean_shape.is_some() || !operand_obj.components.is_empty() {
                return Err(Error::InvalidModel(format!(
                    "Object {}: Boolean operand object {} must be a simple triangle mesh \
                     without booleanshape or components.",
                    object.id, operand.objectid
                )));
            }
        }
    }

    Ok(())
}

/// Look up an object referenced from a boolean shape, which must be defined
/// earlier in the resources
fn referenced_object<'a>(
    model: &'a Model,
    object_indices: &HashMap<usize, usize>,
    current_idx: usize,
    object_id: usize,
    role: &str,
    id: usize,
) -> Result<&'a Object> {
    let Some(&idx) = object_indices.get(&id) else {
        let valid_object_ids: HashSet<usize> = object_indices.keys().copied().collect();
        return Err(Error::InvalidModel(format!(
            "Object {}: Boolean {} references non-existent object ID {}.\n\
             Available object IDs: {:?}",
            object_id,
            role,
            id,
            sorted_ids_from_set(&valid_object_ids)
        )));
    };

    if idx >= current_idx {
        return Err(Error::InvalidModel(format!(
            "Object {}: Boolean {} references object {} which is defined after it.\n\
             Objects must be defined before they are referenced.",
            object_id, role, id
        )));
    }

    Ok(&model.resources.objects[idx])
}
