//! Lowering parts into 3MF models
//!
//! Each part becomes one build item. Leaf primitives are tessellated with
//! their accumulated placement baked into the vertices, so every mesh
//! object is already in part coordinates. Differences become
//! `booleanshape` objects whose operands are those meshes; a consumer that
//! supports the Boolean Operations extension evaluates the cut.

use crate::config::ExportConfig;
use crate::csg::{Part, Primitive, Solid, TransformOp, to_3mf_transform};
use crate::error::{Error, Result};
use crate::mesh_ops::{self, Aabb};
use crate::model::{
    BooleanOpType, BooleanRef, BooleanShape, BuildItem, Component, Extension, MetadataEntry,
    Model, Object,
};
use crate::tessellate::tessellate;
use crate::validator::validate_model;
use nalgebra::Matrix4;
use tracing::{debug, info};

/// Name recorded in the `Application` metadata entry
pub const APPLICATION: &str = concat!("dovetail-brackets ", env!("CARGO_PKG_VERSION"));

impl Model {
    /// Lower parts into a model, laid out along +X
    ///
    /// The model is validated afterwards unless validation is disabled in
    /// `config`.
    ///
    /// # Example
    ///
    /// ```
    /// use dovetail_brackets::{DesignConfig, ExportConfig, Model};
    ///
    /// let parts = DesignConfig::default().parts().unwrap();
    /// let model = Model::from_parts(&parts, &ExportConfig::new().with_facets(16)).unwrap();
    /// assert_eq!(model.build.items.len(), 2);
    /// ```
    pub fn from_parts(parts: &[Part], config: &ExportConfig) -> Result<Model> {
        config.check()?;

        let mut lowering = Lowering::new(config.facets());
        let mut cursor = 0.0;
        for part in parts {
            let objectid = lowering.lower_part(part)?;
            let bounds = lowering.take_bounds().ok_or_else(|| {
                Error::InvalidGeometry(format!("Part '{}' has no material", part.name))
            })?;

            // Drop onto the plate and butt against the previous part
            let offset = [cursor - bounds.min[0], -bounds.min[1], -bounds.min[2]];
            cursor += bounds.size()[0] + config.spacing();

            let mut item = BuildItem::new(objectid);
            if offset.iter().any(|v| *v != 0.0) {
                item.transform = Some(to_3mf_transform(&TransformOp::Translate(offset).matrix()));
            }
            lowering.model.build.items.push(item);

            info!(
                part = %part.name,
                objectid,
                size = ?bounds.size(),
                "Lowered part"
            );
        }

        let mut model = lowering.model;
        model.unit = config.unit().to_string();
        model.metadata = metadata(parts, config);

        if config.validate() {
            validate_model(&model)?;
        }
        Ok(model)
    }
}

/// Lower parts and serialize the model XML
pub fn model_xml(parts: &[Part], config: &ExportConfig) -> Result<String> {
    Model::from_parts(parts, config)?.to_xml_string()
}

fn metadata(parts: &[Part], config: &ExportConfig) -> Vec<MetadataEntry> {
    let title = parts
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut entries = vec![
        MetadataEntry::new("Title", title),
        MetadataEntry::new("Designer", "dovetail-brackets"),
        MetadataEntry::new("Application", APPLICATION),
    ];

    for entry in config.metadata() {
        match entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => existing.value = entry.value.clone(),
            None => entries.push(entry.clone()),
        }
    }
    entries
}

struct Lowering {
    model: Model,
    facets: u32,
    next_id: usize,
    bounds: Option<Aabb>,
}

impl Lowering {
    fn new(facets: u32) -> Self {
        Self {
            model: Model::new(),
            facets,
            next_id: 1,
            bounds: None,
        }
    }

    fn take_bounds(&mut self) -> Option<Aabb> {
        self.bounds.take()
    }

    fn lower_part(&mut self, part: &Part) -> Result<usize> {
        let id = self.lower(&part.solid, Matrix4::identity(), &part.name)?;
        if let Some(object) = self.model.resources.objects.iter_mut().find(|o| o.id == id) {
            object.name = Some(part.name.clone());
        }
        Ok(id)
    }

    /// Lower a material solid and return the ID of the object representing it
    fn lower(&mut self, solid: &Solid, placement: Matrix4<f64>, part: &str) -> Result<usize> {
        match solid {
            Solid::Primitive(primitive) => {
                let id = self.add_mesh(primitive, &placement, part)?;
                if let Some(mesh) = self.model.resources.object(id).and_then(|o| o.mesh.as_ref())
                {
                    let aabb = mesh_ops::bounds(mesh)?;
                    self.bounds = Some(match self.bounds {
                        Some(b) => b.union(&aabb),
                        None => aabb,
                    });
                }
                Ok(id)
            }
            Solid::Transformed { op, solid } => {
                self.lower(solid, placement * op.matrix(), part)
            }
            Solid::Union(children) => {
                let ids = children
                    .iter()
                    .map(|child| self.lower(child, placement, part))
                    .collect::<Result<Vec<_>>>()?;
                if let &[id] = ids.as_slice() {
                    return Ok(id);
                }

                let mut object = Object::new(self.allocate_id());
                object.components = ids.into_iter().map(Component::new).collect();
                debug!(
                    part,
                    objectid = object.id,
                    components = object.components.len(),
                    "Union object"
                );
                Ok(self.push(object))
            }
            Solid::Difference { base, cutters } => {
                let base_id = self.lower(base, placement, part)?;
                if self
                    .model
                    .resources
                    .object(base_id)
                    .is_some_and(|o| !o.components.is_empty())
                {
                    return Err(Error::Unsupported(format!(
                        "Part '{}': the base of a difference cannot be a union of several solids",
                        part
                    )));
                }

                let mut shape = BooleanShape::new(base_id, BooleanOpType::Difference);
                for cutter in cutters {
                    self.lower_operands(cutter, placement, part, &mut shape.operands)?;
                }

                let mut object = Object::new(self.allocate_id());
                debug!(
                    part,
                    objectid = object.id,
                    base = base_id,
                    operands = shape.operands.len(),
                    "Boolean difference object"
                );
                object.boolean_shape = Some(shape);
                self.model.require_extension(Extension::BooleanOperations);
                Ok(self.push(object))
            }
        }
    }

    /// Lower a cutter into plain mesh operands
    fn lower_operands(
        &mut self,
        solid: &Solid,
        placement: Matrix4<f64>,
        part: &str,
        operands: &mut Vec<BooleanRef>,
    ) -> Result<()> {
        match solid {
            Solid::Primitive(primitive) => {
                let id = self.add_mesh(primitive, &placement, part)?;
                operands.push(BooleanRef::new(id));
                Ok(())
            }
            Solid::Transformed { op, solid } => {
                self.lower_operands(solid, placement * op.matrix(), part, operands)
            }
            Solid::Union(children) => {
                for child in children {
                    self.lower_operands(child, placement, part, operands)?;
                }
                Ok(())
            }
            Solid::Difference { .. } => Err(Error::Unsupported(format!(
                "Part '{}': a difference inside a cutter cannot be a boolean operand; \
                 operands must be plain meshes",
                part
            ))),
        }
    }

    fn add_mesh(
        &mut self,
        primitive: &Primitive,
        placement: &Matrix4<f64>,
        part: &str,
    ) -> Result<usize> {
        let mut mesh = tessellate(primitive, self.facets)?;
        mesh_ops::transform_mesh(&mut mesh, placement);

        let mut object = Object::new(self.allocate_id());
        object.name = Some(format!("{} {}", part, primitive.kind()));
        debug!(
            part,
            objectid = object.id,
            kind = primitive.kind(),
            vertices = mesh.vertices.len(),
            triangles = mesh.triangles.len(),
            "Mesh object"
        );
        object.mesh = Some(mesh);
        Ok(self.push(object))
    }

    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, object: Object) -> usize {
        let id = object.id;
        self.model.resources.objects.push(object);
        id
    }
}
