//! Declarative solid trees
//!
//! A [`Solid`] describes a shape the way a CAD script does: primitives,
//! transforms applied to them, and boolean combinations. Nothing here
//! evaluates booleans; the tree is handed to an external engine either as
//! OpenSCAD source ([`crate::scad`]) or as a 3MF boolean model
//! ([`crate::export`]).

use crate::error::{Error, Result};
use crate::profile::{Offset, Profile};
use nalgebra::{Matrix4, Vector3};

/// A 2D profile together with the offsets applied to it before extrusion
///
/// Offsets are applied in order, so the first entry is the innermost
/// operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    /// The base polygon
    pub profile: Profile,
    /// Offsets applied to the polygon, first to last
    pub offsets: Vec<Offset>,
}

impl Sketch {
    /// A sketch with no offsets
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            offsets: Vec::new(),
        }
    }

    /// Append an offset
    pub fn offset(mut self, offset: Offset) -> Self {
        self.offsets.push(offset);
        self
    }

    /// Apply the offsets and return the resulting polygon
    pub fn evaluate(&self) -> Result<Profile> {
        self.profile.offset_all(&self.offsets)
    }
}

/// A leaf volume
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Box with one corner at the origin, spanning `[0, size]` on each axis
    Cube {
        /// Edge lengths along X, Y and Z
        size: [f64; 3],
    },
    /// Cylinder on the XY plane, spanning `z ∈ [0, height]`
    Cylinder {
        /// Height along Z
        height: f64,
        /// Diameter
        diameter: f64,
    },
    /// Sketch on the XY plane swept along +Z
    Extrusion {
        /// Cross-section
        sketch: Sketch,
        /// Sweep length
        height: f64,
    },
}

impl Primitive {
    /// Short lowercase name of the primitive kind
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Cube { .. } => "cube",
            Primitive::Cylinder { .. } => "cylinder",
            Primitive::Extrusion { .. } => "extrusion",
        }
    }
}

/// A placement applied to a solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// Translation by `[x, y, z]`
    Translate([f64; 3]),
    /// Rotation in degrees about X, then Y, then Z
    Rotate([f64; 3]),
}

impl TransformOp {
    /// Homogeneous matrix for this placement
    pub fn matrix(&self) -> Matrix4<f64> {
        match self {
            TransformOp::Translate([x, y, z]) => {
                Matrix4::new_translation(&Vector3::new(*x, *y, *z))
            }
            TransformOp::Rotate([ax, ay, az]) => {
                rotation_z(*az) * rotation_y(*ay) * rotation_x(*ax)
            }
        }
    }
}

/// A solid region of space
#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    /// A leaf volume
    Primitive(Primitive),
    /// A solid placed by a transform
    Transformed {
        /// The placement
        op: TransformOp,
        /// The placed solid
        solid: Box<Solid>,
    },
    /// All children combined
    Union(Vec<Solid>),
    /// The base with every cutter removed
    Difference {
        /// The solid cut from
        base: Box<Solid>,
        /// The solids removed
        cutters: Vec<Solid>,
    },
}

impl Solid {
    /// Box spanning `[0, size]`
    pub fn cube(size: [f64; 3]) -> Result<Self> {
        for (axis, value) in ["x", "y", "z"].iter().zip(size) {
            check_positive(&format!("cube size {}", axis), value)?;
        }
        Ok(Solid::Primitive(Primitive::Cube { size }))
    }

    /// Cylinder spanning `z ∈ [0, height]`
    pub fn cylinder(height: f64, diameter: f64) -> Result<Self> {
        check_positive("cylinder height", height)?;
        check_positive("cylinder diameter", diameter)?;
        Ok(Solid::Primitive(Primitive::Cylinder { height, diameter }))
    }

    /// Sweep a sketch along +Z
    pub fn extrude(sketch: Sketch, height: f64) -> Result<Self> {
        check_positive("extrusion height", height)?;
        Ok(Solid::Primitive(Primitive::Extrusion { sketch, height }))
    }

    /// Translate by `[x, y, z]`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if any component is not finite.
    pub fn translate(self, offset: [f64; 3]) -> Result<Self> {
        check_finite("translation", offset)?;
        Ok(Solid::Transformed {
            op: TransformOp::Translate(offset),
            solid: Box::new(self),
        })
    }

    /// Rotate by `[ax, ay, az]` degrees (X first, then Y, then Z)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if any angle is not finite.
    pub fn rotate(self, degrees: [f64; 3]) -> Result<Self> {
        check_finite("rotation", degrees)?;
        Ok(Solid::Transformed {
            op: TransformOp::Rotate(degrees),
            solid: Box::new(self),
        })
    }

    /// Remove every cutter from this solid
    pub fn difference(self, cutters: impl IntoIterator<Item = Solid>) -> Self {
        Solid::Difference {
            base: Box::new(self),
            cutters: cutters.into_iter().collect(),
        }
    }

    /// Combine solids
    pub fn union(children: impl IntoIterator<Item = Solid>) -> Self {
        Solid::Union(children.into_iter().collect())
    }

    /// Every primitive in the tree with its accumulated placement
    ///
    /// Cutters are included; use this for counting and inspection, not for
    /// reasoning about the resulting volume.
    pub fn leaves(&self) -> Vec<(Matrix4<f64>, &Primitive)> {
        let mut out = Vec::new();
        self.collect_leaves(Matrix4::identity(), &mut out);
        out
    }

    fn collect_leaves<'a>(
        &'a self,
        placement: Matrix4<f64>,
        out: &mut Vec<(Matrix4<f64>, &'a Primitive)>,
    ) {
        match self {
            Solid::Primitive(p) => out.push((placement, p)),
            Solid::Transformed { op, solid } => {
                solid.collect_leaves(placement * op.matrix(), out)
            }
            Solid::Union(children) => {
                for child in children {
                    child.collect_leaves(placement, out);
                }
            }
            Solid::Difference { base, cutters } => {
                base.collect_leaves(placement, out);
                for cutter in cutters {
                    cutter.collect_leaves(placement, out);
                }
            }
        }
    }

    /// Primitives that contribute material (everything not under a cutter)
    pub fn material_leaves(&self) -> Vec<(Matrix4<f64>, &Primitive)> {
        let mut out = Vec::new();
        self.collect_material(Matrix4::identity(), &mut out);
        out
    }

    fn collect_material<'a>(
        &'a self,
        placement: Matrix4<f64>,
        out: &mut Vec<(Matrix4<f64>, &'a Primitive)>,
    ) {
        match self {
            Solid::Primitive(p) => out.push((placement, p)),
            Solid::Transformed { op, solid } => {
                solid.collect_material(placement * op.matrix(), out)
            }
            Solid::Union(children) => {
                for child in children {
                    child.collect_material(placement, out);
                }
            }
            Solid::Difference { base, .. } => base.collect_material(placement, out),
        }
    }
}

/// A named top-level solid
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Part name, used for object names and output files
    pub name: String,
    /// The part's geometry
    pub solid: Solid,
}

impl Part {
    /// Create a new part
    pub fn new(name: impl Into<String>, solid: Solid) -> Self {
        Self {
            name: name.into(),
            solid,
        }
    }
}

/// Convert a homogeneous matrix to the 12-value 3MF matrix order
///
/// 3MF uses row vectors, so each group of three values is the image of one
/// basis axis, followed by the translation.
pub fn to_3mf_transform(m: &Matrix4<f64>) -> [f64; 12] {
    [
        m[(0, 0)],
        m[(1, 0)],
        m[(2, 0)],
        m[(0, 1)],
        m[(1, 1)],
        m[(2, 1)],
        m[(0, 2)],
        m[(1, 2)],
        m[(2, 2)],
        m[(0, 3)],
        m[(1, 3)],
        m[(2, 3)],
    ]
}

fn check_positive(parameter: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_parameter(
            parameter,
            &format!("must be positive, got {}", value),
        ));
    }
    Ok(())
}

fn check_finite(parameter: &str, values: [f64; 3]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::invalid_parameter(
            parameter,
            &format!("must be finite, got {:?}", values),
        ));
    }
    Ok(())
}

/// Sine and cosine of an angle in degrees, exact at quarter turns
fn sin_cos_deg(degrees: f64) -> (f64, f64) {
    let quarter = degrees / 90.0;
    if quarter.fract() == 0.0 {
        match (quarter as i64).rem_euclid(4) {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        }
    } else {
        degrees.to_radians().sin_cos()
    }
}

fn rotation_x(degrees: f64) -> Matrix4<f64> {
    let (s, c) = sin_cos_deg(degrees);
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, -s, 0.0, //
        0.0, s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

fn rotation_y(degrees: f64) -> Matrix4<f64> {
    let (s, c) = sin_cos_deg(degrees);
    Matrix4::new(
        c, 0.0, s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

fn rotation_z(degrees: f64) -> Matrix4<f64> {
    let (s, c) = sin_cos_deg(degrees);
    Matrix4::new(
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}
