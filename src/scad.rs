//! OpenSCAD source emission
//!
//! Produces a script an OpenSCAD-compatible engine evaluates into the final
//! solid. The output only depends on the part and the facet count, so
//! rebuilding a part yields byte-identical source.

use crate::config::check_facets;
use crate::csg::{Part, Primitive, Sketch, Solid, TransformOp};
use crate::error::Result;
use crate::profile::Offset;
use std::fmt::{self, Write};

const INDENT: &str = "  ";

/// A part rendered as OpenSCAD source
///
/// Implements [`fmt::Display`]; use [`to_scad`] for a `String`.
pub struct ScadSource<'a> {
    part: &'a Part,
    facets: u32,
}

impl<'a> ScadSource<'a> {
    /// Render `part` with `facets` segments per circle
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if `facets` is below
    /// [`MIN_FACETS`](crate::config::MIN_FACETS).
    pub fn new(part: &'a Part, facets: u32) -> Result<Self> {
        check_facets(facets)?;
        Ok(Self { part, facets })
    }
}

impl fmt::Display for ScadSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// {}", self.part.name)?;
        writeln!(f, "$fn = {};", self.facets)?;
        writeln!(f)?;
        write_solid(f, &self.part.solid, 0)
    }
}

/// Render a part as OpenSCAD source
///
/// # Example
///
/// ```
/// use dovetail_brackets::csg::{Part, Solid};
/// use dovetail_brackets::scad::to_scad;
///
/// let part = Part::new("plate", Solid::cube([10.0, 5.0, 1.5]).unwrap());
/// let source = to_scad(&part, 32).unwrap();
/// assert!(source.contains("$fn = 32;"));
/// assert!(source.contains("cube([10, 5, 1.5]);"));
/// ```
pub fn to_scad(part: &Part, facets: u32) -> Result<String> {
    Ok(ScadSource::new(part, facets)?.to_string())
}

fn write_solid<W: Write>(out: &mut W, solid: &Solid, depth: usize) -> fmt::Result {
    indent(out, depth)?;
    match solid {
        Solid::Primitive(primitive) => write_primitive(out, primitive, depth),
        Solid::Transformed { op, solid } => {
            match op {
                TransformOp::Translate(v) => writeln!(out, "translate({})", vector(v))?,
                TransformOp::Rotate(v) => writeln!(out, "rotate({})", vector(v))?,
            }
            write_solid(out, solid, depth + 1)
        }
        Solid::Union(children) => {
            writeln!(out, "union() {{")?;
            for child in children {
                write_solid(out, child, depth + 1)?;
            }
            indent(out, depth)?;
            writeln!(out, "}}")
        }
        Solid::Difference { base, cutters } => {
            writeln!(out, "difference() {{")?;
            write_solid(out, base, depth + 1)?;
            for cutter in cutters {
                write_solid(out, cutter, depth + 1)?;
            }
            indent(out, depth)?;
            writeln!(out, "}}")
        }
    }
}

fn write_primitive<W: Write>(out: &mut W, primitive: &Primitive, depth: usize) -> fmt::Result {
    match primitive {
        Primitive::Cube { size } => writeln!(out, "cube({});", vector(size)),
        Primitive::Cylinder { height, diameter } => {
            writeln!(out, "cylinder(h = {}, d = {});", num(*height), num(*diameter))
        }
        Primitive::Extrusion { sketch, height } => {
            writeln!(out, "linear_extrude(height = {})", num(*height))?;
            write_sketch(out, sketch, depth + 1)
        }
    }
}

/// Offsets wrap the polygon, so the last one applied is written first
fn write_sketch<W: Write>(out: &mut W, sketch: &Sketch, depth: usize) -> fmt::Result {
    let mut depth = depth;
    for offset in sketch.offsets.iter().rev() {
        indent(out, depth)?;
        match offset {
            Offset::Delta(d) => writeln!(out, "offset(delta = {})", num(*d))?,
            Offset::Radius(r) => writeln!(out, "offset(r = {})", num(*r))?,
        }
        depth += 1;
    }

    indent(out, depth)?;
    write!(out, "polygon(points = [")?;
    for (i, p) in sketch.profile.points().iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "[{}, {}]", num(p.x), num(p.y))?;
    }
    writeln!(out, "]);")
}

fn indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn vector(v: &[f64; 3]) -> String {
    format!("[{}, {}, {}]", num(v[0]), num(v[1]), num(v[2]))
}

/// Shortest round-trip form, without negative zero
fn num(value: f64) -> String {
    format!("{}", value + 0.0)
}
