//! Primitive tessellation
//!
//! Converts leaf primitives into closed, outward-facing triangle meshes.
//! Every primitive is an extrusion of some profile along +Z: cubes extrude
//! a rectangle, cylinders a regular polygon with the configured facet count.
//!
//! Caps are triangulated with the `earcutr` library, a Rust port of the
//! earcut.js polygon triangulation library from MapBox.

use crate::csg::Primitive;
use crate::error::{Error, Result};
use crate::model::{Mesh, Triangle, Vertex};
use crate::profile::Profile;

/// Triangulate a simple polygon
///
/// Returns vertex index triples into `profile.points()`, each wound
/// counter-clockwise regardless of the profile's own orientation.
///
/// # Example
///
/// ```
/// use dovetail_brackets::profile::Profile;
/// use dovetail_brackets::tessellate::triangulate;
///
/// let square = Profile::rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
/// let triangles = triangulate(&square).unwrap();
/// assert_eq!(triangles.len(), 2);
/// ```
pub fn triangulate(profile: &Profile) -> Result<Vec<[usize; 3]>> {
    let points = profile.points();

    // Flat coordinate array [x0, y0, x1, y1, ...]
    let mut coords = Vec::with_capacity(points.len() * 2);
    for p in points {
        coords.push(p.x);
        coords.push(p.y);
    }

    let hole_indices: Vec<usize> = Vec::new();
    let indices = earcutr::earcut(&coords, &hole_indices, 2)
        .map_err(|e| Error::Triangulation(format!("Earcut error: {}", e)))?;

    if indices.is_empty() {
        return Err(Error::Triangulation(format!(
            "Earcut returned no triangles for a {}-vertex profile",
            points.len()
        )));
    }

    Ok(indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (points[t[0]], points[t[1]], points[t[2]]);
            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            if cross < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                [t[0], t[1], t[2]]
            }
        })
        .collect())
}

/// Sweep a profile from `z = 0` to `z = height`
///
/// The result is closed and its triangles face outward (positive signed
/// volume).
pub fn extrude_profile(profile: &Profile, height: f64) -> Result<Mesh> {
    let profile = profile.to_ccw();
    let points = profile.points();
    let n = points.len();
    let cap = triangulate(&profile)?;

    let mut mesh = Mesh::with_capacity(2 * n, 2 * cap.len() + 2 * n);
    for z in [0.0, height] {
        for p in points {
            mesh.vertices.push(Vertex::new(p.x, p.y, z));
        }
    }

    for [a, b, c] in &cap {
        // Bottom faces -Z, top faces +Z
        mesh.triangles.push(Triangle::new(*a, *c, *b));
        mesh.triangles.push(Triangle::new(n + a, n + b, n + c));
    }

    for i in 0..n {
        let j = (i + 1) % n;
        mesh.triangles.push(Triangle::new(i, j, n + j));
        mesh.triangles.push(Triangle::new(i, n + j, n + i));
    }

    Ok(mesh)
}

/// Tessellate a primitive in its local frame
///
/// `facets` is the number of segments used for circles.
pub fn tessellate(primitive: &Primitive, facets: u32) -> Result<Mesh> {
    match primitive {
        Primitive::Cube { size } => {
            let base = Profile::rectangle(0.0, 0.0, size[0], size[1])?;
            extrude_profile(&base, size[2])
        }
        Primitive::Cylinder { height, diameter } => {
            let base = Profile::circle(diameter / 2.0, facets)?;
            extrude_profile(&base, *height)
        }
        Primitive::Extrusion { sketch, height } => {
            let base = sketch.evaluate()?;
            extrude_profile(&base, *height)
        }
    }
}
