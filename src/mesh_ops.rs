//! Triangle mesh queries and placement
//!
//! This module provides the geometric operations the exporter and the
//! checks need on tessellated primitives:
//! - Signed volume (orientation check)
//! - Unsigned volume via parry3d (with the `mesh-ops` feature), used to
//!   tell closed material meshes from open ones
//! - Axis-aligned bounding boxes
//! - Baking a placement matrix into vertex positions

use crate::error::{Error, Result};
use crate::model::Mesh;
use nalgebra::{Matrix4, Point3};
#[cfg(feature = "mesh-ops")]
use parry3d::math::Vector;
#[cfg(feature = "mesh-ops")]
use parry3d::shape::{Shape, TriMesh as ParryTriMesh};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: [f64; 3],
    /// Maximum corner
    pub max: [f64; 3],
}

impl Aabb {
    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        for axis in 0..3 {
            out.min[axis] = out.min[axis].min(other.min[axis]);
            out.max[axis] = out.max[axis].max(other.max[axis]);
        }
        out
    }

    /// Edge lengths along X, Y and Z
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Compute the signed volume of a mesh using the divergence theorem
///
/// For a closed mesh with outward-facing triangles the volume is positive.
/// Negative volume indicates inverted triangles. Triangles with
/// out-of-range indices are skipped.
pub fn signed_volume(mesh: &Mesh) -> f64 {
    let mut volume = 0.0_f64;
    for triangle in &mesh.triangles {
        let (Some(v1), Some(v2), Some(v3)) = (
            mesh.vertices.get(triangle.v1),
            mesh.vertices.get(triangle.v2),
            mesh.vertices.get(triangle.v3),
        ) else {
            continue;
        };

        volume += v1.x * (v2.y * v3.z - v2.z * v3.y)
            + v2.x * (v3.y * v1.z - v3.z * v1.y)
            + v3.x * (v1.y * v2.z - v1.z * v2.y);
    }
    volume / 6.0
}

/// Compute the unsigned volume of a mesh using parry3d
///
/// parry3d sums tetrahedra about the mesh's geometric centre rather than
/// the origin, so for an open mesh this differs from [`signed_volume`].
/// The result is the absolute volume in cubic units, regardless of
/// triangle orientation.
#[cfg(feature = "mesh-ops")]
pub fn volume(mesh: &Mesh) -> Result<f64> {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return Ok(0.0);
    }

    let vertices: Vec<Vector> = mesh
        .vertices
        .iter()
        .map(|v| Vector::new(v.x as f32, v.y as f32, v.z as f32))
        .collect();

    let indices: Vec<[u32; 3]> = mesh
        .triangles
        .iter()
        .map(|t| [t.v1 as u32, t.v2 as u32, t.v3 as u32])
        .collect();

    let trimesh = ParryTriMesh::new(vertices, indices)
        .map_err(|e| Error::InvalidGeometry(format!("Cannot build parry3d mesh: {}", e)))?;

    // Volume is the mass when density is 1.0
    let mass_props = trimesh.mass_properties(1.0);
    Ok((mass_props.mass() as f64).abs())
}

/// Axis-aligned bounding box of a mesh
pub fn bounds(mesh: &Mesh) -> Result<Aabb> {
    let Some(first) = mesh.vertices.first() else {
        return Err(Error::InvalidGeometry(
            "Cannot compute bounding box of empty mesh".to_string(),
        ));
    };

    let mut aabb = Aabb {
        min: [first.x, first.y, first.z],
        max: [first.x, first.y, first.z],
    };
    for v in &mesh.vertices[1..] {
        for (axis, value) in [v.x, v.y, v.z].into_iter().enumerate() {
            aabb.min[axis] = aabb.min[axis].min(value);
            aabb.max[axis] = aabb.max[axis].max(value);
        }
    }
    Ok(aabb)
}

/// Bake a placement into the mesh vertices
///
/// Mirroring placements flip the triangle winding so the mesh keeps facing
/// outward.
pub fn transform_mesh(mesh: &mut Mesh, placement: &Matrix4<f64>) {
    for v in &mut mesh.vertices {
        let p = placement.transform_point(&Point3::new(v.x, v.y, v.z));
        // Normalize negative zero so written coordinates stay stable
        v.x = p.x + 0.0;
        v.y = p.y + 0.0;
        v.z = p.z + 0.0;
    }

    if placement.fixed_view::<3, 3>(0, 0).determinant() < 0.0 {
        for t in &mut mesh.triangles {
            std::mem::swap(&mut t.v2, &mut t.v3);
        }
    }
}
