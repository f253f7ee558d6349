//! 2D profiles and profile offsetting
//!
//! A [`Profile`] is a closed polygon given as an ordered list of vertices. It
//! is the cross-section that extrusions sweep, and the shape the dovetail
//! fit checks reason about.
//!
//! Offsets and containment queries use the Clipper2 library, which provides
//! robust polygon inflation and boolean operations on integer-scaled
//! coordinates. All Clipper2 calls use centi precision (0.01 units).

use crate::error::{Error, Result};
use clipper2::*;
use serde::{Deserialize, Serialize};

/// Miter limit used for sharp-cornered offsets
///
/// Corners whose miter would extend beyond this multiple of the offset
/// distance are squared off.
pub const MITER_LIMIT: f64 = 2.0;

/// Area below which a polygon difference is treated as empty
const EMPTY_AREA: f64 = 1e-3;

/// Vertices closer than this to the line through their neighbours are
/// dropped from offset results
///
/// Slightly above the 0.01 grid, so the stair steps Clipper2 leaves behind
/// when rounding to centi precision are removed.
pub const SIMPLIFY_EPSILON: f64 = 0.015;

/// Scale applied by clipper2 to centi-precision inputs
const CENTI_SCALE: f64 = 100.0;

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A profile offset
///
/// Positive amounts grow the profile outward, negative amounts shrink it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Offset {
    /// Offset with sharp (mitred) corners
    Delta(f64),
    /// Offset with rounded corners of the given radius
    Radius(f64),
}

impl Offset {
    /// The signed offset distance
    pub fn amount(&self) -> f64 {
        match self {
            Offset::Delta(d) => *d,
            Offset::Radius(r) => *r,
        }
    }

    fn join_type(&self) -> JoinType {
        match self {
            Offset::Delta(_) => JoinType::Miter,
            Offset::Radius(_) => JoinType::Round,
        }
    }
}

/// A closed 2D polygon
///
/// The closing edge from the last vertex back to the first is implicit.
/// Serialized as its vertex list; deserializing goes through
/// [`Profile::new`], so the same vertex rules apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct Profile {
    points: Vec<Point2D>,
}

impl TryFrom<Vec<Point2D>> for Profile {
    type Error = Error;

    fn try_from(points: Vec<Point2D>) -> Result<Self> {
        Profile::new(points)
    }
}

impl From<Profile> for Vec<Point2D> {
    fn from(profile: Profile) -> Self {
        profile.points
    }
}

impl Profile {
    /// Create a profile from its vertices
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if fewer than 3 vertices are given
    /// or any coordinate is not finite.
    pub fn new<P: Into<Point2D>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        let points: Vec<Point2D> = points.into_iter().map(Into::into).collect();
        if points.len() < 3 {
            return Err(Error::invalid_parameter(
                "profile",
                &format!("needs at least 3 vertices, got {}", points.len()),
            ));
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::invalid_parameter(
                "profile",
                &format!("vertex ({}, {}) is not finite", p.x, p.y),
            ));
        }
        Ok(Self { points })
    }

    /// Axis-aligned rectangle with its lower-left corner at `(x, y)`
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::invalid_parameter(
                "rectangle",
                &format!("size must be positive, got {} x {}", width, height),
            ));
        }
        Self::new([
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
        ])
    }

    /// Regular polygon approximating a circle, first vertex on +X
    pub fn circle(radius: f64, facets: u32) -> Result<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(Error::invalid_parameter(
                "circle radius",
                &format!("must be positive, got {}", radius),
            ));
        }
        crate::config::check_facets(facets)?;
        Self::new((0..facets).map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / facets as f64;
            (radius * angle.cos(), radius * angle.sin())
        }))
    }

    /// The profile vertices in order
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a profile has at least 3 vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area (positive for counter-clockwise vertex order)
    pub fn signed_area(&self) -> f64 {
        signed_area(self.points.iter().map(|p| (p.x, p.y)))
    }

    /// Absolute area
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Whether the vertices run counter-clockwise
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// The same profile with counter-clockwise vertex order
    pub fn to_ccw(&self) -> Self {
        let mut points = self.points.clone();
        if self.signed_area() < 0.0 {
            points.reverse();
        }
        Self { points }
    }

    /// Translate every vertex by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point2D::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> (Point2D, Point2D) {
        let mut min = Point2D::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Whether the polygon is simple
    ///
    /// A simple polygon has non-zero area, no zero-length edges, and no two
    /// edges that touch other than adjacent edges at their shared vertex.
    pub fn is_simple(&self) -> bool {
        let n = self.points.len();
        if self.area() <= f64::EPSILON {
            return false;
        }
        let edge = |i: usize| (self.points[i], self.points[(i + 1) % n]);

        for i in 0..n {
            let (a, b) = edge(i);
            if a == b {
                return false;
            }
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                let (c, d) = edge(j);
                if adjacent {
                    // Adjacent edges may only share their common vertex
                    if collinear_overlap(a, b, c, d) {
                        return false;
                    }
                    continue;
                }
                if segments_intersect(a, b, c, d) {
                    return false;
                }
            }
        }
        true
    }

    /// Apply one offset
    ///
    /// # Errors
    ///
    /// Returns [`Error::Offset`] if the offset collapses the profile to
    /// nothing or splits it into several pieces.
    pub fn offset(&self, offset: Offset) -> Result<Self> {
        let amount = offset.amount();
        if !amount.is_finite() {
            return Err(Error::invalid_parameter(
                "offset",
                &format!("amount must be finite, got {}", amount),
            ));
        }
        if amount == 0.0 {
            return Ok(self.clone());
        }

        // clipper2 scales the miter limit like a coordinate
        let inflated = inflate::<Centi>(
            vec![self.to_path()],
            amount,
            offset.join_type(),
            EndType::Polygon,
            MITER_LIMIT / CENTI_SCALE,
        );
        let simplified = simplify::<Centi>(inflated, SIMPLIFY_EPSILON, false);
        let mut paths: Vec<Vec<(f64, f64)>> = simplified.into();
        paths.retain(|path| path.len() >= 3 && signed_area(path.iter().copied()).abs() > EMPTY_AREA);

        match paths.len() {
            0 => Err(Error::Offset(format!(
                "{:?} collapses a profile of area {:.3}",
                offset,
                self.area()
            ))),
            1 => Profile::new(paths.remove(0)).map(|p| p.to_ccw()),
            n => Err(Error::Offset(format!(
                "{:?} splits the profile into {} pieces",
                offset, n
            ))),
        }
    }

    /// Apply a sequence of offsets, first to last
    pub fn offset_all(&self, offsets: &[Offset]) -> Result<Self> {
        offsets
            .iter()
            .try_fold(self.clone(), |profile, offset| profile.offset(*offset))
    }

    /// Whether `other` lies inside this profile
    ///
    /// `tolerance` is removed from `other` before testing, so shared or
    /// nearly shared edges count as contained. When `other` is thinner than
    /// the tolerance everywhere, this profile is grown by the tolerance
    /// instead and `other` is tested as is.
    pub fn contains_profile(&self, other: &Profile, tolerance: f64) -> Result<bool> {
        if tolerance <= 0.0 {
            return self.covers(other);
        }
        match other.offset(Offset::Delta(-tolerance)) {
            Ok(shrunk) => self.covers(&shrunk),
            Err(Error::Offset(_)) => self.offset(Offset::Delta(tolerance))?.covers(other),
            Err(e) => Err(e),
        }
    }

    /// Whether `other` fits inside this profile with at least `clearance`
    /// to spare on every side
    ///
    /// `other` is grown with rounded corners, so the test measures true
    /// distance from every point of `other` to this profile's boundary.
    pub fn fits_with_clearance(&self, other: &Profile, clearance: f64) -> Result<bool> {
        let grown = if clearance > 0.0 {
            other.offset(Offset::Radius(clearance))?
        } else {
            other.clone()
        };
        self.covers(&grown)
    }

    fn covers(&self, other: &Profile) -> Result<bool> {
        let outside = difference::<Centi>(
            vec![other.to_path()],
            vec![self.to_path()],
            FillRule::default(),
        )
        .map_err(|e| Error::Offset(format!("Containment test failed: {:?}", e)))?;

        let paths: Vec<Vec<(f64, f64)>> = outside.into();
        let area: f64 = paths
            .iter()
            .map(|path| signed_area(path.iter().copied()).abs())
            .sum();
        Ok(area <= EMPTY_AREA)
    }

    fn to_path(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.y)).collect()
    }
}

/// Shoelace signed area of a closed ring
fn signed_area(points: impl Iterator<Item = (f64, f64)> + Clone) -> f64 {
    let first = points.clone().next();
    let mut area = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for p in points {
        if let Some(q) = prev {
            area += q.0 * p.1 - p.0 * q.1;
        }
        prev = Some(p);
    }
    if let (Some(last), Some(first)) = (prev, first) {
        area += last.0 * first.1 - first.0 * last.1;
    }
    area / 2.0
}

fn orient(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point2D, b: Point2D, p: Point2D) -> bool {
    p.x >= a.x.min(b.x) - f64::EPSILON
        && p.x <= a.x.max(b.x) + f64::EPSILON
        && p.y >= a.y.min(b.y) - f64::EPSILON
        && p.y <= a.y.max(b.y) + f64::EPSILON
}

fn segments_intersect(a: Point2D, b: Point2D, c: Point2D, d: Point2D) -> bool {
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(c, d, a))
        || (d2 == 0.0 && on_segment(c, d, b))
        || (d3 == 0.0 && on_segment(a, b, c))
        || (d4 == 0.0 && on_segment(a, b, d))
}

/// Adjacent edges `a→b` and `c→d` fold back over each other
fn collinear_overlap(a: Point2D, b: Point2D, c: Point2D, d: Point2D) -> bool {
    if orient(a, b, c) != 0.0 || orient(a, b, d) != 0.0 {
        return false;
    }
    // Shared vertex is excluded; any other common point means overlap
    let shared = if b == c { b } else { a };
    let other_first = if shared == a { b } else { a };
    let other_second = if shared == c { d } else { c };
    let u = (other_first.x - shared.x, other_first.y - shared.y);
    let v = (other_second.x - shared.x, other_second.y - shared.y);
    u.0 * v.0 + u.1 * v.1 > 0.0
}
