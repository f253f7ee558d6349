//! The upper and lower bracket definitions
//!
//! Both brackets are built from one [`DovetailProfile`]: the upper bracket
//! has it cut as a channel (grown by a small clearance), the lower bracket
//! is the tongue that slides into that channel. Keep them built from the
//! same profile value when changing either part.
//!
//! All dimensions are millimetres.

use crate::csg::{Part, Sketch, Solid};
use crate::error::Result;
use crate::profile::{Offset, Profile};
use serde::{Deserialize, Serialize};

/// Name of the upper bracket part
pub const UPPER_BRACKET: &str = "upper-bracket";

/// Name of the lower bracket part
pub const LOWER_BRACKET: &str = "lower-bracket";

/// Six-vertex dovetail cross-section
///
/// A straight neck rising from `v = 0` to `neck_height`, then flaring out to
/// `head_width` over `head_height`. Centred on `u = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DovetailProfile {
    /// Width of the straight neck
    pub neck_width: f64,
    /// Width at the top of the flare
    pub head_width: f64,
    /// Height of the straight neck
    pub neck_height: f64,
    /// Height of the flared head
    pub head_height: f64,
}

impl Default for DovetailProfile {
    fn default() -> Self {
        Self {
            neck_width: 22.0,
            head_width: 26.0,
            neck_height: 2.0,
            head_height: 4.0,
        }
    }
}

impl DovetailProfile {
    /// Total profile height
    pub fn height(&self) -> f64 {
        self.neck_height + self.head_height
    }

    /// The profile polygon, counter-clockwise
    pub fn profile(&self) -> Result<Profile> {
        let neck = self.neck_width / 2.0;
        let head = self.head_width / 2.0;
        let top = self.height();
        Profile::new([
            (-neck, 0.0),
            (neck, 0.0),
            (neck, self.neck_height),
            (head, top),
            (-head, top),
            (-neck, self.neck_height),
        ])
    }
}

/// A cylindrical bore
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bore {
    /// Bore diameter
    pub diameter: f64,
    /// Bore depth along Z
    pub depth: f64,
    /// Height of the bottom of the bore above the hole position
    pub z_offset: f64,
}

impl Bore {
    /// Create a new bore
    pub fn new(diameter: f64, depth: f64, z_offset: f64) -> Self {
        Self {
            diameter,
            depth,
            z_offset,
        }
    }

    /// The bore as a solid placed at `(x, y)`
    pub fn solid_at(&self, x: f64, y: f64) -> Result<Solid> {
        Solid::cylinder(self.depth, self.diameter)?.translate([x, y, self.z_offset])
    }
}

/// A mounting hole: a through-hole plus a wider, shallow counterbore
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolePair {
    /// Fastener shank hole
    pub through: Bore,
    /// Recess seating the fastener head
    pub counterbore: Bore,
}

impl HolePair {
    /// Both bores placed at `(x, y)`
    pub fn solids_at(&self, x: f64, y: f64) -> Result<[Solid; 2]> {
        Ok([self.through.solid_at(x, y)?, self.counterbore.solid_at(x, y)?])
    }
}

/// Parameters of the upper bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpperBracketParams {
    /// Block size along X, Y, Z
    pub block: [f64; 3],
    /// Outset applied to the dovetail channel for clearance
    pub channel_clearance: f64,
    /// Length of the channel sweep (runs along Y)
    pub channel_length: f64,
    /// X position of the channel centre line
    pub channel_x: f64,
    /// Notch size along X, Y, Z
    pub notch_size: [f64; 3],
    /// Notch corner position
    pub notch_position: [f64; 3],
    /// Mounting hole geometry
    pub hole: HolePair,
    /// Mounting hole positions on the XY plane
    pub hole_positions: Vec<[f64; 2]>,
}

impl Default for UpperBracketParams {
    fn default() -> Self {
        Self {
            block: [43.0, 35.0, 8.0],
            channel_clearance: 0.1,
            channel_length: 35.0,
            channel_x: 21.5,
            notch_size: [10.0, 15.0, 10.0],
            notch_position: [16.5, 20.0, -1.0],
            hole: HolePair {
                through: Bore::new(2.2, 10.0, -1.0),
                counterbore: Bore::new(4.5, 2.0, 6.0),
            },
            hole_positions: vec![[3.5, 32.0], [39.5, 32.0], [19.5, 3.0]],
        }
    }
}

impl UpperBracketParams {
    /// The channel cross-section in the block's XZ frame, before the
    /// clearance outset
    ///
    /// The dovetail is lowered by its neck height so the flare starts at
    /// the block's bottom face and the neck cuts clear of it.
    pub fn channel_profile(&self, dovetail: &DovetailProfile) -> Result<Profile> {
        Ok(dovetail.profile()?.translated(0.0, -dovetail.neck_height))
    }

    /// The channel cross-section with the clearance outset applied
    pub fn channel_sketch(&self, dovetail: &DovetailProfile) -> Result<Sketch> {
        Ok(Sketch::new(self.channel_profile(dovetail)?)
            .offset(Offset::Delta(self.channel_clearance)))
    }
}

/// Parameters of the lower bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerBracketParams {
    /// Radius of the corner rounding applied to the tongue profile
    pub rounding: f64,
    /// Inset applied after rounding
    pub inset: f64,
    /// Length of the tongue sweep (runs along Y, centred on the origin)
    pub length: f64,
    /// Mounting hole geometry
    pub hole: HolePair,
    /// Hole coordinates; holes sit at every combination of these on X and Y
    pub hole_grid: Vec<f64>,
    /// Slot size along X, Y, Z
    pub slot_size: [f64; 3],
    /// Slot corner position
    pub slot_position: [f64; 3],
}

impl Default for LowerBracketParams {
    fn default() -> Self {
        Self {
            rounding: 0.5,
            inset: 0.5,
            length: 25.0,
            hole: HolePair {
                through: Bore::new(2.7, 6.0, 0.0),
                counterbore: Bore::new(5.5, 2.5, 3.5),
            },
            hole_grid: vec![7.5, -7.5],
            slot_size: [1.0, 8.0, 6.0],
            slot_position: [11.25, 4.5, 0.0],
        }
    }
}

impl LowerBracketParams {
    /// The tongue cross-section: rounded, then inset
    pub fn tongue_sketch(&self, dovetail: &DovetailProfile) -> Result<Sketch> {
        Ok(Sketch::new(dovetail.profile()?)
            .offset(Offset::Radius(self.rounding))
            .offset(Offset::Delta(-self.inset)))
    }

    /// Hole positions on the XY plane, X-major
    pub fn hole_positions(&self) -> Vec<[f64; 2]> {
        self.hole_grid
            .iter()
            .flat_map(|&x| self.hole_grid.iter().map(move |&y| [x, y]))
            .collect()
    }
}

/// Build the upper bracket
///
/// A block with the dovetail channel running along Y through its bottom
/// face, a notch, and counterbored mounting holes.
pub fn upper_bracket(dovetail: &DovetailProfile, params: &UpperBracketParams) -> Result<Part> {
    let [_, length_y, _] = params.block;

    let channel = Solid::extrude(params.channel_sketch(dovetail)?, params.channel_length)?
        .rotate([90.0, 0.0, 0.0])?
        .translate([params.channel_x, length_y, 0.0])?;

    let notch = Solid::cube(params.notch_size)?.translate(params.notch_position)?;

    let mut cutters = vec![channel, notch];
    for [x, y] in &params.hole_positions {
        cutters.extend(params.hole.solids_at(*x, *y)?);
    }

    let solid = Solid::cube(params.block)?.difference(cutters);
    Ok(Part::new(UPPER_BRACKET, solid))
}

/// Build the lower bracket
///
/// The dovetail tongue swept along Y, with counterbored mounting holes on a
/// symmetric grid and one slot.
pub fn lower_bracket(dovetail: &DovetailProfile, params: &LowerBracketParams) -> Result<Part> {
    let tongue = Solid::extrude(params.tongue_sketch(dovetail)?, params.length)?
        .rotate([90.0, 0.0, 0.0])?
        .translate([0.0, params.length / 2.0, 0.0])?;

    let mut cutters = Vec::new();
    for [x, y] in params.hole_positions() {
        cutters.extend(params.hole.solids_at(x, y)?);
    }
    cutters.push(Solid::cube(params.slot_size)?.translate(params.slot_position)?);

    Ok(Part::new(LOWER_BRACKET, tongue.difference(cutters)))
}
