//! Geometric sanity checks
//!
//! None of these properties are enforced while building a part; a bracket
//! with a hole hanging off its edge is still a valid solid tree. The checks
//! here catch such designs before they are exported and printed.

use crate::brackets::{Bore, DovetailProfile, LowerBracketParams, UpperBracketParams};
use crate::config::DesignConfig;
use crate::error::{Error, Result};
use crate::mesh_ops::{signed_volume, transform_mesh};
use crate::model::Mesh;
use crate::profile::Profile;
use crate::tessellate::tessellate;
use tracing::{debug, warn};

/// Tolerance for coincident faces in containment tests
pub const CONTAINMENT_TOLERANCE: f64 = 0.05;

/// Default minimum gap between the tongue and the channel walls
pub const DEFAULT_FIT_CLEARANCE: f64 = 0.05;

/// Largest relative disagreement allowed between the two volume measures
/// of a material mesh
pub const VOLUME_TOLERANCE: f64 = 1e-3;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The part will not come out as designed
    Error,
    /// The part is printable but probably not what was intended
    Warning,
}

/// A failed check
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Name of the check that failed
    pub check: &'static str,
    /// Severity
    pub severity: Severity,
    /// What is wrong
    pub message: String,
}

/// Outcome of a set of checks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    /// Names of the checks that ran
    pub checks: Vec<&'static str>,
    /// Failures, in the order found
    pub findings: Vec<Finding>,
}

impl CheckReport {
    /// Whether no check produced an error
    pub fn is_ok(&self) -> bool {
        !self
            .findings
            .iter()
            .any(|f| f.severity == Severity::Error)
    }

    /// Findings of one severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    /// Append another report
    pub fn merge(&mut self, other: CheckReport) {
        self.checks.extend(other.checks);
        self.findings.extend(other.findings);
    }

    fn ran(&mut self, check: &'static str) {
        if !self.checks.contains(&check) {
            self.checks.push(check);
        }
    }

    fn fail(&mut self, check: &'static str, severity: Severity, message: String) {
        warn!(check, ?severity, "{}", message);
        self.findings.push(Finding {
            check,
            severity,
            message,
        });
    }
}

/// Check the upper bracket's holes and channel against its block
pub fn check_upper_bracket(
    dovetail: &DovetailProfile,
    params: &UpperBracketParams,
) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    let [bx, by, bz] = params.block;

    report.ran("upper-holes-within-block");
    for [x, y] in &params.hole_positions {
        for (label, bore) in [("through-hole", &params.hole.through), ("counterbore", &params.hole.counterbore)] {
            let r = bore.diameter / 2.0;
            if x - r < 0.0 || x + r > bx || y - r < 0.0 || y + r > by {
                report.fail(
                    "upper-holes-within-block",
                    Severity::Error,
                    format!(
                        "{} Ø{} at ({}, {}) leaves the {} x {} block outline",
                        label, bore.diameter, x, y, bx, by
                    ),
                );
            }
        }
    }

    report.ran("upper-through-holes-span-block");
    let through = &params.hole.through;
    if through.z_offset > 0.0 || through.z_offset + through.depth < bz {
        report.fail(
            "upper-through-holes-span-block",
            Severity::Error,
            format!(
                "through-hole spans z {}..{} but the block spans 0..{}",
                through.z_offset,
                through.z_offset + through.depth,
                bz
            ),
        );
    }

    report.ran("upper-counterbore-depth");
    check_counterbore(&mut report, "upper-counterbore-depth", &params.hole.counterbore, bz);

    report.ran("upper-channel-simple");
    let channel = params.channel_sketch(dovetail)?.evaluate()?;
    if !channel.is_simple() {
        report.fail(
            "upper-channel-simple",
            Severity::Error,
            format!(
                "channel profile is self-intersecting after a {} outset",
                params.channel_clearance
            ),
        );
    }

    report.ran("upper-channel-within-block");
    let (min, max) = channel.bounds();
    if params.channel_x + min.x < 0.0 || params.channel_x + max.x > bx {
        report.fail(
            "upper-channel-within-block",
            Severity::Error,
            format!(
                "channel spans x {}..{} outside the block width {}",
                params.channel_x + min.x,
                params.channel_x + max.x,
                bx
            ),
        );
    }
    if max.y >= bz {
        report.fail(
            "upper-channel-within-block",
            Severity::Error,
            format!("channel depth {} cuts through the block height {}", max.y, bz),
        );
    }
    if params.channel_length < by {
        report.fail(
            "upper-channel-within-block",
            Severity::Warning,
            format!(
                "channel length {} is shorter than the block depth {}",
                params.channel_length, by
            ),
        );
    }

    Ok(report)
}

/// Check the lower bracket's holes against its tongue
pub fn check_lower_bracket(
    dovetail: &DovetailProfile,
    params: &LowerBracketParams,
) -> Result<CheckReport> {
    let mut report = CheckReport::default();

    report.ran("lower-tongue-simple");
    let tongue = match params.tongue_sketch(dovetail)?.evaluate() {
        Ok(tongue) => tongue,
        Err(Error::Offset(message)) => {
            report.fail("lower-tongue-simple", Severity::Error, message);
            return Ok(report);
        }
        Err(e) => return Err(e),
    };
    if !tongue.is_simple() {
        report.fail(
            "lower-tongue-simple",
            Severity::Error,
            "tongue profile is self-intersecting after rounding and inset".to_string(),
        );
    }

    report.ran("lower-holes-within-tongue");
    let half_length = params.length / 2.0;
    for [x, y] in params.hole_positions() {
        for (label, bore) in [("through-hole", &params.hole.through), ("counterbore", &params.hole.counterbore)] {
            let r = bore.diameter / 2.0;
            if y.abs() + r > half_length {
                report.fail(
                    "lower-holes-within-tongue",
                    Severity::Error,
                    format!(
                        "{} Ø{} at ({}, {}) leaves the tongue length {}",
                        label, bore.diameter, x, y, params.length
                    ),
                );
                continue;
            }
            let section = bore_section(bore, x)?;
            if !tongue.contains_profile(&section, CONTAINMENT_TOLERANCE)? {
                report.fail(
                    "lower-holes-within-tongue",
                    Severity::Error,
                    format!(
                        "{} Ø{} at ({}, {}) breaks out of the tongue profile",
                        label, bore.diameter, x, y
                    ),
                );
            }
        }
    }

    report.ran("lower-counterbore-depth");
    check_counterbore(
        &mut report,
        "lower-counterbore-depth",
        &params.hole.counterbore,
        dovetail.height(),
    );

    report.ran("lower-holes-symmetric");
    let positions = params.hole_positions();
    for [x, y] in &positions {
        let mirrored = positions
            .iter()
            .any(|[mx, my]| (mx + x).abs() < 1e-9 && (my + y).abs() < 1e-9);
        if !mirrored {
            report.fail(
                "lower-holes-symmetric",
                Severity::Error,
                format!(
                    "hole at ({}, {}) has no partner under a half turn about the tongue centre",
                    x, y
                ),
            );
        }
    }

    Ok(report)
}

/// Check that the lower tongue slides into the upper channel
///
/// The tongue is moved into the channel's frame (flare bottoms aligned)
/// and must fit with at least `clearance` to spare on every side.
pub fn check_dovetail_fit(
    dovetail: &DovetailProfile,
    upper: &UpperBracketParams,
    lower: &LowerBracketParams,
    clearance: f64,
) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    report.ran("dovetail-fit");

    let channel = upper.channel_sketch(dovetail)?.evaluate()?;
    let tongue = match lower.tongue_sketch(dovetail)?.evaluate() {
        Ok(tongue) => tongue.translated(0.0, -dovetail.neck_height),
        Err(Error::Offset(message)) => {
            report.fail("dovetail-fit", Severity::Error, message);
            return Ok(report);
        }
        Err(e) => return Err(e),
    };

    if !channel.contains_profile(&tongue, 0.0)? {
        report.fail(
            "dovetail-fit",
            Severity::Error,
            "tongue does not fit inside the channel".to_string(),
        );
    } else if !channel.fits_with_clearance(&tongue, clearance)? {
        report.fail(
            "dovetail-fit",
            Severity::Warning,
            format!("tongue fits the channel with less than {} clearance", clearance),
        );
    }

    Ok(report)
}

/// Check that building the design twice yields identical output
pub fn check_determinism(design: &DesignConfig) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    report.ran("deterministic-build");

    let first = design.parts()?;
    let second = design.parts()?;
    if first != second {
        report.fail(
            "deterministic-build",
            Severity::Error,
            "rebuilding the design produced different solids".to_string(),
        );
    }

    for (a, b) in first.iter().zip(&second) {
        if crate::scad::to_scad(a, design.facets)? != crate::scad::to_scad(b, design.facets)? {
            report.fail(
                "deterministic-build",
                Severity::Error,
                format!("OpenSCAD output of {} differs between builds", a.name),
            );
        }
    }

    let config = design.export_config();
    let xml_a = crate::export::model_xml(&first, &config)?;
    let xml_b = crate::export::model_xml(&second, &config)?;
    if xml_a != xml_b {
        report.fail(
            "deterministic-build",
            Severity::Error,
            "3MF model XML differs between builds".to_string(),
        );
    }

    Ok(report)
}

/// Check that every material primitive tessellates to a closed, outward
/// mesh at the design's facet count
///
/// The signed volume about the origin only equals the enclosed volume for
/// a closed mesh; with the `mesh-ops` feature it is compared against the
/// volume parry3d measures about the mesh's own centre.
pub fn check_material_meshes(design: &DesignConfig) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    report.ran("material-meshes-closed");

    for part in design.parts()? {
        let mut total = 0.0;
        for (placement, primitive) in part.solid.material_leaves() {
            let mut mesh = tessellate(primitive, design.facets)?;
            transform_mesh(&mut mesh, &placement);
            let label = format!("{} {}", part.name, primitive.kind());
            total += check_mesh_volume(&mut report, &label, &mesh)?;
        }
        debug!(part = %part.name, volume = total, "Material volume before cuts");
    }

    Ok(report)
}

/// Run every check on a design
pub fn check_all(design: &DesignConfig) -> Result<CheckReport> {
    let mut report = check_upper_bracket(&design.dovetail, &design.upper)?;
    report.merge(check_lower_bracket(&design.dovetail, &design.lower)?);
    report.merge(check_dovetail_fit(
        &design.dovetail,
        &design.upper,
        &design.lower,
        DEFAULT_FIT_CLEARANCE,
    )?);
    report.merge(check_material_meshes(design)?);
    report.merge(check_determinism(design)?);
    Ok(report)
}

/// Record a finding unless `mesh` encloses a positive volume, and return
/// its signed volume
fn check_mesh_volume(report: &mut CheckReport, label: &str, mesh: &Mesh) -> Result<f64> {
    let signed = signed_volume(mesh);
    if signed <= 0.0 {
        report.fail(
            "material-meshes-closed",
            Severity::Error,
            format!("{} mesh has non-positive volume {}", label, signed),
        );
        return Ok(signed);
    }

    #[cfg(feature = "mesh-ops")]
    {
        let enclosed = crate::mesh_ops::volume(mesh)?;
        if (enclosed - signed).abs() > VOLUME_TOLERANCE * enclosed {
            report.fail(
                "material-meshes-closed",
                Severity::Error,
                format!(
                    "{} mesh is not closed: volume {} about the origin, {} about its centre",
                    label, signed, enclosed
                ),
            );
        }
    }

    Ok(signed)
}

fn check_counterbore(report: &mut CheckReport, check: &'static str, bore: &Bore, height: f64) {
    if bore.depth >= height {
        report.fail(
            check,
            Severity::Error,
            format!(
                "counterbore depth {} is not shallower than the part height {}",
                bore.depth, height
            ),
        );
    } else if bore.z_offset + bore.depth < height {
        report.fail(
            check,
            Severity::Warning,
            format!(
                "counterbore ends at z {} below the top face at {}",
                bore.z_offset + bore.depth,
                height
            ),
        );
    }
}

/// Cross-section of a vertical bore through a plane containing its axis
fn bore_section(bore: &Bore, x: f64) -> Result<Profile> {
    let r = bore.diameter / 2.0;
    Profile::rectangle(x - r, bore.z_offset, bore.diameter, bore.depth)
}
