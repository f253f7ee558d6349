//! Export and design configuration

use crate::brackets::{
    DovetailProfile, LOWER_BRACKET, LowerBracketParams, UPPER_BRACKET, UpperBracketParams,
    lower_bracket, upper_bracket,
};
use crate::csg::Part;
use crate::error::{Error, Result};
use crate::model::MetadataEntry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of segments used to approximate circles
pub const DEFAULT_FACETS: u32 = 64;

/// Default gap between parts laid out on the build plate
pub const DEFAULT_SPACING: f64 = 10.0;

/// Fewest segments a circle can be approximated with
pub const MIN_FACETS: u32 = 3;

/// Reject facet counts below [`MIN_FACETS`]
pub(crate) fn check_facets(facets: u32) -> Result<()> {
    if facets < MIN_FACETS {
        return Err(Error::invalid_parameter(
            "facets",
            &format!("must be at least {}, got {}", MIN_FACETS, facets),
        ));
    }
    Ok(())
}

/// Configuration for exporting parts
///
/// Built with chained `with_*` calls:
///
/// ```
/// use dovetail_brackets::ExportConfig;
///
/// let config = ExportConfig::new()
///     .with_facets(32)
///     .with_spacing(5.0)
///     .with_metadata("Designer", "Workshop");
/// assert_eq!(config.facets(), 32);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    facets: u32,
    unit: String,
    spacing: f64,
    validate: bool,
    metadata: Vec<MetadataEntry>,
}

impl ExportConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            facets: DEFAULT_FACETS,
            unit: "millimeter".to_string(),
            spacing: DEFAULT_SPACING,
            validate: true,
            metadata: Vec::new(),
        }
    }

    /// Set the circle facet count
    pub fn with_facets(mut self, facets: u32) -> Self {
        self.facets = facets;
        self
    }

    /// Set the model unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set the gap between parts on the build plate
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Enable or disable model validation before writing
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Add a metadata entry
    ///
    /// An entry with the same name as one of the standard entries
    /// (`Title`, `Designer`, `Application`) replaces it.
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push(MetadataEntry::new(name, value));
        self
    }

    /// Circle facet count
    pub fn facets(&self) -> u32 {
        self.facets
    }

    /// Model unit
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Gap between parts on the build plate
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Whether the model is validated before writing
    pub fn validate(&self) -> bool {
        self.validate
    }

    /// User metadata entries
    pub fn metadata(&self) -> &[MetadataEntry] {
        &self.metadata
    }

    /// Reject settings that cannot produce a model
    pub fn check(&self) -> Result<()> {
        check_facets(self.facets)?;
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(Error::invalid_parameter(
                "spacing",
                &format!("must be a non-negative number, got {}", self.spacing),
            ));
        }
        if !VALID_UNITS.contains(&self.unit.as_str()) {
            return Err(Error::invalid_parameter(
                "unit",
                &format!("unknown 3MF unit '{}'", self.unit),
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new()
    }
}

const VALID_UNITS: &[&str] = &[
    "micron",
    "millimeter",
    "centimeter",
    "inch",
    "foot",
    "meter",
];

/// Every parameter of both brackets
///
/// Missing fields take their default values, so a JSON file only needs to
/// name what it changes:
///
/// ```
/// use dovetail_brackets::DesignConfig;
///
/// let design = DesignConfig::from_json_str(r#"{"upper": {"channel_clearance": 0.15}}"#).unwrap();
/// assert_eq!(design.upper.channel_clearance, 0.15);
/// assert_eq!(design.facets, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Circle facet count (`$fn`)
    pub facets: u32,
    /// Dovetail cross-section shared by both brackets
    pub dovetail: DovetailProfile,
    /// Upper bracket parameters
    pub upper: UpperBracketParams,
    /// Lower bracket parameters
    pub lower: LowerBracketParams,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            facets: DEFAULT_FACETS,
            dovetail: DovetailProfile::default(),
            upper: UpperBracketParams::default(),
            lower: LowerBracketParams::default(),
        }
    }
}

impl DesignConfig {
    /// Parse a design from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a design from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build both brackets, upper first
    pub fn parts(&self) -> Result<Vec<Part>> {
        Ok(vec![
            upper_bracket(&self.dovetail, &self.upper)?,
            lower_bracket(&self.dovetail, &self.lower)?,
        ])
    }

    /// Build one bracket by name
    ///
    /// Accepts the part names as well as the short forms `upper` and
    /// `lower`.
    pub fn part(&self, name: &str) -> Result<Part> {
        match name {
            "upper" | UPPER_BRACKET => upper_bracket(&self.dovetail, &self.upper),
            "lower" | LOWER_BRACKET => lower_bracket(&self.dovetail, &self.lower),
            other => Err(Error::Config(format!("Unknown part '{}'", other))),
        }
    }

    /// Export settings matching this design
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::new().with_facets(self.facets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.facets(), 64);
        assert_eq!(config.unit(), "millimeter");
        assert_eq!(config.spacing(), 10.0);
        assert!(config.validate());
        assert!(config.metadata().is_empty());
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_export_config_rejects_few_facets() {
        let err = ExportConfig::new().with_facets(2).check().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
        assert!(err.to_string().contains("facets"));
    }

    #[test]
    fn test_export_config_rejects_unknown_unit() {
        assert!(ExportConfig::new().with_unit("furlong").check().is_err());
        assert!(ExportConfig::new().with_unit("inch").check().is_ok());
    }

    #[test]
    fn test_design_defaults_from_empty_json() {
        let design = DesignConfig::from_json_str("{}").unwrap();
        assert_eq!(design, DesignConfig::default());
    }

    #[test]
    fn test_design_invalid_json_is_config_error() {
        let err = DesignConfig::from_json_str(r#"{"facets": "many"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_design_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.json");
        std::fs::write(&path, r#"{"facets": 24, "dovetail": {"head_width": 27.0}}"#).unwrap();

        let design = DesignConfig::from_path(&path).unwrap();
        assert_eq!(design.facets, 24);
        assert_eq!(design.dovetail.head_width, 27.0);
        assert_eq!(design.dovetail.neck_width, 22.0);
    }

    #[test]
    fn test_design_missing_file_is_io_error() {
        let err = DesignConfig::from_path("/nonexistent/design.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_part_lookup() {
        let design = DesignConfig::default();
        assert_eq!(design.part("upper").unwrap().name, UPPER_BRACKET);
        assert_eq!(design.part(LOWER_BRACKET).unwrap().name, LOWER_BRACKET);
        assert!(design.part("middle").is_err());
        assert_eq!(design.parts().unwrap().len(), 2);
    }
}
