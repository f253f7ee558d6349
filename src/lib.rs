//! # dovetail-brackets
//!
//! Parametric definitions of a mating pair of mounting brackets: an upper
//! bracket with a dovetail channel and a lower bracket carrying the
//! matching tongue.
//!
//! Parts are declarative solid trees ([`csg::Solid`]): primitives,
//! transforms and boolean differences. This crate does not evaluate the
//! booleans itself. It hands the tree to an external engine, either as
//! OpenSCAD source or as a 3MF package using the Boolean Operations
//! extension.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Upper and lower bracket built from one shared [`DovetailProfile`]
//! - Profile offsets (sharp and rounded) via Clipper2
//! - OpenSCAD source output
//! - 3MF output with tessellated operands and `booleanshape` resources
//! - Geometric sanity checks (hole placement, dovetail fit, determinism)
//! - JSON design files
//!
//! ## Example
//!
//! ```no_run
//! use dovetail_brackets::{DesignConfig, ExportConfig, Model};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let design = DesignConfig::default();
//! let report = dovetail_brackets::checks::check_all(&design)?;
//! assert!(report.is_ok());
//!
//! let parts = design.parts()?;
//! let model = Model::from_parts(&parts, &ExportConfig::new())?;
//! model.write_to_file("brackets.3mf")?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod brackets;
pub mod checks;
pub mod config;
pub mod csg;
pub mod error;
pub mod export;
pub mod mesh_ops;
pub mod model;
pub mod opc;
pub mod profile;
pub mod scad;
pub mod tessellate;
pub mod validator;
mod writer;

pub use brackets::{
    Bore, DovetailProfile, HolePair, LowerBracketParams, UpperBracketParams, lower_bracket,
    upper_bracket,
};
pub use checks::{CheckReport, Finding, Severity};
pub use config::{DesignConfig, ExportConfig};
pub use csg::{Part, Primitive, Sketch, Solid, TransformOp};
pub use error::{Error, Result};
pub use model::{
    BooleanOpType, BooleanRef, BooleanShape, Build, BuildItem, Component, Extension, Mesh,
    MetadataEntry, Model, Object, Resources, Triangle, Vertex,
};
pub use profile::{Offset, Point2D, Profile};

impl Model {
    /// Serialize the model to 3MF model XML
    pub fn to_xml_string(&self) -> Result<String> {
        let mut xml_buffer = Vec::new();
        writer::write_model_xml(self, &mut xml_buffer)?;
        String::from_utf8(xml_buffer)
            .map_err(|e| Error::xml_write(format!("Failed to convert XML to UTF-8: {}", e)))
    }

    /// Write the model as a 3MF package
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dovetail_brackets::{DesignConfig, ExportConfig, Model};
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let parts = DesignConfig::default().parts()?;
    /// let model = Model::from_parts(&parts, &ExportConfig::new())?;
    /// let file = File::create("output.3mf")?;
    /// model.to_writer(file)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_writer<W: std::io::Write + std::io::Seek>(&self, writer: W) -> Result<W> {
        let model_xml = self.to_xml_string()?;
        opc::create_package(writer, &model_xml)
    }

    /// Write the model as a 3MF file
    pub fn write_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.to_writer(file)?;
        Ok(())
    }
}

/// Build both brackets with default parameters
///
/// # Example
///
/// ```
/// let parts = dovetail_brackets::default_parts().unwrap();
/// assert_eq!(parts[0].name, dovetail_brackets::brackets::UPPER_BRACKET);
/// assert_eq!(parts[1].name, dovetail_brackets::brackets::LOWER_BRACKET);
/// ```
pub fn default_parts() -> Result<Vec<Part>> {
    DesignConfig::default().parts()
}
