//! Error types for bracket construction and export
//!
//! All errors carry a code for categorization and a message with enough
//! context to locate the offending parameter or model element.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: XML writing errors
//! - **E3xxx**: Model and geometry errors
//! - **E4xxx**: Unsupported features
//! - **E5xxx**: Configuration errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error writing a file
//! - `E1002`: ZIP archive error
//! - `E2005`: XML writing error
//! - `E3001`: Invalid 3MF model structure
//! - `E3101`: Invalid geometry parameter
//! - `E3102`: Profile offset failure
//! - `E3103`: Cap triangulation failure
//! - `E4001`: Unsupported solid tree shape
//! - `E5001`: Configuration parse error

use std::io;
use thiserror::Error;

/// Result type for bracket operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, checking or exporting brackets
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while writing output
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - Output directory does not exist
    /// - Insufficient permissions
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML writing error
    ///
    /// **Error Code**: E2005
    ///
    /// **Common Causes**:
    /// - Failed to serialize XML
    /// - I/O error during writing
    #[error("[E2005] XML writing error: {0}")]
    XmlWrite(String),

    /// Invalid 3MF model structure
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Duplicate or zero object IDs
    /// - References to objects defined later or not at all
    /// - Boolean operands that are not plain meshes
    /// - Out-of-bounds vertex indices
    #[error("[E3001] Invalid model: {0}")]
    InvalidModel(String),

    /// Invalid geometry parameter
    ///
    /// **Error Code**: E3101
    ///
    /// **Common Causes**:
    /// - Zero or negative primitive sizes
    /// - Profiles with fewer than 3 vertices
    /// - Non-finite coordinates
    /// - Facet counts below 3
    #[error("[E3101] Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A profile offset collapsed or split the profile
    ///
    /// **Error Code**: E3102
    ///
    /// **Suggestions**:
    /// - Reduce the magnitude of negative offsets
    /// - Check that the profile is not self-intersecting
    #[error("[E3102] Offset error: {0}")]
    Offset(String),

    /// Cap triangulation failed
    ///
    /// **Error Code**: E3103
    #[error("[E3103] Triangulation error: {0}")]
    Triangulation(String),

    /// Unsupported feature
    ///
    /// **Error Code**: E4001
    ///
    /// **Common Causes**:
    /// - A difference nested inside a cutter (3MF operands must be meshes)
    #[error("[E4001] Unsupported feature: {0}")]
    Unsupported(String),

    /// Configuration could not be parsed
    ///
    /// **Error Code**: E5001
    #[error("[E5001] Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(format!("Failed to parse design configuration: {}", err))
    }
}

impl Error {
    /// Create an InvalidGeometry error naming the offending parameter
    ///
    /// # Example
    /// ```
    /// use dovetail_brackets::Error;
    ///
    /// let err = Error::invalid_parameter("cube size", "must be positive, got -1");
    /// assert!(err.to_string().contains("cube size"));
    /// ```
    pub fn invalid_parameter(parameter: &str, message: &str) -> Self {
        Error::InvalidGeometry(format!("Parameter '{}': {}", parameter, message))
    }

    /// Create an XmlWrite error
    pub fn xml_write(message: String) -> Self {
        Error::XmlWrite(message)
    }
}
