//! Package writing for 3MF files

use super::{CONTENT_TYPES_PATH, MODEL_PATH, MODEL_REL_TYPE, RELS_PATH};
use crate::error::Result;
use std::io::{Seek, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Create a 3MF package (ZIP archive) from model data
///
/// This function creates a complete 3MF file including:
/// - `[Content_Types].xml`
/// - `_rels/.rels`
/// - `3D/3dmodel.model`
///
/// Returns the writer after finishing the ZIP archive.
pub fn create_package<W: Write + Seek>(writer: W, model_xml: &str) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    zip.start_file(CONTENT_TYPES_PATH, options)?;
    zip.write_all(content_types_xml().as_bytes())?;

    zip.start_file(RELS_PATH, options)?;
    zip.write_all(relationships_xml().as_bytes())?;

    zip.start_file(MODEL_PATH, options)?;
    zip.write_all(model_xml.as_bytes())?;

    Ok(zip.finish()?)
}

fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="model" ContentType="application/vnd.ms-package.3dmanufacturing-3dmodel+xml"/>
</Types>"#
}

fn relationships_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/{}" Id="rel0" Type="{}"/>
</Relationships>"#,
        MODEL_PATH, MODEL_REL_TYPE
    )
}
