//! OPC (Open Packaging Conventions) handling for 3MF files
//!
//! 3MF files are ZIP archives following the OPC standard, containing
//! the main 3D model file and the relationships pointing at it.

mod writer;

pub use writer::create_package;

/// Main 3D model file path within the 3MF archive
pub const MODEL_PATH: &str = "3D/3dmodel.model";

/// Content types file path
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Relationships file path
pub const RELS_PATH: &str = "_rels/.rels";

/// Relationship type of the root 3D model part
pub const MODEL_REL_TYPE: &str = "http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    #[test]
    fn test_package_contains_required_parts() {
        let cursor = create_package(Cursor::new(Vec::new()), "<model/>").unwrap();
        let mut archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();

        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(names, vec![MODEL_PATH, CONTENT_TYPES_PATH, RELS_PATH]);

        let mut model = String::new();
        archive
            .by_name(MODEL_PATH)
            .unwrap()
            .read_to_string(&mut model)
            .unwrap();
        assert_eq!(model, "<model/>");

        let mut rels = String::new();
        archive
            .by_name(RELS_PATH)
            .unwrap()
            .read_to_string(&mut rels)
            .unwrap();
        assert!(rels.contains("Target=\"/3D/3dmodel.model\""));
        assert!(rels.contains(MODEL_REL_TYPE));
    }
}
