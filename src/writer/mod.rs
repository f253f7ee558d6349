//! XML writing for 3MF model files
//!
//! Serializes a [`Model`] into the `3D/3dmodel.model` part of a package.

mod boolean_ops;
mod core;

use crate::error::{Error, Result};
use crate::model::*;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write as IoWrite;

/// Write a Model to XML format
///
/// Objects are written in resource order, which the validator requires to
/// list every object before its first reference.
pub fn write_model_xml<W: IoWrite>(model: &Model, writer: W) -> Result<()> {
    let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

    xml_writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::xml_write(format!("Failed to write XML declaration: {}", e)))?;

    let mut model_elem = BytesStart::new("model");
    model_elem.push_attribute(("unit", model.unit.as_str()));
    model_elem.push_attribute(("xml:lang", "en-US"));
    model_elem.push_attribute(("xmlns", Extension::Core.namespace()));

    let extensions: Vec<&Extension> = model
        .required_extensions
        .iter()
        .filter(|e| **e != Extension::Core)
        .collect();

    let ns_attrs: Vec<(String, &str)> = extensions
        .iter()
        .map(|ext| (format!("xmlns:{}", ext.prefix()), ext.namespace()))
        .collect();
    for (name, value) in &ns_attrs {
        model_elem.push_attribute((name.as_str(), *value));
    }

    if !extensions.is_empty() {
        let prefixes: Vec<&str> = extensions.iter().map(|e| e.prefix()).collect();
        model_elem.push_attribute(("requiredextensions", prefixes.join(" ").as_str()));
    }

    xml_writer
        .write_event(Event::Start(model_elem))
        .map_err(|e| Error::xml_write(format!("Failed to write model element: {}", e)))?;

    for entry in &model.metadata {
        write_metadata(&mut xml_writer, entry)?;
    }

    write_resources(&mut xml_writer, &model.resources)?;
    core::write_build(&mut xml_writer, &model.build)?;

    xml_writer
        .write_event(Event::End(BytesEnd::new("model")))
        .map_err(|e| Error::xml_write(format!("Failed to close model element: {}", e)))?;

    Ok(())
}

/// Write a metadata entry
fn write_metadata<W: IoWrite>(writer: &mut Writer<W>, entry: &MetadataEntry) -> Result<()> {
    let mut elem = BytesStart::new("metadata");
    elem.push_attribute(("name", entry.name.as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write metadata element: {}", e)))?;

    writer
        .write_event(Event::Text(BytesText::new(&entry.value)))
        .map_err(|e| Error::xml_write(format!("Failed to write metadata value: {}", e)))?;

    writer
        .write_event(Event::End(BytesEnd::new("metadata")))
        .map_err(|e| Error::xml_write(format!("Failed to close metadata element: {}", e)))?;

    Ok(())
}

/// Write resources section
fn write_resources<W: IoWrite>(writer: &mut Writer<W>, resources: &Resources) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("resources")))
        .map_err(|e| Error::xml_write(format!("Failed to write resources element: {}", e)))?;

    for object in &resources.objects {
        core::write_object(writer, object)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("resources")))
        .map_err(|e| Error::xml_write(format!("Failed to close resources element: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(model: &Model) -> String {
        let mut buffer = Vec::new();
        write_model_xml(model, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_minimal_model() {
        let xml = write(&Model::new());
        assert!(xml.contains("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("unit=\"millimeter\""));
        assert!(xml.contains(
            "xmlns=\"http://schemas.microsoft.com/3dmanufacturing/core/2015/02\""
        ));
        assert!(!xml.contains("requiredextensions"));
        assert!(xml.contains("<resources"));
        assert!(xml.contains("<build"));
    }

    #[test]
    fn test_write_model_with_metadata() {
        let mut model = Model::new();
        model.metadata.push(MetadataEntry::new("Title", "Brackets & tongue"));

        let xml = write(&model);
        assert!(xml.contains("<metadata name=\"Title\">Brackets &amp; tongue</metadata>"));
    }

    #[test]
    fn test_write_mesh_object() {
        let mut model = Model::new();
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(10.5, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(5.0, 10.0, 0.0));
        mesh.triangles.push(Triangle::new(0, 1, 2));

        let mut object = Object::new(1);
        object.name = Some("plate".to_string());
        object.mesh = Some(mesh);
        model.resources.objects.push(object);
        model.build.items.push(BuildItem::new(1));

        let xml = write(&model);
        assert!(xml.contains("<object id=\"1\" type=\"model\" name=\"plate\">"));
        assert!(xml.contains("<vertex x=\"10.5\" y=\"0\" z=\"0\"/>"));
        assert!(xml.contains("<triangle v1=\"0\" v2=\"1\" v3=\"2\"/>"));
        assert!(xml.contains("<item objectid=\"1\"/>"));
    }

    #[test]
    fn test_write_boolean_shape() {
        let mut model = Model::new();
        model.require_extension(Extension::BooleanOperations);

        let mut shape = BooleanShape::new(1, BooleanOpType::Difference);
        shape.operands.push(BooleanRef::new(2));

        let mut object = Object::new(3);
        object.boolean_shape = Some(shape);
        model.resources.objects.push(object);

        let xml = write(&model);
        assert!(xml.contains(
            "xmlns:bo=\"http://schemas.3mf.io/3dmanufacturing/booleanoperations/2023/07\""
        ));
        assert!(xml.contains("requiredextensions=\"bo\""));
        assert!(xml.contains("<bo:booleanshape objectid=\"1\" operation=\"difference\">"));
        assert!(xml.contains("<bo:boolean objectid=\"2\"/>"));
        assert!(xml.contains("</bo:booleanshape>"));
    }

    #[test]
    fn test_write_components_and_build_transform() {
        let mut model = Model::new();
        let mut object = Object::new(2);
        object.components.push(Component::new(1));
        model.resources.objects.push(object);

        let mut item = BuildItem::new(2);
        item.transform = Some([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 53.0, -0.0, 0.0]);
        model.build.items.push(item);

        let xml = write(&model);
        assert!(xml.contains("<component objectid=\"1\"/>"));
        assert!(xml.contains("<item objectid=\"2\" transform=\"1 0 0 0 1 0 0 0 1 53 0 0\"/>"));
    }
}
