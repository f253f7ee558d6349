//! Boolean Operations extension writing

use crate::error::{Error, Result};
use crate::model::*;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::Write as IoWrite;

fn element_name(local: &str) -> String {
    format!("{}:{}", Extension::BooleanOperations.prefix(), local)
}

/// Write a boolean shape and its operands
pub(super) fn write_boolean_shape<W: IoWrite>(
    writer: &mut Writer<W>,
    shape: &BooleanShape,
) -> Result<()> {
    let shape_name = element_name("booleanshape");
    let mut elem = BytesStart::new(shape_name.as_str());
    elem.push_attribute(("objectid", shape.objectid.to_string().as_str()));
    elem.push_attribute(("operation", shape.operation.as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write booleanshape element: {}", e)))?;

    let operand_name = element_name("boolean");
    for operand in &shape.operands {
        let mut ref_elem = BytesStart::new(operand_name.as_str());
        ref_elem.push_attribute(("objectid", operand.objectid.to_string().as_str()));

        writer
            .write_event(Event::Empty(ref_elem))
            .map_err(|e| Error::xml_write(format!("Failed to write boolean operand: {}", e)))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(shape_name.as_str())))
        .map_err(|e| Error::xml_write(format!("Failed to close booleanshape element: {}", e)))?;

    Ok(())
}
