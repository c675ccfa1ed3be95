//! Serializer: renders a [`CatsDocument`] as indented XML.

use crate::error::CatsError;
use crate::model::CatsDocument;
use crate::node::{Element, Node};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;

pub fn to_bytes(document: &CatsDocument) -> Result<Vec<u8>, CatsError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, &document.to_element())?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn to_string(document: &CatsDocument) -> Result<String, CatsError> {
    let bytes = to_bytes(document)?;
    String::from_utf8(bytes).map_err(|e| CatsError::Write(e.to_string()))
}

/// Serialize and write to `path`, returning the written bytes
pub fn write_to(document: &CatsDocument, path: &Path) -> Result<Vec<u8>, CatsError> {
    let bytes = to_bytes(document)?;
    std::fs::write(path, &bytes).map_err(|source| CatsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(bytes)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), CatsError> {
    let mut start = BytesStart::new(element.tag);
    for (key, value) in element.attrs.iter() {
        start.push_attribute((key, value));
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(inner) => write_element(writer, inner)?,
            Node::Text(text) => emit(writer, Event::Text(BytesText::new(text)))?,
            Node::Comment(comment) => {
                let safe = comment.replace("--", "- -");
                emit(writer, Event::Comment(BytesText::from_escaped(format!(" {} ", safe))))?
            }
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.tag)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), CatsError> {
    writer
        .write_event(event)
        .map_err(|e| CatsError::Write(e.to_string()))
}
