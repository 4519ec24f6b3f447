// bundle/material.rs
use std::io::{self, Read};

/// Reads one PEM entry to completion and returns it as text.
///
/// The content is not decoded or checked for PEM framing; Kubernetes clients
/// want the text form. Certificate chains come back as one string.
pub fn read_material<R: Read>(mut reader: R) -> io::Result<String> {
    let mut material = String::new();
    reader.read_to_string(&mut material)?;
    Ok(material)
}
