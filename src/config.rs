use crate::device::{Device, SvdDevice};
use crate::error::ParseError;
use log::debug;
use quick_xml::events::Event;
use quick_xml::{DeError, Reader};
use serde::de::Error as _;
use std::{fs, path::Path};

/// Options to configure how a device model is built.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub(crate) inherit_derived: bool,
}

impl Config {
    /// Creates the default set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets peripherals declaring `derivedFrom` without registers of their own
    /// inherit the registers of the named peripheral, rebased onto their own
    /// base address.
    pub fn inherit_derived(&mut self, inherit_derived: bool) -> &mut Self {
        self.inherit_derived = inherit_derived;
        self
    }

    /// Builds a device model from the SVD document `document`.
    pub fn parse(&self, document: &[u8]) -> Result<Device, ParseError> {
        check_well_formed(document)?;
        let svd: SvdDevice = quick_xml::de::from_reader(document)?;
        Ok(svd.build(self))
    }

    /// Reads the SVD file at `path` and builds a device model from it.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Device, ParseError> {
        let path = path.as_ref();
        debug!(path = path.display().to_string(); "reading SVD document");
        self.parse(&fs::read(path)?)
    }
}

/// Reads `document` to the end and fails unless it holds exactly one root
/// element followed by nothing but whitespace, comments and processing
/// instructions.
fn check_well_formed(document: &[u8]) -> Result<(), DeError> {
    let mut reader = Reader::from_reader(document);
    reader.check_end_names(true);
    let mut buf = Vec::new();
    let mut depth = 0_usize;
    let mut root_closed = false;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) | Event::Empty(_) if root_closed => {
                return Err(DeError::custom("content after the root element"));
            }
            Event::Start(_) => depth += 1,
            Event::Empty(_) => root_closed = depth == 0,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                root_closed = depth == 0;
            }
            Event::Text(text) if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) => {
                return Err(DeError::custom("text outside the root element"));
            }
            Event::CData(_) if depth == 0 => {
                return Err(DeError::custom("text outside the root element"));
            }
            Event::Eof if depth > 0 => {
                return Err(DeError::custom("unexpected end of document, root element not closed"));
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_documents() {
        assert!(check_well_formed(b"<?xml version=\"1.0\"?>\n<device><name>X</name></device>\n").is_ok());
        assert!(check_well_formed(b"<device/><!-- trailing comment -->").is_ok());
    }

    #[test]
    fn truncated_or_trailing_content() {
        assert!(check_well_formed(b"<device><name>X</name></device").is_err());
        assert!(check_well_formed(b"<device><name>X</name>").is_err());
        assert!(check_well_formed(b"<device><name>X</name></device><junk").is_err());
        assert!(check_well_formed(b"<device></device><device></device>").is_err());
        assert!(check_well_formed(b"<device></device>junk").is_err());
        assert!(check_well_formed(b"<device><name>X</nam></device>").is_err());
    }
}
