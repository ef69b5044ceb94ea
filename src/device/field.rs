use super::access::Access;
use super::{parse_int, trimmed};
use crate::error::Tolerance;
use log::debug;
use serde::Deserialize;
use std::fmt;

/// Bit-field properties of a register.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    /// Name string used to identify the field.
    pub name: String,
    /// String describing the details of the field.
    pub description: String,
    /// The position of the least significant bit of the field within the
    /// register.
    pub lsb: u32,
    /// The position of the most significant bit of the field within the
    /// register.
    pub msb: u32,
    /// The access type.
    pub access: Access,
}

/// Identifies a field of a register by its position in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

/// What the viewer shows when a field of the diagram is activated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDetail {
    /// Field name.
    pub name: String,
    /// `Bit n` or `Bits msb:lsb`.
    pub range: String,
    /// Number of bits spanned.
    pub width: u32,
    /// Access rights.
    pub access: Access,
    /// Free-text description.
    pub description: String,
}

/// `<field>` as it appears in the document. The bit range may be given in
/// three different ways; [`SvdField::bit_range`] reconciles them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SvdField {
    name: Option<String>,
    description: Option<String>,
    lsb: Option<String>,
    msb: Option<String>,
    bit_range: Option<String>,
    bit_offset: Option<String>,
    bit_width: Option<String>,
    access: Option<String>,
}

impl Field {
    /// Creates a read-write field spanning `lsb..=msb`.
    pub fn new(name: impl Into<String>, lsb: u32, msb: u32) -> Self {
        Self { name: name.into(), lsb, msb, ..Self::default() }
    }

    /// Returns the number of bits spanned by the field.
    pub fn width(&self) -> u32 {
        self.msb.saturating_sub(self.lsb) + 1
    }

    /// Returns `msb:lsb`, or the single bit index for one-bit fields.
    pub fn bit_range(&self) -> String {
        if self.msb == self.lsb {
            self.lsb.to_string()
        } else {
            format!("{}:{}", self.msb, self.lsb)
        }
    }

    /// Returns the detail view of the field.
    pub fn detail(&self) -> FieldDetail {
        let range = if self.msb == self.lsb {
            format!("Bit {}", self.lsb)
        } else {
            format!("Bits {}:{}", self.msb, self.lsb)
        };
        FieldDetail {
            name: self.name.clone(),
            range,
            width: self.width(),
            access: self.access.clone(),
            description: self.description.clone(),
        }
    }
}

impl FieldId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the field in its register's field list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field_{}", self.0)
    }
}

impl fmt::Display for FieldDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field: {}", self.name)?;
        writeln!(f, "Range: {}", self.range)?;
        writeln!(f, "Width: {} bit(s)", self.width)?;
        writeln!(f, "Access: {} ({})", self.access.describe(), self.access)?;
        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }
        Ok(())
    }
}

impl SvdField {
    pub(crate) fn build(self, register: &str) -> Option<Field> {
        let Some(name) = self.name.clone().map(trimmed) else {
            debug!(
                tolerance = Tolerance::MissingOptional.as_str(),
                register = register;
                "skipping field without name"
            );
            return None;
        };
        let Some((lsb, msb)) = self.bit_range() else {
            debug!(
                tolerance = Tolerance::UnrecognizedFieldEncoding.as_str(),
                register = register,
                field = name.as_str();
                "dropping field without a recognizable bit range"
            );
            return None;
        };
        let access = self.access.as_deref().map_or_else(Access::default, Access::parse);
        Some(Field { name, description: self.description.unwrap_or_default(), lsb, msb, access })
    }

    /// Returns `(lsb, msb)` from the first encoding that is present and
    /// readable: explicit `lsb`/`msb`, then `[msb:lsb]` or `[n]`, then
    /// `bitOffset` with an optional `bitWidth` of one by default.
    fn bit_range(&self) -> Option<(u32, u32)> {
        self.lsb_msb().or_else(|| self.bracketed()).or_else(|| self.offset_width()).map(ordered)
    }

    fn lsb_msb(&self) -> Option<(u32, u32)> {
        let lsb = parse_int(self.lsb.as_deref()?).ok()?;
        let msb = parse_int(self.msb.as_deref()?).ok()?;
        Some((lsb, msb))
    }

    fn bracketed(&self) -> Option<(u32, u32)> {
        let range = self.bit_range.as_deref()?.trim().trim_matches(|c| c == '[' || c == ']');
        match range.split_once(':') {
            Some((msb, lsb)) => Some((parse_int(lsb).ok()?, parse_int(msb).ok()?)),
            None => {
                let bit = parse_int(range).ok()?;
                Some((bit, bit))
            }
        }
    }

    fn offset_width(&self) -> Option<(u32, u32)> {
        let lsb = parse_int(self.bit_offset.as_deref()?).ok()?;
        let width = match self.bit_width.as_deref() {
            Some(width) => parse_int(width).ok()?,
            None => 1,
        };
        let msb = lsb.checked_add(width.checked_sub(1)?)?;
        Some((lsb, msb))
    }
}

/// Swaps a reversed range so that `lsb <= msb` holds.
fn ordered((lsb, msb): (u32, u32)) -> (u32, u32) {
    if lsb <= msb {
        (lsb, msb)
    } else {
        (msb, lsb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svd_field() -> SvdField {
        SvdField {
            name: Some("MODE".to_owned()),
            description: None,
            lsb: None,
            msb: None,
            bit_range: None,
            bit_offset: None,
            bit_width: None,
            access: None,
        }
    }

    #[test]
    fn explicit_lsb_msb_wins() {
        let field = SvdField {
            lsb: Some("0".to_owned()),
            msb: Some("7".to_owned()),
            bit_range: Some("[15:8]".to_owned()),
            bit_offset: Some("16".to_owned()),
            ..svd_field()
        };
        assert_eq!(field.bit_range(), Some((0, 7)));
    }

    #[test]
    fn bracket_beats_offset() {
        let field = SvdField {
            bit_range: Some("[15:8]".to_owned()),
            bit_offset: Some("0".to_owned()),
            ..svd_field()
        };
        assert_eq!(field.bit_range(), Some((8, 15)));
    }

    #[test]
    fn single_bit_bracket() {
        let field = SvdField { bit_range: Some(" [5] ".to_owned()), ..svd_field() };
        assert_eq!(field.bit_range(), Some((5, 5)));
    }

    #[test]
    fn offset_defaults_to_one_bit() {
        let field = SvdField { bit_offset: Some("3".to_owned()), ..svd_field() };
        assert_eq!(field.bit_range(), Some((3, 3)));
        let field = SvdField {
            bit_offset: Some("4".to_owned()),
            bit_width: Some("0x4".to_owned()),
            ..svd_field()
        };
        assert_eq!(field.bit_range(), Some((4, 7)));
    }

    #[test]
    fn lone_lsb_falls_through() {
        let field = SvdField {
            lsb: Some("2".to_owned()),
            bit_offset: Some("2".to_owned()),
            bit_width: Some("2".to_owned()),
            ..svd_field()
        };
        assert_eq!(field.bit_range(), Some((2, 3)));
    }

    #[test]
    fn unrecognized_encoding_is_dropped() {
        assert!(svd_field().build("CTRL").is_none());
        let field = SvdField { bit_width: Some("4".to_owned()), ..svd_field() };
        assert!(field.build("CTRL").is_none());
        let field = SvdField { bit_offset: Some("4".to_owned()), bit_width: Some("0".to_owned()), ..svd_field() };
        assert!(field.build("CTRL").is_none());
    }

    #[test]
    fn reversed_range_is_ordered() {
        let field = SvdField { bit_range: Some("[0:7]".to_owned()), ..svd_field() };
        assert_eq!(field.bit_range(), Some((0, 7)));
    }

    #[test]
    fn access_defaults_to_read_write() {
        let field = SvdField { bit_offset: Some("0".to_owned()), ..svd_field() };
        assert_eq!(field.build("CTRL").unwrap().access, Access::ReadWrite);
        let field =
            SvdField { bit_offset: Some("0".to_owned()), access: Some("r".to_owned()), ..svd_field() };
        assert_eq!(field.build("CTRL").unwrap().access, Access::ReadOnly);
    }

    #[test]
    fn bit_range_label() {
        assert_eq!(Field::new("EN", 0, 0).bit_range(), "0");
        assert_eq!(Field::new("MODE", 4, 7).bit_range(), "7:4");
        assert_eq!(Field::new("MODE", 4, 7).width(), 4);
    }

    #[test]
    fn detail_view() {
        let detail = Field::new("EN", 3, 3).detail();
        assert_eq!(detail.range, "Bit 3");
        assert_eq!(detail.width, 1);
        let detail = Field::new("DATA", 0, 15).detail();
        assert_eq!(detail.range, "Bits 15:0");
        assert!(detail.to_string().contains("Width: 16 bit(s)"));
    }
}
