use super::geometry::Bounds;
use super::style::{Color, Stroke};
use crate::device::FieldId;
use std::fmt;

/// What a [`Primitive`] depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Bit index on the ruler above the boxes.
    BitLabel,
    /// Box covering the bits of a field.
    FieldBox,
    /// Field name inside its box.
    FieldLabel,
    /// Access abbreviation under the field name.
    AccessLabel,
    /// Box covering a run of bits no field uses.
    ReservedBox,
    /// `RES` inside a reserved box.
    ReservedLabel,
    /// `msb:lsb` under a field box.
    RangeLabel,
}

impl PrimitiveKind {
    /// Returns the kebab-case tag of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BitLabel => "bit-label",
            Self::FieldBox => "field-box",
            Self::FieldLabel => "field-label",
            Self::AccessLabel => "access-label",
            Self::ReservedBox => "reserved-box",
            Self::ReservedLabel => "reserved-label",
            Self::RangeLabel => "range-label",
        }
    }

    /// Returns whether the primitive is a box rather than text.
    pub fn is_box(self) -> bool {
        matches!(self, Self::FieldBox | Self::ReservedBox)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive range of register bits covered by a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitSpan {
    /// Lowest bit.
    pub lsb: u32,
    /// Highest bit.
    pub msb: u32,
}

impl BitSpan {
    /// Returns the number of bits in the span.
    pub fn bit_count(self) -> u32 {
        self.msb - self.lsb + 1
    }

    /// Returns whether `bit` lies inside the span.
    pub fn contains(self, bit: u32) -> bool {
        (self.lsb..=self.msb).contains(&bit)
    }
}

/// One element of a draw plan: a box or a piece of text with its bounds.
///
/// Text primitives carry the text color in [`Primitive::fill`]; their bounds
/// are the band the text is centered in.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    kind: PrimitiveKind,
    bounds: Bounds,
    text: String,
    fill: Color,
    stroke: Option<Stroke>,
    span: Option<BitSpan>,
    field: Option<FieldId>,
}

impl Primitive {
    pub(crate) fn text(kind: PrimitiveKind, bounds: Bounds, text: String, color: Color) -> Self {
        Self { kind, bounds, text, fill: color, stroke: None, span: None, field: None }
    }

    pub(crate) fn field_box(id: FieldId, span: BitSpan, bounds: Bounds, fill: Color) -> Self {
        Self {
            kind: PrimitiveKind::FieldBox,
            bounds,
            text: String::new(),
            fill,
            stroke: Some(Stroke::field()),
            span: Some(span),
            field: Some(id),
        }
    }

    pub(crate) fn reserved_box(span: BitSpan, bounds: Bounds, fill: Color) -> Self {
        Self {
            kind: PrimitiveKind::ReservedBox,
            bounds,
            text: String::new(),
            fill,
            stroke: Some(Stroke::reserved()),
            span: Some(span),
            field: None,
        }
    }

    /// Returns the kind of the primitive.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns the displayed text, empty for boxes.
    pub fn label(&self) -> &str {
        &self.text
    }

    /// Returns the box fill or the text color.
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Returns the outline of a box.
    pub fn stroke(&self) -> Option<Stroke> {
        self.stroke
    }

    /// Returns the bits covered by a box.
    pub fn span(&self) -> Option<BitSpan> {
        self.span
    }

    /// Returns the field a field box was drawn for.
    pub fn field(&self) -> Option<FieldId> {
        self.field
    }

    pub(crate) fn set_stroke(&mut self, stroke: Stroke) {
        self.stroke = Some(stroke);
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<14} {:>8.2} {:>6.2} {:>8.2} {:>6.2}",
            self.kind.as_str(),
            self.bounds.min_x(),
            self.bounds.min_y(),
            self.bounds.max_x(),
            self.bounds.max_y(),
        )?;
        if let Some(span) = self.span {
            write!(f, " [{}:{}]", span.msb, span.lsb)?;
        }
        if let Some(field) = self.field {
            write!(f, " {field}")?;
        }
        if !self.text.is_empty() {
            write!(f, " {:?}", self.text)?;
        }
        Ok(())
    }
}
