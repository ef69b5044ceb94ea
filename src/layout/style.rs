use std::fmt;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Creates a color from a `0xRRGGBB` value.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Returns the `0xRRGGBB` value.
    pub fn rgb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Fill colors cycled through by field index.
pub const FIELD_PALETTE: [Color; 6] = [
    Color::from_rgb(0xE3F2FD),
    Color::from_rgb(0xFFF3E0),
    Color::from_rgb(0xF3E5F5),
    Color::from_rgb(0xE8F5E9),
    Color::from_rgb(0xFFF9C4),
    Color::from_rgb(0xFCE4EC),
];

pub(crate) const FIELD_OUTLINE: Color = Color::from_rgb(0x333333);
pub(crate) const FOCUS_OUTLINE: Color = Color::from_rgb(0x000000);
pub(crate) const RESERVED_FILL: Color = Color::from_rgb(0xF5F5F5);
pub(crate) const RESERVED_OUTLINE: Color = Color::from_rgb(0x999999);
pub(crate) const NAME_TEXT: Color = Color::from_rgb(0x000000);
pub(crate) const MUTED_TEXT: Color = Color::from_rgb(0x666666);
pub(crate) const RESERVED_TEXT: Color = Color::from_rgb(0x999999);
pub(crate) const RANGE_TEXT: Color = Color::from_rgb(0x333333);

/// Returns the fill color of the field at `index` in document order.
pub fn field_color(index: usize) -> Color {
    FIELD_PALETTE[index % FIELD_PALETTE.len()]
}

/// Outline of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    color: Color,
    width: f32,
    dashed: bool,
}

impl Stroke {
    /// Outline of a field box.
    pub fn field() -> Self {
        Self { color: FIELD_OUTLINE, width: 1.0, dashed: false }
    }

    /// Outline of the field box under the pointer.
    pub fn focused() -> Self {
        Self { color: FOCUS_OUTLINE, width: 2.0, dashed: false }
    }

    /// Outline of a reserved region.
    pub fn reserved() -> Self {
        Self { color: RESERVED_OUTLINE, width: 1.0, dashed: true }
    }

    /// Returns the stroke color.
    pub fn color(self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns whether the outline is dashed.
    pub fn dashed(self) -> bool {
        self.dashed
    }
}
