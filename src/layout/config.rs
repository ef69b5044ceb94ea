//! Thresholds and metrics of the bit diagram.
//!
//! [`LayoutConfig`] implements [`serde::Deserialize`] with every field
//! defaulted, so a configuration file only needs to name what it changes.

use serde::Deserialize;

/// Thresholds and vertical metrics used by the layout engine. All values are
/// in pixels unless noted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// A box must be wider than this for its name, `RES` or bit range to be
    /// drawn.
    pub label_min_width: f32,
    /// A field box must be wider than this for its access abbreviation to be
    /// drawn.
    pub access_min_width: f32,
    /// Names longer than this many characters are truncated in narrow boxes.
    pub truncate_len: usize,
    /// Boxes narrower than this truncate long names.
    pub truncate_below: f32,
    /// Characters kept from a truncated name.
    pub truncate_keep: usize,
    /// Marker appended to a truncated name.
    pub ellipsis: String,
    /// Vertical center of the bit-index ruler.
    pub ruler_y: f32,
    /// Top edge of field and reserved boxes.
    pub box_top: f32,
    /// Height of field and reserved boxes.
    pub box_height: f32,
    /// Distance from the bottom of the boxes to the center of the bit-range
    /// labels.
    pub range_gap: f32,
    /// Height of one line of text.
    pub line_height: f32,
    /// Offset of the field name from the vertical center of its box.
    pub name_offset: f32,
    /// Offset of the access abbreviation from the vertical center of its box.
    pub access_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_min_width: 15.0,
            access_min_width: 20.0,
            truncate_len: 8,
            truncate_below: 60.0,
            truncate_keep: 6,
            ellipsis: "..".to_owned(),
            ruler_y: 10.0,
            box_top: 25.0,
            box_height: 35.0,
            range_gap: 10.0,
            line_height: 10.0,
            name_offset: -8.0,
            access_offset: 10.0,
        }
    }
}

impl LayoutConfig {
    /// Total height of a diagram.
    pub fn height(&self) -> f32 {
        self.box_top + self.box_height + self.range_gap + self.line_height / 2.0
    }

    /// Returns the text drawn for a field name in a box `width` pixels wide.
    pub fn display_name(&self, name: &str, width: f32) -> String {
        if name.chars().count() > self.truncate_len && width < self.truncate_below {
            let mut display = name.chars().take(self.truncate_keep).collect::<String>();
            display.push_str(&self.ellipsis);
            display
        } else {
            name.to_owned()
        }
    }
}
