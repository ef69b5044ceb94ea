//! Bit diagram of a single register.
//!
//! [`layout`] turns a [`Register`] into a [`DrawPlan`]: an ordered list of
//! boxes and text labels in a coordinate space `width` pixels wide, with bit 0
//! at the right edge and the top bit at the left edge. The plan is a pure
//! function of its inputs; the renderer owns any interactive state and uses
//! the [`FieldId`] carried by each field box to look the field up again.
//!
//! Primitives are emitted in this order:
//!
//! 1. the bit-index ruler (bit 0, every multiple of 8, the top bit);
//! 2. for each field in document order, its box, name and access label;
//! 3. a box and `RES` label for each run of bits no field covers;
//! 4. the `msb:lsb` label under each field box.

mod config;
mod geometry;
mod primitive;
mod style;

pub use self::config::LayoutConfig;
pub use self::geometry::{Bounds, Point};
pub use self::primitive::{BitSpan, Primitive, PrimitiveKind};
pub use self::style::{field_color, Color, Stroke, FIELD_PALETTE};
use self::style::{MUTED_TEXT, NAME_TEXT, RANGE_TEXT, RESERVED_FILL, RESERVED_TEXT};
use crate::device::{FieldId, Register, MAX_SIZE};
use log::{debug, trace};

/// Label drawn inside reserved boxes.
pub const RESERVED_LABEL: &str = "RES";

/// Ordered draw primitives for one register.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPlan {
    primitives: Vec<Primitive>,
    width: f32,
    height: f32,
}

impl DrawPlan {
    /// Returns the primitives in drawing order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Returns the width the plan was laid out for.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the height of the plan.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the primitives of kind `kind`.
    pub fn of_kind(&self, kind: PrimitiveKind) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives.iter().filter(move |primitive| primitive.kind() == kind)
    }

    /// Returns every field box with the field it was drawn for.
    pub fn field_boxes(&self) -> impl Iterator<Item = (FieldId, Bounds)> + '_ {
        self.primitives
            .iter()
            .filter_map(|primitive| primitive.field().map(|id| (id, primitive.bounds())))
    }

    /// Returns the field whose box is drawn topmost at `point`.
    pub fn hit_test(&self, point: Point) -> Option<FieldId> {
        self.field_boxes()
            .filter(|(_, bounds)| bounds.contains(point))
            .last()
            .map(|(id, _)| id)
    }

    /// Returns a copy of the plan with the box of field `id` outlined as
    /// focused.
    #[must_use]
    pub fn focused(&self, id: FieldId) -> Self {
        let mut plan = self.clone();
        for primitive in &mut plan.primitives {
            if primitive.field() == Some(id) {
                primitive.set_stroke(Stroke::focused());
            }
        }
        plan
    }
}

/// Lays out `register` over `width` pixels with the default thresholds.
///
/// Returns `None` when there is nothing to draw: the register has no fields,
/// no bits, or more than [`MAX_SIZE`] bits.
pub fn layout(register: &Register, width: f32) -> Option<DrawPlan> {
    layout_with(register, width, &LayoutConfig::default())
}

/// Lays out `register` over `width` pixels with the thresholds of `config`.
pub fn layout_with(register: &Register, width: f32, config: &LayoutConfig) -> Option<DrawPlan> {
    if register.fields().is_empty() {
        return None;
    }
    if register.size == 0 {
        debug!(register = register.name.as_str(); "register has no bits to draw");
        return None;
    }
    if register.size > MAX_SIZE {
        debug!(register = register.name.as_str(), size = register.size; "register too wide to draw");
        return None;
    }
    let width = if width > 0.0 { width } else { 0.0 };
    let grid = BitGrid { size: register.size, bit_width: width / register.size as f32 };
    let mut primitives = Vec::new();

    for bit in ruler_bits(register.size) {
        let left = grid.left(bit);
        let bounds = Bounds::band(left, left + grid.bit_width, config.ruler_y, config.line_height);
        primitives.push(Primitive::text(
            PrimitiveKind::BitLabel,
            bounds,
            bit.to_string(),
            MUTED_TEXT,
        ));
    }

    let box_center = config.box_top + config.box_height / 2.0;
    let mut spans = Vec::with_capacity(register.fields().len());
    for (index, field) in register.fields().iter().enumerate() {
        let Some(span) = grid.clamp(field.lsb, field.msb) else {
            debug!(
                register = register.name.as_str(),
                field = field.name.as_str();
                "field lies outside the register"
            );
            continue;
        };
        spans.push(span);
        let bounds = grid.boxed(span, config);
        let box_width = bounds.width();
        primitives.push(Primitive::field_box(
            FieldId::new(index),
            span,
            bounds,
            field_color(index),
        ));
        if box_width > config.label_min_width {
            primitives.push(Primitive::text(
                PrimitiveKind::FieldLabel,
                Bounds::band(
                    bounds.min_x(),
                    bounds.max_x(),
                    box_center + config.name_offset,
                    config.line_height,
                ),
                config.display_name(&field.name, box_width),
                NAME_TEXT,
            ));
        }
        if box_width > config.access_min_width {
            primitives.push(Primitive::text(
                PrimitiveKind::AccessLabel,
                Bounds::band(
                    bounds.min_x(),
                    bounds.max_x(),
                    box_center + config.access_offset,
                    config.line_height,
                ),
                field.access.abbrev(),
                MUTED_TEXT,
            ));
        }
    }

    for span in reserved_spans(register.size, &mut spans) {
        let bounds = grid.boxed(span, config);
        primitives.push(Primitive::reserved_box(span, bounds, RESERVED_FILL));
        if bounds.width() > config.label_min_width {
            primitives.push(Primitive::text(
                PrimitiveKind::ReservedLabel,
                Bounds::band(bounds.min_x(), bounds.max_x(), box_center, config.line_height),
                RESERVED_LABEL.to_owned(),
                RESERVED_TEXT,
            ));
        }
    }

    let range_y = config.box_top + config.box_height + config.range_gap;
    for field in register.fields() {
        let Some(span) = grid.clamp(field.lsb, field.msb) else { continue };
        let bounds = grid.boxed(span, config);
        if bounds.width() > config.label_min_width {
            primitives.push(Primitive::text(
                PrimitiveKind::RangeLabel,
                Bounds::band(bounds.min_x(), bounds.max_x(), range_y, config.line_height),
                field.bit_range(),
                RANGE_TEXT,
            ));
        }
    }

    trace!(
        register = register.name.as_str(),
        primitives = primitives.len();
        "register laid out"
    );
    Some(DrawPlan { primitives, width, height: config.height() })
}

/// Horizontal mapping of register bits, most significant bit on the left.
struct BitGrid {
    size: u32,
    bit_width: f32,
}

impl BitGrid {
    fn left(&self, msb: u32) -> f32 {
        (self.size - 1 - msb) as f32 * self.bit_width
    }

    fn right(&self, lsb: u32) -> f32 {
        (self.size - lsb) as f32 * self.bit_width
    }

    /// Restricts `lsb..=msb` to the register's bits.
    fn clamp(&self, lsb: u32, msb: u32) -> Option<BitSpan> {
        let top = self.size - 1;
        (lsb <= top && lsb <= msb).then(|| BitSpan { lsb, msb: msb.min(top) })
    }

    fn boxed(&self, span: BitSpan, config: &LayoutConfig) -> Bounds {
        Bounds::new(
            self.left(span.msb),
            config.box_top,
            self.right(span.lsb),
            config.box_top + config.box_height,
        )
    }
}

/// Bits labelled on the ruler, in ascending order.
fn ruler_bits(size: u32) -> impl Iterator<Item = u32> {
    let top = size - 1;
    (0..size).step_by(8).chain((top % 8 != 0).then_some(top))
}

/// Returns the maximal runs of bits in `0..size` covered by none of `used`.
fn reserved_spans(size: u32, used: &mut [BitSpan]) -> Vec<BitSpan> {
    used.sort_unstable_by_key(|span| (span.lsb, span.msb));
    let mut reserved = Vec::new();
    let mut next = 0;
    for span in used.iter() {
        if span.lsb > next {
            reserved.push(BitSpan { lsb: next, msb: span.lsb - 1 });
        }
        next = next.max(span.msb + 1);
    }
    if next < size {
        reserved.push(BitSpan { lsb: next, msb: size - 1 });
    }
    reserved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Access, Field};
    use float_cmp::assert_approx_eq;

    fn register(size: u32, fields: &[(&str, u32, u32)]) -> Register {
        let mut register = Register { name: "CTRL".to_owned(), size, ..Register::default() };
        for &(name, lsb, msb) in fields {
            register.add_field(Field::new(name, lsb, msb));
        }
        register
    }

    fn labels(plan: &DrawPlan, kind: PrimitiveKind) -> Vec<&str> {
        plan.of_kind(kind).map(Primitive::label).collect()
    }

    #[test]
    fn no_fields_no_plan() {
        assert!(layout(&register(32, &[]), 340.0).is_none());
    }

    #[test]
    fn zero_bit_register_has_no_plan() {
        assert!(layout(&register(0, &[("EN", 0, 0)]), 340.0).is_none());
    }

    #[test]
    fn oversized_register_has_no_plan() {
        assert!(layout(&register(u32::MAX, &[("EN", 0, 0)]), 340.0).is_none());
        assert!(layout(&register(MAX_SIZE, &[("EN", 0, 0)]), 340.0).is_some());
    }

    #[test]
    fn ruler_labels() {
        assert_eq!(ruler_bits(32).collect::<Vec<_>>(), [0, 8, 16, 24, 31]);
        assert_eq!(ruler_bits(12).collect::<Vec<_>>(), [0, 8, 11]);
        assert_eq!(ruler_bits(9).collect::<Vec<_>>(), [0, 8]);
        assert_eq!(ruler_bits(1).collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn single_low_field() {
        let plan = layout(&register(32, &[("MODE", 0, 3)]), 340.0).unwrap();
        assert_eq!(labels(&plan, PrimitiveKind::BitLabel), ["0", "8", "16", "24", "31"]);

        let boxes = plan.of_kind(PrimitiveKind::FieldBox).collect::<Vec<_>>();
        assert_eq!(boxes.len(), 1);
        let bounds = boxes[0].bounds();
        assert_approx_eq!(f32, bounds.min_x(), 297.5);
        assert_approx_eq!(f32, bounds.max_x(), 340.0);
        assert_eq!(boxes[0].span(), Some(BitSpan { lsb: 0, msb: 3 }));

        let reserved = plan.of_kind(PrimitiveKind::ReservedBox).collect::<Vec<_>>();
        assert_eq!(reserved.len(), 1);
        assert_eq!(reserved[0].span(), Some(BitSpan { lsb: 4, msb: 31 }));
        assert_approx_eq!(f32, reserved[0].bounds().min_x(), 0.0);
        assert_approx_eq!(f32, reserved[0].bounds().max_x(), 297.5);
        assert_eq!(labels(&plan, PrimitiveKind::ReservedLabel), [RESERVED_LABEL]);
        assert_eq!(labels(&plan, PrimitiveKind::RangeLabel), ["3:0"]);
        assert_eq!(labels(&plan, PrimitiveKind::AccessLabel), ["rw"]);
    }

    #[test]
    fn primitive_order() {
        let plan = layout(&register(8, &[("A", 4, 7), ("B", 0, 1)]), 160.0).unwrap();
        let kinds = plan.primitives().iter().map(Primitive::kind).collect::<Vec<_>>();
        use PrimitiveKind::*;
        assert_eq!(
            kinds,
            [
                BitLabel,
                BitLabel,
                FieldBox,
                FieldLabel,
                AccessLabel,
                FieldBox,
                FieldLabel,
                AccessLabel,
                ReservedBox,
                ReservedLabel,
                RangeLabel,
                RangeLabel,
            ]
        );
    }

    #[test]
    fn narrow_boxes_drop_labels() {
        // 32 bits over 320px: one bit is 10px, two bits are 20px.
        let plan = layout(&register(32, &[("EN", 0, 0), ("MD", 1, 2), ("CLK", 3, 31)]), 320.0)
            .unwrap();
        assert_eq!(labels(&plan, PrimitiveKind::FieldLabel), ["MD", "CLK"]);
        assert_eq!(labels(&plan, PrimitiveKind::AccessLabel), ["rw"]);
        assert_eq!(labels(&plan, PrimitiveKind::RangeLabel), ["2:1", "31:3"]);
        assert_eq!(plan.of_kind(PrimitiveKind::ReservedBox).count(), 0);
    }

    #[test]
    fn long_names_are_truncated() {
        let plan = layout(&register(32, &[("PRESCALER", 0, 3)]), 340.0).unwrap();
        assert_eq!(labels(&plan, PrimitiveKind::FieldLabel), ["PRESCA.."]);
        let plan = layout(&register(32, &[("PRESCALER", 0, 15)]), 340.0).unwrap();
        assert_eq!(labels(&plan, PrimitiveKind::FieldLabel), ["PRESCALER"]);
    }

    #[test]
    fn access_abbreviation() {
        let mut register = register(8, &[]);
        register.add_field(Field { access: Access::ReadOnly, ..Field::new("ST", 0, 7) });
        let plan = layout(&register, 200.0).unwrap();
        assert_eq!(labels(&plan, PrimitiveKind::AccessLabel), ["r"]);
    }

    #[test]
    fn gaps_and_overlaps() {
        let plan =
            layout(&register(16, &[("A", 2, 5), ("B", 4, 7), ("C", 12, 12)]), 160.0).unwrap();
        let reserved = plan
            .of_kind(PrimitiveKind::ReservedBox)
            .filter_map(Primitive::span)
            .collect::<Vec<_>>();
        assert_eq!(
            reserved,
            [
                BitSpan { lsb: 0, msb: 1 },
                BitSpan { lsb: 8, msb: 11 },
                BitSpan { lsb: 13, msb: 15 },
            ]
        );
    }

    #[test]
    fn out_of_range_bits_are_clamped() {
        let plan = layout(&register(8, &[("HI", 4, 11), ("GONE", 9, 12)]), 80.0).unwrap();
        let boxes = plan.of_kind(PrimitiveKind::FieldBox).collect::<Vec<_>>();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].span(), Some(BitSpan { lsb: 4, msb: 7 }));
        assert_approx_eq!(f32, boxes[0].bounds().min_x(), 0.0);
        // The footer keeps the declared range.
        assert_eq!(labels(&plan, PrimitiveKind::RangeLabel), ["11:4"]);
    }

    #[test]
    fn palette_follows_document_order() {
        let fields = (0..7).map(|bit| ("F", bit, bit)).collect::<Vec<_>>();
        let plan = layout(&register(8, &fields), 80.0).unwrap();
        let fills = plan.of_kind(PrimitiveKind::FieldBox).map(Primitive::fill).collect::<Vec<_>>();
        assert_eq!(fills[0], FIELD_PALETTE[0]);
        assert_eq!(fills[5], FIELD_PALETTE[5]);
        assert_eq!(fills[6], FIELD_PALETTE[0]);
    }

    #[test]
    fn hit_test_and_focus() {
        let register = register(32, &[("MODE", 0, 3), ("EN", 8, 8)]);
        let plan = layout(&register, 340.0).unwrap();
        let id = plan.hit_test(Point::new(320.0, 40.0)).unwrap();
        assert_eq!(register.field(id).unwrap().name, "MODE");
        assert!(plan.hit_test(Point::new(100.0, 40.0)).is_none());
        assert!(plan.hit_test(Point::new(320.0, 5.0)).is_none());

        let focused = plan.focused(id);
        let stroke = |plan: &DrawPlan| {
            plan.primitives().iter().find(|p| p.field() == Some(id)).unwrap().stroke().unwrap()
        };
        assert_eq!(stroke(&focused), Stroke::focused());
        assert_eq!(stroke(&plan), Stroke::field());
    }

    #[test]
    fn degenerate_width() {
        let plan = layout(&register(32, &[("MODE", 0, 3)]), -5.0).unwrap();
        assert_approx_eq!(f32, plan.width(), 0.0);
        assert_eq!(plan.of_kind(PrimitiveKind::FieldLabel).count(), 0);
        assert_eq!(plan.of_kind(PrimitiveKind::ReservedBox).count(), 1);
    }
}
