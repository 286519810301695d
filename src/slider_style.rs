/// Slider geometry and style queries
///
/// The range slider never asks a GUI toolkit directly where its groove or
/// handles are. Everything goes through the `SliderStyle` trait, so any
/// toolkit binding (egui here, tests use `FlatStyle` directly) only has to
/// answer three questions: what is under a point, where is a sub-control,
/// and which value does a pixel offset correspond to.

/// Integer pixel point in widget coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer pixel rectangle, `width`/`height` may be zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Last column inside the rectangle
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Last row inside the rectangle
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Where tick marks are drawn relative to the groove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPosition {
    #[default]
    NoTicks,
    /// Above a horizontal groove, left of a vertical one
    Above,
    /// Below a horizontal groove, right of a vertical one
    Below,
    BothSides,
}

/// Hit-testable sub-part of the slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    None,
    Groove,
    Handle,
    TickMarks,
}

/// Snapshot of everything a style needs to lay out one handle pass.
///
/// `slider_position` is the value of the handle being laid out; the range
/// slider builds one of these per handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOption {
    pub rect: Rect,
    pub minimum: i32,
    pub maximum: i32,
    pub slider_position: i32,
    pub orientation: Orientation,
    pub upside_down: bool,
    pub tick_position: TickPosition,
}

/// Geometry capability a toolkit binding must supply.
pub trait SliderStyle {
    /// Sub-control under `point` for the handle described by `opt`.
    fn hit_test(&self, opt: &StyleOption, point: Point) -> Region;

    /// Rectangle of `region` for the handle described by `opt`.
    fn sub_control_rect(&self, opt: &StyleOption, region: Region) -> Rect;

    /// Map a pixel offset `pos` within `span` onto `[min, max]`.
    fn value_from_position(&self, min: i32, max: i32, pos: i32, span: i32, upside_down: bool) -> i32 {
        value_from_position(min, max, pos, span, upside_down)
    }

    /// Map a value onto a pixel offset within `span`.
    fn position_from_value(&self, min: i32, max: i32, value: i32, span: i32, upside_down: bool) -> i32 {
        position_from_value(min, max, value, span, upside_down)
    }
}

/// Linear pixel offset -> value mapping with round-to-nearest.
///
/// Offsets before the start of the span clamp to the start value and
/// offsets past the end clamp to the end value, so the result is always
/// inside `[min, max]`.
pub fn value_from_position(min: i32, max: i32, pos: i32, span: i32, upside_down: bool) -> i32 {
    if span <= 0 || pos <= 0 || max <= min {
        return if upside_down { max } else { min };
    }
    if pos >= span {
        return if upside_down { min } else { max };
    }
    let range = max as i64 - min as i64;
    let p = pos as i64;
    let s = span as i64;
    let tmp = (2 * range * p + s) / (2 * s);
    if upside_down {
        (max as i64 - tmp) as i32
    } else {
        (min as i64 + tmp) as i32
    }
}

/// Inverse of `value_from_position`, used to place handles.
pub fn position_from_value(min: i32, max: i32, value: i32, span: i32, upside_down: bool) -> i32 {
    if span <= 0 || max <= min {
        return 0;
    }
    let value = value.clamp(min, max);
    let range = max as i64 - min as i64;
    let p = if upside_down { max as i64 - value as i64 } else { value as i64 - min as i64 };
    let s = span as i64;
    ((2 * p * s + range) / (2 * range)) as i32
}

/// Toolkit-free slider layout.
///
/// The groove runs along the whole widget, `groove_thickness` thick and
/// centred across it. Handles are `handle_length` long along the groove and
/// span the widget's full thickness minus the tick area. Tick marks occupy
/// `tick_length` pixels on the configured side(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatStyle {
    pub handle_length: i32,
    pub groove_thickness: i32,
    pub tick_length: i32,
}

impl Default for FlatStyle {
    fn default() -> Self {
        Self {
            handle_length: 14,
            groove_thickness: 6,
            tick_length: 5,
        }
    }
}

impl FlatStyle {
    /// Length/thickness of the widget along and across the groove axis
    fn axis_extent(opt: &StyleOption) -> (i32, i32) {
        match opt.orientation {
            Orientation::Horizontal => (opt.rect.width, opt.rect.height),
            Orientation::Vertical => (opt.rect.height, opt.rect.width),
        }
    }

    /// Space taken by tick marks before and after the handle, across the axis
    fn tick_insets(&self, opt: &StyleOption) -> (i32, i32) {
        let t = self.tick_length;
        match opt.tick_position {
            TickPosition::NoTicks => (0, 0),
            TickPosition::Above => (t, 0),
            TickPosition::Below => (0, t),
            TickPosition::BothSides => (t, t),
        }
    }

    /// Build a rect from along/across coordinates relative to the widget
    fn oriented(opt: &StyleOption, along: i32, across: i32, length: i32, thickness: i32) -> Rect {
        match opt.orientation {
            Orientation::Horizontal => Rect::new(opt.rect.x + along, opt.rect.y + across, length, thickness),
            Orientation::Vertical => Rect::new(opt.rect.x + across, opt.rect.y + along, thickness, length),
        }
    }
}

impl SliderStyle for FlatStyle {
    fn hit_test(&self, opt: &StyleOption, point: Point) -> Region {
        if !opt.rect.contains(point) {
            return Region::None;
        }
        if self.sub_control_rect(opt, Region::Handle).contains(point) {
            return Region::Handle;
        }
        if self.sub_control_rect(opt, Region::Groove).contains(point) {
            return Region::Groove;
        }
        if opt.tick_position != TickPosition::NoTicks {
            return Region::TickMarks;
        }
        // Blank space around a thin groove still belongs to the track
        Region::Groove
    }

    fn sub_control_rect(&self, opt: &StyleOption, region: Region) -> Rect {
        let (length, thickness) = Self::axis_extent(opt);
        let (before, after) = self.tick_insets(opt);
        let inner = (thickness - before - after).max(0);
        match region {
            Region::Groove => {
                let groove = self.groove_thickness.min(inner);
                let across = before + (inner - groove) / 2;
                Self::oriented(opt, 0, across, length, groove)
            }
            Region::Handle => {
                let handle = self.handle_length.min(length);
                let span = length - handle;
                let along = self.position_from_value(
                    opt.minimum,
                    opt.maximum,
                    opt.slider_position,
                    span,
                    opt.upside_down,
                );
                Self::oriented(opt, along, before, handle, inner)
            }
            Region::TickMarks => Self::oriented(opt, 0, 0, length, thickness),
            Region::None => Rect::default(),
        }
    }
}
