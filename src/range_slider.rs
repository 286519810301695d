/// Dual-handle range slider
///
/// Holds a `low`/`high` band inside a fixed `[minimum, maximum]` range and
/// turns pointer gestures into band updates. Pressing a handle drags that
/// handle alone; pressing anywhere else on the track drags the whole band.
/// All geometry questions go through `SliderStyle`, so the same state
/// machine runs under egui and in tests.
///
/// Programmatic `set_low`/`set_high` are trusted: they are stored as given
/// and may collapse or invert the band. Only interactive drags enforce
/// `low < high`.

use std::fmt;

use crate::slider_style::{Orientation, Point, Rect, Region, SliderStyle, StyleOption, TickPosition};

/// Notification emitted to subscribers after the band changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderEvent {
    LowChanged(i32),
    HighChanged(i32),
    /// Raw pointer value of the last drag step
    Moved(i32),
}

/// One of the two handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Low,
    High,
}

/// Drag target of the current gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveHandle {
    Low,
    High,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    DraggingLow,
    DraggingHigh,
    DraggingBoth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gesture {
    handle: ActiveHandle,
    /// Range value under the pointer at the previous step
    anchor: i32,
    /// Pixel position of the previous pointer event, if it came from one
    point: Option<Point>,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Listener = Box<dyn FnMut(&SliderEvent)>;

/// What to draw for one handle pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlePaint {
    pub handle: Handle,
    pub option: StyleOption,
    pub draw_groove: bool,
    pub draw_ticks: bool,
    /// Sub-control drawn highlighted in this pass
    pub active_region: Region,
    /// Pressed look, only while this handle is being dragged
    pub sunken: bool,
}

pub struct RangeSlider {
    minimum: i32,
    maximum: i32,
    low: i32,
    high: i32,
    orientation: Orientation,
    inverted_appearance: bool,
    tick_position: TickPosition,
    rect: Rect,
    gesture: Option<Gesture>,
    pressed_region: Region,
    hover_region: Region,
    hover_handle: Option<Handle>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: usize,
    redraw_requested: bool,
}

impl fmt::Debug for RangeSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSlider")
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("low", &self.low)
            .field("high", &self.high)
            .field("orientation", &self.orientation)
            .field("state", &self.drag_state())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RangeSlider {
    /// Create a slider over `[minimum, maximum]` with the band spanning the
    /// whole range. Requires `minimum <= maximum`.
    pub fn new(minimum: i32, maximum: i32) -> Self {
        debug_assert!(minimum <= maximum, "range slider needs minimum <= maximum");
        Self {
            minimum,
            maximum,
            low: minimum,
            high: maximum,
            orientation: Orientation::Horizontal,
            inverted_appearance: false,
            tick_position: TickPosition::NoTicks,
            rect: Rect::default(),
            gesture: None,
            pressed_region: Region::None,
            hover_region: Region::None,
            hover_handle: None,
            listeners: Vec::new(),
            next_subscription: 0,
            redraw_requested: true,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_inverted_appearance(mut self, inverted: bool) -> Self {
        self.inverted_appearance = inverted;
        self
    }

    pub fn with_tick_position(mut self, tick_position: TickPosition) -> Self {
        self.tick_position = tick_position;
        self
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn tick_position(&self) -> TickPosition {
        self.tick_position
    }

    pub fn low(&self) -> i32 {
        self.low
    }

    /// Store `low` as given, notify, request a redraw
    pub fn set_low(&mut self, low: i32) {
        self.low = low;
        self.notify(SliderEvent::LowChanged(low));
        self.redraw_requested = true;
    }

    pub fn high(&self) -> i32 {
        self.high
    }

    /// Store `high` as given, notify, request a redraw
    pub fn set_high(&mut self, high: i32) {
        self.high = high;
        self.notify(SliderEvent::HighChanged(high));
        self.redraw_requested = true;
    }

    /// Widget rectangle assigned by the host layout
    pub fn set_rect(&mut self, rect: Rect) {
        if self.rect != rect {
            self.rect = rect;
            self.redraw_requested = true;
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Vertical sliders run bottom-up unless inverted; horizontal ones run
    /// left to right unless inverted.
    pub fn upside_down(&self) -> bool {
        match self.orientation {
            Orientation::Horizontal => self.inverted_appearance,
            Orientation::Vertical => !self.inverted_appearance,
        }
    }

    pub fn drag_state(&self) -> DragState {
        match self.gesture {
            None => DragState::Idle,
            Some(Gesture { handle: ActiveHandle::Low, .. }) => DragState::DraggingLow,
            Some(Gesture { handle: ActiveHandle::High, .. }) => DragState::DraggingHigh,
            Some(Gesture { handle: ActiveHandle::Both, .. }) => DragState::DraggingBoth,
        }
    }

    pub fn active_handle(&self) -> Option<ActiveHandle> {
        self.gesture.map(|g| g.handle)
    }

    pub fn drag_anchor(&self) -> Option<i32> {
        self.gesture.map(|g| g.anchor)
    }

    pub fn pressed_region(&self) -> Region {
        self.pressed_region
    }

    pub fn hover_region(&self) -> Region {
        self.hover_region
    }

    pub fn hover_handle(&self) -> Option<Handle> {
        self.hover_handle
    }

    /// Register a listener for band notifications
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SliderEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: SliderEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Returns and clears the pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Style option describing the handle at `value`
    pub fn style_option(&self, value: i32) -> StyleOption {
        StyleOption {
            rect: self.rect,
            minimum: self.minimum,
            maximum: self.maximum,
            slider_position: value,
            orientation: self.orientation,
            upside_down: self.upside_down(),
            tick_position: self.tick_position,
        }
    }

    fn handle_value(&self, handle: Handle) -> i32 {
        match handle {
            Handle::Low => self.low,
            Handle::High => self.high,
        }
    }

    fn pick(&self, point: Point) -> i32 {
        match self.orientation {
            Orientation::Horizontal => point.x,
            Orientation::Vertical => point.y,
        }
    }

    /// Range value under `point`, clamped to `[minimum, maximum]`.
    ///
    /// The usable span is the groove minus one handle length, so the handle
    /// stays on the groove at both ends.
    pub fn value_at<S: SliderStyle + ?Sized>(&self, style: &S, point: Point) -> i32 {
        let opt = self.style_option(self.low);
        let groove = style.sub_control_rect(&opt, Region::Groove);
        let handle = style.sub_control_rect(&opt, Region::Handle);
        let (slider_min, slider_max) = match self.orientation {
            Orientation::Horizontal => (groove.x, groove.right() - handle.width + 1),
            Orientation::Vertical => (groove.y, groove.bottom() - handle.height + 1),
        };
        style.value_from_position(
            self.minimum,
            self.maximum,
            self.pick(point) - slider_min,
            slider_max - slider_min,
            opt.upside_down,
        )
    }

    /// Handle under `point`; the low handle wins where both overlap
    pub fn handle_at<S: SliderStyle + ?Sized>(&self, style: &S, point: Point) -> Option<Handle> {
        [Handle::Low, Handle::High].into_iter().find(|&h| {
            let opt = self.style_option(self.handle_value(h));
            style.hit_test(&opt, point) == Region::Handle
        })
    }

    /// Start a gesture. A press during an unfinished gesture discards it
    /// and starts over.
    pub fn pointer_down<S: SliderStyle + ?Sized>(&mut self, style: &S, point: Point) -> DragState {
        if self.gesture.is_some() {
            log::debug!(target: "range_slider", "pointer down during gesture, restarting");
            self.gesture = None;
        }
        let anchor = self.value_at(style, point);
        let handle = match self.handle_at(style, point) {
            Some(Handle::Low) => ActiveHandle::Low,
            Some(Handle::High) => ActiveHandle::High,
            None => ActiveHandle::Both,
        };
        self.begin_drag(handle, anchor);
        self.gesture = Some(Gesture { handle, anchor, point: Some(point) });
        self.drag_state()
    }

    /// Start a gesture from a range value instead of a pixel position
    pub fn begin_drag(&mut self, handle: ActiveHandle, anchor: i32) {
        self.gesture = Some(Gesture { handle, anchor, point: None });
        self.pressed_region = Region::Handle;
        self.redraw_requested = true;
    }

    /// Drag step while pressed, hover tracking otherwise.
    ///
    /// A drag event at the same pixel as the previous one is not a move and
    /// is dropped. Returns true when the band was updated.
    pub fn pointer_move<S: SliderStyle + ?Sized>(&mut self, style: &S, point: Point) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            self.update_hover(style, point);
            return false;
        };
        if gesture.point == Some(point) {
            return false;
        }
        gesture.point = Some(point);
        let new_pos = self.value_at(style, point);
        self.drag_to(new_pos)
    }

    /// Apply one drag step for the pointer value `new_pos`.
    pub fn drag_to(&mut self, mut new_pos: i32) -> bool {
        let Some(gesture) = self.gesture else {
            return false;
        };
        match gesture.handle {
            ActiveHandle::Both => {
                // Widened: set_low/set_high may have stored any i32
                let (min, max) = (i64::from(self.minimum), i64::from(self.maximum));
                let offset = i64::from(new_pos) - i64::from(gesture.anchor);
                let mut low = i64::from(self.low) + offset;
                let mut high = i64::from(self.high) + offset;
                if low < min {
                    let diff = min - low;
                    low += diff;
                    high += diff;
                }
                if high > max {
                    let diff = max - high;
                    low += diff;
                    high += diff;
                }
                self.low = saturate(low);
                self.high = saturate(high);
                self.notify(SliderEvent::LowChanged(self.low));
                self.notify(SliderEvent::HighChanged(self.high));
            }
            ActiveHandle::Low => {
                if new_pos >= self.high {
                    new_pos = self.high.saturating_sub(1);
                }
                self.low = new_pos;
                self.notify(SliderEvent::LowChanged(self.low));
            }
            ActiveHandle::High => {
                if new_pos <= self.low {
                    new_pos = self.low.saturating_add(1);
                }
                self.high = new_pos;
                self.notify(SliderEvent::HighChanged(self.high));
            }
        }
        // Both-drags rehome on the raw pointer value, not the shifted band
        self.gesture = Some(Gesture { anchor: new_pos, ..gesture });
        self.redraw_requested = true;
        self.notify(SliderEvent::Moved(new_pos));
        true
    }

    /// End the gesture
    pub fn pointer_up(&mut self) {
        if self.gesture.take().is_some() || self.pressed_region != Region::None {
            self.pressed_region = Region::None;
            self.redraw_requested = true;
        }
    }

    /// Pointer left the widget
    pub fn pointer_leave(&mut self) {
        if self.hover_region != Region::None || self.hover_handle.is_some() {
            self.hover_region = Region::None;
            self.hover_handle = None;
            self.redraw_requested = true;
        }
    }

    fn update_hover<S: SliderStyle + ?Sized>(&mut self, style: &S, point: Point) {
        let handle = self.handle_at(style, point);
        let region = match handle {
            Some(h) => style.hit_test(&self.style_option(self.handle_value(h)), point),
            None => style.hit_test(&self.style_option(self.low), point),
        };
        if region != self.hover_region || handle != self.hover_handle {
            self.hover_region = region;
            self.hover_handle = handle;
            self.redraw_requested = true;
        }
    }

    fn is_pressed(&self, handle: Handle) -> bool {
        matches!(
            (self.active_handle(), handle),
            (Some(ActiveHandle::Both), _)
                | (Some(ActiveHandle::Low), Handle::Low)
                | (Some(ActiveHandle::High), Handle::High)
        )
    }

    /// Paint passes in drawing order, low handle first.
    ///
    /// Only the low pass draws the groove so it is not painted over the
    /// low handle again.
    pub fn paint_passes(&self) -> [HandlePaint; 2] {
        let ticks = self.tick_position != TickPosition::NoTicks;
        let pass = |handle: Handle| {
            let sunken = self.is_pressed(handle);
            let active_region = if sunken {
                self.pressed_region
            } else if self.gesture.is_none() && self.hover_handle == Some(handle) {
                self.hover_region
            } else {
                Region::None
            };
            HandlePaint {
                handle,
                option: self.style_option(self.handle_value(handle)),
                draw_groove: handle == Handle::Low,
                draw_ticks: ticks,
                active_region,
                sunken,
            }
        };
        [pass(Handle::Low), pass(Handle::High)]
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slider_style::FlatStyle;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 114px wide with 14px handles: one pixel per value over 150..=250
    fn still_slider() -> RangeSlider {
        let mut slider = RangeSlider::new(150, 250);
        slider.set_rect(Rect::new(0, 0, 114, 20));
        slider.set_low(178);
        slider.set_high(190);
        slider
    }

    fn recorder(slider: &mut RangeSlider) -> Rc<RefCell<Vec<SliderEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        slider.subscribe(move |ev| sink.borrow_mut().push(*ev));
        events
    }

    fn at(x: i32) -> Point {
        Point::new(x, 10)
    }

    #[test]
    fn test_new_spans_full_range() {
        let slider = RangeSlider::new(150, 250);
        assert_eq!((slider.low(), slider.high()), (150, 250));
        assert_eq!(slider.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_programmatic_set_is_not_clamped() {
        let mut slider = still_slider();
        let events = recorder(&mut slider);
        slider.set_low(240);
        slider.set_high(160);
        assert_eq!((slider.low(), slider.high()), (240, 160));
        slider.set_high(240);
        assert_eq!(slider.high(), slider.low());
        assert_eq!(
            *events.borrow(),
            vec![
                SliderEvent::LowChanged(240),
                SliderEvent::HighChanged(160),
                SliderEvent::HighChanged(240),
            ]
        );
    }

    #[test]
    fn test_set_requests_redraw() {
        let mut slider = still_slider();
        let _ = slider.take_redraw_request();
        assert!(!slider.take_redraw_request());
        slider.set_low(180);
        assert!(slider.take_redraw_request());
    }

    #[test]
    fn test_drag_after_extreme_programmatic_values() {
        let mut slider = still_slider();
        slider.set_high(i32::MAX);
        slider.begin_drag(ActiveHandle::Both, 180);
        assert!(slider.drag_to(190));
        assert_eq!(slider.high(), 250);
        assert_eq!(i64::from(slider.high()) - i64::from(slider.low()), i64::from(i32::MAX) - 178);
        slider.pointer_up();

        slider.set_low(i32::MIN);
        slider.begin_drag(ActiveHandle::Both, 200);
        slider.drag_to(150);
        assert_eq!((slider.low(), slider.high()), (i32::MIN, 250));
    }

    #[test]
    fn test_single_handle_drag_at_i32_limits() {
        let mut slider = still_slider();
        slider.set_high(i32::MIN);
        slider.begin_drag(ActiveHandle::Low, 178);
        slider.drag_to(200);
        assert_eq!(slider.low(), i32::MIN);
        slider.pointer_up();

        slider.set_low(i32::MAX);
        slider.begin_drag(ActiveHandle::High, 190);
        slider.drag_to(160);
        assert_eq!(slider.high(), i32::MAX);
    }

    #[test]
    fn test_drag_event_without_movement_is_dropped() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        let events = recorder(&mut slider);
        slider.pointer_down(&style, at(30));
        assert!(!slider.pointer_move(&style, at(30)));
        assert!(slider.pointer_move(&style, at(35)));
        slider.take_redraw_request();
        assert!(!slider.pointer_move(&style, at(35)));
        assert!(!slider.take_redraw_request());
        assert_eq!(
            *events.borrow(),
            vec![SliderEvent::LowChanged(185), SliderEvent::Moved(185)]
        );
    }

    #[test]
    fn test_low_drag_clamps_below_high() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        let events = recorder(&mut slider);
        // low handle covers x 28..=41
        assert_eq!(slider.pointer_down(&style, at(30)), DragState::DraggingLow);
        assert!(slider.pointer_move(&style, at(45)));
        assert_eq!(slider.low(), 189);
        assert_eq!(slider.high(), 190);
        assert_eq!(
            *events.borrow(),
            vec![SliderEvent::LowChanged(189), SliderEvent::Moved(189)]
        );
    }

    #[test]
    fn test_high_drag_clamps_above_low() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        // high handle covers x 40..=53, low handle wins at 40..=41
        assert_eq!(slider.pointer_down(&style, at(50)), DragState::DraggingHigh);
        slider.pointer_move(&style, at(0));
        assert_eq!((slider.low(), slider.high()), (178, 179));
        slider.pointer_move(&style, at(80));
        assert_eq!(slider.high(), 230);
    }

    #[test]
    fn test_overlapping_handles_pick_low() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        assert_eq!(slider.pointer_down(&style, at(41)), DragState::DraggingLow);
        slider.pointer_up();
        slider.set_low(200);
        slider.set_high(201);
        assert_eq!(slider.handle_at(&style, at(55)), Some(Handle::Low));
    }

    #[test]
    fn test_track_press_drags_both() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        let events = recorder(&mut slider);
        assert_eq!(slider.pointer_down(&style, at(80)), DragState::DraggingBoth);
        assert_eq!(slider.drag_anchor(), Some(230));
        slider.pointer_move(&style, at(95));
        assert_eq!((slider.low(), slider.high()), (193, 205));
        assert_eq!(
            *events.borrow(),
            vec![
                SliderEvent::LowChanged(193),
                SliderEvent::HighChanged(205),
                SliderEvent::Moved(245),
            ]
        );
    }

    #[test]
    fn test_both_drag_by_value() {
        let mut slider = still_slider();
        slider.begin_drag(ActiveHandle::Both, 180);
        slider.drag_to(195);
        assert_eq!((slider.low(), slider.high()), (193, 205));
    }

    #[test]
    fn test_both_drag_clamps_at_minimum() {
        let mut slider = still_slider();
        slider.begin_drag(ActiveHandle::Both, 178);
        slider.drag_to(140);
        assert_eq!((slider.low(), slider.high()), (150, 162));
    }

    #[test]
    fn test_both_drag_clamps_at_maximum() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        // left of the low handle: anchor 155
        assert_eq!(slider.pointer_down(&style, at(5)), DragState::DraggingBoth);
        slider.pointer_move(&style, at(400));
        assert_eq!((slider.low(), slider.high()), (238, 250));
    }

    #[test]
    fn test_both_drag_anchor_rehomes_on_raw_value() {
        let mut slider = still_slider();
        slider.begin_drag(ActiveHandle::Both, 178);
        slider.drag_to(140);
        assert_eq!((slider.low(), slider.high()), (150, 162));
        assert_eq!(slider.drag_anchor(), Some(140));
        slider.drag_to(145);
        assert_eq!((slider.low(), slider.high()), (155, 167));
    }

    #[test]
    fn test_pointer_up_returns_to_idle() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        slider.pointer_down(&style, at(30));
        slider.pointer_up();
        assert_eq!(slider.drag_state(), DragState::Idle);
        assert_eq!(slider.pressed_region(), Region::None);
        // moves after release only hover
        assert!(!slider.pointer_move(&style, at(90)));
        assert_eq!(slider.low(), 178);
    }

    #[test]
    fn test_second_press_restarts_gesture() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        assert_eq!(slider.pointer_down(&style, at(80)), DragState::DraggingBoth);
        assert_eq!(slider.pointer_down(&style, at(30)), DragState::DraggingLow);
        slider.pointer_move(&style, at(20));
        assert_eq!((slider.low(), slider.high()), (170, 190));
    }

    #[test]
    fn test_idle_move_updates_hover_only() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        let events = recorder(&mut slider);
        slider.pointer_move(&style, at(50));
        assert_eq!(slider.hover_handle(), Some(Handle::High));
        assert_eq!(slider.hover_region(), Region::Handle);
        slider.pointer_move(&style, at(100));
        assert_eq!(slider.hover_handle(), None);
        assert_eq!(slider.hover_region(), Region::Groove);
        slider.pointer_leave();
        assert_eq!(slider.hover_region(), Region::None);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_drag_without_gesture_is_ignored() {
        let mut slider = still_slider();
        assert!(!slider.drag_to(200));
        assert_eq!(slider.low(), 178);
    }

    #[test]
    fn test_unsubscribe() {
        let mut slider = still_slider();
        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        let id = slider.subscribe(move |_| *sink.borrow_mut() += 1);
        slider.set_low(160);
        assert!(slider.unsubscribe(id));
        assert!(!slider.unsubscribe(id));
        slider.set_low(170);
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn test_paint_passes_draw_groove_once() {
        let slider = still_slider().with_tick_position(TickPosition::Below);
        let [low, high] = slider.paint_passes();
        assert!(low.draw_groove);
        assert!(!high.draw_groove);
        assert!(low.draw_ticks && high.draw_ticks);
        assert_eq!(low.option.slider_position, 178);
        assert_eq!(high.option.slider_position, 190);
    }

    #[test]
    fn test_paint_passes_pressed_and_hover() {
        let style = FlatStyle::default();
        let mut slider = still_slider();
        slider.pointer_move(&style, at(50));
        let [low, high] = slider.paint_passes();
        assert_eq!(low.active_region, Region::None);
        assert_eq!(high.active_region, Region::Handle);
        assert!(!high.sunken);

        slider.pointer_down(&style, at(30));
        let [low, high] = slider.paint_passes();
        assert!(low.sunken && !high.sunken);
        assert_eq!(low.active_region, Region::Handle);
        assert_eq!(high.active_region, Region::None);

        slider.pointer_down(&style, at(80));
        let [low, high] = slider.paint_passes();
        assert!(low.sunken && high.sunken);
    }

    #[test]
    fn test_vertical_slider_maps_top_to_maximum() {
        let style = FlatStyle::default();
        let mut slider = RangeSlider::new(150, 250).with_orientation(Orientation::Vertical);
        slider.set_rect(Rect::new(0, 0, 20, 114));
        assert_eq!(slider.value_at(&style, Point::new(10, 0)), 250);
        assert_eq!(slider.value_at(&style, Point::new(10, 100)), 150);
        let inverted = RangeSlider::new(150, 250)
            .with_orientation(Orientation::Vertical)
            .with_inverted_appearance(true);
        assert!(!inverted.upside_down());
    }

    fn band() -> impl Strategy<Value = (i32, i32)> {
        (150..250i32).prop_flat_map(|low| (Just(low), (low + 1)..=250))
    }

    proptest! {
        #[test]
        fn prop_programmatic_last_write_wins(writes in prop::collection::vec((any::<bool>(), 150..=250i32), 1..20)) {
            let mut slider = RangeSlider::new(150, 250);
            let (mut low, mut high) = (150, 250);
            for (is_low, v) in writes {
                if is_low { slider.set_low(v); low = v; } else { slider.set_high(v); high = v; }
            }
            prop_assert_eq!((slider.low(), slider.high()), (low, high));
        }

        #[test]
        fn prop_low_drag_stays_below_high((low, high) in band(), moves in prop::collection::vec(150..=250i32, 1..30)) {
            let mut slider = RangeSlider::new(150, 250);
            slider.set_low(low);
            slider.set_high(high);
            slider.begin_drag(ActiveHandle::Low, low);
            for m in moves {
                slider.drag_to(m);
                prop_assert!(slider.low() < slider.high());
                prop_assert!(slider.low() >= 150);
                prop_assert_eq!(slider.high(), high);
            }
        }

        #[test]
        fn prop_high_drag_stays_above_low((low, high) in band(), moves in prop::collection::vec(150..=250i32, 1..30)) {
            let mut slider = RangeSlider::new(150, 250);
            slider.set_low(low);
            slider.set_high(high);
            slider.begin_drag(ActiveHandle::High, high);
            for m in moves {
                slider.drag_to(m);
                prop_assert!(slider.high() > slider.low());
                prop_assert!(slider.high() <= 250);
                prop_assert_eq!(slider.low(), low);
            }
        }

        #[test]
        fn prop_both_drag_keeps_gap_and_bounds((low, high) in band(), xs in prop::collection::vec(-60..200i32, 1..30), press in 0..114i32) {
            let style = FlatStyle::default();
            let mut slider = RangeSlider::new(150, 250);
            slider.set_rect(Rect::new(0, 0, 114, 20));
            slider.set_low(low);
            slider.set_high(high);
            let gap = high - low;
            slider.begin_drag(ActiveHandle::Both, slider.value_at(&style, Point::new(press, 10)));
            for x in xs {
                slider.pointer_move(&style, Point::new(x, 10));
                prop_assert_eq!(slider.high() - slider.low(), gap);
                prop_assert!(slider.low() >= 150);
                prop_assert!(slider.high() <= 250);
            }
        }

        #[test]
        fn prop_pixel_mapping_is_monotonic(p1 in -50..300i32, p2 in -50..300i32, width in 20..400i32, inverted in any::<bool>()) {
            let style = FlatStyle::default();
            let mut slider = RangeSlider::new(150, 250).with_inverted_appearance(inverted);
            slider.set_rect(Rect::new(0, 0, width, 20));
            let (a, b) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            let va = slider.value_at(&style, Point::new(a, 10));
            let vb = slider.value_at(&style, Point::new(b, 10));
            prop_assert!((150..=250).contains(&va) && (150..=250).contains(&vb));
            if inverted { prop_assert!(va >= vb); } else { prop_assert!(va <= vb); }
        }

        #[test]
        fn prop_vertical_pixel_mapping_is_monotonic(p1 in -50..300i32, p2 in -50..300i32, height in 20..400i32, inverted in any::<bool>()) {
            let style = FlatStyle::default();
            let mut slider = RangeSlider::new(150, 250)
                .with_orientation(Orientation::Vertical)
                .with_inverted_appearance(inverted);
            slider.set_rect(Rect::new(0, 0, 20, height));
            prop_assert_eq!(slider.upside_down(), !inverted);
            let (a, b) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            let va = slider.value_at(&style, Point::new(10, a));
            let vb = slider.value_at(&style, Point::new(10, b));
            prop_assert!((150..=250).contains(&va) && (150..=250).contains(&vb));
            if slider.upside_down() { prop_assert!(va >= vb); } else { prop_assert!(va <= vb); }
        }
    }
}
