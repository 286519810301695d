/// egui front end for `RangeSlider`
///
/// Feeds egui pointer input into the slider's state machine and paints its
/// paint passes with the current egui visuals. The slider itself stays
/// toolkit-free; this is the only place that knows about egui.

use egui::{pos2, vec2, Color32, Sense, Stroke};

use crate::range_slider::{DragState, RangeSlider};
use crate::slider_style::{FlatStyle, Orientation, Point, Rect, Region, SliderStyle, TickPosition};

pub struct RangeSliderWidget<'a> {
    slider: &'a mut RangeSlider,
    style: FlatStyle,
    thickness: f32,
    min_length: f32,
    tick_interval: i32,
}

impl<'a> RangeSliderWidget<'a> {
    pub fn new(slider: &'a mut RangeSlider) -> Self {
        Self {
            slider,
            style: FlatStyle::default(),
            thickness: 28.0,
            min_length: 160.0,
            tick_interval: 10,
        }
    }

    pub fn style(mut self, style: FlatStyle) -> Self {
        self.style = style;
        self
    }

    pub fn thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Value step between tick marks
    pub fn tick_interval(mut self, interval: i32) -> Self {
        self.tick_interval = interval.max(1);
        self
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (pressed, released, down, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
            )
        });

        if pressed && response.hovered() {
            if let Some(p) = pointer {
                self.slider.pointer_down(&self.style, to_point(p));
            }
        } else if self.slider.drag_state() != DragState::Idle {
            if let (true, Some(p)) = (down, pointer) {
                self.slider.pointer_move(&self.style, to_point(p));
            }
            if released || !down {
                self.slider.pointer_up();
            }
        } else {
            match response.hover_pos() {
                Some(p) => {
                    self.slider.pointer_move(&self.style, to_point(p));
                }
                None => self.slider.pointer_leave(),
            }
        }
    }

    fn paint(&self, ui: &egui::Ui) {
        let painter = ui.painter();
        let visuals = ui.visuals();
        for pass in self.slider.paint_passes() {
            if pass.draw_groove {
                let groove = self.style.sub_control_rect(&pass.option, Region::Groove);
                painter.rect_filled(to_egui_rect(groove), 3.0, visuals.widgets.inactive.bg_fill);
                painter.rect_filled(self.band_rect(groove), 3.0, visuals.selection.bg_fill);
            }
            if pass.draw_ticks {
                self.paint_ticks(painter, visuals.widgets.noninteractive.fg_stroke);
            }
            let handle = self.style.sub_control_rect(&pass.option, Region::Handle);
            let widget = if pass.sunken {
                &visuals.widgets.active
            } else if pass.active_region == Region::Handle {
                &visuals.widgets.hovered
            } else {
                &visuals.widgets.inactive
            };
            painter.rect(to_egui_rect(handle), widget.rounding, widget.bg_fill, widget.fg_stroke);
        }
    }

    /// Groove segment between the two handle centres
    fn band_rect(&self, groove: Rect) -> egui::Rect {
        let centre = |value: i32| {
            let r = self.style.sub_control_rect(&self.slider.style_option(value), Region::Handle);
            match self.slider.orientation() {
                Orientation::Horizontal => r.x as f32 + r.width as f32 / 2.0,
                Orientation::Vertical => r.y as f32 + r.height as f32 / 2.0,
            }
        };
        let (a, b) = (centre(self.slider.low()), centre(self.slider.high()));
        let (start, end) = (a.min(b), a.max(b));
        let g = to_egui_rect(groove);
        match self.slider.orientation() {
            Orientation::Horizontal => egui::Rect::from_x_y_ranges(start..=end, g.y_range()),
            Orientation::Vertical => egui::Rect::from_x_y_ranges(g.x_range(), start..=end),
        }
    }

    fn paint_ticks(&self, painter: &egui::Painter, stroke: Stroke) {
        let rect = self.slider.rect();
        let (before, after) = match self.slider.tick_position() {
            TickPosition::NoTicks => return,
            TickPosition::Above => (true, false),
            TickPosition::Below => (false, true),
            TickPosition::BothSides => (true, true),
        };
        let len = self.style.tick_length as f32;
        for value in tick_values(self.slider.minimum(), self.slider.maximum(), self.tick_interval) {
            let r = self.style.sub_control_rect(&self.slider.style_option(value), Region::Handle);
            match self.slider.orientation() {
                Orientation::Horizontal => {
                    let x = r.x as f32 + r.width as f32 / 2.0;
                    if before {
                        let y = rect.y as f32;
                        painter.line_segment([pos2(x, y), pos2(x, y + len)], stroke);
                    }
                    if after {
                        let y = (rect.y + rect.height) as f32;
                        painter.line_segment([pos2(x, y - len), pos2(x, y)], stroke);
                    }
                }
                Orientation::Vertical => {
                    let y = r.y as f32 + r.height as f32 / 2.0;
                    if before {
                        let x = rect.x as f32;
                        painter.line_segment([pos2(x, y), pos2(x + len, y)], stroke);
                    }
                    if after {
                        let x = (rect.x + rect.width) as f32;
                        painter.line_segment([pos2(x - len, y), pos2(x, y)], stroke);
                    }
                }
            }
        }
    }
}

impl egui::Widget for RangeSliderWidget<'_> {
    fn ui(mut self, ui: &mut egui::Ui) -> egui::Response {
        let desired = match self.slider.orientation() {
            Orientation::Horizontal => vec2(ui.available_width().max(self.min_length), self.thickness),
            Orientation::Vertical => vec2(self.thickness, ui.available_height().max(self.min_length)),
        };
        let (rect, mut response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
        self.slider.set_rect(from_egui_rect(rect));

        let before = (self.slider.low(), self.slider.high());
        self.handle_input(ui, &response);
        if (self.slider.low(), self.slider.high()) != before {
            response.mark_changed();
        }
        if self.slider.take_redraw_request() {
            ui.ctx().request_repaint();
        }
        if ui.is_rect_visible(rect) {
            self.paint(ui);
        }
        response
    }
}

/// Tick values from `min` to `max` inclusive, `interval` apart
pub fn tick_values(min: i32, max: i32, interval: i32) -> impl Iterator<Item = i32> {
    (min..=max).step_by(interval.max(1) as usize)
}

pub fn to_point(p: egui::Pos2) -> Point {
    Point::new(p.x.round() as i32, p.y.round() as i32)
}

pub fn from_egui_rect(r: egui::Rect) -> Rect {
    let min = to_point(r.min);
    let max = to_point(r.max);
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

pub fn to_egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_size(pos2(r.x as f32, r.y as f32), vec2(r.width as f32, r.height as f32))
}

/// Indicator colour for an on/off reading
pub fn switch_color(on: bool) -> Color32 {
    if on {
        Color32::from_rgb(230, 60, 30)
    } else {
        Color32::from_rgb(120, 120, 120)
    }
}
