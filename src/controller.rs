/// Still controller
///
/// Polls the board one field at a time, round-robin, and pushes what comes
/// back into the range slider and the panel readings. A second, slower
/// timer re-establishes the link when it has dropped. Everything runs on
/// the caller's thread: the GUI calls `tick` once per frame.

use std::fmt;
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use crate::config_loader::StillSettings;
use crate::range_slider::{RangeSlider, SliderEvent, SubscriptionId};
use crate::still_link::{reconnect, StillLink};
use crate::still_protocol::{parse_line, Field, LineBuffer, Response, Switch};

/// Deadline timer driven by the frame loop
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, next_due: now + interval }
    }

    /// True once per elapsed interval; rearms from `now`
    pub fn due(&mut self, now: Instant) -> bool {
        if now >= self.next_due {
            self.next_due = now + self.interval;
            true
        } else {
            false
        }
    }

    pub fn time_until(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Connected => f.write_str("Connected"),
            LinkStatus::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// Value with a degree sign, as shown on the panel labels
pub fn degrees(value: impl fmt::Display) -> String {
    format!("{}\u{00B0}", value)
}

pub struct StillController<L: StillLink> {
    link: L,
    next_field: usize,
    lines: LineBuffer,
    poll_timer: Ticker,
    check_timer: Ticker,
    status: LinkStatus,
    temperature_label: String,
    low_label: String,
    high_label: String,
    burner: Switch,
    pump: Switch,
    slider_events: Receiver<SliderEvent>,
    subscription: SubscriptionId,
    messages: Vec<String>,
}

impl<L: StillLink> StillController<L> {
    /// Wire the controller to `slider`, seed the band from `settings`,
    /// connect, check the link and send the first request.
    pub fn start(link: L, settings: &StillSettings, slider: &mut RangeSlider, now: Instant) -> Self {
        let (tx, rx) = channel();
        let subscription = slider.subscribe(move |ev| {
            let _ = tx.send(*ev);
        });
        let mut controller = Self {
            link,
            next_field: 0,
            lines: LineBuffer::new(),
            poll_timer: Ticker::new(settings.poll_interval, now),
            check_timer: Ticker::new(settings.check_interval, now),
            status: LinkStatus::Disconnected,
            temperature_label: degrees(0),
            low_label: degrees(slider.low()),
            high_label: degrees(slider.high()),
            burner: Switch::Off,
            pump: Switch::On,
            slider_events: rx,
            subscription,
            messages: Vec::new(),
        };
        slider.set_low(settings.initial_low);
        slider.set_high(settings.initial_high);
        controller.sync_slider_events();

        if let Err(e) = reconnect(&mut controller.link) {
            log::warn!(target: "controller", "initial connect failed: {:#}", e);
            controller.note(format!("Connection failed: {:#}", e));
        }
        controller.check_connection();
        controller.poll(slider);
        controller
    }

    /// Run whichever timers are due
    pub fn tick(&mut self, now: Instant, slider: &mut RangeSlider) {
        self.sync_slider_events();
        if self.check_timer.due(now) {
            self.check_connection();
        }
        if self.poll_timer.due(now) {
            self.poll(slider);
        }
    }

    /// Time until the next timer fires, for scheduling repaints
    pub fn time_until_next_tick(&self, now: Instant) -> Duration {
        self.poll_timer.time_until(now).min(self.check_timer.time_until(now))
    }

    /// Fold pending slider notifications into the low/high labels
    pub fn sync_slider_events(&mut self) {
        while let Ok(event) = self.slider_events.try_recv() {
            match event {
                SliderEvent::LowChanged(v) => self.low_label = degrees(v),
                SliderEvent::HighChanged(v) => self.high_label = degrees(v),
                SliderEvent::Moved(_) => {}
            }
        }
    }

    /// Reopen the link if it has dropped. Returns whether it is open.
    pub fn check_connection(&mut self) -> bool {
        if self.link.is_open() {
            self.set_status(LinkStatus::Connected);
            return true;
        }
        self.set_status(LinkStatus::Disconnected);
        self.lines.clear();
        match reconnect(&mut self.link) {
            Ok(()) => {
                self.note(format!("Connected to {}", self.link.describe()));
                self.set_status(LinkStatus::Connected);
            }
            Err(e) => {
                log::warn!(target: "controller", "reconnect failed: {:#}", e);
            }
        }
        self.link.is_open()
    }

    /// Apply everything received since the last poll, then request the
    /// next field.
    pub fn poll(&mut self, slider: &mut RangeSlider) {
        if !self.link.is_open() {
            return;
        }
        match self.link.read_available() {
            Ok(bytes) => {
                for line in self.lines.push(&bytes) {
                    self.apply_line(&line, slider);
                }
            }
            Err(e) => {
                self.link_failed(e);
                return;
            }
        }
        self.request_next();
    }

    fn request_next(&mut self) {
        let field = Field::ALL[self.next_field];
        self.next_field = (self.next_field + 1) % Field::ALL.len();
        if let Err(e) = self.link.write_line(&field.request()) {
            self.link_failed(e);
        }
    }

    fn link_failed(&mut self, e: anyhow::Error) {
        log::warn!(target: "controller", "serial link error: {:#}", e);
        self.note(format!("Serial error: {:#}", e));
        if !self.link.is_open() {
            self.set_status(LinkStatus::Disconnected);
        }
    }

    /// Parse and apply one response line; bad lines are logged and skipped
    pub fn apply_line(&mut self, line: &str, slider: &mut RangeSlider) {
        match parse_line(line) {
            Ok(Some(response)) => {
                log::debug!(target: "controller", "{:?}", response);
                self.apply(response, slider);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!(target: "controller", "ignoring line {:?}: {:#}", line, e);
                self.note(format!("Ignored {:?}: {:#}", line, e));
            }
        }
    }

    pub fn apply(&mut self, response: Response, slider: &mut RangeSlider) {
        match response {
            Response::Temp(value) => self.temperature_label = degrees(value),
            Response::High(v) => slider.set_high(v),
            Response::Low(v) => slider.set_low(v),
            Response::Burner(state) => {
                if state != self.burner {
                    self.burner = state;
                    self.note(format!("Burner {}", state));
                }
            }
            Response::Pump(state) => {
                if state != self.pump {
                    self.pump = state;
                    self.note(format!("Pump {}", state));
                }
            }
        }
        self.sync_slider_events();
    }

    fn set_status(&mut self, status: LinkStatus) {
        if self.status != status {
            log::info!(target: "controller", "{}: {}", self.link.describe(), status);
            self.status = status;
        }
    }

    fn note(&mut self, message: String) {
        self.messages.push(message);
    }

    /// Messages for the panel log since the last call
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Stop listening to `slider`; the controller keeps its last labels
    pub fn detach(&mut self, slider: &mut RangeSlider) {
        slider.unsubscribe(self.subscription);
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn temperature_label(&self) -> &str {
        &self.temperature_label
    }

    pub fn low_label(&self) -> &str {
        &self.low_label
    }

    pub fn high_label(&self) -> &str {
        &self.high_label
    }

    pub fn burner(&self) -> Switch {
        self.burner
    }

    pub fn pump(&self) -> Switch {
        self.pump
    }

    /// Field the next poll will request
    pub fn next_field(&self) -> Field {
        Field::ALL[self.next_field]
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}
