/// Still control panel
/// 
/// Run with: cargo run --bin still_gui -- [--debug] [--port /dev/ttyUSB0]

use eframe::egui;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use still_control::config_loader::{self, StillSettings};
use still_control::controller::{LinkStatus, StillController};
use still_control::range_slider::RangeSlider;
use still_control::slider_style::TickPosition;
use still_control::slider_widget::{switch_color, RangeSliderWidget};
use still_control::still_link::{SerialLink, SerialSettings, StillLink};
use still_control::still_protocol::Switch;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    debug: bool,
    /// Settings file, defaults to still.yaml next to Cargo.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Serial port, overrides the settings file
    #[arg(long)]
    port: Option<String>,
    /// Start in a normal window instead of maximised
    #[arg(long)]
    windowed: bool,
}

/// Keep the message log from growing without bound
const MAX_MESSAGE_LEN: usize = 10000;

struct StillGUI {
    slider: RangeSlider,
    controller: StillController<SerialLink>,
    message: String,
}

impl StillGUI {
    fn new(settings: &StillSettings) -> Self {
        let mut slider = RangeSlider::new(settings.temp_min, settings.temp_max)
            .with_tick_position(TickPosition::Below);
        let link = SerialLink::new(SerialSettings::new(settings.serial_port.clone(), settings.baud_rate));
        let controller = StillController::start(link, settings, &mut slider, Instant::now());
        let mut gui = Self {
            slider,
            controller,
            message: String::new(),
        };
        gui.collect_messages();
        gui
    }

    /// Append message
    fn append_message(&mut self, msg: &str) {
        if !self.message.is_empty() {
            self.message.push('\n');
        }
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.message.push_str(&format!("[{}] {}", stamp, msg));
        if self.message.len() > MAX_MESSAGE_LEN {
            let cut = self.message.len() - MAX_MESSAGE_LEN / 2;
            let cut = self.message[cut..].find('\n').map(|i| cut + i + 1).unwrap_or(cut);
            self.message = self.message.split_off(cut);
        }
    }

    fn collect_messages(&mut self) {
        for msg in self.controller.take_messages() {
            self.append_message(&msg);
        }
    }
}

/// Round lamp plus caption for a burner/pump reading
fn indicator(ui: &mut egui::Ui, name: &str, state: Switch) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 8.0, switch_color(state == Switch::On));
        ui.label(format!("{} {}", name, state));
    });
}

impl eframe::App for StillGUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.tick(now, &mut self.slider);
        self.collect_messages();
        // Wake up for the next poll even without input
        let wait = self.controller.time_until_next_tick(now).max(Duration::from_millis(16));
        ctx.request_repaint_after(wait);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let color = match self.controller.status() {
                    LinkStatus::Connected => egui::Color32::from_rgb(0, 200, 0),
                    LinkStatus::Disconnected => egui::Color32::from_rgb(255, 0, 0),
                };
                ui.colored_label(color, self.controller.status().to_string());
                ui.separator();
                ui.label(self.controller.link().describe());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Still Control");

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Temperature:");
                ui.label(
                    egui::RichText::new(self.controller.temperature_label())
                        .size(48.0)
                        .strong(),
                );
            });

            ui.separator();

            // Target band
            ui.heading("Target Band");
            ui.horizontal(|ui| {
                ui.label(format!("Low {}", self.controller.low_label()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("High {}", self.controller.high_label()));
                });
            });
            ui.add(RangeSliderWidget::new(&mut self.slider).thickness(36.0));
            // Show drag results in this frame rather than the next
            self.controller.sync_slider_events();

            ui.separator();

            ui.heading("Burner / Pump");
            ui.horizontal(|ui| {
                indicator(ui, "Burner", self.controller.burner());
                ui.add_space(24.0);
                indicator(ui, "Pump", self.controller.pump());
            });

            ui.separator();

            // Display messages (debug log style)
            ui.collapsing("Messages", |ui| {
                egui::ScrollArea::vertical()
                    .max_height(300.0)
                    .auto_shrink([false; 2])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut self.message)
                                .desired_width(f32::INFINITY)
                                .interactive(false)
                        );
                    });
            });
        });
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(if args.debug { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();

    let hostname = config_loader::current_hostname();
    let mut settings = match config_loader::load_still_settings(args.config.as_deref(), &hostname) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("✗ Failed to load still settings for host '{}': {:#}", hostname, e);
            std::process::exit(1);
        }
    };
    if let Some(port) = args.port {
        settings.serial_port = port;
    }

    let gui = StillGUI::new(&settings);
    // Still launch the GUI; the connection check keeps retrying
    if gui.controller.status() == LinkStatus::Disconnected {
        eprintln!("WARNING: Failed to connect to still at {}", settings.serial_port);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Still Control")
            .with_inner_size([800.0, 480.0])
            .with_maximized(!args.windowed),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Still Control",
        options,
        Box::new(|_cc| Box::new(gui)),
    ) {
        eprintln!("✗ GUI error: {}", e);
        std::process::exit(1);
    }
}
