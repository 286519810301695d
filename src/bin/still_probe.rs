/// Headless still probe
/// 
/// Polls every field through the same controller the GUI uses and prints
/// what the board answered.
/// 
/// Run with: cargo run --bin still_probe -- --rounds 2

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use still_control::config_loader;
use still_control::controller::{LinkStatus, StillController};
use still_control::range_slider::RangeSlider;
use still_control::still_link::{SerialLink, SerialSettings};
use still_control::still_protocol::Field;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    debug: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    port: Option<String>,
    /// Full Temp..Pump cycles to poll
    #[arg(long, default_value_t = 1)]
    rounds: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Still Probe");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    env_logger::Builder::from_default_env()
        .filter_level(if args.debug { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();

    let hostname = config_loader::current_hostname();
    let mut settings = config_loader::load_still_settings(args.config.as_deref(), &hostname)?;
    if let Some(port) = args.port {
        settings.serial_port = port;
    }

    println!("Connecting to still on {} at {} baud", settings.serial_port, settings.baud_rate);
    let mut slider = RangeSlider::new(settings.temp_min, settings.temp_max);
    let link = SerialLink::new(SerialSettings::new(settings.serial_port.clone(), settings.baud_rate));
    let mut controller = StillController::start(link, &settings, &mut slider, Instant::now());
    if controller.status() == LinkStatus::Disconnected {
        bail!("Could not open {}", settings.serial_port);
    }

    // Each poll reads the answer to the previous request
    let polls = args.rounds as usize * Field::ALL.len();
    for _ in 0..polls {
        std::thread::sleep(settings.poll_interval);
        controller.poll(&mut slider);
    }

    for msg in controller.take_messages() {
        println!("  {}", msg);
    }
    println!("Status:      {}", controller.status());
    println!("Temperature: {}", controller.temperature_label());
    println!("Band:        {} .. {}", controller.low_label(), controller.high_label());
    println!("Burner:      {}", controller.burner());
    println!("Pump:        {}", controller.pump());
    Ok(())
}
