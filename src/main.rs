//! Ghosthand CLI - screenshot calibration entry point
//!
//! Runs slot-grid detection over a saved screenshot and persists the
//! resulting calibration. Bot scripts consume the saved config; this
//! binary never injects input.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use ghosthand::config::SlotGridConfig;
use ghosthand::vision::{Frame, SlotDetector};

const DEFAULT_CONFIG_PATH: &str = "config/inventory_config.json";

fn main() -> ExitCode {
    println!("Ghosthand - humanized input automation core");
    println!("===========================================");
    println!();

    let mut args = env::args().skip(1);
    let Some(screenshot) = args.next() else {
        let config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        println!("Usage: ghosthand <screenshot.png> [config.json]");
        println!();
        println!("Current calibration ({}):", config_path.display());
        print_config(&SlotGridConfig::load(&config_path));
        return ExitCode::SUCCESS;
    };
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let image = match image::open(&screenshot) {
        Ok(image) => image.to_rgb8(),
        Err(e) => {
            eprintln!("Failed to load {screenshot}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let frame = Frame::from_image(image);
    let detection = SlotDetector::default().detect(&frame);

    match detection.fallback {
        None => println!("Calibration successful, detected {} slots.", detection.slots_found),
        Some(reason) => println!("Unable to auto-detect slots ({reason}), using default values."),
    }
    print_config(&detection.config);

    if let Err(e) = detection.config.save(&config_path) {
        eprintln!("Failed to save calibration: {e}");
        return ExitCode::FAILURE;
    }

    println!();
    println!("Calibration saved to {}", config_path.display());
    ExitCode::SUCCESS
}

fn print_config(config: &SlotGridConfig) {
    println!("  Base coordinates: ({}, {})", config.base_x, config.base_y);
    println!(
        "  Spacing: {}px horizontal, {}px vertical",
        config.x_spacing, config.y_spacing
    );
}
