#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use clap::Parser;
use eframe::NativeOptions;

use quanta_risk::config::APP_STATE_PATH;
use quanta_risk::ui::ui_text::UI_TEXT;
use quanta_risk::{Cli, SeriesSource, build_source, run_app};

fn main() -> eframe::Result {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    if let Err(e) = args.validate() {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    // C. Series source chain
    let source = match build_source(&args) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to set up the series source: {:#}", e);
            std::process::exit(1);
        }
    };
    log::info!("Series source: {}", source.signature());

    // D. Run Native App
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(APP_STATE_PATH)),
        ..Default::default()
    };

    eframe::run_native(
        UI_TEXT.window_title,
        options,
        Box::new(move |cc| Ok(run_app(cc, source, &args))),
    )
}
