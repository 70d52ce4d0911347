// src/main.rs
mod cli;
mod tui;

use clap::Parser;
use salon_booking::config;
use salon_booking::error::AppError;
use salon_booking::SalonContext;

fn main() -> Result<(), AppError> {
    env_logger::init();
    log::info!("Starting salon booking application");

    let cli_args = cli::Cli::parse();
    let config = config::load_config();

    let mut ctx = if cli_args.in_memory {
        log::info!("Using in-memory storage; nothing will be saved.");
        SalonContext::in_memory()
    } else {
        let data_dir = cli_args
            .data_dir
            .clone()
            .unwrap_or_else(|| config.resolve_data_dir());
        SalonContext::open(&data_dir).map_err(|e| {
            log::error!("Failed to open data directory {:?}: {}", data_dir, e);
            eprintln!("Error: {}", e);
            e
        })?
    };

    match cli::handle_cli_command(cli_args.command, &mut ctx, &config) {
        Ok(true) => {
            if let Err(e) = tui::run_tui(&mut ctx, &config) {
                log::error!("Application TUI error: {:#?}", e);
                eprintln!("Error: {}", e);
                return Err(e);
            }
        }
        Ok(false) => {
            log::info!("CLI command processed.");
        }
        Err(e) => {
            log::error!("Application failed: {:#?}", e);
            eprintln!("Error: {}", e);
            return Err(e);
        }
    }

    log::info!("Salon booking application finished successfully.");
    Ok(())
}
