//! Main application entry point.

use pixmark_core::config::FileConfigStore;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Pixmark");

    let job = match pixmark_app::parse_args(std::env::args().skip(1)) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let mut store = match FileConfigStore::default_location() {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pixmark_app::run(&job, &mut store) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Export failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
