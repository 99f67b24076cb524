//! # Block World Entry Point
//!
//! Generates a world and reports on it. Pass a JSON configuration file as the
//! only argument to override the defaults.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match block_world::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
