//! # Storefront Entry Point
//!
//! ```text
//! storefront cart add <id> --quantity 2
//!       │
//!       ▼
//! main.rs ──► init tracing, parse args
//!       │
//!       ▼
//! lib.rs ───► App::start ──► execute ──► shutdown (flush cart writes)
//!       │
//!       ▼
//! stdout: pretty JSON result        exit 0
//!         or { code, message }      exit 1
//! ```

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use storefront_lib::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_lib::init_tracing();

    let cli = Cli::parse();

    match storefront_lib::run(cli.command).await {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            print_json(&err);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to render output: {}", e),
    }
}
