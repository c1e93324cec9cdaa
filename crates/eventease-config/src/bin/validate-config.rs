//! Config validation CLI tool
//!
//! Checks an eventease configuration file and prints either a summary of the
//! resulting settings or every problem found.

use eventease_config::{CURRENT_CONFIG_VERSION, ConfigError, Settings, load_config};
use eventease_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config_path = match std::env::args().nth(1).as_deref() {
        Some("-h" | "--help") => {
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Defaults to {}", default_config_path().display());
            return ExitCode::from(2);
        }
        Some(path) => PathBuf::from(path),
        None => default_config_path(),
    };

    if !config_path.exists() {
        eprintln!("Error: no configuration file at {}", config_path.display());
        eprintln!("eventease runs with built-in defaults when the file is absent.");
        return ExitCode::from(1);
    }

    match load_config(&config_path) {
        Ok(settings) => {
            print_summary(&settings);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {} is not valid", config_path.display());
            report(&e);
            ExitCode::from(1)
        }
    }
}

fn print_summary(settings: &Settings) {
    println!("✓ Configuration is valid (version {})", CURRENT_CONFIG_VERSION);
    println!("  Database:       {}", settings.storage.database_path().display());
    println!("  Seed demo data: {}", settings.catalog.seed_demo_data);
    println!("  Users ({}):", settings.users.len());
    for user in &settings.users {
        println!("    {:<8} {:<6} {}", user.id, user.role, user.email);
    }
}

fn report(error: &ConfigError) {
    match error {
        ConfigError::ReadError(e) => eprintln!("  cannot read file: {}", e),
        ConfigError::ParseError(e) => eprintln!("  TOML parse error: {}", e),
        ConfigError::ValidationFailed { errors } => {
            for err in errors {
                eprintln!("  - {}", err);
            }
        }
        ConfigError::UnsupportedVersion(version) => eprintln!(
            "  config_version {} is not supported (expected {})",
            version, CURRENT_CONFIG_VERSION
        ),
    }
}
