//! Config validation CLI tool
//!
//! Validates a timesheet configuration file and reports any errors.

use std::path::PathBuf;
use std::process::ExitCode;
use timesheet_config::{ConfigError, ProviderKind, CURRENT_CONFIG_VERSION};
use timesheet_util::default_config_path;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a timesheet configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match timesheet_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", CURRENT_CONFIG_VERSION);
            println!("  Provider: {}", settings.provider.kind);
            match settings.provider.kind {
                ProviderKind::Remote => {
                    if let Some(url) = &settings.provider.base_url {
                        println!("  Base URL: {}", url);
                    }
                    println!("  Timeout: {}s", settings.provider.timeout.as_secs());
                }
                ProviderKind::Mock => {
                    println!(
                        "  Mock latency: {}ms",
                        settings.provider.mock_latency.as_millis()
                    );
                    match &settings.mock {
                        Some(mock) => println!(
                            "  Mock dataset: {} students, {} classes",
                            mock.students.len(),
                            mock.classes.len()
                        ),
                        None => println!("  Mock dataset: built-in"),
                    }
                }
            }
            println!(
                "  Current class refresh: {}s",
                settings.refresh.current_class.as_secs()
            );
            println!("  Clock tick: {}s", settings.refresh.clock.as_secs());

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver, CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
