//! Firefly Bridge API server binary
//!
//! Starts the HTTP server for case intake and the operator case list.

use firefly_api::{config::ApiConfig, start_server, ApiError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ApiError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ApiConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: firefly-api --config <path-to-config.toml>");
        eprintln!();
        ApiConfig::default_test_config()
    };

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Firefly Bridge API - Disaster-Relief Case Intake");
    println!();
    println!("USAGE:");
    println!("    firefly-api --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    firefly-api --config config/firefly.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - database_path: SQLite database file (':memory:' for in-memory)");
    println!("    - lexicon_path: Optional TOML file replacing the builtin vocabulary");
    println!("    - [extractor]: Optional extraction limits (max_text_length, ...)");
    println!();
}
