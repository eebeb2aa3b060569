//! Bursar Server CLI
//!
//! Starts the HTTP server for invoice batch analysis and chat.

use bursar_server::{config::ServerConfig, start_server};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ServerConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: bursar-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Bursar - Invoice Reimbursement Analysis Service");
    println!();
    println!("USAGE:");
    println!("    bursar-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    bursar-server --config config/server.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8000)");
    println!("    - model: Generation model name (default: 'gemini-1.5-flash')");
    println!("    - api_key_env: Env var holding the API key (default: GEMINI_API_KEY)");
    println!("    - max_upload_mb: Per-file upload limit (default: 50)");
    println!("    - [policy]: optional reimbursement cap overrides");
    println!();
}
