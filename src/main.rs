use dotenvy::dotenv;
use homework_bot::config::{Credentials, CredentialsError, Settings};
use homework_bot::logging::{init_logging, RedactionPatterns};
use homework_bot::runner::run_bot;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Initialize redaction patterns early (before logging)
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting Homework Status Bot...");

    let credentials = init_credentials();

    run_bot(credentials).await;

    Ok(())
}

fn init_credentials() -> Credentials {
    let settings = match Settings::new() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match settings.credentials() {
        Ok(credentials) => {
            info!("Configuration loaded successfully.");
            credentials
        }
        Err(CredentialsError::Missing(keys)) => {
            for key in keys {
                error!("Missing required environment variable: {}", key);
            }
            error!("Refusing to start without credentials.");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    }
}
