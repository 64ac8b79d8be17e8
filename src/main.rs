use anyhow::Context;
use clap::Parser;
use small_svc::utils::error::ErrorSeverity;
use small_svc::utils::logger;
use small_svc::{ApiClient, CliConfig, FailableService, FailureEvent, Fetcher, SvcError};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting small-svc CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let client = ApiClient::new(config.name.clone(), &config.endpoint)
        .context("building API client")?
        .with_headers(config.headers.clone())
        .with_timeout(Duration::from_secs(config.timeout_seconds));

    client.subscribe_failures(|event: &FailureEvent| {
        let severity = event
            .cause_as::<SvcError>()
            .map(SvcError::severity)
            .unwrap_or(ErrorSeverity::High);
        tracing::warn!(
            sender = %event.sender,
            operation = %event.operation_name,
            at = %event.occurred_at,
            ?severity,
            "operation failed: {}",
            event.cause
        );
    });

    tracing::info!("Calling {} with params {}", config.operation, config.params);

    match client
        .fetch_json(&config.operation, &config.path, &config.params)
        .await
    {
        Ok(body) => {
            let rendered = serde_json::to_string_pretty(&body).context("rendering response")?;
            println!("{}", rendered);
        }
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
