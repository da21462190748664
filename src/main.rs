//! regwiz - scripted driver for the registration wizard
//!
//! Reads a JSON list of wizard actions from the file given as the first
//! argument (or stdin), runs them against an in-process backend and prints
//! the resulting report as JSON.

use anyhow::{Context, Result};
use regwiz::config::WizardConfig;
use regwiz::script::{parse_script, run_script};
use regwiz::service::OfflineRegistrationService;
use regwiz::RegistrationWizard;
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WizardConfig::load();

    // Initialize logging
    let default_filter = config
        .as_ref()
        .map(|c| c.log_filter().to_string())
        .unwrap_or_else(|_| "regwiz=info".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = config.unwrap_or_else(|err| {
        tracing::warn!("Ignoring unreadable configuration: {err:#}");
        WizardConfig::default()
    });

    let source = read_script(std::env::args().nth(1))?;
    let actions = parse_script(&source).context("script is not a valid action list")?;
    tracing::info!(actions = actions.len(), "running wizard script");

    let service = OfflineRegistrationService::new(config.organizations.clone());
    let mut wizard = RegistrationWizard::with_policy(config.password_policy());
    let report = run_script(&mut wizard, &service, actions).await;

    let failures = report.failures().count();
    if failures > 0 {
        tracing::info!(failures, "some script actions were refused");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_script(path: Option<String>) -> Result<String> {
    match path {
        Some(path) if path != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read script {path}")),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}
