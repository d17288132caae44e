use chrono::Utc;
use omnichat::{config::AppConfig, console};
use omnichat_assist::CannedProvider;
use omnichat_conversation::ConversationRegistry;
use omnichat_inbox::{Dispatcher, InboxService};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with console output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        latency_ms = config.assist.latency_ms,
        seed_demo_data = config.seed_demo_data,
        "Loaded configuration"
    );

    let dispatcher = if config.seed_demo_data {
        Dispatcher::with_demo_data(Utc::now())
    } else {
        Dispatcher::new(ConversationRegistry::new())
    };
    let (handle, service) =
        InboxService::spawn(dispatcher, Arc::new(CannedProvider), config.assist);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let outcome = tokio::select! {
        outcome = console::run(&handle, stdin, &mut stdout) => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
            Ok(())
        }
    };

    drop(handle);
    if let Err(e) = service.await {
        tracing::warn!(error = %e, "inbox service ended abnormally");
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "console failed");
            ExitCode::FAILURE
        }
    }
}
