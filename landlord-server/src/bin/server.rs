//! Landlord table server. No flags: binds `0.0.0.0:9999` (spec.md §6).

use std::process::ExitCode;

use landlord_server::{listener, DEFAULT_PORT};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let addr = ("0.0.0.0", DEFAULT_PORT);
    if let Err(err) = listener::serve(addr).await {
        tracing::error!(%err, "failed to bind listener");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
