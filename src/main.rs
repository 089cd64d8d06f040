#[tokio::main]
async fn main() {
    if let Err(e) = tilebound::run_with_config().await {
        tracing::error!(error = %e, "game failed");
        std::process::exit(1);
    }
}
