#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    if let Err(e) = driving_school_api::server::run().await {
        tracing::error!("fatal: {:#}", e);
        std::process::exit(1);
    }
}
