use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qrispay::config::Config;
use qrispay::db::{create_pool, init_db, queries, AppState};
use qrispay::handlers;
use qrispay::models::CreateUser;
use qrispay::qris;

#[derive(Parser, Debug)]
#[command(name = "qrispay")]
#[command(about = "Manual QRIS billing service with dynamic payload generation")]
struct Cli {
    /// Seed the database with dev data (a user and a sample QRIS payload)
    #[arg(long)]
    seed: bool,

    /// Delete the database on exit (dev mode only, useful for fresh starts)
    #[arg(long)]
    ephemeral: bool,
}

/// Seeds the database with dev data: one free-plan user and a sample base
/// payload so invoice generation works out of the box.
fn seed_dev_data(state: &AppState) {
    let conn = state.db.get().expect("Failed to get db connection for seeding");

    let existing = queries::get_base_payload(&conn).expect("Failed to read base payload");
    if existing.is_some() {
        tracing::info!("Database already has data, skipping seed");
        return;
    }

    let raw = "00020101021126600015COM.EXAMPLE.WWW01189360001400000000010208123456780303UMI52045812530336054061000005802ID5910WARUNGMAJU6007JAKARTA610510110630477B7";
    let base = qris::normalize(raw);
    queries::save_qris_payloads(&conn, raw, &base).expect("Failed to seed QRIS payloads");

    let user = queries::create_user(
        &conn,
        &CreateUser {
            email: "dev@qrispay.local".to_string(),
        },
    )
    .expect("Failed to create dev user");

    tracing::info!("============================================");
    tracing::info!("SEEDED DEV DATA");
    tracing::info!("User: {} (id: {})", user.email, user.id);
    tracing::info!("Base payload: {} chars", base.len());
    tracing::info!("============================================");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qrispay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = pool.get().expect("Failed to get db connection");
        init_db(&conn).expect("Failed to initialize schema");
    }

    let state = AppState { db: pool };

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed ignored outside dev mode (set QRISPAY_ENV=dev)");
        } else {
            seed_dev_data(&state);
        }
    }

    let app = handlers::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    let cleanup_on_exit = cli.ephemeral && config.dev_mode;
    let db_path = config.database_path.clone();
    if cleanup_on_exit {
        tracing::info!("EPHEMERAL MODE: database will be deleted on exit");
    }

    tracing::info!("qrispay server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    if cleanup_on_exit {
        tracing::info!("Cleaning up ephemeral database...");
        if let Err(e) = std::fs::remove_file(&db_path) {
            tracing::warn!("Failed to remove {}: {}", db_path, e);
        }
        let _ = std::fs::remove_file(format!("{}-wal", db_path));
        let _ = std::fs::remove_file(format!("{}-shm", db_path));
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
