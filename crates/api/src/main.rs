use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use launchpad_api::config::{LifecycleConfig, ServerConfig};
use launchpad_api::lifecycle::{LifecycleController, VoiceIntake};
use launchpad_api::router::build_app_router;
use launchpad_api::state::AppState;
use launchpad_db::{LaunchStore, PgLaunchStore};
use launchpad_events::{HttpWorkflowTrigger, MessageSender, TwilioMessenger, WorkflowTrigger};
use launchpad_llm::{CompletionModel, OpenAiClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "launchpad_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let lifecycle_config = LifecycleConfig::from_env();
    tracing::info!(
        workflow_id = %lifecycle_config.workflow_id,
        webhook_url = %lifecycle_config.workflow_webhook_url,
        messaging = lifecycle_config.messaging.is_some(),
        voice = lifecycle_config.openai.is_some(),
        "Loaded lifecycle configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = launchpad_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    launchpad_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    launchpad_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn LaunchStore> = Arc::new(PgLaunchStore::new(pool));

    // --- Outbound clients ---
    let trigger: Arc<dyn WorkflowTrigger> = Arc::new(
        HttpWorkflowTrigger::new(
            lifecycle_config.workflow_webhook_url.clone(),
            lifecycle_config.workflow_webhook_secret.clone(),
        )
        .expect("Failed to build workflow trigger client"),
    );

    let messenger: Option<Arc<dyn MessageSender>> = match lifecycle_config.messaging.clone() {
        Some(messaging) => Some(Arc::new(
            TwilioMessenger::new(messaging).expect("Failed to build messaging client"),
        )),
        None => {
            tracing::warn!("Twilio credentials not set, notifications will be logged but not sent");
            None
        }
    };

    let model: Option<Arc<dyn CompletionModel>> = match lifecycle_config.openai.clone() {
        Some(openai) => Some(Arc::new(
            OpenAiClient::new(openai).expect("Failed to build OpenAI client"),
        )),
        None => {
            tracing::warn!("OPENAI_API_KEY not set, voice deployments will be rejected");
            None
        }
    };

    // --- App state ---
    let lifecycle = Arc::new(LifecycleController::new(
        Arc::clone(&store),
        trigger,
        messenger,
        lifecycle_config.workflow_id.clone(),
        lifecycle_config.operator_recipient.clone(),
    ));
    let voice = Arc::new(VoiceIntake::new(Arc::clone(&store), model));

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        lifecycle,
        voice,
    };

    // --- Router ---
    let app = build_app_router(state, &config).expect("Invalid router configuration");

    // --- Start server ---
    let host: IpAddr = config.host.parse().expect("Invalid HOST address");
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
