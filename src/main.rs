//! Sathi Backend Server
//!
//! Serves the risk dashboard API over synthetic in-memory student data.

use anyhow::Context;
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use sathi_server::auth::{hash_password, AuthService};
use sathi_server::config::Config;
use sathi_server::middleware::RateLimiter;
use sathi_server::repository::{generate_students, InMemoryStudentRepository, StudentRepository};
use sathi_server::routes::create_router;
use sathi_server::services::{AssistantService, CalendarService, GeminiClient, RiskEngine};
use sathi_server::state::AppState;

const ADMIN_PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting Sathi server");

    // Synthetic student data
    let mut rng = match config.data_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let students = generate_students(config.student_count, Utc::now().date_naive(), &mut rng);
    let repository: Arc<dyn StudentRepository> =
        Arc::new(InMemoryStudentRepository::new(students));

    tracing::info!(
        students = repository.count(),
        seeded = config.data_seed.is_some(),
        "Student data generated"
    );

    // Admin credentials
    let admin_password_hash = match &config.admin_password_hash {
        Some(hash) => hash.clone(),
        None => {
            if config.environment.is_production() {
                tracing::warn!("ADMIN_PASSWORD_HASH not set, hashing ADMIN_PASSWORD at startup");
            }
            let password = config.admin_password.clone();
            tokio::task::spawn_blocking(move || hash_password(&password, ADMIN_PASSWORD_COST))
                .await
                .context("admin password hashing task failed")??
        }
    };

    let auth_service = Arc::new(AuthService::new(
        repository.clone(),
        config.jwt_secret.clone(),
        config.jwt_access_token_ttl_seconds,
        config.admin_username.clone(),
        admin_password_hash,
    ));

    let risk_engine = Arc::new(if config.risk_strict_validation {
        RiskEngine::strict()
    } else {
        RiskEngine::new()
    });

    let gemini_client = config.gemini_api_key.clone().map(|key| {
        tracing::info!(
            model = %config.gemini_model,
            key = %config.gemini_api_key_masked().unwrap_or_default(),
            "Gemini assistant enabled"
        );
        GeminiClient::new(config.gemini_base_url.clone(), config.gemini_model.clone(), key)
    });
    let assistant = Arc::new(AssistantService::new(gemini_client));

    tracing::info!(
        strict_validation = risk_engine.is_strict(),
        assistant_enabled = assistant.is_configured(),
        "Services initialized"
    );

    let app_state = AppState::new(
        repository,
        risk_engine,
        auth_service,
        assistant,
        Arc::new(CalendarService::new()),
    );

    let rate_limiter = RateLimiter::new(config.rate_limit_rps);
    rate_limiter.spawn_pruner(RATE_LIMIT_PRUNE_INTERVAL);

    let app = create_router(
        app_state,
        rate_limiter,
        config.cors_allowed_origins.as_deref(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
