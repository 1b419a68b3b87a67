//! Application builder: wires collaborators, state, router, and middleware.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use proctor_core::config::AppConfig;
use proctor_core::error::AppError;
use proctor_core::traits::{CapabilityProvider, SubmissionService};
use proctor_service::exam::spawn_audit_logger;
use proctor_service::{
    DetectionService, DetectionSuite, EventBus, ExamSessionManager, LoginService, ReportService,
    SessionDependencies, SimulatedCapabilityProvider, ViolationService,
};
use proctor_store::{
    InMemoryViolationStore, RfScanHistory, SessionArchive, SubmissionLedger, TestCatalog,
    ViolationStore,
};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// External collaborators the server is assembled from.
///
/// Production wiring uses [`Collaborators::simulated`]; tests swap in
/// scripted classifiers and toggleable providers.
#[derive(Debug, Clone)]
pub struct Collaborators {
    /// Camera and microphone grants.
    pub capability: Arc<dyn CapabilityProvider>,
    /// Classifiers behind the monitors and the detection endpoints.
    pub suite: DetectionSuite,
    /// Receives final session results.
    pub submissions: Arc<dyn SubmissionService>,
    /// Violation record store.
    pub violations: Arc<dyn ViolationStore>,
}

impl Collaborators {
    /// Simulated detection with in-memory stores.
    pub fn simulated(config: &AppConfig) -> Self {
        Self {
            capability: Arc::new(SimulatedCapabilityProvider::from_config(&config.detection)),
            suite: DetectionSuite::simulated(&config.detection),
            submissions: Arc::new(SubmissionLedger::new()),
            violations: Arc::new(InMemoryViolationStore::new()),
        }
    }
}

/// Builds the shared application state.
pub fn build_state(config: AppConfig, collaborators: Collaborators) -> AppState {
    let catalog = Arc::new(if config.exam.seed_demo_catalog {
        TestCatalog::with_demo()
    } else {
        TestCatalog::new()
    });

    let sessions = Arc::new(ExamSessionManager::new(
        &config,
        SessionDependencies {
            capability: collaborators.capability,
            monitors: collaborators.suite.monitors(),
            submissions: collaborators.submissions,
            violations: Arc::clone(&collaborators.violations),
            catalog: Arc::clone(&catalog),
            archive: Arc::new(SessionArchive::new()),
            events: EventBus::default(),
        },
    ));

    let detection = DetectionService::new(
        collaborators.suite,
        Arc::new(RfScanHistory::new()),
        config.monitoring.audio_noise_threshold,
    );
    let reports = ReportService::new(
        Arc::clone(&catalog),
        Arc::clone(&collaborators.violations),
        Arc::clone(&sessions),
    );

    AppState {
        config: Arc::new(config),
        sessions,
        violations: ViolationService::new(Arc::clone(&collaborators.violations)),
        violation_store: collaborators.violations,
        detection,
        reports,
        login: LoginService::new(),
        catalog,
        started_at: Instant::now(),
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = &state.config.server;
    let cors = build_cors_layer(&server.cors);
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let body_limit = server.max_body_bytes;

    build_router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(from_fn(request_logging))
}

/// Runs the Proctor Hub server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Proctor Hub server...");

    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let collaborators = Collaborators::simulated(&config);
    let state = build_state(config, collaborators);

    let audit_cancel = CancellationToken::new();
    let audit = spawn_audit_logger(state.sessions.events(), audit_cancel.clone());

    let app = build_app(state.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, tests = state.catalog.len(), "Proctor Hub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Shutting down, ending live exam sessions");
    if tokio::time::timeout(grace, state.sessions.shutdown())
        .await
        .is_err()
    {
        warn!(grace_seconds = grace.as_secs(), "Sessions did not end within the grace period");
    }
    if let Err(e) = state.violation_store.close().await {
        warn!(error = %e, "Failed to close violation store");
    }

    audit_cancel.cancel();
    match audit.await {
        Ok(logged) => info!(logged, "Audit logger stopped"),
        Err(e) => warn!(error = %e, "Audit logger ended abnormally"),
    }

    info!("Proctor Hub stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
