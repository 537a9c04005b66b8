//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{normalize_error_response, ObservabilityLayer};
use crate::openapi::ApiDoc;
use crate::repository::{
    identity::IdentityRepositoryImpl, mapping::MappingRepositoryImpl, site::SiteRepositoryImpl,
};
use crate::service::{MappingService, PrimaryDomainService};
use crate::state::HasServices;
use crate::telemetry;
use anyhow::Result;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub mapping_service: Arc<MappingService<MappingRepositoryImpl>>,
    pub primary_domain_service:
        Arc<PrimaryDomainService<MappingRepositoryImpl, SiteRepositoryImpl>>,
    pub identity_repo: Arc<IdentityRepositoryImpl>,
    pub jwt_manager: JwtManager,
}

impl HasServices for AppState {
    type MappingRepo = MappingRepositoryImpl;
    type SiteRepo = SiteRepositoryImpl;
    type IdentityRepo = IdentityRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn mapping_service(&self) -> &MappingService<Self::MappingRepo> {
        &self.mapping_service
    }

    fn primary_domain_service(&self) -> &PrimaryDomainService<Self::MappingRepo, Self::SiteRepo> {
        &self.primary_domain_service
    }

    fn identity_repo(&self) -> &Self::IdentityRepo {
        &self.identity_repo
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

impl AppState {
    /// Wire repositories and services over a connected pool
    pub fn new(config: Config, db_pool: MySqlPool) -> Self {
        let mapping_repo = Arc::new(MappingRepositoryImpl::new(db_pool.clone()));
        let site_repo = Arc::new(SiteRepositoryImpl::new(db_pool.clone()));
        let identity_repo = Arc::new(IdentityRepositoryImpl::new(db_pool.clone()));

        let mapping_service = Arc::new(MappingService::new(
            mapping_repo.clone(),
            config.strict_site_scope,
        ));
        let primary_domain_service = Arc::new(PrimaryDomainService::new(
            mapping_repo,
            site_repo,
            config.strict_site_scope,
        ));
        let jwt_manager = JwtManager::new(config.jwt.clone());

        Self {
            config: Arc::new(config),
            db_pool,
            mapping_service,
            primary_domain_service,
            identity_repo,
            jwt_manager,
        }
    }
}

/// Run the HTTP server
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    if prometheus_handle.is_some() {
        telemetry::metrics::spawn_pool_metrics_task(db_pool.clone());
    }

    let http_addr = config.http_addr();
    if !config.strict_site_scope {
        tracing::warn!("MAPPING_STRICT_SITE_SCOPE=false: mapping ids are not scoped to a site");
    }

    let state = AppState::new(config, db_pool);

    let metrics_router = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(prometheus_handle));

    let app = build_router(state).merge(metrics_router);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Build the HTTP router with generic state type
///
/// Generic over the state so tests can drive the production routes with
/// in-memory repositories.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Domain mapping API; extractor rejections are rendered as JSON errors
    let api_routes = Router::new()
        .route(
            "/mercator/v1/mappings",
            get(api::mapping::list::<S>).post(api::mapping::create::<S>),
        )
        .route(
            "/mercator/v1/mappings/{id}",
            get(api::mapping::get::<S>)
                .put(api::mapping::update::<S>)
                .patch(api::mapping::update::<S>)
                .delete(api::mapping::delete::<S>),
        )
        .route(
            "/mercator/v1/primary",
            get(api::primary_domain::get::<S>).post(api::primary_domain::create::<S>),
        )
        .layer(axum::middleware::from_fn(normalize_error_response));

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .merge(api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::build()))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
