use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use configuration::{Backend, Settings};
use database::{InMemoryProductRepository, PgProductRepository, ProductRepository};
use service::ProductService;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

/// Builds the product API router around an already-wired service.
pub fn router(product_service: ProductService) -> Router {
    let app_state = Arc::new(AppState { product_service });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/v1/products/",
            get(handlers::all_products).post(handlers::add_product),
        )
        .route(
            "/api/v1/products/:id/",
            get(handlers::product_by_id)
                .put(handlers::update_product_price)
                .delete(handlers::delete_by_id),
        )
        .with_state(app_state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Picks the repository implementation named in the settings.
pub async fn build_repository(settings: &Settings) -> anyhow::Result<Arc<dyn ProductRepository>> {
    let repository: Arc<dyn ProductRepository> = match settings.database.backend {
        Backend::Postgres => {
            let pool = database::connect(&settings.database).await?;
            Arc::new(PgProductRepository::new(pool))
        }
        Backend::Memory => {
            tracing::warn!("Using the in-memory product store; data is lost on exit.");
            Arc::new(InMemoryProductRepository::new())
        }
    };
    Ok(repository)
}

/// The main function to configure and run the web server.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let repository = build_repository(&settings).await?;
    serve(settings, repository).await
}

/// Runs the server over a repository the caller has already built.
pub async fn serve(
    settings: Settings,
    repository: Arc<dyn ProductRepository>,
) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;
    let product_service =
        ProductService::new(repository).with_strict_price_update(settings.api.strict_price_update);
    let app = router(product_service);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
