pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;
pub use db::{create_pool, DbPool};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migrations", applied.len());
    Ok(())
}

/// Register every API route. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{auth, checkout, cooks, meals, orders};

    cfg.app_data(handlers::json_config())
        .app_data(handlers::path_config())
        .app_data(handlers::query_config())
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login)),
        )
        .service(
            web::scope("/cooks")
                .route("", web::get().to(cooks::list_cooks))
                .route("/register", web::post().to(cooks::register_cook))
                .route("/nearby", web::get().to(cooks::nearby_cooks))
                .route("/pincode/{pincode}", web::get().to(cooks::cooks_by_pincode))
                .route("/{id}", web::get().to(cooks::get_cook))
                .route("/{id}", web::put().to(cooks::update_cook))
                .route("/{id}/payment-details", web::get().to(cooks::payment_details))
                .route("/{id}/analytics", web::get().to(cooks::cook_analytics)),
        )
        .service(
            web::scope("/meals")
                .route("", web::post().to(meals::create_meal))
                .route("", web::get().to(meals::list_meals))
                .route("/{id}", web::get().to(meals::get_meal))
                .route("/{id}/stock", web::put().to(meals::update_stock)),
        )
        .service(
            web::scope("/orders")
                .route("", web::post().to(orders::create_order))
                .route("/batch", web::post().to(orders::create_batch))
                .route("/user/{user_id}", web::get().to(orders::orders_by_user))
                .route("/cook/{cook_id}", web::get().to(orders::orders_by_cook))
                .route("/{id}", web::get().to(orders::get_order))
                .route("/{id}/status", web::post().to(orders::update_status))
                .route("/{id}/rate", web::post().to(orders::rate_order)),
        )
        .service(
            web::scope("/checkout")
                .route("", web::post().to(checkout::place))
                .route("/preview", web::post().to(checkout::preview)),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
