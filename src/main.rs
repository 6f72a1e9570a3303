use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use punchclock::config::StorageBackend;
use punchclock::database::{
    init_database,
    repositories::{PgAttendanceRepository, PgUserRepository},
};
use punchclock::middleware::RequestIdMiddleware;
use punchclock::services::SystemClock;
use punchclock::{AppState, Config, routes};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Punchclock API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {}, storage: {:?}, utc offset: {} min)",
        config.environment,
        config.storage,
        config.utc_offset_minutes
    );

    let clock = Arc::new(SystemClock);
    let app_state = match config.storage {
        StorageBackend::Postgres => {
            let pool = init_database(&config.database_url).await?;
            log::info!("Database initialized");
            AppState::new(
                config.clone(),
                Arc::new(PgAttendanceRepository::new(pool.clone())),
                Arc::new(PgUserRepository::new(pool)),
                clock,
            )
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; data is lost on restart");
            AppState::in_memory(config.clone(), clock)
        }
    };

    app_state.auth_service.ensure_admin().await?;

    let app_state = web::Data::new(app_state);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(config_data.clone())
            // Innermost first: the correlation header is set before Logger reads it.
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b %T correlation_id=%{x-correlation-id}o"#,
            ))
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["X-Correlation-ID"])
                    .max_age(3600),
            )
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await?;

    Ok(())
}
