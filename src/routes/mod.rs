use actix_web::web;

use crate::error::AppError;

pub mod admin;
pub mod attendance;
pub mod auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Malformed bodies, queries and path segments get the JSON error envelope.
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .configure(auth::configure)
            .configure(attendance::configure)
            .configure(admin::configure),
    );
}
