use actix_web::web;

use crate::handlers::attendance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("", web::get().to(attendance::range))
            .route("/clock-in", web::post().to(attendance::clock_in))
            .route("/clock-out", web::post().to(attendance::clock_out))
            .route("/today", web::get().to(attendance::today))
            .route("/monthly", web::get().to(attendance::monthly))
            .route("/summary", web::get().to(attendance::summary)),
    );
}
