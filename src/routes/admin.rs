use actix_web::web;

use crate::handlers::admin;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::post().to(admin::create_user))
            .route("/users", web::get().to(admin::get_users))
            .route("/users/{id}", web::get().to(admin::get_user))
            .route("/attendance", web::get().to(admin::attendance_range))
            .route("/attendance/cache", web::get().to(admin::cache_stats))
            .route("/attendance/cache", web::delete().to(admin::clear_cache))
            .route(
                "/attendance/date/{date}",
                web::get().to(admin::attendance_by_date),
            )
            .route(
                "/attendance/date/{date}/refresh",
                web::post().to(admin::refresh_date),
            )
            .route("/employees", web::get().to(admin::employees))
            .route("/teams", web::get().to(admin::teams))
            .route("/teams/{lead_id}", web::get().to(admin::team_attendance))
            .route("/dashboard", web::get().to(admin::dashboard)),
    );
}
