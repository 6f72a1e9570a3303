pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

pub use config::Config;
use database::repositories::{
    AttendanceRepository, InMemoryAttendanceRepository, InMemoryUserRepository, UserRepository,
};
pub use services::{AttendanceService, AuthService};
use services::{AttendanceCache, Clock, UserDirectory};

/// Everything handlers need, shared across workers behind `web::Data`.
pub struct AppState {
    pub config: Config,
    pub auth_service: AuthService,
    pub attendance_service: AttendanceService,
    pub attendance_repository: Arc<dyn AttendanceRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub attendance_cache: AttendanceCache,
    pub user_directory: UserDirectory,
}

impl AppState {
    pub fn new(
        config: Config,
        attendance_repository: Arc<dyn AttendanceRepository>,
        user_repository: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let attendance_cache = AttendanceCache::new();
        let user_directory = UserDirectory::new(config.user_cache_ttl_seconds);
        let auth_service = AuthService::new(user_repository.clone(), config.clone());
        let attendance_service = AttendanceService::new(
            attendance_repository.clone(),
            clock,
            config.local_offset(),
            attendance_cache.clone(),
        );

        Self {
            config,
            auth_service,
            attendance_service,
            attendance_repository,
            user_repository,
            attendance_cache,
            user_directory,
        }
    }

    /// State backed by the in-memory repositories.
    pub fn in_memory(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryAttendanceRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            clock,
        )
    }
}
