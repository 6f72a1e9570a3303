use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{Attendance, AttendanceFilter, CheckOutUpdate, User};
use crate::error::AppError;

pub mod attendance;
pub mod memory;
pub mod user;

pub use attendance::PgAttendanceRepository;
pub use memory::{InMemoryAttendanceRepository, InMemoryUserRepository};
pub use user::PgUserRepository;

pub type RepositoryResult<T> = Result<T, AppError>;

/// Storage for attendance records.
///
/// Implementations own the one-record-per-(user, date) guarantee: `insert`
/// must fail with [`AppError::Conflict`] when a record for the same user and
/// date already exists, even under concurrent calls.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> RepositoryResult<Option<Attendance>>;

    async fn insert(&self, attendance: Attendance) -> RepositoryResult<Attendance>;

    /// Closes a record that is still open. Returns `None` when the record
    /// does not exist or was already closed.
    async fn close(&self, id: Uuid, update: CheckOutUpdate)
    -> RepositoryResult<Option<Attendance>>;

    /// Records matching the filter, newest date first.
    async fn list(&self, filter: AttendanceFilter) -> RepositoryResult<Vec<Attendance>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`AppError::Conflict`] if the email is taken.
    async fn create_user(&self, user: User) -> RepositoryResult<User>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// All users ordered by name.
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
}
