//! In-memory repositories, used by the test suite and `STORAGE=memory`.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AttendanceRepository, RepositoryResult, UserRepository};
use crate::database::models::{Attendance, AttendanceFilter, CheckOutUpdate, User};
use crate::error::AppError;

#[derive(Debug, Default, Clone)]
pub struct InMemoryAttendanceRepository {
    records: Arc<RwLock<HashMap<Uuid, Attendance>>>,
}

impl InMemoryAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> RepositoryResult<Option<Attendance>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|a| a.user_id == user_id && a.date == date)
            .cloned())
    }

    async fn insert(&self, attendance: Attendance) -> RepositoryResult<Attendance> {
        // Check and insert under one write lock so concurrent punches serialize.
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|a| a.user_id == attendance.user_id && a.date == attendance.date)
        {
            return Err(AppError::Conflict(format!(
                "Attendance for {} already exists",
                attendance.date
            )));
        }
        records.insert(attendance.id, attendance.clone());
        Ok(attendance)
    }

    async fn close(
        &self,
        id: Uuid,
        update: CheckOutUpdate,
    ) -> RepositoryResult<Option<Attendance>> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };
        if record.check_in.is_none() || record.check_out.is_some() {
            return Ok(None);
        }

        record.check_out = Some(update.check_out);
        record.check_out_location = Some(update.location);
        record.working_minutes = update.working_minutes;
        record.status = update.status;
        record.updated_at = update.updated_at;
        Ok(Some(record.clone()))
    }

    async fn list(&self, filter: AttendanceFilter) -> RepositoryResult<Vec<Attendance>> {
        let records = self.records.read().await;
        let mut result: Vec<Attendance> = records
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.date.cmp(&a.date).then(b.check_in.cmp(&a.check_in)));
        Ok(result)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }
}
