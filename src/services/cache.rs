//! Read-through caches for admin views.
//!
//! `AttendanceCache` keeps one entry per calendar day and is only dropped
//! explicitly (admin clear/refresh, or a punch on that day). A fill that
//! races with a punch is not kept.
//! `UserDirectory` holds the full user list for a fixed TTL.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::NaiveDate;
use moka::future::Cache;
use uuid::Uuid;

use crate::database::models::{Attendance, AttendanceFilter, CacheStats, User};
use crate::database::repositories::{AttendanceRepository, UserRepository};
use crate::error::AppError;

const MAX_CACHED_DATES: u64 = 400;

#[derive(Clone)]
pub struct AttendanceCache {
    cache: Cache<NaiveDate, Arc<Vec<Attendance>>>,
    /// Bumped on every invalidation; a fill that overlaps one is discarded.
    generation: Arc<AtomicU64>,
}

impl Default for AttendanceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceCache {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(MAX_CACHED_DATES).build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// All records for `date`, fetched from the repository on a miss.
    pub async fn get_or_fetch(
        &self,
        date: NaiveDate,
        repository: &dyn AttendanceRepository,
    ) -> Result<Arc<Vec<Attendance>>, AppError> {
        if let Some(records) = self.cache.get(&date).await {
            log::debug!("Attendance cache hit for {}", date);
            return Ok(records);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let records = Arc::new(
            repository
                .list(AttendanceFilter {
                    user_id: None,
                    start_date: Some(date),
                    end_date: Some(date),
                })
                .await?,
        );
        log::debug!(
            "Attendance cache filled for {} ({} records)",
            date,
            records.len()
        );
        self.cache.insert(date, records.clone()).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("Attendance for {} changed while loading; not cached", date);
            self.cache.invalidate(&date).await;
        }
        Ok(records)
    }

    pub async fn invalidate(&self, date: NaiveDate) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.invalidate(&date).await;
    }

    /// Drops one date, or every date when `date` is `None`.
    pub async fn clear(&self, date: Option<NaiveDate>) {
        match date {
            Some(date) => self.invalidate(date).await,
            None => {
                self.generation.fetch_add(1, Ordering::SeqCst);
                self.cache.invalidate_all();
                self.cache.run_pending_tasks().await;
            }
        }
    }

    pub async fn refresh(
        &self,
        date: NaiveDate,
        repository: &dyn AttendanceRepository,
    ) -> Result<Arc<Vec<Attendance>>, AppError> {
        self.invalidate(date).await;
        self.get_or_fetch(date, repository).await
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;
        let mut cached_dates = Vec::new();
        let mut total_cached_records = 0;
        for (date, records) in self.cache.iter() {
            cached_dates.push(*date);
            total_cached_records += records.len();
        }
        cached_dates.sort();

        CacheStats {
            cached_dates,
            total_cached_records,
        }
    }
}

#[derive(Clone)]
pub struct UserDirectory {
    cache: Cache<(), Arc<Vec<User>>>,
}

impl UserDirectory {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(ttl_seconds))
                .build(),
        }
    }

    /// Every user, ordered by name. `force_refresh` skips the cached copy.
    pub async fn users(
        &self,
        repository: &dyn UserRepository,
        force_refresh: bool,
    ) -> Result<Arc<Vec<User>>, AppError> {
        if !force_refresh {
            if let Some(users) = self.cache.get(&()).await {
                return Ok(users);
            }
        }

        let users = Arc::new(repository.list_users().await?);
        log::debug!("User directory loaded ({} users)", users.len());
        self.cache.insert((), users.clone()).await;
        Ok(users)
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}

pub fn employees(users: &[User]) -> Vec<&User> {
    users.iter().filter(|u| u.is_employee()).collect()
}

pub fn admins(users: &[User]) -> Vec<&User> {
    users.iter().filter(|u| u.is_admin()).collect()
}

/// Employees who are the manager of at least one other user.
pub fn team_leads(users: &[User]) -> Vec<&User> {
    users
        .iter()
        .filter(|lead| {
            lead.is_employee()
                && users
                    .iter()
                    .any(|u| u.id != lead.id && u.manager_id == Some(lead.id))
        })
        .collect()
}

pub fn by_department<'a>(users: &'a [User], department: &str) -> Vec<&'a User> {
    users.iter().filter(|u| u.department == department).collect()
}

pub fn team_members(users: &[User], lead_id: Uuid) -> Vec<&User> {
    users
        .iter()
        .filter(|u| u.is_employee() && u.id != lead_id && u.manager_id == Some(lead_id))
        .collect()
}
