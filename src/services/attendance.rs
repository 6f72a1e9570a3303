use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use uuid::Uuid;

use super::{
    cache::AttendanceCache,
    clock::Clock,
    reports::{self, month_bounds},
    status_engine::{
        WORK_END_MINUTES, classify_check_in, classify_check_out, classify_check_out_minutes,
        compute_worked_minutes,
    },
};
use crate::database::models::{
    Attendance, AttendanceFilter, CheckOutUpdate, GeoLocation, MonthlySummary,
};
use crate::database::repositories::AttendanceRepository;
use crate::error::AppError;

/// Clock-in / clock-out and the employee-facing reads.
#[derive(Clone)]
pub struct AttendanceService {
    repository: Arc<dyn AttendanceRepository>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
    cache: AttendanceCache,
}

impl AttendanceService {
    pub fn new(
        repository: Arc<dyn AttendanceRepository>,
        clock: Arc<dyn Clock>,
        offset: FixedOffset,
        cache: AttendanceCache,
    ) -> Self {
        Self {
            repository,
            clock,
            offset,
            cache,
        }
    }

    /// Today's date in the office's zone.
    pub fn local_today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.offset).date_naive()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub async fn clock_in(
        &self,
        user_id: Uuid,
        location: GeoLocation,
    ) -> Result<Attendance, AppError> {
        location.validate().map_err(AppError::BadRequest)?;

        let now = self.clock.now();
        let date = self.local_date(now);

        if self
            .repository
            .find_by_user_and_date(user_id, date)
            .await?
            .is_some()
        {
            log::warn!("User {} already clocked in on {}", user_id, date);
            return Err(AppError::Conflict("Already clocked in today".to_string()));
        }

        let status = classify_check_in(now.with_timezone(&self.offset).time());
        let record = self
            .repository
            .insert(Attendance::open(user_id, date, now, location, status))
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => {
                    log::warn!("Concurrent clock-in for user {} on {}", user_id, date);
                    AppError::Conflict("Already clocked in today".to_string())
                }
                other => other,
            })?;

        self.cache.invalidate(date).await;
        log::info!(
            "User {} clocked in on {} as {}",
            user_id,
            date,
            record.status
        );
        Ok(record)
    }

    /// Closes the caller's open record for today.
    ///
    /// With no record today, an open record from the previous local day is
    /// closed instead, so a shift that runs past midnight can still end.
    pub async fn clock_out(
        &self,
        user_id: Uuid,
        location: GeoLocation,
    ) -> Result<Attendance, AppError> {
        location.validate().map_err(AppError::BadRequest)?;

        let now = self.clock.now();
        let today = self.local_date(now);

        let record = match self.repository.find_by_user_and_date(user_id, today).await? {
            Some(record) => record,
            None => self
                .overnight_record(user_id, today)
                .await?
                .ok_or_else(|| AppError::NotFound("No clock-in record for today".to_string()))?,
        };
        let date = record.date;

        if record.check_out.is_some() {
            log::warn!("User {} already clocked out on {}", user_id, date);
            return Err(AppError::Conflict("Already clocked out today".to_string()));
        }
        let check_in = record
            .check_in
            .ok_or_else(|| AppError::NotFound("No clock-in record for today".to_string()))?;

        // A clock that stepped backwards must not produce check_out < check_in.
        let check_out = now.max(check_in);
        let status = if self.local_date(check_out) > date {
            // Past midnight is after the end of the record's working day.
            classify_check_out_minutes(WORK_END_MINUTES, record.status)
        } else {
            classify_check_out(check_out.with_timezone(&self.offset).time(), record.status)
        };
        let working_minutes = compute_worked_minutes(check_in, check_out);

        let closed = self
            .repository
            .close(
                record.id,
                CheckOutUpdate {
                    check_out,
                    updated_at: now,
                    location,
                    working_minutes,
                    status,
                },
            )
            .await?
            .ok_or_else(|| AppError::Conflict("Already clocked out today".to_string()))?;

        self.cache.invalidate(date).await;
        log::info!(
            "User {} clocked out on {} as {} after {} minutes",
            user_id,
            date,
            closed.status,
            closed.working_minutes
        );
        Ok(closed)
    }

    /// Yesterday's record, if it is still open.
    async fn overnight_record(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<Attendance>, AppError> {
        let Some(yesterday) = today.pred_opt() else {
            return Ok(None);
        };
        let record = self
            .repository
            .find_by_user_and_date(user_id, yesterday)
            .await?;
        Ok(record.filter(|r| r.check_in.is_some() && r.check_out.is_none()))
    }

    pub async fn today(&self, user_id: Uuid) -> Result<Option<Attendance>, AppError> {
        self.repository
            .find_by_user_and_date(user_id, self.local_today())
            .await
    }

    pub async fn for_month(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<Attendance>, AppError> {
        let (start, end) = month_bounds(year, month)?;
        self.repository
            .list(AttendanceFilter {
                user_id: Some(user_id),
                start_date: Some(start),
                end_date: Some(end),
            })
            .await
    }

    /// Records between `start` and `end` inclusive, for one user or everyone.
    pub async fn for_range(
        &self,
        user_id: Option<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Attendance>, AppError> {
        if start > end {
            return Err(AppError::BadRequest(format!(
                "startDate {} is after endDate {}",
                start, end
            )));
        }
        self.repository
            .list(AttendanceFilter {
                user_id,
                start_date: Some(start),
                end_date: Some(end),
            })
            .await
    }

    pub async fn monthly_summary(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<MonthlySummary, AppError> {
        let records = self.for_month(user_id, year, month).await?;
        Ok(reports::monthly_summary(user_id, year, month, &records))
    }
}
