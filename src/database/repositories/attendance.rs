use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AttendanceRepository, RepositoryResult};
use crate::database::{
    models::{Attendance, AttendanceFilter, CheckOutUpdate},
    types::{ATTENDANCE_COLUMNS, AttendanceRow},
    utils::sql,
};
use crate::error::AppError;

fn decode(row: AttendanceRow) -> RepositoryResult<Attendance> {
    Attendance::try_from(row).map_err(|e| {
        log::error!("Malformed attendance row: {}", e);
        AppError::internal_server_error_message(e)
    })
}

#[derive(Clone)]
pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PgAttendanceRepository {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> RepositoryResult<Option<Attendance>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&sql(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendances
            WHERE user_id = ? AND date = ?
            "#
        )))
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode).transpose()
    }

    async fn insert(&self, attendance: Attendance) -> RepositoryResult<Attendance> {
        // The unique index on (user_id, date) turns a racing duplicate into
        // SQLSTATE 23505, which AppError maps to Conflict.
        let row = sqlx::query_as::<_, AttendanceRow>(&sql(&format!(
            r#"
            INSERT INTO
                attendances (
                    id,
                    user_id,
                    date,
                    check_in,
                    check_in_latitude,
                    check_in_longitude,
                    check_in_accuracy,
                    working_minutes,
                    status,
                    note,
                    created_at,
                    updated_at
                )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        )))
        .bind(attendance.id)
        .bind(attendance.user_id)
        .bind(attendance.date)
        .bind(attendance.check_in)
        .bind(attendance.check_in_location.map(|l| l.latitude))
        .bind(attendance.check_in_location.map(|l| l.longitude))
        .bind(attendance.check_in_location.map(|l| l.accuracy))
        .bind(attendance.working_minutes)
        .bind(attendance.status)
        .bind(&attendance.note)
        .bind(attendance.created_at)
        .bind(attendance.updated_at)
        .fetch_one(&self.pool)
        .await?;

        decode(row)
    }

    async fn close(
        &self,
        id: Uuid,
        update: CheckOutUpdate,
    ) -> RepositoryResult<Option<Attendance>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&sql(&format!(
            r#"
            UPDATE attendances
            SET
                check_out = ?,
                check_out_latitude = ?,
                check_out_longitude = ?,
                check_out_accuracy = ?,
                working_minutes = ?,
                status = ?,
                updated_at = ?
            WHERE
                id = ?
                AND check_in IS NOT NULL
                AND check_out IS NULL
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        )))
        .bind(update.check_out)
        .bind(update.location.latitude)
        .bind(update.location.longitude)
        .bind(update.location.accuracy)
        .bind(update.working_minutes)
        .bind(update.status)
        .bind(update.updated_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode).transpose()
    }

    async fn list(&self, filter: AttendanceFilter) -> RepositoryResult<Vec<Attendance>> {
        // NULL parameters disable their predicate.
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendances
            WHERE
                (?::uuid IS NULL OR user_id = ?)
                AND (?::date IS NULL OR date >= ?)
                AND (?::date IS NULL OR date <= ?)
            ORDER BY date DESC, check_in DESC NULLS LAST
            "#
        )))
        .bind(filter.user_id)
        .bind(filter.user_id)
        .bind(filter.start_date)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode).collect()
    }
}
