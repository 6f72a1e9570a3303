use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepositoryResult, UserRepository};
use crate::database::{models::User, utils::sql};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: User) -> RepositoryResult<User> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            INSERT INTO
                users (
                    id,
                    email,
                    password_hash,
                    name,
                    role,
                    department,
                    position,
                    employee_number,
                    manager_id,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                email,
                password_hash,
                name,
                role,
                department,
                position,
                employee_number,
                manager_id,
                created_at,
                updated_at
        "#))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(&user.department)
        .bind(&user.position)
        .bind(&user.employee_number)
        .bind(user.manager_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                email,
                password_hash,
                name,
                role,
                department,
                position,
                employee_number,
                manager_id,
                created_at,
                updated_at
            FROM
                users
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                email,
                password_hash,
                name,
                role,
                department,
                position,
                employee_number,
                manager_id,
                created_at,
                updated_at
            FROM
                users
            WHERE
                lower(email) = lower(?)
        "#))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                email,
                password_hash,
                name,
                role,
                department,
                position,
                employee_number,
                manager_id,
                created_at,
                updated_at
            FROM
                users
            ORDER BY
                name
        "#))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
