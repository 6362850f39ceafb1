//! PostgreSQL access for users, user resumes and applications.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::user::{UserResumeRow, UserRow};

pub async fn create_user(pool: &PgPool, email: &str, name: Option<&str>) -> Result<UserRow, AppError> {
    Ok(sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .fetch_one(pool)
    .await?)
}

pub async fn get_user_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<UserResumeRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserResumeRow>("SELECT * FROM user_resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// One resume per user; a second write replaces the first.
pub async fn upsert_user_resume(
    pool: &PgPool,
    user_id: Uuid,
    data: &Value,
) -> Result<UserResumeRow, AppError> {
    Ok(sqlx::query_as::<_, UserResumeRow>(
        r#"
        INSERT INTO user_resumes (user_id, data)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE
            SET data = EXCLUDED.data, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(data)
    .fetch_one(pool)
    .await?)
}

/// Newest first.
pub async fn list_applications(pool: &PgPool, user_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn create_application(
    pool: &PgPool,
    application: &NewApplication,
) -> Result<ApplicationRow, AppError> {
    Ok(sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (id, user_id, job_title, company, job_url, ats_score, status, tailored_resume, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application.user_id)
    .bind(&application.job_title)
    .bind(&application.company)
    .bind(&application.job_url)
    .bind(application.ats_score)
    .bind(application.status.as_str())
    .bind(&application.tailored_resume)
    .bind(&application.notes)
    .fetch_one(pool)
    .await?)
}

/// Updates status and/or notes. `None` leaves a column unchanged.
pub async fn update_application(
    pool: &PgPool,
    id: Uuid,
    status: Option<ApplicationStatus>,
    notes: Option<&str>,
) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET status = COALESCE($2, status),
            notes = COALESCE($3, notes),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.map(|s| s.as_str()))
    .bind(notes)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}
