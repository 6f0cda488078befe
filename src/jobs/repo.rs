use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::jobs::repo_types::Job;

/// All postings, newest first.
pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Job>> {
    let jobs = sqlx::query_as::<_, Job>(
        r#"
        SELECT id, title, description, referral_bonus, created_by, created_at
        FROM jobs
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(jobs)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Job>> {
    let job = sqlx::query_as::<_, Job>(
        r#"
        SELECT id, title, description, referral_bonus, created_by, created_at
        FROM jobs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(job)
}

pub async fn create(
    db: &PgPool,
    title: &str,
    description: &str,
    referral_bonus: Decimal,
    created_by: Uuid,
) -> anyhow::Result<Job> {
    let job = sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (title, description, referral_bonus, created_by)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, description, referral_bonus, created_by, created_at
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(referral_bonus)
    .bind(created_by)
    .fetch_one(db)
    .await?;
    Ok(job)
}

/// Delete a posting. Referrals against it cascade.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
