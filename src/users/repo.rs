use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::{Role, User};

/// Find a user by email.
pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role, project, workplace, designation,
               password_hash, first_login, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Find a user by id.
pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role, project, workplace, designation,
               password_hash, first_login, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Create a new account with a hashed password.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &PgPool,
    name: &str,
    email: &str,
    role: Role,
    project: &str,
    workplace: &str,
    designation: &str,
    password_hash: &str,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, role, project, workplace, designation, password_hash)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, email, role, project, workplace, designation,
                  password_hash, first_login, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(project)
    .bind(workplace)
    .bind(designation)
    .bind(password_hash)
    .fetch_one(db)
    .await?;
    Ok(user)
}

/// All accounts, newest first.
pub async fn list(db: &PgPool) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role, project, workplace, designation,
               password_hash, first_login, created_at
        FROM users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(users)
}

/// Delete an account. Referrals, limits and earnings cascade.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Store a new password hash and clear the first-login flag.
pub async fn update_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET password_hash = $2, first_login = FALSE WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
    Ok(())
}
