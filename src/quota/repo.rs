use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::quota::repo_types::{ReferralLimit, ReserveOutcome, SetLimitOutcome};

/// Take one referral slot for the employee, materialising the default
/// ceiling if no row exists yet. The check and the increment are a single
/// guarded UPDATE, so two concurrent submissions can never both win the
/// last slot.
pub async fn reserve_slot(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    default_limit: i32,
) -> anyhow::Result<ReserveOutcome> {
    sqlx::query(
        r#"
        INSERT INTO referral_limits (employee_id, limit_count, used_count)
        VALUES ($1, $2, 0)
        ON CONFLICT (employee_id) DO NOTHING
        "#,
    )
    .bind(employee_id)
    .bind(default_limit)
    .execute(&mut **tx)
    .await
    .context("materialise referral limit")?;

    let updated = sqlx::query_as::<_, (i32, i32)>(
        r#"
        UPDATE referral_limits
        SET used_count = used_count + 1
        WHERE employee_id = $1 AND used_count < limit_count
        RETURNING limit_count, used_count
        "#,
    )
    .bind(employee_id)
    .fetch_optional(&mut **tx)
    .await
    .context("reserve referral slot")?;

    match updated {
        Some((limit, used)) => Ok(ReserveOutcome::Allowed { limit, used }),
        None => {
            let (limit,): (i32,) =
                sqlx::query_as("SELECT limit_count FROM referral_limits WHERE employee_id = $1")
                    .bind(employee_id)
                    .fetch_one(&mut **tx)
                    .await
                    .context("read referral limit")?;
            Ok(ReserveOutcome::Denied { limit })
        }
    }
}

/// Give a slot back after a referral is withdrawn. Floored at zero.
pub async fn release_slot(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE referral_limits
        SET used_count = used_count - 1
        WHERE employee_id = $1 AND used_count > 0
        "#,
    )
    .bind(employee_id)
    .execute(&mut **tx)
    .await
    .context("release referral slot")?;
    Ok(())
}

/// Upsert the ceiling. A reduction below the live counter is refused and
/// leaves the row untouched.
pub async fn set_limit(
    db: &PgPool,
    employee_id: Uuid,
    limit_count: i32,
) -> anyhow::Result<SetLimitOutcome> {
    let updated = sqlx::query_as::<_, ReferralLimit>(
        r#"
        INSERT INTO referral_limits (employee_id, limit_count, used_count)
        VALUES ($1, $2, 0)
        ON CONFLICT (employee_id) DO UPDATE SET limit_count = EXCLUDED.limit_count
        WHERE referral_limits.used_count <= EXCLUDED.limit_count
        RETURNING employee_id, limit_count, used_count
        "#,
    )
    .bind(employee_id)
    .bind(limit_count)
    .fetch_optional(db)
    .await
    .context("set referral limit")?;

    match updated {
        Some(limit) => Ok(SetLimitOutcome::Updated(limit)),
        None => {
            let (used,): (i32,) =
                sqlx::query_as("SELECT used_count FROM referral_limits WHERE employee_id = $1")
                    .bind(employee_id)
                    .fetch_one(db)
                    .await
                    .context("read used count")?;
            Ok(SetLimitOutcome::BelowUsage { used })
        }
    }
}

/// All configured limits, for the HR overview.
pub async fn list(db: &PgPool) -> anyhow::Result<Vec<ReferralLimit>> {
    let limits = sqlx::query_as::<_, ReferralLimit>(
        r#"
        SELECT employee_id, limit_count, used_count
        FROM referral_limits
        ORDER BY employee_id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(limits)
}
