use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::earnings::repo_types::{Earning, EarningWithReferral};

/// Payout amount for a confirmation. A missing or zero bonus never blocks
/// the confirmation; it pays zero and leaves a trace in the logs.
pub fn bonus_amount(referral_id: Uuid, bonus: Decimal) -> Decimal {
    if bonus > Decimal::ZERO {
        bonus
    } else {
        warn!(%referral_id, "job has no referral bonus, recording zero earning");
        Decimal::ZERO
    }
}

/// Append the earning for a referral entering Confirmed, inside the same
/// transaction as the status flip. The UNIQUE key on referral_id makes a
/// replay a no-op rather than a double payout.
pub async fn record_confirmation(
    tx: &mut Transaction<'_, Postgres>,
    referral_id: Uuid,
    employee_id: Uuid,
    amount: Decimal,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO earnings (referral_id, employee_id, amount)
        VALUES ($1, $2, $3)
        ON CONFLICT (referral_id) DO NOTHING
        "#,
    )
    .bind(referral_id)
    .bind(employee_id)
    .bind(amount)
    .execute(&mut **tx)
    .await
    .context("record earning")?;
    Ok(result.rows_affected() > 0)
}

/// Earnings of one employee joined with their referrals, newest first.
pub async fn list_for_employee(
    db: &PgPool,
    employee_id: Uuid,
) -> anyhow::Result<Vec<EarningWithReferral>> {
    let earnings = sqlx::query_as::<_, EarningWithReferral>(
        r#"
        SELECT e.id, e.referral_id, e.employee_id, e.amount, e.date,
               r.candidate_name, r.status
        FROM earnings e
        JOIN referrals r ON r.id = e.referral_id
        WHERE e.employee_id = $1
        ORDER BY e.date DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(db)
    .await?;
    Ok(earnings)
}

/// Every earning on record, for the HR overview.
pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Earning>> {
    let earnings = sqlx::query_as::<_, Earning>(
        r#"
        SELECT id, referral_id, employee_id, amount, date
        FROM earnings
        ORDER BY date DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(earnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_bonus_is_paid_in_full() {
        let bonus = Decimal::new(150000, 2); // 1500.00
        assert_eq!(bonus_amount(Uuid::new_v4(), bonus), bonus);
    }

    #[test]
    fn zero_and_negative_bonus_pay_zero() {
        assert_eq!(bonus_amount(Uuid::new_v4(), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            bonus_amount(Uuid::new_v4(), Decimal::new(-100, 0)),
            Decimal::ZERO
        );
    }
}
