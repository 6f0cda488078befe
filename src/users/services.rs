use tracing::info;

use crate::auth::services::hash_password;
use crate::state::AppState;
use crate::users::{repo, repo_types::Role};

/// Ensure the configured admin account exists. Called once at startup;
/// a no-op when unconfigured or already present.
pub async fn bootstrap_admin(state: &AppState) -> anyhow::Result<()> {
    let Some(admin) = &state.config.bootstrap_admin else {
        return Ok(());
    };

    if repo::find_by_email(&state.db, &admin.email).await?.is_some() {
        return Ok(());
    }

    let hash = hash_password(&admin.password)?;
    let user = repo::create(
        &state.db,
        &admin.name,
        &admin.email,
        Role::Admin,
        "",
        "",
        "",
        &hash,
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "bootstrap admin created");
    Ok(())
}
