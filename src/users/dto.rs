use serde::{Deserialize, Serialize};

use crate::auth::dto::PublicUser;
use crate::users::repo_types::Role;

/// Admin request to provision an account.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role, // HR or Employee; admins are not created over the API
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub workplace: String,
    #[serde(default)]
    pub designation: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub user: PublicUser,
    /// False when the credential email could not be delivered; the account
    /// exists either way and the admin has to re-issue manually.
    pub credentials_emailed: bool,
}
