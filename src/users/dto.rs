use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Public part of the user returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: i64,
    pub handle: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            handle: user.handle.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Response for a successful profile update.
#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub message: String,
    pub profile: PublicProfile,
}
