use serde::Serialize;

use super::repo_types::{EnrolledCourse, JoinedActivity};
use crate::users::dto::PublicProfile;

/// Everything the dashboard shows for one user.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: PublicProfile,
    pub activities: Vec<JoinedActivity>,
    pub courses: Vec<EnrolledCourse>,
}
