use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Local user profile
///
/// `auth_id` references the external identity it was created for and is
/// never rewritten after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LocalProfile {
    pub id: Uuid,
    pub auth_id: String,
    pub name: String,
}
