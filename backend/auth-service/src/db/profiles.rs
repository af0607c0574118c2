/// Profile database operations
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::error::StoreError;
use crate::models::LocalProfile;
use crate::services::ProfileStore;

/// Insert a profile for `auth_id`. The id is generated by the database.
pub async fn create_profile(
    pool: &PgPool,
    auth_id: &str,
    name: &str,
) -> Result<LocalProfile, StoreError> {
    let profile = sqlx::query_as::<_, LocalProfile>(
        r#"
        INSERT INTO users (auth_id, name)
        VALUES ($1, $2)
        RETURNING id, auth_id, name
        "#,
    )
    .bind(auth_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

/// `ProfileStore` backed by the `users` table
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn create(&self, auth_id: &str, name: &str) -> Result<LocalProfile, StoreError> {
        let profile = create_profile(&self.pool, auth_id, name).await?;
        debug!(profile_id = %profile.id, auth_id = %auth_id, "Profile created");
        Ok(profile)
    }
}
