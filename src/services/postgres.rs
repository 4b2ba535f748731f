use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::models::{LikeToggle, Profile};
use crate::services::store::{ProfileStore, StoreError};

const PROFILE_COLUMNS: &str = r#"
    id, full_name, profile_picture, status, bio, is_verified, is_profile_complete,
    campus, gender, food_preference, social_preference, sleep_schedule, study_style,
    smoking, drinking, guest_friendly, hobbies, languages_spoken, budget
"#;

/// PostgreSQL-backed profile store
///
/// Profiles live in `profiles`, liked sets in `liked_profiles`. Liked targets
/// are not foreign keys, so a deleted profile leaves a dangling like that is
/// skipped on read.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        profile_picture: row.try_get("profile_picture")?,
        status: row.try_get("status")?,
        bio: row.try_get("bio")?,
        is_verified: row.try_get("is_verified")?,
        is_profile_complete: row.try_get("is_profile_complete")?,
        campus: row.try_get("campus")?,
        gender: row.try_get("gender")?,
        food_preference: row.try_get("food_preference")?,
        social_preference: row.try_get("social_preference")?,
        sleep_schedule: row.try_get("sleep_schedule")?,
        study_style: row.try_get("study_style")?,
        smoking: row.try_get("smoking")?,
        drinking: row.try_get("drinking")?,
        guest_friendly: row.try_get("guest_friendly")?,
        hobbies: row.try_get("hobbies")?,
        languages_spoken: row.try_get("languages_spoken")?,
        budget: row.try_get("budget")?,
    })
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    async fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {} FROM profiles WHERE id = ANY($1)", PROFILE_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_id: HashMap<String, Profile> = rows
            .iter()
            .map(|row| profile_from_row(row).map(|p| (p.id.clone(), p)))
            .collect::<Result<_, _>>()?;

        // Preserve the caller's order
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn liked_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let query = r#"
            SELECT target_user_id
            FROM liked_profiles
            WHERE user_id = $1
            ORDER BY liked_at ASC, target_user_id ASC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let liked: Vec<String> = rows
            .iter()
            .map(|row| row.try_get("target_user_id"))
            .collect::<Result<_, _>>()?;

        tracing::debug!("User {} has liked {} profiles", user_id, liked.len());

        Ok(liked)
    }

    async fn candidate_pool(
        &self,
        exclude_id: &str,
        exclude_ids: &[String],
    ) -> Result<Vec<Profile>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM profiles
            WHERE is_profile_complete
              AND id <> $1
              AND NOT (id = ANY($2))
            ORDER BY id ASC
            "#,
            PROFILE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(exclude_id)
            .bind(exclude_ids)
            .fetch_all(&self.pool)
            .await?;

        let pool = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pool)
    }

    /// Delete-or-insert in a single transaction
    ///
    /// The user's profile row is locked first, so concurrent toggles for the
    /// same user run one after another.
    async fn toggle_like(&self, user_id: &str, target_id: &str) -> Result<LikeToggle, StoreError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT 1 FROM profiles WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        if !exists {
            return Err(StoreError::NotFound(format!("User {} not found", user_id)));
        }

        let removed = sqlx::query(
            "DELETE FROM liked_profiles WHERE user_id = $1 AND target_user_id = $2",
        )
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let outcome = if removed > 0 {
            LikeToggle::Unliked
        } else {
            sqlx::query(
                r#"
                INSERT INTO liked_profiles (user_id, target_user_id, liked_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (user_id, target_user_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(target_id)
            .execute(&mut *tx)
            .await?;
            LikeToggle::Liked
        };

        tx.commit().await?;

        tracing::debug!("Like toggle: {} -> {} ({:?})", user_id, target_id, outcome);

        Ok(outcome)
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO profiles (
                id, full_name, profile_picture, status, bio, is_verified, is_profile_complete,
                campus, gender, food_preference, social_preference, sleep_schedule, study_style,
                smoking, drinking, guest_friendly, hobbies, languages_spoken, budget, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, NOW())
            ON CONFLICT (id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                profile_picture = EXCLUDED.profile_picture,
                status = EXCLUDED.status,
                bio = EXCLUDED.bio,
                is_verified = EXCLUDED.is_verified,
                is_profile_complete = EXCLUDED.is_profile_complete,
                campus = EXCLUDED.campus,
                gender = EXCLUDED.gender,
                food_preference = EXCLUDED.food_preference,
                social_preference = EXCLUDED.social_preference,
                sleep_schedule = EXCLUDED.sleep_schedule,
                study_style = EXCLUDED.study_style,
                smoking = EXCLUDED.smoking,
                drinking = EXCLUDED.drinking,
                guest_friendly = EXCLUDED.guest_friendly,
                hobbies = EXCLUDED.hobbies,
                languages_spoken = EXCLUDED.languages_spoken,
                budget = EXCLUDED.budget,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(&profile.id)
            .bind(&profile.full_name)
            .bind(&profile.profile_picture)
            .bind(&profile.status)
            .bind(&profile.bio)
            .bind(profile.is_verified)
            .bind(profile.is_profile_complete)
            .bind(&profile.campus)
            .bind(&profile.gender)
            .bind(&profile.food_preference)
            .bind(&profile.social_preference)
            .bind(&profile.sleep_schedule)
            .bind(&profile.study_style)
            .bind(profile.smoking)
            .bind(profile.drinking)
            .bind(profile.guest_friendly)
            .bind(&profile.hobbies)
            .bind(&profile.languages_spoken)
            .bind(profile.budget)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
