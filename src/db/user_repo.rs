use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{User, UserProfile};

/// Fetch-or-create by wallet address: users come into existence on their
/// first authentication call and are never deleted.
pub async fn upsert_user(db: &PgPool, wallet: &str) -> Result<User> {
    sqlx::query_as(
        r#"
        INSERT INTO users (id, wallet_address)
        VALUES ($1, $2)
        ON CONFLICT (wallet_address)
        DO UPDATE SET wallet_address = EXCLUDED.wallet_address
        RETURNING id, wallet_address, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(wallet)
    .fetch_one(db)
    .await
    .context("upserting user")
}

pub async fn fetch_by_wallet(db: &PgPool, wallet: &str) -> Result<Option<User>> {
    sqlx::query_as("SELECT id, wallet_address, created_at FROM users WHERE wallet_address = $1")
        .bind(wallet)
        .fetch_optional(db)
        .await
        .context("fetching user")
}

/// Team-id set for a wallet (the `$addToSet` side of the model).
pub async fn team_ids_for(db: &PgPool, wallet: &str) -> Result<Vec<Uuid>> {
    sqlx::query_scalar("SELECT team_id FROM user_teams WHERE wallet_address = $1")
        .bind(wallet)
        .fetch_all(db)
        .await
        .context("fetching user team ids")
}

/// Assemble the API-facing profile: identity, team-id set, and the
/// stored-but-unread notifications list.
pub async fn profile(db: &PgPool, user: User) -> Result<UserProfile> {
    let teams = team_ids_for(db, &user.wallet_address).await?;
    let notifications: Vec<(serde_json::Value,)> = sqlx::query_as(
        "SELECT body FROM notifications WHERE wallet_address = $1 ORDER BY created_at",
    )
    .bind(&user.wallet_address)
    .fetch_all(db)
    .await
    .context("fetching notifications")?;

    Ok(UserProfile {
        id: user.id,
        wallet_address: user.wallet_address,
        created_at: user.created_at,
        teams,
        notifications: notifications.into_iter().map(|(b,)| b).collect(),
    })
}
