use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Bracket, Tournament};

const TOURNAMENT_COLS: &str = "id, name, teams, start_date, status";

/// The single tournament currently accepting teams, if any.
pub async fn active(db: &PgPool) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLS} FROM tournaments WHERE status = 'active' LIMIT 1");
    sqlx::query_as(&sql)
        .fetch_optional(db)
        .await
        .context("fetching active tournament")
}

/// Open a new active tournament seeded with one team.
pub async fn create_active(db: &PgPool, name: &str, team_id: Uuid) -> Result<Tournament> {
    let sql = format!(
        "INSERT INTO tournaments (id, name, teams, status) \
         VALUES ($1, $2, ARRAY[$3]::uuid[], 'active') \
         RETURNING {TOURNAMENT_COLS}"
    );
    sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(team_id)
        .fetch_one(db)
        .await
        .context("creating tournament")
}

/// Conditionally enroll a team: the append only lands while the team is
/// absent and the roster is under capacity, so two racing joins cannot
/// push the tournament past its limit. Returns false if the guard failed.
pub async fn append_team(
    db: &PgPool,
    tournament_id: Uuid,
    team_id: Uuid,
    capacity: i64,
) -> Result<bool> {
    let rows = sqlx::query(
        r#"
        UPDATE tournaments
           SET teams = array_append(teams, $2)
         WHERE id = $1
           AND NOT $2 = ANY(teams)
           AND cardinality(teams) < $3
        "#,
    )
    .bind(tournament_id)
    .bind(team_id)
    .bind(capacity)
    .execute(db)
    .await
    .context("appending team to tournament")?
    .rows_affected();

    Ok(rows == 1)
}

/// Latest admin-published display bracket.
pub async fn latest_bracket(db: &PgPool) -> Result<Option<Bracket>> {
    sqlx::query_as(
        "SELECT id, teams, created_at, updated_at, created_by \
           FROM brackets ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(db)
    .await
    .context("fetching bracket")
}

/// Publish a new bracket revision (admin-only at the HTTP layer).
pub async fn insert_bracket(
    db: &PgPool,
    teams: &serde_json::Value,
    created_by: &str,
) -> Result<Bracket> {
    sqlx::query_as(
        "INSERT INTO brackets (id, teams, created_by) VALUES ($1, $2, $3) \
         RETURNING id, teams, created_at, updated_at, created_by",
    )
    .bind(Uuid::new_v4())
    .bind(teams)
    .bind(created_by)
    .fetch_one(db)
    .await
    .context("inserting bracket")
}
