use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Invite;

const INVITE_COLS: &str = "id, team_id, team_name, wallet_address, status, created_at";

/// Insert a pending invite. Uniqueness of {team, wallet, pending} is a
/// partial index in the schema, so a concurrent duplicate loses at the
/// database rather than in a read-then-write check; `None` means the
/// pair already has a pending invite.
pub async fn create_invite(
    db: &PgPool,
    team_id: Uuid,
    team_name: &str,
    wallet: &str,
) -> Result<Option<Invite>> {
    let sql = format!(
        "INSERT INTO invites (id, team_id, team_name, wallet_address, status) \
         VALUES ($1, $2, $3, $4, 'pending') \
         RETURNING {INVITE_COLS}"
    );
    let res = sqlx::query_as::<_, Invite>(&sql)
        .bind(Uuid::new_v4())
        .bind(team_id)
        .bind(team_name)
        .bind(wallet)
        .fetch_one(db)
        .await;

    match res {
        Ok(invite) => Ok(Some(invite)),
        Err(sqlx::Error::Database(db_err)) if db_err.code() == Some("23505".into()) => Ok(None),
        Err(e) => Err(e).context("inserting invite"),
    }
}

pub async fn fetch_invite(db: &PgPool, invite_id: Uuid) -> Result<Option<Invite>> {
    let sql = format!("SELECT {INVITE_COLS} FROM invites WHERE id = $1");
    sqlx::query_as(&sql)
        .bind(invite_id)
        .fetch_optional(db)
        .await
        .context("fetching invite")
}

/// Pending invites addressed to a wallet.
pub async fn pending_for_wallet(db: &PgPool, wallet: &str) -> Result<Vec<Invite>> {
    let sql = format!(
        "SELECT {INVITE_COLS} FROM invites \
          WHERE wallet_address = $1 AND status = 'pending' \
          ORDER BY created_at DESC"
    );
    sqlx::query_as(&sql)
        .bind(wallet)
        .fetch_all(db)
        .await
        .context("fetching pending invites")
}

/// Accept an invite: flip the invite, flip the embedded roster status,
/// and add the team to the wallet's set — one transaction. The link
/// insert is add-if-absent, so accepting twice never duplicates it.
pub async fn accept_invite(db: &PgPool, invite: &Invite) -> Result<()> {
    let mut tx = db.begin().await.context("starting accept-invite tx")?;

    sqlx::query("UPDATE invites SET status = 'accepted' WHERE id = $1")
        .bind(invite.id)
        .execute(&mut *tx)
        .await
        .context("updating invite status")?;

    sqlx::query(
        "UPDATE team_members SET status = 'accepted' \
          WHERE team_id = $1 AND wallet_address = $2",
    )
    .bind(invite.team_id)
    .bind(&invite.wallet_address)
    .execute(&mut *tx)
    .await
    .context("updating roster status")?;

    sqlx::query("INSERT INTO users (id, wallet_address) VALUES ($1, $2) ON CONFLICT (wallet_address) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(&invite.wallet_address)
        .execute(&mut *tx)
        .await
        .context("upserting invited user")?;
    sqlx::query("INSERT INTO user_teams (wallet_address, team_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(&invite.wallet_address)
        .bind(invite.team_id)
        .execute(&mut *tx)
        .await
        .context("linking user to team")?;

    tx.commit().await.context("committing accept-invite tx")
}

/// Reject an invite: the invite row alone changes, roster and user
/// records stay untouched.
pub async fn reject_invite(db: &PgPool, invite_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE invites SET status = 'rejected' WHERE id = $1")
        .bind(invite_id)
        .execute(db)
        .await
        .context("rejecting invite")?;
    Ok(())
}
