use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Team, TeamMemberRow, TeamRow};
use crate::rules::{self, MemberStatus};

/// Roster entry as submitted at creation time.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub member_id: String,
    pub display_name: String,
    pub wallet_address: String,
}

const TEAM_COLS: &str = "id, name, twitter_link, banner_url, created_at, created_by";

/// Create a team with its roster, the pending invites for every
/// non-creator member, and the creator's membership link — one
/// transaction, so a failed step leaves nothing behind.
///
/// Returns `None` when the creator already owns the maximum number of
/// teams; the cap is re-checked inside the insert itself so two
/// concurrent creates cannot both slip under it.
pub async fn create_team(
    db: &PgPool,
    name: &str,
    members: &[NewMember],
    twitter_link: Option<&str>,
    banner_url: Option<&str>,
    creator: &str,
    max_teams_per_creator: i64,
) -> Result<Option<Team>> {
    let mut tx = db.begin().await.context("starting create-team tx")?;

    let team_id = Uuid::new_v4();
    let inserted: Option<(Uuid, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
        r#"
        INSERT INTO teams (id, name, twitter_link, banner_url, created_by)
        SELECT $1, $2, $3, $4, $5
         WHERE (SELECT COUNT(*) FROM teams WHERE created_by = $5) < $6
        RETURNING id, created_at
        "#,
    )
    .bind(team_id)
    .bind(name)
    .bind(twitter_link)
    .bind(banner_url)
    .bind(creator)
    .bind(max_teams_per_creator)
    .fetch_optional(&mut *tx)
    .await
    .context("inserting team")?;

    let Some((_, created_at)) = inserted else {
        tx.rollback().await.ok();
        return Ok(None);
    };

    let mut roster = Vec::with_capacity(members.len());
    for (position, m) in members.iter().enumerate() {
        let status = rules::seed_member_status(&m.wallet_address, creator);
        sqlx::query(
            r#"
            INSERT INTO team_members (team_id, member_id, display_name,
                                      wallet_address, status, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(team_id)
        .bind(&m.member_id)
        .bind(&m.display_name)
        .bind(&m.wallet_address)
        .bind(status.as_str())
        .bind(position as i32)
        .execute(&mut *tx)
        .await
        .context("inserting team member")?;

        if status == MemberStatus::Pending {
            sqlx::query(
                r#"
                INSERT INTO invites (id, team_id, team_name, wallet_address, status)
                VALUES ($1, $2, $3, $4, 'pending')
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(team_id)
            .bind(name)
            .bind(&m.wallet_address)
            .execute(&mut *tx)
            .await
            .context("inserting member invite")?;
        }

        roster.push(TeamMemberRow {
            team_id,
            member_id: m.member_id.clone(),
            display_name: m.display_name.clone(),
            wallet_address: m.wallet_address.clone(),
            status: status.as_str().to_string(),
        });
    }

    // Creator joins their own team immediately.
    sqlx::query("INSERT INTO users (id, wallet_address) VALUES ($1, $2) ON CONFLICT (wallet_address) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(creator)
        .execute(&mut *tx)
        .await
        .context("upserting creator user")?;
    sqlx::query("INSERT INTO user_teams (wallet_address, team_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(creator)
        .bind(team_id)
        .execute(&mut *tx)
        .await
        .context("linking creator to team")?;

    tx.commit().await.context("committing create-team tx")?;

    Ok(Some(Team {
        id: team_id,
        name: name.to_string(),
        members: roster,
        twitter_link: twitter_link.map(String::from),
        banner_url: banner_url.map(String::from),
        created_at,
        created_by: creator.to_string(),
    }))
}

/// Fetch a team with its roster in creation order.
pub async fn fetch_team(db: &PgPool, team_id: Uuid) -> Result<Option<Team>> {
    let row: Option<TeamRow> =
        sqlx::query_as(&format!("SELECT {TEAM_COLS} FROM teams WHERE id = $1"))
            .bind(team_id)
            .fetch_optional(db)
            .await
            .context("fetching team")?;

    let Some(row) = row else { return Ok(None) };
    let members = members_for(db, &[team_id]).await?;
    Ok(Some(Team::assemble(row, members)))
}

/// Roster rows for a set of teams, ordered by position within each team.
async fn members_for(db: &PgPool, team_ids: &[Uuid]) -> Result<Vec<TeamMemberRow>> {
    sqlx::query_as(
        r#"
        SELECT team_id, member_id, display_name, wallet_address, status
          FROM team_members
         WHERE team_id = ANY($1)
         ORDER BY team_id, position
        "#,
    )
    .bind(team_ids)
    .fetch_all(db)
    .await
    .context("fetching team members")
}

fn assemble_all(rows: Vec<TeamRow>, members: Vec<TeamMemberRow>) -> Vec<Team> {
    use std::collections::HashMap;

    let mut by_team: HashMap<Uuid, Vec<TeamMemberRow>> = HashMap::new();
    for m in members {
        by_team.entry(m.team_id).or_default().push(m);
    }
    rows.into_iter()
        .map(|row| {
            let roster = by_team.remove(&row.id).unwrap_or_default();
            Team::assemble(row, roster)
        })
        .collect()
}

/// Public listing: optional case-insensitive name search, newest first.
/// The total count covers all teams, not just the returned page.
pub async fn list_teams(
    db: &PgPool,
    search: Option<&str>,
    limit: Option<i64>,
) -> Result<(Vec<Team>, i64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
        .fetch_one(db)
        .await
        .context("counting teams")?;

    let rows: Vec<TeamRow> = match (search, limit) {
        (Some(q), lim) => {
            let sql = format!(
                "SELECT {TEAM_COLS} FROM teams WHERE name ILIKE '%' || $1 || '%' \
                 ORDER BY created_at DESC LIMIT $2"
            );
            sqlx::query_as(&sql)
                .bind(q)
                // An explicit limit applies even while searching; a bare
                // search returns everything that matches.
                .bind(lim.unwrap_or(i64::MAX))
                .fetch_all(db)
                .await
        }
        (None, lim) => {
            let sql =
                format!("SELECT {TEAM_COLS} FROM teams ORDER BY created_at DESC LIMIT $1");
            sqlx::query_as(&sql)
                .bind(lim.unwrap_or(5))
                .fetch_all(db)
                .await
        }
    }
    .context("listing teams")?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let members = members_for(db, &ids).await?;
    Ok((assemble_all(rows, members), total))
}

/// Teams the wallet belongs to, as creator or roster member.
pub async fn teams_for_wallet(db: &PgPool, wallet: &str) -> Result<Vec<Team>> {
    let sql = "SELECT DISTINCT t.id, t.name, t.twitter_link, t.banner_url, t.created_at, t.created_by \
           FROM teams t \
           LEFT JOIN team_members m ON m.team_id = t.id \
          WHERE t.created_by = $1 OR m.wallet_address = $1 \
          ORDER BY t.created_at DESC";
    let rows: Vec<TeamRow> = sqlx::query_as(sql)
        .bind(wallet)
        .fetch_all(db)
        .await
        .context("fetching wallet teams")?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let members = members_for(db, &ids).await?;
    Ok(assemble_all(rows, members))
}

/// Fetch several teams by id (tournament roster expansion).
pub async fn teams_by_ids(db: &PgPool, ids: &[Uuid]) -> Result<Vec<Team>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT {TEAM_COLS} FROM teams WHERE id = ANY($1)");
    let rows: Vec<TeamRow> = sqlx::query_as(&sql)
        .bind(ids)
        .fetch_all(db)
        .await
        .context("fetching teams by id")?;

    let members = members_for(db, ids).await?;
    Ok(assemble_all(rows, members))
}

/// Patch name / twitter link. Existing invites keep the old team name.
pub async fn update_team(
    db: &PgPool,
    team_id: Uuid,
    name: Option<&str>,
    twitter_link: Option<&str>,
) -> Result<Option<Team>> {
    let updated: Option<(Uuid,)> = sqlx::query_as(
        r#"
        UPDATE teams
           SET name         = COALESCE($2, name),
               twitter_link = COALESCE($3, twitter_link)
         WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(team_id)
    .bind(name)
    .bind(twitter_link)
    .fetch_optional(db)
    .await
    .context("updating team")?;

    match updated {
        Some(_) => fetch_team(db, team_id).await,
        None => Ok(None),
    }
}

/// Delete a team and everything that references it: membership links and
/// invites go in the same transaction, roster rows via the FK cascade.
pub async fn delete_team(db: &PgPool, team_id: Uuid) -> Result<()> {
    let mut tx = db.begin().await.context("starting delete-team tx")?;

    sqlx::query("DELETE FROM invites WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut *tx)
        .await
        .context("deleting team invites")?;
    sqlx::query("DELETE FROM user_teams WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut *tx)
        .await
        .context("unlinking team members")?;
    sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(team_id)
        .execute(&mut *tx)
        .await
        .context("deleting team")?;

    tx.commit().await.context("committing delete-team tx")
}
