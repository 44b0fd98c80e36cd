//! Tournament joining and the admin-published display bracket.

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::settings;
use crate::db::models::{Team, Tournament};
use crate::db::{team_repo, tournament_repo};
use crate::error::ApiError;
use crate::http::auth::WalletAuth;
use crate::rules::{self, TeamVerification};

//////////////////////////////////////////////////
// Requests / views
//////////////////////////////////////////////////

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinReq {
    pub team_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketReq {
    pub bracket_teams: serde_json::Value,
}

/// Enrolled team plus its derived verified/unverified display status.
#[derive(Serialize)]
pub struct EnrolledTeam {
    #[serde(flatten)]
    pub team: Team,
    pub status: TeamVerification,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTournamentView {
    pub id: Uuid,
    pub name: String,
    pub teams: Vec<EnrolledTeam>,
    pub start_date: chrono::DateTime<Utc>,
    pub status: String,
}

fn with_status(team: Team) -> EnrolledTeam {
    let status = rules::team_verification(
        team.members.iter().map(|m| Some(m.status.as_str())),
    );
    EnrolledTeam { team, status }
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/tournaments/join
///
/// Checks run in order, each short-circuiting with its own error: team
/// exists, caller belongs to it, tournament exists (else one is opened),
/// team not already enrolled, capacity, one-team-per-wallet. The final
/// append re-checks capacity and membership atomically.
#[post("/tournaments/join")]
pub async fn join(
    auth: WalletAuth,
    info: web::Json<JoinReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let team = team_repo::fetch_team(&db, info.team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("team not found".into()))?;

    if !rules::is_team_principal(&team.created_by, &team.member_wallets(), &auth.wallet) {
        return Err(ApiError::Forbidden(
            "you are not a member or creator of this team".into(),
        ));
    }

    let Some(active_tournament) = tournament_repo::active(&db).await? else {
        // No tournament accepting teams: open one around this team.
        let name = format!("Tournament {}", Utc::now().format("%Y-%m-%d"));
        let tournament = tournament_repo::create_active(&db, &name, team.id).await?;
        return Ok(HttpResponse::Created().json(serde_json::json!({
            "message": "Successfully joined new tournament",
            "tournamentId": tournament.id,
            "tournament": tournament,
        })));
    };

    if active_tournament.teams.contains(&team.id) {
        return Err(ApiError::Conflict("team is already in this tournament".into()));
    }

    let capacity = settings().tournament_capacity;
    if !rules::tournament_has_capacity(active_tournament.teams.len(), capacity) {
        return Err(ApiError::Conflict(format!(
            "tournament is full (maximum {capacity} teams)"
        )));
    }

    // One team per wallet per tournament, as creator or member.
    let enrolled = team_repo::teams_by_ids(&db, &active_tournament.teams).await?;
    let rosters = enrolled
        .iter()
        .map(|t| (t.created_by.as_str(), t.member_wallets()));
    if rules::wallet_in_any_roster(rosters, &auth.wallet) {
        return Err(ApiError::Conflict(
            "you are already in this tournament with another team".into(),
        ));
    }

    if !tournament_repo::append_team(&db, active_tournament.id, team.id, capacity).await? {
        // Lost a race with another join between the checks and the write.
        return Err(ApiError::Conflict(format!(
            "tournament is full (maximum {capacity} teams)"
        )));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully joined tournament",
        "tournamentId": active_tournament.id,
    })))
}

/// GET /api/tournaments/active — the tournament with its rosters
/// expanded and per-team verification computed on read.
#[get("/tournaments/active")]
pub async fn active(db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let Some(tournament) = tournament_repo::active(&db).await? else {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "tournament": null })));
    };

    let Tournament {
        id,
        name,
        teams,
        start_date,
        status,
    } = tournament;
    let enrolled = team_repo::teams_by_ids(&db, &teams)
        .await?
        .into_iter()
        .map(with_status)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "tournament": ActiveTournamentView {
            id,
            name,
            teams: enrolled,
            start_date,
            status,
        }
    })))
}

/// GET /api/tournaments/bracket
#[get("/tournaments/bracket")]
pub async fn bracket(db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let teams = tournament_repo::latest_bracket(&db)
        .await?
        .map(|b| b.teams)
        .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));

    Ok(HttpResponse::Ok().json(serde_json::json!({ "bracketTeams": teams })))
}

/// POST /api/tournaments/bracket — admin-only replacement.
#[post("/tournaments/bracket")]
pub async fn update_bracket(
    auth: WalletAuth,
    info: web::Json<BracketReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    if !info.bracket_teams.is_array() {
        return Err(ApiError::BadRequest("invalid bracket teams format".into()));
    }
    if !settings().is_admin(&auth.wallet) {
        return Err(ApiError::Forbidden("admin access required".into()));
    }

    tournament_repo::insert_bracket(&db, &info.bracket_teams, &auth.wallet).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "bracketTeams": info.bracket_teams,
        "message": "Tournament bracket updated successfully",
    })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(join)
        .service(active)
        .service(bracket)
        .service(update_bracket);
}
