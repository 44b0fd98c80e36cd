//! Team management (create / list / my / info / update / delete)

use actix_web::{delete, get, patch, post, web, HttpResponse};
use base64::Engine;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::settings;
use crate::db::{invite_repo, team_repo};
use crate::error::ApiError;
use crate::http::auth::WalletAuth;
use crate::rules;

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberReq {
    pub id: String,
    pub name: String,
    pub wallet_address: String,
}

/// Banner bytes arrive base64-encoded alongside their MIME type and are
/// stored inline on the team as a data URL.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerUpload {
    pub content_type: String,
    pub data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamReq {
    pub name: String,
    pub members: Vec<MemberReq>,
    #[serde(default)]
    pub twitter_link: Option<String>,
    #[serde(default)]
    pub banner_image: Option<BannerUpload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub twitter_link: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
}

fn encode_banner(upload: &BannerUpload) -> Result<String, ApiError> {
    // Round-trip through the engine so malformed payloads fail here, not
    // at render time.
    base64::engine::general_purpose::STANDARD
        .decode(&upload.data)
        .map_err(|_| ApiError::BadRequest("banner image is not valid base64".into()))?;
    Ok(format!("data:{};base64,{}", upload.content_type, upload.data))
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/teams
#[post("/teams")]
pub async fn create(
    auth: WalletAuth,
    body: web::Json<CreateTeamReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let wallets: Vec<&str> = body.members.iter().map(|m| m.wallet_address.as_str()).collect();
    rules::validate_new_team(
        &body.name,
        &wallets,
        settings().min_team_size,
        settings().max_team_size,
    )?;

    let banner_url = body.banner_image.as_ref().map(encode_banner).transpose()?;

    let members: Vec<team_repo::NewMember> = body
        .members
        .iter()
        .map(|m| team_repo::NewMember {
            member_id: m.id.clone(),
            display_name: m.name.clone(),
            wallet_address: m.wallet_address.clone(),
        })
        .collect();

    let team = team_repo::create_team(
        &db,
        body.name.trim(),
        &members,
        body.twitter_link.as_deref().filter(|s| !s.is_empty()),
        banner_url.as_deref(),
        &auth.wallet,
        settings().max_teams_per_creator,
    )
    .await?
    .ok_or_else(|| {
        ApiError::Conflict(format!(
            "you have reached the maximum limit of {} teams; delete a team before creating a new one",
            settings().max_teams_per_creator
        ))
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Team created successfully",
        "teamId": team.id,
        "team": team,
    })))
}

/// GET /api/teams — public listing with optional name search.
#[get("/teams")]
pub async fn list(
    web::Query(params): web::Query<ListParams>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let (teams, total_count) = team_repo::list_teams(&db, search, params.limit).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "teams": teams,
        "totalCount": total_count,
    })))
}

/// GET /api/teams/my — teams the caller created or belongs to, plus
/// their pending invites.
#[get("/teams/my")]
pub async fn my_teams(auth: WalletAuth, db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let teams = team_repo::teams_for_wallet(&db, &auth.wallet).await?;
    let invites = invite_repo::pending_for_wallet(&db, &auth.wallet).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "teams": teams,
        "totalCount": teams.len(),
        "invites": invites,
    })))
}

/// GET /api/teams/{id}
#[get("/teams/{id}")]
pub async fn info(path: web::Path<Uuid>, db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let team = team_repo::fetch_team(&db, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("team not found".into()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "team": team })))
}

/// PATCH /api/teams/{id} — name / twitter link only; creator-only.
#[patch("/teams/{id}")]
pub async fn update(
    auth: WalletAuth,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTeamReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let team_id = path.into_inner();
    let team = team_repo::fetch_team(&db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("team not found".into()))?;

    if team.created_by != auth.wallet {
        return Err(ApiError::Forbidden(
            "only the team creator may update this team".into(),
        ));
    }

    if let Some(name) = body.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("team name cannot be empty".into()));
        }
    }

    let updated = team_repo::update_team(
        &db,
        team_id,
        body.name.as_deref().map(str::trim),
        body.twitter_link.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("team not found".into()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Team updated successfully",
        "team": updated,
    })))
}

/// DELETE /api/teams/{id} — creator or admin; cascades to membership
/// links and invites.
#[delete("/teams/{id}")]
pub async fn remove(
    auth: WalletAuth,
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let team_id = path.into_inner();
    let team = team_repo::fetch_team(&db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("team not found".into()))?;

    // Authorization is settled before any write happens.
    if team.created_by != auth.wallet && !settings().is_admin(&auth.wallet) {
        return Err(ApiError::Forbidden(
            "you are not authorized to delete this team".into(),
        ));
    }

    team_repo::delete_team(&db, team_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Team deleted successfully",
    })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // `/teams/my` must mount ahead of `/teams/{id}`.
    cfg.service(create)
        .service(list)
        .service(my_teams)
        .service(info)
        .service(update)
        .service(remove);
}
