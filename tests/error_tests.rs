use actix_web::{http::StatusCode, ResponseError};
use fantasy_league_server::error::ApiError;
use fantasy_league_server::rules::RuleViolation;

#[test]
fn taxonomy_maps_to_stable_codes() {
    let cases = [
        (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "bad_request"),
        (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "unauthorized"),
        (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN, "forbidden"),
        (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
        (ApiError::Conflict("x".into()), StatusCode::CONFLICT, "conflict"),
    ];
    for (err, code, kind) in cases {
        assert_eq!(err.status_code(), code);
        assert_eq!(err.kind(), kind);
    }
}

#[test]
fn storage_errors_surface_as_internal_without_detail() {
    let err = ApiError::from(sqlx::Error::PoolClosed);
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    // The caller-visible message carries no driver detail.
    assert_eq!(err.to_string(), "internal server error");
}

#[test]
fn rule_violations_pick_the_right_kind() {
    assert_eq!(ApiError::from(RuleViolation::AlreadyAccepted).kind(), "conflict");
    assert_eq!(ApiError::from(RuleViolation::EmptyTeamName).kind(), "bad_request");
    assert_eq!(
        ApiError::from(RuleViolation::BadWallet("abc".into())).kind(),
        "bad_request"
    );
    assert_eq!(
        ApiError::from(RuleViolation::TeamSizeOutOfBounds { min: 5, max: 10 }).kind(),
        "bad_request"
    );
}
