use fantasy_league_server::http::auth::{decode_wallet, issue_access_token};

const WALLET: &str = "AEnb3z3o8NoVH5r7ppVWXw2DCu84S8n1L5MsP1Hpz5wT";
const SECRET: &[u8] = b"test-secret";

#[test]
fn round_trip_carries_wallet() {
    let token = issue_access_token(WALLET, SECRET, 900).unwrap();
    assert_eq!(decode_wallet(&token, SECRET).as_deref(), Some(WALLET));
}

#[test]
fn wrong_secret_is_rejected() {
    let token = issue_access_token(WALLET, SECRET, 900).unwrap();
    assert_eq!(decode_wallet(&token, b"other-secret"), None);
}

#[test]
fn expired_token_is_rejected() {
    // Far enough in the past to clear the default leeway.
    let token = issue_access_token(WALLET, SECRET, -120).unwrap();
    assert_eq!(decode_wallet(&token, SECRET), None);
}

#[test]
fn garbage_is_rejected() {
    assert_eq!(decode_wallet("not-a-jwt", SECRET), None);
    assert_eq!(decode_wallet("", SECRET), None);
}
