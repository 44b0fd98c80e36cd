use fantasy_league_server::rules::{
    invite_transition, is_team_principal, is_valid_wallet, seed_member_status,
    team_verification, tournament_has_capacity, validate_new_team, wallet_in_any_roster,
    MemberStatus, RuleViolation, TeamVerification,
};

const CREATOR: &str = "AEnb3z3o8NoVH5r7ppVWXw2DCu84S8n1L5MsP1Hpz5wT";

/// Distinct well-formed wallet addresses for roster fixtures.
fn wallets(n: usize) -> Vec<String> {
    assert!(n <= 11); // 'a'..='k' stays inside the base58 alphabet
    (0..n)
        .map(|i| format!("{}xyz{}", &CREATOR[..40], char::from(b'a' + i as u8)))
        .collect()
}

#[test]
fn wallet_validation_bounds_and_alphabet() {
    assert!(is_valid_wallet(CREATOR));
    assert!(is_valid_wallet(&"1".repeat(32)));
    assert!(is_valid_wallet(&"z".repeat(44)));

    assert!(!is_valid_wallet(&"1".repeat(31)));
    assert!(!is_valid_wallet(&"1".repeat(45)));
    assert!(!is_valid_wallet(""));
    // 0, O, I and l are not base58.
    assert!(!is_valid_wallet(&"O".repeat(40)));
    assert!(!is_valid_wallet(&format!("{}!", &CREATOR[..39])));
}

#[test]
fn team_size_bounds() {
    let w = wallets(10);

    let four: Vec<&str> = w[..4].iter().map(String::as_str).collect();
    assert_eq!(
        validate_new_team("Alpha", &four, 5, 10),
        Err(RuleViolation::TeamSizeOutOfBounds { min: 5, max: 10 })
    );

    let five: Vec<&str> = w[..5].iter().map(String::as_str).collect();
    assert!(validate_new_team("Alpha", &five, 5, 10).is_ok());

    let ten: Vec<&str> = w.iter().map(String::as_str).collect();
    assert!(validate_new_team("Alpha", &ten, 5, 10).is_ok());

    let mut eleven = w.clone();
    eleven.push(format!("{}9999", &CREATOR[..40]));
    let eleven: Vec<&str> = eleven.iter().map(String::as_str).collect();
    assert_eq!(
        validate_new_team("Alpha", &eleven, 5, 10),
        Err(RuleViolation::TeamSizeOutOfBounds { min: 5, max: 10 })
    );
}

#[test]
fn team_name_and_roster_validation() {
    let w = wallets(5);
    let five: Vec<&str> = w.iter().map(String::as_str).collect();

    assert_eq!(
        validate_new_team("   ", &five, 5, 10),
        Err(RuleViolation::EmptyTeamName)
    );

    let mut with_bad = five.clone();
    with_bad[3] = "not-a-wallet";
    assert_eq!(
        validate_new_team("Alpha", &with_bad, 5, 10),
        Err(RuleViolation::BadWallet("not-a-wallet".into()))
    );

    let mut with_dup = five.clone();
    with_dup[4] = with_dup[0];
    assert_eq!(
        validate_new_team("Alpha", &with_dup, 5, 10),
        Err(RuleViolation::DuplicateMember(with_dup[0].into()))
    );
}

#[test]
fn creator_entry_is_accepted_others_pending() {
    assert_eq!(seed_member_status(CREATOR, CREATOR), MemberStatus::Accepted);
    let other = wallets(1).remove(0);
    assert_eq!(seed_member_status(&other, CREATOR), MemberStatus::Pending);
}

#[test]
fn accepted_invite_never_flips_to_rejected() {
    assert_eq!(
        invite_transition(MemberStatus::Accepted, MemberStatus::Rejected),
        Err(RuleViolation::AlreadyAccepted)
    );
    assert!(invite_transition(MemberStatus::Pending, MemberStatus::Accepted).is_ok());
    assert!(invite_transition(MemberStatus::Pending, MemberStatus::Rejected).is_ok());
    // Re-settling to the same state is an allowed no-op.
    assert!(invite_transition(MemberStatus::Accepted, MemberStatus::Accepted).is_ok());
}

#[test]
fn principal_is_creator_or_member() {
    let w = wallets(3);
    let members: Vec<&str> = w.iter().map(String::as_str).collect();

    assert!(is_team_principal(CREATOR, &members, CREATOR));
    assert!(is_team_principal(CREATOR, &members, &w[1]));
    assert!(!is_team_principal(CREATOR, &members, "stranger"));
}

#[test]
fn capacity_boundary() {
    assert!(tournament_has_capacity(0, 8));
    assert!(tournament_has_capacity(7, 8));
    assert!(!tournament_has_capacity(8, 8));
    assert!(!tournament_has_capacity(9, 8));
}

#[test]
fn one_team_per_wallet_per_tournament() {
    let a = wallets(5);
    let b = wallets(10)[5..].to_vec();

    let rosters = vec![
        (CREATOR, a.iter().map(String::as_str).collect::<Vec<_>>()),
        (b[0].as_str(), b[1..].iter().map(String::as_str).collect()),
    ];

    // Present as a member of the first roster.
    assert!(wallet_in_any_roster(rosters.clone(), &a[2]));
    // Present as creator of the second team.
    assert!(wallet_in_any_roster(rosters.clone(), &b[0]));
    // Not enrolled anywhere.
    assert!(!wallet_in_any_roster(rosters, "somebody-else"));
}

#[test]
fn verification_requires_every_member_accepted() {
    assert_eq!(
        team_verification(vec![Some("accepted"), Some("accepted")]),
        TeamVerification::Verified
    );
    assert_eq!(
        team_verification(vec![Some("accepted"), Some("pending")]),
        TeamVerification::Unverified
    );
    // A member with no recorded status counts as unverified.
    assert_eq!(
        team_verification(vec![Some("accepted"), None]),
        TeamVerification::Unverified
    );
    assert_eq!(
        team_verification(vec![Some("rejected")]),
        TeamVerification::Unverified
    );
    // An empty roster has nothing pending.
    assert_eq!(
        team_verification(Vec::<Option<&str>>::new()),
        TeamVerification::Verified
    );
}
