//! Runtime configuration for the fantasy-league server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Wallets with elevated rights (team deletion, bracket editing).
    pub admin_wallets: Vec<String>,
    /// Teams a single wallet may own at once.
    pub max_teams_per_creator: i64,
    /// Teams admitted into one tournament.
    pub tournament_capacity: i64,
    /// Member-list bounds enforced at team creation.
    pub min_team_size: usize,
    pub max_team_size: usize,
    /// Access-token lifetime (seconds).
    pub access_ttl: i64,
    /// Redis refresh-token TTL (seconds).
    pub refresh_ttl: u64,
}

impl Settings {
    fn from_env() -> Self {
        let admin_wallets = env::var("ADMIN_WALLETS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let max_teams_per_creator = env::var("MAX_TEAMS_PER_CREATOR")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(5);

        let tournament_capacity = env::var("TOURNAMENT_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(8);

        let min_team_size = env::var("MIN_TEAM_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5);

        let max_team_size = env::var("MAX_TEAM_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10);

        let access_ttl = env::var("ACCESS_TTL")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(900); // 15 min default

        let refresh_ttl = env::var("REFRESH_TTL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30 * 24 * 3_600);

        Settings {
            admin_wallets,
            max_teams_per_creator,
            tournament_capacity,
            min_team_size,
            max_team_size,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Whether the wallet is on the admin allow-list.
    pub fn is_admin(&self, wallet: &str) -> bool {
        self.admin_wallets.iter().any(|w| w == wallet)
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
