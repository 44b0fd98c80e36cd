pub mod auth;
pub mod health;
pub mod invites;
pub mod routes;
pub mod teams;
pub mod tournaments;
