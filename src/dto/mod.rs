pub mod config;
pub mod health;
pub mod jellyfin;
pub mod room;
pub mod validation;
