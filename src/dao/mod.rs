/// Media-server (Jellyfin) client and its abstraction.
pub mod jellyfin;
/// Database model definitions.
pub mod models;
/// Room, candidate and vote persistence.
pub mod room_store;
/// Storage abstraction layer for database operations.
pub mod storage;
