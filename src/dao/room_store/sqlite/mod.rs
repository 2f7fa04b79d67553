mod error;
mod models;
mod store;

pub use error::SqliteDaoError;
pub use store::SqliteRoomStore;
