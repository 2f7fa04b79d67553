use std::{path::Path, str::FromStr, time::Duration};

use futures::future::BoxFuture;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use time::OffsetDateTime;
use tracing::info;

use crate::{
    dao::{
        models::{CandidateEntity, NewCandidate, RoomEntity, RoomStatus, TallyEntity, VoteEntity},
        room_store::RoomStore,
        storage::StorageResult,
    },
    util::{CANDIDATE_ID_LENGTH, new_id},
};

use super::{
    error::{SqliteDaoError, SqliteResult, stamp},
    models::{CandidateRow, RoomRow, TallyRow, VoteRow},
};

const CANDIDATE_COLUMNS: &str =
    "id, roomId, itemId, title, year, runtimeMinutes, posterUrl, createdAt";

/// Room store backed by a single SQLite file.
///
/// The pool holds one connection so every write goes through the same handle.
#[derive(Clone)]
pub struct SqliteRoomStore {
    pool: SqlitePool,
}

impl SqliteRoomStore {
    /// Open (creating if needed) the database file at `path` and apply the schema.
    pub async fn connect(path: impl AsRef<Path>) -> SqliteResult<Self> {
        let path = path.as_ref();
        let display_path = path.display().to_string();

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|source| SqliteDaoError::Open {
                path: display_path.clone(),
                source,
            })?;

        let store = Self { pool };
        store.migrate().await?;
        info!(path = %display_path, "opened SQLite room store");
        Ok(store)
    }

    /// Open a private in-memory database, mostly useful for tests.
    pub async fn in_memory() -> SqliteResult<Self> {
        let open_err = |source| SqliteDaoError::Open {
            path: ":memory:".into(),
            source,
        };
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(open_err)?
            .foreign_keys(true);

        // The database lives as long as its only connection does.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(open_err)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> SqliteResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|source| SqliteDaoError::Migrate { source })
    }

    async fn fetch_room(&self, id: &str) -> SqliteResult<Option<RoomEntity>> {
        let row = sqlx::query_as::<_, RoomRow>("SELECT * FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqliteDaoError::query("rooms"))?;
        row.map(RoomRow::into_entity).transpose()
    }

    async fn write_candidates(
        &self,
        room_id: &str,
        candidates: Vec<NewCandidate>,
        created_at: OffsetDateTime,
    ) -> SqliteResult<u64> {
        let created_at = stamp("candidates.createdAt", created_at)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(SqliteDaoError::query("candidates"))?;

        let mut inserted = 0;
        for candidate in candidates {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO candidates
                   (id, roomId, itemId, title, year, runtimeMinutes, posterUrl, createdAt)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(new_id(CANDIDATE_ID_LENGTH))
            .bind(room_id)
            .bind(&candidate.item_id)
            .bind(&candidate.title)
            .bind(candidate.year)
            .bind(candidate.runtime_minutes)
            .bind(&candidate.poster_url)
            .bind(&created_at)
            .execute(&mut *tx)
            .await
            .map_err(SqliteDaoError::query("candidates"))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(SqliteDaoError::query("candidates"))?;
        Ok(inserted)
    }
}

impl RoomStore for SqliteRoomStore {
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let created_at = stamp("rooms.createdAt", room.created_at)?;
            let closes_at = stamp("rooms.closesAt", room.closes_at)?;
            let played_at = room
                .played_at
                .map(|at| stamp("rooms.playedAt", at))
                .transpose()?;
            sqlx::query(
                "INSERT INTO rooms
                   (id, name, createdAt, closesAt, status, playedItemId, playedAt, libraryId, libraryName)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&room.id)
            .bind(&room.name)
            .bind(created_at)
            .bind(closes_at)
            .bind(room.status.as_str())
            .bind(&room.played_item_id)
            .bind(played_at)
            .bind(&room.library_id)
            .bind(&room.library_name)
            .execute(&store.pool)
            .await
            .map_err(SqliteDaoError::query("rooms"))?;
            Ok(())
        })
    }

    fn find_room(&self, id: String) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_room(&id).await.map_err(Into::into) })
    }

    fn close_room(&self, id: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            sqlx::query("UPDATE rooms SET status = ? WHERE id = ?")
                .bind(RoomStatus::Closed.as_str())
                .bind(&id)
                .execute(&store.pool)
                .await
                .map_err(SqliteDaoError::query("rooms"))?;
            Ok(())
        })
    }

    fn set_library(
        &self,
        id: String,
        library_id: String,
        library_name: Option<String>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            sqlx::query("UPDATE rooms SET libraryId = ?, libraryName = ? WHERE id = ?")
                .bind(&library_id)
                .bind(&library_name)
                .bind(&id)
                .execute(&store.pool)
                .await
                .map_err(SqliteDaoError::query("rooms"))?;
            Ok(())
        })
    }

    fn mark_played(
        &self,
        id: String,
        item_id: String,
        played_at: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let played_at = stamp("rooms.playedAt", played_at)?;
            let result = sqlx::query(
                "UPDATE rooms SET playedItemId = ?, playedAt = ?
                 WHERE id = ? AND playedItemId IS NULL",
            )
            .bind(&item_id)
            .bind(played_at)
            .bind(&id)
            .execute(&store.pool)
            .await
            .map_err(SqliteDaoError::query("rooms"))?;
            Ok(result.rows_affected() == 1)
        })
    }

    fn insert_candidates(
        &self,
        room_id: String,
        candidates: Vec<NewCandidate>,
        created_at: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .write_candidates(&room_id, candidates, created_at)
                .await
                .map_err(Into::into)
        })
    }

    fn list_candidates(
        &self,
        room_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<CandidateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = sqlx::query_as::<_, CandidateRow>(&format!(
                "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE roomId = ? ORDER BY rowid"
            ))
            .bind(&room_id)
            .fetch_all(&store.pool)
            .await
            .map_err(SqliteDaoError::query("candidates"))?;

            rows.into_iter()
                .map(|row| row.into_entity().map_err(Into::into))
                .collect()
        })
    }

    fn candidate_exists(
        &self,
        room_id: String,
        item_id: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let found: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM candidates WHERE roomId = ? AND itemId = ?")
                    .bind(&room_id)
                    .bind(&item_id)
                    .fetch_optional(&store.pool)
                    .await
                    .map_err(SqliteDaoError::query("candidates"))?;
            Ok(found.is_some())
        })
    }

    fn upsert_vote(&self, vote: VoteEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let created_at = stamp("votes.createdAt", vote.created_at)?;
            sqlx::query(
                "INSERT INTO votes (roomId, voterId, itemId, createdAt)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(roomId, voterId)
                 DO UPDATE SET itemId = excluded.itemId, createdAt = excluded.createdAt",
            )
            .bind(&vote.room_id)
            .bind(&vote.voter_id)
            .bind(&vote.item_id)
            .bind(created_at)
            .execute(&store.pool)
            .await
            .map_err(SqliteDaoError::query("votes"))?;
            Ok(())
        })
    }

    fn list_votes(&self, room_id: String) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = sqlx::query_as::<_, VoteRow>(
                "SELECT roomId, voterId, itemId, createdAt FROM votes
                 WHERE roomId = ? ORDER BY createdAt, voterId",
            )
            .bind(&room_id)
            .fetch_all(&store.pool)
            .await
            .map_err(SqliteDaoError::query("votes"))?;

            rows.into_iter()
                .map(|row| row.into_entity().map_err(Into::into))
                .collect()
        })
    }

    fn tallies(&self, room_id: String) -> BoxFuture<'static, StorageResult<Vec<TallyEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = sqlx::query_as::<_, TallyRow>(
                "SELECT c.itemId, c.title, c.year, c.runtimeMinutes, c.posterUrl,
                        COUNT(v.itemId) AS votes
                 FROM candidates c
                 LEFT JOIN votes v ON v.roomId = c.roomId AND v.itemId = c.itemId
                 WHERE c.roomId = ?
                 GROUP BY c.id",
            )
            .bind(&room_id)
            .fetch_all(&store.pool)
            .await
            .map_err(SqliteDaoError::query("candidates"))?;

            Ok(rows.into_iter().map(TallyEntity::from).collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&store.pool)
                .await
                .map_err(SqliteDaoError::query("sqlite_master"))?;
            Ok(())
        })
    }
}
