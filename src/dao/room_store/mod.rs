pub mod sqlite;

use futures::future::BoxFuture;
use time::OffsetDateTime;

use crate::dao::models::{CandidateEntity, NewCandidate, RoomEntity, TallyEntity, VoteEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for rooms, their candidates and votes.
pub trait RoomStore: Send + Sync {
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_room(&self, id: String) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// Flip the room to `closed`. Idempotent.
    fn close_room(&self, id: String) -> BoxFuture<'static, StorageResult<()>>;
    fn set_library(
        &self,
        id: String,
        library_id: String,
        library_name: Option<String>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Record the played item unless one is already recorded. Returns whether the write happened.
    fn mark_played(
        &self,
        id: String,
        item_id: String,
        played_at: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Insert all candidates atomically, skipping item ids already present in the room.
    /// Returns the number of rows actually inserted.
    fn insert_candidates(
        &self,
        room_id: String,
        candidates: Vec<NewCandidate>,
        created_at: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    fn list_candidates(
        &self,
        room_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<CandidateEntity>>>;
    fn candidate_exists(
        &self,
        room_id: String,
        item_id: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Insert or replace the vote keyed by `(room_id, voter_id)`.
    fn upsert_vote(&self, vote: VoteEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn list_votes(&self, room_id: String) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>>;
    /// Vote counts per candidate, zero for candidates nobody picked. Unordered.
    fn tallies(&self, room_id: String) -> BoxFuture<'static, StorageResult<Vec<TallyEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
