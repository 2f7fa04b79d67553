use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    dao::models::{CandidateEntity, RoomEntity, RoomStatus, TallyEntity, VoteEntity},
    util::parse_timestamp,
};

use super::error::{SqliteDaoError, SqliteResult};

#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct RoomRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub closes_at: String,
    pub status: String,
    pub played_item_id: Option<String>,
    pub played_at: Option<String>,
    pub library_id: Option<String>,
    pub library_name: Option<String>,
}

impl RoomRow {
    pub fn into_entity(self) -> SqliteResult<RoomEntity> {
        let status = RoomStatus::parse(&self.status).ok_or_else(|| SqliteDaoError::InvalidColumn {
            table: "rooms",
            column: "status",
            value: self.status.clone(),
        })?;

        Ok(RoomEntity {
            created_at: column_timestamp("rooms", "createdAt", &self.created_at)?,
            closes_at: column_timestamp("rooms", "closesAt", &self.closes_at)?,
            played_at: self
                .played_at
                .as_deref()
                .map(|raw| column_timestamp("rooms", "playedAt", raw))
                .transpose()?,
            id: self.id,
            name: self.name,
            status,
            library_id: self.library_id,
            library_name: self.library_name,
            played_item_id: self.played_item_id,
        })
    }
}

#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct CandidateRow {
    pub id: String,
    pub room_id: String,
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub created_at: String,
}

impl CandidateRow {
    pub fn into_entity(self) -> SqliteResult<CandidateEntity> {
        Ok(CandidateEntity {
            created_at: column_timestamp("candidates", "createdAt", &self.created_at)?,
            id: self.id,
            room_id: self.room_id,
            item_id: self.item_id,
            title: self.title,
            year: self.year,
            runtime_minutes: self.runtime_minutes,
            poster_url: self.poster_url,
        })
    }
}

#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct VoteRow {
    pub room_id: String,
    pub voter_id: String,
    pub item_id: String,
    pub created_at: String,
}

impl VoteRow {
    pub fn into_entity(self) -> SqliteResult<VoteEntity> {
        Ok(VoteEntity {
            created_at: column_timestamp("votes", "createdAt", &self.created_at)?,
            room_id: self.room_id,
            voter_id: self.voter_id,
            item_id: self.item_id,
        })
    }
}

#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct TallyRow {
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub votes: i64,
}

impl From<TallyRow> for TallyEntity {
    fn from(row: TallyRow) -> Self {
        Self {
            item_id: row.item_id,
            title: row.title,
            year: row.year,
            runtime_minutes: row.runtime_minutes,
            poster_url: row.poster_url,
            votes: row.votes,
        }
    }
}

fn column_timestamp(
    table: &'static str,
    column: &'static str,
    raw: &str,
) -> SqliteResult<OffsetDateTime> {
    parse_timestamp(raw).map_err(|_| SqliteDaoError::InvalidColumn {
        table,
        column,
        value: raw.to_string(),
    })
}
