use std::fmt;

use time::OffsetDateTime;

/// Lifecycle status of a voting room. Only ever moves from `Open` to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// Votes are accepted.
    Open,
    /// The deadline passed or the room was closed manually.
    Closed,
}

impl RoomStatus {
    /// Value stored in the `status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Open => "open",
            RoomStatus::Closed => "closed",
        }
    }

    /// Parse the value stored in the `status` column.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "open" => Some(RoomStatus::Open),
            "closed" => Some(RoomStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A voting room as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEntity {
    /// Short random identifier, also used in share links.
    pub id: String,
    /// Display name chosen by the creator.
    pub name: String,
    pub created_at: OffsetDateTime,
    /// Voting deadline; fixed at creation.
    pub closes_at: OffsetDateTime,
    pub status: RoomStatus,
    /// Library the candidates were drawn from, once one was chosen.
    pub library_id: Option<String>,
    pub library_name: Option<String>,
    /// Item pushed to a playback session; written at most once.
    pub played_item_id: Option<String>,
    pub played_at: Option<OffsetDateTime>,
}

impl RoomEntity {
    /// Build a freshly opened room.
    pub fn open(
        id: String,
        name: String,
        created_at: OffsetDateTime,
        closes_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            closes_at,
            status: RoomStatus::Open,
            library_id: None,
            library_name: None,
            played_item_id: None,
            played_at: None,
        }
    }

    /// True when the room is still marked open but its deadline has passed.
    pub fn is_past_deadline(&self, now: OffsetDateTime) -> bool {
        self.status == RoomStatus::Open && now > self.closes_at
    }
}

/// Movie proposed for a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntity {
    pub id: String,
    pub room_id: String,
    /// Media-server identifier of the movie.
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Movie metadata ready to be inserted as a candidate of some room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
}

/// The single active vote of a voter in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteEntity {
    pub room_id: String,
    pub voter_id: String,
    pub item_id: String,
    pub created_at: OffsetDateTime,
}

/// Candidate together with the number of votes it currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyEntity {
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub votes: i64,
}
