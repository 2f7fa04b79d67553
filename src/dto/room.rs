use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{CandidateEntity, RoomEntity, RoomStatus, TallyEntity, VoteEntity},
    dto::validation::{lenient_number, validate_not_blank, validate_optional_timestamp},
    util::format_timestamp,
};

/// Payload used to open a new voting room.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: String,
    /// Explicit RFC 3339 deadline. Takes precedence over `minutesFromNow`.
    #[serde(default)]
    pub closes_at: Option<String>,
    /// Voting window length; values below one minute are raised to one.
    /// Numeric strings are accepted.
    #[serde(default, deserialize_with = "lenient_number")]
    pub minutes_from_now: Option<f64>,
}

impl Validate for CreateRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if validate_not_blank(&self.name).is_err() {
            errors.add("name", with_message("blank", "Missing name"));
        }

        if let Some(ref closes_at) = self.closes_at {
            if let Err(e) = validate_optional_timestamp(closes_at) {
                errors.add("closesAt", e);
            }
        }

        if let Some(minutes) = self.minutes_from_now {
            if !minutes.is_finite() {
                errors.add(
                    "minutesFromNow",
                    with_message("not_finite", "minutesFromNow must be a finite number"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Payload asking the server to draw candidates from the media library.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCandidatesRequest {
    /// Jellyfin user whose libraries are sampled.
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing userId"))]
    pub user_id: String,
    /// Number of movies to draw, clamped to 5..=40. Defaults to 12.
    /// Numeric strings are accepted and fractions are truncated.
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(value_type = Option<i64>)]
    pub count: Option<f64>,
    /// Restrict sampling to this library; blank means any library.
    #[serde(default)]
    pub library_id: Option<String>,
}

impl GenerateCandidatesRequest {
    /// Requested count as a whole number; non-finite values count as absent.
    pub fn requested_count(&self) -> Option<i64> {
        self.count
            .filter(|count| count.is_finite())
            .map(|count| count.trunc() as i64)
    }

    /// Library id with blank values treated as absent.
    pub fn library_id(&self) -> Option<&str> {
        self.library_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Payload casting or replacing a vote.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing voterId"))]
    pub voter_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing itemId"))]
    pub item_id: String,
}

/// Payload naming the playback session that should receive the winner.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayWinnerRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing sessionId"))]
    pub session_id: String,
}

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Room status as exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatusDto {
    Open,
    Closed,
}

impl From<RoomStatus> for RoomStatusDto {
    fn from(status: RoomStatus) -> Self {
        match status {
            RoomStatus::Open => RoomStatusDto::Open,
            RoomStatus::Closed => RoomStatusDto::Closed,
        }
    }
}

/// Public projection of a room.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub closes_at: String,
    pub status: RoomStatusDto,
    pub played_item_id: Option<String>,
    pub played_at: Option<String>,
    pub library_id: Option<String>,
    pub library_name: Option<String>,
}

impl From<RoomEntity> for RoomDto {
    fn from(room: RoomEntity) -> Self {
        Self {
            id: room.id,
            name: room.name,
            created_at: format_timestamp(room.created_at),
            closes_at: format_timestamp(room.closes_at),
            status: room.status.into(),
            played_item_id: room.played_item_id,
            played_at: room.played_at.map(format_timestamp),
            library_id: room.library_id,
            library_name: room.library_name,
        }
    }
}

/// Movie proposed in a room.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDto {
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
}

impl From<CandidateEntity> for CandidateDto {
    fn from(candidate: CandidateEntity) -> Self {
        Self {
            item_id: candidate.item_id,
            title: candidate.title,
            year: candidate.year,
            runtime_minutes: candidate.runtime_minutes,
            poster_url: candidate.poster_url,
        }
    }
}

/// Candidate with its current vote count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TallyDto {
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub votes: i64,
}

impl From<TallyEntity> for TallyDto {
    fn from(tally: TallyEntity) -> Self {
        Self {
            item_id: tally.item_id,
            title: tally.title,
            year: tally.year,
            runtime_minutes: tally.runtime_minutes,
            poster_url: tally.poster_url,
            votes: tally.votes,
        }
    }
}

/// A voter's current pick.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteDto {
    pub voter_id: String,
    pub item_id: String,
}

impl From<VoteEntity> for VoteDto {
    fn from(vote: VoteEntity) -> Self {
        Self {
            voter_id: vote.voter_id,
            item_id: vote.item_id,
        }
    }
}

/// Envelope returned by room creation, lookup and manual close.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomResponse {
    pub room: RoomDto,
}

/// Full candidate list of a room.
#[derive(Debug, Serialize, ToSchema)]
pub struct CandidatesResponse {
    pub candidates: Vec<CandidateDto>,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Live standings of an open room.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsResponse {
    pub room: RoomDto,
    pub tallies: Vec<TallyDto>,
    pub votes: Vec<VoteDto>,
}

/// Standings plus the winner once the room is closed.
#[derive(Debug, Serialize, ToSchema)]
pub struct WinnerResponse {
    pub room: RoomDto,
    /// `null` while the room is still open.
    pub winner: Option<TallyDto>,
    pub tallies: Vec<TallyDto>,
}

/// Winner reported by `playWinner`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PlayedWinnerDto {
    /// Winner with its tally.
    Tally(TallyDto),
    /// Only the item id is known (the played item is no longer among the tallies).
    Item {
        #[serde(rename = "itemId")]
        item_id: String,
    },
}

/// Outcome of `playWinner`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayWinnerResponse {
    pub ok: bool,
    pub room: RoomDto,
    pub winner: PlayedWinnerDto,
    /// Present and `true` when playback had already been triggered earlier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_played: Option<bool>,
}
