use time::Duration;
use tracing::info;
use validator::Validate;

use crate::{
    dao::models::{NewCandidate, RoomEntity, RoomStatus, VoteEntity},
    dto::room::{
        CandidatesResponse, CastVoteRequest, CreateRoomRequest, GenerateCandidatesRequest,
        OkResponse, ResultsResponse, RoomResponse,
    },
    error::ServiceError,
    services::tally,
    state::SharedState,
    util::{ROOM_ID_LENGTH, new_id, parse_timestamp},
};

const MIN_CANDIDATES: i64 = 5;
const MAX_CANDIDATES: i64 = 40;

/// Load a room and persist the `open -> closed` flip when its deadline has passed.
///
/// Every read of a room goes through here, so all callers observe the same status.
pub async fn materialize_room(
    state: &SharedState,
    room_id: &str,
) -> Result<RoomEntity, ServiceError> {
    let Some(mut room) = state.store().find_room(room_id.to_owned()).await? else {
        return Err(ServiceError::room_not_found());
    };

    if room.is_past_deadline(state.now()) {
        state.store().close_room(room.id.clone()).await?;
        room.status = RoomStatus::Closed;
        info!(room_id = %room.id, "room closed after its deadline");
    }

    Ok(room)
}

/// Open a new voting room.
pub async fn create_room(
    state: &SharedState,
    request: CreateRoomRequest,
) -> Result<RoomResponse, ServiceError> {
    request.validate()?;

    let now = state.now();
    let explicit = request
        .closes_at
        .as_deref()
        .filter(|raw| !raw.trim().is_empty());
    let closes_at = match explicit {
        Some(raw) => parse_timestamp(raw)
            .map_err(|err| ServiceError::InvalidInput(format!("Invalid closesAt: {err}")))?,
        None => {
            let minutes = request
                .minutes_from_now
                .unwrap_or(state.config().default_room_minutes)
                .max(1.0);
            Duration::checked_seconds_f64(minutes * 60.0)
                .and_then(|window| now.checked_add(window))
                .ok_or_else(|| {
                    ServiceError::InvalidInput("minutesFromNow is out of range".into())
                })?
        }
    };

    let room = RoomEntity::open(
        new_id(ROOM_ID_LENGTH),
        request.name.trim().to_owned(),
        now,
        closes_at,
    );
    state.store().insert_room(room.clone()).await?;
    info!(room_id = %room.id, name = %room.name, closes_at = %room.closes_at, "room created");

    Ok(RoomResponse { room: room.into() })
}

pub async fn get_room(state: &SharedState, room_id: &str) -> Result<RoomResponse, ServiceError> {
    let room = materialize_room(state, room_id).await?;
    Ok(RoomResponse { room: room.into() })
}

/// Sample movies from the media server and add them to the room.
///
/// Returns every candidate of the room, not only the ones added by this call.
pub async fn generate_candidates(
    state: &SharedState,
    room_id: &str,
    request: GenerateCandidatesRequest,
) -> Result<CandidatesResponse, ServiceError> {
    let room = materialize_room(state, room_id).await?;
    if room.status != RoomStatus::Open {
        return Err(ServiceError::InvalidInput("Room is not open".into()));
    }
    request.validate()?;

    let user_id = request.user_id.trim().to_owned();
    let library_id = request.library_id().map(str::to_owned);
    let count = request
        .requested_count()
        .unwrap_or(i64::from(state.config().default_candidate_count))
        .clamp(MIN_CANDIDATES, MAX_CANDIDATES) as u32;

    if let Some(ref library_id) = library_id {
        let libraries = state.media().list_movie_libraries(user_id.clone()).await?;
        let library_name = libraries
            .into_iter()
            .find(|library| &library.id == library_id)
            .map(|library| library.name);
        state
            .store()
            .set_library(room.id.clone(), library_id.clone(), library_name)
            .await?;
    }

    let movies = state
        .media()
        .sample_movies(user_id, count, library_id)
        .await?;
    let candidates = movies
        .into_iter()
        .map(|movie| NewCandidate {
            item_id: movie.item_id,
            title: movie.title,
            year: movie.year,
            runtime_minutes: movie.runtime_minutes,
            poster_url: Some(movie.poster_url),
        })
        .collect();

    let inserted = state
        .store()
        .insert_candidates(room.id.clone(), candidates, state.now())
        .await?;
    info!(room_id = %room.id, inserted, requested = count, "candidates generated");

    list_candidates(state, &room.id).await
}

pub async fn list_candidates(
    state: &SharedState,
    room_id: &str,
) -> Result<CandidatesResponse, ServiceError> {
    let room = materialize_room(state, room_id).await?;
    let candidates = state.store().list_candidates(room.id).await?;
    Ok(CandidatesResponse {
        candidates: candidates.into_iter().map(Into::into).collect(),
    })
}

/// Record a voter's pick, replacing any earlier vote of the same voter.
pub async fn cast_vote(
    state: &SharedState,
    room_id: &str,
    request: CastVoteRequest,
) -> Result<OkResponse, ServiceError> {
    let room = materialize_room(state, room_id).await?;
    if room.status == RoomStatus::Closed {
        return Err(ServiceError::InvalidInput("Voting is closed".into()));
    }
    request.validate()?;

    let item_id = request.item_id.trim().to_owned();
    let is_candidate = state
        .store()
        .candidate_exists(room.id.clone(), item_id.clone())
        .await?;
    if !is_candidate {
        return Err(ServiceError::InvalidInput(
            "Item is not a candidate in this room".into(),
        ));
    }

    state
        .store()
        .upsert_vote(VoteEntity {
            room_id: room.id,
            voter_id: request.voter_id.trim().to_owned(),
            item_id,
            created_at: state.now(),
        })
        .await?;

    Ok(OkResponse::ok())
}

/// Live tallies and raw votes. Only available while voting is open.
pub async fn get_results(
    state: &SharedState,
    room_id: &str,
) -> Result<ResultsResponse, ServiceError> {
    let room = materialize_room(state, room_id).await?;
    if room.status == RoomStatus::Closed {
        return Err(ServiceError::InvalidInput("Voting is closed".into()));
    }

    let mut tallies = state.store().tallies(room.id.clone()).await?;
    tally::sort_tallies(&mut tallies);
    let votes = state.store().list_votes(room.id.clone()).await?;

    Ok(ResultsResponse {
        room: room.into(),
        tallies: tallies.into_iter().map(Into::into).collect(),
        votes: votes.into_iter().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::room::RoomStatusDto,
        services::test_support::{FakeMediaServer, harness, start_time},
        util::format_timestamp,
    };

    fn create(name: &str, minutes: f64) -> CreateRoomRequest {
        CreateRoomRequest {
            name: name.into(),
            closes_at: None,
            minutes_from_now: Some(minutes),
        }
    }

    fn generate(count: i64) -> GenerateCandidatesRequest {
        GenerateCandidatesRequest {
            user_id: "u1".into(),
            count: Some(count as f64),
            library_id: None,
        }
    }

    fn vote(voter: &str, item: &str) -> CastVoteRequest {
        CastVoteRequest {
            voter_id: voter.into(),
            item_id: item.into(),
        }
    }

    #[tokio::test]
    async fn create_room_defaults_and_floors_the_window() {
        let h = harness(FakeMediaServer::default()).await;

        let room = create_room(&h.state, create("  Friday  ", 0.2))
            .await
            .unwrap()
            .room;
        assert_eq!(room.name, "Friday");
        assert_eq!(room.status, RoomStatusDto::Open);
        assert_eq!(
            room.closes_at,
            format_timestamp(start_time() + Duration::minutes(1))
        );

        let request = CreateRoomRequest {
            name: "Saturday".into(),
            ..Default::default()
        };
        let room = create_room(&h.state, request).await.unwrap().room;
        assert_eq!(
            room.closes_at,
            format_timestamp(start_time() + Duration::minutes(60))
        );
    }

    #[tokio::test]
    async fn explicit_deadline_wins_over_minutes() {
        let h = harness(FakeMediaServer::default()).await;
        let request = CreateRoomRequest {
            name: "Friday".into(),
            closes_at: Some("2024-05-01T22:00:00+02:00".into()),
            minutes_from_now: Some(5.0),
        };
        let room = create_room(&h.state, request).await.unwrap().room;
        assert_eq!(room.closes_at, "2024-05-01T20:00:00Z");
    }

    #[tokio::test]
    async fn huge_windows_are_rejected_instead_of_overflowing() {
        let h = harness(FakeMediaServer::default()).await;

        for minutes in [1e10, 1e300, f64::MAX] {
            let err = create_room(&h.state, create("Friday", minutes))
                .await
                .unwrap_err();
            assert!(
                matches!(err, ServiceError::InvalidInput(ref m) if m == "minutesFromNow is out of range"),
                "{minutes}: {err:?}"
            );
        }

        let room = create_room(&h.state, create("Long weekend", 60.0 * 24.0 * 3.0))
            .await
            .unwrap()
            .room;
        assert_eq!(
            room.closes_at,
            format_timestamp(start_time() + Duration::days(3))
        );
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let h = harness(FakeMediaServer::default()).await;
        let err = create_room(&h.state, create(" ", 5.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "Missing name"));
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let h = harness(FakeMediaServer::default()).await;
        let err = get_room(&h.state, "nope").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Room not found"));
    }

    #[tokio::test]
    async fn reading_past_the_deadline_closes_the_room() {
        let h = harness(FakeMediaServer::default()).await;
        let id = create_room(&h.state, create("Friday", 1.0)).await.unwrap().room.id;

        h.clock.advance(Duration::seconds(60));
        assert_eq!(
            get_room(&h.state, &id).await.unwrap().room.status,
            RoomStatusDto::Open
        );

        h.clock.advance(Duration::seconds(1));
        assert_eq!(
            get_room(&h.state, &id).await.unwrap().room.status,
            RoomStatusDto::Closed
        );

        let stored = h.state.store().find_room(id).await.unwrap().unwrap();
        assert_eq!(stored.status, RoomStatus::Closed);
    }

    #[tokio::test]
    async fn generation_is_clamped_and_never_duplicates() {
        let h = harness(FakeMediaServer::with_movies(50)).await;
        let id = create_room(&h.state, create("Friday", 10.0)).await.unwrap().room.id;

        let first = generate_candidates(&h.state, &id, generate(1)).await.unwrap();
        assert_eq!(first.candidates.len(), 5);

        let second = generate_candidates(&h.state, &id, generate(7)).await.unwrap();
        assert_eq!(second.candidates.len(), 7);
        assert_eq!(second.candidates[0].item_id, "m1");

        let third = generate_candidates(&h.state, &id, generate(100)).await.unwrap();
        assert_eq!(third.candidates.len(), 40);
    }

    #[tokio::test]
    async fn failed_sampling_adds_nothing() {
        let h = harness(FakeMediaServer::with_movies(10)).await;
        let id = create_room(&h.state, create("Friday", 10.0)).await.unwrap().room.id;

        h.media.set_fail_sample(true);
        let err = generate_candidates(&h.state, &id, generate(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MediaServer(_)));
        assert!(list_candidates(&h.state, &id).await.unwrap().candidates.is_empty());

        h.media.set_fail_sample(false);
        let response = generate_candidates(&h.state, &id, generate(5)).await.unwrap();
        assert_eq!(response.candidates.len(), 5);
    }

    #[tokio::test]
    async fn generation_locks_in_the_library_name() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = create_room(&h.state, create("Friday", 10.0)).await.unwrap().room.id;

        let request = GenerateCandidatesRequest {
            library_id: Some("lib1".into()),
            ..generate(5)
        };
        generate_candidates(&h.state, &id, request).await.unwrap();

        let room = get_room(&h.state, &id).await.unwrap().room;
        assert_eq!(room.library_id.as_deref(), Some("lib1"));
        assert_eq!(room.library_name.as_deref(), Some("Films"));
    }

    #[tokio::test]
    async fn generation_requires_open_room_then_user() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = create_room(&h.state, create("Friday", 1.0)).await.unwrap().room.id;

        let request = GenerateCandidatesRequest::default();
        let err = generate_candidates(&h.state, &id, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "Missing userId"));

        h.clock.advance(Duration::minutes(2));
        let err = generate_candidates(&h.state, &id, generate(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "Room is not open"));
    }

    #[tokio::test]
    async fn revoting_replaces_the_previous_vote() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = create_room(&h.state, create("Friday", 10.0)).await.unwrap().room.id;
        generate_candidates(&h.state, &id, generate(5)).await.unwrap();

        cast_vote(&h.state, &id, vote("v1", "m1")).await.unwrap();
        cast_vote(&h.state, &id, vote("v1", "m2")).await.unwrap();

        let results = get_results(&h.state, &id).await.unwrap();
        assert_eq!(results.votes.len(), 1);
        assert_eq!(results.votes[0].item_id, "m2");
        assert_eq!(results.tallies[0].item_id, "m2");
        assert_eq!(results.tallies[0].votes, 1);
    }

    #[tokio::test]
    async fn votes_must_target_a_candidate() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = create_room(&h.state, create("Friday", 10.0)).await.unwrap().room.id;
        generate_candidates(&h.state, &id, generate(5)).await.unwrap();

        let err = cast_vote(&h.state, &id, vote("v1", "zzz")).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::InvalidInput(ref m) if m == "Item is not a candidate in this room")
        );
    }

    #[tokio::test]
    async fn late_votes_close_the_room_instead() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = create_room(&h.state, create("Friday", 1.0)).await.unwrap().room.id;
        generate_candidates(&h.state, &id, generate(5)).await.unwrap();

        h.clock.advance(Duration::seconds(61));
        let err = cast_vote(&h.state, &id, vote("v1", "m1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "Voting is closed"));

        let stored = h.state.store().find_room(id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.status, RoomStatus::Closed);
        assert!(h.state.store().list_votes(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn results_are_refused_once_closed() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = create_room(&h.state, create("Friday", 1.0)).await.unwrap().room.id;

        assert!(get_results(&h.state, &id).await.is_ok());
        h.clock.advance(Duration::seconds(61));
        let err = get_results(&h.state, &id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(
            get_room(&h.state, &id).await.unwrap().room.status,
            RoomStatusDto::Closed
        );
    }
}
