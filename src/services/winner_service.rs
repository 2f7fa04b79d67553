use tracing::info;
use validator::Validate;

use crate::{
    dao::models::{RoomStatus, TallyEntity},
    dto::room::{PlayWinnerRequest, PlayWinnerResponse, PlayedWinnerDto, RoomResponse, WinnerResponse},
    error::ServiceError,
    services::{room_service::materialize_room, tally},
    state::SharedState,
};

async fn sorted_tallies(
    state: &SharedState,
    room_id: &str,
) -> Result<Vec<TallyEntity>, ServiceError> {
    let mut tallies = state.store().tallies(room_id.to_owned()).await?;
    tally::sort_tallies(&mut tallies);
    Ok(tallies)
}

/// Tallies of the room, plus the winner once voting has closed.
pub async fn get_winner(state: &SharedState, room_id: &str) -> Result<WinnerResponse, ServiceError> {
    let room = materialize_room(state, room_id).await?;
    let tallies = sorted_tallies(state, &room.id).await?;

    let winner = match room.status {
        RoomStatus::Closed => tally::leader(&tallies).cloned().map(Into::into),
        RoomStatus::Open => None,
    };

    Ok(WinnerResponse {
        room: room.into(),
        winner,
        tallies: tallies.into_iter().map(Into::into).collect(),
    })
}

/// Send the winner to a playback session. Playback is only ever triggered once per room.
pub async fn play_winner(
    state: &SharedState,
    room_id: &str,
    request: PlayWinnerRequest,
) -> Result<PlayWinnerResponse, ServiceError> {
    request.validate()?;

    let room = materialize_room(state, room_id).await?;

    if let Some(played) = room.played_item_id.clone() {
        let tallies = sorted_tallies(state, &room.id).await?;
        return Ok(PlayWinnerResponse {
            ok: true,
            winner: played_winner(tallies, played),
            room: room.into(),
            already_played: Some(true),
        });
    }

    if room.status != RoomStatus::Closed {
        return Err(ServiceError::InvalidInput(
            "Room is still open. Wait for close time or close it first.".into(),
        ));
    }

    let tallies = sorted_tallies(state, &room.id).await?;
    let Some(winner) = tally::leader(&tallies).cloned() else {
        return Err(ServiceError::InvalidInput(
            "No candidates/winner available".into(),
        ));
    };

    let session_id = request.session_id.trim().to_owned();
    state
        .media()
        .play_item(session_id.clone(), winner.item_id.clone())
        .await?;

    let recorded = state
        .store()
        .mark_played(room.id.clone(), winner.item_id.clone(), state.now())
        .await?;
    let room = materialize_room(state, &room.id).await?;

    if !recorded {
        // Another request recorded playback between our read and write.
        let played = room
            .played_item_id
            .clone()
            .unwrap_or_else(|| winner.item_id.clone());
        return Ok(PlayWinnerResponse {
            ok: true,
            winner: played_winner(tallies, played),
            room: room.into(),
            already_played: Some(true),
        });
    }

    info!(
        room_id = %room.id,
        item_id = %winner.item_id,
        session_id = %session_id,
        "winner sent to playback session"
    );

    Ok(PlayWinnerResponse {
        ok: true,
        room: room.into(),
        winner: PlayedWinnerDto::Tally(winner.into()),
        already_played: None,
    })
}

/// Close voting right away, whatever the deadline says.
pub async fn close_room(state: &SharedState, room_id: &str) -> Result<RoomResponse, ServiceError> {
    let mut room = materialize_room(state, room_id).await?;
    if room.status == RoomStatus::Open {
        state.store().close_room(room.id.clone()).await?;
        room.status = RoomStatus::Closed;
        info!(room_id = %room.id, "room closed manually");
    }
    Ok(RoomResponse { room: room.into() })
}

fn played_winner(tallies: Vec<TallyEntity>, played: String) -> PlayedWinnerDto {
    match tallies.into_iter().find(|tally| tally.item_id == played) {
        Some(tally) => PlayedWinnerDto::Tally(tally.into()),
        None => PlayedWinnerDto::Item { item_id: played },
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::{
        dto::room::{CastVoteRequest, CreateRoomRequest, GenerateCandidatesRequest, RoomStatusDto},
        services::{
            room_service,
            test_support::{FakeMediaServer, Harness, harness},
        },
    };

    async fn room_with_votes(h: &Harness, votes: &[(&str, &str)]) -> String {
        let request = CreateRoomRequest {
            name: "Friday".into(),
            closes_at: None,
            minutes_from_now: Some(1.0),
        };
        let id = room_service::create_room(&h.state, request)
            .await
            .unwrap()
            .room
            .id;
        let generate = GenerateCandidatesRequest {
            user_id: "u1".into(),
            count: Some(5.0),
            library_id: None,
        };
        room_service::generate_candidates(&h.state, &id, generate)
            .await
            .unwrap();
        for (voter, item) in votes {
            let vote = CastVoteRequest {
                voter_id: voter.to_string(),
                item_id: item.to_string(),
            };
            room_service::cast_vote(&h.state, &id, vote).await.unwrap();
        }
        id
    }

    fn play(session: &str) -> PlayWinnerRequest {
        PlayWinnerRequest {
            session_id: session.into(),
        }
    }

    #[tokio::test]
    async fn open_rooms_have_no_winner_but_show_tallies() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = room_with_votes(&h, &[("v1", "m3")]).await;

        let response = get_winner(&h.state, &id).await.unwrap();
        assert!(response.winner.is_none());
        assert_eq!(response.tallies.len(), 5);
        assert_eq!(response.tallies[0].item_id, "m3");
    }

    #[tokio::test]
    async fn winner_appears_after_the_deadline() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = room_with_votes(&h, &[("v1", "m2"), ("v2", "m2"), ("v3", "m4")]).await;

        h.clock.advance(Duration::seconds(61));
        let response = get_winner(&h.state, &id).await.unwrap();
        assert_eq!(response.room.status, RoomStatusDto::Closed);
        let winner = response.winner.unwrap();
        assert_eq!(winner.item_id, "m2");
        assert_eq!(winner.votes, 2);
    }

    #[tokio::test]
    async fn playing_requires_a_closed_room() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = room_with_votes(&h, &[]).await;

        let err = play_winner(&h.state, &id, play("s1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m.starts_with("Room is still open")));
        assert!(h.media.plays().is_empty());
    }

    #[tokio::test]
    async fn session_is_checked_before_the_room() {
        let h = harness(FakeMediaServer::default()).await;
        let err = play_winner(&h.state, "missing", play("")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "Missing sessionId"));
    }

    #[tokio::test]
    async fn playback_happens_once() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = room_with_votes(&h, &[("v1", "m5")]).await;
        close_room(&h.state, &id).await.unwrap();

        let first = play_winner(&h.state, &id, play("s1")).await.unwrap();
        assert_eq!(first.already_played, None);
        assert_eq!(first.room.played_item_id.as_deref(), Some("m5"));

        let second = play_winner(&h.state, &id, play("s1")).await.unwrap();
        assert_eq!(second.already_played, Some(true));
        assert!(matches!(second.winner, PlayedWinnerDto::Tally(ref t) if t.item_id == "m5"));

        assert_eq!(h.media.plays(), vec![("s1".to_string(), "m5".to_string())]);
    }

    #[tokio::test]
    async fn failed_playback_is_not_recorded() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = room_with_votes(&h, &[("v1", "m2")]).await;
        close_room(&h.state, &id).await.unwrap();

        h.media.set_fail_play(true);
        let err = play_winner(&h.state, &id, play("gone")).await.unwrap_err();
        assert!(matches!(err, ServiceError::MediaServer(_)));
        assert!(err.to_string().starts_with("Jellyfin request failed: 404 Not Found"));

        let stored = h.state.store().find_room(id.clone()).await.unwrap().unwrap();
        assert!(stored.played_item_id.is_none());
        assert!(stored.played_at.is_none());

        h.media.set_fail_play(false);
        let retry = play_winner(&h.state, &id, play("s1")).await.unwrap();
        assert_eq!(retry.already_played, None);
        assert_eq!(retry.room.played_item_id.as_deref(), Some("m2"));
        assert_eq!(h.media.plays(), vec![("s1".to_string(), "m2".to_string())]);
    }

    #[tokio::test]
    async fn empty_rooms_have_nothing_to_play() {
        let h = harness(FakeMediaServer::default()).await;
        let request = CreateRoomRequest {
            name: "Empty".into(),
            ..Default::default()
        };
        let id = room_service::create_room(&h.state, request)
            .await
            .unwrap()
            .room
            .id;
        close_room(&h.state, &id).await.unwrap();

        let err = play_winner(&h.state, &id, play("s1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "No candidates/winner available"));
    }

    #[tokio::test]
    async fn manual_close_is_idempotent_and_final() {
        let h = harness(FakeMediaServer::with_movies(5)).await;
        let id = room_with_votes(&h, &[]).await;

        let closed = close_room(&h.state, &id).await.unwrap();
        assert_eq!(closed.room.status, RoomStatusDto::Closed);
        let again = close_room(&h.state, &id).await.unwrap();
        assert_eq!(again.room.status, RoomStatusDto::Closed);

        let err = close_room(&h.state, "missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
