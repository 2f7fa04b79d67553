use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the movie night API.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::config::get_config,
        crate::routes::rooms::create_room,
        crate::routes::rooms::get_room,
        crate::routes::rooms::generate_candidates,
        crate::routes::rooms::list_candidates,
        crate::routes::rooms::cast_vote,
        crate::routes::rooms::get_results,
        crate::routes::winner::get_winner,
        crate::routes::winner::play_winner,
        crate::routes::winner::close_room,
        crate::routes::jellyfin::list_users,
        crate::routes::jellyfin::list_sessions,
        crate::routes::jellyfin::list_libraries,
        crate::routes::jellyfin::sample_movies,
        crate::routes::jellyfin::play_item,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::dto::health::HealthResponse,
            crate::dto::config::ConfigResponse,
            crate::dto::config::JellyfinConfigStatus,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::GenerateCandidatesRequest,
            crate::dto::room::CastVoteRequest,
            crate::dto::room::PlayWinnerRequest,
            crate::dto::room::RoomStatusDto,
            crate::dto::room::RoomDto,
            crate::dto::room::CandidateDto,
            crate::dto::room::TallyDto,
            crate::dto::room::VoteDto,
            crate::dto::room::RoomResponse,
            crate::dto::room::CandidatesResponse,
            crate::dto::room::OkResponse,
            crate::dto::room::ResultsResponse,
            crate::dto::room::WinnerResponse,
            crate::dto::room::PlayedWinnerDto,
            crate::dto::room::PlayWinnerResponse,
            crate::dto::jellyfin::PlayItemRequest,
            crate::dto::jellyfin::UserDto,
            crate::dto::jellyfin::SessionDto,
            crate::dto::jellyfin::LibraryDto,
            crate::dto::jellyfin::MovieDto,
            crate::dto::jellyfin::UsersResponse,
            crate::dto::jellyfin::SessionsResponse,
            crate::dto::jellyfin::LibrariesResponse,
            crate::dto::jellyfin::MoviesResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness and configuration checks"),
        (name = "rooms", description = "Rooms, candidates and votes"),
        (name = "winner", description = "Closing rooms and playing the winner"),
        (name = "jellyfin", description = "Media-server proxy"),
    )
)]
pub struct ApiDoc;
