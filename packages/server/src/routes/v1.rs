use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/videos", video_routes())
        .nest("/users", user_routes())
        .nest("/feed", feed_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn video_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::videos::list_videos,
            handlers::videos::upload_video
        ))
        .routes(routes!(handlers::videos::get_video))
        .routes(routes!(handlers::videos::stream_video))
        .layer(handlers::videos::upload_body_limit())
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::users::get_user_profile))
        .routes(routes!(handlers::users::get_user_videos))
        .routes(routes!(
            handlers::users::follow_user,
            handlers::users::unfollow_user
        ))
        .routes(routes!(handlers::users::get_followers))
        .routes(routes!(handlers::users::get_following))
}

fn feed_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::feed::get_feed))
}
