use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::context::{Locale, Timezone};
use crate::services::{LocalizedTask, render_greeting};
use crate::utils::ApiResult;

// Greet a user in the negotiated language and timezone
#[utoipa::path(
    get,
    path = "/hello/{username}/",
    params(
        ("username" = String, Path, description = "Name to greet"),
        ("Accept-Language" = Option<String>, Header, description = "Preferred languages, e.g. zh-CN,zh;q=0.9"),
        ("X-Timezone" = Option<String>, Header, description = "IANA timezone name, e.g. America/New_York")
    ),
    responses(
        (status = 200, description = "Localized greeting", body = String, content_type = "text/plain")
    ),
    tag = "Hello"
)]
pub async fn hello(
    Path(username): Path<String>,
    Locale(localizer): Locale,
    Timezone(tz): Timezone,
) -> String {
    tracing::debug!("Greeting {} in {} ({})", username, localizer.language(), tz);
    render_greeting(&localizer, tz, &username, Utc::now())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingArgs {
    pub username: String,
}

// Same greeting, rendered by a background task
#[utoipa::path(
    get,
    path = "/hello-with-task/{username}/",
    params(
        ("username" = String, Path, description = "Name to greet"),
        ("Accept-Language" = Option<String>, Header, description = "Preferred languages"),
        ("X-Timezone" = Option<String>, Header, description = "IANA timezone name")
    ),
    responses(
        (status = 200, description = "Localized greeting", body = String, content_type = "text/plain"),
        (status = 500, description = "Background task failed")
    ),
    tag = "Hello"
)]
pub async fn hello_with_task(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Locale(localizer): Locale,
    Timezone(tz): Timezone,
) -> ApiResult<String> {
    let task = LocalizedTask::new(GreetingArgs { username }).capture(&localizer, tz);
    tracing::debug!("Dispatching greeting task for {}", task.args.username);

    let body = state
        .tasks
        .apply_async(task, |ctx, args| {
            render_greeting(&ctx.localizer, ctx.timezone, &args.username, Utc::now())
        })
        .await?;

    Ok(body)
}

// Ask the Greeter gRPC service, forwarding this request's language and timezone
#[utoipa::path(
    get,
    path = "/hello-with-grpc/{username}/",
    params(
        ("username" = String, Path, description = "Name to greet"),
        ("Accept-Language" = Option<String>, Header, description = "Preferred languages"),
        ("X-Timezone" = Option<String>, Header, description = "IANA timezone name")
    ),
    responses(
        (status = 200, description = "Greeting from the gRPC service", body = String, content_type = "text/plain"),
        (status = 502, description = "Greeter unreachable or the call failed")
    ),
    tag = "Hello"
)]
pub async fn hello_with_grpc(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Locale(localizer): Locale,
    Timezone(tz): Timezone,
) -> ApiResult<String> {
    let message = state.greeter.hello(&username, &localizer, tz).await?;
    Ok(message)
}
