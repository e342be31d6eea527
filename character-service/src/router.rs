//! HTTP routes for the character API.
//!
//! | Method | Path                   | Store operation |
//! |--------|------------------------|-----------------|
//! | POST   | `/characters`          | create          |
//! | GET    | `/characters`          | list            |
//! | GET    | `/characters/?<query>` | find_by         |
//! | PUT    | `/characters/{id}`     | update          |
//! | DELETE | `/characters/{id}`     | delete          |
//!
//! Everything else, including unlisted methods on a known path, answers
//! `404 {"message": "Route not found"}`. The filter route is only reached
//! through the literal `/characters/?` prefix: `GET /characters/5` and
//! `GET /characters?role=...` are both unroutable. The identifier of PUT and
//! DELETE is whatever follows the final `/` of the raw request target, so
//! `/characters/a/1` names character 1 and `/characters/1/` names nothing.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, Uri},
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::{
    character::{Character, CharacterId, Message, StatUpdate},
    error::ApiError,
    store::{CharacterMap, CharacterStore},
};

pub type SharedStore = Arc<CharacterStore>;

type ApiResult<T> = Result<T, ApiError>;

/// Builds the router around an injected store.
pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route(
            "/characters",
            post(create_character)
                .get(list_characters)
                .fallback(route_not_found),
        )
        .route(
            "/characters/",
            get(find_characters)
                .put(update_character)
                .delete(delete_character)
                .fallback(route_not_found),
        )
        .route(
            "/characters/*rest",
            put(update_character)
                .delete(delete_character)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn create_character(
    State(store): State<SharedStore>,
    uri: Uri,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Character>)> {
    require_exact_path(&uri)?;
    let character: Character = parse_body(&body)?;
    let (_, created) = store.create(character).await;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_characters(
    State(store): State<SharedStore>,
    uri: Uri,
) -> ApiResult<Json<CharacterMap>> {
    require_exact_path(&uri)?;
    Ok(Json(store.list().await))
}

async fn find_characters(
    State(store): State<SharedStore>,
    uri: Uri,
) -> ApiResult<Json<CharacterMap>> {
    let filter = FilterParams::from_uri(&uri)?;
    let matches = store
        .find_by(
            &Value::from(filter.role),
            &Value::from(filter.level),
            &Value::from(filter.charisma),
        )
        .await;
    Ok(Json(matches))
}

async fn update_character(
    State(store): State<SharedStore>,
    uri: Uri,
    body: Bytes,
) -> ApiResult<Json<Character>> {
    let id = parse_id(trailing_segment(&uri))?;
    let update: StatUpdate = parse_body(&body)?;
    store
        .update(id, &update)
        .await
        .map(Json)
        .ok_or(ApiError::CharacterNotFound)
}

async fn delete_character(
    State(store): State<SharedStore>,
    uri: Uri,
) -> ApiResult<Json<Message>> {
    let id = parse_id(trailing_segment(&uri))?;
    match store.delete(id).await {
        Some(_) => Ok(Json(Message::new("Character deleted successfully"))),
        None => Err(ApiError::CharacterNotFound),
    }
}

/// Query parameters of the filter route.
///
/// Missing or unparsable numbers fall back to 0, so `?role=Wizard` alone only
/// matches level 0, charisma 0 records. A missing role becomes `null`.
#[derive(Debug, PartialEq, Eq)]
struct FilterParams {
    role: Option<String>,
    level: i64,
    charisma: i64,
}

impl FilterParams {
    /// Reads the filter from the request URI. No `?` at all means the request
    /// was never meant for the filter route.
    fn from_uri(uri: &Uri) -> ApiResult<Self> {
        if uri.query().is_none() {
            return Err(ApiError::RouteNotFound);
        }

        // Decoding is lossy, so this only fails on a query serde cannot split into pairs.
        let pairs = match Query::<Vec<(String, String)>>::try_from_uri(uri) {
            Ok(Query(pairs)) => pairs,
            Err(rejection) => {
                warn!(error = %rejection, "ignoring undecodable filter query");
                Vec::new()
            }
        };

        // Repeated keys: the last occurrence wins.
        let mut role = None;
        let mut level = None;
        let mut charisma = None;
        for (key, value) in pairs {
            match key.as_str() {
                "role" => role = Some(value),
                "level" => level = Some(value),
                "charisma" => charisma = Some(value),
                _ => {}
            }
        }

        Ok(Self {
            role,
            level: parse_or_zero(level.as_deref()),
            charisma: parse_or_zero(charisma.as_deref()),
        })
    }
}

fn parse_or_zero(value: Option<&str>) -> i64 {
    value.and_then(|raw| raw.trim().parse().ok()).unwrap_or(0)
}

fn require_exact_path(uri: &Uri) -> ApiResult<()> {
    match uri.query() {
        Some(_) => Err(ApiError::RouteNotFound),
        None => Ok(()),
    }
}

/// Everything after the final `/` of the request target, query included.
fn trailing_segment(uri: &Uri) -> &str {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |target| target.as_str());
    target.rsplit_once('/').map_or(target, |(_, last)| last)
}

fn parse_id(raw: &str) -> ApiResult<CharacterId> {
    raw.parse().map_err(|_| {
        warn!(id = raw, "rejecting non-numeric character id");
        ApiError::InvalidId(raw.to_string())
    })
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "rejecting malformed request body");
        ApiError::from(err)
    })
}
