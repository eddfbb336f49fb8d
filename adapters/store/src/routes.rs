//! Request routing for the level store API, independent of the socket layer.

use board_maker_core::LevelId;
use board_maker_document::{parse, snapshot, LevelStamp};
use log::{error, info, warn};
use serde_json::{json, Value};
use tiny_http::Method;

use crate::repository::LevelRepository;

const REQUIRED_FIELDS: [&str; 5] = ["name", "width", "height", "terrain", "enemy_pieces"];

/// Status code and JSON body produced for a request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body; `None` for bodiless responses.
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Dispatches one request against the repository.
///
/// `api_prefix` is the mount point of the API, e.g. `/api`; the level routes
/// live at `{api_prefix}/levels` and `{api_prefix}/levels/{id}`.
pub fn route(
    repository: &mut dyn LevelRepository,
    api_prefix: &str,
    method: &Method,
    url: &str,
    body: &str,
) -> ApiResponse {
    if *method == Method::Options {
        return ApiResponse::empty(204);
    }

    let path = url.split_once('?').map_or(url, |(path, _)| path);
    let Some(rest) = path
        .strip_prefix(api_prefix.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix("/levels"))
    else {
        return ApiResponse::error(404, "Not found");
    };

    match (method, rest.trim_end_matches('/')) {
        (Method::Post, "") => save_level(repository, body),
        (Method::Get, "") => list_levels(repository),
        (Method::Get, id) if id.starts_with('/') && !id[1..].contains('/') => {
            fetch_level(repository, &id[1..])
        }
        (_, "") => ApiResponse::error(405, "Method not allowed"),
        _ => ApiResponse::error(404, "Not found"),
    }
}

fn save_level(repository: &mut dyn LevelRepository, body: &str) -> ApiResponse {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        warn!("rejected level upload with malformed JSON");
        return ApiResponse::error(400, "Missing level data");
    };

    if REQUIRED_FIELDS
        .iter()
        .any(|field| !is_present(payload.get(*field)))
    {
        warn!("rejected level upload with missing fields");
        return ApiResponse::error(400, "Missing level data");
    }

    let parsed = match parse(&payload) {
        Ok(parsed) => parsed,
        Err(reason) => {
            warn!("rejected level upload: {reason}");
            return ApiResponse::error(400, &format!("Invalid level data: {reason}"));
        }
    };

    let level_id = parsed
        .level_id
        .unwrap_or_else(|| LevelStamp::now().level_id());
    let document = snapshot(&parsed.board, level_id.clone(), parsed.name);

    match repository.insert(document) {
        Ok(()) => {
            info!("saved level {level_id}");
            ApiResponse::json(
                201,
                json!({ "message": "Level saved successfully!", "level_id": level_id }),
            )
        }
        Err(reason) => {
            error!("failed to save level {level_id}: {reason}");
            ApiResponse::error(500, "Failed to save level")
        }
    }
}

fn list_levels(repository: &dyn LevelRepository) -> ApiResponse {
    match repository.summaries() {
        Ok(summaries) => ApiResponse::json(200, json!(summaries)),
        Err(reason) => {
            error!("failed to list levels: {reason}");
            ApiResponse::error(500, "Failed to fetch levels")
        }
    }
}

fn fetch_level(repository: &dyn LevelRepository, raw_id: &str) -> ApiResponse {
    let level_id = match urlencoding::decode(raw_id) {
        Ok(decoded) => LevelId::new(decoded.into_owned()),
        Err(_) => return ApiResponse::error(404, "Level not found"),
    };

    match repository.get(&level_id) {
        Ok(Some(document)) => match serde_json::to_value(&document) {
            Ok(value) => ApiResponse::json(200, value),
            Err(reason) => {
                error!("failed to encode level {level_id}: {reason}");
                ApiResponse::error(500, "Failed to fetch level")
            }
        },
        Ok(None) => ApiResponse::error(404, "Level not found"),
        Err(reason) => {
            error!("failed to fetch level {level_id}: {reason}");
            ApiResponse::error(500, "Failed to fetch level")
        }
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(Value::Number(number)) => number.as_f64().map_or(false, |number| number != 0.0),
        Some(_) => true,
    }
}
