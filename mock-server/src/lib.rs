use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thumbnail {
    pub path: String,
    pub extension: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub thumbnail: Thumbnail,
}

/// Key pair the server checks `apikey`/`hash` against.
#[derive(Clone, Debug)]
pub struct Keys {
    pub public_key: String,
    pub private_key: String,
}

/// What the server serves and how strictly it authenticates.
#[derive(Clone, Debug)]
pub struct MockCatalog {
    pub characters: Vec<Character>,
    pub keys: Option<Keys>,
    /// Answer 200 with an envelope that has no `data.results`.
    pub omit_results: bool,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self {
            characters: fixture_characters(),
            keys: None,
            omit_results: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub ts: Option<String>,
    pub apikey: Option<String>,
    pub hash: Option<String>,
}

pub type Db = Arc<MockCatalog>;

pub const ATTRIBUTION: &str = "Data provided by Marvel. © 2024 MARVEL";

fn character(id: u64, name: &str, description: &str, path: &str, extension: &str) -> Character {
    Character {
        id,
        name: name.to_string(),
        description: description.to_string(),
        thumbnail: Thumbnail {
            path: format!("http://i.annihil.us/u/prod/marvel/i/mg/{path}"),
            extension: extension.to_string(),
        },
    }
}

/// The first page of the live catalog, trimmed.
pub fn fixture_characters() -> Vec<Character> {
    vec![
        character(1011334, "3-D Man", "", "c/e0/535fecbbb9784", "jpg"),
        character(
            1017100,
            "A-Bomb (HAS)",
            "Rick Jones has been Hulk's best bud since day one, but now he's more than a friend...he's a teammate!",
            "3/20/5232158de5b16",
            "jpg",
        ),
        character(
            1009144,
            "A.I.M.",
            "AIM is a terrorist organization bent on destroying the world.",
            "6/20/52602f21f29ec",
            "jpg",
        ),
        character(1010699, "Aaron Stack", "", "b/40/image_not_available", "jpg"),
        character(
            1009146,
            "Abomination (Emil Blonsky)",
            "Formerly known as Emil Blonsky, a spy of Soviet Yugoslavian origin working for the KGB, the Abomination gained his powers after receiving a dose of gamma radiation similar to that which transformed Bruce Banner into the incredible Hulk.",
            "9/50/4ce18691cbf04",
            "jpg",
        ),
        character(1016823, "Abomination (Ultimate)", "", "b/40/image_not_available", "jpg"),
        character(1009148, "Absorbing Man", "", "1/b0/5269678709fb7", "jpg"),
        character(1009149, "Abyss", "", "9/30/535feab462a64", "jpg"),
    ]
}

pub fn app() -> Router {
    app_with(MockCatalog::default())
}

pub fn app_with(catalog: MockCatalog) -> Router {
    let db: Db = Arc::new(catalog);
    Router::new()
        .route("/v1/public/characters", get(list_characters))
        .with_state(db)
}

pub async fn run_with(listener: TcpListener, catalog: MockCatalog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(catalog)).await
}

fn api_error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

/// Check `ts`/`apikey`/`hash` the way the live gateway does: 409 when a
/// parameter is missing, 401 when the key or hash does not match.
fn authenticate(keys: &Keys, query: &AuthQuery) -> Result<(), Response> {
    let Some(apikey) = query.apikey.as_deref() else {
        return Err(api_error(
            StatusCode::CONFLICT,
            "MissingParameter",
            "You must provide a user key.",
        ));
    };
    let (Some(ts), Some(hash)) = (query.ts.as_deref(), query.hash.as_deref()) else {
        return Err(api_error(
            StatusCode::CONFLICT,
            "MissingParameter",
            "You must provide a hash.",
        ));
    };
    if apikey != keys.public_key {
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "InvalidCredentials",
            "The passed API key is invalid.",
        ));
    }
    if hash != signature(ts, &keys.private_key, &keys.public_key) {
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "InvalidCredentials",
            "That hash, timestamp and key combination is invalid.",
        ));
    }
    Ok(())
}

pub fn signature(ts: &str, private_key: &str, public_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(format!("{ts}{private_key}{public_key}").as_bytes());
    hex::encode(hasher.finalize())
}

async fn list_characters(State(db): State<Db>, Query(query): Query<AuthQuery>) -> Response {
    if let Some(keys) = &db.keys {
        if let Err(rejection) = authenticate(keys, &query) {
            warn!(apikey = ?query.apikey, "rejected character list request");
            return rejection;
        }
    }

    if db.omit_results {
        info!("serving envelope without results");
        return Json(json!({ "code": 200, "status": "Ok", "data": {} })).into_response();
    }

    let count = db.characters.len();
    info!(count, "serving character list");
    Json(json!({
        "code": 200,
        "status": "Ok",
        "attributionText": ATTRIBUTION,
        "data": {
            "offset": 0,
            "limit": 20,
            "total": count,
            "count": count,
            "results": db.characters,
        }
    }))
    .into_response()
}
