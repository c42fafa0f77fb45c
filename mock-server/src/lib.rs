//! In-memory stand-in for the setlist.fm REST API.
//!
//! # Design
//! Serves a fixed catalogue (two artists, three setlists, three countries)
//! under `/rest/1.0`, with the behaviours the client depends on:
//! - every route requires the `x-api-key` header (403 otherwise) and an
//!   `Accept` header that admits JSON (406 otherwise);
//! - country names are localized from `Accept-Language`;
//! - searches without results and unknown ids answer 404 with the API's
//!   JSON error body;
//! - query strings are decoded the way the real server does, so a bare `+`
//!   arrives as a space.
//!
//! The DTOs here are defined independently from the client's records;
//! integration tests catch schema drift.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const API_PREFIX: &str = "/rest/1.0";
pub const PAGE_SIZE: usize = 20;

pub const RADIOHEAD_MBID: &str = "a74b1b7f-71a5-4011-9441-d0b5e4122711";
pub const FLORENCE_MBID: &str = "5fee3020-513b-48c2-b1f7-4681b01db0c6";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub mbid: String,
    pub name: String,
    pub sort_name: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artists {
    pub artist: Vec<Artist>,
    pub total: usize,
    pub page: usize,
    pub items_per_page: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Countries {
    pub country: Vec<Country>,
    pub total: usize,
    pub page: usize,
    pub items_per_page: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Set {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encore: Option<u32>,
    pub song: Vec<Song>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Sets {
    pub set: Vec<Set>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Venue {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    pub id: String,
    pub version_id: String,
    pub event_date: String,
    pub artist: Artist,
    pub venue: Venue,
    pub sets: Sets,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Setlists {
    pub setlist: Vec<Setlist>,
    pub total: usize,
    pub page: usize,
    pub items_per_page: usize,
}

/// Error body in the shape the real API uses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    pub code: u16,
    pub status: String,
    pub message: String,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    artists: Arc<Vec<Artist>>,
    setlists: Arc<Vec<Setlist>>,
}

/// Router accepting `api_key` as the only valid credential.
pub fn app(api_key: &str) -> Router {
    let artists = fixture_artists();
    let setlists = fixture_setlists(&artists);
    let state = AppState {
        api_key: Arc::from(api_key),
        artists: Arc::new(artists),
        setlists: Arc::new(setlists),
    };

    let api = Router::new()
        .route("/artist/{mbid}", get(get_artist))
        .route("/artist/{mbid}/setlists", get(artist_setlists))
        .route("/search/artists", get(search_artists))
        .route("/search/countries", get(search_countries))
        .route("/setlist/{id}", get(get_setlist))
        .route("/setlist/version/{version_id}", get(get_setlist_version))
        .layer(middleware::from_fn_with_state(state.clone(), require_headers))
        .with_state(state);

    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = ApiErrorBody {
        code: status.as_u16(),
        status: status.canonical_reason().unwrap_or_default().to_string(),
        message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "not found")
}

async fn require_headers(State(state): State<AppState>, request: Request, next: Next) -> Response {
    debug!(method = %request.method(), uri = %request.uri(), "request");

    let headers = request.headers();
    let key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if key != Some(&*state.api_key) {
        return error(StatusCode::FORBIDDEN, "invalid or missing API key");
    }

    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if !accepts_json {
        return error(StatusCode::NOT_ACCEPTABLE, "only application/json is served");
    }

    next.run(request).await
}

/// Parse `p` (1-based) and slice `items` into one page. `None` when the
/// page is out of range.
fn paginate<T: Clone>(items: &[T], query: &HashMap<String, String>) -> Option<(Vec<T>, usize)> {
    let page = match query.get("p") {
        Some(p) => p.parse::<usize>().ok().filter(|p| *p >= 1)?,
        None => 1,
    };
    let start = (page - 1).checked_mul(PAGE_SIZE)?;
    if start >= items.len() {
        return None;
    }
    let end = (start + PAGE_SIZE).min(items.len());
    Some((items[start..end].to_vec(), page))
}

async fn get_artist(State(state): State<AppState>, Path(mbid): Path<String>) -> Response {
    match state.artists.iter().find(|a| a.mbid == mbid) {
        Some(artist) => Json(artist.clone()).into_response(),
        None => not_found(),
    }
}

async fn artist_setlists(
    State(state): State<AppState>,
    Path(mbid): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let matching: Vec<Setlist> = state
        .setlists
        .iter()
        .filter(|s| s.artist.mbid == mbid)
        .cloned()
        .collect();
    let total = matching.len();
    match paginate(&matching, &query) {
        Some((setlist, page)) => Json(Setlists {
            setlist,
            total,
            page,
            items_per_page: PAGE_SIZE,
        })
        .into_response(),
        None => not_found(),
    }
}

async fn search_artists(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let name = query.get("artistName").map(|n| n.to_lowercase());
    let mbid = query.get("artistMbid");
    if name.is_none() && mbid.is_none() {
        return error(StatusCode::BAD_REQUEST, "at least one search criterion is required");
    }

    let mut matching: Vec<Artist> = state
        .artists
        .iter()
        .filter(|a| name.as_ref().is_none_or(|n| a.name.to_lowercase().contains(n.as_str())))
        .filter(|a| mbid.is_none_or(|m| &a.mbid == m))
        .cloned()
        .collect();
    if query.get("sort").map(String::as_str) == Some("sortName") {
        matching.sort_by(|a, b| a.sort_name.cmp(&b.sort_name));
    }

    let total = matching.len();
    match paginate(&matching, &query) {
        Some((artist, page)) => Json(Artists {
            artist,
            total,
            page,
            items_per_page: PAGE_SIZE,
        })
        .into_response(),
        None => not_found(),
    }
}

async fn search_countries(headers: HeaderMap) -> Json<Countries> {
    let language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("en");
    let country: Vec<Country> = COUNTRY_NAMES
        .iter()
        .map(|(code, names)| Country {
            code: code.to_string(),
            name: localized(names, language).to_string(),
        })
        .collect();
    let total = country.len();
    Json(Countries {
        country,
        total,
        page: 1,
        items_per_page: total,
    })
}

async fn get_setlist(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.setlists.iter().find(|s| s.id == id) {
        Some(setlist) => Json(setlist.clone()).into_response(),
        None => not_found(),
    }
}

async fn get_setlist_version(State(state): State<AppState>, Path(version_id): Path<String>) -> Response {
    match state.setlists.iter().find(|s| s.version_id == version_id) {
        Some(setlist) => Json(setlist.clone()).into_response(),
        None => not_found(),
    }
}

const LANGUAGES: [&str; 8] = ["en", "es", "fr", "de", "pt", "tr", "it", "pl"];

/// Country names indexed like `LANGUAGES`.
const COUNTRY_NAMES: [(&str, [&str; 8]); 3] = [
    (
        "DE",
        ["Germany", "Alemania", "Allemagne", "Deutschland", "Alemanha", "Almanya", "Germania", "Niemcy"],
    ),
    (
        "GB",
        [
            "United Kingdom",
            "Reino Unido",
            "Royaume-Uni",
            "Vereinigtes Königreich",
            "Reino Unido",
            "Birleşik Krallık",
            "Regno Unito",
            "Wielka Brytania",
        ],
    ),
    (
        "US",
        [
            "United States",
            "Estados Unidos",
            "États-Unis",
            "Vereinigte Staaten",
            "Estados Unidos",
            "Amerika Birleşik Devletleri",
            "Stati Uniti",
            "Stany Zjednoczone",
        ],
    ),
];

fn localized<'a>(names: &[&'a str; 8], language: &str) -> &'a str {
    let index = LANGUAGES
        .iter()
        .position(|code| code.eq_ignore_ascii_case(language.trim()))
        .unwrap_or(0);
    names[index]
}

fn fixture_artists() -> Vec<Artist> {
    vec![
        Artist {
            mbid: RADIOHEAD_MBID.to_string(),
            name: "Radiohead".to_string(),
            sort_name: "Radiohead".to_string(),
            url: "https://www.setlist.fm/setlists/radiohead-bd6bd12.html".to_string(),
        },
        Artist {
            mbid: FLORENCE_MBID.to_string(),
            name: "Florence + the Machine".to_string(),
            sort_name: "Florence + the Machine".to_string(),
            url: "https://www.setlist.fm/setlists/florence-the-machine-33d6ec0d.html".to_string(),
        },
    ]
}

fn fixture_setlists(artists: &[Artist]) -> Vec<Setlist> {
    let song = |name: &str| Song {
        name: name.to_string(),
    };
    let radiohead = artists[0].clone();
    let florence = artists[1].clone();
    vec![
        Setlist {
            id: "63de4613".to_string(),
            version_id: "7be1aaa0".to_string(),
            event_date: "23-08-1997".to_string(),
            artist: radiohead.clone(),
            venue: Venue {
                id: "53d6bb6d".to_string(),
                name: "Lowlands".to_string(),
            },
            sets: Sets {
                set: vec![
                    Set {
                        encore: None,
                        song: vec![song("Airbag"), song("Paranoid Android"), song("Karma Police")],
                    },
                    Set {
                        encore: Some(1),
                        song: vec![song("Creep")],
                    },
                ],
            },
        },
        Setlist {
            id: "1bd6e5d8".to_string(),
            version_id: "2b5e1c22".to_string(),
            event_date: "29-06-2003".to_string(),
            artist: radiohead,
            venue: Venue {
                id: "63d6a2f3".to_string(),
                name: "Glastonbury Festival".to_string(),
            },
            sets: Sets {
                set: vec![Set {
                    encore: None,
                    song: vec![song("There There"), song("2 + 2 = 5")],
                }],
            },
        },
        Setlist {
            id: "4bd7a3f2".to_string(),
            version_id: "6b4c9d31".to_string(),
            event_date: "06-09-2022".to_string(),
            artist: florence,
            venue: Venue {
                id: "2bd6d05a".to_string(),
                name: "Madison Square Garden".to_string(),
            },
            sets: Sets {
                set: vec![Set {
                    encore: None,
                    song: vec![song("King"), song("Dog Days Are Over")],
                }],
            },
        },
    ]
}
