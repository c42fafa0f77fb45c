use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ApiErrorBody, Artist, Artists, Countries, Setlist, Setlists, FLORENCE_MBID, RADIOHEAD_MBID};
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn api_request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", KEY)
        .header("accept", "application/json")
        .body(String::new())
        .unwrap()
}

// --- headers ---

#[tokio::test]
async fn missing_api_key_returns_403() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .uri(format!("/rest/1.0/artist/{RADIOHEAD_MBID}"))
                .header("accept", "application/json")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: ApiErrorBody = body_json(resp).await;
    assert_eq!(body.code, 403);
}

#[tokio::test]
async fn wrong_api_key_returns_403() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .uri("/rest/1.0/search/countries")
                .header("x-api-key", "other-key")
                .header("accept", "application/json")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_json_accept_returns_406() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .uri("/rest/1.0/search/countries")
                .header("x-api-key", KEY)
                .header("accept", "application/xml")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
}

// --- artist ---

#[tokio::test]
async fn get_artist_by_mbid() {
    let resp = app(KEY)
        .oneshot(api_request(&format!("/rest/1.0/artist/{RADIOHEAD_MBID}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let artist: Artist = body_json(resp).await;
    assert_eq!(artist.name, "Radiohead");
    assert_eq!(artist.mbid, RADIOHEAD_MBID);
}

#[tokio::test]
async fn unknown_artist_returns_404_with_error_body() {
    let resp = app(KEY)
        .oneshot(api_request("/rest/1.0/artist/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let raw = body_bytes(resp).await;
    let body: ApiErrorBody = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body.code, 404);
    assert_eq!(body.status, "Not Found");
}

#[tokio::test]
async fn artist_setlists_are_paged() {
    let resp = app(KEY)
        .oneshot(api_request(&format!("/rest/1.0/artist/{RADIOHEAD_MBID}/setlists")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let setlists: Setlists = body_json(resp).await;
    assert_eq!(setlists.total, 2);
    assert_eq!(setlists.page, 1);
    assert!(setlists.setlist.iter().all(|s| s.artist.mbid == RADIOHEAD_MBID));

    let resp = app(KEY)
        .oneshot(api_request(&format!("/rest/1.0/artist/{RADIOHEAD_MBID}/setlists?p=2")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn huge_page_number_is_404() {
    let resp = app(KEY)
        .oneshot(api_request(&format!(
            "/rest/1.0/artist/{RADIOHEAD_MBID}/setlists?p=1000000000000000000"
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- search ---

#[tokio::test]
async fn search_artists_decodes_percent_2b_as_plus() {
    let resp = app(KEY)
        .oneshot(api_request(
            "/rest/1.0/search/artists?artistName=Florence%20%2B%20the%20Machine",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let artists: Artists = body_json(resp).await;
    assert_eq!(artists.total, 1);
    assert_eq!(artists.artist[0].mbid, FLORENCE_MBID);
}

#[tokio::test]
async fn search_artists_treats_bare_plus_as_space() {
    let resp = app(KEY)
        .oneshot(api_request("/rest/1.0/search/artists?artistName=Florence+%2B+the+Machine"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app(KEY)
        .oneshot(api_request("/rest/1.0/search/artists?artistName=Florence%20+%20the%20Machine"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_artists_without_criteria_returns_400() {
    let resp = app(KEY)
        .oneshot(api_request("/rest/1.0/search/artists"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_countries_is_localized() {
    let resp = app(KEY)
        .oneshot(
            Request::builder()
                .uri("/rest/1.0/search/countries")
                .header("x-api-key", KEY)
                .header("accept", "application/json")
                .header("accept-language", "de")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let countries: Countries = body_json(resp).await;
    let germany = countries.country.iter().find(|c| c.code == "DE").unwrap();
    assert_eq!(germany.name, "Deutschland");
}

#[tokio::test]
async fn search_countries_defaults_to_english() {
    let resp = app(KEY)
        .oneshot(api_request("/rest/1.0/search/countries"))
        .await
        .unwrap();

    let countries: Countries = body_json(resp).await;
    assert_eq!(countries.total, 3);
    let germany = countries.country.iter().find(|c| c.code == "DE").unwrap();
    assert_eq!(germany.name, "Germany");
}

// --- setlist ---

#[tokio::test]
async fn setlist_by_id_and_by_version() {
    let app = app(KEY);

    let resp = app.clone().oneshot(api_request("/rest/1.0/setlist/63de4613")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let by_id: Setlist = body_json(resp).await;

    let resp = app.oneshot(api_request("/rest/1.0/setlist/version/7be1aaa0")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let by_version: Setlist = body_json(resp).await;

    assert_eq!(by_id, by_version);
    assert_eq!(by_id.sets.set.len(), 2);
}

#[tokio::test]
async fn unknown_route_outside_prefix_returns_404() {
    let resp = app(KEY).oneshot(api_request("/artist/x")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
