//! Tests for the catalog client.
//!
//! These tests use a mock server to verify client behavior without
//! requiring network access.

use melodify_catalog::{CatalogClient, CatalogConfig, CatalogError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn track_json(id: i64, title: &str, artist: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "duration": 30,
        "preview": format!("https://cdns-preview.example.net/stream/{}.mp3", id),
        "artist": { "id": id * 10, "name": artist },
        "album": {
            "id": id * 100,
            "title": format!("{} Album", artist),
            "cover_medium": format!("https://img.example.net/{}.jpg", id)
        }
    })
}

async fn setup_client() -> (MockServer, CatalogClient) {
    let mock_server = MockServer::start().await;
    let client = CatalogClient::new(CatalogConfig::new(mock_server.uri())).unwrap();
    (mock_server, client)
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        let result = CatalogClient::new(CatalogConfig::new("  "));

        match result.unwrap_err() {
            CatalogError::InvalidUrl(msg) => assert!(msg.contains("empty")),
            e => panic!("Expected InvalidUrl error, got: {:?}", e),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        let result = CatalogClient::new(CatalogConfig::new("api.deezer.com"));
        assert!(matches!(result, Err(CatalogError::InvalidUrl(_))));
    }

    #[test]
    fn test_default_config_is_valid() {
        let client = CatalogClient::new(CatalogConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://api.deezer.com");
    }
}

// =============================================================================
// Search Tests
// =============================================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_tracks() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "daft punk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    track_json(1, "One More Time", "Daft Punk"),
                    track_json(2, "Digital Love", "Daft Punk")
                ],
                "total": 2
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tracks = client.search_tracks("daft punk").await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "1");
        assert_eq!(tracks[0].title, "One More Time");
        assert_eq!(tracks[1].artist, "Daft Punk");
        assert_eq!(
            tracks[1].stream_url,
            "https://cdns-preview.example.net/stream/2.mp3"
        );
    }

    #[tokio::test]
    async fn test_blank_query_falls_back_to_chart() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/chart/0/tracks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [track_json(7, "Hit", "Someone")] })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(0)
            .mount(&mock_server)
            .await;

        let tracks = client.search_tracks("   ").await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Hit");
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&mock_server)
            .await;

        let tracks = client.search_tracks("zzzzqqq").await.unwrap();
        assert!(tracks.is_empty());
    }
}

// =============================================================================
// Chart Tests
// =============================================================================

mod chart {
    use super::*;

    #[tokio::test]
    async fn test_top_tracks() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/chart/0/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    track_json(10, "First", "A"),
                    track_json(11, "Second", "B"),
                    track_json(12, "Third", "C")
                ]
            })))
            .mount(&mock_server)
            .await;

        let tracks = client.top_tracks().await.unwrap();

        let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(tracks[2].artwork_url, "https://img.example.net/12.jpg");
        assert_eq!(tracks[2].album, "C Album");
    }
}

// =============================================================================
// Error Handling Tests
// =============================================================================

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_server_error_status() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/chart/0/tracks"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let err = client.top_tracks().await.unwrap_err();
        match &err {
            CatalogError::ServerError { status } => assert_eq!(*status, 503),
            e => panic!("Expected ServerError, got: {:?}", e),
        }
        assert_eq!(
            err.user_message(),
            "Server error (code: 503). Please try again later."
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (mock_server, client) = setup_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "not-a-number", "title": "Broken" }]
            })))
            .mount(&mock_server)
            .await;

        let err = client.search_tracks("broken").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
        assert_eq!(err.user_message(), "Error processing data from the server.");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Nothing listens on port 1
        let client = CatalogClient::new(CatalogConfig::new("http://127.0.0.1:1")).unwrap();

        let err = client.top_tracks().await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
        assert_eq!(
            err.user_message(),
            "Network error. Please check your connection and try again."
        );
    }
}
