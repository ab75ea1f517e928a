use log::info;
use rouille::{Request, Response};
use serde_json::json;
use std::sync::Arc;

use crate::{
    catalog::{CatalogAdapter, CatalogService, SessionFactory},
    config::{HttpConfig, ImportConfig},
    http::error::ApiError,
    rules::ByTitle,
    service::PlaylistService,
    storage::PlaylistRepository,
};

const DEFAULT_LIBRARY_LIMIT: u32 = 100;

pub struct HttpServer<R, F: SessionFactory> {
    service: Arc<PlaylistService<R>>,
    catalog: Arc<CatalogAdapter<F>>,
    import: ImportConfig,
    pub config: HttpConfig,
}

impl<R, F> HttpServer<R, F>
where
    R: PlaylistRepository + Send + Sync + 'static,
    F: SessionFactory + Send + Sync + 'static,
    F::Session: CatalogService + Send + Sync,
{
    pub fn new(
        service: PlaylistService<R>,
        catalog: CatalogAdapter<F>,
        import: ImportConfig,
        config: HttpConfig,
    ) -> Self {
        Self {
            service: Arc::new(service),
            catalog: Arc::new(catalog),
            import,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let result = rouille::router!(request,
            (GET) (/playlists/library/live) => {
                self.list_library(request)
            },
            (GET) (/playlists/{id: String}) => {
                self.get_playlist(&id)
            },
            (POST) (/playlists/{id: String}/sort) => {
                self.sort_playlist(request, &id)
            },
            (GET) (/playlists/{id: String}/tracks/live) => {
                self.live_tracks(request, &id)
            },
            (POST) (/playlists/yt/import/{id: String}) => {
                self.import_playlist(request, &id)
                    .map(|response| response.with_status_code(201))
            },
            (POST) (/playlists/yt/refresh/{id: String}) => {
                self.import_playlist(request, &id)
            },
            _ => Ok(Response::empty_404())
        );

        let response = result.unwrap_or_else(ApiError::into_response);
        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    /// optional positive `limit` query parameter
    fn limit_param(request: &Request) -> Result<Option<u32>, ApiError> {
        match request.get_param("limit") {
            None => Ok(None),
            Some(raw) => match raw.parse::<u32>() {
                Ok(limit) if limit > 0 => Ok(Some(limit)),
                _ => Err(ApiError::BadRequest(format!(
                    "limit must be a positive integer, got {raw:?}"
                ))),
            },
        }
    }

    fn get_playlist(&self, id: &str) -> Result<Response, ApiError> {
        let playlist = self.service.get(id)?;
        Ok(Response::json(&playlist))
    }

    fn sort_playlist(&self, request: &Request, id: &str) -> Result<Response, ApiError> {
        let rule = request
            .get_param("rule")
            .unwrap_or_else(|| ByTitle::NAME.to_string());
        let playlist = self.service.sort_playlist(id, &rule)?;

        Ok(Response::json(&json!({
            "status": "ok",
            "rule": rule,
            "count": playlist.tracks.len(),
        })))
    }

    fn list_library(&self, request: &Request) -> Result<Response, ApiError> {
        let limit = Self::limit_param(request)?.unwrap_or(DEFAULT_LIBRARY_LIMIT);
        let items = self.catalog.list_library_playlists(limit)?;
        Ok(Response::json(&json!({ "items": items })))
    }

    fn live_tracks(&self, request: &Request, id: &str) -> Result<Response, ApiError> {
        let limit = Self::limit_param(request)?;
        let tracks = self.catalog.get_playlist_tracks(id, limit)?;
        Ok(Response::json(&tracks))
    }

    /// serves both import and refresh: the stored copy is always replaced
    fn import_playlist(&self, request: &Request, id: &str) -> Result<Response, ApiError> {
        let limit = Self::limit_param(request)?;
        let playlist = self.service.import_playlist(
            &self.catalog,
            id,
            self.import.default_name.as_deref(),
            limit,
        )?;
        Ok(Response::json(&playlist))
    }
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::testing::{FakeCatalog, FakeFactory, track_payload},
        domain::{Playlist, Track},
        storage::{KvPlaylistRepository, MemoryStore},
    };

    use rouille::Request;
    use serde_json::{Value, json};
    use std::io::Read;

    type TestServer = HttpServer<KvPlaylistRepository<MemoryStore>, FakeFactory>;

    pub fn parse_text_response(response: rouille::Response) -> String {
        let mut buf = String::new();
        let mut reader = response.data.into_reader_and_size().0;
        reader.read_to_string(&mut buf).unwrap();
        buf
    }

    fn create_server(catalog: FakeCatalog) -> TestServer {
        HttpServer::new(
            PlaylistService::new(KvPlaylistRepository::new(MemoryStore::new())),
            CatalogAdapter::new(FakeFactory::new(catalog)),
            ImportConfig::default(),
            HttpConfig::default(),
        )
    }

    fn create_empty_server() -> TestServer {
        create_server(FakeCatalog::default())
    }

    fn request(server: &TestServer, method: &str, url: &str) -> Response {
        server.handle_request(&Request::fake_http(method, url, vec![], vec![]))
    }

    // --------------------------------------------------
    // stored playlists
    // --------------------------------------------------

    #[test]
    fn test_get_missing_playlist_returns_placeholder() -> anyhow::Result<()> {
        let server = create_empty_server();

        let response = request(&server, "GET", "/playlists/missing-id");

        assert_eq!(response.status_code, 200);
        let body: Playlist = parse_json_response(response)?;
        assert_eq!(body.id, "missing-id");
        assert!(body.tracks.is_empty());
        Ok(())
    }

    #[test]
    fn test_sort_playlist() -> anyhow::Result<()> {
        let server = create_empty_server();
        server.service.repository().save(
            &Playlist::new("p", "P").with_tracks(vec![Track::new("2", "b"), Track::new("1", "A")]),
        )?;

        let response = request(&server, "POST", "/playlists/p/sort");

        assert_eq!(response.status_code, 200);
        let body: Value = parse_json_response(response)?;
        assert_eq!(body, json!({"status": "ok", "rule": "by_title", "count": 2}));
        assert_eq!(server.service.get("p")?.tracks[0].title, "A");
        Ok(())
    }

    #[test]
    fn test_sort_with_unsupported_rule() {
        let server = create_empty_server();

        let response = request(&server, "POST", "/playlists/p/sort?rule=shuffle");

        assert_eq!(response.status_code, 400);
        assert_eq!(parse_text_response(response), "Unsupported rule: shuffle");
    }

    // --------------------------------------------------
    // live catalog
    // --------------------------------------------------

    #[test]
    fn test_library_live() -> anyhow::Result<()> {
        let server = create_server(FakeCatalog {
            library: vec![
                json!({"playlistId": "a", "title": "A"}),
                json!({"playlistId": "b", "title": "B"}),
                json!({"playlistId": "c", "title": "C"}),
            ],
            ..Default::default()
        });

        let response = request(&server, "GET", "/playlists/library/live?limit=2");

        assert_eq!(response.status_code, 200);
        let body: Value = parse_json_response(response)?;
        assert_eq!(
            body,
            json!({"items": [{"playlistId": "a", "title": "A"}, {"playlistId": "b", "title": "B"}]})
        );
        Ok(())
    }

    #[test]
    fn test_library_live_rejects_bad_limits() {
        let server = create_empty_server();

        for url in [
            "/playlists/library/live?limit=0",
            "/playlists/library/live?limit=501",
            "/playlists/library/live?limit=many",
        ] {
            let response = request(&server, "GET", url);
            assert_eq!(response.status_code, 400, "{url}");
        }
    }

    #[test]
    fn test_upstream_failure_is_bad_gateway() {
        let server = create_server(FakeCatalog {
            fail: true,
            ..Default::default()
        });

        let response = request(&server, "GET", "/playlists/library/live");

        assert_eq!(response.status_code, 502);
    }

    #[test]
    fn test_live_tracks() -> anyhow::Result<()> {
        let server = create_server(FakeCatalog {
            playlists: vec![(
                "PL1".into(),
                json!({"tracks": [track_payload("a", "A"), track_payload("b", "B")]}),
            )],
            ..Default::default()
        });

        let response = request(&server, "GET", "/playlists/PL1/tracks/live?limit=1");

        assert_eq!(response.status_code, 200);
        let tracks: Vec<Track> = parse_json_response(response)?;
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "a");
        Ok(())
    }

    #[test]
    fn test_import_then_refresh() -> anyhow::Result<()> {
        let server = create_server(FakeCatalog {
            playlists: vec![("PL1".into(), json!({"tracks": [track_payload("a", "A")]}))],
            ..Default::default()
        });

        let created = request(&server, "POST", "/playlists/yt/import/PL1");
        assert_eq!(created.status_code, 201);
        let body: Playlist = parse_json_response(created)?;
        assert_eq!(body.name, "YT:PL1");

        let refreshed = request(&server, "POST", "/playlists/yt/refresh/PL1");
        assert_eq!(refreshed.status_code, 200);

        assert_eq!(server.service.get("PL1")?, body);
        Ok(())
    }

    #[test]
    fn test_unknown_route() {
        let server = create_empty_server();

        let response = request(&server, "DELETE", "/playlists/p");

        assert_eq!(response.status_code, 404);
    }
}
