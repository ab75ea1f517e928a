//! Operations composed from the catalog adapter, the repository and the rules.

use thiserror::Error;

use crate::{
    catalog::{
        CatalogAdapter, CatalogError, PlaylistSummary, SessionFactory, is_system_authored,
        sample::sample_tracks,
    },
    domain::Playlist,
    rules::RuleError,
    storage::{PlaylistRepository, error::StorageError},
};

pub const DEMO_PLAYLIST_ID: &str = "demo";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Outcome of a library import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<String>,
    /// playlists left out on purpose (system-authored or without id)
    pub skipped: Vec<String>,
    /// playlist id and the reason it could not be imported
    pub failed: Vec<(String, String)>,
}

/// Name for an imported playlist when the caller gives none.
pub fn import_name(playlist_id: &str) -> String {
    format!("YT:{playlist_id}")
}

pub struct PlaylistService<R> {
    repo: R,
}

impl<R: PlaylistRepository> PlaylistService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn get(&self, playlist_id: &str) -> Result<Playlist, ServiceError> {
        Ok(self.repo.get(playlist_id)?)
    }

    /// Applies a rule to the stored playlist and writes the result back.
    pub fn sort_playlist(&self, playlist_id: &str, rule_name: &str) -> Result<Playlist, ServiceError> {
        let rule = self.repo.load_rule(rule_name)?;
        let mut playlist = self.repo.get(playlist_id)?;
        playlist.tracks = rule.apply(&playlist.tracks);
        self.repo.save(&playlist)?;
        log::info!("sorted playlist {playlist_id} with {}", rule.name());
        Ok(playlist)
    }

    /// Fetches a playlist's tracks from the catalog and replaces the stored copy.
    pub fn import_playlist<F: SessionFactory>(
        &self,
        adapter: &CatalogAdapter<F>,
        playlist_id: &str,
        name: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Playlist, ServiceError> {
        let tracks = adapter.get_playlist_tracks(playlist_id, limit)?;
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| import_name(playlist_id));

        let playlist = Playlist::new(playlist_id, name).with_tracks(tracks);
        self.repo.save(&playlist)?;
        Ok(playlist)
    }

    fn import_summary<F: SessionFactory>(
        &self,
        adapter: &CatalogAdapter<F>,
        summary: &PlaylistSummary,
        playlist_id: &str,
    ) -> Result<Playlist, ServiceError> {
        let tracks = adapter.get_playlist_tracks(playlist_id, None)?;
        let name = summary
            .title
            .clone()
            .unwrap_or_else(|| import_name(playlist_id));

        let mut playlist = Playlist::new(playlist_id, name).with_tracks(tracks);
        playlist.author = summary.author.clone();
        self.repo.save(&playlist)?;
        Ok(playlist)
    }

    /// Imports every library playlist not authored by one of `excluded_authors`.
    ///
    /// A failure on one playlist is recorded in the report and the import
    /// goes on; only a failure to list the library aborts.
    pub fn import_library<F: SessionFactory>(
        &self,
        adapter: &CatalogAdapter<F>,
        limit: u32,
        excluded_authors: &[String],
    ) -> Result<ImportReport, ServiceError> {
        let summaries = adapter.list_library_playlists(limit)?;
        log::info!("found {} library playlists", summaries.len());

        let mut report = ImportReport::default();
        for summary in &summaries {
            let label = summary
                .title
                .clone()
                .or_else(|| summary.playlist_id.clone())
                .unwrap_or_default();

            if is_system_authored(summary, excluded_authors) {
                log::info!("skipping system-authored playlist {label}");
                report.skipped.push(label);
                continue;
            }

            let Some(playlist_id) = summary.playlist_id.as_deref() else {
                log::warn!("skipping library entry without id: {label}");
                report.skipped.push(label);
                continue;
            };

            match self.import_summary(adapter, summary, playlist_id) {
                Ok(playlist) => {
                    log::info!(
                        "imported {label} ({playlist_id}) with {} tracks",
                        playlist.tracks.len()
                    );
                    report.imported.push(playlist_id.to_string());
                }
                Err(e) => {
                    log::error!("could not import playlist {label}: {e}");
                    report.failed.push((playlist_id.to_string(), e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Fills the demo playlist with the sample tracks unless it already has tracks.
    pub fn seed_demo(&self) -> Result<Playlist, ServiceError> {
        let mut playlist = self.repo.get(DEMO_PLAYLIST_ID)?;
        if playlist.tracks.is_empty() {
            playlist.name = "Demo Playlist".to_string();
            playlist.tracks = sample_tracks();
            self.repo.save(&playlist)?;
        }
        Ok(playlist)
    }
}
