use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::{CatalogAdapter, http::HttpCatalogFactory};
use crate::config;
use crate::domain::{AlbumRef, Track};
use crate::rules::{ByTitle, RULE_NAMES};
use crate::service::PlaylistService;
use crate::storage::db::i64_seconds_to_local_time;
use crate::storage::repository::KEY_PREFIX;
use crate::storage::{KvPlaylistRepository, PlaylistRepository, SqliteStore};

#[derive(Parser)]
#[command(name = "sortune")]
#[command(version = "0.1")]
#[command(about = "Imports music playlists from a streaming catalog and keeps them organized")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "sortune.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a stored playlist
    Show { id: String },
    /// Reorder a stored playlist with a rule and save it
    Sort {
        id: String,
        #[arg(short, long, default_value = ByTitle::NAME)]
        rule: String,
    },
    /// List library playlists straight from the catalog
    Library {
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },
    /// List the tracks of a catalog playlist without storing them
    Tracks {
        id: String,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Import (or refresh) one catalog playlist into the store
    Import {
        id: String,
        /// Name for the stored playlist
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Import every library playlist except system-authored ones
    ImportLibrary {
        #[arg(short, long, default_value_t = crate::catalog::MAX_LIBRARY_LIMIT)]
        limit: u32,
    },
    /// Fill the demo playlist with sample tracks
    SeedDemo,
    /// List stored playlists
    Status,
    /// Run http server
    Serve,
}

fn format_duration(seconds: u32) -> String {
    if seconds >= 3600 {
        format!("{}:{:02}:{:02}", seconds / 3600, seconds / 60 % 60, seconds % 60)
    } else {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }
}

fn print_track(position: usize, track: &Track) {
    let artists = track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut line = format!("{position:>4}. {} - {artists}", track.title);
    if let Some(album) = track.album.as_ref().map(AlbumRef::name) {
        line.push_str(&format!(" [{album}]"));
    }
    if let Some(duration) = track.duration {
        line.push_str(&format!(" ({})", format_duration(duration)));
    }
    println!("{line}");
}

fn print_tracks(tracks: &[Track]) {
    for (i, track) in tracks.iter().enumerate() {
        print_track(i + 1, track);
    }
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = config::Config::load(&cli.config)?;

    let open_service = || -> anyhow::Result<PlaylistService<KvPlaylistRepository<SqliteStore>>> {
        let store = SqliteStore::new(&cfg.database).context("Failed to open playlist store")?;
        Ok(PlaylistService::new(KvPlaylistRepository::new(store)))
    };
    let open_catalog = || CatalogAdapter::new(HttpCatalogFactory::new(cfg.catalog.clone()));

    match &cli.command {
        Commands::Show { id } => {
            let playlist = open_service()?.get(id)?;
            println!("{} ({})", playlist.name, playlist.id);
            if let Some(description) = &playlist.description {
                println!("{description}");
            }
            print_tracks(&playlist.tracks);
        }

        Commands::Sort { id, rule } => {
            let playlist = open_service()?
                .sort_playlist(id, rule)
                .with_context(|| format!("Available rules: {}", RULE_NAMES.join(", ")))?;
            println!("Sorted {} tracks of {} with {rule}", playlist.tracks.len(), playlist.name);
            print_tracks(&playlist.tracks);
        }

        Commands::Library { limit } => {
            let summaries = open_catalog().list_library_playlists(*limit)?;
            for summary in &summaries {
                println!(
                    "{}  {}  ({} tracks)",
                    summary.playlist_id.as_deref().unwrap_or("?"),
                    summary.title.as_deref().unwrap_or("<untitled>"),
                    summary.count.as_deref().unwrap_or("?"),
                );
            }
        }

        Commands::Tracks { id, limit } => {
            let tracks = open_catalog().get_playlist_tracks(id, *limit)?;
            print_tracks(&tracks);
        }

        Commands::Import { id, name, limit } => {
            let name = name.as_deref().or(cfg.import.default_name.as_deref());
            let playlist = open_service()?.import_playlist(&open_catalog(), id, name, *limit)?;
            println!(
                "Imported {} tracks into {} as {}",
                playlist.tracks.len(),
                playlist.id,
                playlist.name
            );
        }

        Commands::ImportLibrary { limit } => {
            let report = open_service()?.import_library(
                &open_catalog(),
                *limit,
                &cfg.import.excluded_authors,
            )?;
            println!(
                "Imported {} playlists, skipped {}, failed {}",
                report.imported.len(),
                report.skipped.len(),
                report.failed.len()
            );
            for (id, reason) in &report.failed {
                println!("  [FAILED]  {id}: {reason}");
            }
        }

        Commands::SeedDemo => {
            let playlist = open_service()?.seed_demo()?;
            println!("Playlist {} has {} tracks", playlist.id, playlist.tracks.len());
        }

        Commands::Status => {
            let service = open_service()?;
            let repo = service.repository();
            let entries = repo.store().entries(KEY_PREFIX)?;
            println!("Store contains {} playlists", entries.len());
            for entry in &entries {
                let id = entry.key.trim_start_matches(KEY_PREFIX);
                let playlist = repo.get(id)?;
                println!(
                    "  {id}  {}  {} tracks, updated {}",
                    playlist.name,
                    playlist.tracks.len(),
                    i64_seconds_to_local_time(entry.updated_at)?
                );
            }
        }

        Commands::Serve => {
            let http_server = crate::http::server::HttpServer::new(
                open_service()?,
                open_catalog(),
                cfg.import.clone(),
                cfg.http.clone(),
            );

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }
    }

    Ok(())
}
