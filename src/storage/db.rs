use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local};
use rusqlite::Connection;

use crate::{
    config::Database,
    storage::{error::StorageError, schema},
};

pub type SecondsSinceUnix = i64;

fn open_in_memory() -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open_in_memory()
}

fn open_from_file(path: &Path) -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open(path)
}

pub fn open(config: &Database) -> Result<rusqlite::Connection, StorageError> {
    let db = if config.in_memory {
        log::debug!("opening in-memory store");
        open_in_memory()?
    } else {
        let path = config.path.as_ref().ok_or_else(|| {
            StorageError::Internal(anyhow!("database.path is required unless in_memory = true"))
        })?;
        log::info!("opening store at {}", path.to_string_lossy());
        open_from_file(path)?
    };
    schema::init(&db)?;
    Ok(db)
}

/// converts time to number of seconds since unix_epoch
pub fn system_time_to_i64(time: SystemTime) -> anyhow::Result<SecondsSinceUnix> {
    i64::try_from(
        time.duration_since(UNIX_EPOCH)
            .with_context(|| "failed to get unix timestamp")?
            .as_secs(),
    )
    .with_context(|| "failed to convert timestamp to seconds")
}

/// converts number of seconds since unix epoch local time to local date time
pub fn i64_seconds_to_local_time(since_unix: i64) -> anyhow::Result<DateTime<Local>> {
    let datetime = DateTime::from_timestamp(since_unix, 0).ok_or(anyhow!(
        "failed to convert {since_unix} s timestamp to datetime"
    ))?;

    Ok(DateTime::from(datetime))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        config::Database,
        storage::{db::*, schema},
    };

    #[test]
    fn open_in_memory_db_initializes_schema() -> anyhow::Result<()> {
        let db = open(&Database {
            in_memory: true,
            path: None,
        })?;

        let mut stmt = db.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;

        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        for table in schema::tables::ALL_TABLES {
            assert!(tables.contains(&table.to_string()));
        }
        Ok(())
    }

    #[test]
    fn on_disk_db_requires_a_path() {
        let result = open(&Database {
            in_memory: false,
            path: None,
        });
        assert!(matches!(result, Err(StorageError::Internal(_))));
    }

    #[test]
    fn timestamps_round_trip() -> anyhow::Result<()> {
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let secs = system_time_to_i64(time)?;
        assert_eq!(secs, 1_700_000_000);
        assert_eq!(i64_seconds_to_local_time(secs)?.timestamp(), secs);
        Ok(())
    }
}
