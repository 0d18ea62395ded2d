//! Split-pool SQLite access for workflow persistence.
//!
//! Run execution is write-heavy: every node records a RUNNING trace row and
//! then upserts the terminal one. SQLite allows a single writer, so all
//! mutations go through a one-connection writer pool while SELECTs fan out
//! over a wider read-only pool. Migrations run on the writer before the
//! reader opens, so the reader never sees a partial schema.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use toolflow_types::config::EngineConfig;

const READER_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired SQLite pools over one database file.
///
/// `reader` serves concurrent SELECTs; `writer` serializes every
/// INSERT/UPDATE/DELETE through its single connection.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools against `database_url`, creating the database file
    /// if needed, and apply pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = connect_options(database_url)?;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }

    /// Open the database named by the engine configuration.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, sqlx::Error> {
        Self::new(&config.database_url).await
    }
}

/// WAL so reads don't block on trace writes; the busy timeout absorbs brief
/// writer contention instead of surfacing SQLITE_BUSY.
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT)
        .create_if_missing(true))
}
