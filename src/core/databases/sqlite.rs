//! The `SQLite3` database driver.
use std::str::FromStr;

use r2d2::Pool;
use r2d2_sqlite::rusqlite::{params, OptionalExtension};
use r2d2_sqlite::SqliteConnectionManager;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::{DatabaseDriver, PersistentTorrents};

use super::{Database, Error};

const DRIVER: DatabaseDriver = DatabaseDriver::Sqlite3;

const UPSERT_TORRENT: &str = "INSERT INTO torrents (info_hash, completed) VALUES (?1, ?2) \
    ON CONFLICT(info_hash) DO UPDATE SET completed = MAX(completed, excluded.completed)";

pub struct Sqlite {
    pool: Pool<SqliteConnectionManager>,
}

impl Sqlite {
    /// It instantiates a new `SQLite3` database driver.
    ///
    /// # Errors
    ///
    /// Will return `r2d2::Error` if `db_path` is not able to create `SqLite` database.
    pub fn new(db_path: &str) -> Result<Self, Error> {
        let manager = SqliteConnectionManager::file(db_path);
        let pool = r2d2::Pool::builder().build(manager).map_err(|e| (e, DRIVER))?;

        Ok(Self { pool })
    }
}

fn decode_info_hash(value: String) -> Result<InfoHash, Error> {
    InfoHash::from_str(&value).map_err(|_| Error::InvalidInfoHash { value, driver: DRIVER })
}

impl Database for Sqlite {
    fn create_database_tables(&self) -> Result<(), Error> {
        let create_torrents_table = "
        CREATE TABLE IF NOT EXISTS torrents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            info_hash TEXT NOT NULL UNIQUE,
            completed INTEGER DEFAULT 0 NOT NULL
        );"
        .to_string();

        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.execute(&create_torrents_table, [])?;

        Ok(())
    }

    fn drop_database_tables(&self) -> Result<(), Error> {
        let drop_torrents_table = "
        DROP TABLE torrents;"
            .to_string();

        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.execute(&drop_torrents_table, [])?;

        Ok(())
    }

    fn load_persistent_torrents(&self) -> Result<PersistentTorrents, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let mut stmt = conn.prepare("SELECT info_hash, completed FROM torrents")?;

        let rows = stmt.query_map([], |row| {
            let info_hash: String = row.get(0)?;
            let completed: u32 = row.get(1)?;
            Ok((info_hash, completed))
        })?;

        let mut torrents = PersistentTorrents::new();

        for row in rows {
            let (info_hash, completed) = row?;
            torrents.insert(decode_info_hash(info_hash)?, completed);
        }

        Ok(torrents)
    }

    fn load_persistent_torrent(&self, info_hash: &InfoHash) -> Result<Option<u32>, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let mut stmt = conn.prepare("SELECT completed FROM torrents WHERE info_hash = ?")?;

        let completed = stmt
            .query_row([info_hash.to_hex_string()], |row| row.get::<_, u32>(0))
            .optional()?;

        Ok(completed)
    }

    fn save_persistent_torrent(&self, info_hash: &InfoHash, completed: u32) -> Result<(), Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.execute(UPSERT_TORRENT, params![info_hash.to_hex_string(), completed])?;

        Ok(())
    }

    fn save_persistent_torrents(&self, torrents: &PersistentTorrents) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare_cached(UPSERT_TORRENT)?;

            for (info_hash, completed) in torrents {
                stmt.execute(params![info_hash.to_hex_string(), completed])?;
            }
        }

        tx.commit()?;

        Ok(())
    }
}
