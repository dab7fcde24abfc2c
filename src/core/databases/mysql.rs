//! The `MySQL` database driver.
use std::str::FromStr;

use r2d2::Pool;
use r2d2_mysql::mysql::prelude::Queryable;
use r2d2_mysql::mysql::{params, Opts, OptsBuilder, TxOpts};
use r2d2_mysql::MySqlConnectionManager;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::{DatabaseDriver, PersistentTorrents};

use super::{Database, Error};

const DRIVER: DatabaseDriver = DatabaseDriver::MySQL;

const UPSERT_TORRENT: &str = "INSERT INTO torrents (info_hash, completed) VALUES (:info_hash_str, :completed) \
    ON DUPLICATE KEY UPDATE completed = GREATEST(completed, VALUES(completed))";

pub struct Mysql {
    pool: Pool<MySqlConnectionManager>,
}

impl Mysql {
    /// It instantiates a new `MySQL` database driver.
    ///
    /// # Errors
    ///
    /// Will return `r2d2::Error` if `db_path` is not able to create `MySQL` database.
    pub fn new(db_path: &str) -> Result<Self, Error> {
        let opts = Opts::from_url(db_path)?;
        let builder = OptsBuilder::from_opts(opts);
        let manager = MySqlConnectionManager::new(builder);
        let pool = r2d2::Pool::builder().build(manager).map_err(|e| (e, DRIVER))?;

        Ok(Self { pool })
    }
}

fn decode_info_hash(value: String) -> Result<InfoHash, Error> {
    InfoHash::from_str(&value).map_err(|_| Error::InvalidInfoHash { value, driver: DRIVER })
}

impl Database for Mysql {
    fn create_database_tables(&self) -> Result<(), Error> {
        let create_torrents_table = "
        CREATE TABLE IF NOT EXISTS torrents (
            id integer PRIMARY KEY AUTO_INCREMENT,
            info_hash VARCHAR(40) NOT NULL UNIQUE,
            completed INTEGER DEFAULT 0 NOT NULL
        );"
        .to_string();

        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.query_drop(&create_torrents_table)?;

        Ok(())
    }

    fn drop_database_tables(&self) -> Result<(), Error> {
        let drop_torrents_table = "
        DROP TABLE `torrents`;"
            .to_string();

        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.query_drop(&drop_torrents_table)?;

        Ok(())
    }

    fn load_persistent_torrents(&self) -> Result<PersistentTorrents, Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let rows: Vec<(String, u32)> = conn.query("SELECT info_hash, completed FROM torrents")?;

        rows.into_iter()
            .map(|(info_hash, completed)| Ok((decode_info_hash(info_hash)?, completed)))
            .collect()
    }

    fn load_persistent_torrent(&self, info_hash: &InfoHash) -> Result<Option<u32>, Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let completed = conn.exec_first::<u32, _, _>(
            "SELECT completed FROM torrents WHERE info_hash = :info_hash",
            params! { "info_hash" => info_hash.to_hex_string() },
        )?;

        Ok(completed)
    }

    fn save_persistent_torrent(&self, info_hash: &InfoHash, completed: u32) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.exec_drop(
            UPSERT_TORRENT,
            params! { "info_hash_str" => info_hash.to_hex_string(), "completed" => completed },
        )?;

        Ok(())
    }

    fn save_persistent_torrents(&self, torrents: &PersistentTorrents) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let mut tx = conn.start_transaction(TxOpts::default())?;

        tx.exec_batch(
            UPSERT_TORRENT,
            torrents.iter().map(|(info_hash, completed)| {
                params! { "info_hash_str" => info_hash.to_hex_string(), "completed" => *completed }
            }),
        )?;

        tx.commit()?;

        Ok(())
    }
}
