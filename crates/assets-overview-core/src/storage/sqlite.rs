use crate::error::Error;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

const REQUIRED_TABLES: [&str; 2] = ["File", "File_Live"];

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing CMS database read-only. Missing file or missing tables
    /// make the whole source unavailable.
    pub fn open(path: &str) -> Result<Self, Error> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::source_unavailable(format!("database '{}'", path), e))?;
        let db = Database { conn };
        db.configure_pragmas()
            .map_err(|e| Error::source_unavailable(format!("database '{}'", path), e))?;
        db.verify_schema()
            .map_err(|e| Error::source_unavailable(format!("database '{}'", path), e))?;
        Ok(db)
    }

    /// Fresh in-memory database with the file tables created. Used for tests and demos.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.conn.execute_batch(include_str!("schema.sql"))?;
        debug!("In-memory file tables created");
        Ok(db)
    }

    fn configure_pragmas(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA cache_size = -64000;
             PRAGMA mmap_size = 268435456;
             PRAGMA busy_timeout = 5000;",
        )?;
        debug!("SQLite pragmas configured (query only, 64MB cache, 256MB mmap)");
        Ok(())
    }

    fn verify_schema(&self) -> Result<(), Error> {
        for table in REQUIRED_TABLES {
            let count: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )?;
            if count == 0 {
                return Err(Error::Other(format!("missing table '{}'", table)));
            }
        }
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
