//! SQLite-backed song library store.
//!
//! Writes go through a single mutex-guarded connection; reads are spread over
//! a small pool of read-only connections (WAL mode lets them run alongside
//! the writer).

use super::models::{DuplicateSongError, Song, SongDetailUpdate, SongFilter, SongText};
use super::schema::LIBRARY_VERSIONED_SCHEMAS;
use super::trait_def::{LibraryStore, LibraryTransaction};
use crate::release_date::{from_storage, to_storage};
use crate::sqlite_persistence::{VersionedSchema, BASE_DB_VERSION};
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

const SONG_COLUMNS: &str = "s.id, a.name, s.title, s.release_date, s.text, s.link";

#[derive(Clone)]
pub struct SqliteLibraryStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

/// Creates the latest schema in an empty database, or brings an existing one
/// up to it by running the migrations of every newer version in order.
fn migrate_if_needed(conn: &mut Connection, schemas: &[VersionedSchema]) -> Result<()> {
    let Some(latest_schema) = schemas.last() else {
        bail!("No library schema versions defined");
    };
    let latest_version = latest_schema.version;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating library db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {}, it was not created by this server",
            db_version
        );
    }
    let mut current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version > latest_version {
        bail!(
            "Database schema version {} is newer than the latest known version {}",
            current_version,
            latest_version
        );
    }

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in schemas.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating library db from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
        tx.commit()?;
    }

    #[cfg(not(feature = "no_checks"))]
    latest_schema
        .validate(conn)
        .context("Library database does not match the expected schema")?;

    Ok(())
}

/// Builds a LIKE pattern matching `needle` anywhere, with LIKE wildcards in
/// the needle escaped by a backslash.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn parse_song_row(row: &rusqlite::Row) -> rusqlite::Result<Song> {
    let stored_date: Option<String> = row.get(3)?;
    Ok(Song {
        id: row.get(0)?,
        artist: row.get(1)?,
        title: row.get(2)?,
        release_date: stored_date.as_deref().and_then(from_storage),
        text: row.get(4)?,
        link: row.get(5)?,
    })
}

impl SqliteLibraryStore {
    /// Opens (or creates) the library database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of read-only connections, at least 1
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open library database {:?}", db_path_ref))?;

        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate_if_needed(&mut write_conn, LIBRARY_VERSIONED_SCHEMAS)?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteLibraryStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        };
        info!(
            "Opened song library at {:?} with {} songs",
            db_path_ref,
            store.get_songs_count()?
        );
        Ok(store)
    }

    fn lock_write_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.write_conn
            .lock()
            .map_err(|_| anyhow!("Library write connection mutex poisoned"))
    }

    fn with_read_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        let conn = self.read_pool[index]
            .lock()
            .map_err(|_| anyhow!("Library read connection mutex poisoned"))?;
        f(&*conn)
    }
}

/// Write transaction holding the store's write connection until it is
/// committed or dropped.
struct SqliteLibraryTransaction<'a> {
    conn: MutexGuard<'a, Connection>,
    finished: bool,
}

impl LibraryTransaction for SqliteLibraryTransaction<'_> {
    fn get_artist_id(&self, name: &str) -> Result<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id FROM artists WHERE name = ?1",
                params![name],
                |r| r.get(0),
            )
            .optional()?)
    }

    fn add_artist(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO artists (name) VALUES (?1)", params![name])
            .with_context(|| format!("Failed to insert artist '{}'", name))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn song_exists(&self, artist_id: i64, title: &str) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM songs WHERE artist_id = ?1 AND title = ?2)",
            params![artist_id, title],
            |r| r.get(0),
        )?)
    }

    fn add_song(&self, artist_id: i64, title: &str) -> Result<i32> {
        match self.conn.execute(
            "INSERT INTO songs (artist_id, title) VALUES (?1, ?2)",
            params![artist_id, title],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Err(DuplicateSongError {
                    artist_id,
                    title: title.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e).context("Failed to insert song"),
        }

        let rowid = self.conn.last_insert_rowid();
        i32::try_from(rowid).with_context(|| format!("Song ID {} exceeds the i32 range", rowid))
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteLibraryTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.conn.execute("ROLLBACK", []) {
                warn!("Failed to roll back library transaction: {}", e);
            }
        }
    }
}

impl LibraryStore for SqliteLibraryStore {
    fn begin_transaction(&self) -> Result<Box<dyn LibraryTransaction + '_>> {
        let conn = self.lock_write_conn()?;
        conn.execute("BEGIN IMMEDIATE", [])
            .context("Failed to begin library transaction")?;
        Ok(Box::new(SqliteLibraryTransaction {
            conn,
            finished: false,
        }))
    }

    fn get_song(&self, id: i32) -> Result<Option<Song>> {
        self.with_read_conn(|conn| {
            Ok(conn
                .query_row(
                    &format!(
                        "SELECT {} FROM songs s JOIN artists a ON a.id = s.artist_id WHERE s.id = ?1",
                        SONG_COLUMNS
                    ),
                    params![id],
                    parse_song_row,
                )
                .optional()?)
        })
    }

    fn get_song_text(&self, id: i32) -> Result<Option<SongText>> {
        self.with_read_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT a.name, s.title, s.text FROM songs s
                     JOIN artists a ON a.id = s.artist_id WHERE s.id = ?1",
                    params![id],
                    |r| {
                        Ok(SongText {
                            artist: r.get(0)?,
                            title: r.get(1)?,
                            text: r.get(2)?,
                        })
                    },
                )
                .optional()?)
        })
    }

    fn update_song_details(&self, id: i32, update: &SongDetailUpdate) -> Result<bool> {
        let mut assignments: Vec<&str> = Vec::with_capacity(3);
        let mut values: Vec<Value> = Vec::with_capacity(4);
        if let Some(date) = &update.release_date {
            assignments.push("release_date = ?");
            values.push(Value::Text(to_storage(date)));
        }
        if let Some(text) = &update.text {
            assignments.push("text = ?");
            values.push(Value::Text(text.clone()));
        }
        if let Some(link) = &update.link {
            assignments.push("link = ?");
            values.push(Value::Text(link.clone()));
        }

        let conn = self.lock_write_conn()?;
        if update.is_empty() {
            return Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM songs WHERE id = ?1)",
                params![id],
                |r| r.get(0),
            )?);
        }

        values.push(Value::Integer(id.into()));
        let sql = format!("UPDATE songs SET {} WHERE id = ?", assignments.join(", "));
        let updated = conn
            .execute(&sql, params_from_iter(values.iter()))
            .with_context(|| format!("Failed to update song {}", id))?;
        Ok(updated > 0)
    }

    fn delete_song(&self, id: i32) -> Result<bool> {
        let conn = self.lock_write_conn()?;
        let deleted = conn
            .execute("DELETE FROM songs WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete song {}", id))?;
        Ok(deleted > 0)
    }

    fn list_songs(&self, filter: &SongFilter) -> Result<Vec<Song>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(artist) = &filter.artist {
            clauses.push("a.name LIKE ? ESCAPE '\\'");
            values.push(Value::Text(contains_pattern(artist)));
        }
        if let Some(title) = &filter.title {
            clauses.push("s.title LIKE ? ESCAPE '\\'");
            values.push(Value::Text(contains_pattern(title)));
        }
        if let Some(date) = &filter.release_date {
            clauses.push("s.release_date = ?");
            values.push(Value::Text(to_storage(date)));
        }
        if let Some(text) = &filter.text {
            clauses.push("instr(s.text, ?) > 0");
            values.push(Value::Text(text.clone()));
        }
        values.push(Value::Integer(filter.limit.into()));
        values.push(Value::Integer(filter.offset.into()));

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM songs s JOIN artists a ON a.id = s.artist_id {} ORDER BY s.id LIMIT ? OFFSET ?",
            SONG_COLUMNS, where_sql
        );

        self.with_read_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let songs = stmt
                .query_map(params_from_iter(values.iter()), parse_song_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(songs)
        })
    }

    fn get_songs_count(&self) -> Result<usize> {
        self.with_read_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))?;
            Ok(count as usize)
        })
    }
}
