//! SQLite catalog storage
//!
//! Holds actors, features, feature types and movies. Access goes through an
//! r2d2 pool of rusqlite connections; every mutation runs in a single
//! transaction.
//!
//! # Schema versions
//!
//! ```text
//! v1  metadata, actors, features, feature_types, movies + link tables
//! v2  folds the legacy category schema (categories, actor_category)
//!     into feature types under the reserved "Categories" feature
//! ```
//!
//! The schema version lives in `metadata.schema_version`. A database
//! created by the legacy backend (actors + categories only) is picked up
//! as version 0 and migrated in place.

mod actors;
mod features;
mod movies;

use crate::model::{Id, Shade};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Storage failures, mapped to HTTP statuses by the server
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl FromSql for Shade {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Shade::parse(text).ok_or_else(|| FromSqlError::Other(format!("unknown shade {text:?}").into()))
    }
}

impl ToSql for Shade {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Catalog store backed by a pooled SQLite database
#[derive(Clone)]
pub struct Catalog {
    pool: Pool<SqliteConnectionManager>,
}

impl Catalog {
    /// Open (or create) the catalog at `db_path` and apply migrations
    pub fn open(db_path: impl AsRef<Path>) -> StorageResult<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Validation(format!(
                        "cannot create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|c| {
            c.execute_batch(
                r#"
                PRAGMA foreign_keys=ON;
                PRAGMA busy_timeout=5000;
                "#,
            )
        });
        let pool = Pool::builder().max_size(4).build(manager)?;

        let catalog = Self { pool };
        catalog.init_schema(true)?;
        Ok(catalog)
    }

    /// Private in-memory catalog
    ///
    /// Every in-memory connection is its own database, so the pool is
    /// pinned to a single long-lived connection.
    pub fn open_in_memory() -> StorageResult<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|c| c.execute_batch("PRAGMA foreign_keys=ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;

        let catalog = Self { pool };
        catalog.init_schema(false)?;
        Ok(catalog)
    }

    /// Get a connection from the pool
    fn conn(&self) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Schema version currently recorded in the database
    pub fn schema_version(&self) -> StorageResult<i32> {
        let conn = self.conn()?;
        read_schema_version(&conn)
    }

    /// Apply pragmas and pending migrations
    fn init_schema(&self, wal: bool) -> StorageResult<()> {
        let mut conn = self.conn()?;

        if wal {
            conn.execute_batch(
                r#"
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;
                "#,
            )?;
        }

        let current_version = read_schema_version(&conn)?;

        if current_version < 1 {
            apply_schema_v1(&mut conn)?;
        }
        if current_version < 2 {
            migrate_v1_to_v2(&mut conn)?;
        }

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                from = current_version,
                to = SCHEMA_VERSION,
                "Catalog schema migrated"
            );
        }
        Ok(())
    }
}

fn read_schema_version(conn: &Connection) -> StorageResult<i32> {
    if !table_exists(conn, "metadata")? {
        return Ok(0);
    }
    let version: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version.and_then(|v| v.parse().ok()).unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES ('schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![version.to_string()],
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> StorageResult<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Initial schema (v1)
///
/// `actors` keeps the legacy column layout (id, name, created_at) so a
/// database written by the old backend is adopted as-is.
fn apply_schema_v1(conn: &mut Connection) -> StorageResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS actors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_actors_created ON actors(created_at);

        CREATE TABLE IF NOT EXISTS features (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            is_category_group INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS feature_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            feature_id INTEGER NOT NULL REFERENCES features(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            shade TEXT NOT NULL CHECK (shade IN ('light', 'middle', 'dark')),
            position INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_types_feature ON feature_types(feature_id);

        CREATE TABLE IF NOT EXISTS actor_feature_types (
            actor_id INTEGER NOT NULL REFERENCES actors(id) ON DELETE CASCADE,
            feature_type_id INTEGER NOT NULL REFERENCES feature_types(id) ON DELETE CASCADE,
            PRIMARY KEY (actor_id, feature_type_id)
        );

        CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_movies_created ON movies(created_at);

        CREATE TABLE IF NOT EXISTS movie_actors (
            movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
            actor_id INTEGER NOT NULL REFERENCES actors(id) ON DELETE CASCADE,
            PRIMARY KEY (movie_id, actor_id)
        );

        CREATE TABLE IF NOT EXISTS movie_feature_types (
            movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
            feature_type_id INTEGER NOT NULL REFERENCES feature_types(id) ON DELETE CASCADE,
            PRIMARY KEY (movie_id, feature_type_id)
        );
        "#,
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// v1 → v2: move legacy categories into the reserved category feature
fn migrate_v1_to_v2(conn: &mut Connection) -> StorageResult<()> {
    let tx = conn.transaction()?;

    // Legacy timestamps look like "2024-01-15 10:20:30.123456" (naive UTC)
    tx.execute(
        "UPDATE actors SET created_at = replace(created_at, ' ', 'T') || 'Z'
         WHERE created_at LIKE '% %'",
        [],
    )?;

    if table_exists(&tx, "categories")? {
        let group_id = features::ensure_category_feature(&tx)?;

        let legacy: Vec<(Id, String)> = {
            let mut stmt = tx.prepare("SELECT id, name FROM categories ORDER BY name, id")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<Result<_, _>>()?
        };

        let mut moved = 0usize;
        for (old_id, name) in &legacy {
            let new_id = features::insert_type(&tx, group_id, name, Shade::Middle)?;
            if table_exists(&tx, "actor_category")? {
                tx.execute(
                    "INSERT OR IGNORE INTO actor_feature_types (actor_id, feature_type_id)
                     SELECT actor_id, ?1 FROM actor_category
                     WHERE category_id = ?2 AND actor_id IN (SELECT id FROM actors)",
                    params![new_id, old_id],
                )?;
            }
            moved += 1;
        }

        tx.execute_batch(
            r#"
            DROP TABLE IF EXISTS actor_category;
            DROP TABLE IF EXISTS categories;
            "#,
        )?;
        tracing::info!(categories = moved, "Migrated legacy categories into feature types");
    }

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}

/// Trim a user-supplied name and reject it when empty
pub(crate) fn clean_name(value: &str, what: &str) -> StorageResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StorageError::Validation(format!("{what} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Creation timestamp in the wire format
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewActor, NewFeature, NewFeatureType};

    #[test]
    fn fresh_catalog_is_at_current_version() {
        let catalog = Catalog::open_in_memory().unwrap();
        assert_eq!(catalog.schema_version().unwrap(), SCHEMA_VERSION);
        assert!(catalog.list_features().unwrap().is_empty());
    }

    #[test]
    fn reopening_file_catalog_keeps_data() {
        let dir = std::env::temp_dir().join(format!(
            "marquee-storage-test-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path = dir.join("catalog.db");

        {
            let catalog = Catalog::open(&path).unwrap();
            catalog
                .create_actor(&NewActor {
                    name: "Grace".into(),
                    ..Default::default()
                })
                .unwrap();
        }

        let catalog = Catalog::open(&path).unwrap();
        let actors = catalog.list_actors().unwrap();
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Grace");

        drop(catalog);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn legacy_category_schema_is_migrated() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys=ON;
            CREATE TABLE actors (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL, created_at DATETIME);
            CREATE TABLE categories (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL UNIQUE);
            CREATE TABLE actor_category (
                actor_id INTEGER REFERENCES actors(id) ON DELETE CASCADE,
                category_id INTEGER REFERENCES categories(id) ON DELETE CASCADE,
                PRIMARY KEY (actor_id, category_id)
            );
            INSERT INTO actors VALUES (1, 'Ada', '2024-01-15 10:20:30.123456');
            INSERT INTO categories VALUES (5, 'Drama'), (6, 'Action');
            INSERT INTO actor_category VALUES (1, 5);
            "#,
        )
        .unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), 0);
        apply_schema_v1(&mut conn).unwrap();
        migrate_v1_to_v2(&mut conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), 2);
        assert!(!table_exists(&conn, "categories").unwrap());
        assert!(!table_exists(&conn, "actor_category").unwrap());

        let categories = features::list_categories(&conn).unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Drama"]);

        let actors = actors::list_actors(&conn).unwrap();
        assert_eq!(actors[0].created_at, "2024-01-15T10:20:30.123456Z");
        assert_eq!(actors[0].feature_types.len(), 1);
        assert_eq!(actors[0].feature_types[0].name, "Drama");
    }

    #[test]
    fn shade_round_trips_through_sqlite() {
        let catalog = Catalog::open_in_memory().unwrap();
        let feature = catalog
            .create_feature(&NewFeature {
                name: "Eyes".into(),
                color: "#336699".into(),
            })
            .unwrap();
        let ty = catalog
            .create_feature_type(&NewFeatureType {
                feature_id: feature.id,
                name: "Grey".into(),
                shade: Shade::Dark,
            })
            .unwrap();
        assert_eq!(ty.shade, Shade::Dark);
        assert_eq!(catalog.list_features().unwrap()[0].types[0].shade, Shade::Dark);
    }

    #[test]
    fn clean_name_trims_and_rejects_blank() {
        assert_eq!(clean_name("  Ada ", "name").unwrap(), "Ada");
        assert!(matches!(
            clean_name(" \t ", "name"),
            Err(StorageError::Validation(_))
        ));
    }
}
