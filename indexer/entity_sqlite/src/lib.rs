use std::{fmt, path::Path};

use error_stack::{report, Result, ResultExt};
use rusqlite::{types::Value as SqlValue, Connection, OptionalExtension};
use serde_json::Value;
use stkr_indexer_core::{Context, EntityStore, EntityStoreError, EventPosition};
use tracing::debug;

const MIGRATIONS: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS entities (
        kind TEXT NOT NULL,
        id TEXT NOT NULL,
        value TEXT NOT NULL,
        block_number INTEGER NOT NULL,
        log_index INTEGER NOT NULL,
        UNIQUE(kind, id)
    );
    "#];

#[derive(Debug)]
pub struct SqliteError;

/// An entity store backed by a single sqlite table.
///
/// Each row records the position of the log that last wrote it.
pub struct SqliteEntityStore {
    connection: Connection,
}

impl SqliteEntityStore {
    pub fn with_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// Open (or create) the database at `path` and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteError> {
        let path = path.as_ref();
        let connection = Connection::open(path)
            .change_context(SqliteError)
            .attach_printable_lazy(|| format!("failed to open database at {}", path.display()))?;
        let storage = Self::with_connection(connection);
        storage.initialize()?;
        Ok(storage)
    }

    pub fn initialize(&self) -> Result<(), SqliteError> {
        for migration in MIGRATIONS {
            self.connection
                .execute(migration, rusqlite::params![])
                .change_context(SqliteError)
                .attach_printable("failed to apply migration to database")?;
        }

        Ok(())
    }
}

impl EntityStore for SqliteEntityStore {
    fn get(&mut self, kind: &str, id: &str) -> Result<Option<Value>, EntityStoreError> {
        let value = self
            .connection
            .query_row(
                "SELECT value FROM entities WHERE kind = ?1 AND id = ?2",
                (kind, id),
                |row| {
                    let value: String = row.get(0)?;
                    Ok(value)
                },
            )
            .optional()
            .change_context(SqliteError)
            .attach_printable("failure to get entity from database")
            .change_context(EntityStoreError)?;

        value.map(|value| parse_value(&value)).transpose()
    }

    fn set(
        &mut self,
        ctx: &Context,
        kind: &str,
        id: &str,
        value: &Value,
    ) -> Result<(), EntityStoreError> {
        let serialized = serde_json::to_string(value)
            .change_context(SqliteError)
            .attach_printable("failed to serialize entity")
            .change_context(EntityStoreError)?;

        let EventPosition {
            block_number,
            log_index,
        } = ctx.position;
        debug!(kind, id, block_number, log_index, "write entity");

        self.connection
            .execute(
                r#"
                INSERT OR REPLACE INTO entities(kind, id, value, block_number, log_index)
                VALUES(?1, ?2, ?3, ?4, ?5)"#,
                (kind, id, &serialized, block_number, log_index),
            )
            .change_context(SqliteError)
            .attach_printable("failed to write entity")
            .change_context(EntityStoreError)?;

        Ok(())
    }

    fn latest_by(
        &mut self,
        kind: &str,
        field: &str,
        value: &Value,
        before: EventPosition,
    ) -> Result<Option<Value>, EntityStoreError> {
        let lookup = to_sql_value(value).change_context(EntityStoreError)?;
        let path = format!("$.{field}");

        let latest = self
            .connection
            .query_row(
                r#"
                SELECT value FROM entities
                WHERE kind = ?1 AND json_extract(value, ?2) = ?3
                    AND (block_number < ?4 OR (block_number = ?4 AND log_index < ?5))
                ORDER BY block_number DESC, log_index DESC
                LIMIT 1"#,
                (kind, &path, &lookup, before.block_number, before.log_index),
                |row| {
                    let value: String = row.get(0)?;
                    Ok(value)
                },
            )
            .optional()
            .change_context(SqliteError)
            .attach_printable_lazy(|| format!("failed to lookup {kind} entity by {field}"))
            .change_context(EntityStoreError)?;

        latest.map(|value| parse_value(&value)).transpose()
    }

    fn count(&mut self, kind: &str) -> Result<usize, EntityStoreError> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM entities WHERE kind = ?1",
                [kind],
                |row| row.get(0),
            )
            .change_context(SqliteError)
            .attach_printable("failed to count entities")
            .change_context(EntityStoreError)?;

        Ok(count as usize)
    }
}

fn parse_value(value: &str) -> Result<Value, EntityStoreError> {
    serde_json::from_str(value)
        .change_context(SqliteError)
        .attach_printable("failed to parse entity")
        .change_context(EntityStoreError)
}

/// Convert a json scalar to the value returned by `json_extract`.
fn to_sql_value(value: &Value) -> Result<SqlValue, SqliteError> {
    match value {
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Bool(b) => Ok(SqlValue::Integer(*b as i64)),
        Value::Number(n) => {
            if let Some(n) = n.as_i64() {
                Ok(SqlValue::Integer(n))
            } else if let Some(n) = n.as_f64() {
                Ok(SqlValue::Real(n))
            } else {
                Err(report!(SqliteError).attach_printable(format!("unsupported number {n}")))
            }
        }
        _ => Err(report!(SqliteError)
            .attach_printable("lookup value must be a string, number or boolean")),
    }
}

impl error_stack::Context for SqliteError {}

impl fmt::Display for SqliteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sqlite error")
    }
}
