use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::{AppError, Result};

const CONTACTS_SCHEMA: &str = include_str!("../../../resources/contacts/schema.sql");

const CONTACTS_SCHEMA_VERSION: i32 = 1;

/// Open a pool for `database_url`, creating the file when missing.
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn connect_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = is_memory_url(database_url);

    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse database URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(4)
    };

    pool_options
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {}", e)))
}

/// Apply the contacts schema and stamp `PRAGMA user_version`.
pub async fn init_contacts_db(pool: &SqlitePool) -> Result<()> {
    let current_version = read_user_version(pool).await?;
    // Refuse to touch a database written by a newer build
    if current_version > CONTACTS_SCHEMA_VERSION {
        return Err(AppError::DatabaseError(format!(
            "Contacts database schema too new: db user_version={} > app supported_version={}",
            current_version, CONTACTS_SCHEMA_VERSION
        )));
    }

    for stmt in split_sql_statements(CONTACTS_SCHEMA) {
        let sql = stmt.trim();
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql).execute(pool).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to apply contacts schema statement: {}", e))
        })?;
    }

    set_user_version(pool, CONTACTS_SCHEMA_VERSION).await?;

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {}", e)))?;

    tracing::debug!(version = CONTACTS_SCHEMA_VERSION, "Contacts schema ready");
    Ok(())
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

async fn read_user_version(pool: &SqlitePool) -> Result<i32> {
    sqlx::query_scalar::<_, i32>("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to read PRAGMA user_version: {}", e)))
}

async fn set_user_version(pool: &SqlitePool, version: i32) -> Result<()> {
    let sql = format!("PRAGMA user_version = {}", version);
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to set PRAGMA user_version: {}", e)))?;
    Ok(())
}

/// Split a schema file on `;`, ignoring semicolons inside quotes and comments.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();

    let mut in_single = false;
    let mut in_double = false;
    let mut in_line_comment = false;

    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
                buf.push(c);
            }
            continue;
        }

        if !in_single && !in_double && c == '-' && chars.peek() == Some(&'-') {
            chars.next();
            in_line_comment = true;
            continue;
        }

        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            ';' if !in_single && !in_double => {
                out.push(std::mem::take(&mut buf));
                continue;
            }
            _ => {}
        }
        buf.push(c);
    }

    if !buf.trim().is_empty() {
        out.push(buf);
    }

    out.retain(|s| !s.trim().is_empty());
    out
}
