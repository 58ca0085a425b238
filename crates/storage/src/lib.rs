use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions, SqliteRow},
    ConnectOptions, Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, Mutex},
};

use shared::domain::{Bod, BodId, Club, ClubId};

const BOD_COLUMNS: &str = "id, first_name, last_name, email, phone_no, branch, usn, club_id";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
    /// Held open for `:memory:` databases, which SQLite drops as soon as
    /// their last connection closes.
    _memory_anchor: Option<Arc<Mutex<SqliteConnection>>>,
}

/// Insert shape for a BOD row. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewBodRecord {
    pub id: Option<BodId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_no: String,
    pub branch: String,
    pub usn: String,
    pub club_id: ClubId,
}

/// Column-wise changes; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BodChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone_no: Option<String>,
    pub branch: Option<String>,
    pub usn: Option<String>,
    pub club_id: Option<ClubId>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let (pool_options, memory_anchor) = if is_in_memory(database_url) {
            let anchor = connect_options
                .connect()
                .await
                .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
            // shared-cache memory databases lock per table across connections
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (pool_options, Some(Arc::new(Mutex::new(anchor))))
        } else {
            (SqlitePoolOptions::new().max_connections(5), None)
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run storage migrations")?;
        Ok(Self {
            pool,
            _memory_anchor: memory_anchor,
        })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_club(
        &self,
        name: &str,
        tagline: &str,
        logo_url: Option<&str>,
    ) -> Result<Club> {
        let row = sqlx::query(
            "INSERT INTO clubs (name, tagline, logo_url) VALUES (?, ?, ?)
             RETURNING id, name, tagline, logo_url",
        )
        .bind(name)
        .bind(tagline)
        .bind(logo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(club_from_row(&row))
    }

    pub async fn get_club(&self, club_id: ClubId) -> Result<Option<Club>> {
        let row = sqlx::query("SELECT id, name, tagline, logo_url FROM clubs WHERE id = ?")
            .bind(club_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(club_from_row))
    }

    pub async fn list_clubs(&self) -> Result<Vec<Club>> {
        let rows = sqlx::query("SELECT id, name, tagline, logo_url FROM clubs ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(club_from_row).collect())
    }

    pub async fn create_bod(&self, record: &NewBodRecord) -> Result<Bod> {
        let row = sqlx::query(&format!(
            "INSERT INTO bods (id, first_name, last_name, email, password_hash, phone_no, branch, usn, club_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {BOD_COLUMNS}"
        ))
        .bind(record.id.map(|id| id.0))
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.phone_no)
        .bind(&record.branch)
        .bind(&record.usn)
        .bind(record.club_id.0)
        .fetch_one(&self.pool)
        .await?;
        Ok(bod_from_row(&row))
    }

    pub async fn get_bod(&self, bod_id: BodId) -> Result<Option<Bod>> {
        let row = sqlx::query(&format!("SELECT {BOD_COLUMNS} FROM bods WHERE id = ?"))
            .bind(bod_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(bod_from_row))
    }

    pub async fn list_bods(&self) -> Result<Vec<Bod>> {
        let rows = sqlx::query(&format!("SELECT {BOD_COLUMNS} FROM bods ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(bod_from_row).collect())
    }

    /// Applies `changes` and returns the updated row, or `None` when no BOD
    /// has the given id.
    pub async fn update_bod(&self, bod_id: BodId, changes: &BodChanges) -> Result<Option<Bod>> {
        let row = sqlx::query(&format!(
            "UPDATE bods SET
                first_name    = COALESCE(?, first_name),
                last_name     = COALESCE(?, last_name),
                email         = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                phone_no      = COALESCE(?, phone_no),
                branch        = COALESCE(?, branch),
                usn           = COALESCE(?, usn),
                club_id       = COALESCE(?, club_id)
             WHERE id = ?
             RETURNING {BOD_COLUMNS}"
        ))
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.phone_no.as_deref())
        .bind(changes.branch.as_deref())
        .bind(changes.usn.as_deref())
        .bind(changes.club_id.map(|id| id.0))
        .bind(bod_id.0)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(bod_from_row))
    }
}

/// True when `err` wraps a sqlx unique-constraint failure.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}

pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_foreign_key_violation())
}

fn bod_from_row(r: &SqliteRow) -> Bod {
    Bod {
        id: BodId(r.get::<i64, _>("id")),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        email: r.get("email"),
        phone_no: r.get("phone_no"),
        branch: r.get("branch"),
        usn: r.get("usn"),
        club_id: ClubId(r.get::<i64, _>("club_id")),
    }
}

fn club_from_row(r: &SqliteRow) -> Club {
    Club {
        id: ClubId(r.get::<i64, _>("id")),
        name: r.get("name"),
        tagline: r.get("tagline"),
        logo_url: r.get::<Option<String>, _>("logo_url"),
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
