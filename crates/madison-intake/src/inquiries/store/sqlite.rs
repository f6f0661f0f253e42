use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OpenFlags, Row};

use super::{InquiryStore, StoreError};
use crate::inquiries::domain::{Inquiry, InquiryId, NewInquiry, PracticeArea};

/// Schema steps, applied in order. The database's `user_version` records how many ran.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_inquiries.sql",
    include_str!("../../../migrations/001_inquiries.sql"),
)];

const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Inquiry store backed by a single SQLite table.
///
/// The connection sits behind a mutex; SQLite's autoincrement key provides unique,
/// monotonically increasing ids.
pub struct SqliteInquiryStore {
    conn: Mutex<Connection>,
}

impl SqliteInquiryStore {
    /// Open (creating if needed) and bring the schema up to date.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        restrict_db_permissions(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open an existing database without migrating it or changing its journal mode.
    ///
    /// `create` on the returned store fails; the schema must already be current.
    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        let version = user_version(&conn)?;
        if version != latest_version() {
            return Err(StoreError::Migration(format!(
                "{} is at schema version {version}, expected {}",
                path.display(),
                latest_version()
            )));
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        user_version(&*self.connection()?)
    }

    fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection mutex poisoned".to_string()))
    }
}

impl InquiryStore for SqliteInquiryStore {
    fn create(&self, inquiry: NewInquiry) -> Result<Inquiry, StoreError> {
        let created_at = Utc::now().trunc_subsecs(6);
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO inquiries
                (first_name, last_name, email, phone, practice_area, message,
                 terms_accepted, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7);",
            params![
                inquiry.first_name,
                inquiry.last_name,
                inquiry.email,
                inquiry.phone,
                inquiry.practice_area.slug(),
                inquiry.message,
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        let id = InquiryId(conn.last_insert_rowid());

        Ok(inquiry.into_inquiry(id, created_at))
    }

    fn list(&self) -> Result<Vec<Inquiry>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, email, phone, practice_area, message,
                    terms_accepted, created_at
             FROM inquiries
             ORDER BY id ASC;",
        )?;

        let rows = stmt.query_map([], StoredRow::from_row)?;
        let mut inquiries = Vec::new();
        for row in rows {
            inquiries.push(row?.into_inquiry()?);
        }
        Ok(inquiries)
    }
}

/// Raw column values before domain decoding.
struct StoredRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    practice_area: String,
    message: String,
    terms_accepted: bool,
    created_at: String,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            practice_area: row.get(5)?,
            message: row.get(6)?,
            terms_accepted: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_inquiry(self) -> Result<Inquiry, StoreError> {
        let practice_area =
            PracticeArea::from_slug(&self.practice_area).ok_or_else(|| StoreError::Corrupt {
                id: self.id,
                reason: format!("unknown practice area '{}'", self.practice_area),
            })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|err| StoreError::Corrupt {
                id: self.id,
                reason: format!("invalid created_at '{}': {err}", self.created_at),
            })?
            .with_timezone(&Utc);

        Ok(Inquiry {
            id: InquiryId(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            practice_area,
            message: self.message,
            terms_accepted: self.terms_accepted,
            created_at,
        })
    }
}

fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

fn user_version(conn: &Connection) -> Result<i64, StoreError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Apply pending migrations and bump `user_version` in one transaction.
fn migrate(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    let current = user_version(&tx)?;
    let latest = latest_version();

    if !(0..=latest).contains(&current) {
        return Err(StoreError::Migration(format!(
            "db version {current} outside known range 0..={latest}"
        )));
    }
    if current == latest {
        return Ok(());
    }

    for (name, sql) in &MIGRATIONS[current as usize..] {
        tx.execute_batch(sql)
            .map_err(|err| StoreError::Migration(format!("{name} failed: {err}")))?;
    }
    tx.pragma_update(None, "user_version", latest)?;
    tx.commit()?;
    Ok(())
}

#[cfg(unix)]
fn restrict_db_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    if path.exists() {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_db_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}
