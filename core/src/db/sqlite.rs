// Campus
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor};
use async_trait::async_trait;
use futures::TryStreamExt;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use time::OffsetDateTime;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e if e.to_string().contains("FOREIGN KEY constraint failed") => {
            DbError::DataIntegrityError(e.to_string())
        }
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e if e.to_string().contains("CHECK constraint failed") => {
            DbError::DataIntegrityError(e.to_string())
        }
        e if e.to_string().contains("NOT NULL constraint failed") => {
            DbError::DataIntegrityError(e.to_string())
        }
        e if e.to_string().contains("database is locked") => DbError::Locked(e.to_string()),
        e if e.to_string().contains("database table is locked") => DbError::Locked(e.to_string()),
        e => DbError::BackendError(e.to_string()),
    }
}

/// Creates a new connection to the database identified by `conn_str`.
///
/// Foreign key enforcement is always enabled on the returned connections.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let options = SqliteConnectOptions::from_str(conn_str)
        .map_err(map_sqlx_error)?
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await.map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A generic database executor implementation for SQLite.
///
/// Queries are issued against the underlying connection with `&mut **ex`.
pub type SqliteExecutor = PoolConnection<Sqlite>;

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// operations can use concurrently.
    pool: SqlitePool,
}

impl SqliteDb {
    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<SqliteExecutor> {
        self.pool.acquire().await.map_err(map_sqlx_error)
    }
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        Ok(Executor::Sqlite(self.typed_ex().await?))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
pub async fn run_schema(e: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    let mut results = sqlx::query(schema).execute_many(&mut **e).await;
    while results.try_next().await.map_err(map_sqlx_error)?.is_some() {
        // Nothing to do.
    }
    Ok(())
}

/// Converts a timestamp as extracted from the database into an `OffsetDateTime`.
///
/// `timestamp_sec` holds the whole seconds since the Unix epoch rounded towards negative infinity,
/// which means it can be negative for dates before 1970, and `timestamp_nsec` holds the
/// non-negative sub-second remainder.  This representation keeps the natural ordering of the
/// timestamps when comparing the pairs in SQL queries.
pub fn build_timestamp(timestamp_sec: i64, timestamp_nsec: i64) -> DbResult<OffsetDateTime> {
    if !(0..1_000_000_000).contains(&timestamp_nsec) {
        return Err(DbError::DataIntegrityError(format!(
            "Timestamp nanoseconds out of range: sec={}, nsec={}",
            timestamp_sec, timestamp_nsec
        )));
    }

    match OffsetDateTime::from_unix_timestamp_nanos(
        (i128::from(timestamp_sec) * 1_000_000_000) + (i128::from(timestamp_nsec)),
    ) {
        Ok(timestamp) => Ok(timestamp),
        Err(e) => Err(DbError::DataIntegrityError(format!("Invalid timestamp: {}", e))),
    }
}

/// Converts a timestamp into the seconds and nanoseconds pair needed by the database.
pub fn unpack_timestamp(ts: OffsetDateTime) -> (i64, i64) {
    (ts.unix_timestamp(), i64::from(ts.nanosecond()))
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Initializes the test database.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        connect(":memory:").await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use time::macros::datetime;

    async fn setup_table(db: &SqliteDb) -> SqliteExecutor {
        let mut ex = db.typed_ex().await.unwrap();
        run_schema(
            &mut ex,
            "CREATE TABLE parents (id INTEGER PRIMARY KEY);
            CREATE TABLE children (
                id INTEGER PRIMARY KEY,
                parent_id INTEGER NOT NULL REFERENCES parents (id),
                age INTEGER CHECK (age >= 0)
            );
            INSERT INTO parents (id) VALUES (1);",
        )
        .await
        .unwrap();
        ex
    }

    #[tokio::test]
    async fn test_map_sqlx_error_already_exists() {
        let db = setup().await;
        let mut ex = setup_table(&db).await;

        let err = sqlx::query("INSERT INTO parents (id) VALUES (1)")
            .execute(&mut *ex)
            .await
            .unwrap_err();
        assert_eq!(DbError::AlreadyExists, map_sqlx_error(err));

        drop(ex);
        db.close().await;
    }

    #[tokio::test]
    async fn test_map_sqlx_error_foreign_key() {
        let db = setup().await;
        let mut ex = setup_table(&db).await;

        let err = sqlx::query("INSERT INTO children (id, parent_id) VALUES (1, 5)")
            .execute(&mut *ex)
            .await
            .unwrap_err();
        match map_sqlx_error(err) {
            DbError::DataIntegrityError(e) => assert!(e.contains("FOREIGN KEY")),
            e => panic!("Unexpected error: {:?}", e),
        }

        sqlx::query("INSERT INTO children (id, parent_id) VALUES (1, 1)")
            .execute(&mut *ex)
            .await
            .unwrap();
        let err = sqlx::query("UPDATE children SET parent_id = 5 WHERE id = 1")
            .execute(&mut *ex)
            .await
            .unwrap_err();
        match map_sqlx_error(err) {
            DbError::DataIntegrityError(e) => assert!(e.contains("FOREIGN KEY")),
            e => panic!("Unexpected error: {:?}", e),
        }

        drop(ex);
        db.close().await;
    }

    #[tokio::test]
    async fn test_map_sqlx_error_constraints() {
        let db = setup().await;
        let mut ex = setup_table(&db).await;

        let err = sqlx::query("INSERT INTO children (id, parent_id, age) VALUES (1, 1, -3)")
            .execute(&mut *ex)
            .await
            .unwrap_err();
        match map_sqlx_error(err) {
            DbError::DataIntegrityError(e) => assert!(e.contains("CHECK")),
            e => panic!("Unexpected error: {:?}", e),
        }

        let err = sqlx::query("INSERT INTO children (id) VALUES (1)")
            .execute(&mut *ex)
            .await
            .unwrap_err();
        match map_sqlx_error(err) {
            DbError::DataIntegrityError(e) => assert!(e.contains("NOT NULL")),
            e => panic!("Unexpected error: {:?}", e),
        }

        drop(ex);
        db.close().await;
    }

    #[tokio::test]
    async fn test_map_sqlx_error_row_not_found() {
        let db = setup().await;
        let mut ex = setup_table(&db).await;

        let err = sqlx::query("SELECT id FROM parents WHERE id = 9")
            .fetch_one(&mut *ex)
            .await
            .map(|_| ())
            .unwrap_err();
        assert_eq!(DbError::NotFound, map_sqlx_error(err));

        drop(ex);
        db.close().await;
    }

    #[test]
    fn test_map_sqlx_error_other() {
        assert_eq!(DbError::Unavailable, map_sqlx_error(sqlx::Error::PoolTimedOut));
        match map_sqlx_error(sqlx::Error::PoolClosed) {
            DbError::BackendError(_) => (),
            e => panic!("Unexpected error: {:?}", e),
        }
    }

    #[test]
    fn test_map_sqlx_error_locked() {
        for message in ["database is locked", "database table is locked: students"] {
            match map_sqlx_error(sqlx::Error::Protocol(message.to_owned())) {
                DbError::Locked(e) => assert!(e.contains(message)),
                e => panic!("Unexpected error for {}: {:?}", message, e),
            }
        }
    }

    #[test]
    fn test_build_unpack_timestamp_zero() {
        let d = OffsetDateTime::from_unix_timestamp(0).unwrap();
        let (secs, nsecs) = unpack_timestamp(d);
        assert_eq!(0, secs);
        assert_eq!(0, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_unpack_timestamp_secs_precision() {
        let d = OffsetDateTime::from_unix_timestamp(123456789i64).unwrap();
        let (secs, nsecs) = unpack_timestamp(d);
        assert_eq!(123456789i64, secs);
        assert_eq!(0, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_unpack_timestamp_nsecs_precision() {
        let d = OffsetDateTime::from_unix_timestamp_nanos(1234567899876543215i128).unwrap();
        let (secs, nsecs) = unpack_timestamp(d);
        assert_eq!(1234567899i64, secs);
        assert_eq!(876543215i64, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_unpack_timestamp_before_epoch() {
        let d = datetime!(1969-12-31 23:59:59.25 UTC);
        let (secs, nsecs) = unpack_timestamp(d);
        assert_eq!(-1, secs);
        assert_eq!(250_000_000, nsecs);
        assert_eq!(Ok(d), build_timestamp(secs, nsecs));
    }

    #[test]
    fn test_build_timestamp_bad_nsecs() {
        match build_timestamp(0, -1) {
            Err(DbError::DataIntegrityError(_)) => (),
            e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
        }

        match build_timestamp(0, 1_000_000_000) {
            Err(DbError::DataIntegrityError(_)) => (),
            e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
        }
    }

    #[test]
    fn test_build_timestamp_too_big() {
        match build_timestamp(123456789123456789i64, 0) {
            Err(_) => (),
            Ok(_) => panic!("Must have failed"),
        }
    }
}
