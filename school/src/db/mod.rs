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

//! Database abstraction in terms of the operations needed by the server.
//!
//! Every entity has its own module with free functions that operate on an `Executor`.  All
//! timestamps are stored as pairs of seconds and nanoseconds and all identifiers as text.

use campus_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use campus_core::db::{DbError, DbResult, Executor};
use campus_core::model::Audit;
use sqlx::Row;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use time::OffsetDateTime;
use uuid::Uuid;

mod classrooms;
pub use classrooms::*;
mod gateway;
pub use gateway::DbGateway;
mod semester_courses;
pub use semester_courses::*;
mod student_semester_courses;
pub use student_semester_courses::*;
mod students;
pub use students::*;
mod teachers;
pub use teachers::*;
#[cfg(test)]
pub(crate) mod testutils;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,
    }
}

/// Type of the queries that the functions in this module build.
type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Extracts the identifier stored as text in `column` of `row`.
fn get_uuid(row: &SqliteRow, column: &str) -> DbResult<Uuid> {
    let raw: String = row.try_get(column).map_err(sqlite::map_sqlx_error)?;
    Uuid::parse_str(&raw)
        .map_err(|e| DbError::DataIntegrityError(format!("Invalid uuid in {}: {}", column, e)))
}

/// Extracts the timestamp stored in the `<prefix>_secs` and `<prefix>_nsecs` columns of `row`.
fn get_timestamp(row: &SqliteRow, prefix: &str) -> DbResult<OffsetDateTime> {
    let secs: i64 =
        row.try_get(format!("{}_secs", prefix).as_str()).map_err(sqlite::map_sqlx_error)?;
    let nsecs: i64 =
        row.try_get(format!("{}_nsecs", prefix).as_str()).map_err(sqlite::map_sqlx_error)?;
    build_timestamp(secs, nsecs)
}

/// Extracts the audit fields of a record from `row`.
fn get_audit(row: &SqliteRow) -> DbResult<Audit> {
    Ok(Audit::new(get_uuid(row, "created_by")?, get_timestamp(row, "created_date")?)
        .with_update(get_uuid(row, "updated_by")?, get_timestamp(row, "updated_date")?))
}

/// Binds the audit fields of a record to `query`, in the order `created_by`, `created_date_secs`,
/// `created_date_nsecs`, `updated_by`, `updated_date_secs` and `updated_date_nsecs`.
///
/// All fields must be present because records are only persisted once the driver has stamped
/// them.
fn bind_audit<'q>(query: SqliteQuery<'q>, audit: &Audit) -> DbResult<SqliteQuery<'q>> {
    let (Some(created_date), Some(updated_by), Some(updated_date)) =
        (audit.created_date, audit.updated_by, audit.updated_date)
    else {
        return Err(DbError::DataIntegrityError(format!("Incomplete audit fields: {:?}", audit)));
    };
    let (created_date_secs, created_date_nsecs) = unpack_timestamp(created_date);
    let (updated_date_secs, updated_date_nsecs) = unpack_timestamp(updated_date);

    Ok(query
        .bind(audit.created_by.to_string())
        .bind(created_date_secs)
        .bind(created_date_nsecs)
        .bind(updated_by.to_string())
        .bind(updated_date_secs)
        .bind(updated_date_nsecs))
}

/// Checks that a write affected exactly one row, returning `NotFound` if it affected none.
fn expect_one_row(rows_affected: u64, what: &str) -> DbResult<()> {
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError(format!("{} affected more than one row", what))),
    }
}

/// Maps errors raised while deleting a record.
///
/// A foreign key violation during a deletion means that other records still refer to the one
/// being deleted, not that the record is missing.
fn map_delete_error(e: sqlx::Error) -> DbError {
    match sqlite::map_sqlx_error(e) {
        DbError::DataIntegrityError(e) if e.contains("FOREIGN KEY") => {
            DbError::DataIntegrityError("Record is still referenced by other records".to_owned())
        }
        e => e,
    }
}
