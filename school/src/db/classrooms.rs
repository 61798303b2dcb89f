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

//! Persistence of classrooms.

use crate::db::{bind_audit, expect_one_row, get_audit, get_uuid, map_delete_error};
use crate::model::Classroom;
use campus_core::db::sqlite;
use campus_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;
use uuid::Uuid;

impl TryFrom<SqliteRow> for Classroom {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let location: Option<String> = row.try_get("location").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;

        Ok(Classroom {
            id: get_uuid(&row, "id")?,
            name,
            location,
            status: FromStr::from_str(&status)?,
            audit: get_audit(&row)?,
        })
    }
}

/// Inserts a new `classroom`.
pub async fn create_classroom(ex: &mut Executor, classroom: &Classroom) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO classrooms (
                    id, name, location, status,
                    created_by, created_date_secs, created_date_nsecs,
                    updated_by, updated_date_secs, updated_date_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let query = sqlx::query(query_str)
                .bind(classroom.id.to_string())
                .bind(&classroom.name)
                .bind(&classroom.location)
                .bind(classroom.status.as_str());
            let done = bind_audit(query, &classroom.audit)?
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Insertion")
}

/// Gets the classroom identified by `id`, if any.
pub async fn get_classroom(ex: &mut Executor, id: &Uuid) -> DbResult<Option<Classroom>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM classrooms WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(Classroom::try_from).transpose()
        }
    }
}

/// Replaces the stored copy of `classroom`.
pub async fn update_classroom(ex: &mut Executor, classroom: &Classroom) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE classrooms SET
                    name = ?, location = ?, status = ?,
                    created_by = ?, created_date_secs = ?, created_date_nsecs = ?,
                    updated_by = ?, updated_date_secs = ?, updated_date_nsecs = ?
                WHERE id = ?";
            let query = sqlx::query(query_str)
                .bind(&classroom.name)
                .bind(&classroom.location)
                .bind(classroom.status.as_str());
            let done = bind_audit(query, &classroom.audit)?
                .bind(classroom.id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Update")
}

/// Deletes the classroom identified by `id`.
pub async fn delete_classroom(ex: &mut Executor, id: &Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM classrooms WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(map_delete_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Deletion")
}

/// Checks whether the classroom identified by `id` exists.
pub async fn classroom_exists(ex: &mut Executor, id: &Uuid) -> DbResult<bool> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM classrooms WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let count: i64 = row.try_get("count").map_err(sqlite::map_sqlx_error)?;
            Ok(count > 0)
        }
    }
}
