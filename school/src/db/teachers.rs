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

//! Persistence of teachers.

use crate::db::{bind_audit, expect_one_row, get_audit, get_uuid, map_delete_error};
use crate::model::Teacher;
use campus_core::db::sqlite;
use campus_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;
use uuid::Uuid;

impl TryFrom<SqliteRow> for Teacher {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let user_id: String = row.try_get("user_id").map_err(sqlite::map_sqlx_error)?;
        let employee_number: String =
            row.try_get("employee_number").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let middle_name: Option<String> =
            row.try_get("middle_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let gender: String = row.try_get("gender").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;

        Ok(Teacher {
            id: get_uuid(&row, "id")?,
            user_id,
            employee_number,
            first_name,
            middle_name,
            last_name,
            gender: FromStr::from_str(&gender)?,
            status: FromStr::from_str(&status)?,
            audit: get_audit(&row)?,
        })
    }
}

/// Inserts a new `teacher`.
pub async fn create_teacher(ex: &mut Executor, teacher: &Teacher) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO teachers (
                    id, user_id, employee_number, first_name, middle_name, last_name,
                    gender, status,
                    created_by, created_date_secs, created_date_nsecs,
                    updated_by, updated_date_secs, updated_date_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let query = sqlx::query(query_str)
                .bind(teacher.id.to_string())
                .bind(&teacher.user_id)
                .bind(&teacher.employee_number)
                .bind(&teacher.first_name)
                .bind(&teacher.middle_name)
                .bind(&teacher.last_name)
                .bind(teacher.gender.as_str())
                .bind(teacher.status.as_str());
            let done = bind_audit(query, &teacher.audit)?
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Insertion")
}

/// Gets the teacher identified by `id`, if any.
pub async fn get_teacher(ex: &mut Executor, id: &Uuid) -> DbResult<Option<Teacher>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM teachers WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(Teacher::try_from).transpose()
        }
    }
}

/// Replaces the stored copy of `teacher`.
pub async fn update_teacher(ex: &mut Executor, teacher: &Teacher) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE teachers SET
                    user_id = ?, employee_number = ?, first_name = ?, middle_name = ?,
                    last_name = ?, gender = ?, status = ?,
                    created_by = ?, created_date_secs = ?, created_date_nsecs = ?,
                    updated_by = ?, updated_date_secs = ?, updated_date_nsecs = ?
                WHERE id = ?";
            let query = sqlx::query(query_str)
                .bind(&teacher.user_id)
                .bind(&teacher.employee_number)
                .bind(&teacher.first_name)
                .bind(&teacher.middle_name)
                .bind(&teacher.last_name)
                .bind(teacher.gender.as_str())
                .bind(teacher.status.as_str());
            let done = bind_audit(query, &teacher.audit)?
                .bind(teacher.id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Update")
}

/// Deletes the teacher identified by `id`.
pub async fn delete_teacher(ex: &mut Executor, id: &Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM teachers WHERE id = ?";
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

/// Checks whether the teacher identified by `id` exists.
pub async fn teacher_exists(ex: &mut Executor, id: &Uuid) -> DbResult<bool> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM teachers WHERE id = ?";
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
