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

//! Persistence of students.

use crate::db::{bind_audit, expect_one_row, get_audit, get_timestamp, get_uuid, map_delete_error};
use crate::model::Student;
use campus_core::db::sqlite::{self, unpack_timestamp};
use campus_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;
use uuid::Uuid;

impl TryFrom<SqliteRow> for Student {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let user_id: String = row.try_get("user_id").map_err(sqlite::map_sqlx_error)?;
        let identity_number: String =
            row.try_get("identity_number").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let middle_name: Option<String> =
            row.try_get("middle_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let gender: String = row.try_get("gender").map_err(sqlite::map_sqlx_error)?;

        Ok(Student {
            id: get_uuid(&row, "id")?,
            user_id,
            identity_number,
            first_name,
            middle_name,
            last_name,
            birth_date: get_timestamp(&row, "birth_date")?,
            gender: FromStr::from_str(&gender)?,
            audit: get_audit(&row)?,
        })
    }
}

/// Inserts a new `student`.
pub async fn create_student(ex: &mut Executor, student: &Student) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let (birth_date_secs, birth_date_nsecs) = unpack_timestamp(student.birth_date);

            let query_str = "
                INSERT INTO students (
                    id, user_id, identity_number, first_name, middle_name, last_name,
                    birth_date_secs, birth_date_nsecs, gender,
                    created_by, created_date_secs, created_date_nsecs,
                    updated_by, updated_date_secs, updated_date_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let query = sqlx::query(query_str)
                .bind(student.id.to_string())
                .bind(&student.user_id)
                .bind(&student.identity_number)
                .bind(&student.first_name)
                .bind(&student.middle_name)
                .bind(&student.last_name)
                .bind(birth_date_secs)
                .bind(birth_date_nsecs)
                .bind(student.gender.as_str());
            let done = bind_audit(query, &student.audit)?
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Insertion")
}

/// Gets the student identified by `id`, if any.
pub async fn get_student(ex: &mut Executor, id: &Uuid) -> DbResult<Option<Student>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM students WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(Student::try_from).transpose()
        }
    }
}

/// Replaces the stored copy of `student`.
pub async fn update_student(ex: &mut Executor, student: &Student) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let (birth_date_secs, birth_date_nsecs) = unpack_timestamp(student.birth_date);

            let query_str = "
                UPDATE students SET
                    user_id = ?, identity_number = ?, first_name = ?, middle_name = ?,
                    last_name = ?, birth_date_secs = ?, birth_date_nsecs = ?, gender = ?,
                    created_by = ?, created_date_secs = ?, created_date_nsecs = ?,
                    updated_by = ?, updated_date_secs = ?, updated_date_nsecs = ?
                WHERE id = ?";
            let query = sqlx::query(query_str)
                .bind(&student.user_id)
                .bind(&student.identity_number)
                .bind(&student.first_name)
                .bind(&student.middle_name)
                .bind(&student.last_name)
                .bind(birth_date_secs)
                .bind(birth_date_nsecs)
                .bind(student.gender.as_str());
            let done = bind_audit(query, &student.audit)?
                .bind(student.id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Update")
}

/// Deletes the student identified by `id`.
pub async fn delete_student(ex: &mut Executor, id: &Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM students WHERE id = ?";
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

/// Checks whether the student identified by `id` exists.
pub async fn student_exists(ex: &mut Executor, id: &Uuid) -> DbResult<bool> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM students WHERE id = ?";
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
