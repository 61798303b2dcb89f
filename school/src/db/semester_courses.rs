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

//! Persistence of semester courses.

use crate::db::{bind_audit, expect_one_row, get_audit, get_timestamp, get_uuid, map_delete_error};
use crate::model::SemesterCourse;
use campus_core::db::sqlite::{self, unpack_timestamp};
use campus_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;
use uuid::Uuid;

impl TryFrom<SqliteRow> for SemesterCourse {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;

        Ok(SemesterCourse {
            id: get_uuid(&row, "id")?,
            start_date: get_timestamp(&row, "start_date")?,
            end_date: get_timestamp(&row, "end_date")?,
            status: FromStr::from_str(&status)?,
            classroom_id: get_uuid(&row, "classroom_id")?,
            teacher_id: get_uuid(&row, "teacher_id")?,
            audit: get_audit(&row)?,
        })
    }
}

/// Inserts a new `course`.
///
/// Returns `NotFound` if the classroom or the teacher that the course references do not exist.
pub async fn create_semester_course(ex: &mut Executor, course: &SemesterCourse) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let (start_date_secs, start_date_nsecs) = unpack_timestamp(course.start_date);
            let (end_date_secs, end_date_nsecs) = unpack_timestamp(course.end_date);

            let query_str = "
                INSERT INTO semester_courses (
                    id, start_date_secs, start_date_nsecs, end_date_secs, end_date_nsecs,
                    status, classroom_id, teacher_id,
                    created_by, created_date_secs, created_date_nsecs,
                    updated_by, updated_date_secs, updated_date_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let query = sqlx::query(query_str)
                .bind(course.id.to_string())
                .bind(start_date_secs)
                .bind(start_date_nsecs)
                .bind(end_date_secs)
                .bind(end_date_nsecs)
                .bind(course.status.as_str())
                .bind(course.classroom_id.to_string())
                .bind(course.teacher_id.to_string());
            let done = bind_audit(query, &course.audit)?
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Insertion")
}

/// Gets the semester course identified by `id`, if any.
pub async fn get_semester_course(
    ex: &mut Executor,
    id: &Uuid,
) -> DbResult<Option<SemesterCourse>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM semester_courses WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(SemesterCourse::try_from).transpose()
        }
    }
}

/// Replaces the stored copy of `course`.
pub async fn update_semester_course(ex: &mut Executor, course: &SemesterCourse) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let (start_date_secs, start_date_nsecs) = unpack_timestamp(course.start_date);
            let (end_date_secs, end_date_nsecs) = unpack_timestamp(course.end_date);

            let query_str = "
                UPDATE semester_courses SET
                    start_date_secs = ?, start_date_nsecs = ?,
                    end_date_secs = ?, end_date_nsecs = ?,
                    status = ?, classroom_id = ?, teacher_id = ?,
                    created_by = ?, created_date_secs = ?, created_date_nsecs = ?,
                    updated_by = ?, updated_date_secs = ?, updated_date_nsecs = ?
                WHERE id = ?";
            let query = sqlx::query(query_str)
                .bind(start_date_secs)
                .bind(start_date_nsecs)
                .bind(end_date_secs)
                .bind(end_date_nsecs)
                .bind(course.status.as_str())
                .bind(course.classroom_id.to_string())
                .bind(course.teacher_id.to_string());
            let done = bind_audit(query, &course.audit)?
                .bind(course.id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Update")
}

/// Deletes the semester course identified by `id`.
pub async fn delete_semester_course(ex: &mut Executor, id: &Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM semester_courses WHERE id = ?";
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

/// Checks whether the semester course identified by `id` exists.
pub async fn semester_course_exists(ex: &mut Executor, id: &Uuid) -> DbResult<bool> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM semester_courses WHERE id = ?";
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
