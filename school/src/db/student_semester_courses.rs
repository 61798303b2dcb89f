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

//! Persistence of the enrollments of students in semester courses.

use crate::db::{bind_audit, expect_one_row, get_audit, get_uuid};
use crate::model::{StudentSemesterCourse, StudentSemesterCourseId};
use campus_core::db::sqlite;
use campus_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;

impl TryFrom<SqliteRow> for StudentSemesterCourse {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let grade: Option<u32> = row.try_get("grade").map_err(sqlite::map_sqlx_error)?;
        let repeats: u32 = row.try_get("repeats").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;

        Ok(StudentSemesterCourse {
            semester_course_id: get_uuid(&row, "semester_course_id")?,
            student_id: get_uuid(&row, "student_id")?,
            grade,
            repeats,
            status: FromStr::from_str(&status)?,
            audit: get_audit(&row)?,
        })
    }
}

/// Inserts a new `enrollment`.
///
/// Returns `NotFound` if the semester course or the student that the enrollment references do
/// not exist.
pub async fn create_student_semester_course(
    ex: &mut Executor,
    enrollment: &StudentSemesterCourse,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO student_semester_courses (
                    semester_course_id, student_id, grade, repeats, status,
                    created_by, created_date_secs, created_date_nsecs,
                    updated_by, updated_date_secs, updated_date_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let query = sqlx::query(query_str)
                .bind(enrollment.semester_course_id.to_string())
                .bind(enrollment.student_id.to_string())
                .bind(enrollment.grade)
                .bind(enrollment.repeats)
                .bind(enrollment.status.as_str());
            let done = bind_audit(query, &enrollment.audit)?
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Insertion")
}

/// Gets the enrollment identified by `id`, if any.
pub async fn get_student_semester_course(
    ex: &mut Executor,
    id: &StudentSemesterCourseId,
) -> DbResult<Option<StudentSemesterCourse>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT * FROM student_semester_courses
                WHERE semester_course_id = ? AND student_id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id.semester_course_id.to_string())
                .bind(id.student_id.to_string())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(StudentSemesterCourse::try_from).transpose()
        }
    }
}

/// Replaces the stored copy of `enrollment`.
pub async fn update_student_semester_course(
    ex: &mut Executor,
    enrollment: &StudentSemesterCourse,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE student_semester_courses SET
                    grade = ?, repeats = ?, status = ?,
                    created_by = ?, created_date_secs = ?, created_date_nsecs = ?,
                    updated_by = ?, updated_date_secs = ?, updated_date_nsecs = ?
                WHERE semester_course_id = ? AND student_id = ?";
            let query = sqlx::query(query_str)
                .bind(enrollment.grade)
                .bind(enrollment.repeats)
                .bind(enrollment.status.as_str());
            let done = bind_audit(query, &enrollment.audit)?
                .bind(enrollment.semester_course_id.to_string())
                .bind(enrollment.student_id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Update")
}

/// Deletes the enrollment identified by `id`.
pub async fn delete_student_semester_course(
    ex: &mut Executor,
    id: &StudentSemesterCourseId,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                DELETE FROM student_semester_courses
                WHERE semester_course_id = ? AND student_id = ?";
            let done = sqlx::query(query_str)
                .bind(id.semester_course_id.to_string())
                .bind(id.student_id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }
    };
    expect_one_row(rows_affected, "Deletion")
}
