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

//! Test utilities for the database layer.

use crate::db::init_schema;
use crate::model::*;
use campus_core::db::{Db, Executor, sqlite};
use campus_core::model::Audit;
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

/// Timestamp at which all test records are created.
pub(crate) const CREATED: OffsetDateTime = datetime!(2023-09-01 10:00:00 UTC);

/// Identifier of the user that creates all test records.
pub(crate) fn test_user() -> Uuid {
    Uuid::from_u128(0xaaaa_0000)
}

/// Returns the complete audit fields of a freshly-created test record.
pub(crate) fn test_audit() -> Audit {
    Audit::new(test_user(), CREATED).with_update(test_user(), CREATED)
}

/// Creates a test student whose identity derives from `n`.
pub(crate) fn test_student(n: u128) -> Student {
    Student {
        id: Uuid::from_u128(0x1000 + n),
        user_id: format!("student-{}", n),
        identity_number: format!("ID-{:04}", n),
        first_name: "Ada".to_owned(),
        middle_name: None,
        last_name: format!("Student {}", n),
        birth_date: datetime!(2005-04-03 00:00:00 UTC),
        gender: Gender::Female,
        audit: test_audit(),
    }
}

/// Creates a test teacher whose identity derives from `n`.
pub(crate) fn test_teacher(n: u128) -> Teacher {
    Teacher {
        id: Uuid::from_u128(0x2000 + n),
        user_id: format!("teacher-{}", n),
        employee_number: format!("EMP-{:04}", n),
        first_name: "Alan".to_owned(),
        middle_name: Some("Mathison".to_owned()),
        last_name: format!("Teacher {}", n),
        gender: Gender::Male,
        status: TeacherStatus::Active,
        audit: test_audit(),
    }
}

/// Creates a test classroom whose identity derives from `n`.
pub(crate) fn test_classroom(n: u128) -> Classroom {
    Classroom {
        id: Uuid::from_u128(0x3000 + n),
        name: format!("Room {}", n),
        location: Some("Main building".to_owned()),
        status: ClassroomStatus::Available,
        audit: test_audit(),
    }
}

/// Creates a test semester course whose identity derives from `n` and that references the test
/// classroom and teacher with the same `n`.
pub(crate) fn test_semester_course(n: u128) -> SemesterCourse {
    SemesterCourse {
        id: Uuid::from_u128(0x4000 + n),
        start_date: datetime!(2023-09-15 00:00:00 UTC),
        end_date: datetime!(2024-01-31 00:00:00 UTC),
        status: SemesterCourseStatus::Active,
        classroom_id: test_classroom(n).id,
        teacher_id: test_teacher(n).id,
        audit: test_audit(),
    }
}

/// Creates a test enrollment of the test student `student` in the test semester course `course`.
pub(crate) fn test_student_semester_course(course: u128, student: u128) -> StudentSemesterCourse {
    StudentSemesterCourse {
        semester_course_id: test_semester_course(course).id,
        student_id: test_student(student).id,
        grade: None,
        repeats: 0,
        status: StudentSemesterCourseStatus::Active,
        audit: test_audit(),
    }
}

/// State of a database test backed by an in-memory SQLite database.
pub(crate) struct TestContext {
    /// The database with the schema already initialized.
    db: Arc<dyn Db + Send + Sync>,
}

impl TestContext {
    /// Creates a new database and initializes its schema.
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Self { db }
    }

    /// Returns the database.
    pub(crate) fn db(&self) -> Arc<dyn Db + Send + Sync> {
        self.db.clone()
    }

    /// Obtains an executor to talk to the database directly.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Runs a raw SQL statement, such as one that corrupts the data to test error paths.
    pub(crate) async fn execute(&self, sql: &str) {
        match self.ex().await {
            Executor::Sqlite(mut ex) => {
                sqlx::query(sql).execute(&mut *ex).await.unwrap();
            }
        }
    }

    /// Stores the test classroom and teacher with the given `n` and the semester course that
    /// references them.
    pub(crate) async fn put_semester_course(&self, n: u128) -> SemesterCourse {
        let mut ex = self.ex().await;
        crate::db::create_classroom(&mut ex, &test_classroom(n)).await.unwrap();
        crate::db::create_teacher(&mut ex, &test_teacher(n)).await.unwrap();
        let course = test_semester_course(n);
        crate::db::create_semester_course(&mut ex, &course).await.unwrap();
        course
    }
}
