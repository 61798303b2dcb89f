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

//! The `StudentSemesterCourse` data type.

use crate::model::string_enum;
use campus_core::model::Audit;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Status of the enrollment of a student in a semester course.
    StudentSemesterCourseStatus {
        /// The student is attending the course.
        Active,

        /// The student finished the course.
        Completed,

        /// The student dropped out of the course.
        Withdrawn,
    }
}

/// Composite key of a `StudentSemesterCourse`.
///
/// The field names match the path parameters of the REST API so that this type can be extracted
/// directly from request paths.
#[derive(Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[display("{}/{}", semester_course_id, student_id)]
pub struct StudentSemesterCourseId {
    /// Identifier of the semester course.
    pub semester_course_id: Uuid,

    /// Identifier of the student.
    pub student_id: Uuid,
}

/// Enrollment of a student in a semester course.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSemesterCourse {
    /// Identifier of the semester course.
    pub semester_course_id: Uuid,

    /// Identifier of the enrolled student.
    pub student_id: Uuid,

    /// Final grade, once known.
    #[serde(default)]
    pub grade: Option<u32>,

    /// Number of times that the student has repeated the course.
    pub repeats: u32,

    /// Status of the enrollment.
    pub status: StudentSemesterCourseStatus,

    /// Audit fields.
    #[serde(flatten)]
    pub audit: Audit,
}

impl StudentSemesterCourse {
    /// Returns the composite key of this enrollment.
    pub fn key(&self) -> StudentSemesterCourseId {
        StudentSemesterCourseId::new(self.semester_course_id, self.student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_semester_course_id_display() {
        let id = StudentSemesterCourseId::new(Uuid::from_u128(1), Uuid::from_u128(2));
        assert_eq!(
            "00000000-0000-0000-0000-000000000001/00000000-0000-0000-0000-000000000002",
            id.to_string()
        );
    }
}
