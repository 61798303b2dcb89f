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

//! The `SemesterCourse` data type.

use crate::model::string_enum;
use campus_core::model::Audit;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

string_enum! {
    /// Status of a semester course.
    SemesterCourseStatus {
        /// The course is open or running.
        Active,

        /// The course has been closed.
        Inactive,
    }
}

/// A course taught by a teacher in a classroom during a semester.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterCourse {
    /// Unique identifier of the semester course.
    pub id: Uuid,

    /// First day of the course.
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,

    /// Last day of the course.
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,

    /// Status of the course.
    pub status: SemesterCourseStatus,

    /// Classroom in which the course takes place.
    pub classroom_id: Uuid,

    /// Teacher that teaches the course.
    pub teacher_id: Uuid,

    /// Audit fields.
    #[serde(flatten)]
    pub audit: Audit,
}
