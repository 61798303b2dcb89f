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

//! The `Teacher` data type.

use crate::model::{Gender, string_enum};
use campus_core::model::Audit;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Employment status of a teacher.
    TeacherStatus {
        /// The teacher is currently teaching.
        Active,

        /// The teacher is not teaching anymore.
        Inactive,
    }
}

/// A person that teaches semester courses.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    /// Unique identifier of the teacher.
    pub id: Uuid,

    /// Identifier of the user account of the teacher.
    pub user_id: String,

    /// Employee number assigned by the school.
    pub employee_number: String,

    /// First name.
    pub first_name: String,

    /// Middle name, if any.
    #[serde(default)]
    pub middle_name: Option<String>,

    /// Last name.
    pub last_name: String,

    /// Gender.
    pub gender: Gender,

    /// Employment status.
    pub status: TeacherStatus,

    /// Audit fields.
    #[serde(flatten)]
    pub audit: Audit,
}
