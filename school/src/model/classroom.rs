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

//! The `Classroom` data type.

use crate::model::string_enum;
use campus_core::model::Audit;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Availability of a classroom.
    ClassroomStatus {
        /// The classroom can be assigned to a course.
        Available,

        /// The classroom is in use by a course.
        Occupied,

        /// The classroom does not exist anymore.
        Removed,
    }
}

/// A physical room in which semester courses take place.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    /// Unique identifier of the classroom.
    pub id: Uuid,

    /// Display name of the classroom.
    pub name: String,

    /// Free-form description of where the classroom is, if known.
    #[serde(default)]
    pub location: Option<String>,

    /// Availability of the classroom.
    pub status: ClassroomStatus,

    /// Audit fields.
    #[serde(flatten)]
    pub audit: Audit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classroom_json_optional_fields() {
        let classroom: Classroom = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Room 101",
            "status": "Available",
            "createdBy": "00000000-0000-0000-0000-000000000002",
        }))
        .unwrap();
        assert_eq!(
            Classroom {
                id: Uuid::from_u128(1),
                name: "Room 101".to_owned(),
                location: None,
                status: ClassroomStatus::Available,
                audit: Audit::created_by(Uuid::from_u128(2)),
            },
            classroom
        );
    }

    #[test]
    fn test_classroom_json_bad_status() {
        let err = serde_json::from_value::<Classroom>(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Room 101",
            "status": "Flooded",
            "createdBy": "00000000-0000-0000-0000-000000000002",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Flooded"));
    }
}
