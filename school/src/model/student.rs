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

//! The `Student` data type.

use crate::model::Gender;
use campus_core::model::Audit;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A person enrolled in the school.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier of the student.
    pub id: Uuid,

    /// Identifier of the user account of the student.
    pub user_id: String,

    /// Official identity number of the student.
    pub identity_number: String,

    /// First name.
    pub first_name: String,

    /// Middle name, if any.
    #[serde(default)]
    pub middle_name: Option<String>,

    /// Last name.
    pub last_name: String,

    /// Date of birth.
    #[serde(with = "time::serde::rfc3339")]
    pub birth_date: OffsetDateTime,

    /// Gender.
    pub gender: Gender,

    /// Audit fields.
    #[serde(flatten)]
    pub audit: Audit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_student_json() {
        let student = Student {
            id: Uuid::from_u128(1),
            user_id: "user-1".to_owned(),
            identity_number: "ID-0001".to_owned(),
            first_name: "Ada".to_owned(),
            middle_name: None,
            last_name: "Lovelace".to_owned(),
            birth_date: datetime!(1815-12-10 00:00:00 UTC),
            gender: Gender::Female,
            audit: Audit::created_by(Uuid::from_u128(2)),
        };

        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000001",
                "userId": "user-1",
                "identityNumber": "ID-0001",
                "firstName": "Ada",
                "middleName": null,
                "lastName": "Lovelace",
                "birthDate": "1815-12-10T00:00:00Z",
                "gender": "Female",
                "createdBy": "00000000-0000-0000-0000-000000000002",
                "createdDate": null,
                "updatedBy": null,
                "updatedDate": null,
            }),
            json
        );
        assert_eq!(student, serde_json::from_value(json).unwrap());
    }
}
