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

//! The `Audit` data type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Bookkeeping fields that every entity record carries.
///
/// Only `created_by` is mandatory on input.  The remaining fields can be omitted by callers and
/// are filled in by the driver when the record is created or modified, which means that records
/// returned by the driver or read back from the database always have all fields set.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    /// Identifier of the user that created the record.
    pub created_by: Uuid,

    /// Time at which the record was created.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_date: Option<OffsetDateTime>,

    /// Identifier of the user that last modified the record.
    #[serde(default)]
    pub updated_by: Option<Uuid>,

    /// Time at which the record was last modified.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_date: Option<OffsetDateTime>,
}

impl Audit {
    /// Creates a new set of audit fields for a record created by `created_by` at `created_date`.
    pub fn new(created_by: Uuid, created_date: OffsetDateTime) -> Self {
        Self { created_by, created_date: Some(created_date), updated_by: None, updated_date: None }
    }

    /// Creates a new set of audit fields that only names the creator.
    pub fn created_by(created_by: Uuid) -> Self {
        Self { created_by, created_date: None, updated_by: None, updated_date: None }
    }

    /// Modifies the audit fields to record an update by `updated_by` at `updated_date`.
    pub fn with_update(mut self, updated_by: Uuid, updated_date: OffsetDateTime) -> Self {
        self.updated_by = Some(updated_by);
        self.updated_date = Some(updated_date);
        self
    }

    /// Modifies the audit fields to record an update by `updated_by` with no explicit time.
    pub fn with_updated_by(mut self, updated_by: Uuid) -> Self {
        self.updated_by = Some(updated_by);
        self
    }

    /// Returns true if all fields are set, as is the case for records that have been persisted.
    pub fn is_complete(&self) -> bool {
        self.created_date.is_some() && self.updated_by.is_some() && self.updated_date.is_some()
    }
}
