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

//! Validation rules shared by all entity types.
//!
//! The functions in this module are pure: they inspect their inputs and return the first
//! violation they find, if any.  Rules that need to consult the persistence gateway live in the
//! `entity` module instead.

use crate::model::Audit;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Violations of the validation rules.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Indicates that the caller did not provide an entity at all.
    #[error("Entity is null")]
    NullEntity,

    /// Indicates that an identifying or required field of the entity is invalid.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Name of the offending field, as exposed to API clients.
        field: &'static str,

        /// Human-readable description of the problem.
        reason: String,
    },

    /// Indicates that an audit field is inconsistent with the other audit fields, with the stored
    /// record, or with the current time.
    #[error("Invalid {field}: {reason}")]
    InvalidAuditField {
        /// Name of the offending audit field, as exposed to API clients.
        field: &'static str,

        /// Human-readable description of the problem.
        reason: String,
    },

    /// Indicates that an entity referenced by the one being processed does not exist.
    #[error("Referenced {entity} with id {id} not found")]
    NotFoundReference {
        /// Name of the referenced entity type.
        entity: &'static str,

        /// Identifier of the missing referenced entity.
        id: Uuid,
    },

    /// Indicates that the entity to process does not exist.
    #[error("Entity with id {0} not found")]
    NotFound(String),

    /// Indicates that an entity with the same key already exists.
    #[error("Entity with id {0} already exists")]
    AlreadyExists(String),
}

/// Result type for this module.
pub type ValidationResult = Result<(), ValidationError>;

/// Shorthand to construct an `InvalidField` violation.
pub fn invalid_field<S: Into<String>>(field: &'static str, reason: S) -> ValidationError {
    ValidationError::InvalidField { field, reason: reason.into() }
}

/// Shorthand to construct an `InvalidAuditField` violation.
fn invalid_audit_field<S: Into<String>>(field: &'static str, reason: S) -> ValidationError {
    ValidationError::InvalidAuditField { field, reason: reason.into() }
}

/// Ensures that the identifier `id` stored in `field` is not the nil UUID.
pub fn require_id(field: &'static str, id: &Uuid) -> ValidationResult {
    if id.is_nil() {
        return Err(invalid_field(field, "Id is required"));
    }
    Ok(())
}

/// Ensures that the text `value` stored in `field` is not empty nor only whitespace.
pub fn require_text(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(invalid_field(field, "Text is required"));
    }
    Ok(())
}

/// Ensures that the optional text `value` stored in `field`, if present, is not blank.
pub fn require_optional_text(field: &'static str, value: Option<&str>) -> ValidationResult {
    match value {
        Some(value) => require_text(field, value),
        None => Ok(()),
    }
}

/// Checks the consistency of the audit fields of an entity that is about to be created.
///
/// The creator must be known, and the update fields, when present, must mirror the creation
/// fields because a new entity has never been modified.
pub fn check_create_audit(audit: &Audit) -> ValidationResult {
    if audit.created_by.is_nil() {
        return Err(invalid_audit_field("createdBy", "Id is required"));
    }

    if let Some(updated_by) = audit.updated_by {
        if updated_by != audit.created_by {
            return Err(invalid_audit_field("updatedBy", "Id is not the same as createdBy"));
        }
    }

    if audit.updated_date.is_some() && audit.updated_date != audit.created_date {
        return Err(invalid_audit_field("updatedDate", "Date is not the same as createdDate"));
    }

    Ok(())
}

/// Checks the consistency of the audit fields of an entity that is about to be modified.
///
/// The modifier must be known and, if the caller supplied both dates, the update must come after
/// the creation.
pub fn check_modify_audit(audit: &Audit) -> ValidationResult {
    match audit.updated_by {
        Some(updated_by) if !updated_by.is_nil() => (),
        _ => return Err(invalid_audit_field("updatedBy", "Id is required")),
    }

    if let (Some(created_date), Some(updated_date)) = (audit.created_date, audit.updated_date) {
        if updated_date <= created_date {
            return Err(invalid_audit_field("updatedDate", "Date is the same as createdDate"));
        }
    }

    Ok(())
}

/// Ensures that the timestamp `date` stored in `field` is not later than `now`, tolerating up to
/// `max_skew` of difference between the caller's clock and ours.
///
/// A `max_skew` so large that `now + max_skew` cannot be represented imposes no upper bound.
pub fn check_not_in_future(
    field: &'static str,
    date: OffsetDateTime,
    now: OffsetDateTime,
    max_skew: Duration,
) -> ValidationResult {
    match now.checked_add(max_skew) {
        Some(limit) if date > limit => Err(invalid_audit_field(field, "Date is not recent")),
        _ => Ok(()),
    }
}

/// Checks the audit fields of an entity that is about to be modified against the `stored` copy.
///
/// A nil `createdBy` or a missing `createdDate` in `input` are treated as omitted and are not
/// compared.  The update must always come after the stored creation date.
pub fn check_modify_against_stored(input: &Audit, stored: &Audit) -> ValidationResult {
    if !input.created_by.is_nil() && input.created_by != stored.created_by {
        return Err(invalid_audit_field("createdBy", "Id is not the same as in storage"));
    }

    if input.created_date.is_some() && input.created_date != stored.created_date {
        return Err(invalid_audit_field("createdDate", "Date is not the same as in storage"));
    }

    if let (Some(updated_date), Some(stored_created_date)) =
        (input.updated_date, stored.created_date)
    {
        if updated_date <= stored_created_date {
            return Err(invalid_audit_field("updatedDate", "Date is the same as in storage"));
        }
    }

    Ok(())
}
