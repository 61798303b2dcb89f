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

//! Generic business logic for any service.
//!
//! Services built on this crate do not write per-entity error handling.  Instead, each persisted
//! type implements the `entity::Entity` capability trait and the service instantiates one
//! `entity::EntityDriver` per type.  The driver runs the validation rules, stamps the audit
//! fields, talks to the persistence gateway and classifies every failure into one of the three
//! tiers described by `DriverError`, reporting it to an `audit::AuditSink` exactly once.
//!
//! Every operation implemented in a driver consumes `self`.  Drivers are cheap to clone because
//! all of their collaborators live behind `Arc`s, and consuming `self` prevents the caller from
//! easily issuing multiple operations against the same instance.

use crate::db::DbError;
use crate::env::get_optional_var;
use time::Duration;

pub mod audit;
pub mod entity;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
pub mod validation;

pub use validation::ValidationError;

/// Default value for the `MAX_CLOCK_SKEW_SECONDS` setting when not specified.
const DEFAULT_MAX_CLOCK_SKEW_SECONDS: u64 = 0;

/// Largest accepted value for the `MAX_CLOCK_SKEW_SECONDS` setting: the span between the Unix
/// epoch and the end of year 9999.
const MAX_MAX_CLOCK_SKEW_SECONDS: u64 = 253_402_300_799;

/// Business logic errors.
///
/// The taxonomy is fixed: a failure is attributable to the caller's data (`Validation`), to the
/// persistence gateway or its environment (`Dependency`), or to neither (`Service`).  Every
/// variant carries the name of the entity type that was being processed and exactly one cause.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// Indicates that the data or state supplied by the caller is invalid.
    #[error("{entity} validation error occurred, fix the errors and try again: {cause}")]
    Validation {
        /// Name of the entity type that failed validation.
        entity: &'static str,

        /// The rule that was violated.
        #[source]
        cause: ValidationError,
    },

    /// Indicates a fault in the persistence gateway or in its environment.
    #[error("{entity} dependency error occurred, contact support: {cause}")]
    Dependency {
        /// Name of the entity type being processed.
        entity: &'static str,

        /// The raw fault raised by the gateway.
        #[source]
        cause: DbError,
    },

    /// Indicates an unexpected fault that cannot be attributed to the caller nor to the gateway.
    #[error("{entity} service error occurred, contact support: {cause}")]
    Service {
        /// Name of the entity type being processed.
        entity: &'static str,

        /// The raw fault raised while processing the request.
        #[source]
        cause: DbError,
    },
}

impl DriverError {
    /// Returns the name of the entity type that this error refers to.
    pub fn entity(&self) -> &'static str {
        match self {
            DriverError::Validation { entity, .. } => entity,
            DriverError::Dependency { entity, .. } => entity,
            DriverError::Service { entity, .. } => entity,
        }
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;

/// Configuration options for the entity drivers.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverOptions {
    /// The amount of time we tolerate in clock skew when validating timestamps supplied by the
    /// caller against our own notion of "now".  We should never see this, except if clients
    /// compute their audit timestamps on machines whose clocks aren't properly synchronized.
    pub max_clock_skew: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self { max_clock_skew: Duration::seconds(DEFAULT_MAX_CLOCK_SKEW_SECONDS as i64) }
    }
}

impl DriverOptions {
    /// Creates a new set of options from environment variables whose names start with `prefix`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let max_clock_skew_seconds = get_optional_var::<u64>(prefix, "MAX_CLOCK_SKEW_SECONDS")?
            .unwrap_or(DEFAULT_MAX_CLOCK_SKEW_SECONDS);
        if max_clock_skew_seconds > MAX_MAX_CLOCK_SKEW_SECONDS {
            return Err(format!(
                "Invalid {}_MAX_CLOCK_SKEW_SECONDS: {} is larger than {}",
                prefix, max_clock_skew_seconds, MAX_MAX_CLOCK_SKEW_SECONDS
            ));
        }
        Ok(Self { max_clock_skew: Duration::seconds(max_clock_skew_seconds as i64) })
    }
}
