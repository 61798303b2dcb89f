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

//! Generic abstraction to access different database systems.
//!
//! The facilities in this module provide an abstraction over the database systems that can back
//! the persistence gateways of a service.  Only SQLite is supported at the moment, which is good
//! enough for unit tests and for small deployments.

use crate::model::ModelError;
use async_trait::async_trait;

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Database errors.  Any unexpected errors that come from the database engine are classified as
/// `BackendError`, but errors we know about have more specific types.
///
/// The driver layer relies on these variants to decide how a failure is reported, so backends
/// must be careful to pick the most precise one.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// Indicates that a request to create an entry failed because it already exists.
    #[error("Already exists")]
    AlreadyExists,

    /// Catch-all error type for unexpected errors raised by the database engine.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates a failure processing data that is being written to or that already exists in the
    /// database, such as a violated constraint.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that the entry is locked by another concurrent operation.
    #[error("Locked: {0}")]
    Locked(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Indicates that the database is not available (maybe because of too many active concurrent
    /// connections).
    #[error("Unavailable")]
    Unavailable,

    /// Indicates a failure in the persistence layer that cannot be attributed to the database
    /// itself.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DbError {
    /// Returns true if this error originates in the database engine itself, which usually means
    /// that an operator has to look into the health of the database.
    pub fn is_storage_engine_fault(&self) -> bool {
        matches!(self, DbError::BackendError(_) | DbError::Unavailable)
    }
}

impl From<ModelError> for DbError {
    fn from(e: ModelError) -> Self {
        DbError::DataIntegrityError(e.to_string())
    }
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// A database executor that can talk to multiple database implementations.
///
/// This type provides a generic mechanism to access a typed instance of a database, which is needed
/// by sqlx to offer type safety guarantees during query compilation.  Users of this type are forced
/// to destructure it and issue different calls for each database.
pub enum Executor {
    /// A SQLite executor that can be used in `sqlx` operations.
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteExecutor),
}

/// Abstraction over the database connection.
#[async_trait]
pub trait Db {
    /// Obtains an executor for direct access to the pool.
    ///
    /// This would be better called `executor` but this method is used so frequently that it makes
    /// call sites too verbose.
    async fn ex(&self) -> DbResult<Executor>;

    /// Closes the connection to the database, waiting for in-flight operations to complete.
    async fn close(&self);
}
