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

//! Generic create, read, update and delete operations over persisted entities.

use crate::clocks::Clock;
use crate::db::{DbError, DbResult};
use crate::driver::audit::AuditSink;
use crate::driver::validation::{self, ValidationError, ValidationResult};
use crate::driver::{DriverError, DriverOptions, DriverResult};
use crate::model::Audit;
use async_trait::async_trait;
use derivative::Derivative;
use derive_more::Constructor;
use std::fmt::{Debug, Display};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// Pointer from one entity to another entity that must exist for the former to be valid.
#[derive(Clone, Constructor, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Reference {
    /// Name of the referenced entity type, matching its `Entity::NAME`.
    pub entity: &'static str,

    /// Identifier of the referenced entity.
    pub id: Uuid,
}

/// Capabilities that a persisted type must offer to be managed by an `EntityDriver`.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Type of the key that uniquely identifies an entity.
    type Id: Clone + Debug + Display + PartialEq + Send + Sync + 'static;

    /// Name of the entity type, used in error messages and references.
    const NAME: &'static str;

    /// Returns the key of this entity.
    fn id(&self) -> Self::Id;

    /// Returns the audit fields of this entity.
    fn audit(&self) -> &Audit;

    /// Returns the audit fields of this entity for modification.
    fn audit_mut(&mut self) -> &mut Audit;

    /// Checks that `id` is a valid key for this entity type.
    fn validate_id(id: &Self::Id) -> ValidationResult;

    /// Checks that the required fields of this entity hold valid values.
    fn validate_fields(&self) -> ValidationResult {
        Ok(())
    }

    /// Returns the entities that this entity refers to, in declaration order.
    fn references(&self) -> Vec<Reference> {
        vec![]
    }

    /// Fills in the audit fields of a new entity given the current time `now`.
    fn stamp_create(&mut self, now: OffsetDateTime) {
        let audit = self.audit_mut();
        let created_date = *audit.created_date.get_or_insert(now);
        audit.updated_by = Some(audit.created_by);
        audit.updated_date = Some(created_date);
    }

    /// Fills in the audit fields of a modified entity given the current time `now`.
    fn stamp_modify(&mut self, now: OffsetDateTime) {
        self.audit_mut().updated_date.get_or_insert(now);
    }
}

/// Persistence gateway for entities of type `E`.
#[async_trait]
pub trait EntityGateway<E: Entity> {
    /// Persists a new `entity`, failing with `AlreadyExists` if its key is taken.
    async fn insert(&self, entity: E) -> DbResult<E>;

    /// Fetches the entity identified by `id`, if any.
    async fn select_by_id(&self, id: &E::Id) -> DbResult<Option<E>>;

    /// Replaces the stored copy of `entity`.
    async fn update(&self, entity: E) -> DbResult<E>;

    /// Deletes the stored copy of `entity`.
    async fn delete(&self, entity: E) -> DbResult<E>;

    /// Checks whether the entity pointed to by `reference` exists.
    async fn reference_exists(&self, reference: &Reference) -> DbResult<bool>;
}

/// Internal failure of an operation before it has been classified and reported.
#[derive(Debug)]
enum Fault {
    /// A validation rule was violated.
    Validation(ValidationError),

    /// The persistence gateway failed.
    Storage(DbError),
}

impl From<ValidationError> for Fault {
    fn from(e: ValidationError) -> Self {
        Fault::Validation(e)
    }
}

impl From<DbError> for Fault {
    fn from(e: DbError) -> Self {
        Fault::Storage(e)
    }
}

/// Classifies a `fault` raised while processing the `E` identified by `key` into the public error
/// taxonomy, also returning whether the fault is critical.
fn classify<E: Entity>(fault: Fault, key: &str) -> (DriverError, bool) {
    let validation = |cause| DriverError::Validation { entity: E::NAME, cause };
    match fault {
        Fault::Validation(cause) => (validation(cause), false),
        Fault::Storage(DbError::NotFound) => {
            (validation(ValidationError::NotFound(key.to_owned())), false)
        }
        Fault::Storage(DbError::AlreadyExists) => {
            (validation(ValidationError::AlreadyExists(key.to_owned())), false)
        }
        Fault::Storage(cause @ DbError::Unexpected(_)) => {
            (DriverError::Service { entity: E::NAME, cause }, false)
        }
        Fault::Storage(cause) => {
            let critical = cause.is_storage_engine_fault();
            (DriverError::Dependency { entity: E::NAME, cause }, critical)
        }
    }
}

/// Business logic for entities of type `E`.
///
/// Every operation runs its validation rules in a fixed order, stops at the first violation or
/// gateway failure, and reports that failure to the audit sink exactly once.  Successful
/// operations are not audited.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
pub struct EntityDriver<E: Entity> {
    /// The gateway that the driver uses for persistence.
    gateway: Arc<dyn EntityGateway<E> + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Destination of the failure reports.
    audit: Arc<dyn AuditSink + Send + Sync>,

    /// Configuration options.
    opts: DriverOptions,
}

impl<E: Entity> EntityDriver<E> {
    /// Creates a new driver backed by the given injected components.
    pub fn new(
        gateway: Arc<dyn EntityGateway<E> + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        audit: Arc<dyn AuditSink + Send + Sync>,
        opts: DriverOptions,
    ) -> Self {
        Self { gateway, clock, audit, opts }
    }

    /// Classifies `fault` and sends it to the audit sink.
    async fn report(&self, fault: Fault, key: &str) -> DriverError {
        let (err, critical) = classify::<E>(fault, key);
        if critical {
            self.audit.log_critical(&err).await;
        } else {
            self.audit.log_error(&err).await;
        }
        err
    }

    /// Ensures that all entities referenced by `entity` exist.
    async fn check_references(&self, entity: &E) -> Result<(), Fault> {
        for reference in entity.references() {
            if !self.gateway.reference_exists(&reference).await? {
                return Err(Fault::Validation(ValidationError::NotFoundReference {
                    entity: reference.entity,
                    id: reference.id,
                }));
            }
        }
        Ok(())
    }

    /// Fetches the stored copy of the entity identified by `id`, which must exist.
    async fn select_existing(&self, id: &E::Id) -> Result<E, Fault> {
        match self.gateway.select_by_id(id).await? {
            Some(entity) => Ok(entity),
            None => Err(Fault::Validation(ValidationError::NotFound(id.to_string()))),
        }
    }

    /// Runs the `create` pipeline without reporting failures.
    async fn try_create(&self, entity: Option<E>) -> Result<E, Fault> {
        let mut entity = entity.ok_or(ValidationError::NullEntity)?;
        E::validate_id(&entity.id())?;
        entity.validate_fields()?;
        validation::check_create_audit(entity.audit())?;

        let now = self.clock.now_utc();
        if let Some(created_date) = entity.audit().created_date {
            validation::check_not_in_future(
                "createdDate",
                created_date,
                now,
                self.opts.max_clock_skew,
            )?;
        }
        entity.stamp_create(now);

        self.check_references(&entity).await?;

        Ok(self.gateway.insert(entity).await?)
    }

    /// Creates a new `entity`, filling in the audit fields that the caller omitted.
    pub async fn create(self, entity: Option<E>) -> DriverResult<E> {
        let key = entity.as_ref().map(|e| e.id().to_string()).unwrap_or_default();
        match self.try_create(entity).await {
            Ok(entity) => Ok(entity),
            Err(fault) => Err(self.report(fault, &key).await),
        }
    }

    /// Runs the `retrieve_by_id` pipeline without reporting failures.
    async fn try_retrieve_by_id(&self, id: &E::Id) -> Result<E, Fault> {
        E::validate_id(id)?;
        self.select_existing(id).await
    }

    /// Gets the entity identified by `id`.
    pub async fn retrieve_by_id(self, id: E::Id) -> DriverResult<E> {
        match self.try_retrieve_by_id(&id).await {
            Ok(entity) => Ok(entity),
            Err(fault) => Err(self.report(fault, &id.to_string()).await),
        }
    }

    /// Runs the `modify` pipeline without reporting failures.
    async fn try_modify(&self, entity: Option<E>) -> Result<E, Fault> {
        let mut entity = entity.ok_or(ValidationError::NullEntity)?;
        E::validate_id(&entity.id())?;
        entity.validate_fields()?;
        validation::check_modify_audit(entity.audit())?;

        let now = self.clock.now_utc();
        if let Some(updated_date) = entity.audit().updated_date {
            validation::check_not_in_future(
                "updatedDate",
                updated_date,
                now,
                self.opts.max_clock_skew,
            )?;
        }
        entity.stamp_modify(now);

        self.check_references(&entity).await?;

        let stored = self.select_existing(&entity.id()).await?;
        validation::check_modify_against_stored(entity.audit(), stored.audit())?;
        let audit = entity.audit_mut();
        audit.created_by = stored.audit().created_by;
        audit.created_date = stored.audit().created_date;

        Ok(self.gateway.update(entity).await?)
    }

    /// Modifies an existing `entity`, preserving its stored creation fields.
    pub async fn modify(self, entity: Option<E>) -> DriverResult<E> {
        let key = entity.as_ref().map(|e| e.id().to_string()).unwrap_or_default();
        match self.try_modify(entity).await {
            Ok(entity) => Ok(entity),
            Err(fault) => Err(self.report(fault, &key).await),
        }
    }

    /// Runs the `delete_by_id` pipeline without reporting failures.
    async fn try_delete_by_id(&self, id: &E::Id) -> Result<E, Fault> {
        E::validate_id(id)?;
        let stored = self.select_existing(id).await?;
        Ok(self.gateway.delete(stored).await?)
    }

    /// Deletes the entity identified by `id`, returning its last stored copy.
    pub async fn delete_by_id(self, id: E::Id) -> DriverResult<E> {
        match self.try_delete_by_id(&id).await {
            Ok(entity) => Ok(entity),
            Err(fault) => Err(self.report(fault, &id.to_string()).await),
        }
    }
}
