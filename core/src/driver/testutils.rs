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

//! Test utilities for the business layer.

use crate::db::{DbError, DbResult};
use crate::driver::DriverError;
use crate::driver::audit::AuditSink;
use crate::driver::entity::{Entity, EntityGateway, Reference};
use async_trait::async_trait;
use derivative::Derivative;
use futures::lock::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Operations offered by an `EntityGateway`, used to inject errors and to count calls.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GatewayOp {
    /// The `insert` operation.
    Insert,

    /// The `select_by_id` operation.
    SelectById,

    /// The `update` operation.
    Update,

    /// The `delete` operation.
    Delete,

    /// The `reference_exists` operation.
    ReferenceExists,
}

/// A call issued against a `RecorderGateway`, with its arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum GatewayCall<E: Entity> {
    /// A call to `insert`.
    Insert(E),

    /// A call to `select_by_id`.
    SelectById(E::Id),

    /// A call to `update`.
    Update(E),

    /// A call to `delete`.
    Delete(E),

    /// A call to `reference_exists`.
    ReferenceExists(Reference),
}

impl<E: Entity> GatewayCall<E> {
    /// Returns the operation that this call represents.
    pub fn op(&self) -> GatewayOp {
        match self {
            GatewayCall::Insert(_) => GatewayOp::Insert,
            GatewayCall::SelectById(_) => GatewayOp::SelectById,
            GatewayCall::Update(_) => GatewayOp::Update,
            GatewayCall::Delete(_) => GatewayOp::Delete,
            GatewayCall::ReferenceExists(_) => GatewayOp::ReferenceExists,
        }
    }
}

/// In-memory gateway that captures every call it receives.
///
/// Entities are kept in insertion order and compared by key.  Referenced entities do not live in
/// this gateway: tests must register the references they want to exist with `add_reference`.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Default(bound = ""))]
pub struct RecorderGateway<E: Entity> {
    /// Storage for the entities.
    store: Arc<Mutex<Vec<E>>>,

    /// References that are known to exist.
    references: Arc<Mutex<HashSet<Reference>>>,

    /// Log of all calls received so far.
    calls: Arc<Mutex<Vec<GatewayCall<E>>>>,

    /// Errors to return from each operation instead of executing it.
    errors: Arc<Mutex<HashMap<GatewayOp, DbError>>>,
}

impl<E: Entity> RecorderGateway<E> {
    /// Makes all future calls to `op` fail with `err`.
    pub async fn inject_error(&self, op: GatewayOp, err: DbError) {
        let mut errors = self.errors.lock().await;
        errors.insert(op, err);
    }

    /// Registers `reference` as an existing entity.
    pub async fn add_reference(&self, reference: Reference) {
        let mut references = self.references.lock().await;
        references.insert(reference);
    }

    /// Stores `entity` without recording a call.
    pub async fn put(&self, entity: E) {
        let mut store = self.store.lock().await;
        store.retain(|e| e.id() != entity.id());
        store.push(entity);
    }

    /// Fetches the entity identified by `id` without recording a call.
    pub async fn get(&self, id: &E::Id) -> Option<E> {
        let store = self.store.lock().await;
        store.iter().find(|e| e.id() == *id).cloned()
    }

    /// Returns all calls received so far.
    pub async fn calls(&self) -> Vec<GatewayCall<E>> {
        let calls = self.calls.lock().await;
        calls.clone()
    }

    /// Returns how many times `op` has been called.
    pub async fn count(&self, op: GatewayOp) -> usize {
        let calls = self.calls.lock().await;
        calls.iter().filter(|c| c.op() == op).count()
    }

    /// Records `call` and returns the injected error for its operation, if any.
    async fn record(&self, call: GatewayCall<E>) -> DbResult<()> {
        let op = call.op();
        {
            let mut calls = self.calls.lock().await;
            calls.push(call);
        }

        let errors = self.errors.lock().await;
        match errors.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for RecorderGateway<E> {
    async fn insert(&self, entity: E) -> DbResult<E> {
        self.record(GatewayCall::Insert(entity.clone())).await?;

        let mut store = self.store.lock().await;
        if store.iter().any(|e| e.id() == entity.id()) {
            return Err(DbError::AlreadyExists);
        }
        store.push(entity.clone());
        Ok(entity)
    }

    async fn select_by_id(&self, id: &E::Id) -> DbResult<Option<E>> {
        self.record(GatewayCall::SelectById(id.clone())).await?;

        let store = self.store.lock().await;
        Ok(store.iter().find(|e| e.id() == *id).cloned())
    }

    async fn update(&self, entity: E) -> DbResult<E> {
        self.record(GatewayCall::Update(entity.clone())).await?;

        let mut store = self.store.lock().await;
        match store.iter_mut().find(|e| e.id() == entity.id()) {
            Some(stored) => {
                *stored = entity.clone();
                Ok(entity)
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete(&self, entity: E) -> DbResult<E> {
        self.record(GatewayCall::Delete(entity.clone())).await?;

        let mut store = self.store.lock().await;
        match store.iter().position(|e| e.id() == entity.id()) {
            Some(pos) => Ok(store.remove(pos)),
            None => Err(DbError::NotFound),
        }
    }

    async fn reference_exists(&self, reference: &Reference) -> DbResult<bool> {
        self.record(GatewayCall::ReferenceExists(*reference)).await?;

        let references = self.references.lock().await;
        Ok(references.contains(reference))
    }
}

/// A record captured by the `RecorderAuditSink`.
#[derive(Clone, Debug, PartialEq)]
pub enum AuditRecord {
    /// A call to `log_critical`.
    Critical(DriverError),

    /// A call to `log_error`.
    Error(DriverError),

    /// A call to `log_information`.
    Information(String),
}

/// Audit sink that captures all records.
#[derive(Clone, Default)]
pub struct RecorderAuditSink {
    /// Storage for captured records.
    pub records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl RecorderAuditSink {
    /// Expects that no records were captured.
    pub async fn expect_none(&self) {
        let records = self.records.lock().await;
        assert!(records.is_empty(), "Expected no audit records but got {:?}", *records);
    }

    /// Expects that exactly one record was captured and that it matches `exp_record`.
    pub async fn expect_one(&self, exp_record: AuditRecord) {
        let records = self.records.lock().await;
        assert_eq!(vec![exp_record], *records, "Expected exactly one audit record");
    }

    /// Expects that exactly one record was captured and that it is a critical `exp_err`.
    pub async fn expect_one_critical(&self, exp_err: &DriverError) {
        self.expect_one(AuditRecord::Critical(exp_err.clone())).await
    }

    /// Expects that exactly one record was captured and that it is an error `exp_err`.
    pub async fn expect_one_error(&self, exp_err: &DriverError) {
        self.expect_one(AuditRecord::Error(exp_err.clone())).await
    }
}

#[async_trait]
impl AuditSink for RecorderAuditSink {
    async fn log_critical(&self, err: &DriverError) {
        let mut records = self.records.lock().await;
        records.push(AuditRecord::Critical(err.clone()));
    }

    async fn log_error(&self, err: &DriverError) {
        let mut records = self.records.lock().await;
        records.push(AuditRecord::Error(err.clone()));
    }

    async fn log_information(&self, message: &str) {
        let mut records = self.records.lock().await;
        records.push(AuditRecord::Information(message.to_owned()));
    }
}
