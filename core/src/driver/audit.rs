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

//! Audit logging of the outcome of driver operations.

use crate::driver::DriverError;
use async_trait::async_trait;
use log::{error, info};

/// Boundary that receives one record per failed driver operation, at a severity that matches the
/// class of the failure, plus informational records about the lifecycle of the service.
#[async_trait]
pub trait AuditSink {
    /// Records a failure that requires immediate operator attention, such as the database being
    /// unavailable.
    async fn log_critical(&self, err: &DriverError);

    /// Records a failure that the caller or the operator may need to look into.
    async fn log_error(&self, err: &DriverError);

    /// Records an informational `message`.
    async fn log_information(&self, message: &str);
}

/// Audit sink that writes all records through the `log` facade.
///
/// Critical records use the `audit::critical` target so that they can be filtered and routed
/// separately from the rest of the audit records.
#[derive(Clone, Default)]
pub struct LogAuditSink {}

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn log_critical(&self, err: &DriverError) {
        error!(target: "audit::critical", "{}", err);
    }

    async fn log_error(&self, err: &DriverError) {
        error!(target: "audit", "{}", err);
    }

    async fn log_information(&self, message: &str) {
        info!(target: "audit", "{}", message);
    }
}
