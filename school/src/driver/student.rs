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

//! Business rules for students.

use crate::model::Student;
use campus_core::driver::entity::Entity;
use campus_core::driver::validation::{
    ValidationResult, require_id, require_optional_text, require_text,
};
use campus_core::model::Audit;
use uuid::Uuid;

impl Entity for Student {
    type Id = Uuid;
    const NAME: &'static str = "Student";

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn validate_id(id: &Uuid) -> ValidationResult {
        require_id("id", id)
    }

    fn validate_fields(&self) -> ValidationResult {
        require_text("userId", &self.user_id)?;
        require_text("identityNumber", &self.identity_number)?;
        require_text("firstName", &self.first_name)?;
        require_optional_text("middleName", self.middle_name.as_deref())?;
        require_text("lastName", &self.last_name)
    }
}
