// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types
//!
//! Component absence is not an error: lookups return `Option`, and
//! `remove_component` on a missing component is a no-op. The variants here
//! cover the cases that are actual failures.

use std::fmt;

use crate::entity::EntityId;
use crate::system::Phase;

/// ECS error type
#[derive(Debug, Clone)]
pub enum EcsError {
    /// Operation referenced a destroyed, stale, or never-created entity
    InvalidEntity(EntityId),

    /// Entity id space exhausted (fatal)
    CapacityExhausted { live: usize, capacity: usize },

    /// A system signaled an unrecoverable condition during a phase.
    /// Aborts the current frame.
    SystemFault {
        system: String,
        phase: Phase,
        message: String,
    },
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::InvalidEntity(id) => write!(f, "Invalid entity {id:?}"),
            EcsError::CapacityExhausted { live, capacity } => {
                write!(f, "Entity capacity exhausted: {live} live, max is {capacity}")
            }
            EcsError::SystemFault {
                system,
                phase,
                message,
            } => {
                write!(f, "System '{system}' faulted in {phase}: {message}")
            }
        }
    }
}

impl std::error::Error for EcsError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
