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

//! Sparse ECS - Entity Component System core
//!
//! Sparse-set component storage with generational entity handles and a
//! phase-ordered frame scheduler (Update -> LateUpdate -> Render).

pub mod app;
pub mod component;
pub mod entity;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod system;
pub mod time;
pub mod view;

pub use app::*;
pub use component::*;
pub use entity::EntityId;
pub use error::*;
pub use registry::*;
pub use scheduler::*;
pub use store::ComponentStore;
pub use system::*;
pub use time::*;
pub use view::*;
