//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use sparse_ecs::prelude::*;
//! ```

pub use crate::app::App;
pub use crate::component::Component;
pub use crate::entity::EntityId;
pub use crate::error::{EcsError, Result};
pub use crate::registry::Registry;
pub use crate::scheduler::Scheduler;
pub use crate::store::ComponentStore;
pub use crate::system::{BoxedSystem, Phase, System, SystemAccess};
pub use crate::time::{FixedTime, Time};
pub use crate::view::View;
