//! System trait, update phases, and access metadata

use std::any::TypeId;
use std::fmt;

use crate::error::Result;
use crate::registry::Registry;

/// Named stage within a frame.
///
/// All systems complete one phase before any system starts the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Update,
    LateUpdate,
    Render,
}

impl Phase {
    /// Frame execution order
    pub const ORDER: [Phase; 3] = [Phase::Update, Phase::LateUpdate, Phase::Render];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Update => "update",
            Phase::LateUpdate => "late_update",
            Phase::Render => "render",
        };
        f.write_str(name)
    }
}

/// Declared component read/write sets of a system
///
/// Single-threaded execution ignores these, but a parallel executor needs
/// them to verify that concurrently scheduled systems touch disjoint stores.
#[derive(Debug, Clone, Default)]
pub struct SystemAccess {
    pub reads: Vec<TypeId>,
    pub writes: Vec<TypeId>,
}

impl SystemAccess {
    /// Create empty access
    pub fn empty() -> Self {
        Self::default()
    }

    /// Declare a component type read
    pub fn read<T: 'static>(mut self) -> Self {
        self.reads.push(TypeId::of::<T>());
        self
    }

    /// Declare a component type written
    pub fn write<T: 'static>(mut self) -> Self {
        self.writes.push(TypeId::of::<T>());
        self
    }

    /// Check if this access conflicts with another
    ///
    /// Conflict: both write the same type, or one writes a type the other
    /// reads.
    pub fn conflicts_with(&self, other: &SystemAccess) -> bool {
        for write in &self.writes {
            if other.writes.contains(write) || other.reads.contains(write) {
                return true;
            }
        }
        for write in &other.writes {
            if self.reads.contains(write) {
                return true;
            }
        }
        false
    }

    /// Check if two systems may run concurrently
    pub fn can_run_parallel(&self, other: &SystemAccess) -> bool {
        !self.conflicts_with(other)
    }
}

/// Per-frame logic unit dispatched by the scheduler.
///
/// A system implements any subset of the phase hooks; the rest default to
/// no-ops. The registry is passed explicitly on every call and must not be
/// retained past it. An `Err` from a hook is treated as a fatal fault and
/// aborts the frame; recoverable per-entity problems should be absorbed by
/// the system itself (skip the entity, keep going).
pub trait System: Send + Sync {
    /// Get system name (used in fault diagnostics and profiles)
    fn name(&self) -> &'static str;

    /// Declared component access, for parallel-safety analysis
    fn access(&self) -> SystemAccess {
        SystemAccess::empty()
    }

    /// Logic update, first phase of the frame
    fn on_update(&mut self, _registry: &mut Registry, _dt: f32) -> Result<()> {
        Ok(())
    }

    /// Late update, after all logic updates complete
    fn on_late_update(&mut self, _registry: &mut Registry, _dt: f32) -> Result<()> {
        Ok(())
    }

    /// Render submission, last phase of the frame
    fn on_render(&mut self, _registry: &mut Registry) -> Result<()> {
        Ok(())
    }
}

/// Boxed system
pub type BoxedSystem = Box<dyn System>;
