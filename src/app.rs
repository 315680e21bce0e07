//! Application entry point
//!
//! Bundles a registry, scheduler, and frame clock into the lifecycle object
//! a launcher drives: register systems at startup, then call [`App::update`]
//! once per frame.

use crate::error::Result;
use crate::registry::Registry;
use crate::scheduler::Scheduler;
use crate::system::BoxedSystem;
use crate::time::Time;

/// Engine-side application state
pub struct App {
    pub registry: Registry,
    pub scheduler: Scheduler,
    time: Time,
}

impl App {
    /// Create new application
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            scheduler: Scheduler::new(),
            time: Time::new(),
        }
    }

    /// Add a system
    pub fn add_system(&mut self, system: BoxedSystem) -> &mut Self {
        self.scheduler.add_system(system);
        self
    }

    /// Run one frame with the measured timestep.
    pub fn update(&mut self) -> Result<()> {
        self.time.update();
        let dt = self.time.delta_seconds();
        self.scheduler.run_frame(&mut self.registry, dt)
    }

    /// Frame clock
    pub fn time(&self) -> &Time {
        &self.time
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
