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

//! Frame scheduler
//!
//! Drives one frame: phases in fixed order (Update -> LateUpdate -> Render),
//! systems in registration order within each phase. Every system finishes a
//! phase before any system starts the next, so a reader registered after a
//! writer observes the writer's complete pass.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::{debug, error};

use crate::error::{EcsError, Result};
use crate::registry::Registry;
use crate::system::{BoxedSystem, Phase, SystemAccess};

/// Aggregate timing for one system in one phase
#[derive(Debug, Clone)]
pub struct SystemStats {
    pub min: Duration,
    pub max: Duration,
    pub avg: Duration,
    pub call_count: u64,
}

/// Collects per-system, per-phase execution timings across frames.
pub struct FrameProfiler {
    timings: FxHashMap<(usize, Phase), Vec<Duration>>,
}

impl FrameProfiler {
    pub fn new() -> Self {
        Self {
            timings: FxHashMap::default(),
        }
    }

    fn record(&mut self, system_index: usize, phase: Phase, duration: Duration) {
        self.timings
            .entry((system_index, phase))
            .or_default()
            .push(duration);
    }

    /// Stats for a system's executions of one phase, if any were recorded.
    pub fn stats(&self, system_index: usize, phase: Phase) -> Option<SystemStats> {
        let timings = self.timings.get(&(system_index, phase))?;
        if timings.is_empty() {
            return None;
        }

        let min = *timings.iter().min().unwrap_or(&Duration::ZERO);
        let max = *timings.iter().max().unwrap_or(&Duration::ZERO);
        let avg = timings.iter().sum::<Duration>() / timings.len() as u32;

        Some(SystemStats {
            min,
            max,
            avg,
            call_count: timings.len() as u64,
        })
    }

    pub fn clear(&mut self) {
        self.timings.clear();
    }
}

impl Default for FrameProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing of one system invocation within the last frame
#[derive(Debug, Clone)]
pub struct SystemTiming {
    pub name: String,
    pub phase: Phase,
    pub duration: Duration,
}

/// Execution profile for a frame
#[derive(Debug, Clone)]
pub struct FrameProfile {
    pub total_frame_time: Duration,
    pub system_timings: Vec<SystemTiming>,
}

/// Owns the ordered system list and executes frames against a registry.
pub struct Scheduler {
    systems: Vec<BoxedSystem>,
    profiler: FrameProfiler,
    last_profile: Option<FrameProfile>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            profiler: FrameProfiler::new(),
            last_profile: None,
        }
    }

    /// Register a system; it runs after all previously registered systems
    /// within each phase.
    pub fn add_system(&mut self, system: BoxedSystem) {
        debug!(system = system.name(), "system registered");
        self.systems.push(system);
    }

    /// Convenience constructor for chaining
    pub fn with_system(mut self, system: BoxedSystem) -> Self {
        self.add_system(system);
        self
    }

    /// Total number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Execute one frame.
    ///
    /// `dt` is the timestep in seconds fed to the update phases. A system
    /// error aborts the frame immediately and surfaces as
    /// [`EcsError::SystemFault`]; registry state is left as the completed
    /// portion of the frame wrote it (no rollback).
    pub fn run_frame(&mut self, registry: &mut Registry, dt: f32) -> Result<()> {
        let frame_start = Instant::now();
        let mut system_timings = Vec::with_capacity(self.systems.len() * Phase::ORDER.len());

        for phase in Phase::ORDER {
            self.run_phase(registry, phase, dt, &mut system_timings)?;
        }

        self.last_profile = Some(FrameProfile {
            total_frame_time: frame_start.elapsed(),
            system_timings,
        });
        Ok(())
    }

    fn run_phase(
        &mut self,
        registry: &mut Registry,
        phase: Phase,
        dt: f32,
        system_timings: &mut Vec<SystemTiming>,
    ) -> Result<()> {
        for (index, system) in self.systems.iter_mut().enumerate() {
            let name = system.name();
            let start = Instant::now();

            let outcome = match phase {
                Phase::Update => system.on_update(registry, dt),
                Phase::LateUpdate => system.on_late_update(registry, dt),
                Phase::Render => system.on_render(registry),
            };

            let duration = start.elapsed();
            self.profiler.record(index, phase, duration);
            system_timings.push(SystemTiming {
                name: name.to_string(),
                phase,
                duration,
            });

            if let Err(err) = outcome {
                error!(system = name, %phase, %err, "system fault, aborting frame");
                return Err(EcsError::SystemFault {
                    system: name.to_string(),
                    phase,
                    message: err.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Pairs of registered systems whose declared accesses conflict.
    ///
    /// This is the static check a parallel executor would enforce before
    /// scheduling two systems concurrently; with the single-threaded frame
    /// loop it is purely diagnostic.
    pub fn access_conflicts(&self) -> Vec<(&'static str, &'static str)> {
        let accesses: Vec<SystemAccess> = self.systems.iter().map(|s| s.access()).collect();
        let mut conflicts = Vec::new();
        for i in 0..accesses.len() {
            for j in (i + 1)..accesses.len() {
                if accesses[i].conflicts_with(&accesses[j]) {
                    conflicts.push((self.systems[i].name(), self.systems[j].name()));
                }
            }
        }
        conflicts
    }

    /// Cross-frame timing statistics
    pub fn profiler(&self) -> &FrameProfiler {
        &self.profiler
    }

    /// Profile of the most recently completed frame
    pub fn last_profile(&self) -> Option<&FrameProfile> {
        self.last_profile.as_ref()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
