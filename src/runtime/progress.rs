//! Progress reporting during a pod run.
//!
//! Runtimes that execute tasks one at a time can surface per-task progress
//! through a [`ProgressReporter`]. The default is silent; the console
//! reporter prints timestamped status lines for a human operator.

use crate::assemble::BoundTask;
use chrono::Local;
use std::time::Instant;

/// Observer for per-task progress. All methods have no-op defaults.
pub trait ProgressReporter {
    fn task_started(&self, _index: usize, _total: usize, _task: &BoundTask) {}
    fn task_finished(&self, _index: usize, _total: usize, _task: &BoundTask) {}
    fn run_finished(&self, _total: usize) {}
}

/// Reporter that emits nothing.
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}

/// Reporter that prints timestamped progress lines to stdout.
#[derive(Debug)]
pub struct ConsoleProgress {
    started: Instant,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn stamp(&self) -> String {
        format!(
            "[{}] (+{:.1}s)",
            Local::now().format("%H:%M:%S"),
            self.started.elapsed().as_secs_f64()
        )
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn task_started(&self, index: usize, total: usize, task: &BoundTask) {
        println!(
            "{} task {}/{} '{}' started (agent: {})",
            self.stamp(),
            index + 1,
            total,
            task.key,
            task.agent
        );
    }

    fn task_finished(&self, index: usize, total: usize, task: &BoundTask) {
        println!(
            "{} task {}/{} '{}' finished",
            self.stamp(),
            index + 1,
            total,
            task.key
        );
    }

    fn run_finished(&self, total: usize) {
        println!("{} all {} task(s) finished", self.stamp(), total);
    }
}
