//! Collection orchestration
//!
//! Resolves the requested keys, works out which collection tasks they need
//! and runs every task on its own thread. The scope around the threads is the
//! join barrier: layout metrics are only measured after it closes.

use crate::error::Result;
use crate::fields::{resolve_order, Field, Task};
use crate::netcache::DEFAULT_EXCLUDE;
use crate::snapshot::{Fact, Family, Snapshot};
use crate::stats::{Mount, Source};
use crate::uptime::UptimeNormalizer;
use regex::Regex;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Runs collection tasks against one source.
///
/// Holds only immutable state, so one collector can serve any number of
/// snapshots.
pub struct Collector {
    source: Arc<dyn Source>,
    normalizer: UptimeNormalizer,
    exclude: Option<Regex>,
}

impl Collector {
    /// Collector with the default interface exclusion pattern
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self {
            source,
            normalizer: UptimeNormalizer::new(),
            exclude: Regex::new(DEFAULT_EXCLUDE).ok(),
        }
    }

    /// Replace the interface exclusion pattern; an empty pattern excludes nothing
    pub fn with_exclusion(mut self, pattern: &str) -> Result<Self> {
        self.exclude = if pattern.trim().is_empty() {
            None
        } else {
            Some(Regex::new(pattern)?)
        };
        Ok(self)
    }

    /// Build a snapshot for `keys`, or the default order when empty.
    ///
    /// Fails only on an unknown key, before any task is started.
    pub fn collect<S: AsRef<str>>(&self, keys: &[S]) -> Result<Snapshot> {
        let order = resolve_order(keys)?;
        let mut snapshot = Snapshot::new(order);
        self.populate(&mut snapshot);
        Ok(snapshot)
    }

    /// Clear `snapshot` and collect it again with the same order
    pub fn recollect(&self, snapshot: &mut Snapshot) {
        snapshot.clear();
        self.populate(snapshot);
    }

    fn populate(&self, snapshot: &mut Snapshot) {
        let tasks = tasks_for(snapshot.order());
        let started = Instant::now();
        tracing::debug!(
            fields = snapshot.order().len(),
            tasks = tasks.len(),
            "collecting snapshot"
        );

        {
            let snapshot: &Snapshot = snapshot;
            thread::scope(|s| {
                for &task in &tasks {
                    s.spawn(move || self.run(task, snapshot));
                }
            });
        }

        snapshot.measure();
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            height = snapshot.height(),
            width = snapshot.width(),
            "snapshot collected"
        );
    }

    fn run(&self, task: Task, snapshot: &Snapshot) {
        let source = self.source.as_ref();
        let exclude = self.exclude.as_ref();

        match task {
            Task::Host => {
                snapshot.set(Fact::Host, source.hostname());
            }
            Task::Os => {
                snapshot.set(Fact::Os, source.operating_system());
            }
            Task::Kernel => {
                snapshot.set(Fact::Kernel, source.kernel());
            }
            Task::Uptime => {
                let raw = source.uptime();
                let value = if raw.trim().is_empty() {
                    String::new()
                } else {
                    self.normalizer.normalize(&raw)
                };
                snapshot.set(Fact::Uptime, value);
            }
            Task::Shell => {
                snapshot.set(Fact::Shell, source.shell());
            }
            Task::Tty => {
                snapshot.set(Fact::Tty, source.tty());
            }
            Task::Cpu => {
                snapshot.set(Fact::Cpu, source.cpu());
            }
            Task::Ram => {
                snapshot.set(Fact::Ram, source.ram());
            }
            Task::Fs => {
                let root = source.fs_usage(Mount::Root);
                let home = source.fs_usage(Mount::Home);
                let home = if home == root { String::new() } else { home };
                snapshot.set(Fact::RootFs, root);
                snapshot.set(Fact::HomeFs, home);
            }
            Task::Ipv4 => {
                let entries = snapshot.ip_cache().ipv4(source, exclude);
                snapshot.set_addresses(Family::V4, entries);
            }
            Task::Ipv6 => {
                let entries = snapshot.ip_cache().ipv6(source, exclude);
                snapshot.set_addresses(Family::V6, entries);
            }
        }

        tracing::trace!(?task, "task finished");
    }
}

/// Every task the order needs, once each, in first-use order
pub fn tasks_for(order: &[Field]) -> Vec<Task> {
    let mut tasks = Vec::new();
    for task in order.iter().flat_map(|field| field.tasks()) {
        if !tasks.contains(task) {
            tasks.push(*task);
        }
    }
    tasks
}
