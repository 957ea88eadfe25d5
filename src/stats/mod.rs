//! Source providers
//!
//! Each platform supplies one [`Source`] implementation that hands raw text
//! for every fact to the collector. Providers never fail loudly: a missing
//! file, a missing command or garbage output all become an empty string.

pub mod exec;
pub mod interfaces;
pub mod linux;
pub mod macos;
pub mod windows;

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

pub use exec::Runner;
pub use interfaces::InterfaceAddr;
pub use linux::LinuxSource;
pub use macos::MacSource;
pub use windows::WindowsSource;

/// Which filesystem a usage query is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mount {
    Root,
    Home,
}

/// Capability set every platform provides.
///
/// All methods return trimmed text, or an empty string when the fact is
/// unavailable. `uptime` is returned raw; the collector normalizes it.
pub trait Source: Send + Sync {
    fn hostname(&self) -> String;
    fn operating_system(&self) -> String;
    fn kernel(&self) -> String;
    fn uptime(&self) -> String;
    fn shell(&self) -> String;
    fn tty(&self) -> String;
    fn cpu(&self) -> String;
    fn ram(&self) -> String;
    /// Usage formatted as `"<used> / <total> (<percent>)"`
    fn fs_usage(&self, mount: Mount) -> String;
    /// Every address bound to a local interface
    fn interfaces(&self) -> io::Result<Vec<InterfaceAddr>>;
}

/// The provider for the platform glance was built for
pub fn default_source(timeout: Duration) -> Arc<dyn Source> {
    let runner = Runner::new(timeout);

    #[cfg(target_os = "macos")]
    {
        Arc::new(MacSource::new(runner))
    }
    #[cfg(windows)]
    {
        Arc::new(WindowsSource::new(runner))
    }
    #[cfg(not(any(target_os = "macos", windows)))]
    {
        Arc::new(LinuxSource::new(runner))
    }
}

/// A source answering from fixed values.
///
/// Useful for replaying a captured machine, for tests and for benchmarks.
/// Facts not set are reported as unavailable.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    facts: HashMap<&'static str, String>,
    filesystems: HashMap<Mount, String>,
    interfaces: Vec<InterfaceAddr>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar fact by its field key (`host`, `os`, `uptime`, ...)
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.facts.insert(key, value.into());
        self
    }

    pub fn with_fs(mut self, mount: Mount, usage: impl Into<String>) -> Self {
        self.filesystems.insert(mount, usage.into());
        self
    }

    pub fn with_interface(mut self, name: impl Into<String>, addr: impl Into<String>) -> Self {
        self.interfaces.push(InterfaceAddr::new(name, addr));
        self
    }

    fn fact(&self, key: &str) -> String {
        self.facts.get(key).cloned().unwrap_or_default()
    }
}

impl Source for StaticSource {
    fn hostname(&self) -> String {
        self.fact("host")
    }

    fn operating_system(&self) -> String {
        self.fact("os")
    }

    fn kernel(&self) -> String {
        self.fact("kernel")
    }

    fn uptime(&self) -> String {
        self.fact("uptime")
    }

    fn shell(&self) -> String {
        self.fact("shell")
    }

    fn tty(&self) -> String {
        self.fact("tty")
    }

    fn cpu(&self) -> String {
        self.fact("cpu")
    }

    fn ram(&self) -> String {
        self.fact("ram")
    }

    fn fs_usage(&self, mount: Mount) -> String {
        self.filesystems.get(&mount).cloned().unwrap_or_default()
    }

    fn interfaces(&self) -> io::Result<Vec<InterfaceAddr>> {
        Ok(self.interfaces.clone())
    }
}

/// Read a small text file, trimmed; empty on any error
pub(crate) fn read_trimmed(path: &str) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// `$SHELL`, trimmed; empty when unset
pub(crate) fn shell_from_env() -> String {
    std::env::var("SHELL")
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
