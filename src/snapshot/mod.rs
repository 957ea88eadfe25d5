//! Collected report state
//!
//! A [`Snapshot`] holds the resolved field order and one write-once slot per
//! fact. Collection tasks fill the slots concurrently; each slot belongs to
//! exactly one task, so a `OnceLock` is all the coordination they need.

use crate::fields::Field;
use crate::netcache::IpCache;
use crate::render::{self, StyleConfig};
use crate::text::display_width;
use std::sync::OnceLock;

/// A single displayable fact and the label it is shown under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fact {
    Host,
    Os,
    Kernel,
    Uptime,
    Shell,
    Tty,
    Cpu,
    Ram,
    RootFs,
    HomeFs,
}

impl Fact {
    pub fn label(self) -> &'static str {
        match self {
            Fact::Host => "Host",
            Fact::Os => "OS",
            Fact::Kernel => "Kernel",
            Fact::Uptime => "Uptime",
            Fact::Shell => "Shell",
            Fact::Tty => "TTY",
            Fact::Cpu => "CPU",
            Fact::Ram => "RAM",
            Fact::RootFs => "RootFS",
            Fact::HomeFs => "HomeFS",
        }
    }
}

/// Address family of an IP slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn label(self) -> &'static str {
        match self {
            Family::V4 => "IPv4",
            Family::V6 => "IPv6",
        }
    }
}

#[derive(Debug, Default)]
pub struct Snapshot {
    order: Vec<Field>,
    host: OnceLock<String>,
    os: OnceLock<String>,
    kernel: OnceLock<String>,
    uptime: OnceLock<String>,
    shell: OnceLock<String>,
    tty: OnceLock<String>,
    cpu: OnceLock<String>,
    ram: OnceLock<String>,
    root_fs: OnceLock<String>,
    home_fs: OnceLock<String>,
    ipv4: OnceLock<Vec<String>>,
    ipv6: OnceLock<Vec<String>>,
    ip_cache: IpCache,
    height: usize,
    width: usize,
}

impl Snapshot {
    /// An empty snapshot for an already resolved order
    pub fn new(order: Vec<Field>) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn order(&self) -> &[Field] {
        &self.order
    }

    /// Value of a fact; empty when it was not requested or not available
    pub fn get(&self, fact: Fact) -> &str {
        self.slot(fact).get().map(String::as_str).unwrap_or("")
    }

    /// `"<interface> <address>"` entries, sorted
    pub fn addresses(&self, family: Family) -> &[String] {
        self.address_slot(family)
            .get()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Store a fact. The first write wins; a slot is never overwritten.
    pub fn set(&self, fact: Fact, value: String) -> bool {
        self.slot(fact).set(value).is_ok()
    }

    pub fn set_addresses(&self, family: Family, entries: Vec<String>) -> bool {
        self.address_slot(family).set(entries).is_ok()
    }

    pub fn ip_cache(&self) -> &IpCache {
        &self.ip_cache
    }

    /// Number of lines in the plain rendering
    pub fn height(&self) -> usize {
        self.height
    }

    /// Widest line of the plain rendering, in terminal columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Compute layout metrics. Only called once every collection task has
    /// joined, which `&mut self` enforces.
    pub fn measure(&mut self) {
        let lines = render::lines(self, &StyleConfig::plain());
        self.height = lines.len();
        self.width = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    }

    /// Reset every value and the IP cache, keeping the order
    pub fn clear(&mut self) {
        for fact in [
            Fact::Host,
            Fact::Os,
            Fact::Kernel,
            Fact::Uptime,
            Fact::Shell,
            Fact::Tty,
            Fact::Cpu,
            Fact::Ram,
            Fact::RootFs,
            Fact::HomeFs,
        ] {
            self.slot_mut(fact).take();
        }
        self.ipv4.take();
        self.ipv6.take();
        self.ip_cache.clear();
        self.height = 0;
        self.width = 0;
    }

    fn slot(&self, fact: Fact) -> &OnceLock<String> {
        match fact {
            Fact::Host => &self.host,
            Fact::Os => &self.os,
            Fact::Kernel => &self.kernel,
            Fact::Uptime => &self.uptime,
            Fact::Shell => &self.shell,
            Fact::Tty => &self.tty,
            Fact::Cpu => &self.cpu,
            Fact::Ram => &self.ram,
            Fact::RootFs => &self.root_fs,
            Fact::HomeFs => &self.home_fs,
        }
    }

    fn slot_mut(&mut self, fact: Fact) -> &mut OnceLock<String> {
        match fact {
            Fact::Host => &mut self.host,
            Fact::Os => &mut self.os,
            Fact::Kernel => &mut self.kernel,
            Fact::Uptime => &mut self.uptime,
            Fact::Shell => &mut self.shell,
            Fact::Tty => &mut self.tty,
            Fact::Cpu => &mut self.cpu,
            Fact::Ram => &mut self.ram,
            Fact::RootFs => &mut self.root_fs,
            Fact::HomeFs => &mut self.home_fs,
        }
    }

    fn address_slot(&self, family: Family) -> &OnceLock<Vec<String>> {
        match family {
            Family::V4 => &self.ipv4,
            Family::V6 => &self.ipv6,
        }
    }
}
