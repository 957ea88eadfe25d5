//! Field registry
//!
//! Static table of every field key glance understands, the label it is
//! shown under, the shape of its value and the collection routines it needs.
//! Lookups are case-insensitive; anything not in the table is rejected.

use crate::error::{GlanceError, Result};
use strsim::jaro_winkler;

/// Minimum similarity for a "did you mean" hint on an unknown key
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Order used when the caller asks for nothing in particular
pub const DEFAULT_ORDER: &[Field] = &[
    Field::Host,
    Field::Os,
    Field::Kernel,
    Field::Uptime,
    Field::Ip,
    Field::Shell,
    Field::Tty,
    Field::Cpu,
    Field::Ram,
    Field::Fs,
    Field::Blank,
    Field::Colors,
];

/// A requestable report entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Host,
    Os,
    Kernel,
    Uptime,
    Ip,
    Ipv4,
    Ipv6,
    Shell,
    Tty,
    Cpu,
    Ram,
    Fs,
    Blank,
    Colors,
}

/// What kind of value a field stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// One string
    Scalar,
    /// Zero or more lines (filesystems, addresses)
    MultiValue,
    /// Layout only, nothing collected
    Pseudo,
}

/// One unit of collection work. Several fields can share a task
/// (`ip` and `ipv4` both need `Task::Ipv4`), but a task runs once per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Host,
    Os,
    Kernel,
    Uptime,
    Ipv4,
    Ipv6,
    Shell,
    Tty,
    Cpu,
    Ram,
    Fs,
}

/// Static description of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    /// Canonical lowercase key
    pub key: &'static str,
    /// Display label; empty for pseudo-fields
    pub label: &'static str,
    pub shape: Shape,
    /// Collection routines this field depends on
    pub tasks: &'static [Task],
}

/// Accepted spellings. Aliases map onto the same field as their canonical key.
const KEYS: &[(&str, Field)] = &[
    ("host", Field::Host),
    ("os", Field::Os),
    ("kernel", Field::Kernel),
    ("uptime", Field::Uptime),
    ("ip", Field::Ip),
    ("ipv4", Field::Ipv4),
    ("ip4", Field::Ipv4),
    ("ipv6", Field::Ipv6),
    ("ip6", Field::Ipv6),
    ("shell", Field::Shell),
    ("tty", Field::Tty),
    ("cpu", Field::Cpu),
    ("ram", Field::Ram),
    ("fs", Field::Fs),
    ("blank", Field::Blank),
    ("colors", Field::Colors),
];

const fn spec(
    field: Field,
    key: &'static str,
    label: &'static str,
    shape: Shape,
    tasks: &'static [Task],
) -> FieldSpec {
    FieldSpec {
        field,
        key,
        label,
        shape,
        tasks,
    }
}

/// Look up a key, ignoring case and surrounding whitespace
pub fn resolve(key: &str) -> Result<FieldSpec> {
    let wanted = key.trim().to_lowercase();
    KEYS.iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, field)| field.spec())
        .ok_or_else(|| GlanceError::invalid_field(key, suggest(&wanted)))
}

/// Resolve a caller-supplied key list into an order.
///
/// An empty list yields [`DEFAULT_ORDER`]. Duplicates are kept as given so
/// repeated `blank` entries add vertical space. The first unknown key aborts.
pub fn resolve_order<S: AsRef<str>>(keys: &[S]) -> Result<Vec<Field>> {
    if keys.is_empty() {
        return Ok(DEFAULT_ORDER.to_vec());
    }

    keys.iter()
        .map(|key| resolve(key.as_ref()).map(|spec| spec.field))
        .collect()
}

/// Canonical keys, in registry order (aliases excluded)
pub fn keys() -> Vec<&'static str> {
    KEYS.iter()
        .filter(|(name, field)| *name == field.key())
        .map(|(name, _)| *name)
        .collect()
}

fn suggest(wanted: &str) -> Option<&'static str> {
    KEYS.iter()
        .map(|(name, field)| (field.key(), jaro_winkler(wanted, name)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

impl Field {
    /// Registry entry for this field
    pub const fn spec(self) -> FieldSpec {
        match self {
            Field::Host => spec(self, "host", "Host", Shape::Scalar, &[Task::Host]),
            Field::Os => spec(self, "os", "OS", Shape::Scalar, &[Task::Os]),
            Field::Kernel => spec(self, "kernel", "Kernel", Shape::Scalar, &[Task::Kernel]),
            Field::Uptime => spec(self, "uptime", "Uptime", Shape::Scalar, &[Task::Uptime]),
            Field::Ip => spec(self, "ip", "IP", Shape::MultiValue, &[Task::Ipv4, Task::Ipv6]),
            Field::Ipv4 => spec(self, "ipv4", "IPv4", Shape::MultiValue, &[Task::Ipv4]),
            Field::Ipv6 => spec(self, "ipv6", "IPv6", Shape::MultiValue, &[Task::Ipv6]),
            Field::Shell => spec(self, "shell", "Shell", Shape::Scalar, &[Task::Shell]),
            Field::Tty => spec(self, "tty", "TTY", Shape::Scalar, &[Task::Tty]),
            Field::Cpu => spec(self, "cpu", "CPU", Shape::Scalar, &[Task::Cpu]),
            Field::Ram => spec(self, "ram", "RAM", Shape::Scalar, &[Task::Ram]),
            Field::Fs => spec(self, "fs", "FS", Shape::MultiValue, &[Task::Fs]),
            Field::Blank => spec(self, "blank", "", Shape::Pseudo, &[]),
            Field::Colors => spec(self, "colors", "", Shape::Pseudo, &[]),
        }
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn shape(self) -> Shape {
        self.spec().shape
    }

    pub fn tasks(self) -> &'static [Task] {
        self.spec().tasks
    }

    pub fn is_pseudo(self) -> bool {
        self.shape() == Shape::Pseudo
    }
}
