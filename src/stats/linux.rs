//! Linux (and generic Unix) source provider
//!
//! Facts come from procfs where possible and from `uname`, `free`, `df` and
//! `uptime` otherwise.

use super::interfaces::{system_interfaces, InterfaceAddr};
use super::{read_trimmed, shell_from_env, Mount, Runner, Source};
use crate::text::{columns_of_line, Cleaner};
use std::io;

const CPUINFO: &str = "/proc/cpuinfo";
const HOSTNAME: &str = "/proc/sys/kernel/hostname";
const OSRELEASE: &str = "/proc/sys/kernel/osrelease";
const OS_RELEASE: &str = "/etc/os-release";
const STDIN_LINK: &str = "/proc/self/fd/0";
const HOME: &str = "/home";

pub struct LinuxSource {
    runner: Runner,
    cleaner: Cleaner,
}

impl LinuxSource {
    pub fn new(runner: Runner) -> Self {
        Self {
            runner,
            cleaner: Cleaner::new(),
        }
    }
}

impl Source for LinuxSource {
    fn hostname(&self) -> String {
        let host = read_trimmed(HOSTNAME);
        if !host.is_empty() {
            return host;
        }
        whoami::fallible::hostname().unwrap_or_default()
    }

    fn operating_system(&self) -> String {
        let pretty = std::fs::read_to_string(OS_RELEASE)
            .ok()
            .and_then(|content| parse_pretty_name(&content));

        match pretty {
            Some(name) => {
                let arch = self.runner.run("uname", &["-m"]);
                format!("{} {}", name, arch).trim().to_string()
            }
            None => self.runner.run("uname", &["-m", "-s"]),
        }
    }

    fn kernel(&self) -> String {
        read_trimmed(OSRELEASE)
    }

    fn uptime(&self) -> String {
        self.runner.run("uptime", &[])
    }

    fn shell(&self) -> String {
        shell_from_env()
    }

    fn tty(&self) -> String {
        std::fs::read_link(STDIN_LINK)
            .map(|p| p.to_string_lossy().trim().to_string())
            .unwrap_or_default()
    }

    fn cpu(&self) -> String {
        std::fs::read_to_string(CPUINFO)
            .map(|info| parse_cpuinfo(&info, &self.cleaner))
            .unwrap_or_default()
    }

    fn ram(&self) -> String {
        parse_free(&self.runner.run("free", &[]))
    }

    fn fs_usage(&self, mount: Mount) -> String {
        let path = match mount {
            Mount::Root => "/",
            Mount::Home => HOME,
        };
        parse_df(&self.runner.run("df", &["-h", path]), path, 6)
    }

    fn interfaces(&self) -> io::Result<Vec<InterfaceAddr>> {
        system_interfaces()
    }
}

/// `PRETTY_NAME="..."` from an os-release file
pub fn parse_pretty_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.trim().strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim_matches('"').trim_matches('\'').to_string())
        .filter(|name| !name.is_empty())
}

/// First CPU model in a cpuinfo dump, tidied, with the processor count
pub fn parse_cpuinfo(info: &str, cleaner: &Cleaner) -> String {
    let models: Vec<&str> = info
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            match key.trim() {
                "model name" | "cpu model" => Some(value.trim()),
                _ => None,
            }
        })
        .collect();

    match models.first() {
        Some(model) => format!("{}(x{})", cleaner.cpu_brand(model), models.len()),
        None => String::new(),
    }
}

/// `"<used> MB / <total> MB"` from `free` output (KiB columns)
pub fn parse_free(out: &str) -> String {
    let cols = match columns_of_line(out, "Mem:") {
        Some(cols) => cols,
        None => return String::new(),
    };

    let total = cols.get(1).and_then(|v| v.parse::<u64>().ok());
    let used = cols.get(2).and_then(|v| v.parse::<u64>().ok());

    match (used, total) {
        (Some(used), Some(total)) => format!("{} MB / {} MB", used / 1024, total / 1024),
        _ => String::new(),
    }
}

/// Usage line for `path` from `df -h` output.
///
/// Only rows with exactly `width` columns whose last column is `path` count;
/// `df` falls back to the parent mount for paths that are not mount points,
/// which this deliberately ignores.
pub fn parse_df(out: &str, path: &str, width: usize) -> String {
    out.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .find(|cols| cols.len() == width && cols[width - 1] == path)
        .map(|cols| format!("{} / {} ({})", cols[2], cols[1], cols[4]))
        .unwrap_or_default()
}
