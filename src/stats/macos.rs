//! macOS source provider, built on `sysctl`, `uname`, `df` and `uptime`

use super::interfaces::{system_interfaces, InterfaceAddr};
use super::linux::parse_df;
use super::{shell_from_env, Mount, Runner, Source};
use crate::text::Cleaner;
use std::io;

const MB: u64 = 1024 * 1024;

pub struct MacSource {
    runner: Runner,
    cleaner: Cleaner,
}

impl MacSource {
    pub fn new(runner: Runner) -> Self {
        Self {
            runner,
            cleaner: Cleaner::new(),
        }
    }

    fn sysctl(&self, name: &str) -> String {
        self.runner.run("sysctl", &["-n", name])
    }

    fn sysctl_u64(&self, name: &str) -> Option<u64> {
        self.sysctl(name).parse().ok()
    }
}

impl Source for MacSource {
    fn hostname(&self) -> String {
        let host = whoami::fallible::hostname().unwrap_or_default();
        host.strip_suffix(".local").unwrap_or(&host).to_string()
    }

    fn operating_system(&self) -> String {
        self.runner.run("uname", &["-m", "-s"])
    }

    fn kernel(&self) -> String {
        self.sysctl("kern.osrelease")
    }

    fn uptime(&self) -> String {
        self.runner.run("uptime", &[])
    }

    fn shell(&self) -> String {
        shell_from_env()
    }

    fn tty(&self) -> String {
        let tty = std::env::var("GPG_TTY")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if !tty.is_empty() {
            return tty;
        }
        stdin_ttyname()
    }

    fn cpu(&self) -> String {
        let brand = self.sysctl("machdep.cpu.brand_string");
        if brand.is_empty() {
            return String::new();
        }
        format!("{}(x{})", self.cleaner.cpu_brand(&brand), num_cpus::get())
    }

    fn ram(&self) -> String {
        let phys = self.sysctl_u64("hw.physmem");
        let user = self.sysctl_u64("hw.usermem");
        let total = self.sysctl_u64("hw.memsize");

        match (phys, user, total) {
            (Some(phys), Some(user), Some(total)) => format_ram(phys + user, total),
            _ => String::new(),
        }
    }

    fn fs_usage(&self, mount: Mount) -> String {
        let path = match mount {
            Mount::Root => "/",
            Mount::Home => "/home",
        };
        parse_df(&self.runner.run("df", &["-h", path]), path, 9)
    }

    fn interfaces(&self) -> io::Result<Vec<InterfaceAddr>> {
        system_interfaces()
    }
}

/// `"<used> MB / <total> MB"` from byte counts
pub fn format_ram(used_bytes: u64, total_bytes: u64) -> String {
    format!("{} MB / {} MB", used_bytes / MB, total_bytes / MB)
}

#[cfg(unix)]
fn stdin_ttyname() -> String {
    use std::os::fd::AsFd;

    let stdin = std::io::stdin();
    nix::unistd::ttyname(stdin.as_fd())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(not(unix))]
fn stdin_ttyname() -> String {
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ram() {
        assert_eq!(format_ram(8 * 1024 * MB, 16 * 1024 * MB), "8192 MB / 16384 MB");
        assert_eq!(format_ram(0, MB - 1), "0 MB / 0 MB");
    }

    #[test]
    fn test_parse_df_bsd_columns() {
        let out = "Filesystem     Size   Used  Avail Capacity iused ifree %iused  Mounted on
/dev/disk3s1  460Gi  9.6Gi  350Gi     3%  404k  3.6G    0%   /";
        assert_eq!(parse_df(out, "/", 9), "9.6Gi / 460Gi (3%)");
    }
}
