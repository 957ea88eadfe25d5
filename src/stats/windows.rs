//! Windows source provider
//!
//! Everything goes through `powershell -c`; registry values are read with
//! `Get-ItemProperty`. Uptime is rebuilt into an `up D days, H:MM` phrase so
//! it goes through the same normalizer as every other platform.

use super::interfaces::{system_interfaces, InterfaceAddr};
use super::{Mount, Runner, Source};
use crate::text::Cleaner;
use std::io;

const CURRENT_VERSION: &str = r"HKLM:\Software\Microsoft\Windows NT\CurrentVersion";
const CPU_KEY: &str = r"HKLM:\Hardware\Description\System\CentralProcessor\0";
const GB: u64 = 1024 * 1024 * 1024;
const MB: u64 = 1024 * 1024;

pub struct WindowsSource {
    runner: Runner,
    cleaner: Cleaner,
}

impl WindowsSource {
    pub fn new(runner: Runner) -> Self {
        Self {
            runner,
            cleaner: Cleaner::new(),
        }
    }

    fn powershell(&self, script: &str) -> String {
        self.runner.run("powershell", &["-NoProfile", "-c", script])
    }

    fn registry(&self, key: &str, value: &str) -> String {
        self.powershell(&format!("(Get-ItemProperty '{}').{}", key, value))
    }
}

impl Source for WindowsSource {
    fn hostname(&self) -> String {
        std::env::var("COMPUTERNAME")
            .ok()
            .or_else(|| whoami::fallible::hostname().ok())
            .unwrap_or_default()
    }

    fn operating_system(&self) -> String {
        self.registry(CURRENT_VERSION, "ProductName")
    }

    fn kernel(&self) -> String {
        let display = self.registry(CURRENT_VERSION, "DisplayVersion");
        let build = self.registry(CURRENT_VERSION, "CurrentBuild");
        let ubr = self.registry(CURRENT_VERSION, "UBR");
        format_kernel(&display, &build, &ubr)
    }

    fn uptime(&self) -> String {
        let out = self.powershell("(date) - (gcim win32_operatingsystem).lastbootuptime");
        raw_uptime_from_timespan(&out)
    }

    fn shell(&self) -> String {
        let parent = format!(
            "(Get-CimInstance Win32_Process -Filter \"ProcessId={}\").ParentProcessId",
            std::process::id()
        );
        self.powershell(&format!("(Get-Process -Id {}).ProcessName", parent))
    }

    fn tty(&self) -> String {
        String::new()
    }

    fn cpu(&self) -> String {
        let brand = self.registry(CPU_KEY, "ProcessorNameString");
        if brand.is_empty() {
            return String::new();
        }
        format!("{}(x{})", self.cleaner.cpu_brand(&brand), num_cpus::get())
    }

    fn ram(&self) -> String {
        let free = self
            .powershell(
                r#"(Get-Counter "\Memory\Available Bytes").CounterSamples.CookedValue"#,
            )
            .parse::<u64>()
            .ok();
        let total = self
            .powershell(concat!(
                "(Get-CimInstance Win32_PhysicalMemory",
                " | Measure-Object -Property Capacity -Sum).Sum"
            ))
            .parse::<u64>()
            .ok();

        match (free, total) {
            (Some(free), Some(total)) => format!(
                "{} MB / {} MB",
                total.saturating_sub(free) / MB,
                total / MB
            ),
            _ => String::new(),
        }
    }

    fn fs_usage(&self, mount: Mount) -> String {
        let drive = match mount {
            Mount::Root => "c:".to_string(),
            Mount::Home => std::env::var("HOMEDRIVE")
                .map(|d| d.to_lowercase())
                .unwrap_or_default(),
        };
        if drive.is_empty() {
            return String::new();
        }

        let out = self.powershell(&format!(
            "gcim win32_logicaldisk -filter \"name='{}'\" | select deviceid,freespace,size",
            drive
        ));
        parse_logical_disk(&out, &drive)
    }

    fn interfaces(&self) -> io::Result<Vec<InterfaceAddr>> {
        system_interfaces()
    }
}

/// `"<DisplayVersion> (OS Build <build>[.<ubr>])"`
pub fn format_kernel(display: &str, build: &str, ubr: &str) -> String {
    if display.is_empty() || build.is_empty() {
        return String::new();
    }
    match ubr.parse::<u64>() {
        Ok(ubr) => format!("{} (OS Build {}.{})", display, build, ubr),
        Err(_) => format!("{} (OS Build {})", display, build),
    }
}

/// Rebuild PowerShell TimeSpan output (`Days : 1`, `Hours : 2`, ...) into
/// the `up 1 days, 2:05` form the uptime normalizer understands.
pub fn raw_uptime_from_timespan(out: &str) -> String {
    let field = |name: &str| -> Option<u64> {
        out.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim() == name {
                value.trim().parse().ok()
            } else {
                None
            }
        })
    };

    match (field("Days"), field("Hours"), field("Minutes")) {
        (Some(days), Some(hours), Some(mins)) if days > 0 => {
            format!("up {} days, {}:{:02}", days, hours, mins)
        }
        (_, Some(hours), Some(mins)) => format!("up {}:{:02}", hours, mins),
        _ => String::new(),
    }
}

/// `"<used>G / <total>G (<pct>%)"` from a `win32_logicaldisk` table
pub fn parse_logical_disk(out: &str, drive: &str) -> String {
    let drive = drive.to_lowercase();

    out.lines()
        .map(|line| {
            line.to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .find(|cols| cols.len() == 3 && cols[0] == drive)
        .and_then(|cols| {
            let free = cols[1].parse::<u64>().ok()? / GB;
            let total = cols[2].parse::<u64>().ok()? / GB;
            if total == 0 {
                return None;
            }
            let used = total.saturating_sub(free);
            Some(format!("{}G / {}G ({}%)", used, total, 100 * used / total))
        })
        .unwrap_or_default()
}
