// Small text helpers shared by the source providers and the renderer

use regex::Regex;
use std::net::IpAddr;
use unicode_width::UnicodeWidthStr;

/// Pre-compiled patterns used to tidy raw provider output.
///
/// Built once per source and passed around; nothing here is global.
#[derive(Debug, Clone)]
pub struct Cleaner {
    whitespace: Regex,
    cpu_brand: Regex,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("static pattern"),
            cpu_brand: Regex::new(r"\((R|TM)\)| (@|CPU)").expect("static pattern"),
        }
    }

    /// Collapse every whitespace run to one space and trim the ends
    pub fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }

    /// Drop trademark noise from a CPU brand string.
    ///
    /// "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz" becomes
    /// "Intel Core i7-8650U 1.90GHz".
    pub fn cpu_brand(&self, brand: &str) -> String {
        let stripped = self.cpu_brand.replace_all(brand, "");
        self.collapse_whitespace(&stripped)
    }
}

/// Host portion of an address as printed by interface tools:
/// strips a `/prefix` length and a `%zone` scope id.
pub fn host_portion(addr: &str) -> &str {
    let addr = addr.trim();
    let addr = addr.split('/').next().unwrap_or(addr);
    addr.split('%').next().unwrap_or(addr)
}

/// Parse the host portion of an address, if it is one
pub fn parse_host(addr: &str) -> Option<IpAddr> {
    host_portion(addr).parse().ok()
}

/// Terminal columns taken by `text`, ignoring ANSI escape sequences
pub fn display_width(text: &str) -> usize {
    strip_ansi(text).width()
}

/// Remove CSI escape sequences (`ESC [ ... final`)
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            // Parameters and intermediates run until a final byte in @..~
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// First line of `text` containing `key`, split on whitespace
pub fn columns_of_line<'a>(text: &'a str, key: &str) -> Option<Vec<&'a str>> {
    text.lines()
        .find(|line| line.contains(key))
        .map(|line| line.split_whitespace().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        let c = Cleaner::new();
        assert_eq!(c.collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(c.collapse_whitespace(""), "");
    }

    #[test]
    fn test_cpu_brand() {
        let c = Cleaner::new();
        assert_eq!(
            c.cpu_brand("Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz"),
            "Intel Core i7-8650U 1.90GHz"
        );
        assert_eq!(
            c.cpu_brand("AMD Ryzen 7 5800X 8-Core Processor"),
            "AMD Ryzen 7 5800X 8-Core Processor"
        );
    }

    #[test]
    fn test_host_portion() {
        assert_eq!(host_portion("192.168.1.4/24"), "192.168.1.4");
        assert_eq!(host_portion("fe80::1%eth0/64"), "fe80::1");
        assert_eq!(host_portion("10.0.0.1"), "10.0.0.1");
    }

    #[test]
    fn test_parse_host() {
        assert!(parse_host("2001:db8::2/64").unwrap().is_ipv6());
        assert!(parse_host("10.1.2.3/8").unwrap().is_ipv4());
        assert!(parse_host("not-an-ip").is_none());
    }

    #[test]
    fn test_display_width_ignores_escapes() {
        assert_eq!(display_width("\x1b[34mHost:\x1b[0m x"), 7);
        assert_eq!(display_width("▄▄▄"), 3);
        assert_eq!(strip_ansi("\x1b[1;32mok\x1b[0m"), "ok");
    }

    #[test]
    fn test_columns_of_line() {
        let text = "              total        used\nMem:        16000        8000\n";
        assert_eq!(
            columns_of_line(text, "Mem:"),
            Some(vec!["Mem:", "16000", "8000"])
        );
        assert_eq!(columns_of_line(text, "Swap:"), None);
    }
}
