//! Report rendering
//!
//! Walks the snapshot order and expands each field into zero or more lines.
//! Only lines that will actually be printed take part in label alignment.

pub mod style;

pub use style::{parse_style, StyleConfig};

use crate::fields::Field;
use crate::snapshot::{Fact, Family, Snapshot};
use crate::text::display_width;
use nu_ansi_term::Color;

const SWATCH_BLOCK: &str = "▄▄▄";

/// Foreground/background pairs for the swatch, one per base color
const SWATCH: [(Color, Color); 8] = [
    (Color::DarkGray, Color::Black),
    (Color::LightRed, Color::Red),
    (Color::LightGreen, Color::Green),
    (Color::LightYellow, Color::Yellow),
    (Color::LightBlue, Color::Blue),
    (Color::LightMagenta, Color::Magenta),
    (Color::LightCyan, Color::Cyan),
    (Color::LightGray, Color::White),
];

enum Entry<'a> {
    Blank,
    Swatch(String),
    Line { label: &'static str, value: &'a str },
}

/// The full report, lines joined with `\n`, no trailing newline
pub fn render(snapshot: &Snapshot, style: &StyleConfig) -> String {
    lines(snapshot, style).join("\n")
}

/// Report lines in snapshot order
pub fn lines(snapshot: &Snapshot, style: &StyleConfig) -> Vec<String> {
    let entries = expand(snapshot, style);

    let max_label = entries
        .iter()
        .filter_map(|entry| match entry {
            Entry::Line { label, .. } => Some(display_width(label)),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Blank => String::new(),
            Entry::Swatch(swatch) => swatch,
            Entry::Line { label, value } => format_line(label, value, max_label, style),
        })
        .collect()
}

/// The color sample bar; bare blocks when styling is off
pub fn swatch(style: &StyleConfig) -> String {
    if !style.enabled {
        return format!(" {}", SWATCH_BLOCK.repeat(SWATCH.len()));
    }

    let blocks: String = SWATCH
        .iter()
        .map(|(fg, bg)| fg.on(*bg).paint(SWATCH_BLOCK).to_string())
        .collect();
    format!(" {}", blocks)
}

fn expand<'a>(snapshot: &'a Snapshot, style: &StyleConfig) -> Vec<Entry<'a>> {
    let mut entries = Vec::with_capacity(snapshot.order().len());

    let push_fact = |entries: &mut Vec<Entry<'a>>, fact: Fact| {
        let value = snapshot.get(fact);
        if !value.is_empty() {
            entries.push(Entry::Line {
                label: fact.label(),
                value,
            });
        }
    };
    let push_family = |entries: &mut Vec<Entry<'a>>, family: Family| {
        for value in snapshot.addresses(family) {
            entries.push(Entry::Line {
                label: family.label(),
                value: value.as_str(),
            });
        }
    };

    for field in snapshot.order() {
        match field {
            Field::Blank => entries.push(Entry::Blank),
            Field::Colors => entries.push(Entry::Swatch(swatch(style))),
            Field::Fs => {
                push_fact(&mut entries, Fact::RootFs);
                let (root, home) = (snapshot.get(Fact::RootFs), snapshot.get(Fact::HomeFs));
                if home != root {
                    push_fact(&mut entries, Fact::HomeFs);
                }
            }
            Field::Ip => {
                push_family(&mut entries, Family::V4);
                push_family(&mut entries, Family::V6);
            }
            Field::Ipv4 => push_family(&mut entries, Family::V4),
            Field::Ipv6 => push_family(&mut entries, Family::V6),
            Field::Host => push_fact(&mut entries, Fact::Host),
            Field::Os => push_fact(&mut entries, Fact::Os),
            Field::Kernel => push_fact(&mut entries, Fact::Kernel),
            Field::Uptime => push_fact(&mut entries, Fact::Uptime),
            Field::Shell => push_fact(&mut entries, Fact::Shell),
            Field::Tty => push_fact(&mut entries, Fact::Tty),
            Field::Cpu => push_fact(&mut entries, Fact::Cpu),
            Field::Ram => push_fact(&mut entries, Fact::Ram),
        }
    }

    entries
}

fn format_line(label: &str, value: &str, max_label: usize, style: &StyleConfig) -> String {
    let pad = max_label.saturating_sub(display_width(label));
    format!(
        " {}{} {}",
        " ".repeat(pad),
        style.paint_label(&format!("{}:", label)),
        style.paint_value(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::strip_ansi;

    fn snapshot(order: Vec<Field>, facts: &[(Fact, &str)]) -> Snapshot {
        let snap = Snapshot::new(order);
        for (fact, value) in facts {
            snap.set(*fact, value.to_string());
        }
        snap
    }

    #[test]
    fn test_alignment() {
        let snap = snapshot(
            vec![Field::Host, Field::Uptime, Field::Os],
            &[
                (Fact::Host, "box"),
                (Fact::Uptime, "5 mins"),
                (Fact::Os, "Arch Linux x86_64"),
            ],
        );
        assert_eq!(
            render(&snap, &StyleConfig::plain()),
            "   Host: box\n Uptime: 5 mins\n     OS: Arch Linux x86_64"
        );
    }

    #[test]
    fn test_empty_fields_do_not_affect_alignment() {
        let snap = snapshot(
            vec![Field::Host, Field::Kernel, Field::Os],
            &[(Fact::Host, "box"), (Fact::Os, "Alpine")],
        );
        assert_eq!(render(&snap, &StyleConfig::plain()), " Host: box\n   OS: Alpine");
    }

    #[test]
    fn test_blank_lines() {
        let snap = snapshot(
            vec![Field::Blank, Field::Host, Field::Blank, Field::Blank],
            &[(Fact::Host, "box")],
        );
        assert_eq!(render(&snap, &StyleConfig::plain()), "\n Host: box\n\n");
    }

    #[test]
    fn test_fs_lines() {
        let snap = snapshot(
            vec![Field::Fs],
            &[(Fact::RootFs, "10G / 20G (50%)"), (Fact::HomeFs, "1G / 2G (50%)")],
        );
        assert_eq!(
            render(&snap, &StyleConfig::plain()),
            " RootFS: 10G / 20G (50%)\n HomeFS: 1G / 2G (50%)"
        );
    }

    #[test]
    fn test_home_fs_same_as_root_is_hidden() {
        let snap = snapshot(
            vec![Field::Fs],
            &[(Fact::RootFs, "10G / 20G (50%)"), (Fact::HomeFs, "10G / 20G (50%)")],
        );
        assert_eq!(render(&snap, &StyleConfig::plain()), " RootFS: 10G / 20G (50%)");
    }

    #[test]
    fn test_ip_lines_v4_then_v6() {
        let snap = Snapshot::new(vec![Field::Ip]);
        snap.set_addresses(Family::V6, vec!["eth0 2001:db8::1".into()]);
        snap.set_addresses(
            Family::V4,
            vec!["eth0 10.0.0.2".into(), "wlan0 192.168.1.4".into()],
        );
        assert_eq!(
            render(&snap, &StyleConfig::plain()),
            " IPv4: eth0 10.0.0.2\n IPv4: wlan0 192.168.1.4\n IPv6: eth0 2001:db8::1"
        );
    }

    #[test]
    fn test_colors_line() {
        let snap = snapshot(vec![Field::Host, Field::Colors], &[(Fact::Host, "box")]);
        let blocks = format!(" {}", SWATCH_BLOCK.repeat(8));
        assert_eq!(render(&snap, &StyleConfig::plain()), format!(" Host: box\n{}", blocks));

        let styled = render(&snap, &StyleConfig::default());
        let lines: Vec<&str> = styled.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(strip_ansi(lines[1]), blocks);
        assert_ne!(lines[1], blocks);
    }

    #[test]
    fn test_styled_line_strips_to_plain() {
        let snap = snapshot(vec![Field::Cpu], &[(Fact::Cpu, "Ryzen 7 5800X(x16)")]);
        let styled = render(&snap, &StyleConfig::default());
        assert_ne!(styled, render(&snap, &StyleConfig::plain()));
        assert_eq!(strip_ansi(&styled), render(&snap, &StyleConfig::plain()));
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = Snapshot::new(vec![Field::Host, Field::Ip]);
        assert_eq!(render(&snap, &StyleConfig::plain()), "");
    }
}
