//! Uptime normalization
//!
//! Turns whatever `uptime` printed into a canonical phrase such as
//! `"2 days, 10 hours, 5 mins"`. The work is an ordered list of rewrite
//! steps; each one assumes every earlier step has already run.
//!
//! ```text
//! " 10:14:02 up 2 days, 10:05,  3 users,  load average: 0.10, 0.08, 0.01"
//!   -> "2 days, 10 hours, 5 mins"
//! ```

use regex::{Captures, Regex};

/// Returned when nothing usable is left after normalization
pub const FALLBACK: &str = "0 mins";

/// One rewrite in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Collapse whitespace runs to a single space
    CollapseWhitespace,
    /// Drop the `... up ` prefix and the users / load average tail
    StripEnds,
    /// A bare trailing `min` becomes `mins`
    PluralizeTrailingMin,
    /// `H:MM` becomes `H hours, M mins`
    ExpandClock,
    /// Remove `0 hours` / `0 mins` with their separator
    ElideZero,
    /// Make each unit agree with its count
    AgreeNumber,
    /// Trim stray commas and spaces at both ends
    TrimSeparators,
}

impl Step {
    /// Every step, in the order the pipeline applies them
    pub const PIPELINE: [Step; 7] = [
        Step::CollapseWhitespace,
        Step::StripEnds,
        Step::PluralizeTrailingMin,
        Step::ExpandClock,
        Step::ElideZero,
        Step::AgreeNumber,
        Step::TrimSeparators,
    ];
}

/// Immutable set of compiled patterns driving the pipeline
#[derive(Debug, Clone)]
pub struct UptimeNormalizer {
    whitespace: Regex,
    ends: Regex,
    clock: Regex,
    zero: Regex,
    counted: Regex,
    separators: Regex,
}

impl Default for UptimeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeNormalizer {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("static pattern"),
            ends: Regex::new(r"^.*up\s+|,\s+\d+\s+users?.*$|,\s+load averages?:.*$")
                .expect("static pattern"),
            clock: Regex::new(r"(\d+):(\d+)").expect("static pattern"),
            zero: Regex::new(r"(^|,\s+)0+\s+(hour|min)s?\b").expect("static pattern"),
            counted: Regex::new(r"(^|,\s+)(\d+)\s+(day|hour|min)s?\b").expect("static pattern"),
            separators: Regex::new(r"^[,\s]+|[,\s]+$").expect("static pattern"),
        }
    }

    /// Run the whole pipeline. Never fails; falls back to [`FALLBACK`].
    pub fn normalize(&self, raw: &str) -> String {
        let out = Step::PIPELINE
            .iter()
            .fold(raw.to_string(), |text, step| self.apply(*step, &text));

        if out.is_empty() {
            FALLBACK.to_string()
        } else {
            out
        }
    }

    /// Apply a single step to `text`
    pub fn apply(&self, step: Step, text: &str) -> String {
        match step {
            Step::CollapseWhitespace => self.whitespace.replace_all(text, " ").into_owned(),
            Step::StripEnds => self.ends.replace_all(text, "").into_owned(),
            Step::PluralizeTrailingMin => {
                if text.ends_with("min") {
                    format!("{}s", text)
                } else {
                    text.to_string()
                }
            }
            Step::ExpandClock => self
                .clock
                .replace_all(text, |caps: &Captures| {
                    format!("{} hours, {} mins", count(&caps[1]), count(&caps[2]))
                })
                .into_owned(),
            Step::ElideZero => self.zero.replace_all(text, "").into_owned(),
            Step::AgreeNumber => self
                .counted
                .replace_all(text, |caps: &Captures| {
                    let n = count(&caps[2]);
                    let plural = if n == "1" { "" } else { "s" };
                    format!("{}{} {}{}", &caps[1], n, &caps[3], plural)
                })
                .into_owned(),
            Step::TrimSeparators => self.separators.replace_all(text, "").into_owned(),
        }
    }
}

/// A captured count with leading zeros dropped. Kept as text so counts of
/// any length survive unchanged.
fn count(digits: &str) -> &str {
    match digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        UptimeNormalizer::new().normalize(raw)
    }

    #[test]
    fn test_days_and_clock() {
        assert_eq!(norm("up 2 days, 10:05, 3 users"), "2 days, 10 hours, 5 mins");
    }

    #[test]
    fn test_single_minute_stays_singular() {
        assert_eq!(norm("up 1 min"), "1 min");
    }

    #[test]
    fn test_zero_hours_elided() {
        assert_eq!(norm("up 0:05"), "5 mins");
    }

    #[test]
    fn test_empty_input_falls_back() {
        assert_eq!(norm(""), FALLBACK);
        assert_eq!(norm("   "), FALLBACK);
    }

    #[test]
    fn test_full_linux_line() {
        let raw = " 10:14:02 up 2 days, 10:05,  3 users,  load average: 0.10, 0.08, 0.01";
        assert_eq!(norm(raw), "2 days, 10 hours, 5 mins");
    }

    #[test]
    fn test_full_macos_line() {
        let raw = "10:14  up 14 days,  3:02, 2 users, load averages: 1.92 2.07 2.11";
        assert_eq!(norm(raw), "14 days, 3 hours, 2 mins");
    }

    #[test]
    fn test_minutes_only_with_users() {
        assert_eq!(norm("10:00:00 up 17 min,  1 user,  load average: 0.00"), "17 mins");
    }

    #[test]
    fn test_whole_hours_drop_minutes() {
        assert_eq!(norm("up 10:00, 1 user"), "10 hours");
    }

    #[test]
    fn test_singular_units() {
        assert_eq!(norm("up 1 day, 1:01, 1 user"), "1 day, 1 hour, 1 min");
    }

    #[test]
    fn test_day_with_only_minutes() {
        assert_eq!(norm("up 3 days, 0:42, 2 users"), "3 days, 42 mins");
    }

    #[test]
    fn test_no_users_but_load_average() {
        assert_eq!(norm("up 4:10, load average: 0.5, 0.4, 0.3"), "4 hours, 10 mins");
    }

    #[test]
    fn test_steps_in_isolation() {
        let n = UptimeNormalizer::new();
        assert_eq!(n.apply(Step::CollapseWhitespace, "a  \t b"), "a b");
        assert_eq!(n.apply(Step::StripEnds, "12:00 up 5 days, 2 users"), "5 days");
        assert_eq!(n.apply(Step::PluralizeTrailingMin, "7 min"), "7 mins");
        assert_eq!(n.apply(Step::PluralizeTrailingMin, "7 mins"), "7 mins");
        assert_eq!(n.apply(Step::ExpandClock, "08:07"), "8 hours, 7 mins");
        assert_eq!(n.apply(Step::ElideZero, "2 days, 0 hours, 5 mins"), "2 days, 5 mins");
        assert_eq!(n.apply(Step::ElideZero, "0 hours, 5 mins"), ", 5 mins");
        assert_eq!(n.apply(Step::AgreeNumber, "1 hours, 12 min"), "1 hour, 12 mins");
        assert_eq!(n.apply(Step::TrimSeparators, ", 5 mins, "), "5 mins");
    }

    #[test]
    fn test_zero_elision_does_not_touch_tens() {
        let n = UptimeNormalizer::new();
        assert_eq!(n.apply(Step::ElideZero, "10 hours, 20 mins"), "10 hours, 20 mins");
    }

    #[test]
    fn test_counts_drop_leading_zeros() {
        let n = UptimeNormalizer::new();
        assert_eq!(n.apply(Step::ExpandClock, "007:05"), "7 hours, 5 mins");
        assert_eq!(n.apply(Step::ExpandClock, "00:00"), "0 hours, 0 mins");
        assert_eq!(n.apply(Step::AgreeNumber, "01 days"), "1 day");
    }

    #[test]
    fn test_huge_counts_are_not_lost() {
        let n = UptimeNormalizer::new();
        let huge = "99999999999999999999";
        assert_eq!(
            n.apply(Step::AgreeNumber, &format!("{} day", huge)),
            format!("{} days", huge)
        );
        assert_eq!(
            n.normalize(&format!("up {} days, 0:05", huge)),
            format!("{} days, 5 mins", huge)
        );
        assert_eq!(
            n.apply(Step::ExpandClock, &format!("{}:05", huge)),
            format!("{} hours, 5 mins", huge)
        );
    }

    #[test]
    fn test_pipeline_order() {
        assert_eq!(Step::PIPELINE.first(), Some(&Step::CollapseWhitespace));
        assert_eq!(Step::PIPELINE.last(), Some(&Step::TrimSeparators));
        let expand = Step::PIPELINE.iter().position(|s| *s == Step::ExpandClock);
        let agree = Step::PIPELINE.iter().position(|s| *s == Step::AgreeNumber);
        assert!(expand < agree);
    }
}
