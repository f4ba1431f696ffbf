// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, time::Duration};

/// Displays a duration as seconds with at most three decimal places and no trailing zeros, e.g.
/// `1.2` or `0.005`.
pub(crate) struct DisplaySeconds(pub(crate) Duration);

impl fmt::Display for DisplaySeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = format!("{:.3}", self.0.as_secs_f64());
        let s = s.trim_end_matches('0').trim_end_matches('.');
        f.write_str(s)
    }
}

/// Returns "s" if `count` calls for a plural.
pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Duration::from_millis(1200), "1.2" ; "one decimal")]
    #[test_case(Duration::from_millis(500), "0.5" ; "sub-second")]
    #[test_case(Duration::from_secs(3), "3" ; "whole seconds")]
    #[test_case(Duration::from_micros(4_999_600), "5" ; "rounds up")]
    #[test_case(Duration::from_millis(5), "0.005" ; "milliseconds")]
    #[test_case(Duration::ZERO, "0" ; "zero")]
    fn display_seconds(duration: Duration, expected: &str) {
        assert_eq!(DisplaySeconds(duration).to_string(), expected);
    }
}
