//! Parse a focality score off a flex-search log line, ported from
//! `parse_sweep_line` in the reference implementation.

use regex::Regex;
use std::sync::OnceLock;

static PRIMARY: OnceLock<Regex> = OnceLock::new();
static FALLBACK: OnceLock<Regex> = OnceLock::new();

fn primary() -> &'static Regex {
    PRIMARY.get_or_init(|| Regex::new(r"(?i)Final goal function value:\s*([+-]?[0-9.eE+-]+)").unwrap())
}

fn fallback() -> &'static Regex {
    FALLBACK.get_or_init(|| Regex::new(r"(?i)Goal function value[^:]*:\s*([+-]?[0-9.eE+-]+)").unwrap())
}

/// Extract a goal-function value from one log line. Tries the "Final
/// goal function value" form first, then falls back to any "Goal
/// function value...:" form. Returns `None` if neither matches or the
/// captured text does not parse as a float.
pub fn parse_sweep_line(line: &str) -> Option<f64> {
    let captured = primary()
        .captures(line)
        .or_else(|| fallback().captures(line))?;
    captured.get(1)?.as_str().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_final_goal_function_value() {
        let line = "2026-01-01 [flex] Final goal function value: 0.1234";
        assert_eq!(parse_sweep_line(line), Some(0.1234));
    }

    #[test]
    fn parses_case_insensitively() {
        let line = "FINAL GOAL FUNCTION VALUE: -1.5e-3";
        assert_eq!(parse_sweep_line(line), Some(-1.5e-3));
    }

    #[test]
    fn falls_back_to_generic_goal_function_value() {
        let line = "Best goal function value so far: 3.14";
        assert_eq!(parse_sweep_line(line), Some(3.14));
    }

    #[test]
    fn returns_none_when_neither_pattern_matches() {
        let line = "no relevant content here";
        assert_eq!(parse_sweep_line(line), None);
    }

    #[test]
    fn prefers_final_over_fallback_when_both_present() {
        let line = "Goal function value running: 9.0 ... Final goal function value: 2.0";
        assert_eq!(parse_sweep_line(line), Some(2.0));
    }
}
