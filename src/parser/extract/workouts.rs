use std::sync::LazyLock;

use regex::Regex;

use crate::store::Workouts;

// Body of `workouts: { ... }`, allowing one level of inner `{...}`.
static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bworkouts:\s*\{([^{}]*(?:\{[^{}]*\}[^{}]*)*)\}").unwrap()
});
static DAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)'([^']+)':\s*\[(.*?)\]").unwrap());
static EXERCISE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']+)'").unwrap());

/// Text between the braces of the `workouts` mapping.
pub fn region(span: &str) -> Option<&str> {
    REGION_RE
        .captures(span)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Every `'<day>': [ ... ]` pair in source order. A repeated day label keeps
/// its first position and takes the later list.
pub fn parse_days(region: &str) -> Workouts {
    let mut workouts = Workouts::new();
    for caps in DAY_RE.captures_iter(region) {
        let exercises = EXERCISE_RE
            .captures_iter(&caps[2])
            .map(|c| c[1].to_string())
            .collect();
        workouts.insert(caps[1].to_string(), exercises);
    }
    workouts
}

pub fn extract(span: &str) -> Option<Workouts> {
    region(span).map(parse_days)
}
