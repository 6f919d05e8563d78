use std::sync::LazyLock;

use regex::Regex;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bname:\s*'([^']+)'").unwrap());
static DAYS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bdays:\s*(\d+)").unwrap());
static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdescription:\s*'([^']+)'").unwrap());
static FOCUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bfocus:\s*'([^']+)'").unwrap());

pub fn name(span: &str) -> Option<String> {
    quoted(&NAME_RE, span)
}

pub fn description(span: &str) -> Option<String> {
    quoted(&DESCRIPTION_RE, span)
}

pub fn focus(span: &str) -> Option<String> {
    quoted(&FOCUS_RE, span)
}

/// First `<field>: '<value>'` in the span. Empty strings never match.
fn quoted(re: &Regex, span: &str) -> Option<String> {
    re.captures(span).map(|caps| caps[1].to_string())
}

/// First `days: <digits>`. Zero and values that overflow count as missing.
pub fn days(span: &str) -> Option<u32> {
    let caps = DAYS_RE.captures(span)?;
    caps[1].parse::<u32>().ok().filter(|&d| d > 0)
}
