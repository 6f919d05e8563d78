use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, ExtractError, SkipReason};

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bid:\s*'([^']+)'").unwrap());

pub const DEFAULT_ANCHOR: &str = "const assignWorkoutTemplate";
pub const DEFAULT_RECORD_OPENING: &str = "return {";
pub const DEFAULT_LOOKBACK: usize = 5000;
pub const DEFAULT_FORWARD: usize = 20000;

/// Text believed to hold exactly one record literal.
/// Offsets are byte offsets into the full source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecordSpan<'s> {
    pub start: usize,
    pub end: usize,
    pub text: &'s str,
    /// Brace depth never returned to zero inside the forward window.
    pub truncated: bool,
}

/// One discovered identifier with a span (or why none was found) for each
/// of its assignments, last assignment first.
#[derive(Debug, Clone)]
pub struct Candidate<'s> {
    pub id: String,
    pub spans: Vec<Result<RawRecordSpan<'s>, SkipReason>>,
}

impl Candidate<'_> {
    /// How many `id:` assignments carried this identifier.
    pub fn occurrences(&self) -> usize {
        self.spans.len()
    }
}

#[derive(Debug, Clone)]
pub struct Locator {
    anchor: String,
    opening: Regex,
    lookback: usize,
    forward: usize,
}

impl Default for Locator {
    fn default() -> Self {
        Locator::new(DEFAULT_ANCHOR, DEFAULT_RECORD_OPENING, DEFAULT_LOOKBACK, DEFAULT_FORWARD)
            .unwrap()
    }
}

impl Locator {
    /// `record_opening` is matched whitespace-tolerantly and must end in `{`.
    pub fn new(
        anchor: &str,
        record_opening: &str,
        lookback: usize,
        forward: usize,
    ) -> Result<Self, ConfigError> {
        if !record_opening.trim_end().ends_with('{') {
            return Err(ConfigError::InvalidOpening(record_opening.to_string()));
        }
        Ok(Locator {
            anchor: anchor.to_string(),
            opening: opening_regex(record_opening)?,
            lookback,
            forward,
        })
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Everything after the first `{` following the anchor, with its offset.
    pub fn search_space<'s>(&self, source: &'s str) -> Option<(usize, &'s str)> {
        let anchor_at = source.find(&self.anchor)?;
        let after_anchor = anchor_at + self.anchor.len();
        let body = after_anchor + source[after_anchor..].find('{')? + 1;
        Some((body, &source[body..]))
    }

    /// Find every distinct identifier after the anchor and recover the span of
    /// each of its assignments. Candidates come back sorted by identifier.
    pub fn locate<'s>(&self, source: &'s str) -> Result<Vec<Candidate<'s>>, ExtractError> {
        let (base, space) = self.search_space(source).ok_or_else(|| ExtractError::AnchorNotFound {
            anchor: self.anchor.clone(),
        })?;

        let candidates = find_ids(space)
            .into_iter()
            .map(|(id, sites)| {
                let spans = sites
                    .into_iter()
                    .rev()
                    .map(|at| {
                        self.span_before(space, at).map(|mut span| {
                            span.start += base;
                            span.end += base;
                            span
                        })
                    })
                    .collect();
                Candidate { id, spans }
            })
            .collect();

        Ok(candidates)
    }

    /// Walk back from an `id:` assignment to the nearest record opening,
    /// then forward to its matching close brace.
    fn span_before<'s>(&self, space: &'s str, id_at: usize) -> Result<RawRecordSpan<'s>, SkipReason> {
        let window_start = floor_boundary(space, id_at.saturating_sub(self.lookback));
        let window = &space[window_start..id_at];
        let opening = self
            .opening
            .find_iter(window)
            .last()
            .ok_or(SkipReason::NoOpeningToken)?;

        let start = window_start + opening.start();
        // The opening pattern ends in `{`, so the scan starts on that brace.
        let brace = window_start + opening.end() - 1;

        let (end, truncated) = match balanced_end(space.as_bytes(), brace, self.forward) {
            Some(end) => (end, false),
            None => {
                let end = floor_boundary(space, brace.saturating_add(self.forward));
                debug!(start, end, "record span not closed inside forward window, truncating");
                (end, true)
            }
        };
        // The opening found belongs to an earlier literal that is already closed.
        if id_at >= end {
            return Err(SkipReason::IdOutsideSpan);
        }

        Ok(RawRecordSpan {
            start,
            end,
            text: &space[start..end],
            truncated,
        })
    }
}

/// Distinct identifiers with the positions of all their assignments, in
/// source order.
fn find_ids(space: &str) -> BTreeMap<String, Vec<usize>> {
    let mut ids: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for caps in ID_RE.captures_iter(space) {
        let at = caps.get(0).map_or(0, |m| m.start());
        ids.entry(caps[1].to_string()).or_default().push(at);
    }
    ids
}

/// Byte index just past the brace that closes the one at `open`, or None if
/// the depth never returns to zero within `limit` bytes. Braces inside
/// quoted strings are ignored; a quote preceded by a backslash is escaped.
pub fn balanced_end(bytes: &[u8], open: usize, limit: usize) -> Option<usize> {
    let stop = open.saturating_add(limit).min(bytes.len());
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes[..stop].iter().enumerate().skip(open) {
        if matches!(b, b'\'' | b'"' | b'`') && (i == 0 || bytes[i - 1] != b'\\') {
            match quote {
                None => quote = Some(b),
                Some(q) if q == b => quote = None,
                Some(_) => {}
            }
            continue;
        }
        if quote.is_some() {
            continue;
        }
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn opening_regex(record_opening: &str) -> Result<Regex, regex::Error> {
    let pattern = record_opening
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*");
    Regex::new(&pattern)
}

fn floor_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
