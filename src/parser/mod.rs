pub mod extract;
pub mod locator;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, SkipReason};
use crate::store::{ProgramRecord, ProgramSet};
use locator::{Candidate, Locator};

/// Result of one run: the programs plus what was dropped along the way.
#[derive(Debug, Default)]
pub struct Extraction {
    pub programs: ProgramSet,
    pub skipped: Vec<(String, SkipReason)>,
    /// Identifiers assigned more than once, with their assignment count.
    pub duplicates: Vec<(String, usize)>,
}

/// Two-pass pipeline: source → record spans → programs.
/// Per-record failures are logged and skipped; only a missing anchor or an
/// empty result fails the run.
pub fn extract_programs(source: &str, locator: &Locator) -> Result<Extraction, ExtractError> {
    let candidates = locator.locate(source).inspect_err(|e| warn!("{}", e))?;

    info!(
        "Found {} program IDs: [{}]",
        candidates.len(),
        candidates.iter().map(|c| c.id.as_str()).join(", ")
    );

    for c in &candidates {
        for span in c.spans.iter().flatten() {
            debug!(
                id = %c.id,
                start = span.start,
                end = span.end,
                truncated = span.truncated,
                "located record span"
            );
        }
    }

    let results: Vec<(String, usize, Result<ProgramRecord, SkipReason>)> = candidates
        .par_iter()
        .map(|c| (c.id.clone(), c.occurrences(), extract_candidate(c)))
        .collect();

    let mut out = Extraction::default();
    for (id, occurrences, record) in results {
        if occurrences > 1 {
            warn!(
                "{} is defined {} times, keeping the last complete definition",
                id, occurrences
            );
            out.duplicates.push((id.clone(), occurrences));
        }
        match record {
            Ok(program) => {
                info!("[OK] Extracted {}: {}", id, program.name);
                out.programs.insert(id, program);
            }
            Err(reason) => {
                warn!("Skipping {}: {}", id, reason);
                out.skipped.push((id, reason));
            }
        }
    }

    if out.programs.is_empty() {
        return Err(ExtractError::NoRecords {
            candidates: out.skipped.len(),
        });
    }

    Ok(out)
}

/// Try each definition, last first. When none is usable, report why the last
/// one failed.
fn extract_candidate(c: &Candidate<'_>) -> Result<ProgramRecord, SkipReason> {
    let mut last_failure = None;
    for span in &c.spans {
        let record = span
            .as_ref()
            .map_err(|reason| *reason)
            .and_then(|span| extract::extract(&c.id, span.text));
        match record {
            Ok(program) => return Ok(program),
            Err(reason) => {
                debug!(id = %c.id, %reason, "definition unusable, trying an earlier one");
                last_failure.get_or_insert(reason);
            }
        }
    }
    Err(last_failure.unwrap_or(SkipReason::NoOpeningToken))
}

// ── Tests ──
