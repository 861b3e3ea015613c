//! Storage naming policy
//!
//! Stored files are named `{participant}_{YYYYmmdd_HHMMSS}.ipynb` for notebooks
//! and `{participant}_{YYYYmmdd_HHMMSS}_{original}` when the client supplied a
//! filename. The timestamp has second resolution: two uploads from the same
//! participant with the same original name within one second map to the same
//! filename and the later write replaces the earlier one. That collision is not
//! detected.
//!
//! Both client-supplied parts are reduced to a bare filename component first, so
//! a derived name can never contain a path separator. The whole name is kept
//! within [`MAX_FILENAME_LENGTH`] bytes by shortening those two parts.

use chrono::NaiveDateTime;

use crate::constants::{
    FALLBACK_FILENAME, NOTEBOOK_EXTENSION, TIMESTAMP_FORMAT, UNKNOWN_PARTICIPANT,
};

const MAX_COMPONENT_LENGTH: usize = 255;

/// Longest derived name, in bytes (the usual filesystem `NAME_MAX`).
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Extensions longer than this are not preserved when the original name is shortened.
const MAX_PRESERVED_EXTENSION: usize = 16;

/// Reduce client input to a single safe filename component.
///
/// Keeps only the last path segment (`/` and `\` both separate), replaces any
/// character outside `[A-Za-z0-9._-]` with `_` and shortens the result to 255
/// characters, keeping a short extension. Returns `None` when nothing usable
/// remains (empty, or only dots).
pub fn sanitize_component(input: &str) -> Option<String> {
    let last_segment = input
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(input);

    let sanitized: String = last_segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = shorten_keeping_extension(sanitized, MAX_COMPONENT_LENGTH);

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return None;
    }

    Some(sanitized)
}

/// Derive the storage filename for an upload received at `at`.
pub fn storage_filename(
    participant_id: &str,
    at: NaiveDateTime,
    original_filename: Option<&str>,
) -> String {
    let participant =
        sanitize_component(participant_id).unwrap_or_else(|| UNKNOWN_PARTICIPANT.to_string());
    let timestamp = at.format(TIMESTAMP_FORMAT).to_string();

    match original_filename {
        Some(original) => {
            let original =
                sanitize_component(original).unwrap_or_else(|| FALLBACK_FILENAME.to_string());
            // `{participant}_{timestamp}_{original}`
            let budget = MAX_FILENAME_LENGTH - timestamp.len() - 2;
            let (participant, original) = fit_parts(participant, original, budget);
            format!("{}_{}_{}", participant, timestamp, original)
        }
        None => {
            // `{participant}_{timestamp}.ipynb`
            let budget = MAX_FILENAME_LENGTH - timestamp.len() - NOTEBOOK_EXTENSION.len() - 2;
            let mut participant = participant;
            participant.truncate(budget);
            format!("{}_{}.{}", participant, timestamp, NOTEBOOK_EXTENSION)
        }
    }
}

/// Shorten `participant` and `original` so together they fit in `budget` bytes.
///
/// The participant keeps at most half the budget when both are long. The
/// original name keeps its extension. Both inputs are sanitized, so ASCII.
fn fit_parts(mut participant: String, original: String, budget: usize) -> (String, String) {
    if participant.len() + original.len() <= budget {
        return (participant, original);
    }

    let participant_len = participant
        .len()
        .min(budget.saturating_sub(original.len()).max(budget / 2));
    participant.truncate(participant_len);

    let original_len = budget - participant_len;
    (participant, shorten_keeping_extension(original, original_len))
}

fn shorten_keeping_extension(mut name: String, max_len: usize) -> String {
    if name.len() <= max_len {
        return name;
    }

    match name.rfind('.') {
        Some(dot)
            if dot > 0
                && name.len() - dot <= MAX_PRESERVED_EXTENSION
                && name.len() - dot < max_len =>
        {
            let extension = name.split_off(dot);
            name.truncate(max_len - extension.len());
            name.push_str(&extension);
            name
        }
        _ => {
            name.truncate(max_len);
            name
        }
    }
}
