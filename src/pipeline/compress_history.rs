use crate::data::history::OutputRevision;
use crate::errors::{Error, Result};

/// Collapse the revision history of one element.
///
/// Revisions repeating the `(visible, tags)` state of the previous kept revision
/// are removed. Returns `None` when no revision is visible with at least one of
/// the tracked tags, since such elements are left out of the output.
pub fn compress_history(mut revisions: Vec<OutputRevision>) -> Result<Option<Vec<OutputRevision>>> {
    // dedup_by hands us (current, previously kept)
    revisions.dedup_by(|current, kept| current.has_same_state(kept));

    if revisions.is_empty() {
        return Err(Error::internal("got empty compressed revision history"));
    }
    if !revisions.iter().any(OutputRevision::is_visible_with_tags) {
        return Ok(None);
    }
    Ok(Some(revisions))
}
