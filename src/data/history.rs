use serde::Serialize;

use crate::errors::{Error, Result};

/// Extracted state of one element revision, restricted to the tracked tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRevision {
    /// Type+Id: "N1233" (for node), "W444121" (for way), "R12928" (for relation)
    pub tid: String,
    pub version: u32,
    pub visible: bool,
    /// Seconds since 1.1.1970.
    pub ts: u64,
    /// `"<hex index>:<value>"` for each tracked tag present, in tag list order.
    /// Empty when no tracked tag is set or the revision is a deletion.
    pub tags: Vec<String>,
}

impl OutputRevision {
    pub fn has_same_state(&self, other: &OutputRevision) -> bool {
        self.visible == other.visible && self.tags == other.tags
    }

    pub fn is_visible_with_tags(&self) -> bool {
        self.visible && !self.tags.is_empty()
    }
}

/// `[ts, version, visible (0 or 1), tags]`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry(pub u64, pub u32, pub u8, pub Vec<String>);

/// One output line: `[tid, [entry, ...]]`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine(pub String, pub Vec<HistoryEntry>);

impl TryFrom<Vec<OutputRevision>> for HistoryLine {
    type Error = Error;

    fn try_from(revisions: Vec<OutputRevision>) -> Result<Self> {
        let tid = match revisions.first() {
            Some(first) => first.tid.clone(),
            None => return Err(Error::internal("no revisions to output")),
        };
        if let Some(stray) = revisions.iter().find(|r| r.tid != tid) {
            return Err(Error::internal(format!(
                "history contains multiple tids: {} and {}",
                tid, stray.tid
            )));
        }

        let entries = revisions
            .into_iter()
            .map(|r| HistoryEntry(r.ts, r.version, u8::from(r.visible), r.tags))
            .collect();
        Ok(HistoryLine(tid, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn rev(tid: &str, version: u32, visible: bool, ts: u64, tags: &[&str]) -> OutputRevision {
        OutputRevision {
            tid: tid.to_string(),
            version,
            visible,
            ts,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn formats_history_as_json_arrays() {
        let line = HistoryLine::try_from(vec![
            rev("N99", 1, true, 10000, &["0:a"]),
            rev("N99", 2, true, 10001, &["0:b", "2:c"]),
            rev("N99", 10, true, 10002, &[]),
            rev("N99", 11, false, 10003, &[]),
        ])
        .unwrap();

        let json = serde_json::to_value(&line).unwrap();
        let expected = serde_json::json!(["N99", [
            [10000, 1, 1, ["0:a"]],
            [10001, 2, 1, ["0:b", "2:c"]],
            [10002, 10, 1, []],
            [10003, 11, 0, []],
        ]]);
        assert_eq!(json, expected);
    }

    #[test]
    fn rejects_empty_batch() {
        let err = HistoryLine::try_from(Vec::new()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InternalInconsistency));
    }

    #[test]
    fn rejects_mixed_tids() {
        let err = HistoryLine::try_from(vec![
            rev("N1", 1, true, 1, &["0:a"]),
            rev("W1", 1, true, 1, &["0:a"]),
        ])
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InternalInconsistency));
        assert!(err.message.contains("multiple tids"));
    }

    #[test]
    fn state_ignores_version_and_timestamp() {
        let a = rev("N1", 1, true, 5, &["0:a"]);
        let b = rev("N1", 2, true, 9, &["0:a"]);
        let c = rev("N1", 3, false, 9, &["0:a"]);
        assert!(a.has_same_state(&b));
        assert!(!b.has_same_state(&c));
    }
}
