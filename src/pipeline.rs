//! The tag history pipeline: order check, grouping of revisions per element,
//! tag extraction and history compression, as one lazy pass over the input.

pub mod compress_history;
pub mod extract_tags;

use crate::data::history::HistoryLine;
use crate::data::osm::RawElement;
use crate::errors::Result;
use crate::stream::StreamExt;

use self::compress_history::compress_history;
use self::extract_tags::extract_tags;

/// Turn a stream of element revisions into output lines, one per element that
/// ever had a tracked tag while visible.
///
/// Nothing is pulled from `elements` until the returned iterator is polled.
/// Errors from the reader and ordering violations come out as `Err` items.
pub fn tag_history_lines<I>(elements: I, tags_to_extract: Vec<String>) -> impl Iterator<Item = Result<HistoryLine>>
where
    I: Iterator<Item = Result<RawElement>>,
{
    elements
        .guard_order()
        .group_consecutive_by(|element: &RawElement| Ok(element.tid()))
        .filter_map(move |group| {
            let revisions = match group {
                Ok(group) => group
                    .iter()
                    .map(|element| extract_tags(&tags_to_extract, element))
                    .collect(),
                Err(err) => return Some(Err(err)),
            };
            match compress_history(revisions) {
                Ok(Some(history)) => Some(HistoryLine::try_from(history)),
                Ok(None) => None,
                Err(err) => Some(Err(err)),
            }
        })
}
