use crate::data::history::OutputRevision;
use crate::data::osm::RawElement;

/// Reduce a revision to the tags we track.
///
/// Each tag present on the element is written as `"<i>:<value>"`, where `i` is
/// the hexadecimal position of the tag in `tags_to_extract`. The output follows
/// the order of `tags_to_extract`. A deleted revision is normalised to carry no
/// tags, even if the input attached some to it.
pub fn extract_tags(tags_to_extract: &[String], element: &RawElement) -> OutputRevision {
    let tags = if element.visible && !element.tags.is_empty() {
        tags_to_extract
            .iter()
            .enumerate()
            .filter_map(|(idx, key)| {
                element
                    .tags
                    .get(key)
                    .map(|value| format!("{:x}:{}", idx, value))
            })
            .collect()
    } else {
        Vec::new()
    };

    OutputRevision {
        tid: element.tid().to_string(),
        version: element.version,
        visible: element.visible,
        ts: element.timestamp,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::data::osm::ElementKind;

    fn tag_list(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn node(visible: bool, tags: &[(&str, &str)]) -> RawElement {
        RawElement {
            kind: ElementKind::Node,
            id: 42,
            version: 3,
            timestamp: 1000,
            visible,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn uses_index_of_tag_in_list() {
        let revision = extract_tags(&tag_list(&["k1", "k2", "k3"]), &node(true, &[("k2", "x")]));
        assert_eq!(revision.tags, vec!["1:x"]);
        assert_eq!(revision.tid, "N42");
        assert_eq!((revision.version, revision.ts, revision.visible), (3, 1000, true));
    }

    #[test]
    fn follows_tag_list_order_and_skips_other_tags() {
        let revision = extract_tags(
            &tag_list(&["shop", "name", "amenity"]),
            &node(true, &[("amenity", "cafe"), ("building", "yes"), ("shop", "bakery")]),
        );
        assert_eq!(revision.tags, vec!["0:bakery", "2:cafe"]);
    }

    #[test]
    fn index_is_hexadecimal() {
        let tags: Vec<String> = (0..12).map(|i| format!("k{}", i)).collect();
        let revision = extract_tags(&tags, &node(true, &[("k10", "a"), ("k11", "b")]));
        assert_eq!(revision.tags, vec!["a:a", "b:b"]);
    }

    #[test]
    fn no_tags_gives_empty_output() {
        let revision = extract_tags(&tag_list(&["amenity"]), &node(true, &[]));
        assert!(revision.tags.is_empty());
    }

    #[test]
    fn deleted_revision_gives_empty_output() {
        let revision = extract_tags(&tag_list(&["amenity"]), &node(false, &[("amenity", "pub")]));
        assert!(revision.tags.is_empty());
        assert!(!revision.visible);
    }
}
