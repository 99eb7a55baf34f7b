use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/tag_history.json";

#[derive(Deserialize, Debug)]
pub struct UserConfig {
    /// OSM full-history export (.osm/.osh XML, optionally .xz compressed).
    pub input_path: String,
    /// Destination of the JSONL tag history.
    pub output_path: String,
    /// Tags to track, given as a comma separated list, e.g. `"amenity,shop"`.
    /// Output refers to tags by their position in this list.
    #[serde(deserialize_with = "tag_list::deserialize")]
    pub tags: Vec<String>,
    /// Remove an existing output file instead of reusing it.
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let file = File::open(path)
        .map_err(|err| Error::config(format!("Could not open config file {}: {}", path.display(), err)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| Error::config(format!("Could not parse config {}: {}", path.display(), err)))
}

/// Split a comma separated tag list. Entries are trimmed; the list must be
/// non-empty and free of blank or repeated entries.
pub fn parse_tag_list(tags: &str) -> std::result::Result<Vec<String>, String> {
    let mut parsed: Vec<String> = Vec::new();
    for tag in tags.split(',').map(str::trim) {
        if tag.is_empty() {
            return Err(format!("blank entry in tag list {:?}", tags));
        }
        if parsed.iter().any(|seen| seen == tag) {
            return Err(format!("tag {:?} listed more than once", tag));
        }
        parsed.push(tag.to_string());
    }
    Ok(parsed)
}

mod tag_list {
    use serde::de::Visitor;
    use serde::{de, Deserializer};

    use super::parse_tag_list;

    struct TagListVisitor;

    impl<'de> Visitor<'de> for TagListVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(formatter, "a comma separated list of distinct tag names")
        }

        fn visit_str<E>(self, string: &str) -> Result<Self::Value, E> where E: de::Error {
            parse_tag_list(string).map_err(|message| {
                de::Error::custom(format!("invalid tag list: {}", message))
            })
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
        where D: Deserializer<'de> {
        deserializer.deserialize_str(TagListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn splits_and_trims_tags() {
        assert_eq!(
            parse_tag_list("amenity, shop ,leisure").unwrap(),
            vec!["amenity", "shop", "leisure"]
        );
        assert_eq!(parse_tag_list("k1").unwrap(), vec!["k1"]);
    }

    #[test]
    fn rejects_blank_and_repeated_tags() {
        assert!(parse_tag_list("").is_err());
        assert!(parse_tag_list("amenity,,shop").is_err());
        assert!(parse_tag_list("amenity, ").is_err());
        assert!(parse_tag_list("amenity,shop,amenity").is_err());
    }

    #[test]
    fn reads_config_with_defaults() {
        let config: UserConfig = serde_json::from_str(
            r#"{"input_path": "in.osh.xz", "output_path": "out.jsonl", "tags": "k1,k2,k3"}"#,
        )
        .unwrap();
        assert_eq!(config.tags, vec!["k1", "k2", "k3"]);
        assert!(!config.overwrite);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn rejects_invalid_tag_list_in_config() {
        let result: serde_json::Result<UserConfig> = serde_json::from_str(
            r#"{"input_path": "a", "output_path": "b", "tags": "k1,k1"}"#,
        );
        assert!(result.unwrap_err().to_string().contains("invalid tag list"));
    }

    #[test]
    fn load_errors_are_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"input_path": "a"}"#).unwrap();
        let err = load_user_config(file.path()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config));

        let err = load_user_config(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config));
    }
}
