use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::DateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::data::osm::{ElementKind, RawElement};
use crate::errors::{Error, Result};

/// Streams element revisions out of an OSM XML (full-history) export.
///
/// Every call to `next` yields an owned `RawElement`; nothing borrows from the
/// XML buffer across calls. Revisions come out in file order, no sorting is done.
pub struct OsmHistoryReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending: Option<RawElement>,
    finished: bool,
}

impl OsmHistoryReader<Box<dyn BufRead>> {
    /// Open an export on disk. Files ending in `.xz` are decompressed on the fly.
    pub fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .map_err(|err| Error::reader(format!("Could not open {}: {}", path.display(), err)))?;
        let file_reader = BufReader::new(file);

        let input: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "xz") {
            let xz_reader = XzDecoder::new(file_reader);
            Box::new(BufReader::new(xz_reader))
        } else {
            Box::new(file_reader)
        };
        Ok(OsmHistoryReader::new(input))
    }
}

impl<R: BufRead> OsmHistoryReader<R> {
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.trim_text(true);

        OsmHistoryReader {
            reader,
            buf: Vec::new(),
            pending: None,
            finished: false,
        }
    }

    fn parse_element(kind: ElementKind, el: &BytesStart) -> Result<RawElement> {
        let mut id: Option<u64> = None;
        let mut version: Option<u32> = None;
        let mut timestamp: Option<u64> = None;
        let mut visible: Option<bool> = None;

        for attribute_res in el.attributes() {
            let attribute = attribute_res?;
            match attribute.key.as_ref() {
                b"id" => id = Some(attribute.unescape_value()?.parse()?),
                b"version" => version = Some(attribute.unescape_value()?.parse()?),
                b"timestamp" => {
                    let value = attribute.unescape_value()?;
                    let seconds = DateTime::parse_from_rfc3339(&value)?.timestamp();
                    timestamp = Some(u64::try_from(seconds)?);
                },
                b"visible" => {
                    visible = match &*attribute.unescape_value()? {
                        "true" => Some(true),
                        "false" => Some(false),
                        other => return Err(Error::reader(format!("Invalid visible flag {:?}", other))),
                    };
                },
                // changeset, user, uid, lat, lon, ...
                _ => (),
            }
        }

        let missing = |attribute: &str| {
            Error::reader(format!("{:?} element without '{}' attribute (id {:?})", kind, attribute, id))
        };
        Ok(RawElement {
            kind,
            version: version.ok_or_else(|| missing("version"))?,
            timestamp: timestamp.ok_or_else(|| missing("timestamp"))?,
            visible: visible.ok_or_else(|| missing("visible"))?,
            id: id.ok_or_else(|| missing("id"))?,
            tags: HashMap::new(),
        })
    }

    fn parse_tag(el: &BytesStart) -> Result<(String, String)> {
        let mut key: Option<String> = None;
        let mut value: Option<String> = None;

        for attribute_res in el.attributes() {
            let attribute = attribute_res?;
            match attribute.key.as_ref() {
                b"k" => key = Some(attribute.unescape_value()?.into_owned()),
                b"v" => value = Some(attribute.unescape_value()?.into_owned()),
                _ => (),
            }
        }

        match (key, value) {
            (Some(key), Some(value)) => Ok((key, value)),
            _ => Err(Error::reader("tag without 'k' or 'v' attribute")),
        }
    }

    fn ensure_not_nested(pending: &Option<RawElement>, kind: ElementKind) -> Result<()> {
        match pending {
            Some(open) => Err(Error::reader(format!(
                "{:?} nested inside {:?} {}", kind, open.kind, open.id
            ))),
            None => Ok(()),
        }
    }

    fn read_element(&mut self) -> Result<Option<RawElement>> {
        loop {
            // if we don't keep a borrow elsewhere, we can clear the buffer to keep memory usage low
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Eof => {
                    return match self.pending.take() {
                        Some(open) => Err(Error::reader(format!(
                            "Unexpected end of file inside {:?} {}", open.kind, open.id
                        ))),
                        None => Ok(None),
                    };
                },
                Event::Start(e) => {
                    if let Some(kind) = ElementKind::from_tag_name(e.name().as_ref()) {
                        Self::ensure_not_nested(&self.pending, kind)?;
                        self.pending = Some(Self::parse_element(kind, &e)?);
                    }
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"tag" => {
                        if let Some(open) = self.pending.as_mut() {
                            let (key, value) = Self::parse_tag(&e)?;
                            open.tags.insert(key, value);
                        }
                    },
                    name => {
                        if let Some(kind) = ElementKind::from_tag_name(name) {
                            Self::ensure_not_nested(&self.pending, kind)?;
                            return Ok(Some(Self::parse_element(kind, &e)?));
                        }
                    },
                },
                Event::End(e) => {
                    if ElementKind::from_tag_name(e.name().as_ref()).is_some() {
                        return match self.pending.take() {
                            Some(element) => Ok(Some(element)),
                            None => Err(Error::reader("Closing tag without open element")),
                        };
                    }
                },
                // <osm>, <bounds>, <nd>, <member>, declarations and comments carry no revision data
                _ => (),
            }
        }
    }
}

impl<R: BufRead> Iterator for OsmHistoryReader<R> {
    type Item = Result<RawElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_element() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.finished = true;
                None
            },
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            },
        }
    }
}
