use std::{fmt, io, num::{ParseIntError, TryFromIntError}};
use quick_xml::events::attributes::AttrError;

use crate::data::osm::RawElement;

#[derive(Debug)]
pub enum ErrorKind {
    /// Element revisions did not arrive in node/way/relation, id, version order.
    OrderingViolation {
        last_accepted: Option<Box<RawElement>>,
        offending: Box<RawElement>,
    },
    /// An invariant the pipeline itself maintains was broken.
    InternalInconsistency,
    /// The OSM reader failed to decode its input.
    Reader,
    /// Writing the output failed.
    Sink,
    Config,
    Other,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::OrderingViolation { .. } => "ordering_violation",
            ErrorKind::InternalInconsistency => "internal_inconsistency",
            ErrorKind::Reader => "reader",
            ErrorKind::Sink => "sink",
            ErrorKind::Config => "config",
            ErrorKind::Other => "other",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    fn new(kind: ErrorKind, message: impl fmt::Display) -> Error {
        Error {
            kind,
            message: message.to_string(),
        }
    }

    /// `last_accepted` is `None` when the very first element was rejected.
    pub fn ordering_violation(last_accepted: Option<RawElement>, offending: RawElement) -> Error {
        let message = match &last_accepted {
            Some(last) => format!("Elements out of order: {:?} -> {:?}", last, offending),
            None => format!("Elements out of order: first element is not a node: {:?}", offending),
        };
        Error {
            kind: ErrorKind::OrderingViolation {
                last_accepted: last_accepted.map(Box::new),
                offending: Box::new(offending),
            },
            message,
        }
    }

    pub fn internal(message: impl fmt::Display) -> Error {
        Error::new(ErrorKind::InternalInconsistency, format!("Internal error: {}", message))
    }

    pub fn reader(message: impl fmt::Display) -> Error {
        Error::new(ErrorKind::Reader, message)
    }

    pub fn sink(message: impl fmt::Display) -> Error {
        Error::new(ErrorKind::Sink, message)
    }

    pub fn config(message: impl fmt::Display) -> Error {
        Error::new(ErrorKind::Config, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind.name(), self.message)
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::new(ErrorKind::Other, value)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(value: quick_xml::Error) -> Self {
        Error::reader(value)
    }
}

impl From<AttrError> for Error {
    fn from(value: AttrError) -> Self {
        Error::reader(value)
    }
}

impl From<ParseIntError> for Error {
    fn from(value: ParseIntError) -> Self {
        Error::reader(value)
    }
}

impl From<TryFromIntError> for Error {
    fn from(value: TryFromIntError) -> Self {
        Error::reader(value)
    }
}

impl From<chrono::ParseError> for Error {
    fn from(value: chrono::ParseError) -> Self {
        Error::reader(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_reader_errors() {
        let parse_err = "x".parse::<u64>().unwrap_err();
        assert!(matches!(Error::from(parse_err).kind, ErrorKind::Reader));

        let date_err = chrono::DateTime::parse_from_rfc3339("yesterday").unwrap_err();
        assert!(matches!(Error::from(date_err).kind, ErrorKind::Reader));

        let negative_err = u64::try_from(-1_i64).unwrap_err();
        assert!(matches!(Error::from(negative_err).kind, ErrorKind::Reader));
    }

    #[test]
    fn io_failures_keep_their_message() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        assert!(matches!(err.kind, ErrorKind::Other));
        assert_eq!(err.to_string(), "other error: no such file");
    }
}
