use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    /// Single letter used as the prefix of a tid.
    pub fn letter(self) -> char {
        match self {
            ElementKind::Node => 'N',
            ElementKind::Way => 'W',
            ElementKind::Relation => 'R',
        }
    }

    pub fn from_tag_name(name: &[u8]) -> Option<ElementKind> {
        match name {
            b"node" => Some(ElementKind::Node),
            b"way" => Some(ElementKind::Way),
            b"relation" => Some(ElementKind::Relation),
            _ => None,
        }
    }
}

/// Identity of a map element: kind plus id. Displays as e.g. `N42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tid {
    pub kind: ElementKind,
    pub id: u64,
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.letter(), self.id)
    }
}

/// One revision of one map element, as read from a full-history export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    pub kind: ElementKind,
    pub id: u64,
    pub version: u32,
    /// Seconds since 1.1.1970.
    pub timestamp: u64,
    pub visible: bool,
    pub tags: HashMap<String, String>,
}

impl RawElement {
    pub fn tid(&self) -> Tid {
        Tid {
            kind: self.kind,
            id: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tid_uses_kind_letter_and_decimal_id() {
        let tid = |kind, id| Tid { kind, id }.to_string();
        assert_eq!(tid(ElementKind::Node, 42), "N42");
        assert_eq!(tid(ElementKind::Way, 444121), "W444121");
        assert_eq!(tid(ElementKind::Relation, 12928), "R12928");
    }

    #[test]
    fn kind_from_tag_name() {
        assert_eq!(ElementKind::from_tag_name(b"way"), Some(ElementKind::Way));
        assert_eq!(ElementKind::from_tag_name(b"nd"), None);
    }
}
