use crate::data::osm::{ElementKind, RawElement};
use crate::errors::{Error, Result};

/// Can `next` follow `last` in a full-history export?
///
/// Exports list all nodes, then all ways, then all relations. Within one kind,
/// elements are ordered by id and the revisions of one element by version.
/// `last == None` checks the first element of the stream, which must be a node.
pub fn can_proceed(last: Option<&RawElement>, next: &RawElement) -> bool {
    let last = match last {
        Some(last) => last,
        None => return next.kind == ElementKind::Node,
    };

    if last.kind == next.kind {
        return (last.id == next.id && last.version < next.version) || last.id < next.id;
    }
    matches!(
        (last.kind, next.kind),
        (ElementKind::Node, ElementKind::Way) | (ElementKind::Way, ElementKind::Relation)
    )
}

/// Passes elements through unchanged as long as they come in order.
///
/// The first out-of-order element is turned into an ordering violation error,
/// after which the stream ends without pulling anything more from upstream.
/// Upstream errors are passed along and do not touch the guard's state.
pub struct OrderGuard<I> {
    inner: I,
    last: Option<RawElement>,
    failed: bool,
}

impl<I> OrderGuard<I> {
    pub fn new(inner: I) -> Self {
        OrderGuard {
            inner,
            last: None,
            failed: false,
        }
    }
}

impl<I> Iterator for OrderGuard<I>
where
    I: Iterator<Item = Result<RawElement>>,
{
    type Item = Result<RawElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let element = match self.inner.next()? {
            Ok(element) => element,
            Err(err) => return Some(Err(err)),
        };

        if can_proceed(self.last.as_ref(), &element) {
            self.last = Some(element.clone());
            Some(Ok(element))
        } else {
            self.failed = true;
            Some(Err(Error::ordering_violation(self.last.take(), element)))
        }
    }
}
