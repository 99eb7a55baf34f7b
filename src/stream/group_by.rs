use std::mem;

use crate::errors::Result;

/// Groups together consecutive items with the same key.
///
/// Only the items of the current group are kept in memory. Once the key changes
/// the finished group is emitted. This is only the same as a full group-by when
/// the input is ordered so that every key appears in one contiguous run, e.g.
/// keys `1, 1, 2, 1` give the groups `[1, 1], [2], [1]`.
///
/// Upstream errors are passed along without touching the current group, and
/// grouping continues with the items after them. A failing key function is
/// reported the same way; the item it failed on is not grouped.
pub struct StreamingGroupBy<I, T, K, F> {
    inner: I,
    key_fn: F,
    current_key: Option<K>,
    buffer: Vec<T>,
    finished: bool,
}

impl<I, T, K, F> StreamingGroupBy<I, T, K, F> {
    pub fn new(inner: I, key_fn: F) -> Self {
        StreamingGroupBy {
            inner,
            key_fn,
            current_key: None,
            buffer: Vec::new(),
            finished: false,
        }
    }
}

impl<I, T, K, F> Iterator for StreamingGroupBy<I, T, K, F>
where
    I: Iterator<Item = Result<T>>,
    K: PartialEq,
    F: FnMut(&T) -> Result<K>,
{
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let item = match self.inner.next() {
                None => {
                    self.finished = true;
                    // A key is only set once an item has been buffered.
                    return self
                        .current_key
                        .take()
                        .map(|_| Ok(mem::take(&mut self.buffer)));
                }
                Some(Err(err)) => return Some(Err(err)),
                Some(Ok(item)) => item,
            };

            let key = match (self.key_fn)(&item) {
                Ok(key) => key,
                Err(err) => return Some(Err(err)),
            };

            match &self.current_key {
                Some(current) if *current == key => self.buffer.push(item),
                Some(_) => {
                    let group = mem::replace(&mut self.buffer, vec![item]);
                    self.current_key = Some(key);
                    return Some(Ok(group));
                }
                None => {
                    self.current_key = Some(key);
                    self.buffer.push(item);
                }
            }
        }
    }
}
