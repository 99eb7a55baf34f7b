pub mod group_by;
pub mod order_guard;

use crate::errors::Result;

use self::group_by::StreamingGroupBy;
use self::order_guard::OrderGuard;

/// Adapters for fallible streams, chained like the std iterator adapters.
pub trait StreamExt<T>: Iterator<Item = Result<T>> + Sized {
    fn group_consecutive_by<K, F>(self, key_fn: F) -> StreamingGroupBy<Self, T, K, F>
    where
        K: PartialEq,
        F: FnMut(&T) -> Result<K>,
    {
        StreamingGroupBy::new(self, key_fn)
    }

    fn guard_order(self) -> OrderGuard<Self> {
        OrderGuard::new(self)
    }
}

impl<I, T> StreamExt<T> for I where I: Iterator<Item = Result<T>> {}
