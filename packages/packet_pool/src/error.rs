use thiserror::Error;

/// Errors that can occur when requesting packets from a pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The pool had no packets available to satisfy an allocation request.
    ///
    /// Every packet the pool owns is currently checked out. This is only ever
    /// returned by [`try_allocate()`][crate::PacketPool::try_allocate]; the
    /// fail-fast [`allocate()`][crate::PacketPool::allocate] treats the same
    /// condition as a caller bug and panics instead.
    #[error("no packets available in a pool of capacity {capacity}")]
    Exhausted {
        /// Capacity of the pool that was exhausted.
        capacity: usize,
    },
}

/// A specialized `Result` type for packet pool operations, returning the
/// crate's [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn exhausted_is_error() {
        let error = Error::Exhausted { capacity: 4 };

        // Verify it is a valid Error that can be used in Result context.
        let result: Result<()> = Err(error);
        assert!(result.is_err());
    }
}
