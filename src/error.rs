use thiserror::Error;

/// Errors returned by fallible [`ChainHash`] operations.
///
/// Both variants are local failures: the table is never mutated by a call
/// that returns an error.
///
/// [`ChainHash`]: crate::ChainHash
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No entry matched the requested key.
    #[error("key not found")]
    KeyNotFound,
    /// A bucket was addressed outside of `0..bucket_count`.
    #[error("bucket index {index} out of range for {bucket_count} buckets")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// The bucket count at the time of the call.
        bucket_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::IndexOutOfRange {
                index: 12,
                bucket_count: 10
            }
            .to_string(),
            "bucket index 12 out of range for 10 buckets"
        );
    }
}
