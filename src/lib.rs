#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod chain_hash;

mod error;

/// Identity-based key equality.
///
/// This module provides [`ByAddress`], a key wrapper that makes a table
/// compare keys by the object they point at rather than by value.
pub mod identity;

/// Membership testing over shared-tail linked lists.
///
/// This module builds singly linked lists whose tails may be shared and finds
/// the first shared node with a [`ChainHash`] keyed by node identity.
pub mod intersection;

/// Word to document indexing.
///
/// This module tokenizes documents and builds a [`ChainHash`] from each word
/// to the documents it occurs in.
pub mod word_index;

pub use chain_hash::ChainHash;
pub use error::Error;
pub use identity::ByAddress;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`ChainHash::new`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`ChainHash::new`].
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// Stand-in for the default hasher builder when neither the `std` nor
        /// the `foldhash` feature is enabled. It cannot be constructed, so a
        /// table must be given a hasher builder explicitly.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
