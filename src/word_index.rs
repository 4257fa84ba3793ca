use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write;
use core::hash::BuildHasher;

use log::debug;

use crate::ChainHash;

/// Bucket count the word index starts with.
pub const INDEX_CAPACITY: usize = 13;

/// Splits `text` on whitespace into lower-cased words, dropping every
/// character that is not alphanumeric. Words left empty are skipped.
///
/// # Examples
///
/// ```rust
/// use chain_hash::word_index::tokenize;
///
/// assert_eq!(tokenize("El gato, está en la CASA!"), ["el", "gato", "está", "en", "la", "casa"]);
/// assert!(tokenize(" -- ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|word| {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            (!word.is_empty()).then_some(word)
        })
        .collect()
}

/// Indexes `documents` by word.
///
/// Each word maps to the ascending list of indices of the documents it occurs
/// in, each index listed once.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use chain_hash::word_index::bag_of_words;
///
/// let index = bag_of_words(&["La casa es grande", "El gato está en la casa"]);
/// assert_eq!(index.get("casa").unwrap(), &[0, 1]);
/// assert_eq!(index.get("gato").unwrap(), &[1]);
/// # }
/// ```
#[cfg(any(feature = "std", feature = "foldhash"))]
pub fn bag_of_words<D>(documents: &[D]) -> ChainHash<String, Vec<usize>>
where
    D: AsRef<str>,
{
    bag_of_words_with_hasher(documents, crate::DefaultHashBuilder::default())
}

/// Like [`bag_of_words`], hashing words with `hash_builder`.
pub fn bag_of_words_with_hasher<D, S>(
    documents: &[D],
    hash_builder: S,
) -> ChainHash<String, Vec<usize>, S>
where
    D: AsRef<str>,
    S: BuildHasher,
{
    let mut index: ChainHash<String, Vec<usize>, S> =
        ChainHash::with_capacity_and_hasher(INDEX_CAPACITY, hash_builder);

    for (doc, text) in documents.iter().enumerate() {
        for word in tokenize(text.as_ref()) {
            match index.get_mut(&word) {
                // Documents are visited in order, so only the last entry can repeat.
                Ok(docs) => {
                    if docs.last() != Some(&doc) {
                        docs.push(doc);
                    }
                }
                Err(_) => index.set(word, vec![doc]),
            }
        }
    }

    debug!(
        "indexed {} documents: {} words in {} buckets",
        documents.len(),
        index.len(),
        index.bucket_count()
    );

    index
}

/// Renders an index as `{ "word": [doc, ...], ... }`, one word per line, in
/// bucket order.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use chain_hash::word_index::bag_of_words;
/// use chain_hash::word_index::render;
///
/// let index = bag_of_words(&["hola"]);
/// assert_eq!(render(&index), "{\n \"hola\": [0],\n}\n");
/// # }
/// ```
pub fn render<S>(index: &ChainHash<String, Vec<usize>, S>) -> String {
    let mut out = String::from("{\n");

    for bucket in 0..index.bucket_count() {
        let chain = match index.bucket(bucket) {
            Ok(chain) => chain,
            Err(e) => unreachable!("walking buckets below bucket_count: {e}"),
        };
        for (word, docs) in chain {
            let _ = write!(out, " \"{word}\": [");
            for (i, doc) in docs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{doc}");
            }
            out.push_str("],\n");
        }
    }

    out.push_str("}\n");
    out
}
