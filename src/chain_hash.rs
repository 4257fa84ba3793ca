//! A separate-chaining hash table.
//!
//! Every bucket owns a singly linked chain of entries. New entries are pushed
//! onto the front of their chain. The table grows by doubling its bucket count
//! whenever the share of non-empty buckets passes [`MAX_FILL_FACTOR`] (checked
//! before an insertion) or a chain grows longer than [`MAX_COLLISIONS`]
//! (checked after an insertion). It never shrinks.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;

use log::debug;
use log::trace;
use log::warn;

use crate::DefaultHashBuilder;
use crate::Error;

/// Bucket count of a table created without an explicit capacity.
pub const DEFAULT_CAPACITY: usize = 10;

/// Longest chain a bucket may hold before the insertion that produced it
/// grows the table.
pub const MAX_COLLISIONS: usize = 3;

/// Largest ratio of non-empty buckets to buckets tolerated before an
/// insertion grows the table.
pub const MAX_FILL_FACTOR: f64 = 0.8;

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    /// Full hash of `key`, reduced against the bucket count on every lookup.
    hash: u64,
    key: K,
    value: V,
    next: Link<K, V>,
}

impl<K, V> Node<K, V> {
    #[inline(always)]
    fn matches<Q>(&self, hash: u64, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.hash == hash && Borrow::<Q>::borrow(&self.key) == key
    }
}

/// Drops a chain node by node so long chains cannot overflow the stack.
fn unlink<K, V>(mut link: Link<K, V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Link<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

#[derive(Debug, Clone, Copy)]
enum Growth {
    FillFactor,
    Collisions { bucket: usize },
}

/// A hash map built from an array of buckets, each holding a singly linked
/// chain of key/value entries.
///
/// Keys are hashed with the table's [`BuildHasher`] and placed in bucket
/// `hash % bucket_count`. Key equality is whatever `K: Eq` says; wrap keys in
/// [`ByAddress`] to key the table by object identity instead.
///
/// The table exclusively owns all entries. Lookups hand out borrows, so the
/// table cannot be mutated while an iteration over it is alive.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use chain_hash::ChainHash;
/// use chain_hash::Error;
///
/// let mut ages = ChainHash::new();
/// ages.set("ada", 36);
/// ages.set("alan", 41);
/// ages.set("ada", 37);
///
/// assert_eq!(ages.len(), 2);
/// assert_eq!(ages.get("ada"), Ok(&37));
/// assert_eq!(ages.get("grace"), Err(Error::KeyNotFound));
///
/// assert!(ages.remove("alan"));
/// assert!(!ages.contains("alan"));
/// # }
/// ```
///
/// [`ByAddress`]: crate::ByAddress
pub struct ChainHash<K, V, S = DefaultHashBuilder> {
    buckets: Vec<Link<K, V>>,
    bucket_sizes: Vec<usize>,

    len: usize,
    used_buckets: usize,

    #[cfg(feature = "stats")]
    rehashes: usize,

    hash_builder: S,
}

impl<K, V, S> Debug for ChainHash<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Clone for ChainHash<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let buckets = self
            .buckets
            .iter()
            .map(|head| {
                let mut cloned: Link<K, V> = None;
                let mut tail = &mut cloned;
                let mut cursor = head.as_deref();
                while let Some(node) = cursor {
                    let copy = tail.insert(Box::new(Node {
                        hash: node.hash,
                        key: node.key.clone(),
                        value: node.value.clone(),
                        next: None,
                    }));
                    tail = &mut copy.next;
                    cursor = node.next.as_deref();
                }
                cloned
            })
            .collect();

        Self {
            buckets,
            bucket_sizes: self.bucket_sizes.clone(),
            len: self.len,
            used_buckets: self.used_buckets,
            #[cfg(feature = "stats")]
            rehashes: self.rehashes,
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K, V, S> Drop for ChainHash<K, V, S> {
    fn drop(&mut self) {
        for head in &mut self.buckets {
            unlink(head.take());
        }
    }
}

impl<K, V, S> ChainHash<K, V, S> {
    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets, which is always at least one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::ChainHash;
    ///
    /// let table: ChainHash<u32, u32> = ChainHash::new();
    /// assert_eq!(table.bucket_count(), 10);
    ///
    /// let table: ChainHash<u32, u32> = ChainHash::with_capacity(0);
    /// assert_eq!(table.bucket_count(), 1);
    /// # }
    /// ```
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of buckets holding at least one entry.
    pub fn used_buckets(&self) -> usize {
        self.used_buckets
    }

    /// Returns the ratio of non-empty buckets to buckets.
    pub fn fill_factor(&self) -> f64 {
        self.used_buckets as f64 / self.buckets.len() as f64
    }

    /// Returns the number of entries chained in the bucket at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= self.bucket_count()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::ChainHash;
    /// use chain_hash::Error;
    ///
    /// let mut table = ChainHash::new();
    /// table.set(1, "one");
    ///
    /// let total: usize = (0..table.bucket_count())
    ///     .map(|i| table.bucket_size(i).unwrap())
    ///     .sum();
    /// assert_eq!(total, 1);
    ///
    /// assert_eq!(
    ///     table.bucket_size(10),
    ///     Err(Error::IndexOutOfRange {
    ///         index: 10,
    ///         bucket_count: 10
    ///     })
    /// );
    /// # }
    /// ```
    pub fn bucket_size(&self, index: usize) -> Result<usize, Error> {
        self.bucket_sizes
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                bucket_count: self.buckets.len(),
            })
    }

    /// Returns an iterator over the entries chained in the bucket at `index`,
    /// newest first.
    ///
    /// Walking every index in `0..bucket_count()` visits each entry exactly
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= self.bucket_count()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::ChainHash;
    ///
    /// let mut table = ChainHash::new();
    /// for word in ["red", "green", "blue"] {
    ///     table.set(word, word.len());
    /// }
    ///
    /// let mut seen = 0;
    /// for index in 0..table.bucket_count() {
    ///     for (word, len) in table.bucket(index).unwrap() {
    ///         assert_eq!(word.len(), *len);
    ///         seen += 1;
    ///     }
    /// }
    /// assert_eq!(seen, 3);
    /// # }
    /// ```
    pub fn bucket(&self, index: usize) -> Result<Bucket<'_, K, V>, Error> {
        let head = self.buckets.get(index).ok_or(Error::IndexOutOfRange {
            index,
            bucket_count: self.buckets.len(),
        })?;

        Ok(Bucket {
            next: head.as_deref(),
            remaining: self.bucket_sizes[index],
        })
    }

    /// Returns an iterator over all entries, bucket by bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Removes every entry. The bucket count is left unchanged.
    pub fn clear(&mut self) {
        for head in &mut self.buckets {
            unlink(head.take());
        }
        self.bucket_sizes.fill(0);
        self.len = 0;
        self.used_buckets = 0;
    }

    /// Returns a reference to the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    #[inline(always)]
    fn index_for(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Returns chain length statistics for the current table state.
    ///
    /// Requires the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> TableStats {
        let longest_chain = self.bucket_sizes.iter().copied().max().unwrap_or(0);
        let mut chain_lengths = vec![0usize; longest_chain + 1];
        for &size in &self.bucket_sizes {
            chain_lengths[size] += 1;
        }

        TableStats {
            len: self.len,
            bucket_count: self.buckets.len(),
            used_buckets: self.used_buckets,
            fill_factor: self.fill_factor(),
            longest_chain,
            rehashes: self.rehashes,
            chain_lengths,
        }
    }
}

impl<K, V, S> ChainHash<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets and the given
    /// hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::ChainHash;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let table: ChainHash<i32, String, _> = ChainHash::with_hasher(SimpleHasher);
    /// assert!(table.is_empty());
    /// assert_eq!(table.bucket_count(), 10);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hash_builder)
    }

    /// Creates an empty table with `capacity` buckets and the given hasher
    /// builder. A capacity of zero is raised to one.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let capacity = capacity.max(1);
        Self {
            buckets: empty_buckets(capacity),
            bucket_sizes: vec![0; capacity],
            len: 0,
            used_buckets: 0,
            #[cfg(feature = "stats")]
            rehashes: 0,
            hash_builder,
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no entry matches `key`.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key)
            .map(|node| &node.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no entry matches `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::ChainHash;
    ///
    /// let mut docs: ChainHash<String, Vec<usize>> = ChainHash::new();
    /// docs.set("casa".to_string(), vec![0]);
    /// docs.get_mut("casa").unwrap().push(1);
    /// assert_eq!(docs.get("casa").unwrap(), &[0, 1]);
    /// # }
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        let index = self.index_for(hash);

        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(node) = cursor {
            if node.matches(hash, key) {
                return Ok(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }

        Err(Error::KeyNotFound)
    }

    /// Returns `true` if an entry matches `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Stores `value` under `key`, overwriting the value of an existing entry
    /// with an equal key.
    ///
    /// The table doubles its bucket count before inserting if more than
    /// [`MAX_FILL_FACTOR`] of its buckets are in use, and again after
    /// inserting if the target chain now holds more than [`MAX_COLLISIONS`]
    /// entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::ChainHash;
    ///
    /// let mut table = ChainHash::new();
    /// for i in 0..100 {
    ///     table.set(i, i * i);
    /// }
    ///
    /// assert_eq!(table.len(), 100);
    /// assert!(table.bucket_count() > 10);
    /// assert!((0..100).all(|i| table.get(&i) == Ok(&(i * i))));
    /// # }
    /// ```
    pub fn set(&mut self, key: K, value: V) {
        let hash = self.hash_builder.hash_one(&key);
        self.insert_hashed(hash, key, value);
    }

    /// Removes the entry matching `key`. Returns `false` if there was none.
    ///
    /// Removal never changes the bucket count.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        let index = self.index_for(hash);

        let mut link = &mut self.buckets[index];
        loop {
            match link {
                None => return false,
                Some(node) if node.matches(hash, key) => break,
                Some(node) => link = &mut node.next,
            }
        }

        if let Some(node) = link.take() {
            *link = node.next;
        }

        self.len -= 1;
        self.bucket_sizes[index] -= 1;
        if self.bucket_sizes[index] == 0 {
            self.used_buckets -= 1;
        }

        true
    }

    fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);

        let mut cursor = self.buckets[self.index_for(hash)].as_deref();
        while let Some(node) = cursor {
            if node.matches(hash, key) {
                return Some(node);
            }
            cursor = node.next.as_deref();
        }

        None
    }

    fn insert_hashed(&mut self, hash: u64, key: K, value: V) {
        if self.fill_factor() > MAX_FILL_FACTOR {
            self.rehash(Growth::FillFactor);
        }

        let index = self.index_for(hash);

        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(node) = cursor {
            if node.hash == hash && node.key == key {
                node.value = value;
                return;
            }
            cursor = node.next.as_deref_mut();
        }

        let head = &mut self.buckets[index];
        if head.is_none() {
            trace!("chain table bucket {index} now in use");
            self.used_buckets += 1;
        }
        let next = head.take();
        *head = Some(Box::new(Node {
            hash,
            key,
            value,
            next,
        }));

        self.len += 1;
        self.bucket_sizes[index] += 1;

        if self.bucket_sizes[index] > MAX_COLLISIONS {
            if self.is_splittable(index) {
                self.rehash(Growth::Collisions { bucket: index });
            } else {
                warn!(
                    "chain table bucket {index} holds {} entries that doubling cannot split; not growing",
                    self.bucket_sizes[index]
                );
            }
        }
    }

    /// Whether doubling the bucket count would spread the chain at `index`
    /// over more than one bucket. Entries whose hashes agree modulo the doubled
    /// capacity would all land together again.
    fn is_splittable(&self, index: usize) -> bool {
        let Some(head) = self.buckets[index].as_deref() else {
            return false;
        };
        let Some(next_capacity) = self.buckets.len().checked_mul(2) else {
            return false;
        };
        let next_capacity = next_capacity as u64;
        let target = head.hash % next_capacity;

        let mut cursor = head.next.as_deref();
        while let Some(node) = cursor {
            if node.hash % next_capacity != target {
                return true;
            }
            cursor = node.next.as_deref();
        }

        false
    }

    fn rehash(&mut self, trigger: Growth) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity.checked_mul(2).expect("capacity overflow");

        match trigger {
            Growth::FillFactor => debug!(
                "growing chain table from {old_capacity} to {new_capacity} buckets: fill factor {:.2} over {MAX_FILL_FACTOR}",
                self.fill_factor()
            ),
            Growth::Collisions { bucket } => debug!(
                "growing chain table from {old_capacity} to {new_capacity} buckets: bucket {bucket} over {MAX_COLLISIONS} entries"
            ),
        }

        let old = core::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        self.bucket_sizes = vec![0; new_capacity];
        self.len = 0;
        self.used_buckets = 0;

        #[cfg(feature = "stats")]
        {
            self.rehashes += 1;
        }

        for mut link in old {
            while let Some(mut node) = link {
                link = node.next.take();
                let Node {
                    hash, key, value, ..
                } = *node;
                self.insert_hashed(hash, key, value);
            }
        }
    }
}

#[cfg(any(feature = "std", feature = "foldhash"))]
impl<K, V> ChainHash<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets using the
    /// default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::ChainHash;
    ///
    /// let table: ChainHash<String, u32> = ChainHash::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.bucket_count(), chain_hash::chain_hash::DEFAULT_CAPACITY);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty table with `capacity` buckets using the default hasher
    /// builder. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for ChainHash<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Extend<(K, V)> for ChainHash<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainHash<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.extend(iter);
        table
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainHash<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of one bucket, newest first.
///
/// This struct is created by [`ChainHash::bucket`].
pub struct Bucket<'a, K, V> {
    next: Option<&'a Node<K, V>>,
    remaining: usize,
}

impl<K, V> Clone for Bucket<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Bucket<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Bucket<'_, K, V> {}

impl<K, V> FusedIterator for Bucket<'_, K, V> {}

/// An iterator over all entries of a [`ChainHash`], bucket by bucket.
///
/// This struct is created by [`ChainHash::iter`].
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Link<K, V>>,
    chain: Option<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain {
                self.chain = node.next.as_deref();
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Chain length statistics for a [`ChainHash`].
///
/// Requires the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// Number of entries in the table
    pub len: usize,
    /// Number of buckets
    pub bucket_count: usize,
    /// Number of non-empty buckets
    pub used_buckets: usize,
    /// Ratio of non-empty buckets to buckets
    pub fill_factor: f64,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Number of times the table has grown
    pub rehashes: usize,
    /// `chain_lengths[n]` is the number of buckets holding exactly `n` entries
    pub chain_lengths: Vec<usize>,
}

#[cfg(feature = "stats")]
impl TableStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Chain Table Statistics ===");
        println!("Entries: {}", self.len);
        println!(
            "Buckets: {}/{} in use ({:.2}% fill factor)",
            self.used_buckets,
            self.bucket_count,
            self.fill_factor * 100.0
        );
        println!("Longest chain: {}", self.longest_chain);
        println!("Rehashes: {}", self.rehashes);
        for (length, &count) in self.chain_lengths.iter().enumerate() {
            println!("{:>2} | {}", length, count);
        }
    }
}
