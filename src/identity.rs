use core::fmt::Debug;
use core::hash::Hash;
use core::hash::Hasher;
use core::ops::Deref;

/// A key wrapper that compares and hashes by the address of the pointee.
///
/// Two `ByAddress` keys are equal only when they point at the same object,
/// regardless of whether the objects themselves compare equal. This turns a
/// [`ChainHash`] into an identity-keyed map, which is what node membership
/// tests need.
///
/// Any pointer-like type works: `&T`, `Box<T>`, `Rc<T>`, `Arc<T>`.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use chain_hash::ByAddress;
/// use chain_hash::ChainHash;
///
/// let a = 7;
/// let b = 7;
///
/// let mut seen = ChainHash::new();
/// seen.set(ByAddress(&a), ());
///
/// assert!(seen.contains(&ByAddress(&a)));
/// assert!(!seen.contains(&ByAddress(&b)));
/// # }
/// ```
///
/// [`ChainHash`]: crate::ChainHash
#[derive(Clone, Copy)]
pub struct ByAddress<P>(pub P);

impl<P> ByAddress<P>
where
    P: Deref,
{
    /// Returns the address this key is identified by.
    pub fn addr(&self) -> usize {
        (&*self.0 as *const P::Target).cast::<()>() as usize
    }

    /// Unwraps the inner pointer.
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P> Deref for ByAddress<P>
where
    P: Deref,
{
    type Target = P::Target;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P> PartialEq for ByAddress<P>
where
    P: Deref,
{
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<P> Eq for ByAddress<P> where P: Deref {}

impl<P> Hash for ByAddress<P>
where
    P: Deref,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.addr());
    }
}

impl<P> Debug for ByAddress<P>
where
    P: Deref,
    P::Target: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} @ {:#x}", &*self.0, self.addr())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::hash::BuildHasher;

    use siphasher::sip::SipHasher;

    use super::*;

    struct FixedSip;

    impl BuildHasher for FixedSip {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(1, 2)
        }
    }

    #[test]
    fn equal_values_are_distinct_keys() {
        let a = Box::new(String::from("node"));
        let b = Box::new(String::from("node"));
        assert_eq!(a, b);
        assert_ne!(ByAddress(&*a), ByAddress(&*b));
        assert_eq!(ByAddress(&*a), ByAddress(&*a));
    }

    #[test]
    fn rc_clones_share_identity() {
        let a = Rc::new(5);
        let a2 = Rc::clone(&a);
        let b = Rc::new(5);

        assert_eq!(ByAddress(a.clone()), ByAddress(a2.clone()));
        assert_ne!(ByAddress(a.clone()), ByAddress(b.clone()));
        assert_eq!(
            FixedSip.hash_one(ByAddress(a)),
            FixedSip.hash_one(ByAddress(a2))
        );
    }

    #[test]
    fn deref_reaches_target() {
        let value = 41;
        let key = ByAddress(&value);
        assert_eq!(*key + 1, 42);
        assert_eq!(*key.into_inner(), 41);
    }
}
