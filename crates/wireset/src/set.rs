// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Set container with value semantics.
//!
//! Invariants:
//!
//! - No two stored elements compare equal.
//! - Iteration order is unspecified; equality and hashing never depend on it.
//! - Derived sets (`union`, `intersection`, ...) are new, independently owned
//!   values. Only the receiver of a `form_*` call is mutated.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{BitAnd, BitOr, BitXor, Sub};
use std::collections::hash_set::{IntoIter, Iter};
use std::collections::HashSet;
use std::hash::DefaultHasher;

/// Unordered collection of unique `E` values that can cross the wire.
///
/// Storage is a native [`HashSet`]; membership, insertion and removal are
/// amortized O(1). See [`crate::wire`] for the protocol adapter.
#[derive(Clone)]
pub struct SerializableSet<E> {
    storage: HashSet<E>,
}

impl<E> SerializableSet<E> {
    /// Empty set.
    pub fn new() -> Self {
        Self {
            storage: HashSet::new(),
        }
    }

    /// Empty set with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: HashSet::with_capacity(capacity),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// `true` when the set holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterate the elements in unspecified order.
    ///
    /// The order is stable for as long as the set is not mutated.
    pub fn iter(&self) -> Iter<'_, E> {
        self.storage.iter()
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Unwrap into the native collection.
    pub fn into_inner(self) -> HashSet<E> {
        self.storage
    }
}

impl<E: Eq + Hash> SerializableSet<E> {
    /// `true` iff an element equal to `value` is present.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.contains(value)
    }

    /// Stored element equal to `value`, if any.
    pub fn get<Q>(&self, value: &Q) -> Option<&E>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.get(value)
    }

    /// Remove and return the stored element equal to `value`.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<E>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.take(value)
    }

    /// Insert `value`, replacing and returning an equal stored element.
    ///
    /// Useful when equality does not cover every field of `E`: the new value
    /// always ends up in storage.
    pub fn update(&mut self, value: E) -> Option<E> {
        self.storage.replace(value)
    }

    /// Keep only the elements for which `keep` returns `true`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&E) -> bool,
    {
        self.storage.retain(keep);
    }

    /// Keep only elements also present in `other`.
    pub fn form_intersection(&mut self, other: &Self) {
        self.storage.retain(|item| other.storage.contains(item));
    }

    /// Drop every element present in `other`.
    pub fn subtract(&mut self, other: &Self) {
        self.storage.retain(|item| !other.storage.contains(item));
    }

    /// Every element of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.storage.is_subset(&other.storage)
    }

    /// Every element of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        self.storage.is_superset(&other.storage)
    }

    /// Subset of `other` and not equal to it.
    pub fn is_strict_subset(&self, other: &Self) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    /// Superset of `other` and not equal to it.
    pub fn is_strict_superset(&self, other: &Self) -> bool {
        other.is_strict_subset(self)
    }

    /// No element in common with `other`.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.storage.is_disjoint(&other.storage)
    }
}

impl<E: Eq + Hash + Clone> SerializableSet<E> {
    /// Insert `value` unless an equal element is already stored.
    ///
    /// Returns `(true, value)` when inserted. Otherwise storage is left
    /// untouched and the stored element comes back with `false`.
    pub fn insert(&mut self, value: E) -> (bool, E) {
        if let Some(existing) = self.storage.get(&value) {
            return (false, existing.clone());
        }
        self.storage.insert(value.clone());
        (true, value)
    }

    /// Elements in `self`, `other`, or both.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.form_union(other);
        out
    }

    /// Elements in both `self` and `other`; the stored elements come from `self`.
    pub fn intersection(&self, other: &Self) -> Self {
        self.storage
            .iter()
            .filter(|item| other.storage.contains(*item))
            .cloned()
            .collect()
    }

    /// Elements in exactly one of `self` and `other`.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.storage
            .symmetric_difference(&other.storage)
            .cloned()
            .collect()
    }

    /// Elements in `self` but not in `other`.
    pub fn subtracting(&self, other: &Self) -> Self {
        self.storage.difference(&other.storage).cloned().collect()
    }

    /// Add every element of `other`; equal elements already stored are kept.
    pub fn form_union(&mut self, other: &Self) {
        for item in &other.storage {
            if !self.storage.contains(item) {
                self.storage.insert(item.clone());
            }
        }
    }

    /// Toggle membership of every element of `other`.
    pub fn form_symmetric_difference(&mut self, other: &Self) {
        for item in &other.storage {
            if !self.storage.remove(item) {
                self.storage.insert(item.clone());
            }
        }
    }
}

impl<E> Default for SerializableSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Eq + Hash> PartialEq for SerializableSet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

impl<E: Eq + Hash> Eq for SerializableSet<E> {}

/// Fixed-key digest of one element.
fn element_digest<E: Hash>(item: &E) -> u64 {
    let mut hasher = DefaultHasher::new();
    item.hash(&mut hasher);
    hasher.finish()
}

/// Order-independent: element digests are combined with a commutative sum,
/// so equal sets hash equally whatever order their storage iterates in.
impl<E: Eq + Hash> Hash for SerializableSet<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .storage
            .iter()
            .fold(0u64, |acc, item| acc.wrapping_add(element_digest(item)));
        state.write_usize(self.storage.len());
        state.write_u64(combined);
    }
}

impl<E: fmt::Debug> fmt::Debug for SerializableSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.storage, f)
    }
}

/// Diagnostic form `{a, b, c}` in iteration order; not wire-relevant.
impl<E: fmt::Display> fmt::Display for SerializableSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, item) in self.storage.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(item, f)?;
        }
        f.write_str("}")
    }
}

impl<E: Eq + Hash> FromIterator<E> for SerializableSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            storage: iter.into_iter().collect(),
        }
    }
}

impl<E: Eq + Hash> Extend<E> for SerializableSet<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.storage.extend(iter);
    }
}

impl<E: Eq + Hash, const N: usize> From<[E; N]> for SerializableSet<E> {
    fn from(items: [E; N]) -> Self {
        items.into_iter().collect()
    }
}

#[allow(clippy::implicit_hasher)]
impl<E> From<HashSet<E>> for SerializableSet<E> {
    fn from(storage: HashSet<E>) -> Self {
        Self { storage }
    }
}

#[allow(clippy::implicit_hasher)]
impl<E> From<SerializableSet<E>> for HashSet<E> {
    fn from(set: SerializableSet<E>) -> Self {
        set.storage
    }
}

impl<E> IntoIterator for SerializableSet<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a SerializableSet<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}

impl<E: Eq + Hash + Clone> BitOr<&SerializableSet<E>> for &SerializableSet<E> {
    type Output = SerializableSet<E>;

    fn bitor(self, rhs: &SerializableSet<E>) -> Self::Output {
        self.union(rhs)
    }
}

impl<E: Eq + Hash + Clone> BitAnd<&SerializableSet<E>> for &SerializableSet<E> {
    type Output = SerializableSet<E>;

    fn bitand(self, rhs: &SerializableSet<E>) -> Self::Output {
        self.intersection(rhs)
    }
}

impl<E: Eq + Hash + Clone> BitXor<&SerializableSet<E>> for &SerializableSet<E> {
    type Output = SerializableSet<E>;

    fn bitxor(self, rhs: &SerializableSet<E>) -> Self::Output {
        self.symmetric_difference(rhs)
    }
}

impl<E: Eq + Hash + Clone> Sub<&SerializableSet<E>> for &SerializableSet<E> {
    type Output = SerializableSet<E>;

    fn sub(self, rhs: &SerializableSet<E>) -> Self::Output {
        self.subtracting(rhs)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Equal by `key` only, so two values can be equal without being identical.
    #[derive(Debug, Clone)]
    struct Keyed {
        key: u32,
        label: &'static str,
    }

    impl PartialEq for Keyed {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    impl Eq for Keyed {}

    impl Hash for Keyed {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.key.hash(state);
        }
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn insert_keeps_the_stored_element() {
        let mut set = SerializableSet::from([Keyed { key: 1, label: "old" }]);
        let (inserted, existing) = set.insert(Keyed { key: 1, label: "new" });
        assert!(!inserted);
        assert_eq!(existing.label, "old");
        assert_eq!(set.get(&Keyed { key: 1, label: "" }).map(|k| k.label), Some("old"));

        let (inserted, fresh) = set.insert(Keyed { key: 2, label: "two" });
        assert!(inserted);
        assert_eq!(fresh.label, "two");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn update_replaces_the_stored_element() {
        let mut set = SerializableSet::from([Keyed { key: 1, label: "old" }]);
        let replaced = set.update(Keyed { key: 1, label: "new" });
        assert_eq!(replaced.map(|k| k.label), Some("old"));
        assert_eq!(set.get(&Keyed { key: 1, label: "" }).map(|k| k.label), Some("new"));
        assert!(set.update(Keyed { key: 5, label: "five" }).is_none());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_returns_the_stored_element_or_nothing() {
        let mut set: SerializableSet<String> = ["a".to_string(), "b".to_string()].into();
        assert_eq!(set.remove("a"), Some("a".to_string()));
        assert_eq!(set.remove("a"), None);
        assert!(!set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn equal_sets_from_different_insertion_orders_hash_equally() {
        let forward: SerializableSet<i64> = (0..500).collect();
        let backward: SerializableSet<i64> = (0..500).rev().collect();
        let mut grown = SerializableSet::with_capacity(1);
        for n in (0..500).step_by(2).chain((1..500).step_by(2)) {
            grown.insert(n);
        }
        assert_eq!(forward, backward);
        assert_eq!(forward, grown);
        assert_eq!(hash_of(&forward), hash_of(&backward));
        assert_eq!(hash_of(&forward), hash_of(&grown));
    }

    #[test]
    fn sets_hash_as_set_keys() {
        let mut outer: HashSet<SerializableSet<i32>> = HashSet::new();
        outer.insert([1, 2, 3].into());
        assert!(outer.contains(&SerializableSet::from([3, 2, 1])));
        assert!(!outer.contains(&SerializableSet::from([1, 2])));
    }

    #[test]
    fn derived_sets_leave_operands_untouched() {
        let a = SerializableSet::from([1, 2, 3]);
        let b = SerializableSet::from([3, 4]);
        assert_eq!(a.union(&b), SerializableSet::from([1, 2, 3, 4]));
        assert_eq!(a.intersection(&b), SerializableSet::from([3]));
        assert_eq!(a.symmetric_difference(&b), SerializableSet::from([1, 2, 4]));
        assert_eq!(a.subtracting(&b), SerializableSet::from([1, 2]));
        assert_eq!(a, SerializableSet::from([1, 2, 3]));
        assert_eq!(b, SerializableSet::from([3, 4]));
    }

    #[test]
    fn in_place_forms_mutate_only_the_receiver() {
        let b = SerializableSet::from([3, 4]);

        let mut a = SerializableSet::from([1, 2, 3]);
        a.form_union(&b);
        assert_eq!(a, SerializableSet::from([1, 2, 3, 4]));

        let mut a = SerializableSet::from([1, 2, 3]);
        a.form_intersection(&b);
        assert_eq!(a, SerializableSet::from([3]));

        let mut a = SerializableSet::from([1, 2, 3]);
        a.form_symmetric_difference(&b);
        assert_eq!(a, SerializableSet::from([1, 2, 4]));

        let mut a = SerializableSet::from([1, 2, 3]);
        a.subtract(&b);
        assert_eq!(a, SerializableSet::from([1, 2]));

        assert_eq!(b, SerializableSet::from([3, 4]));
    }

    #[test]
    fn form_union_keeps_stored_representatives() {
        let mut a = SerializableSet::from([Keyed { key: 1, label: "mine" }]);
        let b = SerializableSet::from([Keyed { key: 1, label: "theirs" }]);
        a.form_union(&b);
        assert_eq!(a.get(&Keyed { key: 1, label: "" }).map(|k| k.label), Some("mine"));
    }

    #[test]
    fn converts_to_and_from_native_hash_set() {
        let native: HashSet<i32> = [4, 5, 6].into_iter().collect();
        let set = SerializableSet::from(native.clone());
        assert_eq!(set.len(), 3);
        assert!(set.contains(&5));

        let back: HashSet<i32> = set.clone().into();
        assert_eq!(back, native);
        assert_eq!(set.into_inner(), native);
    }

    #[test]
    fn intersection_keeps_receiver_representatives_like_form_intersection() {
        let a: SerializableSet<Keyed> = (1..=3).map(|key| Keyed { key, label: "a" }).collect();
        let b = SerializableSet::from([Keyed { key: 1, label: "b" }]);
        let lookup = Keyed { key: 1, label: "" };

        let derived = a.intersection(&b);
        let mut in_place = a.clone();
        in_place.form_intersection(&b);

        assert_eq!(derived, in_place);
        assert_eq!(derived.get(&lookup).map(|k| k.label), Some("a"));
        assert_eq!(in_place.get(&lookup).map(|k| k.label), Some("a"));
        assert_eq!((&a & &b).get(&lookup).map(|k| k.label), Some("a"));
    }

    #[test]
    fn subset_relations() {
        let small = SerializableSet::from([1, 2]);
        let big = SerializableSet::from([1, 2, 3]);
        let other = SerializableSet::from([7]);
        assert!(small.is_subset(&big));
        assert!(small.is_strict_subset(&big));
        assert!(big.is_superset(&small));
        assert!(big.is_strict_superset(&small));
        assert!(small.is_subset(&small));
        assert!(!small.is_strict_subset(&small));
        assert!(small.is_disjoint(&other));
        assert!(!small.is_disjoint(&big));
    }

    #[test]
    fn operators_match_named_methods() {
        let a = SerializableSet::from([1, 2, 3]);
        let b = SerializableSet::from([2, 3, 4]);
        assert_eq!(&a | &b, a.union(&b));
        assert_eq!(&a & &b, a.intersection(&b));
        assert_eq!(&a ^ &b, a.symmetric_difference(&b));
        assert_eq!(&a - &b, a.subtracting(&b));
    }

    #[test]
    fn iteration_is_stable_without_mutation() {
        let set: SerializableSet<i32> = (0..64).collect();
        let first: Vec<i32> = set.iter().copied().collect();
        let second: Vec<i32> = (&set).into_iter().copied().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn display_lists_every_element() {
        assert_eq!(SerializableSet::<i32>::new().to_string(), "{}");
        assert_eq!(SerializableSet::from([7]).to_string(), "{7}");
        let two = SerializableSet::from([1, 2]).to_string();
        assert!(two == "{1, 2}" || two == "{2, 1}", "got {two}");
    }

    #[test]
    fn clear_and_retain() {
        let mut set: SerializableSet<i32> = (0..10).collect();
        set.retain(|n| n % 2 == 0);
        assert_eq!(set, SerializableSet::from([0, 2, 4, 6, 8]));
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
