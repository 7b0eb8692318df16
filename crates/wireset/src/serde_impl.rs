// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `serde` support: a set is a sequence; duplicates collapse on the way in.

use core::hash::Hash;
use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SerializableSet;

impl<E: Serialize> Serialize for SerializableSet<E> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, E> Deserialize<'de> for SerializableSet<E>
where
    E: Deserialize<'de> + Eq + Hash,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        HashSet::<E>::deserialize(deserializer).map(Self::from)
    }
}
