// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifiers and the per-category id allocator.
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Largest identifier that still fits the persisted `int32` columns.
pub const MAX_ID: u32 = 0x7fff_ffff;

/// Which id space an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdCategory {
    /// Node identifiers.
    Node,
    /// Edge identifiers.
    Edge,
}

impl fmt::Display for IdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Node => "node",
            Self::Edge => "edge",
        })
    }
}

/// Common behaviour of [`NodeId`] and [`EdgeId`].
pub trait Identifier: Copy + Ord + fmt::Debug {
    /// Id space of this identifier.
    const CATEGORY: IdCategory;
    /// Wraps a raw integer.
    fn from_raw(raw: u32) -> Self;
    /// Raw integer value.
    fn raw(self) -> u32;
}

/// Identifier of a node, unique within a model.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Identifier of an edge, unique within a model.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

macro_rules! identifier {
    ($ty:ident, $category:expr) => {
        impl Identifier for $ty {
            const CATEGORY: IdCategory = $category;

            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $ty {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

identifier!(NodeId, IdCategory::Node);
identifier!(EdgeId, IdCategory::Edge);

/// Tracks the identifiers in use for one category and hands out fresh ones.
///
/// Fresh ids are `max(used) + 1` (or `1` when empty), so a generated id never
/// collides with an issued or caller-supplied one. Allocation does not
/// reserve: callers [`reserve`](Self::reserve) once the owning row is
/// committed, which keeps a rejected insert free of side effects.
#[derive(Debug, Clone)]
pub struct UsedIds<I> {
    ids: BTreeSet<I>,
}

impl<I> Default for UsedIds<I> {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }
}

impl<I: Identifier> UsedIds<I> {
    /// Empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds allocator state from ids observed in existing data.
    pub fn from_ids<T: IntoIterator<Item = I>>(ids: T) -> Result<Self, NetworkError> {
        let mut used = Self::new();
        for id in ids {
            used.reserve(id)?;
        }
        Ok(used)
    }

    /// Next unused id: one past the largest id seen so far.
    pub fn new_id(&self) -> Result<I, NetworkError> {
        let next = match self.ids.last() {
            None => 1,
            Some(max) => max.raw().saturating_add(1),
        };
        if next > MAX_ID {
            return Err(NetworkError::IdentifierExhausted {
                category: I::CATEGORY,
            });
        }
        Ok(I::from_raw(next))
    }

    /// Fails if `id` is taken or cannot be persisted; never mutates.
    pub fn ensure_free(&self, id: I) -> Result<(), NetworkError> {
        if id.raw() > MAX_ID {
            return Err(NetworkError::IdentifierOutOfRange {
                category: I::CATEGORY,
                id: id.raw(),
            });
        }
        if self.ids.contains(&id) {
            return Err(NetworkError::DuplicateIdentifier {
                category: I::CATEGORY,
                id: id.raw(),
            });
        }
        Ok(())
    }

    /// Records `id` as used.
    pub fn reserve(&mut self, id: I) -> Result<(), NetworkError> {
        self.ensure_free(id)?;
        self.ids.insert(id);
        Ok(())
    }

    /// Returns `true` if `id` is in use.
    pub fn contains(&self, id: I) -> bool {
        self.ids.contains(&id)
    }

    /// Largest id in use.
    pub fn max(&self) -> Option<I> {
        self.ids.last().copied()
    }

    /// Number of ids in use.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no id is in use.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forgets every id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = I> + '_ {
        self.ids.iter().copied()
    }
}

impl<I: Identifier> PartialEq for UsedIds<I> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_allocator_starts_at_one() {
        let ids = UsedIds::<EdgeId>::new();
        assert_eq!(ids.new_id().unwrap(), EdgeId(1));
        assert!(ids.is_empty());
    }

    #[test]
    fn new_id_is_one_past_max_even_with_gaps() {
        let ids = UsedIds::from_ids([NodeId(7), NodeId(2)]).unwrap();
        assert_eq!(ids.new_id().unwrap(), NodeId(8));
        assert_eq!(ids.max(), Some(NodeId(7)));
    }

    #[test]
    fn reserve_rejects_duplicates() {
        let mut ids = UsedIds::<EdgeId>::new();
        ids.reserve(EdgeId(5)).unwrap();
        assert_eq!(
            ids.reserve(EdgeId(5)),
            Err(NetworkError::DuplicateIdentifier {
                category: IdCategory::Edge,
                id: 5
            })
        );
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn range_is_capped_at_int32() {
        let mut ids = UsedIds::<NodeId>::new();
        assert!(matches!(
            ids.reserve(NodeId(MAX_ID + 1)),
            Err(NetworkError::IdentifierOutOfRange { .. })
        ));
        ids.reserve(NodeId(MAX_ID)).unwrap();
        assert!(matches!(
            ids.new_id(),
            Err(NetworkError::IdentifierExhausted {
                category: IdCategory::Node
            })
        ));
    }

    #[test]
    fn zero_is_a_valid_explicit_id() {
        let mut ids = UsedIds::<NodeId>::new();
        ids.reserve(NodeId(0)).unwrap();
        assert!(ids.contains(NodeId(0)));
        assert_eq!(ids.new_id().unwrap(), NodeId(1));
    }
}
