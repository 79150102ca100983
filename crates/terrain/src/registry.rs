use std::collections::{BTreeMap, BTreeSet};

use glade_common::ObjectId;

use crate::decoration::DecorationKind;

/// Root ids of placed decorations, indexed by category.
///
/// Consumers look decorations up here instead of scanning object names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationRegistry {
    by_kind: BTreeMap<DecorationKind, BTreeSet<ObjectId>>,
}

impl DecorationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` under `kind`. Returns false if it was already recorded.
    pub fn insert(&mut self, kind: DecorationKind, id: ObjectId) -> bool {
        self.by_kind.entry(kind).or_default().insert(id)
    }

    /// Forget `id` wherever it is recorded.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let mut removed = false;
        for ids in self.by_kind.values_mut() {
            removed |= ids.remove(&id);
        }
        self.by_kind.retain(|_, ids| !ids.is_empty());
        removed
    }

    /// Ids recorded under `kind`, in id order.
    pub fn ids(&self, kind: DecorationKind) -> impl Iterator<Item = ObjectId> + '_ {
        self.by_kind.get(&kind).into_iter().flatten().copied()
    }

    pub fn count(&self, kind: DecorationKind) -> usize {
        self.by_kind.get(&kind).map_or(0, BTreeSet::len)
    }

    pub fn kind_of(&self, id: ObjectId) -> Option<DecorationKind> {
        self.by_kind
            .iter()
            .find_map(|(kind, ids)| ids.contains(&id).then_some(*kind))
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}
