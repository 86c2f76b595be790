use crate::id::ItemKind;
use serde::{Deserialize, Serialize};

/// A stack of additive items held by the host vessel.
///
/// The kind is fixed at construction; only the count changes as charges are
/// consumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemBatch {
    kind: ItemKind,
    pub count: u32,
}

impl ItemBatch {
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self { kind, count }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Remove up to `amount` items. Returns how many were actually removed.
    pub fn shrink(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }
}
