use serde::{Deserialize, Serialize};

/// What a grid cell holds. Fixed once the layout is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Treasure,
    Bomb,
    Safe,
}

impl CellKind {
    pub const fn is_treasure(self) -> bool {
        matches!(self, Self::Treasure)
    }

    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Safe
    }
}

/// Player-visible view of a single cell. Hidden cells do not leak their kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Revealed(CellKind),
}

impl CellView {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}
