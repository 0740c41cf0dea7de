use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use account::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use payout::*;
pub use session::*;
pub use types::*;

mod account;
mod cell;
mod error;
mod generator;
mod payout;
mod session;
mod types;

/// Board shape plus the bounds a session start request is validated against.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub min_treasures: usize,
    pub max_treasures: usize,
    pub min_bombs: usize,
    pub max_bombs: usize,
    pub default_treasures: usize,
    pub default_bombs: usize,
    pub default_bet: Coins,
    /// Reject bets above `GameSettings::max_bet` when set.
    pub enforce_max_bet: bool,
}

impl GridConfig {
    pub const fn total_cells(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            min_treasures: 1,
            max_treasures: 24,
            min_bombs: 1,
            max_bombs: 24,
            default_treasures: 5,
            default_bombs: 5,
            default_bet: 10,
            enforce_max_bet: true,
        }
    }
}

/// Game-wide settings owned by the host. Read-only to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub default_balance: Coins,
    pub max_bet: Coins,
    pub win_multiplier: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            default_balance: 1000,
            max_bet: 500,
            win_multiplier: 2.0,
        }
    }
}

/// Fixed layout of cell kinds for one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    kinds: Array2<CellKind>,
    treasure_count: usize,
    bomb_count: usize,
}

impl GridLayout {
    pub fn from_kinds(kinds: Array2<CellKind>) -> Self {
        let treasure_count = kinds.iter().filter(|kind| kind.is_treasure()).count();
        let bomb_count = kinds.iter().filter(|kind| kind.is_bomb()).count();
        Self {
            kinds,
            treasure_count,
            bomb_count,
        }
    }

    /// Builds a layout by placing kinds at explicit coordinates; the rest stays safe.
    pub fn from_coords(size: Coord2, treasures: &[Coord2], bombs: &[Coord2]) -> Result<Self> {
        let mut kinds: Array2<CellKind> = Array2::default(size);

        let marked = treasures
            .iter()
            .map(|&coords| (coords, CellKind::Treasure))
            .chain(bombs.iter().map(|&coords| (coords, CellKind::Bomb)));

        for (coords, kind) in marked {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCellReference);
            }
            if kinds[coords] != CellKind::Safe {
                return Err(GameError::InvalidConfiguration);
            }
            kinds[coords] = kind;
        }

        Ok(Self::from_kinds(kinds))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCellReference)
        }
    }

    pub fn size(&self) -> Coord2 {
        self.kinds.dim()
    }

    pub fn total_cells(&self) -> usize {
        self.kinds.len()
    }

    pub fn treasure_count(&self) -> usize {
        self.treasure_count
    }

    pub fn bomb_count(&self) -> usize {
        self.bomb_count
    }

    pub fn safe_count(&self) -> usize {
        self.total_cells() - self.treasure_count - self.bomb_count
    }

    pub fn kind_at(&self, coords: Coord2) -> Result<CellKind> {
        let coords = self.validate_coords(coords)?;
        Ok(self.kinds[coords])
    }

    pub fn indexed_kinds(&self) -> impl Iterator<Item = (Coord2, CellKind)> + '_ {
        self.kinds.indexed_iter().map(|(coords, &kind)| (coords, kind))
    }
}

impl Index<Coord2> for GridLayout {
    type Output = CellKind;

    fn index(&self, index: Coord2) -> &Self::Output {
        &self.kinds[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_from_coords_tracks_counts() {
        let layout =
            GridLayout::from_coords((5, 5), &[(0, 0), (0, 1)], &[(1, 0), (1, 1), (1, 2)]).unwrap();

        assert_eq!(layout.size(), (5, 5));
        assert_eq!(layout.treasure_count(), 2);
        assert_eq!(layout.bomb_count(), 3);
        assert_eq!(layout.safe_count(), 20);
        assert_eq!(layout[(0, 0)], CellKind::Treasure);
        assert_eq!(layout[(1, 2)], CellKind::Bomb);
        assert_eq!(layout[(4, 4)], CellKind::Safe);
    }

    #[test]
    fn layout_rejects_out_of_range_coords() {
        let result = GridLayout::from_coords((2, 2), &[(2, 0)], &[]);
        assert_eq!(result.unwrap_err(), GameError::InvalidCellReference);
    }

    #[test]
    fn layout_rejects_overlapping_coords() {
        let result = GridLayout::from_coords((2, 2), &[(0, 0)], &[(0, 0)]);
        assert_eq!(result.unwrap_err(), GameError::InvalidConfiguration);
    }

    #[test]
    fn validate_coords_checks_both_axes() {
        let layout = GridLayout::from_coords((3, 2), &[(0, 0)], &[(1, 1)]).unwrap();

        assert_eq!(layout.validate_coords((2, 1)), Ok((2, 1)));
        assert_eq!(
            layout.validate_coords((3, 0)),
            Err(GameError::InvalidCellReference)
        );
        assert_eq!(
            layout.validate_coords((0, 2)),
            Err(GameError::InvalidCellReference)
        );
    }

    #[test]
    fn default_config_is_a_five_by_five_board() {
        let config = GridConfig::default();

        assert_eq!(config.total_cells(), 25);
        assert_eq!(config.min_treasures, 1);
        assert_eq!(config.max_treasures, 24);
        assert_eq!(config.default_bet, 10);
    }
}
