use crate::*;

/// Generation strategy that deals treasures, bombs and safe cells uniformly over the board
/// with an unbiased shuffle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomGridGenerator {
    seed: u64,
}

impl RandomGridGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generator for normal play, seeded from the OS. Tests use `new` with a fixed
    /// seed to get reproducible layouts.
    pub fn from_entropy() -> Self {
        use rand::Rng;
        Self {
            seed: rand::rng().random(),
        }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: &GridConfig, treasures: usize, bombs: usize) -> Result<GridLayout> {
        use rand::prelude::*;

        let total_cells = config.total_cells();

        if treasures < 1 || bombs < 1 || treasures + bombs > total_cells {
            log::warn!(
                "Rejected grid request: {} treasures + {} bombs do not fit {} cells",
                treasures,
                bombs,
                total_cells
            );
            return Err(GameError::InvalidConfiguration);
        }

        let safe_cells = total_cells - treasures - bombs;
        let mut kinds = Vec::with_capacity(total_cells);
        kinds.extend(core::iter::repeat(CellKind::Treasure).take(treasures));
        kinds.extend(core::iter::repeat(CellKind::Bomb).take(bombs));
        kinds.extend(core::iter::repeat(CellKind::Safe).take(safe_cells));

        let mut rng = SmallRng::seed_from_u64(self.seed);
        kinds.shuffle(&mut rng);

        let kinds = ndarray::Array2::from_shape_vec((config.rows, config.cols), kinds)
            .expect("kind list length matches grid shape");
        Ok(GridLayout::from_kinds(kinds))
    }
}
