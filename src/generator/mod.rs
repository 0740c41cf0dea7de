use crate::*;
pub use random::*;

mod random;

/// Strategy that produces the fixed cell layout for a new round.
pub trait GridGenerator {
    fn generate(self, config: &GridConfig, treasures: usize, bombs: usize) -> Result<GridLayout>;
}
