/// Two-dimensional grid coordinates `(row, col)`.
pub type Coord2 = (usize, usize);

/// Currency unit used for bets, balances and payouts.
pub type Coins = u64;
