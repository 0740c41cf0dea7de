use crate::types::Coins;

/// Full-clear payout for a round.
///
/// The win probability model is `p = treasures / (treasures + bombs)`, and the payout
/// is `bet * multiplier * (1 / p)`, floored. The caller guarantees that
/// `treasures + bombs > 0` (enforced by session validation before a round starts).
pub fn potential_win(bet: Coins, treasures: usize, bombs: usize, multiplier: f64) -> Coins {
    let probability = treasures as f64 / (treasures + bombs) as f64;
    (bet as f64 * multiplier * (1.0 / probability)).floor() as Coins
}

/// Value paid out when the player banks a partially completed round.
///
/// Scales the base win with the fraction of treasures already found, then applies a
/// progressive bonus for the risk taken: up to +80% as bombs dominate the board.
/// Non-decreasing in `found` for fixed bet, target and bomb count.
pub fn cash_out_value(
    bet: Coins,
    found: usize,
    target: usize,
    bombs: usize,
    multiplier: f64,
) -> Coins {
    let treasure_ratio = found as f64 / target as f64;
    let risk_factor = bombs as f64 / (target + bombs) as f64;
    let progressive_multiplier = 1.0 + risk_factor * 0.8;
    (bet as f64 * treasure_ratio * multiplier * progressive_multiplier).floor() as Coins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn potential_win_uses_inverse_probability() {
        // p = 5/10, payout = 10 * 2.0 * 2 = 40
        assert_eq!(potential_win(10, 5, 5, 2.0), 40);
        // p = 5/25, payout = 10 * 2.0 * 5 = 100
        assert_eq!(potential_win(10, 5, 20, 2.0), 100);
        // p = 24/25, payout = floor(10 * 2.0 * 25/24) = floor(20.83..) = 20
        assert_eq!(potential_win(10, 24, 1, 2.0), 20);
    }

    #[test]
    fn cash_out_matches_worked_examples() {
        // ratio 2/5, risk 5/10, progressive 1.4 -> floor(10 * 0.4 * 2.0 * 1.4) = 11
        assert_eq!(cash_out_value(10, 2, 5, 5, 2.0), 11);
        // full clear with the same shape: floor(10 * 1.0 * 2.0 * 1.4) = 28
        assert_eq!(cash_out_value(10, 5, 5, 5, 2.0), 28);
        assert_eq!(cash_out_value(100, 1, 1, 24, 2.0), 353);
    }

    #[test]
    fn cash_out_is_monotonic_in_found_treasures() {
        for bombs in 1..=20 {
            let mut previous = 0;
            for found in 1..=5 {
                let value = cash_out_value(10, found, 5, bombs, 2.0);
                assert!(value >= previous);
                previous = value;
            }
        }
    }

    #[test]
    fn progressive_bonus_caps_below_eighty_percent() {
        // risk factor approaches 1 as bombs dominate, so the bonus approaches but
        // never reaches +80% of the base value
        let base = 10.0 * 1.0 * 2.0;
        let value = cash_out_value(10, 1, 1, 1000, 2.0);
        assert!(value as f64 <= base * 1.8);
        assert!(value as f64 >= base * 1.75);
    }

    #[test]
    fn full_clear_cash_out_never_beats_potential_win() {
        // Documents the actual relationship between the two formulas: the progressive
        // bonus caps at +80% while the inverse-probability payout grows without bound,
        // so banking a finished board always pays at most the full-clear payout.
        for treasures in 1..=12 {
            for bombs in 1..=12 {
                let banked = cash_out_value(100, treasures, treasures, bombs, 2.0);
                let full = potential_win(100, treasures, bombs, 2.0);
                assert!(
                    banked <= full,
                    "banked {} > full {} at t={} b={}",
                    banked,
                    full,
                    treasures,
                    bombs
                );
            }
        }
    }
}
