use crate::config::{CORPORATE_BUYER_SHARE, INDIVIDUAL_BUYER_SHARE};
use crate::housing::OwnerType;

/// Decide who buys a unit from a single uniform draw.
///
/// When corporations may buy they take the bottom 60% of the draw; the
/// remainder is rescaled to `[0, 1)` and split 62.5% individual landlords,
/// 37.5% homeowners. Without corporations the raw draw is split the same
/// way. The draw is reused rather than redrawn so every sale costs exactly
/// one random value.
pub fn resolve_buyer(roll: f64, corporations_can_buy: bool) -> OwnerType {
    if corporations_can_buy && roll < CORPORATE_BUYER_SHARE {
        return OwnerType::Corporate;
    }
    let other = if corporations_can_buy {
        (roll - CORPORATE_BUYER_SHARE) / (1.0 - CORPORATE_BUYER_SHARE)
    } else {
        roll
    };
    if other < INDIVIDUAL_BUYER_SHARE {
        OwnerType::Individual
    } else {
        OwnerType::Homeowner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_with_corporations() {
        let cases = [
            (0.0, OwnerType::Corporate),
            (0.599, OwnerType::Corporate),
            (0.60, OwnerType::Individual),
            (0.849999, OwnerType::Individual),
            (0.85, OwnerType::Homeowner),
            (0.999, OwnerType::Homeowner),
        ];
        for (roll, expected) in cases {
            assert_eq!(resolve_buyer(roll, true), expected, "roll {roll}");
        }
    }

    #[test]
    fn test_partition_without_corporations() {
        let cases = [
            (0.0, OwnerType::Individual),
            (0.624999, OwnerType::Individual),
            (0.625, OwnerType::Homeowner),
            (0.999, OwnerType::Homeowner),
        ];
        for (roll, expected) in cases {
            assert_eq!(resolve_buyer(roll, false), expected, "roll {roll}");
        }
    }

    #[test]
    fn test_never_unowned() {
        for i in 0..1000 {
            let roll = f64::from(i) / 1000.0;
            assert_ne!(resolve_buyer(roll, true), OwnerType::Unowned);
            assert_ne!(resolve_buyer(roll, false), OwnerType::Unowned);
        }
    }

    #[test]
    fn test_shares_over_uniform_grid() {
        let n = 100_000u32;
        let mut corp = 0u32;
        let mut ind = 0u32;
        let mut home = 0u32;
        for i in 0..n {
            match resolve_buyer(f64::from(i) / f64::from(n), true) {
                OwnerType::Corporate => corp += 1,
                OwnerType::Individual => ind += 1,
                OwnerType::Homeowner => home += 1,
                OwnerType::Unowned => unreachable!(),
            }
        }
        assert!((f64::from(corp) / f64::from(n) - 0.60).abs() < 0.001);
        assert!((f64::from(ind) / f64::from(n) - 0.25).abs() < 0.001);
        assert!((f64::from(home) / f64::from(n) - 0.15).abs() < 0.001);
    }
}
