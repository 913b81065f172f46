//! Price helpers for decorations.

/// Percentage saved when buying at `discounted` instead of `original`,
/// rounded to two decimal places.
///
/// A zero (or negative) original price has no meaningful discount and yields
/// `0.0`. A discounted price above the original yields a negative value,
/// which callers may reject.
pub fn discount_percentage(original: f64, discounted: f64) -> f64 {
    if original <= 0.0 || !original.is_finite() || !discounted.is_finite() {
        return 0.0;
    }
    let pct = (original - discounted) / original * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Returns `true` if `price` is usable as a catalog price.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_percentage() {
        assert_eq!(discount_percentage(100.0, 75.0), 25.0);
        assert_eq!(discount_percentage(30.0, 20.0), 33.33);
        assert_eq!(discount_percentage(50.0, 50.0), 0.0);
    }

    #[test]
    fn test_zero_original_price() {
        assert_eq!(discount_percentage(0.0, 0.0), 0.0);
        assert_eq!(discount_percentage(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_price_validation() {
        assert!(is_valid_price(0.0));
        assert!(is_valid_price(12.5));
        assert!(!is_valid_price(-1.0));
        assert!(!is_valid_price(f64::NAN));
        assert!(!is_valid_price(f64::INFINITY));
    }
}
