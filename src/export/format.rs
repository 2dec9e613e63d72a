use rust_decimal::{Decimal, RoundingStrategy};

use crate::accounts::AmountStyle;

pub const DEFAULT_CATEGORY_SEPARATOR: &str = "::";

/// Two fraction digits, sign flipped and currency code appended as `style` asks.
///
/// Rounding works on the exact decimal with banker's rounding and zero never gets a sign,
/// so `2.675` prints as `2.68` and a negated `0.001` as `0.00`.
pub fn format_amount(amount: Decimal, currency_code: &str, style: AmountStyle) -> String {
    let amount = if style.negate { -amount } else { amount };
    let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    // Avoid printing "-0.00"
    let amount = if amount.is_zero() { Decimal::ZERO } else { amount };
    if style.show_currency {
        format!("{amount:.2} {currency_code}")
    } else {
        format!("{amount:.2}")
    }
}

/// Join a category path. Empty segments after the first are dropped.
pub fn format_category(category: &[String], separator: &str) -> String {
    let mut segments = category.iter();
    let mut joined = segments.next().cloned().unwrap_or_default();
    for segment in segments.filter(|segment| !segment.is_empty()) {
        joined.push_str(separator);
        joined.push_str(segment);
    }
    joined
}
