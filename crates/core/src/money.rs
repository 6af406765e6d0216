//! Currency display formatting over [`Decimal`] amounts.
//!
//! All pricing arithmetic stays in `Decimal`; these helpers apply locale
//! separators at presentation time only and never feed back into the
//! computed values. USD amounts render with a plain two-decimal format,
//! bolivar amounts with the es-VE convention (`.` thousands, `,` decimals).

use rust_decimal::{Decimal, RoundingStrategy};

/// Split an amount into sign, integer digits, and exactly two fraction digits.
fn two_dp_parts(amount: Decimal) -> (bool, String, String) {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.abs().is_zero();
    let text = rounded.abs().normalize().to_string();
    match text.split_once('.') {
        Some((int_part, frac)) => (negative, int_part.to_string(), format!("{frac:0<2}")),
        None => (negative, text, "00".to_string()),
    }
}

/// Format a USD amount with two decimals and no grouping, e.g. `350.00`.
pub fn format_usd(amount: Decimal) -> String {
    let (negative, int_part, frac) = two_dp_parts(amount);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{int_part}.{frac}")
}

/// Format a bolivar amount the es-VE way, e.g. `12.000,00`.
pub fn format_bs(amount: Decimal) -> String {
    let (negative, int_part, frac) = two_dp_parts(amount);

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac}")
}
