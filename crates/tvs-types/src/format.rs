use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};

const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Render a USD amount the way it is shown in the bot status.
///
/// Amounts from one million upwards are abbreviated with an `M` or `B`
/// suffix, smaller ones are written out with thousands separators. Every
/// branch keeps exactly two decimals, rounded half away from zero.
/// Inputs are expected to be finite and non-negative, anything non-finite
/// renders as `$0.00`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }

    if value >= BILLION {
        format!("${}B", round_2dp(value / BILLION))
    } else if value >= MILLION {
        format!("${}M", round_2dp(value / MILLION))
    } else {
        format!("${}", group_thousands(&round_2dp(value)))
    }
}

fn round_2dp(value: f64) -> String {
    // Out of `Decimal` range (about 7.9e28), plain float formatting is close enough.
    let Some(decimal) = Decimal::from_f64(value) else {
        return format!("{value:.2}");
    };

    let mut rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Insert `,` every three digits of the integer part of a plain decimal string.
fn group_thousands(amount: &str) -> String {
    let (sign, unsigned) = amount
        .strip_prefix('-')
        .map_or(("", amount), |rest| ("-", rest));
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}
