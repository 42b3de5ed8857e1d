//! Ship rating computation.

/// Last production year a ship may carry; ratings are relative to it.
pub const CURRENT_YEAR: i32 = 3019;

const RATING_SCALE: f64 = 80.0;
const USED_PENALTY: f64 = 0.5;

/// Compute the rating for a ship built in `year`.
///
/// `80 * speed * k / (3019 - year + 1)` where `k` is 0.5 for used ships,
/// rounded half-up to two decimals.
pub fn compute_rating(speed: f64, used: bool, year: i32) -> f64 {
    let wear = if used { USED_PENALTY } else { 1.0 };
    let age = f64::from(CURRENT_YEAR - year + 1);
    round_half_up_2(RATING_SCALE * speed * wear / age)
}

/// Round half-up to two decimals on the shortest decimal form of `value`.
///
/// Working on the printed digits keeps `1.005` at `1.01`, which scaling by
/// 100 in binary floating point would turn into `1.00`.
pub fn round_half_up_2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let repr = format!("{}", value.abs());
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let Ok(whole) = whole.parse::<i64>() else {
        return value;
    };
    let mut digits = fraction.bytes().map(|digit| i64::from(digit - b'0'));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);
    let carry = i64::from(digits.next().is_some_and(|digit| digit >= 5));
    let Some(cents) = whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(tenths * 10 + hundredths + carry))
    else {
        return value;
    };
    (cents as f64 / 100.0).copysign(value)
}
