//! Psychological (round-number) levels: multiples of a fixed step.

/// Largest multiple of `step` at or below `price`.
pub fn first_multiple_down(price: f64, step: f64) -> f64 {
    (price / step).floor() * step
}

/// Smallest multiple of `step` at or above `price`.
pub fn first_multiple_up(price: f64, step: f64) -> f64 {
    (price / step).ceil() * step
}

/// Multiple of `step` nearest to `price`; an exact tie resolves downward.
pub fn nearest_multiple(price: f64, step: f64) -> f64 {
    let smaller = first_multiple_down(price, step);
    let larger = first_multiple_up(price, step);
    if price - smaller > larger - price {
        larger
    } else {
        smaller
    }
}
