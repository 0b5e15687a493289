//! Average-cost arithmetic for the two calculation options.

use crate::types::{CalculationRequest, CalculationResult, Holdings, Mode, Outcome, Quote};
use crate::utils::parse_number;

pub const MSG_INVALID_CORE: &str = "Please enter valid numbers for tokens, cost, and price.";
pub const MSG_INVALID_TARGET: &str = "Please enter a valid target average.";
pub const MSG_INVALID_AMOUNT: &str = "Please enter a valid amount to invest.";
pub const MSG_NON_POSITIVE_PRICE: &str = "Current price must be greater than zero to invest.";
pub const MSG_NEGATIVE_PRICE: &str = "Current price cannot be negative.";
pub const MSG_NO_AVERAGE: &str = "Unable to compute a new average with these values.";

/// Validate the form, then solve for the selected option. First failing check wins.
pub fn calculate(
    holdings: &Holdings,
    quote: &Quote,
    request: &CalculationRequest,
) -> CalculationResult {
    let price = quote.current_unit_price.as_deref().and_then(parse_number);
    let (Some(t), Some(c), Some(p)) = (
        parse_number(&holdings.quantity_owned),
        parse_number(&holdings.total_cost_spent),
        price,
    ) else {
        return CalculationResult::ValidationError(MSG_INVALID_CORE.to_string());
    };

    match request.mode {
        Mode::TargetAverage => match parse_number(&request.target_average) {
            Some(a) => units_for_target(t, c, p, a),
            None => CalculationResult::ValidationError(MSG_INVALID_TARGET.to_string()),
        },
        Mode::AvailableToInvest => match parse_number(&request.investable_amount) {
            Some(m) => average_after_invest(t, c, p, m),
            None => CalculationResult::ValidationError(MSG_INVALID_AMOUNT.to_string()),
        },
    }
}

/// Units to buy at `p` so that (c + n*p) / (t + n) == a.
fn units_for_target(t: f64, c: f64, p: f64, a: f64) -> CalculationResult {
    if p < 0.0 {
        return CalculationResult::ValidationError(MSG_NEGATIVE_PRICE.to_string());
    }
    if p == a {
        return CalculationResult::Success(Outcome::NoPurchaseNeeded);
    }
    let n = (a * t - c) / (p - a);
    // NaN falls through to unreachable as well
    if !(n > 0.0) || !n.is_finite() {
        return CalculationResult::Success(Outcome::TargetUnreachable);
    }
    CalculationResult::Success(Outcome::Purchase {
        units: n,
        spend: n * p,
        target_average: a,
    })
}

fn average_after_invest(t: f64, c: f64, p: f64, m: f64) -> CalculationResult {
    if p <= 0.0 {
        return CalculationResult::ValidationError(MSG_NON_POSITIVE_PRICE.to_string());
    }
    let new_units = m / p;
    let new_total_units = t + new_units;
    let new_total_cost = c + m;
    let new_average = new_total_cost / new_total_units;
    if !new_average.is_finite() {
        return CalculationResult::ValidationError(MSG_NO_AVERAGE.to_string());
    }
    CalculationResult::Success(Outcome::Investment {
        amount: m,
        units: new_units,
        new_average,
    })
}
