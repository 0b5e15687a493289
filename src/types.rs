//! Form values and calculation outcomes.

use std::{fmt, str::FromStr};

use crate::utils::parse_number;

/// What the user currently holds, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Holdings {
    pub quantity_owned: String,
    pub total_cost_spent: String,
}

impl Holdings {
    pub fn new(quantity_owned: impl Into<String>, total_cost_spent: impl Into<String>) -> Self {
        Self {
            quantity_owned: quantity_owned.into(),
            total_cost_spent: total_cost_spent.into(),
        }
    }

    /// Total cost divided by quantity. `None` while either field is blank or
    /// unparsable, or when nothing is owned.
    pub fn average_cost(&self) -> Option<f64> {
        let qty = parse_number(&self.quantity_owned)?;
        let cost = parse_number(&self.total_cost_spent)?;
        if qty == 0.0 {
            return None;
        }
        let avg = cost / qty;
        avg.is_finite().then_some(avg)
    }
}

/// Pair identifier plus the price string, fetched or typed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quote {
    pub pair_id: String,
    pub current_unit_price: Option<String>,
}

impl Quote {
    pub fn new(pair_id: impl Into<String>, current_unit_price: Option<String>) -> Self {
        Self {
            pair_id: pair_id.into(),
            current_unit_price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    TargetAverage,
    AvailableToInvest,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "target" => Ok(Mode::TargetAverage),
            "available" => Ok(Mode::AvailableToInvest),
            other => anyhow::bail!("unknown calculation option: {other:?} (expected target|available)"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::TargetAverage => f.write_str("target"),
            Mode::AvailableToInvest => f.write_str("available"),
        }
    }
}

/// Selected mode and its parameter. Only the field matching `mode` is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationRequest {
    pub mode: Mode,
    pub target_average: String,
    pub investable_amount: String,
}

impl CalculationRequest {
    pub fn target(target_average: impl Into<String>) -> Self {
        Self {
            mode: Mode::TargetAverage,
            target_average: target_average.into(),
            investable_amount: String::new(),
        }
    }

    pub fn invest(investable_amount: impl Into<String>) -> Self {
        Self {
            mode: Mode::AvailableToInvest,
            target_average: String::new(),
            investable_amount: investable_amount.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Current price already equals the target average.
    NoPurchaseNeeded,
    /// Buying at the current price cannot move the average to the target.
    TargetUnreachable,
    Purchase {
        units: f64,
        spend: f64,
        target_average: f64,
    },
    Investment {
        amount: f64,
        units: f64,
        new_average: f64,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoPurchaseNeeded => {
                f.write_str("Current price equals target average; no purchase needed.")
            }
            Outcome::TargetUnreachable => f.write_str(
                "Target average already achieved or unreachable with current price.",
            ),
            Outcome::Purchase {
                units,
                spend,
                target_average,
            } => write!(
                f,
                "You need to buy {units:.4} tokens, spending ${spend:.2} to reach an average of ${target_average:.2}."
            ),
            Outcome::Investment {
                amount,
                units,
                new_average,
            } => write!(
                f,
                "After investing ${amount:.2}, you can buy {units:.4} tokens, and your new average price will be ${new_average:.2}."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalculationResult {
    ValidationError(String),
    Success(Outcome),
}

impl CalculationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CalculationResult::Success(_))
    }

    /// Display text for the result region.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationResult::ValidationError(msg) => f.write_str(msg),
            CalculationResult::Success(outcome) => write!(f, "{outcome}"),
        }
    }
}
