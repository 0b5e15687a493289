//! Calculator form: binds the typed fields to the calculator and renders the output.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::calculator::calculate;
use crate::price_lookup::{refresh_quote, PriceSource};
use crate::types::{CalculationRequest, CalculationResult, Holdings, Mode, Quote};
use crate::utils::format_average;

/// One snapshot of every field on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculatorForm {
    pub holdings: Holdings,
    pub quote: Quote,
    pub request: CalculationRequest,
}

impl CalculatorForm {
    pub fn average_display(&self) -> String {
        format_average(self.holdings.average_cost())
    }

    pub fn calculate(&self) -> CalculationResult {
        calculate(&self.holdings, &self.quote, &self.request)
    }

    /// Derived average line followed by the result text.
    pub fn render_result(&self, result: &CalculationResult) -> String {
        format!(
            "Average price per token: {}\n{}",
            self.average_display(),
            result.message()
        )
    }

    /// Fetch the price for the form's pair, keeping the typed price on any failure.
    pub async fn fetch_price(&mut self, source: &dyn PriceSource) -> bool {
        refresh_quote(source, &mut self.quote).await
    }
}

/// Source of answers for the interactive form.
#[async_trait]
pub trait Prompter: Send {
    async fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers from stdin on a blocking thread.
pub struct StdinPrompter;

#[async_trait]
impl Prompter for StdinPrompter {
    async fn ask(&mut self, prompt: &str) -> Result<String> {
        use std::io::{self, Write};
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || -> Result<String> {
            print!("{}", prompt);
            let _ = io::stdout().flush();
            let mut buf = String::new();
            if io::stdin().read_line(&mut buf)? == 0 {
                return Err(anyhow!("stdin closed"));
            }
            Ok(buf.trim().to_string())
        })
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?
    }
}

/// Walk the fields in form order. A non-blank pair is looked up before the price
/// prompt, and a fetched price becomes that prompt's default.
pub async fn prompt_form(
    prompter: &mut dyn Prompter,
    source: &dyn PriceSource,
) -> Result<CalculatorForm> {
    let mut form = CalculatorForm::default();
    form.holdings.quantity_owned = prompter.ask("Total tokens owned: ").await?;
    form.holdings.total_cost_spent = prompter.ask("Total cost for all tokens: ").await?;
    println!("Average price per token: {}", form.average_display());

    form.quote.pair_id = prompter.ask("Pair address (blank to skip): ").await?;
    form.fetch_price(source).await;

    let price_prompt = match &form.quote.current_unit_price {
        Some(p) => format!("Current price of the token [{}]: ", p),
        None => "Current price of the token: ".to_string(),
    };
    let typed = prompter.ask(&price_prompt).await?;
    if !typed.is_empty() {
        form.quote.current_unit_price = Some(typed);
    }

    let mode = loop {
        let raw = prompter.ask("Calculation option (target/available) [target]: ").await?;
        if raw.is_empty() {
            break Mode::TargetAverage;
        }
        match raw.parse::<Mode>() {
            Ok(m) => break m,
            Err(e) => println!("{}", e),
        }
    };
    form.request.mode = mode;
    match mode {
        Mode::TargetAverage => {
            form.request.target_average = prompter.ask("Target average price: ").await?;
        }
        Mode::AvailableToInvest => {
            form.request.investable_amount = prompter.ask("Amount available to invest: ").await?;
        }
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price_lookup::LookupError;
    use std::collections::VecDeque;

    /// Canned answers, consumed in order.
    struct ScriptedPrompter {
        answers: VecDeque<String>,
    }

    impl ScriptedPrompter {
        fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: answers.into_iter().map(Into::into).collect(),
            }
        }
    }

    #[async_trait]
    impl Prompter for ScriptedPrompter {
        async fn ask(&mut self, prompt: &str) -> Result<String> {
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow!("no answer left for {:?}", prompt))
        }
    }

    struct FixedSource(Option<&'static str>);

    #[async_trait]
    impl PriceSource for FixedSource {
        async fn fetch_price(&self, _pair_id: &str) -> Result<Option<String>, LookupError> {
            Ok(self.0.map(str::to_string))
        }
    }

    #[test]
    fn render_shows_average_then_result() {
        let form = CalculatorForm {
            holdings: Holdings::new("10", "500"),
            quote: Quote::new("", Some("40".into())),
            request: CalculationRequest::invest("400"),
        };
        assert_eq!(
            form.render_result(&form.calculate()),
            "Average price per token: 50.0000\nAfter investing $400.00, you can buy 10.0000 tokens, and your new average price will be $45.00."
        );
    }

    #[test]
    fn render_blank_form() {
        let form = CalculatorForm::default();
        assert_eq!(
            form.render_result(&form.calculate()),
            "Average price per token: -\nPlease enter valid numbers for tokens, cost, and price."
        );
    }

    #[tokio::test]
    async fn fetched_price_is_default_for_price_prompt() {
        let mut p = ScriptedPrompter::new(["100", "5000", "0xpair", "", "", "45"]);
        let form = prompt_form(&mut p, &FixedSource(Some("40"))).await.unwrap();
        assert_eq!(form.quote.current_unit_price.as_deref(), Some("40"));
        assert_eq!(form.request.mode, Mode::TargetAverage);
        assert_eq!(
            form.calculate().message(),
            "You need to buy 100.0000 tokens, spending $4000.00 to reach an average of $45.00."
        );
    }

    #[tokio::test]
    async fn typed_price_wins_over_fetch() {
        let mut p = ScriptedPrompter::new(["10", "500", "0xpair", "40", "available", "400"]);
        let form = prompt_form(&mut p, &FixedSource(Some("99"))).await.unwrap();
        assert_eq!(form.quote.current_unit_price.as_deref(), Some("40"));
        assert_eq!(form.request.mode, Mode::AvailableToInvest);
        assert_eq!(form.request.investable_amount, "400");
    }

    #[tokio::test]
    async fn unknown_option_is_asked_again() {
        let mut p = ScriptedPrompter::new(["10", "500", "", "40", "both", "Available", "400"]);
        let form = prompt_form(&mut p, &FixedSource(None)).await.unwrap();
        assert_eq!(form.request.mode, Mode::AvailableToInvest);
        assert!(form.calculate().is_success());
    }

    #[tokio::test]
    async fn running_out_of_answers_is_an_error() {
        let mut p = ScriptedPrompter::new(["10"]);
        assert!(prompt_form(&mut p, &FixedSource(None)).await.is_err());
    }
}
