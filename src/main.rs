//! Entry point. Wires CLI flags or prompts -> form -> (price lookup) -> calculator.

mod calculator;
mod config;
mod form;
mod price_lookup;
mod types;
mod utils;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::form::{prompt_form, CalculatorForm, StdinPrompter};
use crate::price_lookup::{refresh_quote, DexScreenerClient, PriceSource};
use crate::types::{CalculationRequest, Holdings, Quote};
use crate::utils::sanitize_pair_id;

#[derive(Parser, Debug)]
#[command(name = "dca-calculator", version, about = "How much to DCA")]
struct Cli {
    /// YAML config file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "config.yaml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Units to buy so the average cost reaches a target.
    Target {
        #[command(flatten)]
        position: PositionArgs,
        /// Target average price
        #[arg(long, default_value = "")]
        target: String,
    },
    /// New average cost after investing an amount at the current price.
    Invest {
        #[command(flatten)]
        position: PositionArgs,
        /// Amount available to invest
        #[arg(long, default_value = "")]
        amount: String,
    },
    /// Print the current price for a pair.
    Price { pair: String },
    /// Fill in the form field by field.
    Interactive,
}

// Plain strings: validation happens in the calculator, not in clap.
#[derive(Args, Debug)]
struct PositionArgs {
    /// Total tokens owned
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    tokens: String,
    /// Total cost for all tokens
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    cost: String,
    /// Current price of the token (replaced by a successful --pair lookup)
    #[arg(long, allow_hyphen_values = true)]
    price: Option<String>,
    /// Pair address to fetch the current price for
    #[arg(long, default_value = "")]
    pair: String,
}

impl PositionArgs {
    fn into_form(self, request: CalculationRequest) -> CalculatorForm {
        CalculatorForm {
            holdings: Holdings::new(self.tokens, self.cost),
            quote: Quote::new(self.pair, self.price),
            request,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // Load config
    let cfg = config::AppConfig::load_or_default(&cli.config)?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok(),
            &cfg.log.level,
        )?)
        .init();
    debug!("Config: {:?}", cfg);

    let source = DexScreenerClient::new(&cfg.quote).context("build quote client")?;

    let form = match cli.command {
        Command::Target { position, target } => {
            let mut form = position.into_form(CalculationRequest::target(target));
            form.fetch_price(&source).await;
            form
        }
        Command::Invest { position, amount } => {
            let mut form = position.into_form(CalculationRequest::invest(amount));
            form.fetch_price(&source).await;
            form
        }
        Command::Price { pair } => {
            println!("{}", price_line(&source, &pair).await);
            return Ok(());
        }
        // fetches while prompting
        Command::Interactive => prompt_form(&mut StdinPrompter, &source).await?,
    };

    let result = form.calculate();
    info!(
        "Calculated: option={}, pair={:?}, price={:?}, ok={}",
        form.request.mode,
        form.quote.pair_id,
        form.quote.current_unit_price,
        result.is_success()
    );
    println!("{}", form.render_result(&result));
    Ok(())
}

/// `RUST_LOG` when set, otherwise the configured level.
fn log_filter(from_env: Option<String>, default_level: &str) -> anyhow::Result<EnvFilter> {
    match from_env.filter(|s| !s.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {} {:?}", EnvFilter::DEFAULT_ENV, directives)),
        None => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level {:?}", default_level)),
    }
}

async fn price_line(source: &dyn PriceSource, pair: &str) -> String {
    let mut quote = Quote::new(sanitize_pair_id(pair), None);
    refresh_quote(source, &mut quote).await;
    match quote.current_unit_price {
        Some(p) => p,
        None => format!("No price found for pair {:?}", quote.pair_id),
    }
}
