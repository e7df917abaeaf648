//! CLI definition and dispatch.
//!
//! Every subcommand talks to the backend through the same [`TradingApi`]
//! the web dashboard uses, and applies the same client-side validation.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_api::HttpTradingApi;
use crate::domain::display::{format_optional_timestamp, format_price, format_timestamp};
use crate::domain::error::DashboardError;
use crate::domain::health::HealthMonitor;
use crate::domain::health_poller::HealthPoller;
use crate::domain::order::OrderDraft;
use crate::domain::settings::{API_URL_ENV, Settings};
use crate::domain::signal::{DEFAULT_PAGE_SIZE, SignalDraft, SignalQuery};
use crate::ports::trading_api::TradingApi;

#[derive(Parser, Debug)]
#[command(name = "futdash", about = "Futures auto-trading dashboard")]
pub struct Cli {
    /// INI config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Backend base URL; overrides [api] base_url
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web dashboard
    Serve,
    /// Show backend health
    Health {
        /// Keep polling until interrupted
        #[arg(long)]
        watch: bool,
        /// Poll interval in seconds; defaults to [dashboard] health_poll_secs
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Inspect and manage strategies
    Strategies {
        #[command(subcommand)]
        action: StrategiesCommand,
    },
    /// List orders or place a manual order
    Orders {
        #[command(subcommand)]
        action: OrdersCommand,
    },
    /// Browse signal history
    Signals {
        #[command(subcommand)]
        action: SignalsCommand,
    },
    /// Send a manual signal
    Signal {
        #[command(subcommand)]
        action: SignalCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum StrategiesCommand {
    List {
        #[arg(long)]
        enabled_only: bool,
    },
    Show {
        name: String,
    },
    /// Flip a strategy between enabled and disabled
    Toggle {
        name: String,
    },
    Delete {
        name: String,
        /// Confirm the delete; nothing is sent without it
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    List {
        /// Only orders with fill information
        #[arg(long)]
        filled: bool,
    },
    Place {
        #[arg(long)]
        product: String,
        /// B or S
        #[arg(long, default_value = "B")]
        side: String,
        /// L, M or P
        #[arg(long, default_value = "L")]
        order_type: String,
        #[arg(long, default_value = "0")]
        price: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
        /// R, I or F
        #[arg(long, default_value = "R")]
        condition: String,
        /// Empty for auto, 0 open, 1 close
        #[arg(long, default_value = "")]
        open_close: String,
        /// Y or N
        #[arg(long, default_value = "N")]
        dtrade: String,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        sub_account: Option<String>,
        #[arg(long)]
        strategy: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SignalsCommand {
    List {
        #[arg(long)]
        strategy: Option<String>,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    Show {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum SignalCommand {
    Send {
        strategy: String,
        /// long_entry, long_exit, short_entry or short_exit
        #[arg(long, default_value = "long_entry")]
        kind: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn execute(cli: Cli) -> Result<(), DashboardError> {
    let settings = load_settings(cli.config.as_deref(), cli.api_url.as_deref())?;
    init_tracing(&settings.log_filter);
    let api: Arc<dyn TradingApi> = Arc::new(HttpTradingApi::from_settings(&settings)?);

    let runtime = tokio::runtime::Runtime::new()?;
    let mut stdout = std::io::stdout();
    runtime.block_on(dispatch(cli.command, settings, api, &mut stdout))
}

pub fn load_settings(
    config_path: Option<&Path>,
    api_url: Option<&str>,
) -> Result<Settings, DashboardError> {
    let config = match config_path {
        Some(path) => FileConfigAdapter::from_file(path)?,
        None => FileConfigAdapter::empty(),
    };
    Settings::from_config(&config, api_url)
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn dispatch(
    command: Command,
    settings: Settings,
    api: Arc<dyn TradingApi>,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    match command {
        Command::Serve => serve(settings, api).await,
        Command::Health { watch: false, .. } => {
            let status = api.health().await?;
            let mut monitor = HealthMonitor::new();
            monitor.apply(Ok(status));
            writeln!(out, "{}", describe_health(&monitor))?;
            Ok(())
        }
        Command::Health {
            watch: true,
            interval,
        } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(settings.health_poll)
                .max(Duration::from_secs(1));
            watch_health(api, interval, out).await
        }
        Command::Strategies { action } => run_strategies(action, api.as_ref(), out).await,
        Command::Orders { action } => run_orders(action, api.as_ref(), out).await,
        Command::Signals { action } => run_signals(action, api.as_ref(), out).await,
        Command::Signal {
            action:
                SignalCommand::Send {
                    strategy,
                    kind,
                    quantity,
                    price,
                    product,
                    note,
                },
        } => {
            let draft = SignalDraft {
                strategy,
                signal: kind,
                quantity: quantity.to_string(),
                price: price.map(|p| p.to_string()).unwrap_or_default(),
                product: product.unwrap_or_default(),
                note: note.unwrap_or_default(),
            };
            let request = draft.validate()?;
            let response = api.send_signal(&request).await?;
            writeln!(out, "{}", response.summary())?;
            if let Some(id) = response.signal_id {
                writeln!(out, "signal id: {id}")?;
            }
            Ok(())
        }
    }
}

#[cfg(feature = "web")]
async fn serve(settings: Settings, api: Arc<dyn TradingApi>) -> Result<(), DashboardError> {
    crate::adapters::web::serve(crate::adapters::web::AppState::new(api, settings)).await
}

#[cfg(not(feature = "web"))]
async fn serve(_settings: Settings, _api: Arc<dyn TradingApi>) -> Result<(), DashboardError> {
    Err(DashboardError::ConfigInvalid {
        section: "web".to_string(),
        key: "listen".to_string(),
        reason: "built without the web feature".to_string(),
    })
}

pub fn describe_health(monitor: &HealthMonitor) -> String {
    let mut line = match monitor.last_known() {
        Some(h) => {
            let mut s = format!("status: {}  unitrade: {}", h.status, h.unitrade);
            if let Some(err) = &h.error {
                s.push_str(&format!("  error: {err}"));
            }
            s
        }
        None => "status: unknown".to_string(),
    };
    if monitor.is_stale() {
        line.push_str(" (stale)");
    }
    if let Some(err) = monitor.last_error() {
        line.push_str(&format!("  last poll failed: {err}"));
    }
    line
}

async fn watch_health(
    api: Arc<dyn TradingApi>,
    interval: Duration,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    let poller = HealthPoller::spawn(api, interval);
    let mut rx = poller.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = describe_health(&rx.borrow_and_update());
                writeln!(out, "{} {line}", chrono::Local::now().format("%H:%M:%S"))?;
            }
        }
    }
    Ok(())
}

async fn run_strategies(
    action: StrategiesCommand,
    api: &dyn TradingApi,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    match action {
        StrategiesCommand::List { enabled_only } => {
            let list = api.list_strategies(enabled_only).await?;
            if list.is_empty() {
                writeln!(out, "no strategies")?;
            }
            for s in &list {
                writeln!(
                    out,
                    "{:<24} {:<8} {:<20} x{:<3} max {:<4} entry {} / exit {}",
                    s.strategy_name,
                    if s.enabled { "enabled" } else { "disabled" },
                    s.mapping(),
                    s.quantity_multiplier,
                    s.max_position,
                    s.entry_summary(),
                    s.exit_summary(),
                )?;
            }
        }
        StrategiesCommand::Show { name } => {
            let s = api.get_strategy(&name).await?;
            let json = serde_json::to_string_pretty(&s).map_err(|e| DashboardError::Decode {
                reason: e.to_string(),
            })?;
            writeln!(out, "{json}")?;
        }
        StrategiesCommand::Toggle { name } => {
            let s = api.toggle_strategy(&name).await?;
            writeln!(
                out,
                "{} is now {}",
                s.strategy_name,
                if s.enabled { "enabled" } else { "disabled" }
            )?;
        }
        StrategiesCommand::Delete { name, yes } => {
            if !yes {
                return Err(DashboardError::validation(
                    "yes",
                    format!("pass --yes to confirm deleting '{name}'"),
                ));
            }
            let ack = api.delete_strategy(&name).await?;
            writeln!(out, "{}", ack.message.unwrap_or(ack.status))?;
        }
    }
    Ok(())
}

async fn run_orders(
    action: OrdersCommand,
    api: &dyn TradingApi,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    match action {
        OrdersCommand::List { filled } => {
            let orders = api.list_orders().await?;
            for o in orders.iter().filter(|o| !filled || o.has_fill()) {
                writeln!(
                    out,
                    "{:<20} {:<8} {} {:>3} @ {:<10} {:<14} {}",
                    format_optional_timestamp(o.created_at.as_deref()),
                    o.symbol,
                    o.action,
                    o.quantity,
                    format_price(o.price),
                    o.status,
                    o.reference(),
                )?;
            }
        }
        OrdersCommand::Place {
            product,
            side,
            order_type,
            price,
            qty,
            condition,
            open_close,
            dtrade,
            note,
            account,
            sub_account,
            strategy,
        } => {
            let draft = OrderDraft {
                actno: account.unwrap_or_default(),
                subactno: sub_account.unwrap_or_default(),
                productid: product,
                bs: side,
                ordertype: order_type,
                price,
                orderqty: qty.to_string(),
                ordercondition: condition,
                opencloseflag: open_close,
                dtrade,
                note,
                strategy: strategy.unwrap_or_default(),
            };
            let request = draft.validate()?;
            tracing::info!(product = %request.productid, qty = request.orderqty, "placing order");
            let response = api.place_order(&request).await?;
            let status = if response.status.is_empty() {
                "ok"
            } else {
                response.status.as_str()
            };
            writeln!(out, "下單結果：{status}")?;
            if let Some(id) = &response.order_id {
                writeln!(out, "order id: {id}")?;
            }
        }
    }
    Ok(())
}

async fn run_signals(
    action: SignalsCommand,
    api: &dyn TradingApi,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    match action {
        SignalsCommand::List {
            strategy,
            limit,
            offset,
        } => {
            let query = SignalQuery {
                limit,
                offset,
                strategy,
            }
            .normalized();
            let signals = api.list_signals(&query).await?;
            for s in &signals {
                let flag = if s.needs_attention() { "!" } else { " " };
                writeln!(
                    out,
                    "{flag}{:>6} {:<20} {:<20} {:<10} {:<10} {}",
                    s.id,
                    format_timestamp(&s.created_at),
                    s.strategy_name,
                    s.kind_label(),
                    s.status,
                    s.error_message.as_deref().unwrap_or(""),
                )?;
            }
        }
        SignalsCommand::Show { id } => {
            let s = api.get_signal(id).await?;
            let json = serde_json::to_string_pretty(&s).map_err(|e| DashboardError::Decode {
                reason: e.to_string(),
            })?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}
