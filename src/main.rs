//! `frodo`: command-line front-end for the group-savings wallet core.
//!
//! Every wallet command runs the same lifecycle:
//!
//! ```text
//! load config → bootstrap → login(--wallet) → act → logout
//! ```

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use frodo_wallet::blockchain::Receipt;
use frodo_wallet::catalog;
use frodo_wallet::config::load_or_default;
use frodo_wallet::contracts::insurance::NewInsuranceCircle;
use frodo_wallet::contracts::lending::NewLendingCircle;
use frodo_wallet::contracts::{
    CircleSavings, ContractCall, MicroInsurance, MicroInsuranceFactory, MicroLending,
    MicroLendingFactory,
};
use frodo_wallet::lifecycle::signals::wait_for_signal;
use frodo_wallet::observability::logging;
use frodo_wallet::{bootstrap, App, Error, WalletKind};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "frodo")]
#[command(about = "Group savings, lending and insurance circles from the terminal", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wallet to log in with (embedded, injected, custodial)
    #[arg(short, long, default_value = "embedded")]
    wallet: WalletKind,

    /// Overrides the configured log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the session address and its native balance
    Balance,
    /// Sign a message with the active wallet
    Sign { message: String },
    /// Savings circle operations
    Circle {
        address: Address,
        #[command(subcommand)]
        action: CircleAction,
    },
    /// Lending circle operations
    Lending {
        address: Address,
        #[command(subcommand)]
        action: LendingAction,
    },
    /// Lending circle factory
    LendingFactory {
        /// Factory address; falls back to `contracts.lending_factory`
        #[arg(long)]
        factory: Option<Address>,
        #[command(subcommand)]
        action: LendingFactoryAction,
    },
    /// Insurance circle operations
    Insurance {
        address: Address,
        #[command(subcommand)]
        action: InsuranceAction,
    },
    /// Insurance circle factory
    InsuranceFactory {
        /// Factory address; falls back to `contracts.insurance_factory`
        #[arg(long)]
        factory: Option<Address>,
        #[command(subcommand)]
        action: InsuranceFactoryAction,
    },
    /// List group savings, or show one group
    Groups {
        /// Group id; lists every group when omitted
        id: Option<String>,
    },
    /// Group savings a user has invested in
    Investments { user: Address },
    /// List insurance circles, or show one circle
    InsuranceCircles {
        /// Circle id; lists every circle when omitted
        id: Option<String>,
    },
    /// Log in and follow the session until interrupted
    Watch {
        /// Connection check interval in seconds
        #[arg(long, default_value_t = 15)]
        interval: u64,
    },
}

#[derive(Subcommand)]
enum CircleAction {
    Info,
    Contribute,
    Withdraw,
    AddMember { member: Address },
    StartCycle { contribution_amount: U256 },
}

#[derive(Subcommand)]
enum LendingAction {
    Info,
    RequestMembership,
    Contribute,
    RequestLoan { amount: U256, duration: U256 },
    Vote {
        loan_id: U256,
        /// Vote against instead of in favor
        #[arg(long)]
        against: bool,
    },
    Repay { loan_id: U256, amount: U256 },
}

#[derive(Subcommand)]
enum LendingFactoryAction {
    Create {
        /// Defaults to the session address
        #[arg(long)]
        creator: Option<Address>,
        #[arg(long)]
        token: Address,
        #[arg(long)]
        contribution_amount: U256,
        /// Seconds
        #[arg(long)]
        period: U256,
        /// Initial interest rate in percent
        #[arg(long)]
        rate: f64,
    },
}

#[derive(Subcommand)]
enum InsuranceAction {
    Info,
    PayPremium,
    SubmitClaim { amount: U256 },
    VoteClaim {
        claim_id: U256,
        /// Vote against instead of in favor
        #[arg(long)]
        against: bool,
    },
}

#[derive(Subcommand)]
enum InsuranceFactoryAction {
    Create {
        #[arg(long)]
        token: Address,
        #[arg(long)]
        contribution_amount: U256,
        /// Seconds
        #[arg(long)]
        period: U256,
        /// Share of votes needed to pay a claim, in percent
        #[arg(long)]
        voting_threshold: f64,
        #[arg(long)]
        max_claim_amount: U256,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init(&level);

    if let Some(listing) = catalog_listing(&cli.command) {
        return print_json(&listing?);
    }

    let app = bootstrap(config)?;
    login(&app, cli.wallet).await?;

    let outcome = match cli.command {
        Commands::Watch { interval } => watch(&app, Duration::from_secs(interval)).await,
        command => run(&app, command).await,
    };

    app.store.logout().await;
    outcome
}

/// Login bounded by the confirmation window; injected and custodial logins may wait on the user.
async fn login(app: &App, kind: WalletKind) -> CliResult<()> {
    let limit = Duration::from_secs(app.config.chain.confirmation_timeout_secs);
    let info = tokio::time::timeout(limit, app.store.login(kind))
        .await
        .map_err(|_| format!("Login with {} timed out after {:?}", kind, limit))??;
    tracing::info!(address = %info.address_hex().unwrap_or_default(), "Session ready");
    Ok(())
}

async fn run(app: &App, command: Commands) -> CliResult<()> {
    let submitter = &app.submitter;

    match command {
        Commands::Balance => {
            let info = app.store.info();
            let balance = submitter.get_balance_ether().await?;
            print_json(&serde_json::json!({
                "wallet": info.wallet_kind,
                "address": info.address_hex(),
                "balance": balance,
            }))
        }
        Commands::Sign { message } => {
            let signature = app.store.sign_message(message.as_bytes()).await?;
            println!("{}", alloy::hex::encode_prefixed(signature.as_bytes()));
            Ok(())
        }
        Commands::Circle { address, action } => {
            let circle = CircleSavings::at(address);
            match action {
                CircleAction::Info => {
                    let me = session_address(app)?;
                    print_json(&serde_json::json!({
                        "address": circle.address(),
                        "token": submitter.read(&circle.token()).await?,
                        "contributionAmount": submitter.read(&circle.contribution_amount()).await?.to_string(),
                        "memberCount": submitter.read(&circle.get_member_count()).await?.to_string(),
                        "currentPeriod": submitter.read(&circle.get_current_period()).await?.to_string(),
                        "totalContributed": submitter.read(&circle.total_contributed()).await?.to_string(),
                        "isMember": submitter.read(&circle.members(me)).await?.isMember,
                    }))
                }
                CircleAction::Contribute => send(app, circle.contribute()).await,
                CircleAction::Withdraw => send(app, circle.withdraw()).await,
                CircleAction::AddMember { member } => send(app, circle.add_member(member)).await,
                CircleAction::StartCycle {
                    contribution_amount,
                } => send(app, circle.start_cycle(contribution_amount)).await,
            }
        }
        Commands::Lending { address, action } => {
            let lending = MicroLending::at(address);
            match action {
                LendingAction::Info => {
                    let me = session_address(app)?;
                    print_json(&serde_json::json!({
                        "address": lending.address(),
                        "lendingToken": submitter.read(&lending.lending_token()).await?,
                        "contributionAmount": submitter.read(&lending.contribution_amount()).await?.to_string(),
                        "memberBalance": submitter.read(&lending.member_balance(me)).await?.to_string(),
                        "contributionUpToDate": submitter.read(&lending.is_contribution_up_to_date(me)).await?,
                    }))
                }
                LendingAction::RequestMembership => send(app, lending.request_membership()).await,
                LendingAction::Contribute => send(app, lending.contribute()).await,
                LendingAction::RequestLoan { amount, duration } => {
                    send(app, lending.request_loan(amount, duration)).await
                }
                LendingAction::Vote { loan_id, against } => {
                    send(app, lending.vote(loan_id, !against)).await
                }
                LendingAction::Repay { loan_id, amount } => {
                    send(app, lending.repay_loan(loan_id, amount)).await
                }
            }
        }
        Commands::LendingFactory { factory, action } => {
            let factory = MicroLendingFactory::at(factory_address(
                factory,
                app.config.contracts.lending_factory.as_deref(),
                "lending_factory",
            )?);
            match action {
                LendingFactoryAction::Create {
                    creator,
                    token,
                    contribution_amount,
                    period,
                    rate,
                } => {
                    let params = NewLendingCircle {
                        creator: match creator {
                            Some(creator) => creator,
                            None => session_address(app)?,
                        },
                        token,
                        contribution_amount,
                        period,
                        initial_rate_percent: rate,
                    };
                    send(app, factory.create(&params)?).await
                }
            }
        }
        Commands::Insurance { address, action } => {
            let insurance = MicroInsurance::at(address);
            match action {
                InsuranceAction::Info => {
                    let me = session_address(app)?;
                    let status = submitter.read(&insurance.member_status(me)).await?;
                    print_json(&serde_json::json!({
                        "address": insurance.address(),
                        "totalMembers": submitter.read(&insurance.total_members()).await?.to_string(),
                        "poolBalance": submitter.read(&insurance.pool_balance()).await?.to_string(),
                        "isMember": status.isMember,
                        "isPending": status.isPending,
                        "premiumUpToDate": submitter.read(&insurance.is_premium_up_to_date(me)).await?,
                    }))
                }
                InsuranceAction::PayPremium => send(app, insurance.pay_premium()).await,
                InsuranceAction::SubmitClaim { amount } => {
                    send(app, insurance.submit_claim(amount)).await
                }
                InsuranceAction::VoteClaim { claim_id, against } => {
                    send(app, insurance.vote_on_claim(claim_id, !against)).await
                }
            }
        }
        Commands::InsuranceFactory { factory, action } => {
            let factory = MicroInsuranceFactory::at(factory_address(
                factory,
                app.config.contracts.insurance_factory.as_deref(),
                "insurance_factory",
            )?);
            match action {
                InsuranceFactoryAction::Create {
                    token,
                    contribution_amount,
                    period,
                    voting_threshold,
                    max_claim_amount,
                    name,
                } => {
                    let params = NewInsuranceCircle {
                        token,
                        contribution_amount,
                        period,
                        voting_threshold_percent: voting_threshold,
                        max_claim_amount,
                        name,
                    };
                    send(app, factory.create(&params)?).await
                }
            }
        }
        Commands::Groups { .. }
        | Commands::Investments { .. }
        | Commands::InsuranceCircles { .. }
        | Commands::Watch { .. } => Ok(()),
    }
}

/// Catalog commands answer without a wallet session; `None` for everything else.
fn catalog_listing(command: &Commands) -> Option<CliResult<serde_json::Value>> {
    let listing = match command {
        Commands::Groups { id: None } => serde_json::to_value(catalog::fetch_group_savings()),
        Commands::Groups { id: Some(id) } => serde_json::to_value(catalog::fetch_a_group_saving(id)),
        Commands::Investments { user } => {
            serde_json::to_value(catalog::fetch_investment_savings(&format!("{:#x}", user)))
        }
        Commands::InsuranceCircles { id: None } => serde_json::to_value(catalog::fetch_insurance_circles()),
        Commands::InsuranceCircles { id: Some(id) } => match catalog::fetch_an_insurance_circle(id) {
            Some(circle) => serde_json::to_value(circle),
            None => return Some(Err(format!("No insurance circle with id '{}'", id).into())),
        },
        _ => return None,
    };
    Some(listing.map_err(Into::into))
}

async fn send(app: &App, call: ContractCall) -> CliResult<()> {
    tracing::info!(target_address = %call.target, operation = call.signature, "Sending");
    let receipt: Receipt = app.submitter.submit_call(call).await?;
    print_json(&receipt)
}

async fn watch(app: &App, interval: Duration) -> CliResult<()> {
    let monitor = app.spawn_monitor(interval);
    let mut updates = app.store.subscribe();
    print_json(&app.store.info())?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let info = updates.borrow_and_update().clone();
                print_json(&info)?;
                if !info.is_authenticated {
                    break;
                }
            }
            _ = wait_for_signal() => break,
        }
    }

    app.shutdown.trigger();
    if let Err(e) = monitor.await {
        tracing::warn!(error = %e, "Connection monitor task failed");
    }
    Ok(())
}

fn session_address(app: &App) -> CliResult<Address> {
    app.store.address().ok_or_else(|| Error::NotAuthenticated.into())
}

fn factory_address(flag: Option<Address>, configured: Option<&str>, field: &str) -> CliResult<Address> {
    if let Some(address) = flag {
        return Ok(address);
    }
    let raw = configured.ok_or_else(|| format!("No --factory given and contracts.{} is not configured", field))?;
    Ok(raw.parse()?)
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
