//! Command Line Interface for the Dwitter client core.
//!
//! Drives the session/sync stack against the simulated chain: useful for
//! eyeballing the end-to-end flow without a wallet or a deployed contract.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use dwitter_domain::Address;
use dwitter_gateway::{ConfigError, DeploymentConfig};
use dwitter_session::{SessionManager, ViewSnapshot, ViewSyncCoordinator};
use dwitter_simulation::{InMemoryChain, SimConnector, SimWallet};
use std::sync::Arc;

/// Fallback deployment addresses when the environment sets none.
const DEMO_TWEET_CONTRACT: &str = "0x000000000000000000000000000000000000d001";
const DEMO_PROFILE_CONTRACT: &str = "0x000000000000000000000000000000000000d002";

#[derive(Parser)]
#[command(name = "dwitter")]
#[command(about = "Dwitter decentralized microblog demo CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted two-account end-to-end scenario
    Demo,
    /// Populate a simulated chain and render the feed
    Feed {
        /// Number of synthetic accounts
        #[arg(short, long, default_value_t = 3)]
        accounts: usize,

        /// Tweets per account
        #[arg(short, long, default_value_t = 2)]
        tweets: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo().await,
        Commands::Feed { accounts, tweets } => run_feed(accounts, tweets).await,
    }
}

async fn run_demo() -> Result<()> {
    let config = deployment_config()?;
    println!("📡 Deploying simulated contracts...");
    println!("   tweets:   {}", config.tweet_contract);
    println!("   profiles: {}", config.profile_contract);
    let chain = InMemoryChain::deploy(&config);

    let alice_addr: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111".parse()?;
    let bob_addr: Address = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2222".parse()?;

    let alice = connect_user(&chain, &config, &alice_addr).await?;
    alice.create_profile("Alice", "gm from the demo").await?;
    println!("👤 Alice registered: {}", alice.snapshot().profile.display_name);
    alice.create_tweet("hello world").await?;
    chain.advance_time(42 * 60);

    let bob = connect_user(&chain, &config, &bob_addr).await?;
    bob.create_profile("Bob", "just here for the feed").await?;
    let tweet = bob
        .snapshot()
        .tweets
        .first()
        .cloned()
        .context("expected Alice's tweet on chain")?;
    bob.like_tweet(&tweet.author, tweet.id).await?;
    println!("❤️  Bob liked {}'s tweet #{}", tweet.author.short(), tweet.id);

    alice.refresh().await?;
    println!();
    render_feed(&alice.snapshot(), chain.timestamp());
    Ok(())
}

async fn run_feed(accounts: usize, tweets: usize) -> Result<()> {
    let config = deployment_config()?;
    let chain = InMemoryChain::deploy(&config);
    println!("📡 Populating simulated chain: {accounts} accounts × {tweets} tweets each...");

    let mut users = Vec::with_capacity(accounts);
    for i in 0..accounts {
        let user = connect_user(&chain, &config, &Address::random()).await?;
        user.create_profile(&format!("member{i}"), "").await?;
        users.push(user);
    }

    for round in 0..tweets {
        for (i, user) in users.iter().enumerate() {
            user.create_tweet(&format!("status update {round} from member{i}"))
                .await?;
            chain.advance_time(37 * 60);
        }
    }

    let viewer = users.first().context("at least one account required")?;
    viewer.refresh().await?;
    println!();
    render_feed(&viewer.snapshot(), chain.timestamp());
    Ok(())
}

/// Builds and connects a full session stack for one account.
async fn connect_user(
    chain: &Arc<InMemoryChain>,
    config: &DeploymentConfig,
    address: &Address,
) -> Result<ViewSyncCoordinator> {
    let wallet = Arc::new(SimWallet::with_accounts(vec![address.clone()]));
    let connector = Arc::new(SimConnector::new(chain.clone(), config.clone()));
    let session = Arc::new(SessionManager::new(wallet, connector));
    let coordinator = ViewSyncCoordinator::new(session);
    let connected = coordinator.connect().await?;
    println!("🔑 Connected wallet {}", connected.short());
    Ok(coordinator)
}

fn deployment_config() -> Result<DeploymentConfig> {
    match DeploymentConfig::from_env() {
        Ok(config) => Ok(config),
        Err(ConfigError::Missing(_)) => Ok(DeploymentConfig::new(
            DEMO_TWEET_CONTRACT.parse()?,
            DEMO_PROFILE_CONTRACT.parse()?,
        )),
        Err(e) => Err(e.into()),
    }
}

fn render_feed(snapshot: &ViewSnapshot, now: u64) {
    println!("📜 Timeline ({} tweets)", snapshot.tweets.len());
    println!("{}", "═".repeat(64));
    for tweet in snapshot.display_tweets() {
        println!(
            "{} @{} · {}",
            snapshot.display_name_for(&tweet.author),
            tweet.author.short(),
            format_age(now, tweet.timestamp)
        );
        println!("   {}", tweet.content);
        println!("   ♥ {}", tweet.likes);
        println!("{}", "-".repeat(64));
    }
}

/// Relative timestamp: minutes under an hour, hours under a day, then the
/// calendar date.
fn format_age(now: u64, timestamp: u64) -> String {
    let elapsed = now.saturating_sub(timestamp);
    if elapsed < 3600 {
        format!("{}m", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("{}h", elapsed / 3600)
    } else {
        chrono::DateTime::from_timestamp(timestamp as i64, 0)
            .map(|dt| dt.format("%b %-d").to_string())
            .unwrap_or_default()
    }
}
