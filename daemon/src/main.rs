//! Birthright daemon: runs the API server, or a claim from the command line.

use anyhow::{bail, Context};
use birthright_balance::BalanceEngine;
use birthright_governance::{
    AllocationTable, Allocator, ClaimSession, DiscoveryCanceller, DiscoveryOutcome,
    DiscoverySequence, GovernanceProfile, StaticRoster, VerificationPolicy,
};
use birthright_rpc::{shutdown_signal, RpcServer, ServerConfig};
use birthright_types::{Birthdate, Proof, TimeBalance};
use birthright_utils::{abbreviate_hash, format_number, init_logging, LogFormat};
use birthright_verification::VerifyProxy;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "birthright", about = "Humanity-verified time-balance allocation")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Interface to bind the API server to.
    #[arg(long, global = true, env = "BIRTHRIGHT_BIND")]
    bind: Option<String>,

    /// API server port.
    #[arg(long, global = true, env = "BIRTHRIGHT_PORT")]
    port: Option<u16>,

    /// World ID application id.
    #[arg(long, global = true, env = "WORLD_ID_APP_ID")]
    app_id: Option<String>,

    /// World ID action the proofs are generated for.
    #[arg(long, global = true, env = "WORLD_ID_ACTION")]
    action: Option<String>,

    /// Override the World ID verify endpoint.
    #[arg(long, global = true, env = "WORLD_ID_VERIFY_URL")]
    verify_url: Option<String>,

    /// Refuse nullifiers already verified by this process.
    #[arg(long, global = true, env = "BIRTHRIGHT_REJECT_DUPLICATE_NULLIFIERS")]
    reject_duplicate_nullifiers: bool,

    /// Enable the Prometheus metrics endpoint.
    #[arg(long, global = true, env = "BIRTHRIGHT_ENABLE_METRICS")]
    metrics: bool,

    /// Continue a claim even when verification fails (demo mode).
    #[arg(long, global = true, env = "BIRTHRIGHT_LENIENT")]
    lenient: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "BIRTHRIGHT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "BIRTHRIGHT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve,

    /// Show how a balance spreads across the officials.
    #[command(group(ArgGroup::new("input").required(true).args(["birthdate", "balance"])))]
    Allocate {
        /// Birthdate as YYYY-MM-DD.
        #[arg(long)]
        birthdate: Option<Birthdate>,

        /// Balance in days.
        #[arg(long)]
        balance: Option<u64>,

        /// Skip the paced discovery stages.
        #[arg(long)]
        fast: bool,
    },

    /// Verify a proof, then claim and allocate the balance for a birthdate.
    Claim {
        /// JSON file holding the proof produced by the World ID widget.
        #[arg(long)]
        proof: PathBuf,

        /// Birthdate as YYYY-MM-DD.
        #[arg(long)]
        birthdate: Birthdate,

        /// Signal the proof was bound to.
        #[arg(long)]
        signal: Option<String>,

        /// Skip the paced discovery stages.
        #[arg(long)]
        fast: bool,
    },
}

/// File config (if any) with CLI flags and env vars layered on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            ServerConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?
        }
        None => ServerConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(app_id) = &cli.app_id {
        config.world_id.app_id = Some(app_id.clone());
    }
    if let Some(action) = &cli.action {
        config.world_id.action = Some(action.clone());
    }
    if let Some(verify_url) = &cli.verify_url {
        config.world_id.verify_url = verify_url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.world_id.reject_duplicate_nullifiers |= cli.reject_duplicate_nullifiers;
    config.enable_metrics |= cli.metrics;
    if cli.lenient {
        config.verification_policy = VerificationPolicy::Lenient;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Allocate {
            birthdate,
            balance,
            fast,
        } => allocate(config, birthdate, balance, fast).await,
        Command::Claim {
            proof,
            birthdate,
            signal,
            fast,
        } => claim(config, proof, birthdate, signal, fast).await,
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Starting Birthright API on {} (metrics: {}, duplicate nullifiers: {})",
        config.listen_addr(),
        if config.enable_metrics { "on" } else { "off" },
        if config.world_id.reject_duplicate_nullifiers {
            "rejected"
        } else {
            "allowed"
        },
    );

    RpcServer::new(config)?.serve(shutdown_signal()).await?;

    tracing::info!("Birthright daemon exited cleanly");
    Ok(())
}

async fn allocate(
    config: ServerConfig,
    birthdate: Option<Birthdate>,
    balance: Option<u64>,
    fast: bool,
) -> anyhow::Result<()> {
    let engine = BalanceEngine::new();
    let balance = match (birthdate, balance) {
        (Some(birthdate), _) => {
            let balance = engine.claim(birthdate)?;
            println!(
                "Born {birthdate}: age {}, {} days lived",
                engine.age(birthdate),
                format_number(balance.days())
            );
            balance
        }
        (None, Some(days)) => TimeBalance::new(days),
        (None, None) => bail!("either --birthdate or --balance is required"),
    };

    let allocator = allocator(&config);
    let profile = allocator.profile();
    if discover(&profile, fast).await == DiscoveryOutcome::Completed {
        print_allocations(&profile, &allocator, &allocator.allocate(balance));
    }
    Ok(())
}

async fn claim(
    config: ServerConfig,
    proof_path: PathBuf,
    birthdate: Birthdate,
    signal: Option<String>,
    fast: bool,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&proof_path)
        .with_context(|| format!("reading proof from {}", proof_path.display()))?;
    let proof: Proof = serde_json::from_str(&raw).context("parsing proof JSON")?;
    let Some(level) = proof.verification_level else {
        bail!("proof has no verification_level");
    };

    let proxy = VerifyProxy::world_id(config.world_id.clone());
    let result = proxy.verify_result(&proof, signal.as_deref()).await;

    let mut session = ClaimSession::new(config.verification_policy);
    session.complete_verification(level, proof.nullifier_hash.clone(), &result)?;
    println!(
        "Verified human ({level}, nullifier {}){}",
        abbreviate_hash(&proof.nullifier_hash),
        if result.is_success() {
            ""
        } else {
            " [unconfirmed, lenient mode]"
        }
    );

    session.set_birthdate(birthdate)?;
    let balance = session.claim(&BalanceEngine::new())?;
    println!("Claimed {} TIME", format_number(balance.days()));

    let allocator = allocator(&config);
    let profile = allocator.profile();
    if discover(&profile, fast).await == DiscoveryOutcome::Completed {
        let table = session.finish_discovery(&allocator)?;
        print_allocations(&profile, &allocator, table);
    }
    Ok(())
}

fn allocator(config: &ServerConfig) -> Allocator {
    Allocator::new(
        Arc::new(StaticRoster::san_francisco()),
        config.weights.clone(),
    )
}

/// Print the discovery stages as they arrive. Ctrl-C cancels.
async fn discover(profile: &GovernanceProfile, fast: bool) -> DiscoveryOutcome {
    let sequence = if fast {
        DiscoverySequence::with_timing(Duration::ZERO, Duration::ZERO)
    } else {
        DiscoverySequence::new()
    };

    let canceller = Arc::new(DiscoveryCanceller::new());
    let mut rx = canceller.subscribe();
    let interrupt = {
        let canceller = canceller.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                canceller.cancel();
            }
        })
    };

    let outcome = sequence
        .run(
            |stage| {
                if stage.laws_visible() {
                    println!(
                        "[{:>3}%] {} ({} laws)",
                        stage.progress,
                        stage.label,
                        format_number(profile.total_laws())
                    );
                } else {
                    println!("[{:>3}%] {}", stage.progress, stage.label);
                }
            },
            &mut rx,
        )
        .await;
    interrupt.abort();

    if let DiscoveryOutcome::Cancelled { last_progress } = outcome {
        println!("Discovery cancelled at {last_progress}%");
    }
    outcome
}

fn print_allocations(profile: &GovernanceProfile, allocator: &Allocator, table: &AllocationTable) {
    println!();
    println!(
        "{}: {} TIME across {} officials, {} laws",
        profile.location,
        format_number(table.balance().days()),
        profile.total_officials(),
        format_number(profile.total_laws())
    );

    for (level, officials) in profile.officials_by_level() {
        let bps = allocator.weights().weight_bps(level);
        println!();
        println!(
            "{} ({}.{:02}%): {} days",
            level,
            bps / 100,
            bps % 100,
            format_number(table.level_allocation(level))
        );
        for official in officials {
            println!(
                "  {:<36} {:<28} {:>8}",
                official.title,
                official.name,
                format_number(table.share(&official.id))
            );
        }
    }

    println!();
    println!(
        "Allocated {} of {} days ({} unallocated)",
        format_number(table.total()),
        format_number(table.balance().days()),
        format_number(table.unallocated())
    );
}
