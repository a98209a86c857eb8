//! Resolve a single proposal and print its commitment payload.

use anyhow::{Context, Result};
use clap::Parser;
use commitment_gate::ProposalId;
use decision_resolver::{Decision, DecisionResolver, DecisionResolverApi, ResolverConfig};
use gate_telemetry::{init_tracing, TelemetryConfig};

#[derive(Debug, Parser)]
#[command(
    name = "resolve-proposal",
    version,
    about = "Resolve a governance vote into a commitment payload"
)]
struct Args {
    /// Proposal id on the vote service
    #[arg(long)]
    proposal_id: String,

    /// GraphQL endpoint of the vote service
    #[arg(long, env = "GB_VOTE_ENDPOINT")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::from_env().with_service_name("resolve-proposal");
    init_tracing(&telemetry).context("failed to initialize tracing")?;

    let mut config = ResolverConfig::from_env();
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    let resolver = DecisionResolver::from_config(&config)?;
    let decision = resolver
        .resolve(&ProposalId::new(args.proposal_id))
        .await
        .context("resolution failed")?;

    match decision {
        Decision::Execute { payload, .. } => println!("0x{}", hex::encode(payload.as_bytes())),
        Decision::NoExecution { .. } => println!("no-execution"),
    }
    Ok(())
}
