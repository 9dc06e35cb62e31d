//! Test Vector Generator
//!
//! Builds a synthetic oracle state and withdrawal block, runs every prover
//! entry point against them and writes the call parameters as JSON for the
//! verifier contract tests.

use anyhow::{ensure, Context, Result};
use beacon_proofs::constants::{BLOCK_ROOTS_TREE_DEPTH, SLOTS_PER_HISTORICAL_ROOT};
use beacon_proofs::gindex::GindexCalculator;
use beacon_proofs::{
    capella, deneb, electra, merkleize, verify_proof, BeaconBlockHeader, Chain, ForkVersion,
    HistoricalSummary, ProofGenerator, ProverConfig, Root, Validator, VerifyAndProcessWithdrawalCallParams,
    VerifyCheckpointProofsCallParams, VerifyValidatorFieldsCallParams, VersionedBeaconBlock,
    VersionedBeaconState, Withdrawal,
};
use clap::Parser;
use serde::Serialize;
use ssz_rs::prelude::Vector;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SLOTS_PER_PERIOD: u64 = SLOTS_PER_HISTORICAL_ROOT as u64;
const GENESIS_TIME: u64 = 1_606_824_023;
const MAX_WITHDRAWALS: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "generate-test-vectors")]
#[command(about = "Generate test vectors for beacon chain proof verifier contracts")]
struct Args {
    /// Output directory for test vectors
    #[arg(short, long, env = "TEST_VECTORS_OUTPUT", default_value = "test-vectors")]
    output: PathBuf,

    /// Number of test validators to generate
    #[arg(long, env = "NUM_VALIDATORS", default_value = "10")]
    num_validators: usize,

    /// Fork layout of the synthetic state and block
    #[arg(long, env = "FORK", default_value = "deneb")]
    fork: ForkVersion,

    /// Chain name or id, selects the first Capella slot
    #[arg(long, env = "CHAIN", default_value = "mainnet")]
    chain: Chain,
}

/// Test vector file format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TestVectorFile {
    fork: ForkVersion,
    chain: Chain,
    /// Oracle block root every proof ends at
    block_root: String,
    validator_fields: VerifyValidatorFieldsCallParams,
    checkpoint_proofs: VerifyCheckpointProofsCallParams,
    withdrawals: VerifyAndProcessWithdrawalCallParams,
}

fn pubkey(index: usize) -> Result<Vector<u8, 48>> {
    let mut bytes = vec![0u8; 48];
    bytes[..8].copy_from_slice(&(index as u64).to_le_bytes());
    bytes[47] = 0xaa;
    Vector::try_from(bytes).map_err(|_| anyhow::anyhow!("invalid pubkey length"))
}

fn validators(count: usize) -> Result<Vec<Validator>> {
    (0..count)
        .map(|i| {
            let mut withdrawal_credentials = [0u8; 32];
            withdrawal_credentials[0] = 0x01;
            withdrawal_credentials[12..].fill(i as u8);
            Ok(Validator {
                pubkey: pubkey(i)?,
                withdrawal_credentials,
                effective_balance: 32_000_000_000,
                slashed: false,
                activation_eligibility_epoch: 0,
                activation_epoch: 0,
                exit_epoch: u64::MAX,
                withdrawable_epoch: u64::MAX,
            })
        })
        .collect()
}

fn withdrawal_block(
    fork: ForkVersion,
    slot: u64,
    timestamp: u64,
    withdrawals: Vec<Withdrawal>,
) -> VersionedBeaconBlock {
    macro_rules! build {
        ($fork:ident) => {{
            let mut block = $fork::BeaconBlock {
                slot,
                proposer_index: 3,
                parent_root: [0x11; 32],
                state_root: [0x22; 32],
                ..$fork::BeaconBlock::default()
            };
            block.body.execution_payload.block_number = slot;
            block.body.execution_payload.timestamp = timestamp;
            block.body.execution_payload.withdrawals = withdrawals;
            block.into()
        }};
    }

    match fork {
        ForkVersion::Capella => build!(capella),
        ForkVersion::Deneb => build!(deneb),
        ForkVersion::Electra => build!(electra),
    }
}

fn oracle_state(
    fork: ForkVersion,
    slot: u64,
    validators: Vec<Validator>,
    historical_summaries: Vec<HistoricalSummary>,
) -> VersionedBeaconState {
    let balances: Vec<u64> = (0..validators.len() as u64)
        .map(|i| 32_000_000_000 + i * 1_000_000)
        .collect();

    macro_rules! build {
        ($fork:ident) => {{
            $fork::BeaconState {
                genesis_time: GENESIS_TIME,
                slot,
                validators,
                balances,
                historical_summaries,
                ..$fork::BeaconState::default()
            }
            .into()
        }};
    }

    match fork {
        ForkVersion::Capella => build!(capella),
        ForkVersion::Deneb => build!(deneb),
        ForkVersion::Electra => build!(electra),
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    ensure!(args.num_validators > 0, "at least one validator is required");

    tracing::info!(
        output = %args.output.display(),
        validators = args.num_validators,
        fork = %args.fork,
        chain = ?args.chain,
        "Generating test vectors"
    );

    std::fs::create_dir_all(&args.output)?;

    let generator = ProofGenerator::new(ProverConfig::for_chain(args.chain));
    let first_capella_slot = args.chain.first_capella_slot();

    // Withdrawal in the second summarized period, oracle two periods later
    let withdrawal_slot = first_capella_slot + SLOTS_PER_PERIOD + 100;
    let oracle_slot = withdrawal_slot + 2 * SLOTS_PER_PERIOD;
    let withdrawn: Vec<u64> = (0..args.num_validators.min(MAX_WITHDRAWALS) as u64).collect();

    let withdrawals = withdrawn
        .iter()
        .map(|&validator_index| Withdrawal {
            index: 1_000 + validator_index,
            validator_index,
            address: [validator_index as u8; 20],
            amount: 12_345_678,
        })
        .collect();
    let block = withdrawal_block(
        args.fork,
        withdrawal_slot,
        generator.slot_timestamp(GENESIS_TIME, withdrawal_slot)?,
        withdrawals,
    );
    let block_root = block.header()?.root()?;

    let params = generator.withdrawal_proof_params(oracle_slot, withdrawal_slot)?;
    let mut block_roots: Vec<Root> = (0..SLOTS_PER_PERIOD)
        .map(|slot| {
            let mut root = [0u8; 32];
            root[..8].copy_from_slice(&slot.to_le_bytes());
            root
        })
        .collect();
    block_roots[params.block_root_index as usize] = block_root;

    let historical_summaries = (0..=params.historical_summary_index)
        .map(|index| {
            let block_summary_root = if index == params.historical_summary_index {
                merkleize(&block_roots, BLOCK_ROOTS_TREE_DEPTH)
            } else {
                Ok([index as u8; 32])
            }?;
            Ok(HistoricalSummary {
                block_summary_root,
                state_summary_root: [0xee; 32],
            })
        })
        .collect::<Result<Vec<_>, beacon_proofs::ProofError>>()?;

    let state = oracle_state(
        args.fork,
        oracle_slot,
        validators(args.num_validators)?,
        historical_summaries,
    );
    let header = BeaconBlockHeader {
        slot: oracle_slot,
        proposer_index: 7,
        parent_root: [0x33; 32],
        state_root: generator.compute_beacon_state_root(&state)?,
        body_root: [0x44; 32],
    };
    let oracle_block_root = header.root()?;

    let indices: Vec<u64> = (0..args.num_validators as u64).collect();
    let validator_fields = generator.prove_validator_containers(&header, &state, &indices)?;
    let checkpoint_proofs = generator.prove_checkpoint_proofs(&header, &state, &indices)?;
    let withdrawals = generator
        .prove_withdrawals(
            &header,
            &state,
            &vec![block_roots; withdrawn.len()],
            &vec![block; withdrawn.len()],
            &withdrawn,
        )
        .context("proving withdrawals")?;

    ensure!(
        verify_proof(
            &oracle_block_root,
            validator_fields.state_root_proof.proof.nodes(),
            &header.state_root,
            GindexCalculator::state_root_index(),
        ),
        "state root proof does not verify"
    );
    for (i, proof) in withdrawals.withdrawal_proofs.iter().enumerate() {
        ensure!(
            verify_proof(
                &header.state_root,
                proof.historical_summary_block_root_proof.nodes(),
                &proof.block_root,
                GindexCalculator::historical_block_root_index(
                    proof.historical_summary_index,
                    proof.block_root_index,
                ),
            ),
            "historical block root proof {i} does not verify"
        );
    }

    let vectors = TestVectorFile {
        fork: args.fork,
        chain: args.chain,
        block_root: format!("0x{}", hex::encode(oracle_block_root)),
        validator_fields,
        checkpoint_proofs,
        withdrawals,
    };

    let output_path = args.output.join(format!("test_vectors_{}.json", args.fork));
    let json = serde_json::to_string_pretty(&vectors)?;
    std::fs::write(&output_path, json)?;

    tracing::info!(path = %output_path.display(), "Wrote test vectors");

    Ok(())
}
