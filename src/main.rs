#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::expect_used, clippy::unwrap_used))]

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use authur1::rotate::{rotl32, rotr32};
use authur1::{
    hash, mac, recover_state_and_forge, self_test, word_from_wide, Key, ObservedPair,
    SearchConfig, SearchOrder, Word,
};

#[derive(Debug, Parser)]
#[command(
    name = "authur1",
    version,
    about = "The authur1 toy hash, its keyed MAC and a forgery attack against it. Don't actually use this hash!"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print JSON instead of prose.
    #[arg(short, long, global = true)]
    machine: bool,

    /// Trace every block fold.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Hash a message.
    Hash { message: String },
    /// Compute a MIC under a 16-byte key (random if omitted).
    Mac {
        message: String,
        /// Key as 32 hex digits.
        #[arg(short, long, env = "AUTHUR1_KEY")]
        key: Option<String>,
    },
    /// Recover the internal state from known MICs and forge a new one.
    Attack(AttackArgs),
    /// 32-bit circular shift.
    Rotate {
        /// Rotate left instead of right.
        #[arg(short, long)]
        left: bool,
        #[arg(value_parser = maybe_hex)]
        base: Word,
        #[arg(value_parser = maybe_hex)]
        shift_width: Word,
    },
    /// Check the built-in reference vectors.
    Test,
}

#[derive(Debug, Args)]
struct AttackArgs {
    /// Known pairs as "msg1:deadbeef,msg2:abababab,...".
    #[arg(short = 'e', long = "pairs", value_name = "ORIGINALS")]
    pairs: String,

    /// Message appended to the recovered prefix.
    #[arg(short = 'x', long = "extension", value_name = "MSG")]
    extension: String,

    /// Use this internal state (hex) instead of searching for it.
    #[arg(short, long, value_parser = hex_word)]
    state: Option<Word>,

    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Worker threads, 0 for one per core.
    #[arg(long, env = "AUTHUR1_THREADS", default_value_t = 0)]
    threads: usize,

    /// Candidates per shard.
    #[arg(long, env = "AUTHUR1_SHARD_SIZE", default_value_t = 1 << 20)]
    shard_size: u32,

    /// First candidate state (hex).
    #[arg(long, value_parser = hex_word, default_value = "0")]
    start: Word,

    /// Last candidate state (hex, inclusive).
    #[arg(long, value_parser = hex_word, default_value = "ffffffff")]
    end: Word,

    /// Accept any match instead of the lowest one.
    #[arg(long, env = "AUTHUR1_FIRST_FOUND")]
    first_found: bool,

    /// Log progress every N candidates.
    #[arg(long, env = "AUTHUR1_PROGRESS_INTERVAL", default_value_t = 1 << 28)]
    progress_interval: u64,
}

impl From<SearchArgs> for SearchConfig {
    fn from(args: SearchArgs) -> Self {
        Self {
            start: args.start,
            end: args.end,
            shard_size: args.shard_size,
            threads: args.threads,
            order: if args.first_found {
                SearchOrder::FirstFound
            } else {
                SearchOrder::Lowest
            },
            progress_interval: args.progress_interval,
        }
    }
}

fn hex_word(s: &str) -> Result<Word, String> {
    let wide = u64::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| e.to_string())?;
    word_from_wide(wide).map_err(|e| e.to_string())
}

fn maybe_hex(s: &str) -> Result<Word, String> {
    match s.strip_prefix("0x") {
        Some(digits) => hex_word(digits),
        None => s.parse().map_err(|e: std::num::ParseIntError| e.to_string()),
    }
}

/// `AUTHUR1_LOG` first, then `RUST_LOG`, then `info` (`trace` with `--verbose`).
fn init_tracing(verbose: bool) {
    let filter = std::env::var("AUTHUR1_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "trace" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let machine = cli.machine;

    match cli.command {
        Command::Hash { message } => {
            let digest = hash(message.as_bytes());
            if machine {
                println!(
                    "{}",
                    json!({ "input": hex::encode(&message), "digest": hex::encode(digest) })
                );
            } else {
                println!("hash for {message:?} is:\n{}", hex::encode(digest));
            }
        }
        Command::Mac { message, key } => {
            let key = match key {
                Some(hex) => Key::from_hex(&hex).context("parsing --key")?,
                None => Key::random(),
            };
            let mic = mac(message.as_bytes(), key.as_bytes())?;
            if machine {
                println!(
                    "{}",
                    json!({ "key": hex::encode(key.as_bytes()), "mic": hex::encode(mic) })
                );
            } else {
                println!("KEY (str): {}", String::from_utf8_lossy(key.as_bytes()));
                println!("KEY (hex): {}", hex::encode(key.as_bytes()));
                println!("MIC: {}", hex::encode(mic));
            }
        }
        Command::Attack(args) => {
            let pairs = ObservedPair::parse_list(&args.pairs).context("parsing --pairs")?;
            let config = SearchConfig::from(args.search);
            let forgery =
                recover_state_and_forge(&pairs, args.extension.as_bytes(), args.state, &config)?;
            if machine {
                println!("{}", serde_json::to_string(&forgery)?);
            } else {
                println!("recovered state: {:08x}", forgery.state);
                println!("Forged a valid delta:");
                println!("{0}BEGIN FORGED AUTHENTICATED TEXT{0}", "=".repeat(20));
                println!("{}", String::from_utf8_lossy(&forgery.message));
                println!("{0}END FORGED AUTHENTICATED TEXT{1}", "=".repeat(20), "=".repeat(22));
                println!("MIC: {}", hex::encode(forgery.mic));
            }
        }
        Command::Rotate {
            left,
            base,
            shift_width,
        } => {
            let result = if left {
                rotl32(base, shift_width)
            } else {
                rotr32(base, shift_width)
            };
            if machine {
                println!("{result:#x}");
            } else {
                println!("result is {result:#x}");
            }
        }
        Command::Test => {
            let report = self_test()?;
            if machine {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                for check in &report.checks {
                    let verdict = if check.passed { "ok" } else { "FAILED" };
                    println!(
                        "{:<14} {} (expected {}) {verdict}",
                        check.name, check.actual, check.expected
                    );
                }
            }
            if !report.passed() {
                bail!("{} reference checks failed", report.failures().count());
            }
            if !machine {
                println!("All tests passed!");
            }
        }
    }
    Ok(())
}
