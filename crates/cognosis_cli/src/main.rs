//! Command line front end for the cognosis atom codec.
//!
//! # Responsibility
//! - Encode and decode atoms as hex on stdout.
//! - Evaluate registered operators against literal arguments.

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use cognosis_core::{
    init_logging, AnyAtom, Atom, AtomCodec, AtomicData, CoreConfig, FormalTheory, Operator,
    OperatorRegistry, Payload, Value,
};
use log::debug;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cognosis", author, version, about, long_about = None)]
struct Cli {
    /// TOML config with `[arena]` and `[logging]` sections.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a data atom and print its bytes as hex.
    EncodeData {
        #[command(flatten)]
        input: DataInput,
        /// Wrap the encoding in the tagged atom envelope.
        #[arg(long)]
        envelope: bool,
    },
    /// Decode hex bytes into a data atom.
    DecodeData { hex: String },
    /// Encode the default theory, optionally adjusted, and print hex.
    EncodeTheory {
        /// Remove a case-base entry by key.
        #[arg(long = "drop", value_name = "KEY")]
        drop: Vec<String>,
        /// Add or replace a case-base entry, e.g. `xor=nor`.
        #[arg(long = "case", value_name = "KEY=OPERATOR")]
        case: Vec<String>,
    },
    /// Decode hex bytes into a formal theory.
    DecodeTheory { hex: String },
    /// Decode a tagged atom envelope.
    DecodeAtom { hex: String },
    /// Apply an operator by symbol or key to literal arguments.
    ///
    /// Arguments are JSON literals; `@name` passes an operator.
    Eval {
        operator: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List registered operators with their ids.
    Operators,
    /// Print the core version.
    Version,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct DataInput {
    #[arg(long, allow_hyphen_values = true)]
    int: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    float: Option<f32>,
    #[arg(long)]
    text: Option<String>,
    /// JSON object for a map payload.
    #[arg(long)]
    json: Option<String>,
}

impl DataInput {
    fn to_atom(&self) -> anyhow::Result<AtomicData> {
        if let Some(value) = self.int {
            return Ok(AtomicData::from(value));
        }
        if let Some(value) = self.float {
            return Ok(AtomicData::from(value));
        }
        if let Some(value) = &self.text {
            return Ok(AtomicData::from(value.as_str()));
        }
        if let Some(raw) = &self.json {
            let payload: Payload =
                serde_json::from_str(raw).context("--json is not a valid payload")?;
            if !matches!(payload, Payload::Map(_)) {
                bail!("--json must be an object; use --int, --float or --text for scalars");
            }
            return Ok(AtomicData::from(payload));
        }
        Err(anyhow!("one of --int, --float, --text or --json is required"))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CoreConfig::default(),
    };
    init_logging(&config.logging.level, &config.logging.target())?;
    debug!(
        "event=cli_start module=cli status=ok command={:?}",
        cli.command
    );

    let codec = AtomCodec::global();
    match cli.command {
        Command::EncodeData { input, envelope } => {
            let data = input.to_atom()?;
            let hex = if envelope {
                encode_hex(&codec, &config, &AnyAtom::from(data))?
            } else {
                encode_hex(&codec, &config, &data)?
            };
            println!("{hex}");
        }
        Command::DecodeData { hex } => {
            let data = codec.decode_data(&decode_hex(&hex)?)?;
            println!("{data}");
        }
        Command::EncodeTheory { drop, case } => {
            let mut theory = FormalTheory::default();
            for key in &drop {
                if theory.remove_case(key).is_none() {
                    bail!("no case-base entry `{key}`");
                }
            }
            for entry in &case {
                let (key, name) = entry
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--case expects KEY=OPERATOR, got `{entry}`"))?;
                theory.insert_case(key, resolve_operator(name)?);
            }
            println!("{}", encode_hex(&codec, &config, &theory)?);
        }
        Command::DecodeTheory { hex } => {
            let theory = codec.decode_theory(&decode_hex(&hex)?)?;
            println!("{theory}");
            for (key, operator) in theory.case_base() {
                println!("  {key} -> {} ({})", operator.key(), operator.id());
            }
        }
        Command::DecodeAtom { hex } => {
            let atom = AnyAtom::decode_with(&codec, &decode_hex(&hex)?)?;
            println!("{} {atom}", atom.kind().as_str());
        }
        Command::Eval { operator, args } => {
            let operator = resolve_operator(&operator)?;
            let args = args
                .iter()
                .map(|raw| parse_value(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            println!("{}", operator.apply(&args)?);
        }
        Command::Operators => {
            for operator in OperatorRegistry::global().entries() {
                println!(
                    "{:>2} {:<15} {:<15} arity={}",
                    operator.id(),
                    operator.key(),
                    operator.symbol().unwrap_or("-"),
                    operator.arity()
                );
            }
        }
        Command::Version => println!("cognosis_core {}", cognosis_core::core_version()),
    }
    Ok(())
}

fn encode_hex<A: Atom>(
    codec: &AtomCodec<'_>,
    config: &CoreConfig,
    atom: &A,
) -> anyhow::Result<String> {
    let mut arena = config.scratch_arena()?;
    let region = codec
        .encode_into(atom, &mut arena)
        .with_context(|| format!("encoding {} atom", atom.kind().as_str()))?;
    Ok(hex::encode(arena.bytes(region)?))
}

fn decode_hex(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim().trim_start_matches("0x");
    hex::decode(trimmed).with_context(|| format!("`{raw}` is not valid hex"))
}

/// Accepts a case-base symbol (`∧`) or a registry key (`conjunction`).
fn resolve_operator(name: &str) -> anyhow::Result<Operator> {
    if let Some(operator) = Operator::from_symbol(name) {
        return Ok(operator);
    }
    Ok(OperatorRegistry::global().resolve(name)?)
}

fn parse_value(raw: &str) -> anyhow::Result<Value> {
    if let Some(name) = raw.strip_prefix('@') {
        return Ok(Value::Operator(resolve_operator(name)?));
    }
    match raw {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    // Bare words that are not JSON are taken as text.
    Ok(match serde_json::from_str::<Payload>(raw) {
        Ok(payload) => Value::Data(payload),
        Err(_) => Value::Data(Payload::Text(raw.to_string())),
    })
}
