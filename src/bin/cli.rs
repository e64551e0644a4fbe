//! dockv CLI
//!
//! Command-line interface for reading and writing a dockv data directory.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use dockv::{Config, Engine, SyncMode, ValueCodec};
use tracing_subscriber::{fmt, EnvFilter};

/// dockv CLI
#[derive(Parser, Debug)]
#[command(name = "dockv-cli")]
#[command(about = "CLI for the dockv key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./dockv_data")]
    data_dir: PathBuf,

    /// Durability fence after each write
    #[arg(short, long, value_enum, default_value = "data")]
    sync: SyncArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,

        /// How to decode the stored bytes
        #[arg(short, long, value_enum, default_value = "str")]
        kind: ValueKind,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set (comma separated for array kinds)
        value: String,

        /// How to encode the value
        #[arg(short, long, value_enum, default_value = "str")]
        kind: ValueKind,
    },

    /// Show key count and log sizes
    Stats,

    /// Run the built-in end-to-end scenarios
    Selftest,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SyncArg {
    Data,
    All,
}

impl From<SyncArg> for SyncMode {
    fn from(arg: SyncArg) -> Self {
        match arg {
            SyncArg::Data => SyncMode::Data,
            SyncArg::All => SyncMode::All,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ValueKind {
    /// UTF-8 text
    Str,
    /// Single 32-bit integer
    I32,
    /// Array of 32-bit integers
    I32s,
    /// Single 64-bit integer
    I64,
    /// Array of 64-bit integers
    I64s,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dockv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .sync_mode(args.sync.into())
        .build();

    let mut engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(&mut engine, args.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    };

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        return ExitCode::FAILURE;
    }
    code
}

fn run(engine: &mut Engine, command: Commands) -> Result<ExitCode, String> {
    match command {
        Commands::Put { key, value, kind } => {
            let bytes = encode_arg(&value, kind)?;
            engine.put(key.as_bytes(), &bytes).map_err(|e| e.to_string())?;
            println!("OK");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Get { key, kind } => match engine.get(key.as_bytes()) {
            Some(bytes) => {
                println!("{}", decode_display(&bytes, kind)?);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                println!("(not found)");
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Stats => {
            println!("keys:         {}", engine.len());
            println!("storage size: {} bytes", engine.storage_size());
            println!("index size:   {} bytes", engine.index_size());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Selftest => Ok(selftest(engine.config())),
    }
}

// =============================================================================
// Value Parsing
// =============================================================================

fn parse_list<T: std::str::FromStr>(value: &str) -> Result<Vec<T>, String>
where
    T::Err: std::fmt::Display,
{
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|item| {
            item.trim()
                .parse::<T>()
                .map_err(|e| format!("invalid element '{}': {}", item, e))
        })
        .collect()
}

fn encode_arg(value: &str, kind: ValueKind) -> Result<Vec<u8>, String> {
    let bytes = match kind {
        ValueKind::Str => value.to_string().encode(),
        ValueKind::I32 => value
            .trim()
            .parse::<i32>()
            .map_err(|e| e.to_string())?
            .encode(),
        ValueKind::I32s => parse_list::<i32>(value)?.encode(),
        ValueKind::I64 => value
            .trim()
            .parse::<i64>()
            .map_err(|e| e.to_string())?
            .encode(),
        ValueKind::I64s => parse_list::<i64>(value)?.encode(),
    };
    Ok(bytes)
}

fn decode_display(bytes: &[u8], kind: ValueKind) -> Result<String, String> {
    let shown = match kind {
        ValueKind::Str => String::decode(bytes).map_err(|e| e.to_string())?,
        ValueKind::I32 => i32::decode(bytes).map_err(|e| e.to_string())?.to_string(),
        ValueKind::I32s => format!("{:?}", Vec::<i32>::decode(bytes).map_err(|e| e.to_string())?),
        ValueKind::I64 => i64::decode(bytes).map_err(|e| e.to_string())?.to_string(),
        ValueKind::I64s => format!("{:?}", Vec::<i64>::decode(bytes).map_err(|e| e.to_string())?),
    };
    Ok(shown)
}

// =============================================================================
// Self Test
// =============================================================================

type Scenario = fn(&Config) -> Result<(), String>;

fn selftest(base: &Config) -> ExitCode {
    let scenarios: [(&str, Scenario); 4] = [
        ("simple_add_int", simple_add_int),
        ("read_after_reload", read_after_reload),
        ("all_value_kinds", all_value_kinds),
        ("multiple_keys", multiple_keys),
    ];

    let mut failed = 0;
    for (name, scenario) in scenarios {
        let dir = base.data_dir.join(format!("selftest_{}", name));
        let config = Config::builder()
            .data_dir(&dir)
            .sync_mode(base.sync_mode)
            .build();

        println!("Running {}", name);
        let outcome = reset_dir(&dir).and_then(|_| scenario(&config));
        match outcome {
            Ok(()) => println!("OK {}", name),
            Err(e) => {
                println!("FAIL {}: {}", name, e);
                failed += 1;
            }
        }
    }

    if failed == 0 {
        println!("All scenarios passed");
        ExitCode::SUCCESS
    } else {
        println!("{} scenario(s) failed", failed);
        ExitCode::FAILURE
    }
}

fn reset_dir(dir: &Path) -> Result<(), String> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| format!("cannot clear {}: {}", dir.display(), e))?;
    }
    Ok(())
}

fn open(config: &Config) -> Result<Engine, String> {
    Engine::open(config.clone()).map_err(|e| e.to_string())
}

fn put<T: ValueCodec>(engine: &mut Engine, key: &str, value: &T) -> Result<(), String> {
    engine
        .put_typed(key.as_bytes(), value)
        .map_err(|e| e.to_string())
}

fn expect_value<T>(engine: &mut Engine, key: &str, expected: &T) -> Result<(), String>
where
    T: ValueCodec + PartialEq + Debug,
{
    match engine.get_typed::<T>(key.as_bytes()) {
        Ok(Some(found)) if &found == expected => Ok(()),
        Ok(Some(found)) => Err(format!(
            "key {}: expected {:?}, found {:?}",
            key, expected, found
        )),
        Ok(None) => Err(format!("key {} not found", key)),
        Err(e) => Err(format!("key {}: {}", key, e)),
    }
}

fn simple_add_int(config: &Config) -> Result<(), String> {
    let mut engine = open(config)?;
    put(&mut engine, "test", &42i32)?;
    expect_value(&mut engine, "test", &42i32)
}

fn read_after_reload(config: &Config) -> Result<(), String> {
    {
        let mut engine = open(config)?;
        put(&mut engine, "test", &42i32)?;
        engine.close().map_err(|e| e.to_string())?;
    }

    let mut engine = open(config)?;
    expect_value(&mut engine, "test", &42i32)
}

fn all_value_kinds(config: &Config) -> Result<(), String> {
    let mut engine = open(config)?;

    let text = "I am string".to_string();
    put(&mut engine, "key1", &text)?;
    expect_value(&mut engine, "key1", &text)?;

    let array: Vec<i32> = vec![1, 2, 42, -4];
    put(&mut engine, "key1", &array)?;
    expect_value(&mut engine, "key1", &array)?;

    put(&mut engine, "key1", &2024i32)?;
    expect_value(&mut engine, "key1", &2024i32)
}

fn multiple_keys(config: &Config) -> Result<(), String> {
    let mut engine = open(config)?;

    put(&mut engine, "key1", &"I am string".to_string())?;

    let array: Vec<i32> = vec![1, 2, 42, -4];
    put(&mut engine, "key2", &array)?;
    put(&mut engine, "key1", &2024i32)?;

    expect_value(&mut engine, "key1", &2024i32)?;
    expect_value(&mut engine, "key2", &array)
}
