use anyhow::bail;
use clap::{Parser, Subcommand};
use shardflake::{CUSTOM_EPOCH_MS, SnowflakeId, from_unix_millis};
use std::time::SystemTime;

/// Command-line arguments for the `shardflake` binary.
///
/// Generator settings can come from flags, the environment, or a `.env` file
/// in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shardflake",
    version,
    about = "Mint and decode 64-bit Snowflake-style IDs"
)]
pub struct CliArgs {
    /// Machine ID stamped into minted IDs, in [0, 1023].
    ///
    /// Environment variable: `SHARDFLAKE_MACHINE_ID`
    #[arg(long, global = true, env = "SHARDFLAKE_MACHINE_ID", default_value_t = 0)]
    pub machine_id: u16,

    /// Epoch as milliseconds since 1970-01-01 UTC. Must not be in the future.
    ///
    /// Environment variable: `SHARDFLAKE_EPOCH_MS`
    #[arg(
        long,
        global = true,
        env = "SHARDFLAKE_EPOCH_MS",
        default_value_t = CUSTOM_EPOCH_MS,
        allow_negative_numbers = true
    )]
    pub epoch_ms: i64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint IDs and print them one per line in ascending order.
    Generate {
        /// How many IDs to mint.
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Threads sharing the generator.
        #[arg(short, long, default_value_t = 1)]
        threads: usize,
    },
    /// Print the fields of each given ID.
    Decompose {
        /// Raw IDs as signed 64-bit integers.
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
    },
}

/// Validated settings derived from [`CliArgs`].
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Machine ID for minted IDs, already checked against the 10-bit space.
    pub machine_id: u16,
    /// Epoch used both to mint and to resolve decomposed timestamps.
    pub epoch: SystemTime,
    /// The subcommand to run.
    pub command: Command,
}

impl TryFrom<CliArgs> for ToolConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.machine_id > SnowflakeId::MAX_MACHINE_ID {
            bail!(
                "SHARDFLAKE_MACHINE_ID ({}) exceeds the machine ID space (max = {})",
                args.machine_id,
                SnowflakeId::MAX_MACHINE_ID
            );
        }

        if let Command::Generate { threads: 0, .. } = args.command {
            bail!("--threads must be greater than 0");
        }

        Ok(Self {
            machine_id: args.machine_id,
            epoch: from_unix_millis(args.epoch_ms),
            command: args.command,
        })
    }
}
