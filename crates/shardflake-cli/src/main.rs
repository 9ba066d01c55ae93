mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, Command, ToolConfig};
use shardflake::{Generator, SnowflakeId, TimeSource, to_unix_millis};
use std::{
    io::{self, BufWriter, Write},
    thread::scope,
};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    telemetry::init_tracing();

    let config = ToolConfig::try_from(args)?;
    let generator = Generator::new(config.epoch, config.machine_id)?;
    tracing::debug!(?generator, "generator ready");

    let mut out = BufWriter::new(io::stdout().lock());
    match config.command {
        Command::Generate { count, threads } => {
            let ids = mint(&generator, count, threads)?;
            tracing::info!(count = ids.len(), threads, "minted IDs");
            for id in ids {
                writeln!(out, "{id}")?;
            }
        }
        Command::Decompose { ids } => {
            for raw in ids {
                writeln!(out, "{}", describe(&generator, SnowflakeId::from_raw(raw)))?;
            }
        }
    }
    out.flush()?;

    Ok(())
}

/// Mints `count` IDs split across `threads` workers sharing `generator`, and
/// returns them sorted.
fn mint<T>(
    generator: &Generator<T>,
    count: usize,
    threads: usize,
) -> shardflake::Result<Vec<SnowflakeId>>
where
    T: TimeSource + Sync,
{
    let threads = threads.clamp(1, count.max(1));
    let base = count / threads;
    let extra = count % threads;

    let batches = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                let quota = base + usize::from(worker < extra);
                s.spawn(move || {
                    (0..quota)
                        .map(|_| generator.try_next_id())
                        .collect::<shardflake::Result<Vec<_>>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect::<Vec<_>>()
    });

    let mut ids = Vec::with_capacity(count);
    for batch in batches {
        ids.extend(batch?);
    }
    ids.sort_unstable();
    Ok(ids)
}

fn describe<T: TimeSource>(generator: &Generator<T>, id: SnowflakeId) -> String {
    let parts = generator.decompose(id);
    format!(
        "id={} time_ms={} elapsed_ms={} machine_id={} sequence={}",
        id,
        to_unix_millis(parts.time),
        id.timestamp(),
        parts.machine_id,
        parts.sequence,
    )
}
