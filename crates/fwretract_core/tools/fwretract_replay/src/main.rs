use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fwretract_core::error::log_core_error;
use fwretract_replay::config::Config;
use fwretract_replay::replay::{describe_move, Command, Replay};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_args();

    let input: Box<dyn BufRead> = match &config.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("open script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut replay = Replay::new(&config).context("apply replay configuration")?;

    info!(
        "replay started extruders={} zlift={} autoretract={}",
        config.extruders,
        replay.engine().settings().retract_zlift,
        config.autoretract
    );

    for (lineno, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("read script line {}", lineno + 1))?;

        let step = match replay.run_line(&line) {
            Ok(Some(step)) => step,
            Ok(None) => continue,
            Err(err) => {
                // A bad line is reported and skipped; the machine state is untouched.
                log_core_error(&err);
                continue;
            }
        };

        if step.command == Command::Status {
            println!("{}", replay.status());
            continue;
        }

        match step.outcome {
            Some(outcome) => println!("{:>4}: {} -> {outcome:?}", lineno + 1, line.trim()),
            None => println!("{:>4}: {}", lineno + 1, line.trim()),
        }
        for m in &step.moves {
            println!("      {}", describe_move(m));
        }
    }

    info!("replay finished: {}", replay.status());
    Ok(())
}
