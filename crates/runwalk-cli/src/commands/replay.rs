use std::path::{Path, PathBuf};

use clap::Args;
use runwalk_core::providers::{ReplaySource, StaticPermission, TracingAnnouncer};
use runwalk_core::session::MileSplit;
use runwalk_core::{AnnouncementSink, Config, CoreError, Event, SessionController};

use super::load_config;

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON array of {latitude, longitude, at} samples
    track: PathBuf,
    /// Print every event as a JSON line instead of a summary
    #[arg(long)]
    json: bool,
}

/// Prints spoken lines to stdout as they happen.
struct ConsoleAnnouncer;

impl AnnouncementSink for ConsoleAnnouncer {
    fn speak(&self, text: &str) {
        println!("> {text}");
    }
}

pub fn run(args: ReplayArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let source = ReplaySource::from_file(&args.track)?;

    // JSON output keeps stdout machine-readable; speech goes to the log.
    let (events, splits) = if args.json {
        replay(&config, source, TracingAnnouncer)?
    } else {
        replay(&config, source, ConsoleAnnouncer)?
    };

    if args.json {
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
        return Ok(());
    }

    for split in &splits {
        match split.split_secs {
            Some(secs) => println!("Mile {}: {} s (total {} s)", split.mile, secs, split.elapsed_secs),
            None => println!("Mile {}: total {} s", split.mile, split.elapsed_secs),
        }
    }
    if let Some(Event::SessionStopped {
        distance_miles,
        elapsed_secs,
        ..
    }) = events.last()
    {
        println!("Distance: {distance_miles:.2} miles");
        println!("Time: {elapsed_secs} seconds");
    }
    Ok(())
}

/// Drive a whole track through a controller built from `config`.
fn replay<A: AnnouncementSink>(
    config: &Config,
    source: ReplaySource,
    announcer: A,
) -> Result<(Vec<Event>, Vec<MileSplit>), Box<dyn std::error::Error>> {
    let (Some(started_at), Some(ended_at)) = (source.first_fix_at(), source.last_fix_at()) else {
        return Err("track contains no position fixes".into());
    };

    let mut controller =
        SessionController::from_config(config, StaticPermission::granted(), source, announcer);

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let mut events = Vec::new();
    runtime.block_on(async {
        if let Some(event) = controller.start(started_at).await? {
            events.push(event);
        }
        events.extend(controller.run_to_end().await);
        Ok::<_, CoreError>(())
    })?;
    let splits = controller.session().splits().to_vec();
    events.push(controller.session().snapshot_event());
    events.extend(controller.stop(ended_at));
    Ok((events, splits))
}
