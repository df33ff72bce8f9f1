mod cli;
mod console;
mod host;
mod sample;

use clap::Parser;
use common::{TraceId, child_span, init_logger, root_span};
use corelib::BarSequence;
use engine::studies::{BollingerBands, MovingAverage};
use engine::study::{StudyDefinition, StudyRegistry};
use replay::{PlaybackState, ReplayConfig, ReplayEngine};
use tracing::{Instrument, info, warn};

use crate::cli::Cli;
use crate::console::{ConsoleChart, line_renderer};
use crate::host::StudyHost;

const SAMPLE_START_PRICE: f64 = 100.0;
const SAMPLE_STEP_SECS: i64 = 60;

fn build_registry() -> anyhow::Result<StudyRegistry<ConsoleChart>> {
    let registry = StudyRegistry::new();
    registry.register(StudyDefinition::new(
        BollingerBands,
        line_renderer(BollingerBands::ID),
    )?)?;
    registry.register(StudyDefinition::new(
        MovingAverage,
        line_renderer(MovingAverage::ID),
    )?)?;
    Ok(registry)
}

fn bar_source(cli: &Cli) -> anyhow::Result<BarSequence> {
    let _span = child_span("load_bars").entered();

    match &cli.bars {
        Some(path) => {
            let seq = sample::load_bars(path)?;
            info!(path = %path.display(), bars = seq.len(), "bars loaded from file");
            Ok(seq)
        }
        None => {
            let start = chrono::Utc::now().timestamp() - cli.points as i64 * SAMPLE_STEP_SECS;
            let bars = sample::generate_bars(
                cli.points,
                SAMPLE_START_PRICE,
                start,
                SAMPLE_STEP_SECS,
                &mut rand::thread_rng(),
            );
            info!(bars = bars.len(), "generated random-walk bars");
            Ok(BarSequence::new(bars)?)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.replay_config(ReplayConfig::from_env());
    let bars = bar_source(&cli)?;

    if bars.is_empty() {
        warn!("no bars to replay");
        return Ok(());
    }

    let mut chart = ConsoleChart::new();
    let mut host = StudyHost::new(build_registry()?, cli.study.id(), cli.study_params());

    let engine = ReplayEngine::from_current(config)?;
    let mut updates = engine.subscribe();

    engine.load(bars);
    engine.start();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = *updates.borrow_and_update();

                // auto-stop rewinds the cursor; keep the last drawn frame
                if snap.state == PlaybackState::Stopped {
                    info!(len = snap.len, "replay finished");
                    break;
                }

                host.refresh(&mut chart, &engine.visible_bars())?;
                chart.report(snap.cursor, snap.len);
            }
            res = &mut shutdown => {
                res?;
                info!("shutdown signal received");
                engine.stop();
                break;
            }
        }
    }

    host.detach();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger("replay-demo", cli.json_logs);

    let trace_id = TraceId::new();
    let span = root_span("replay", &trace_id);

    run(cli).instrument(span).await
}
