//! Terminal player for Stepwise.
//!
//! Runs one reference algorithm on the configured (or generated) input,
//! loads the recorded steps into a playback engine driven by tokio timers,
//! and prints every state change until playback pauses on the last step.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `stepwise-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Resolve the algorithm and build its input
//! 4. Run the producer inside a session
//! 5. Play back on real timers until the end (or Ctrl-C)
//! 6. Print the result

mod error;
mod render;

use std::fmt::Debug;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stepwise_algorithms::{
    Algorithm, BinarySearch, BstInsert, BubbleSort, Fibonacci, ReverseLinkedList,
};
use stepwise_core::config::{DemoConfig, StepwiseConfig};
use stepwise_core::engine::PlaybackEngine;
use stepwise_core::producer::StepProducer;
use stepwise_core::scheduler::TokioScheduler;
use stepwise_core::session::Session;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::PlayerError;

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "stepwise-config.yaml";

/// Application entry point for the player.
///
/// # Errors
///
/// Returns an error if the config is invalid, the algorithm is unknown,
/// or the producer rejects its input.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration first so its log level can seed the filter.
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        algorithm = config.demo.algorithm,
        default_step_duration_ms = config.playback.default_step_duration_ms,
        initial_speed = config.playback.initial_speed,
        loop_enabled = config.playback.loop_enabled,
        "stepwise-player starting"
    );

    // 3. Resolve the algorithm.
    let algorithm = Algorithm::from_name(&config.demo.algorithm).ok_or_else(|| {
        PlayerError::UnknownAlgorithm {
            name: config.demo.algorithm.clone(),
            known: Algorithm::ALL.map(Algorithm::name).join(", "),
        }
    })?;
    println!("{}\n", algorithm.source());

    // 4-6. Run, play, report.
    let mut rng = StdRng::seed_from_u64(config.demo.seed);
    match algorithm {
        Algorithm::BubbleSort => {
            let input = demo_values(&config.demo, &mut rng);
            play(&BubbleSort, &input, &config).await?;
        }
        Algorithm::BinarySearch => {
            let (input, target) = search_input(&config.demo, &mut rng);
            play(&BinarySearch::new(target), &input, &config).await?;
        }
        Algorithm::Fibonacci => {
            let n = fibonacci_input(&config.demo, &mut rng)?;
            play(&Fibonacci, &n, &config).await?;
        }
        Algorithm::ReverseLinkedList => {
            let input = demo_values(&config.demo, &mut rng);
            play(&ReverseLinkedList, &input, &config).await?;
        }
        Algorithm::BstInsert => {
            let input = demo_values(&config.demo, &mut rng);
            play(&BstInsert, &input, &config).await?;
        }
    }

    info!("stepwise-player shutdown complete");
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], or defaults if it is absent.
fn load_config() -> Result<StepwiseConfig, PlayerError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(StepwiseConfig::from_file(config_path)?)
    } else {
        // Logging is not up yet; env overrides still apply to defaults.
        let mut config = StepwiseConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The configured values, or `random_len` seeded values in `1..=99`.
fn demo_values(demo: &DemoConfig, rng: &mut StdRng) -> Vec<i64> {
    demo.input.clone().unwrap_or_else(|| {
        (0..demo.random_len)
            .map(|_| rng.random_range(1..=99))
            .collect()
    })
}

/// Values and target for binary search.
///
/// Explicit input is passed through untouched, so an unsorted list is
/// reported by the producer. Generated input is sorted and deduplicated,
/// and the target is drawn from it.
fn search_input(demo: &DemoConfig, rng: &mut StdRng) -> (Vec<i64>, i64) {
    if let Some(input) = &demo.input {
        return (input.clone(), demo.target);
    }
    let mut values = demo_values(demo, rng);
    values.sort_unstable();
    values.dedup();
    let target = if values.is_empty() {
        demo.target
    } else {
        let pick = rng.random_range(0..values.len());
        values.get(pick).copied().unwrap_or(demo.target)
    };
    (values, target)
}

/// `n` for Fibonacci: the first configured value, or a small random one.
fn fibonacci_input(demo: &DemoConfig, rng: &mut StdRng) -> Result<u32, PlayerError> {
    let Some(input) = &demo.input else {
        return Ok(rng.random_range(3..=7));
    };
    let Some(&first) = input.first() else {
        return Err(PlayerError::InvalidInput {
            reason: "fibonacci needs one value in demo.input".to_owned(),
        });
    };
    if input.len() > 1 {
        warn!(
            ignored = input.len().saturating_sub(1),
            "fibonacci uses only the first input value"
        );
    }
    u32::try_from(first).map_err(|e| PlayerError::InvalidInput {
        reason: format!("fibonacci needs a non-negative n, got {first}: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// Run `producer` in a fresh session and play it back on tokio timers.
async fn play<P>(producer: &P, input: &P::Input, config: &StepwiseConfig) -> Result<(), PlayerError>
where
    P: StepProducer,
    P::Output: Debug,
{
    let (scheduler, mut fired) = TokioScheduler::channel();
    let engine = PlaybackEngine::with_config(&config.playback, scheduler)?;
    let mut session: Session<P::Output, TokioScheduler> = Session::new(engine);

    let run_id = session.run(producer, input)?;
    if let Some(speed) = config.demo.speed {
        session.engine_mut().set_speed(speed)?;
    }
    info!(
        %run_id,
        producer = producer.name(),
        steps = session.engine().steps().len(),
        delay_ms = session.engine().next_delay().as_millis(),
        "Playback ready"
    );

    session.engine_mut().subscribe(|state| {
        println!("{}", render::render_state(state));
    });

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    session.engine_mut().play();
    while session.engine().is_playing() {
        tokio::select! {
            id = fired.recv() => {
                let Some(id) = id else {
                    warn!("Timer channel closed, stopping playback");
                    break;
                };
                session.engine_mut().on_timer(id);
            }
            _ = &mut ctrl_c => {
                info!("Interrupted, pausing playback");
                session.engine_mut().pause();
            }
        }
    }

    debug!(index = session.engine().current_index(), "Playback finished");
    match session.result() {
        Some(result) => println!("\nResult: {result:?}"),
        None => println!("\nNo result"),
    }
    session.destroy();
    Ok(())
}
