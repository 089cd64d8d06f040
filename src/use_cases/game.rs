use super::timer::{Timer, TimerError, TimerHandle};
use super::types::{GameEvent, GamePhase, WorldUpdate};
use crate::domain::{InputSource, World};
use std::ops::ControlFlow;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct GameSettings {
    pub tick_rate: u32,
    pub input_channel_capacity: usize,
    pub max_catch_up_ticks: u32,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error("input channel capacity must be at least 1")]
    InvalidChannelCapacity,
}

/// Handles to a running game loop.
#[derive(Debug)]
pub struct GameHandle {
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Latest completed tick. Readers never observe a half-updated world.
    pub world_rx: watch::Receiver<Arc<WorldUpdate>>,
    pub phase_rx: watch::Receiver<GamePhase>,
    timer: TimerHandle,
}

impl GameHandle {
    pub fn latest(&self) -> Arc<WorldUpdate> {
        self.world_rx.borrow().clone()
    }

    /// Stops the loop; returns the number of ticks simulated.
    pub async fn stop(self) -> Result<u64, GameError> {
        let ticks = self.timer.stop().await?;
        info!(ticks, "game stopped");
        Ok(ticks)
    }

    /// Waits for the loop to end on its own (game over).
    pub async fn join(self) -> Result<u64, GameError> {
        let ticks = self.timer.join().await?;
        info!(ticks, "game finished");
        Ok(ticks)
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }
}

/// Starts the fixed-step loop.
///
/// The timer task owns the world and the input source. Each tick drains
/// pending events, samples input, steps the world and publishes the result.
/// The loop ends by itself once the world reports game over.
/// The world's step length is taken from the timer interval.
pub fn start_game<I>(
    mut world: World,
    mut input: I,
    settings: &GameSettings,
) -> Result<GameHandle, GameError>
where
    I: InputSource + 'static,
{
    if settings.input_channel_capacity == 0 {
        return Err(GameError::InvalidChannelCapacity);
    }
    let timer = Timer::new(settings.tick_rate)?.with_max_catch_up(settings.max_catch_up_ticks);

    let dt = timer.interval().as_secs_f64();
    if (world.tick_seconds() - dt).abs() > 1e-9 {
        warn!(
            world_dt = world.tick_seconds(),
            timer_dt = dt,
            "world step length differs from tick rate; using the timer's"
        );
    }
    world.set_tick_seconds(dt);

    let (input_tx, mut input_rx) = mpsc::channel::<GameEvent>(settings.input_channel_capacity);
    let (world_tx, world_rx) = watch::channel(Arc::new(world.snapshot()));
    let (phase_tx, phase_rx) = watch::channel(world.phase());

    let handle = timer.start(move |tick| {
        while let Ok(event) = input_rx.try_recv() {
            match event {
                GameEvent::KeyDown(key) => input.key_down(key),
                GameEvent::KeyUp(key) => input.key_up(key),
                GameEvent::SpendSkillPoint(stat) => {
                    world.spend_skill_point(stat);
                }
            }
        }

        let frame = input.sample();
        let update = world.step(&frame);
        debug!(tick, world_tick = update.tick, entities = update.entities.len(), "tick");
        world_tx.send_replace(Arc::new(update));

        if world.is_over() {
            phase_tx.send_replace(GamePhase::GameOver);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });

    info!(tick_rate = settings.tick_rate, "game loop started");
    Ok(GameHandle {
        input_tx,
        world_rx,
        phase_rx,
        timer: handle,
    })
}
