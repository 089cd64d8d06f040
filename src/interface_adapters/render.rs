// Headless render consumer: turns published ticks into JSON frames.

use super::protocol::{FrameMessage, GamePhaseDto, WorldUpdateDto};
use crate::use_cases::{GamePhase, WorldUpdate};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Serializes every observed tick and phase change into the latest-frame slot.
///
/// Slow consumers skip ticks rather than queueing them; the watch channel only
/// ever holds the newest frame. Exits once the simulation side hangs up.
pub async fn frame_serializer(
    mut world_rx: watch::Receiver<Arc<WorldUpdate>>,
    mut phase_rx: watch::Receiver<GamePhase>,
    frame_tx: watch::Sender<String>,
    hud_log_every: u64,
) {
    loop {
        let message = tokio::select! {
            changed = world_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = world_rx.borrow_and_update().clone();
                log_hud(&update, hud_log_every);
                FrameMessage::WorldUpdate(WorldUpdateDto::from(update.as_ref()))
            }
            changed = phase_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let phase = *phase_rx.borrow_and_update();
                info!(phase = ?phase, "game phase changed");
                FrameMessage::GameState(GamePhaseDto::from(phase))
            }
        };

        match serde_json::to_string(&message) {
            Ok(txt) => {
                frame_tx.send_replace(txt);
            }
            Err(e) => {
                error!(error = ?e, "failed to serialize frame");
            }
        }
    }
    debug!("simulation channels closed; frame serializer exiting");
}

fn log_hud(update: &WorldUpdate, every: u64) {
    if every == 0 || update.tick % every != 0 {
        return;
    }
    let hud = &update.hud;
    info!(
        tick = update.tick,
        hp = hud.health,
        max_hp = hud.max_health,
        level = hud.level,
        xp = hud.xp,
        enemies = hud.enemies,
        "hud"
    );
}
