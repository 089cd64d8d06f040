// Timed command script: drives the game without a keyboard.

use super::protocol::CommandMessage;
use crate::use_cases::GameEvent;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScriptStep {
    /// Offset from script start.
    pub at_ms: u64,
    pub command: CommandMessage,
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    let mut steps: Vec<ScriptStep> = serde_json::from_str(json)?;
    steps.sort_by_key(|step| step.at_ms);
    Ok(steps)
}

/// Sends each step at its offset. Stops early when the game hangs up.
///
/// Returns how many events were delivered.
pub async fn play_script(steps: Vec<ScriptStep>, input_tx: mpsc::Sender<GameEvent>) -> usize {
    let start = Instant::now();
    let mut sent = 0;
    for step in steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        if input_tx.send(step.command.into()).await.is_err() {
            debug!(sent, "game input closed; script stopped");
            break;
        }
        sent += 1;
    }
    sent
}
