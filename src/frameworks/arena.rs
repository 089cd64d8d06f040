// Built-in level and demo input for the headless binary.

use crate::domain::{GridMap, Key, MapError};
use crate::interface_adapters::ScriptStep;
use crate::interface_adapters::protocol::CommandMessage;

/// Walled arena. Default spawn points sit on floor tiles.
pub const ARENA: [&str; 16] = [
    "########################",
    "#......................#",
    "#......................#",
    "#......................#",
    "#.....####.............#",
    "#........#.......#.....#",
    "#........#.......#.....#",
    "#................#.....#",
    "#......................#",
    "#...###................#",
    "#......................#",
    "#..........#####.......#",
    "#......................#",
    "#......................#",
    "#......................#",
    "########################",
];

pub fn arena_map() -> Result<GridMap, MapError> {
    GridMap::from_rows(&ARENA, 1.0)
}

/// A short patrol: walk east swinging, then south, then back.
pub fn demo_script() -> Vec<ScriptStep> {
    let mut steps = Vec::new();
    let mut at_ms = 0;
    let mut push = |delay: u64, command: CommandMessage| {
        at_ms += delay;
        steps.push(ScriptStep { at_ms, command });
    };

    let legs = [
        (Key::Right, 1_500),
        (Key::Down, 1_200),
        (Key::Left, 1_500),
        (Key::Up, 1_200),
    ];
    for (key, hold_ms) in legs {
        push(0, CommandMessage::KeyDown { key });
        for _ in 0..3 {
            push(hold_ms / 4, CommandMessage::KeyDown { key: Key::Attack });
            push(50, CommandMessage::KeyUp { key: Key::Attack });
        }
        push(hold_ms / 4, CommandMessage::KeyUp { key });
    }
    steps
}
