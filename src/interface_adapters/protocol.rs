// Wire DTOs and conversions for frames leaving the simulation and commands entering it.

use crate::domain::{
    EntityKind, EntitySnapshot, EntityState, Facing, GamePhase, HudSnapshot, Key, Stat,
    WorldUpdate,
};
use crate::use_cases::GameEvent;
use serde::{Deserialize, Serialize};

/// Messages emitted toward the render side.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum FrameMessage {
    WorldUpdate(WorldUpdateDto),
    GameState(GamePhaseDto),
}

/// Commands accepted from an input script or remote controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CommandMessage {
    KeyDown { key: Key },
    KeyUp { key: Key },
    SpendSkillPoint { stat: Stat },
}

impl From<CommandMessage> for GameEvent {
    fn from(message: CommandMessage) -> Self {
        match message {
            CommandMessage::KeyDown { key } => GameEvent::KeyDown(key),
            CommandMessage::KeyUp { key } => GameEvent::KeyUp(key),
            CommandMessage::SpendSkillPoint { stat } => GameEvent::SpendSkillPoint(stat),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub entities: Vec<EntityStateDto>,
    pub camera: CameraDto,
    pub hud: HudDto,
}

impl From<&WorldUpdate> for WorldUpdateDto {
    fn from(update: &WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            entities: update.entities.iter().map(EntityStateDto::from).collect(),
            camera: CameraDto {
                x: update.camera.min.x as f32,
                y: update.camera.min.y as f32,
                w: update.camera.width() as f32,
                h: update.camera.height() as f32,
            },
            hud: HudDto::from(&update.hud),
        }
    }
}

/// Flattened entity state; `anim` selects the sprite.
#[derive(Debug, Clone, Serialize)]
pub struct EntityStateDto {
    pub id: u64,
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub facing: Facing,
    pub state: EntityState,
    pub anim: u16,
    pub hp: i32,
    pub max_hp: i32,
}

impl From<&EntitySnapshot> for EntityStateDto {
    fn from(entity: &EntitySnapshot) -> Self {
        Self {
            id: entity.id.0,
            kind: entity.kind,
            x: entity.position.x as f32,
            y: entity.position.y as f32,
            w: entity.size.x as f32,
            h: entity.size.y as f32,
            facing: entity.facing,
            state: entity.state,
            anim: entity.animation_index,
            hp: entity.health,
            max_hp: entity.max_health,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CameraDto {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HudDto {
    pub hp: i32,
    pub max_hp: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub skill_points: u32,
    pub enemies: usize,
}

impl From<&HudSnapshot> for HudDto {
    fn from(hud: &HudSnapshot) -> Self {
        Self {
            hp: hud.health,
            max_hp: hud.max_health,
            level: hud.level,
            xp: hud.xp,
            xp_to_next: hud.xp_to_next,
            skill_points: hud.skill_points,
            enemies: hud.enemies,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum GamePhaseDto {
    Running,
    GameOver,
}

impl From<GamePhase> for GamePhaseDto {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Running => GamePhaseDto::Running,
            GamePhase::GameOver => GamePhaseDto::GameOver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, Range, Vector2D};

    #[test]
    fn world_update_frame_is_tagged_json() {
        let update = WorldUpdate {
            tick: 7,
            entities: vec![EntitySnapshot {
                id: EntityId(0),
                kind: EntityKind::Player,
                position: Vector2D::new(2.0, 3.0),
                size: Vector2D::new(0.5, 0.5),
                facing: Facing::South,
                state: EntityState::Moving,
                animation_index: 6,
                health: 90,
                max_health: 100,
            }],
            camera: Range::from_origin(Vector2D::ZERO, 16.0, 12.0),
            hud: HudSnapshot::default(),
        };

        let message = FrameMessage::WorldUpdate(WorldUpdateDto::from(&update));
        let json: serde_json::Value = serde_json::to_value(&message).expect("serialize");

        assert_eq!(json["type"], "WorldUpdate");
        assert_eq!(json["data"]["tick"], 7);
        let entity = &json["data"]["entities"][0];
        assert_eq!(entity["kind"], "player");
        assert_eq!(entity["facing"], "south");
        assert_eq!(entity["state"], "moving");
        assert_eq!(entity["anim"], 6);
        assert_eq!(json["data"]["camera"]["w"], 16.0);
    }

    #[test]
    fn command_messages_parse_into_events() {
        let message: CommandMessage =
            serde_json::from_str(r#"{"type":"KeyDown","data":{"key":"left"}}"#).expect("parse");
        assert_eq!(GameEvent::from(message), GameEvent::KeyDown(Key::Left));

        let message: CommandMessage =
            serde_json::from_str(r#"{"type":"SpendSkillPoint","data":{"stat":"defense"}}"#)
                .expect("parse");
        assert_eq!(GameEvent::from(message), GameEvent::SpendSkillPoint(Stat::Defense));
    }
}
