mod support;

use std::time::Duration;
use tilebound::domain::{EntityState, Facing, GamePhase, Key, PLAYER_ID, Stat};
use tilebound::interface_adapters::KeyStack;
use tilebound::use_cases::{GameError, GameEvent, start_game};

#[tokio::test(start_paused = true)]
async fn held_key_moves_the_player_each_tick() {
    support::init_tracing();
    let game = start_game(
        support::world(support::empty_tuning(), 1),
        KeyStack::new(),
        &support::settings(),
    )
    .expect("game starts");
    let start_x = game.latest().entities[0].position.x;

    game.input_tx
        .send(GameEvent::KeyDown(Key::Right))
        .await
        .expect("input accepted");
    tokio::time::sleep(Duration::from_millis(500)).await;

    let update = game.latest();
    let player = &update.entities[0];
    assert_eq!(player.id, PLAYER_ID);
    assert!(player.position.x > start_x + 2.0, "player at {}", player.position.x);
    assert_eq!(player.facing, Facing::East);
    assert_eq!(player.state, EntityState::Moving);

    let ticks = game.stop().await.expect("clean stop");
    assert!((29..=31).contains(&ticks), "ran {ticks} ticks");
    assert!(update.tick <= ticks);
}

#[tokio::test(start_paused = true)]
async fn releasing_the_key_stops_the_player() {
    support::init_tracing();
    let game = start_game(
        support::world(support::empty_tuning(), 1),
        KeyStack::new(),
        &support::settings(),
    )
    .expect("game starts");

    game.input_tx.send(GameEvent::KeyDown(Key::Down)).await.expect("input");
    tokio::time::sleep(Duration::from_millis(200)).await;
    game.input_tx.send(GameEvent::KeyUp(Key::Down)).await.expect("input");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let first = game.latest();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = game.latest();

    assert!(second.tick > first.tick);
    assert_eq!(first.entities[0].position, second.entities[0].position);
    assert_eq!(second.entities[0].state, EntityState::Idle);
    assert_eq!(second.entities[0].facing, Facing::South);

    game.stop().await.expect("clean stop");
}

#[tokio::test(start_paused = true)]
async fn player_death_ends_the_loop_on_its_own() {
    support::init_tracing();
    let game = start_game(
        support::world(support::ambush_tuning(), 9),
        KeyStack::new(),
        &support::settings(),
    )
    .expect("game starts");
    let mut phase_rx = game.phase_rx.clone();
    let world_rx = game.world_rx.clone();

    let ticks = game.join().await.expect("loop ends");

    // Killed on the first tick, removed from play after the grace period.
    assert_eq!(ticks, 5);
    assert_eq!(*phase_rx.borrow_and_update(), GamePhase::GameOver);
    let last = world_rx.borrow().clone();
    assert_eq!(last.tick, 5);
    assert_eq!(last.entities[0].state, EntityState::Dead);
    assert_eq!(last.hud.health, 0);
}

#[tokio::test(start_paused = true)]
async fn skill_points_are_spent_through_events() {
    support::init_tracing();
    let game = start_game(
        support::world(support::empty_tuning(), 1),
        KeyStack::new(),
        &support::settings(),
    )
    .expect("game starts");

    // No points yet: the request is ignored and the loop keeps running.
    game.input_tx
        .send(GameEvent::SpendSkillPoint(Stat::Defense))
        .await
        .expect("input");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let update = game.latest();
    assert_eq!(update.hud.skill_points, 0);
    assert_eq!(update.hud.max_health, 100);
    assert!(!game.is_finished());

    game.stop().await.expect("clean stop");
}

#[tokio::test(start_paused = true)]
async fn invalid_tick_rate_is_rejected() {
    let mut settings = support::settings();
    settings.tick_rate = 0;
    let result = start_game(
        support::world(support::empty_tuning(), 1),
        KeyStack::new(),
        &settings,
    );
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn step_length_follows_the_timer() {
    support::init_tracing();
    // Built for 30 Hz, driven at 60 Hz: movement must still match 60 Hz steps.
    let game = start_game(
        support::world_with_step(support::empty_tuning(), 1, 1.0 / 30.0),
        KeyStack::new(),
        &support::settings(),
    )
    .expect("game starts");
    let start_x = game.latest().entities[0].position.x;

    game.input_tx.send(GameEvent::KeyDown(Key::Right)).await.expect("input");
    tokio::time::sleep(Duration::from_millis(500)).await;

    // About 30 ticks at 5 units/s and 1/60 s per tick.
    let moved = game.latest().entities[0].position.x - start_x;
    assert!(moved > 2.0 && moved < 3.0, "moved {moved}");

    game.stop().await.expect("clean stop");
}

#[tokio::test]
async fn zero_input_capacity_is_rejected() {
    let mut settings = support::settings();
    settings.input_channel_capacity = 0;
    let result = start_game(
        support::world(support::empty_tuning(), 1),
        KeyStack::new(),
        &settings,
    );
    assert!(matches!(result, Err(GameError::InvalidChannelCapacity)));
}
