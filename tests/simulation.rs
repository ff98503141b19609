//! End-to-end behavior of the fixed-step simulation

use glam::Vec2;

use zarathustra_ascent::consts::SIM_DT;
use zarathustra_ascent::sim::{
    Body, Engine, EnemyKind, Form, GameState, GameStatus, LevelId, Owner, Projectile,
    ProjectileKind, SoundEvent, apply_loop_wrap, damage_enemy, damage_player, tick,
};
use zarathustra_ascent::tuning::{self, palette};
use zarathustra_ascent::{InputState, KeyBindings};

fn input() -> InputState {
    InputState::new(KeyBindings::default())
}

fn playing(level: LevelId) -> GameState {
    let mut state = GameState::new(level, 2024);
    state.status = GameStatus::Playing;
    state
}

fn player_star(state: &mut GameState, pos: Vec2) {
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        kind: ProjectileKind::Star,
        owner: Owner::Player,
        body: Body::new(pos.x, pos.y, 16.0, 16.0),
        ttl: 60,
        color: palette::RADIANT_LIGHT,
    });
}

fn anchor_index(state: &GameState) -> Option<usize> {
    state.enemies.iter().position(|e| e.is_loop_anchor())
}

#[test]
fn restart_level_twice_gives_same_start() {
    let mut engine = Engine::new(99);
    engine.start_game();

    let mut inp = input();
    inp.key_down("ArrowRight");
    inp.key_down("v");
    for _ in 0..90 {
        engine.update(&mut inp, SIM_DT);
    }

    engine.restart_level();
    let first = engine.state().player.clone();
    engine.restart_level();
    let second = engine.state().player.clone();

    assert_eq!(first, second);
    assert_eq!(first.body.pos, Vec2::new(100.0, 300.0));
    assert_eq!(first.hp, first.max_hp);
    assert_eq!(first.form, Form::Camel);
    assert_eq!(engine.state().status, GameStatus::Playing);
}

#[test]
fn loop_wrap_is_a_pure_teleport() {
    let mut state = playing(LevelId::VisionAndEnigma);
    state.player.body.pos = Vec2::new(1810.0, 123.0);
    state.player.body.vel = Vec2::new(1.5, -2.0);
    state.message.clear();

    assert!(apply_loop_wrap(&mut state));
    assert_eq!(state.player.body.pos, Vec2::new(410.0, 123.0));
    assert_eq!(state.player.body.vel, Vec2::new(1.5, -2.0));
    assert_eq!(state.message, tuning::LOOP_WRAP_MESSAGE);

    // Inside the corridor nothing happens
    assert!(!apply_loop_wrap(&mut state));
}

#[test]
fn loop_wrap_during_tick() {
    let mut state = playing(LevelId::VisionAndEnigma);
    state.player.body.pos = Vec2::new(1810.0, 100.0);
    state.player.body.vel = Vec2::ZERO;
    state.message.clear();

    tick(&mut state, &mut input(), SIM_DT);
    assert_eq!(state.player.body.pos.x, 410.0);
    assert_eq!(state.player.body.vel.x, 0.0);
    assert!(!state.message.is_empty());
}

#[test]
fn inactive_loop_does_not_wrap() {
    let mut state = playing(LevelId::VisionAndEnigma);
    if let Some(lc) = state.loop_config.as_mut() {
        lc.active = false;
    }
    state.player.body.pos = Vec2::new(1810.0, 100.0);
    assert!(!apply_loop_wrap(&mut state));
    assert_eq!(state.player.body.pos.x, 1810.0);
}

#[test]
fn camel_halves_spike_damage() {
    let mut state = playing(LevelId::TightropeWalker);
    assert_eq!(state.player.form, Form::Camel);
    // Standing in the spike bed
    state.player.body.pos = Vec2::new(700.0, 400.0);

    let events = tick(&mut state, &mut input(), SIM_DT);
    assert_eq!(state.player.hp, 90);
    assert_eq!(state.player.invincibility_timer, 60);
    assert_eq!(
        events.iter().filter(|e| **e == SoundEvent::Damage).count(),
        1
    );
}

#[test]
fn invincible_player_takes_no_damage() {
    let mut state = playing(LevelId::TightropeWalker);
    let mut events = Vec::new();
    damage_player(&mut state, 20, &mut events);
    damage_player(&mut state, 20, &mut events);
    assert_eq!(state.player.hp, 90);
    assert_eq!(events, vec![SoundEvent::Damage]);
}

#[test]
fn lethal_damage_ends_the_game() {
    let mut state = playing(LevelId::TightropeWalker);
    state.player.hp = 5;
    damage_player(&mut state, 20, &mut Vec::new());
    assert_eq!(state.player.hp, 0);
    assert_eq!(state.status, GameStatus::GameOver);
}

#[test]
fn boss_phase_advances_after_600_ticks() {
    let mut state = playing(LevelId::VisionAndEnigma);
    let boss = state.enemies.iter_mut().find(|e| e.is_boss()).unwrap();
    boss.kind = EnemyKind::BossGravity {
        phase: 0,
        timer: 600,
    };

    let events = tick(&mut state, &mut input(), SIM_DT);

    assert_eq!(state.boss().and_then(|b| b.boss_phase()), Some(1));
    assert_eq!(state.boss_gravity_modifier, 1.0);
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == SoundEvent::Transform)
            .count(),
        1
    );
    assert_eq!(state.message, "SPIRIT OF GRAVITY: Submit to the Weight!");
}

#[test]
fn boss_phase_cycle_wraps() {
    let mut state = playing(LevelId::VisionAndEnigma);
    let expected = [(2u8, -2.0f32), (3, 0.0), (0, 0.0)];
    let mut phase = 1;
    for (next, modifier) in expected {
        let boss = state.enemies.iter_mut().find(|e| e.is_boss()).unwrap();
        boss.kind = EnemyKind::BossGravity { phase, timer: 600 };
        tick(&mut state, &mut input(), SIM_DT);
        assert_eq!(state.boss().and_then(|b| b.boss_phase()), Some(next));
        assert_eq!(state.boss_gravity_modifier, modifier);
        phase = next;
    }
}

#[test]
fn vision_level_has_one_fragile_anchor() {
    let state = GameState::new(LevelId::VisionAndEnigma, 1);
    let anchors: Vec<_> = state.enemies.iter().filter(|e| e.is_loop_anchor()).collect();
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].hp, 1);
    assert!(state.loop_active());
}

#[test]
fn star_breaks_the_loop() {
    let mut state = playing(LevelId::VisionAndEnigma);
    let anchor = anchor_index(&state).unwrap();
    let pos = state.enemies[anchor].body.pos + Vec2::new(4.0, 8.0);
    player_star(&mut state, pos);

    let events = tick(&mut state, &mut input(), SIM_DT);
    assert!(!state.loop_active());
    assert!(events.contains(&SoundEvent::Break));
    assert_eq!(state.message, tuning::LOOP_BREAK_STAR_MESSAGE);
    assert!(state.projectiles.is_empty());

    // Dead but still listed until the next enemy pass
    let anchor = anchor_index(&state).unwrap();
    assert!(state.enemies[anchor].hp <= 0);

    tick(&mut state, &mut input(), SIM_DT);
    assert!(anchor_index(&state).is_none());
}

#[test]
fn lion_claw_breaks_the_loop() {
    let mut state = playing(LevelId::VisionAndEnigma);
    let mut events = Vec::new();
    zarathustra_ascent::sim::transform_player(&mut state, Form::Lion, &mut events);

    // Mid-swipe, just left of the anchor's perch
    state.player.body.pos = Vec2::new(1560.0, 100.0);
    state.player.body.vel = Vec2::ZERO;
    state.player.attacking = true;
    state.player.attack_frame = 1;

    let events = tick(&mut state, &mut input(), SIM_DT);
    assert!(!state.loop_active());
    assert!(events.contains(&SoundEvent::Break));
    assert_eq!(state.message, tuning::LOOP_BREAK_MELEE_MESSAGE);
    assert!(anchor_index(&state).is_none());

    // The corridor no longer recurs
    state.player.body.pos = Vec2::new(1810.0, 100.0);
    assert!(!apply_loop_wrap(&mut state));
}

#[test]
fn killing_the_boss_wins() {
    let mut state = playing(LevelId::VisionAndEnigma);
    let boss = state.enemies.iter().position(|e| e.is_boss()).unwrap();
    state.enemies[boss].hp = 5;
    let center = state.enemies[boss].body.pos + Vec2::new(24.0, 32.0);
    player_star(&mut state, center);

    // Keys still held must not matter
    let mut inp = input();
    inp.key_down("ArrowLeft");
    inp.key_down("x");

    let events = tick(&mut state, &mut inp, SIM_DT);
    assert_eq!(state.status, GameStatus::Victory);
    assert_eq!(
        events.iter().filter(|e| **e == SoundEvent::Victory).count(),
        1
    );

    // Victory freezes the simulation
    let frozen = state.clone();
    assert!(tick(&mut state, &mut inp, SIM_DT).is_empty());
    assert_eq!(state, frozen);
}

#[test]
fn overkill_on_a_dead_boss_is_not_a_second_victory() {
    let mut state = playing(LevelId::VisionAndEnigma);
    let boss = state.enemies.iter().position(|e| e.is_boss()).unwrap();
    state.enemies[boss].hp = 10;

    let mut events = Vec::new();
    damage_enemy(&mut state, boss, 15, &mut events);
    damage_enemy(&mut state, boss, 15, &mut events);
    assert_eq!(events, vec![SoundEvent::Victory]);
    assert_eq!(state.status, GameStatus::Victory);
    // One white spark per hit
    assert_eq!(state.particles.len(), 2);
}

#[test]
fn walking_off_the_first_floor_is_fatal() {
    let mut engine = Engine::new(5);
    engine.start_game();
    let mut inp = input();
    inp.key_down("ArrowRight");

    for _ in 0..600 {
        engine.update(&mut inp, SIM_DT);
        if engine.state().status != GameStatus::Playing {
            break;
        }
    }

    // Spikes do not block, so the camel drops through them and out of the world
    let state = engine.state();
    assert_eq!(state.status, GameStatus::GameOver);
    assert_eq!(state.level, LevelId::TightropeWalker);
    assert!(state.player.hp < state.player.max_hp);
}
