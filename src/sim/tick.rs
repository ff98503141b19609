//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;

use super::collision::{Axis, Contact, resolve_axis};
use super::events::SoundEvent;
use super::form::Form;
use super::level::LevelId;
use super::rect::{Body, Rect};
use super::state::{
    Enemy, EnemyKind, Facing, GameState, GameStatus, Owner, Particle, Projectile, ProjectileKind,
};
use crate::consts::*;
use crate::input::{Action, InputSource};
use crate::tuning::{self, MeleeShape, palette};

/// Whether the rest of the tick should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// A door replaced the level; the old tick's entities are gone
    LevelChanged,
}

/// Advance the game state by one fixed timestep.
///
/// Does nothing unless the game is `Playing`. Input edges are reset at the
/// end of every call regardless of status. Returns the sound events this
/// tick produced, in order.
pub fn tick<I: InputSource + ?Sized>(
    state: &mut GameState,
    input: &mut I,
    dt: f32,
) -> Vec<SoundEvent> {
    let mut events = Vec::new();
    if state.status == GameStatus::Playing {
        step(state, &*input, dt, &mut events);
    }
    input.reset_edges();
    events
}

fn step<I: InputSource + ?Sized>(
    state: &mut GameState,
    input: &I,
    dt: f32,
    events: &mut Vec<SoundEvent>,
) {
    state.time_ticks += 1;
    state.clock += dt;

    let player = &mut state.player;
    player.invincibility_timer = player.invincibility_timer.saturating_sub(1);

    // Walk animation
    if player.grounded && player.body.vel.x.abs() > 0.1 {
        player.walk_frame += tuning::WALK_ANIM_RATE;
    } else if player.grounded {
        player.walk_frame = 0.0;
    }

    apply_loop_wrap(state);

    // Metamorphosis
    if input.is_pressed(Action::CycleNext) {
        let form = state.player.form.next();
        transform_player(state, form, events);
    } else if input.is_pressed(Action::CyclePrevious) {
        let form = state.player.form.previous();
        transform_player(state, form, events);
    }

    let gravity = effective_gravity(state.boss_gravity_modifier, state.player.form);

    if move_player(state, input, gravity, events) == Flow::LevelChanged {
        return;
    }
    if update_attack(state, input, events) == Flow::LevelChanged {
        return;
    }
    apply_melee(state, events);

    update_enemies(state, events);
    update_projectiles(state, events);
    update_particles(state);

    // Falling out of the world
    let y = state.player.body.pos.y;
    if y > CANVAS_HEIGHT + FALL_OUT_MARGIN || y < -FALL_OUT_MARGIN {
        kill_player(state);
    }

    // Camera follows with easing, never left of the level start
    let target_x = state.player.body.pos.x - CANVAS_WIDTH / 3.0;
    state.camera.x += (target_x - state.camera.x) * CAMERA_LERP;
    state.camera.x = state.camera.x.max(0.0);
    state.camera.y = 0.0;

    state.message_timer = state.message_timer.saturating_sub(1);
}

/// Eternal recurrence: past `end_x` the player reappears the same distance
/// past `start_x`. Only x changes. Returns whether a wrap happened.
pub fn apply_loop_wrap(state: &mut GameState) -> bool {
    let Some(lc) = state.loop_config else {
        return false;
    };
    if !lc.active || state.player.body.pos.x <= lc.end_x {
        return false;
    }
    state.player.body.pos.x = lc.start_x + (state.player.body.pos.x - lc.end_x);
    state.show_message(tuning::LOOP_WRAP_MESSAGE);
    true
}

/// Base gravity scaled by the boss modifier, then by the form's weight.
///
/// The form multiplier only applies while gravity pulls down.
pub fn effective_gravity(boss_modifier: f32, form: Form) -> f32 {
    let g = GRAVITY * (1.0 + boss_modifier);
    if g > 0.0 { g * form.tuning().gravity_scale } else { g }
}

/// Switch the player into `form`. Position, velocity and hp carry over.
pub fn transform_player(state: &mut GameState, form: Form, events: &mut Vec<SoundEvent>) {
    events.push(SoundEvent::Transform);

    let t = form.tuning();
    let player = &mut state.player;
    log::debug!("Metamorphosis: {:?} -> {:?}", player.form, form);
    player.form = form;
    player.body.size = Vec2::new(t.width, t.height);
    player.color = t.color;

    state.show_message(t.message);
    events.push(SoundEvent::ThemeChange(form));

    let center = state.player.body.center();
    for _ in 0..tuning::TRANSFORM_PARTICLES {
        spawn_particle(state, center, palette::DEEP_GOLD);
    }
}

/// Horizontal control, jumping, gravity and axis-separated integration
fn move_player<I: InputSource + ?Sized>(
    state: &mut GameState,
    input: &I,
    gravity: f32,
    events: &mut Vec<SoundEvent>,
) -> Flow {
    let player = &mut state.player;
    let t = player.form.tuning();

    let locked = player.attacking && player.attack_frame < t.movement_lock_frames;
    if !locked {
        let left = input.is_down(Action::MoveLeft);
        let right = input.is_down(Action::MoveRight);

        if player.grounded {
            if left {
                player.body.vel.x = -t.move_speed;
                player.facing = Facing::Left;
            } else if right {
                player.body.vel.x = t.move_speed;
                player.facing = Facing::Right;
            } else {
                player.body.vel.x = 0.0;
            }

            if input.is_pressed(Action::Jump) {
                // Under inverted gravity "up" is toward the floor
                player.body.vel.y = if gravity < 0.0 {
                    t.jump_power
                } else {
                    -t.jump_power
                };
                player.grounded = false;
                events.push(SoundEvent::Jump(player.form));
            }
        } else {
            if left {
                player.body.vel.x -= tuning::AIR_ACCEL;
                player.facing = Facing::Left;
            } else if right {
                player.body.vel.x += tuning::AIR_ACCEL;
                player.facing = Facing::Right;
            }
            player.body.vel.x = player.body.vel.x.clamp(-t.move_speed, t.move_speed);
        }
    }

    player.body.vel.y += gravity;
    player.body.vel.y = if gravity > 0.0 {
        player.body.vel.y.min(TERMINAL_VELOCITY)
    } else {
        player.body.vel.y.max(-TERMINAL_VELOCITY)
    };

    state.player.body.pos.x += state.player.body.vel.x;
    if resolve_player_axis(state, Axis::X, gravity, events) == Flow::LevelChanged {
        return Flow::LevelChanged;
    }

    state.player.grounded = false;
    state.player.body.pos.y += state.player.body.vel.y;
    resolve_player_axis(state, Axis::Y, gravity, events)
}

fn resolve_player_axis(
    state: &mut GameState,
    axis: Axis,
    gravity: f32,
    events: &mut Vec<SoundEvent>,
) -> Flow {
    let res = resolve_axis(&mut state.player.body, axis, &state.platforms, gravity);
    if res.landed {
        state.player.grounded = true;
    }

    match res.contact {
        Contact::Clear => Flow::Continue,
        Contact::Danger => {
            damage_player(state, tuning::DANGER_DAMAGE, events);
            Flow::Continue
        }
        Contact::Door(target) => {
            enter_level(state, target, events);
            Flow::LevelChanged
        }
    }
}

/// Replace the level through a door and keep playing
fn enter_level(state: &mut GameState, target: LevelId, events: &mut Vec<SoundEvent>) {
    log::info!("Door: {} -> {}", state.level.name(), target.name());
    state.load_level(target);
    state.status = GameStatus::Playing;
    events.push(SoundEvent::Transform);
    events.push(SoundEvent::ThemeChange(state.player.form));
}

/// Cooldown, attack progression and attack start
fn update_attack<I: InputSource + ?Sized>(
    state: &mut GameState,
    input: &I,
    events: &mut Vec<SoundEvent>,
) -> Flow {
    let player = &mut state.player;
    let t = player.form.tuning();
    player.attack_cooldown = player.attack_cooldown.saturating_sub(1);

    if player.attacking {
        player.attack_frame += 1;

        if let Some(lunge) = t.lunge
            && player.attack_frame < lunge.frames
        {
            player.body.vel.x = player.facing.sign() * lunge.speed;
            player.body.pos.x += player.body.vel.x;
            // X resolution ignores gravity
            if resolve_player_axis(state, Axis::X, GRAVITY, events) == Flow::LevelChanged {
                return Flow::LevelChanged;
            }
        }

        let player = &mut state.player;
        if player.attack_frame > t.attack_frames {
            player.attacking = false;
        }
    } else if input.is_pressed(Action::Attack) && player.attack_cooldown == 0 {
        player.attacking = true;
        player.attack_frame = 0;
        player.attack_cooldown = t.attack_cooldown;
        events.push(SoundEvent::Attack(player.form));

        if let Some(shot) = t.shot {
            let facing = player.facing;
            let r = player.rect();
            let x = match facing {
                Facing::Right => r.right(),
                Facing::Left => r.x,
            };
            let y = r.y + r.h / 2.0 - shot.size / 2.0;
            let id = state.next_entity_id();
            state.projectiles.push(Projectile {
                id,
                kind: ProjectileKind::Star,
                owner: Owner::Player,
                body: Body::new(x, y, shot.size, shot.size)
                    .with_vel(facing.sign() * shot.speed, 0.0),
                ttl: shot.ttl,
                color: palette::RADIANT_LIGHT,
            });
        }
    }

    Flow::Continue
}

/// Melee hitbox for the current attack frame, if any
pub fn melee_hitbox(state: &GameState) -> Option<(Rect, i32)> {
    let player = &state.player;
    if !player.attacking {
        return None;
    }
    let melee = player.form.tuning().melee?;
    if !melee.is_active(player.attack_frame) {
        return None;
    }

    let r = player.rect();
    let hitbox = match melee.shape {
        MeleeShape::Tremor {
            reach,
            height,
            foot_offset,
        } => Rect::new(r.x - reach, r.bottom() - foot_offset, r.w + 2.0 * reach, height),
        MeleeShape::Claw { reach } => {
            let x = match player.facing {
                Facing::Right => r.right(),
                Facing::Left => r.x - reach,
            };
            Rect::new(x, r.y, reach, r.h)
        }
    };
    Some((hitbox, melee.damage))
}

fn apply_melee(state: &mut GameState, events: &mut Vec<SoundEvent>) {
    let Some((hitbox, damage)) = melee_hitbox(state) else {
        return;
    };
    let knockback = state.player.facing.sign() * tuning::ENEMY_KNOCKBACK;

    for i in 0..state.enemies.len() {
        if !hitbox.intersects(&state.enemies[i].rect()) {
            continue;
        }
        damage_enemy(state, i, damage, events);
        state.enemies[i].body.vel.x = knockback;

        if state.enemies[i].is_loop_anchor() {
            break_loop(state, i, tuning::LOOP_BREAK_MELEE_MESSAGE, events);
        }
    }
}

/// Destroy a loop anchor and switch the recurrence off for good
fn break_loop(state: &mut GameState, anchor: usize, message: &str, events: &mut Vec<SoundEvent>) {
    let Some(lc) = state.loop_config.as_mut() else {
        return;
    };
    if lc.active {
        log::info!("Loop broken at x={:.0}", state.player.body.pos.x);
    }
    lc.active = false;
    state.show_message(message);
    events.push(SoundEvent::Break);
    damage_enemy(state, anchor, tuning::ANCHOR_FINISHER, events);
}

fn update_enemies(state: &mut GameState, events: &mut Vec<SoundEvent>) {
    state.enemies.retain(|e| e.hp > 0);

    for i in 0..state.enemies.len() {
        let kind = state.enemies[i].kind;
        match kind {
            EnemyKind::Walker { patrol } => {
                let enemy = &mut state.enemies[i];
                if let Some(p) = patrol {
                    if enemy.body.pos.x > p.center + p.range {
                        enemy.body.vel.x = -tuning::PATROL_SPEED;
                    }
                    if enemy.body.pos.x < p.center - p.range {
                        enemy.body.vel.x = tuning::PATROL_SPEED;
                    }
                }
                enemy.body.pos.x += enemy.body.vel.x;
            }
            EnemyKind::BossGravity { .. } => update_boss(state, i, events),
            EnemyKind::LoopAnchor => {}
        }

        let enemy = &state.enemies[i];
        if !enemy.is_loop_anchor() && enemy.rect().intersects(&state.player.rect()) {
            damage_player(state, tuning::CONTACT_DAMAGE, events);
        }
    }
}

/// Spirit of Gravity: phase cycle, hover, drift and orb volleys
fn update_boss(state: &mut GameState, index: usize, events: &mut Vec<SoundEvent>) {
    let kind = state.enemies[index].kind;
    let EnemyKind::BossGravity { mut phase, mut timer } = kind else {
        return;
    };

    timer += 1;
    if timer > tuning::BOSS_PHASE_TICKS {
        timer = 0;
        phase = (phase + 1) % tuning::BOSS_PHASES.len() as u8;
        events.push(SoundEvent::Transform);

        let p = &tuning::BOSS_PHASES[phase as usize];
        state.boss_gravity_modifier = p.gravity_modifier;
        if let Some(msg) = p.message {
            state.show_message(msg);
        }
        log::info!(
            "Boss phase {} (gravity modifier {})",
            phase,
            p.gravity_modifier
        );
    }

    let player_x = state.player.body.pos.x;
    let clock_ms = state.clock * 1000.0;
    let boss = &mut state.enemies[index];
    boss.kind = EnemyKind::BossGravity { phase, timer };

    boss.body.pos.y = tuning::BOSS_HOVER_Y
        + (clock_ms / tuning::BOSS_HOVER_PERIOD_MS).sin() * tuning::BOSS_HOVER_AMPLITUDE;

    let dx = player_x - boss.body.pos.x;
    if dx.abs() > tuning::BOSS_DRIFT_DEADZONE {
        boss.body.pos.x += crate::sign(dx) * tuning::BOSS_DRIFT_SPEED;
    }

    if timer % tuning::BOSS_FIRE_INTERVAL == 0 {
        let center = boss.body.center();
        fire_orb(state, center);
    }
}

fn fire_orb(state: &mut GameState, origin: Vec2) {
    let spread = tuning::ORB_SPREAD;
    let vx = state.rng.random_range(-spread..spread);
    let vy = state.rng.random_range(-spread..spread);
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        kind: ProjectileKind::GravityOrb,
        owner: Owner::Enemy,
        body: Body::new(origin.x, origin.y, tuning::ORB_SIZE, tuning::ORB_SIZE).with_vel(vx, vy),
        ttl: tuning::ORB_TTL,
        color: palette::BOSS_RED,
    });
}

fn update_projectiles(state: &mut GameState, events: &mut Vec<SoundEvent>) {
    let clock_ms = state.clock * 1000.0;
    let homing = state
        .boss()
        .and_then(Enemy::boss_phase)
        .is_some_and(|phase| phase == tuning::ORB_HOMING_PHASE);

    for i in 0..state.projectiles.len() {
        let player_pos = state.player.body.pos;
        let p = &mut state.projectiles[i];
        p.body.integrate();
        p.ttl = p.ttl.saturating_sub(1);

        match p.kind {
            ProjectileKind::Star => {
                p.body.pos.y += (clock_ms / tuning::STAR_WOBBLE_PERIOD_MS).sin()
                    * tuning::STAR_WOBBLE_AMPLITUDE;
            }
            ProjectileKind::GravityOrb if homing => {
                p.body.vel += (player_pos - p.body.pos) * tuning::ORB_HOMING_GAIN;
            }
            ProjectileKind::GravityOrb => {}
        }

        let rect = p.body.rect();
        let owner = p.owner;
        match owner {
            Owner::Enemy => {
                if rect.intersects(&state.player.rect()) {
                    damage_player(state, tuning::ORB_DAMAGE, events);
                    state.projectiles[i].ttl = 0;
                }
            }
            Owner::Player => {
                let Some(target) = state.enemies.iter().position(|e| rect.intersects(&e.rect()))
                else {
                    continue;
                };
                damage_enemy(state, target, tuning::STAR_DAMAGE, events);
                state.projectiles[i].ttl = 0;
                if state.enemies[target].is_loop_anchor() {
                    break_loop(state, target, tuning::LOOP_BREAK_STAR_MESSAGE, events);
                }
            }
        }
    }

    state.projectiles.retain(|p| p.ttl > 0);
}

fn update_particles(state: &mut GameState) {
    for p in &mut state.particles {
        p.body.integrate();
        p.life = p.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}

fn spawn_particle(state: &mut GameState, pos: Vec2, color: u32) {
    let spread = tuning::PARTICLE_SPREAD;
    let vx = state.rng.random_range(-spread..spread);
    let vy = state.rng.random_range(-spread..spread);
    state.particles.push(Particle {
        body: Body::new(pos.x, pos.y, tuning::PARTICLE_SIZE, tuning::PARTICLE_SIZE)
            .with_vel(vx, vy),
        life: tuning::PARTICLE_LIFE,
        color,
    });
}

/// Hurt the player unless invincible. Camel halves the damage.
pub fn damage_player(state: &mut GameState, amount: i32, events: &mut Vec<SoundEvent>) {
    let player = &mut state.player;
    if player.invincibility_timer > 0 {
        return;
    }

    events.push(SoundEvent::Damage);
    let t = player.form.tuning();
    let amount = if t.damage_halving { amount / 2 } else { amount };

    player.hp = (player.hp - amount).max(0);
    player.invincibility_timer = tuning::INVINCIBILITY_TICKS;
    player.body.vel.y = -tuning::PLAYER_KNOCKBACK;
    player.body.vel.x = -player.facing.sign() * tuning::PLAYER_KNOCKBACK;
    player.grounded = false;

    if player.hp <= 0 {
        kill_player(state);
    }
}

/// Hurt the enemy at `index`; killing the boss wins the game
pub fn damage_enemy(
    state: &mut GameState,
    index: usize,
    amount: i32,
    events: &mut Vec<SoundEvent>,
) {
    let enemy = &mut state.enemies[index];
    let was_alive = enemy.hp > 0;
    enemy.hp -= amount;
    let killed = was_alive && enemy.hp <= 0;
    let is_boss = enemy.is_boss();
    let pos = enemy.body.pos;

    spawn_particle(state, pos, palette::WHITE);

    if killed && is_boss {
        log::info!("The Spirit of Gravity is defeated");
        state.status = GameStatus::Victory;
        events.push(SoundEvent::Victory);
    }
}

fn kill_player(state: &mut GameState) {
    if state.status == GameStatus::Playing {
        log::info!(
            "Game over on '{}' at x={:.0}",
            state.level.name(),
            state.player.body.pos.x
        );
    }
    state.status = GameStatus::GameOver;
}
