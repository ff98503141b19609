//! Hand-authored level layouts
//!
//! `generate_level` is pure: same identifier, same layout.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::{Body, Rect};
use super::state::{Enemy, EnemyKind, LoopConfig, Patrol, Platform, PlatformKind};
use crate::consts::CANVAS_HEIGHT;
use crate::tuning::{BOSS_HP, palette};

/// The closed set of levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    /// Prologue: spikes and a single guard
    TightropeWalker,
    /// Tutorial for the three forms
    ThreeMetamorphoses,
    /// Recurrence loop, loop anchor and the Spirit of Gravity
    VisionAndEnigma,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [
        LevelId::TightropeWalker,
        LevelId::ThreeMetamorphoses,
        LevelId::VisionAndEnigma,
    ];

    pub fn first() -> Self {
        LevelId::TightropeWalker
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            LevelId::TightropeWalker => "The Tightrope Walker",
            LevelId::ThreeMetamorphoses => "The Three Metamorphoses",
            LevelId::VisionAndEnigma => "The Vision and the Enigma",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name().eq_ignore_ascii_case(name))
    }

    /// Level behind this level's door
    pub fn next(&self) -> Option<Self> {
        match self {
            LevelId::TightropeWalker => Some(LevelId::ThreeMetamorphoses),
            LevelId::ThreeMetamorphoses => Some(LevelId::VisionAndEnigma),
            LevelId::VisionAndEnigma => None,
        }
    }
}

/// Initial layout of a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub player_start: Vec2,
    pub level_width: f32,
    pub loop_config: Option<LoopConfig>,
}

const FLOOR_Y: f32 = CANVAS_HEIGHT - 32.0;
const FLOOR_THICKNESS: f32 = 32.0;
const LEDGE_THICKNESS: f32 = 16.0;
const DOOR_W: f32 = 40.0;
const DOOR_H: f32 = 60.0;

/// Accumulates platforms and enemies with sequential enemy IDs
struct LayoutBuilder {
    platforms: Vec<Platform>,
    enemies: Vec<Enemy>,
}

impl LayoutBuilder {
    fn new() -> Self {
        Self {
            platforms: Vec::new(),
            enemies: Vec::new(),
        }
    }

    fn block(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.platforms.push(Platform {
            rect: Rect::new(x, y, w, h),
            kind: PlatformKind::Solid,
            color: palette::GOTHIC_GREY,
        });
    }

    fn floor(&mut self, x: f32, w: f32) {
        self.block(x, FLOOR_Y, w, FLOOR_THICKNESS);
    }

    fn ceiling(&mut self, x: f32, w: f32, y: f32) {
        self.block(x, y, w, FLOOR_THICKNESS);
    }

    fn ledge(&mut self, x: f32, y: f32, w: f32) {
        self.block(x, y, w, LEDGE_THICKNESS);
    }

    fn spikes(&mut self, x: f32, y: f32, w: f32) {
        self.platforms.push(Platform {
            rect: Rect::new(x, y, w, LEDGE_THICKNESS),
            kind: PlatformKind::Danger,
            color: palette::BLOOD_RED,
        });
    }

    /// Spikes lining the bottom of a pit
    fn pit_spikes(&mut self, x: f32, w: f32) {
        self.spikes(x, CANVAS_HEIGHT - LEDGE_THICKNESS, w);
    }

    fn door(&mut self, x: f32, y: f32, target: LevelId) {
        self.platforms.push(Platform {
            rect: Rect::new(x, y, DOOR_W, DOOR_H),
            kind: PlatformKind::Door { target },
            color: palette::DEEP_GOLD,
        });
    }

    fn push_enemy(&mut self, kind: EnemyKind, body: Body, hp: i32, color: u32) {
        let id = self.enemies.len() as u32 + 1;
        self.enemies.push(Enemy {
            id,
            kind,
            body,
            hp,
            max_hp: hp,
            color,
        });
    }

    fn walker(&mut self, x: f32, y: f32, size: f32, vx: f32, hp: i32, patrol_range: f32) {
        self.push_enemy(
            EnemyKind::Walker {
                patrol: Some(Patrol {
                    center: x,
                    range: patrol_range,
                }),
            },
            Body::new(x, y, size, size).with_vel(vx, 0.0),
            hp,
            palette::BLOOD_RED,
        );
    }

    fn loop_anchor(&mut self, x: f32, y: f32) {
        self.push_enemy(
            EnemyKind::LoopAnchor,
            Body::new(x, y, 32.0, 32.0),
            1,
            palette::SNAKE_GREEN,
        );
    }

    fn boss(&mut self, x: f32, y: f32) {
        self.push_enemy(
            EnemyKind::BossGravity { phase: 0, timer: 0 },
            Body::new(x, y, 64.0, 80.0),
            BOSS_HP,
            palette::BOSS_RED,
        );
    }
}

/// Build the initial layout for a level
pub fn generate_level(level: LevelId) -> LevelLayout {
    let mut b = LayoutBuilder::new();
    let player_start = Vec2::new(100.0, 300.0);
    let mut loop_config = None;

    let level_width = match level {
        LevelId::TightropeWalker => {
            b.floor(0.0, 600.0);
            // Stepping stones over a long spike bed
            b.ledge(700.0, 350.0, 64.0);
            b.ledge(850.0, 300.0, 32.0);
            b.ledge(1000.0, 250.0, 32.0);
            b.ledge(1200.0, 300.0, 200.0);
            b.pit_spikes(600.0, 1000.0);

            b.walker(1300.0, 250.0, 32.0, 1.0, 20, 100.0);

            b.door(1500.0, 250.0, LevelId::ThreeMetamorphoses);
            3000.0
        }

        LevelId::ThreeMetamorphoses => {
            b.floor(0.0, 500.0);

            // Needle's eye: a hanging wall leaves a 38px gap only the Child fits
            b.block(500.0, 0.0, 100.0, 380.0);
            b.floor(500.0, 100.0);
            b.floor(600.0, 400.0);

            // Lion's leap: 220px pit
            b.floor(1220.0, 800.0);
            b.pit_spikes(1000.0, 220.0);

            b.walker(1500.0, 350.0, 48.0, 0.5, 80, 150.0);

            b.door(1900.0, 350.0, LevelId::VisionAndEnigma);
            3000.0
        }

        LevelId::VisionAndEnigma => {
            b.floor(0.0, 400.0);

            // The recurring corridor (x 400..1800)
            loop_config = Some(LoopConfig {
                start_x: 400.0,
                end_x: 1800.0,
                active: true,
            });
            for i in 0..3 {
                let offset = 400.0 + i as f32 * 500.0;
                b.floor(offset, 500.0);
                b.ledge(offset + 200.0, 300.0, 100.0);
                // Archway
                b.block(offset + 400.0, 200.0, 20.0, 200.0);
                b.walker(offset + 300.0, 350.0, 32.0, 1.0, 30, 100.0);
            }

            // The snake on a high perch holds the loop together
            b.ledge(1600.0, 150.0, 64.0);
            b.loop_anchor(1616.0, 110.0);

            // Ascent to the arena
            b.floor(1800.0, 600.0);
            b.ledge(2000.0, 350.0, 100.0);
            b.ledge(2150.0, 300.0, 100.0);
            b.ledge(2300.0, 250.0, 100.0);

            // Boss arena with a ceiling to stand on under inverted gravity
            let arena_start = 2500.0;
            b.floor(arena_start, 1000.0);
            b.ceiling(arena_start, 1000.0, 50.0);
            b.block(arena_start - 50.0, 0.0, 50.0, CANVAS_HEIGHT);
            b.block(arena_start + 1000.0, 0.0, 50.0, CANVAS_HEIGHT);

            b.boss(arena_start + 500.0, 200.0);
            4000.0
        }
    };

    LevelLayout {
        platforms: b.platforms,
        enemies: b.enemies,
        player_start,
        level_width,
        loop_config,
    }
}
