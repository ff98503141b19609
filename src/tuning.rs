//! Data-driven game balance
//!
//! Per-form movement and combat parameters live in one table keyed by
//! [`Form`]; balance changes are data edits here, not branches in the tick.

use crate::sim::Form;

/// Shape of a melee hitbox relative to the player body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeleeShape {
    /// Wide area around the feet, independent of facing
    Tremor {
        /// Extra width on each side of the body
        reach: f32,
        /// Hitbox height
        height: f32,
        /// How far above the feet the hitbox starts
        foot_offset: f32,
    },
    /// Rectangle in front of the player, full body height
    Claw { reach: f32 },
}

/// Melee attack window and damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeTuning {
    /// First active attack frame (inclusive)
    pub active_from: u32,
    /// Last active attack frame (inclusive)
    pub active_to: u32,
    pub damage: i32,
    pub shape: MeleeShape,
}

impl MeleeTuning {
    #[inline]
    pub fn is_active(&self, frame: u32) -> bool {
        frame >= self.active_from && frame <= self.active_to
    }
}

/// Forward burst applied during the first frames of an attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LungeTuning {
    pub speed: f32,
    /// Burst applies while attack_frame < frames
    pub frames: u32,
}

/// Projectile thrown at attack start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotTuning {
    pub speed: f32,
    pub size: f32,
    pub ttl: u32,
}

/// Everything a form changes about the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormTuning {
    pub move_speed: f32,
    /// Jump impulse magnitude (sign picked from gravity direction)
    pub jump_power: f32,
    /// Gravity multiplier, only applied while effective gravity is positive
    pub gravity_scale: f32,
    pub width: f32,
    pub height: f32,
    /// Body color (0xRRGGBB)
    pub color: u32,
    /// Attack ends once attack_frame exceeds this
    pub attack_frames: u32,
    pub attack_cooldown: u32,
    /// Horizontal input ignored while attack_frame < this
    pub movement_lock_frames: u32,
    pub melee: Option<MeleeTuning>,
    pub lunge: Option<LungeTuning>,
    pub shot: Option<ShotTuning>,
    /// Halve incoming damage
    pub damage_halving: bool,
    /// Shown when switching into this form
    pub message: &'static str,
}

static CAMEL: FormTuning = FormTuning {
    move_speed: 2.5,
    jump_power: 8.0,
    gravity_scale: 1.2,
    width: 40.0,
    height: 48.0,
    color: 0xd97706,
    attack_frames: 25,
    attack_cooldown: 50,
    movement_lock_frames: 10,
    melee: Some(MeleeTuning {
        active_from: 10,
        active_to: 20,
        damage: 40,
        shape: MeleeShape::Tremor {
            reach: 40.0,
            height: 40.0,
            foot_offset: 20.0,
        },
    }),
    lunge: None,
    shot: None,
    damage_halving: true,
    message: "THE CAMEL: Thou Shalt!",
};

static LION: FormTuning = FormTuning {
    move_speed: 6.0,
    jump_power: 11.0,
    gravity_scale: 1.0,
    width: 32.0,
    height: 48.0,
    color: 0xb91c1c,
    attack_frames: 15,
    attack_cooldown: 25,
    movement_lock_frames: 0,
    melee: Some(MeleeTuning {
        active_from: 2,
        active_to: 8,
        damage: 25,
        shape: MeleeShape::Claw { reach: 60.0 },
    }),
    lunge: Some(LungeTuning {
        speed: 8.0,
        frames: 8,
    }),
    shot: None,
    damage_halving: false,
    message: "THE LION: I Will!",
};

static CHILD: FormTuning = FormTuning {
    move_speed: 3.5,
    jump_power: 9.0,
    gravity_scale: 0.7,
    width: 24.0,
    height: 24.0,
    color: 0xf4f4f5,
    attack_frames: 15,
    attack_cooldown: 40,
    movement_lock_frames: 0,
    melee: None,
    lunge: None,
    shot: Some(ShotTuning {
        speed: 8.0,
        size: 16.0,
        ttl: 60,
    }),
    damage_halving: false,
    message: "THE CHILD: A New Beginning!",
};

/// Look up the parameter table for a form
pub fn form_tuning(form: Form) -> &'static FormTuning {
    match form {
        Form::Camel => &CAMEL,
        Form::Lion => &LION,
        Form::Child => &CHILD,
    }
}

// Player
pub const PLAYER_MAX_HP: i32 = 100;
pub const PLAYER_SPIRIT: i32 = 10;
pub const AIR_ACCEL: f32 = 0.5;
pub const WALK_ANIM_RATE: f32 = 0.25;
pub const INVINCIBILITY_TICKS: u32 = 60;
/// Knockback applied to the player on damage (up and away from facing)
pub const PLAYER_KNOCKBACK: f32 = 5.0;
/// Horizontal knockback applied to enemies hit by melee
pub const ENEMY_KNOCKBACK: f32 = 5.0;

// Damage
pub const DANGER_DAMAGE: i32 = 20;
pub const CONTACT_DAMAGE: i32 = 10;
pub const ORB_DAMAGE: i32 = 15;
pub const STAR_DAMAGE: i32 = 15;
/// Damage that finishes off a loop anchor regardless of its hp
pub const ANCHOR_FINISHER: i32 = 999;

// Enemies
pub const PATROL_SPEED: f32 = 1.0;
pub const BOSS_HP: i32 = 1000;
pub const BOSS_PHASE_TICKS: u32 = 600;
pub const BOSS_FIRE_INTERVAL: u32 = 120;
pub const BOSS_DRIFT_SPEED: f32 = 1.5;
/// Boss stops drifting when within this horizontal distance of the player
pub const BOSS_DRIFT_DEADZONE: f32 = 10.0;
pub const BOSS_HOVER_Y: f32 = 200.0;
pub const BOSS_HOVER_AMPLITUDE: f32 = 30.0;
/// Hover phase advances one radian per this many simulated milliseconds
pub const BOSS_HOVER_PERIOD_MS: f32 = 300.0;

/// Gravity modifier and taunt for each boss phase
pub struct BossPhase {
    pub gravity_modifier: f32,
    pub message: Option<&'static str>,
}

pub static BOSS_PHASES: [BossPhase; 4] = [
    BossPhase {
        gravity_modifier: 0.0,
        message: None,
    },
    BossPhase {
        gravity_modifier: 1.0,
        message: Some("SPIRIT OF GRAVITY: Submit to the Weight!"),
    },
    BossPhase {
        gravity_modifier: -2.0,
        message: Some("SPIRIT OF GRAVITY: Lose your footing!"),
    },
    BossPhase {
        gravity_modifier: 0.0,
        message: Some("SPIRIT OF GRAVITY: I am the Dwarf!"),
    },
];

/// Boss phase during which gravity orbs home in on the player
pub const ORB_HOMING_PHASE: u8 = 3;

// Projectiles
pub const ORB_SIZE: f32 = 16.0;
pub const ORB_TTL: u32 = 180;
/// Orb velocity components are drawn from [-ORB_SPREAD, ORB_SPREAD)
pub const ORB_SPREAD: f32 = 4.0;
pub const ORB_HOMING_GAIN: f32 = 0.001;
pub const STAR_WOBBLE_AMPLITUDE: f32 = 2.0;
pub const STAR_WOBBLE_PERIOD_MS: f32 = 100.0;

// Particles
pub const PARTICLE_SIZE: f32 = 4.0;
pub const PARTICLE_LIFE: u32 = 30;
pub const PARTICLE_SPREAD: f32 = 2.0;
pub const TRANSFORM_PARTICLES: usize = 10;

// Messages
pub const MESSAGE_TICKS: u32 = 120;
pub const INTRO_MESSAGE_TICKS: u32 = 300;
pub const INTRO_MESSAGE: &str = "Space to Jump. C to Transform.";
pub const LOOP_WRAP_MESSAGE: &str = "The Moment Recurs... Break the Anchor.";
pub const LOOP_BREAK_MELEE_MESSAGE: &str = "The Circle is Broken! Ascend!";
pub const LOOP_BREAK_STAR_MESSAGE: &str = "The Star Breaks the Circle!";

/// Palette (0xRRGGBB)
pub mod palette {
    pub const GOTHIC_GREY: u32 = 0x52525b;
    pub const BLOOD_RED: u32 = 0x9f1239;
    pub const DEEP_GOLD: u32 = 0xfbbf24;
    pub const RADIANT_LIGHT: u32 = 0xfffbeb;
    pub const SNAKE_GREEN: u32 = 0x00ff00;
    pub const BOSS_RED: u32 = 0x4a0404;
    pub const WHITE: u32 = 0xffffff;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_form_has_one_attack_kind() {
        for form in Form::ALL {
            let t = form_tuning(form);
            // Each form attacks either in melee or with a projectile, never both
            assert!(t.melee.is_some() != t.shot.is_some(), "{:?}", form);
        }
    }

    #[test]
    fn test_attack_ends_before_cooldown_expires() {
        for form in Form::ALL {
            let t = form_tuning(form);
            // Cooldown outlasts the attack, so attacks never overlap
            assert!(t.attack_frames < t.attack_cooldown, "{:?}", form);
            if let Some(melee) = t.melee {
                assert!(melee.active_to <= t.attack_frames);
            }
        }
    }

    #[test]
    fn test_melee_windows() {
        let camel = form_tuning(Form::Camel).melee.unwrap();
        assert!(!camel.is_active(9));
        assert!(camel.is_active(10));
        assert!(camel.is_active(20));
        assert!(!camel.is_active(21));

        let lion = form_tuning(Form::Lion).melee.unwrap();
        assert!(!lion.is_active(1));
        assert!(lion.is_active(2) && lion.is_active(8));
        assert!(!lion.is_active(9));
    }

    #[test]
    fn test_boss_phase_table() {
        assert_eq!(BOSS_PHASES[0].gravity_modifier, 0.0);
        assert_eq!(BOSS_PHASES[1].gravity_modifier, 1.0);
        assert_eq!(BOSS_PHASES[2].gravity_modifier, -2.0);
        assert_eq!(BOSS_PHASES[3].gravity_modifier, 0.0);
        assert!(BOSS_PHASES[0].message.is_none());
    }
}
