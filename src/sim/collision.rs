//! Axis-separated collision resolution against platforms
//!
//! Movement is applied and resolved on X first, then on Y. Each call walks
//! the platform list in order: hazards and doors short-circuit, solids push
//! the body out along the axis of motion.

use super::level::LevelId;
use super::rect::Body;
use super::state::{Platform, PlatformKind};

/// Axis being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Non-solid contact that ended resolution early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No hazard or door touched
    Clear,
    /// Touched a danger platform (no positional correction applied)
    Danger,
    /// Touched a door leading to the given level
    Door(LevelId),
}

/// Result of resolving one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisResolution {
    pub contact: Contact,
    /// Body came to rest on a floor (for the current gravity direction)
    pub landed: bool,
}

impl AxisResolution {
    fn clear(landed: bool) -> Self {
        Self {
            contact: Contact::Clear,
            landed,
        }
    }
}

/// Resolve overlaps of `body` against `platforms` along one axis.
///
/// On X the body is placed flush against the platform edge opposite its
/// velocity and `vel.x` is zeroed. On Y the floor is picked by the sign of
/// `gravity`: under normal gravity moving down lands on top, under inverted
/// gravity moving up lands on the underside.
pub fn resolve_axis(
    body: &mut Body,
    axis: Axis,
    platforms: &[Platform],
    gravity: f32,
) -> AxisResolution {
    let mut landed = false;

    for plat in platforms {
        if !body.rect().intersects(&plat.rect) {
            continue;
        }

        match plat.kind {
            PlatformKind::Danger => {
                return AxisResolution {
                    contact: Contact::Danger,
                    landed,
                };
            }
            PlatformKind::Door { target } => {
                return AxisResolution {
                    contact: Contact::Door(target),
                    landed,
                };
            }
            PlatformKind::Solid => {}
        }

        match axis {
            Axis::X => {
                if body.vel.x > 0.0 {
                    body.pos.x = plat.rect.x - body.size.x;
                } else if body.vel.x < 0.0 {
                    body.pos.x = plat.rect.right();
                }
                body.vel.x = 0.0;
            }
            Axis::Y => {
                let falling_down = body.vel.y > 0.0;
                let moving_up = body.vel.y < 0.0;
                if falling_down {
                    body.pos.y = plat.rect.y - body.size.y;
                    body.vel.y = 0.0;
                    landed |= gravity >= 0.0;
                } else if moving_up {
                    body.pos.y = plat.rect.bottom();
                    body.vel.y = 0.0;
                    landed |= gravity < 0.0;
                }
            }
        }
    }

    AxisResolution::clear(landed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;

    fn solid(x: f32, y: f32, w: f32, h: f32) -> Platform {
        Platform {
            rect: Rect::new(x, y, w, h),
            kind: PlatformKind::Solid,
            color: 0,
        }
    }

    #[test]
    fn test_x_push_out_moving_right() {
        let wall = solid(100.0, 0.0, 20.0, 200.0);
        let mut body = Body::new(90.0, 50.0, 32.0, 48.0).with_vel(4.0, 0.0);
        let res = resolve_axis(&mut body, Axis::X, &[wall], 0.5);
        assert_eq!(res.contact, Contact::Clear);
        assert_eq!(body.pos.x, 100.0 - 32.0);
        assert_eq!(body.vel.x, 0.0);
        assert!(!body.rect().overlaps_x(&wall.rect));
    }

    #[test]
    fn test_x_push_out_moving_left() {
        let wall = solid(100.0, 0.0, 20.0, 200.0);
        let mut body = Body::new(110.0, 50.0, 32.0, 48.0).with_vel(-4.0, 0.0);
        resolve_axis(&mut body, Axis::X, &[wall], 0.5);
        assert_eq!(body.pos.x, 120.0);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_y_landing_normal_gravity() {
        let floor = solid(0.0, 418.0, 500.0, 32.0);
        let mut body = Body::new(50.0, 380.0, 32.0, 48.0).with_vel(0.0, 6.0);
        let res = resolve_axis(&mut body, Axis::Y, &[floor], 0.5);
        assert!(res.landed);
        assert_eq!(body.pos.y, 418.0 - 48.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_y_bonk_normal_gravity() {
        let ceiling = solid(0.0, 0.0, 500.0, 32.0);
        let mut body = Body::new(50.0, 20.0, 32.0, 48.0).with_vel(0.0, -6.0);
        let res = resolve_axis(&mut body, Axis::Y, &[ceiling], 0.5);
        assert!(!res.landed);
        assert_eq!(body.pos.y, 32.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_y_inverted_gravity_lands_on_ceiling() {
        let ceiling = solid(0.0, 50.0, 500.0, 32.0);
        let mut body = Body::new(50.0, 70.0, 32.0, 48.0).with_vel(0.0, -6.0);
        let res = resolve_axis(&mut body, Axis::Y, &[ceiling], -0.5);
        assert!(res.landed);
        assert_eq!(body.pos.y, 82.0);
    }

    #[test]
    fn test_y_inverted_gravity_floor_is_a_bonk() {
        let floor = solid(0.0, 418.0, 500.0, 32.0);
        let mut body = Body::new(50.0, 380.0, 32.0, 48.0).with_vel(0.0, 6.0);
        let res = resolve_axis(&mut body, Axis::Y, &[floor], -0.5);
        assert!(!res.landed);
        assert_eq!(body.pos.y, 370.0);
    }

    #[test]
    fn test_danger_short_circuits_without_correction() {
        let spikes = Platform {
            rect: Rect::new(0.0, 434.0, 500.0, 16.0),
            kind: PlatformKind::Danger,
            color: 0,
        };
        let mut body = Body::new(50.0, 400.0, 32.0, 48.0).with_vel(0.0, 6.0);
        let before = body;
        let res = resolve_axis(&mut body, Axis::Y, &[spikes], 0.5);
        assert_eq!(res.contact, Contact::Danger);
        assert_eq!(body, before);
    }

    #[test]
    fn test_door_contact() {
        let door = Platform {
            rect: Rect::new(100.0, 250.0, 40.0, 60.0),
            kind: PlatformKind::Door {
                target: LevelId::ThreeMetamorphoses,
            },
            color: 0,
        };
        let mut body = Body::new(90.0, 260.0, 32.0, 48.0).with_vel(3.0, 0.0);
        let res = resolve_axis(&mut body, Axis::X, &[door], 0.5);
        assert_eq!(res.contact, Contact::Door(LevelId::ThreeMetamorphoses));
    }

    #[test]
    fn test_no_overlap_no_change() {
        let floor = solid(0.0, 418.0, 500.0, 32.0);
        let mut body = Body::new(50.0, 100.0, 32.0, 48.0).with_vel(2.0, 2.0);
        let before = body;
        let res = resolve_axis(&mut body, Axis::X, &[floor], 0.5);
        assert_eq!(res, AxisResolution::clear(false));
        assert_eq!(body, before);
    }
}
