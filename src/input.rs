use macroquad::prelude::*;

use crate::config;

/// Control intents sampled once per tick by the input collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputIntents {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub brake: bool,
    pub primary_ability: bool,
    pub secondary_ability: bool,
    /// Aim direction in normalised screen space, y up.
    pub aim: Vec2,
    /// Analog movement (virtual joystick), each axis in [-1, 1].
    pub move_axis: Vec2,
}

impl InputIntents {
    /// Unit thrust direction in the xy plane. Keys win over the analog axis.
    pub fn thrust_direction(&self) -> Vec3 {
        let mut keys = Vec3::ZERO;
        if self.forward {
            keys.y += 1.0;
        }
        if self.backward {
            keys.y -= 1.0;
        }
        if self.left {
            keys.x -= 1.0;
        }
        if self.right {
            keys.x += 1.0;
        }
        if keys != Vec3::ZERO {
            return keys.normalize_or_zero();
        }
        vec3(self.move_axis.x, self.move_axis.y, 0.0).normalize_or_zero()
    }

    /// Boost heading from the aim vector, or zero when no aim is set.
    pub fn boost_direction(&self) -> Vec3 {
        vec3(self.aim.x, self.aim.y, 0.0).normalize_or_zero()
    }
}

/// Convert a pointer position in a `width` x `height` surface to [-1, 1] with y up.
pub fn pointer_to_aim(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    vec2((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

/// Map a drag offset from the joystick origin to a movement axis.
pub fn joystick_vector(dx: f32, dy: f32) -> Vec2 {
    let distance = dx.hypot(dy);
    if distance < config::JOYSTICK_DEAD_ZONE {
        return Vec2::ZERO;
    }
    let clamped = distance.min(config::JOYSTICK_RADIUS);
    let angle = dy.atan2(dx);
    vec2(
        angle.cos() * clamped / config::JOYSTICK_RADIUS,
        -angle.sin() * clamped / config::JOYSTICK_RADIUS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_keys_are_normalised() {
        let input = InputIntents {
            forward: true,
            right: true,
            move_axis: vec2(-1.0, 0.0),
            ..Default::default()
        };
        let dir = input.thrust_direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.0 && dir.y > 0.0);
    }

    #[test]
    fn opposing_keys_fall_back_to_the_axis() {
        let input = InputIntents {
            left: true,
            right: true,
            move_axis: vec2(0.0, -0.3),
            ..Default::default()
        };
        assert_eq!(input.thrust_direction(), vec3(0.0, -1.0, 0.0));
        assert_eq!(InputIntents::default().thrust_direction(), Vec3::ZERO);
    }

    #[test]
    fn pointer_maps_corners() {
        assert_eq!(pointer_to_aim(0.0, 0.0, 800.0, 600.0), vec2(-1.0, 1.0));
        assert_eq!(pointer_to_aim(800.0, 600.0, 800.0, 600.0), vec2(1.0, -1.0));
        assert_eq!(pointer_to_aim(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn joystick_has_dead_zone_and_saturates() {
        assert_eq!(joystick_vector(3.0, 4.0), Vec2::ZERO);
        let full = joystick_vector(200.0, 0.0);
        assert!((full - vec2(1.0, 0.0)).length() < 1e-5);
        let down = joystick_vector(0.0, 32.0);
        assert!((down - vec2(0.0, -0.5)).length() < 1e-5);
    }
}
