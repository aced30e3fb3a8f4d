//! Camera rig: free-flight and orbit modes, perspective and
//! orthographic projection.

use glam::{Mat4, Vec3};

const WORLD_UP: Vec3 = Vec3::Y;
const FOV_Y_DEGREES: f32 = 70.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

pub const POSITION_STEP: f32 = 0.05;
pub const RADIUS_STEP: f32 = 0.05;
pub const ANGLE_STEP: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Orbit,
}

/// Directional nudges applied by the camera keys. Which field each key
/// drives depends on the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAdjust {
    Up,
    Down,
    Left,
    Right,
    In,
    Out,
}

/// View and projection state.
///
/// Free mode stores a cartesian eye position looking at the origin.
/// Orbit mode stores spherical coordinates (radius, polar theta,
/// azimuth phi) around the origin. Switching free to orbit converts
/// via `theta = acos(y / r)`, `phi = atan(z / x)`; the azimuth keeps
/// atan's half-plane ambiguity, so positions with negative x re-enter
/// orbit mirrored. Switching back re-derives the cartesian position,
/// so free -> orbit -> free round-trips for positive-x eyes.
#[derive(Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,
    projection: Projection,
    position: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Free,
            projection: Projection::Perspective,
            position: Vec3::new(0.0, 0.0, 2.0),
            radius: 2.0,
            theta: std::f32::consts::FRAC_PI_2,
            phi: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl CameraRig {
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            CameraMode::Orbit => {
                let r = self.position.length();
                if r > f32::EPSILON {
                    self.radius = r;
                    self.theta = (self.position.y / r).acos();
                    self.phi = (self.position.z / self.position.x).atan();
                }
            }
            CameraMode::Free => {
                self.position = self.orbit_position();
            }
        }
        self.mode = mode;
    }

    pub fn adjust(&mut self, adjust: CameraAdjust) {
        match self.mode {
            CameraMode::Free => {
                let delta = match adjust {
                    CameraAdjust::Up => Vec3::Y * POSITION_STEP,
                    CameraAdjust::Down => Vec3::NEG_Y * POSITION_STEP,
                    CameraAdjust::Left => Vec3::NEG_X * POSITION_STEP,
                    CameraAdjust::Right => Vec3::X * POSITION_STEP,
                    CameraAdjust::In => Vec3::NEG_Z * POSITION_STEP,
                    CameraAdjust::Out => Vec3::Z * POSITION_STEP,
                };
                self.position += delta;
            }
            CameraMode::Orbit => match adjust {
                CameraAdjust::Up => self.theta -= ANGLE_STEP,
                CameraAdjust::Down => self.theta += ANGLE_STEP,
                CameraAdjust::Left => self.phi += ANGLE_STEP,
                CameraAdjust::Right => self.phi -= ANGLE_STEP,
                CameraAdjust::In => self.radius -= RADIUS_STEP,
                CameraAdjust::Out => self.radius += RADIUS_STEP,
            },
        }
    }

    pub fn eye(&self) -> Vec3 {
        match self.mode {
            CameraMode::Free => self.position,
            CameraMode::Orbit => self.orbit_position(),
        }
    }

    fn orbit_position(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.theta.sin() * self.phi.cos(),
            self.radius * self.theta.cos(),
            self.radius * self.theta.sin() * self.phi.sin(),
        )
    }

    /// View matrix looking at the origin. Free mode keeps world-up; in
    /// orbit mode the up vector is re-derived from the look direction,
    /// `up = -look x (look x world_up)`, so the camera stays upright
    /// while orbiting.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.eye();
        let up = match self.mode {
            CameraMode::Free => WORLD_UP,
            CameraMode::Orbit => {
                let look = (Vec3::ZERO - eye).normalize_or(Vec3::NEG_Z);
                // At the poles the look direction is parallel to
                // world-up and the derived up collapses; fall back to a
                // perpendicular axis so look_at stays well formed.
                (-look.cross(look.cross(WORLD_UP))).normalize_or(Vec3::Z)
            }
        };
        Mat4::look_at_rh(eye, Vec3::ZERO, up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR)
            }
            Projection::Orthographic => {
                Mat4::orthographic_rh(-aspect, aspect, -1.0, 1.0, NEAR, FAR)
            }
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_mode_steps_position_axes() {
        let mut rig = CameraRig::default();
        let start = rig.eye();
        rig.adjust(CameraAdjust::Right);
        rig.adjust(CameraAdjust::Up);
        rig.adjust(CameraAdjust::In);
        let eye = rig.eye();
        assert!((eye.x - (start.x + POSITION_STEP)).abs() < 1e-6);
        assert!((eye.y - (start.y + POSITION_STEP)).abs() < 1e-6);
        assert!((eye.z - (start.z - POSITION_STEP)).abs() < 1e-6);
    }

    #[test]
    fn orbit_entry_preserves_eye_for_positive_x() {
        let mut rig = CameraRig {
            position: Vec3::new(1.0, 1.0, 1.0),
            ..CameraRig::default()
        };
        let before = rig.eye();
        rig.set_mode(CameraMode::Orbit);
        let after = rig.eye();
        assert!((before - after).length() < 1e-5);
    }

    #[test]
    fn orbit_entry_mirrors_negative_x_eye() {
        // atan(z / x) cannot distinguish half-planes, so a negative-x
        // eye re-enters orbit on the positive-x side.
        let mut rig = CameraRig {
            position: Vec3::new(-1.0, 0.0, 1.0),
            ..CameraRig::default()
        };
        rig.set_mode(CameraMode::Orbit);
        let after = rig.eye();
        assert!(after.x > 0.0);
        assert!((after.length() - 2.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn orbit_to_free_round_trips() {
        let mut rig = CameraRig {
            position: Vec3::new(0.5, 1.5, 0.8),
            ..CameraRig::default()
        };
        let before = rig.eye();
        rig.set_mode(CameraMode::Orbit);
        rig.set_mode(CameraMode::Free);
        assert!((rig.eye() - before).length() < 1e-5);
    }

    #[test]
    fn setting_same_mode_is_a_no_op() {
        let mut rig = CameraRig {
            position: Vec3::new(-1.0, 0.0, 1.0),
            ..CameraRig::default()
        };
        let before = rig.eye();
        rig.set_mode(CameraMode::Free);
        assert_eq!(rig.eye(), before);
    }

    #[test]
    fn orbit_radius_shrinks_on_dolly_in() {
        let mut rig = CameraRig::default();
        rig.set_mode(CameraMode::Orbit);
        let before = rig.eye().length();
        rig.adjust(CameraAdjust::In);
        assert!((rig.eye().length() - (before - RADIUS_STEP)).abs() < 1e-5);
    }

    #[test]
    fn view_matrix_is_finite_at_the_pole() {
        let mut rig = CameraRig::default();
        rig.set_mode(CameraMode::Orbit);
        rig.theta = 0.0;
        let view = rig.view_matrix();
        assert!(view.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn projection_toggle_changes_matrix() {
        let mut rig = CameraRig::default();
        let persp = rig.view_projection(1.0);
        rig.set_projection(Projection::Orthographic);
        let ortho = rig.view_projection(1.0);
        assert_ne!(persp, ortho);
        assert_eq!(rig.projection_matrix(1.0).w_axis.w, 1.0);
    }
}
