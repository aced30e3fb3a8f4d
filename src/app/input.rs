//! Keyboard binding tables.
//!
//! Every binding resolves to a [`Command`]; the scene applies them all
//! through the same path, so input stays a pure key-to-command lookup.

use winit::keyboard::KeyCode;

use crate::render::camera::{CameraAdjust, CameraMode, Projection};
use crate::scene::{Axis, Command, OperationMode, RenderMode, Sign};

/// Bindings that do not depend on the operation mode.
const FIXED_BINDINGS: &[(KeyCode, Command)] = &[
    (KeyCode::Digit1, Command::LoadSlot(1)),
    (KeyCode::Digit2, Command::LoadSlot(2)),
    (KeyCode::Digit3, Command::LoadSlot(3)),
    (KeyCode::KeyR, Command::SetOperationMode(OperationMode::Rotate)),
    (
        KeyCode::KeyT,
        Command::SetOperationMode(OperationMode::Translate),
    ),
    (KeyCode::KeyQ, Command::Scale(Sign::Plus)),
    (KeyCode::KeyE, Command::Scale(Sign::Minus)),
    (KeyCode::KeyP, Command::SetProjection(Projection::Perspective)),
    (
        KeyCode::KeyO,
        Command::SetProjection(Projection::Orthographic),
    ),
    (KeyCode::KeyN, Command::SetCameraMode(CameraMode::Free)),
    (KeyCode::KeyM, Command::SetCameraMode(CameraMode::Orbit)),
    (KeyCode::KeyZ, Command::SetRenderMode(RenderMode::Wireframe)),
    (KeyCode::KeyX, Command::SetRenderMode(RenderMode::Flat)),
    (KeyCode::KeyC, Command::SetRenderMode(RenderMode::Phong)),
    (KeyCode::ArrowUp, Command::Camera(CameraAdjust::Up)),
    (KeyCode::ArrowDown, Command::Camera(CameraAdjust::Down)),
    (KeyCode::ArrowLeft, Command::Camera(CameraAdjust::Left)),
    (KeyCode::ArrowRight, Command::Camera(CameraAdjust::Right)),
    (KeyCode::Equal, Command::Camera(CameraAdjust::In)),
    (KeyCode::Minus, Command::Camera(CameraAdjust::Out)),
];

/// W/S/A/D/F/G while translating. A/D drive x, W/S drive y, F/G drive
/// z; A moves negative.
const TRANSLATE_BINDINGS: &[(KeyCode, Command)] = &[
    (KeyCode::KeyW, Command::Translate(Axis::Y, Sign::Plus)),
    (KeyCode::KeyS, Command::Translate(Axis::Y, Sign::Minus)),
    (KeyCode::KeyA, Command::Translate(Axis::X, Sign::Minus)),
    (KeyCode::KeyD, Command::Translate(Axis::X, Sign::Plus)),
    (KeyCode::KeyF, Command::Translate(Axis::Z, Sign::Plus)),
    (KeyCode::KeyG, Command::Translate(Axis::Z, Sign::Minus)),
];

/// W/S/A/D/F/G while rotating. W/S drive the x accumulator, A/D the y,
/// F/G the z; the first key of each pair is positive.
const ROTATE_BINDINGS: &[(KeyCode, Command)] = &[
    (KeyCode::KeyW, Command::Rotate(Axis::X, Sign::Plus)),
    (KeyCode::KeyS, Command::Rotate(Axis::X, Sign::Minus)),
    (KeyCode::KeyA, Command::Rotate(Axis::Y, Sign::Plus)),
    (KeyCode::KeyD, Command::Rotate(Axis::Y, Sign::Minus)),
    (KeyCode::KeyF, Command::Rotate(Axis::Z, Sign::Plus)),
    (KeyCode::KeyG, Command::Rotate(Axis::Z, Sign::Minus)),
];

/// Resolves a pressed key to a command, consulting the operation mode
/// for the shared edit keys.
pub fn command_for_key(key: KeyCode, mode: OperationMode) -> Option<Command> {
    let edit_bindings = match mode {
        OperationMode::Translate => TRANSLATE_BINDINGS,
        OperationMode::Rotate => ROTATE_BINDINGS,
    };
    lookup(FIXED_BINDINGS, key).or_else(|| lookup(edit_bindings, key))
}

fn lookup(table: &[(KeyCode, Command)], key: KeyCode) -> Option<Command> {
    table
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, command)| *command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_keys_follow_operation_mode() {
        assert_eq!(
            command_for_key(KeyCode::KeyW, OperationMode::Translate),
            Some(Command::Translate(Axis::Y, Sign::Plus))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyW, OperationMode::Rotate),
            Some(Command::Rotate(Axis::X, Sign::Plus))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyA, OperationMode::Translate),
            Some(Command::Translate(Axis::X, Sign::Minus))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyA, OperationMode::Rotate),
            Some(Command::Rotate(Axis::Y, Sign::Plus))
        );
    }

    #[test]
    fn fixed_keys_ignore_operation_mode() {
        for mode in [OperationMode::Translate, OperationMode::Rotate] {
            assert_eq!(
                command_for_key(KeyCode::Digit2, mode),
                Some(Command::LoadSlot(2))
            );
            assert_eq!(
                command_for_key(KeyCode::KeyZ, mode),
                Some(Command::SetRenderMode(RenderMode::Wireframe))
            );
            assert_eq!(
                command_for_key(KeyCode::Equal, mode),
                Some(Command::Camera(CameraAdjust::In))
            );
        }
    }

    #[test]
    fn mode_switch_keys_map_to_set_operation_mode() {
        assert_eq!(
            command_for_key(KeyCode::KeyR, OperationMode::Translate),
            Some(Command::SetOperationMode(OperationMode::Rotate))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyT, OperationMode::Rotate),
            Some(Command::SetOperationMode(OperationMode::Translate))
        );
    }

    #[test]
    fn unbound_keys_resolve_to_nothing() {
        assert_eq!(command_for_key(KeyCode::KeyJ, OperationMode::Translate), None);
        assert_eq!(command_for_key(KeyCode::Space, OperationMode::Rotate), None);
    }
}
