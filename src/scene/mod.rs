//! Scene aggregate: the shared geometry arena, the object list,
//! selection, operation mode, and the camera rig, mutated exclusively
//! through [`Scene::apply`].

pub mod config;

use crate::mesh::{Mesh, MeshError};
use crate::render::camera::{CameraAdjust, CameraMode, CameraRig, Projection};
use glam::{Mat4, Vec3};
use std::path::{Path, PathBuf};

use config::ViewerConfig;

/// Leading arena entries reserved for the axis indicator lines.
pub const AXIS_VERTEX_COUNT: usize = 6;
const AXIS_EXTENT: f32 = 1e6;

const TRANSLATE_STEP: f32 = 0.05;
const ROTATE_STEP_DEGREES: f32 = 5.0;
const SCALE_STEP: f32 = 0.05;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to load slot {slot}: {source}")]
    Load {
        slot: usize,
        #[source]
        source: MeshError,
    },
    #[error("no mesh configured for slot {slot}")]
    EmptySlot { slot: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    fn factor(self) -> f32 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    Translate,
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Flat,
    Phong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Drawn unlit in uniform white and used as the light position.
    LightMarker,
    Mesh,
}

/// Every state mutation the input layer can request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    LoadSlot(usize),
    Translate(Axis, Sign),
    Rotate(Axis, Sign),
    Scale(Sign),
    SetOperationMode(OperationMode),
    SetRenderMode(RenderMode),
    SetProjection(Projection),
    SetCameraMode(CameraMode),
    Camera(CameraAdjust),
}

/// Parallel per-corner attribute buffers shared by every object.
/// Append-only: entries are never removed or reordered, so recorded
/// object offsets stay valid for the lifetime of the scene.
#[derive(Debug)]
pub struct GeometryArena {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub face_normals: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
    revision: u64,
}

impl GeometryArena {
    /// Arena pre-seeded with the three axis lines (pairs of points on
    /// ±X red, ±Y green, ±Z blue).
    fn with_axes() -> Self {
        let positions = vec![
            Vec3::new(AXIS_EXTENT, 0.0, 0.0),
            Vec3::new(-AXIS_EXTENT, 0.0, 0.0),
            Vec3::new(0.0, AXIS_EXTENT, 0.0),
            Vec3::new(0.0, -AXIS_EXTENT, 0.0),
            Vec3::new(0.0, 0.0, AXIS_EXTENT),
            Vec3::new(0.0, 0.0, -AXIS_EXTENT),
        ];
        let colors = vec![
            Vec3::X,
            Vec3::X,
            Vec3::Y,
            Vec3::Y,
            Vec3::Z,
            Vec3::Z,
        ];
        Self {
            face_normals: colors.clone(),
            vertex_normals: colors.clone(),
            positions,
            colors,
            revision: 0,
        }
    }

    /// Appends a mesh's expanded attributes, returning its (offset,
    /// length) record.
    fn append(&mut self, mesh: &Mesh) -> (usize, usize) {
        let offset = self.positions.len();
        self.positions.extend_from_slice(&mesh.positions);
        self.colors.extend_from_slice(&mesh.colors);
        self.face_normals.extend_from_slice(&mesh.face_normals);
        self.vertex_normals.extend_from_slice(&mesh.vertex_normals);
        self.revision += 1;
        (offset, mesh.len())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Monotonic append counter, used by the renderer to detect when
    /// the GPU copy is stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Start index into the shared arena.
    pub offset: usize,
    /// Number of arena entries (a multiple of 3).
    pub len: usize,
    pub centroid: Vec3,
    pub unit_scale: Vec3,
    pub translation: Vec3,
    /// Per-axis Euler accumulators in degrees.
    pub rotation_degrees: Vec3,
    pub scale: Vec3,
    pub render_mode: RenderMode,
}

impl SceneObject {
    fn from_mesh(name: String, kind: ObjectKind, mesh: &Mesh, offset: usize) -> Self {
        let unit_scale = match kind {
            // The marker keeps its authored size.
            ObjectKind::LightMarker => Vec3::ONE,
            ObjectKind::Mesh => Vec3::splat(mesh.unit_scale),
        };
        Self {
            name,
            kind,
            offset,
            len: mesh.len(),
            centroid: mesh.centroid,
            unit_scale,
            translation: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
            scale: Vec3::ONE,
            render_mode: RenderMode::Phong,
        }
    }

    /// Local-to-world transform, composed in the fixed order
    /// translate, rotate X, rotate Y, rotate Z, scale, unit-scale.
    /// The single-axis rotations are applied sequentially; the order
    /// is part of the observable behavior.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(self.rotation_degrees.x.to_radians())
            * Mat4::from_rotation_y(self.rotation_degrees.y.to_radians())
            * Mat4::from_rotation_z(self.rotation_degrees.z.to_radians())
            * Mat4::from_scale(self.scale)
            * Mat4::from_scale(self.unit_scale)
    }
}

/// All viewer state reachable from the event loop.
#[derive(Debug)]
pub struct Scene {
    pub arena: GeometryArena,
    pub objects: Vec<SceneObject>,
    pub selected: Option<usize>,
    pub operation_mode: OperationMode,
    pub camera: CameraRig,
    config: ViewerConfig,
    asset_root: PathBuf,
}

impl Scene {
    /// Builds the scene and loads the light marker as object 0. A
    /// missing marker is tolerated (the renderer falls back to a fixed
    /// light position) so a broken asset path does not kill startup.
    pub fn new(config: ViewerConfig, asset_root: PathBuf) -> Self {
        let mut scene = Self {
            arena: GeometryArena::with_axes(),
            objects: Vec::new(),
            selected: None,
            operation_mode: OperationMode::Translate,
            camera: CameraRig::default(),
            config,
            asset_root,
        };
        let marker_path = scene.resolve(&scene.config.light_marker.clone());
        match Mesh::load(&marker_path) {
            Ok(mesh) => {
                scene.push_object("light marker".to_string(), ObjectKind::LightMarker, &mesh);
            }
            Err(e) => {
                log::warn!("light marker unavailable ({e}), continuing without it");
            }
        }
        scene
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        }
    }

    fn push_object(&mut self, name: String, kind: ObjectKind, mesh: &Mesh) -> usize {
        let (offset, _len) = self.arena.append(mesh);
        let index = self.objects.len();
        self.objects
            .push(SceneObject::from_mesh(name, kind, mesh, offset));
        self.selected = Some(index);
        index
    }

    /// World-space light position, taken from the marker object's
    /// transformed centroid.
    pub fn light_position(&self) -> Vec3 {
        self.objects
            .iter()
            .find(|o| o.kind == ObjectKind::LightMarker)
            .map(|o| o.model_matrix().transform_point3(o.centroid))
            .unwrap_or(Vec3::ONE)
    }

    /// Replaces the selection with a pick result. A miss (background
    /// pixel) leaves the previous selection in place.
    pub fn apply_pick(&mut self, hit: Option<usize>) {
        match hit {
            Some(index) if index < self.objects.len() => {
                log::info!("selected object {index} ({})", self.objects[index].name);
                self.selected = Some(index);
            }
            Some(index) => log::warn!("pick returned stale object index {index}"),
            None => log::debug!("pick hit background, selection unchanged"),
        }
    }

    /// Applies one command. Commands that edit the selected object are
    /// no-ops when nothing is selected; mesh-load failures leave all
    /// prior state intact.
    pub fn apply(&mut self, command: Command) -> Result<(), SceneError> {
        match command {
            Command::LoadSlot(slot) => self.load_slot(slot)?,
            Command::Translate(axis, sign) => {
                self.edit_selected(|object| {
                    *axis_component(&mut object.translation, axis) +=
                        sign.factor() * TRANSLATE_STEP;
                });
            }
            Command::Rotate(axis, sign) => {
                self.edit_selected(|object| {
                    *axis_component(&mut object.rotation_degrees, axis) +=
                        sign.factor() * ROTATE_STEP_DEGREES;
                });
            }
            Command::Scale(sign) => {
                self.edit_selected(|object| {
                    object.scale += Vec3::splat(sign.factor() * SCALE_STEP);
                });
            }
            Command::SetRenderMode(mode) => {
                self.edit_selected(|object| object.render_mode = mode);
            }
            Command::SetOperationMode(mode) => self.operation_mode = mode,
            Command::SetProjection(projection) => self.camera.set_projection(projection),
            Command::SetCameraMode(mode) => self.camera.set_mode(mode),
            Command::Camera(adjust) => self.camera.adjust(adjust),
        }
        Ok(())
    }

    /// The single requires-selection guard for all editing commands.
    fn edit_selected(&mut self, edit: impl FnOnce(&mut SceneObject)) {
        match self.selected.and_then(|i| self.objects.get_mut(i)) {
            Some(object) => edit(object),
            None => log::warn!("edit command ignored, nothing selected"),
        }
    }

    fn load_slot(&mut self, slot: usize) -> Result<(), SceneError> {
        let path = self
            .config
            .slot_path(slot)
            .ok_or(SceneError::EmptySlot { slot })?;
        let path = self.resolve(path);
        let mesh = Mesh::load(&path).map_err(|source| SceneError::Load { slot, source })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("slot {slot}"));
        let index = self.push_object(name, ObjectKind::Mesh, &mesh);
        log::info!(
            "loaded slot {slot} as object {index} ({} vertices, arena now {})",
            self.objects[index].len,
            self.arena.len()
        );
        Ok(())
    }
}

fn axis_component(v: &mut Vec3, axis: Axis) -> &mut f32 {
    match axis {
        Axis::X => &mut v.x,
        Axis::Y => &mut v.y,
        Axis::Z => &mut v.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::camera::CameraMode;

    const TRIANGLE_OFF: &str = "OFF\n3 1 3\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";

    /// Scene backed by temp-file meshes for slots 1 and 2, plus a
    /// marker. Files persist for the process lifetime; the names are
    /// keyed by process id so parallel test runs do not collide.
    fn test_scene(tag: &str) -> Scene {
        let dir = std::env::temp_dir().join(format!("meshview-scene-{}-{tag}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["marker.off", "one.off", "two.off"] {
            std::fs::write(dir.join(name), TRIANGLE_OFF).unwrap();
        }
        let config = ViewerConfig {
            slots: vec![dir.join("one.off"), dir.join("two.off")],
            light_marker: dir.join("marker.off"),
        };
        Scene::new(config, PathBuf::new())
    }

    #[test]
    fn marker_is_object_zero_and_selected() {
        let scene = test_scene("marker");
        assert!(!scene.arena.is_empty());
        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.objects[0].kind, ObjectKind::LightMarker);
        assert_eq!(scene.objects[0].unit_scale, Vec3::ONE);
        assert_eq!(scene.selected, Some(0));
    }

    #[test]
    fn missing_marker_is_tolerated() {
        let config = ViewerConfig {
            slots: vec![],
            light_marker: PathBuf::from("/nonexistent/marker.off"),
        };
        let scene = Scene::new(config, PathBuf::new());
        assert!(scene.objects.is_empty());
        assert_eq!(scene.selected, None);
        assert_eq!(scene.light_position(), Vec3::ONE);
    }

    #[test]
    fn first_user_load_is_index_one_and_selected() {
        let mut scene = test_scene("load");
        scene.apply(Command::LoadSlot(1)).unwrap();
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.selected, Some(1));
        assert_eq!(scene.objects[1].kind, ObjectKind::Mesh);
    }

    #[test]
    fn arena_offsets_strictly_increase() {
        let mut scene = test_scene("offsets");
        scene.apply(Command::LoadSlot(1)).unwrap();
        scene.apply(Command::LoadSlot(2)).unwrap();
        assert_eq!(scene.objects[0].offset, AXIS_VERTEX_COUNT);
        for pair in scene.objects.windows(2) {
            assert!(pair[1].offset > pair[0].offset);
        }
        for object in &scene.objects {
            assert!(object.offset + object.len <= scene.arena.len());
        }
    }

    #[test]
    fn load_failure_leaves_state_intact() {
        let mut scene = test_scene("loadfail");
        scene.apply(Command::LoadSlot(1)).unwrap();
        let objects_before = scene.objects.len();
        let arena_before = scene.arena.len();
        let revision_before = scene.arena.revision();

        let result = scene.apply(Command::LoadSlot(7));
        assert!(matches!(result, Err(SceneError::EmptySlot { slot: 7 })));
        assert_eq!(scene.objects.len(), objects_before);
        assert_eq!(scene.arena.len(), arena_before);
        assert_eq!(scene.arena.revision(), revision_before);
        assert_eq!(scene.selected, Some(1));
    }

    #[test]
    fn five_rotate_steps_accumulate_25_degrees() {
        let mut scene = test_scene("rotate");
        scene.apply(Command::LoadSlot(1)).unwrap();
        for _ in 0..5 {
            scene.apply(Command::Rotate(Axis::X, Sign::Plus)).unwrap();
        }
        // 5-degree steps are exact in f32.
        assert_eq!(scene.objects[1].rotation_degrees.x, 25.0);
    }

    #[test]
    fn translate_steps_cancel_out() {
        let mut scene = test_scene("translate");
        scene.apply(Command::LoadSlot(1)).unwrap();
        let before = scene.objects[1].translation;
        for _ in 0..8 {
            scene.apply(Command::Translate(Axis::Y, Sign::Plus)).unwrap();
        }
        for _ in 0..8 {
            scene
                .apply(Command::Translate(Axis::Y, Sign::Minus))
                .unwrap();
        }
        assert!((scene.objects[1].translation - before).length() < 1e-6);
    }

    #[test]
    fn edits_without_selection_are_no_ops() {
        let config = ViewerConfig {
            slots: vec![],
            light_marker: PathBuf::from("/nonexistent/marker.off"),
        };
        let mut scene = Scene::new(config, PathBuf::new());
        assert_eq!(scene.selected, None);
        scene.apply(Command::Translate(Axis::X, Sign::Plus)).unwrap();
        scene.apply(Command::Rotate(Axis::Z, Sign::Minus)).unwrap();
        scene.apply(Command::Scale(Sign::Plus)).unwrap();
        scene
            .apply(Command::SetRenderMode(RenderMode::Wireframe))
            .unwrap();
        assert!(scene.objects.is_empty());
    }

    #[test]
    fn marker_edits_apply_when_marker_selected() {
        let mut scene = test_scene("markeredit");
        assert_eq!(scene.selected, Some(0));
        scene.apply(Command::Translate(Axis::X, Sign::Plus)).unwrap();
        assert!((scene.objects[0].translation.x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn pick_miss_keeps_previous_selection() {
        let mut scene = test_scene("pickmiss");
        scene.apply(Command::LoadSlot(1)).unwrap();
        scene.apply_pick(None);
        assert_eq!(scene.selected, Some(1));
        scene.apply_pick(Some(0));
        assert_eq!(scene.selected, Some(0));
        scene.apply_pick(Some(42));
        assert_eq!(scene.selected, Some(0));
    }

    #[test]
    fn render_mode_applies_to_selected_object_only() {
        let mut scene = test_scene("rmode");
        scene.apply(Command::LoadSlot(1)).unwrap();
        scene.apply(Command::LoadSlot(2)).unwrap();
        scene
            .apply(Command::SetRenderMode(RenderMode::Flat))
            .unwrap();
        assert_eq!(scene.objects[2].render_mode, RenderMode::Flat);
        assert_eq!(scene.objects[1].render_mode, RenderMode::Phong);
    }

    #[test]
    fn model_matrix_applies_unit_scale_then_scale() {
        let mut object = SceneObject {
            name: "test".to_string(),
            kind: ObjectKind::Mesh,
            offset: 0,
            len: 3,
            centroid: Vec3::ZERO,
            unit_scale: Vec3::splat(0.5),
            translation: Vec3::new(1.0, 0.0, 0.0),
            rotation_degrees: Vec3::ZERO,
            scale: Vec3::splat(2.0),
            render_mode: RenderMode::Phong,
        };
        let world = object.model_matrix().transform_point3(Vec3::X);
        // 1.0 * 0.5 * 2.0 translated by +1 on x.
        assert!((world - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);

        object.rotation_degrees = Vec3::new(0.0, 90.0, 0.0);
        let rotated = object.model_matrix().transform_point3(Vec3::X);
        // Rotation happens after scaling, before translation.
        assert!((rotated - Vec3::new(1.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        let object = SceneObject {
            name: "order".to_string(),
            kind: ObjectKind::Mesh,
            offset: 0,
            len: 3,
            centroid: Vec3::ZERO,
            unit_scale: Vec3::ONE,
            translation: Vec3::ZERO,
            rotation_degrees: Vec3::new(90.0, 90.0, 0.0),
            scale: Vec3::ONE,
            render_mode: RenderMode::Phong,
        };
        let expected = Mat4::from_rotation_x(90f32.to_radians())
            * Mat4::from_rotation_y(90f32.to_radians());
        let got = object.model_matrix().transform_point3(Vec3::Z);
        let want = expected.transform_point3(Vec3::Z);
        assert!((got - want).length() < 1e-5);
    }

    #[test]
    fn camera_commands_route_to_the_rig() {
        let mut scene = test_scene("camera");
        scene
            .apply(Command::SetCameraMode(CameraMode::Orbit))
            .unwrap();
        assert_eq!(scene.camera.mode(), CameraMode::Orbit);
        scene
            .apply(Command::SetProjection(Projection::Orthographic))
            .unwrap();
        assert_eq!(scene.camera.projection(), Projection::Orthographic);
        scene.apply(Command::Camera(CameraAdjust::In)).unwrap();
    }
}
