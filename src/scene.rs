//! Renderer-agnostic scene nodes for the character rig.
//!
//! The engine never talks to a renderer directly: the Frame Compositor writes
//! transforms and material values onto these plain records once per tick, and
//! the host maps them to whatever scene graph it renders with.

use glam::{Quat, Vec3};
use std::sync::Arc;

use pixie3d_mesh::{build_eyebrow_arc, build_smile_arc, GeometryCache, TubeGeometry};

/// A single node in the character's private scene subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Material opacity, 0 = fully transparent
    pub opacity: f32,
    pub visible: bool,
    /// Emissive/glow intensity
    pub emissive: f32,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            opacity: 1.0,
            visible: true,
            emissive: 0.0,
        }
    }
}

impl SceneNode {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// The scene subtree owned by one character instance.
///
/// Created on mount, mutated only by the Frame Compositor, dropped on
/// unmount. Rest positions are the node defaults the compositor offsets from.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRig {
    /// Head group: gaze-follow rotation and fidget drift
    pub head: SceneNode,
    /// Eye groups: vertical scale carries eye-openness and blink
    pub left_eye: SceneNode,
    pub right_eye: SceneNode,
    /// Iris meshes: offset directly by gaze
    pub left_iris: SceneNode,
    pub right_iris: SceneNode,
    /// Pupil meshes: scaled by pupil dilation, offset with the iris
    pub left_pupil: SceneNode,
    pub right_pupil: SceneNode,
    /// Eyebrow tube meshes (shared geometry, right brow mirrored in X)
    pub left_brow: SceneNode,
    pub right_brow: SceneNode,
    /// Closed-smile tube mesh: opacity crossfades against the open mouth
    pub smile: SceneNode,
    /// Open-mouth mesh: visibility and non-uniform scale track mouth-openness
    pub mouth: SceneNode,
    /// Body group: breathing scale plus the transition bounce
    pub body: SceneNode,
    /// Aura/glow shell around the body
    pub aura: SceneNode,
}

/// Rest-pose placement constants, in engine units on a head of radius ~0.12.
mod rest {
    use glam::Vec3;

    pub const LEFT_EYE: Vec3 = Vec3::new(-0.045, 0.04, 0.095);
    pub const RIGHT_EYE: Vec3 = Vec3::new(0.045, 0.04, 0.095);
    pub const LEFT_BROW: Vec3 = Vec3::new(-0.045, 0.085, 0.1);
    pub const RIGHT_BROW: Vec3 = Vec3::new(0.045, 0.085, 0.1);
    pub const MOUTH: Vec3 = Vec3::new(0.0, -0.035, 0.1);
    pub const IRIS: Vec3 = Vec3::new(0.0, 0.0, 0.004);
    pub const PUPIL: Vec3 = Vec3::new(0.0, 0.0, 0.006);
}

impl CharacterRig {
    /// Build the rig, fetching shared tube geometry from `cache`.
    pub fn new(cache: &mut GeometryCache) -> (Self, RigGeometry) {
        let smile_geo = build_smile_arc(cache);
        let brow_geo = build_eyebrow_arc(cache);

        let mut right_brow = SceneNode::at(rest::RIGHT_BROW);
        // Mirror the shared eyebrow geometry instead of building a second mesh
        right_brow.scale = Vec3::new(-1.0, 1.0, 1.0);

        let mut smile = SceneNode::at(rest::MOUTH);
        // Arc geometry peaks upward; flip it into a smile
        smile.rotation = Quat::from_rotation_z(std::f32::consts::PI);

        let mut mouth = SceneNode::at(rest::MOUTH);
        mouth.visible = false;
        mouth.scale = Vec3::splat(0.3);

        let rig = Self {
            head: SceneNode::default(),
            left_eye: SceneNode::at(rest::LEFT_EYE),
            right_eye: SceneNode::at(rest::RIGHT_EYE),
            left_iris: SceneNode::at(rest::IRIS),
            right_iris: SceneNode::at(rest::IRIS),
            left_pupil: SceneNode::at(rest::PUPIL),
            right_pupil: SceneNode::at(rest::PUPIL),
            left_brow: SceneNode::at(rest::LEFT_BROW),
            right_brow,
            smile,
            mouth,
            body: SceneNode::default(),
            aura: SceneNode::default(),
        };

        let geometry = RigGeometry {
            smile: smile_geo,
            brow: brow_geo,
        };

        (rig, geometry)
    }

    /// Rest position of the left brow (right is mirrored in X).
    pub fn brow_rest() -> Vec3 {
        rest::LEFT_BROW
    }

    /// Rest position of the iris within its eye group.
    pub fn iris_rest() -> Vec3 {
        rest::IRIS
    }
}

/// Immutable tube geometry shared by rig meshes.
#[derive(Debug, Clone)]
pub struct RigGeometry {
    pub smile: Arc<TubeGeometry>,
    /// One instance serves both mirrored brows
    pub brow: Arc<TubeGeometry>,
}
