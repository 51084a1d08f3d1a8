//! Uniform buffer layouts.
//!
//! These structures must match the shader uniform block layouts exactly.
//! All of them use `#[repr(C)]` for predictable memory layout and implement
//! `Pod` and `Zeroable` for safe byte casting.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-frame camera uniform data.
///
/// # Memory Layout
///
/// - Offset 0: view matrix (64 bytes)
/// - Offset 64: projection matrix (64 bytes)
/// - Total size: 128 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct CameraUbo {
    /// View matrix (world to view space).
    pub view: Mat4,
    /// Projection matrix (view to clip space), Y already flipped for
    /// Vulkan clip space.
    pub projection: Mat4,
}

impl CameraUbo {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }
}

/// Per-frame lighting uniform data: one point light plus an ambient term.
///
/// # Memory Layout
///
/// Four vec3+float rows of 16 bytes each, 64 bytes total, matching a
/// std140 uniform block.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightingUbo {
    /// World-space light position.
    pub light_position: Vec3,
    pub _pad0: f32,
    /// Light color.
    pub light_color: Vec3,
    /// Light intensity multiplier.
    pub intensity: f32,
    /// World-space camera position, for specular terms.
    pub view_position: Vec3,
    pub _pad1: f32,
    /// Ambient light color.
    pub ambient_color: Vec3,
    /// Ambient intensity multiplier.
    pub ambient_intensity: f32,
}

impl LightingUbo {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl Default for LightingUbo {
    fn default() -> Self {
        Self {
            light_position: Vec3::ZERO,
            _pad0: 0.0,
            light_color: Vec3::ONE,
            intensity: 1.0,
            view_position: Vec3::ZERO,
            _pad1: 0.0,
            ambient_color: Vec3::new(0.2, 0.2, 0.2),
            ambient_intensity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_ubo_size() {
        // 2 Mat4 (2 * 64) = 128 bytes
        assert_eq!(CameraUbo::SIZE, 128);
    }

    #[test]
    fn test_camera_ubo_alignment() {
        // Mat4 requires 16-byte alignment
        assert_eq!(std::mem::align_of::<CameraUbo>(), 16);
    }

    #[test]
    fn test_lighting_ubo_size() {
        // 4 rows of vec3 + float (4 * 16) = 64 bytes
        assert_eq!(LightingUbo::SIZE, 64);
    }

    #[test]
    fn test_lighting_defaults() {
        let l = LightingUbo::default();
        assert_eq!(l.ambient_color, Vec3::new(0.2, 0.2, 0.2));
        assert_eq!(l.ambient_intensity, 1.0);
    }

    #[test]
    fn test_ubo_byte_round_trip() {
        let ubo = CameraUbo::new(Mat4::IDENTITY, Mat4::from_scale(Vec3::splat(2.0)));
        let bytes = bytemuck::bytes_of(&ubo);
        assert_eq!(bytes.len(), CameraUbo::SIZE);
        let back: &CameraUbo = bytemuck::from_bytes(bytes);
        assert_eq!(back.projection, ubo.projection);
    }
}
