//! Vertex layout and decoded-asset records.
//!
//! These are the plain-data records crossing the importer → pool → backend
//! boundary. The vertex layout is `#[repr(C)]` and `Pod` so vertex arrays
//! can be handed to a device backend as raw bytes.

use bytemuck::{Pod, Zeroable};

/// A single mesh vertex.
///
/// # Memory Layout
///
/// - Offset 0: position (12 bytes)
/// - Offset 12: color (12 bytes)
/// - Offset 24: normal (12 bytes)
/// - Offset 36: texture coordinate (8 bytes)
/// - Total size: 44 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Vertex color.
    pub color: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Decoded geometry as produced by the model importer.
///
/// The resource pool stores this record and hands its raw arrays to the
/// device backend for upload; it never interprets the contents.
#[derive(Clone, Debug, Default)]
pub struct DecodedMesh {
    /// Flat vertex list.
    pub vertices: Vec<Vertex>,
    /// Triangle index list into `vertices`.
    pub indices: Vec<u32>,
}

impl DecodedMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of indices.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Decoded image as produced by the image decoder.
#[derive(Clone, Debug, Default)]
pub struct DecodedImage {
    /// Raw pixel data, `width * height * channels` bytes.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel (4 for RGBA).
    pub channels: u32,
}
