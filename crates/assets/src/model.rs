//! OBJ model importing.
//!
//! All models in an OBJ file are merged into a single [`DecodedMesh`] with
//! one shared vertex array; indices are rebased per model. Faces are
//! triangulated during parsing and attributes are reindexed onto a single
//! index stream.

use std::io::BufRead;
use std::path::Path;

use tracing::info;

use ember_gpu::{DecodedMesh, Vertex};

use crate::error::{AssetError, AssetResult};

// Triangulated, single-index layout ready for upload.
const LOAD_OPTIONS: tobj::LoadOptions = tobj::GPU_LOAD_OPTIONS;

/// Load and decode an OBJ file from disk.
pub fn load_obj(path: &Path) -> AssetResult<DecodedMesh> {
    if !path.exists() {
        return Err(AssetError::FileNotFound(path.to_path_buf()));
    }

    let (models, _materials) =
        tobj::load_obj(path, &LOAD_OPTIONS).map_err(|e| AssetError::ObjLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mesh = merge_models(&models).ok_or_else(|| AssetError::NoGeometry(path.to_path_buf()))?;
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        "Loaded model"
    );
    Ok(mesh)
}

/// Decode OBJ data from an in-memory reader. Material libraries are
/// ignored.
pub fn load_obj_from<R: BufRead>(reader: &mut R) -> AssetResult<DecodedMesh> {
    let (models, _materials) = tobj::load_obj_buf(reader, &LOAD_OPTIONS, |_| {
        Ok((Vec::new(), Default::default()))
    })
    .map_err(|e| AssetError::ObjLoad {
        path: "<memory>".into(),
        message: e.to_string(),
    })?;

    merge_models(&models).ok_or_else(|| AssetError::NoGeometry("<memory>".into()))
}

fn merge_models(models: &[tobj::Model]) -> Option<DecodedMesh> {
    let mut out = DecodedMesh::default();

    for model in models {
        let mesh = &model.mesh;
        let vertex_count = mesh.positions.len() / 3;
        if vertex_count == 0 {
            continue;
        }

        let base = out.vertices.len() as u32;
        for i in 0..vertex_count {
            let position = [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ];
            let normal = if mesh.normals.len() >= (i + 1) * 3 {
                [
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                ]
            } else {
                [0.0, 0.0, 1.0]
            };
            // OBJ texture coordinates have a bottom-left origin.
            let tex_coord = if mesh.texcoords.len() >= (i + 1) * 2 {
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            out.vertices.push(Vertex {
                position,
                color: [1.0, 1.0, 1.0],
                normal,
                tex_coord,
            });
        }

        out.indices.extend(mesh.indices.iter().map(|&i| base + i));
    }

    if out.vertices.is_empty() {
        None
    } else {
        Some(out)
    }
}
