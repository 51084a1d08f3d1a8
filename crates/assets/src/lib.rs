//! Asset importing: model and image decoding.
//!
//! Everything here decodes files (or in-memory bytes) into the plain
//! records the resource pool uploads; no device objects are touched.

pub mod error;
pub mod model;
pub mod shapes;
pub mod texture;

pub use error::{AssetError, AssetResult};
pub use model::{load_obj, load_obj_from};
pub use shapes::{unit_cube, unit_quad};
pub use texture::{load_image, load_image_from_memory};
