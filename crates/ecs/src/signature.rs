//! Per-entity capability bitmasks.

use bitflags::bitflags;

bitflags! {
    /// Bitmask recording which component kinds are attached to an entity.
    ///
    /// One bit per component kind; bit set ⇔ the entity's slot for that
    /// kind holds a valid value. Systems express their requirements as a
    /// signature constant and match entities with a single bitwise AND.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Signature: u64 {
        const TRANSFORM     = 1 << 0;
        const MESH_RENDERER = 1 << 1;
        const CAMERA        = 1 << 2;
        const VISIBILITY    = 1 << 3;
        const LIGHT         = 1 << 4;
    }
}

impl Signature {
    /// Signature required of a drawable entity.
    pub const DRAWABLE: Signature = Signature::TRANSFORM
        .union(Signature::MESH_RENDERER)
        .union(Signature::VISIBILITY);
}
