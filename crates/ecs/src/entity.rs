//! Entity identifiers.

/// An opaque identifier for a scene object.
///
/// Entities carry no data themselves; components attached through the
/// [`World`](crate::World) give them meaning. Id `0` is reserved as the
/// invalid sentinel ([`Entity::NONE`]) and is never issued. Ids are
/// assigned sequentially starting at 1 and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// The invalid/none sentinel. Never appears in a world's live list.
    pub const NONE: Entity = Entity(0);

    /// Raw numeric id. `0` for [`Entity::NONE`].
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }

    /// Whether this is the invalid sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Slot index into the world's direct-indexed component arrays.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NONE
    }
}
