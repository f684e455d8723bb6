//! Layer/mask collision filtering.
//!
//! A filter packs two 16-bit sets into one `u32`: the low half is the layer
//! ("what I am"), the high half is the mask ("what I hit"). Two bodies
//! collide only when each one's mask intersects the other's layer.

use serde::{Deserialize, Serialize};

pub const LAYER_NONE: u32 = 0;
pub const LAYER_ALL: u32 = 0x0000_FFFF;
pub const LAYER_1: u32 = 1 << 0;
pub const LAYER_2: u32 = 1 << 1;

pub const MASK_NONE: u32 = 0;
pub const MASK_ALL: u32 = 0xFFFF_0000;
pub const MASK_1: u32 = 1 << 16;
pub const MASK_2: u32 = 1 << 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionFilter(pub u32);

impl CollisionFilter {
    /// Filter assigned to bodies enrolled in the collision pool at creation.
    pub const DEFAULT: CollisionFilter = CollisionFilter(LAYER_1 | MASK_1);
    /// Collides with nothing.
    pub const NONE: CollisionFilter = CollisionFilter(0);

    pub fn new(layer: u32, mask: u32) -> Self {
        Self((layer & LAYER_ALL) | (mask & MASK_ALL))
    }

    /// Layer bits, low half.
    pub fn layer(self) -> u32 {
        self.0 & LAYER_ALL
    }

    /// Mask bits shifted down so they line up with layer bits.
    pub fn mask(self) -> u32 {
        (self.0 & MASK_ALL) >> 16
    }

    /// Replaces the layer half, leaving the mask untouched.
    pub fn set_layer(&mut self, layer_bits: u32) {
        self.0 = (self.0 & MASK_ALL) | (layer_bits & LAYER_ALL);
    }

    /// Replaces the mask half. `mask` is given in high-half form (`MASK_*`).
    pub fn set_mask(&mut self, mask: u32) {
        self.0 = (self.0 & LAYER_ALL) | (mask & MASK_ALL);
    }

    /// Both masks must see the other's layer.
    pub fn allows(self, other: CollisionFilter) -> bool {
        (self.mask() & other.layer()) != 0 && (other.mask() & self.layer()) != 0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_collide() {
        assert!(CollisionFilter::DEFAULT.allows(CollisionFilter::DEFAULT));
    }

    #[test]
    fn test_filter_halves() {
        let f = CollisionFilter::new(LAYER_2, MASK_1 | MASK_2);
        assert_eq!(f.layer(), 0b10);
        assert_eq!(f.mask(), 0b11);
    }

    #[test]
    fn test_filter_is_symmetric_requirement() {
        // a hits layer 2, but b does not hit layer 1
        let a = CollisionFilter::new(LAYER_1, MASK_2);
        let b = CollisionFilter::new(LAYER_2, MASK_2);
        assert!(!a.allows(b));
        assert!(!b.allows(a));

        let b = CollisionFilter::new(LAYER_2, MASK_1);
        assert!(a.allows(b));
        assert!(b.allows(a));
    }

    #[test]
    fn test_set_layer_and_mask_preserve_other_half() {
        let mut f = CollisionFilter::DEFAULT;
        f.set_layer(LAYER_2);
        assert_eq!(f.0, LAYER_2 | MASK_1);
        f.set_mask(MASK_ALL);
        assert_eq!(f.0, LAYER_2 | MASK_ALL);
        // Bits outside the half being set are ignored
        f.set_layer(0xFFFF_0001);
        assert_eq!(f.0, LAYER_1 | MASK_ALL);
    }

    #[test]
    fn test_none_filter_never_collides() {
        assert!(!CollisionFilter::NONE.allows(CollisionFilter::new(LAYER_ALL, MASK_ALL)));
        assert!(CollisionFilter::NONE.is_none());
    }
}
