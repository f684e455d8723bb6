use crate::math::vec2::Vec2;
use crate::objects::registry::BodyId;

/// A resolved contact between two bodies, recorded once per pair per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Unit normal pointing from body B towards body A.
    pub normal: Vec2,
    /// Penetration depth before positional correction.
    pub depth: f64,
}

impl Contact {
    pub fn involves(&self, id: BodyId) -> bool {
        self.body_a == id || self.body_b == id
    }

    /// The contact as seen from `id`: the other body and a normal pointing
    /// away from `id`. `None` if `id` is not part of this contact.
    pub fn seen_from(&self, id: BodyId) -> Option<CollisionInfo> {
        if self.body_a == id {
            Some(CollisionInfo {
                other: self.body_b,
                normal: -self.normal,
                depth: self.depth,
            })
        } else if self.body_b == id {
            Some(CollisionInfo {
                other: self.body_a,
                normal: self.normal,
                depth: self.depth,
            })
        } else {
            None
        }
    }
}

/// One collision reported for a queried body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub other: BodyId,
    /// Points away from the queried body, towards `other`.
    pub normal: Vec2,
    pub depth: f64,
}
