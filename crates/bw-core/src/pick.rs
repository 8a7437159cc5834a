//! Pick results: ray → ordered hits.
//!
//! The scene picker fills a `PickResult` with scene-geometry hits for the
//! pointer ray; the tool chain's pick phase then appends tool-owned geometry
//! (handles, guides) into the same result so everything can be queried
//! uniformly afterwards.

use crate::input::PickRay;
use glam::Vec3;
use smallvec::SmallVec;
use std::ops::BitOr;
use std::sync::atomic::{AtomicU32, Ordering};

// ─── Hit types ───────────────────────────────────────────────────────────

/// Bit set classifying hits. Each producer allocates its own bit once with
/// [`HitType::free`] and filters on it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitType(u64);

impl HitType {
    pub const NONE: Self = Self(0);
    pub const ANY: Self = Self(u64::MAX);

    /// Allocate a fresh, process-unique single-bit hit type.
    pub fn free() -> Self {
        static NEXT_BIT: AtomicU32 = AtomicU32::new(0);
        let bit = NEXT_BIT.fetch_add(1, Ordering::Relaxed);
        assert!(bit < u64::BITS, "hit type space exhausted");
        Self(1 << bit)
    }

    /// True if the two sets share at least one bit.
    pub fn matches(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for HitType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Opaque handle to whatever was hit (scene node, face, tool handle …).
/// Interpreted only by the producer of the hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTarget(pub u64);

/// A single ray intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub hit_type: HitType,
    /// Distance along the pick ray.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    pub target: HitTarget,
}

impl Hit {
    pub fn new(hit_type: HitType, distance: f32, point: Vec3, target: HitTarget) -> Self {
        Self {
            hit_type,
            distance,
            point,
            target,
        }
    }
}

// ─── Pick result ─────────────────────────────────────────────────────────

/// Hits ordered by ascending distance. Hits at equal distance keep the order
/// in which they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickResult {
    hits: SmallVec<[Hit; 8]>,
}

impl PickResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hit(&mut self, hit: Hit) {
        let at = self
            .hits
            .partition_point(|h| h.distance.total_cmp(&hit.distance).is_le());
        self.hits.insert(at, hit);
    }

    pub fn all(&self) -> &[Hit] {
        &self.hits
    }

    /// Closest hit whose type matches `hit_type`.
    pub fn first(&self, hit_type: HitType) -> Option<&Hit> {
        self.hits.iter().find(|h| h.hit_type.matches(hit_type))
    }

    pub fn all_of(&self, hit_type: HitType) -> impl Iterator<Item = &Hit> {
        self.hits.iter().filter(move |h| h.hit_type.matches(hit_type))
    }

    pub fn first_matching(&self, pred: impl Fn(&Hit) -> bool) -> Option<&Hit> {
        self.hits.iter().find(|h| pred(h))
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }
}

// ─── Scene picking ───────────────────────────────────────────────────────

/// The external picking collaborator: maps view coordinates to a ray and a
/// ray to scene-geometry hits.
pub trait ScenePicker {
    fn pick_ray(&self, x: f32, y: f32) -> PickRay;

    fn pick(&self, ray: &PickRay) -> PickResult;
}
