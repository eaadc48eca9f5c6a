use glam::Vec2;

use crate::coords::ColorRgba;

use super::Fragment;

/// One filled circle with an optional outer ring.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CircleInstance {
    /// Center.
    pub pos: Vec2,
    /// Fill radius.
    pub radius: f32,
    /// Ring thickness outside `radius`; `0` draws no ring.
    pub border_radius: f32,
    pub color: ColorRgba,
    pub border_color: ColorRgba,
}

impl CircleInstance {
    /// White fill with a 6-unit black ring.
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            border_radius: 6.0,
            color: ColorRgba::white(),
            border_color: ColorRgba::black(),
        }
    }

    #[inline]
    pub fn with_color(mut self, color: ColorRgba) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn with_border(mut self, border_radius: f32, border_color: ColorRgba) -> Self {
        self.border_radius = border_radius;
        self.border_color = border_color;
        self
    }

    #[inline]
    pub fn without_border(mut self) -> Self {
        self.border_radius = 0.0;
        self
    }

    /// Fully transparent fill: only the ring is drawn.
    #[inline]
    pub fn hollow(mut self) -> Self {
        self.color = ColorRgba::transparent();
        self
    }

    /// Side of the square quad that covers fill and ring.
    #[inline]
    pub fn quad_extent(&self) -> f32 {
        (self.radius + self.border_radius) * 2.0
    }
}

/// Where a point falls relative to a circle instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CircleRegion {
    Fill,
    Border,
    Outside,
}

/// Distance classification.
///
/// `d < radius` is fill; the boundary `d == radius` belongs to the ring, whose
/// outer edge is inclusive. A zero-width ring owns no points at all.
#[inline]
pub fn classify_circle(instance: &CircleInstance, p: Vec2) -> CircleRegion {
    let d = p.distance(instance.pos);
    if d < instance.radius {
        CircleRegion::Fill
    } else if instance.border_radius > 0.0 && d <= instance.radius + instance.border_radius {
        CircleRegion::Border
    } else {
        CircleRegion::Outside
    }
}

/// Circle fragment. Fill and ring are gated by their own alpha.
#[inline]
pub fn shade_circle(instance: &CircleInstance, p: Vec2) -> Fragment {
    let color = match classify_circle(instance, p) {
        CircleRegion::Fill => instance.color,
        CircleRegion::Border => instance.border_color,
        CircleRegion::Outside => return Fragment::Discard,
    };
    if color.is_transparent() { Fragment::Discard } else { Fragment::Color(color) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::{quad_world_position, QUAD_CORNERS};

    const FILL: ColorRgba = ColorRgba::new(1.0, 0.0, 0.0, 1.0);
    const RING: ColorRgba = ColorRgba::new(0.0, 0.0, 1.0, 1.0);

    fn ringed() -> CircleInstance {
        CircleInstance::new(Vec2::ZERO, 10.0).with_color(FILL).with_border(5.0, RING)
    }

    fn at(d: f32) -> Vec2 {
        Vec2::new(d, 0.0)
    }

    #[test]
    fn classification_boundaries() {
        let c = ringed();
        assert_eq!(shade_circle(&c, at(9.999)), Fragment::Color(FILL));
        assert_eq!(shade_circle(&c, at(10.0)), Fragment::Color(RING));
        assert_eq!(shade_circle(&c, at(15.0)), Fragment::Color(RING));
        assert_eq!(shade_circle(&c, at(15.001)), Fragment::Discard);
    }

    #[test]
    fn boundaries_hold_off_origin() {
        let c = CircleInstance { pos: Vec2::new(100.0, -40.0), ..ringed() };
        assert_eq!(classify_circle(&c, Vec2::new(110.0, -40.0)), CircleRegion::Border);
        assert_eq!(classify_circle(&c, Vec2::new(100.0, -25.0)), CircleRegion::Border);
        assert_eq!(classify_circle(&c, Vec2::new(100.0, -24.9)), CircleRegion::Outside);
    }

    #[test]
    fn transparent_fill_masks_interior_only() {
        let c = ringed().hollow();
        for d in [0.0, 3.0, 9.999] {
            assert!(shade_circle(&c, at(d)).is_discard());
        }
        for d in [10.0, 12.5, 15.0] {
            assert_eq!(shade_circle(&c, at(d)), Fragment::Color(RING));
        }
        assert!(shade_circle(&c, at(16.0)).is_discard());
    }

    #[test]
    fn transparent_ring_keeps_fill() {
        let c = ringed().with_border(5.0, ColorRgba::transparent());
        assert_eq!(shade_circle(&c, at(5.0)), Fragment::Color(FILL));
        assert!(shade_circle(&c, at(12.0)).is_discard());
    }

    #[test]
    fn zero_border_never_yields_ring() {
        let c = ringed().without_border();
        let mut d = 0.0;
        while d <= 12.0 {
            assert_ne!(classify_circle(&c, at(d)), CircleRegion::Border, "d = {d}");
            let frag = shade_circle(&c, at(d));
            assert!(frag == Fragment::Color(FILL) || frag.is_discard());
            d += 0.25;
        }
        assert!(shade_circle(&c, at(10.0)).is_discard());
    }

    #[test]
    fn quad_covers_outer_ring() {
        let c = ringed();
        let extent = Vec2::splat(c.quad_extent());
        for corner in QUAD_CORNERS {
            let world = quad_world_position(Vec2::from_array(corner), extent, c.pos);
            assert_eq!(world.x.abs(), 15.0);
            assert_eq!(world.y.abs(), 15.0);
        }
    }

    #[test]
    fn default_constructor_matches_documented_defaults() {
        let c = CircleInstance::new(Vec2::new(1.0, 2.0), 4.0);
        assert_eq!(c.border_radius, 6.0);
        assert_eq!(c.color, ColorRgba::white());
        assert_eq!(c.border_color, ColorRgba::black());
    }
}
