use glam::{UVec2, Vec2, Vec3};
use roverkin_core::Scalar;
use crate::Terrain;

/// Regular grid heightfield. Heights are in world units.
///
/// Produced by [`HeightField::bake`] from a [`Terrain`] for the ground mesh;
/// node (i, k) sits at `origin + (i * cell.x, k * cell.y)` in world (x, z).
#[derive(Clone, Debug)]
pub struct HeightField {
    pub dims: UVec2,     // nx, nz (columns in x, rows in z)
    pub cell: Vec2,      // sx, sz (world units per cell)
    pub origin: Vec2,    // world (x, z) of node (0, 0)
    pub heights: Vec<f32>,
    pub min_y: f32,
    pub max_y: f32,
}

impl HeightField {
    /// Sample `terrain` on a `dims` grid. Node values equal `terrain.height` exactly.
    pub fn bake<T: Terrain>(terrain: &T, dims: UVec2, cell: Vec2, origin: Vec2) -> Self {
        let dims = dims.max(UVec2::ONE);
        let mut heights = Vec::with_capacity((dims.x * dims.y) as usize);
        for k in 0..dims.y {
            for i in 0..dims.x {
                let p = origin + Vec2::new(i as f32 * cell.x, k as f32 * cell.y);
                heights.push(terrain.height(p.x, p.y));
            }
        }
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for &h in &heights { min_y = min_y.min(h); max_y = max_y.max(h); }
        Self { dims, cell, origin, heights, min_y, max_y }
    }

    #[inline] fn at(&self, i: u32, k: u32) -> f32 {
        self.heights[i as usize + k as usize * self.dims.x as usize]
    }

    /// World position of grid node (i, k).
    pub fn node(&self, i: u32, k: u32) -> Vec3 {
        let i = i.min(self.dims.x - 1);
        let k = k.min(self.dims.y - 1);
        let p = self.origin + Vec2::new(i as f32 * self.cell.x, k as f32 * self.cell.y);
        Vec3::new(p.x, self.at(i, k), p.y)
    }

    /// Fractional grid coordinate of world (x, z), clamped to the grid. NaN maps to node 0.
    fn grid_coord(&self, x: Scalar, z: Scalar) -> Vec2 {
        let last = (self.dims - UVec2::ONE).as_vec2();
        let g = (Vec2::new(x, z) - self.origin) / self.cell.max(Vec2::splat(1e-6));
        g.max(Vec2::ZERO).min(last)
    }

    /// Bilinear height at world (x, z), clamped to the grid extent.
    pub fn sample_height(&self, x: Scalar, z: Scalar) -> Scalar {
        let g = self.grid_coord(x, z);
        let base = g.floor();
        let t = g - base;
        let (i0, k0) = (base.x as u32, base.y as u32);
        let i1 = (i0 + 1).min(self.dims.x - 1);
        let k1 = (k0 + 1).min(self.dims.y - 1);

        let near = lerp(self.at(i0, k0), self.at(i1, k0), t.x);
        let far = lerp(self.at(i0, k1), self.at(i1, k1), t.x);
        lerp(near, far, t.y)
    }

    /// Central-diff normal (unit), one cell either side of (x, z).
    pub fn sample_normal(&self, x: Scalar, z: Scalar) -> Vec3 {
        let hx0 = self.sample_height(x - self.cell.x, z);
        let hx1 = self.sample_height(x + self.cell.x, z);
        let hz0 = self.sample_height(x, z - self.cell.y);
        let hz1 = self.sample_height(x, z + self.cell.y);

        let ddx = (hx1 - hx0) / (2.0 * self.cell.x.max(1e-6));
        let ddz = (hz1 - hz0) / (2.0 * self.cell.y.max(1e-6));

        Vec3::new(-ddx, 1.0, -ddz).normalize_or_zero()
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlatTerrain, FnTerrain, ProceduralTerrain};
    use approx::assert_abs_diff_eq;

    #[test] fn baked_nodes_match_terrain() {
        let t = ProceduralTerrain::default();
        let hf = HeightField::bake(&t, UVec2::new(33, 17), Vec2::new(0.5, 0.5), Vec2::new(-8.0, -4.0));
        for k in 0..hf.dims.y {
            for i in 0..hf.dims.x {
                let n = hf.node(i, k);
                assert_eq!(n.y.to_bits(), t.height(n.x, n.z).to_bits());
            }
        }
        assert!(hf.min_y <= hf.max_y);
    }

    #[test] fn bilinear_is_exact_on_planes() {
        let plane = FnTerrain(|x: f32, z: f32| 0.5 * x - 0.25 * z + 1.0);
        let hf = HeightField::bake(&plane, UVec2::new(9, 9), Vec2::splat(1.0), Vec2::ZERO);
        assert_eq!((hf.min_y, hf.max_y), (-1.0, 5.0));
        assert_abs_diff_eq!(hf.sample_height(3.3, 4.7), plane.height(3.3, 4.7), epsilon = 1e-4);
        let n = hf.sample_normal(4.0, 4.0);
        let expect = Vec3::new(-0.5, 1.0, 0.25).normalize();
        assert_abs_diff_eq!(n.x, expect.x, epsilon = 1e-4);
        assert_abs_diff_eq!(n.z, expect.z, epsilon = 1e-4);
    }

    #[test] fn flat_normal_is_up_and_outside_clamps() {
        let hf = HeightField::bake(&FlatTerrain { y: 2.0 }, UVec2::new(4, 4), Vec2::splat(1.0), Vec2::ZERO);
        assert_eq!(hf.sample_normal(1.5, 1.5), Vec3::Y);
        assert_eq!(hf.sample_height(-100.0, 100.0), 2.0);
        assert_eq!(hf.sample_height(f32::NAN, 1.0), 2.0);
    }
}
