//! Ground elevation for the rover rig.
//!
//! [`Terrain::height`] is the single source of truth: the kinematic solver
//! samples it directly and the renderer bakes the very same function into a
//! [`HeightField`] grid, so wheels never visibly sink into the mesh.

mod procedural;
mod heightfield;

pub use procedural::{ProceduralTerrain, TerrainParams};
pub use heightfield::HeightField;

use roverkin_core::Scalar;

/// Pure elevation query: same (x, z) always yields a bit-identical y.
pub trait Terrain {
    fn height(&self, x: Scalar, z: Scalar) -> Scalar;
}

impl<T: Terrain + ?Sized> Terrain for &T {
    #[inline]
    fn height(&self, x: Scalar, z: Scalar) -> Scalar { (**self).height(x, z) }
}

/// Constant-elevation ground.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FlatTerrain {
    pub y: Scalar,
}

impl Terrain for FlatTerrain {
    #[inline]
    fn height(&self, _x: Scalar, _z: Scalar) -> Scalar { self.y }
}

/// Adapts a closure into a [`Terrain`]. Handy for synthetic test grounds.
#[derive(Copy, Clone)]
pub struct FnTerrain<F>(pub F);

impl<F: Fn(Scalar, Scalar) -> Scalar> Terrain for FnTerrain<F> {
    #[inline]
    fn height(&self, x: Scalar, z: Scalar) -> Scalar { (self.0)(x, z) }
}
