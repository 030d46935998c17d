use roverkin_core::Scalar;
use serde::{Deserialize, Serialize};
use crate::Terrain;

/// Band amplitudes/frequencies for the procedural ground. Units: meters, rad/m.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub dune_amp: Scalar,
    pub dune_freq: [Scalar; 2],    // (x, z)
    pub bump_amp: Scalar,
    pub bump_freq: [Scalar; 2],
    pub bump_phase: Scalar,
    pub rough_amp: Scalar,
    pub rough_freq: [Scalar; 2],

    /// |z| below which the ground counts as the driven path.
    pub path_half_width: Scalar,
    /// Width of the smoothstep transition outside `path_half_width`.
    pub path_blend: Scalar,
    /// Dune gain retained on the path (0 = fully flattened).
    pub path_dune_gain: Scalar,
    pub ripple_a_amp: Scalar,
    pub ripple_a_freq: [Scalar; 2],
    pub ripple_b_amp: Scalar,
    pub ripple_b_freq: [Scalar; 2],

    /// Elevation floor; output never goes below it.
    pub floor: Scalar,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            dune_amp: 1.2,
            dune_freq: [0.05, 0.07],
            bump_amp: 0.35,
            bump_freq: [0.23, 0.19],
            bump_phase: 1.3,
            rough_amp: 0.08,
            rough_freq: [0.9, 1.1],
            path_half_width: 2.5,
            path_blend: 1.5,
            path_dune_gain: 0.25,
            ripple_a_amp: 0.06,
            ripple_a_freq: [2.7, 1.9],
            ripple_b_amp: 0.04,
            ripple_b_freq: [4.3, 0.7],
            floor: -1.5,
        }
    }
}

/// Three additive sinusoidal bands (dunes, bumps, roughness), with dunes damped
/// and two ripple terms added inside the path corridor around z = 0.
///
/// The ripples keep the suspension moving even where the corridor is nearly
/// flat. Closed form, no allocation; safe to call many times per tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProceduralTerrain {
    pub params: TerrainParams,
}

impl ProceduralTerrain {
    pub fn new(params: TerrainParams) -> Self { Self { params } }

    /// 1 on the path, 0 off it, C1-continuous in between.
    #[inline]
    pub fn path_weight(&self, z: Scalar) -> Scalar {
        let p = &self.params;
        let d = z.abs() - p.path_half_width;
        if d <= 0.0 { return 1.0; }
        if p.path_blend <= 0.0 { return 0.0; }
        let t = (d / p.path_blend).min(1.0);
        1.0 - t * t * (3.0 - 2.0 * t)
    }
}

impl Terrain for ProceduralTerrain {
    fn height(&self, x: Scalar, z: Scalar) -> Scalar {
        let p = &self.params;
        let w = self.path_weight(z);

        let dunes = p.dune_amp * (x * p.dune_freq[0]).sin() * (z * p.dune_freq[1]).cos();
        let bumps = p.bump_amp * (x * p.bump_freq[0] + p.bump_phase).sin() * (z * p.bump_freq[1]).cos();
        let rough = p.rough_amp * (x * p.rough_freq[0]).sin() * (z * p.rough_freq[1]).sin();

        let ripples = p.ripple_a_amp * (x * p.ripple_a_freq[0]).sin() * (z * p.ripple_a_freq[1]).cos()
            + p.ripple_b_amp * (x * p.ripple_b_freq[0] + z * p.ripple_b_freq[1]).sin();

        let dune_gain = 1.0 - w * (1.0 - p.path_dune_gain);
        let y = dunes * dune_gain + bumps + rough + ripples * w;
        // f32::max returns the non-NaN side, so the floor also absorbs NaN from non-finite input.
        y.max(p.floor)
    }
}
