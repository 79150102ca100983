use std::f64::consts::TAU;

use crate::error::TerrainError;

/// Deterministic multi-octave sinusoidal noise.
///
/// Each octave halves the amplitude and doubles the frequency of the previous
/// one. The sum is divided by the total amplitude, so samples stay within
/// `[-1, 1]` for any octave count. A seed shifts the phase of every octave;
/// the phases are fixed at construction and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    octaves: u32,
    base_frequency: f64,
    seed: Option<u64>,
    phases: Vec<[f64; 3]>,
}

impl NoiseField {
    pub fn new(octaves: u32, base_frequency: f64, seed: Option<u64>) -> Result<Self, TerrainError> {
        if octaves == 0 {
            return Err(TerrainError::invalid("octaves", "must be at least 1"));
        }
        if !base_frequency.is_finite() || base_frequency <= 0.0 {
            return Err(TerrainError::invalid(
                "base_frequency",
                format!("must be finite and positive, got {base_frequency}"),
            ));
        }
        let phases = (0..octaves)
            .map(|octave| match seed {
                Some(seed) => octave_phases(seed, octave),
                None => [0.0; 3],
            })
            .collect();
        Ok(Self {
            octaves,
            base_frequency,
            seed,
            phases,
        })
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Sample the field at `(x, z)`. Defined for every real input.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let mut sum = 0.0;
        let mut total_amplitude = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.base_frequency;

        for [px, pz, pd] in &self.phases {
            let grid = (x * frequency + px).sin() * (z * frequency + pz).cos();
            let diagonal = ((x + z * 0.6) * frequency + pd).sin();
            sum += amplitude * 0.5 * (grid + diagonal);
            total_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        sum / total_amplitude
    }
}

/// Three phase offsets in `[0, TAU)` for one octave of a seeded field.
fn octave_phases(seed: u64, octave: u32) -> [f64; 3] {
    let mut state = seed ^ (u64::from(octave) << 32);
    let mut next = || {
        state = splitmix64(state);
        (state >> 11) as f64 / (1u64 << 53) as f64 * TAU
    };
    [next(), next(), next()]
}

/// Splitmix64 step: fast, platform-independent mixing for seeds.
pub(crate) fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_pure() {
        let field = NoiseField::new(4, 0.2, Some(42)).unwrap();
        for i in 0..50 {
            let x = i as f64 * 0.37;
            let z = i as f64 * -1.13;
            assert_eq!(field.sample(x, z).to_bits(), field.sample(x, z).to_bits());
        }
    }

    #[test]
    fn separately_built_fields_agree() {
        let a = NoiseField::new(3, 0.2, Some(9)).unwrap();
        let b = NoiseField::new(3, 0.2, Some(9)).unwrap();
        assert_eq!(a.sample(3.5, -2.0).to_bits(), b.sample(3.5, -2.0).to_bits());
    }

    #[test]
    fn seeds_change_the_field() {
        let a = NoiseField::new(2, 0.2, Some(1)).unwrap();
        let b = NoiseField::new(2, 0.2, Some(2)).unwrap();
        let differs = (0..20).any(|i| a.sample(i as f64, 0.5) != b.sample(i as f64, 0.5));
        assert!(differs);
    }

    #[test]
    fn samples_stay_bounded_for_any_octave_count() {
        for octaves in [1, 2, 5, 12] {
            let field = NoiseField::new(octaves, 0.3, Some(77)).unwrap();
            for i in -40..40 {
                let v = field.sample(i as f64 * 1.7, i as f64 * 0.9);
                assert!((-1.0..=1.0).contains(&v), "octaves={octaves} v={v}");
            }
        }
    }

    #[test]
    fn zero_octaves_rejected() {
        assert!(matches!(
            NoiseField::new(0, 0.2, None),
            Err(TerrainError::InvalidParameter { name: "octaves", .. })
        ));
    }

    #[test]
    fn bad_frequency_rejected() {
        assert!(NoiseField::new(1, 0.0, None).is_err());
        assert!(NoiseField::new(1, f64::NAN, None).is_err());
    }

    #[test]
    fn splitmix_is_deterministic() {
        assert_eq!(splitmix64(42), splitmix64(42));
        assert_ne!(splitmix64(1), splitmix64(2));
    }
}
