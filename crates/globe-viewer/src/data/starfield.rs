use crate::data::types::StarInstance;
use rand::Rng;

/// Inner and outer radius of the star shell, in globe radii.
const SHELL_MIN: f32 = 25.0;
const SHELL_MAX: f32 = 50.0;

/// Random stars on a spherical shell around the globe, tinted slightly blue.
pub fn generate_stars<R: Rng>(count: usize, rng: &mut R) -> Vec<StarInstance> {
    (0..count)
        .map(|_| {
            // Uniform direction via cylindrical projection.
            let z: f32 = rng.gen_range(-1.0..=1.0);
            let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let r = (1.0 - z * z).sqrt();
            let radius = rng.gen_range(SHELL_MIN..SHELL_MAX);

            let brightness: f32 = rng.gen_range(0.45..1.0);
            StarInstance {
                position: [
                    r * theta.cos() * radius,
                    r * theta.sin() * radius,
                    z * radius,
                ],
                color: [brightness * 0.85, brightness * 0.9, brightness],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn stars_lie_in_shell() {
        let mut rng = StdRng::seed_from_u64(7);
        let stars = generate_stars(500, &mut rng);
        assert_eq!(stars.len(), 500);
        for s in &stars {
            let d = glam::Vec3::from_array(s.position).length();
            assert!(d >= SHELL_MIN - 1e-3 && d < SHELL_MAX + 1e-3, "d={d}");
        }
    }
}
