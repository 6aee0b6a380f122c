//! Particle bursts
//!
//! Purely visual: particles never touch collision or scoring, but they age
//! inside the frame step so the renderer stays read-only.

use glam::Vec2;
use rand::Rng;

use super::state::{MAX_PARTICLES, Particle};
use crate::tuning::ParticleTuning;

/// Emit a burst at `origin`, dropping the oldest particles past the cap
pub fn emit<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    origin: Vec2,
    color: u32,
    tuning: &ParticleTuning,
    rng: &mut R,
) {
    let spread = tuning.max_speed * 2.0;
    let size_range = tuning.max_size - tuning.min_size;

    for _ in 0..tuning.count {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * spread,
            (rng.random::<f32>() - 0.5) * spread,
        );
        particles.push(Particle {
            pos: origin,
            vel,
            life: 1.0,
            size: tuning.min_size + rng.random::<f32>() * size_range,
            color,
        });
    }

    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

/// Move every particle one frame and drop the expired ones
pub fn advance(particles: &mut Vec<Particle>, life_decay: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= life_decay;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_emit_burst() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut particles = Vec::new();
        let tuning = ParticleTuning::default();
        emit(&mut particles, Vec2::new(100.0, 50.0), 0xff00ff, &tuning, &mut rng);

        assert_eq!(particles.len(), 15);
        for p in &particles {
            assert_eq!(p.pos, Vec2::new(100.0, 50.0));
            assert_eq!(p.life, 1.0);
            assert_eq!(p.color, 0xff00ff);
            assert!(p.vel.x >= -4.0 && p.vel.x < 4.0);
            assert!(p.vel.y >= -4.0 && p.vel.y < 4.0);
            assert!(p.size >= 2.0 && p.size < 6.0);
        }
    }

    #[test]
    fn test_particles_expire_after_fifty_frames() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut particles = Vec::new();
        let tuning = ParticleTuning::default();
        emit(&mut particles, Vec2::ZERO, 0xffffff, &tuning, &mut rng);

        for _ in 0..49 {
            advance(&mut particles, tuning.life_decay);
        }
        assert_eq!(particles.len(), 15);

        // Float drift means the 50th or 51st step finishes them
        advance(&mut particles, tuning.life_decay);
        advance(&mut particles, tuning.life_decay);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_advance_moves_by_velocity() {
        let mut particles = vec![Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(2.0, -3.0),
            life: 1.0,
            size: 4.0,
            color: 0,
        }];
        advance(&mut particles, 0.02);
        assert_eq!(particles[0].pos, Vec2::new(12.0, 7.0));
        assert!((particles[0].life - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_emit_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut particles = Vec::new();
        let tuning = ParticleTuning::default();
        for i in 0..30 {
            emit(&mut particles, Vec2::ZERO, i, &tuning, &mut rng);
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
        // Newest burst survives
        assert_eq!(particles.last().map(|p| p.color), Some(29));
    }
}
