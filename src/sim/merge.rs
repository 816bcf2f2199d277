//! Coalescence of settled splash water
//!
//! Resting splash particles that sit close together fold into one larger
//! puddle. Each particle is weighted by its sphere volume even though the
//! motion is planar.

use super::state::{EntityIds, Particle};
use crate::{sphere_radius, sphere_volume};

/// Only resting splash particles coalesce
#[inline]
pub fn is_merge_candidate(p: &Particle) -> bool {
    p.is_splash() && p.resting
}

/// Whether two particles are close enough to coalesce
#[inline]
pub fn within_merge_range(a: &Particle, b: &Particle, distance_factor: f32) -> bool {
    a.pos.distance(b.pos) < (a.radius + b.radius) * distance_factor
}

/// Combine two particles into one resting splash particle.
///
/// Volume is conserved; position and velocity are volume-weighted averages.
pub fn merge_particles(id: u32, a: &Particle, b: &Particle) -> Particle {
    let va = sphere_volume(a.radius);
    let vb = sphere_volume(b.radius);
    let total = va + vb;

    let pos = (a.pos * va + b.pos * vb) / total;
    let vel = (a.vel * va + b.vel * vb) / total;

    let mut merged = Particle::splash(id, pos, vel, sphere_radius(total));
    merged.resting = true;
    merged
}

/// Run one pass of pairwise coalescence.
///
/// Pairing is first-found in collection order and each particle joins at most
/// one merge. A product lower than its new radius is lifted onto the ground.
/// Unmerged particles keep their order; merge products are appended after
/// them. Returns the new collection and the number of merges.
pub fn resolve_merges(
    particles: Vec<Particle>,
    distance_factor: f32,
    ids: &mut EntityIds,
) -> (Vec<Particle>, u32) {
    let mut matched = vec![false; particles.len()];
    let mut merged = Vec::new();

    for i in 0..particles.len() {
        if matched[i] || !is_merge_candidate(&particles[i]) {
            continue;
        }
        for j in (i + 1)..particles.len() {
            if matched[j] || !is_merge_candidate(&particles[j]) {
                continue;
            }
            if within_merge_range(&particles[i], &particles[j], distance_factor) {
                matched[i] = true;
                matched[j] = true;
                let mut product = merge_particles(ids.next_id(), &particles[i], &particles[j]);
                // The grown puddle must not sink below the ground plane
                product.pos.y = product.pos.y.max(product.radius);
                log::debug!(
                    "Merged #{} + #{} -> #{} (r = {:.4})",
                    particles[i].id,
                    particles[j].id,
                    product.id,
                    product.radius
                );
                merged.push(product);
                break;
            }
        }
    }

    let count = merged.len() as u32;
    let mut survivors: Vec<Particle> = particles
        .into_iter()
        .zip(matched)
        .filter_map(|(p, was_matched)| (!was_matched).then_some(p))
        .collect();
    survivors.extend(merged);
    (survivors, count)
}
