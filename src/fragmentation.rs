use rand::Rng;

use crate::constants::{ASTEROID_MAX_SPIN, FRAGMENT_COUNT};
use crate::entities::{Asteroid, Tier};
use crate::types::Vector2D;

/// Width of the range fragment velocities are drawn from, by parent tier.
/// Smaller rocks fly apart faster.
pub fn fragment_spread(parent: Tier) -> Option<f64> {
    match parent {
        Tier::Large => Some(2.5),
        Tier::Medium => Some(3.0),
        Tier::Small => Some(3.5),
        Tier::Tiny => None,
    }
}

/// Children left behind by destroying `parent`: three rocks one tier down,
/// all at the parent's position, or nothing for the smallest tier.
pub fn fragment(parent: &Asteroid, rng: &mut impl Rng, next_id: &mut u64) -> Vec<Asteroid> {
    let (Some(tier), Some(spread)) = (parent.tier.child(), fragment_spread(parent.tier)) else {
        return Vec::new();
    };

    let half = spread / 2.0;
    (0..FRAGMENT_COUNT)
        .map(|_| {
            let velocity = Vector2D::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
            let spin = rng.gen_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN);
            let variant = rng.gen_range(0..tier.variant_count());
            *next_id += 1;
            Asteroid::new(*next_id, parent.body.position, velocity, spin, tier, variant)
        })
        .collect()
}
