use crate::body::Kinematic;
use crate::entities::{Asteroid, Projectile, Ship};

/// Pairs `(projectile index, asteroid index)` for this tick.
///
/// Projectiles are taken in order and each claims the first overlapping
/// asteroid not already claimed. A projectile destroys at most one asteroid
/// per tick even when it overlaps several.
pub fn projectile_hits(projectiles: &[Projectile], asteroids: &[Asteroid]) -> Vec<(usize, usize)> {
    let mut claimed = vec![false; asteroids.len()];
    let mut hits = Vec::new();

    for (p, projectile) in projectiles.iter().enumerate() {
        if !projectile.is_alive() {
            continue;
        }
        let bounds = projectile.bounds();
        let target = asteroids
            .iter()
            .enumerate()
            .find(|(a, asteroid)| !claimed[*a] && asteroid.is_alive() && bounds.overlaps(&asteroid.bounds()));
        if let Some((a, _)) = target {
            claimed[a] = true;
            hits.push((p, a));
        }
    }
    hits
}

/// Index of the first asteroid the ship runs into. A respawning ship is a
/// ghost and never collides.
pub fn ship_hit(ship: &Ship, asteroids: &[Asteroid]) -> Option<usize> {
    if ship.is_respawning() {
        return None;
    }
    let bounds = ship.bounds();
    asteroids
        .iter()
        .position(|asteroid| asteroid.is_alive() && bounds.overlaps(&asteroid.bounds()))
}
