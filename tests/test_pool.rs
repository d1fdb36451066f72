use space_odyssey::consts::*;
use space_odyssey::entities::{Projectile, Rect};
use space_odyssey::pool::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn place(pool: &mut ProjectilePool, slot: usize, x: i32, y: i32) {
    *pool.slot_mut(slot).unwrap() = Projectile { x, y, alive: true };
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_pool_is_empty() {
    let pool = ProjectilePool::new();
    assert_eq!(pool.capacity(), MAX_SHOTS);
    assert_eq!(pool.alive_count(), 0);
    assert_eq!(pool.cursor(), 0);
}

#[test]
fn pattern_table_omits_one_lane_each() {
    for (p, pattern) in PATTERNS.iter().enumerate() {
        // Pattern p leaves lane p open
        assert!(!pattern.contains(&p));
        assert_eq!(pattern.len(), SHOTS_PER_PATTERN);
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn spawn_pattern_makes_four_shots_on_four_lanes() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let mut pool = ProjectilePool::new();
        let pattern = pool.spawn_pattern(&mut rng);
        assert_eq!(pool.alive_count(), 4);

        let mut xs: Vec<i32> = pool.alive().map(|p| p.x).collect();
        xs.sort();
        let expected: Vec<i32> = LANES
            .iter()
            .enumerate()
            .filter(|(lane, _)| *lane != pattern)
            .map(|(_, &x)| x)
            .collect();
        assert_eq!(xs, expected);
        assert!(pool.alive().all(|p| p.y == SHOT_SPAWN_Y));
    }
}

#[test]
fn every_pattern_is_eventually_drawn() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    let mut seen = [false; 5];
    for _ in 0..200 {
        seen[pool.spawn_pattern(&mut rng)] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn cursor_advances_by_four_and_wraps() {
    let mut pool = ProjectilePool::new();
    pool.spawn(0);
    assert_eq!(pool.cursor(), 4);
    for _ in 0..7 {
        pool.spawn(1);
    }
    // Filling the last slot wraps straight back to zero
    assert_eq!(pool.cursor(), 0);
    assert_eq!(pool.alive_count(), 32);

    pool.spawn(2);
    assert_eq!(pool.cursor(), 4);
}

#[test]
fn cursor_stays_below_capacity() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::with_capacity(6);
    for _ in 0..50 {
        pool.spawn_pattern(&mut rng);
        assert!(pool.cursor() < pool.capacity());
    }
}

#[test]
fn spawn_overwrites_live_projectiles_at_cursor() {
    let mut pool = ProjectilePool::new();
    for _ in 0..8 {
        pool.spawn(0);
    }
    // Slot 0 is mid-flight when the cursor comes back around
    pool.slot_mut(0).unwrap().y = 500;
    pool.spawn(4);
    let slot0 = pool.slots()[0];
    assert_eq!(slot0, Projectile { x: LANES[0], y: SHOT_SPAWN_Y, alive: true });
    assert_eq!(pool.alive_count(), 32);
}

#[test]
fn odd_capacity_wraps_per_slot() {
    let mut pool = ProjectilePool::with_capacity(6);
    pool.spawn(0);
    pool.spawn(0);
    assert_eq!(pool.alive_count(), 6);
    assert_eq!(pool.cursor(), 2);
    // Second spawn wrote slots 4, 5, 0, 1
    assert_eq!(pool.slots()[0].x, LANES[PATTERNS[0][2]]);
    assert_eq!(pool.slots()[1].x, LANES[PATTERNS[0][3]]);
}

#[test]
fn prime_fills_every_slot() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    pool.prime(&mut rng);
    assert_eq!(pool.alive_count(), MAX_SHOTS);
    assert!(pool.alive().all(|p| p.y == SHOT_SPAWN_Y && LANES.contains(&p.x)));
}

#[test]
fn clear_resets_slots_and_cursor() {
    let mut pool = ProjectilePool::new();
    pool.spawn(3);
    pool.clear();
    assert_eq!(pool.alive_count(), 0);
    assert_eq!(pool.cursor(), 0);
}

// ── Advance ───────────────────────────────────────────────────────────────────

#[test]
fn alive_shot_falls_by_speed_until_the_dead_band() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    place(&mut pool, 20, 166, SHOT_SPAWN_Y);

    let mut prev = SHOT_SPAWN_Y;
    loop {
        let spawned = pool.advance(SHOT_SPEED, &mut rng);
        let y = pool.slots()[20].y;
        if prev >= SCREEN_HEIGHT {
            // Inside the dead band: stays put and spawns
            assert_eq!(y, prev);
            assert_eq!(spawned, 1);
            break;
        }
        assert_eq!(y, prev + SHOT_SPEED);
        assert_eq!(spawned, 0);
        prev = y;
    }
    assert!(pool.slots()[20].alive);
}

#[test]
fn dead_shots_never_move() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    *pool.slot_mut(3).unwrap() = Projectile { x: 286, y: 100, alive: false };
    for _ in 0..10 {
        pool.advance(SHOT_SPEED, &mut rng);
    }
    assert_eq!(pool.slots()[3].y, 100);
    assert_eq!(pool.alive_count(), 0);
}

#[test]
fn dead_band_spawns_without_resetting_the_slot() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    place(&mut pool, 10, 166, SCREEN_HEIGHT);

    let spawned = pool.advance(SHOT_SPEED, &mut rng);
    assert_eq!(spawned, 1);
    assert_eq!(pool.slots()[10], Projectile { x: 166, y: SCREEN_HEIGHT, alive: true });
    // New pattern landed in slots 0..4, already visited this pass
    assert_eq!(pool.alive_count(), 5);
    assert!(pool.slots()[..4].iter().all(|p| p.alive && p.y == SHOT_SPAWN_Y));
}

#[test]
fn dead_band_retriggers_every_frame() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    place(&mut pool, 31, 646, SCREEN_HEIGHT + DEAD_BAND);
    assert_eq!(pool.advance(SHOT_SPEED, &mut rng), 1);
    assert_eq!(pool.advance(SHOT_SPEED, &mut rng), 1);
    assert_eq!(pool.slots()[31].y, SCREEN_HEIGHT + DEAD_BAND);
}

#[test]
fn shot_past_the_dead_band_dies() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    place(&mut pool, 5, 406, SCREEN_HEIGHT + DEAD_BAND + 1);
    let spawned = pool.advance(SHOT_SPEED, &mut rng);
    assert_eq!(spawned, 0);
    assert!(!pool.slots()[5].alive);
    assert_eq!(pool.alive_count(), 0);
}

#[test]
fn last_visible_step_lands_in_the_dead_band() {
    let mut rng = seeded_rng();
    let mut pool = ProjectilePool::new();
    place(&mut pool, 0, 526, SCREEN_HEIGHT - 1);
    pool.advance(SHOT_SPEED, &mut rng);
    assert_eq!(pool.slots()[0].y, SCREEN_HEIGHT - 1 + SHOT_SPEED);
}

// ── Collision ─────────────────────────────────────────────────────────────────

#[test]
fn collision_with_alive_shot_inside_ship() {
    let ship = Rect::new(450, 693, 64, 64);
    let mut pool = ProjectilePool::new();
    assert!(!pool.collides_with(&ship));

    place(&mut pool, 7, 460, 700);
    assert!(pool.collides_with(&ship));

    pool.slot_mut(7).unwrap().alive = false;
    assert!(!pool.collides_with(&ship));
}

#[test]
fn collision_on_ship_edge_misses() {
    let ship = Rect::new(450, 693, 64, 64);
    let mut pool = ProjectilePool::new();
    place(&mut pool, 0, 450, 700);
    place(&mut pool, 1, 514, 700);
    place(&mut pool, 2, 470, 693);
    assert!(!pool.collides_with(&ship));
}

#[test]
fn first_hit_is_lowest_slot() {
    let ship = Rect::new(450, 693, 64, 64);
    let mut pool = ProjectilePool::new();
    place(&mut pool, 7, 470, 720);
    place(&mut pool, 3, 460, 700);
    assert_eq!(pool.first_hit(&ship), Some(3));
}
