/// Fixed-capacity ring of falling projectiles.
///
/// Projectiles are spawned four at a time from a small table of lane
/// patterns.  A rolling cursor picks the slots; it does not skip live
/// projectiles, so a spawn may overwrite one that is still falling.

use rand::Rng;

use crate::consts::{DEAD_BAND, MAX_SHOTS, SCREEN_HEIGHT, SHOT_SPAWN_Y};
use crate::entities::{Projectile, Rect};

/// Horizontal spawn positions.
pub const LANES: [i32; 5] = [166, 286, 406, 526, 646];

/// Each pattern uses four lanes and leaves one open.
pub const PATTERNS: [[usize; 4]; 5] = [
    [1, 2, 3, 4],
    [0, 2, 3, 4],
    [0, 1, 3, 4],
    [0, 1, 2, 4],
    [0, 1, 2, 3],
];

pub const SHOTS_PER_PATTERN: usize = 4;

#[derive(Clone, Debug)]
pub struct ProjectilePool {
    shots: Box<[Projectile]>,
    cursor: usize,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SHOTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "projectile pool needs at least one slot");
        ProjectilePool {
            shots: vec![Projectile::default(); capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.shots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slots(&self) -> &[Projectile] {
        &self.shots
    }

    /// Direct slot access, mainly for setting up scenarios.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Projectile> {
        self.shots.get_mut(index)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Projectile> {
        self.shots.iter().filter(|p| p.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn clear(&mut self) {
        self.shots.fill(Projectile::default());
        self.cursor = 0;
    }

    // ── Spawning ──────────────────────────────────────────────────────────────

    /// Spawn a uniformly random pattern.  Returns the pattern index.
    pub fn spawn_pattern(&mut self, rng: &mut impl Rng) -> usize {
        let pattern = rng.gen_range(0..PATTERNS.len());
        self.spawn(pattern);
        pattern
    }

    /// Write one pattern into the next four slots at the cursor.  The
    /// cursor wraps after every write, so it always names a valid slot.
    ///
    /// Panics if `pattern` is not a row of [`PATTERNS`].
    pub fn spawn(&mut self, pattern: usize) {
        for &lane in &PATTERNS[pattern] {
            self.shots[self.cursor] = Projectile {
                x: LANES[lane],
                y: SHOT_SPAWN_Y,
                alive: true,
            };
            self.cursor = (self.cursor + 1) % self.shots.len();
        }
    }

    /// Fill the ring once with random patterns.
    pub fn prime(&mut self, rng: &mut impl Rng) {
        for _ in 0..self.capacity().div_ceil(SHOTS_PER_PATTERN) {
            self.spawn_pattern(rng);
        }
    }

    // ── Per-frame update ──────────────────────────────────────────────────────

    /// Move every live projectile down by `speed`.
    ///
    /// Visible shots fall; shots past the dead band die; shots inside the
    /// dead band stay put and spawn a fresh pattern every time they are
    /// visited.  Returns how many patterns were spawned.
    pub fn advance(&mut self, speed: i32, rng: &mut impl Rng) -> usize {
        let mut spawned = 0;
        for i in 0..self.shots.len() {
            if !self.shots[i].alive {
                continue;
            }
            let y = self.shots[i].y;
            if y < SCREEN_HEIGHT {
                self.shots[i].y += speed;
            } else if y > SCREEN_HEIGHT + DEAD_BAND {
                self.shots[i].alive = false;
            } else {
                self.spawn_pattern(rng);
                spawned += 1;
            }
        }
        spawned
    }

    // ── Collision ─────────────────────────────────────────────────────────────

    /// First live slot (lowest index) whose hit box overlaps `target`.
    pub fn first_hit(&self, target: &Rect) -> Option<usize> {
        self.shots
            .iter()
            .position(|p| p.alive && p.hit_box().overlaps(target))
    }

    pub fn collides_with(&self, target: &Rect) -> bool {
        self.first_hit(target).is_some()
    }
}
