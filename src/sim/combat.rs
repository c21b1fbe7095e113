//! Guardian combat: wandering enemies eat notes, the guardian shoots them
//!
//! Runs on the same frame clock as the lanes. Enemies spawn on a fixed
//! cadence, patrol horizontally, and silently remove normal notes they touch.
//! Projectiles fly in a straight line toward where their target was when
//! fired.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{ENEMY_NOTE_RADIUS, PROJECTILE_ENEMY_RADIUS, outside_bounds, within_radius};
use super::lane::Lane;
use super::state::{GameEvent, Playfield};
use super::tick::{Key, TickInput};

/// Frames between enemy spawns (first spawn after one full interval)
pub const ENEMY_SPAWN_INTERVAL: u32 = 600;

/// Enemy spawn rectangle (inclusive)
pub const ENEMY_SPAWN_X: (i32, i32) = (100, 900);
pub const ENEMY_SPAWN_Y: (i32, i32) = (100, 500);

/// Horizontal patrol bounds
pub const ENEMY_X_MIN: f32 = 100.0;
pub const ENEMY_X_MAX: f32 = 900.0;

/// Enemy patrol speed (pixels per frame)
pub const ENEMY_SPEED: f32 = 1.0;

/// Guardian position
pub const GUARDIAN_POS: Vec2 = Vec2::new(800.0, 600.0);

/// Projectile speed (pixels per frame)
pub const PROJECTILE_SPEED: f32 = 6.0;

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// -1.0 (left) or 1.0 (right)
    pub direction: f32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, direction: f32) -> Self {
        Self {
            id,
            pos,
            direction: direction.signum(),
        }
    }

    /// Spawn at a random spot in the spawn rectangle, heading a random way
    pub fn spawn<R: Rng>(id: u32, rng: &mut R) -> Self {
        let x = rng.random_range(ENEMY_SPAWN_X.0..=ENEMY_SPAWN_X.1);
        let y = rng.random_range(ENEMY_SPAWN_Y.0..=ENEMY_SPAWN_Y.1);
        let direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        Self::new(id, Vec2::new(x as f32, y as f32), direction)
    }

    /// Move one frame, bouncing off the patrol bounds
    pub fn advance(&mut self) {
        self.pos.x += self.direction * ENEMY_SPEED;
        let at_left = self.pos.x <= ENEMY_X_MIN && self.direction < 0.0;
        let at_right = self.pos.x >= ENEMY_X_MAX && self.direction > 0.0;
        if at_left || at_right {
            self.direction = -self.direction;
        }
    }
}

/// A straight-flying arrow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit heading, fixed at spawn
    direction: Vec2,
}

impl Projectile {
    /// Aim from `origin` at `target`. `None` if the two coincide.
    pub fn aimed(origin: Vec2, target: Vec2) -> Option<Self> {
        let direction = (target - origin).try_normalize()?;
        Some(Self { pos: origin, direction })
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Sprite rotation (radians)
    pub fn rotation(&self) -> f32 {
        self.direction.y.atan2(self.direction.x)
    }

    pub fn advance(&mut self) {
        self.pos += self.direction * PROJECTILE_SPEED;
    }

    pub fn is_off_screen(&self, playfield: &Playfield) -> bool {
        outside_bounds(self.pos, playfield.width as f32, playfield.height as f32)
    }

    pub fn collides_with(&self, enemy: &Enemy) -> bool {
        within_radius(self.pos, enemy.pos, PROJECTILE_ENEMY_RADIUS)
    }
}

/// The stationary turret that shoots enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guardian {
    pub pos: Vec2,
}

impl Default for Guardian {
    fn default() -> Self {
        Self { pos: GUARDIAN_POS }
    }
}

impl Guardian {
    /// Nearest enemy by straight-line distance; the first one wins ties
    pub fn find_closest_enemy<'a>(&self, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
        let mut closest = None;
        let mut min_distance = f32::MAX;
        for enemy in enemies {
            let distance = self.pos.distance(enemy.pos);
            if distance < min_distance {
                closest = Some(enemy);
                min_distance = distance;
            }
        }
        closest
    }

    /// Fire at the nearest enemy, if there is one
    pub fn fire_at_closest_enemy(&self, enemies: &[Enemy]) -> Option<Projectile> {
        let target = self.find_closest_enemy(enemies)?;
        Projectile::aimed(self.pos, target.pos)
    }
}

/// All combat entities for one level
#[derive(Debug, Clone)]
pub struct Combat {
    pub guardian: Guardian,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Projectiles in flight, in fire order
    pub projectiles: Vec<Projectile>,
    rng: Pcg32,
    next_id: u32,
}

impl Combat {
    pub fn new(seed: u64) -> Self {
        Self {
            guardian: Guardian::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance combat by one frame. `frame` is the clock value before the
    /// lanes advance it.
    pub fn step(
        &mut self,
        frame: u32,
        input: &TickInput,
        lanes: &mut [Lane],
        playfield: &Playfield,
        events: &mut Vec<GameEvent>,
    ) {
        if frame != 0 && frame % ENEMY_SPAWN_INTERVAL == 0 {
            let id = self.next_entity_id();
            let enemy = Enemy::spawn(id, &mut self.rng);
            log::debug!("Enemy {} spawned at ({}, {})", id, enemy.pos.x, enemy.pos.y);
            events.push(GameEvent::EnemySpawned { id });
            self.enemies.push(enemy);
        }

        for enemy in &mut self.enemies {
            enemy.advance();
            for (index, lane) in lanes.iter_mut().enumerate() {
                let count = lane.deactivate_colliding(enemy.pos, ENEMY_NOTE_RADIUS);
                if count > 0 {
                    events.push(GameEvent::NotesStruck {
                        enemy: enemy.id,
                        lane: index,
                        count,
                    });
                }
            }
        }

        if input.was_pressed(Key::Fire) {
            if let Some(projectile) = self.guardian.fire_at_closest_enemy(&self.enemies) {
                self.projectiles.push(projectile);
            }
        }

        let enemies = &mut self.enemies;
        self.projectiles.retain_mut(|projectile| {
            projectile.advance();
            if projectile.is_off_screen(playfield) {
                return false;
            }
            match enemies.iter().position(|e| projectile.collides_with(e)) {
                Some(hit) => {
                    let enemy = enemies.remove(hit);
                    log::debug!("Enemy {} destroyed", enemy.id);
                    events.push(GameEvent::EnemyDestroyed { id: enemy.id });
                    false
                }
                None => true,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::accuracy::AccuracyEvaluator;
    use crate::sim::lane::LaneKind;
    use crate::sim::note::Note;
    use crate::sim::state::SimContext;

    fn playfield() -> Playfield {
        Playfield::default()
    }

    #[test]
    fn test_find_closest_enemy() {
        let guardian = Guardian::default();
        let enemies = vec![
            Enemy::new(1, GUARDIAN_POS + Vec2::new(50.0, 0.0), 1.0),
            Enemy::new(2, GUARDIAN_POS + Vec2::new(0.0, 30.0), 1.0),
            Enemy::new(3, GUARDIAN_POS + Vec2::new(0.0, 80.0), 1.0),
        ];
        assert_eq!(guardian.find_closest_enemy(&enemies).map(|e| e.id), Some(2));
    }

    #[test]
    fn test_find_closest_enemy_tie_keeps_first() {
        let guardian = Guardian::default();
        let enemies = vec![
            Enemy::new(1, GUARDIAN_POS + Vec2::new(-40.0, 0.0), 1.0),
            Enemy::new(2, GUARDIAN_POS + Vec2::new(40.0, 0.0), 1.0),
        ];
        assert_eq!(guardian.find_closest_enemy(&enemies).map(|e| e.id), Some(1));
    }

    #[test]
    fn test_fire_without_enemies_is_noop() {
        let guardian = Guardian::default();
        assert!(guardian.find_closest_enemy(&[]).is_none());
        assert!(guardian.fire_at_closest_enemy(&[]).is_none());
    }

    #[test]
    fn test_projectile_heading_is_fixed_unit_vector() {
        let mut projectile = Projectile::aimed(GUARDIAN_POS, Vec2::new(800.0, 300.0)).unwrap();
        assert!((projectile.direction().length() - 1.0).abs() < 1e-5);
        projectile.advance();
        projectile.advance();
        assert!((projectile.pos - Vec2::new(800.0, 600.0 - 2.0 * PROJECTILE_SPEED)).length() < 1e-4);
        assert!(Projectile::aimed(GUARDIAN_POS, GUARDIAN_POS).is_none());
    }

    #[test]
    fn test_projectile_rotation_follows_heading() {
        use std::f32::consts::FRAC_PI_2;

        let up = Projectile::aimed(GUARDIAN_POS, GUARDIAN_POS - Vec2::new(0.0, 100.0)).unwrap();
        assert!((up.rotation() + FRAC_PI_2).abs() < 1e-5);

        let right = Projectile::aimed(GUARDIAN_POS, GUARDIAN_POS + Vec2::new(40.0, 0.0)).unwrap();
        assert!(right.rotation().abs() < 1e-5);

        let left = Projectile::aimed(GUARDIAN_POS, GUARDIAN_POS - Vec2::new(40.0, 0.0)).unwrap();
        assert!((left.rotation().abs() - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_projectile_off_screen_within_one_step() {
        let edge = Vec2::new(WINDOW_WIDTH as f32, 300.0);
        let mut projectile = Projectile::aimed(edge, edge + Vec2::X).unwrap();
        assert!(!projectile.is_off_screen(&playfield()));
        projectile.advance();
        assert!(projectile.is_off_screen(&playfield()));
    }

    #[test]
    fn test_enemy_bounces_at_bounds() {
        let mut enemy = Enemy::new(1, Vec2::new(ENEMY_X_MAX - 1.0, 200.0), 1.0);
        enemy.advance();
        assert_eq!(enemy.pos.x, ENEMY_X_MAX);
        assert_eq!(enemy.direction, -1.0);
        enemy.advance();
        assert_eq!(enemy.pos.x, ENEMY_X_MAX - 1.0);
        assert_eq!(enemy.direction, -1.0);

        let mut enemy = Enemy::new(2, Vec2::new(ENEMY_X_MIN + 1.0, 200.0), -1.0);
        enemy.advance();
        assert_eq!(enemy.direction, 1.0);
    }

    #[test]
    fn test_enemy_spawn_within_rectangle() {
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..200 {
            let enemy = Enemy::spawn(id, &mut rng);
            assert!((100.0..=900.0).contains(&enemy.pos.x));
            assert!((100.0..=500.0).contains(&enemy.pos.y));
            assert!(enemy.direction == 1.0 || enemy.direction == -1.0);
        }
    }

    #[test]
    fn test_spawn_cadence() {
        let mut combat = Combat::new(1);
        let mut events = Vec::new();
        combat.step(0, &TickInput::default(), &mut [], &playfield(), &mut events);
        assert!(combat.enemies.is_empty());
        combat.step(599, &TickInput::default(), &mut [], &playfield(), &mut events);
        assert!(combat.enemies.is_empty());
        combat.step(600, &TickInput::default(), &mut [], &playfield(), &mut events);
        assert_eq!(combat.enemies.len(), 1);
        combat.step(1200, &TickInput::default(), &mut [], &playfield(), &mut events);
        assert_eq!(combat.enemies.len(), 2);
        assert!(matches!(events[0], GameEvent::EnemySpawned { id: 1 }));
    }

    #[test]
    fn test_projectile_destroys_enemy() {
        let mut combat = Combat::new(1);
        combat.enemies.push(Enemy::new(9, Vec2::new(800.0, 500.0), 1.0));
        let mut events = Vec::new();

        let fire = TickInput::default().press(Key::Fire);
        combat.step(1, &fire, &mut [], &playfield(), &mut events);
        assert_eq!(combat.projectiles.len(), 1);

        for frame in 2..20 {
            combat.step(frame, &TickInput::default(), &mut [], &playfield(), &mut events);
        }
        assert!(combat.enemies.is_empty());
        assert!(combat.projectiles.is_empty());
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDestroyed { id: 9 })));
    }

    #[test]
    fn test_off_screen_projectile_is_discarded() {
        let mut combat = Combat::new(1);
        combat
            .projectiles
            .push(Projectile::aimed(Vec2::new(2.0, 300.0), Vec2::new(0.0, 300.0)).unwrap());
        let mut events = Vec::new();
        combat.step(1, &TickInput::default(), &mut [], &playfield(), &mut events);
        assert!(combat.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_removes_nearby_normal_notes_silently() {
        let mut ctx = SimContext::new(INITIAL_FALL_SPEED);
        let mut acc = AccuracyEvaluator::new(WINDOW_HEIGHT);
        let mut lane = Lane::new(LaneKind::Up, 500, TARGET_HEIGHT);
        lane.push_note(Note::normal(0));
        lane.push_note(Note::hold(0));
        lane.step(&TickInput::default(), &mut acc, &mut ctx);

        let mut lanes = vec![lane];
        let mut combat = Combat::new(1);
        combat.enemies.push(Enemy::new(1, Vec2::new(500.0, 150.0), 1.0));
        let mut events = Vec::new();
        combat.step(1, &TickInput::default(), &mut lanes, &playfield(), &mut events);

        assert!(lanes[0].notes()[0].is_completed());
        assert!(!lanes[0].notes()[1].is_completed());
        assert_eq!(acc.current_label(), None);
        assert!(matches!(
            events[0],
            GameEvent::NotesStruck {
                enemy: 1,
                lane: 0,
                count: 1
            }
        ));
    }
}
