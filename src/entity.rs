use ::rand::Rng;
use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::world::Bounds;

/// Stable handle to an entity. The generation field invalidates stale references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Mote,
    Asteroid,
    Planet,
    Star,
    BlackHole,
    Hunter,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Mote,
        Self::Asteroid,
        Self::Planet,
        Self::Star,
        Self::BlackHole,
        Self::Hunter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mote => "mote",
            Self::Asteroid => "asteroid",
            Self::Planet => "planet",
            Self::Star => "star",
            Self::BlackHole => "blackHole",
            Self::Hunter => "hunter",
        }
    }

    /// Planets, stars and black holes pull on the player and never move.
    pub fn is_gravity_source(self) -> bool {
        matches!(self, Self::Planet | Self::Star | Self::BlackHole)
    }

    pub fn base_limit(self) -> usize {
        match self {
            Self::Mote => config::MOTE_LIMIT,
            Self::Asteroid => config::ASTEROID_LIMIT,
            Self::Planet => config::PLANET_LIMIT,
            Self::Star => config::STAR_LIMIT,
            Self::BlackHole => config::BLACK_HOLE_LIMIT,
            Self::Hunter => config::HUNTER_LIMIT,
        }
    }

    /// Extra population per unit of difficulty. `None` for kinds with a fixed count.
    pub fn growth_rate(self) -> Option<f32> {
        match self {
            Self::Mote => Some(config::MOTE_GROWTH),
            Self::Asteroid => Some(config::ASTEROID_GROWTH),
            Self::Hunter => Some(config::HUNTER_GROWTH),
            _ => None,
        }
    }

    /// Half-open radius range sampled at spawn.
    pub fn radius_range(self) -> (f32, f32) {
        match self {
            Self::Mote => (0.5, 1.3),
            Self::Asteroid => (2.0, 4.0),
            Self::Planet => (7.0, 12.0),
            Self::Star => (12.0, 18.0),
            Self::BlackHole => (10.0, 14.0),
            Self::Hunter => (2.0, 3.5),
        }
    }

    pub fn density_factor(self) -> f32 {
        match self {
            Self::Star => config::DENSITY_STAR,
            Self::BlackHole => config::DENSITY_BLACK_HOLE,
            _ => config::DENSITY_DEFAULT,
        }
    }

    pub fn hit_points(self) -> f32 {
        match self {
            Self::Hunter => config::HUNTER_HP,
            _ => config::ENTITY_HP,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub mass: f32,
    pub density: f32,
    pub hp: f32,
    pub tags: Vec<&'static str>,
}

impl Entity {
    /// Build an entity of `kind` with mass and density derived from `radius`.
    pub fn new(kind: EntityKind, pos: Vec3, velocity: Vec3, radius: f32) -> Self {
        let mass = radius * radius * kind.density_factor();
        Self {
            id: EntityId {
                index: u32::MAX,
                generation: 0,
            },
            kind,
            pos,
            velocity,
            radius,
            mass,
            density: mass / radius.powi(3),
            hp: kind.hit_points(),
            tags: Vec::new(),
        }
    }

    /// Random entity inside `bounds`. Gravity sources start at rest.
    pub fn spawn(kind: EntityKind, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let pos = bounds.random_position(rng);
        let s = config::ENTITY_INITIAL_SPEED;
        let velocity = if kind.is_gravity_source() {
            Vec3::ZERO
        } else {
            vec3(
                rng.gen_range(-s..s),
                rng.gen_range(-s..s),
                rng.gen_range(-s..s),
            )
        };
        let (lo, hi) = kind.radius_range();
        let radius = rng.gen_range(lo..hi);
        let mut entity = Self::new(kind, pos, velocity, radius);
        let tag = config::ENTITY_TAGS[rng.gen_range(0..config::ENTITY_TAGS.len())];
        entity.tags.push(tag);
        entity
    }
}

/// Arena-based entity storage with generational indices and free list.
pub struct EntityArena {
    pub entities: Vec<Option<Entity>>,
    pub generations: Vec<u32>,
    pub free_list: Vec<u32>,
    pub count: usize,
}

impl EntityArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: vec![None; capacity],
            generations: vec![0; capacity],
            free_list: (0..capacity as u32).rev().collect(),
            count: 0,
        }
    }

    /// Store `entity`, stamping it with its new id. The arena grows when full.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = if let Some(index) = self.free_list.pop() {
            EntityId {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.entities.len() as u32;
            self.entities.push(None);
            self.generations.push(0);
            EntityId {
                index,
                generation: 0,
            }
        };
        entity.id = id;
        self.entities[id.index as usize] = Some(entity);
        self.count += 1;
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = id.index as usize;
        if idx < self.entities.len() && self.generations[idx] == id.generation {
            let removed = self.entities[idx].take()?;
            self.generations[idx] += 1;
            self.free_list.push(id.index);
            self.count -= 1;
            Some(removed)
        } else {
            None
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let idx = id.index as usize;
        if idx < self.entities.len() && self.generations[idx] == id.generation {
            self.entities[idx].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let idx = id.index as usize;
        if idx < self.entities.len() && self.generations[idx] == id.generation {
            self.entities[idx].as_mut()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter_map(|slot| slot.as_mut())
    }

    pub fn capacity(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_entity(pos: Vec3) -> Entity {
        Entity::new(EntityKind::Mote, pos, Vec3::ZERO, 1.0)
    }

    #[test]
    fn generational_handles_invalidate_after_despawn() {
        let mut arena = EntityArena::new(1);
        let id_a = arena.spawn(test_entity(vec3(0.0, 0.0, 0.0)));
        assert!(arena.get(id_a).is_some());

        assert!(arena.despawn(id_a).is_some());
        assert!(arena.get(id_a).is_none());
        assert!(arena.despawn(id_a).is_none());

        let id_b = arena.spawn(test_entity(vec3(1.0, 0.0, 0.0)));
        assert_eq!(id_a.index, id_b.index);
        assert_ne!(id_a.generation, id_b.generation);
    }

    #[test]
    fn arena_grows_past_initial_capacity_and_stamps_ids() {
        let mut arena = EntityArena::new(1);
        let a = arena.spawn(test_entity(Vec3::ZERO));
        let b = arena.spawn(test_entity(Vec3::X));
        assert_eq!(arena.capacity(), 2);
        assert_eq!(arena.count, 2);
        assert_eq!(arena.get(b).unwrap().id, b);
        assert_ne!(a, b);
    }

    #[test]
    fn mass_and_density_follow_radius() {
        let star = Entity::new(EntityKind::Star, Vec3::ZERO, Vec3::ZERO, 2.0);
        assert!((star.mass - 4.0 * 35.0).abs() < 1e-4);
        assert!((star.density - star.mass / 8.0).abs() < 1e-4);

        let rock = Entity::new(EntityKind::Asteroid, Vec3::ZERO, Vec3::ZERO, 3.0);
        assert!((rock.mass - 72.0).abs() < 1e-4);
    }

    #[test]
    fn spawned_sources_are_at_rest_and_in_range() {
        let bounds = Bounds::new(config::WORLD_BOUNDS);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for kind in EntityKind::ALL {
            for _ in 0..20 {
                let e = Entity::spawn(kind, &bounds, &mut rng);
                let (lo, hi) = kind.radius_range();
                assert!(e.radius >= lo && e.radius < hi);
                assert!(bounds.contains(e.pos));
                assert_eq!(e.tags.len(), 1);
                if kind.is_gravity_source() {
                    assert_eq!(e.velocity, Vec3::ZERO);
                } else {
                    assert!(e.velocity.abs().max_element() <= config::ENTITY_INITIAL_SPEED);
                }
            }
        }
    }
}
