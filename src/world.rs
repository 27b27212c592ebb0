use ::rand::Rng;
use macroquad::prelude::*;
use tracing::debug;

use crate::config;
use crate::entity::{Entity, EntityArena, EntityId, EntityKind};
use crate::physics::GravitySource;

/// Axis-aligned spawn volume centred on the origin. z is flattened.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub half_extent: f32,
}

impl Bounds {
    pub fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    pub fn z_extent(&self) -> f32 {
        self.half_extent * config::WORLD_Z_RATIO
    }

    pub fn random_position(&self, rng: &mut impl Rng) -> Vec3 {
        let b = self.half_extent;
        let z = self.z_extent();
        vec3(rng.gen_range(-b..b), rng.gen_range(-b..b), rng.gen_range(-z..z))
    }

    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x.abs() <= self.half_extent
            && pos.y.abs() <= self.half_extent
            && pos.z.abs() <= self.z_extent()
    }

    /// Distance from origin past which an entity is recycled.
    pub fn recycle_radius(&self) -> f32 {
        self.half_extent * config::WORLD_RECYCLE_RATIO
    }
}

/// Add/remove notifications for presentation adapters that own drawables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    Spawned { id: EntityId, kind: EntityKind },
    Removed { id: EntityId },
}

pub struct World {
    pub bounds: Bounds,
    pub arena: EntityArena,
    gravity_sources: Vec<EntityId>,
    hunters: Vec<EntityId>,
    events: Vec<WorldEvent>,
}

impl World {
    pub fn new(bounds: Bounds) -> Self {
        let capacity: usize = EntityKind::ALL.iter().map(|k| k.base_limit()).sum();
        Self {
            bounds,
            arena: EntityArena::new(capacity),
            gravity_sources: Vec::new(),
            hunters: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Fill every kind up to its base limit.
    pub fn spawn_initial(&mut self, rng: &mut impl Rng) {
        for kind in EntityKind::ALL {
            for _ in 0..kind.base_limit() {
                self.add_entity(kind, rng);
            }
        }
        debug!(count = self.arena.count, "spawned initial population");
    }

    pub fn add_entity(&mut self, kind: EntityKind, rng: &mut impl Rng) -> EntityId {
        let entity = Entity::spawn(kind, &self.bounds, rng);
        self.insert(entity)
    }

    /// Insert a pre-built entity, registering it in the matching subsets.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let kind = entity.kind;
        let id = self.arena.spawn(entity);
        if kind.is_gravity_source() {
            self.gravity_sources.push(id);
        }
        if kind == EntityKind::Hunter {
            self.hunters.push(id);
        }
        self.events.push(WorldEvent::Spawned { id, kind });
        id
    }

    /// Drift every entity, recycle strays, then top up scaling populations.
    pub fn update(&mut self, delta: f32, difficulty: f32, rng: &mut impl Rng) {
        let recycle_sq = self.bounds.recycle_radius().powi(2);
        let bounds = self.bounds;
        for entity in self.arena.iter_mut() {
            entity.pos += entity.velocity * delta;
            if entity.pos.length_squared() > recycle_sq {
                entity.pos = bounds.random_position(rng);
            }
        }

        for kind in EntityKind::ALL {
            let Some(target) = target_population(kind, difficulty) else {
                continue;
            };
            let existing = self.count_of(kind);
            for _ in existing..target {
                self.add_entity(kind, rng);
            }
        }
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.arena.despawn(id)?;
        self.gravity_sources.retain(|&g| g != id);
        self.hunters.retain(|&h| h != id);
        self.events.push(WorldEvent::Removed { id });
        Some(removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.arena.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.count
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.arena.iter().filter(|e| e.kind == kind).count()
    }

    pub fn gravity_source_ids(&self) -> &[EntityId] {
        &self.gravity_sources
    }

    pub fn hunter_ids(&self) -> &[EntityId] {
        &self.hunters
    }

    /// Position/mass projection of every gravity source.
    pub fn gravity_sources(&self) -> Vec<GravitySource> {
        self.gravity_sources
            .iter()
            .filter_map(|&id| self.arena.get(id))
            .map(|e| GravitySource {
                pos: e.pos,
                mass: e.mass,
            })
            .collect()
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Population a scaling kind is topped up to at `difficulty`.
pub fn target_population(kind: EntityKind, difficulty: f32) -> Option<usize> {
    kind.growth_rate()
        .map(|rate| kind.base_limit() + (difficulty * rate).floor().max(0.0) as usize)
}
