use std::any::Any;

use crate::api::types::{PoolId, SingleId, SlotId};
use crate::components::entity::{Body, Entity};
use crate::components::pool::EntityPool;
use crate::core::geometry::{polygons_overlap, Rect};
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;
use crate::tilemap::Map;

/// How two bodies are tested against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionMode {
    /// Integer hit-box intersection.
    #[default]
    Box,
    /// World-space hit polygons, any vertex inside the other shape.
    Polygon,
}

/// What a pool is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionTarget {
    /// Every active member of another pool (or the same one).
    Pool(PoolId),
    /// One scene-owned entity. Only the pool member is notified.
    Entity(SingleId),
}

#[derive(Debug, Clone, Copy)]
struct CollisionLink {
    pool: PoolId,
    target: CollisionTarget,
    mode: CollisionMode,
}

enum Hit {
    Box(Rect),
    Polygon,
}

fn test_bodies(a: &Body, b: &Body, mode: CollisionMode) -> Option<Hit> {
    match mode {
        CollisionMode::Box => a.hit_box.intersection(&b.hit_box).map(Hit::Box),
        CollisionMode::Polygon => {
            polygons_overlap(&a.world_polygon(), &b.world_polygon()).then_some(Hit::Polygon)
        }
    }
}

fn notify(entity: &mut dyn Entity, other: &Body, hit: &Hit) {
    match hit {
        Hit::Box(overlap) => entity.on_box_collision(other, *overlap),
        Hit::Polygon => entity.on_poly_collision(other),
    }
}

/// Type-erased view of an `EntityPool<E>` so pools of different entity types share a scene.
trait ErasedPool {
    fn update(&mut self, dt: f32, map: Option<&Map>);
    fn handle_input(&mut self, input: &InputQueue);
    fn draw(&self, buffer: &mut RenderBuffer);
    fn clear(&mut self);
    fn capacity(&self) -> usize;
    fn active_body(&self, slot: usize) -> Option<&Body>;
    fn entity_mut(&mut self, slot: usize) -> Option<&mut dyn Entity>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Entity> ErasedPool for EntityPool<E> {
    fn update(&mut self, dt: f32, map: Option<&Map>) {
        EntityPool::update(self, dt, map);
    }

    fn handle_input(&mut self, input: &InputQueue) {
        EntityPool::handle_input(self, input);
    }

    fn draw(&self, buffer: &mut RenderBuffer) {
        EntityPool::draw(self, buffer);
    }

    fn clear(&mut self) {
        EntityPool::clear(self);
    }

    fn capacity(&self) -> usize {
        EntityPool::capacity(self)
    }

    fn active_body(&self, slot: usize) -> Option<&Body> {
        self.get(SlotId(slot)).filter(|e| e.is_active()).map(|e| e.body())
    }

    fn entity_mut(&mut self, slot: usize) -> Option<&mut dyn Entity> {
        self.get_mut(SlotId(slot)).map(|e| e as &mut dyn Entity)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Type-erased single entity with downcasting.
trait ErasedEntity {
    fn entity(&self) -> &dyn Entity;
    fn entity_mut(&mut self) -> &mut dyn Entity;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Entity> ErasedEntity for E {
    fn entity(&self) -> &dyn Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut dyn Entity {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns every pool and single entity of a level, plus the collision links between them.
///
/// `update` runs all active entities first, then resolves every link in
/// registration order.
pub struct Scene {
    pools: Vec<Box<dyn ErasedPool>>,
    singles: Vec<Box<dyn ErasedEntity>>,
    links: Vec<CollisionLink>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            pools: Vec::new(),
            singles: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn add_pool<E: Entity>(&mut self, pool: EntityPool<E>) -> PoolId {
        self.pools.push(Box::new(pool));
        PoolId(self.pools.len() - 1)
    }

    /// Typed access to a pool. None if the id is unknown or `E` is the wrong type.
    pub fn pool<E: Entity>(&self, id: PoolId) -> Option<&EntityPool<E>> {
        self.pools.get(id.0)?.as_any().downcast_ref()
    }

    pub fn pool_mut<E: Entity>(&mut self, id: PoolId) -> Option<&mut EntityPool<E>> {
        self.pools.get_mut(id.0)?.as_any_mut().downcast_mut()
    }

    pub fn add_single<E: Entity>(&mut self, entity: E) -> SingleId {
        self.singles.push(Box::new(entity));
        SingleId(self.singles.len() - 1)
    }

    pub fn single<E: Entity>(&self, id: SingleId) -> Option<&E> {
        self.singles.get(id.0)?.as_any().downcast_ref()
    }

    pub fn single_mut<E: Entity>(&mut self, id: SingleId) -> Option<&mut E> {
        self.singles.get_mut(id.0)?.as_any_mut().downcast_mut()
    }

    /// Test `pool` against `target` every update. Returns false (and registers
    /// nothing) if either side is unknown.
    ///
    /// Linking a pool with itself tests each unordered pair of distinct slots once.
    pub fn collide(&mut self, pool: PoolId, target: CollisionTarget, mode: CollisionMode) -> bool {
        let target_known = match target {
            CollisionTarget::Pool(other) => other.0 < self.pools.len(),
            CollisionTarget::Entity(single) => single.0 < self.singles.len(),
        };
        if pool.0 >= self.pools.len() || !target_known {
            log::warn!("collision link {:?} -> {:?} names an unknown pool or entity", pool, target);
            return false;
        }
        self.links.push(CollisionLink { pool, target, mode });
        true
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn single_count(&self) -> usize {
        self.singles.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Update every active entity, then dispatch collisions.
    pub fn update(&mut self, dt: f32, map: Option<&Map>) {
        for pool in &mut self.pools {
            pool.update(dt, map);
        }
        for single in &mut self.singles {
            let entity = single.entity_mut();
            if entity.is_active() {
                entity.update(dt, map);
            }
        }
        self.dispatch_collisions();
    }

    pub fn handle_input(&mut self, input: &InputQueue) {
        for pool in &mut self.pools {
            pool.handle_input(input);
        }
        for single in &mut self.singles {
            let entity = single.entity_mut();
            if entity.is_active() {
                entity.handle_input(input);
            }
        }
    }

    /// Draw active pool members in pool order, then active singles.
    pub fn draw(&self, buffer: &mut RenderBuffer) {
        for pool in &self.pools {
            pool.draw(buffer);
        }
        for single in &self.singles {
            let entity = single.entity();
            if entity.is_active() {
                entity.draw(buffer);
            }
        }
    }

    /// Deactivate every pool member. Singles and links are kept.
    pub fn clear_pools(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
    }

    /// Run every collision link once.
    pub fn dispatch_collisions(&mut self) {
        for i in 0..self.links.len() {
            let link = self.links[i];
            match link.target {
                CollisionTarget::Pool(other) => self.collide_pools(link.pool, other, link.mode),
                CollisionTarget::Entity(single) => self.collide_single(link.pool, single, link.mode),
            }
        }
    }

    fn body_in(&self, pool: PoolId, slot: usize) -> Option<&Body> {
        self.pools.get(pool.0)?.active_body(slot)
    }

    fn notify_slot(&mut self, pool: PoolId, slot: usize, other: &Body, hit: &Hit) {
        if let Some(entity) = self.pools.get_mut(pool.0).and_then(|p| p.entity_mut(slot)) {
            if entity.is_active() {
                notify(entity, other, hit);
            }
        }
    }

    fn collide_pools(&mut self, a: PoolId, b: PoolId, mode: CollisionMode) {
        let (Some(cap_a), Some(cap_b)) = (
            self.pools.get(a.0).map(|p| p.capacity()),
            self.pools.get(b.0).map(|p| p.capacity()),
        ) else {
            return;
        };
        let same = a == b;

        for i in 0..cap_a {
            let start = if same { i + 1 } else { 0 };
            for j in start..cap_b {
                // Re-read both sides each pair: an earlier callback may have deactivated either.
                let (Some(body_a), Some(body_b)) = (self.body_in(a, i), self.body_in(b, j)) else {
                    if self.body_in(a, i).is_none() {
                        break;
                    }
                    continue;
                };
                let Some(hit) = test_bodies(body_a, body_b, mode) else {
                    continue;
                };
                let (body_a, body_b) = (body_a.clone(), body_b.clone());
                self.notify_slot(a, i, &body_b, &hit);
                self.notify_slot(b, j, &body_a, &hit);
            }
        }
    }

    fn collide_single(&mut self, pool: PoolId, single: SingleId, mode: CollisionMode) {
        let Some(capacity) = self.pools.get(pool.0).map(|p| p.capacity()) else {
            return;
        };
        for i in 0..capacity {
            let Some(other) = self.singles.get(single.0).map(|s| s.entity()) else {
                return;
            };
            if !other.is_active() {
                return;
            }
            let Some(body) = self.body_in(pool, i) else {
                continue;
            };
            let Some(hit) = test_bodies(body, other.body(), mode) else {
                continue;
            };
            let other_body = other.body().clone();
            self.notify_slot(pool, i, &other_body, &hit);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
