use crate::api::types::SlotId;
use crate::components::entity::Entity;
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;
use crate::tilemap::Map;

/// Fixed-capacity storage of reusable entities.
///
/// Every slot is created up front and never reallocated; spawning flips the
/// first inactive slot back on.
pub struct EntityPool<E: Entity> {
    slots: Vec<E>,
}

impl<E: Entity> EntityPool<E> {
    /// Fill `capacity` slots from `factory`. All slots start inactive.
    pub fn new(capacity: usize, mut factory: impl FnMut() -> E) -> Self {
        let slots = (0..capacity)
            .map(|_| {
                let mut entity = factory();
                entity.body_mut().active = false;
                entity
            })
            .collect();
        Self { slots }
    }

    /// Reuse the first inactive slot: `reset`, then `init`, then mark active.
    /// Returns None and changes nothing when every slot is active.
    pub fn spawn(&mut self, init: impl FnOnce(&mut E)) -> Option<SlotId> {
        let Some(index) = self.slots.iter().position(|e| !e.is_active()) else {
            log::debug!("entity pool exhausted ({} slots)", self.slots.len());
            return None;
        };
        self.slots[index].reset();
        init(&mut self.slots[index]);
        self.slots[index].body_mut().active = true;
        Some(SlotId(index))
    }

    /// Deactivate a slot. Returns false if it was already inactive or out of range.
    pub fn despawn(&mut self, slot: SlotId) -> bool {
        match self.slots.get_mut(slot.0) {
            Some(entity) if entity.is_active() => {
                entity.body_mut().active = false;
                true
            }
            _ => false,
        }
    }

    /// Any slot, active or not.
    pub fn get(&self, slot: SlotId) -> Option<&E> {
        self.slots.get(slot.0)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut E> {
        self.slots.get_mut(slot.0)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &E)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_active())
            .map(|(i, e)| (SlotId(i), e))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut E)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| e.is_active())
            .map(|(i, e)| (SlotId(i), e))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|e| e.is_active()).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|e| e.is_active())
    }

    pub fn update(&mut self, dt: f32, map: Option<&Map>) {
        for entity in self.slots.iter_mut().filter(|e| e.is_active()) {
            entity.update(dt, map);
        }
    }

    pub fn handle_input(&mut self, input: &InputQueue) {
        for entity in self.slots.iter_mut().filter(|e| e.is_active()) {
            entity.handle_input(input);
        }
    }

    pub fn draw(&self, buffer: &mut RenderBuffer) {
        for entity in self.slots.iter().filter(|e| e.is_active()) {
            entity.draw(buffer);
        }
    }

    /// Deactivate every slot.
    pub fn clear(&mut self) {
        for entity in &mut self.slots {
            entity.body_mut().active = false;
        }
    }
}
