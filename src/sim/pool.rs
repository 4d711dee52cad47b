//! Fixed-capacity sprite slots
//!
//! Missiles and bombs are never allocated during play. Each pool owns a fixed
//! number of sprites and a slot is in use exactly when its sprite is enabled.

use super::sprite::Sprite;

#[derive(Debug, Clone)]
pub struct SlotPool {
    slots: Vec<Sprite>,
}

impl SlotPool {
    /// Create `capacity` free slots, each a disabled copy of `template`
    pub fn new(capacity: usize, template: Sprite) -> Self {
        let mut template = template;
        template.set_enabled(false);
        Self {
            slots: vec![template; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the first free slot
    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_enabled())
    }

    /// Claim the first free slot. Returns `None` when the pool is full.
    pub fn spawn(&mut self) -> Option<(usize, &mut Sprite)> {
        let index = self.first_free()?;
        let sprite = &mut self.slots[index];
        sprite.set_enabled(true);
        Some((index, sprite))
    }

    /// Release a slot back to the pool
    pub fn despawn(&mut self, index: usize) {
        if let Some(sprite) = self.slots.get_mut(index) {
            sprite.set_enabled(false);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Sprite> {
        self.slots.get_mut(index)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_enabled()).count()
    }

    /// All slots, free or not
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.slots.iter_mut()
    }

    /// Slots currently in use
    pub fn active(&self) -> impl Iterator<Item = &Sprite> {
        self.slots.iter().filter(|s| s.is_enabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprite::TextureId;

    fn pool(capacity: usize) -> SlotPool {
        SlotPool::new(capacity, Sprite::new(TextureId::Bomb, 5.0, 5.0, 0.1, 0.1))
    }

    #[test]
    fn test_new_pool_is_all_free() {
        let p = pool(3);
        assert_eq!(p.capacity(), 3);
        assert_eq!(p.active_count(), 0);
        assert_eq!(p.first_free(), Some(0));
    }

    #[test]
    fn test_spawn_takes_first_free_slot() {
        let mut p = pool(3);
        assert_eq!(p.spawn().map(|(i, _)| i), Some(0));
        assert_eq!(p.spawn().map(|(i, _)| i), Some(1));
        p.despawn(0);
        assert_eq!(p.spawn().map(|(i, _)| i), Some(0));
        assert_eq!(p.active_count(), 2);
    }

    #[test]
    fn test_spawn_on_full_pool_is_none() {
        let mut p = pool(2);
        assert!(p.spawn().is_some());
        assert!(p.spawn().is_some());
        assert!(p.spawn().is_none());
        assert_eq!(p.active_count(), 2);
    }

    #[test]
    fn test_despawn_out_of_range_is_ignored() {
        let mut p = pool(1);
        p.despawn(7);
        assert_eq!(p.active_count(), 0);
    }
}
