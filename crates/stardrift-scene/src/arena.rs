//! Generation-tagged slot arena.
//!
//! Removal is O(1) and never shifts other entries, so removing while walking
//! the arena cannot invalidate the walk. A key whose slot has been reused
//! carries a stale generation and resolves to `None`.

/// Stable handle into an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with free-list reuse.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> SlotKey {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return SlotKey {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotKey {
            index,
            generation: 0,
        }
    }

    pub fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, key: SlotKey) -> Option<&T> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        self.slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotKey {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    /// Visit every live entry; entries for which `keep` returns false are
    /// removed and handed back.
    pub fn retain_mut<F>(&mut self, mut keep: F) -> Vec<T>
    where
        F: FnMut(SlotKey, &mut T) -> bool,
    {
        let mut removed = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let key = SlotKey {
                index: index as u32,
                generation: slot.generation,
            };
            let Some(value) = slot.value.as_mut() else {
                continue;
            };
            if keep(key, value) {
                continue;
            }
            if let Some(value) = slot.value.take() {
                removed.push(value);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                self.len -= 1;
            }
        }
        removed
    }

    /// Remove every entry, returning them in slot order.
    pub fn drain(&mut self) -> Vec<T> {
        self.retain_mut(|_, _| false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_key_after_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        assert_eq!(arena.remove(a), Some("a"));
        let b = arena.insert("b");
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_retain_mut_removes_and_returns() {
        let mut arena = Arena::new();
        let keys: Vec<_> = (0..6).map(|i| arena.insert(i)).collect();
        let removed = arena.retain_mut(|_, v| {
            *v *= 10;
            *v % 20 != 0
        });
        assert_eq!(removed, vec![0, 20, 40]);
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.get(keys[1]), Some(&10));
        assert!(!arena.contains(keys[2]));
    }

    #[test]
    fn test_drain_empties() {
        let mut arena = Arena::new();
        arena.insert(1);
        arena.insert(2);
        assert_eq!(arena.drain(), vec![1, 2]);
        assert!(arena.is_empty());
        assert_eq!(arena.iter().count(), 0);
    }
}
