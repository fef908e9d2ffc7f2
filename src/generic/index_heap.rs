/*!
A max-heap over a dense index space with externally revised keys.

The heap stores indices (e.g. atoms) while ordering is given by a key stored per index.
Keys may be revised while an index is off the heap, or revised and followed by a call to
[update](IndexHeap::update) while the index is on the heap.

A companion vector tracks the position of each index on the heap, so membership checks
and targeted sift operations are constant-time lookups.

```rust
# use otter_qbf::generic::index_heap::IndexHeap;
let mut heap = IndexHeap::default();
heap.grow_to(10, 0_i32);

heap.revise_key(3, 60);
heap.revise_key(7, 10);
heap.insert(3);
heap.insert(7);

assert!(heap.contains(3));
assert_eq!(heap.peek_best(), Some(3));

heap.revise_key(7, 90);
heap.update(7);
assert_eq!(heap.pop_best(), Some(7));
assert_eq!(heap.pop_best(), Some(3));
assert_eq!(heap.pop_best(), None);
```
*/

/// Marker for an index not present on the heap.
const ABSENT: u32 = u32::MAX;

/// A max-heap over a dense index space with externally revised keys.
#[derive(Default)]
pub struct IndexHeap<K: PartialOrd + Clone> {
    keys: Vec<K>,
    position: Vec<u32>,
    heap: Vec<u32>,
}

impl<K: PartialOrd + Clone> IndexHeap<K> {
    /// Extends the index space up to (and including) `index`, keying fresh indices with
    /// `default`.
    pub fn grow_to(&mut self, index: usize, default: K) {
        while self.keys.len() <= index {
            self.keys.push(default.clone());
            self.position.push(ABSENT);
        }
    }

    /// The key of `index`.
    pub fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    /// Sets the key of `index` without touching its heap position.
    ///
    /// Call [update](IndexHeap::update) afterwards if `index` may be on the heap.
    pub fn revise_key(&mut self, index: usize, key: K) {
        self.keys[index] = key;
    }

    /// Applies `f` to every key.
    ///
    /// The heap order is preserved whenever `f` is monotone, e.g. a uniform rescale.
    pub fn apply_to_keys(&mut self, f: impl Fn(&K) -> K) {
        for key in self.keys.iter_mut() {
            *key = f(key);
        }
    }

    /// True if `index` is on the heap, false otherwise.
    pub fn contains(&self, index: usize) -> bool {
        self.position.get(index).is_some_and(|p| *p != ABSENT)
    }

    /// True if the heap holds no indices, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Places `index` on the heap, if not already present.
    /// Returns true if the index was fresh to the heap, false otherwise.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.contains(index) {
            false
        } else {
            let slot = self.heap.len();
            self.heap.push(index as u32);
            self.position[index] = slot as u32;
            self.sift_up(slot);
            true
        }
    }

    /// Restores the heap order around `index` after a key revision, if present.
    pub fn update(&mut self, index: usize) {
        let slot = self.position[index];
        if slot != ABSENT {
            let slot = self.sift_up(slot as usize);
            self.sift_down(slot);
        }
    }

    /// The index with the greatest key, if any.
    pub fn peek_best(&self) -> Option<usize> {
        self.heap.first().map(|index| *index as usize)
    }

    /// Removes and returns the index with the greatest key, if any.
    pub fn pop_best(&mut self) -> Option<usize> {
        let best = *self.heap.first()? as usize;
        self.remove(best);
        Some(best)
    }

    /// Removes `index` from the heap, if present.
    /// Returns true if `index` was removed, false otherwise.
    pub fn remove(&mut self, index: usize) -> bool {
        let slot = self.position[index];
        if slot == ABSENT {
            return false;
        }
        let slot = slot as usize;
        let last = self.heap.len() - 1;

        self.heap.swap(slot, last);
        self.position[self.heap[slot] as usize] = slot as u32;
        self.position[index] = ABSENT;
        self.heap.pop();

        if slot < self.heap.len() {
            let slot = self.sift_up(slot);
            self.sift_down(slot);
        }
        true
    }

    /// Removes every index from the heap, keeping the keys.
    pub fn clear(&mut self) {
        for index in self.heap.drain(..) {
            self.position[index as usize] = ABSENT;
        }
    }

    fn greater(&self, a: usize, b: usize) -> bool {
        let a = &self.keys[self.heap[a] as usize];
        let b = &self.keys[self.heap[b] as usize];
        matches!(a.partial_cmp(b), Some(std::cmp::Ordering::Greater))
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a] as usize] = a as u32;
        self.position[self.heap[b] as usize] = b as u32;
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.greater(slot, parent) {
                self.swap_slots(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;

            let mut swap = slot;
            if self.greater(left, swap) {
                swap = left;
            }
            if right < self.heap.len() && self.greater(right, swap) {
                swap = right;
            }

            if swap == slot {
                break;
            }
            self.swap_slots(slot, swap);
            slot = swap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(keys: &[(usize, i32)]) -> IndexHeap<i32> {
        let mut heap = IndexHeap::default();
        for (index, key) in keys {
            heap.grow_to(*index, 0);
            heap.revise_key(*index, *key);
            heap.insert(*index);
        }
        heap
    }

    #[test]
    fn pops_in_key_order() {
        let mut heap = fresh(&[(6, 10), (5, 20), (4, 30), (1, 60), (0, 70)]);

        assert_eq!(heap.pop_best(), Some(0));
        assert_eq!(heap.pop_best(), Some(1));
        assert_eq!(heap.pop_best(), Some(4));
        assert_eq!(heap.pop_best(), Some(5));
        assert_eq!(heap.pop_best(), Some(6));
        assert!(heap.pop_best().is_none());
    }

    #[test]
    fn update_reorders() {
        let mut heap = fresh(&[(0, 70), (1, 60), (4, 30)]);

        heap.revise_key(4, 100);
        heap.update(4);
        assert_eq!(heap.peek_best(), Some(4));

        heap.revise_key(4, 0);
        heap.update(4);
        assert_eq!(heap.peek_best(), Some(0));
    }

    #[test]
    fn remove_and_reinsert() {
        let mut heap = fresh(&[(0, 1), (1, 2), (2, 3)]);

        assert!(heap.remove(1));
        assert!(!heap.remove(1));
        assert!(!heap.contains(1));

        assert!(heap.insert(1));
        assert!(!heap.insert(1));
        assert_eq!(heap.pop_best(), Some(2));
        assert_eq!(heap.pop_best(), Some(1));
        assert_eq!(heap.pop_best(), Some(0));
    }

    #[test]
    fn sparse_growth() {
        let mut heap = IndexHeap::default();
        heap.grow_to(600, 0);
        heap.revise_key(600, 10);
        heap.revise_key(0, 70);
        heap.insert(600);
        heap.insert(0);

        assert_eq!(heap.pop_best(), Some(0));
        assert_eq!(heap.pop_best(), Some(600));
        assert!(heap.pop_best().is_none());
    }
}
