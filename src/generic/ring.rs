/*!
A circular doubly-linked list over a dense id space, with id 0 as the sentinel.

Links are stored in flat arrays indexed by id, so insertion and removal are constant
time and iteration visits members in insertion order.
The structure backs the ring of currently-assigned variables used by the reward-learning
heuristics, where each assignment inserts and each unassignment removes.

```rust
# use otter_qbf::generic::ring::Ring;
let mut ring = Ring::default();
ring.grow_to(5);

ring.insert(3);
ring.insert(1);
ring.remove(3);
ring.insert(5);

assert_eq!(ring.iter().collect::<Vec<_>>(), vec![1, 5]);
```
*/

/// A circular doubly-linked list over ids `1..=n`, with 0 as the sentinel.
#[derive(Default)]
pub struct Ring {
    prev: Vec<u32>,
    next: Vec<u32>,
}

impl Ring {
    /// Extends the id space up to (and including) `id`.
    pub fn grow_to(&mut self, id: usize) {
        if self.prev.is_empty() {
            self.prev.push(0);
            self.next.push(0);
        }
        while self.prev.len() <= id {
            self.prev.push(0);
            self.next.push(0);
        }
    }

    /// Links `id` at the back of the ring.
    pub fn insert(&mut self, id: u32) {
        let last = self.prev[0];
        self.next[last as usize] = id;
        self.prev[0] = id;
        self.prev[id as usize] = last;
        self.next[id as usize] = 0;
    }

    /// Unlinks `id` from the ring.
    pub fn remove(&mut self, id: u32) {
        let prev = self.prev[id as usize];
        let next = self.next[id as usize];
        self.next[prev as usize] = next;
        self.prev[next as usize] = prev;
        self.prev[id as usize] = 0;
        self.next[id as usize] = 0;
    }

    /// An iterator over the members of the ring, in insertion order.
    pub fn iter(&self) -> RingIterator<'_> {
        RingIterator {
            ring: self,
            at: self.next.first().copied().unwrap_or(0),
        }
    }
}

/// Iterator support for [Ring].
pub struct RingIterator<'r> {
    ring: &'r Ring,
    at: u32,
}

impl Iterator for RingIterator<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        match self.at {
            0 => None,
            id => {
                self.at = self.ring.next[id as usize];
                Some(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order() {
        let mut ring = Ring::default();
        ring.grow_to(4);
        ring.insert(2);
        ring.insert(4);
        ring.insert(1);
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![2, 4, 1]);
    }

    #[test]
    fn removal() {
        let mut ring = Ring::default();
        ring.grow_to(3);
        ring.insert(1);
        ring.insert(2);
        ring.insert(3);
        ring.remove(2);
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![1, 3]);
        ring.remove(1);
        ring.remove(3);
        assert!(ring.iter().next().is_none());
    }
}
