//! Fixed-width overflow chains.
//!
//! Elements that collide on one slot are kept in a chain of [`Bucket`] nodes.
//! Each node stores three elements inline plus a fourth position that holds
//! either one more element or the next node, so a chain of `n` elements
//! needs `ceil((n - 1) / 3)` allocations.
//!
//! Chain positions are numbered across nodes: node `k` holds positions
//! `3k..3k + 3` in its inline slots, and position `3k + 3` when its tail is
//! a terminal element.
//!
//! Every node is packed low to high. If an inline slot is empty, every later
//! slot is empty and the tail is empty. Removal keeps this true by moving the
//! chain's last element into the hole.

use alloc::boxed::Box;

const INLINE: usize = 3;

/// The fourth position of a node.
pub(crate) enum Tail<T> {
    Empty,
    Item(T),
    Next(Box<Bucket<T>>),
}

/// One node of an overflow chain.
pub(crate) struct Bucket<T> {
    slots: [Option<T>; INLINE],
    tail: Tail<T>,
}

impl<T> Bucket<T> {
    /// Creates a node holding `first` and `second`.
    pub(crate) fn pair(first: T, second: T) -> Self {
        Bucket {
            slots: [Some(first), Some(second), None],
            tail: Tail::Empty,
        }
    }

    /// Returns `true` once slot 0 has been vacated.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }

    /// Number of elements in the whole chain.
    pub(crate) fn len(&self) -> usize {
        let mut len = 0;
        let mut node = self;
        loop {
            len += node.slots.iter().take_while(|slot| slot.is_some()).count();
            match &node.tail {
                Tail::Empty => return len,
                Tail::Item(_) => return len + 1,
                Tail::Next(next) => node = next,
            }
        }
    }

    /// Returns the element at chain position `index`.
    pub(crate) fn get(&self, mut index: usize) -> Option<&T> {
        let mut node = self;
        loop {
            if index < INLINE {
                return node.slots[index].as_ref();
            }
            match &node.tail {
                Tail::Next(next) => {
                    index -= INLINE;
                    node = next;
                }
                Tail::Item(item) if index == INLINE => return Some(item),
                _ => return None,
            }
        }
    }

    fn get_mut(&mut self, mut index: usize) -> Option<&mut T> {
        let mut node = self;
        loop {
            if index < INLINE {
                return node.slots[index].as_mut();
            }
            match &mut node.tail {
                Tail::Next(next) => {
                    index -= INLINE;
                    node = &mut **next;
                }
                Tail::Item(item) if index == INLINE => return Some(item),
                _ => return None,
            }
        }
    }

    /// Returns the chain position of the first element matching `eq`.
    pub(crate) fn position(&self, eq: impl Fn(&T) -> bool) -> Option<usize> {
        self.iter().position(eq)
    }

    /// Appends `value` after the last element of the chain.
    ///
    /// When the final node is full and its tail holds a terminal element, the
    /// terminal element and `value` move into a new node linked as the tail.
    /// Returns the chain position of `value`.
    pub(crate) fn push(&mut self, value: T) -> usize {
        let mut base = 0;
        let mut node = self;
        loop {
            if let Some(offset) = node.slots.iter().position(|slot| slot.is_none()) {
                node.slots[offset] = Some(value);
                return base + offset;
            }
            let tail = &mut node.tail;
            match tail {
                Tail::Next(next) => {
                    base += INLINE;
                    node = &mut **next;
                }
                Tail::Empty => {
                    *tail = Tail::Item(value);
                    return base + INLINE;
                }
                Tail::Item(_) => {
                    let Tail::Item(previous) = core::mem::replace(tail, Tail::Empty) else {
                        unreachable!("tail is neither empty nor a continuation");
                    };
                    *tail = Tail::Next(Box::new(Bucket::pair(previous, value)));
                    return base + INLINE + 1;
                }
            }
        }
    }

    /// Removes and returns the last element of the chain.
    ///
    /// A continuation node emptied by this call is unlinked from its parent.
    /// The head node is never unlinked; callers check [`Bucket::is_empty`].
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        let depth = self.depth();
        if depth > 0 && self.node(depth).slots[1].is_none() {
            let parent = self.node_mut(depth - 1);
            let Tail::Next(mut last) = core::mem::replace(&mut parent.tail, Tail::Empty) else {
                unreachable!("parent of the final node must link to it");
            };
            return last.slots[0].take();
        }

        let node = self.node_mut(depth);
        if let Tail::Item(_) = node.tail {
            let Tail::Item(item) = core::mem::replace(&mut node.tail, Tail::Empty) else {
                unreachable!();
            };
            return Some(item);
        }
        node.slots
            .iter_mut()
            .rev()
            .find(|slot| slot.is_some())
            .and_then(Option::take)
    }

    /// Removes the element at chain position `index`, filling the hole with
    /// the chain's last element.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<T> {
        let last_index = self.len().checked_sub(1)?;
        if index > last_index {
            return None;
        }
        let last = self.remove_last()?;
        if index == last_index {
            return Some(last);
        }
        self.get_mut(index)
            .map(|hole| core::mem::replace(hole, last))
    }

    /// Returns an iterator over the chain in position order.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            node: Some(self),
            offset: 0,
        }
    }

    /// Number of continuation links between the head and the final node.
    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Tail::Next(next) = &node.tail {
            depth += 1;
            node = next;
        }
        depth
    }

    fn node(&self, depth: usize) -> &Bucket<T> {
        let mut node = self;
        for _ in 0..depth {
            match &node.tail {
                Tail::Next(next) => node = next,
                _ => unreachable!("chain is shorter than the requested depth"),
            }
        }
        node
    }

    fn node_mut(&mut self, depth: usize) -> &mut Bucket<T> {
        let mut node = self;
        for _ in 0..depth {
            match &mut node.tail {
                Tail::Next(next) => node = &mut **next,
                _ => unreachable!("chain is shorter than the requested depth"),
            }
        }
        node
    }
}

impl<T: Clone> Clone for Bucket<T> {
    fn clone(&self) -> Self {
        let mut head = Bucket {
            slots: self.slots.clone(),
            tail: Tail::Empty,
        };
        let mut dst = &mut head;
        let mut src = self;
        loop {
            match &src.tail {
                Tail::Next(next) => {
                    dst.tail = Tail::Next(Box::new(Bucket {
                        slots: next.slots.clone(),
                        tail: Tail::Empty,
                    }));
                    let Tail::Next(copy) = &mut dst.tail else {
                        unreachable!();
                    };
                    dst = &mut **copy;
                    src = next;
                }
                Tail::Item(item) => {
                    dst.tail = Tail::Item(item.clone());
                    return head;
                }
                Tail::Empty => return head,
            }
        }
    }
}

impl<T> Drop for Bucket<T> {
    fn drop(&mut self) {
        // Unlink iteratively so long chains cannot overflow the stack.
        let mut tail = core::mem::replace(&mut self.tail, Tail::Empty);
        while let Tail::Next(mut next) = tail {
            tail = core::mem::replace(&mut next.tail, Tail::Empty);
        }
    }
}

/// Borrowing iterator over one chain.
pub(crate) struct Iter<'a, T> {
    node: Option<&'a Bucket<T>>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        if self.offset < INLINE {
            let item = node.slots[self.offset].as_ref();
            self.offset += 1;
            if item.is_none() {
                self.node = None;
            }
            return item;
        }

        self.offset = 0;
        match &node.tail {
            Tail::Next(next) => {
                self.node = Some(next);
                self.next()
            }
            Tail::Item(item) => {
                self.node = None;
                Some(item)
            }
            Tail::Empty => {
                self.node = None;
                None
            }
        }
    }
}

/// Owning iterator over one chain, used when rehashing and draining.
pub(crate) struct IntoIter<T> {
    node: Option<Box<Bucket<T>>>,
    offset: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(bucket: Box<Bucket<T>>) -> Self {
        IntoIter {
            node: Some(bucket),
            offset: 0,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.node.as_mut()?;
            if self.offset < INLINE {
                let item = node.slots[self.offset].take();
                self.offset += 1;
                if item.is_none() {
                    self.node = None;
                }
                return item;
            }

            self.offset = 0;
            match core::mem::replace(&mut node.tail, Tail::Empty) {
                Tail::Next(next) => self.node = Some(next),
                Tail::Item(item) => {
                    self.node = None;
                    return Some(item);
                }
                Tail::Empty => {
                    self.node = None;
                    return None;
                }
            }
        }
    }
}
