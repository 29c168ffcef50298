//! Graph heap
//!
//! [`Heap`] maps addresses to nodes of any machine's node type. It provides:
//! - Monotonic allocation (`next = max(existing) + 1`)
//! - Overwrite of an existing address, the basis of shared updates
//! - Sweeping, used by the template instantiation collector
//!
//! Lookups of unknown addresses fail with [`EvalError::DanglingAddress`].

use super::{Addr, PLACEHOLDER};
use crate::interpreter::errors::EvalError;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heap<N> {
    nodes: FxHashMap<Addr, N>,
    next_address: Addr,
    allocations: usize,
}

impl<N> Heap<N> {
    pub fn new() -> Self {
        Heap {
            nodes: FxHashMap::default(),
            next_address: 1,
            allocations: 0,
        }
    }

    /// Store a node at a fresh address
    pub fn alloc(&mut self, node: N) -> Addr {
        let addr = self.next_address;
        self.next_address += 1;
        self.allocations += 1;
        self.nodes.insert(addr, node);
        addr
    }

    pub fn get(&self, addr: Addr) -> Result<&N, EvalError> {
        self.nodes
            .get(&addr)
            .ok_or(EvalError::DanglingAddress { address: addr })
    }

    pub fn get_mut(&mut self, addr: Addr) -> Result<&mut N, EvalError> {
        self.nodes
            .get_mut(&addr)
            .ok_or(EvalError::DanglingAddress { address: addr })
    }

    /// Overwrite the node at an existing address
    pub fn update(&mut self, addr: Addr, node: N) -> Result<(), EvalError> {
        *self.get_mut(addr)? = node;
        Ok(())
    }

    /// Overwrite `target` when given, otherwise allocate
    pub fn alloc_or_update(&mut self, target: Option<Addr>, node: N) -> Result<Addr, EvalError> {
        match target {
            Some(addr) => {
                self.update(addr, node)?;
                Ok(addr)
            }
            None => Ok(self.alloc(node)),
        }
    }

    pub fn contains(&self, addr: Addr) -> bool {
        addr != PLACEHOLDER && self.nodes.contains_key(&addr)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of allocations since the heap was created
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Address the next allocation will use
    pub fn next_address(&self) -> Addr {
        self.next_address
    }

    /// All live entries in address order
    pub fn entries(&self) -> Vec<(Addr, &N)> {
        let mut entries: Vec<(Addr, &N)> = self.nodes.iter().map(|(a, n)| (*a, n)).collect();
        entries.sort_unstable_by_key(|(a, _)| *a);
        entries
    }

    /// Drop every node the predicate rejects, then reset the allocation
    /// pointer to one past the highest surviving address.
    pub fn sweep(&mut self, mut keep: impl FnMut(Addr, &N) -> bool) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|addr, node| keep(*addr, node));
        self.next_address = self.nodes.keys().max().map_or(1, |max| max + 1);
        before - self.nodes.len()
    }
}

impl<N> Default for Heap<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_is_monotonic() {
        let mut heap = Heap::new();
        let a = heap.alloc("a");
        let b = heap.alloc("b");
        assert!(b > a);
        assert_eq!(heap.get(a), Ok(&"a"));
        assert_eq!(heap.allocations(), 2);
    }

    #[test]
    fn test_update_overwrites_in_place() {
        let mut heap = Heap::new();
        let a = heap.alloc(1);
        heap.update(a, 2).unwrap();
        assert_eq!(heap.get(a), Ok(&2));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_missing_address_is_dangling() {
        let mut heap: Heap<i32> = Heap::new();
        assert_eq!(heap.get(7), Err(EvalError::DanglingAddress { address: 7 }));
        assert!(heap.update(7, 0).is_err());
        assert!(!heap.contains(PLACEHOLDER));
    }

    #[test]
    fn test_sweep_recomputes_next_address() {
        let mut heap = Heap::new();
        let a = heap.alloc(10);
        let b = heap.alloc(20);
        let c = heap.alloc(30);

        let dropped = heap.sweep(|addr, _| addr != c);
        assert_eq!(dropped, 1);
        assert_eq!(heap.next_address(), b + 1);
        assert_eq!(heap.entries(), vec![(a, &10), (b, &20)]);
    }
}
