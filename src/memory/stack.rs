//! Address stack
//!
//! The spine of the current reduction, top at the end. Every pop checks its
//! bounds and reports a [`EvalError::StackUnderflow`] naming the operation
//! that needed the entries.

use super::Addr;
use crate::interpreter::errors::EvalError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<Addr>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    pub fn singleton(addr: Addr) -> Self {
        Stack { items: vec![addr] }
    }

    pub fn push(&mut self, addr: Addr) {
        self.items.push(addr);
    }

    pub fn pop(&mut self, context: &str) -> Result<Addr, EvalError> {
        self.items
            .pop()
            .ok_or_else(|| EvalError::stack_underflow(1, 0, context))
    }

    pub fn peek(&self, context: &str) -> Result<Addr, EvalError> {
        self.peek_at(0, context)
    }

    /// Address at `depth` below the top (0 = top)
    pub fn peek_at(&self, depth: usize, context: &str) -> Result<Addr, EvalError> {
        self.check(depth + 1, context)?;
        Ok(self.items[self.items.len() - 1 - depth])
    }

    /// Pop `n` entries, returned top first
    pub fn pop_n(&mut self, n: usize, context: &str) -> Result<Vec<Addr>, EvalError> {
        self.check(n, context)?;
        let split = self.items.len() - n;
        let mut popped = self.items.split_off(split);
        popped.reverse();
        Ok(popped)
    }

    /// Discard `n` entries
    pub fn drop_n(&mut self, n: usize, context: &str) -> Result<(), EvalError> {
        self.check(n, context)?;
        self.items.truncate(self.items.len() - n);
        Ok(())
    }

    pub fn replace_top(&mut self, addr: Addr, context: &str) -> Result<(), EvalError> {
        match self.items.last_mut() {
            Some(top) => {
                *top = addr;
                Ok(())
            }
            None => Err(EvalError::stack_underflow(1, 0, context)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries from top to bottom
    pub fn iter(&self) -> impl Iterator<Item = Addr> + '_ {
        self.items.iter().rev().copied()
    }

    /// Entries from bottom to top
    pub fn as_slice(&self) -> &[Addr] {
        &self.items
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Addr> {
        self.items.iter_mut()
    }

    fn check(&self, needed: usize, context: &str) -> Result<(), EvalError> {
        if self.items.len() < needed {
            Err(EvalError::stack_underflow(needed, self.items.len(), context))
        } else {
            Ok(())
        }
    }
}

impl From<Vec<Addr>> for Stack {
    /// Build from entries listed bottom first
    fn from(items: Vec<Addr>) -> Self {
        Stack { items }
    }
}
