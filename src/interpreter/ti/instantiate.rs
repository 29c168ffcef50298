//! Graph construction from supercombinator bodies
//!
//! [`instantiate`] turns an expression into heap nodes under an environment
//! binding names to addresses. When a target address is supplied the top node
//! of the new graph is written over the target instead of being allocated;
//! this is how a redex root is updated with its result.

use super::node::{Primitive, TiNode};
use crate::interpreter::errors::EvalError;
use crate::language::{Expr, Name};
use crate::memory::{heap::Heap, Addr, PLACEHOLDER};
use rustc_hash::FxHashMap;

/// Local bindings layered over the global table
#[derive(Debug, Clone)]
pub struct Env<'a> {
    globals: &'a FxHashMap<Name, Addr>,
    locals: FxHashMap<Name, Addr>,
}

impl<'a> Env<'a> {
    pub fn new(globals: &'a FxHashMap<Name, Addr>) -> Self {
        Env {
            globals,
            locals: FxHashMap::default(),
        }
    }

    pub fn bind(&mut self, name: Name, addr: Addr) {
        self.locals.insert(name, addr);
    }

    pub fn lookup(&self, name: &Name) -> Result<Addr, EvalError> {
        self.locals
            .get(name)
            .or_else(|| self.globals.get(name))
            .copied()
            .ok_or_else(|| EvalError::UnboundName { name: name.clone() })
    }
}

pub fn instantiate(
    expr: &Expr,
    heap: &mut Heap<TiNode>,
    env: &Env<'_>,
    target: Option<Addr>,
) -> Result<Addr, EvalError> {
    match expr {
        Expr::Number(n) => heap.alloc_or_update(target, TiNode::Number(*n)),
        Expr::Application(function, argument) => {
            let function = instantiate(function, heap, env, None)?;
            let argument = instantiate(argument, heap, env, None)?;
            heap.alloc_or_update(target, TiNode::Application(function, argument))
        }
        Expr::Variable(name) => {
            let bound = env.lookup(name)?;
            match target {
                None => Ok(bound),
                Some(target) => {
                    heap.update(target, TiNode::Indirection(bound))?;
                    Ok(target)
                }
            }
        }
        Expr::Constructor { tag, arity } => heap.alloc_or_update(
            target,
            TiNode::Primitive {
                name: Name::new("Pack"),
                primitive: Primitive::Constructor {
                    tag: *tag,
                    arity: *arity,
                },
            },
        ),
        Expr::Let {
            is_recursive: false,
            definitions,
            body,
        } => {
            let mut inner = env.clone();
            for (name, value) in definitions {
                let addr = instantiate(value, heap, env, None)?;
                inner.bind(name.clone(), addr);
            }
            instantiate(body, heap, &inner, target)
        }
        Expr::Let {
            is_recursive: true,
            definitions,
            body,
        } => {
            // bind every name to a placeholder before building any definition
            let mut inner = env.clone();
            let slots: Vec<Addr> = definitions
                .iter()
                .map(|(name, _)| {
                    let slot = heap.alloc(TiNode::Indirection(PLACEHOLDER));
                    inner.bind(name.clone(), slot);
                    slot
                })
                .collect();
            for ((_, value), slot) in definitions.iter().zip(slots) {
                instantiate(value, heap, &inner, Some(slot))?;
            }
            instantiate(body, heap, &inner, target)
        }
        Expr::Lambda { .. } | Expr::Case { .. } => Err(EvalError::UnsupportedExpression {
            construct: expr.construct_name(),
        }),
    }
}
