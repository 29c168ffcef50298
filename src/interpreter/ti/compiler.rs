//! Template instantiation compiler
//!
//! Builds the initial machine state: one `Supercombinator` node for every
//! program and prelude definition, one `Primitive` node for every built-in
//! name, and a stack holding only the address of `main`.

use super::node::{TiNode, NAMED_PRIMITIVES};
use super::state::TiState;
use crate::interpreter::errors::CompileError;
use crate::language::{prelude, Expr, Name, Program, ScDefn};
use crate::memory::heap::Heap;
use log::debug;
use rustc_hash::FxHashMap;
use std::rc::Rc;

pub fn compile(program: &Program) -> Result<TiState, CompileError> {
    if let Some(name) = program.duplicate_name() {
        return Err(CompileError::DuplicateDefinition { name: name.clone() });
    }
    let main = program.get("main").ok_or(CompileError::MissingMain)?;
    if main.arity() > 0 {
        return Err(CompileError::MainTakesArguments {
            arity: main.arity(),
        });
    }

    let library: Vec<ScDefn> = prelude::base().into_iter().chain(prelude::data()).collect();
    let definitions = program.with_prelude(&library);

    let mut heap = Heap::new();
    let mut globals: FxHashMap<Name, usize> = FxHashMap::default();

    for def in &definitions {
        check_supported(def)?;
        let addr = heap.alloc(TiNode::Supercombinator {
            name: def.name.clone(),
            params: def.params.iter().cloned().collect(),
            body: Rc::new(def.body.clone()),
        });
        globals.insert(def.name.clone(), addr);
    }

    // definitions shadow primitives of the same name
    for (name, primitive) in NAMED_PRIMITIVES {
        if !globals.contains_key(*name) {
            let name = Name::new(name);
            let addr = heap.alloc(TiNode::Primitive {
                name: name.clone(),
                primitive: *primitive,
            });
            globals.insert(name, addr);
        }
    }

    let entry = globals
        .get("main")
        .copied()
        .ok_or(CompileError::MissingMain)?;

    debug!(
        "ti: compiled {} definitions and {} primitives into {} heap nodes",
        definitions.len(),
        globals.len() - definitions.len(),
        heap.len()
    );

    Ok(TiState::new(heap, globals, entry))
}

/// Case expressions and lambdas have no instantiation rule
fn check_supported(def: &ScDefn) -> Result<(), CompileError> {
    match def
        .body
        .find(&|e| matches!(e, Expr::Case { .. } | Expr::Lambda { .. }))
    {
        Some(expr) => Err(CompileError::Unsupported {
            construct: expr.construct_name(),
            definition: def.name.clone(),
        }),
        None => Ok(()),
    }
}
