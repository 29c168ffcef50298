//! G-machine compiler
//!
//! Every supercombinator is translated with three schemes:
//! - `C`: build the expression's graph without evaluating it
//! - `E`: leave the expression's value on the stack, with direct code for
//!   saturated arithmetic, comparisons and `if`
//! - `R`: evaluate a body in tail position, update the redex root and unwind
//!
//! Local variables are addressed by their depth below the top of the stack.
//! An environment maps each name to that depth and has to be shifted every
//! time generated code pushes something that stays on the stack while a
//! later subexpression runs.

use super::instruction::{Instruction, PrimOp, BINARY_PRIMS};
use super::node::GmNode;
use super::state::GmState;
use crate::interpreter::errors::CompileError;
use crate::language::{prelude, Expr, Name, Program, ScDefn};
use crate::memory::heap::Heap;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

/// Local variable name to stack depth
type Env = FxHashMap<Name, usize>;

fn arg_offset(n: usize, env: &Env) -> Env {
    env.iter()
        .map(|(name, depth)| (name.clone(), depth + n))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    Lazy,
    Strict,
}

pub fn compile(program: &Program) -> Result<GmState, CompileError> {
    if let Some(name) = program.duplicate_name() {
        return Err(CompileError::DuplicateDefinition { name: name.clone() });
    }
    let main = program.get("main").ok_or(CompileError::MissingMain)?;
    if main.arity() > 0 {
        return Err(CompileError::MainTakesArguments {
            arity: main.arity(),
        });
    }

    let library = prelude::base();
    let definitions = program.with_prelude(&library);

    // a program may redefine an operator; its uses then go through the global
    let shadowed: FxHashSet<Name> = primitives()
        .into_iter()
        .map(|(name, _, _)| name)
        .filter(|name| program.defines(name.as_str()))
        .collect();

    let mut heap = Heap::new();
    let mut globals = FxHashMap::default();

    for def in &definitions {
        let code = compile_definition(def, &shadowed)?;
        let addr = heap.alloc(GmNode::Global {
            name: def.name.clone(),
            arity: def.arity(),
            code: code.into(),
        });
        globals.insert(def.name.clone(), addr);
    }

    let mut primitive_count = 0;
    for (name, arity, code) in primitives() {
        if globals.contains_key(&name) {
            continue;
        }
        let addr = heap.alloc(GmNode::Global {
            name: name.clone(),
            arity,
            code: code.into(),
        });
        globals.insert(name, addr);
        primitive_count += 1;
    }

    debug!(
        "gm: compiled {} definitions and {} primitives",
        definitions.len(),
        primitive_count
    );

    let initial = [Instruction::PushGlobal(Name::new("main")), Instruction::Eval];
    Ok(GmState::new(initial, heap, globals))
}

/// Code for one supercombinator: parameter `i` starts at depth `i`
pub fn compile_definition(
    def: &ScDefn,
    shadowed: &FxHashSet<Name>,
) -> Result<Vec<Instruction>, CompileError> {
    let env: Env = def
        .params
        .iter()
        .enumerate()
        .map(|(depth, param)| (param.clone(), depth))
        .collect();
    let compiler = Compiler {
        definition: &def.name,
        shadowed,
    };
    let mut code = Vec::new();
    compiler.compile_r(&def.body, &env, def.arity(), &mut code)?;
    Ok(code)
}

/// Fixed code for the built-in operators
fn primitives() -> Vec<(Name, usize, Vec<Instruction>)> {
    use Instruction::*;

    let mut prims = vec![(
        Name::new("negate"),
        1,
        vec![Push(0), Eval, Prim(PrimOp::Neg), Update(1), Pop(1), Unwind],
    )];
    for (name, op) in BINARY_PRIMS {
        prims.push((
            Name::new(name),
            2,
            vec![Push(0), Eval, Push(2), Eval, Prim(*op), Update(2), Pop(2), Unwind],
        ));
    }
    prims.push((
        Name::new("if"),
        3,
        vec![
            Push(0),
            Eval,
            Cond {
                then_code: vec![Push(1)],
                else_code: vec![Push(2)],
            },
            Update(3),
            Pop(3),
            Unwind,
        ],
    ));
    prims
}

struct Compiler<'a> {
    definition: &'a Name,
    shadowed: &'a FxHashSet<Name>,
}

impl Compiler<'_> {
    fn unsupported(&self, expr: &Expr) -> CompileError {
        CompileError::Unsupported {
            construct: expr.construct_name(),
            definition: self.definition.clone(),
        }
    }

    /// The name refers to the built-in operator, not a local or a program
    /// definition
    fn is_builtin(&self, name: &Name, env: &Env) -> bool {
        !env.contains_key(name) && !self.shadowed.contains(name)
    }

    fn compile_r(
        &self,
        expr: &Expr,
        env: &Env,
        arity: usize,
        code: &mut Vec<Instruction>,
    ) -> Result<(), CompileError> {
        self.compile_e(expr, env, code)?;
        code.push(Instruction::Update(arity));
        code.push(Instruction::Pop(arity));
        code.push(Instruction::Unwind);
        Ok(())
    }

    fn compile_e(&self, expr: &Expr, env: &Env, code: &mut Vec<Instruction>) -> Result<(), CompileError> {
        match expr {
            Expr::Number(n) => {
                code.push(Instruction::PushInt(*n));
                return Ok(());
            }
            Expr::Let {
                is_recursive,
                definitions,
                body,
            } => return self.compile_let(*is_recursive, definitions, body, env, code, Context::Strict),
            _ => {}
        }

        if let (Expr::Variable(op), args) = expr.spine() {
            if self.is_builtin(op, env) {
                match (op.as_str(), args.as_slice()) {
                    ("negate", [operand]) => {
                        self.compile_e(operand, env, code)?;
                        code.push(Instruction::Prim(PrimOp::Neg));
                        return Ok(());
                    }
                    ("if", [condition, then_branch, else_branch]) => {
                        self.compile_e(condition, env, code)?;
                        let mut then_code = Vec::new();
                        self.compile_e(then_branch, env, &mut then_code)?;
                        let mut else_code = Vec::new();
                        self.compile_e(else_branch, env, &mut else_code)?;
                        code.push(Instruction::Cond {
                            then_code,
                            else_code,
                        });
                        return Ok(());
                    }
                    (name, [left, right]) => {
                        if let Some(prim) = PrimOp::binary(name) {
                            self.compile_e(left, env, code)?;
                            self.compile_e(right, &arg_offset(1, env), code)?;
                            code.push(Instruction::Prim(prim));
                            return Ok(());
                        }
                    }
                    _ => {}
                }
            }
        }

        self.compile_c(expr, env, code)?;
        code.push(Instruction::Eval);
        Ok(())
    }

    fn compile_c(&self, expr: &Expr, env: &Env, code: &mut Vec<Instruction>) -> Result<(), CompileError> {
        match expr {
            Expr::Variable(name) => code.push(match env.get(name) {
                Some(depth) => Instruction::Push(*depth),
                None => Instruction::PushGlobal(name.clone()),
            }),
            Expr::Number(n) => code.push(Instruction::PushInt(*n)),
            Expr::Application(function, argument) => {
                self.compile_c(argument, env, code)?;
                self.compile_c(function, &arg_offset(1, env), code)?;
                code.push(Instruction::MkAp);
            }
            Expr::Let {
                is_recursive,
                definitions,
                body,
            } => self.compile_let(*is_recursive, definitions, body, env, code, Context::Lazy)?,
            Expr::Constructor { .. } | Expr::Lambda { .. } | Expr::Case { .. } => {
                return Err(self.unsupported(expr))
            }
        }
        Ok(())
    }

    fn compile_let(
        &self,
        is_recursive: bool,
        definitions: &[(Name, Expr)],
        body: &Expr,
        env: &Env,
        code: &mut Vec<Instruction>,
        context: Context,
    ) -> Result<(), CompileError> {
        let n = definitions.len();
        let mut body_env = arg_offset(n, env);
        for (i, (name, _)) in definitions.iter().enumerate() {
            body_env.insert(name.clone(), n - 1 - i);
        }

        if is_recursive {
            code.push(Instruction::Alloc(n));
            for (i, (_, definition)) in definitions.iter().enumerate() {
                self.compile_c(definition, &body_env, code)?;
                code.push(Instruction::Update(n - 1 - i));
            }
        } else {
            for (i, (_, definition)) in definitions.iter().enumerate() {
                self.compile_c(definition, &arg_offset(i, env), code)?;
            }
        }

        match context {
            Context::Lazy => self.compile_c(body, &body_env, code)?,
            Context::Strict => self.compile_e(body, &body_env, code)?,
        }
        code.push(Instruction::Slide(n));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::errors::CompileError;
    use Instruction::*;

    fn code_for(def: ScDefn) -> Vec<Instruction> {
        compile_definition(&def, &FxHashSet::default()).unwrap()
    }

    #[test]
    fn test_parameters_are_addressed_by_depth() {
        // K x y = x
        let code = code_for(ScDefn::new(
            "K",
            vec![Name::new("x"), Name::new("y")],
            Expr::var("x"),
        ));
        assert_eq!(code, vec![Push(0), Eval, Update(2), Pop(2), Unwind]);
    }

    #[test]
    fn test_application_shifts_environment() {
        // S f g x = f x (g x)
        let body = Expr::ap2(
            Expr::var("f"),
            Expr::var("x"),
            Expr::ap(Expr::var("g"), Expr::var("x")),
        );
        let code = code_for(ScDefn::new(
            "S",
            vec![Name::new("f"), Name::new("g"), Name::new("x")],
            body,
        ));
        assert_eq!(
            code,
            vec![
                Push(2),
                Push(2),
                MkAp,
                Push(3),
                Push(2),
                MkAp,
                MkAp,
                Eval,
                Update(3),
                Pop(3),
                Unwind
            ]
        );
    }

    #[test]
    fn test_strict_arithmetic_and_if() {
        // f n = if (n == 0) 1 (n - 1)
        let body = Expr::apply(
            Expr::var("if"),
            [
                Expr::binary("==", Expr::var("n"), Expr::num(0)),
                Expr::num(1),
                Expr::binary("-", Expr::var("n"), Expr::num(1)),
            ],
        );
        let code = code_for(ScDefn::new("f", vec![Name::new("n")], body));
        assert_eq!(
            code,
            vec![
                Push(0),
                Eval,
                PushInt(0),
                Prim(PrimOp::Eq),
                Cond {
                    then_code: vec![PushInt(1)],
                    else_code: vec![Push(0), Eval, PushInt(1), Prim(PrimOp::Sub)],
                },
                Update(1),
                Pop(1),
                Unwind
            ]
        );
    }

    #[test]
    fn test_letrec_allocates_and_updates_slots() {
        // f x = letrec a = x; b = a in b
        let body = Expr::letrec_in(
            vec![(Name::new("a"), Expr::var("x")), (Name::new("b"), Expr::var("a"))],
            Expr::var("b"),
        );
        let code = code_for(ScDefn::new("f", vec![Name::new("x")], body));
        assert_eq!(
            code,
            vec![
                Alloc(2),
                Push(2),
                Update(1),
                Push(1),
                Update(0),
                Push(0),
                Eval,
                Slide(2),
                Update(1),
                Pop(1),
                Unwind
            ]
        );
    }

    #[test]
    fn test_let_definitions_see_shifted_environment() {
        // f x = let a = x; b = x in a
        let body = Expr::let_in(
            vec![(Name::new("a"), Expr::var("x")), (Name::new("b"), Expr::var("x"))],
            Expr::var("a"),
        );
        let code = code_for(ScDefn::new("f", vec![Name::new("x")], body));
        assert_eq!(
            code[..5],
            [Push(0), Push(1), Push(1), Eval, Slide(2)]
        );
    }

    #[test]
    fn test_shadowed_operator_is_called_as_global() {
        let shadowed: FxHashSet<Name> = [Name::new("+")].into_iter().collect();
        let def = ScDefn::new("main", vec![], Expr::binary("+", Expr::num(1), Expr::num(2)));
        let code = compile_definition(&def, &shadowed).unwrap();
        assert_eq!(
            code,
            vec![
                PushInt(2),
                PushInt(1),
                PushGlobal(Name::new("+")),
                MkAp,
                MkAp,
                Eval,
                Update(0),
                Pop(0),
                Unwind
            ]
        );
    }

    #[test]
    fn test_constructors_are_rejected() {
        let program = Program::new(vec![ScDefn::new("main", vec![], Expr::pack(1, 0))]);
        assert_eq!(
            compile(&program).unwrap_err(),
            CompileError::Unsupported {
                construct: "constructor",
                definition: Name::new("main")
            }
        );
    }

    #[test]
    fn test_initial_state() {
        let program = Program::new(vec![ScDefn::new("main", vec![], Expr::num(1))]);
        let state = compile(&program).unwrap();
        assert_eq!(
            state.code.iter().cloned().collect::<Vec<_>>(),
            vec![PushGlobal(Name::new("main")), Eval]
        );
        assert!(state.stack.is_empty());
        assert!(state.globals.contains_key("twice"));
        assert!(state.globals.contains_key(">="));
        assert!(!state.globals.contains_key("MkPair"));
    }
}
