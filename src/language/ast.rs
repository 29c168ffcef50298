// AST definitions for the Core language

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// Infix operators the parser desugars into curried applications of a
/// variable with the same name.
pub const BINARY_OPERATORS: &[&str] = &[
    "|", "&", "==", "~=", ">", ">=", "<", "<=", "+", "-", "*", "/",
];

/// Interned identifier with value equality.
///
/// Cloning is a reference-count bump, so names can be freely copied into heap
/// nodes and instruction streams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Rc<str>);

impl Name {
    pub fn new(name: &str) -> Self {
        Name(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Name::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Name(Rc::from(name))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Core expression, generic over the binder type used at binding sites
/// (supercombinator/lambda parameters, let definitions, case alternatives).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<B = Name> {
    Number(i64),
    Variable(Name),
    Application(Box<Expr<B>>, Box<Expr<B>>),
    /// `Pack{tag,arity}`
    Constructor {
        tag: u32,
        arity: usize,
    },
    Lambda {
        params: Vec<B>,
        body: Box<Expr<B>>,
    },
    Let {
        is_recursive: bool,
        definitions: Vec<(B, Expr<B>)>,
        body: Box<Expr<B>>,
    },
    Case {
        scrutinee: Box<Expr<B>>,
        alternatives: Vec<Alternative<B>>,
    },
}

/// One arm of a `case`: `<tag> params -> body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative<B = Name> {
    pub tag: u32,
    pub params: Vec<B>,
    pub body: Expr<B>,
}

/// Top-level function definition `name params = body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScDefn<B = Name> {
    pub name: Name,
    pub params: Vec<B>,
    pub body: Expr<B>,
}

impl<B> ScDefn<B> {
    pub fn new(name: impl Into<Name>, params: Vec<B>, body: Expr<B>) -> Self {
        ScDefn {
            name: name.into(),
            params,
            body,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A whole program. Definition order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program<B = Name> {
    pub definitions: Vec<ScDefn<B>>,
}

impl<B> Program<B> {
    pub fn new(definitions: Vec<ScDefn<B>>) -> Self {
        Program { definitions }
    }

    /// Look up a definition by name
    pub fn get(&self, name: &str) -> Option<&ScDefn<B>> {
        self.definitions.iter().find(|d| d.name.as_str() == name)
    }

    pub fn defines(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// First name defined more than once, if any.
    pub fn duplicate_name(&self) -> Option<&Name> {
        self.definitions.iter().enumerate().find_map(|(i, d)| {
            self.definitions[..i]
                .iter()
                .any(|earlier| earlier.name == d.name)
                .then_some(&d.name)
        })
    }

    /// The program's own definitions followed by every prelude definition the
    /// program does not shadow.
    pub fn with_prelude<'a>(&'a self, prelude: &'a [ScDefn<B>]) -> Vec<&'a ScDefn<B>> {
        let mut defs: Vec<&ScDefn<B>> = self.definitions.iter().collect();
        defs.extend(prelude.iter().filter(|d| !self.defines(d.name.as_str())));
        defs
    }
}

// ===== Construction helpers =====

impl<B> Expr<B> {
    pub fn num(n: i64) -> Self {
        Expr::Number(n)
    }

    pub fn var(name: &str) -> Self {
        Expr::Variable(Name::new(name))
    }

    pub fn ap(function: Expr<B>, argument: Expr<B>) -> Self {
        Expr::Application(Box::new(function), Box::new(argument))
    }

    pub fn ap2(function: Expr<B>, first: Expr<B>, second: Expr<B>) -> Self {
        Expr::ap(Expr::ap(function, first), second)
    }

    /// `function arg1 arg2 ...` as a left-nested application chain
    pub fn apply(function: Expr<B>, args: impl IntoIterator<Item = Expr<B>>) -> Self {
        args.into_iter().fold(function, Expr::ap)
    }

    /// `left op right`
    pub fn binary(op: &str, left: Expr<B>, right: Expr<B>) -> Self {
        Expr::ap2(Expr::var(op), left, right)
    }

    pub fn pack(tag: u32, arity: usize) -> Self {
        Expr::Constructor { tag, arity }
    }

    pub fn let_in(definitions: Vec<(B, Expr<B>)>, body: Expr<B>) -> Self {
        Expr::Let {
            is_recursive: false,
            definitions,
            body: Box::new(body),
        }
    }

    pub fn letrec_in(definitions: Vec<(B, Expr<B>)>, body: Expr<B>) -> Self {
        Expr::Let {
            is_recursive: true,
            definitions,
            body: Box::new(body),
        }
    }

    /// Variables, numbers and constructors never need parentheses
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            Expr::Number(_) | Expr::Variable(_) | Expr::Constructor { .. }
        )
    }

    /// Split an application chain into its head and arguments, outermost
    /// argument last: `f a b` gives `(f, [a, b])`.
    pub fn spine(&self) -> (&Expr<B>, Vec<&Expr<B>>) {
        let mut args = Vec::new();
        let mut head = self;
        while let Expr::Application(function, argument) = head {
            args.push(argument.as_ref());
            head = function;
        }
        args.reverse();
        (head, args)
    }

    /// Human-readable name of the variant, used in diagnostics
    pub fn construct_name(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number",
            Expr::Variable(_) => "variable",
            Expr::Application(..) => "application",
            Expr::Constructor { .. } => "constructor",
            Expr::Lambda { .. } => "lambda abstraction",
            Expr::Let {
                is_recursive: false,
                ..
            } => "let expression",
            Expr::Let { .. } => "letrec expression",
            Expr::Case { .. } => "case expression",
        }
    }

    /// First subexpression, in pre-order, satisfying the predicate
    pub fn find(&self, pred: &dyn Fn(&Expr<B>) -> bool) -> Option<&Expr<B>> {
        if pred(self) {
            return Some(self);
        }
        match self {
            Expr::Number(_) | Expr::Variable(_) | Expr::Constructor { .. } => None,
            Expr::Application(function, argument) => {
                function.find(pred).or_else(|| argument.find(pred))
            }
            Expr::Lambda { body, .. } => body.find(pred),
            Expr::Let {
                definitions, body, ..
            } => definitions
                .iter()
                .find_map(|(_, e)| e.find(pred))
                .or_else(|| body.find(pred)),
            Expr::Case {
                scrutinee,
                alternatives,
            } => scrutinee
                .find(pred)
                .or_else(|| alternatives.iter().find_map(|alt| alt.body.find(pred))),
        }
    }

    /// When this is `op l r` for an infix operator, return the parts
    pub fn as_binary(&self) -> Option<(&str, &Expr<B>, &Expr<B>)> {
        match self.spine() {
            (Expr::Variable(op), args) if args.len() == 2 => BINARY_OPERATORS
                .contains(&op.as_str())
                .then(|| (op.as_str(), args[0], args[1])),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_compare_by_value() {
        let a = Name::new("main");
        let b = Name::from(String::from("main"));
        assert_eq!(a, b);
        let map: rustc_hash::FxHashMap<Name, usize> = [(a, 1)].into_iter().collect();
        assert_eq!(map.get("main"), Some(&1));
    }

    #[test]
    fn test_spine_flattens_left_nested_applications() {
        let e: Expr = Expr::apply(Expr::var("S"), [Expr::var("K"), Expr::var("K"), Expr::num(3)]);
        let (head, args) = e.spine();
        assert_eq!(head, &Expr::var("S"));
        assert_eq!(args, vec![&Expr::var("K"), &Expr::var("K"), &Expr::num(3)]);
    }

    #[test]
    fn test_as_binary_recognises_operators_only() {
        let sum: Expr = Expr::binary("+", Expr::num(1), Expr::num(2));
        assert_eq!(sum.as_binary(), Some(("+", &Expr::num(1), &Expr::num(2))));

        let call: Expr = Expr::ap2(Expr::var("K"), Expr::num(1), Expr::num(2));
        assert_eq!(call.as_binary(), None);
    }

    #[test]
    fn test_user_definitions_shadow_prelude() {
        let prelude = vec![
            ScDefn::new("I", vec![Name::new("x")], Expr::var("x")),
            ScDefn::new("K", vec![Name::new("x"), Name::new("y")], Expr::var("x")),
        ];
        let program = Program::new(vec![
            ScDefn::new("I", vec![], Expr::num(7)),
            ScDefn::new("main", vec![], Expr::var("I")),
        ]);

        let merged = program.with_prelude(&prelude);
        let names: Vec<&str> = merged.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["I", "main", "K"]);
        assert_eq!(merged[0].body, Expr::num(7));
    }

    #[test]
    fn test_duplicate_definitions_are_reported() {
        let program: Program = Program::new(vec![
            ScDefn::new("f", vec![], Expr::num(1)),
            ScDefn::new("main", vec![], Expr::var("f")),
            ScDefn::new("f", vec![], Expr::num(2)),
        ]);
        assert_eq!(program.duplicate_name().map(Name::as_str), Some("f"));
    }
}
