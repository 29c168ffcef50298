//! Standard definitions added to every program.
//!
//! [`base`] holds the classic combinators and is loaded by both engines.
//! [`data`] adds booleans, pairs and lists on top of the template
//! instantiation primitives (`if`, `casePair`, `caseList`, `print`, ...), so
//! only the graph reducer loads it.
//!
//! A program definition with the same name as a prelude definition replaces it.

use super::ast::{Expr, Name, ScDefn};

fn sc(name: &str, params: &[&str], body: Expr) -> ScDefn {
    ScDefn::new(name, params.iter().map(|p| Name::new(p)).collect(), body)
}

fn v(name: &str) -> Expr {
    Expr::var(name)
}

/// `I`, `K`, `K1`, `S`, `compose`, `twice`
pub fn base() -> Vec<ScDefn> {
    vec![
        // I x = x
        sc("I", &["x"], v("x")),
        // K x y = x
        sc("K", &["x", "y"], v("x")),
        // K1 x y = y
        sc("K1", &["x", "y"], v("y")),
        // S f g x = f x (g x)
        sc(
            "S",
            &["f", "g", "x"],
            Expr::ap2(v("f"), v("x"), Expr::ap(v("g"), v("x"))),
        ),
        // compose f g x = f (g x)
        sc(
            "compose",
            &["f", "g", "x"],
            Expr::ap(v("f"), Expr::ap(v("g"), v("x"))),
        ),
        // twice f = compose f f
        sc("twice", &["f"], Expr::ap2(v("compose"), v("f"), v("f"))),
    ]
}

/// Booleans, pairs and lists encoded with `Pack` and the case primitives.
pub fn data() -> Vec<ScDefn> {
    vec![
        sc("False", &[], Expr::pack(1, 0)),
        sc("True", &[], Expr::pack(2, 0)),
        // and x y = if x y False
        sc("and", &["x", "y"], Expr::apply(v("if"), [v("x"), v("y"), v("False")])),
        sc("&", &["x", "y"], Expr::apply(v("if"), [v("x"), v("y"), v("False")])),
        // or x y = if x True y
        sc("or", &["x", "y"], Expr::apply(v("if"), [v("x"), v("True"), v("y")])),
        sc("|", &["x", "y"], Expr::apply(v("if"), [v("x"), v("True"), v("y")])),
        // not x = if x False True
        sc("not", &["x"], Expr::apply(v("if"), [v("x"), v("False"), v("True")])),
        sc("MkPair", &[], Expr::pack(1, 2)),
        // fst p = casePair p K
        sc("fst", &["p"], Expr::ap2(v("casePair"), v("p"), v("K"))),
        // snd p = casePair p K1
        sc("snd", &["p"], Expr::ap2(v("casePair"), v("p"), v("K1"))),
        sc("Nil", &[], Expr::pack(1, 0)),
        sc("Cons", &[], Expr::pack(2, 2)),
        // head l = caseList l abort K
        sc("head", &["l"], Expr::apply(v("caseList"), [v("l"), v("abort"), v("K")])),
        // tail l = caseList l abort K1
        sc("tail", &["l"], Expr::apply(v("caseList"), [v("l"), v("abort"), v("K1")])),
        // length xs = caseList xs 0 lengthCons
        sc(
            "length",
            &["xs"],
            Expr::apply(v("caseList"), [v("xs"), Expr::num(0), v("lengthCons")]),
        ),
        // lengthCons h t = 1 + length t
        sc(
            "lengthCons",
            &["h", "t"],
            Expr::binary("+", Expr::num(1), Expr::ap(v("length"), v("t"))),
        ),
        // printList xs = caseList xs stop printCons
        sc(
            "printList",
            &["xs"],
            Expr::apply(v("caseList"), [v("xs"), v("stop"), v("printCons")]),
        ),
        // printCons h t = print h (printList t)
        sc(
            "printCons",
            &["h", "t"],
            Expr::ap2(v("print"), v("h"), Expr::ap(v("printList"), v("t"))),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_names_are_unique() {
        let mut names: Vec<Name> = base().into_iter().chain(data()).map(|d| d.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_twice_is_compose_of_its_argument() {
        let twice = base().into_iter().find(|d| d.name.as_str() == "twice").unwrap();
        assert_eq!(twice.arity(), 1);
        assert_eq!(twice.body.to_string(), "compose f f");
    }
}
