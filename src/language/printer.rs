// Pretty printer producing Core source text

use super::ast::{Alternative, Expr, Program, ScDefn};
use std::fmt::{self, Display, Formatter};

fn write_binders<B: Display>(f: &mut Formatter<'_>, binders: &[B]) -> fmt::Result {
    for b in binders {
        write!(f, " {}", b)?;
    }
    Ok(())
}

/// Print an operand position: anything that is not atomic gets parentheses.
fn write_atom<B: Display>(f: &mut Formatter<'_>, expr: &Expr<B>) -> fmt::Result {
    match expr {
        Expr::Number(n) if *n < 0 => write!(f, "(negate {})", n.unsigned_abs()),
        e if e.is_atomic() => write!(f, "{}", e),
        e => write!(f, "({})", e),
    }
}

impl<B: Display> Display for Expr<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some((op, left, right)) = self.as_binary() {
            write_atom(f, left)?;
            write!(f, " {} ", op)?;
            return write_atom(f, right);
        }

        match self {
            Expr::Number(n) if *n < 0 => write!(f, "negate {}", n.unsigned_abs()),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Constructor { tag, arity } => write!(f, "Pack{{{},{}}}", tag, arity),
            Expr::Application(function, argument) => {
                match function.as_ref() {
                    Expr::Application(..) if function.as_binary().is_none() => {
                        write!(f, "{}", function)?
                    }
                    other => write_atom(f, other)?,
                }
                f.write_str(" ")?;
                write_atom(f, argument)
            }
            Expr::Lambda { params, body } => {
                f.write_str("\\")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, " . {}", body)
            }
            Expr::Let {
                is_recursive,
                definitions,
                body,
            } => {
                f.write_str(if *is_recursive { "letrec " } else { "let " })?;
                for (i, (name, value)) in definitions.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} = {}", name, value)?;
                }
                write!(f, " in {}", body)
            }
            Expr::Case {
                scrutinee,
                alternatives,
            } => {
                write!(f, "case {} of", scrutinee)?;
                for (i, alt) in alternatives.iter().enumerate() {
                    f.write_str(if i > 0 { "; " } else { " " })?;
                    write!(f, "{}", alt)?;
                }
                Ok(())
            }
        }
    }
}

impl<B: Display> Display for Alternative<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.tag)?;
        write_binders(f, &self.params)?;
        write!(f, " -> {}", self.body)
    }
}

impl<B: Display> Display for ScDefn<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        write_binders(f, &self.params)?;
        write!(f, " = {}", self.body)
    }
}

impl<B: Display> Display for Program<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, def) in self.definitions.iter().enumerate() {
            if i > 0 {
                f.write_str(";\n")?;
            }
            write!(f, "{}", def)?;
        }
        Ok(())
    }
}
