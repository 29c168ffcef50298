use crate::language::{Alternative, Expr, Name, Program, ScDefn};
use crate::parser::lexer::{LexError, Lexer, SourceLocation, Token};
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for Core programs
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program: `sc ; sc ; ...`
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut definitions = vec![self.parse_supercombinator()?];

        while self.match_token(&Token::Semicolon(self.current_location())) {
            // tolerate a trailing semicolon
            if self.is_at_end() {
                break;
            }
            definitions.push(self.parse_supercombinator()?);
        }

        if !self.is_at_end() {
            return Err(self.error(format!("Expected ';' or end of file, found {}", self.peek())));
        }

        Ok(Program::new(definitions))
    }

    /// Parse one definition: `name params = body`
    fn parse_supercombinator(&mut self) -> Result<ScDefn, ParseError> {
        let name = self.expect_identifier()?;
        let params = self.parse_variables()?;
        self.expect_token(
            &Token::Eq(self.current_location()),
            &format!("Expected '=' in the definition of '{}'", name),
        )?;
        let body = self.parse_expression()?;
        Ok(ScDefn::new(name, params, body))
    }

    /// Zero or more identifiers
    fn parse_variables(&mut self) -> Result<Vec<Name>, ParseError> {
        let mut names = Vec::new();
        while let Token::Ident(name, _) = self.peek() {
            names.push(Name::new(name));
            self.advance();
        }
        Ok(names)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Let(_) => self.parse_let(false),
            Token::LetRec(_) => self.parse_let(true),
            Token::Case(_) => self.parse_case(),
            Token::Backslash(_) => self.parse_lambda(),
            _ => self.parse_or(),
        }
    }

    /// `let`/`letrec` definitions `in` body
    fn parse_let(&mut self, is_recursive: bool) -> Result<Expr, ParseError> {
        self.advance();

        let mut definitions = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.expect_token(
                &Token::Eq(self.current_location()),
                "Expected '=' after the name of a local definition",
            )?;
            definitions.push((name, self.parse_expression()?));

            if !self.match_token(&Token::Semicolon(self.current_location())) {
                break;
            }
        }

        self.expect_token(&Token::In(self.current_location()), "Expected 'in' after local definitions")?;
        let body = self.parse_expression()?;

        Ok(Expr::Let {
            is_recursive,
            definitions,
            body: Box::new(body),
        })
    }

    /// `case e of <t> xs -> e; ...`
    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        let scrutinee = self.parse_expression()?;
        self.expect_token(&Token::Of(self.current_location()), "Expected 'of' after case scrutinee")?;

        let mut alternatives = vec![self.parse_alternative()?];
        // a ';' belongs to this case only when another alternative follows
        while self.check(&Token::Semicolon(self.current_location()))
            && matches!(self.peek_ahead(1), Some(Token::Lt(_)))
        {
            self.advance();
            alternatives.push(self.parse_alternative()?);
        }

        Ok(Expr::Case {
            scrutinee: Box::new(scrutinee),
            alternatives,
        })
    }

    fn parse_alternative(&mut self) -> Result<Alternative, ParseError> {
        self.expect_token(&Token::Lt(self.current_location()), "Expected '<' to start a case alternative")?;
        let tag = self.expect_tag()?;
        self.expect_token(&Token::Gt(self.current_location()), "Expected '>' after alternative tag")?;
        let params = self.parse_variables()?;
        self.expect_token(&Token::Arrow(self.current_location()), "Expected '->' in case alternative")?;
        let body = self.parse_expression()?;
        Ok(Alternative { tag, params, body })
    }

    /// `\x y . body`
    fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        let params = self.parse_variables()?;
        if params.is_empty() {
            return Err(self.error(format!("Expected a lambda parameter, found {}", self.peek())));
        }
        self.expect_token(&Token::Dot(self.current_location()), "Expected '.' after lambda parameters")?;
        let body = self.parse_expression()?;
        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
        })
    }

    /// Right-associative level: `operand (op self)?`
    fn parse_right_assoc(
        &mut self,
        ops: &[&str],
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
        rest: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let left = operand(self)?;
        match self.peek().operator() {
            Some(op) if ops.contains(&op) => {
                self.advance();
                let right = rest(self)?;
                Ok(Expr::binary(op, left, right))
            }
            _ => Ok(left),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        self.parse_right_assoc(&["|"], Self::parse_and, Self::parse_or)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        self.parse_right_assoc(&["&"], Self::parse_relational, Self::parse_and)
    }

    /// Relational operators do not associate
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        self.parse_right_assoc(
            &["==", "~=", "<", "<=", ">", ">="],
            Self::parse_additive,
            Self::parse_additive,
        )
    }

    /// `+` associates to the right, `-` does not associate
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_multiplicative()?;
        if self.match_token(&Token::Plus(self.current_location())) {
            Ok(Expr::binary("+", left, self.parse_additive()?))
        } else if self.match_token(&Token::Minus(self.current_location())) {
            Ok(Expr::binary("-", left, self.parse_multiplicative()?))
        } else {
            Ok(left)
        }
    }

    /// `*` associates to the right, `/` does not associate
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_application()?;
        if self.match_token(&Token::Star(self.current_location())) {
            Ok(Expr::binary("*", left, self.parse_multiplicative()?))
        } else if self.match_token(&Token::Slash(self.current_location())) {
            Ok(Expr::binary("/", left, self.parse_application()?))
        } else {
            Ok(left)
        }
    }

    /// One or more atomic expressions, applied left to right
    fn parse_application(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atomic()?;
        while self.starts_atomic() {
            let argument = self.parse_atomic()?;
            expr = Expr::ap(expr, argument);
        }
        Ok(expr)
    }

    fn starts_atomic(&self) -> bool {
        matches!(
            self.peek(),
            Token::Ident(..) | Token::Number(..) | Token::Pack(_) | Token::LParen(_)
        )
    }

    fn parse_atomic(&mut self) -> Result<Expr, ParseError> {
        match self.peek().clone() {
            Token::Ident(name, _) => {
                self.advance();
                Ok(Expr::Variable(Name::from(name)))
            }
            Token::Number(n, _) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            Token::Pack(_) => {
                self.advance();
                self.expect_token(&Token::LBrace(self.current_location()), "Expected '{' after 'Pack'")?;
                let tag = self.expect_tag()?;
                self.expect_token(&Token::Comma(self.current_location()), "Expected ',' between tag and arity")?;
                let arity = self.expect_number()?;
                self.expect_token(&Token::RBrace(self.current_location()), "Expected '}' after constructor arity")?;
                let arity = usize::try_from(arity)
                    .map_err(|_| self.error(format!("Invalid constructor arity {}", arity)))?;
                Ok(Expr::Constructor { tag, arity })
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after expression")?;
                Ok(expr)
            }
            other => Err(self.error(format!("Expected an expression, found {}", other))),
        }
    }

    // ===== Token helpers =====

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        &self.tokens[self.position - 1]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            location: self.current_location(),
        }
    }

    fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    fn expect_identifier(&mut self) -> Result<Name, ParseError> {
        if let Token::Ident(name, _) = self.peek() {
            let name = Name::new(name);
            self.advance();
            Ok(name)
        } else {
            Err(self.error(format!("Expected identifier, found {}", self.peek())))
        }
    }

    fn expect_number(&mut self) -> Result<i64, ParseError> {
        if let Token::Number(n, _) = *self.peek() {
            self.advance();
            Ok(n)
        } else {
            Err(self.error(format!("Expected number, found {}", self.peek())))
        }
    }

    fn expect_tag(&mut self) -> Result<u32, ParseError> {
        let tag = self.expect_number()?;
        u32::try_from(tag).map_err(|_| ParseError {
            message: format!("Invalid constructor tag {}", tag),
            location: self.tokens[self.position - 1].location(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    fn parse_expr(source: &str) -> Expr {
        Parser::new(source).unwrap().parse_expression().unwrap()
    }

    #[test]
    fn test_parse_definitions() {
        let program = parse("fac n = if (n == 0) 1 (n * fac (n - 1)) ;\nmain = fac 10");

        assert_eq!(program.definitions.len(), 2);
        let fac = &program.definitions[0];
        assert_eq!(fac.name.as_str(), "fac");
        assert_eq!(fac.params, vec![Name::new("n")]);
        assert_eq!(
            program.definitions[1].body,
            Expr::ap(Expr::var("fac"), Expr::num(10))
        );
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(
            parse_expr("1 + 2 * 3"),
            Expr::binary("+", Expr::num(1), Expr::binary("*", Expr::num(2), Expr::num(3)))
        );
        assert_eq!(
            parse_expr("f x + 1 < 3 & b"),
            Expr::binary(
                "&",
                Expr::binary(
                    "<",
                    Expr::binary("+", Expr::ap(Expr::var("f"), Expr::var("x")), Expr::num(1)),
                    Expr::num(3)
                ),
                Expr::var("b")
            )
        );
    }

    #[test]
    fn test_associativity() {
        // + and * group to the right
        assert_eq!(
            parse_expr("a + b + c"),
            Expr::binary("+", Expr::var("a"), Expr::binary("+", Expr::var("b"), Expr::var("c")))
        );
        // - does not chain
        assert!(Parser::new("main = a - b - c").unwrap().parse_program().is_err());
        assert!(Parser::new("main = a < b < c").unwrap().parse_program().is_err());
    }

    #[test]
    fn test_parse_letrec_and_case() {
        let program = parse(
            "f x = letrec a = pair x b; b = pair x a in a;\n\
             g xs = case xs of <1> -> 0; <2> y ys -> y;\n\
             main = f 1",
        );
        assert_eq!(program.definitions.len(), 3);
        match &program.definitions[0].body {
            Expr::Let {
                is_recursive: true,
                definitions,
                ..
            } => assert_eq!(definitions.len(), 2),
            other => panic!("Expected letrec, got {:?}", other),
        }
        match &program.definitions[1].body {
            Expr::Case { alternatives, .. } => {
                assert_eq!(alternatives.len(), 2);
                assert_eq!(alternatives[1].tag, 2);
                assert_eq!(alternatives[1].params, vec![Name::new("y"), Name::new("ys")]);
            }
            other => panic!("Expected case, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_lambda_and_pack() {
        assert_eq!(
            parse_expr("\\x y . Pack{2,2} x y"),
            Expr::Lambda {
                params: vec![Name::new("x"), Name::new("y")],
                body: Box::new(Expr::ap2(Expr::pack(2, 2), Expr::var("x"), Expr::var("y"))),
            }
        );
    }

    #[test]
    fn test_errors_carry_location() {
        let err = Parser::new("main = \n  let x = 1 = 2")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert_eq!(err.location, SourceLocation::new(2, 13));
        assert!(err.message.starts_with("Expected 'in'"));

        let err = Parser::new("main 3 = 1").unwrap().parse_program().unwrap_err();
        assert!(err.message.contains("'main'"));
    }

    #[test]
    fn test_printed_program_reparses() {
        let source = "twice f = compose f f;\nmain = let y = 3 in twice (\\x . x * 2) (negate y)";
        let program = parse(source);
        assert_eq!(parse(&program.to_string()), program);
    }
}
