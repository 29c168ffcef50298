//! Lexer (tokenizer) for Core source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! `||` starts a comment that runs to the end of the line.

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(i64, SourceLocation),
    Ident(String, SourceLocation),

    // Keywords
    Let(SourceLocation),
    LetRec(SourceLocation),
    In(SourceLocation),
    Case(SourceLocation),
    Of(SourceLocation),
    Pack(SourceLocation),

    // Operators
    Plus(SourceLocation),  // +
    Minus(SourceLocation), // -
    Star(SourceLocation),  // *
    Slash(SourceLocation), // /
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // ~=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=
    Amp(SourceLocation),   // &
    Pipe(SourceLocation),  // |

    // Punctuation
    Eq(SourceLocation),        // =
    Arrow(SourceLocation),     // ->
    Backslash(SourceLocation), // \
    Dot(SourceLocation),       // .
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }

    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Number(_, loc)
            | Token::Ident(_, loc)
            | Token::Let(loc)
            | Token::LetRec(loc)
            | Token::In(loc)
            | Token::Case(loc)
            | Token::Of(loc)
            | Token::Pack(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Amp(loc)
            | Token::Pipe(loc)
            | Token::Eq(loc)
            | Token::Arrow(loc)
            | Token::Backslash(loc)
            | Token::Dot(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// Source spelling of an infix operator token
    pub fn operator(&self) -> Option<&'static str> {
        let op = match self {
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Star(_) => "*",
            Token::Slash(_) => "/",
            Token::EqEq(_) => "==",
            Token::NotEq(_) => "~=",
            Token::Lt(_) => "<",
            Token::Le(_) => "<=",
            Token::Gt(_) => ">",
            Token::Ge(_) => ">=",
            Token::Amp(_) => "&",
            Token::Pipe(_) => "|",
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = self.operator() {
            return write!(f, "'{}'", op);
        }
        match self {
            Token::Number(n, _) => write!(f, "number {}", n),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Let(_) => write!(f, "'let'"),
            Token::LetRec(_) => write!(f, "'letrec'"),
            Token::In(_) => write!(f, "'in'"),
            Token::Case(_) => write!(f, "'case'"),
            Token::Of(_) => write!(f, "'of'"),
            Token::Pack(_) => write!(f, "'Pack'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::Arrow(_) => write!(f, "'->'"),
            Token::Backslash(_) => write!(f, "'\\'"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Eof(_) => write!(f, "end of file"),
            _ => write!(f, "operator"),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' => Ok(self.identifier_or_keyword(ch, loc)),

            '=' => Ok(self.followed_by('=', Token::EqEq(loc), Token::Eq(loc))),
            '~' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Expected '=' after '~'".to_string(),
                        location: loc,
                    })
                }
            }
            '<' => Ok(self.followed_by('=', Token::Le(loc), Token::Lt(loc))),
            '>' => Ok(self.followed_by('=', Token::Ge(loc), Token::Gt(loc))),
            '-' => Ok(self.followed_by('>', Token::Arrow(loc), Token::Minus(loc))),
            '+' => Ok(Token::Plus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '&' => Ok(Token::Amp(loc)),
            '|' => Ok(Token::Pipe(loc)),
            '\\' => Ok(Token::Backslash(loc)),
            '.' => Ok(Token::Dot(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Two-character token when the next character is `second`
    fn followed_by(&mut self, second: char, double: Token, single: Token) -> Token {
        if self.peek() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = num_str.parse::<i64>().map_err(|_| LexError {
            message: format!("Integer literal out of range: {}", num_str),
            location: loc,
        })?;

        Ok(Token::Number(value, loc))
    }

    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "let" => Token::Let(loc),
            "letrec" => Token::LetRec(loc),
            "in" => Token::In(loc),
            "case" => Token::Case(loc),
            "of" => Token::Of(loc),
            "Pack" => Token::Pack(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('|') if self.peek_ahead(1) == Some('|') => self.skip_line_comment(),
                _ => break,
            }
        }
    }

    /// Skip a `||` comment up to and including the newline
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("main = fac 10");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "main"));
        assert!(matches!(tokens[1], Token::Eq(_)));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "fac"));
        assert!(matches!(tokens[3], Token::Number(10, _)));
        assert!(matches!(tokens[4], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("== ~= >= <= -> < > - | & \\ .");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::EqEq(_)));
        assert!(matches!(tokens[1], Token::NotEq(_)));
        assert!(matches!(tokens[2], Token::Ge(_)));
        assert!(matches!(tokens[3], Token::Le(_)));
        assert!(matches!(tokens[4], Token::Arrow(_)));
        assert!(matches!(tokens[5], Token::Lt(_)));
        assert!(matches!(tokens[6], Token::Gt(_)));
        assert!(matches!(tokens[7], Token::Minus(_)));
        assert!(matches!(tokens[8], Token::Pipe(_)));
        assert!(matches!(tokens[9], Token::Amp(_)));
        assert!(matches!(tokens[10], Token::Backslash(_)));
        assert!(matches!(tokens[11], Token::Dot(_)));
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut lexer = Lexer::new("letrec lets in_x Pack{1,2} case_1");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::LetRec(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "lets"));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "in_x"));
        assert!(matches!(tokens[3], Token::Pack(_)));
        assert!(matches!(tokens[4], Token::LBrace(_)));
        assert!(matches!(tokens[5], Token::Number(1, _)));
        assert!(matches!(tokens[6], Token::Comma(_)));
        assert!(matches!(tokens[9], Token::Ident(ref s, _) if s == "case_1"));
    }

    #[test]
    fn test_comments_and_locations() {
        let mut lexer = Lexer::new("x || the rest is ignored\n  y");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].location(), SourceLocation::new(1, 1));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "y"));
        assert_eq!(tokens[1].location(), SourceLocation::new(2, 3));
    }

    #[test]
    fn test_bad_characters() {
        let err = Lexer::new("x ~ y").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 3));

        let err = Lexer::new("a # b").tokenize().unwrap_err();
        assert_eq!(err.message, "Unexpected character: '#'");
    }
}
