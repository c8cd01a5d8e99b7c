//! Lexer (tokenizer) for TeX math sources
//!
//! Converts an expression source such as `\Box ( a \to b )` into a flat
//! [`Token`] stream consumed by the typesetter. Whitespace is dropped, as in
//! TeX math mode, and `%` starts a comment that runs to the end of the line.

use super::TypesetError;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries the 1-based column it starts at so that typesetting
/// errors can point at the offending character.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `\name` or a control symbol such as `\,` or `\{`
    Command(String, usize),

    /// Any other single character
    Char(char, usize),

    LBrace(usize),   // {
    RBrace(usize),   // }
    Subscript(usize),   // _
    Superscript(usize), // ^

    Eof(usize),
}

impl Token {
    /// Returns the column where this token appears.
    pub fn column(&self) -> usize {
        match self {
            Token::Command(_, col)
            | Token::Char(_, col)
            | Token::LBrace(col)
            | Token::RBrace(col)
            | Token::Subscript(col)
            | Token::Superscript(col)
            | Token::Eof(col) => *col,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Command(name, _) => write!(f, "'\\{}'", name),
            Token::Char(c, _) => write!(f, "'{}'", c),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Subscript(_) => write!(f, "'_'"),
            Token::Superscript(_) => write!(f, "'^'"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Lexer for TeX math
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input. The last token is always [`Token::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, TypesetError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::Eof(self.column()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, TypesetError> {
        let column = self.column();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(Token::Eof(column)),
        };

        match ch {
            '\\' => self.command(column),
            '{' => Ok(Token::LBrace(column)),
            '}' => Ok(Token::RBrace(column)),
            '_' => Ok(Token::Subscript(column)),
            '^' => Ok(Token::Superscript(column)),
            other => Ok(Token::Char(other, column)),
        }
    }

    /// Control word (`\alpha`) or control symbol (`\,`)
    fn command(&mut self, column: usize) -> Result<Token, TypesetError> {
        let first = self
            .advance()
            .ok_or(TypesetError::TrailingBackslash { column })?;

        if !first.is_ascii_alphabetic() {
            return Ok(Token::Command(first.to_string(), column));
        }

        let mut name = String::from(first);
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(c);
            self.advance();
        }

        Ok(Token::Command(name, column))
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '%' {
                while let Some(c) = self.advance() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn column(&self) -> usize {
        self.position + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_and_chars() {
        let mut lexer = Lexer::new(r"\Box ( a \to b )");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Command(ref s, 1) if s == "Box"));
        assert!(matches!(tokens[1], Token::Char('(', 6)));
        assert!(matches!(tokens[2], Token::Char('a', 8)));
        assert!(matches!(tokens[3], Token::Command(ref s, 10) if s == "to"));
        assert!(matches!(tokens[4], Token::Char('b', 14)));
        assert!(matches!(tokens[5], Token::Char(')', 16)));
        assert!(matches!(tokens[6], Token::Eof(_)));
    }

    #[test]
    fn test_control_symbols() {
        let mut lexer = Lexer::new(r"\, \{ \\");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Command(ref s, _) if s == ","));
        assert!(matches!(tokens[1], Token::Command(ref s, _) if s == "{"));
        assert!(matches!(tokens[2], Token::Command(ref s, _) if s == "\\"));
    }

    #[test]
    fn test_scripts_and_groups() {
        let mut lexer = Lexer::new("|p|_{i}^2");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Char('|', _)));
        assert!(matches!(tokens[3], Token::Subscript(4)));
        assert!(matches!(tokens[4], Token::LBrace(5)));
        assert!(matches!(tokens[5], Token::Char('i', 6)));
        assert!(matches!(tokens[6], Token::RBrace(7)));
        assert!(matches!(tokens[7], Token::Superscript(8)));
    }

    #[test]
    fn test_comments_skipped() {
        let mut lexer = Lexer::new("a % ignored\nb");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[1], Token::Char('b', _)));
    }

    #[test]
    fn test_trailing_backslash() {
        let mut lexer = Lexer::new(r"a \");
        assert!(matches!(
            lexer.tokenize(),
            Err(TypesetError::TrailingBackslash { column: 3 })
        ));
    }
}
