use std::fmt::{Display, Formatter};

use crate::error::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Keyword or tag, uppercased.
    Word(String),
    Number(f64),
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Equals,
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Word(w) => write!(f, "'{w}'"),
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::End => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn unexpected(&self, expected: &[&'static str]) -> SyntaxError {
        SyntaxError {
            offset: self.offset,
            found: self.kind.to_string(),
            expected: expected.to_vec(),
        }
    }
}

/// Splits WKT text into tokens. Whitespace between tokens is ignored, keywords are case-insensitive.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    position: usize,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            peeked: None,
        }
    }

    pub fn peek(&mut self) -> Result<&Token, SyntaxError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.read_token()?,
        };

        Ok(self.peeked.insert(token))
    }

    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.read_token(),
        }
    }

    /// Consumes the next token if it is the given word.
    pub fn next_if_word(&mut self, word: &str) -> Result<bool, SyntaxError> {
        let matches = matches!(&self.peek()?.kind, TokenKind::Word(w) if w == word);
        if matches {
            self.next_token()?;
        }

        Ok(matches)
    }

    /// Consumes the next token if it is of the given kind.
    pub fn next_if(&mut self, kind: &TokenKind) -> Result<bool, SyntaxError> {
        let matches = &self.peek()?.kind == kind;
        if matches {
            self.next_token()?;
        }

        Ok(matches)
    }

    pub fn expect(&mut self, kind: TokenKind, name: &'static str) -> Result<(), SyntaxError> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(token.unexpected(&[name]))
        }
    }

    pub fn expect_word(&mut self, expected: &[&'static str]) -> Result<(String, usize), SyntaxError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Word(word) => Ok((word, token.offset)),
            _ => Err(token.unexpected(expected)),
        }
    }

    pub fn expect_number(&mut self) -> Result<f64, SyntaxError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Number(value) => Ok(value),
            _ => Err(token.unexpected(&["number"])),
        }
    }

    fn read_token(&mut self) -> Result<Token, SyntaxError> {
        let input = self.input;
        let rest = &input[self.position..];
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();

        let offset = self.position;
        let Some(first) = trimmed.chars().next() else {
            return Ok(Token {
                kind: TokenKind::End,
                offset,
            });
        };

        let single = |kind| Token { kind, offset };
        let token = match first {
            '(' => single(TokenKind::LeftParen),
            ')' => single(TokenKind::RightParen),
            ',' => single(TokenKind::Comma),
            ';' => single(TokenKind::Semicolon),
            '=' => single(TokenKind::Equals),
            c if c.is_ascii_alphabetic() => {
                let len = trimmed
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .unwrap_or(trimmed.len());
                self.position += len;
                return Ok(Token {
                    kind: TokenKind::Word(trimmed[..len].to_ascii_uppercase()),
                    offset,
                });
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                let len = number_len(trimmed);
                let text = &trimmed[..len];
                let value = text.parse::<f64>().map_err(|_| SyntaxError {
                    offset,
                    found: format!("'{text}'"),
                    expected: vec!["number"],
                })?;
                self.position += len;
                return Ok(Token {
                    kind: TokenKind::Number(value),
                    offset,
                });
            }
            c => {
                return Err(SyntaxError {
                    offset,
                    found: format!("'{c}'"),
                    expected: vec!["keyword", "number", "'('", "')'", "','"],
                })
            }
        };

        self.position += first.len_utf8();
        Ok(token)
    }
}

/// Length of the numeric literal at the start of the string. Signs are accepted at the start and after an
/// exponent marker.
fn number_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut len = 0;
    while len < bytes.len() {
        let accept = match bytes[len] {
            b'0'..=b'9' | b'.' | b'e' | b'E' => true,
            b'-' | b'+' => len == 0 || matches!(bytes[len - 1], b'e' | b'E'),
            _ => false,
        };
        if !accept {
            break;
        }
        len += 1;
    }

    len
}
