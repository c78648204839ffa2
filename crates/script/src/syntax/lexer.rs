//! Source text to tokens.

use super::token::{Keyword, Punct, Token, TokenKind};
use crate::error::SyntaxError;

pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    newline_before: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            newline_before: false,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        loop {
            self.skip_trivia()?;
            let Some(c) = self.peek() else {
                self.push(TokenKind::Eof);
                return Ok(self.tokens);
            };

            let kind = if c.is_ascii_digit()
                || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
            {
                self.number()?
            } else if c == '"' || c == '\'' {
                self.string(c)?
            } else if is_ident_start(c) {
                self.word()
            } else {
                self.punct()?
            };
            self.push(kind);
        }
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token {
            kind,
            line: self.line,
            newline_before: std::mem::take(&mut self.newline_before),
        });
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.newline_before = true;
        }
        Some(c)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
            } else if rest.starts_with("/*") {
                let start = self.line;
                self.pos += 2;
                loop {
                    if self.rest().starts_with("*/") {
                        self.pos += 2;
                        break;
                    }
                    if self.bump().is_none() {
                        return Err(SyntaxError::new(start, "unterminated comment"));
                    }
                }
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn number(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let digits = &self.src[digits_start..self.pos];
            return u64::from_str_radix(digits, 16)
                .map(|n| TokenKind::Number(n as f64))
                .map_err(|_| SyntaxError::new(self.line, "invalid hexadecimal literal"));
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = self.peek_at(1);
            let first_digit = if matches!(sign, Some('+' | '-')) {
                self.peek_at(2)
            } else {
                sign
            };
            if first_digit.is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            }
        }

        let text = &self.src[start..self.pos];
        if self.peek().is_some_and(is_ident_start) {
            return Err(SyntaxError::new(
                self.line,
                format!("identifier starts immediately after number `{text}`"),
            ));
        }
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| SyntaxError::new(self.line, format!("invalid number `{text}`")))
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, SyntaxError> {
        let line = self.line;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(SyntaxError::new(line, "unterminated string literal"));
                }
                Some(c) if c == quote => return Ok(TokenKind::Str(out)),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(other) => other,
                        None => return Err(SyntaxError::new(line, "unterminated string literal")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        match text.parse::<Keyword>() {
            Ok(keyword) => TokenKind::Keyword(keyword),
            Err(_) => TokenKind::Ident(text.to_owned()),
        }
    }

    fn punct(&mut self) -> Result<TokenKind, SyntaxError> {
        let rest = self.rest();
        for (text, punct) in Punct::BY_LENGTH {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(TokenKind::Punct(*punct));
            }
        }
        let c = rest.chars().next().unwrap_or_default();
        Err(SyntaxError::new(
            self.line,
            format!("unexpected character `{c}`"),
        ))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            kinds("a === b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Punct(Punct::EqEqEq),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_and_lines_are_tracked() {
        let tokens = tokenize("/* a\n b */ x // tail\n y").unwrap();
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].line, 3);
        assert!(tokens[1].newline_before);
    }

    #[test]
    fn numbers_and_strings() {
        assert_eq!(
            kinds("1.5e2 'it\\'s' 0x10"),
            vec![
                TokenKind::Number(150.0),
                TokenKind::Str("it's".into()),
                TokenKind::Number(16.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let err = tokenize("x /* never closed").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn keywords_are_recognized() {
        assert_eq!(kinds("while")[0], TokenKind::Keyword(Keyword::While));
        assert_eq!(kinds("whilst")[0], TokenKind::Ident("whilst".into()));
    }
}
