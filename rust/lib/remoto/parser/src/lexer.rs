//! Tokenizer for `.remoto` schema sources.
//!
//! Comments are not tokens: they are collected on the side, with enough
//! position information to attach them as doc comments later.

use crate::diagnostics::Pos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Star,
    Dot,
    Ellipsis,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Eof,
}

impl TokenKind {
    /// How the token reads in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Str(_) => "string literal".into(),
            TokenKind::Star => "'*'".into(),
            TokenKind::Dot => "'.'".into(),
            TokenKind::Ellipsis => "'...'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::LBrace => "'{'".into(),
            TokenKind::RBrace => "'}'".into(),
            TokenKind::LBracket => "'['".into(),
            TokenKind::RBracket => "']'".into(),
            TokenKind::Eof => "EOF".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

/// A single `// …` or `/* … */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    /// Comment text, markers removed, one entry per source line.
    pub lines: Vec<String>,
    pub start: Pos,
    pub end_line: u32,
    /// No token precedes the comment on its first line.
    pub own_line: bool,
}

/// Lexing failure: a position and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub pos: Pos,
    pub message: String,
}

#[derive(Debug)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<RawComment>,
}

/// Tokenize one source. `file` is stamped into every position.
pub fn lex(file: usize, src: &str) -> Result<Lexed, LexError> {
    Lexer {
        file,
        src: src.as_bytes(),
        text: src,
        offset: 0,
        line: 1,
        line_start: 0,
        last_token_line: 0,
        tokens: Vec::new(),
        comments: Vec::new(),
    }
    .run()
}

struct Lexer<'a> {
    file: usize,
    src: &'a [u8],
    text: &'a str,
    offset: usize,
    line: u32,
    line_start: usize,
    last_token_line: u32,
    tokens: Vec<Token>,
    comments: Vec<RawComment>,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Lexed, LexError> {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.offset += 1;
                    self.newline();
                }
                b' ' | b'\t' | b'\r' => self.offset += 1,
                b'/' if self.peek_at(1) == Some(b'/') => self.line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.block_comment()?,
                b'"' => self.string()?,
                b'`' => self.raw_string()?,
                b'.' if self.src[self.offset..].starts_with(b"...") => {
                    let pos = self.pos();
                    self.offset += 3;
                    self.push(TokenKind::Ellipsis, pos);
                }
                b if b == b'_' || b.is_ascii_alphabetic() || b >= 0x80 => self.ident(),
                b if b.is_ascii_digit() => self.ident(),
                _ => {
                    let pos = self.pos();
                    let kind = match b {
                        b'*' => TokenKind::Star,
                        b'.' => TokenKind::Dot,
                        b',' => TokenKind::Comma,
                        b';' => TokenKind::Semicolon,
                        b'(' => TokenKind::LParen,
                        b')' => TokenKind::RParen,
                        b'{' => TokenKind::LBrace,
                        b'}' => TokenKind::RBrace,
                        b'[' => TokenKind::LBracket,
                        b']' => TokenKind::RBracket,
                        other => {
                            return Err(LexError {
                                pos,
                                message: format!("invalid character {:?}", other as char),
                            });
                        }
                    };
                    self.offset += 1;
                    self.push(kind, pos);
                }
            }
        }
        let pos = self.pos();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            pos,
        });
        Ok(Lexed {
            tokens: self.tokens,
            comments: self.comments,
        })
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.offset).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.get(self.offset + n).copied()
    }

    fn pos(&self) -> Pos {
        Pos {
            file: self.file,
            line: self.line,
            column: (self.offset - self.line_start + 1) as u32,
        }
    }

    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.offset;
    }

    fn push(&mut self, kind: TokenKind, pos: Pos) {
        self.last_token_line = pos.line;
        self.tokens.push(Token { kind, pos });
    }

    fn ident(&mut self) {
        let pos = self.pos();
        let start = self.offset;
        while let Some(b) = self.peek() {
            if b == b'_' || b.is_ascii_alphanumeric() || b >= 0x80 {
                self.offset += 1;
            } else {
                break;
            }
        }
        let name = self.text[start..self.offset].to_string();
        self.push(TokenKind::Ident(name), pos);
    }

    fn line_comment(&mut self) {
        let start = self.pos();
        let own_line = self.last_token_line != start.line;
        self.offset += 2;
        let begin = self.offset;
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.offset += 1;
        }
        let text = self.text[begin..self.offset].trim_end_matches('\r');
        self.comments.push(RawComment {
            lines: vec![text.to_string()],
            start,
            end_line: start.line,
            own_line,
        });
    }

    fn block_comment(&mut self) -> Result<(), LexError> {
        let start = self.pos();
        let own_line = self.last_token_line != start.line;
        self.offset += 2;
        let begin = self.offset;
        loop {
            match self.peek() {
                None => {
                    return Err(LexError {
                        pos: start,
                        message: "comment not terminated".into(),
                    });
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => break,
                Some(b'\n') => {
                    self.offset += 1;
                    self.newline();
                }
                Some(_) => self.offset += 1,
            }
        }
        let body = &self.text[begin..self.offset];
        self.offset += 2;
        self.comments.push(RawComment {
            lines: body.lines().map(str::to_string).collect(),
            start,
            end_line: self.line,
            own_line,
        });
        Ok(())
    }

    fn string(&mut self) -> Result<(), LexError> {
        let pos = self.pos();
        self.offset += 1;
        let mut value = String::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(unterminated(pos));
            };
            match b {
                b'\n' => return Err(unterminated(pos)),
                b'"' => {
                    self.offset += 1;
                    break;
                }
                b'\\' => {
                    let escaped = match self.peek_at(1) {
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        Some(b'\\') => '\\',
                        Some(b'"') => '"',
                        _ => {
                            return Err(LexError {
                                pos: self.pos(),
                                message: "unknown escape sequence".into(),
                            });
                        }
                    };
                    value.push(escaped);
                    self.offset += 2;
                }
                _ => {
                    let rest = &self.text[self.offset..];
                    let ch = rest.chars().next().unwrap_or('\u{fffd}');
                    value.push(ch);
                    self.offset += ch.len_utf8();
                }
            }
        }
        self.push(TokenKind::Str(value), pos);
        Ok(())
    }

    fn raw_string(&mut self) -> Result<(), LexError> {
        let pos = self.pos();
        self.offset += 1;
        let begin = self.offset;
        loop {
            match self.peek() {
                None => return Err(unterminated(pos)),
                Some(b'`') => break,
                Some(b'\n') => {
                    self.offset += 1;
                    self.newline();
                }
                Some(_) => self.offset += 1,
            }
        }
        let value = self.text[begin..self.offset].to_string();
        self.offset += 1;
        self.push(TokenKind::Str(value), pos);
        Ok(())
    }
}

fn unterminated(pos: Pos) -> LexError {
    LexError {
        pos,
        message: "string literal not terminated".into(),
    }
}
