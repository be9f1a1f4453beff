//! Go source header scanner.
//!
//! Reads only what precedes the first top-level declaration: leading build
//! constraint comments, the package clause and the import declarations.
//! Anything after the import block is never looked at.

use std::fmt;

/// What the scanner extracts from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub package: String,
    pub imports: Vec<String>,
    /// `//go:build` expression, if present.
    pub go_build: Option<String>,
    /// Legacy `// +build` lines, without the `+build` marker.
    pub plus_build: Vec<String>,
}

/// A syntax error with the line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScanError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    LParen,
    RParen,
    Semi,
    Dot,
    Other(char),
    Eof,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        // A UTF-8 byte order mark is allowed at the start of a Go file.
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Lexer { src, pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ScanError {
        ScanError {
            line: self.line,
            message: message.into(),
        }
    }

    /// Skip whitespace and comments, handing line comments and the line they
    /// start on to `on_comment`.
    fn skip_trivia(&mut self, on_comment: &mut dyn FnMut(usize, &str)) -> Result<(), ScanError> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    let start = self.pos + 2;
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    on_comment(self.line, self.src[start..self.pos].trim_end_matches('\r'));
                }
                (Some('/'), Some('*')) => {
                    let line = self.line;
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(ScanError {
                                    line,
                                    message: "comment not terminated".to_string(),
                                })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self, on_comment: &mut dyn FnMut(usize, &str)) -> Result<Token, ScanError> {
        self.skip_trivia(on_comment)?;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            '(' => {
                self.bump();
                Ok(Token::LParen)
            }
            ')' => {
                self.bump();
                Ok(Token::RParen)
            }
            ';' => {
                self.bump();
                Ok(Token::Semi)
            }
            '.' => {
                self.bump();
                Ok(Token::Dot)
            }
            '"' => self.interpreted_string().map(Token::Str),
            '`' => self.raw_string().map(Token::Str),
            c if is_ident_start(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_ident_continue) {
                    self.bump();
                }
                Ok(Token::Ident(self.src[start..self.pos].to_string()))
            }
            other => {
                self.bump();
                Ok(Token::Other(other))
            }
        }
    }

    fn raw_string(&mut self) -> Result<String, ScanError> {
        let line = self.line;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('`') => return Ok(value),
                // Carriage returns are discarded from raw strings.
                Some('\r') => {}
                Some(c) => value.push(c),
                None => {
                    return Err(ScanError {
                        line,
                        message: "raw string literal not terminated".to_string(),
                    })
                }
            }
        }
    }

    fn interpreted_string(&mut self) -> Result<String, ScanError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => value.push(self.escape()?),
                Some('\n') | None => return Err(self.error("string literal not terminated")),
                Some(c) => value.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, ScanError> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("escape sequence not terminated"))?;
        let simple = match c {
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{b}'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '\'' => Some('\''),
            _ => None,
        };
        if let Some(ch) = simple {
            return Ok(ch);
        }

        let (digits, radix) = match c {
            'x' => (2, 16),
            'u' => (4, 16),
            'U' => (8, 16),
            '0'..='7' => (2, 8),
            _ => return Err(self.error("unknown escape sequence")),
        };

        let mut code = if radix == 8 { c.to_digit(8).unwrap_or(0) } else { 0 };
        for _ in 0..digits {
            let d = self
                .bump()
                .and_then(|ch| ch.to_digit(radix))
                .ok_or_else(|| self.error("invalid escape sequence"))?;
            code = code * radix + d;
        }
        char::from_u32(code)
            .ok_or_else(|| self.error("escape sequence is invalid Unicode code point"))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Scan the header of one Go source file.
pub fn scan_header(src: &str) -> Result<FileHeader, ScanError> {
    let mut lexer = Lexer::new(src);
    let mut header = FileHeader::default();

    // Build constraints only count in comments that end before the last
    // blank line preceding the package clause. Later comments are package
    // documentation.
    let mut leading = Vec::new();
    let first = lexer.next_token(&mut |line: usize, comment: &str| {
        leading.push((line, comment.to_string()))
    })?;
    let cutoff = last_blank_line_before(lexer.src, lexer.line);
    for (_, comment) in leading.iter().filter(|(line, _)| *line < cutoff) {
        if let Some(expr) = comment.strip_prefix("go:build") {
            if expr.is_empty() || expr.starts_with([' ', '\t']) {
                header.go_build.get_or_insert_with(|| expr.trim().to_string());
            }
        } else if let Some(expr) = comment.trim_start().strip_prefix("+build") {
            if expr.is_empty() || expr.starts_with([' ', '\t']) {
                header.plus_build.push(expr.trim().to_string());
            }
        }
    }

    let mut ignore = |_: usize, _: &str| {};

    if first != Token::Ident("package".to_string()) {
        return Err(lexer.error("expected 'package'"));
    }
    match lexer.next_token(&mut ignore)? {
        Token::Ident(name) => header.package = name,
        _ => return Err(lexer.error("expected package name")),
    }

    loop {
        match lexer.next_token(&mut ignore)? {
            Token::Semi => continue,
            Token::Ident(kw) if kw == "import" => match lexer.next_token(&mut ignore)? {
                Token::LParen => loop {
                    match lexer.next_token(&mut ignore)? {
                        Token::RParen => break,
                        Token::Semi => continue,
                        Token::Eof => return Err(lexer.error("import list not terminated")),
                        tok => header.imports.push(import_spec(&mut lexer, tok)?),
                    }
                },
                tok => header.imports.push(import_spec(&mut lexer, tok)?),
            },
            _ => break,
        }
    }

    Ok(header)
}

/// Line number of the last blank line before line `before`, or 0.
fn last_blank_line_before(src: &str, before: usize) -> usize {
    src.lines()
        .take(before.saturating_sub(1))
        .enumerate()
        .filter(|(_, text)| text.trim().is_empty())
        .map(|(idx, _)| idx + 1)
        .last()
        .unwrap_or(0)
}

/// `[name | "." | "_"] "path"`, starting from an already read token.
fn import_spec(lexer: &mut Lexer<'_>, first: Token) -> Result<String, ScanError> {
    let tok = match first {
        Token::Ident(_) | Token::Dot => lexer.next_token(&mut |_: usize, _: &str| {})?,
        tok => tok,
    };
    match tok {
        Token::Str(path) if path.is_empty() => Err(lexer.error("empty import path")),
        Token::Str(path) => Ok(path),
        _ => Err(lexer.error("expected import path")),
    }
}
