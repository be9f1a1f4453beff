//! Build constraints: `//go:build` expressions, legacy `// +build` lines and
//! `_GOOS_GOARCH` file name suffixes.

use std::fmt;

/// Operating systems the go tool recognizes in file names and tags.
pub const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures the go tool recognizes in file names and tags.
pub const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// Operating systems that satisfy the `unix` tag.
pub const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// A parsed constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate against a tag predicate.
    pub fn eval(&self, ok: &dyn Fn(&str) -> bool) -> bool {
        match self {
            Expr::Tag(tag) => ok(tag),
            Expr::Not(x) => !x.eval(ok),
            Expr::And(a, b) => a.eval(ok) && b.eval(ok),
            Expr::Or(a, b) => a.eval(ok) || b.eval(ok),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintError(pub String);

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid build constraint: {}", self.0)
    }
}

impl std::error::Error for ConstraintError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Tag(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn tokenize(expr: &str) -> Result<Vec<Tok>, ConstraintError> {
    let mut toks = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '!' => toks.push(Tok::Not),
            '(' => toks.push(Tok::LParen),
            ')' => toks.push(Tok::RParen),
            '&' | '|' => {
                if chars.next_if(|&(_, n)| n == c).is_none() {
                    return Err(ConstraintError(format!("unexpected `{}`", c)));
                }
                toks.push(if c == '&' { Tok::And } else { Tok::Or });
            }
            c if is_tag_char(c) => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, n)) = chars.peek() {
                    if !is_tag_char(n) {
                        break;
                    }
                    end = j + n.len_utf8();
                    chars.next();
                }
                toks.push(Tok::Tag(expr[i..end].to_string()));
            }
            other => return Err(ConstraintError(format!("unexpected `{}`", other))),
        }
    }
    Ok(toks)
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn or(&mut self) -> Result<Expr, ConstraintError> {
        let mut lhs = self.and()?;
        while self.peek() == Some(&Tok::Or) {
            self.pos += 1;
            lhs = Expr::Or(Box::new(lhs), Box::new(self.and()?));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ConstraintError> {
        let mut lhs = self.not()?;
        while self.peek() == Some(&Tok::And) {
            self.pos += 1;
            lhs = Expr::And(Box::new(lhs), Box::new(self.not()?));
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<Expr, ConstraintError> {
        if self.peek() == Some(&Tok::Not) {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.not()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, ConstraintError> {
        let tok = self.toks.get(self.pos).cloned();
        self.pos += 1;
        match tok {
            Some(Tok::LParen) => {
                let inner = self.or()?;
                if self.peek() != Some(&Tok::RParen) {
                    return Err(ConstraintError("missing `)`".to_string()));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(Tok::Tag(tag)) => Ok(Expr::Tag(tag)),
            Some(tok) => Err(ConstraintError(format!("unexpected {:?}", tok))),
            None => Err(ConstraintError("unexpected end of expression".to_string())),
        }
    }
}

/// Parse a `//go:build` expression.
pub fn parse_go_build(expr: &str) -> Result<Expr, ConstraintError> {
    let mut parser = Parser {
        toks: tokenize(expr)?,
        pos: 0,
    };
    let parsed = parser.or()?;
    if parser.pos != parser.toks.len() {
        return Err(ConstraintError(format!("unexpected tokens after `{}`", expr)));
    }
    Ok(parsed)
}

/// Parse one legacy `// +build` line.
///
/// Space-separated options are OR'ed, comma-separated terms are AND'ed and a
/// term may be negated with `!`.
pub fn parse_plus_build(line: &str) -> Result<Expr, ConstraintError> {
    let mut options = Vec::new();
    for option in line.split_whitespace() {
        let mut terms = Vec::new();
        for term in option.split(',') {
            let (negated, tag) = match term.strip_prefix('!') {
                Some(tag) => (true, tag),
                None => (false, term),
            };
            if tag.is_empty() || tag.starts_with('!') || !tag.chars().all(is_tag_char) {
                return Err(ConstraintError(format!("bad term `{}`", term)));
            }
            let tag = Expr::Tag(tag.to_string());
            terms.push(if negated { Expr::Not(Box::new(tag)) } else { tag });
        }
        options.push(fold(terms, Expr::And));
    }
    if options.is_empty() {
        return Err(ConstraintError("empty +build line".to_string()));
    }
    Ok(fold(options, Expr::Or))
}

fn fold(exprs: Vec<Expr>, join: fn(Box<Expr>, Box<Expr>) -> Expr) -> Expr {
    let mut iter = exprs.into_iter();
    let first = iter.next().unwrap_or_else(|| Expr::Tag(String::new()));
    iter.fold(first, |acc, e| join(Box::new(acc), Box::new(e)))
}

/// Whether a file name's `_GOOS`, `_GOARCH` or `_GOOS_GOARCH` suffix matches.
///
/// The part before the first underscore never counts, so `linux.go` is not
/// constrained while `x_linux.go` is.
pub fn file_name_matches(name: &str, goos: &str, goarch: &str) -> bool {
    let stem = name.strip_suffix(".go").unwrap_or(name);
    let stem = stem.strip_suffix("_test").unwrap_or(stem);
    let rest = match stem.find('_') {
        Some(i) => &stem[i..],
        None => return true,
    };

    let parts: Vec<&str> = rest.split('_').collect();
    let n = parts.len();
    if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
        return os_matches(parts[n - 2], goos) && parts[n - 1] == goarch;
    }
    let last = parts[n - 1];
    if KNOWN_OS.contains(&last) {
        return os_matches(last, goos);
    }
    if KNOWN_ARCH.contains(&last) {
        return last == goarch;
    }
    true
}

/// `GOOS=android` also satisfies `linux`, `illumos` satisfies `solaris`,
/// `ios` satisfies `darwin`.
pub fn os_matches(tag: &str, goos: &str) -> bool {
    tag == goos
        || matches!(
            (tag, goos),
            ("linux", "android") | ("solaris", "illumos") | ("darwin", "ios")
        )
}

/// `go1.N` release tags are all considered satisfied.
pub fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .is_some_and(|minor| !minor.is_empty() && minor.chars().all(|c| c.is_ascii_digit()))
}
