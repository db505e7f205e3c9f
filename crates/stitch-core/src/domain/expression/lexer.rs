//! Tokenizer for placeholder expressions.

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    AndAnd,
    OrOr,
    Nullish,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub(super) fn tokenize(src: &str) -> Result<Vec<Spanned>, DomainError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let offset = i;
        let (token, len) = match b {
            b'0'..=b'9' => number(src, i)?,
            b'.' if bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => number(src, i)?,
            b'"' | b'\'' => string(src, i)?,
            b if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {
                let end = src[i..]
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
                    .map_or(src.len(), |k| i + k);
                (Token::Ident(src[i..end].to_string()), end - i)
            }
            _ => punct(src, i)?,
        };

        tokens.push(Spanned { token, offset });
        i += len;
    }

    Ok(tokens)
}

fn syntax(offset: usize, reason: impl Into<String>) -> DomainError {
    DomainError::ExpressionSyntax {
        offset,
        reason: reason.into(),
    }
}

fn number(src: &str, start: usize) -> Result<(Token, usize), DomainError> {
    let bytes = src.as_bytes();
    let mut i = start;
    let digits = |i: &mut usize| {
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
    };

    digits(&mut i);
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        digits(&mut i);
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mark = i;
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if bytes.get(i).is_some_and(u8::is_ascii_digit) {
            digits(&mut i);
        } else {
            i = mark;
        }
    }

    let text = &src[start..i];
    let value: f64 = text
        .parse()
        .map_err(|_| syntax(start, format!("invalid number '{text}'")))?;
    Ok((Token::Number(value), i - start))
}

fn string(src: &str, start: usize) -> Result<(Token, usize), DomainError> {
    let quote = src.as_bytes()[start] as char;
    let mut out = String::new();
    let mut chars = src[start + 1..].char_indices();

    while let Some((k, c)) = chars.next() {
        match c {
            c if c == quote => return Ok((Token::Str(out), k + 2)),
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| syntax(start, "unterminated string"))?;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            }
            c => out.push(c),
        }
    }

    Err(syntax(start, "unterminated string"))
}

fn punct(src: &str, i: usize) -> Result<(Token, usize), DomainError> {
    let rest = &src[i..];
    // Longest operators first.
    let multi = [
        ("===", Token::Eq),
        ("!==", Token::Ne),
        ("==", Token::Eq),
        ("!=", Token::Ne),
        ("<=", Token::Le),
        (">=", Token::Ge),
        ("&&", Token::AndAnd),
        ("||", Token::OrOr),
        ("??", Token::Nullish),
    ];

    multi
        .into_iter()
        .find(|(text, _)| rest.starts_with(*text))
        .map(|(text, token)| (token, text.len()))
        .or_else(|| {
            let token = match rest.as_bytes().first()? {
                b'(' => Token::LParen,
                b')' => Token::RParen,
                b'[' => Token::LBracket,
                b']' => Token::RBracket,
                b'.' => Token::Dot,
                b',' => Token::Comma,
                b'?' => Token::Question,
                b':' => Token::Colon,
                b'+' => Token::Plus,
                b'-' => Token::Minus,
                b'*' => Token::Star,
                b'/' => Token::Slash,
                b'%' => Token::Percent,
                b'!' => Token::Bang,
                b'<' => Token::Lt,
                b'>' => Token::Gt,
                _ => return None,
            };
            Some((token, 1))
        })
        .ok_or_else(|| {
            let found = rest.chars().next().unwrap_or(' ');
            syntax(i, format!("unexpected character '{found}'"))
        })
}
