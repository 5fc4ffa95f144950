use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::DIRECTIVE_PREFIX;
use crate::error::{Error, Result};

static DIRECTIVE_HEAD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)^@([A-Za-z_][A-Za-z0-9_]*)(?:\((.*)\))?$").ok());

/// A parsed `@name` or `@name(arg, ...)` request for a catalogue generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveCall {
    pub name: String,
    pub args: Vec<Value>,
}

impl DirectiveCall {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Returns true when `text` should be read as a directive.
    pub fn is_directive(text: &str) -> bool {
        text.starts_with(DIRECTIVE_PREFIX)
    }

    /// Parse the directive mini-syntax. Arguments are integer, float or
    /// quoted string literals.
    pub fn parse(source: &str) -> Result<Self> {
        let captures = DIRECTIVE_HEAD
            .as_ref()
            .and_then(|head| head.captures(source))
            .ok_or_else(|| {
                Error::parse(
                    source,
                    "expected '@name' or '@name(arg, ...)' with a name of letters, digits or '_'",
                )
            })?;
        let name = captures
            .get(1)
            .map(|name| name.as_str().to_string())
            .unwrap_or_default();
        let args = match captures.get(2) {
            Some(args) => parse_args(source, args.as_str())?,
            None => Vec::new(),
        };
        Ok(Self { name, args })
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for DirectiveCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIRECTIVE_PREFIX}{}", self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

fn parse_args(source: &str, raw: &str) -> Result<Vec<Value>> {
    let mut args = Vec::new();
    let mut chars = raw.chars().peekable();

    skip_whitespace(&mut chars);
    if chars.peek().is_none() {
        return Ok(args);
    }

    loop {
        skip_whitespace(&mut chars);
        let arg = match chars.peek() {
            Some(&quote) if quote == '"' || quote == '\'' => {
                chars.next();
                parse_quoted(source, quote, &mut chars)?
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch == ',' {
                        break;
                    }
                    token.push(ch);
                    chars.next();
                }
                parse_number(source, token.trim())?
            }
            None => {
                return Err(Error::parse(source, "missing argument after ','"));
            }
        };
        args.push(arg);

        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(other) => {
                return Err(Error::parse(
                    source,
                    format!("unexpected '{other}' after argument {}", args.len()),
                ));
            }
        }
    }

    Ok(args)
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|ch| ch.is_whitespace()) {
        chars.next();
    }
}

fn parse_quoted(
    source: &str,
    quote: char,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Value> {
    let mut text = String::new();
    loop {
        match chars.next() {
            None => return Err(Error::parse(source, "unterminated string argument")),
            Some(ch) if ch == quote => return Ok(Value::String(text)),
            Some('\\') => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(escaped @ ('\\' | '"' | '\'')) => text.push(escaped),
                Some(other) => {
                    return Err(Error::parse(
                        source,
                        format!("unsupported escape '\\{other}'"),
                    ));
                }
                None => return Err(Error::parse(source, "unterminated string argument")),
            },
            Some(ch) => text.push(ch),
        }
    }
}

fn parse_number(source: &str, token: &str) -> Result<Value> {
    if token.is_empty() {
        return Err(Error::parse(source, "empty argument"));
    }
    if let Ok(int) = token.parse::<i64>() {
        return Ok(Value::Number(int.into()));
    }
    if let Ok(uint) = token.parse::<u64>() {
        return Ok(Value::Number(uint.into()));
    }
    token
        .parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| {
            Error::parse(
                source,
                format!("argument '{token}' is not a number or quoted string"),
            )
        })
}
