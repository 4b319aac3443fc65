//! Struct tag parsing.
//!
//! A Go struct tag is a space separated list of `key:"value"` pairs. For the
//! recognised key (`env` by default) the value is a comma separated token list:
//!
//! ```text
//! `env:"PORT,default=8080"`      name = PORT, default = 8080
//! `env:",prefix=DB_"`            prefix container with prefix DB_
//! `env:"HOST,required"`          unknown flags are ignored
//! ```

use crate::config::Config;

/// Parsed form of a field's tag under the recognised key.
///
/// Cheap to compute; it is re-derived from the raw tag whenever needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationDescriptor {
    /// Variable name; may be empty (common for prefix containers).
    pub variable_name: String,
    pub is_prefix_container: bool,
    pub prefix: String,
    pub default_value: String,
}

/// Extracts [`AnnotationDescriptor`]s for one tag key and its two flags.
#[derive(Debug, Clone)]
pub struct AnnotationExtractor {
    key: String,
    prefix_flag: String,
    default_flag: String,
}

impl Default for AnnotationExtractor {
    fn default() -> Self {
        Self::new("env", "prefix", "default")
    }
}

impl AnnotationExtractor {
    pub fn new(
        key: impl Into<String>,
        prefix_flag: impl Into<String>,
        default_flag: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            prefix_flag: prefix_flag.into(),
            default_flag: default_flag.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.tag_key, &config.prefix_flag, &config.default_flag)
    }

    /// Returns `None` when the tag does not carry the recognised key.
    pub fn extract(&self, tag: &str) -> Option<AnnotationDescriptor> {
        let value = lookup_tag(tag, &self.key)?;
        let mut tokens = value.split(',');

        let mut descriptor = AnnotationDescriptor {
            variable_name: tokens.next().unwrap_or_default().to_string(),
            ..Default::default()
        };

        for token in tokens {
            let (flag, flag_value) = match token.split_once('=') {
                Some((flag, flag_value)) => (flag, flag_value),
                None => (token, ""),
            };

            if flag == self.prefix_flag {
                descriptor.is_prefix_container = true;
                descriptor.prefix = flag_value.to_string();
            } else if flag == self.default_flag {
                descriptor.default_value = flag_value.to_string();
            }
        }

        Some(descriptor)
    }
}

/// Looks up `key` in a struct tag, following `reflect.StructTag.Lookup`.
///
/// Returns `None` if the key is absent or the tag is malformed before the key
/// is reached.
pub fn lookup_tag(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        // Key: run of non-space, non-control characters other than ':' and '"'.
        let name_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        let (name, after_name) = rest.split_at(name_len);
        let quoted = after_name.strip_prefix(":\"")?;

        let close = closing_quote(quoted)?;
        let (raw_value, remainder) = quoted.split_at(close);
        rest = &remainder[1..];

        if name == key {
            return unquote(raw_value);
        }
    }
}

/// Byte index of the unescaped closing quote.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Unescapes the body of a Go interpreted string literal.
///
/// Returns `None` for any escape Go rejects, and for `\x`/octal byte
/// sequences that do not form valid UTF-8.
pub(crate) fn unquote(body: &str) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '"' || c == '\n' {
            return None;
        }
        if c != '\\' {
            let mut buf = [0; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let simple = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '\\' => '\\',
            '"' => '"',
            'x' => {
                out.push(u8::try_from(hex_digits(&mut chars, 2)?).ok()?);
                continue;
            }
            'u' => char::from_u32(hex_digits(&mut chars, 4)?)?,
            'U' => char::from_u32(hex_digits(&mut chars, 8)?)?,
            first @ '0'..='7' => {
                let mut value = first.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                out.push(u8::try_from(value).ok()?);
                continue;
            }
            _ => return None,
        };
        let mut buf = [0; 4];
        out.extend_from_slice(simple.encode_utf8(&mut buf).as_bytes());
    }
    String::from_utf8(out).ok()
}

/// Exactly `count` hex digits as a number.
fn hex_digits(chars: &mut std::str::Chars<'_>, count: usize) -> Option<u32> {
    (0..count).try_fold(0u32, |acc, _| Some(acc * 16 + chars.next()?.to_digit(16)?))
}
