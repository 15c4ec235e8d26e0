//! Editable text → DocumentValue
//!
//! A small recursive-descent parser over the literal grammar described in
//! [`crate::codec`]. Every failure carries the 1-based line and column where
//! the parser gave up.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{DATE_ALIASES, IDENT_ALIASES, MAX_NESTING_DEPTH};
use crate::error::{Error, Result};
use crate::object_id::ObjectId;
use crate::value::{Document, DocumentValue};

/// Parse editable text into a value.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] when the text is not a single
/// well-formed literal.
pub fn decode(text: &str) -> Result<DocumentValue> {
    let mut parser = Parser::new(text);
    parser.skip_ws()?;
    let value = parser.parse_value(0)?;
    parser.skip_ws()?;
    if !parser.at_end() {
        return Err(parser.error_here("unexpected trailing characters"));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Skip whitespace plus `// line` and `/* block */` comments.
    fn skip_ws(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                Some('/') if self.rest().starts_with("//") => {
                    let len = self.rest().find('\n').unwrap_or(self.rest().len());
                    self.pos += len;
                }
                Some('/') if self.rest().starts_with("/*") => {
                    let start = self.pos;
                    match self.rest()[2..].find("*/") {
                        Some(end) => self.pos += end + 4,
                        None => return Err(self.error_at(start, "unterminated comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn error_at(&self, pos: usize, reason: impl Into<String>) -> Error {
        let before = &self.text[..pos.min(self.text.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Error::MalformedDocument {
            reason: reason.into(),
            line,
            column,
        }
    }

    fn error_here(&self, reason: impl Into<String>) -> Error {
        self.error_at(self.pos, reason)
    }

    fn expect(&mut self, wanted: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error_here(format!("expected '{}', found '{}'", wanted, c))),
            None => Err(self.error_here(format!("expected '{}', found end of input", wanted))),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<DocumentValue> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.error_here(format!(
                "nesting deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        match self.peek() {
            None => Err(self.error_here("unexpected end of input")),
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some('"') | Some('\'') => Ok(DocumentValue::Str(self.parse_string()?)),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_word_start(c) => self.parse_word(),
            Some(c) => Err(self.error_here(format!("unexpected character '{}'", c))),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<DocumentValue> {
        let start = self.pos;
        self.expect('{')?;
        let mut map = Document::new();
        loop {
            self.skip_ws()?;
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(DocumentValue::Object(map));
                }
                None => return Err(self.error_at(start, "unterminated object")),
                _ => {}
            }
            let key = self.parse_key()?;
            self.skip_ws()?;
            self.expect(':')?;
            self.skip_ws()?;
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);
            self.skip_ws()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(DocumentValue::Object(map));
                }
                None => return Err(self.error_at(start, "unterminated object")),
                Some(c) => {
                    return Err(self.error_here(format!("expected ',' or '}}', found '{}'", c)))
                }
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some('"') | Some('\'') => self.parse_string(),
            Some(c) if is_word_start(c) => Ok(self.read_word().to_string()),
            Some(c) => Err(self.error_here(format!("expected object key, found '{}'", c))),
            None => Err(self.error_here("expected object key, found end of input")),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<DocumentValue> {
        let start = self.pos;
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws()?;
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    return Ok(DocumentValue::Array(items));
                }
                None => return Err(self.error_at(start, "unterminated array")),
                _ => {}
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_ws()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(DocumentValue::Array(items));
                }
                None => return Err(self.error_at(start, "unterminated array")),
                Some(c) => return Err(self.error_here(format!("expected ',' or ']', found '{}'", c))),
            }
        }
    }

    /// A double- or single-quoted string; the opening quote must close it.
    fn parse_string(&mut self) -> Result<String> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error_at(start, "expected a string")),
        };
        let mut out = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(self.error_at(start, "unterminated string")),
            };
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let escape_pos = self.pos - 1;
                    match self.bump() {
                        Some('"') => out.push('"'),
                        Some('\'') => out.push('\''),
                        Some('\\') => out.push('\\'),
                        Some('/') => out.push('/'),
                        Some('b') => out.push('\u{08}'),
                        Some('f') => out.push('\u{0c}'),
                        Some('n') => out.push('\n'),
                        Some('r') => out.push('\r'),
                        Some('t') => out.push('\t'),
                        Some('u') => out.push(self.parse_unicode_escape(escape_pos)?),
                        Some(other) => {
                            return Err(self.error_at(
                                escape_pos,
                                format!("invalid escape sequence '\\{}'", other),
                            ))
                        }
                        None => return Err(self.error_at(start, "unterminated string")),
                    }
                }
                c if (c as u32) < 0x20 => {
                    return Err(self.error_at(
                        self.pos - 1,
                        "control character in string (use an escape sequence)",
                    ))
                }
                c => out.push(c),
            }
        }
    }

    fn read_hex4(&mut self, escape_pos: usize) -> Result<u32> {
        let digits = self.rest().get(..4).unwrap_or("");
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error_at(escape_pos, "invalid unicode escape"));
        }
        self.pos += 4;
        u32::from_str_radix(digits, 16).map_err(|_| self.error_at(escape_pos, "invalid unicode escape"))
    }

    fn parse_unicode_escape(&mut self, escape_pos: usize) -> Result<char> {
        let first = self.read_hex4(escape_pos)?;
        let code = if (0xD800..0xDC00).contains(&first) {
            if !self.rest().starts_with("\\u") {
                return Err(self.error_at(escape_pos, "unpaired surrogate in unicode escape"));
            }
            self.pos += 2;
            let second = self.read_hex4(escape_pos)?;
            if !(0xDC00..0xE000).contains(&second) {
                return Err(self.error_at(escape_pos, "unpaired surrogate in unicode escape"));
            }
            0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
        } else if (0xDC00..0xE000).contains(&first) {
            return Err(self.error_at(escape_pos, "unpaired surrogate in unicode escape"));
        } else {
            first
        };
        char::from_u32(code).ok_or_else(|| self.error_at(escape_pos, "invalid unicode escape"))
    }

    fn parse_number(&mut self) -> Result<DocumentValue> {
        let start = self.pos;
        if self.rest().starts_with("-Infinity") {
            self.pos += "-Infinity".len();
            return Ok(DocumentValue::Float(f64::NEG_INFINITY));
        }
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let lexeme = &self.text[start..self.pos];
        let digits = lexeme.strip_prefix('-').unwrap_or(lexeme);
        if !digits.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error_at(start, format!("invalid number '{}'", lexeme)));
        }
        if lexeme.contains(&['.', 'e', 'E'][..]) {
            return lexeme
                .parse::<f64>()
                .map(DocumentValue::Float)
                .map_err(|_| self.error_at(start, format!("invalid number '{}'", lexeme)));
        }
        match lexeme.parse::<i64>() {
            Ok(i) => Ok(DocumentValue::Int(i)),
            // Integers beyond i64 degrade to floats rather than failing
            Err(_) => lexeme
                .parse::<f64>()
                .map(DocumentValue::Float)
                .map_err(|_| self.error_at(start, format!("invalid number '{}'", lexeme))),
        }
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_word_char(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.text[start..self.pos]
    }

    fn parse_word(&mut self) -> Result<DocumentValue> {
        let start = self.pos;
        let word = self.read_word();
        match word {
            "null" => return Ok(DocumentValue::Null),
            "true" => return Ok(DocumentValue::Bool(true)),
            "false" => return Ok(DocumentValue::Bool(false)),
            "NaN" => return Ok(DocumentValue::Float(f64::NAN)),
            "Infinity" => return Ok(DocumentValue::Float(f64::INFINITY)),
            _ => {}
        }
        self.skip_ws()?;
        if self.peek() != Some('(') {
            return Err(self.error_at(start, format!("unexpected token '{}'", word)));
        }
        if IDENT_ALIASES.contains(&word) {
            let (arg, arg_pos) = self.parse_constructor_arg(start)?;
            ObjectId::parse_hex(&arg)
                .map(DocumentValue::Identifier)
                .map_err(|e| self.error_at(arg_pos, format!("invalid identifier: {}", e)))
        } else if DATE_ALIASES.contains(&word) {
            let (arg, arg_pos) = self.parse_constructor_arg(start)?;
            parse_date(&arg)
                .map(DocumentValue::Date)
                .ok_or_else(|| self.error_at(arg_pos, format!("invalid date '{}'", arg)))
        } else {
            Err(self.error_at(start, format!("unknown constructor '{}'", word)))
        }
    }

    /// Parses `( "arg" )` or `( arg )`, returning the argument and where it starts.
    fn parse_constructor_arg(&mut self, ctor_pos: usize) -> Result<(String, usize)> {
        self.expect('(')?;
        self.skip_ws()?;
        let arg_pos = self.pos;
        let arg = if matches!(self.peek(), Some('"') | Some('\'')) {
            self.parse_string()?
        } else {
            match self.rest().find(')') {
                Some(end) => {
                    let raw = self.rest()[..end].trim_end().to_string();
                    self.pos += self.rest()[..end].trim_end().len();
                    raw
                }
                None => return Err(self.error_at(ctor_pos, "unterminated constructor literal")),
            }
        };
        self.skip_ws()?;
        match self.peek() {
            Some(')') => {
                self.pos += 1;
                Ok((arg, arg_pos))
            }
            None => Err(self.error_at(ctor_pos, "unterminated constructor literal")),
            Some(c) => Err(self.error_here(format!("expected ')', found '{}'", c))),
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// RFC 3339 with any offset, a bare local timestamp, or a bare date; all read as UTC.
///
/// Years outside 0000-9999 carry a sign (`+10000-01-01T00:00:00Z`), which
/// RFC 3339 cannot express, so `Z` timestamps also go through `%Y`.
pub(crate) fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn malformed(text: &str) -> (String, usize, usize) {
        match decode(text) {
            Err(Error::MalformedDocument {
                reason,
                line,
                column,
            }) => (reason, line, column),
            other => panic!("expected MalformedDocument for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn plain_json_literals() {
        assert_eq!(decode("null").unwrap(), DocumentValue::Null);
        assert_eq!(decode(" true ").unwrap(), DocumentValue::Bool(true));
        assert_eq!(decode("-42").unwrap(), DocumentValue::Int(-42));
        assert_eq!(decode("4.5e2").unwrap(), DocumentValue::Float(450.0));
        assert_eq!(decode("\"hi\"").unwrap(), DocumentValue::Str("hi".into()));
    }

    #[test]
    fn shell_style_document_with_bare_keys() {
        let value = decode("{_id: IDENT(507f191e810c19729de860ea), name: \"Ann\"}").unwrap();
        let doc = value.as_object().unwrap();
        assert_eq!(
            doc.get("_id"),
            Some(&DocumentValue::Identifier(
                ObjectId::parse_hex("507f191e810c19729de860ea").unwrap()
            ))
        );
        assert_eq!(doc.get("name"), Some(&DocumentValue::Str("Ann".into())));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["_id", "name"]);
    }

    #[test]
    fn constructor_aliases_and_quoted_arguments() {
        let a = decode("ObjectId(\"507f191e810c19729de860ea\")").unwrap();
        let b = decode("IDENT( 507f191e810c19729de860ea )").unwrap();
        assert_eq!(a, b);

        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            decode("ISODate(\"2024-01-02T03:04:05Z\")").unwrap(),
            DocumentValue::Date(expected)
        );
        assert_eq!(
            decode("DATE(2024-01-02T05:04:05+02:00)").unwrap(),
            DocumentValue::Date(expected)
        );
        assert_eq!(
            decode("DATE(2024-01-02)").unwrap(),
            DocumentValue::Date(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn big_integers_degrade_to_float() {
        assert_eq!(
            decode("18446744073709551616").unwrap(),
            DocumentValue::Float(18446744073709551616.0)
        );
    }

    #[test]
    fn special_float_tokens() {
        assert_eq!(decode("Infinity").unwrap(), DocumentValue::Float(f64::INFINITY));
        assert_eq!(decode("-Infinity").unwrap(), DocumentValue::Float(f64::NEG_INFINITY));
        assert!(matches!(decode("NaN").unwrap(), DocumentValue::Float(f) if f.is_nan()));
    }

    #[test]
    fn unicode_escapes_and_surrogates() {
        assert_eq!(decode(r#""\u00e9""#).unwrap(), DocumentValue::Str("é".into()));
        assert_eq!(decode(r#""\ud83d\ude00""#).unwrap(), DocumentValue::Str("😀".into()));
        let (reason, _, _) = malformed(r#""\ud83d""#);
        assert!(reason.contains("surrogate"));
        let (reason, _, _) = malformed(r#""\ude00""#);
        assert!(reason.contains("surrogate"));
    }

    #[test]
    fn single_quoted_strings_and_keys() {
        let value = decode(r#"{'name': 'Ann', tag: 'it\'s', q: '"x"', id: IDENT('507f191e810c19729de860ea')}"#)
            .unwrap();
        let DocumentValue::Object(doc) = value else {
            panic!("expected an object");
        };
        assert_eq!(doc["name"], DocumentValue::Str("Ann".into()));
        assert_eq!(doc["tag"], DocumentValue::Str("it's".into()));
        assert_eq!(doc["q"], DocumentValue::Str("\"x\"".into()));
        assert!(matches!(doc["id"], DocumentValue::Identifier(_)));

        let (reason, line, column) = malformed("{a: 'open\"}");
        assert!(reason.contains("unterminated string"));
        assert_eq!((line, column), (1, 5));
    }

    #[test]
    fn comments_are_skipped() {
        let text = "// edited by hand\n{\n  a: 1, // first\n  /* b: 2, */ c: 3\n}\n/* trailing */";
        let DocumentValue::Object(doc) = decode(text).unwrap() else {
            panic!("expected an object");
        };
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(
            decode("[1 /* one */, 2]").unwrap(),
            DocumentValue::Array(vec![DocumentValue::Int(1), DocumentValue::Int(2)])
        );
    }

    #[test]
    fn unterminated_comment_points_at_its_start() {
        let (reason, line, column) = malformed("{a: 1,\n /* never closed }");
        assert!(reason.contains("unterminated comment"));
        assert_eq!((line, column), (2, 2));
    }

    #[test]
    fn dates_beyond_four_digit_years() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            decode("DATE(+10000-01-01T00:00:00Z)").unwrap(),
            DocumentValue::Date(far)
        );
        let before = Utc.with_ymd_and_hms(-1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            decode("DATE(-0001-01-01T00:00:00Z)").unwrap(),
            DocumentValue::Date(before)
        );
        for date in [far, before, DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC] {
            let text = crate::codec::encode(&DocumentValue::Date(date), 0);
            assert_eq!(decode(&text).unwrap(), DocumentValue::Date(date), "{}", text);
        }
    }

    #[test]
    fn trailing_commas_are_tolerated() {
        assert_eq!(
            decode("[1, 2,]").unwrap(),
            DocumentValue::Array(vec![DocumentValue::Int(1), DocumentValue::Int(2)])
        );
        assert!(decode("{a: 1,}").is_ok());
    }

    #[test]
    fn unterminated_string_points_at_its_start() {
        let (reason, line, column) = malformed("{\n  \"name\": \"Ann\n}");
        assert!(reason.contains("control character") || reason.contains("unterminated"));
        assert_eq!(line, 2);
        assert!(column >= 11);

        let (reason, line, column) = malformed("[\"abc");
        assert_eq!(reason, "unterminated string");
        assert_eq!((line, column), (1, 2));
    }

    #[test]
    fn unterminated_containers() {
        assert_eq!(malformed("{\"a\": 1").0, "unterminated object");
        assert_eq!(malformed("[1, 2").0, "unterminated array");
        assert_eq!(malformed("IDENT(507f").0, "unterminated constructor literal");
    }

    #[test]
    fn unknown_constructor_is_named() {
        let (reason, line, column) = malformed("{\n  x: Foo(1)\n}");
        assert_eq!(reason, "unknown constructor 'Foo'");
        assert_eq!((line, column), (2, 6));
    }

    #[test]
    fn non_hex_identifier_is_rejected() {
        let (reason, _, column) = malformed("IDENT(507f191e810c19729de860eZ)");
        assert!(reason.starts_with("invalid identifier"));
        assert_eq!(column, 7);
    }

    #[test]
    fn bare_words_and_trailing_garbage() {
        assert_eq!(malformed("undefined").0, "unexpected token 'undefined'");
        assert_eq!(malformed("{} {}").0, "unexpected trailing characters");
        assert_eq!(malformed("").0, "unexpected end of input");
        assert_eq!(malformed("-").0, "invalid number '-'");
    }

    #[test]
    fn invalid_date_is_rejected() {
        assert!(malformed("DATE(yesterday)").0.starts_with("invalid date"));
    }

    #[test]
    fn nesting_limit() {
        let deep = "[".repeat(MAX_NESTING_DEPTH + 2) + &"]".repeat(MAX_NESTING_DEPTH + 2);
        assert!(malformed(&deep).0.contains("nesting"));
        let ok = "[".repeat(MAX_NESTING_DEPTH) + &"]".repeat(MAX_NESTING_DEPTH);
        assert!(decode(&ok).is_ok());
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let value = decode("{a: 1, b: 2, a: 3}").unwrap();
        let doc = value.as_object().unwrap();
        assert_eq!(doc.get("a"), Some(&DocumentValue::Int(3)));
        assert_eq!(doc.len(), 2);
    }
}
