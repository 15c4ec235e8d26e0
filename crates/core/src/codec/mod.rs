//! Editable text codec for documents.
//!
//! Plain JSON cannot tell an identifier or a date apart from a string, so the
//! editable form is a superset of JSON:
//!
//! | Value | Text |
//! |-------|------|
//! | Identifier | `IDENT(507f191e810c19729de860ea)` (also `ObjectId("...")`) |
//! | Date | `DATE(2024-01-02T03:04:05Z)` (also `ISODate("...")`) |
//! | Float | always has a fraction or exponent: `1.0`, `1e300`, `NaN`, `Infinity` |
//! | Int | bare integer: `42` |
//!
//! Object keys may be quoted or bare (`{name: "Ann"}`). Encoding always
//! quotes keys and always uses the `IDENT`/`DATE` spelling.
//!
//! The codec obeys one law: for every value `v` and indent `n`,
//! `decode(&encode(&v, n)) == v`. Indentation is formatting only.

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;

pub(crate) use decode::parse_date;
pub(crate) use encode::format_date;

use crate::value::{Document, DocumentValue};

/// Constructor name the encoder emits for identifiers.
pub const IDENT_CONSTRUCTOR: &str = "IDENT";

/// Constructor name the encoder emits for dates.
pub const DATE_CONSTRUCTOR: &str = "DATE";

/// Constructor names the decoder accepts for identifiers.
pub const IDENT_ALIASES: &[&str] = &["IDENT", "ObjectId"];

/// Constructor names the decoder accepts for dates.
pub const DATE_ALIASES: &[&str] = &["DATE", "ISODate"];

/// Maximum nesting of arrays and objects accepted by the decoder.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Encode a whole document (convenience for the common case).
pub fn encode_document(doc: &Document, indent: usize) -> String {
    encode(&DocumentValue::Object(doc.clone()), indent)
}
