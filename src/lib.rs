//! # slirc-text
//!
//! Text value and codec toolkit for the Straylight IRC suite: the string
//! plumbing a bouncer or daemon leans on when it formats, stores and
//! matches user-visible text.
//!
//! ## Features
//!
//! - Bidirectional HTML / URL / SQL-literal escaping with defined
//!   malformed-input fallbacks
//! - Glob-style wildcard matching (`*`, `?`) for hostmask-shaped patterns
//! - Delimiter- and quote-aware tokenizing, plus query-string and
//!   option-string parsers built on top
//! - Base64 with optional MIME-style line wrapping and a permissive decoder
//! - Blowfish-CBC encryption for stored secrets (feature `crypt`, on by
//!   default)
//! - A flat-file persisted key/value mapping with pluggable read/write
//!   filters
//!
//! Everything is synchronous, allocation-per-result, and free of shared
//! state; the persisted mapping is the only thing that touches disk.

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```
//! use slirc_text::{escape, wildcard_match, Escape};
//! use slirc_text::split::{quote_split, token};
//!
//! // pick a command word out of an IRC line
//! assert_eq!(token("!seen JoeUser", 0, " "), "!seen");
//!
//! // shell-ish argument splitting
//! assert_eq!(quote_split(r#"add "Joe User" ops"#), vec!["add", "Joe User", "ops"]);
//!
//! // hostmask matching
//! assert!(wildcard_match("*!*@*.example.com", "joe!joe@box.example.com"));
//!
//! // web-safe output
//! let line = escape::encode("5 > 4 & 4 < 5".as_bytes(), Escape::Html);
//! assert_eq!(line, b"5 &gt; 4 &amp; 4 &lt; 5");
//! ```

pub mod base64;
#[cfg(feature = "crypt")]
pub mod cipher;
pub mod error;
pub mod escape;
pub mod format;
pub mod split;
pub mod store;
pub mod wildcard;

#[cfg(feature = "crypt")]
pub use self::error::CipherError;
pub use self::error::StoreError;
pub use self::escape::{transcode, Escape};
pub use self::split::{
    parse_options, parse_query, quote_split, split, token, token_rest, Splitter,
};
pub use self::store::DiskMap;
pub use self::wildcard::wildcard_match;
