//! Delimiter- and quote-aware tokenizing.
//!
//! The workhorse is [`Splitter`], a small builder carrying the separator
//! and flag set; the free functions cover the common defaults. Scanning is
//! byte-oriented (separators and quotes match as byte sequences); results
//! are materialized as owned `String`s, lossily if a pathological input
//! splits a multi-byte sequence.
//!
//! On top of the splitter sit the derived parsers the bouncer modules use
//! everywhere: [`parse_query`] for `key=value&key=value` query strings,
//! [`parse_options`] for space-separated option lists with quoted values,
//! and [`quote_split`] for shell-ish word splitting.
//!
//! # Examples
//!
//! ```
//! use slirc_text::split::{split, token, token_rest, Splitter};
//!
//! assert_eq!(token("a:b:c", 1, ":"), "b");
//! assert_eq!(token_rest("a:b:c", 1, ":"), "b:c");
//! assert_eq!(split("a,,b", ","), vec!["a", "b"]);
//! assert_eq!(
//!     Splitter::new(",").allow_empty(true).split("a,,b"),
//!     vec!["a", "", "b"]
//! );
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::escape::{self, Escape};

/// Configurable delimiter- and quote-aware splitter.
///
/// Defaults: empty tokens are collapsed, no quote pair, quotes kept,
/// whitespace kept. A quote pair only takes effect when both sides are
/// non-empty; a delimiter inside a quoted span never separates.
#[derive(Clone, Debug)]
pub struct Splitter<'a> {
    sep: &'a str,
    allow_empty: bool,
    quote_left: &'a str,
    quote_right: &'a str,
    trim_quotes: bool,
    trim_whitespace: bool,
}

impl<'a> Splitter<'a> {
    /// Creates a splitter over the given separator with default flags.
    pub fn new(sep: &'a str) -> Self {
        Splitter {
            sep,
            allow_empty: false,
            quote_left: "",
            quote_right: "",
            trim_quotes: false,
            trim_whitespace: false,
        }
    }

    /// Whether runs of separators produce empty tokens (`true`) or
    /// collapse, with leading separators skipped (`false`, the default).
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Sets the quote pair. Both sides must be non-empty for quoting to
    /// take effect.
    pub fn quotes(mut self, left: &'a str, right: &'a str) -> Self {
        self.quote_left = left;
        self.quote_right = right;
        self
    }

    /// Whether the quote delimiters themselves are dropped from emitted
    /// tokens.
    pub fn trim_quotes(mut self, trim: bool) -> Self {
        self.trim_quotes = trim;
        self
    }

    /// Whether each token is whitespace-trimmed before a separator ends it.
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    fn quoting(&self) -> bool {
        !self.quote_left.is_empty() && !self.quote_right.is_empty()
    }

    /// Splits `input` into its full token sequence.
    ///
    /// A final non-empty partial token is appended after the scan; it is
    /// not whitespace-trimmed even under `trim_whitespace` (historical
    /// quirk, kept).
    ///
    /// An empty separator splits into individual characters.
    pub fn split(&self, input: &str) -> Vec<String> {
        if input.is_empty() {
            return Vec::new();
        }
        if self.sep.is_empty() {
            return input.chars().map(String::from).collect();
        }

        let bytes = input.as_bytes();
        let sep = self.sep.as_bytes();
        let quote_left = self.quote_left.as_bytes();
        let quote_right = self.quote_right.as_bytes();
        let quoting = self.quoting();

        let mut out = Vec::new();
        let mut current: Vec<u8> = Vec::new();
        let mut inside = false;
        let mut i = 0;

        if !self.allow_empty {
            while bytes[i..].starts_with(sep) {
                i += sep.len();
            }
        }

        while i < bytes.len() {
            if quoting && !inside && bytes[i..].starts_with(quote_left) {
                if !self.trim_quotes {
                    current.extend_from_slice(quote_left);
                }
                i += quote_left.len();
                inside = true;
                continue;
            }

            if quoting && inside && bytes[i..].starts_with(quote_right) {
                if !self.trim_quotes {
                    current.extend_from_slice(quote_right);
                }
                i += quote_right.len();
                inside = false;
                continue;
            }

            if !inside && bytes[i..].starts_with(sep) {
                if self.trim_whitespace {
                    trim_in_place(&mut current);
                }
                out.push(materialize(&current));
                current.clear();
                i += sep.len();
                if !self.allow_empty {
                    while bytes[i..].starts_with(sep) {
                        i += sep.len();
                    }
                }
                inside = false;
                continue;
            }

            current.push(bytes[i]);
            i += 1;
        }

        if !current.is_empty() {
            out.push(materialize(&current));
        }

        out
    }

    /// Splits `input` into a duplicate-free, unordered token set.
    pub fn split_set(&self, input: &str) -> BTreeSet<String> {
        self.split(input).into_iter().collect()
    }

    /// Returns the token at position `pos`, or an empty string when `pos`
    /// is beyond the available tokens.
    ///
    /// Quoted spans are opaque to the separator for position counting, but
    /// the quote delimiters are kept in the returned token.
    pub fn token(&self, input: &str, pos: usize) -> String {
        self.token_impl(input, pos, false)
    }

    /// Returns everything from the start of the token at `pos` through the
    /// end of the input, verbatim.
    pub fn token_rest(&self, input: &str, pos: usize) -> String {
        self.token_impl(input, pos, true)
    }

    fn token_impl(&self, input: &str, pos: usize, rest: bool) -> String {
        if self.sep.is_empty() {
            // empty separator: positions are individual characters
            if rest {
                return input.chars().skip(pos).collect();
            }
            return input.chars().nth(pos).map(String::from).unwrap_or_default();
        }

        let bytes = input.as_bytes();
        let sep = self.sep.as_bytes();
        let quote_left = self.quote_left.as_bytes();
        let quote_right = self.quote_right.as_bytes();
        let quoting = self.quoting();

        let mut i = 0;
        let mut inside = false;

        if !self.allow_empty {
            while bytes[i..].starts_with(sep) {
                i += sep.len();
            }
        }

        // walk forward until `pos` separators have been crossed
        let mut remaining = pos;
        while remaining > 0 && i < bytes.len() {
            if quoting && !inside && bytes[i..].starts_with(quote_left) {
                i += quote_left.len();
                inside = true;
                continue;
            }
            if quoting && inside && bytes[i..].starts_with(quote_right) {
                i += quote_right.len();
                inside = false;
                continue;
            }
            if !inside && bytes[i..].starts_with(sep) {
                i += sep.len();
                if !self.allow_empty {
                    while bytes[i..].starts_with(sep) {
                        i += sep.len();
                    }
                }
                remaining -= 1;
                continue;
            }
            i += 1;
        }

        if i >= bytes.len() {
            return String::new();
        }

        if rest {
            return materialize(&bytes[i..]);
        }

        // scan for the separator ending this token
        let start = i;
        let mut inside = false;
        while i < bytes.len() {
            if quoting && !inside && bytes[i..].starts_with(quote_left) {
                i += quote_left.len();
                inside = true;
                continue;
            }
            if quoting && inside && bytes[i..].starts_with(quote_right) {
                i += quote_right.len();
                inside = false;
                continue;
            }
            if !inside && bytes[i..].starts_with(sep) {
                break;
            }
            i += 1;
        }

        materialize(&bytes[start..i])
    }
}

fn materialize(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn trim_in_place(buf: &mut Vec<u8>) {
    while matches!(buf.last(), Some(&(b' ' | b'\t' | b'\r' | b'\n'))) {
        buf.pop();
    }
    let lead = buf
        .iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count();
    buf.drain(..lead);
}

/// Returns the token at `pos` in `input`, with runs of separators
/// collapsed. See [`Splitter::token`].
pub fn token(input: &str, pos: usize, sep: &str) -> String {
    Splitter::new(sep).token(input, pos)
}

/// Returns the suffix of `input` starting at token `pos`. See
/// [`Splitter::token_rest`].
pub fn token_rest(input: &str, pos: usize, sep: &str) -> String {
    Splitter::new(sep).token_rest(input, pos)
}

/// Splits `input` on `sep` with empty tokens collapsed. See
/// [`Splitter::split`] for the configurable form.
pub fn split(input: &str, sep: &str) -> Vec<String> {
    Splitter::new(sep).split(input)
}

/// Splits `input` into space-separated words, honoring double quotes and
/// stripping them from the result.
///
/// ```
/// use slirc_text::split::quote_split;
///
/// assert_eq!(
///     quote_split(r#"say "hello world" twice"#),
///     vec!["say", "hello world", "twice"]
/// );
/// ```
pub fn quote_split(input: &str) -> Vec<String> {
    Splitter::new(" ")
        .quotes("\"", "\"")
        .trim_quotes(true)
        .split(input)
}

/// Parses a `key=value&key=value` query string into a mapping, URL-decoding
/// both sides of every pair.
///
/// Pairs without a `=` map to an empty value; later duplicate keys
/// overwrite earlier ones. Decoded bytes that do not form valid UTF-8 are
/// replaced lossily.
///
/// ```
/// use slirc_text::split::parse_query;
///
/// let args = parse_query("nick=some+one&msg=50%25%20off");
/// assert_eq!(args["nick"], "some one");
/// assert_eq!(args["msg"], "50% off");
/// ```
pub fn parse_query(input: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();

    for pair in Splitter::new("&").allow_empty(true).split(input) {
        let key = token(&pair, 0, "=");
        let value = token_rest(&pair, 1, "=");
        out.insert(url_decode(&key), url_decode(&value));
    }

    out
}

fn url_decode(text: &str) -> String {
    materialize(&escape::decode(text.as_bytes(), Escape::Url))
}

/// Parses a space-separated option string of `key=value` assignments.
///
/// Several space-separated keys in front of a single `=value` all receive
/// that value; keys with no value at all map to the empty string. Values
/// may be double-quoted to carry spaces.
///
/// ```
/// use slirc_text::split::parse_options;
///
/// let opts = parse_options(r#"ignore prefix="-> " depth=3"#);
/// assert_eq!(opts["ignore"], "");
/// assert_eq!(opts["prefix"], "-> ");
/// assert_eq!(opts["depth"], "3");
/// ```
pub fn parse_options(input: &str) -> BTreeMap<String, String> {
    let assign = Splitter::new("=").quotes("\"", "\"");
    let word = Splitter::new(" ").quotes("\"", "\"");
    let word_unquoted = word.clone().trim_quotes(true);

    let mut out = BTreeMap::new();
    let mut copy = input.to_string();

    while !copy.is_empty() {
        let name = assign.token(&copy, 0).trim().to_string();
        copy = assign.token_rest(&copy, 1).trim_start().to_string();

        if name.is_empty() {
            continue;
        }

        let keys = word_unquoted.split(&name);
        let count = keys.len();

        for (idx, key) in keys.into_iter().enumerate() {
            if idx + 1 == count {
                let value = word_unquoted
                    .split(&copy)
                    .into_iter()
                    .next()
                    .unwrap_or_default();
                out.insert(key, value);
                copy = word.token_rest(&copy, 1);
            } else {
                out.insert(key, String::new());
            }
        }
    }

    out
}

/// Replaces every occurrence of `from` with `to` outside quoted spans.
///
/// The quote delimiters themselves are dropped from the result when
/// `remove_delims` is set. An empty `from` returns the input unchanged.
///
/// ```
/// use slirc_text::split::replace_outside_quotes;
///
/// assert_eq!(
///     replace_outside_quotes("x [y] \"x [y]\"", "[y]", "z", "\"", "\"", false),
///     "x z \"x [y]\""
/// );
/// ```
pub fn replace_outside_quotes(
    input: &str,
    from: &str,
    to: &str,
    quote_left: &str,
    quote_right: &str,
    remove_delims: bool,
) -> String {
    if from.is_empty() {
        return input.to_string();
    }

    let bytes = input.as_bytes();
    let needle = from.as_bytes();
    let replacement = to.as_bytes();
    let quote_left = quote_left.as_bytes();
    let quote_right = quote_right.as_bytes();

    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut inside = false;
    let mut i = 0;

    while i < bytes.len() {
        if !inside && !quote_left.is_empty() && bytes[i..].starts_with(quote_left) {
            if !remove_delims {
                out.extend_from_slice(quote_left);
            }
            i += quote_left.len();
            inside = true;
        } else if inside && !quote_right.is_empty() && bytes[i..].starts_with(quote_right) {
            if !remove_delims {
                out.extend_from_slice(quote_right);
            }
            i += quote_right.len();
            inside = false;
        } else if !inside && bytes[i..].starts_with(needle) {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    materialize(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_positions() {
        assert_eq!(token("a:b:c", 0, ":"), "a");
        assert_eq!(token("a:b:c", 1, ":"), "b");
        assert_eq!(token("a:b:c", 2, ":"), "c");
        assert_eq!(token("a:b:c", 3, ":"), "");
    }

    #[test]
    fn token_rest_returns_suffix() {
        assert_eq!(token_rest("a:b:c", 1, ":"), "b:c");
        assert_eq!(token_rest("a:b:c", 0, ":"), "a:b:c");
        assert_eq!(token_rest("a:b:c", 5, ":"), "");
    }

    #[test]
    fn token_collapses_separator_runs() {
        assert_eq!(token("a::b", 1, ":"), "b");
        assert_eq!(token("::a:b", 0, ":"), "a");
        assert_eq!(token("::a:b", 1, ":"), "b");
    }

    #[test]
    fn token_allow_empty_counts_every_separator() {
        let t = Splitter::new(":").allow_empty(true);
        assert_eq!(t.token("a::b", 0), "a");
        assert_eq!(t.token("a::b", 1), "");
        assert_eq!(t.token("a::b", 2), "b");
        assert_eq!(t.token(":a", 0), "");
        assert_eq!(t.token(":a", 1), "a");
    }

    #[test]
    fn token_ignores_separators_in_quotes() {
        let t = Splitter::new(" ").quotes("\"", "\"");
        assert_eq!(t.token(r#"say "a b" c"#, 1), r#""a b""#);
        assert_eq!(t.token(r#"say "a b" c"#, 2), "c");
        assert_eq!(t.token_rest(r#"say "a b" c"#, 1), r#""a b" c"#);
    }

    #[test]
    fn token_multichar_separator() {
        assert_eq!(token("a::b::c", 1, "::"), "b");
        assert_eq!(token_rest("a::b::c", 1, "::"), "b::c");
    }

    #[test]
    fn split_collapsing_and_empty_tokens() {
        assert_eq!(split("a,,b", ","), vec!["a", "b"]);
        assert_eq!(
            Splitter::new(",").allow_empty(true).split("a,,b"),
            vec!["a", "", "b"]
        );
        assert_eq!(split(",,a,b,", ","), vec!["a", "b"]);
        assert_eq!(
            Splitter::new(",").allow_empty(true).split(",a,"),
            vec!["", "a"]
        );
    }

    #[test]
    fn split_empty_input_and_separator() {
        assert_eq!(split("", ","), Vec::<String>::new());
        assert_eq!(split("abc", ""), vec!["a", "b", "c"]);
        assert_eq!(token("abc", 1, ""), "b");
        assert_eq!(token_rest("abc", 1, ""), "bc");
    }

    #[test]
    fn split_quotes_kept_or_trimmed() {
        let base = Splitter::new(" ").quotes("\"", "\"");
        assert_eq!(
            base.split(r#"a "b c" d"#),
            vec!["a", "\"b c\"", "d"]
        );
        assert_eq!(
            base.clone().trim_quotes(true).split(r#"a "b c" d"#),
            vec!["a", "b c", "d"]
        );
    }

    #[test]
    fn split_trim_whitespace() {
        let s = Splitter::new(",").trim_whitespace(true);
        assert_eq!(s.split(" a , b ,c,"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_set_dedupes() {
        let set = Splitter::new(" ").split_set("b a b c a");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn quote_split_words() {
        assert_eq!(
            quote_split(r#"one "two three" four"#),
            vec!["one", "two three", "four"]
        );
        assert_eq!(quote_split("plain words"), vec!["plain", "words"]);
    }

    #[test]
    fn parse_query_pairs() {
        let args = parse_query("a=1&b=two+words&c=%2F");
        assert_eq!(args["a"], "1");
        assert_eq!(args["b"], "two words");
        assert_eq!(args["c"], "/");
    }

    #[test]
    fn parse_query_edge_shapes() {
        let args = parse_query("lone&x=1&x=2");
        assert_eq!(args["lone"], "");
        // later duplicates overwrite
        assert_eq!(args["x"], "2");

        // the value keeps any further = signs
        let args = parse_query("expr=a%3Db=c");
        assert_eq!(args["expr"], "a=b=c");
    }

    #[test]
    fn parse_options_shared_and_quoted_values() {
        let opts = parse_options(r#"key1 key2="a b" key3=c"#);
        assert_eq!(opts["key1"], "");
        assert_eq!(opts["key2"], "a b");
        assert_eq!(opts["key3"], "c");
    }

    #[test]
    fn parse_options_bare_keys() {
        let opts = parse_options("alpha beta");
        assert_eq!(opts["alpha"], "");
        assert_eq!(opts["beta"], "");
        assert!(parse_options("").is_empty());
    }

    #[test]
    fn replace_respects_quotes() {
        assert_eq!(
            replace_outside_quotes("x [y] \"x [y]\"", "[y]", "z", "\"", "\"", false),
            "x z \"x [y]\""
        );
        assert_eq!(
            replace_outside_quotes("a \"b\" a", "a", "c", "\"", "\"", true),
            "c b c"
        );
        assert_eq!(
            replace_outside_quotes("aaa", "", "x", "", "", false),
            "aaa"
        );
    }
}
