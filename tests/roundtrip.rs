//! Property-based round-trip laws for the codecs.
//!
//! Uses proptest to drive the escape engine, the Base64 codec, the store
//! field framing and the cipher wrapper with random byte sequences, and
//! the tokenizer with random word lists.

use proptest::prelude::*;
use slirc_text::{base64, escape, store, wildcard_match, Escape, Splitter};

fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..512)
}

/// Words free of separators, quotes and wildcards.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_.]{1,12}").expect("valid regex")
}

proptest! {
    #[test]
    fn html_escape_round_trips(data in bytes_strategy()) {
        let encoded = escape::encode(&data, Escape::Html);
        prop_assert_eq!(escape::decode(&encoded, Escape::Html), data);
    }

    #[test]
    fn url_escape_round_trips(data in bytes_strategy()) {
        let encoded = escape::encode(&data, Escape::Url);
        prop_assert_eq!(escape::decode(&encoded, Escape::Url), data);
    }

    #[test]
    fn sql_escape_round_trips(data in bytes_strategy()) {
        let encoded = escape::encode(&data, Escape::Sql);
        prop_assert_eq!(escape::decode(&encoded, Escape::Sql), data);
    }

    #[test]
    fn base64_round_trips_unwrapped(data in bytes_strategy()) {
        prop_assert_eq!(base64::decode(&base64::encode(&data, 0)), data);
    }

    #[test]
    fn base64_round_trips_wrapped(data in bytes_strategy()) {
        let wrapped = base64::encode(&data, 76);
        // the wrapped form decodes directly, and also after manual stripping
        prop_assert_eq!(base64::decode(&wrapped), data.clone());
        let stripped: String = wrapped.chars().filter(|&c| c != '\n').collect();
        prop_assert_eq!(base64::decode(&stripped), data);
    }

    #[test]
    fn store_fields_round_trip(data in bytes_strategy()) {
        let encoded = store::encode_field(&data);
        prop_assert_eq!(store::decode_field(encoded.as_bytes()), data);
    }

    #[test]
    fn split_inverts_join(words in proptest::collection::vec(word_strategy(), 0..16)) {
        let joined = words.join(",");
        prop_assert_eq!(slirc_text::split(&joined, ","), words);
    }

    #[test]
    fn split_allow_empty_inverts_join_exactly(words in proptest::collection::vec(word_strategy(), 1..16)) {
        let joined = words.join(";");
        prop_assert_eq!(Splitter::new(";").allow_empty(true).split(&joined), words);
    }

    #[test]
    fn literal_patterns_match_themselves(word in word_strategy()) {
        prop_assert!(wildcard_match(&word, &word));
        prop_assert!(wildcard_match("*", &word));
        let mut wrapped = String::from("*");
        wrapped.push_str(&word);
        wrapped.push('*');
        prop_assert!(wildcard_match(&wrapped, &word));
    }
}

#[cfg(feature = "crypt")]
mod cipher_props {
    use super::*;
    use slirc_text::cipher;

    proptest! {
        #[test]
        fn cipher_round_trips_to_padded_plaintext(
            data in bytes_strategy(),
            key in proptest::collection::vec(any::<u8>(), 4..=56),
            iv in proptest::collection::vec(any::<u8>(), 0..16),
        ) {
            let secret = cipher::encrypt(&data, &key, &iv).unwrap();
            prop_assert_eq!(secret.len() % cipher::BLOCK_SIZE, 0);

            let mut padded = data;
            while padded.len() % cipher::BLOCK_SIZE != 0 {
                padded.push(0);
            }
            prop_assert_eq!(cipher::decrypt(&secret, &key, &iv).unwrap(), padded);
        }
    }
}
