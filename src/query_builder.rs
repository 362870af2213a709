use std::fmt::{self, Display, Formatter, Write};

use bitflags::bitflags;
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, CONTROLS, NON_ALPHANUMERIC};

/// Builds a URI with a query string.
pub struct QueryBuilder {
    uri: String,
    next_append: Append,
}

bitflags! {
    struct Append: u8 {
        const QUESTION  = 0b01;
        const AMPERSAND = 0b10;
    }
}

/// Bytes escaped in query values. Commas separate list items in several parameters and are
/// left as is.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b',');

/// Bytes escaped in a search query embedded in the path. `;` separates batched queries and `/`
/// separates path segments, so both are escaped within a query.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b';')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A search query encoded for use as (part of) a path segment.
pub struct PathQuery<'a>(pub &'a str);

impl QueryBuilder {
    /// Returns a `QueryBuilder` that appends query string to `uri`.
    pub fn new(uri: String) -> Self {
        QueryBuilder {
            uri,
            next_append: Append::QUESTION,
        }
    }

    pub fn append(&mut self, k: &str, v: &str) {
        self.append_encoded(k, percent_encode(v));
    }

    pub fn append_encoded<V: Display>(&mut self, k: &str, v: V) {
        self.append_delim();
        write!(self.uri, "{}={}", k, v).unwrap();
    }

    fn append_delim(&mut self) {
        if self.next_append.contains(Append::QUESTION) {
            self.uri.push('?');
            self.next_append.remove(Append::QUESTION);
        }
        if self.next_append.contains(Append::AMPERSAND) {
            self.uri.push('&');
        } else {
            self.next_append.insert(Append::AMPERSAND);
        }
    }

    pub fn build(self) -> String {
        self.uri
    }
}

impl<'a> Display for PathQuery<'a> {
    /// Spaces are written as `+`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut words = self.0.split(' ');
        if let Some(word) = words.next() {
            Display::fmt(&utf8_percent_encode(word, PATH_SEGMENT), f)?;
            for word in words {
                f.write_char('+')?;
                Display::fmt(&utf8_percent_encode(word, PATH_SEGMENT), f)?;
            }
        }
        Ok(())
    }
}

pub fn percent_encode(input: &str) -> PercentEncode<'_> {
    utf8_percent_encode(input, QUERY)
}
