//! The in-memory PDF object model.
//!
//! `Dictionary` is an *ordered* `Vec<(Name, Object)>` rather than a map —
//! preserving parse order is the entire reason this crate exists. `Name`
//! carries a distinguished `/Type` constant and byte ordering, both used by
//! the permutation codec's reference sort.

use std::fmt;

/// A PDF Name (`/Foo`), compared and ordered by its underlying bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(pub Vec<u8>);

impl Name {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Name(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl Name {
    /// The distinguished `/Type` name, pinned to position 0 in a
    /// dictionary's reference ordering.
    pub fn is_type(&self) -> bool {
        self.0 == TYPE_BYTES
    }
}

const TYPE_BYTES: &[u8] = b"Type";

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.as_str_lossy())
    }
}

/// An indirect object reference: object id + generation number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub id: u32,
    pub generation: u16,
}

/// A dictionary is an *ordered* sequence of key/value pairs: PDF treats it
/// as an unordered map, but this crate's entire purpose is to encode payload
/// bits in the order entries are actually serialized, so parse order must
/// survive into the object model unchanged.
pub type Dictionary = Vec<(Name, Object)>;

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Name(Name),
    String(Vec<u8>),
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Stream(Dictionary, Vec<u8>),
    Reference(Reference),
}

impl Object {
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream(d, _) => Some(d),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// Returns the dictionary's entries, in key-byte-ascending order, with
/// `/Type` pinned to the front and excluded from the sorted remainder — the
/// dictionary's "effective reference" for rank/unrank.
///
/// Returns `(pinned_type_entry, sorted_rest)`.
pub fn effective_reference(dict: &Dictionary) -> (Option<&(Name, Object)>, Vec<&(Name, Object)>) {
    let (type_entry, mut rest) = split_pinned(dict);
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    (type_entry, rest)
}

/// Like [`effective_reference`], but preserves the entries' original
/// (parse or construction) order instead of sorting them — the "observed"
/// order the decode hook needs before it can rank against the sorted
/// reference.
pub fn split_pinned(dict: &Dictionary) -> (Option<&(Name, Object)>, Vec<&(Name, Object)>) {
    let mut type_entry = None;
    let mut rest: Vec<&(Name, Object)> = Vec::with_capacity(dict.len());
    for entry in dict {
        if type_entry.is_none() && entry.0.is_type() {
            type_entry = Some(entry);
        } else {
            rest.push(entry);
        }
    }
    (type_entry, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::new(s.as_bytes().to_vec())
    }

    #[test]
    fn effective_reference_pins_type_first_and_sorts_rest() {
        let dict: Dictionary = vec![
            (name("Type"), Object::Name(name("X"))),
            (name("B"), Object::Integer(1)),
            (name("A"), Object::Integer(2)),
            (name("C"), Object::Integer(3)),
        ];
        let (type_entry, rest) = effective_reference(&dict);
        assert!(type_entry.is_some());
        assert_eq!(type_entry.unwrap().0, name("Type"));
        let rest_names: Vec<&str> = rest.iter().map(|(n, _)| n.as_bytes()).map(|b| std::str::from_utf8(b).unwrap()).collect();
        assert_eq!(rest_names, vec!["A", "B", "C"]);
    }

    #[test]
    fn effective_reference_without_type_sorts_everything() {
        let dict: Dictionary = vec![
            (name("B"), Object::Integer(1)),
            (name("A"), Object::Integer(2)),
        ];
        let (type_entry, rest) = effective_reference(&dict);
        assert!(type_entry.is_none());
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].0, name("A"));
    }
}
