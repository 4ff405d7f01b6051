//! Recursive-descent object parser over the token stream, plus the linear
//! `N G obj ... endobj` scan that locates indirect objects. Every indirect
//! object is located by scanning the token stream start to finish — there
//! is no cross-reference table lookup, and no recovery for a missing or
//! damaged one.

use std::collections::VecDeque;

use crate::error::StegoError;

use super::hooks::DictDecodeHook;
use super::lexer::{Lexer, Spanned, Token};
use super::object::{Dictionary, Name, Object};

/// One indirect object as found by the linear scan.
pub struct IndirectObject {
    pub id: u32,
    pub generation: u16,
    pub value: Object,
}

/// A parsed document: every indirect object found by the linear scan, plus
/// the trailer dictionary (if one was found).
pub struct Document {
    pub objects: Vec<IndirectObject>,
    pub trailer: Dictionary,
}

struct TokenStream<'a> {
    lexer: Lexer<'a>,
    lookahead: VecDeque<Spanned>,
}

impl<'a> TokenStream<'a> {
    fn new(buf: &'a [u8]) -> Self {
        TokenStream {
            lexer: Lexer::new(buf),
            lookahead: VecDeque::new(),
        }
    }

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() < n {
            match self.lexer.next_token() {
                Some(tok) => self.lookahead.push_back(tok),
                None => break,
            }
        }
    }

    fn peek(&mut self, i: usize) -> Option<&Spanned> {
        self.fill(i + 1);
        self.lookahead.get(i)
    }

    fn next(&mut self) -> Option<Spanned> {
        self.fill(1);
        self.lookahead.pop_front()
    }
}

/// Parses `buf` as a PDF document, invoking `hook` on every dictionary
/// (including a stream's dictionary) immediately after it finishes parsing,
/// with the byte offset of that dictionary's opening `<<`.
pub fn parse_document(
    buf: &[u8],
    mut hook: Option<&mut dyn DictDecodeHook>,
) -> Result<Document, StegoError> {
    if buf.windows(5).position(|w| w == b"%PDF-").is_none() {
        return Err(StegoError::Parse("missing %PDF- header".into()));
    }

    let mut stream = TokenStream::new(buf);
    let mut objects = Vec::new();
    let mut trailer = Dictionary::new();

    loop {
        let Some(first) = stream.next() else {
            break;
        };
        match &first.token {
            Token::Keyword(kw) if kw == b"trailer" => {
                if let Some(value) = parse_value(&mut stream, &mut hook, buf)? {
                    if let Object::Dictionary(dict) = value {
                        trailer = dict;
                    }
                }
            }
            Token::Number(id_val, true) => {
                // Look for the `G obj` continuation; anything else is noise
                // left over from an xref subsection or similar and is
                // skipped.
                let is_obj_header = matches!(
                    (stream.peek(0), stream.peek(1)),
                    (Some(Spanned { token: Token::Number(_, true), .. }), Some(Spanned { token: Token::Keyword(kw), .. })) if kw == b"obj"
                );
                if is_obj_header {
                    let gen_tok = stream.next().unwrap();
                    let _obj_kw = stream.next().unwrap();
                    let gen_val = match gen_tok.token {
                        Token::Number(g, true) => g as u16,
                        _ => 0,
                    };
                    let value = parse_value(&mut stream, &mut hook, buf)?
                        .unwrap_or(Object::Null);
                    let value = maybe_attach_stream(value, &mut stream, buf)?;
                    skip_until_keyword(&mut stream, b"endobj");
                    objects.push(IndirectObject {
                        id: *id_val as u32,
                        generation: gen_val,
                        value,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(Document { objects, trailer })
}

fn skip_until_keyword(stream: &mut TokenStream, target: &[u8]) {
    loop {
        match stream.peek(0) {
            Some(Spanned {
                token: Token::Keyword(kw),
                ..
            }) if kw == target => {
                stream.next();
                return;
            }
            Some(_) => {
                stream.next();
            }
            None => return,
        }
    }
}

/// If the object just parsed is a dictionary immediately followed by a
/// `stream` keyword, consumes the raw stream bytes (using `/Length` from
/// the dictionary, falling back to scanning for `endstream`) and returns a
/// `Object::Stream`.
fn maybe_attach_stream(
    value: Object,
    stream: &mut TokenStream,
    buf: &[u8],
) -> Result<Object, StegoError> {
    let is_stream_next = matches!(
        stream.peek(0),
        Some(Spanned { token: Token::Keyword(kw), .. }) if kw == b"stream"
    );
    if !is_stream_next {
        return Ok(value);
    }
    let Object::Dictionary(dict) = value else {
        return Ok(value);
    };
    let stream_kw = stream.next().unwrap();
    // Raw stream data starts right after the EOL following `stream`.
    let mut start = stream_kw.offset + "stream".len();
    if buf.get(start) == Some(&b'\r') {
        start += 1;
    }
    if buf.get(start) == Some(&b'\n') {
        start += 1;
    }
    let length = dict
        .iter()
        .find(|(name, _)| name.as_bytes() == b"Length")
        .and_then(|(_, v)| v.as_integer());
    let end = match length {
        Some(len) if len >= 0 && start + len as usize <= buf.len() => start + len as usize,
        _ => find_subslice(buf, b"endstream", start).unwrap_or(buf.len()),
    };
    let content = buf[start..end.min(buf.len())].to_vec();
    // Resynchronize: raw stream bytes must never be lexed as PDF syntax, so
    // drop any lookahead the lexer may have already buffered past `stream`
    // and reposition it just after the matching `endstream`.
    let endstream_end = find_subslice(buf, b"endstream", end)
        .map(|p| p + "endstream".len())
        .unwrap_or(buf.len());
    stream.lookahead.clear();
    stream.lexer.seek(endstream_end);
    Ok(Object::Stream(dict, content))
}

fn find_subslice(buf: &[u8], pattern: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(pattern.len())
        .position(|w| w == pattern)
        .map(|p| from + p)
}

/// Parses one PDF value starting at the stream's current position. Returns
/// `Ok(None)` at end of input.
fn parse_value(
    stream: &mut TokenStream,
    hook: &mut Option<&mut dyn DictDecodeHook>,
    buf: &[u8],
) -> Result<Option<Object>, StegoError> {
    let Some(tok) = stream.next() else {
        return Ok(None);
    };
    parse_value_from(tok, stream, hook, buf).map(Some)
}

fn parse_value_from(
    tok: Spanned,
    stream: &mut TokenStream,
    hook: &mut Option<&mut dyn DictDecodeHook>,
    buf: &[u8],
) -> Result<Object, StegoError> {
    match tok.token {
        Token::DictOpen => parse_dictionary(tok.offset, stream, hook, buf),
        Token::ArrayOpen => {
            let mut items = Vec::new();
            loop {
                match stream.peek(0) {
                    Some(Spanned {
                        token: Token::ArrayClose,
                        ..
                    }) => {
                        stream.next();
                        break;
                    }
                    None => break,
                    _ => {
                        let next = stream.next().unwrap();
                        items.push(parse_value_from(next, stream, hook, buf)?);
                    }
                }
            }
            Ok(Object::Array(items))
        }
        Token::Name(bytes) => Ok(Object::Name(Name::new(bytes))),
        Token::LiteralString(bytes) | Token::HexString(bytes) => Ok(Object::String(bytes)),
        Token::Number(value, is_integer) => {
            // Could be a plain number, or the start of `id gen R`.
            let maybe_ref = matches!(
                (stream.peek(0), stream.peek(1)),
                (
                    Some(Spanned { token: Token::Number(_, true), .. }),
                    Some(Spanned { token: Token::Keyword(kw), .. })
                ) if kw == b"R"
            );
            if is_integer && maybe_ref {
                let gen_tok = stream.next().unwrap();
                stream.next(); // `R`
                let gen_val = match gen_tok.token {
                    Token::Number(g, true) => g as u16,
                    _ => 0,
                };
                Ok(Object::Reference(super::object::Reference {
                    id: value as u32,
                    generation: gen_val,
                }))
            } else if is_integer {
                Ok(Object::Integer(value as i64))
            } else {
                Ok(Object::Real(value))
            }
        }
        Token::Keyword(kw) => match kw.as_slice() {
            b"true" => Ok(Object::Boolean(true)),
            b"false" => Ok(Object::Boolean(false)),
            b"null" => Ok(Object::Null),
            _ => Ok(Object::Null),
        },
        Token::DictClose | Token::ArrayClose => Ok(Object::Null),
    }
}

fn parse_dictionary(
    open_offset: usize,
    stream: &mut TokenStream,
    hook: &mut Option<&mut dyn DictDecodeHook>,
    buf: &[u8],
) -> Result<Object, StegoError> {
    let mut entries: Dictionary = Vec::new();
    loop {
        match stream.peek(0) {
            Some(Spanned {
                token: Token::DictClose,
                ..
            }) => {
                stream.next();
                break;
            }
            None => break,
            _ => {
                let key_tok = stream.next().unwrap();
                let Token::Name(key_bytes) = key_tok.token else {
                    // malformed entry; stop rather than loop forever
                    break;
                };
                let value = parse_value(stream, hook, buf)?.unwrap_or(Object::Null);
                entries.push((Name::new(key_bytes), value));
            }
        }
    }
    if let Some(h) = hook.as_deref_mut() {
        h.on_dict_decode(open_offset as u64, &entries);
    }
    Ok(Object::Dictionary(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::hooks::DictDecodeHook;

    /// Records every dictionary the decode hook observes, as
    /// `(offset, entry count)` pairs, in the order they were flushed.
    #[derive(Default)]
    struct RecordingHook {
        seen: Vec<(u64, usize)>,
    }

    impl DictDecodeHook for RecordingHook {
        fn on_dict_decode(&mut self, offset: u64, entries: &Dictionary) {
            self.seen.push((offset, entries.len()));
        }
    }

    fn minimal_pdf() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.6\n");
        buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /A 1 /B 2 /C 3 >>\nendobj\n");
        buf.extend_from_slice(b"trailer\n<< /Root 1 0 R >>\n");
        buf.extend_from_slice(b"%%EOF");
        buf
    }

    #[test]
    fn finds_the_indirect_object_and_trailer() {
        let buf = minimal_pdf();
        let doc = parse_document(&buf, None).unwrap();
        assert_eq!(doc.objects.len(), 1);
        assert_eq!(doc.objects[0].id, 1);
        match &doc.objects[0].value {
            Object::Dictionary(entries) => assert_eq!(entries.len(), 4),
            other => panic!("expected dictionary, got {other:?}"),
        }
        assert_eq!(doc.trailer.len(), 1);
    }

    #[test]
    fn invokes_decode_hook_with_correct_offset() {
        let buf = minimal_pdf();
        let expected_offset = buf
            .windows(2)
            .position(|w| w == b"<<")
            .expect("fixture contains a dictionary") as u64;

        let mut hook = RecordingHook::default();
        let _doc = parse_document(&buf, Some(&mut hook)).unwrap();

        // The object dictionary (4 entries) and the one-entry trailer both
        // fire the hook, in the order the parser finishes each.
        assert_eq!(hook.seen.len(), 2);
        assert_eq!(hook.seen[0], (expected_offset, 4));
        assert_eq!(hook.seen[1].1, 1);
        assert!(hook.seen[1].0 > expected_offset);
    }

    #[test]
    fn parses_references_and_arrays() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.6\n");
        buf.extend_from_slice(b"2 0 obj\n<< /Kids [3 0 R 4 0 R] /Count 2 >>\nendobj\n");
        buf.extend_from_slice(b"%%EOF");
        let doc = parse_document(&buf, None).unwrap();
        let entries = doc.objects[0].value.as_dict().unwrap();
        let kids = entries.iter().find(|(n, _)| n.as_bytes() == b"Kids").unwrap();
        match &kids.1 {
            Object::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[0], Object::Reference(_)));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn rejects_input_without_pdf_header() {
        assert!(parse_document(b"not a pdf", None).is_err());
    }
}
