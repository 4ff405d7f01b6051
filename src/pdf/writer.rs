//! Serializes an in-memory document back to PDF bytes.
//!
//! Every dictionary body is routed through the encode hook, if one is
//! attached — not just the dictionaries that sit directly under an indirect
//! object, but any dictionary nested inside a value or an array (e.g. a
//! page's `/Resources`), at any depth, exactly as the parser fires the
//! decode hook on every dictionary it finishes parsing regardless of
//! nesting. The writer never re-sorts or re-normalizes what the hook
//! returns. With no hook attached, [`write_dictionary_default`] serializes
//! each dictionary's existing order unchanged.

use std::io::{self, Write};

use super::hooks::DictEncodeHook;
use super::object::{Dictionary, Name, Object};
use super::parser::{Document, IndirectObject};

/// Writes `doc` to `out` as a complete PDF, invoking `hook` on every
/// dictionary body it emits (including a stream's dictionary, the trailer,
/// and any dictionary nested inside a value or array).
pub fn write_document(
    doc: &Document,
    out: &mut dyn Write,
    mut hook: Option<&mut dyn DictEncodeHook>,
    pdf_version: &str,
) -> io::Result<()> {
    let mut offset: u64 = 0;
    let mut counting = CountingWriter { inner: out, offset: &mut offset };
    write!(counting, "%PDF-{pdf_version}\n")?;
    // Binary comment so generic tools treat the file as binary, per
    // convention (PDF 32000-1:2008 §7.5.2).
    counting.write_all(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;

    let mut sorted: Vec<&IndirectObject> = doc.objects.iter().collect();
    sorted.sort_by_key(|o| o.id);

    let mut xref: Vec<(u32, u64)> = Vec::with_capacity(sorted.len());
    for obj in &sorted {
        xref.push((obj.id, *counting.offset));
        write!(counting, "{} {} obj\n", obj.id, obj.generation)?;
        write_value(&obj.value, &mut counting, &mut hook)?;
        write!(counting, "\nendobj\n")?;
    }

    let xref_offset = *counting.offset;
    writeln!(counting, "xref")?;
    writeln!(counting, "0 {}", xref.len() + 1)?;
    writeln!(counting, "0000000000 65535 f ")?;
    for (_, off) in &xref {
        writeln!(counting, "{off:010} 00000 n ")?;
    }

    // The trailer is a dictionary like any other: the parser fires the
    // decode hook on it (it is parsed through the same `parse_dictionary`
    // path as every other dictionary), so the writer must route it through
    // the encode hook too, or the two sides disagree on how many payload
    // bits the trailer contributes. `/Size` is refreshed to the object
    // count actually written; every other entry the input trailer carried
    // (`/Root`, `/Info`, `/ID`, ...) is preserved.
    writeln!(counting, "trailer")?;
    let trailer = trailer_with_current_size(doc, xref.len() as u64 + 1);
    write_dictionary(&trailer, &mut counting, &mut hook)?;
    writeln!(counting)?;
    writeln!(counting, "startxref")?;
    writeln!(counting, "{xref_offset}")?;
    write!(counting, "%%EOF")?;
    counting.inner.flush()
}

/// The input document's trailer entries, with `/Size` set (or inserted) to
/// `size`. Every other entry keeps its original value and position.
fn trailer_with_current_size(doc: &Document, size: u64) -> Dictionary {
    let mut trailer = doc.trailer.clone();
    let size_value = Object::Integer(size as i64);
    match trailer.iter_mut().find(|(name, _)| name.as_bytes() == b"Size") {
        Some(entry) => entry.1 = size_value,
        None => trailer.push((Name::new(b"Size".to_vec()), size_value)),
    }
    trailer
}

/// Tracks bytes written so far so dictionary offsets reported to the
/// encode hook (and the xref table) reflect actual output position.
struct CountingWriter<'a, 'o> {
    inner: &'a mut dyn Write,
    offset: &'o mut u64,
}

impl Write for CountingWriter<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        *self.offset += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn write_dictionary(
    dict: &Dictionary,
    out: &mut dyn Write,
    hook: &mut Option<&mut dyn DictEncodeHook>,
) -> io::Result<()> {
    match hook {
        Some(h) => h.on_dict_encode(dict, out),
        None => write_dictionary_default(dict, out),
    }
}

/// Serializes a dictionary's existing order unchanged, recursing into
/// nested values with no hook attached. This is the codepath a build with
/// the stego hook entirely removed would take.
pub fn write_dictionary_default(dict: &Dictionary, out: &mut dyn Write) -> io::Result<()> {
    write!(out, "<<")?;
    for (name, value) in dict {
        write!(out, " ")?;
        write_name(name, out)?;
        write!(out, " ")?;
        write_value(value, out, &mut None)?;
    }
    write!(out, " >>")
}

/// Exposed to the driver's encode hook, which must emit entries in a
/// permuted order rather than going through `write_dictionary_default`.
pub(crate) fn write_name(name: &Name, out: &mut dyn Write) -> io::Result<()> {
    write!(out, "/")?;
    out.write_all(name.as_bytes())
}

/// Writes any PDF value, routing a nested `Dictionary`/`Stream` (directly,
/// or inside an `Array`, at any depth) through `hook` exactly like a
/// top-level dictionary — the encode hook must see every dictionary the
/// decode hook would have seen while parsing the same bytes back.
pub(crate) fn write_value(
    value: &Object,
    out: &mut dyn Write,
    hook: &mut Option<&mut dyn DictEncodeHook>,
) -> io::Result<()> {
    match value {
        Object::Dictionary(dict) => write_dictionary(dict, out, hook),
        Object::Stream(dict, content) => {
            write_dictionary(dict, out, hook)?;
            write!(out, "\nstream\n")?;
            out.write_all(content)?;
            write!(out, "\nendstream")
        }
        Object::Array(items) => {
            write!(out, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(out, " ")?;
                }
                write_value(item, out, hook)?;
            }
            write!(out, "]")
        }
        other => write_leaf(other, out),
    }
}

/// Writes a leaf (non-container) PDF value. Containers (`Array`,
/// `Dictionary`, `Stream`) are handled by [`write_value`], since they may
/// need to route through the encode hook.
fn write_leaf(value: &Object, out: &mut dyn Write) -> io::Result<()> {
    match value {
        Object::Null => write!(out, "null"),
        Object::Boolean(b) => write!(out, "{b}"),
        Object::Integer(i) => write!(out, "{i}"),
        Object::Real(r) => write!(out, "{r}"),
        Object::Name(n) => write_name(n, out),
        Object::String(bytes) => {
            write!(out, "(")?;
            for &b in bytes {
                if b == b'(' || b == b')' || b == b'\\' {
                    write!(out, "\\")?;
                }
                out.write_all(&[b])?;
            }
            write!(out, ")")
        }
        Object::Reference(r) => write!(out, "{} {} R", r.id, r.generation),
        Object::Array(_) | Object::Dictionary(_) | Object::Stream(_, _) => {
            unreachable!("containers are routed through write_value, not write_leaf")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::parser::parse_document;

    #[test]
    fn round_trips_structure_without_a_hook() {
        let mut src = Vec::new();
        src.extend_from_slice(b"%PDF-1.6\n");
        src.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /A 1 >>\nendobj\n");
        src.extend_from_slice(b"trailer\n<< /Root 1 0 R >>\n%%EOF");

        let doc = parse_document(&src, None).unwrap();
        let mut out = Vec::new();
        write_document(&doc, &mut out, None, "1.6").unwrap();

        let reparsed = parse_document(&out, None).unwrap();
        assert_eq!(reparsed.objects.len(), 1);
        assert_eq!(reparsed.objects[0].id, 1);
        // /Root survives unchanged and /Size is (re)inserted with the
        // actual written object count.
        assert_eq!(reparsed.trailer.len(), 2);
        assert!(reparsed.trailer.iter().any(|(n, _)| n.as_bytes() == b"Root"));
        let size = reparsed
            .trailer
            .iter()
            .find(|(n, _)| n.as_bytes() == b"Size")
            .and_then(|(_, v)| v.as_integer());
        assert_eq!(size, Some(2));
    }

    #[test]
    fn routes_a_dictionary_nested_in_a_value_through_the_hook() {
        use crate::pdf::hooks::DictEncodeHook;
        use crate::pdf::object::Dictionary;

        struct CountingHook {
            calls: usize,
        }

        impl DictEncodeHook for CountingHook {
            fn on_dict_encode(
                &mut self,
                dict: &Dictionary,
                out: &mut dyn Write,
            ) -> io::Result<()> {
                self.calls += 1;
                write!(out, "<<")?;
                for (name, value) in dict {
                    write!(out, " ")?;
                    write_name(name, out)?;
                    write!(out, " ")?;
                    let mut nested: Option<&mut dyn DictEncodeHook> = Some(&mut *self);
                    write_value(value, out, &mut nested)?;
                }
                write!(out, " >>")
            }
        }

        let mut src = Vec::new();
        src.extend_from_slice(b"%PDF-1.6\n");
        src.extend_from_slice(
            b"1 0 obj\n<< /Type /Page /Resources << /Font << /F1 2 0 R >> >> >>\nendobj\n",
        );
        src.extend_from_slice(b"trailer\n<< /Root 1 0 R >>\n%%EOF");

        let doc = parse_document(&src, None).unwrap();
        let mut out = Vec::new();
        let mut hook = CountingHook { calls: 0 };
        write_document(&doc, &mut out, Some(&mut hook), "1.6").unwrap();

        // The page dictionary itself, /Resources, /Font, and the trailer:
        // four dictionaries total, every one of them routed through the
        // hook even though three are nested inside a value rather than
        // sitting directly under an indirect object.
        assert_eq!(hook.calls, 4);

        let reparsed = parse_document(&out, None).unwrap();
        let page = reparsed.objects[0].value.as_dict().unwrap();
        let resources = page
            .iter()
            .find(|(n, _)| n.as_bytes() == b"Resources")
            .unwrap()
            .1
            .as_dict()
            .unwrap();
        let font = resources
            .iter()
            .find(|(n, _)| n.as_bytes() == b"Font")
            .unwrap()
            .1
            .as_dict()
            .unwrap();
        assert!(font.iter().any(|(n, _)| n.as_bytes() == b"F1"));
    }
}
