//! The two-method capability attached to the writer and parser.
//!
//! Both hooks are a plain `Option<&mut dyn Trait>` threaded through the
//! parser/writer entry points: absent by default, and skipped entirely
//! when absent so the PDF pipeline stays byte-identical to an unhooked
//! build.

use std::io;

use super::object::Dictionary;

/// Invoked by the writer immediately before it would otherwise serialize a
/// dictionary's body. The hook is fully responsible for writing `<<...>>`;
/// the writer must not re-sort or re-normalize what the hook emits.
pub trait DictEncodeHook {
    fn on_dict_encode(&mut self, dict: &Dictionary, out: &mut dyn io::Write) -> io::Result<()>;
}

/// Invoked by the parser immediately after it finishes parsing a
/// dictionary's body. `offset` is the byte offset of that dictionary's
/// opening `<<` in the source document.
pub trait DictDecodeHook {
    fn on_dict_decode(&mut self, offset: u64, entries: &Dictionary);
}
