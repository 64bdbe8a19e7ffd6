//! A streaming implementation of the `lzpi` compression scheme
//!
//! `lzpi` is a byte-oriented LZSS variant: the compressed stream is a run
//! of token groups, each led by one control byte whose bits say which of
//! the following tokens are plain literals and which are back-references
//! into the last 256 bytes of output. There is no entropy coding and no
//! container framing, which keeps both directions simple, single-pass, and
//! allocation-light.
//!
//! ## Usage
//! The [`compress()`] and [`decompress()`] functions are the quick way to
//! transform a whole stream:
//!
//! ```
//! use lzpi::{compress, decompress};
//! use std::io::Cursor;
//!
//! # let data = &b"AAAVVVAAABABACCCDE"[..];
//! let packed = compress(Cursor::new(data)).unwrap();
//! let unpacked = decompress(Cursor::new(&packed)).unwrap();
//! assert_eq!(&data[..], &unpacked[..]);
//! ```
//!
//! For streaming into an arbitrary writer, or for diagnostics, use
//! [`Encoder`] or [`Decoder`]:
//!
//! ```no_run
//! use lzpi::Encoder;
//!
//! Encoder::for_bytes(b"ababacdcdeaba")
//!     .encode_to_writer(std::io::stdout())
//!     .unwrap();
//! ```
//!
//! ## How the encoder works
//! The encoder keeps a 512-byte window holding two abutting rings: a
//! dictionary of the last bytes it has emitted and a lookahead of bytes it
//! has not. Each step searches the dictionary for the longest prefix of
//! the lookahead, using a Knuth-Morris-Pratt scan whose failure table is
//! built from the lookahead itself. Matches are allowed to run off the end
//! of the dictionary into the lookahead, which is what turns a one-byte
//! history into a full run-length expansion of repeated data.
//!
//! A found match only becomes a back-reference if it is worth the two
//! payload bytes; see the match policy in the encoder for the exact rule.
//! Tokens are then packed eight to a group behind a control byte. The
//! format itself is documented in the [`format`] module.
//!
//! ## Errors
//! The codec recovers nothing locally: the first I/O failure (or truncated
//! token, when decoding) aborts the operation and surfaces as
//! [`errors::LzpiError`]. Compressed output is not validated beyond
//! framing; feeding arbitrary bytes to the decoder yields arbitrary
//! output, the same as the classic single-pass LZSS tools this scheme
//! descends from.

mod decode;
mod encode;
pub mod errors;
pub mod format;

pub use decode::{decompress, Decoder};
pub use encode::{compress, Encoder};
