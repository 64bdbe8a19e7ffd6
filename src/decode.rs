use crate::{
    errors::LzpiError,
    format::{control_bit, Token, GROUP_SIZE, WINDOW_SIZE},
};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

type LogWtr<'a> = &'a mut dyn Write;

/// Specify the decompression input, logging, and output.
///
/// To create a new `Decoder`, use [`for_reader()`], [`for_bytes()`], or
/// [`for_file()`]. Then, optionally attach a diagnostic sink with
/// [`with_logging()`]. Finally, decompress the input with
/// [`decode_to_writer()`], [`decode_to_file()`], or [`decode_to_vec()`].
/// ```
/// # use lzpi::{Encoder, Decoder};
/// let original = b"ABBACABBACD";
/// let compressed = Encoder::for_bytes(original).encode_to_vec().unwrap();
/// let decompressed = Decoder::for_bytes(&compressed).decode_to_vec().unwrap();
/// assert_eq!(&original[..], &decompressed[..]);
/// ```
///
/// Decoding is a single forward pass. The stream carries no length prefix,
/// so output is produced until the input ends; an end of input that splits
/// a token is reported as an error.
///
/// [`for_reader()`]: Decoder::for_reader
/// [`for_bytes()`]: Decoder::for_bytes
/// [`for_file()`]: Decoder::for_file
/// [`with_logging()`]: Decoder::with_logging
/// [`decode_to_writer()`]: Decoder::decode_to_writer
/// [`decode_to_file()`]: Decoder::decode_to_file
/// [`decode_to_vec()`]: Decoder::decode_to_vec
pub struct Decoder<'a, R: Read> {
    src: R,
    log: Option<LogWtr<'a>>,
}

impl<'a, R: Read> Decoder<'a, R> {
    /// Create a new `Decoder` for the data in `rdr`.
    #[inline]
    pub fn for_reader(rdr: R) -> Self {
        Self { src: rdr, log: None }
    }

    /// Write a line per decoded token to `log` while the input is being
    /// decompressed.
    #[inline]
    pub fn with_logging<L: Write>(&mut self, log: &'a mut L) -> &mut Self {
        self.log = Some(log as LogWtr<'a>);
        self
    }

    /// Decompress the stream, writing the recovered bytes to `wtr`.
    ///
    /// The writer is flushed before returning but never closed; it stays
    /// owned by the caller.
    #[inline]
    pub fn decode_to_writer<W: Write>(&mut self, wtr: W) -> Result<(), LzpiError> {
        do_decode(self, wtr)
    }

    /// Decompress the stream into the newly created `File` `f`.
    #[inline]
    pub fn decode_to_file<P: AsRef<Path>>(&mut self, f: P) -> Result<(), LzpiError> {
        let wtr = BufWriter::new(File::create(f)?);
        self.decode_to_writer(wtr)
    }

    /// Decompress the stream and return the recovered bytes in a `Vec<u8>`.
    #[inline]
    pub fn decode_to_vec(&mut self) -> Result<Vec<u8>, LzpiError> {
        let mut csr = Cursor::new(Vec::new());
        self.decode_to_writer(&mut csr).map(|_| csr.into_inner())
    }
}

impl<'a> Decoder<'a, Cursor<&'a [u8]>> {
    /// Create a new `Decoder` for the data in the `bytes` slice.
    #[inline]
    pub fn for_bytes(bytes: &'a [u8]) -> Self {
        Self::for_reader(Cursor::new(bytes))
    }
}

impl<'a> Decoder<'a, BufReader<File>> {
    /// Create a new `Decoder` for the file at `p`.
    #[inline]
    pub fn for_file<P: AsRef<Path>>(p: P) -> Result<Self, LzpiError> {
        File::open(p)
            .map(BufReader::new)
            .map(Self::for_reader)
            .map_err(Into::into)
    }
}

/// Decompress the data in a `Read`er into a `Vec<u8>`.
///
/// This is a convenience function for decompressing without having to set
/// up a [`Decoder`].
pub fn decompress<R: Read>(rdr: R) -> Result<Vec<u8>, LzpiError> {
    Decoder::for_reader(rdr).decode_to_vec()
}

/// The last `WINDOW_SIZE` bytes of output, addressed by a wrapping `u8`
/// cursor. With the window fixed at 256 the cursor arithmetic is free:
/// going back `offset + 1` positions is plain wrapping subtraction, and an
/// offset of 255 lands on the cell the cursor is about to overwrite, which
/// holds the oldest live byte.
struct History {
    ring: [u8; WINDOW_SIZE],
    csr: u8,
}

impl History {
    fn new() -> Self {
        Self {
            ring: [0; WINDOW_SIZE],
            csr: 0,
        }
    }

    #[inline(always)]
    fn push(&mut self, b: u8) {
        self.ring[self.csr as usize] = b;
        self.csr = self.csr.wrapping_add(1);
    }

    #[inline(always)]
    fn get(&self, at: u8) -> u8 {
        self.ring[at as usize]
    }
}

fn do_decode<R: Read, W: Write>(opt: &mut Decoder<'_, R>, mut wtr: W) -> Result<(), LzpiError> {
    let Decoder { src, log } = opt;

    let mut hist = History::new();
    let mut run = [0u8; WINDOW_SIZE];
    let mut position: u64 = 0;

    'stream: loop {
        // a stream may end cleanly right before a control byte
        let control = match read_byte(src)? {
            Some(b) => b,
            None => break 'stream,
        };

        for slot in 0..GROUP_SIZE {
            let first = match read_byte(src)? {
                Some(b) => b,
                // groups are never empty, so EOF before the first token
                // is a truncation; before any later token it is the
                // legitimate end of a short final group
                None if slot == 0 => return Err(LzpiError::TruncatedGroup),
                None => break 'stream,
            };

            let token = if control & control_bit(slot) != 0 {
                let length = read_byte(src)?.ok_or(LzpiError::TruncatedMatch)?;
                Token::Match { offset: first, length }
            } else {
                Token::Literal(first)
            };

            if let Some(log) = log.as_mut() {
                writeln!(log, "{:08x} - {}", position, token)?;
            }

            match token {
                Token::Literal(v) => {
                    hist.push(v);
                    wtr.write_all(&[v])?;
                    position += 1;
                }
                Token::Match { offset, length } => {
                    let count = length as usize + 1;
                    let mut from = hist.csr.wrapping_sub(offset).wrapping_sub(1);
                    // byte-at-a-time so a copy may overlap its own output
                    for cell in run.iter_mut().take(count) {
                        let b = hist.get(from);
                        from = from.wrapping_add(1);
                        hist.push(b);
                        *cell = b;
                    }
                    wtr.write_all(&run[..count])?;
                    position += count as u64;
                }
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Pull one byte from the stream, retrying `Interrupted`. `None` is end
/// of input.
fn read_byte<R: Read>(rdr: &mut R) -> io::Result<Option<u8>> {
    let mut b = [0u8; 1];
    loop {
        match rdr.read(&mut b) {
            Ok(0) => return Ok(None),
            Ok(..) => return Ok(Some(b[0])),
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}
