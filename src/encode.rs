use crate::{
    errors::LzpiError,
    format::{control_bit, Token, GROUP_SIZE},
};
use smallvec::SmallVec;
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

pub(crate) mod search;
pub(crate) mod window;

use self::{
    search::{Found, Searcher},
    window::Window,
};

type LogWtr<'a> = &'a mut dyn Write;

/// Specify the compression input, logging, and output.
///
/// To create a new `Encoder`, use [`for_reader()`], [`for_file()`], or
/// [`for_bytes()`]. Then, optionally attach a diagnostic sink with
/// [`with_logging()`]. Finally, compress the input with
/// [`encode_to_writer()`], [`encode_to_file()`], or [`encode_to_vec()`].
/// ```
/// # use lzpi::Encoder;
/// let input = b"ABBACABBCADFEGABA";
/// let compressed = Encoder::for_bytes(input)
///     .encode_to_vec()
///     .unwrap();
/// ```
///
/// The window and lookahead are fixed at [`WINDOW_SIZE`] bytes each; there
/// are no tunable settings. The encoder reads the input exactly once and
/// never seeks.
///
/// [`for_reader()`]: Encoder::for_reader
/// [`for_file()`]: Encoder::for_file
/// [`for_bytes()`]: Encoder::for_bytes
/// [`with_logging()`]: Encoder::with_logging
/// [`encode_to_writer()`]: Encoder::encode_to_writer
/// [`encode_to_file()`]: Encoder::encode_to_file
/// [`encode_to_vec()`]: Encoder::encode_to_vec
/// [`WINDOW_SIZE`]: crate::format::WINDOW_SIZE
pub struct Encoder<'a, R> {
    rdr: R,
    log: Option<LogWtr<'a>>,
}

impl<'a, R: Read> Encoder<'a, R> {
    /// Create a new `Encoder` for the data in `rdr`.
    #[inline]
    pub fn for_reader(rdr: R) -> Self {
        Self { rdr, log: None }
    }

    /// Write a line per emitted token to `log` while the input is being
    /// compressed.
    #[inline]
    pub fn with_logging<L: Write>(&mut self, log: &'a mut L) -> &mut Self {
        self.log = Some(log as LogWtr<'a>);
        self
    }

    /// Start the encoding and write the compressed stream out to `wtr`.
    ///
    /// The writer is flushed before returning but never closed; it stays
    /// owned by the caller.
    #[inline]
    pub fn encode_to_writer<W: Write>(&mut self, wtr: W) -> Result<(), LzpiError> {
        do_encode(self, wtr)
    }

    /// Start the encoding and write the compressed stream out to the newly
    /// created `File` `f`.
    #[inline]
    pub fn encode_to_file<P: AsRef<Path>>(&mut self, f: P) -> Result<(), LzpiError> {
        let wtr = BufWriter::new(File::create(f)?);
        self.encode_to_writer(wtr)
    }

    /// Start the encoding and return the compressed stream in a `Vec<u8>`.
    #[inline]
    pub fn encode_to_vec(&mut self) -> Result<Vec<u8>, LzpiError> {
        let mut csr = Cursor::new(Vec::new());
        self.encode_to_writer(&mut csr).map(|_| csr.into_inner())
    }
}

impl<'a> Encoder<'a, BufReader<File>> {
    /// Create a new `Encoder` for the file at `p`.
    #[inline]
    pub fn for_file<P: AsRef<Path>>(p: P) -> Result<Self, LzpiError> {
        let rdr = BufReader::new(File::open(p)?);
        Ok(Self::for_reader(rdr))
    }
}

impl<'a> Encoder<'a, Cursor<&'a [u8]>> {
    /// Create a new `Encoder` for the data in the `bytes` slice.
    #[inline]
    pub fn for_bytes(bytes: &'a [u8]) -> Self {
        Self::for_reader(Cursor::new(bytes))
    }
}

/// Compress the data in a `Read`er into a `Vec<u8>`.
///
/// This is a convenience function for compressing without having to set up
/// an [`Encoder`].
pub fn compress<R: Read>(rdr: R) -> Result<Vec<u8>, LzpiError> {
    Encoder::for_reader(rdr).encode_to_vec()
}

fn do_encode<R: Read, W: Write>(opts: &mut Encoder<'_, R>, wtr: W) -> Result<(), LzpiError> {
    let Encoder { rdr, log } = opts;

    let mut win = Window::new();
    let mut searcher = Searcher::new();
    let mut out = GroupWriter::new(wtr);

    loop {
        win.refill(rdr)?;
        if win.lookahead_len() == 0 {
            break;
        }

        let found = searcher.longest_match(&win);
        let token = choose_token(&win, found);

        if let Some(log) = log.as_mut() {
            writeln!(log, "{:08x} - {}", win.position(), token)?;
        }

        out.push(token)?;
        win.shift(token.coverage());
    }

    let mut wtr = out.finish()?;
    wtr.flush()?;
    Ok(())
}

/// Decide what the search result is worth: a back-reference, or one
/// literal byte of the lookahead.
///
/// Anything shorter than two bytes is a literal. A two-byte match is also
/// demoted to a literal when the next lookahead bytes repeat its first
/// byte, which hints that a longer run match will be available one
/// position later; the peek needs more than three lookahead bytes, so at
/// the very end of a stream a two-byte match is always taken.
fn choose_token(win: &Window, found: Found) -> Token {
    let (la_tl, _) = win.ahead_range();

    if found.len < 2 || (found.len == 2 && run_continues(win)) {
        return Token::Literal(win.byte(la_tl));
    }

    Token::Match {
        offset: (win.dict_len() - found.start - 1) as u8,
        length: (found.len - 1) as u8,
    }
}

fn run_continues(win: &Window) -> bool {
    let (la_tl, _) = win.ahead_range();
    let (dt_tl, _) = win.dict_range();

    win.lookahead_len() > 3
        && win.byte(la_tl + 2) == win.byte(la_tl)
        && (win.byte(la_tl + 3) == win.byte(la_tl) || win.byte(la_tl + 3) == win.byte(dt_tl + 2))
}

/// Accumulates up to [`GROUP_SIZE`] tokens and writes them out behind one
/// control byte.
struct GroupWriter<W> {
    wtr: W,
    control: u8,
    count: usize,
    // 8 tokens of at most 2 payload bytes each; never spills
    payload: SmallVec<[u8; 2 * GROUP_SIZE]>,
}

impl<W: Write> GroupWriter<W> {
    fn new(wtr: W) -> Self {
        Self {
            wtr,
            control: 0,
            count: 0,
            payload: SmallVec::new(),
        }
    }

    fn push(&mut self, token: Token) -> io::Result<()> {
        if self.count == GROUP_SIZE {
            self.flush_group()?;
        }

        match token {
            Token::Literal(v) => self.payload.push(v),
            Token::Match { offset, length } => {
                self.control |= control_bit(self.count);
                self.payload.push(offset);
                self.payload.push(length);
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Emit the control byte and the staged payloads. A group is never
    /// written empty: flushing with no tokens pushed writes nothing.
    fn flush_group(&mut self) -> io::Result<()> {
        if self.count > 0 {
            self.wtr.write_all(&[self.control])?;
            self.wtr.write_all(&self.payload)?;
            self.control = 0;
            self.count = 0;
            self.payload.clear();
        }
        Ok(())
    }

    fn finish(mut self) -> io::Result<W> {
        self.flush_group()?;
        Ok(self.wtr)
    }
}
