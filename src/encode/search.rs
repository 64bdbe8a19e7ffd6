use crate::encode::window::Window;
use crate::format::WINDOW_SIZE;

/// The longest dictionary match found for the current lookahead prefix.
///
/// `start` is the match's starting position counted from the dictionary
/// tail; the wire offset is derived from it at emission time. A `len` of
/// zero means nothing usable was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Found {
    pub start: usize,
    pub len: usize,
}

/// Knuth-Morris-Pratt matcher over the window.
///
/// Holds the failure table so the backing array is built once and reused
/// for every lookahead position. Entries fit a `u8`: no proper prefix of
/// the lookahead exceeds `WINDOW_SIZE - 1` bytes.
pub(crate) struct Searcher {
    table: [u8; WINDOW_SIZE],
}

impl Searcher {
    pub(crate) fn new() -> Self {
        Self {
            table: [0; WINDOW_SIZE],
        }
    }

    /// Failure table over the current lookahead: `table[k]` is the length
    /// of the longest proper prefix of the first `k + 1` lookahead bytes
    /// that is also their suffix. Indices are virtual; bytes are fetched
    /// through the window mask.
    fn build_table(&mut self, win: &Window) {
        let (tl, hd) = win.ahead_range();
        let m = (hd - tl) as usize;

        self.table[0] = 0;
        let mut k = 0usize;
        for q in 1..m {
            let c = win.byte(tl + q as u64);
            while k > 0 && win.byte(tl + k as u64) != c {
                k = self.table[k - 1] as usize;
            }
            if win.byte(tl + k as u64) == c {
                k += 1;
            }
            self.table[q] = k as u8;
        }
    }

    /// Longest prefix of the lookahead that occurs in the dictionary.
    ///
    /// The scan runs two virtual cursors: `i` over the lookahead pattern
    /// and `j` over the dictionary, with `j` free to continue into the
    /// lookahead itself so a match may overlap its own source (that is
    /// what expands runs). A candidate must *start* inside the dictionary;
    /// the scan stops as soon as the next start would not.
    pub(crate) fn longest_match(&mut self, win: &Window) -> Found {
        let (la_tl, la_hd) = win.ahead_range();
        let (dt_tl, _) = win.dict_range();
        let dict_len = win.dict_len();

        let m = (la_hd - la_tl) as usize;
        if m == 0 {
            return Found::default();
        }
        if m >= 2 {
            self.build_table(win);
        }

        let mut best = Found::default();
        let mut i = la_tl;
        let mut j = dt_tl;

        while j != la_hd {
            let start = ((j - dt_tl) - (i - la_tl)) as usize;
            if start == dict_len {
                break;
            }

            if win.byte(i) == win.byte(j) {
                i += 1;
                j += 1;
                if i == la_hd {
                    // the whole lookahead matched; nothing longer exists
                    return Found {
                        start,
                        len: (i - la_tl) as usize,
                    };
                }
            } else if i == la_tl {
                j += 1;
            } else {
                let len = (i - la_tl) as usize;
                if len > best.len {
                    best = Found { start, len };
                }
                // fall back along the failure table; j stays put
                i = la_tl + u64::from(self.table[len - 1]);
            }
        }

        best
    }
}
