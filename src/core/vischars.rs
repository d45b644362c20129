// src/core/vischars.rs
// Visible-text character iterator over an HTML fragment.
// Skips tags (<...>) and comments, decodes entities (&...;), and collapses
// whitespace runs to a single ' '. Tags count as word breaks, so
// "<b>Mobile</b>:<br>+41" reads as "Mobile : +41".
// No leading or trailing space is ever produced.

use super::sanitize::decode_entity;

pub struct VisChars<'a> {
    s: &'a str,
    b: &'a [u8],
    i: usize,
    n: usize,
    pending_space: bool,
    emitted_any: bool,
    held: Option<char>,
}

impl<'a> VisChars<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            s,
            b: s.as_bytes(),
            i: 0,
            n: s.len(),
            pending_space: false,
            emitted_any: false,
            held: None,
        }
    }

    #[inline]
    fn skip_tag(&mut self) {
        // called when current byte is '<'
        if self.s[self.i..].starts_with("<!--") {
            self.i = match self.s[self.i + 4..].find("-->") {
                Some(e) => self.i + 4 + e + 3,
                None => self.n,
            };
            return;
        }
        self.i += 1;
        let mut in_s = false; // '
        let mut in_d = false; // "
        while self.i < self.n {
            match self.b[self.i] {
                b'\'' if !in_d => in_s = !in_s,
                b'"'  if !in_s => in_d = !in_d,
                b'>' if !in_s && !in_d => { self.i += 1; break; }
                _ => {}
            }
            self.i += 1;
        }
    }

    /// Current byte is '&'. Decodes a known entity, otherwise yields '&' as text.
    #[inline]
    fn entity(&mut self) -> char {
        let tail = &self.s[self.i + 1..];
        let semi = tail.char_indices().take(10).find(|&(_, c)| c == ';').map(|(k, _)| k);
        if let Some(k) = semi {
            if let Some(ch) = decode_entity(&tail[..k]) {
                self.i += 1 + k + 1;
                return ch;
            }
        }
        self.i += 1;
        '&'
    }

    #[inline]
    fn next_raw(&mut self) -> Option<char> {
        let ch = self.s[self.i..].chars().next()?;
        self.i += ch.len_utf8();
        Some(ch)
    }
}

impl<'a> Iterator for VisChars<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(ch) = self.held.take() {
            return Some(ch);
        }
        while self.i < self.n {
            let ch = match self.b[self.i] {
                b'<' => { self.skip_tag(); self.pending_space = true; continue; }
                b'&' => self.entity(),
                _ => self.next_raw()?,
            };
            if ch.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            let gap = self.pending_space && self.emitted_any;
            self.pending_space = false;
            self.emitted_any = true;
            if gap {
                self.held = Some(ch);
                return Some(' ');
            }
            return Some(ch);
        }
        None
    }
}

/// Visible text of a fragment as one normalized string.
pub fn visible_text(fragment: &str) -> String {
    VisChars::new(fragment).collect()
}
