// src/core/html.rs
// Case-insensitive tag scanning over raw markup. No DOM: every helper works on
// byte offsets into the original string. Comments are skipped, and elements
// cut off by the end of input are reported as such instead of guessed at.

use std::borrow::Cow;

use super::sanitize::{normalize_entities, normalize_ws};

/// Elements that never have a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// ASCII-only lowercase; byte offsets stay valid against the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

fn is_name_end(b: Option<&u8>) -> bool {
    matches!(b, None | Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/'))
}

/// Extent of one element. When the input ends before the element closes,
/// `closed` is false and `end` is the end of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub start: usize,
    pub end: usize,
    pub closed: bool,
}

/// Where a sibling scan stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sibling {
    /// A complete element `(start, end)`.
    Element(usize, usize),
    /// An element opens at this offset but the input ends inside it.
    Unclosed(usize),
    /// A closing tag came first: the parent ended.
    ParentClosed,
    EndOfInput,
}

/// A markup fragment plus its ASCII-lowercased twin. Both share byte offsets,
/// so the lowering happens once per fragment, not once per lookup.
/// Every search skips `<!-- ... -->`.
pub struct Markup<'a> {
    raw: &'a str,
    lc: Cow<'a, str>,
}

impl<'a> Markup<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw, lc: Cow::Owned(to_lower(raw)) }
    }

    pub fn raw(&self) -> &'a str { self.raw }

    /// The `a..b` slice, reusing the lowered text.
    pub fn sub(&self, a: usize, b: usize) -> Markup<'_> {
        Markup { raw: &self.raw[a..b], lc: Cow::Borrowed(&self.lc[a..b]) }
    }

    /// Next `needle` at or after `from` that is not inside a comment.
    /// An unterminated comment hides the rest of the input.
    fn find_code(&self, needle: &str, from: usize) -> Option<usize> {
        let lc: &str = &self.lc;
        let mut pos = from;
        loop {
            let hit = lc.get(pos..)?.find(needle)? + pos;
            match lc[pos..hit].find("<!--") {
                Some(c) => {
                    let body = pos + c + 4;
                    pos = lc[body..].find("-->").map(|e| body + e + 3)?;
                }
                None => return Some(hit),
            }
        }
    }

    /// `<tag` or `</tag` as a whole tag name.
    fn find_token(&self, token: &str, from: usize) -> Option<usize> {
        let mut pos = from;
        loop {
            let at = self.find_code(token, pos)?;
            if is_name_end(self.lc.as_bytes().get(at + token.len())) {
                return Some(at);
            }
            pos = at + token.len();
        }
    }

    /// Offset of the next `<tag ...>` opener at or after `from`.
    pub fn find_open(&self, tag: &str, from: usize) -> Option<usize> {
        self.find_token(&join!("<", &to_lower(tag)), from)
    }

    /// Extent of the element whose opener is at `start`, counting nested
    /// elements of the same name. Void and self-closing elements end at their
    /// opener. None when `start` is not an element opener.
    pub fn extent(&self, start: usize) -> Option<Extent> {
        let s = self.raw;
        let tag = tag_name(s, start);
        if tag.is_empty() {
            return None;
        }
        let cut_off = Extent { start, end: s.len(), closed: false };
        let Some(open_end) = open_tag_end(s, start) else { return Some(cut_off) };
        if VOID_TAGS.contains(&tag.as_str()) || s[..open_end].ends_with("/>") {
            return Some(Extent { start, end: open_end, closed: true });
        }

        let open = join!("<", &tag);
        let close = join!("</", &tag);
        let mut depth = 1usize;
        let mut pos = open_end;
        loop {
            let Some(next_close) = self.find_token(&close, pos) else { return Some(cut_off) };
            match self.find_token(&open, pos) {
                Some(o) if o < next_close => {
                    let Some(oe) = open_tag_end(s, o) else { return Some(cut_off) };
                    if !s[..oe].ends_with("/>") {
                        depth += 1;
                    }
                    pos = oe;
                }
                _ => {
                    let Some(gt) = self.lc[next_close..].find('>') else { return Some(cut_off) };
                    let end = next_close + gt + 1;
                    depth -= 1;
                    if depth == 0 {
                        return Some(Extent { start, end, closed: true });
                    }
                    pos = end;
                }
            }
        }
    }

    /// `(start, end)` of a complete element. Unclosed elements yield None.
    pub fn element_block(&self, start: usize) -> Option<(usize, usize)> {
        self.extent(start).filter(|e| e.closed).map(|e| (e.start, e.end))
    }

    /// Every `<tag>` element carrying all of `classes`, in document order,
    /// including ones the input cuts off.
    /// Nested matches are included, the way a descendant selector behaves.
    pub fn extents_with_classes(&self, tag: &str, classes: &[&str]) -> Vec<Extent> {
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some(start) = self.find_open(tag, pos) {
            let Some(open_end) = open_tag_end(self.raw, start) else { break };
            if has_classes(&self.raw[start..open_end], classes) {
                out.extend(self.extent(start));
            }
            pos = open_end;
        }
        out
    }

    /// Complete `<tag>` elements carrying all of `classes`, in document order.
    pub fn elements_with_classes(&self, tag: &str, classes: &[&str]) -> Vec<(usize, usize)> {
        self.extents_with_classes(tag, classes)
            .into_iter()
            .filter(|e| e.closed)
            .map(|e| (e.start, e.end))
            .collect()
    }

    /// First complete element matching `tag` + `classes`.
    pub fn first_element_with_classes(&self, tag: &str, classes: &[&str]) -> Option<&'a str> {
        self.elements_with_classes(tag, classes)
            .first()
            .map(|&(a, b)| &self.raw[a..b])
    }

    /// The next element sibling after offset `from`, skipping text, comments
    /// and declarations.
    pub fn next_sibling(&self, from: usize) -> Sibling {
        let s = self.raw;
        let mut pos = from;
        loop {
            let Some(lt) = s.get(pos..).and_then(|r| r.find('<')).map(|r| r + pos) else {
                return Sibling::EndOfInput;
            };
            let rest = &s[lt..];
            if rest.starts_with("<!--") {
                match rest.find("-->") {
                    Some(e) => pos = lt + e + 3,
                    None => return Sibling::EndOfInput,
                }
                continue;
            }
            if rest.starts_with("</") {
                return Sibling::ParentClosed;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                match open_tag_end(s, lt) {
                    Some(e) => pos = e,
                    None => return Sibling::EndOfInput,
                }
                continue;
            }
            return match self.extent(lt) {
                Some(Extent { closed: true, end, .. }) => Sibling::Element(lt, end),
                Some(_) => Sibling::Unclosed(lt),
                // stray '<' in text
                None => {
                    pos = lt + 1;
                    continue;
                }
            };
        }
    }
}

/// Inner markup of a single element block (between opener and closer).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = open_tag_end(block, 0) {
        if let Some(cs) = block.rfind('<') {
            if cs >= oe {
                return block[oe..cs].to_string();
            }
        }
    }
    s!()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => { in_tag = false; out.push(' '); }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}
