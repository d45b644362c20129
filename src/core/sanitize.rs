// src/core/sanitize.rs

/// Excel's hard limit on worksheet names.
pub const SHEET_NAME_MAX: usize = 31;

/// Decode one entity body (the part between '&' and ';').
/// Covers numeric references and the named entities seen on French-language pages.
pub fn decode_entity(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let ch = match body {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "agrave" => 'à', "aacute" => 'á', "acirc" => 'â', "auml" => 'ä',
        "Agrave" => 'À', "Acirc" => 'Â', "Auml" => 'Ä',
        "ccedil" => 'ç', "Ccedil" => 'Ç',
        "egrave" => 'è', "eacute" => 'é', "ecirc" => 'ê', "euml" => 'ë',
        "Egrave" => 'È', "Eacute" => 'É', "Ecirc" => 'Ê',
        "icirc" => 'î', "iuml" => 'ï',
        "ocirc" => 'ô', "ouml" => 'ö', "Ouml" => 'Ö',
        "ugrave" => 'ù', "ucirc" => 'û', "uuml" => 'ü', "Uuml" => 'Ü',
        "szlig" => 'ß',
        _ => return None,
    };
    Some(ch)
}

/// Replace every recognizable `&...;` entity. Unknown ones are kept verbatim.
pub fn normalize_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        // entity bodies are short; don't scan the whole document for ';'
        let semi = tail.char_indices().take(10).find(|&(_, c)| c == ';').map(|(i, _)| i);
        match semi.and_then(|i| decode_entity(&tail[..i]).map(|c| (i, c))) {
            Some((i, ch)) => {
                out.push(ch);
                rest = &tail[i + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Club display name → file stem. Only characters that are illegal on common
/// filesystems are removed; accents and spaces survive ("FC Vétroz").
pub fn sanitize_club_filename(name: &str) -> String {
    let out: String = name
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|'))
        .filter(|c| !c.is_control())
        .collect();
    let out = out.trim().trim_end_matches('.').to_string();
    if out.is_empty() { s!("club") } else { out }
}

/// File stem → worksheet name: no `[]*?:/\`, at most 31 chars, never empty.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '*' | '?' | ':' | '/' | '\\'))
        .take(SHEET_NAME_MAX)
        .collect();
    // Excel also rejects names that start or end with an apostrophe
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() { s!("Sheet") } else { cleaned }
}
