//! Escaping of raw values into HTML-safe text.

use std::borrow::Cow;

/// Escape the five HTML-significant characters. Everything else passes
/// through unchanged. Borrows the input when nothing needs replacing.
pub fn escape(raw: &str) -> Cow<'_, str> {
    match raw.bytes().position(is_special) {
        None => Cow::Borrowed(raw),
        Some(first) => {
            let mut out = String::with_capacity(raw.len() + 16);
            out.push_str(&raw[..first]);
            escape_into(&mut out, &raw[first..]);
            Cow::Owned(out)
        }
    }
}

/// Append the escaped form of `raw` to `out`.
pub fn escape_into(out: &mut String, raw: &str) {
    let start = out.len();
    let mut last = 0;
    for (i, byte) in raw.bytes().enumerate() {
        let entity = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        // Special bytes are ASCII, so `i` is always a char boundary.
        out.push_str(&raw[last..i]);
        out.push_str(entity);
        last = i + 1;
    }
    out.push_str(&raw[last..]);

    debug_assert!(
        is_escaped(&out[start..]),
        "EscapeFailure: escaped output still contains raw markup characters"
    );
}

/// True when `text` contains no raw `<`, `>`, `"` or `'`, and every `&`
/// starts one of the entities produced by [`escape`].
pub fn is_escaped(text: &str) -> bool {
    const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"];

    let mut rest = text;
    while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
        let tail = &rest[pos..];
        if !tail.starts_with('&') {
            return false;
        }
        match ENTITIES.iter().find(|e| tail.starts_with(*e)) {
            Some(entity) => rest = &tail[entity.len()..],
            None => return false,
        }
    }
    true
}

/// Canonical text form of a float: no trailing `.0` on whole numbers,
/// `NaN`, `Infinity` and `-Infinity` for the non-finite values.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        // Also folds -0.0.
        "0".to_string()
    } else {
        value.to_string()
    }
}

fn is_special(byte: u8) -> bool {
    matches!(byte, b'&' | b'<' | b'>' | b'"' | b'\'')
}
