use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns, Unicode-aware
/// (CJK and emoji count as 2 columns, combining marks as 0).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns, appending
/// `...` when text was cut off.
///
/// Returns `Cow::Borrowed` when the string already fits (no allocation).
/// Widths of 3 or fewer columns return as many characters as fit with no
/// ellipsis, since there is no room for both a character and "...".
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    // Too narrow for "char + ellipsis": return the prefix that fits, bare.
    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut used = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..cut], suffix))
}

/// Strip terminal control characters and ANSI escape sequences from text.
///
/// Headlines and summaries come from remote feeds; anything that could
/// manipulate the terminal (CSI/OSC sequences, C0 controls except tab,
/// newline and CR, DEL) is removed before rendering.
///
/// Returns `Cow::Borrowed` when the input is already clean (common case).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    fn is_unsafe(b: u8) -> bool {
        b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d)
    }

    let bytes = s.as_bytes();
    if !bytes.iter().copied().any(is_unsafe) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b if bytes.get(i + 1) == Some(&b'[') => {
                // CSI: skip parameter bytes until the final byte (0x40..=0x7e)
                i += 2;
                while i < bytes.len() {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            }
            0x1b if bytes.get(i + 1) == Some(&b']') => {
                // OSC: skip until BEL or ST (\x1b\\)
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b if is_unsafe(b) => i += 1,
            _ => {
                // Batch-copy the run of safe bytes. Control bytes are ASCII
                // and cannot appear mid-codepoint in valid UTF-8, so slicing
                // at these offsets is safe.
                let start = i;
                while i < bytes.len() && !is_unsafe(bytes[i]) {
                    i += 1;
                }
                out.push_str(&s[start..i]);
            }
        }
    }

    Cow::Owned(out)
}
