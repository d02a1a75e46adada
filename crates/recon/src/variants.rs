//! Candidate match strings derived from a maFile's identifier and filename.

use std::collections::HashSet;

/// Every Steam64 id of an individual account starts with this.
pub const STEAM64_PREFIX: &str = "7656119";

// Compared ASCII case-insensitively, so these also cover ".maFile"/".maFiles".
const MAFILE_EXTENSIONS: [&str; 2] = [".mafile", ".mafiles"];

const FILENAME_SEPARATORS: [&str; 7] = ["_", "-", ".", " ", "__", "--", ".."];

fn ends_with_ignore_ascii_case(s: &str, suffix: &str) -> bool {
    let (s, suffix) = (s.as_bytes(), suffix.as_bytes());
    s.len() >= suffix.len() && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// True for names ending in `.mafile` / `.mafiles`, any case.
pub fn is_mafile_name(name: &str) -> bool {
    MAFILE_EXTENSIONS
        .iter()
        .any(|ext| ends_with_ignore_ascii_case(name, ext))
}

/// Remove the maFile extension, or failing that the final extension.
///
/// ```
/// use mafile_recon::strip_mafile_extension;
/// assert_eq!(strip_mafile_extension("alice.maFile"), "alice");
/// assert_eq!(strip_mafile_extension("export.json"), "export");
/// assert_eq!(strip_mafile_extension(".hidden"), ".hidden");
/// ```
pub fn strip_mafile_extension(filename: &str) -> &str {
    for ext in MAFILE_EXTENSIONS {
        if ends_with_ignore_ascii_case(filename, ext) {
            // the suffix is ASCII so the cut lands on a char boundary
            return &filename[..filename.len() - ext.len()];
        }
    }
    strip_final_extension(filename)
}

/// Basename-without-extension: a dot preceded only by dots starts a dot-file
/// name, not an extension.
fn strip_final_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => &name[..dot],
        _ => name,
    }
}

fn skip_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map(|(i, _)| &s[i..]).unwrap_or("")
}

fn last_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        s
    } else {
        skip_chars(s, count - n)
    }
}

/// Build the variant set for one maFile.
///
/// The result is a hash set on purpose: callers must not rely on iteration
/// order, and exact-match ties between variants stay unspecified.
pub fn variants(identifier: &str, filename: &str) -> HashSet<String> {
    let id = identifier.trim();
    let stem = strip_mafile_extension(filename).trim();

    let mut out = HashSet::new();
    let mut add = |v: &str| {
        if !v.is_empty() {
            out.insert(v.to_string());
        }
    };

    add(id);
    add(stem);

    if id.starts_with(STEAM64_PREFIX) {
        add(skip_chars(id, 7));
        add(skip_chars(id, 3));
        add(last_chars(id, 8));
        add(last_chars(id, 10));
        add(last_chars(id, 12));
    }

    // Separators are checked independently; first and last parts are part of
    // the non-empty parts already.
    for sep in FILENAME_SEPARATORS {
        if stem.contains(sep) {
            for part in stem.split(sep) {
                add(part);
            }
        }
    }

    out
}
