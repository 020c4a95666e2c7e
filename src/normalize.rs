//! Filename normalization.
//!
//! Rewrites filename stems to the safe set `[A-Za-z0-9_]`: Cyrillic letters
//! are transliterated to Latin sequences first, then every remaining
//! character outside the safe set becomes `_`. The extension is never
//! touched. Normalization is idempotent since every transliteration target is
//! already inside the safe set.

use std::fs;
use std::sync::OnceLock;

use regex::Regex;

use crate::organizer::{SortError, SortResult};
use crate::scanner::FileEntry;

/// Cyrillic to Latin transliteration pairs, both cases. The soft and hard
/// signs carry no sound and map to `_`.
const TRANSLIT_TABLE: &[(char, &str)] = &[
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "h"),
    ('ґ', "g"),
    ('д', "d"),
    ('е', "e"),
    ('є', "ye"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "y"),
    ('і', "i"),
    ('ї', "yi"),
    ('й', "y"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "kh"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "shch"),
    ('ю', "yu"),
    ('я', "ya"),
    ('ы', "y"),
    ('э', "ye"),
    ('А', "A"),
    ('Б', "B"),
    ('В', "V"),
    ('Г', "H"),
    ('Ґ', "G"),
    ('Д', "D"),
    ('Е', "E"),
    ('Є', "Ye"),
    ('Ж', "Zh"),
    ('З', "Z"),
    ('И', "Y"),
    ('І', "I"),
    ('Ї', "Yi"),
    ('Й', "Y"),
    ('К', "K"),
    ('Л', "L"),
    ('М', "M"),
    ('Н', "N"),
    ('О', "O"),
    ('П', "P"),
    ('Р', "R"),
    ('С', "S"),
    ('Т', "T"),
    ('У', "U"),
    ('Ф', "F"),
    ('Х', "KH"),
    ('Ц', "TS"),
    ('Ч', "CH"),
    ('Ш', "SH"),
    ('Щ', "SHCH"),
    ('Ю', "YU"),
    ('Я', "YA"),
    ('Ы', "Y"),
    ('Э', "YE"),
    ('ь', "_"),
    ('ъ', "_"),
    ('Ь', "_"),
    ('Ъ', "_"),
];

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid character-class pattern"))
}

fn transliterate(c: char) -> Option<&'static str> {
    TRANSLIT_TABLE
        .iter()
        .find(|(src, _)| *src == c)
        .map(|(_, dest)| *dest)
}

/// Normalizes a filename stem to the safe character set.
///
/// # Examples
///
/// ```
/// use dirsort::normalize::normalize_stem;
///
/// assert_eq!(normalize_stem("фото"), "foto");
/// assert_eq!(normalize_stem("моя пісня!"), "moya_pisnya_");
/// assert_eq!(normalize_stem("report-2024"), "report_2024");
/// ```
pub fn normalize_stem(stem: &str) -> String {
    let mut transliterated = String::with_capacity(stem.len());
    for c in stem.chars() {
        match transliterate(c) {
            Some(latin) => transliterated.push_str(latin),
            None => transliterated.push(c),
        }
    }
    unsafe_chars().replace_all(&transliterated, "_").into_owned()
}

/// Renames `entry` in place, in its original parent directory, to the
/// normalized form of its stem with the extension re-appended unchanged.
///
/// Returns `true` if the file was actually renamed, `false` if the name was
/// already normalized. Renaming onto a name that is already taken by another
/// file is a [`SortError::NameCollision`].
pub fn rename_entry(entry: &mut FileEntry) -> SortResult<bool> {
    let safe_stem = normalize_stem(&entry.stem);
    let new_name = if entry.extension.is_empty() {
        safe_stem.clone()
    } else {
        format!("{}.{}", safe_stem, entry.extension)
    };

    let parent = entry
        .path
        .parent()
        .ok_or_else(|| SortError::RenameFailed {
            path: entry.path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no parent directory",
            ),
        })?;
    let new_path = parent.join(&new_name);

    if new_path == entry.path {
        return Ok(false);
    }
    if new_path.exists() {
        return Err(SortError::NameCollision {
            destination: new_path,
        });
    }

    fs::rename(&entry.path, &new_path).map_err(|e| SortError::RenameFailed {
        path: entry.path.clone(),
        source: e,
    })?;

    entry.path = new_path;
    entry.stem = safe_stem;
    Ok(true)
}
