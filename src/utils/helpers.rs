// Small helpers shared by the generator, the publish client and the CLI.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Creates a directory if it doesn't exist
pub fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes content to a file, creating parent directories if needed
pub fn write_to_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        ensure_directory_exists(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(content.as_ref())?;
    Ok(())
}

/// Neutralizes separators in a user-supplied file name so it stays inside
/// the directory it is joined to.
pub fn sanitize_file_name(name: &str) -> String {
    name.replace('/', "_")
        .replace('\\', "_")
        .replace(':', "")
        .replace('{', "")
        .replace('}', "")
        .trim_matches('_')
        .to_string()
}

/// Python's `str.title()`: an alphabetic character starts uppercase after
/// any non-alphabetic one (start of string, `_`, digits) and continues
/// lowercase otherwise. Generated class names rely on this exact rule.
pub fn python_title_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_was_alphabetic = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_was_alphabetic {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_was_alphabetic = true;
        } else {
            output.push(ch);
            previous_was_alphabetic = false;
        }
    }

    output
}

/// First `limit` characters of a string, never splitting a code point.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
