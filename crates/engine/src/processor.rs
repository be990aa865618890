use crate::config::ScanRules;
use crate::error::{Result, ScanError};
use crate::filesystem::FileEntry;
use crate::language::{LineClassifier, dotted_extension};
use crate::stats::{IssueLog, ScanAccumulator};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Applies one walked file to the accumulator.
///
/// A metadata failure only drops the size contribution; a read failure only
/// drops the script contribution. Both are recorded in `issues`.
pub fn process_file(
    file: FileEntry,
    rules: &ScanRules,
    acc: &mut ScanAccumulator,
    issues: &mut IssueLog,
) {
    acc.record_file();

    match file.metadata {
        Ok(meta) => acc.add_size(meta.len()),
        Err(source) => issues.record(ScanError::Metadata {
            path: file.path.clone(),
            source,
        }),
    }

    let Some(ext) = dotted_extension(&file.name).map(str::to_lowercase) else {
        return;
    };

    if rules.is_scene_extension(&ext) {
        acc.record_scene();
    }

    let Some(classifier) = rules.classifier_for(&ext) else {
        return;
    };

    match count_file_lines(&file.path, classifier) {
        Ok(valid_lines) => acc.record_script(valid_lines),
        Err(err) => issues.record(err),
    }
}

/// Counts the valid lines of a file on disk.
///
/// # Errors
/// Returns [`ScanError::FileRead`] if the file cannot be opened or read.
pub fn count_file_lines(path: &Path, classifier: &LineClassifier) -> Result<usize> {
    let file = File::open(path).map_err(|source| ScanError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    count_valid_lines(&mut reader, classifier).map_err(|source| ScanError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Text encodings announced by a leading byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Encoding {
    /// Encoding and BOM length for the first bytes of a file. Files without a
    /// BOM are read as UTF-8.
    fn sniff(head: &[u8]) -> (Self, usize) {
        match head {
            [0xFF, 0xFE, 0x00, 0x00, ..] => (Self::Utf32Le, 4),
            [0x00, 0x00, 0xFE, 0xFF, ..] => (Self::Utf32Be, 4),
            [0xEF, 0xBB, 0xBF, ..] => (Self::Utf8, 3),
            [0xFF, 0xFE, ..] => (Self::Utf16Le, 2),
            [0xFE, 0xFF, ..] => (Self::Utf16Be, 2),
            _ => (Self::Utf8, 0),
        }
    }

    /// Decodes a whole wide-character body; malformed units become U+FFFD.
    fn decode_wide(self, bytes: &[u8]) -> String {
        let mut text = match self {
            Self::Utf8 => return String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16Le | Self::Utf16Be => {
                let units = bytes.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == Self::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect::<String>()
            }
            Self::Utf32Le | Self::Utf32Be => bytes
                .chunks_exact(4)
                .map(|quad| {
                    let quad = [quad[0], quad[1], quad[2], quad[3]];
                    let scalar = if self == Self::Utf32Le {
                        u32::from_le_bytes(quad)
                    } else {
                        u32::from_be_bytes(quad)
                    };
                    char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect(),
        };
        let unit = if matches!(self, Self::Utf16Le | Self::Utf16Be) { 2 } else { 4 };
        if bytes.len() % unit != 0 {
            text.push(char::REPLACEMENT_CHARACTER);
        }
        text
    }
}

/// Counts lines that are neither blank nor full-line comments.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A UTF-8, UTF-16 or UTF-32
/// byte-order mark selects the decoding and is dropped; without one the
/// bytes are read as UTF-8, and invalid sequences are replaced rather than
/// rejected.
pub fn count_valid_lines<R: BufRead>(
    reader: &mut R,
    classifier: &LineClassifier,
) -> std::io::Result<usize> {
    let (encoding, bom_len) = Encoding::sniff(reader.fill_buf()?);
    reader.consume(bom_len);

    if encoding != Encoding::Utf8 {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        return Ok(count_text_lines(&encoding.decode_wide(&body), classifier));
    }

    let mut valid = 0;
    let mut line_buf = Vec::new();

    loop {
        line_buf.clear();
        if reader.read_until(b'\n', &mut line_buf)? == 0 {
            break;
        }
        valid += count_text_lines(&String::from_utf8_lossy(&line_buf), classifier);
    }

    Ok(valid)
}

fn count_text_lines(text: &str, classifier: &LineClassifier) -> usize {
    text.split(['\n', '\r'])
        .map(|segment| classifier.process(segment))
        .sum()
}
