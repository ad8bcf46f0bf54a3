//! Reference corpus extraction and loading
//!
//! The reference corpus is a flat list of transcription lines pulled out of
//! an IVTFF file. Transcription lines look like:
//!
//! ```text
//! <f116v.1,@Lx;U>    oror.sheey!!!!!!
//! ```
//!
//! Only the text after the locus tag is kept, reduced to `[a-z.]` and single
//! spaces. Once extracted, the corpus is read-only.

use crate::error::{Result, ScriptoriumError};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Reduce one IVTFF line to corpus text, or `None` if it carries none.
pub fn clean_ivtff_line(line: &str) -> Option<String> {
    if line.is_empty() || line.starts_with('#') || !line.starts_with("<f") {
        return None;
    }
    let (_, after) = line.split_once('>')?;
    let text = normalize_symbols(after);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Lowercase, map everything outside `[a-z.]` and whitespace to a space,
/// collapse whitespace runs.
pub fn normalize_symbols(text: &str) -> String {
    let mapped: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c == '.' {
                c
            } else {
                ' '
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract up to `max_lines` corpus lines from an IVTFF stream.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn extract_ivtff<R: Read>(reader: R, max_lines: usize) -> std::io::Result<Vec<String>> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while lines.len() < max_lines {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let raw = String::from_utf8_lossy(&buf);
        if let Some(text) = clean_ivtff_line(raw.trim_end_matches(['\n', '\r'])) {
            lines.push(text);
        }
    }
    Ok(lines)
}

/// Extract from an IVTFF file. Zero lines is an upstream-data failure.
pub fn extract_file(path: &Path, max_lines: usize) -> Result<Vec<String>> {
    let file = std::fs::File::open(path).map_err(|e| ScriptoriumError::io(path, e))?;
    let lines = extract_ivtff(file, max_lines).map_err(|e| ScriptoriumError::io(path, e))?;
    if lines.is_empty() {
        return Err(ScriptoriumError::EmptyExtraction(path.to_path_buf()));
    }
    info!("extracted {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Write an extracted corpus, one line per line.
pub fn write_reference(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ScriptoriumError::io(parent, e))?;
    }
    let file = std::fs::File::create(path).map_err(|e| ScriptoriumError::io(path, e))?;
    let mut out = std::io::BufWriter::new(file);
    for line in lines {
        writeln!(out, "{}", line).map_err(|e| ScriptoriumError::io(path, e))?;
    }
    out.flush().map_err(|e| ScriptoriumError::io(path, e))?;
    Ok(())
}

/// Read-only reference corpus
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCorpus {
    lines: Vec<String>,
}

impl ReferenceCorpus {
    /// Build from lines already in memory. Blank lines are dropped; an
    /// empty result is a configuration error.
    pub fn from_lines<I, S>(lines: I, max_lines: usize, origin: &Path) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .take(max_lines)
            .collect();
        if lines.is_empty() {
            return Err(ScriptoriumError::EmptyCorpus(origin.to_path_buf()));
        }
        Ok(Self { lines })
    }

    /// Load an extracted reference file.
    pub fn load(path: &Path, max_lines: usize) -> Result<Self> {
        let content = std::fs::read(path).map_err(|e| ScriptoriumError::io(path, e))?;
        let content = String::from_utf8_lossy(&content);
        let corpus = Self::from_lines(content.lines(), max_lines, path)?;
        debug!("loaded {} reference lines from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whole corpus as one text, lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
