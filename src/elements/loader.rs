use std::fs;
use std::path::{Path, PathBuf};

use crate::elements::error::{LoadError, ParseError};
use crate::elements::record::ElementRecord;

pub const DEFAULT_MAX_SATELLITES: usize = 100;

#[derive(Debug, Clone)]
pub struct RejectedRecord {
    pub name: String,
    pub source: String,
    pub error: ParseError,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedElements {
    pub records: Vec<ElementRecord>,
    pub rejected: Vec<RejectedRecord>,
}

pub struct TleLoader {
    path: PathBuf,
    max_satellites: usize,
}

impl TleLoader {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            max_satellites: DEFAULT_MAX_SATELLITES,
        }
    }

    pub fn with_max_satellites(mut self, max_satellites: usize) -> Self {
        self.max_satellites = max_satellites;
        self
    }

    pub fn load(&self) -> Result<LoadedElements, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::NotFound(self.path.display().to_string()));
        }

        let mut loaded = LoadedElements::default();

        if self.path.is_file() {
            let content = fs::read_to_string(&self.path)?;
            parse_into(&content, &source_name(&self.path), &mut loaded);
        } else {
            let mut files = Vec::new();
            for entry in fs::read_dir(&self.path)? {
                let path = entry?.path();
                if path.is_file() && has_tle_extension(&path) {
                    files.push(path);
                }
            }
            files.sort();

            for path in files {
                match fs::read_to_string(&path) {
                    Ok(content) => parse_into(&content, &source_name(&path), &mut loaded),
                    Err(e) => {
                        log::warn!("Failed to read TLE file {}: {}", path.display(), e);
                    }
                }
            }
        }

        if loaded.records.len() > self.max_satellites {
            log::info!(
                "Tracking first {} of {} satellites",
                self.max_satellites,
                loaded.records.len()
            );
            loaded.records.truncate(self.max_satellites);
        }

        Ok(loaded)
    }
}

pub fn parse_tle_text(content: &str, source: &str) -> LoadedElements {
    let mut loaded = LoadedElements::default();
    parse_into(content, source, &mut loaded);
    loaded
}

fn parse_into(content: &str, source: &str, loaded: &mut LoadedElements) {
    for (name, line1, line2) in split_blocks(content) {
        match ElementRecord::parse(name.unwrap_or(""), line1, line2) {
            Ok(record) => loaded.records.push(record),
            Err(error) => {
                let name = name.unwrap_or("<unnamed>").to_string();
                log::warn!("Rejected TLE '{}' from {}: {}", name, source, error);
                loaded.rejected.push(RejectedRecord {
                    name,
                    source: source.to_string(),
                    error,
                });
            }
        }
    }
}

/// Split text into (name, line1, line2) blocks. Accepts bare 2-line blocks,
/// 3-line blocks and the "0 NAME" title form.
fn split_blocks(content: &str) -> Vec<(Option<&str>, &str, &str)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i], lines[i + 1]));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            let name = lines[i].strip_prefix("0 ").unwrap_or(lines[i]);
            result.push((Some(name), lines[i + 1], lines[i + 2]));
            i += 3;
        } else {
            log::debug!("Skipping stray TLE line: {}", lines[i]);
            i += 1;
        }
    }

    result
}

fn has_tle_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tle") | Some("txt")
    )
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
