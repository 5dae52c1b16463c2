//! Dependency manifest (`requirements.txt`): ordered package specifiers.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::BootstrapError;

/// A package specifier such as `streamlit>=1.28`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: String,
    /// Everything after the name: extras, version constraint, markers
    pub constraint: Option<String>,
}

/// One meaningful manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    Requirement(Requirement),
    /// Option lines (`-r`, `--index-url`) and direct references, passed through to pip
    Other(String),
}

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: Vec<ManifestEntry>,
    digest: String,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        if !path.is_file() {
            return Err(BootstrapError::ManifestNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| BootstrapError::io(format!("read {}", path.display()), e))?;
        let mut manifest = Self::parse(path, &content);

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let mut visited = vec![canonical(path)];
        manifest.fold_includes(path, &content, &mut hasher, &mut visited);
        manifest.digest = hex::encode(hasher.finalize());
        Ok(manifest)
    }

    /// Hash `-r`/`-c` files into the digest and append their entries.
    ///
    /// pip resolves include paths against the including file's directory. A
    /// missing include hashes as a marker so pip gets to report it.
    fn fold_includes(
        &mut self,
        from: &Path,
        content: &str,
        hasher: &mut Sha256,
        visited: &mut Vec<PathBuf>,
    ) {
        let base = from.parent().unwrap_or_else(|| Path::new(""));
        for line in content.lines() {
            let Some(target) = include_target(strip_comment(line).trim()) else {
                continue;
            };
            let path = base.join(target);
            let key = canonical(&path);
            if visited.contains(&key) {
                continue;
            }
            visited.push(key);

            hasher.update(b"\0");
            hasher.update(target.as_bytes());
            hasher.update(b"\0");
            match std::fs::read_to_string(&path) {
                Ok(included) => {
                    hasher.update(included.as_bytes());
                    self.entries.extend(included.lines().filter_map(parse_line));
                    self.fold_includes(&path, &included, hasher, visited);
                }
                Err(e) => {
                    tracing::debug!(include = %path.display(), error = %e, "included manifest unreadable");
                    hasher.update(b"<missing>");
                }
            }
        }
    }

    pub fn parse(path: &Path, content: &str) -> Self {
        let entries = content.lines().filter_map(parse_line).collect();
        Self {
            path: path.to_path_buf(),
            entries,
            digest: hex::encode(Sha256::digest(content.as_bytes())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().filter_map(|e| match e {
            ManifestEntry::Requirement(r) => Some(r),
            ManifestEntry::Other(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SHA-256 of the manifest and every file it includes, hex encoded.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// The file named by a `-r`/`--requirement`/`-c`/`--constraint` line.
fn include_target(line: &str) -> Option<&str> {
    let rest = ["--requirement", "--constraint"]
        .iter()
        .find_map(|flag| {
            let rest = line.strip_prefix(flag)?;
            rest.strip_prefix('=')
                .or_else(|| rest.starts_with(char::is_whitespace).then_some(rest))
        })
        .or_else(|| line.strip_prefix("-r").or_else(|| line.strip_prefix("-c")))?;
    let target = rest.trim();
    (!target.is_empty()).then_some(target)
}

/// pip treats `#` as a comment at line start or after whitespace.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return &line[..i];
        }
    }
    line
}

fn parse_line(line: &str) -> Option<ManifestEntry> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('-') || line.contains("://") || line.starts_with('.') || line.starts_with('/') {
        return Some(ManifestEntry::Other(line.to_string()));
    }
    let name_end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(line.len());
    if name_end == 0 {
        return Some(ManifestEntry::Other(line.to_string()));
    }
    let rest = line[name_end..].trim();
    Some(ManifestEntry::Requirement(Requirement {
        name: line[..name_end].to_string(),
        constraint: (!rest.is_empty()).then(|| rest.to_string()),
    }))
}
