use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    MAX_FILE_SIZE,
    error::{Error, Result},
};

/// Manifest filenames probed by [`find_manifest`], in priority order.
/// The manifest must live directly in the skill directory; there is no
/// recursive search.
pub const MANIFEST_CANDIDATES: [&str; 4] = ["SKILL.md", "SKILL.MD", "Skill.md", "skill.md"];

/// Frontmatter as written, before validation. Field types are permissive
/// so that content-level mistakes surface as collected validation errors
/// instead of aborting the decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFrontmatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub compatibility: Option<String>,
    /// Sequence of strings or a comma-separated string; normalized by
    /// the validator.
    #[serde(default, alias = "allowed-tools")]
    pub allowed_tools: Option<serde_yaml::Value>,
    /// User-defined bag; must be a mapping but is otherwise opaque.
    #[serde(default)]
    pub metadata: Option<serde_yaml::Value>,
    /// Unknown keys are preserved but never validated.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A parsed manifest: decoded frontmatter plus the raw instruction body.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: PathBuf,
    pub frontmatter: RawFrontmatter,
    /// Everything after the closing frontmatter marker, untrimmed.
    pub body: String,
}

/// Locate the manifest file inside `dir`, trying the fixed candidate
/// list. Fails when no candidate exists or when more than one distinct
/// file matches (ambiguous casing on a case-sensitive filesystem).
pub fn find_manifest(dir: &Path) -> Result<PathBuf> {
    let mut matches: Vec<PathBuf> = Vec::new();
    for candidate in MANIFEST_CANDIDATES {
        let path = dir.join(candidate);
        if !path.is_file() {
            continue;
        }
        // Case-insensitive filesystems report every casing as the same
        // file; dedupe on the canonical path.
        let canonical = path.canonicalize()?;
        if !matches.contains(&canonical) {
            matches.push(canonical);
        }
    }
    match matches.len() {
        0 => Err(Error::parse(dir, "no SKILL.md manifest found")),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::parse(
            dir,
            format!(
                "ambiguous manifest: {} candidates match ({})",
                matches.len(),
                matches
                    .iter()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
    }
}

/// Read and decode a manifest file.
pub fn parse_manifest(path: &Path) -> Result<Manifest> {
    let content = read_text_limited(path)?;
    let (frontmatter, body) = split_frontmatter(&content, path)?;
    let frontmatter = decode_frontmatter(&frontmatter, path)?;
    Ok(Manifest {
        path: path.to_path_buf(),
        frontmatter,
        body,
    })
}

fn decode_frontmatter(frontmatter: &str, path: &Path) -> Result<RawFrontmatter> {
    if frontmatter.trim().is_empty() {
        return Ok(RawFrontmatter::default());
    }
    serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::parse(path, format!("invalid frontmatter: {e}")))
}

/// Split manifest text at the `---` marker lines into (frontmatter, body).
///
/// The first marker must be the first line of the file; the body is
/// everything after the second marker, returned verbatim so Phase 2 can
/// stay a pure substring operation.
pub(crate) fn split_frontmatter(content: &str, path: &Path) -> Result<(String, String)> {
    let mut offset = 0;
    let mut frontmatter_start = 0;
    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += line.len();
        let stripped = line.trim_end_matches(['\n', '\r']);
        if idx == 0 {
            if stripped != "---" {
                return Err(Error::parse(
                    path,
                    "manifest must open with a `---` frontmatter marker on its first line",
                ));
            }
            frontmatter_start = offset;
            continue;
        }
        if stripped == "---" {
            let frontmatter = content[frontmatter_start..line_start].to_string();
            let body = content[offset..].to_string();
            return Ok((frontmatter, body));
        }
    }
    Err(Error::parse(
        path,
        "missing closing `---` frontmatter marker",
    ))
}

/// Size-gated UTF-8 read. The ceiling is checked against file metadata
/// before any content is read, so oversized files fail closed.
pub fn read_text_limited(path: &Path) -> Result<String> {
    let bytes = read_bytes_limited(path)?;
    String::from_utf8(bytes).map_err(|_| Error::parse(path, "content is not valid UTF-8 text"))
}

/// Size-gated raw read for callers that explicitly want bytes.
pub fn read_bytes_limited(path: &Path) -> Result<Vec<u8>> {
    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_FILE_SIZE,
        });
    }
    Ok(fs::read(path)?)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("SKILL.md"), "---\nname: x\n---\nbody\n").unwrap();
        let found = find_manifest(tmp.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "SKILL.md");
    }

    #[test]
    fn test_find_manifest_missing() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("README.md"), "not a manifest").unwrap();
        assert!(find_manifest(tmp.path()).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_find_manifest_ambiguous_casing() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("SKILL.md"), "a").unwrap();
        fs::write(tmp.path().join("skill.md"), "b").unwrap();
        let err = find_manifest(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_parse_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(
            &path,
            r#"---
name: my-skill
description: A test skill
license: MIT
allowed-tools:
  - exec
  - read
---

# My Skill

Instructions here.
"#,
        )
        .unwrap();
        let manifest = parse_manifest(&path).unwrap();
        assert_eq!(manifest.frontmatter.name.as_deref(), Some("my-skill"));
        assert_eq!(
            manifest.frontmatter.description.as_deref(),
            Some("A test skill")
        );
        assert_eq!(manifest.frontmatter.license.as_deref(), Some("MIT"));
        assert!(manifest.frontmatter.allowed_tools.is_some());
        assert!(manifest.body.contains("Instructions here."));
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(
            &path,
            "---\nname: x\ndescription: y\nversion: 2\n---\nbody\n",
        )
        .unwrap();
        let manifest = parse_manifest(&path).unwrap();
        assert!(manifest.frontmatter.extra.contains_key("version"));
    }

    #[test]
    fn test_missing_frontmatter() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(&path, "# No frontmatter\nJust markdown.\n").unwrap();
        assert!(parse_manifest(&path).is_err());
    }

    #[test]
    fn test_missing_closing_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(&path, "---\nname: test\nno closing\n").unwrap();
        assert!(parse_manifest(&path).is_err());
    }

    #[test]
    fn test_marker_must_be_first_line() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(&path, "\n---\nname: test\n---\nbody\n").unwrap();
        assert!(parse_manifest(&path).is_err());
    }

    #[test]
    fn test_malformed_yaml_reports_context() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(&path, "---\nname: [unclosed\n---\nbody\n").unwrap();
        let err = parse_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("frontmatter"));
    }

    #[test]
    fn test_body_is_verbatim_substring() {
        let content = "---\nname: x\n---\n\n## Steps\n\n1. do it\n";
        let (frontmatter, body) = split_frontmatter(content, Path::new("/tmp/SKILL.md")).unwrap();
        assert_eq!(frontmatter, "name: x\n");
        assert_eq!(body, "\n## Steps\n\n1. do it\n");
    }

    #[test]
    fn test_crlf_markers() {
        let content = "---\r\nname: x\r\n---\r\nbody\r\n";
        let (frontmatter, body) = split_frontmatter(content, Path::new("/tmp/SKILL.md")).unwrap();
        assert_eq!(frontmatter, "name: x\r\n");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_empty_frontmatter_decodes_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(&path, "---\n---\nbody\n").unwrap();
        let manifest = parse_manifest(&path).unwrap();
        assert!(manifest.frontmatter.name.is_none());
    }

    #[test]
    fn test_oversized_file_fails_before_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        let oversized = vec![b'x'; (MAX_FILE_SIZE + 1) as usize];
        fs::write(&path, oversized).unwrap();
        let err = parse_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { .. }));
        assert!(err.is_security_violation());
    }

    #[test]
    fn test_non_utf8_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = read_text_limited(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
