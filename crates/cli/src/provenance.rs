//! Provenance for CLI output: `<out>.provenance.json` next to every written file.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Library version and source revision of the running binary.
#[derive(Debug, Serialize)]
pub struct Stamp {
    pub cstar_version: &'static str,
    pub code_rev: String,
}

impl Stamp {
    pub fn current() -> Self {
        Self {
            cstar_version: cstar::VERSION,
            code_rev: short_rev().unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// Which subcommand produced a file, with what parameters, from which input.
#[derive(Debug, Serialize)]
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            input: None,
        }
    }

    pub fn with_input(mut self, path: &Path) -> Self {
        self.input = Some(path.to_path_buf());
        self
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    #[serde(flatten)]
    stamp: Stamp,
    #[serde(flatten)]
    payload: &'a Payload,
    output: &'a Path,
}

/// `out.txt` -> `out.txt.provenance.json`.
fn sidecar_path(out: &Path) -> PathBuf {
    let mut name = out.as_os_str().to_os_string();
    name.push(".provenance.json");
    PathBuf::from(name)
}

/// Write the sidecar for `out` (which must already exist) and return its path.
pub fn write_sidecar(out: &Path, payload: &Payload) -> Result<PathBuf> {
    let path = sidecar_path(out);
    let doc = Sidecar {
        stamp: Stamp::current(),
        payload,
        output: out,
    };
    let bytes = serde_json::to_vec_pretty(&doc).context("serializing provenance")?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn short_rev() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    Some(rev.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_keeps_the_full_file_name() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/out/normal_forms.txt")),
            Path::new("/tmp/out/normal_forms.txt.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_command_input_and_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nf.txt");
        let input = dir.path().join("surfaces.txt");
        fs::write(&out, "pp;1,1;-1,1,0,0,0,0,1,-1\n").unwrap();
        let payload = Payload::new("normal-form", json!({"surfaces": 1})).with_input(&input);
        let path = write_sidecar(&out, &payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "normal-form");
        assert_eq!(parsed["params"]["surfaces"], 1);
        assert_eq!(parsed["input"], input.to_string_lossy().as_ref());
        assert_eq!(parsed["output"], out.to_string_lossy().as_ref());
        assert_eq!(parsed["cstar_version"], cstar::VERSION);
        assert!(parsed["code_rev"].is_string());
    }

    #[test]
    fn sampled_output_has_no_input() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sample.txt");
        fs::write(&out, "").unwrap();
        let path = write_sidecar(&out, &Payload::new("sample", json!({"seed": 3}))).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert!(parsed.get("input").is_none());
    }
}
