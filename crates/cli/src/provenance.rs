use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What a command did to produce an artifact.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub inputs: Vec<String>,
    pub summary: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            inputs: Vec::new(),
            summary: Value::Null,
        }
    }

    pub fn with_inputs<I, P>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.inputs = inputs
            .into_iter()
            .map(|p| p.as_ref().to_string_lossy().into_owned())
            .collect();
        self
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    version: &'static str,
    callsite: Callsite,
    command: &'static str,
    params: &'a Value,
    inputs: &'a [String],
    summary: &'a Value,
    outputs: Vec<String>,
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = provenance_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let caller = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        version: clattice::VERSION,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        command: payload.command,
        params: &payload.params,
        inputs: &payload.inputs,
        summary: &payload.summary,
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance written");
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit of the running binary: `GIT_COMMIT` at build time, then at run time,
/// then `git rev-parse`.
pub fn current_git_rev() -> String {
    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .and_then(non_empty)
        .or_else(|| std::env::var("GIT_COMMIT").ok().and_then(non_empty))
        .or_else(|| {
            let output = Command::new("git")
                .args(["rev-parse", "HEAD"])
                .output()
                .ok()?;
            if !output.status.success() {
                return None;
            }
            String::from_utf8(output.stdout)
                .ok()
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_replaces_extension() {
        assert_eq!(
            provenance_path(Path::new("/tmp/run/coincidences.tmp")),
            Path::new("/tmp/run/coincidences.provenance.json")
        );
        assert_eq!(
            provenance_path(Path::new("CoincidenceLattices.dat")),
            Path::new("CoincidenceLattices.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_command_inputs_and_summary() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("coincidences.tmp");
        fs::write(&artifact, "0.00\n\n").unwrap();
        let payload = Payload::new("search", json!({"nmax": 7}))
            .with_inputs([dir.path().join("lattices.tmp")])
            .with_summary(json!({"angles": 1, "solutions": 0}));
        let path = write_sidecar(&artifact, payload).unwrap();
        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["command"], "search");
        assert_eq!(doc["params"]["nmax"], 7);
        assert_eq!(doc["summary"]["angles"], 1);
        assert_eq!(doc["version"], clattice::VERSION);
        assert!(doc["inputs"][0].as_str().unwrap().ends_with("lattices.tmp"));
        assert_eq!(doc["outputs"][0], artifact.to_string_lossy().as_ref());
    }
}
