#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use smarttask::Task;
use tempfile::TempDir;

pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn snapshot_file(&self) -> PathBuf {
        self.dir.path().join("smartTasks.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_tasks(&self) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        let path = self.snapshot_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = smarttask_cmd();
        cmd.env("SMARTTASK_DIR", self.path());
        cmd
    }

    /// Run with `--json` and return the envelope's `data`.
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.cmd().arg("--json").args(args).output()?;
        if !output.status.success() {
            return Err(format!(
                "smarttask {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stdout)
            )
            .into());
        }
        let envelope: Value = serde_json::from_slice(&output.stdout)?;
        Ok(envelope["data"].clone())
    }
}

pub fn smarttask_cmd() -> Command {
    let mut cmd = Command::cargo_bin("smarttask").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("SMARTTASK_DIR");
    cmd
}
