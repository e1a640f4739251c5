// tests/common/mod.rs

//! Shared test utilities: stub external tools backed by shell scripts.
//!
//! The pipeline only observes external programs through their exit codes
//! and captured output, so a small `sh` script standing in for Rscript,
//! reproschema, or git exercises the same code paths the real tools do.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable shell script that impersonates an external tool
pub fn stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();

    path
}

/// Write a minimal converter YAML config with the given protocol name
pub fn write_converter_yaml(dir: &Path, protocol: &str) -> PathBuf {
    let path = dir.join("converter.yaml");
    fs::write(
        &path,
        format!(
            "protocol_name: {}\nprotocol_display_name: Test Protocol\n",
            protocol
        ),
    )
    .unwrap();
    path
}
