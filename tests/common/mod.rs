#![allow(dead_code)]

use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

//------------------------------------------

pub const RBD_DENCODER: &str = env!("CARGO_BIN_EXE_rbd_dencoder");

// Returns stdout. The command must return zero.
pub fn run_ok<I>(args: I) -> Result<String>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let output = duct::cmd(RBD_DENCODER, args)
        .stdout_capture()
        .stderr_capture()
        .run()?;
    assert!(output.status.success());
    let stdout = std::str::from_utf8(&output.stdout[..])?
        .trim_end_matches(|c| c == '\n' || c == '\r')
        .to_string();
    Ok(stdout)
}

// Returns the exit code and stderr. A non zero status must be returned.
pub fn run_fail<I>(args: I) -> Result<(i32, String)>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let output = duct::cmd(RBD_DENCODER, args)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()?;
    assert!(!output.status.success());
    let stderr = std::str::from_utf8(&output.stderr[..])?.to_string();
    Ok((output.status.code().unwrap_or(-1), stderr))
}

//------------------------------------------

pub struct TestDir {
    dir: TempDir,
    file_count: usize,
}

impl TestDir {
    pub fn new() -> Result<TestDir> {
        let dir = tempdir()?;
        Ok(TestDir { dir, file_count: 0 })
    }

    pub fn mk_path(&mut self, file: &str) -> PathBuf {
        let mut p = PathBuf::new();
        p.push(&self.dir);
        p.push(PathBuf::from(format!("{:02}_{}", self.file_count, file)));
        self.file_count += 1;
        p
    }
}

pub fn os<S: AsRef<OsStr>>(s: S) -> OsString {
    s.as_ref().to_os_string()
}

//------------------------------------------
