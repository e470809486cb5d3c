//! Image builder driven by an external compiler and packager.
//!
//! # Responsibilities
//! - Lay out the image tree (manifest + rootfs with program source)
//! - Compile the program inside the rootfs
//! - Stamp the rootfs with the build time
//! - Package the tree and read the result into memory
//!
//! # Design Decisions
//! - Each build owns a fresh scratch directory, removed on drop on every path
//! - Tool output is captured and surfaced only in the error

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

use super::payload;
use super::{ArtifactBuilder, BuildError};
use crate::config::BuilderConfig;

const PROGRAM_FILE: &str = "prog.go";
const PROGRAM_PATH: &str = "./prog.go";
const PROGRAM_BINARY: &str = "prog";
const IMAGE_FILE: &str = "prog-build.aci";

/// Builds the test image with the configured toolchain.
#[derive(Debug, Clone)]
pub struct ToolchainBuilder {
    compiler: String,
    packager: String,
    work_dir: Option<PathBuf>,
}

impl ToolchainBuilder {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            packager: config.packager.clone(),
            work_dir: config.work_dir.clone(),
        }
    }

    fn scratch_dir(&self) -> Result<TempDir, BuildError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("aci-build-");
        let result = match &self.work_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        };
        result.map_err(|source| BuildError::Tree {
            path: self.work_dir.clone().unwrap_or_else(std::env::temp_dir),
            source,
        })
    }

    fn compile(&self, rootfs: &Path) -> Result<(), BuildError> {
        run_tool(
            &self.compiler,
            &["build", "-o", PROGRAM_BINARY, PROGRAM_PATH],
            Some(rootfs),
        )
    }

    fn package(&self, tree: &Path, output: &Path) -> Result<(), BuildError> {
        run_tool(
            &self.packager,
            &[OsStr::new("build"), tree.as_os_str(), output.as_os_str()],
            None,
        )
    }
}

impl ArtifactBuilder for ToolchainBuilder {
    fn build(&self) -> Result<Vec<u8>, BuildError> {
        let scratch = self.scratch_dir()?;
        let tree = create_tree(scratch.path())?;
        let rootfs = tree.join("rootfs");

        self.compile(&rootfs)?;
        write_stamp(&rootfs)?;

        let image = scratch.path().join(IMAGE_FILE);
        self.package(&tree, &image)?;

        let contents = fs::read(&image).map_err(BuildError::Read)?;
        tracing::debug!(
            scratch = %scratch.path().display(),
            bytes = contents.len(),
            "Image built"
        );
        Ok(contents)
    }
}

/// Create `ACI/manifest` and `ACI/rootfs/prog.go` under `root`.
fn create_tree(root: &Path) -> Result<PathBuf, BuildError> {
    let tree = root.join("ACI");
    let rootfs = tree.join("rootfs");
    let tree_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| BuildError::Tree { path, source }
    };

    fs::create_dir_all(&rootfs).map_err(tree_err(&rootfs))?;

    let manifest_path = tree.join("manifest");
    fs::write(&manifest_path, payload::manifest().to_string()).map_err(tree_err(&manifest_path))?;

    let source_path = rootfs.join(PROGRAM_FILE);
    fs::write(&source_path, payload::PROGRAM_SOURCE).map_err(tree_err(&source_path))?;

    Ok(tree)
}

/// Write the current time into the rootfs so every image differs.
fn write_stamp(rootfs: &Path) -> Result<(), BuildError> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    fs::write(rootfs.join("stamp"), nanos.to_be_bytes()).map_err(BuildError::Stamp)
}

fn run_tool<S: AsRef<OsStr>>(program: &str, args: &[S], dir: Option<&Path>) -> Result<(), BuildError> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|source| BuildError::ToolMissing {
        tool: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        let command = std::iter::once(program.to_string())
            .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");
        return Err(BuildError::ToolFailed {
            command,
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}
