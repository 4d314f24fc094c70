//! Input discovery and output naming

use anyhow::{bail, Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const VM_EXTENSION: &str = "vm";
const ASM_EXTENSION: &str = "asm";

/// One input file and the static namespace its statics live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmFile {
    pub path: PathBuf,
    pub namespace: String,
}

impl VmFile {
    fn new(path: PathBuf) -> Result<Self> {
        let namespace = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .context("Invalid source filename")?
            .to_string();
        Ok(Self { path, namespace })
    }
}

fn is_vm_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == VM_EXTENSION)
}

/// The `.vm` file itself, or every `.vm` file directly inside a directory
/// sorted by file name
pub fn discover(source: &Path) -> Result<Vec<VmFile>> {
    if source.is_dir() {
        let mut paths = Vec::new();
        let entries = fs::read_dir(source)
            .with_context(|| format!("Failed to read directory {}", source.display()))?;
        for entry in entries {
            let path = entry?.path();
            if is_vm_file(&path) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            bail!("No .vm files in {}", source.display());
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!("Discovered {} source files in {}", paths.len(), source.display());
        paths.into_iter().map(VmFile::new).collect()
    } else if is_vm_file(source) {
        Ok(vec![VmFile::new(source.to_path_buf())?])
    } else if source.exists() {
        bail!("Not a .vm file or directory: {}", source.display());
    } else {
        bail!("Source not found: {}", source.display());
    }
}

/// `X.vm` becomes `X.asm`; directory `D` becomes `D/D.asm`
pub fn default_output(source: &Path) -> Result<PathBuf> {
    if source.is_dir() {
        let name = match source.file_name() {
            Some(name) => name.to_owned(),
            None => source
                .canonicalize()?
                .file_name()
                .context("Cannot name output for this directory")?
                .to_owned(),
        };
        Ok(source.join(format!("{}.{}", name.to_string_lossy(), ASM_EXTENSION)))
    } else {
        Ok(source.with_extension(ASM_EXTENSION))
    }
}
