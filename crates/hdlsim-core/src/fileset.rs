//! Source files and the resolved file set handed to a simulator.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::system::CoreDescriptor;

/// One file contributed to the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Type tag, e.g. `verilogSource-2005`, `systemVerilogSource`, `cppSource`.
    pub file_type: String,
    /// Directory this file needs on the include path.
    #[serde(default)]
    pub include_dir: Option<PathBuf>,
    /// Header-style file: only its directory is used.
    #[serde(default)]
    pub is_include_file: bool,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, file_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_type: file_type.into(),
            include_dir: None,
            is_include_file: false,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::classify(&self.file_type)
    }

    /// Directory this file puts on the include path, if any.
    ///
    /// Include files without an explicit directory use their parent directory.
    pub fn include_path(&self) -> Option<PathBuf> {
        match (&self.include_dir, self.is_include_file) {
            (Some(dir), _) => Some(dir.clone()),
            (None, true) => Some(
                self.path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."))
                    .to_path_buf(),
            ),
            (None, false) => None,
        }
    }
}

/// Classification of a file type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Verilog,
    SystemVerilog,
    C,
    Cpp,
    SystemC,
    Other,
}

impl FileKind {
    /// Classify a type tag.
    ///
    /// HDL tags match by prefix so versioned tags (`verilogSource-2005`,
    /// `systemVerilogSource-3.1a`) are recognized. C-family tags match exactly.
    pub fn classify(tag: &str) -> Self {
        if tag.starts_with("systemVerilogSource") {
            FileKind::SystemVerilog
        } else if tag.starts_with("verilogSource") {
            FileKind::Verilog
        } else {
            match tag {
                "cSource" => FileKind::C,
                "cppSource" => FileKind::Cpp,
                "systemCSource" => FileKind::SystemC,
                _ => FileKind::Other,
            }
        }
    }

    pub fn is_hdl(self) -> bool {
        matches!(self, FileKind::Verilog | FileKind::SystemVerilog)
    }

    pub fn is_c_family(self) -> bool {
        matches!(self, FileKind::C | FileKind::Cpp | FileKind::SystemC)
    }
}

/// Ordered source files plus the de-duplicated include directories they need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fileset {
    pub files: Vec<SourceFile>,
    pub include_dirs: BTreeSet<PathBuf>,
}

impl Fileset {
    /// Flatten the files of `cores`, in order.
    pub fn from_cores(cores: &[CoreDescriptor]) -> Self {
        Self::from_files(cores.iter().flat_map(|core| core.files.iter().cloned()))
    }

    pub fn from_files(files: impl IntoIterator<Item = SourceFile>) -> Self {
        let mut fileset = Fileset::default();
        for file in files {
            if let Some(dir) = file.include_path() {
                let _ = fileset.include_dirs.insert(dir);
            }
            if !file.is_include_file {
                fileset.files.push(file);
            }
        }
        fileset
    }

    /// HDL sources in their original order.
    pub fn hdl_sources(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(|f| f.kind().is_hdl())
    }

    /// C, C++ and SystemC sources in their original order.
    pub fn c_sources(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(|f| f.kind().is_c_family())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_hdl_by_prefix() {
        assert_eq!(FileKind::classify("verilogSource"), FileKind::Verilog);
        assert_eq!(FileKind::classify("verilogSource-2005"), FileKind::Verilog);
        assert_eq!(
            FileKind::classify("systemVerilogSource-3.1a"),
            FileKind::SystemVerilog
        );
    }

    #[test]
    fn classify_c_family_exactly() {
        assert_eq!(FileKind::classify("cSource"), FileKind::C);
        assert_eq!(FileKind::classify("cppSource"), FileKind::Cpp);
        assert_eq!(FileKind::classify("systemCSource"), FileKind::SystemC);
        assert_eq!(FileKind::classify("cppSource-11"), FileKind::Other);
        assert_eq!(FileKind::classify("vhdlSource"), FileKind::Other);
    }

    #[test]
    fn include_files_feed_include_dirs_only() {
        let mut header = SourceFile::new("rtl/inc/defs.vh", "verilogSource");
        header.is_include_file = true;
        let fileset = Fileset::from_files(vec![
            header,
            SourceFile::new("rtl/top.v", "verilogSource"),
        ]);
        assert_eq!(fileset.files.len(), 1);
        assert!(fileset.include_dirs.contains(Path::new("rtl/inc")));
    }

    #[test]
    fn bare_include_file_uses_current_dir() {
        let mut header = SourceFile::new("defs.vh", "verilogSource");
        header.is_include_file = true;
        assert_eq!(header.include_path(), Some(PathBuf::from(".")));
    }

    #[test]
    fn include_dirs_are_deduplicated() {
        let mut a = SourceFile::new("a.v", "verilogSource");
        a.include_dir = Some("inc".into());
        let mut b = SourceFile::new("b.cpp", "cppSource");
        b.include_dir = Some("inc".into());
        let fileset = Fileset::from_files(vec![a, b]);
        assert_eq!(fileset.include_dirs.len(), 1);
        assert_eq!(fileset.files.len(), 2);
    }

    #[test]
    fn hdl_and_c_sources_keep_order() {
        let fileset = Fileset::from_files(vec![
            SourceFile::new("b.sv", "systemVerilogSource"),
            SourceFile::new("tb.cpp", "cppSource"),
            SourceFile::new("a.v", "verilogSource"),
            SourceFile::new("notes.txt", "user"),
            SourceFile::new("drv.c", "cSource"),
        ]);
        let hdl: Vec<_> = fileset.hdl_sources().map(|f| f.path.clone()).collect();
        assert_eq!(hdl, vec![PathBuf::from("b.sv"), PathBuf::from("a.v")]);
        let c: Vec<_> = fileset.c_sources().map(|f| f.path.clone()).collect();
        assert_eq!(c, vec![PathBuf::from("tb.cpp"), PathBuf::from("drv.c")]);
    }
}
