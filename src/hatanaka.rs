//! Hatanaka (CRINEX) compression, delegated to the RNX2CRX / CRX2RNX
//! command line tools, which must be available in $PATH.
use regex::Regex;
use std::{
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};
use thiserror::Error;

use log::debug;

/// Compression tool
pub const RNX2CRX: &str = "RNX2CRX";

/// Decompression tool
pub const CRX2RNX: &str = "CRX2RNX";

lazy_static! {
    /// Short file names: station (4), day of year (3), session (1),
    /// optional minutes (2), "." year (2) and file type.
    static ref RINEX2_NAME: Regex =
        Regex::new(r"^(?P<stem>[a-zA-Z0-9]{4}\d{3}[a-zA-Z0-9](?:\d{2})?\.\d{2})(?P<ext>[oOdD])$")
            .unwrap();
    /// Long file names: site (9), source, start time (11), period,
    /// optional sampling, content, followed by .rnx or .crx
    static ref RINEX3_NAME: Regex = Regex::new(
        r"^(?P<stem>[a-zA-Z0-9]{9}_[a-zA-Z]_\d{11}_\d{2}[a-zA-Z](?:_\d{2}[a-zA-Z])?_[a-zA-Z]{2})\.(?P<ext>rnx|crx|RNX|CRX)$"
    )
    .unwrap();
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} not found in $PATH")]
    Missing(String),
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("\"{0}\" is not a standard RINEX file name")]
    NoStandardName(String),
    #[error("{} was not produced", .0.display())]
    OutputMissing(PathBuf),
    #[error("{} is compressed, but not Hatanaka compressed", .0.display())]
    CompressedInput(PathBuf),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// [Transform] turns a file into another file and returns the path
/// of the new file. Implemented by [ExternalTool], and by any
/// `Fn(&Path) -> Result<PathBuf, ToolError>`.
pub trait Transform {
    fn transform(&self, path: &Path) -> Result<PathBuf, ToolError>;
}

impl<F: Fn(&Path) -> Result<PathBuf, ToolError>> Transform for F {
    fn transform(&self, path: &Path) -> Result<PathBuf, ToolError> {
        self(path)
    }
}

/// Direction of the Hatanaka transform
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// RINEX to CRINEX
    Compress,
    /// CRINEX to RINEX
    Decompress,
}

/// [ExternalTool] runs a Hatanaka command line tool on a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    /// Program to execute
    pub program: String,
    /// Transform this program applies
    pub direction: Direction,
}

impl ExternalTool {
    /// Builds an [ExternalTool] running given program
    pub fn new(program: &str, direction: Direction) -> Self {
        Self {
            program: program.to_string(),
            direction,
        }
    }
    /// RNX2CRX compression tool
    pub fn rnx2crx() -> Self {
        Self::new(RNX2CRX, Direction::Compress)
    }
    /// CRX2RNX decompression tool
    pub fn crx2rnx() -> Self {
        Self::new(CRX2RNX, Direction::Decompress)
    }
}

impl Transform for ExternalTool {
    /// Runs the tool on given file, which is replaced by its transform
    /// ("-d" option). Returns the path of the produced file.
    fn transform(&self, path: &Path) -> Result<PathBuf, ToolError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let target = target_name(&file_name, self.direction)?;
        let target = match path.parent() {
            Some(dir) => dir.join(target),
            None => PathBuf::from(target),
        };

        debug!("{} {} -d -f", self.program, path.display());

        let output = Command::new(&self.program)
            .arg(path)
            .args(["-d", "-f"])
            .output()
            .map_err(|e| match e.kind() {
                IoErrorKind::NotFound => ToolError::Missing(self.program.clone()),
                _ => ToolError::Io(e),
            })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !target.exists() {
            return Err(ToolError::OutputMissing(target));
        }
        Ok(target)
    }
}

/// Returns the name of the file a Hatanaka transform of `file_name` produces.
/// RINEX2 files ending with "o" become "d" files and vice versa,
/// RINEX3 ".rnx" files become ".crx" files and vice versa.
pub fn target_name(file_name: &str, direction: Direction) -> Result<String, ToolError> {
    let no_standard_name = || ToolError::NoStandardName(file_name.to_string());

    if let Some(captures) = RINEX2_NAME.captures(file_name) {
        let stem = &captures["stem"];
        let uppercase = captures["ext"].chars().all(|c| c.is_ascii_uppercase());
        let ext = match (direction, uppercase) {
            (Direction::Compress, false) => "d",
            (Direction::Compress, true) => "D",
            (Direction::Decompress, false) => "o",
            (Direction::Decompress, true) => "O",
        };
        let target = format!("{}{}", stem, ext);
        if target == file_name {
            return Err(no_standard_name());
        }
        return Ok(target);
    }

    if let Some(captures) = RINEX3_NAME.captures(file_name) {
        let stem = &captures["stem"];
        let uppercase = captures["ext"].chars().all(|c| c.is_ascii_uppercase());
        let ext = match (direction, uppercase) {
            (Direction::Compress, false) => "crx",
            (Direction::Compress, true) => "CRX",
            (Direction::Decompress, false) => "rnx",
            (Direction::Decompress, true) => "RNX",
        };
        let target = format!("{}.{}", stem, ext);
        if target == file_name {
            return Err(no_standard_name());
        }
        return Ok(target);
    }

    Err(no_standard_name())
}

/// True if given file name designates a Hatanaka compressed file,
/// possibly gzip compressed.
pub fn is_crinex_name(file_name: &str) -> bool {
    let file_name = file_name
        .strip_suffix(".gz")
        .or_else(|| file_name.strip_suffix(".Z"))
        .unwrap_or(file_name);

    if let Some(captures) = RINEX2_NAME.captures(file_name) {
        return captures["ext"].eq_ignore_ascii_case("d");
    }
    if let Some(captures) = RINEX3_NAME.captures(file_name) {
        return captures["ext"].eq_ignore_ascii_case("crx");
    }
    file_name.ends_with(".crx") || file_name.ends_with(".CRX")
}
