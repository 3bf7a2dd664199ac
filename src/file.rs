//! File level workflows: comparison, statistics and compression
//! of Observation RINEX files.
use crate::{
    decoder::ObsDecoder,
    diff::{diff_pair, DiffOptions, Discrepancy},
    hatanaka::{self, ToolError, Transform},
    stats::FileStatistics,
    sync::Synchronizer,
    Error,
};

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::debug;

#[cfg(feature = "flate2")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression as GzCompression};

/// Result of the comparison of two files
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiffReport {
    /// Number of epochs both files have in common
    pub epochs: usize,
    /// Every [Discrepancy] that was found
    pub discrepancies: Vec<Discrepancy>,
}

impl DiffReport {
    /// True if both files agree on all common epochs
    pub fn is_empty(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// An Observation RINEX file, possibly compressed
#[derive(Clone, Debug, PartialEq)]
pub struct ObsFile {
    path: PathBuf,
    opts: DiffOptions,
}

impl ObsFile {
    /// Designates an Observation RINEX file. The file is not opened.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            opts: DiffOptions::default(),
        }
    }

    /// Copies and returns [Self] with given comparison options
    pub fn with_options(&self, opts: DiffOptions) -> Self {
        let mut s = self.clone();
        s.opts = opts;
        s
    }

    /// Current file path. It changes with (de)compression.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Comparison options
    pub fn options(&self) -> &DiffOptions {
        &self.opts
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// True if this file is gzip compressed
    pub fn is_gzip_compressed(&self) -> bool {
        self.file_name().ends_with(".gz")
    }

    /// True if this file is Hatanaka compressed
    pub fn is_hatanaka_compressed(&self) -> bool {
        hatanaka::is_crinex_name(&self.file_name())
    }

    /// Opens this file and decodes its header.
    /// Gzip compressed files are transparently decompressed
    /// when the "flate2" feature is enabled.
    pub fn decoder(&self) -> Result<ObsDecoder<Box<dyn BufRead>>, Error> {
        let fd = File::open(&self.path)?;
        #[cfg(feature = "flate2")]
        {
            if self.is_gzip_compressed() {
                let reader: Box<dyn BufRead> = Box::new(BufReader::new(GzDecoder::new(fd)));
                return ObsDecoder::new(reader);
            }
        }
        let reader: Box<dyn BufRead> = Box::new(BufReader::new(fd));
        ObsDecoder::new(reader)
    }

    /// Compares this file to another one, epoch by epoch,
    /// using the options of this file. Only epochs both files have in common
    /// are compared. Fails if either file is corrupt.
    pub fn diff(&self, other: &ObsFile) -> Result<DiffReport, Error> {
        let mut primary = self.decoder()?;
        let mut secondary = other.decoder()?;

        let mut report = DiffReport::default();
        let mut sync = Synchronizer::new(&mut primary, &mut secondary);

        while let Some(pair) = sync.next_pair() {
            report
                .discrepancies
                .extend(diff_pair(&pair, &self.opts));
        }
        report.epochs = sync.pairs();

        if let Some(e) = sync.error() {
            return Err(e.clone());
        }

        debug!(
            "{} / {}: {} common epochs, {} discrepancies",
            self.path.display(),
            other.path.display(),
            report.epochs,
            report.discrepancies.len()
        );
        Ok(report)
    }

    /// Gathers [FileStatistics] over this file
    pub fn stat(&self) -> Result<FileStatistics, Error> {
        FileStatistics::collect(self.decoder()?)
    }

    /// Hatanaka compresses this file with given [Transform],
    /// which replaces it. Does nothing on Hatanaka compressed files.
    pub fn rnx2crx(&mut self, tool: &dyn Transform) -> Result<(), ToolError> {
        if self.is_hatanaka_compressed() {
            debug!("{} is already Hatanaka compressed", self.path.display());
            return Ok(());
        }
        self.path = tool.transform(&self.path)?;
        Ok(())
    }

    /// Hatanaka decompresses this file with given [Transform],
    /// which replaces it. Does nothing on files that are not Hatanaka compressed.
    pub fn crx2rnx(&mut self, tool: &dyn Transform) -> Result<(), ToolError> {
        if !self.is_hatanaka_compressed() {
            debug!("{} is not Hatanaka compressed", self.path.display());
            return Ok(());
        }
        self.path = tool.transform(&self.path)?;
        Ok(())
    }

    /// Compresses this file with Hatanaka compression (when needed) then gzip.
    /// The source file is removed once compression has completed.
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn compress(&mut self, tool: &dyn Transform) -> Result<(), ToolError> {
        let gzip = self.is_gzip_compressed();
        let crinex = self.is_hatanaka_compressed();

        if gzip && crinex {
            return Ok(());
        }
        if gzip {
            return Err(ToolError::CompressedInput(self.path.clone()));
        }

        self.rnx2crx(tool)?;

        let mut gz_path = self.path.clone().into_os_string();
        gz_path.push(".gz");
        let gz_path = PathBuf::from(gz_path);

        let mut reader = BufReader::new(File::open(&self.path)?);
        let mut writer = GzEncoder::new(File::create(&gz_path)?, GzCompression::new(5));
        std::io::copy(&mut reader, &mut writer)?;
        writer.finish()?;

        std::fs::remove_file(&self.path)?;
        debug!("{} compressed to {}", self.path.display(), gz_path.display());
        self.path = gz_path;
        Ok(())
    }
}
