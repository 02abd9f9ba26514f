//! Patch orchestration.
//!
//! The orchestrator turns the user's [`PatchOptions`] into an ordered list
//! of [`PatchDescriptor`]s ([`resolve`]), then runs them strictly in
//! sequence against the ROM:
//!
//! ```text
//! ROM ──► fetch(d1) ──► decode ──► apply ──► fetch(d2) ──► ... ──► output
//! ```
//!
//! Each application's output is the next one's input. The cancellation
//! token is checked after every suspension point; once it fires, the
//! pipeline returns [`PatcherError::Cancelled`] without touching the
//! buffer or the output file.

mod error;
mod options;
mod resolve;

pub use error::OrchestratorError;
pub use options::{
    find_selectable, find_toggle, Base, Choice, PatchOptions, Requirement, SelectableAddOn,
    ToggleAddOn, Variant, EXP_SHARE, SELECTABLE_ADD_ONS, TOGGLE_ADD_ONS,
};
pub use resolve::{
    patch_url, resolve, PatchDescriptor, BASE_KEY, DELUXE_EXP_SHARE_ROOT, DELUXE_NO_EXP_SHARE_ROOT,
    DELUXE_ROOT, LEGACY_ROOT, OPTIONAL_ROOT,
};

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::buffer::ByteBuffer;
use crate::error::{PatcherError, PatcherResult};
use crate::fetch::PatchFetcher;

/// File name the patched ROM is saved under by default.
pub const DEFAULT_OUTPUT_NAME: &str = "patched.gba";

/// Pipeline stages for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStage {
    Fetching,
    Applying,
    Complete,
}

impl PatchStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetching => "Fetching",
            Self::Applying => "Applying",
            Self::Complete => "Complete",
        }
    }
}

/// Progress callback for patch runs.
///
/// # Arguments
///
/// * `stage` - Current stage
/// * `index` - Zero-based index of the descriptor being processed
/// * `total` - Number of descriptors in the run
/// * `descriptor` - The descriptor being processed
pub type PatchProgressCallback =
    Box<dyn Fn(PatchStage, usize, usize, &PatchDescriptor) + Send + Sync>;

/// Runs resolved descriptors against a ROM.
pub struct Orchestrator<F: PatchFetcher> {
    fetcher: F,
    progress: Option<PatchProgressCallback>,
}

impl<F: PatchFetcher> Orchestrator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            progress: None,
        }
    }

    pub fn with_progress(mut self, callback: PatchProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Apply every descriptor in order, starting from `rom`.
    ///
    /// Descriptors are used in the order given; [`resolve`] already sorts
    /// them. With no descriptors the ROM is returned unchanged.
    pub async fn run(
        &self,
        rom: ByteBuffer,
        descriptors: &[PatchDescriptor],
        cancel: &CancellationToken,
    ) -> PatcherResult<ByteBuffer> {
        let total = descriptors.len();
        let mut buffer = rom;

        info!(patches = total, rom_size = buffer.len(), "Starting patch run");

        for (index, descriptor) in descriptors.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(PatcherError::Cancelled);
            }

            self.report(PatchStage::Fetching, index, total, descriptor);
            let bytes = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PatcherError::Cancelled),
                result = self.fetcher.fetch(&descriptor.url) => result?,
            };

            if cancel.is_cancelled() {
                debug!(key = %descriptor.key, "Discarding fetched patch after cancellation");
                return Err(PatcherError::Cancelled);
            }

            self.report(PatchStage::Applying, index, total, descriptor);
            let patch = descriptor.method.decode(&bytes)?;
            buffer = patch.apply(&buffer)?;

            debug!(
                key = %descriptor.key,
                path = %descriptor.path,
                priority = descriptor.priority,
                size = buffer.len(),
                "Applied patch"
            );
        }

        if let Some(last) = descriptors.last() {
            self.report(PatchStage::Complete, total, total, last);
        }
        info!(patches = total, output_size = buffer.len(), "Patch run complete");

        Ok(buffer)
    }

    fn report(&self, stage: PatchStage, index: usize, total: usize, descriptor: &PatchDescriptor) {
        if let Some(callback) = &self.progress {
            callback(stage, index, total, descriptor);
        }
    }
}

/// Read a ROM image from disk.
pub async fn load_rom(path: &Path, cancel: &CancellationToken) -> PatcherResult<ByteBuffer> {
    let read_failed = |source: io::Error| PatcherError::ReadFailed {
        path: path.to_path_buf(),
        source,
    };

    let bytes = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(PatcherError::Cancelled),
        result = tokio::fs::read(path) => result.map_err(read_failed)?,
    };

    if cancel.is_cancelled() {
        return Err(PatcherError::Cancelled);
    }

    debug!(path = %path.display(), size = bytes.len(), "Loaded ROM");
    Ok(ByteBuffer::from_bytes(bytes))
}

/// Write the patched ROM to `path`.
///
/// The bytes go to a sibling staging file that is renamed over `path` once
/// fully written, so a failed or cancelled save leaves any existing file
/// untouched. Nothing is written when the token has already fired.
pub async fn save_output(
    buffer: &ByteBuffer,
    path: &Path,
    cancel: &CancellationToken,
) -> PatcherResult<PathBuf> {
    if cancel.is_cancelled() {
        return Err(PatcherError::Cancelled);
    }

    let staging = staging_path(path);
    if let Err(e) = write_and_replace(buffer, path, &staging, cancel).await {
        if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
            debug!(path = %staging.display(), error = %cleanup, "Staging file not removed");
        }
        return Err(e);
    }

    info!(path = %path.display(), size = buffer.len(), "Saved patched ROM");
    Ok(path.to_path_buf())
}

/// `path` with `.tmp` appended to its file name.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_and_replace(
    buffer: &ByteBuffer,
    path: &Path,
    staging: &Path,
    cancel: &CancellationToken,
) -> PatcherResult<()> {
    let write_failed = |source: io::Error| PatcherError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    tokio::fs::write(staging, buffer.as_bytes())
        .await
        .map_err(write_failed)?;

    if cancel.is_cancelled() {
        return Err(PatcherError::Cancelled);
    }

    tokio::fs::rename(staging, path).await.map_err(write_failed)
}
