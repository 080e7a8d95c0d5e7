//! Session state for one crop workflow.
//!
//! A session moves through three phases:
//!
//! ```text
//!            load            render
//!   Idle ----------> Cropping -------> Result
//!    ^                  |                 |
//!    +---- reset -------+------ reset ----+
//! ```
//!
//! Every operation either succeeds and applies its transition, or fails and
//! leaves the phase, image and result as they were. Failures are logged here, at the
//! operation boundary, and returned to the caller.
//!
//! # Stale loads
//!
//! Reading a `File` in the browser is asynchronous, so a load is split into
//! [`Session::begin_load`] and [`Session::finish_load`]. The ticket handed out
//! by `begin_load` records the session generation; a reset or a newer load
//! advances the generation and the older ticket's completion is ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::decode::{decode_image, exceeds_upload_limit, RasterImage, SourceImage};
use crate::encode::{export, ExportedFile, FormatPolicy};
use crate::error::CropError;
use crate::geometry::{CropControls, CropRect};
use crate::resize::{apply_size_policy, SizePolicy};
use crate::transform::render_circular;

/// Pipeline stage of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No image loaded.
    Idle,
    /// An image is loaded and the user is adjusting the crop.
    Cropping,
    /// A circular crop has been rendered.
    Result,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Cropping => "cropping",
            Phase::Result => "result",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof that a load was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image was decoded and the session is now cropping it.
    Loaded { width: u32, height: u32 },
    /// The session moved on after the load started; nothing changed.
    Stale,
}

#[derive(Debug)]
enum Stage {
    Idle,
    Cropping {
        source: SourceImage,
        pending: Option<CropRect>,
    },
    Result {
        cropped: RasterImage,
    },
}

/// State for a single crop workflow.
#[derive(Debug)]
pub struct Session {
    config: PipelineConfig,
    stage: Stage,
    controls: CropControls,
    format: FormatPolicy,
    size: SizePolicy,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Session {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            stage: Stage::Idle,
            controls: CropControls::default(),
            format: FormatPolicy::default(),
            size: SizePolicy::default(),
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Idle => Phase::Idle,
            Stage::Cropping { .. } => Phase::Cropping,
            Stage::Result { .. } => Phase::Result,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn controls(&self) -> &CropControls {
        &self.controls
    }

    pub fn format(&self) -> FormatPolicy {
        self.format
    }

    pub fn size(&self) -> SizePolicy {
        self.size
    }

    /// Change the export format. Allowed in any phase.
    pub fn set_format(&mut self, format: FormatPolicy) {
        self.format = format;
    }

    /// Change the export size. Allowed in any phase.
    pub fn set_size(&mut self, size: SizePolicy) {
        self.size = size;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.controls.set_zoom(zoom);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.controls.set_rotation(degrees);
    }

    /// The loaded source, while cropping.
    pub fn source(&self) -> Option<&SourceImage> {
        match &self.stage {
            Stage::Cropping { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The most recent crop rectangle reported by the widget.
    pub fn pending_crop(&self) -> Option<&CropRect> {
        match &self.stage {
            Stage::Cropping { pending, .. } => pending.as_ref(),
            _ => None,
        }
    }

    /// The rendered circle, once in the result phase.
    pub fn cropped(&self) -> Option<&RasterImage> {
        match &self.stage {
            Stage::Result { cropped } => Some(cropped),
            _ => None,
        }
    }

    /// Start loading a file. Any load started earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Complete a load started with [`begin_load`](Self::begin_load).
    ///
    /// On success the session enters `Cropping` with fresh controls,
    /// discarding any previous image or result. A decode failure leaves the
    /// session untouched.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        bytes: &[u8],
    ) -> Result<LoadOutcome, CropError> {
        if ticket.generation != self.generation {
            log::debug!(
                "ignoring stale load (ticket {}, session {})",
                ticket.generation,
                self.generation
            );
            return Ok(LoadOutcome::Stale);
        }

        if exceeds_upload_limit(bytes.len() as u64, self.config.max_upload_bytes) {
            log::warn!(
                "image is {} bytes, above the advisory limit of {}",
                bytes.len(),
                self.config.max_upload_bytes
            );
        }

        let source = logged("load", decode_image(bytes).map_err(CropError::from))?;
        let (width, height) = (source.natural_width(), source.natural_height());

        self.stage = Stage::Cropping {
            source,
            pending: None,
        };
        self.controls = CropControls::default();
        log::info!("loaded {width}x{height} image, now cropping");

        Ok(LoadOutcome::Loaded { width, height })
    }

    /// Convenience for callers that already hold the bytes.
    pub fn load(&mut self, bytes: &[u8]) -> Result<LoadOutcome, CropError> {
        let ticket = self.begin_load();
        self.finish_load(ticket, bytes)
    }

    /// Record the on-screen size of the source image.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> Result<(), CropError> {
        match &mut self.stage {
            Stage::Cropping { source, .. } => {
                if !source.set_display_size(width, height) {
                    log::warn!("ignoring invalid display size {width}x{height}");
                }
                Ok(())
            }
            _ => logged("set display size", Err(self.invalid_phase("set display size"))),
        }
    }

    /// Store the latest crop rectangle from the widget (display coordinates).
    pub fn update_crop_area(&mut self, rect: CropRect) -> Result<(), CropError> {
        match &mut self.stage {
            Stage::Cropping { pending, .. } => {
                *pending = Some(rect);
                Ok(())
            }
            _ => logged("update crop area", Err(self.invalid_phase("update crop area"))),
        }
    }

    /// Render the circular crop and move to `Result`.
    ///
    /// Fails with `MissingGeometry` if no crop area was reported; the session
    /// then stays in `Cropping`.
    /// Returns the side of the rendered square.
    pub fn render(&mut self) -> Result<u32, CropError> {
        let cropped = match &self.stage {
            Stage::Cropping { source, pending } => logged(
                "render",
                render_circular(source, pending.as_ref(), self.controls.rotation()),
            )?,
            _ => return logged("render", Err(self.invalid_phase("render"))),
        };

        let side = cropped.width;
        log::info!("rendered {side}x{side} circle");
        self.stage = Stage::Result { cropped };

        Ok(side)
    }

    /// Resize and encode the result with the current policies.
    ///
    /// Export does not change the phase.
    pub fn export(&self) -> Result<ExportedFile, CropError> {
        let Stage::Result { cropped } = &self.stage else {
            return logged("export", Err(self.invalid_phase("export")));
        };

        let resized = logged(
            "export",
            apply_size_policy(cropped, self.size, self.config.resize_filter)
                .map_err(CropError::from),
        )?;
        logged(
            "export",
            export(&resized, self.format, &self.config).map_err(CropError::from),
        )
    }

    /// Drop any image or result and return to `Idle`.
    ///
    /// Loads started before the reset resolve as stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.stage = Stage::Idle;
        self.controls = CropControls::default();
        log::info!("session reset");
    }

    fn invalid_phase(&self, operation: &'static str) -> CropError {
        CropError::InvalidPhase {
            operation,
            phase: self.phase(),
        }
    }
}

fn logged<T>(operation: &str, result: Result<T, CropError>) -> Result<T, CropError> {
    if let Err(e) = &result {
        log::warn!("{operation} failed: {e}");
    }
    result
}
