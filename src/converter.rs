//! AsciiConverter - runs the sampling loop and delivers progress.
//!
//! A conversion can run in three ways:
//!
//! - [`AsciiConverter::convert`] blocks the calling thread and reports progress
//!   through a closure.
//! - [`AsciiConverter::spawn`] moves the work onto its own thread and returns a
//!   [`ConversionHandle`] whose channel yields [`ConversionEvent`]s.
//! - [`start_conversion`] is the callback flavour of `spawn`.
//!
//! In every case progress values arrive in row order and are followed by exactly
//! one completion. A failed run never produces text.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::ascii::{self, GlyphMode};
use crate::bitmap::{PixelError, PixelSource};
use crate::export::{self, ExportError, ExportFormat, DEFAULT_FONT_SIZE};

/// Immutable settings for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Requested sampling step; clamped by [`ascii::effective_stride`]
    pub quality: i32,
    /// Emit colored markers instead of brightness glyphs
    pub color: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: ascii::DEFAULT_QUALITY,
            color: false,
        }
    }
}

impl ConversionConfig {
    pub fn new(quality: i32, color: bool) -> Self {
        Self { quality, color }
    }

    pub fn mode(&self) -> GlyphMode {
        GlyphMode::from_color_flag(self.color)
    }

    /// Pixel step actually used for sampling.
    pub fn effective_stride(&self) -> u32 {
        ascii::effective_stride(self.quality, self.mode())
    }
}

/// Errors that end a conversion.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Image has no pixels")]
    EmptySource,

    #[error("Failed to read image: {0}")]
    Pixel(#[from] PixelError),

    #[error("Conversion cancelled")]
    Cancelled,

    #[error("Conversion worker exited without a result")]
    WorkerLost,
}

/// Output of a completed conversion.
///
/// Holds the primary text straight from the sampling loop plus the three
/// encodings derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    config: ConversionConfig,
    stride: u32,
    primary: String,
    plain: String,
    html: String,
    ansi: String,
    font_size: u32,
}

impl ConversionResult {
    /// Derive all encodings from `primary` at the default HTML font size.
    pub fn new(config: ConversionConfig, primary: String) -> Self {
        let plain = export::strip_markup(&primary);
        let ansi = export::to_ansi(&primary);
        let html = export::to_html(&primary, DEFAULT_FONT_SIZE);
        Self {
            stride: config.effective_stride(),
            config,
            primary,
            plain,
            html,
            ansi,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn config(&self) -> ConversionConfig {
        self.config
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Text as produced by the sampling loop.
    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn plain(&self) -> &str {
        &self.plain
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn ansi(&self) -> &str {
        &self.ansi
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Re-render the HTML encoding at another font size (clamped to 6-30).
    pub fn set_font_size(&mut self, font_size: u32) {
        self.font_size = export::clamp_font_size(font_size);
        self.html = export::to_html(&self.primary, self.font_size);
    }

    /// The text for one export format.
    pub fn encoded(&self, format: ExportFormat) -> &str {
        match format {
            ExportFormat::Plain => &self.plain,
            ExportFormat::Html => &self.html,
            ExportFormat::Ansi => &self.ansi,
        }
    }

    /// Write one encoding verbatim to `path`.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<(), ExportError> {
        export::write_text(self.encoded(format), path)?;
        log::info!("Exported {} text to {}", format.name(), path.display());
        Ok(())
    }

    /// Number of text rows.
    pub fn line_count(&self) -> usize {
        self.plain.lines().count()
    }
}

/// Messages sent from a conversion worker.
#[derive(Debug)]
pub enum ConversionEvent {
    /// Percentage of rows processed (0-100, non-decreasing)
    Progress(u8),
    /// Final outcome; always the last event of a run
    Finished(Result<ConversionResult, ConvertError>),
}

/// Converts pixel sources into text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiConverter {
    config: ConversionConfig,
}

impl AsciiConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ConversionConfig {
        self.config
    }

    /// Convert on the calling thread.
    pub fn convert<P, F>(&self, source: &P, on_progress: F) -> Result<ConversionResult, ConvertError>
    where
        P: PixelSource + ?Sized,
        F: FnMut(u8),
    {
        self.run(source, None, on_progress)
    }

    fn run<P, F>(
        &self,
        source: &P,
        stop: Option<&AtomicBool>,
        on_progress: F,
    ) -> Result<ConversionResult, ConvertError>
    where
        P: PixelSource + ?Sized,
        F: FnMut(u8),
    {
        let stride = self.config.effective_stride();
        let mode = self.config.mode();
        log::debug!(
            "Converting {}x{} image: quality={} stride={} mode={}",
            source.width(),
            source.height(),
            self.config.quality,
            stride,
            mode.name()
        );

        let primary = ascii::render(source, stride, mode, stop, on_progress)?;
        let result = ConversionResult::new(self.config, primary);
        log::info!(
            "Conversion finished: {} rows at stride {}",
            result.line_count(),
            stride
        );
        Ok(result)
    }

    /// Convert on a background thread.
    ///
    /// The worker owns `source` for the duration of the run and drops it when
    /// done.
    pub fn spawn<P>(&self, source: P) -> ConversionHandle
    where
        P: PixelSource + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let converter = *self;

        let thread = thread::spawn(move || {
            let progress_tx = tx.clone();
            let outcome = converter.run(&source, Some(&worker_stop), |percent| {
                // Receiver gone means the caller abandoned the run.
                let _ = progress_tx.send(ConversionEvent::Progress(percent));
            });
            if let Err(ConvertError::Cancelled) = outcome {
                log::warn!("Conversion cancelled");
            }
            let _ = tx.send(ConversionEvent::Finished(outcome));
        });

        ConversionHandle {
            events: rx,
            stop,
            thread: Some(thread),
        }
    }
}

/// Handle to a conversion running on a background thread.
pub struct ConversionHandle {
    events: Receiver<ConversionEvent>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ConversionHandle {
    /// Event stream of the run.
    pub fn events(&self) -> &Receiver<ConversionEvent> {
        &self.events
    }

    /// Ask the worker to stop at the next row boundary.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Block until the run finishes, forwarding progress to `on_progress`.
    pub fn wait_with_progress<F>(mut self, mut on_progress: F) -> Result<ConversionResult, ConvertError>
    where
        F: FnMut(u8),
    {
        let mut outcome = Err(ConvertError::WorkerLost);
        for event in self.events.iter() {
            match event {
                ConversionEvent::Progress(percent) => on_progress(percent),
                ConversionEvent::Finished(result) => {
                    outcome = result;
                    break;
                }
            }
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Conversion worker panicked");
            }
        }
        outcome
    }

    /// Block until the run finishes, discarding progress.
    pub fn wait(self) -> Result<ConversionResult, ConvertError> {
        self.wait_with_progress(|_| {})
    }
}

/// Start a background conversion that reports through callbacks.
///
/// Both callbacks run on the worker's event-forwarding thread, never on the
/// caller's. `on_progress` fires once per sampled row and `on_complete` fires
/// exactly once, after the last progress call.
pub fn start_conversion<P, F, C>(
    source: P,
    config: ConversionConfig,
    mut on_progress: F,
    on_complete: C,
) -> JoinHandle<()>
where
    P: PixelSource + Send + 'static,
    F: FnMut(u8) + Send + 'static,
    C: FnOnce(Result<ConversionResult, ConvertError>) + Send + 'static,
{
    let handle = AsciiConverter::new(config).spawn(source);
    thread::spawn(move || {
        let outcome = handle.wait_with_progress(&mut on_progress);
        on_complete(outcome);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{Bitmap, Rgb};
    use std::sync::Mutex;

    fn black_and_white() -> Bitmap {
        Bitmap::from_pixels(2, 1, &[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ConversionConfig::default();
        assert_eq!(config.quality, 3);
        assert!(!config.color);
        assert_eq!(config.effective_stride(), 3);
    }

    #[test]
    fn test_config_stride_clamping() {
        for q in [0, 6, 100] {
            assert_eq!(ConversionConfig::new(q, false).effective_stride(), 3);
        }
        assert_eq!(ConversionConfig::new(2, true).effective_stride(), 8);
        assert_eq!(ConversionConfig::new(9, true).effective_stride(), 9);
    }

    #[test]
    fn test_convert_monochrome() {
        let converter = AsciiConverter::new(ConversionConfig::new(1, false));
        let result = converter.convert(&black_and_white(), |_| {}).unwrap();
        assert_eq!(result.primary(), "@ \n");
        assert_eq!(result.plain(), "@ \n");
        assert_eq!(result.ansi(), "@ \n");
        assert_eq!(result.stride(), 1);
    }

    #[test]
    fn test_convert_color_derives_all_encodings() {
        // Color stride is at least 7, so only the first pixel of a 2x1 image
        // is sampled.
        let converter = AsciiConverter::new(ConversionConfig::new(1, true));
        let result = converter.convert(&black_and_white(), |_| {}).unwrap();
        assert_eq!(result.stride(), 7);
        assert_eq!(result.plain(), "#\n");
        assert_eq!(result.ansi(), "\u{1b}[38;2;0;0;0m#\u{1b}[0m\n");
        assert!(result.html().contains("rgb(0,0,0)"));
        assert!(result.html().starts_with("<pre"));
    }

    #[test]
    fn test_convert_is_idempotent() {
        let bitmap = Bitmap::from_raw(5, 4, (0..60).map(|v| (v * 4) as u8).collect()).unwrap();
        let converter = AsciiConverter::new(ConversionConfig::new(2, false));
        let a = converter.convert(&bitmap, |_| {}).unwrap();
        let b = converter.convert(&bitmap, |_| {}).unwrap();
        assert_eq!(a.primary(), b.primary());
    }

    #[test]
    fn test_set_font_size_rerenders_html() {
        let converter = AsciiConverter::new(ConversionConfig::new(1, false));
        let mut result = converter.convert(&black_and_white(), |_| {}).unwrap();
        assert!(result.html().contains("font-size:12px"));
        result.set_font_size(20);
        assert!(result.html().contains("font-size:20px"));
        result.set_font_size(99);
        assert_eq!(result.font_size(), 30);
        assert_eq!(result.plain(), "@ \n");
    }

    #[test]
    fn test_spawn_delivers_progress_then_result() {
        let bitmap = Bitmap::from_raw(1, 100, vec![0; 300]).unwrap();
        let handle = AsciiConverter::new(ConversionConfig::new(5, false)).spawn(bitmap);

        let mut events = Vec::new();
        for event in handle.events().iter() {
            let done = matches!(event, ConversionEvent::Finished(_));
            events.push(event);
            if done {
                break;
            }
        }

        let progress: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                ConversionEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(progress.len(), 20);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert!(matches!(events.last(), Some(ConversionEvent::Finished(Ok(_)))));
    }

    #[test]
    fn test_wait_returns_result() {
        let handle = AsciiConverter::new(ConversionConfig::new(1, false)).spawn(black_and_white());
        let result = handle.wait().unwrap();
        assert_eq!(result.primary(), "@ \n");
    }

    #[test]
    fn test_cancel_stops_run() {
        struct Slow;
        impl PixelSource for Slow {
            fn width(&self) -> u32 {
                1
            }
            fn height(&self) -> u32 {
                1_000_000
            }
            fn pixel(&self, _x: u32, _y: u32) -> Result<Rgb, PixelError> {
                std::thread::sleep(std::time::Duration::from_millis(1));
                Ok(Rgb::default())
            }
        }

        let handle = AsciiConverter::new(ConversionConfig::new(1, false)).spawn(Slow);
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(handle.wait(), Err(ConvertError::Cancelled));
    }

    #[test]
    fn test_start_conversion_callbacks() {
        let progress = Arc::new(Mutex::new(Vec::new()));
        let outcome = Arc::new(Mutex::new(None));

        let p = Arc::clone(&progress);
        let o = Arc::clone(&outcome);
        let bitmap = Bitmap::from_raw(1, 100, vec![255; 300]).unwrap();
        let worker = start_conversion(
            bitmap,
            ConversionConfig::new(10, false),
            move |percent| p.lock().unwrap().push(percent),
            move |result| *o.lock().unwrap() = Some(result),
        );
        worker.join().unwrap();

        // quality 10 is out of range, so stride 3 is used: 34 rows.
        assert_eq!(progress.lock().unwrap().len(), 34);
        let outcome = outcome.lock().unwrap().take().unwrap().unwrap();
        assert_eq!(outcome.line_count(), 34);
    }
}
