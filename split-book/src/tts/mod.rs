//! TTS backend trait and types.

pub mod kokoro;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_VOICE: &str = "af_bella";
pub const DEFAULT_SPEED: f32 = 1.0;

/// Options for converting a section file to speech.
#[derive(Debug, Clone)]
pub struct TtsOptions {
    /// Voice identifier understood by the backend (e.g. af_bella, bm_george)
    pub voice: String,
    /// Speech speed multiplier (0.5-2.0, default 1.0)
    pub speed: f32,
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            speed: DEFAULT_SPEED,
        }
    }
}

impl TtsOptions {
    /// Create new TTS options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the speed multiplier.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.clamp(0.5, 2.0);
        self
    }
}

/// Result of converting one section file.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub success: bool,
    /// The tool's diagnostic output when the conversion failed
    pub diagnostic: Option<String>,
    pub elapsed: Duration,
}

impl Conversion {
    pub fn failed(input: &Path, output: PathBuf, diagnostic: impl Into<String>) -> Self {
        Self {
            input: input.to_path_buf(),
            output,
            success: false,
            diagnostic: Some(diagnostic.into()),
            elapsed: Duration::ZERO,
        }
    }
}

/// TTS backend trait - one section file in, one audio file out.
pub trait TtsBackend {
    /// Convert a section file to audio.
    fn convert(&self, input: &Path, options: &TtsOptions) -> Conversion;

    /// Where the audio for `input` will be written.
    fn output_path(&self, input: &Path) -> PathBuf;

    /// Backend name for display.
    fn name(&self) -> &str;
}

/// Convert files in sorted order, reporting each result to `on_done`.
///
/// A failed file does not stop the batch.
pub fn convert_batch<B, F>(
    backend: &B,
    files: &[PathBuf],
    options: &TtsOptions,
    mut on_done: F,
) -> Vec<Conversion>
where
    B: TtsBackend + ?Sized,
    F: FnMut(&Conversion),
{
    let mut ordered: Vec<&PathBuf> = files.iter().collect();
    ordered.sort();

    ordered
        .into_iter()
        .map(|file| {
            let conversion = backend.convert(file, options);
            on_done(&conversion);
            conversion
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingBackend {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl TtsBackend for RecordingBackend {
        fn convert(&self, input: &Path, _options: &TtsOptions) -> Conversion {
            self.calls.borrow_mut().push(input.to_path_buf());
            let success = !input.to_string_lossy().contains("bad");
            Conversion {
                input: input.to_path_buf(),
                output: self.output_path(input),
                success,
                diagnostic: if success { None } else { Some("boom".into()) },
                elapsed: Duration::ZERO,
            }
        }

        fn output_path(&self, input: &Path) -> PathBuf {
            input.with_extension("wav")
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[test]
    fn test_tts_options_default() {
        let opts = TtsOptions::default();
        assert_eq!(opts.voice, "af_bella");
        assert_eq!(opts.speed, 1.0);
    }

    #[test]
    fn test_tts_options_builder() {
        let opts = TtsOptions::new().with_voice("bf_emma").with_speed(1.2);
        assert_eq!(opts.voice, "bf_emma");
        assert_eq!(opts.speed, 1.2);
    }

    #[test]
    fn test_tts_options_clamping() {
        assert_eq!(TtsOptions::new().with_speed(10.0).speed, 2.0);
        assert_eq!(TtsOptions::new().with_speed(0.0).speed, 0.5);
    }

    #[test]
    fn test_batch_runs_in_ordinal_order_and_continues() {
        let backend = RecordingBackend {
            calls: RefCell::new(Vec::new()),
        };
        let files = vec![
            PathBuf::from("03_Three.txt"),
            PathBuf::from("01_One.txt"),
            PathBuf::from("02_bad.txt"),
        ];

        let mut seen = 0;
        let results = convert_batch(&backend, &files, &TtsOptions::default(), |_| seen += 1);

        assert_eq!(seen, 3);
        assert_eq!(
            *backend.calls.borrow(),
            vec![
                PathBuf::from("01_One.txt"),
                PathBuf::from("02_bad.txt"),
                PathBuf::from("03_Three.txt"),
            ]
        );
        assert!(results[0].success);
        assert!(!results[1].success);
        assert_eq!(results[1].diagnostic.as_deref(), Some("boom"));
        assert!(results[2].success);
    }
}
