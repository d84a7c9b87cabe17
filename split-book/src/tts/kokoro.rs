//! Kokoro TTS backend driven through its Python command-line streamer.

use super::{Conversion, TtsBackend, TtsOptions};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

const STREAMER_MODULE: &str = "kokoro_tts_cli.streamer";

/// Runs `python -m kokoro_tts_cli.streamer`, feeding section text on stdin.
pub struct KokoroBackend {
    python: String,
    output_dir: PathBuf,
}

impl KokoroBackend {
    pub fn new(python: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Build the streamer command for one output file.
    fn command(&self, output: &Path, options: &TtsOptions) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.args(["-m", STREAMER_MODULE, "--voice"])
            .arg(&options.voice)
            .arg("--speed")
            .arg(options.speed.to_string())
            .arg("--save")
            .arg(output)
            .args(["--no-play", "--batch"]);
        cmd
    }

    fn run(&self, text: &str, output: &Path, options: &TtsOptions) -> Result<(), String> {
        let mut child = self
            .command(output, options)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Failed to run {}: {}", self.python, e))?;

        // stdin is written on its own thread while stderr drains here
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|e| format!("Failed to wait for TTS: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                return Err(format!("TTS exited with {}", output.status));
            }
            return Err(stderr.to_string());
        }

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                return Err("TTS exited before reading all of the text".to_string());
            }
            Ok(Err(e)) => return Err(format!("Failed to send text to TTS: {}", e)),
            Err(_) => return Err("TTS input writer panicked".to_string()),
        }

        Ok(())
    }
}

impl TtsBackend for KokoroBackend {
    fn convert(&self, input: &Path, options: &TtsOptions) -> Conversion {
        let output = self.output_path(input);

        if !input.exists() {
            return Conversion::failed(
                input,
                output,
                format!("Input file not found: {}", input.display()),
            );
        }

        let text = match fs::read_to_string(input) {
            Ok(text) => text,
            Err(e) => {
                return Conversion::failed(input, output, format!("Failed to read input: {}", e));
            }
        };

        if let Err(e) = fs::create_dir_all(&self.output_dir) {
            return Conversion::failed(
                input,
                output,
                format!("Failed to create output directory: {}", e),
            );
        }

        log::debug!(
            "Converting {} (voice {}, speed {}x)",
            input.display(),
            options.voice,
            options.speed
        );

        let started = Instant::now();
        let result = self.run(&text, &output, options);
        let elapsed = started.elapsed();

        match result {
            Ok(()) => Conversion {
                input: input.to_path_buf(),
                output,
                success: true,
                diagnostic: None,
                elapsed,
            },
            Err(diagnostic) => Conversion {
                elapsed,
                ..Conversion::failed(input, output, diagnostic)
            },
        }
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default();
        self.output_dir.join(format!("{}.wav", stem.to_string_lossy()))
    }

    fn name(&self) -> &str {
        "kokoro"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path() {
        let backend = KokoroBackend::new("python", "audio_output");
        assert_eq!(
            backend.output_path(Path::new("chapters/03_Hypnosis.txt")),
            PathBuf::from("audio_output/03_Hypnosis.wav")
        );
    }

    #[test]
    fn test_command_arguments() {
        let backend = KokoroBackend::new("python3", "audio_output");
        let options = TtsOptions::new().with_voice("bm_george").with_speed(1.5);
        let cmd = backend.command(Path::new("audio_output/01_Preface.wav"), &options);

        assert_eq!(cmd.get_program(), "python3");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-m",
                "kokoro_tts_cli.streamer",
                "--voice",
                "bm_george",
                "--speed",
                "1.5",
                "--save",
                "audio_output/01_Preface.wav",
                "--no-play",
                "--batch",
            ]
        );
    }

    #[test]
    fn test_missing_input_fails_without_running() {
        let temp_dir = TempDir::new().unwrap();
        let backend = KokoroBackend::new("definitely-not-a-python", temp_dir.path());

        let missing = temp_dir.path().join("missing.txt");
        let conversion = backend.convert(&missing, &TtsOptions::default());
        assert!(!conversion.success);
        assert!(conversion.diagnostic.unwrap().contains("not found"));
    }

    #[test]
    fn test_unavailable_interpreter_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("01_Preface.txt");
        fs::write(&input, "Preface\n\nSome words.").unwrap();

        let audio_dir = temp_dir.path().join("audio");
        let backend = KokoroBackend::new("definitely-not-a-python", audio_dir);
        let conversion = backend.convert(&input, &TtsOptions::default());
        assert!(!conversion.success);
        assert!(conversion.diagnostic.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_reports_tool_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("01_Long.txt");
        fs::write(&input, "word ".repeat(200_000)).unwrap();

        // `sh` cannot open the module name as a script, so it exits at once
        // without reading stdin and complains on stderr.
        let backend = KokoroBackend::new("sh", temp_dir.path().join("audio"));
        let conversion = backend.convert(&input, &TtsOptions::default());

        assert!(!conversion.success);
        let diagnostic = conversion.diagnostic.unwrap();
        assert!(diagnostic.contains("kokoro_tts_cli.streamer"), "{diagnostic}");
        assert!(!diagnostic.contains("Broken pipe"), "{diagnostic}");
    }
}
