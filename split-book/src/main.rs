//! split-book - Split plain-text books into one file per chapter or section

mod config;
mod detect;
mod document;
mod error;
mod report;
mod segment;
mod splitter;
mod tts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::SplitConfig;
use detect::OrderingPolicy;
use document::Document;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tts::TtsBackend;

/// Characters of the document shown by `analyze`.
const PREVIEW_CHARS: usize = 1000;

#[derive(Parser, Debug)]
#[command(name = "split-book")]
#[command(
    about = "Split a plain-text book into one file per chapter or section",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Path to the text document
    input: Option<PathBuf>,

    /// Output directory for section files (default: chapters)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File listing the expected section titles, one per line, in reading order
    /// (lines that are `#` or start with `# ` are comments)
    #[arg(long)]
    titles: Option<PathBuf>,

    /// Expected section title (repeatable, appended after --titles)
    #[arg(short, long = "title")]
    title: Vec<String>,

    /// Skip this many lines before matching titles (e.g. 100 to step over a table of contents)
    #[arg(long)]
    scan_offset: Option<usize>,

    /// Drop sections with fewer words than this
    #[arg(long)]
    min_words: Option<usize>,

    /// Order titled sections by position in the text instead of title-list order
    #[arg(long)]
    positional: bool,

    /// Characters per page for page chunking (0 disables)
    #[arg(long)]
    page_chars: Option<usize>,

    /// Paragraphs per part for paragraph chunking (0 disables)
    #[arg(long)]
    paragraph_group: Option<usize>,

    /// Extension for section files
    #[arg(long)]
    ext: Option<String>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show detected structure without writing anything
    Analyze {
        /// Path to the text document
        input: PathBuf,
    },
    /// Convert section files to audio
    Speak {
        /// Section files, or directories of section files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Voice to use (e.g. af_bella, bf_emma, bm_george)
        #[arg(long)]
        voice: Option<String>,

        /// Speech speed multiplier (0.5-2.0)
        #[arg(long)]
        speed: Option<f32>,

        /// Output directory for audio files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default output directory
    SetOutputDir {
        /// Directory path
        path: PathBuf,
    },
    /// Set default scan offset
    SetScanOffset {
        /// Number of lines
        lines: usize,
    },
    /// Set default minimum section length
    SetMinWords {
        /// Word count
        words: usize,
    },
    /// Set default TTS voice
    SetVoice {
        /// Voice identifier
        voice: String,
    },
    /// Set default TTS speed
    SetSpeed {
        /// Value (0.5-2.0)
        value: f32,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => SplitConfig::config_path()?,
    };

    match &args.command {
        Some(Commands::Config { action }) => return handle_config_command(action, &config_path),
        Some(Commands::Analyze { input }) => {
            let config = load_config(&config_path, &args)?;
            return analyze(input, &config.detect_options());
        }
        Some(Commands::Speak {
            inputs,
            voice,
            speed,
            output,
        }) => {
            let config = load_config(&config_path, &args)?;
            return speak(&config, inputs, voice.as_deref(), *speed, output.as_deref());
        }
        None => {}
    }

    let input = args.input.clone().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Run 'split-book --help' for usage.")
    })?;

    let config = load_config(&config_path, &args)?;

    let from_file = match &args.titles {
        Some(path) => detect::titles::load_titles(path)?,
        None => Vec::new(),
    };
    let known_titles = detect::titles::merge_titles(from_file, &args.title);

    if args.debug {
        log::debug!("Config: {:?}", config_path);
        log::debug!("Output: {}", config.output_directory.display());
        log::debug!("Known titles: {}", known_titles.len());
        log::debug!("Scan offset: {}", config.scan_offset_lines);
        log::debug!("Ordering: {:?}", config.ordering);
    }

    let document = document::read_document(&input)?;
    log::info!("Splitting '{}' into sections...", input.display());

    let options = config.split_options();
    let mut report = match splitter::split_book(&document, &known_titles, &options) {
        Ok(report) => report,
        Err(error::SplitError::WriteFailure {
            path,
            written,
            total,
            source,
        }) => {
            anyhow::bail!(
                "Run incomplete: {} of {} sections written before failing on {}: {}",
                written,
                total,
                path.display(),
                source
            );
        }
        Err(e) => return Err(e.into()),
    };
    report.input = Some(input.clone());

    println!("{}", report.summary());
    println!(
        "Split complete! Created {} section files in '{}'.",
        report.section_count(),
        config.output_directory.display()
    );

    if let Some(path) = &args.report {
        report.save_json(path)?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}

fn load_config(path: &Path, args: &Args) -> Result<SplitConfig> {
    let config = SplitConfig::load_from(path).context("Failed to load configuration")?;
    Ok(apply_overrides(config, args))
}

/// Layer command-line flags over the loaded configuration.
fn apply_overrides(mut config: SplitConfig, args: &Args) -> SplitConfig {
    if let Some(output) = &args.output {
        config.output_directory = output.clone();
    }
    if let Some(offset) = args.scan_offset {
        config.scan_offset_lines = offset;
    }
    if let Some(words) = args.min_words {
        config.min_section_words = words;
    }
    if args.positional {
        config.ordering = OrderingPolicy::Positional;
    }
    if let Some(chars) = args.page_chars {
        config.page_chunk_chars = chars;
    }
    if let Some(group) = args.paragraph_group {
        config.paragraph_group_size = group;
    }
    if let Some(ext) = &args.ext {
        config.extension = ext.trim_start_matches('.').to_string();
    }
    config
}

/// Print document statistics, pattern matches and the strategy that would be used.
fn analyze(input: &Path, options: &detect::DetectOptions) -> Result<()> {
    let document = document::read_document(input)?;

    println!("Document: {}", input.display());
    println!(
        "Size: {} characters, {} words, {} lines",
        document.char_count(),
        document.word_count(),
        document.line_count()
    );
    println!();
    println!("Chapter patterns:");
    for survey in detect::survey(&document) {
        let marker = if survey.qualifies() { "*" } else { " " };
        println!(
            " {} {:<14} {:>4} headings, {:>4} fragments",
            marker, survey.name, survey.matches, survey.fragments
        );
        if !survey.examples.is_empty() {
            println!("     e.g. {}", survey.examples.join(" | "));
        }
    }
    println!();

    match detect::detect(&document, &[], options) {
        Ok(detection) => println!(
            "Would use: {} ({}), {} markers",
            detection.strategy,
            detection.detail,
            detection.markers.len()
        ),
        Err(e) => println!("No strategy applies: {}", e),
    }

    println!();
    println!("Preview:");
    println!("{}", preview(&document));

    Ok(())
}

fn preview(document: &Document) -> String {
    document.text().chars().take(PREVIEW_CHARS).collect()
}

/// Convert section files to audio, one at a time in ordinal order.
fn speak(
    config: &SplitConfig,
    inputs: &[PathBuf],
    voice: Option<&str>,
    speed: Option<f32>,
    output: Option<&Path>,
) -> Result<()> {
    let files = collect_section_files(inputs, &config.extension)?;
    if files.is_empty() {
        anyhow::bail!("No section files found");
    }

    let mut options = config.tts_options();
    if let Some(voice) = voice {
        options = options.with_voice(voice);
    }
    if let Some(speed) = speed {
        options = options.with_speed(speed);
    }

    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.audio_directory.clone());
    let backend = tts::kokoro::KokoroBackend::new(config.python.clone(), output_dir);

    log::info!(
        "Converting {} files with {} (voice {}, speed {}x)",
        files.len(),
        backend.name(),
        options.voice,
        options.speed
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let results = tts::convert_batch(&backend, &files, &options, |conversion| {
        pb.inc(1);
        let name = conversion
            .input
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if conversion.success {
            log::debug!("Saved {}", conversion.output.display());
            pb.set_message(name);
        } else {
            pb.println(format!(
                "Failed: {}\n{}",
                name,
                conversion.diagnostic.as_deref().unwrap_or("Unknown error")
            ));
        }
    });

    pb.finish_with_message("done");

    let failed = results.iter().filter(|c| !c.success).count();
    let seconds: f64 = results.iter().map(|c| c.elapsed.as_secs_f64()).sum();
    println!(
        "Completed: {}, Failed: {} ({:.1} minutes)",
        results.len() - failed,
        failed,
        seconds / 60.0
    );

    if failed > 0 {
        anyhow::bail!("{} of {} conversions failed", failed, results.len());
    }
    Ok(())
}

/// Expand directories into their section files; plain files pass through.
fn collect_section_files(inputs: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory: {}", input.display()))?
            {
                let path = entry.context("Failed to read directory entry")?.path();
                let matches_ext = path
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case(extension))
                    .unwrap_or(false);
                if path.is_file() && matches_ext {
                    files.push(path);
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    Ok(files)
}

fn handle_config_command(action: &ConfigAction, path: &Path) -> Result<()> {
    let mut config = SplitConfig::load_from(path)?;
    match action {
        ConfigAction::Show => {
            println!("Configuration file: {:?}", path);
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
        ConfigAction::SetOutputDir { path: dir } => {
            config.output_directory = dir.clone();
            println!("Default output directory set to: {}", dir.display());
        }
        ConfigAction::SetScanOffset { lines } => {
            config.scan_offset_lines = *lines;
            println!("Default scan offset set to: {} lines", lines);
        }
        ConfigAction::SetMinWords { words } => {
            config.min_section_words = *words;
            println!("Default minimum section length set to: {} words", words);
        }
        ConfigAction::SetVoice { voice } => {
            config.voice = voice.clone();
            println!("Default voice set to: {}", voice);
        }
        ConfigAction::SetSpeed { value } => {
            config.speed = value.clamp(0.5, 2.0);
            println!("Default speed set to: {}", config.speed);
        }
    }
    config.save_to(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_split_flags() {
        let args = Args::parse_from([
            "split-book",
            "book.txt",
            "--titles",
            "toc.txt",
            "-t",
            "Afterword",
            "--scan-offset",
            "100",
            "--positional",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("book.txt")));
        assert_eq!(args.title, vec!["Afterword".to_string()]);
        assert_eq!(args.scan_offset, Some(100));
        assert!(args.positional);
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::parse_from([
            "split-book",
            "book.txt",
            "-o",
            "out",
            "--min-words",
            "20",
            "--ext",
            ".md",
        ]);
        let config = apply_overrides(SplitConfig::default(), &args);
        assert_eq!(config.output_directory, PathBuf::from("out"));
        assert_eq!(config.min_section_words, 20);
        assert_eq!(config.extension, "md");
        assert_eq!(config.ordering, OrderingPolicy::Canonical);
        assert_eq!(config.scan_offset_lines, 0);
    }

    #[test]
    fn test_analyze_uses_configured_detection() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("split-book.toml");
        fs::write(&path, "scan_offset_lines = 40\npage_chunk_chars = 0\n").unwrap();

        let args = Args::parse_from(["split-book", "analyze", "book.txt"]);
        assert!(matches!(args.command, Some(Commands::Analyze { .. })));

        let options = load_config(&path, &args).unwrap().detect_options();
        assert_eq!(options.scan_offset_lines, 40);
        assert_eq!(options.page_chunk_chars, 0);
    }

    #[test]
    fn test_collect_section_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("02_Two.txt"), "two").unwrap();
        fs::write(temp_dir.path().join("01_One.txt"), "one").unwrap();
        fs::write(temp_dir.path().join("notes.json"), "{}").unwrap();

        let files = collect_section_files(&[temp_dir.path().to_path_buf()], "txt").unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["01_One.txt", "02_Two.txt"]);
    }

    #[test]
    fn test_config_command_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("split-book.toml");

        handle_config_command(&ConfigAction::SetScanOffset { lines: 100 }, &path).unwrap();
        handle_config_command(&ConfigAction::SetSpeed { value: 9.0 }, &path).unwrap();

        let config = SplitConfig::load_from(&path).unwrap();
        assert_eq!(config.scan_offset_lines, 100);
        assert_eq!(config.speed, 2.0);
    }
}
