use anyhow::{bail, Context, Result};
use clap::Parser;
use lottie_prep::{ExpressionMode, PlayerConfig, PlayerOptions, PrepError, PrepOptions, Renderer};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// File extensions picked up when the input is a directory
const ANIMATION_EXTENSIONS: [&str; 3] = ["json", "lottie", "tgs"];

/// Suffix of files written in directory mode
const PREPARED_SUFFIX: &str = "prepared.json";

#[derive(Parser)]
#[command(name = "lottie-prep")]
#[command(version, about = "Prepare Lottie animations for web playback")]
#[command(long_about = "Prepare Lottie animations for web playback\n\n\
    Cyclic loopOut time-remap expressions are expanded into keyframes, and by\n\
    default every other expression is removed. JSON output is pretty-printed\n\
    by default with indentation.\n\n\
    For a single animation (.json, .tgs or .lottie):\n  \
    lottie-prep input.lottie [-o output.json] [--player] [--compact] [-v]\n\n\
    For a directory (writes e.g. spin.lottie.prepared.json next to spin.lottie):\n  \
    lottie-prep animations/ [--mode cycle-only] [-v]")]
struct Cli {
    /// Input animation file, or a directory of animations
    input: PathBuf,

    /// Output JSON file path (default: stdout) - Cannot be used with a directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compact JSON output (default is pretty-printed with indentation)
    #[arg(long)]
    compact: bool,

    /// Verbose output for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Which expressions to remove
    #[arg(long, value_enum, default_value_t = ExpressionMode::StripAll)]
    mode: ExpressionMode,

    /// Animation id to extract from a .lottie archive (default: first in manifest)
    #[arg(long)]
    animation: Option<String>,

    /// List the animations inside a .lottie archive and exit
    #[arg(long)]
    list: bool,

    /// Keep .lottie image references instead of embedding them as data URIs
    #[arg(long)]
    no_inline_images: bool,

    /// Emit a loadAnimation parameter object instead of the bare animation
    #[arg(long)]
    player: bool,

    /// Renderer requested in the player object
    #[arg(long, value_enum, default_value_t = Renderer::Svg)]
    renderer: Renderer,

    /// Disable looping in the player object
    #[arg(long)]
    no_loop: bool,

    /// Disable autoplay in the player object
    #[arg(long)]
    no_autoplay: bool,
}

impl Cli {
    fn prep_options(&self) -> PrepOptions {
        PrepOptions {
            mode: self.mode,
            animation_id: self.animation.clone(),
            inline_images: !self.no_inline_images,
        }
    }

    fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            renderer: self.renderer,
            loop_playback: !self.no_loop,
            autoplay: !self.no_autoplay,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.input.is_dir() {
        if cli.output.is_some() {
            bail!("Cannot use -o/--output flag with an input directory");
        }
        if cli.animation.is_some() || cli.list {
            bail!("--animation and --list apply to a single .lottie file, not a directory");
        }
        return handle_directory_mode(&cli);
    }

    debug!(input = %cli.input.display(), "reading input file");

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("Failed to read input file: {}", cli.input.display()))?;

    debug!(size = bytes.len(), "input file read");

    if cli.list {
        if !lottie_prep::parser::is_zip_container(&bytes) {
            bail!("--list requires a .lottie archive: {}", cli.input.display());
        }
        let ids = lottie_prep::parser::list_animations(&bytes)
            .context("Failed to read .lottie archive")?;
        for id in ids {
            println!("{}", id);
        }
        return Ok(());
    }

    let output = render_output(&cli, &bytes)
        .with_context(|| format!("Failed to prepare animation: {}", cli.input.display()))?;

    match cli.output.as_ref() {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(output = %path.display(), "done");
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "lottie_prep=debug"
    } else {
        "lottie_prep=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Prepare one animation and format it as JSON text
fn render_output(cli: &Cli, bytes: &[u8]) -> Result<String> {
    let prepared = lottie_prep::prepare(bytes, &cli.prep_options())?;

    debug!(
        expanded = prepared.report.expanded_layers,
        skipped = prepared.report.skipped_layers,
        stripped = prepared.report.stripped_expressions,
        "transformation report"
    );

    let json = if cli.player {
        serde_json::to_value(PlayerConfig::new(prepared.document, &cli.player_options()))?
    } else {
        prepared.document
    };

    // Format output (pretty by default, compact if flag is set)
    let output = if cli.compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };

    Ok(output)
}

/// Handle directory mode: prepare every animation found under the directory
fn handle_directory_mode(cli: &Cli) -> Result<()> {
    let files = find_animation_files(&cli.input)?;

    if files.is_empty() {
        bail!("No animation files found in {}", cli.input.display());
    }

    let file_count = files.len();
    info!(count = file_count, dir = %cli.input.display(), "preparing animations");

    let mut skipped = 0;
    for path in files {
        let relative_path = path.strip_prefix(&cli.input).unwrap_or(&path);
        debug!(file = %relative_path.display(), "preparing");

        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read animation file: {}", path.display()))?;

        let output = match render_output(cli, &bytes) {
            Ok(output) => output,
            Err(err) if matches!(err.downcast_ref::<PrepError>(), Some(PrepError::NotAnAnimation(_))) => {
                warn!(file = %relative_path.display(), "{}, skipping", err);
                skipped += 1;
                continue;
            }
            Err(err) => {
                return Err(err.context(format!("Failed to prepare: {}", path.display())));
            }
        };

        let output_path = prepared_output_path(&path);
        fs::write(&output_path, output)
            .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

        info!(
            output = %output_path.strip_prefix(&cli.input).unwrap_or(&output_path).display(),
            "written"
        );
    }

    info!(count = file_count - skipped, skipped, "done");
    Ok(())
}

/// Output path for a prepared file: the source name plus `.prepared.json`
///
/// The source extension is kept so `spin.json`, `spin.lottie` and `spin.tgs`
/// in one directory don't overwrite each other's output.
fn prepared_output_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(PREPARED_SUFFIX);
    path.with_file_name(name)
}

/// Recursively find all animation files in a directory, skipping earlier outputs
fn find_animation_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    fn visit_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let path = entry?.path();

            if path.is_dir() {
                visit_dir(&path, files)?;
            } else if is_animation_file(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    visit_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn is_animation_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
        return false;
    };
    if name.ends_with(&format!(".{}", PREPARED_SUFFIX)) {
        return false;
    }

    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ANIMATION_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
