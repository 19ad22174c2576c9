use clap::{Parser, Subcommand};
use epaper_frame::config;
use epaper_frame::imaging::RustBackend;
use epaper_frame::output;
use epaper_frame::session::{Session, collect_image_paths};
use epaper_frame::types::FrameDate;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "epaper-frame")]
#[command(about = "Prepare photos for an 800x480 e-paper picture frame")]
#[command(long_about = "\
Prepare photos for an 800x480 e-paper picture frame

Load photos, pan/zoom/rotate each one to fill the frame, pin photos to the
day they should appear, then export one BMP per day.

Edit state is kept in backup.json next to the photos and rewritten after
every change, so each command picks up where the last one left off:

  epaper-frame load ~/photos
  epaper-frame --folder ~/photos list
  epaper-frame --folder ~/photos set-date 1 05.06.2024
  epaper-frame --folder ~/photos zoom 1 0.2
  epaper-frame --folder ~/photos export /media/frame --start 04.06.2024

Dates use the frame's notation: dd.mm.yyyy. Indices are the numbers shown
by 'list', starting at 000. Positive rotation is counter-clockwise.

Exported files are named NNN_dd.mm.yyyy_name.bmp. Undated photos fill the
days between pinned ones in random order; --seed makes that order
repeatable. info.txt is written last with the completion time.

Run 'epaper-frame gen-config' to generate a documented epaper-frame.toml.")]
#[command(version)]
struct Cli {
    /// Folder holding the photos and backup.json
    #[arg(long, default_value = ".", global = true)]
    folder: PathBuf,

    /// Log debug details to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a session with these photos (files or directories)
    ///
    /// Photos loaded before keep their saved edits; photos not named here
    /// leave the session.
    Load {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List loaded photos with their dates and transforms
    List,
    /// Pin a photo to a day (dd.mm.yyyy)
    SetDate { index: usize, date: FrameDate },
    /// Unpin a photo
    ClearDate { index: usize },
    /// Move the visible window by DX, DY pixels
    Pan {
        index: usize,
        #[arg(allow_hyphen_values = true)]
        dx: f64,
        #[arg(allow_hyphen_values = true)]
        dy: f64,
    },
    /// Change the zoom by DELTA (e.g. 0.1 or -0.1)
    Zoom {
        index: usize,
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },
    /// Rotate by DEGREES, counter-clockwise
    Rotate {
        index: usize,
        #[arg(allow_hyphen_values = true)]
        degrees: i32,
    },
    /// Undo pan, zoom, and rotation
    Reset { index: usize },
    /// Remove one photo from the session
    Delete { index: usize },
    /// Remove every photo from the session
    DeleteAll,
    /// Render a photo exactly as the frame will show it
    Preview { index: usize, out: PathBuf },
    /// Write one BMP per day into DEST, plus info.txt
    Export {
        dest: PathBuf,
        /// Day of the first frame (dd.mm.yyyy)
        #[arg(long)]
        start: FrameDate,
        /// Seed for the order of undated photos
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a stock epaper-frame.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Load { paths } => {
            let target = load_target(&paths, &cli.folder)?;
            let config = config::load_config(&target)?;
            let paths = collect_image_paths(&paths, &config)?;
            if paths.is_empty() {
                println!("No supported images found");
                return Ok(());
            }
            // Start empty so the backup is merged by file name
            let mut session = Session::new(RustBackend::new(), config);
            let summary = session.load(&paths)?;
            output::print_load_summary(&summary, session.folder());
        }
        Command::List => {
            let session = open_session(&cli.folder)?;
            output::print_record_list(session.records(), session.selected());
        }
        Command::SetDate { index, date } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            session.set_date(date)?;
        }
        Command::ClearDate { index } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            session.clear_date()?;
        }
        Command::Pan { index, dx, dy } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            session.pan(dx, dy)?;
        }
        Command::Zoom { index, delta } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            if !session.zoom(delta)? {
                println!(
                    "Zoom ignored: scale must stay above {}",
                    session.config().editing.min_scale
                );
            }
        }
        Command::Rotate { index, degrees } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            session.rotate(degrees)?;
        }
        Command::Reset { index } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            session.reset()?;
        }
        Command::Delete { index } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            if let Some(removed) = session.delete_selected()? {
                println!("Removed {}", removed.file_name());
            }
        }
        Command::DeleteAll => {
            let mut session = open_session(&cli.folder)?;
            session.delete_all()?;
        }
        Command::Preview { index, out } => {
            let mut session = open_session(&cli.folder)?;
            session.select(index)?;
            if let Some(frame) = session.preview()? {
                frame.save(&out)?;
                println!("Preview written to {}", out.display());
            }
        }
        Command::Export { dest, start, seed } => {
            let session = open_session(&cli.folder)?;
            let report = session.export(Some(&dest), start, seed)?;
            output::print_export_report(&report, &dest);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` applies when set; otherwise warnings only. `--verbose` forces
/// debug output for this crate.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("epaper_frame=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reopen the session saved in `folder`, with that folder's config.
fn open_session(folder: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let config = config::load_config(folder)?;
    Ok(Session::open(RustBackend::new(), config, folder)?)
}

/// Folder whose config a load uses: the first input's directory (or the
/// input itself when it is a directory).
fn load_target(paths: &[PathBuf], fallback: &Path) -> std::io::Result<PathBuf> {
    let Some(first) = paths.first() else {
        return Ok(fallback.to_path_buf());
    };
    let first = std::path::absolute(first)?;
    if first.is_dir() {
        Ok(first)
    } else {
        Ok(first
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| fallback.to_path_buf()))
    }
}
