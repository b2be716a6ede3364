// hexmap: Intel HEX space-usage map

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hexmap::constants::{DEFAULT_BYTES_PER_CELL, DEFAULT_CELLS_PER_LINE};
use hexmap::layout::{self, Glyphs, LayoutConfig};
use hexmap::memory::BuildOptions;
use hexmap::ui::App;

#[derive(Parser, Debug)]
#[command(author, version, about = "Map the used and free space of an Intel HEX image")]
struct Args {
    /// The Intel HEX file to process
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Number of bytes per character; must divide 65536 (8, 16 ... 2048 are typical)
    #[arg(short, long, default_value_t = DEFAULT_BYTES_PER_CELL)]
    density_bytes: u32,

    /// Number of characters per line
    #[arg(short, long, default_value_t = DEFAULT_CELLS_PER_LINE)]
    width_symbols: usize,

    /// Count runs of N or more 0xFF or 0x00 bytes as unset (0 = off)
    #[arg(long, default_value_t = 0)]
    explicit_undef: usize,

    /// Draw with '#' and '.' instead of block characters
    #[arg(long, default_value_t = false)]
    ascii: bool,

    /// Open a scrollable viewer instead of printing the map
    #[arg(short, long, default_value_t = false)]
    interactive: bool,

    /// Enable debug output
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.debug);

    if !Path::new(&args.file).exists() {
        eprintln!("Error: File '{}' not found", args.file.display());
        std::process::exit(1);
    }

    let text = fs::read_to_string(&args.file)?;

    let options = BuildOptions {
        erased_run: args.explicit_undef,
    };
    let outcome = hexmap::build_from_text(&text, &options);
    info!(
        segments = outcome.space.len(),
        occupied_bytes = outcome.space.occupied_bytes(),
        skipped = outcome.skipped.len(),
        "address space built"
    );

    if !outcome.skipped.is_empty() {
        eprintln!(
            "Warning: {} data record(s) crossed a segment boundary and were ignored",
            outcome.skipped.len()
        );
    }

    let config = LayoutConfig {
        bytes_per_cell: args.density_bytes,
        cells_per_line: args.width_symbols,
        glyphs: if args.ascii {
            Glyphs {
                occupied: '#',
                free: '.',
            }
        } else {
            Glyphs::default()
        },
    };

    let blocks = match layout::layout(&outcome.space, &config) {
        Ok(blocks) => blocks,
        Err(e) => {
            eprintln!("Layout error: {}", e);
            std::process::exit(1);
        }
    };

    if blocks.is_empty() {
        eprintln!("No data records found in '{}'", args.file.display());
        return Ok(());
    }

    if !args.interactive {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in layout::blocks_to_lines(&blocks, &config.glyphs) {
            writeln!(out, "{}", line)?;
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let mut app = App::new(file_name, blocks, config.glyphs, outcome.skipped.len());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
