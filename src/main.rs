use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use flume::Sender;
use tracing::{debug, warn};

use rowfit::{
    CssSink, FileScanner, GalleryApp, JsonSink, JustifiedLayout, LayoutSink, ScanConfig, TextSink,
    Trigger,
};

#[derive(Parser, Debug)]
#[command(name = "rowfit", version, about = "Lay out image thumbnails in justified rows")]
struct Cli {
    /// Directory of images.
    dir: PathBuf,

    /// Container width in pixels. The first is the initial load, each further
    /// one is a resize.
    #[arg(long = "width", default_value = "1280")]
    widths: Vec<f64>,

    /// Also read one width per line from stdin, each as a resize.
    #[arg(long)]
    stdin: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// CSS selector for thumbnail list items (css format only).
    #[arg(long, default_value = rowfit::output::DEFAULT_ITEM_SELECTOR)]
    selector: String,

    /// Only scan the top level of the directory.
    #[arg(long)]
    no_recursive: bool,

    /// Maximum directory depth (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    max_depth: usize,

    /// Follow symbolic links while scanning.
    #[arg(long)]
    follow_symlinks: bool,

    /// Keep files whose dimensions cannot be read; layout then fails on them.
    #[arg(long)]
    keep_broken: bool,

    /// Row height before rows are scaled to fit.
    #[arg(long, default_value_t = 180.0)]
    row_height: f64,

    /// Space reserved per gap, including the row edges.
    #[arg(long, default_value_t = 20.0)]
    gutter: f64,

    /// Subtracted from each rendered width to size its caption.
    #[arg(long, default_value_t = 32.0)]
    caption_padding: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Css,
    Json,
}

fn spawn_stdin_reader(tx: Sender<Trigger>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<f64>() {
                Ok(width) => {
                    if tx.send(Trigger::Resize { width }).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Ignoring width {:?}: {}", line, e),
            }
        }
        debug!("stdin closed");
    });
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rowfit=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    if !cli.dir.is_dir() {
        bail!("Not a directory: {}", cli.dir.display());
    }

    let config = ScanConfig {
        recursive: !cli.no_recursive,
        max_depth: cli.max_depth,
        follow_symlinks: cli.follow_symlinks,
        skip_broken: !cli.keep_broken,
        ..Default::default()
    };
    let layout = JustifiedLayout::new(cli.row_height, cli.gutter, cli.caption_padding);
    let mut app = GalleryApp::new(&cli.dir, FileScanner::with_config(config), layout);

    let (tx, rx) = flume::unbounded();
    let mut widths = cli.widths.iter().copied();
    if let Some(width) = widths.next() {
        tx.send(Trigger::Load { width })?;
    }
    for width in widths {
        tx.send(Trigger::Resize { width })?;
    }
    if cli.stdin {
        spawn_stdin_reader(tx);
    } else {
        drop(tx);
    }

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn LayoutSink> = match cli.format {
        Format::Text => Box::new(TextSink::new(stdout)),
        Format::Css => Box::new(CssSink::with_selector(stdout, cli.selector)),
        Format::Json => Box::new(JsonSink::new(stdout)),
    };

    let stats = app.run(&rx, sink.as_mut())?;
    if stats.passes == 0 && stats.failures > 0 {
        bail!("no layout could be produced ({} failures)", stats.failures);
    }
    Ok(())
}
