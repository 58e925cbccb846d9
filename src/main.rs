use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use tableplot::csv_reader;
use tableplot::{RenderOptions, Session};

#[derive(Parser, Debug)]
#[command(name = "tableplot")]
#[command(about = "Render charts from tabular data as JPEG images", long_about = None)]
struct Args {
    /// Chart request as inline JSON (e.g. '{"plot_type": "line", "x_data": "x", "y_data": "y"}')
    /// or @path to a JSON file
    request: Option<String>,

    /// Data file (.csv, .tsv, .json, .xls or .xlsx); CSV is read from stdin when omitted
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Write the JPEG here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the column names of the data and exit
    #[arg(long)]
    columns: bool,

    /// JSON file with render options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Override the options' dots per inch
    #[arg(long)]
    dpi: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            serde_json::from_str::<RenderOptions>(&text).context("Failed to parse options")?
        }
        None => RenderOptions::default(),
    };
    if let Some(dpi) = args.dpi {
        options.dpi = dpi;
    }

    let mut session = Session::new(options);
    let columns = match &args.data {
        Some(path) => {
            let name = path.to_string_lossy();
            let file = File::open(path)
                .with_context(|| format!("Failed to open data file {}", path.display()))?;
            session
                .ingest_upload(&name, io::BufReader::new(file))
                .context("Failed to load data")?
        }
        None => {
            let table = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
            session.ingest_table(table)
        }
    };

    if args.columns {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for column in columns {
            writeln!(handle, "{}", column).context("Failed to write columns")?;
        }
        return Ok(());
    }

    let Some(raw) = args.request.as_deref() else {
        bail!("A chart request is required unless --columns is given");
    };
    let request_text = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path))?,
        None => raw.to_string(),
    };
    let request: serde_json::Value =
        serde_json::from_str(&request_text).context("Failed to parse chart request")?;

    let image = session.render(&request).context("Failed to render plot")?;

    match &args.output {
        Some(path) => fs::write(path, image.bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(image.bytes())
                .context("Failed to write JPEG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
