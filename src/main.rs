use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tunesight::runtime::render_page;
use tunesight::{DashboardConfig, LayoutMode, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "tunesight")]
#[command(
    about = "Render the music insights dashboard from a directory of CSV tables",
    long_about = None
)]
struct Args {
    /// Directory holding the ten `<name>.csv` tables
    #[arg(default_value = ".")]
    data_dir: PathBuf,

    /// HTML output file, or `-` for stdout
    #[arg(short, long, default_value = "dashboard.html")]
    output: PathBuf,

    /// JSON config file (title, description, layout, render options)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Chart image format embedded in the page
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    #[arg(long)]
    title: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Columns,
    Stacked,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Svg,
    Png,
}

impl Args {
    /// Defaults, then the config file, then flags
    fn dashboard_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(layout) = self.layout {
            config.layout = match layout {
                LayoutArg::Columns => LayoutMode::Columns,
                LayoutArg::Stacked => LayoutMode::Stacked,
            };
        }
        if let Some(format) = self.format {
            config.render.format = match format {
                FormatArg::Svg => OutputFormat::Svg,
                FormatArg::Png => OutputFormat::Png,
            };
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("TUNESIGHT_LOG", "warn,tunesight=info"))
        .init();

    let args = Args::parse();
    let config = args.dashboard_config()?;

    let (html, summary) = render_page(&config, &args.data_dir);
    if !summary.failed.is_empty() {
        log::warn!("{} of {} panels could not be rendered", summary.failed.len(), summary.total());
    }

    if args.output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(html.as_bytes())
            .context("Failed to write HTML to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    } else {
        std::fs::write(&args.output, html)
            .with_context(|| format!("Failed to write '{}'", args.output.display()))?;
        log::info!("Wrote {}", args.output.display());
    }

    Ok(())
}
