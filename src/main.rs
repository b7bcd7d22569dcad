// Entry point and high-level CLI flow.
//
// - `serve` (the default) loads the call log and answers dashboard queries
//   over HTTP until interrupted.
// - `report` runs one recomputation and prints the eight charts as Markdown
//   tables, optionally exporting CSV/JSON files.
// - `options` lists the month and region filter choices.
use anyhow::Context;
use clap::{Parser, Subcommand};
use cob_dashboard::config::{self, Config};
use cob_dashboard::dashboard::{recompute, DashboardQuery, Theme};
use cob_dashboard::filter::Selection;
use cob_dashboard::loader::{self, RecordStore};
use cob_dashboard::util::format_int;
use cob_dashboard::{logging, output, server};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Call-center dashboard for COB dispatch call logs
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// CSV call log (overrides COB_DASHBOARD_DATA)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the dashboard API
    Serve {
        /// Listen address (overrides COB_DASHBOARD_ADDR)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the eight charts for one filter selection
    Report {
        /// Comma-separated month numbers, or `all` (default: every month in the data)
        #[arg(long)]
        months: Option<String>,
        /// Comma-separated COB codes, or `all` (default: every region)
        #[arg(long)]
        regions: Option<String>,
        /// Rows to preview per chart
        #[arg(long, default_value_t = 10)]
        rows: usize,
        /// Directory to write chart CSVs and dashboard.json into
        #[arg(long)]
        export: Option<PathBuf>,
        /// Use the dark template
        #[arg(long)]
        dark: bool,
        /// Hide chart legends
        #[arg(long)]
        hide_legend: bool,
    },
    /// List the month and region filter options
    Options,
}

fn load_store(cfg: &Config) -> anyhow::Result<RecordStore> {
    loader::load(&cfg.data_path)
        .with_context(|| format!("failed to load call log {}", cfg.data_path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::from_env()?;
    if let Some(data) = cli.data {
        cfg.data_path = data;
    }
    logging::init(cfg.log_level);

    match cli.command.unwrap_or(Command::Serve { addr: None }) {
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                cfg.addr = config::parse_addr(&addr)?;
            }
            // The store must be complete before the first request is accepted.
            let store = load_store(&cfg)?;
            server::serve(cfg.addr, Arc::new(store)).await?;
        }
        Command::Report {
            months,
            regions,
            rows,
            export,
            dark,
            hide_legend,
        } => {
            let store = load_store(&cfg)?;
            let initial = DashboardQuery::initial(&store);
            let query = DashboardQuery {
                months: match months {
                    Some(s) => Selection::parse_list(&s)?,
                    None => initial.months,
                },
                regions: match regions {
                    Some(s) => Selection::parse_list(&s)?,
                    None => initial.regions,
                },
                theme: if dark { Theme::Dark } else { Theme::Light },
                show_legend: !hide_legend,
            };
            let dashboard = recompute(&store, &query);
            println!(
                "Filtered calls: {} of {}\n",
                format_int(dashboard.filtered_calls),
                format_int(store.len())
            );
            println!("{}", output::render_dashboard(&dashboard, rows));
            if let Some(dir) = export {
                let files = output::export_dashboard(&dir, &dashboard)?;
                info!("exported {} files to {}", files.len(), dir.display());
                for f in files {
                    println!("(exported {})", f.display());
                }
            }
        }
        Command::Options => {
            let store = load_store(&cfg)?;
            println!("Months\n\n{}\n", output::render_rows(store.month_options(), usize::MAX));
            println!("Regions\n\n{}", output::render_rows(store.region_options(), usize::MAX));
        }
    }
    Ok(())
}
