//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;

use crate::config::{self, Settings};
use crate::models::clip;
use crate::repository::{self, Table};
use crate::server;
use crate::services::{
    detail, recompute, DatasetDetail, FilterCriteria, PageSize, SessionState, Statistics,
    YearRange,
};

#[derive(Debug, Parser)]
#[command(name = "benchex", version, about = "Browse AI benchmark and dataset metadata")]
pub struct Cli {
    /// Dataset CSV file (overrides the configured path)
    #[arg(long, global = true, env = "BENCHEX_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the web dashboard
    Serve {
        /// Address to bind
        #[arg(long, env = "BENCHEX_HOST")]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long, env = "BENCHEX_PORT")]
        port: Option<u16>,
    },
    /// Print one page of the filtered dataset list
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page (10, 20, 50 or 100)
        #[arg(long)]
        per_page: Option<usize>,
    },
    /// Print the details of one dataset
    Show {
        /// Dataset id
        dataset_id: String,
    },
    /// Print task and year counts for the filtered datasets
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Filter flags shared by `list` and `stats`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Exact task
    #[arg(long)]
    pub task: Option<String>,
    /// Exact research area
    #[arg(long)]
    pub area: Option<String>,
    /// Modality tags; a dataset matches if it has any of them
    #[arg(long = "modality", value_delimiter = ',')]
    pub modalities: Vec<String>,
    /// Earliest publication year (inclusive)
    #[arg(long)]
    pub year_from: Option<i32>,
    /// Latest publication year (inclusive)
    #[arg(long)]
    pub year_to: Option<i32>,
    /// Case-insensitive substring of the dataset id
    #[arg(short, long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        let years = match (self.year_from, self.year_to) {
            (None, None) => None,
            (from, to) => Some(YearRange::new(
                from.unwrap_or(i32::MIN),
                to.unwrap_or(i32::MAX),
            )),
        };

        FilterCriteria {
            task: FilterCriteria::choice(self.task.as_deref()),
            area: FilterCriteria::choice(self.area.as_deref()),
            modalities: FilterCriteria::modality_set(&self.modalities),
            years,
            search: FilterCriteria::search_term(self.search.as_deref()),
        }
    }
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = config::load_settings().await;
    if let Some(data) = cli.data {
        settings.data_file = data;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            server::serve(&settings, &host, port).await
        }
        Commands::List {
            filters,
            page,
            per_page,
        } => {
            if let Some(table) = load_table(&settings) {
                let session = SessionState {
                    criteria: filters.criteria(),
                    page,
                    page_size: per_page
                        .and_then(PageSize::new)
                        .unwrap_or(settings.default_page_size),
                    ..Default::default()
                };
                print_page(&table, session);
            }
            Ok(())
        }
        Commands::Show { dataset_id } => {
            if let Some(table) = load_table(&settings) {
                match detail(&table, &dataset_id) {
                    Ok(detail) => print_detail(&detail),
                    Err(e) => println!("{}", style(e).yellow()),
                }
            }
            Ok(())
        }
        Commands::Stats { filters } => {
            if let Some(table) = load_table(&settings) {
                let session = SessionState {
                    criteria: filters.criteria(),
                    ..Default::default()
                };
                let view = recompute(&table, session);
                println!(
                    "{} datasets match the current filters\n",
                    style(view.page.total_rows).bold()
                );
                print_stats(&view.stats);
            }
            Ok(())
        }
    }
}

/// Load the table, printing a warning instead of failing.
fn load_table(settings: &Settings) -> Option<Table> {
    match repository::load(&settings.data_file) {
        Ok(table) if table.is_empty() => {
            println!(
                "{}",
                style("Please place your dataset CSV file in the 'data' directory.").yellow()
            );
            None
        }
        Ok(table) => Some(table),
        Err(e) => {
            println!("{} {}", style("warning:").yellow().bold(), e);
            None
        }
    }
}

fn print_page(table: &Table, session: SessionState) {
    let view = recompute(table, session);

    println!("{}\n", style(view.summary()).bold());
    println!(
        "{:<32} {:<20} {:<16} {:>6} {:>10} {:>6}",
        style("Dataset ID").bold(),
        style("Task").bold(),
        style("Area").bold(),
        style("Year").bold(),
        style("Benchmarks").bold(),
        style("Tasks").bold()
    );
    for record in &view.rows {
        println!(
            "{:<32} {:<20} {:<16} {:>6} {:>10} {:>6}",
            clip(&record.dataset_id, 32),
            clip(record.task_label(), 20),
            clip(record.area_label(), 16),
            record.year_label(),
            record.benchmark_cnt,
            record.associated_task_cnt
        );
    }
    if view.rows.is_empty() {
        println!("{}", style("No datasets match the current filters.").dim());
    }
}

fn print_detail(detail: &DatasetDetail) {
    let record = &detail.record;

    println!("{}", style(&record.dataset_id).bold().underlined());
    println!("{}\n", detail.description_label());
    println!("Total Benchmarks:  {}", record.benchmark_cnt);
    println!("Associated Tasks:  {}\n", record.associated_task_cnt);

    for (label, value) in detail.metadata() {
        println!("{:<10} {}", style(label).cyan(), value);
    }

    let list = |items: &[String], empty: &str| {
        if items.is_empty() {
            empty.to_string()
        } else {
            items.join(", ")
        }
    };
    println!(
        "\n{:<10} {}",
        style("Modalities").cyan(),
        list(&detail.modality_list, "No modalities available")
    );
    println!(
        "{:<10} {}",
        style("Tasks").cyan(),
        list(&detail.associated_task_list, "No associated tasks available")
    );
}

fn print_stats(stats: &Statistics) {
    println!("{}", style("Tasks Distribution").bold());
    for item in &stats.task_distribution {
        println!("  {:<28} {:>5}", clip(&item.label, 28), item.count);
    }

    println!("\n{}", style("Yearly Trends").bold());
    let max = stats
        .yearly_trend
        .iter()
        .map(|y| y.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for point in &stats.yearly_trend {
        let bar = "#".repeat((point.count * 40).div_ceil(max));
        println!("  {} {:>5} {}", point.year, point.count, style(bar).blue());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::parse_from([
            "benchex",
            "list",
            "--task",
            "QA",
            "--modality",
            "Text,Image",
            "--year-from",
            "2018",
            "--page",
            "2",
        ]);

        match cli.command {
            Commands::List { filters, page, .. } => {
                let criteria = filters.criteria();
                assert_eq!(criteria.task.as_deref(), Some("QA"));
                assert_eq!(criteria.modalities, vec!["Text", "Image"]);
                assert_eq!(criteria.years, Some(YearRange::new(2018, i32::MAX)));
                assert_eq!(page, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_filter_args_all_is_unconstrained() {
        let args = FilterArgs {
            task: Some("All".to_string()),
            ..Default::default()
        };
        assert!(args.criteria().is_empty());
    }
}
