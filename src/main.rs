use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use flywatch::config::ProjectConfig;
use flywatch::report::Report;

#[derive(Parser)]
#[command(name = "flywatch")]
#[command(about = "Forum participant engagement monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project configuration file and print its derived quotas
    CheckConfig {
        /// Path to the project config JSON
        #[arg(long)]
        config: PathBuf,
    },
    /// Render a crawl report JSON as a markdown table
    Report {
        /// Path to a crawl report JSON produced by a crawl run
        #[arg(long)]
        json: PathBuf,
        /// Output directory (defaults to current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckConfig { config } => {
            let config = ProjectConfig::load_from_file(&config)?;
            println!("Project: {}", config.project_id);
            println!(
                "Day {} of {} ({} pages max{})",
                config.current_day,
                config.total_days,
                config.max_pages,
                if config.sample_mode {
                    format!(", sample mode, limit {}", config.sample_limit)
                } else {
                    String::new()
                }
            );
            println!(
                "Expected posts: {} before today, {} through today",
                config.expected_minimum_before_today(),
                config.expected_through_today()
            );
            Ok(())
        }
        Commands::Report { json, output } => {
            let report = Report::load_from_file(&json)?;

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&output_dir).with_context(|| {
                format!(
                    "Failed to create output directory: {}",
                    output_dir.display()
                )
            })?;

            let markdown = report.render_markdown();
            let filename = format!("flywatch-report-{}.md", report.project_id);
            let output_path = output_dir.join(filename);
            std::fs::write(&output_path, markdown)?;
            eprintln!("Markdown report written to: {}", output_path.display());
            Ok(())
        }
    }
}
