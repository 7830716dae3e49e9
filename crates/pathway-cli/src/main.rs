//! Pathway CLI - rebuilds the normalized student store.

mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use pathway::{Pipeline, PipelineConfig, RunSummary};

use cli::Cli;

fn main() -> ExitCode {
    let _cli = Cli::parse();

    let config = PipelineConfig::default();

    let _guards = match logging::init(&config.log_dir) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Error: failed to set up logging in {}: {}", config.log_dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match Pipeline::with_config(config.clone()).run() {
        Ok(summary) => {
            print_summary(&summary, &config);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {} stage failed: {}", "Error:".red().bold(), e.stage(), e);
            eprintln!(
                "See {} for details.",
                config.log_dir.join(logging::ERROR_FILE).display()
            );
            ExitCode::FAILURE
        }
    }
}

fn print_summary(summary: &RunSummary, config: &PipelineConfig) {
    println!("{} {}", "Updated".green().bold(), config.target_db.display().to_string().white());
    println!();

    println!("{}", "Rows written:".yellow().bold());
    println!("  Students:      {}", summary.counts.students.to_string().white());
    println!("  Jobs:          {}", summary.counts.student_jobs.to_string().white());
    println!("  Career paths:  {}", summary.counts.courses.to_string().white());
    println!();

    println!("{}", "Cleaning:".yellow().bold());
    println!(
        "  Duplicates removed: {}",
        summary.clean.total_duplicates().to_string().white()
    );
    println!(
        "  Values nulled:      {}",
        summary.clean.total_coerced_to_null().to_string().white()
    );
    println!();

    let violations = summary.violations.len();
    println!("{}", "Integrity:".yellow().bold());
    if violations == 0 {
        println!("  {}", "All student references resolve".green());
    } else {
        println!(
            "  {} unresolved reference(s), see {}",
            violations.to_string().red(),
            config.log_dir.join(logging::CHANGELOG_FILE).display()
        );
    }
    println!();

    println!(
        "{} {} rows to {}",
        "Exported".green().bold(),
        summary.exported_rows.to_string().white().bold(),
        config.export_path.display()
    );
}
