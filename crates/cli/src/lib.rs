pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::set_option::SetOptionArgs;

#[derive(Debug, Parser)]
#[command(
    name = "liftquote",
    about = "Forklift configuration matrix CLI",
    long_about = "Import, edit, export and price forklift configuration matrices.",
    after_help = "Examples:\n  liftquote import matrix.xlsx\n  liftquote variant EG16P\n  \
                  liftquote configure EG16P --select 1135=OPT-BATT-LI"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Import a configuration matrix workbook")]
    Import {
        file: PathBuf,
        #[arg(long, help = "Replace the stored matrix of the same model family")]
        replace: bool,
    },
    #[command(about = "Export the matrix of a model family as a workbook")]
    Export { family: String, file: PathBuf },
    #[command(about = "List stored matrices")]
    List,
    #[command(about = "Show one variant across all stored matrices")]
    Variant { code: String },
    #[command(about = "Update availability, cost or description of one option")]
    SetOption(SetOptionArgs),
    #[command(about = "Validate and price a variant configuration")]
    Configure {
        variant: String,
        #[arg(long = "select", value_name = "SPEC=OPTION")]
        selects: Vec<String>,
        #[arg(long, default_value = "EUR")]
        currency: String,
    },
    #[command(about = "Delete a stored matrix")]
    Delete { matrix: String },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Import { file, replace } => commands::import::run(&file, replace),
        Command::Export { family, file } => commands::export::run(&family, &file),
        Command::List => commands::list::run(),
        Command::Variant { code } => commands::variant::run(&code),
        Command::SetOption(args) => commands::set_option::run(&args),
        Command::Configure { variant, selects, currency } => {
            commands::configure::run(&variant, &selects, &currency)
        }
        Command::Delete { matrix } => commands::delete::run(&matrix),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
