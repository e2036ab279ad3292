use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitflow_finish::cli::orchestration::{self, FinishWorkflowArgs};
use gitflow_finish::ui;

#[derive(clap::Parser)]
#[command(
    name = "gitflow-finish",
    version,
    about = "Finish a gitflow release: build, merge, tag and start the next development version"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        help = "Run as if started in this directory instead of the current one"
    )]
    project_dir: Option<PathBuf>,

    #[arg(long, help = "Validate and show the planned commands without making changes")]
    dry_run: bool,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Abort before starting the next step once this many seconds have passed"
    )]
    deadline: Option<u64>,

    #[arg(long, help = "Override the version tag prefix (e.g. \"v\")")]
    tag_prefix: Option<String>,

    #[arg(long, help = "Show the resolved gitflow configuration and exit")]
    show_config: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gitflow_finish=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let workflow_args = FinishWorkflowArgs {
        config_path: args.config,
        project_dir: args.project_dir,
        dry_run: args.dry_run,
        deadline: args.deadline.map(Duration::from_secs),
        tag_prefix: args.tag_prefix,
    };

    if args.show_config {
        return match orchestration::resolve_config(&workflow_args) {
            Ok(config) => {
                ui::display_config(&config);
                ExitCode::SUCCESS
            }
            Err(e) => exit_code(ui::report_error(&e)),
        };
    }

    match orchestration::run_finish_workflow(&workflow_args, ui::display_step) {
        Ok(outcome) => exit_code(ui::report_outcome(&outcome)),
        Err(e) => exit_code(ui::report_error(&e)),
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
