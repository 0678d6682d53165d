use argh::FromArgs;
use digest_figures::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Renders the t-digest accuracy figures from benchmark output
#[derive(FromArgs, Debug)]
pub struct Args {
    /// benchmark output root, holding `<implementation>/<distribution>/` directories
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// directory figures are written to (default: plots)
    #[argh(option, short = 'o', default = "PathBuf::from(\"plots\")")]
    output: PathBuf,

    /// also draw one figure per implementation/distribution pair
    #[argh(switch, short = 'p')]
    per_location: bool,

    /// print the figure plan as JSON instead of rendering it
    #[argh(switch, short = 'n')]
    dry_run: bool,

    /// log every file that is read
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    if !args.input.is_dir() {
        error!(input = %args.input.display(), "Input path must be a directory");
        return ExitCode::FAILURE;
    }

    let config = AggregatorConfig::standard();
    let plan = FigurePlan::standard(&config, &args.input, &args.output, args.per_location);

    if args.dry_run {
        return match serde_json::to_string_pretty(&plan) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize figure plan");
                ExitCode::FAILURE
            }
        };
    }

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        figures = plan.jobs.len(),
        "generating figures"
    );

    let mut renderer = PngRenderer::new(&args.output);
    let outcome = plan.run(&Aggregator::new(config), &mut renderer);

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        error!(failed = outcome.failed, "some figures could not be generated");
        ExitCode::FAILURE
    }
}
