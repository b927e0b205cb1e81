use clap::Parser;
use corpus_coverage::cli::{Args, Commands};
use corpus_coverage::commands::{self, gather::GatherArgs};
use corpus_coverage::config::Config;
use corpus_coverage::utils::logging;

fn run(args: Args) -> anyhow::Result<()> {
    logging::init(args.verbose)?;

    match args.command {
        Commands::Gather {
            corpus_dir,
            program,
            title,
            program_args,
            capture_dir,
            merged_output,
            reset_counters,
            no_archive,
            report_json,
        } => {
            let config = Config::load(args.config.as_deref())?;
            commands::gather::run(
                GatherArgs {
                    corpus_dir,
                    program,
                    title,
                    program_args,
                    capture_dir,
                    merged_output,
                    reset_counters,
                    no_archive,
                    report_json,
                },
                &config,
            )
        }
        Commands::Summary { tracefile, json } => commands::summary::run(&tracefile, json),
        Commands::InitConfig { force } => {
            commands::init_config::run(&Config::default(), args.config.as_deref(), force)
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
