use std::path::PathBuf;
use clap::Parser;
use egonet_pairs::processing::{self, RunConfig};
use egonet_pairs::profile::ProfileMode;

/// Turns ego-networks and a profile table into labeled friend-pair feature tables.
#[derive(clap::Parser)]
#[command(version)]
struct Cli {
    /// Directory holding the ego-network directory and the profile file
    source_directory: PathBuf,

    /// Directory receiving one table per ego
    output_directory: PathBuf,

    #[clap(long, default_value = "egonets")]
    egonet_dir: String,

    #[clap(long, default_value = "egonet")]
    egonet_extension: String,

    #[clap(long, default_value = "features.txt")]
    profile_file: String,

    #[clap(long, default_value = "csv")]
    output_extension: String,

    #[clap(long, value_enum, default_value_t = ProfileMode::Index)]
    profile_mode: ProfileMode,

    /// Number of worker threads (defaults to one per core)
    #[clap(short, long)]
    jobs: Option<usize>,

    /// Keep processing the remaining ego-networks when one fails
    #[clap(short, long)]
    keep_going: bool,

    /// Write a JSON summary of the run
    #[clap(short, long)]
    summary: Option<PathBuf>,
}


fn setup_logging() -> anyhow::Result<()> {
    let spec = flexi_logger::LogSpecification::env_or_parse("warn,egonet_pairs=debug")?;
    flexi_logger::Logger::with(spec)
        .log_to_file(
            flexi_logger::FileSpec::default()
                .directory("logs")
                .basename("egonet-pairs")
                .use_timestamp(false),
        )
        .duplicate_to_stdout(flexi_logger::Duplicate::Info)
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stdout(flexi_logger::colored_detailed_format)
        .set_palette("b1;3;2;4;6".to_string())
        .start()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging()?;

    let config = RunConfig {
        source_directory: cli.source_directory,
        output_directory: cli.output_directory,
        egonet_directory: cli.egonet_dir,
        egonet_extension: cli.egonet_extension,
        profile_file: cli.profile_file,
        output_extension: cli.output_extension,
        profile_mode: cli.profile_mode,
        jobs: cli.jobs,
        keep_going: cli.keep_going,
    };
    let summary = processing::run(&config)?;
    if let Some(path) = cli.summary {
        summary.write_json(&path)?;
        log::info!("Wrote summary to {}", path.display());
    }
    if summary.failed > 0 {
        return Err(anyhow::anyhow!("{} ego-networks failed", summary.failed));
    }
    Ok(())
}
