use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use anyhow::Context;
use rayon::prelude::*;
use crate::egonet::load_egonet;
use crate::errors::ConfigError;
use crate::graph::UserId;
use crate::pairs::PairFeatureBuilder;
use crate::profile::{ProfileMode, ProfileSource};
use crate::table::write_table;

static EGO_FILE_STEM: OnceLock<regex::Regex> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_directory: PathBuf,
    pub output_directory: PathBuf,
    pub egonet_directory: String,
    pub egonet_extension: String,
    pub profile_file: String,
    pub output_extension: String,
    pub profile_mode: ProfileMode,
    pub jobs: Option<usize>,
    pub keep_going: bool,
}

#[derive(Debug, Clone)]
pub struct EgonetFile {
    pub ego: UserId,
    pub path: PathBuf
}

/// Sizes of one written pair table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EgonetSummary {
    pub friends: usize,
    pub pairs: usize,
    pub edges: usize,
    pub features: usize,
    pub output: PathBuf
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EgonetOutcome {
    Completed(EgonetSummary),
    Failed { error: String }
}

/// Outcome of a whole run, serialized by `--summary`; egonets are sorted by ego id.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
    pub total_pairs: usize,
    pub egonets: Vec<(UserId, EgonetOutcome)>
}

impl RunSummary {
    fn new(mut egonets: Vec<(UserId, EgonetOutcome)>) -> Self {
        egonets.sort_by_key(|(ego, _)| *ego);
        let mut processed = 0;
        let mut failed = 0;
        let mut total_pairs = 0;
        for (_, outcome) in &egonets {
            match outcome {
                EgonetOutcome::Completed(summary) => {
                    processed += 1;
                    total_pairs += summary.pairs;
                }
                EgonetOutcome::Failed { .. } => failed += 1
            }
        }
        RunSummary { processed, failed, total_pairs, egonets }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = std::fs::File::create(path.as_ref())
            .with_context(|| format!("Failed to create summary {}", path.as_ref().display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

fn require_directory(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::MissingDirectory { path: path.display().to_string() })
    }
}

fn ego_id_from_path(path: &Path) -> Result<UserId, ConfigError> {
    let invalid = || ConfigError::InvalidEgoFileName { path: path.display().to_string() };
    let stem = path.file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(invalid)?;
    let pattern = EGO_FILE_STEM
        .get_or_init(|| regex::Regex::new(r"^\d+$").expect("Invalid Regex"));
    if !pattern.is_match(stem) {
        return Err(invalid());
    }
    stem.parse().map_err(|_| invalid())
}

pub fn collect_workload_files(directory: &Path, extension: &str) -> anyhow::Result<Vec<EgonetFile>> {
    let mut workload = Vec::new();
    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("Failed to list {}", directory.display()))?;
    for result in entries {
        let entry = result?;
        if !entry.metadata()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            log::debug!("Skipping {}", path.display());
            continue;
        }
        let ego = ego_id_from_path(&path)?;
        workload.push(EgonetFile { ego, path });
    }
    workload.sort_by(|a, b| a.ego.cmp(&b.ego).then_with(|| a.path.cmp(&b.path)));
    // Each ego owns exactly one output file
    if let Some(pair) = workload.windows(2).find(|pair| pair[0].ego == pair[1].ego) {
        return Err(ConfigError::DuplicateEgo {
            ego: pair[0].ego,
            first: pair[0].path.display().to_string(),
            second: pair[1].path.display().to_string()
        }.into());
    }
    Ok(workload)
}

pub fn process_egonet(file: &EgonetFile,
                      profiles: &ProfileSource,
                      output_path: &Path) -> anyhow::Result<EgonetSummary>
{
    let connectivity = load_egonet(&file.path)?;
    let profiles = profiles.profiles_for(connectivity.friends())?;
    let builder = PairFeatureBuilder::new(&connectivity, &profiles);

    let out = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let pairs = write_table(std::io::BufWriter::new(out), profiles.registry(), builder.rows())
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    log::info!(
        "Ego {}: {} friends, {} edges, {} features, {} pairs",
        file.ego, connectivity.friends().len(), connectivity.edge_count(),
        profiles.registry().len(), pairs
    );
    Ok(EgonetSummary {
        friends: connectivity.friends().len(),
        pairs,
        edges: connectivity.edge_count(),
        features: profiles.registry().len(),
        output: output_path.to_path_buf()
    })
}

fn progress_bar(length: usize) -> indicatif::ProgressBar {
    let bar = indicatif::ProgressBar::new(length as u64);
    if let Ok(style) = indicatif::ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        bar.set_style(style);
    }
    bar
}

pub fn run(config: &RunConfig) -> anyhow::Result<RunSummary> {
    require_directory(&config.source_directory)?;
    let egonet_directory = config.source_directory.join(&config.egonet_directory);
    require_directory(&egonet_directory)?;
    std::fs::create_dir_all(&config.output_directory)
        .with_context(|| format!("Failed to create {}", config.output_directory.display()))?;

    let workload = collect_workload_files(&egonet_directory, &config.egonet_extension)?;
    if workload.is_empty() {
        log::warn!("No ego-network files found in {}", egonet_directory.display());
    }
    let profiles = ProfileSource::open(
        config.profile_mode, config.source_directory.join(&config.profile_file)
    )?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = config.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool.build()?;
    let bar = progress_bar(workload.len());

    let process = |file: &EgonetFile| -> anyhow::Result<(UserId, EgonetOutcome)> {
        let output_path = config.output_directory
            .join(format!("{}.{}", file.ego, config.output_extension));
        let result = process_egonet(file, &profiles, &output_path);
        bar.inc(1);
        match result {
            Ok(summary) => Ok((file.ego, EgonetOutcome::Completed(summary))),
            Err(e) if config.keep_going => {
                log::error!("Failed to process ego {}: {:#}", file.ego, e);
                Ok((file.ego, EgonetOutcome::Failed { error: format!("{:#}", e) }))
            }
            Err(e) => Err(e.context(format!("While processing ego {}", file.ego)))
        }
    };
    let outcomes = pool.install(|| {
        workload.par_iter()
            .map(process)
            .collect::<anyhow::Result<Vec<_>>>()
    });
    bar.finish_and_clear();

    let summary = RunSummary::new(outcomes?);
    log::info!(
        "Processed {} ego-networks ({} failed), {} pairs in total",
        summary.processed, summary.failed, summary.total_pairs
    );
    Ok(summary)
}
