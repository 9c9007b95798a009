use clap::Parser;
use colored::Colorize;
use miette::{miette, Result};
use std::path::PathBuf;
use tracing::info;

use measurelens::analysis::{used_measures, CascadeAnalyzer, ImpactLeveler};
use measurelens::config::Config;
use measurelens::extract::ReportVisuals;
use measurelens::graph::{DependencyDataset, GraphBuilder};
use measurelens::report::{AnalysisReport, ReportFormat, Reporter};

/// measurelens - Fast unused-measure detection for BI report models
#[derive(Parser, Debug)]
#[command(name = "measurelens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory (for config discovery)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Measure dependency dataset (TSV export)
    #[arg(short, long)]
    dependencies: Option<PathBuf>,

    /// Report definition (JSON)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Assess deletion impact for a semicolon-delimited candidate list
    /// instead of trusting only the liveness waves
    #[arg(long, value_name = "MEASURES")]
    impact: Option<String>,

    /// Match used fields against known measure names only (default);
    /// use --no-match-known to keep every trailing identifier
    #[arg(long, overrides_with = "no_match_known")]
    match_known: bool,

    #[arg(long, hide = true)]
    no_match_known: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("measurelens v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_analysis(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if let Some(dependencies) = &cli.dependencies {
        config.dependencies_path = Some(dependencies.clone());
    }
    if let Some(report) = &cli.report {
        config.report_path = Some(report.clone());
    }
    if cli.match_known {
        config.analysis.match_known_measures = true;
    }
    if cli.no_match_known {
        config.analysis.match_known_measures = false;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    use std::time::Instant;

    let start_time = Instant::now();

    let dependencies_path = config
        .dependencies_path
        .as_ref()
        .ok_or_else(|| miette!("no dependency dataset given (use --dependencies or a config file)"))?;
    let report_path = config
        .report_path
        .as_ref()
        .ok_or_else(|| miette!("no report definition given (use --report or a config file)"))?;

    // Step 1: Parse the dependency dataset and build the lineage graph
    info!("Parsing dependency dataset...");
    let dataset = DependencyDataset::parse(dependencies_path)?;
    let graph = GraphBuilder::build_from_dataset(&dataset);
    info!(
        "Lineage graph: {} measures, {} nodes, {} edges",
        dataset.len(),
        graph.node_count(),
        graph.edge_count()
    );

    // Step 2: Extract visual rows from the report definition
    info!("Extracting report visuals...");
    let visuals = ReportVisuals::parse(report_path)?;
    info!("Found {} visual surfaces", visuals.len());

    // Step 3: Aggregate the directly-used measure set
    let all_measures = dataset.all_measures();
    let known = if config.analysis.match_known_measures {
        Some(all_measures.as_slice())
    } else {
        None
    };
    let used = used_measures(&visuals, known);
    info!("{} measures directly used", used.len());

    // Step 4: Cascading liveness analysis
    let analyzer = CascadeAnalyzer::new(dataset.record_map());
    let analysis = analyzer.analyze(&all_measures, &used);

    // Step 5: Report results
    let reporter = Reporter::new(
        cli.format.clone().into(),
        cli.output.clone(),
        config.report.show_detail,
    );
    reporter.report(&AnalysisReport {
        dataset: &dataset,
        graph: &graph,
        analysis: &analysis,
    })?;

    // Step 6: Optional deletion-impact assessment for a candidate list
    if let Some(candidates) = &cli.impact {
        let candidates: Vec<String> = candidates
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let leveler = ImpactLeveler::new(&graph, dataset.record_map());
        let impact = leveler.assess(&candidates);

        println!();
        println!(
            "{}",
            format!(
                "Deletion impact for {} candidates (score {}):",
                candidates.len(),
                impact.score
            )
            .yellow()
            .bold()
        );
        if impact.levels.is_empty() {
            println!("  {}", "No additional measures affected.".green());
        }
        for (index, level) in impact.levels.iter().enumerate() {
            println!(
                "  {} {}",
                format!("level {}:", index + 1).cyan(),
                level.join("; ")
            );
        }
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
