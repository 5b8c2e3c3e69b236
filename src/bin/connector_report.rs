use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use connector_align::{
    candidates, AlignmentObserver, AlignmentPass, ConnectorAlignerBuilder, ContextDisambiguator,
    DropList, FrequencyTable, Meta, NoMatch, OccurrenceClassification, OccurrenceClassifier,
    ParallelCorpus, PassInput, RecordPolicy, Report, RunConfig, Strategy,
};
use indicatif::{ProgressBar, ProgressStyle};

#[path = "connector_report/output_files.rs"]
mod output_files;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    Positional,
    #[value(name = "windowed-list")]
    WindowedList,
    External,
}

impl StrategyChoice {
    fn strategy(self) -> Strategy {
        match self {
            Self::Positional => Strategy::Positional,
            Self::WindowedList => Strategy::WindowedList,
            Self::External => Strategy::External,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "connector_report")]
#[command(about = "Count translation equivalents of discourse connectors in a parallel corpus")]
struct Args {
    /// Source-language corpus, one sentence per line.
    #[arg(long, env = "CONNECTOR_REPORT_SOURCE")]
    source: Option<PathBuf>,
    /// Target-language corpus, line-aligned with the source.
    #[arg(long, env = "CONNECTOR_REPORT_TARGET")]
    target: Option<PathBuf>,
    /// Word aligner result file (A3.final) for the external strategy.
    #[arg(long, env = "CONNECTOR_REPORT_EXTERNAL_RESULT")]
    external_result: Option<PathBuf>,
    /// JSON run configuration; built-in defaults when absent.
    #[arg(long, env = "CONNECTOR_REPORT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "CONNECTOR_REPORT_STRATEGY", value_enum)]
    strategy: Option<StrategyChoice>,
    #[arg(long, env = "CONNECTOR_REPORT_FRAME")]
    frame: Option<usize>,
    #[arg(long, env = "CONNECTOR_REPORT_START", allow_hyphen_values = true)]
    start: Option<isize>,
    #[arg(long, env = "CONNECTOR_REPORT_MAX_WINDOW")]
    max_window: Option<usize>,
    #[arg(long, env = "CONNECTOR_REPORT_TOP_N", default_value_t = connector_align::alignment::report::DEFAULT_TOP_N)]
    top_n: usize,
    /// Skip source occurrences that read as non-connectors.
    #[arg(long, env = "CONNECTOR_REPORT_PRE_DISAMBIGUATE", default_value_t = false)]
    pre_disambiguate: bool,
    /// Drop equivalents that rarely appear in connector position in the target corpus.
    #[arg(long, env = "CONNECTOR_REPORT_POST_DISAMBIGUATE", default_value_t = false)]
    post_disambiguate: bool,
    /// Skip malformed external records instead of aborting.
    #[arg(long, env = "CONNECTOR_REPORT_BEST_EFFORT", default_value_t = false)]
    best_effort: bool,
    #[arg(long, env = "CONNECTOR_REPORT_OUT_DIR", default_value = "results")]
    out_dir: PathBuf,
    /// Base name of the output files; defaults to the strategy name.
    #[arg(long, env = "CONNECTOR_REPORT_NAME")]
    name: Option<String>,
}

struct ProgressObserver {
    progress: ProgressBar,
    lines: usize,
    no_matches: Vec<NoMatch>,
}

impl AlignmentObserver for ProgressObserver {
    fn on_pass_started(&mut self, total_lines: usize) {
        self.progress.set_length(total_lines as u64);
    }

    fn on_line_processed(&mut self, _line_no: usize) {
        self.lines += 1;
        self.progress.inc(1);
    }

    fn on_no_match(&mut self, connector: &str, line_no: usize) {
        self.no_matches.push(NoMatch {
            connector: connector.to_string(),
            line: line_no,
        });
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let started = Instant::now();

    let mut config = match args.config.as_ref() {
        Some(path) => RunConfig::load(path).map_err(|e| e.to_string())?,
        None => RunConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.aligner.validate().map_err(|e| e.to_string())?;
    if args.top_n == 0 {
        return Err("--top-n must be >= 1.".to_string());
    }

    let strategy = config.aligner.strategy;
    if args.pre_disambiguate && strategy == Strategy::External {
        return Err(
            "--pre-disambiguate needs a parallel corpus and cannot be used with --strategy external."
                .to_string(),
        );
    }
    let input = match strategy {
        Strategy::External => {
            let path = args
                .external_result
                .clone()
                .ok_or_else(|| "--strategy external requires --external-result.".to_string())?;
            if !path.is_file() {
                return Err(format!(
                    "external alignment result file not found: {}",
                    path.display()
                ));
            }
            PassInput::ExternalResult(path)
        }
        Strategy::Positional | Strategy::WindowedList => {
            let source = args
                .source
                .clone()
                .ok_or_else(|| "this strategy requires --source.".to_string())?;
            let target = args
                .target
                .clone()
                .ok_or_else(|| "this strategy requires --target.".to_string())?;
            PassInput::Corpus(ParallelCorpus::new(source, target))
        }
    };

    let occurrence_filter = if args.pre_disambiguate {
        Some(classify_source(&config, args.source.as_deref())?)
    } else {
        None
    };
    let skipped_occurrences = occurrence_filter
        .as_ref()
        .map_or(0, OccurrenceClassification::flagged_total);

    let mut builder = ConnectorAlignerBuilder::new(config.aligner.clone());
    if let Some(classification) = occurrence_filter {
        builder = builder.with_occurrence_filter(classification);
    }
    let pass = builder.build_pass(input).map_err(|e| e.to_string())?;

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("matching connectors");
    let mut observer = ProgressObserver {
        progress,
        lines: 0,
        no_matches: Vec::new(),
    };
    let ledger = pass.run(&mut observer).map_err(|e| e.to_string())?;
    observer
        .progress
        .finish_with_message("alignment pass complete");

    let drop_list = if args.post_disambiguate {
        let target = args
            .target
            .as_ref()
            .ok_or_else(|| "--post-disambiguate requires --target.".to_string())?;
        let disambiguator =
            ContextDisambiguator::new(config.disambiguation.clone()).map_err(|e| e.to_string())?;
        disambiguator
            .disambiguate(target, &candidates(&ledger))
            .map_err(|e| e.to_string())?
    } else {
        DropList::new()
    };
    let ledger = ledger.without_rows(&drop_list);

    let table = FrequencyTable::from_ledger(&ledger);
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| strategy.as_str().to_string());
    let csv_path = args.out_dir.join(format!("{name}.csv"));
    let txt_path = args.out_dir.join(format!("{name}.txt"));
    let json_path = args.out_dir.join(format!("{name}.json"));
    let log_path = args.out_dir.join("no_matches.log");

    output_files::write_frequency_csv(&csv_path, &table)?;
    output_files::write_top_values(&txt_path, &table, args.top_n)?;
    output_files::write_no_match_log(&log_path, &observer.no_matches)?;

    let report = Report {
        schema_version: connector_align::alignment::report::REPORT_SCHEMA_VERSION,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            strategy: strategy.as_str().to_string(),
            source_path: display_optional(args.source.as_deref()),
            target_path: display_optional(args.target.as_deref()),
            external_path: args
                .external_result
                .as_ref()
                .filter(|_| strategy == Strategy::External)
                .map(|p| p.to_string_lossy().into_owned()),
            frame: config.aligner.frame,
            start: config.aligner.start,
            max_window: config.aligner.effective_max_window(),
            top_n: args.top_n,
            line_count: observer.lines,
            no_match_count: observer.no_matches.len(),
            skipped_occurrences,
        },
        connectors: table.top_values(args.top_n).map_err(|e| e.to_string())?,
        dropped_candidates: drop_list.iter().map(str::to_string).collect(),
        counts: ledger,
    };
    output_files::write_json_report(&json_path, &report)?;

    println!(
        "elapsed: {:.2?} lines: {} no_matches: {} dropped: {}",
        started.elapsed(),
        observer.lines,
        observer.no_matches.len(),
        drop_list.len()
    );
    for path in [&csv_path, &txt_path, &json_path, &log_path] {
        println!("{}", path.display());
    }
    Ok(())
}

fn apply_overrides(config: &mut RunConfig, args: &Args) {
    if let Some(choice) = args.strategy {
        config.aligner.strategy = choice.strategy();
    }
    if let Some(frame) = args.frame {
        config.aligner.frame = frame;
    }
    if let Some(start) = args.start {
        config.aligner.start = start;
    }
    if let Some(max_window) = args.max_window {
        config.aligner.max_window = Some(max_window);
    }
    if args.best_effort {
        config.aligner.record_policy = RecordPolicy::BestEffort;
    }
}

fn classify_source(
    config: &RunConfig,
    source: Option<&Path>,
) -> Result<OccurrenceClassification, String> {
    let source = source.ok_or_else(|| "--pre-disambiguate requires --source.".to_string())?;
    let classifier = OccurrenceClassifier::new(&config.aligner.source_set(), &config.disambiguation)
        .map_err(|e| e.to_string())?;
    classifier.classify_file(source).map_err(|e| e.to_string())
}

fn display_optional(path: Option<&Path>) -> String {
    path.map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
