use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trendscribe::cli::{AnalysisArgs, Cli, Command, ScrapeArgs, TranscribeArgs};
use trendscribe::config::DataLayout;
use trendscribe::report::TrendReportWriter;
use trendscribe::transcript::{TranscriptPaths, TranscriptStore};
use trendscribe::transcription::{default_transcriber, ensure_audio_exists};
use trendscribe::types::TrendSummary;
use trendscribe::videos::{save_titles, VideoSource, YouTubeSource};
use trendscribe::TrendAnalysisPipeline;

const PREVIEW_CHARS: usize = 500;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let layout = cli.layout();

    match &cli.command {
        Command::Scrape(args) => handle_scrape(args, &layout),
        Command::Transcribe(args) => handle_transcribe(args, &layout).map(|_| ()),
        Command::Analyze(args) => handle_analyze(&args.transcript, &args.analysis, &layout),
        Command::Run(args) => {
            let transcribe = TranscribeArgs {
                audio: args.audio.clone(),
                whisper: args.whisper.clone(),
            };
            let paths = handle_transcribe(&transcribe, &layout)?;
            handle_analyze(&paths.text, &args.analysis, &layout)
        }
    }
}

fn handle_scrape(args: &ScrapeArgs, layout: &DataLayout) -> Result<()> {
    let source = YouTubeSource::new(args.require_api_key()?)?;
    let listings = source
        .search(&args.query, args.max_results)
        .context("Failed to search videos")?;
    let path = save_titles(&listings, &layout.scraped_videos(), &args.query)?;
    println!("Video data saved to {}", path.display());
    Ok(())
}

fn handle_transcribe(args: &TranscribeArgs, layout: &DataLayout) -> Result<TranscriptPaths> {
    ensure_audio_exists(&args.audio)?;
    let transcriber = default_transcriber(args.whisper.settings())?;
    let transcript = transcriber
        .transcribe(&args.audio)
        .with_context(|| format!("Failed to transcribe {:?}", args.audio))?;

    let store = TranscriptStore::new(layout.transcripts());
    let paths = store.save(&transcript, &args.audio)?;
    info!(json = %paths.json.display(), text = %paths.text.display(), "transcription saved");

    let preview: String = transcript.text.chars().take(PREVIEW_CHARS).collect();
    println!("Transcription preview:\n{}...", preview);
    println!("JSON format: {}", paths.json.display());
    println!("Text format: {}", paths.text.display());
    Ok(paths)
}

fn handle_analyze(transcript: &Path, analysis: &AnalysisArgs, layout: &DataLayout) -> Result<()> {
    let config = analysis.pipeline_config(layout)?;
    let writer = TrendReportWriter::new(&config.output_dir);
    let records = TrendAnalysisPipeline::new(config)
        .run(transcript)
        .with_context(|| format!("Trend analysis failed for {:?}", transcript))?;

    let summary = TrendSummary::from_records(&records);
    println!("Segments analyzed: {}", summary.total);
    println!("Detailed analysis: {}", writer.detailed_path().display());
    println!("Summary report: {}", writer.summary_path().display());
    Ok(())
}
