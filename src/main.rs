//! narravox - multi-voice narration engine CLI.
//!
//! Drives the library end to end: transcript inspection, voice library
//! management, and narration runs. Narration uses the deterministic tone
//! engine; a model-backed synthesis engine plugs into the same path.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use narravox::config::{Cli, Command, NarrateArgs};
use narravox::narration::{GenerationJob, JobStatus, Orchestrator, merge_job};
use narravox::synth::{AudioBuffer, ToneEngine};
use narravox::transcript::{self, Mode, SegmentStatus};
use narravox::voice::{self, ProfileKind, VoiceLibrary, VoiceProfile, all_presets};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if cli.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    let library = VoiceLibrary::open(&cli.library)
        .with_context(|| format!("Failed to open voice library at {}", cli.library.display()))?;

    match cli.command {
        Command::Parse { file, mode } => cmd_parse(&file, mode),
        Command::Voices { query, tag, kind } => {
            cmd_voices(&library, &query, &tag, kind);
            Ok(())
        }
        Command::Register { name, kind, artifact, tag } => {
            anyhow::ensure!(artifact.exists(), "artifact not found: {}", artifact.display());
            library.register(VoiceProfile::new(name.clone(), kind, tag, artifact))?;
            info!("✅ Voice \"{}\" registered", name);
            Ok(())
        }
        Command::Remove { name } => {
            library.remove(&name)?;
            Ok(())
        }
        Command::Narrate(args) => cmd_narrate(args, library).await,
    }
}

fn cmd_parse(file: &Path, mode: Mode) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read transcript {}", file.display()))?;

    let segments = transcript::parse(&text, mode)?;
    let stats = transcript::stats(&text);

    println!("{} segments ({:?} mode):", segments.len(), mode);
    for seg in &segments {
        println!("  {:>3}  {}", seg.index, seg.preview(60));
    }

    let speakers = transcript::detect_speakers(&segments);
    if !speakers.is_empty() {
        println!("\nDetected speakers: {}", speakers.join(", "));
    }

    println!(
        "\n{} characters, {} words, {} sentences, {} lines",
        stats.characters, stats.words, stats.sentences, stats.lines
    );
    Ok(())
}

fn cmd_voices(library: &VoiceLibrary, query: &str, tags: &[String], kind: Option<ProfileKind>) {
    println!("── Preset voices ──");
    for preset in all_presets() {
        println!("{:<10} {:<20} {}", preset.name, preset.language, preset.description);
    }

    let profiles = library.search(query, tags, kind);
    println!("\n── Library voices ({}) ──", profiles.len());
    for p in profiles {
        let tags = if p.tags.is_empty() { String::new() } else { format!("  [{}]", p.tags.join(", ")) };
        println!("{:<20} {:?}{}", p.name, p.kind, tags);
    }
}

async fn cmd_narrate(args: NarrateArgs, library: VoiceLibrary) -> Result<()> {
    args.validate()?;

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read transcript {}", args.file.display()))?;
    let mut segments = transcript::parse(&text, args.mode)?;

    // Resolution happens entirely up front; generation never starts with an
    // unresolved speaker.
    match args.mode {
        Mode::Single => {
            let name = args.voice.as_deref().context("--voice is required in single mode")?;
            let voice = voice::resolve(name, &library)?;
            voice::assign_voice(&mut segments, voice);
        }
        Mode::Manual => {
            let mut choices = HashMap::new();
            for (index, name) in &args.assignments {
                choices.insert(*index, voice::resolve(name, &library)?);
            }
            voice::assign_voices(&mut segments, &choices);
        }
        Mode::Annotated => voice::resolve_annotated(&mut segments, &library)?,
    }

    info!("🎙️  Narrating {} segments from {}", segments.len(), args.file.display());

    let mut job = GenerationJob::new(segments);
    let mut progress = job.subscribe();
    let cancel = job.cancel_flag();

    let progress_task = tokio::spawn(async move {
        while let Some(ev) = progress.recv().await {
            info!("🔊 Segment {}/{} completed ({:.1?} elapsed)", ev.completed, ev.total, ev.elapsed);
        }
    });

    // The engine call blocks, so the state machine runs on a blocking
    // worker while this task stays responsive to Ctrl+C.
    let params = args.params();
    let mut worker = tokio::task::spawn_blocking(move || {
        let mut orchestrator = Orchestrator::new(ToneEngine::new(), params);
        let result = orchestrator.start(&mut job);
        (job, result)
    });

    let (job, result) = tokio::select! {
        res = &mut worker => res?,
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Ctrl+C received, cancelling at the next segment boundary...");
            cancel.store(true, Ordering::SeqCst);
            worker.await?
        }
    };
    progress_task.abort();

    // Per-segment artifacts are written regardless of how the run ended;
    // completed segments are worth keeping even from a failed job.
    if args.keep_segments {
        for seg in job.segments() {
            if seg.status == SegmentStatus::Completed
                && let Some(audio) = &seg.audio
            {
                let path = args.out.with_file_name(format!("segment_{:03}.wav", seg.index));
                write_wav(&path, audio)?;
            }
        }
    }

    match result {
        Ok(JobStatus::Completed) => {
            let merged = merge_job(&job)?;
            write_wav(&args.out, &merged)?;
            info!("✅ Narration saved to {} ({:.1}s)", args.out.display(), merged.duration_secs());
            Ok(())
        }
        Ok(status) => {
            warn!(
                "Narration ended {:?}: {}/{} segments completed",
                status,
                job.completed_count(),
                job.total()
            );
            Ok(())
        }
        Err(e) => {
            error!("❌ Narration failed: {}", e);
            error!(
                "{}/{} segments completed; re-run to resume from the failed segment",
                job.completed_count(),
                job.total()
            );
            Err(e.into())
        }
    }
}

/// Write one mono float WAV artifact.
fn write_wav(path: &Path, audio: &AudioBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for &sample in &audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
