//! Stream an audio file through the detector chunk by chunk and print
//! speech start/end events as they are emitted.
//!
//! Input is either raw float32 little-endian PCM or a WAV file (downmixed
//! to mono; the WAV sample rate must match `--rate`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use voxseg_core::{Detector, DetectorConfig};

#[derive(Debug)]
struct Args {
    model: PathBuf,
    input: PathBuf,
    sample_rate: u32,
    threshold: f32,
    min_silence_ms: u32,
    pad_ms: u32,
    chunk_size: usize,
}

fn parse_args() -> Result<Args> {
    let mut model: Option<PathBuf> = None;
    let mut input: Option<PathBuf> = None;
    let mut sample_rate: u32 = 16_000;
    let mut threshold: f32 = 0.5;
    let mut min_silence_ms: u32 = 100;
    let mut pad_ms: u32 = 30;
    let mut chunk_size: usize = 1_600;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--model" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --model");
                };
                model = Some(PathBuf::from(v));
            }
            "--input" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --input");
                };
                input = Some(PathBuf::from(v));
            }
            "--rate" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --rate");
                };
                sample_rate = v.parse().context("invalid value for --rate")?;
            }
            "--threshold" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --threshold");
                };
                threshold = v.parse().context("invalid value for --threshold")?;
            }
            "--min-silence-ms" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --min-silence-ms");
                };
                min_silence_ms = v.parse().context("invalid value for --min-silence-ms")?;
            }
            "--pad-ms" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --pad-ms");
                };
                pad_ms = v.parse().context("invalid value for --pad-ms")?;
            }
            "--chunk" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --chunk");
                };
                chunk_size = v.parse().context("invalid value for --chunk")?;
            }
            "--help" | "-h" => {
                println!(
                    "Usage: voxseg --model <silero_vad.onnx> --input <file.pcm|file.wav> \\
  [--rate <8000|16000>] [--threshold <p>] [--min-silence-ms <ms>] \\
  [--pad-ms <ms>] [--chunk <samples>]"
                );
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    let Some(model) = model else {
        bail!("--model is required");
    };
    let Some(input) = input else {
        bail!("--input is required");
    };
    if chunk_size == 0 {
        bail!("--chunk must be greater than zero");
    }

    Ok(Args {
        model,
        input,
        sample_rate,
        threshold,
        min_silence_ms,
        pad_ms,
        chunk_size,
    })
}

fn read_pcm_f32le(path: &Path) -> Result<Vec<f32>> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let samples = data
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok(samples)
}

fn read_wav_mono_f32(path: &Path, expected_rate: u32) -> Result<Vec<f32>> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    if spec.sample_rate != expected_rate {
        bail!(
            "WAV sample rate {} does not match --rate {}",
            spec.sample_rate,
            expected_rate
        );
    }
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max = ((1_i64 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    if channels == 1 {
        return Ok(interleaved);
    }

    let mut mono = Vec::with_capacity(interleaved.len() / channels);
    for frame in interleaved.chunks(channels) {
        let sum = frame.iter().copied().sum::<f32>();
        mono.push(sum / channels as f32);
    }
    Ok(mono)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxseg=info".parse().unwrap()),
        )
        .init();

    let args = parse_args()?;

    let is_wav = args
        .input
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);
    let samples = if is_wav {
        read_wav_mono_f32(&args.input, args.sample_rate)?
    } else {
        read_pcm_f32le(&args.input)?
    };

    info!(
        samples = samples.len(),
        rate = args.sample_rate,
        chunk = args.chunk_size,
        "streaming input"
    );

    let config = DetectorConfig {
        model_path: args.model,
        sample_rate: args.sample_rate,
        threshold: args.threshold,
        min_silence_duration_ms: args.min_silence_ms,
        speech_pad_ms: args.pad_ms,
    };
    let mut detector = Detector::new(config)?;

    for chunk in samples.chunks(args.chunk_size) {
        let segments = detector.detect_stream(chunk)?;
        for seg in segments {
            if seg.is_open() {
                println!("speech start: {:.3}s", seg.speech_start_at);
            } else {
                println!(
                    "speech end: {:.3}s (start {:.3}s)",
                    seg.speech_end_at, seg.speech_start_at
                );
            }
        }
    }

    Ok(())
}
