//! Audio encoding and decoding.
//!
//! WAV goes through a dedicated hound path; lossy chapter artifacts (MP3,
//! AAC) go through symphonia's universal decoder. Multichannel input is
//! always mixed down to mono; the pipeline never deals in more than one
//! channel.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::probe::Hint;

use crate::error::{Result, VoxbookError};

/// Duration in seconds of `sample_count` mono samples at `sample_rate`.
pub fn duration_in_seconds(sample_count: usize, sample_rate: u32) -> f32 {
    sample_count as f32 / sample_rate as f32
}

/// Root-mean-square amplitude of a sample buffer; the loudness measure used
/// by the quality checks.
pub fn compute_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Decode any supported audio file into mono f32 PCM.
///
/// Returns the samples and their sample rate. WAV files use the hound
/// decoder; everything else is probed and decoded by symphonia.
pub fn decode_audio_file<P: AsRef<Path>>(file_path: P) -> Result<(Vec<f32>, u32)> {
    let file_path = file_path.as_ref();
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "wav" => decode_wav_file(file_path),
        "mp3" | "m4a" | "m4b" | "aac" | "mp4" => {
            let mut buffer = Vec::new();
            File::open(file_path)?.read_to_end(&mut buffer)?;
            decode_with_symphonia(buffer, &extension)
        }
        other => Err(VoxbookError::AudioProcessing(format!(
            "unsupported audio format: {:?}",
            other
        ))),
    }
}

fn decode_with_symphonia(data: Vec<u8>, extension: &str) -> Result<(Vec<f32>, u32)> {
    let cursor = std::io::Cursor::new(data);
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(extension);

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &Default::default(), &Default::default())
        .map_err(|e| VoxbookError::AudioProcessing(format!("failed to probe format: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| VoxbookError::AudioProcessing("no audio track found".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &Default::default())
        .map_err(|e| VoxbookError::AudioProcessing(format!("failed to create decoder: {}", e)))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let channels = track.codec_params.channels.unwrap_or_default().count();

    let mut pcm_data = Vec::new();

    while let Ok(packet) = format.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let mut sample_buf =
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                sample_buf.copy_planar_ref(decoded);
                let samples = sample_buf.samples();

                if channels > 1 {
                    let frames_per_channel = samples.len() / channels;
                    for frame in 0..frames_per_channel {
                        let mut sum = 0.0;
                        for ch in 0..channels {
                            sum += samples[ch * frames_per_channel + frame];
                        }
                        pcm_data.push(sum / channels as f32);
                    }
                } else {
                    pcm_data.extend_from_slice(samples);
                }
            }
            Err(e) => {
                // Skip the bad packet and keep going.
                warn!("failed to decode packet: {}", e);
                continue;
            }
        }
    }

    debug!(
        "decoded {} samples at {} Hz",
        pcm_data.len(),
        sample_rate
    );
    Ok((pcm_data, sample_rate))
}

/// Decode a WAV file into mono f32 PCM.
pub fn decode_wav_file<P: AsRef<Path>>(file_path: P) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(file_path.as_ref())
        .map_err(|e| VoxbookError::AudioProcessing(format!("failed to open WAV: {}", e)))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;

    let pcm_data: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| VoxbookError::AudioProcessing(format!("WAV read error: {}", e)))?,
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8_388_608.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| VoxbookError::AudioProcessing(format!("WAV read error: {}", e)))?,
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2_147_483_648.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| VoxbookError::AudioProcessing(format!("WAV read error: {}", e)))?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| VoxbookError::AudioProcessing(format!("WAV read error: {}", e)))?,
        (format, bits) => {
            return Err(VoxbookError::AudioProcessing(format!(
                "unsupported WAV format: {:?}, {} bits",
                format, bits
            )));
        }
    };

    let channels = spec.channels as usize;
    if channels > 1 {
        let mut mono = Vec::with_capacity(pcm_data.len() / channels);
        for chunk in pcm_data.chunks(channels) {
            mono.push(chunk.iter().sum::<f32>() / channels as f32);
        }
        Ok((mono, sample_rate))
    } else {
        Ok((pcm_data, sample_rate))
    }
}

/// Write mono f32 PCM to a WAV file (32-bit float).
pub fn encode_wav<P: AsRef<Path>>(pcm_data: &[f32], sample_rate: u32, output_path: P) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(output_path.as_ref(), spec)?;
    for &sample in pcm_data {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!(
        "wrote {} ({} samples, {} Hz)",
        output_path.as_ref().display(),
        pcm_data.len(),
        sample_rate
    );
    Ok(())
}
