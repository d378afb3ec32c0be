//! File precondition checks
//!
//! Fast gate run before expensive analysis: existence, extension, container
//! openability, and structural sanity of the decoded data. Failures are
//! reported as values, never raised, so callers can branch on the verdict.
//!
//! Decoding is an external collaborator, so openability goes through the
//! [`MediaProber`] trait. The default [`SignatureProber`] performs
//! lightweight container checks (magic bytes and minimal structure) and
//! decodes WAV sample data for the audio sanity checks; richer
//! decoder-backed probers plug in through the same trait.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::Frame;
use crate::error::{CoreError, CoreResult};

/// Extensions accepted for video validation.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm"];

/// Extensions accepted for audio validation.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "aac", "ogg"];

// How much of a container is scanned for structural markers.
const STRUCTURE_SCAN_LIMIT: usize = 64 * 1024;

// Upper bound on top-level MP4 boxes walked before giving up.
const MAX_BOX_WALK: usize = 64;

/// Verdict of a file precondition check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCheck {
    pub is_valid: bool,
    pub message: String,
}

impl FileCheck {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }

    /// The `(is_valid, message)` shape consumed by the gating surface.
    pub fn into_tuple(self) -> (bool, String) {
        (self.is_valid, self.message)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// What a prober learned about a video file.
#[derive(Debug, Clone)]
pub struct VideoProbe {
    pub container: String,
    /// Whether the container holds decodable media data.
    pub has_media_data: bool,
    /// First decoded frame, when the prober can decode at all.
    pub first_frame: Option<Frame>,
}

/// What a prober learned about an audio file.
#[derive(Debug, Clone)]
pub struct AudioProbe {
    pub format: String,
    /// Declared sample rate, when the prober can read the header.
    pub sample_rate: Option<u32>,
    /// Decoded samples, when the prober can decode at all.
    pub samples: Option<Vec<f32>>,
}

/// Seam to the external decoding layer.
pub trait MediaProber: Send + Sync {
    fn probe_video(&self, path: &Path) -> CoreResult<VideoProbe>;
    fn probe_audio(&self, path: &Path) -> CoreResult<AudioProbe>;
}

/// Validate a video file path ahead of analysis.
///
/// Checks run in order and stop at the first failure; every failure yields
/// a distinct human-readable message and no error escapes.
pub fn validate_video_file(path: &Path, prober: &dyn MediaProber) -> FileCheck {
    if !path.exists() {
        return FileCheck::fail(format!("File does not exist: {}", path.display()));
    }
    if !path.is_file() {
        return FileCheck::fail(format!("Path is not a regular file: {}", path.display()));
    }
    let ext = extension_of(path);
    if !VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        return FileCheck::fail(format!(
            "Unsupported video extension '{}' (expected one of {})",
            ext,
            VIDEO_EXTENSIONS.join(", ")
        ));
    }
    let probe = match prober.probe_video(path) {
        Ok(probe) => probe,
        Err(e) => return FileCheck::fail(format!("Cannot open video file: {e}")),
    };
    debug!("video probe of {}: {:?}", path.display(), probe.container);
    if !probe.has_media_data {
        return FileCheck::fail("Video container holds no decodable media data".to_string());
    }
    if let Some(frame) = &probe.first_frame {
        if frame.is_empty() {
            return FileCheck::fail("Decoded first video frame is empty".to_string());
        }
    }
    FileCheck::pass(format!("Video file is valid ({} container)", probe.container))
}

/// Validate an audio file path ahead of analysis.
pub fn validate_audio_file(path: &Path, prober: &dyn MediaProber) -> FileCheck {
    if !path.exists() {
        return FileCheck::fail(format!("File does not exist: {}", path.display()));
    }
    if !path.is_file() {
        return FileCheck::fail(format!("Path is not a regular file: {}", path.display()));
    }
    let ext = extension_of(path);
    if !AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        return FileCheck::fail(format!(
            "Unsupported audio extension '{}' (expected one of {})",
            ext,
            AUDIO_EXTENSIONS.join(", ")
        ));
    }
    let probe = match prober.probe_audio(path) {
        Ok(probe) => probe,
        Err(e) => return FileCheck::fail(format!("Cannot open audio file: {e}")),
    };
    debug!("audio probe of {}: {:?}", path.display(), probe.format);
    if let Some(samples) = &probe.samples {
        if samples.is_empty() {
            return FileCheck::fail("Audio stream is empty".to_string());
        }
    }
    if let Some(rate) = probe.sample_rate {
        if rate == 0 {
            return FileCheck::fail("Audio sample rate is invalid (0 Hz)".to_string());
        }
    }
    if let Some(samples) = &probe.samples {
        if samples.iter().all(|s| *s == 0.0) {
            return FileCheck::fail("Audio stream contains only silence".to_string());
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return FileCheck::fail(
                "Audio contains invalid sample values (NaN or infinite)".to_string(),
            );
        }
    }
    FileCheck::pass(format!("Audio file is valid ({} format)", probe.format))
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Default prober: container signatures plus minimal structure, and full
/// WAV decoding for audio sanity checks. Never decodes video frames.
#[derive(Debug, Clone, Default)]
pub struct SignatureProber;

impl SignatureProber {
    pub fn new() -> Self {
        Self
    }
}

impl MediaProber for SignatureProber {
    fn probe_video(&self, path: &Path) -> CoreResult<VideoProbe> {
        let mut file = File::open(path)?;
        let mut header = [0u8; 12];
        let read = file.read(&mut header)?;
        if read < 12 {
            return Err(CoreError::MediaFile(
                "file too short for a container header".to_string(),
            ));
        }

        if &header[0..4] == b"RIFF" && &header[8..12] == b"AVI " {
            let has_movi = scan_for_marker(&mut file, b"movi")?;
            return Ok(VideoProbe {
                container: "avi".to_string(),
                has_media_data: has_movi,
                first_frame: None,
            });
        }
        if header[0..4] == [0x1A, 0x45, 0xDF, 0xA3] {
            // EBML header; clusters carry the actual media blocks.
            let has_cluster = scan_for_marker(&mut file, &[0x1F, 0x43, 0xB6, 0x75])?;
            return Ok(VideoProbe {
                container: "matroska".to_string(),
                has_media_data: has_cluster,
                first_frame: None,
            });
        }
        if &header[4..8] == b"ftyp" {
            let (has_moov, has_mdat) = walk_mp4_boxes(&mut file)?;
            return Ok(VideoProbe {
                container: "mp4".to_string(),
                has_media_data: has_moov && has_mdat,
                first_frame: None,
            });
        }
        Err(CoreError::MediaFile(
            "unrecognized video container signature".to_string(),
        ))
    }

    fn probe_audio(&self, path: &Path) -> CoreResult<AudioProbe> {
        if extension_of(path) == "wav" {
            return probe_wav(path);
        }

        let mut file = File::open(path)?;
        let mut header = [0u8; 12];
        let read = file.read(&mut header)?;
        if read < 4 {
            return Err(CoreError::MediaFile(
                "file too short for an audio header".to_string(),
            ));
        }

        let format = if &header[0..3] == b"ID3" || (header[0] == 0xFF && header[1] & 0xE0 == 0xE0)
        {
            "mp3"
        } else if &header[0..4] == b"fLaC" {
            "flac"
        } else if &header[0..4] == b"OggS" {
            "ogg"
        } else {
            return Err(CoreError::MediaFile(
                "unrecognized audio container signature".to_string(),
            ));
        };
        Ok(AudioProbe {
            format: format.to_string(),
            sample_rate: None,
            samples: None,
        })
    }
}

/// Decode a WAV file into mono-folded f32 samples.
fn probe_wav(path: &Path) -> CoreResult<AudioProbe> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| CoreError::MediaFile(format!("WAV header unreadable: {e}")))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| CoreError::MediaFile(format!("WAV samples unreadable: {e}")))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| CoreError::MediaFile(format!("WAV samples unreadable: {e}")))?
        }
    };

    Ok(AudioProbe {
        format: "wav".to_string(),
        sample_rate: Some(spec.sample_rate),
        samples: Some(samples),
    })
}

/// Scan the head of a file for a byte marker.
fn scan_for_marker(file: &mut File, marker: &[u8]) -> CoreResult<bool> {
    file.seek(SeekFrom::Start(0))?;
    let mut buffer = vec![0u8; STRUCTURE_SCAN_LIMIT];
    let read = file.read(&mut buffer)?;
    Ok(buffer[..read]
        .windows(marker.len())
        .any(|window| window == marker))
}

/// Walk top-level MP4 boxes and report whether `moov` and `mdat` exist.
fn walk_mp4_boxes(file: &mut File) -> CoreResult<(bool, bool)> {
    let file_len = file.metadata()?.len();
    file.seek(SeekFrom::Start(0))?;

    let mut offset = 0u64;
    let mut has_moov = false;
    let mut has_mdat = false;
    for _ in 0..MAX_BOX_WALK {
        if offset + 8 > file_len {
            break;
        }
        file.seek(SeekFrom::Start(offset))?;
        let mut box_header = [0u8; 8];
        file.read_exact(&mut box_header)?;
        let size = u32::from_be_bytes([box_header[0], box_header[1], box_header[2], box_header[3]])
            as u64;
        let box_type = &box_header[4..8];
        match box_type {
            b"moov" => has_moov = true,
            b"mdat" => has_mdat = true,
            _ => {}
        }
        let advance = match size {
            0 => break, // box extends to end of file
            1 => {
                // 64-bit size follows the header
                let mut large = [0u8; 8];
                file.read_exact(&mut large)?;
                u64::from_be_bytes(large)
            }
            _ => size,
        };
        if advance < 8 {
            return Err(CoreError::MediaFile("malformed MP4 box size".to_string()));
        }
        offset += advance;
    }
    Ok((has_moov, has_mdat))
}
