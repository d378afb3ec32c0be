use std::fs;
use std::path::Path;

use tempfile::tempdir;

use gavel_core::probe::{AudioProbe, VideoProbe};
use gavel_core::{CoreResult, Frame, MediaProber, QualityValidator, ValidatorConfig};

fn write_wav_i16(path: &Path, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &sample in samples {
        writer.write_sample(sample).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

fn write_wav_f32(path: &Path, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &sample in samples {
        writer.write_sample(sample).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

#[test]
fn missing_file_is_reported() {
    let validator = QualityValidator::default();
    let check = validator.validate_video_file("no/such/clip.mp4");
    assert!(!check.is_valid);
    assert!(check.message.contains("does not exist"));

    let (is_valid, message) = validator.validate_audio_file("no/such/take.wav").into_tuple();
    assert!(!is_valid);
    assert!(message.contains("does not exist"));
}

#[test]
fn directory_is_not_a_file() {
    let dir = tempdir().unwrap();
    let fake = dir.path().join("clip.mp4");
    fs::create_dir(&fake).unwrap();

    let check = QualityValidator::default().validate_video_file(&fake);
    assert!(!check.is_valid);
    assert!(check.message.contains("not a regular file"));
}

#[test]
fn unsupported_extensions_are_rejected() {
    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "hello").unwrap();

    let validator = QualityValidator::default();
    let video = validator.validate_video_file(&notes);
    assert!(!video.is_valid);
    assert!(video.message.contains("Unsupported video extension"));

    let audio = validator.validate_audio_file(&notes);
    assert!(!audio.is_valid);
    assert!(audio.message.contains("Unsupported audio extension"));
}

#[test]
fn all_zero_wav_reports_only_silence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    write_wav_i16(&path, &vec![0i16; 48_000]);

    let check = QualityValidator::default().validate_audio_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("only silence"), "{}", check.message);
}

#[test]
fn tone_wav_passes_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    let samples: Vec<i16> = (0..48_000)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48_000.0;
            (phase.sin() * 20_000.0) as i16
        })
        .collect();
    write_wav_i16(&path, &samples);

    let check = QualityValidator::default().validate_audio_file(&path);
    assert!(check.is_valid, "{}", check.message);
    assert!(check.message.contains("valid"));
}

#[test]
fn nan_samples_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.wav");
    let mut samples = vec![0.5f32; 4_800];
    samples[1_000] = f32::NAN;
    write_wav_f32(&path, &samples);

    let check = QualityValidator::default().validate_audio_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("invalid sample values"));
}

#[test]
fn empty_wav_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.wav");
    write_wav_i16(&path, &[]);

    let check = QualityValidator::default().validate_audio_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("empty"));
}

#[test]
fn garbage_audio_cannot_be_opened() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.wav");
    fs::write(&path, b"definitely not a wav file").unwrap();

    let check = QualityValidator::default().validate_audio_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("Cannot open audio file"));
}

/// Minimal MP4: an ftyp box, a moov box, and an mdat box with one byte of
/// payload.
fn minimal_mp4(include_mdat: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&16u32.to_be_bytes());
    bytes.extend_from_slice(b"ftypisom");
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&8u32.to_be_bytes());
    bytes.extend_from_slice(b"moov");
    if include_mdat {
        bytes.extend_from_slice(&9u32.to_be_bytes());
        bytes.extend_from_slice(b"mdat");
        bytes.push(0xAA);
    }
    bytes
}

#[test]
fn structured_mp4_passes_signature_probe() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    fs::write(&path, minimal_mp4(true)).unwrap();

    let check = QualityValidator::default().validate_video_file(&path);
    assert!(check.is_valid, "{}", check.message);
    assert!(check.message.contains("mp4"));
}

#[test]
fn mp4_without_media_data_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hollow.mp4");
    fs::write(&path, minimal_mp4(false)).unwrap();

    let check = QualityValidator::default().validate_video_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("no decodable media data"));
}

#[test]
fn matroska_needs_a_cluster() {
    let dir = tempdir().unwrap();

    let hollow = dir.path().join("hollow.mkv");
    let mut bytes = vec![0x1A, 0x45, 0xDF, 0xA3];
    bytes.extend_from_slice(&[0u8; 64]);
    fs::write(&hollow, &bytes).unwrap();
    let check = QualityValidator::default().validate_video_file(&hollow);
    assert!(!check.is_valid);

    let clustered = dir.path().join("clip.mkv");
    bytes.extend_from_slice(&[0x1F, 0x43, 0xB6, 0x75]);
    bytes.extend_from_slice(&[0u8; 32]);
    fs::write(&clustered, &bytes).unwrap();
    let check = QualityValidator::default().validate_video_file(&clustered);
    assert!(check.is_valid, "{}", check.message);
}

#[test]
fn garbage_video_cannot_be_opened() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mp4");
    fs::write(&path, b"this is not an mp4 container at all").unwrap();

    let check = QualityValidator::default().validate_video_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("Cannot open video file"));
}

// --- Decoder-backed prober behavior, exercised through stubs ---

struct StubProber {
    sample_rate: Option<u32>,
    samples: Option<Vec<f32>>,
    empty_first_frame: bool,
}

impl MediaProber for StubProber {
    fn probe_video(&self, _path: &Path) -> CoreResult<VideoProbe> {
        let first_frame = if self.empty_first_frame {
            Some(Frame::gray(0, 0, Vec::new()).expect("empty frame"))
        } else {
            None
        };
        Ok(VideoProbe {
            container: "mp4".to_string(),
            has_media_data: true,
            first_frame,
        })
    }

    fn probe_audio(&self, _path: &Path) -> CoreResult<AudioProbe> {
        Ok(AudioProbe {
            format: "wav".to_string(),
            sample_rate: self.sample_rate,
            samples: self.samples.clone(),
        })
    }
}

fn stub_validator(prober: StubProber) -> QualityValidator {
    QualityValidator::with_prober(ValidatorConfig::default(), Box::new(prober))
}

#[test]
fn zero_sample_rate_from_decoder_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("take.wav");
    fs::write(&path, b"placeholder").unwrap();

    let validator = stub_validator(StubProber {
        sample_rate: Some(0),
        samples: Some(vec![0.5; 100]),
        empty_first_frame: false,
    });
    let check = validator.validate_audio_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("sample rate is invalid"));
}

#[test]
fn empty_decoded_frame_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    fs::write(&path, b"placeholder").unwrap();

    let validator = stub_validator(StubProber {
        sample_rate: None,
        samples: None,
        empty_first_frame: true,
    });
    let check = validator.validate_video_file(&path);
    assert!(!check.is_valid);
    assert!(check.message.contains("first video frame is empty"));
}
