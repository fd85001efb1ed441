// Integration tests for downloading recordings to disk
//
// These tests verify that finished artifacts are written to the download
// directory under date-derived names, without overwriting earlier downloads.

use anyhow::Result;
use cam_recorder::{
    DirectorySaveTarget, ExportGateway, RecorderConfig, RecordingArtifact, RecordingState,
    SyntheticCamera, SyntheticEncoderFactory, VideoRecorder,
};
use chrono::{Local, TimeZone};
use std::fs;
use tempfile::TempDir;
use tokio::time::{sleep, Duration};

#[tokio::test]
async fn test_export_writes_artifact_bytes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let gateway = ExportGateway::new(
        Box::new(DirectorySaveTarget::new(temp_dir.path())),
        "recording",
    );
    let artifact = RecordingArtifact::new(vec![7u8; 500], "video/webm");
    let now = Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();

    let receipt = gateway.export_at(&artifact, &now).await?;

    assert_eq!(receipt.file_name, "recording-2026-10-19_09-30-00.webm");
    assert_eq!(receipt.location, temp_dir.path().join(&receipt.file_name));
    assert_eq!(receipt.bytes, 500);
    assert_eq!(fs::read(&receipt.location)?, vec![7u8; 500]);

    Ok(())
}

#[tokio::test]
async fn test_export_does_not_overwrite_previous_download() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let gateway = ExportGateway::new(
        Box::new(DirectorySaveTarget::new(temp_dir.path())),
        "recording",
    );
    let now = Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();

    let first = gateway
        .export_at(&RecordingArtifact::new(vec![1u8], "video/webm"), &now)
        .await?;
    let second = gateway
        .export_at(&RecordingArtifact::new(vec![2u8], "video/webm"), &now)
        .await?;
    let third = gateway
        .export_at(&RecordingArtifact::new(vec![3u8], "video/webm"), &now)
        .await?;

    assert_eq!(
        second.location,
        temp_dir.path().join("recording-2026-10-19_09-30-00 (1).webm")
    );
    assert_eq!(
        third.location,
        temp_dir.path().join("recording-2026-10-19_09-30-00 (2).webm")
    );
    assert_eq!(fs::read(&first.location)?, vec![1u8]);
    assert_eq!(fs::read(&second.location)?, vec![2u8]);

    Ok(())
}

#[tokio::test]
async fn test_export_creates_missing_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let nested = temp_dir.path().join("downloads").join("camera");
    let gateway = ExportGateway::new(Box::new(DirectorySaveTarget::new(&nested)), "clip");

    let receipt = gateway
        .export(&RecordingArtifact::new(vec![0u8; 16], "video/webm"))
        .await?;

    assert!(receipt.location.starts_with(&nested));
    assert!(receipt.file_name.starts_with("clip-"));
    assert!(receipt.file_name.ends_with(".webm"));

    Ok(())
}

#[tokio::test]
async fn test_synthetic_session_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = RecorderConfig::default();
    config.export.output_dir = temp_dir.path().to_path_buf();

    let mut recorder = VideoRecorder::new(
        &config,
        Box::new(SyntheticCamera::new()),
        Box::new(SyntheticEncoderFactory {
            bytes_per_second: 1000,
        }),
        Box::new(DirectorySaveTarget::new(config.export.output_dir.clone())),
    );

    recorder.setup_camera().await?;
    recorder.start_recording().await?;
    sleep(Duration::from_millis(50)).await;
    assert_eq!(recorder.stop_recording()?, RecordingState::Stopped);

    assert_eq!(recorder.flush().await, 1);
    let status = recorder.status();
    assert!(status.is_downloadable);
    assert_eq!(status.elapsed_seconds, 0);

    let receipt = recorder.download_artifact().await?;
    let written = fs::read(&receipt.location)?;
    assert_eq!(&written[..4], &[0x1A, 0x45, 0xDF, 0xA3]);
    assert_eq!(written.len(), receipt.bytes);
    assert_eq!(receipt.media_type, "video/webm");

    recorder.shutdown();
    Ok(())
}
