use anyhow::Result;
use cam_recorder::{
    DirectorySaveTarget, RecorderConfig, SyntheticCamera, SyntheticEncoderFactory, VideoRecorder,
};
use tokio::time::{sleep, Duration};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = RecorderConfig::load("config/cam-recorder")?;

    info!("cam-recorder v{}", env!("CARGO_PKG_VERSION"));
    info!("Recording format: {}", cfg.encoder.mime_type);
    info!("Downloads go to {}", cfg.export.output_dir.display());

    // Synthetic camera and encoder stand in for platform devices
    let mut recorder = VideoRecorder::new(
        &cfg,
        Box::new(SyntheticCamera::new()),
        Box::new(SyntheticEncoderFactory::default()),
        Box::new(DirectorySaveTarget::new(cfg.export.output_dir.clone())),
    );

    recorder.setup_camera().await?;
    recorder.start_recording().await?;

    sleep(Duration::from_millis(3200)).await;
    recorder.pause_recording()?;
    info!("Paused at {}s", recorder.elapsed_seconds());

    sleep(Duration::from_secs(2)).await;
    recorder.resume_recording()?;

    sleep(Duration::from_millis(2200)).await;
    if let Some(label) = recorder.status().recording_time_label() {
        info!("{}", label);
    }

    recorder.stop_recording()?;
    recorder.flush().await;

    let status = recorder.status();
    info!("Status: {}", serde_json::to_string(&status)?);

    let receipt = recorder.download_artifact().await?;
    info!(
        "Saved {} ({} bytes, {})",
        receipt.location.display(),
        receipt.bytes,
        receipt.media_type
    );

    recorder.shutdown();

    Ok(())
}
