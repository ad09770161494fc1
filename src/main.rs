use anyhow::Result;
use chairside::audio::Recorder;
use chairside::config::ChairsideConfig;
use chairside::session::SessionDriver;
use chairside::ui::ChairsideApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chairside=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ChairsideConfig::from_env();
    info!("Starting Chairside, server: {}", config.server_url);

    let recorder = Recorder::new(Box::new(chairside::audio::CpalCapture::new()));
    let playback = Box::new(chairside::audio::CpalPlayback::new());
    let session = SessionDriver::spawn(config, recorder, playback)
        .map_err(|e| anyhow::anyhow!("Failed to start session driver: {}", e))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 640.0])
            .with_title("Chairside"),
        ..Default::default()
    };

    eframe::run_native(
        "Chairside",
        options,
        Box::new(|cc| Ok(Box::new(ChairsideApp::new(cc, session)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    Ok(())
}
