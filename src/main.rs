mod button;
mod gui;
mod hotkeys;
mod palette;
mod playback;
mod profile;
mod recorder;
mod settings;
mod storage;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::gui::PadboardApp;

// ========================================================================
// LOGGING
// ========================================================================
//    Console plus a daily file in the data dir; RUST_LOG overrides the
//    default filter

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("padboard=info"));

    let file_appender = tracing_appender::rolling::daily(storage::logs_dir(), "padboard.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    println!("=== Padboard - Desktop Soundboard ===\n");

    if let Err(e) = storage::ensure_dirs() {
        eprintln!("[Main] Could not create data directories: {}", e);
    }

    // Keep the guard alive or the file writer shuts down early
    let _log_guard = init_logging();
    info!("[Main] Padboard v{} starting", env!("CARGO_PKG_VERSION"));
    info!("[Main] Data dir: {}", storage::data_dir().display());

    let viewport = egui::ViewportBuilder::default()
        .with_title("Padboard")
        .with_inner_size([985.0, 570.0])
        .with_min_inner_size([985.0, 220.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    // Blocks until the window closes
    let result = eframe::run_native(
        "Padboard",
        options,
        Box::new(|cc| {
            gui::theme::apply(&cc.egui_ctx);
            Ok(Box::new(PadboardApp::new()))
        }),
    );

    info!("[Main] Shutdown complete");
    result
}
