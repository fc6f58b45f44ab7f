//! IMU monitor
//!
//! Main window with a log pane; connects to the IMU as soon as it is shown
//! and logs every heading it receives.

mod app;
mod log_pane;

use app::MonitorApp;
use clap::Parser;
use serial_imu_heading::ConnectionArgs;

#[derive(Parser, Debug)]
#[command(name = "imu-monitor")]
#[command(about = "Log headings from a serial IMU in a desktop window", long_about = None)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,
}

fn main() -> eframe::Result<()> {
    serial_imu_heading::init_logging();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_position([300.0, 300.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "IMU Monitor",
        options,
        Box::new(move |_cc| Ok(Box::new(MonitorApp::new(args.connection.into())))),
    )
}
