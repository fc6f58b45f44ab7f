//! Heading display
//!
//! Connects to the IMU on demand and rotates an arrow to the reported heading.

mod app;
mod arrow;

use app::HeadingApp;
use clap::Parser;
use serial_imu_heading::ConnectionArgs;

#[derive(Parser, Debug)]
#[command(name = "heading-display")]
#[command(about = "Rotate an arrow to the heading reported by a serial IMU", long_about = None)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,
}

fn main() -> eframe::Result<()> {
    serial_imu_heading::init_logging();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 520.0])
            .with_min_inner_size([240.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Heading",
        options,
        Box::new(move |cc| Ok(Box::new(HeadingApp::new(cc, args.connection.into())))),
    )
}
