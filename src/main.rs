//! Heading reader - prints IMU headings to the console
//!
//! Usage:
//!   heading-reader --port /dev/ttyUSB0 --baudrate 38400 --mode 1

use clap::Parser;
use serial_imu_heading::{
    heading_bar, init_logging, ConnectionArgs, ConnectionParameters, ImuError, RateMeter,
    SensorBinding, SerialImu, StopSignal, StreamControl,
};

#[derive(Parser, Debug)]
#[command(name = "heading-reader")]
#[command(about = "Print headings from a serial MPU6050 IMU", long_about = None)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Width of the heading bar in characters
    #[arg(long, default_value_t = 40)]
    bar_width: usize,

    /// Print only the summary on exit
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();
    let params: ConnectionParameters = args.connection.into();

    println!("IMU Heading Reader");
    println!("==================");
    println!("Port: {}", params);
    println!();

    let mut imu = SerialImu::new();
    if let Err(e) = imu.initialize(&params) {
        eprintln!("Error: IMU connection failed: {}", e);
        if let ImuError::SerialOpen { .. } = e {
            eprintln!("Please check:");
            eprintln!("  1. The IMU is connected and powered");
            eprintln!("  2. The port name is correct (--port)");
            eprintln!("  3. No other application is using the port");
        }
        return Err(Box::new(e));
    }

    // Setup Ctrl+C handler
    let stop = StopSignal::new();
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C, stopping...");
        stop_handler.stop();
    })?;

    println!("Connected! Press Ctrl+C to stop\n");

    let mut meter = RateMeter::new();
    let quiet = args.quiet;
    let bar_width = args.bar_width;
    let result = imu.subscribe(&stop, &mut |heading| {
        meter.tick();
        if !quiet {
            println!(
                "IMU direction: {:8.2}°  [{}]",
                heading,
                heading_bar(heading, bar_width)
            );
        }
        StreamControl::Continue
    });

    imu.finalize();

    match result {
        Ok(count) => {
            println!("\nStopped.");
            println!("Total headings: {}", count);
            println!("Elapsed time: {:.2} seconds", meter.elapsed().as_secs_f64());
            println!("Average rate: {:.1} Hz", meter.rate_hz());
            Ok(())
        }
        Err(e) => {
            eprintln!("\nError while streaming: {}", e);
            Err(Box::new(e))
        }
    }
}
