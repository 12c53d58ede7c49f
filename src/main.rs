use clap::Parser;
use env_logger::Env;
use log::info;

use calib_capture::backend::{select_backend, SysInfo};
use calib_capture::cli::{resolve_config, CaptureArgs};
use calib_capture::config::{compression_description, ConfigError};

/// Resolve and report the capture configuration.
///
/// The actual driver lives behind `capture::DeviceHandle`, so the binary's
/// job ends at a validated canonical configuration and the backend the
/// device would be opened with; a bad configuration never gets as far as a
/// partially-opened device.
fn run(args: &CaptureArgs) -> Result<(), ConfigError> {
    let config = resolve_config(args)?;
    let backend = select_backend(config.capture_mode(), &SysInfo::detect());

    info!("starting video capture: {}", config);
    info!("capture engine: {}", backend);

    if let Some(name) = config.name() {
        println!("name:        {}", name);
    }
    println!("source:      {}", config.video());
    println!("backend:     {}", backend);
    if let Some(resolution) = config.resolution() {
        println!("resolution:  {}", resolution);
    }
    if let Some(list) = config.resolutions() {
        let formatted: Vec<String> = list.iter().map(|r| r.to_string()).collect();
        println!("available:   {}", formatted.join(", "));
    }
    if let Some(fps) = config.fps() {
        println!("fps:         {}", fps);
    }
    if let Some(code) = config.compression() {
        match compression_description(code) {
            Some(desc) => println!("compression: {} ({})", code, desc),
            None => println!("compression: {}", code),
        }
    }
    if let Some(crop) = config.crop() {
        println!("crop:        {}", crop);
    }
    println!("threaded:    {}", config.threaded());

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = CaptureArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
