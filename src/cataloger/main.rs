// This is free and unencumbered software released into the public domain.

#[cfg(not(feature = "std"))]
compile_error!("asimov-camera-preview-cataloger requires the 'std' feature");

use asimov_camera_preview::{
    cli::{self, info_user, warn_user},
    shared::{CameraError, DeviceDescriptor},
};
use asimov_module::SysexitsError::{self, *};
use clap::Parser;
use clientele::StandardOptions;
use std::error::Error as StdError;

#[derive(Debug, Parser)]
struct Options {
    #[clap(flatten)]
    flags: StandardOptions,

    /// Camera input: a device catalog (`catalog:PATH`, `PATH.json`) or empty for the platform camera.
    #[arg(value_name = "INPUT", default_value = "")]
    input: String,

    #[arg(
        value_name = "FORMAT",
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text"
    )]
    output: OutputFormat,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Jsonl,
}

pub fn main() -> Result<SysexitsError, Box<dyn StdError>> {
    asimov_module::dotenv().ok();
    let args = asimov_module::args_os()?;
    let options = Options::parse_from(args);

    if options.flags.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(EX_OK);
    }

    if options.flags.license {
        print!("{}", include_str!("../../UNLICENSE"));
        return Ok(EX_OK);
    }

    #[cfg(feature = "tracing")]
    asimov_module::init_tracing_subscriber(&options.flags).expect("failed to initialize logging");

    let exit_code = match run_cataloger(&options) {
        Ok(()) => EX_OK,
        Err(err) => cli::handle_error(&err, &options.flags),
    };

    Ok(exit_code)
}

fn run_cataloger(options: &Options) -> Result<(), CameraError> {
    info_user(&options.flags, "enumerating camera devices");

    let driver = cli::open_driver(&options.flags, &options.input)?;
    let devices = driver.devices()?;
    if devices.is_empty() {
        warn_user(&options.flags, "no camera devices found");
        return Ok(());
    }

    // Enumeration order is significant for selection, so it is kept as is.
    for d in devices {
        match options.output {
            OutputFormat::Text => println!("{}", describe(&d)),
            OutputFormat::Jsonl => {
                let line = serde_json::to_string(&d)
                    .map_err(|e| CameraError::driver("serializing a device descriptor", e))?;
                println!("{line}");
            },
        }
    }

    Ok(())
}

fn describe(d: &DeviceDescriptor) -> String {
    let sizes = d
        .output_sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}: {} {}° [{}]", d.id, d.facing, d.sensor_orientation, sizes)
}
