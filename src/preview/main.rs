// This is free and unencumbered software released into the public domain.

#[cfg(not(feature = "std"))]
compile_error!("asimov-camera-preview requires the 'std' feature");

use asimov_camera_preview::{
    cli::{self, info_user, parse_dimensions, parse_rotation, warn_user},
    shared::{
        CameraError, CameraEvent, ConnectOutcome, DeviceSelectionPolicy, DeviceState, FallbackPolicy,
        PermissionStatus, PreviewConfig, PreviewController, PreviewHost, Rotation, Selection,
        Size, SizeMatch, SystemUiFlags, select,
    },
};
use asimov_module::SysexitsError::{self, *};
use clap::Parser;
use clientele::StandardOptions;
use serde_json::json;
use std::{
    error::Error as StdError,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

#[derive(Debug, Parser)]
struct Options {
    #[clap(flatten)]
    flags: StandardOptions,

    /// Camera input: a device catalog (`catalog:PATH`, `PATH.json`) or empty for the platform camera.
    #[arg(value_name = "INPUT", default_value = "")]
    input: String,

    /// Use this device id instead of the first rear-facing one.
    #[arg(long)]
    device: Option<String>,

    /// Size of the preview surface.
    #[arg(short, long = "size", value_parser = parse_dimensions, default_value = "1080x1920")]
    size: Size,

    /// Display rotation in degrees.
    #[arg(short, long, value_parser = parse_rotation, default_value = "0")]
    rotation: Rotation,

    #[arg(long, value_enum, default_value = "first")]
    policy: PolicyArg,

    #[arg(long, value_enum, default_value = "closest")]
    fallback: FallbackArg,

    /// Open the selected camera and keep it open until interrupted.
    #[arg(long)]
    open: bool,

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
enum PolicyArg {
    First,
    Last,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum FallbackArg {
    Closest,
    First,
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

    let exit_code = match run_preview(&options) {
        Ok(()) => EX_OK,
        Err(err) => cli::handle_error(&err, &options.flags),
    };

    Ok(exit_code)
}

fn run_preview(opts: &Options) -> Result<(), CameraError> {
    let driver = cli::open_driver(&opts.flags, &opts.input)?;
    let config = preview_config(opts);

    if !opts.open {
        let devices = driver.devices()?;
        let selection = select(&devices, opts.rotation, opts.size, &config)?;
        print_selection(opts, &selection);
        return Ok(());
    }

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit2 = Arc::clone(&quit);
        ctrlc::set_handler(move || {
            quit2.store(true, Ordering::SeqCst);
        })
        .map_err(|e| CameraError::other(format!("{e}")))?;
    }

    let host = ConsoleHost {
        debug: opts.flags.debug,
        rotation: opts.rotation,
    };
    let mut preview = PreviewController::new(driver, host, config);
    preview.on_window_focus_changed(true);

    let outcome = preview.on_resume(Some(opts.size))?;
    if let Some(selection) = preview.selection() {
        print_selection(opts, selection);
    }
    if outcome == Some(ConnectOutcome::PermissionRequested) {
        return Err(CameraError::PermissionDenied);
    }

    info_user(&opts.flags, "camera open requested; press Ctrl-C to stop");
    let mut result = Ok(());
    while !quit.load(Ordering::SeqCst) {
        match preview.wait_event(Duration::from_millis(200)) {
            Some(CameraEvent::Disconnected { .. }) if preview.state() == &DeviceState::Idle => {
                result = Err(CameraError::Closed);
                break;
            },
            Some(CameraEvent::Error { code, .. }) if preview.state() == &DeviceState::Idle => {
                result = Err(CameraError::other(format!("camera device error {code}")));
                break;
            },
            _ => {},
        }
    }

    preview.on_pause()?;
    result
}

fn preview_config(opts: &Options) -> PreviewConfig {
    let mut config = PreviewConfig::new()
        .with_selection_policy(match opts.policy {
            PolicyArg::First => DeviceSelectionPolicy::FirstMatch,
            PolicyArg::Last => DeviceSelectionPolicy::LastMatch,
        })
        .with_fallback_policy(match opts.fallback {
            FallbackArg::Closest => FallbackPolicy::ClosestAspectRatio,
            FallbackArg::First => FallbackPolicy::FirstCandidate,
        });
    if let Some(device) = opts.device.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config = config.with_device(device);
    }
    config
}

fn print_selection(opts: &Options, selection: &Selection) {
    let fallback = match selection.size_match {
        SizeMatch::Exact => None,
        SizeMatch::Fallback(FallbackPolicy::ClosestAspectRatio) => Some("closest"),
        SizeMatch::Fallback(FallbackPolicy::FirstCandidate) => Some("first"),
    };

    if let Some(policy) = fallback {
        warn_user(
            &opts.flags,
            &format!("no output size matches {}; fell back to {policy}", opts.size),
        );
    }

    match opts.output {
        OutputFormat::Text => {
            println!(
                "{}: {} rotation={} {}",
                selection.device_id,
                selection.preview_size,
                selection.total_rotation,
                fallback.map_or("exact".to_string(), |p| format!("fallback={p}")),
            );
        },
        OutputFormat::Jsonl => {
            println!(
                "{}",
                json!({
                    "device": selection.device_id,
                    "width": selection.preview_size.width,
                    "height": selection.preview_size.height,
                    "total_rotation": selection.total_rotation,
                    "fallback": fallback,
                })
            );
        },
    }
}

/// A desktop stand-in for the activity: permission is implicit and notices
/// go to stderr.
struct ConsoleHost {
    debug: bool,
    rotation: Rotation,
}

impl PreviewHost for ConsoleHost {
    fn display_rotation(&self) -> Rotation {
        self.rotation
    }

    fn api_level(&self) -> u32 {
        0
    }

    fn camera_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn request_camera_permission(&self, _request_code: i32) {}

    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }

    fn set_system_ui_visibility(&self, flags: SystemUiFlags) {
        if self.debug {
            eprintln!("DEBUG: system UI visibility {:#06x}", flags.bits());
        }
    }
}
