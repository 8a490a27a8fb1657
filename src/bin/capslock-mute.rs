// CapslockMute - Caps Lock as a mute key for video calls
// Runs the background listener, or manages the selected shortcut

use anyhow::{Context, Result};
use capslock_mute::config::{parse_keycode, validate_double_press_ms, RuntimeConfig};
use capslock_mute::constants::{DOUBLE_PRESS_MAX_MS, DOUBLE_PRESS_MIN_MS, MAX_PROXY_KEYCODE};
use capslock_mute::selection::{self, format_shortcut_list};
use capslock_mute::settings::{Settings, TomlFileBackend};
use capslock_mute::shortcuts::MuteShortcut;
use clap::Parser;
use log::{info, warn};
use std::io;
use std::time::Duration;

/// Turn Caps Lock into a mute/unmute key for video calls
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Turn Caps Lock into a mute/unmute key for video calls",
    long_about = "Turn Caps Lock into a mute/unmute key for video calls.

Caps Lock must be remapped to F18 first, for example with:
  hidutil property --set '{\"UserKeyMapping\":[{\"HIDKeyboardModifierMappingSrc\":0x700000039,\"HIDKeyboardModifierMappingDst\":0x70000006D}]}'

GESTURES:
  Press Caps Lock once      Send the selected app's mute shortcut and toggle the LED
  Press Caps Lock twice     Toggle the LED only (resync it with the app's mute state)

SHORTCUTS:
  tandem    Cmd+Shift+M (default)
  zoom      Cmd+Shift+A
  meet      Cmd+D

The selected shortcut is stored in:
  ~/Library/Application Support/capslock-mute/settings.toml"
)]
struct Args {
    /// List the available mute shortcuts and mark the selected one
    #[arg(long)]
    list: bool,

    /// Persist the mute shortcut to send (tandem, zoom, meet)
    #[arg(long, value_name = "ID")]
    select: Option<MuteShortcut>,

    /// Double-press window in milliseconds (100-1000, overrides environment)
    #[arg(long, value_name = "MS")]
    double_press_ms: Option<u64>,

    /// Proxy keycode, decimal or 0x hex (0-127, overrides environment)
    #[arg(long, value_name = "KEYCODE")]
    proxy_keycode: Option<String>,
}

fn open_settings() -> Result<Settings> {
    let backend = TomlFileBackend::open_default().context("Failed to locate settings")?;
    Ok(Settings::new(backend))
}

fn list_shortcuts() -> Result<()> {
    let selected = open_settings()?.selected_shortcut();
    print!("{}", format_shortcut_list(selected));
    Ok(())
}

fn select_shortcut(shortcut: MuteShortcut) -> Result<()> {
    let mut settings = open_settings()?;
    let stdin = io::stdin();
    selection::select_shortcut(&mut settings, shortcut, &mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}

/// Runtime configuration: CLI flag > environment > built-in default
fn runtime_config(args: &Args) -> RuntimeConfig {
    let mut config = RuntimeConfig::from_env();

    if let Some(ms) = args.double_press_ms {
        match validate_double_press_ms(ms) {
            Some(ms) => {
                info!("Double-press window set via --double-press-ms: {}ms", ms);
                config.double_press_threshold = Duration::from_millis(ms);
            }
            None => warn!(
                "Invalid --double-press-ms value: {} (must be {}-{}). Ignoring.",
                ms, DOUBLE_PRESS_MIN_MS, DOUBLE_PRESS_MAX_MS
            ),
        }
    }

    if let Some(text) = &args.proxy_keycode {
        match parse_keycode(text) {
            Some(keycode) => {
                info!("Proxy keycode set via --proxy-keycode: {}", keycode);
                config.proxy_keycode = keycode;
            }
            None => warn!(
                "Invalid --proxy-keycode value: {:?} (must be 0-{}). Ignoring.",
                text, MAX_PROXY_KEYCODE
            ),
        }
    }

    config
}

#[cfg(target_os = "macos")]
fn run(config: RuntimeConfig) -> Result<()> {
    use capslock_mute::shutdown::ShutdownFlag;
    use capslock_mute::CapslockMuteCore;

    let shutdown = ShutdownFlag::new();
    shutdown.install_ctrlc_handler()?;

    let core = CapslockMuteCore::new(&config).context("Failed to initialize CapslockMute")?;

    // The tap and the permission poll are driven by the main run loop
    core.run(&shutdown);

    info!("Shutdown complete");
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run(_config: RuntimeConfig) -> Result<()> {
    anyhow::bail!("The CapslockMute listener only runs on macOS")
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if args.list {
        return list_shortcuts();
    }
    if let Some(shortcut) = args.select {
        return select_shortcut(shortcut);
    }

    info!("Starting CapslockMute {}", env!("CARGO_PKG_VERSION"));
    run(runtime_config(&args))
}
