// Test doubles shared by the integration tests
#![allow(dead_code)]

use capslock_mute::constants::LED_HELPER_NAME;
use capslock_mute::error::CoreError;
use capslock_mute::interception::{
    Disposition, EventPoster, GestureEngine, HookInstaller, ShortcutDispatcher, TapEvent,
    TapHandle,
};
use capslock_mute::led::{HelperLauncher, HelperLocator, LedController};
use capslock_mute::permissions::{PollScheduler, PollTimer, TrustQuery};
use capslock_mute::settings::{InMemoryBackend, Settings};
use capslock_mute::shortcuts::ModifierSet;
use capslock_mute::ui::Notifier;
use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub const PROXY: i64 = 0x4F;
pub const WINDOW: Duration = Duration::from_millis(300);

/// Unique scratch directory under the system temp dir
pub fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tid = format!("{:?}", std::thread::current().id());
    let dir = std::env::temp_dir()
        .join("capslock_mute_tests")
        .join(format!("{label}_{nanos}_{}", tid.replace(['(', ')'], "")));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// An empty file standing in for the LED helper binary
pub fn fake_helper() -> PathBuf {
    let path = temp_dir("helper").join(LED_HELPER_NAME);
    fs::write(&path, "").unwrap();
    path
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

struct Slot {
    tick: RefCell<Option<Box<dyn FnMut()>>>,
    cancelled: Cell<bool>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    slots: Rc<RefCell<Vec<Rc<Slot>>>>,
}

impl ManualScheduler {
    /// Run one tick of every live timer
    pub fn fire(&self) {
        let slots: Vec<Rc<Slot>> = self.slots.borrow().clone();
        for slot in slots {
            if slot.cancelled.get() {
                continue;
            }
            let Some(mut tick) = slot.tick.borrow_mut().take() else {
                continue;
            };
            tick();
            if !slot.cancelled.get() {
                *slot.tick.borrow_mut() = Some(tick);
            }
        }
    }

    pub fn scheduled_count(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn active_count(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|slot| !slot.cancelled.get())
            .count()
    }
}

struct ManualTimer {
    slot: Rc<Slot>,
}

impl PollTimer for ManualTimer {
    fn cancel(self: Box<Self>) {
        self.slot.cancelled.set(true);
    }
}

impl PollScheduler for ManualScheduler {
    fn schedule_repeating(&self, _interval: Duration, tick: Box<dyn FnMut()>) -> Box<dyn PollTimer> {
        let slot = Rc::new(Slot {
            tick: RefCell::new(Some(tick)),
            cancelled: Cell::new(false),
        });
        self.slots.borrow_mut().push(Rc::clone(&slot));
        Box::new(ManualTimer { slot })
    }
}

// ---------------------------------------------------------------------------
// Trust
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct SwitchableTrust {
    trusted: Rc<Cell<bool>>,
    prompts: Rc<RefCell<Vec<bool>>>,
}

impl SwitchableTrust {
    pub fn new(trusted: bool) -> Self {
        let trust = Self::default();
        trust.set(trusted);
        trust
    }

    pub fn set(&self, trusted: bool) {
        self.trusted.set(trusted);
    }

    /// The `prompt` flag of every query so far
    pub fn prompts(&self) -> Vec<bool> {
        self.prompts.borrow().clone()
    }
}

impl TrustQuery for SwitchableTrust {
    fn is_trusted(&self, prompt: bool) -> bool {
        self.prompts.borrow_mut().push(prompt);
        self.trusted.get()
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub alerts: Rc<RefCell<Vec<(String, Vec<String>)>>>,
    pub banners: Rc<RefCell<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn alert(&self, title: &str, _body: &str, buttons: &[&str]) {
        self.alerts.borrow_mut().push((
            title.to_string(),
            buttons.iter().map(|b| b.to_string()).collect(),
        ));
    }

    fn banner(&self, title: &str, _body: &str) {
        self.banners.borrow_mut().push(title.to_string());
    }
}

// ---------------------------------------------------------------------------
// Hook installer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InstallerState {
    pub attempts: Cell<usize>,
    pub installs: Cell<usize>,
    pub live: Cell<usize>,
    pub fail_next: Cell<bool>,
    engine: RefCell<Option<Rc<RefCell<GestureEngine>>>>,
}

#[derive(Clone, Default)]
pub struct CountingInstaller {
    pub state: Rc<InstallerState>,
}

impl CountingInstaller {
    /// Deliver an event through the live tap, as the system would
    pub fn deliver(&self, event: TapEvent, now: Instant) -> Option<Disposition> {
        let engine = self.state.engine.borrow().clone()?;
        let disposition = engine.borrow_mut().handle(event, now);
        Some(disposition)
    }
}

struct CountingTap {
    state: Rc<InstallerState>,
}

impl TapHandle for CountingTap {
    fn remove(self: Box<Self>) {
        self.state.live.set(self.state.live.get() - 1);
        self.state.engine.borrow_mut().take();
    }
}

impl HookInstaller for CountingInstaller {
    fn install(
        &mut self,
        engine: Rc<RefCell<GestureEngine>>,
    ) -> Result<Box<dyn TapHandle>, CoreError> {
        self.state.attempts.set(self.state.attempts.get() + 1);
        if self.state.fail_next.replace(false) {
            return Err(CoreError::HookInstallFailed("simulated".to_string()));
        }

        self.state.installs.set(self.state.installs.get() + 1);
        self.state.live.set(self.state.live.get() + 1);
        *self.state.engine.borrow_mut() = Some(engine);
        Ok(Box::new(CountingTap {
            state: Rc::clone(&self.state),
        }))
    }
}

// ---------------------------------------------------------------------------
// Event poster and LED helper
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingPoster {
    pub posted: Rc<RefCell<Vec<(u16, bool, ModifierSet)>>>,
}

impl RecordingPoster {
    pub fn posted(&self) -> Vec<(u16, bool, ModifierSet)> {
        self.posted.borrow().clone()
    }

    /// Number of complete down+up chords
    pub fn chords(&self) -> usize {
        self.posted.borrow().iter().filter(|(_, down, _)| !down).count()
    }
}

impl EventPoster for RecordingPoster {
    fn post_key(
        &self,
        keycode: u16,
        key_down: bool,
        modifiers: ModifierSet,
    ) -> Result<(), CoreError> {
        self.posted.borrow_mut().push((keycode, key_down, modifiers));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingLauncher {
    pub args: Rc<RefCell<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn args(&self) -> Vec<String> {
        self.args.borrow().clone()
    }
}

impl HelperLauncher for RecordingLauncher {
    fn launch(&self, _program: &Path, arg: &str) -> io::Result<()> {
        self.args.borrow_mut().push(arg.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct EngineFixture {
    pub engine: GestureEngine,
    pub poster: RecordingPoster,
    pub launcher: RecordingLauncher,
}

pub fn engine_with_settings(settings: Settings) -> EngineFixture {
    let poster = RecordingPoster::default();
    let launcher = RecordingLauncher::default();
    let led = LedController::new(HelperLocator::new(vec![fake_helper()]), launcher.clone());
    let engine = GestureEngine::new(
        PROXY,
        WINDOW,
        led,
        ShortcutDispatcher::new(poster.clone()),
        settings,
    );

    EngineFixture {
        engine,
        poster,
        launcher,
    }
}

pub fn engine() -> EngineFixture {
    engine_with_settings(Settings::new(InMemoryBackend::new()))
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
