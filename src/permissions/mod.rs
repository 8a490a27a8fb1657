//! Accessibility permission gate
//!
//! Interception needs the process to be trusted for accessibility. The gate
//! checks trust once with the system consent prompt; when it is missing it
//! shows a one-time alert and polls until the user grants it, then runs the
//! pending callback exactly once.

#[cfg(target_os = "macos")]
pub mod accessibility;
#[cfg(target_os = "macos")]
pub mod run_loop_timer;

use crate::error::CoreError;
use crate::ui::notifications::Notifier;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

pub const ALERT_TITLE: &str = "Accessibility Permission Required";
pub const ALERT_BODY: &str = "CapslockMute needs accessibility access to detect Caps Lock presses.

Open System Settings \u{2192} Privacy & Security \u{2192} Accessibility and enable CapslockMute. Interception starts automatically once access is granted.";
pub const ALERT_BUTTONS: [&str; 2] = ["Open System Settings", "Later"];

pub const GRANTED_TITLE: &str = "CapslockMute is active";
pub const GRANTED_BODY: &str = "Accessibility access granted. Caps Lock now toggles mute.";

/// Accessibility trust query
pub trait TrustQuery {
    /// `prompt` asks the system to show its consent prompt when untrusted
    fn is_trusted(&self, prompt: bool) -> bool;
}

/// A scheduled repeating callback
pub trait PollTimer {
    /// Stop the timer; its callback never runs afterwards
    fn cancel(self: Box<Self>);
}

/// Schedules repeating callbacks on the thread that runs the event loop
pub trait PollScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: Box<dyn FnMut()>)
        -> Box<dyn PollTimer>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Unchecked,
    AwaitingGrant,
    /// Terminal: trust was observed and the callback has run
    Active,
}

struct GateState {
    status: GateStatus,
    alert_shown: bool,
    poll_timer: Option<Box<dyn PollTimer>>,
    on_granted: Option<Box<dyn FnOnce()>>,
}

/// Trust check plus grant polling
///
/// Cloning yields another handle to the same gate.
#[derive(Clone)]
pub struct PermissionGate {
    state: Rc<RefCell<GateState>>,
    trust: Rc<dyn TrustQuery>,
    scheduler: Rc<dyn PollScheduler>,
    notifier: Rc<dyn Notifier>,
    poll_interval: Duration,
}

impl PermissionGate {
    pub fn new(
        trust: impl TrustQuery + 'static,
        scheduler: impl PollScheduler + 'static,
        notifier: impl Notifier + 'static,
        poll_interval: Duration,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(GateState {
                status: GateStatus::Unchecked,
                alert_shown: false,
                poll_timer: None,
                on_granted: None,
            })),
            trust: Rc::new(trust),
            scheduler: Rc::new(scheduler),
            notifier: Rc::new(notifier),
            poll_interval,
        }
    }

    pub fn status(&self) -> GateStatus {
        self.state.borrow().status
    }

    pub fn is_polling(&self) -> bool {
        self.state.borrow().poll_timer.is_some()
    }

    /// One-off trust check without touching the gate state
    pub fn check(&self, prompt: bool) -> Result<(), CoreError> {
        if self.trust.is_trusted(prompt) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied)
        }
    }

    /// Run `on_granted` once trust is available
    ///
    /// Never blocks. When already trusted the callback runs before this
    /// returns. While a grant is already awaited the new callback is dropped
    /// and the pending one stays in place.
    pub fn ensure_granted(&self, on_granted: Box<dyn FnOnce()>) -> GateStatus {
        let status = self.status();
        match status {
            GateStatus::Active => {
                on_granted();
                GateStatus::Active
            }
            GateStatus::AwaitingGrant => {
                debug!("Already waiting for accessibility permission");
                GateStatus::AwaitingGrant
            }
            GateStatus::Unchecked => match self.check(true) {
                Ok(()) => {
                    info!("Accessibility permission granted");
                    self.state.borrow_mut().status = GateStatus::Active;
                    on_granted();
                    GateStatus::Active
                }
                Err(e) => {
                    warn!("{}; waiting for the user to grant it", e);
                    self.begin_waiting(on_granted);
                    GateStatus::AwaitingGrant
                }
            },
        }
    }

    fn begin_waiting(&self, on_granted: Box<dyn FnOnce()>) {
        let show_alert = {
            let mut state = self.state.borrow_mut();
            state.status = GateStatus::AwaitingGrant;
            state.on_granted = Some(on_granted);
            !std::mem::replace(&mut state.alert_shown, true)
        };

        if show_alert {
            self.notifier.alert(ALERT_TITLE, ALERT_BODY, &ALERT_BUTTONS);
        }

        if self.is_polling() {
            return;
        }

        let weak_state = Rc::downgrade(&self.state);
        let trust = Rc::clone(&self.trust);
        let notifier = Rc::clone(&self.notifier);
        let tick = Box::new(move || poll_tick(&weak_state, trust.as_ref(), notifier.as_ref()));

        let timer = self.scheduler.schedule_repeating(self.poll_interval, tick);
        self.state.borrow_mut().poll_timer = Some(timer);
        debug!(
            "Polling accessibility permission every {}s",
            self.poll_interval.as_secs_f32()
        );
    }

    /// Cancel any pending poll; idempotent
    ///
    /// A gate that was still waiting goes back to `Unchecked` and forgets its
    /// callback, so the next `ensure_granted` checks trust again.
    pub fn stop(&self) {
        let timer = {
            let mut state = self.state.borrow_mut();
            if state.status == GateStatus::AwaitingGrant {
                state.status = GateStatus::Unchecked;
                state.on_granted = None;
            }
            state.poll_timer.take()
        };

        if let Some(timer) = timer {
            timer.cancel();
            debug!("Accessibility permission polling cancelled");
        }
    }
}

fn poll_tick(state: &Weak<RefCell<GateState>>, trust: &dyn TrustQuery, notifier: &dyn Notifier) {
    let Some(state) = state.upgrade() else {
        return;
    };

    if state.borrow().status != GateStatus::AwaitingGrant {
        return;
    }

    if !trust.is_trusted(false) {
        debug!("Accessibility permission still missing");
        return;
    }

    info!("Accessibility permission granted");
    let (timer, on_granted) = {
        let mut state = state.borrow_mut();
        state.status = GateStatus::Active;
        (state.poll_timer.take(), state.on_granted.take())
    };

    if let Some(timer) = timer {
        timer.cancel();
    }
    notifier.banner(GRANTED_TITLE, GRANTED_BODY);
    if let Some(on_granted) = on_granted {
        on_granted();
    }
}
