//! Repeating CFRunLoop timer backing the permission poll

use super::{PollScheduler, PollTimer};
use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoopGetCurrent, CFRunLoopRef};
use core_foundation::string::CFStringRef;
use log::{debug, error};
use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::rc::Rc;
use std::time::Duration;

type CFAllocatorRef = *const c_void;
type CFRunLoopTimerRef = *mut c_void;
type CFAbsoluteTime = f64;
type CFTimeInterval = f64;
type CFIndex = isize;
type CFOptionFlags = usize;

type TimerCallback = unsafe extern "C" fn(timer: CFRunLoopTimerRef, info: *mut c_void);

#[repr(C)]
struct CFRunLoopTimerContext {
    version: CFIndex,
    info: *mut c_void,
    retain: Option<unsafe extern "C" fn(*const c_void) -> *const c_void>,
    release: Option<unsafe extern "C" fn(*const c_void)>,
    copy_description: Option<unsafe extern "C" fn(*const c_void) -> CFStringRef>,
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFAbsoluteTimeGetCurrent() -> CFAbsoluteTime;

    fn CFRunLoopTimerCreate(
        allocator: CFAllocatorRef,
        fire_date: CFAbsoluteTime,
        interval: CFTimeInterval,
        flags: CFOptionFlags,
        order: CFIndex,
        callout: TimerCallback,
        context: *mut CFRunLoopTimerContext,
    ) -> CFRunLoopTimerRef;

    fn CFRunLoopAddTimer(rl: CFRunLoopRef, timer: CFRunLoopTimerRef, mode: CFStringRef);
    fn CFRunLoopTimerInvalidate(timer: CFRunLoopTimerRef);
    fn CFRelease(cf: *const c_void);
}

struct TimerShared {
    tick: RefCell<Option<Box<dyn FnMut()>>>,
    cancelled: Cell<bool>,
}

/// Schedules poll ticks on the current thread's run loop
pub struct RunLoopScheduler;

impl PollScheduler for RunLoopScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: Box<dyn FnMut()>) -> Box<dyn PollTimer> {
        let shared = Rc::new(TimerShared {
            tick: RefCell::new(Some(tick)),
            cancelled: Cell::new(false),
        });
        let info = Box::into_raw(Box::new(Rc::clone(&shared)));

        let mut context = CFRunLoopTimerContext {
            version: 0,
            info: info as *mut c_void,
            retain: None,
            release: None,
            copy_description: None,
        };

        let seconds = interval.as_secs_f64();
        let timer = unsafe {
            let timer = CFRunLoopTimerCreate(
                std::ptr::null(),
                CFAbsoluteTimeGetCurrent() + seconds,
                seconds,
                0,
                0,
                timer_callout,
                &mut context,
            );
            if !timer.is_null() {
                CFRunLoopAddTimer(CFRunLoopGetCurrent(), timer, kCFRunLoopCommonModes);
            }
            timer
        };

        if timer.is_null() {
            error!("Failed to create permission poll timer");
        } else {
            debug!("Run loop timer scheduled every {:.1}s", seconds);
        }

        Box::new(RunLoopTimer { timer, info, shared })
    }
}

struct RunLoopTimer {
    timer: CFRunLoopTimerRef,
    info: *mut Rc<TimerShared>,
    shared: Rc<TimerShared>,
}

impl PollTimer for RunLoopTimer {
    fn cancel(self: Box<Self>) {
        // Drop invalidates and releases
        drop(self);
    }
}

impl Drop for RunLoopTimer {
    fn drop(&mut self) {
        self.shared.cancelled.set(true);
        self.shared.tick.borrow_mut().take();

        unsafe {
            if !self.timer.is_null() {
                CFRunLoopTimerInvalidate(self.timer);
                CFRelease(self.timer as *const c_void);
            }
            // Invalidation guarantees the callout no longer sees `info`
            drop(Box::from_raw(self.info));
        }
    }
}

unsafe extern "C" fn timer_callout(_timer: CFRunLoopTimerRef, info: *mut c_void) {
    if info.is_null() {
        return;
    }
    // Own a strong reference for the duration of the tick: the tick may
    // cancel this very timer, which frees `info`.
    let shared = Rc::clone(&*(info as *const Rc<TimerShared>));
    if shared.cancelled.get() {
        return;
    }

    let Some(mut tick) = shared.tick.borrow_mut().take() else {
        return;
    };
    tick();
    if !shared.cancelled.get() {
        *shared.tick.borrow_mut() = Some(tick);
    }
}
