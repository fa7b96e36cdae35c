//! Fault boundary: runs a closure and turns a panic or an `Err` into an [`Empty`]
//!
//! A panic hook is installed once per process. While a guard is active on the
//! current thread, the hook records the panic message, its location and a
//! backtrace taken at the panic site, and keeps the default report quiet if the
//! guard's [`GuardConfig`] asks for it. Panics on threads without an active guard
//! go to the previously installed hook untouched.

use super::Empty;
use crate::config::{BacktraceMode, GuardConfig};
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::RefCell;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Once;

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    // One slot per active guard on this thread, innermost last.
    static ACTIVE: RefCell<Vec<Slot>> = RefCell::new(Vec::new());
}

struct Slot {
    config: GuardConfig,
    fault: Option<Fault>,
}

/// A captured fault before it is flattened into an [`Empty`] reason
#[derive(Debug)]
struct Fault {
    message: String,
    location: Option<String>,
    trace: Option<String>,
}

impl Fault {
    fn into_empty(self) -> Empty {
        let mut reason = self.message;
        if let Some(location) = self.location {
            reason.push_str(&format!(" (at {location})"));
        }
        if let Some(trace) = self.trace {
            reason.push_str(". Traceback:\n");
            reason.push_str(&trace);
        }
        Empty::because(reason)
    }
}

// Frames that raise a panic. Everything up to the last of them belongs to the
// hook and the unwinder, and is cut from the trace.
const RAISE_FRAMES: &[&str] = &[
    "core::panicking::",
    "rust_begin_unwind",
    "std::panicking::begin_panic",
    "std::panicking::rust_panic",
    "core::result::unwrap_failed",
    "core::option::unwrap_failed",
    "core::option::expect_failed",
];

// Frames of the panic machinery, of `Maybe` and of this boundary. They are dropped
// wherever they appear so the first frame shown is the caller's code.
const HIDDEN_FRAMES: &[&str] = &[
    "std::backtrace",
    "std::panicking",
    "std::panic::",
    "std::sys",
    "std::rt::",
    "std::thread::local",
    "core::panicking",
    "core::panic::",
    "core::ops::function",
    "rust_begin_unwind",
    "__rust_",
    "<alloc::boxed::Box<F,A> as core::ops::function::Fn",
    "guarded_dsp::maybe::guard::guard",
    "guarded_dsp::maybe::guard::try_guard",
    "guarded_dsp::maybe::guard::record",
    "guarded_dsp::maybe::guard::capture_trace",
    "guarded_dsp::maybe::guard::install_hook",
    "guarded_dsp::maybe::Maybe<",
    "guarded_dsp::maybe::spread::Spread",
];

/// Run `f`, converting a panic into an [`Empty`]
///
/// The returned `Empty`'s reason holds the panic message, the panic location and,
/// depending on `config.backtrace`, the call stack at the panic site.
pub fn guard<V, F>(config: GuardConfig, f: F) -> Result<V, Empty>
where
    F: FnOnce() -> V,
{
    install_hook();

    ACTIVE.with(|active| {
        active.borrow_mut().push(Slot {
            config,
            fault: None,
        })
    });
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    let slot = ACTIVE.with(|active| active.borrow_mut().pop());

    match outcome {
        Ok(value) => Ok(value),
        Err(payload) => {
            let fault = slot.and_then(|slot| slot.fault).unwrap_or_else(|| Fault {
                // The hook was replaced after install, so only the payload is left.
                message: payload_message(payload.as_ref()),
                location: None,
                trace: None,
            });
            Err(fault.into_empty())
        }
    }
}

/// Run a fallible `f`, converting both a panic and an `Err` into an [`Empty`]
///
/// For an `Err`, the backtrace is taken here, which places the caller of the
/// boundary first.
pub fn try_guard<V, E, F>(config: GuardConfig, f: F) -> Result<V, Empty>
where
    E: Display,
    F: FnOnce() -> Result<V, E>,
{
    match guard(config, f)? {
        Ok(value) => Ok(value),
        Err(err) => Err(Fault {
            message: err.to_string(),
            location: None,
            trace: capture_trace(config.backtrace),
        }
        .into_empty()),
    }
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !record(info.payload(), info.location()) {
                previous(info);
            }
        }));
    });
}

/// Store the fault in the innermost active slot. Returns true when the default
/// report should be skipped.
fn record(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> bool {
    // try_with: the thread-local may already be gone during thread teardown.
    ACTIVE
        .try_with(|active| {
            let Ok(mut active) = active.try_borrow_mut() else {
                return false;
            };
            let Some(slot) = active.last_mut() else {
                return false;
            };
            slot.fault = Some(Fault {
                message: payload_message(payload),
                location: location.map(|l| l.to_string()),
                trace: capture_trace(slot.config.backtrace),
            });
            slot.config.quiet_panics
        })
        .unwrap_or(false)
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

fn capture_trace(mode: BacktraceMode) -> Option<String> {
    let backtrace = match mode {
        BacktraceMode::Off => return None,
        BacktraceMode::Env => Backtrace::capture(),
        BacktraceMode::Force => Backtrace::force_capture(),
    };
    if backtrace.status() != BacktraceStatus::Captured {
        return None;
    }
    Some(strip_hidden_frames(&backtrace.to_string()))
}

/// Drop hidden frames from a rendered backtrace
///
/// A rendered frame is a `N: symbol` line followed by indented `at file:line`
/// lines. Frames up to the last raising frame are cut, then hidden frames are
/// filtered out. Kept frames stay in innermost-first order.
fn strip_hidden_frames(rendered: &str) -> String {
    let mut frames: Vec<Vec<&str>> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim_start();
        let is_frame_header = trimmed
            .split_once(": ")
            .map(|(index, _)| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false);
        match frames.last_mut() {
            Some(frame) if !is_frame_header => frame.push(line),
            _ => frames.push(vec![line]),
        }
    }

    let header_matches = |frame: &[&str], patterns: &[&str]| {
        frame
            .first()
            .is_some_and(|header| patterns.iter().any(|p| header.contains(p)))
    };
    let start = frames
        .iter()
        .rposition(|frame| header_matches(frame.as_slice(), RAISE_FRAMES))
        .map_or(0, |last| last + 1);

    let mut kept = String::new();
    for frame in &frames[start..] {
        if header_matches(frame.as_slice(), HIDDEN_FRAMES) {
            continue;
        }
        for line in frame {
            kept.push_str(line);
            kept.push('\n');
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(backtrace: BacktraceMode) -> GuardConfig {
        GuardConfig {
            backtrace,
            ..GuardConfig::default()
        }
    }

    #[test]
    fn test_success_passes_value_through() {
        assert_eq!(guard(GuardConfig::default(), || 40 + 2), Ok(42));
    }

    #[test]
    fn test_panic_message_and_location() {
        let empty = guard(quiet(BacktraceMode::Off), || -> u32 { panic!("bad window size") })
            .unwrap_err();
        assert!(empty.reason().starts_with("bad window size (at "));
        assert!(empty.reason().contains("guard.rs"));
        assert!(!empty.reason().contains("Traceback"));
    }

    #[test]
    fn test_formatted_panic_message() {
        let empty = guard(quiet(BacktraceMode::Off), || -> u32 {
            panic!("frame {} out of range", 7)
        })
        .unwrap_err();
        assert!(empty.reason().starts_with("frame 7 out of range"));
    }

    #[test]
    fn test_non_string_payload() {
        let empty = guard(quiet(BacktraceMode::Off), || -> u32 {
            std::panic::panic_any(17u8)
        })
        .unwrap_err();
        assert!(empty.reason().starts_with("panic with a non-string payload"));
    }

    #[test]
    fn test_forced_backtrace_is_attached() {
        let empty = guard(quiet(BacktraceMode::Force), || -> u32 { panic!("boom") }).unwrap_err();
        assert!(empty.reason().starts_with("boom"));
        // Platforms without unwind tables report the backtrace as unsupported.
        if let Some((_, trace)) = empty.reason().split_once("Traceback:\n") {
            let first = trace.lines().next().unwrap_or_default();
            assert!(
                first.contains("tests::test_forced_backtrace_is_attached::{{closure}}"),
                "first frame: {}",
                first
            );
            assert!(!trace.contains("std::panicking"));
            assert!(!trace.contains("std::thread::local"));
            assert!(!trace.contains("guarded_dsp::maybe::guard::guard"));
            assert!(!trace.contains("guarded_dsp::maybe::guard::record"));
            assert!(!trace.contains("guarded_dsp::maybe::Maybe<"));
        }
    }

    #[test]
    fn test_nested_guards_record_innermost() {
        let outer = guard(quiet(BacktraceMode::Off), || {
            let inner = guard(quiet(BacktraceMode::Off), || -> u32 { panic!("inner") });
            assert!(inner.unwrap_err().reason().starts_with("inner"));
            panic!("outer");
        });
        let outer: Result<(), Empty> = outer;
        assert!(outer.unwrap_err().reason().starts_with("outer"));
    }

    #[test]
    fn test_unguarded_thread_panic_still_propagates() {
        install_hook();
        let handle = std::thread::spawn(|| panic!("not guarded"));
        assert!(handle.join().is_err());
    }

    #[test]
    fn test_try_guard_converts_err() {
        let result: Result<u32, Empty> =
            try_guard(quiet(BacktraceMode::Off), || Err::<u32, _>("nfft must be positive"));
        assert_eq!(result, Err(Empty::because("nfft must be positive")));
    }

    #[test]
    fn test_try_guard_ok() {
        let result: Result<u32, Empty> =
            try_guard(quiet(BacktraceMode::Force), || Ok::<_, String>(3));
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn test_strip_hidden_frames() {
        let rendered = [
            "   0: std::backtrace::Backtrace::force_capture",
            "             at /rustc/library/std/src/backtrace.rs:312:13",
            "   1: my_crate::spectrum",
            "             at ./src/spectrum.rs:10:5",
            "   2: guarded_dsp::maybe::guard::guard",
            "             at ./src/maybe/guard.rs:80:19",
            "   3: main",
        ]
        .join("\n");
        let stripped = strip_hidden_frames(&rendered);
        assert_eq!(
            stripped,
            "   1: my_crate::spectrum\n             at ./src/spectrum.rs:10:5\n   3: main\n"
        );
    }

    #[test]
    fn test_strip_cuts_hook_frames_above_raise_site() {
        let rendered = [
            "   0: guarded_dsp::maybe::guard::capture_trace",
            "   1: guarded_dsp::maybe::guard::record::{{closure}}",
            "   2: std::thread::local::LocalKey<T>::try_with",
            "   3: my_crate::unlisted_helper",
            "   4: core::panicking::panic_const::panic_const_div_by_zero",
            "   5: my_crate::main::{{closure}}",
            "             at ./src/main.rs:4:20",
            "   6: guarded_dsp::maybe::Maybe<T>::apply::{{closure}}",
            "   7: <F as guarded_dsp::maybe::spread::Spread<(A1,)>>::call_spread",
            "   8: std::panicking::try::do_call",
            "   9: guarded_dsp::maybe::Maybe<T>::apply",
            "  10: my_crate::main",
        ]
        .join("\n");
        let stripped = strip_hidden_frames(&rendered);
        assert_eq!(
            stripped,
            "   5: my_crate::main::{{closure}}\n             at ./src/main.rs:4:20\n  10: my_crate::main\n"
        );
    }

    #[test]
    fn test_try_guard_trace_starts_at_caller() {
        let result: Result<u32, Empty> =
            try_guard(quiet(BacktraceMode::Force), || Err::<u32, _>("no samples"));
        let empty = result.unwrap_err();
        if let Some((_, trace)) = empty.reason().split_once("Traceback:\n") {
            assert!(!trace.contains("guarded_dsp::maybe::guard::capture_trace"));
            assert!(!trace.contains("guarded_dsp::maybe::guard::try_guard"));
        }
    }
}
