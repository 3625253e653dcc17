//! Interactive focus session.
//!
//! Commands are read line by line from stdin while ticks arrive from the
//! controller's tokio ticker. Ctrl-C plays the part of the back gesture: it
//! quits when nothing is locked and is swallowed while focus lock is up.

use std::io::Write;
use std::pin::Pin;

use clap::Args;
use lucent_core::error::Result;
use lucent_core::{
    BackNavigation, Config, Event, FocusSessionController, KeyValueStore, LockState,
    NavigationGuard, SessionListener, SessionPhase, SessionSettings, TimerState, TokioTicker,
    CELEBRATION_DISMISS_AFTER,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Sleep;

use super::open_store;

const HELP: &str = "commands: start | pause | toggle | reset [work|break] | lock [on|off] | exit | confirm | cancel | status | quit";

#[derive(Args)]
pub struct SessionArgs {
    /// Enable focus lock for this session regardless of config
    #[arg(long)]
    lock: bool,
    /// Emit events and status as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StatusView {
    phase: SessionPhase,
    remaining_seconds: u64,
    is_running: bool,
    time: String,
    progress: f64,
    streak: u32,
    focus_lock_enabled: bool,
    lock_state: LockState,
}

/// Terminal rendering of controller output.
#[derive(Clone, Copy)]
struct Renderer {
    json: bool,
}

impl Renderer {
    fn print_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode output"),
        }
    }

    fn events(&self, events: &[Event]) {
        for event in events {
            // Ticks, celebrations and phase changes reach the terminal
            // through the listener callbacks.
            if matches!(
                event,
                Event::TimerTicked { .. } | Event::StreakIncreased { .. } | Event::PhaseChanged { .. }
            ) {
                continue;
            }
            if self.json {
                self.print_json(event);
                continue;
            }
            match event {
                Event::TimerStarted { phase, .. } => println!("{} started", phase.label()),
                Event::TimerPaused { .. } => println!("paused"),
                Event::TimerReset { phase, .. } => println!("reset to {}", phase.label()),
                Event::PhaseCompleted { finished, .. } => {
                    println!("\n{} complete", finished.label())
                }
                Event::FocusLockToggled { enabled } => {
                    println!("focus lock {}", if *enabled { "on" } else { "off" })
                }
                Event::FocusLocked { .. } => {
                    println!("FOCUS SESSION IN PROGRESS. Minimize distractions. Type `exit` to leave.")
                }
                Event::ExitConfirmationRequested { quote } => {
                    println!("Are you sure you want to stop?");
                    println!("  \"{}\" - {}", quote.text, quote.author);
                    println!("Type `cancel` to keep focusing or `confirm` to exit anyway.");
                }
                Event::ExitCancelled => println!("back to work"),
                Event::FocusUnlocked { .. } => println!("focus lock released"),
                Event::BackNavigationBlocked => {
                    println!("\nFocus lock is on. Type `exit` to leave the session.")
                }
                Event::StreakIncreased { .. }
                | Event::TimerTicked { .. }
                | Event::PhaseChanged { .. } => {}
            }
        }
    }

    fn status<S: KeyValueStore>(&self, controller: &FocusSessionController<S, TokioTicker>) {
        let state = controller.timer_state();
        let view = StatusView {
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            is_running: state.is_running,
            time: controller.time_string(),
            progress: controller.progress(),
            streak: controller.streak(),
            focus_lock_enabled: controller.focus_lock_enabled(),
            lock_state: controller.lock_state(),
        };
        if self.json {
            self.print_json(&view);
        } else {
            println!(
                "{} {} ({:.0}%) {} | streak {} | focus lock {}",
                view.time,
                state.phase.label(),
                view.progress * 100.0,
                if view.is_running { "running" } else { "paused" },
                view.streak,
                if view.focus_lock_enabled { "on" } else { "off" },
            );
        }
    }
}

impl SessionListener for Renderer {
    fn on_tick(&mut self, state: &TimerState) {
        if self.json {
            self.print_json(&Event::TimerTicked { state: *state });
        } else {
            print!("\r{} {}   ", state.time_string(), state.phase.label());
            let _ = std::io::stdout().flush();
        }
    }

    fn on_streak_increased(&mut self, count: u32) {
        if self.json {
            self.print_json(&Event::StreakIncreased { count });
        } else {
            println!("Streak Extended! {count} day study streak. Keep up the focus!");
        }
    }

    fn on_phase_change(&mut self, phase: SessionPhase) {
        if self.json {
            self.print_json(&Event::PhaseChanged { phase });
        } else {
            println!("{} is up next. Type `start` when ready.", phase.label());
        }
    }
}

/// Ctrl-C interception is always registered; this guard only traces when it
/// is holding the user in place.
struct TerminalGuard;

impl NavigationGuard for TerminalGuard {
    fn install(&mut self) {
        tracing::debug!("ctrl-c guard installed");
    }

    fn teardown(&mut self) {
        tracing::debug!("ctrl-c guard removed");
    }

    fn reassert(&mut self) {
        tracing::debug!("back gesture swallowed");
    }
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(args: SessionArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_session(args))
}

async fn run_session(args: SessionArgs) -> Result<()> {
    let config = Config::load_or_default();
    let store = open_store(&config)?;
    let (ticker, mut ticks) = TokioTicker::new();

    let mut settings = SessionSettings::from(&config);
    if args.lock {
        settings.focus_lock_enabled = true;
    }

    let renderer = Renderer { json: args.json };
    let mut controller = FocusSessionController::new(store, ticker, settings)
        .with_listener(renderer)
        .with_guard(TerminalGuard);
    controller.mount();
    if !args.json {
        println!("{HELP}");
    }
    renderer.status(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interrupts = Interrupts::new()?;
    let mut celebration: Option<Pin<Box<Sleep>>> = None;

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                let events = controller.handle_tick(tick);
                if events.iter().any(|e| matches!(e, Event::StreakIncreased { .. })) {
                    celebration = Some(Box::pin(tokio::time::sleep(CELEBRATION_DISMISS_AFTER)));
                }
                renderer.events(&events);
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if let Flow::Quit = handle_command(&mut controller, renderer, line.trim()) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(()) = interrupts.recv() => {
                if let Flow::Quit = back_gesture(&mut controller, renderer) {
                    break;
                }
            }
            _ = celebration_timeout(&mut celebration), if celebration.is_some() => {
                celebration = None;
                if !renderer.json {
                    println!("(celebration dismissed)");
                }
            }
        }
    }

    controller.unmount();
    if !args.json {
        println!("session ended with a {} day streak", controller.streak());
    }
    Ok(())
}

/// Resolves when the celebration banner should hide; pends forever without one.
async fn celebration_timeout(deadline: &mut Option<Pin<Box<Sleep>>>) {
    match deadline {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

fn back_gesture<S: KeyValueStore>(
    controller: &mut FocusSessionController<S, TokioTicker>,
    renderer: Renderer,
) -> Flow {
    let answer = controller.handle_back_navigation();
    renderer.events(&answer.events());
    match answer {
        BackNavigation::Allowed => Flow::Quit,
        BackNavigation::Blocked => Flow::Continue,
    }
}

/// Ctrl-C as a stream, registered once so presses between polls are kept.
struct Interrupts {
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
    #[cfg(windows)]
    inner: tokio::signal::windows::CtrlC,
}

impl Interrupts {
    fn new() -> std::io::Result<Self> {
        #[cfg(unix)]
        let inner = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(windows)]
        let inner = tokio::signal::windows::ctrl_c()?;
        Ok(Self { inner })
    }

    async fn recv(&mut self) -> Option<()> {
        self.inner.recv().await
    }
}

fn handle_command<S: KeyValueStore>(
    controller: &mut FocusSessionController<S, TokioTicker>,
    renderer: Renderer,
    line: &str,
) -> Flow {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Flow::Continue;
    };
    let arg = parts.next();

    let events = match command {
        "start" => controller.start(),
        "pause" => controller.pause(),
        "toggle" => controller.toggle(),
        "reset" => match arg {
            Some("work") => controller.reset(SessionPhase::Work),
            Some("break") => controller.reset(SessionPhase::Break),
            _ => controller.reset_current(),
        },
        "lock" => match arg {
            Some("on") => controller.set_focus_lock_enabled(true),
            Some("off") => controller.set_focus_lock_enabled(false),
            _ => controller.toggle_focus_lock(),
        },
        "exit" => controller.request_exit(),
        "confirm" => controller.confirm_exit(),
        "cancel" => controller.cancel_exit(),
        "status" => {
            renderer.status(controller);
            Vec::new()
        }
        "quit" => return back_gesture(controller, renderer),
        "help" => {
            println!("{HELP}");
            Vec::new()
        }
        other => {
            eprintln!("unknown command: {other}");
            Vec::new()
        }
    };
    renderer.events(&events);
    Flow::Continue
}
