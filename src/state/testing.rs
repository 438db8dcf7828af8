//! Recording fakes and a virtual-time harness for state machine tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::TransitionConfig;
use crate::events::StateEvent;
use crate::surface::{Backend, BackendSignal, Element, Icon, Presenter, Recorder};
use crate::timer::manual::{ManualClock, ManualScheduler};

use super::machine::{Collaborators, StateMachine};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Show(Element),
    Hide(Element),
    FadeIn(Element, Option<Duration>),
    FadeOut(Element, Option<Duration>),
    PlayVideo,
    ResetVideo,
    SleepVisual(bool),
    StartClock,
    StopClock,
    Status(String),
    ShowIcon(Icon),
    HideIcons,
    ShowErrorMessage(String),
    HideErrorMessage,
    Signal(BackendSignal),
    RecorderStart,
    RecorderStop,
    RecorderCancel,
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.count(call) > 0
    }

    /// Position of the first matching call
    pub fn position(&self, call: &Call) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|c| c == call)
    }
}

pub struct FakePresenter {
    log: CallLog,
    clock_running: bool,
}

impl FakePresenter {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            clock_running: false,
        }
    }
}

impl Presenter for FakePresenter {
    fn show(&mut self, element: Element) {
        self.log.push(Call::Show(element));
    }
    fn hide(&mut self, element: Element) {
        self.log.push(Call::Hide(element));
    }
    fn fade_in(&mut self, element: Element, duration: Option<Duration>) {
        self.log.push(Call::FadeIn(element, duration));
    }
    fn fade_out(&mut self, element: Element, duration: Option<Duration>) {
        self.log.push(Call::FadeOut(element, duration));
    }
    fn play_video(&mut self) {
        self.log.push(Call::PlayVideo);
    }
    fn reset_video(&mut self) {
        self.log.push(Call::ResetVideo);
    }
    fn set_sleep_visual(&mut self, asleep: bool) {
        self.log.push(Call::SleepVisual(asleep));
    }
    fn start_clock(&mut self) {
        self.clock_running = true;
        self.log.push(Call::StartClock);
    }
    fn stop_clock(&mut self) {
        self.clock_running = false;
        self.log.push(Call::StopClock);
    }
    fn clock_running(&self) -> bool {
        self.clock_running
    }
    fn set_status(&mut self, text: &str) {
        self.log.push(Call::Status(text.to_string()));
    }
    fn show_icon(&mut self, icon: Icon) {
        self.log.push(Call::ShowIcon(icon));
    }
    fn hide_icons(&mut self) {
        self.log.push(Call::HideIcons);
    }
    fn show_error_message(&mut self, message: &str) {
        self.log.push(Call::ShowErrorMessage(message.to_string()));
    }
    fn hide_error_message(&mut self) {
        self.log.push(Call::HideErrorMessage);
    }
}

pub struct FakeBackend(CallLog);

impl Backend for FakeBackend {
    fn signal(&self, signal: BackendSignal) {
        self.0.push(Call::Signal(signal));
    }
}

pub struct FakeRecorder(CallLog);

impl Recorder for FakeRecorder {
    fn start(&mut self) {
        self.0.push(Call::RecorderStart);
    }
    fn stop(&mut self) {
        self.0.push(Call::RecorderStop);
    }
    fn cancel(&mut self) {
        self.0.push(Call::RecorderCancel);
    }
}

pub fn test_config() -> TransitionConfig {
    TransitionConfig {
        logo_fade_in_duration: 1000,
        logo_fade_out_duration: 800,
        clock_fade_in_duration: 600,
        clock_fade_out_duration: 400,
        transition_delay: 200,
        playback_duration: 5.0,
        screen_sleep_fade_out_duration: 300,
        screen_wake_fade_in_duration: 350,
    }
}

pub struct Harness {
    pub machine: StateMachine,
    pub clock: ManualClock,
    pub log: CallLog,
    pub events: broadcast::Receiver<StateEvent>,
}

impl Harness {
    pub fn new(config: TransitionConfig) -> Self {
        let log = CallLog::default();
        let (scheduler, clock) = ManualScheduler::new();
        let (event_tx, events) = broadcast::channel(64);

        let machine = StateMachine::new(
            config,
            Collaborators {
                presenter: Box::new(FakePresenter::new(log.clone())),
                backend: Box::new(FakeBackend(log.clone())),
                recorder: Box::new(FakeRecorder(log.clone())),
            },
            Box::new(scheduler),
            event_tx,
        );

        Self {
            machine,
            clock,
            log,
            events,
        }
    }

    /// A machine that has run its startup sequence into `clock`, with the
    /// call log and event queue cleared.
    pub fn booted() -> Self {
        let mut harness = Self::new(test_config());
        harness.machine.start();
        harness.advance(Duration::from_secs(5));
        assert_eq!(harness.machine.mode(), super::Mode::Clock);
        harness.log.take();
        harness.drain_events();
        harness
    }

    /// Move virtual time forward, firing due timers one at a time so that
    /// timers armed in response fire too if they fall within the window.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.clock.now() + by;
        while let Some(fired) = self.clock.pop_due(deadline) {
            self.machine.on_timer(fired);
        }
        self.clock.set_now(deadline);
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn drain_events(&mut self) -> Vec<StateEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
