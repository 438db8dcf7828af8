//! Core state machine implementation
//!
//! Owns the current mode, validates and commits transitions, fires their
//! side effects and notifies subscribers. A transition either commits
//! completely or is rejected before anything changes.

use std::time::Instant;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::{TransitionConfig, TransitionConfigPatch};
use crate::events::{InputMode, StateEvent};
use crate::gesture::{decide, Gesture, GestureAction};
use crate::surface::{Backend, BackendSignal, Icon, Presenter, Recorder};
use crate::timer::{Fired, ModeGuard, Scheduler, Timer, TimerAction, TimerRegistry, TimerSlot};

use super::effects::{self, Effects};
use super::Mode;

/// Called with `(current, previous)` after every committed transition
pub type Subscriber = Box<dyn FnMut(Mode, Mode) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("startup sequence in progress, cannot enter {requested}")]
    StartupLocked { requested: Mode },
}

/// External collaborators driven by the state machine
pub struct Collaborators {
    pub presenter: Box<dyn Presenter>,
    pub backend: Box<dyn Backend>,
    pub recorder: Box<dyn Recorder>,
}

/// The state machine that manages mode transitions
pub struct StateMachine {
    mode: Mode,
    previous: Mode,
    error: Option<String>,
    input_mode: InputMode,
    /// Time when the current mode was entered
    entered_at: Instant,
    config: TransitionConfig,
    timers: TimerRegistry,
    presenter: Box<dyn Presenter>,
    backend: Box<dyn Backend>,
    recorder: Box<dyn Recorder>,
    subscribers: Vec<Subscriber>,
    /// Channel for the state-change signal
    event_tx: broadcast::Sender<StateEvent>,
}

impl StateMachine {
    pub fn new(
        config: TransitionConfig,
        collaborators: Collaborators,
        scheduler: Box<dyn Scheduler>,
        event_tx: broadcast::Sender<StateEvent>,
    ) -> Self {
        Self {
            mode: Mode::Startup,
            previous: Mode::Startup,
            error: None,
            input_mode: InputMode::default(),
            entered_at: Instant::now(),
            config,
            timers: TimerRegistry::new(scheduler),
            presenter: collaborators.presenter,
            backend: collaborators.backend,
            recorder: collaborators.recorder,
            subscribers: Vec::new(),
            event_tx,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn previous(&self) -> Mode {
        self.previous
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    #[cfg(test)]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    fn effects(&mut self) -> Effects<'_> {
        Effects {
            presenter: self.presenter.as_mut(),
            backend: self.backend.as_ref(),
            timers: &mut self.timers,
            config: &self.config,
        }
    }

    /// Run the fixed startup animation. It resolves into `clock` on its own.
    pub fn start(&mut self) {
        info!("startup sequence started");
        self.update_status();
        effects::begin_startup(&mut self.effects());
    }

    pub fn register_subscriber(&mut self, subscriber: impl FnMut(Mode, Mode) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn accepts(&self, target: Mode) -> Result<(), TransitionError> {
        if self.mode == Mode::Startup && target != Mode::Clock {
            debug!(requested = %target, "transition rejected during startup");
            return Err(TransitionError::StartupLocked { requested: target });
        }
        Ok(())
    }

    /// Move into `target`, attaching `error` (only meaningful for `error` mode)
    pub fn request_transition(
        &mut self,
        target: Mode,
        error: Option<String>,
    ) -> Result<(), TransitionError> {
        self.accepts(target)?;

        self.timers.cancel(TimerSlot::PlaybackReturn);
        let from = self.mode;
        effects::drive(target, from, &mut self.effects());

        self.previous = from;
        self.mode = target;
        self.error = error;

        info!(
            from = %from,
            to = %target,
            duration_ms = self.entered_at.elapsed().as_millis() as u64,
            "state transition"
        );
        self.entered_at = Instant::now();

        self.update_status();
        self.update_icons();

        if target == Mode::Error {
            if let Some(message) = &self.error {
                self.presenter.show_error_message(message);
            }
        }

        if target == Mode::Playback {
            self.timers.arm(
                self.config.playback(),
                Timer::new(TimerAction::ReturnToClock, ModeGuard::StillIn(Mode::Playback)),
            );
        }

        let (current, previous) = (self.mode, self.previous);
        for subscriber in &mut self.subscribers {
            subscriber(current, previous);
        }

        self.emit_state_event();

        if current != Mode::Error {
            self.presenter.hide_error_message();
        }

        Ok(())
    }

    /// Transition whose rejection only matters to the log
    fn transition(&mut self, target: Mode) {
        if let Err(e) = self.request_transition(target, None) {
            debug!(error = %e, "transition dropped");
        }
    }

    fn update_status(&mut self) {
        let mut text = self.mode.capitalized();
        if self.mode == Mode::Error {
            if let Some(error) = &self.error {
                text.push_str(" - ");
                text.push_str(error);
            }
        }
        self.presenter.set_status(&text);
    }

    fn update_icons(&mut self) {
        match self.mode {
            Mode::Recording => self.presenter.show_icon(Icon::Recording),
            Mode::Processing => self.presenter.show_icon(Icon::Generating),
            Mode::Error => self.presenter.show_icon(Icon::Error),
            _ => self.presenter.hide_icons(),
        }
    }

    /// Snapshot of the committed state, shaped like the state-change signal
    pub fn status(&self) -> StateEvent {
        StateEvent {
            mode: self.mode,
            previous: self.previous,
            error: self.error.clone(),
            input_mode: self.input_mode,
        }
    }

    fn emit_state_event(&self) {
        let event = self.status();
        debug!(%event, "emitting state event");
        let _ = self.event_tx.send(event);
    }

    /// Map a gesture onto an action for the current mode
    pub fn dispatch_gesture(&mut self, gesture: Gesture) {
        let Some(action) = decide(gesture, self.mode) else {
            debug!(%gesture, mode = %self.mode, "gesture ignored");
            return;
        };
        debug!(
            %gesture,
            ?action,
            mode = %self.mode,
            target = %action.target(),
            "gesture dispatched"
        );

        let outcome = match action {
            GestureAction::PlayMostRecent => self.play_most_recent(),
            GestureAction::PlayPrevious => self.play_previous(),
            GestureAction::StopRecording => self.stop_recording(),
            GestureAction::StartRecording => self.start_recording(),
            GestureAction::ClearError => {
                self.presenter.hide_error_message();
                self.request_transition(Mode::Clock, None)
            }
            GestureAction::Wake => self.request_transition(Mode::Clock, None),
            GestureAction::CancelRecording => {
                self.recorder.cancel();
                self.request_transition(Mode::Clock, None)
            }
            GestureAction::StopPlayback => {
                self.stop_playback();
                self.request_transition(Mode::Clock, None)
            }
            GestureAction::WakeAndRecord => self.wake_and_record(),
            GestureAction::Sleep => self.request_transition(Mode::ScreenSleep, None),
        };

        if let Err(e) = outcome {
            debug!(error = %e, "gesture action dropped");
        }
    }

    fn wake_and_record(&mut self) -> Result<(), TransitionError> {
        self.request_transition(Mode::Clock, None)?;
        self.timers.arm(
            self.config.screen_wake_fade_in(),
            Timer::new(TimerAction::RecordAfterWake, ModeGuard::StillIn(Mode::Clock)),
        );
        Ok(())
    }

    pub fn start_recording(&mut self) -> Result<(), TransitionError> {
        if self.mode == Mode::Recording {
            debug!("already recording");
            return Ok(());
        }
        self.request_transition(Mode::Recording, None)?;
        self.recorder.start();
        Ok(())
    }

    pub fn stop_recording(&mut self) -> Result<(), TransitionError> {
        if self.mode != Mode::Recording {
            debug!(mode = %self.mode, "cannot stop recording, not recording");
            return Ok(());
        }
        self.request_transition(Mode::Processing, None)?;
        self.recorder.stop();
        Ok(())
    }

    /// Show the most recent dream
    pub fn play_most_recent(&mut self) -> Result<(), TransitionError> {
        self.show_dream()
    }

    /// Step back to the dream before the one showing
    pub fn play_previous(&mut self) -> Result<(), TransitionError> {
        self.show_dream()
    }

    // The backend keeps the playback cursor: after a reset its next dream
    // is the most recent one, afterwards each request steps back.
    fn show_dream(&mut self) -> Result<(), TransitionError> {
        self.accepts(Mode::Playback)?;
        self.backend.signal(BackendSignal::ShowPreviousDream);
        self.request_transition(Mode::Playback, None)
    }

    /// Disarm the auto-return timer and reset the backend's playback cursor.
    /// Does not change mode.
    pub fn stop_playback(&mut self) {
        if self.timers.cancel(TimerSlot::PlaybackReturn) {
            debug!("playback timer cancelled");
        }
        self.backend.signal(BackendSignal::ResetPlaybackState);
    }

    /// Enter `error` carrying `message`
    pub fn report_error(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.request_transition(Mode::Error, Some(message.into()))
    }

    pub fn update_timings(&mut self, patch: &TransitionConfigPatch) {
        self.config.apply(patch);
        info!(config = ?self.config, "transition timings updated");
    }

    pub fn set_input_mode(&mut self, input_mode: InputMode) {
        self.input_mode = input_mode;
    }

    /// Handle a fired timer, dropping it if superseded or stale
    pub fn on_timer(&mut self, fired: Fired) {
        if !self.timers.claim(&fired) {
            debug!(?fired, "superseded timer ignored");
            return;
        }
        if !fired.timer.guard.holds(self.mode) {
            debug!(?fired, mode = %self.mode, "stale timer ignored");
            return;
        }

        match fired.timer.action {
            TimerAction::ReturnToClock => {
                info!("playback finished, returning to clock");
                self.transition(Mode::Clock);
            }
            TimerAction::RecordAfterWake => {
                if let Err(e) = self.start_recording() {
                    debug!(error = %e, "recording after wake dropped");
                }
            }
            TimerAction::StartupFinish => {
                effects::complete(TimerAction::StartupFinish, &mut self.effects());
                self.transition(Mode::Clock);
            }
            action => effects::complete(action, &mut self.effects()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::state::testing::{test_config, Call, Harness};
    use crate::surface::Element;

    #[test]
    fn test_initial_state() {
        let harness = Harness::new(test_config());
        assert_eq!(harness.machine.mode(), Mode::Startup);
        assert_eq!(harness.machine.error(), None);
    }

    #[test]
    fn test_startup_sequence_resolves_into_clock() {
        let mut h = Harness::new(test_config());
        h.machine.start();
        assert!(h.log.contains(&Call::Status("Startup".into())));
        assert!(h.log.contains(&Call::Hide(Element::Clock)));
        assert!(h.log.contains(&Call::FadeIn(
            Element::Logo,
            Some(Duration::from_millis(1000))
        )));

        // logo fade in (1000) + delay (200)
        h.advance_ms(1199);
        assert!(!h.log.contains(&Call::FadeOut(
            Element::Logo,
            Some(Duration::from_millis(800))
        )));
        h.advance_ms(1);
        assert!(h.log.contains(&Call::FadeOut(
            Element::Logo,
            Some(Duration::from_millis(800))
        )));
        assert_eq!(h.machine.mode(), Mode::Startup);

        h.advance_ms(800);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert_eq!(h.machine.previous(), Mode::Startup);
        assert!(h.log.contains(&Call::Hide(Element::Logo)));
        assert!(h.log.contains(&Call::StartClock));
        assert!(h.log.contains(&Call::Status("Clock".into())));
    }

    #[test]
    fn test_startup_rejects_everything_but_clock() {
        let mut h = Harness::new(test_config());
        h.machine.start();

        for target in Mode::ALL {
            if target == Mode::Clock {
                continue;
            }
            assert_eq!(
                h.machine.request_transition(target, None),
                Err(TransitionError::StartupLocked { requested: target })
            );
            assert_eq!(h.machine.mode(), Mode::Startup);
        }

        for gesture in [Gesture::SingleTap, Gesture::DoubleTap, Gesture::LongTap] {
            h.machine.dispatch_gesture(gesture);
        }
        assert!(h.machine.play_most_recent().is_err());
        assert!(h.machine.start_recording().is_err());
        assert_eq!(h.machine.mode(), Mode::Startup);
        assert!(!h.log.contains(&Call::Signal(BackendSignal::ShowPreviousDream)));
        assert!(!h.log.contains(&Call::RecorderStart));
        assert!(h.drain_events().is_empty());

        assert!(h.machine.request_transition(Mode::Clock, None).is_ok());
        assert_eq!(h.machine.mode(), Mode::Clock);
    }

    #[test]
    fn test_stale_startup_steps_after_early_clock() {
        let mut h = Harness::new(test_config());
        h.machine.start();
        h.machine.request_transition(Mode::Clock, None).unwrap();
        h.drain_events();

        h.advance_ms(5000);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert!(h.drain_events().is_empty());
    }

    #[test]
    fn test_double_tap_then_single_tap() {
        let mut h = Harness::booted();

        h.machine.dispatch_gesture(Gesture::DoubleTap);
        assert_eq!(h.machine.mode(), Mode::Recording);
        assert!(h.log.contains(&Call::RecorderStart));
        assert!(h.log.contains(&Call::ShowIcon(Icon::Recording)));

        h.machine.dispatch_gesture(Gesture::SingleTap);
        assert_eq!(h.machine.mode(), Mode::Processing);
        assert!(h.log.contains(&Call::RecorderStop));
        assert!(h.log.contains(&Call::ShowIcon(Icon::Generating)));
    }

    #[test]
    fn test_playback_returns_to_clock_after_duration() {
        let mut h = Harness::booted();

        h.machine.request_transition(Mode::Playback, None).unwrap();
        h.advance_ms(4999);
        assert_eq!(h.machine.mode(), Mode::Playback);
        h.advance_ms(1);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert_eq!(h.machine.previous(), Mode::Playback);
    }

    #[test]
    fn test_playback_reentry_rearms_single_timer() {
        let mut h = Harness::booted();
        let returns = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&returns);
        h.machine.register_subscriber(move |current, previous| {
            if current == Mode::Clock && previous == Mode::Playback {
                *counter.lock().unwrap() += 1;
            }
        });

        h.machine.dispatch_gesture(Gesture::SingleTap);
        h.advance_ms(3000);
        h.machine.dispatch_gesture(Gesture::SingleTap);
        assert_eq!(h.machine.mode(), Mode::Playback);
        assert_eq!(h.log.count(&Call::Signal(BackendSignal::ShowPreviousDream)), 2);

        // first timer would have fired at 5000
        h.advance_ms(2500);
        assert_eq!(h.machine.mode(), Mode::Playback);

        h.advance_ms(2500);
        assert_eq!(h.machine.mode(), Mode::Clock);

        h.advance_ms(20_000);
        assert_eq!(*returns.lock().unwrap(), 1);
    }

    #[test]
    fn test_leaving_playback_cancels_return_timer() {
        let mut h = Harness::booted();
        h.machine.dispatch_gesture(Gesture::SingleTap);
        h.machine.report_error("generation failed").unwrap();
        h.advance_ms(10_000);
        assert_eq!(h.machine.mode(), Mode::Error);
    }

    #[test]
    fn test_error_message_lifecycle() {
        let mut h = Harness::booted();

        h.machine.report_error("X").unwrap();
        assert_eq!(h.machine.error(), Some("X"));
        assert!(h.log.contains(&Call::Status("Error - X".into())));
        assert!(h.log.contains(&Call::ShowErrorMessage("X".into())));
        assert!(h.log.contains(&Call::ShowIcon(Icon::Error)));

        h.machine.report_error("Y").unwrap();
        assert_eq!(h.machine.error(), Some("Y"));

        h.log.take();
        h.machine.dispatch_gesture(Gesture::SingleTap);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert_eq!(h.machine.error(), None);
        assert!(h.log.contains(&Call::HideErrorMessage));
        assert!(h.log.contains(&Call::HideIcons));
    }

    #[test]
    fn test_error_without_message_has_plain_status() {
        let mut h = Harness::booted();
        h.machine.request_transition(Mode::Error, None).unwrap();
        assert!(h.log.contains(&Call::Status("Error".into())));
        assert!(!h
            .log
            .take()
            .iter()
            .any(|call| matches!(call, Call::ShowErrorMessage(_))));
    }

    #[test]
    fn test_any_exit_from_error_clears_message() {
        let mut h = Harness::booted();
        h.machine.report_error("mic unplugged").unwrap();
        h.machine.request_transition(Mode::Recording, None).unwrap();
        assert_eq!(h.machine.error(), None);
        assert!(h.log.contains(&Call::HideErrorMessage));
    }

    #[test]
    fn test_subscribers_observe_committed_state_in_order() {
        let mut h = Harness::booted();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        h.machine
            .register_subscriber(move |current, previous| sink.lock().unwrap().push((current, previous)));

        h.machine.request_transition(Mode::Recording, None).unwrap();
        h.machine.request_transition(Mode::Processing, None).unwrap();
        h.machine.request_transition(Mode::Playback, None).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (Mode::Recording, Mode::Clock),
                (Mode::Processing, Mode::Recording),
                (Mode::Playback, Mode::Processing),
            ]
        );
    }

    #[test]
    fn test_state_event_broadcast() {
        let mut h = Harness::booted();
        h.machine.set_input_mode(InputMode::DoubleTap);
        h.machine.report_error("disk full").unwrap();

        let events = h.drain_events();
        assert_eq!(
            events,
            vec![StateEvent {
                mode: Mode::Error,
                previous: Mode::Clock,
                error: Some("disk full".into()),
                input_mode: InputMode::DoubleTap,
            }]
        );
    }

    #[test]
    fn test_screen_sleep_single_tap_wakes() {
        let mut h = Harness::booted();

        h.machine.dispatch_gesture(Gesture::LongTap);
        assert_eq!(h.machine.mode(), Mode::ScreenSleep);
        assert!(h.log.contains(&Call::SleepVisual(true)));
        assert!(h.log.contains(&Call::StopClock));

        h.machine.dispatch_gesture(Gesture::SingleTap);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert!(h.log.contains(&Call::SleepVisual(false)));
        assert!(h.log.contains(&Call::FadeIn(
            Element::Clock,
            Some(Duration::from_millis(350))
        )));
    }

    #[test]
    fn test_screen_sleep_double_tap_wakes_then_records() {
        let mut h = Harness::booted();
        h.machine.dispatch_gesture(Gesture::LongTap);

        h.machine.dispatch_gesture(Gesture::DoubleTap);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert!(!h.log.contains(&Call::RecorderStart));

        h.advance_ms(349);
        assert_eq!(h.machine.mode(), Mode::Clock);
        h.advance_ms(1);
        assert_eq!(h.machine.mode(), Mode::Recording);
        assert!(h.log.contains(&Call::RecorderStart));
    }

    #[test]
    fn test_wake_record_dropped_when_mode_moved_on() {
        let mut h = Harness::booted();
        h.machine.dispatch_gesture(Gesture::LongTap);
        h.machine.dispatch_gesture(Gesture::DoubleTap);
        h.machine.dispatch_gesture(Gesture::SingleTap);
        assert_eq!(h.machine.mode(), Mode::Playback);

        h.advance_ms(1000);
        assert_eq!(h.machine.mode(), Mode::Playback);
        assert!(!h.log.contains(&Call::RecorderStart));
    }

    #[test]
    fn test_recording_double_tap_cancels() {
        let mut h = Harness::booted();
        h.machine.dispatch_gesture(Gesture::DoubleTap);
        h.machine.dispatch_gesture(Gesture::DoubleTap);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert!(h.log.contains(&Call::RecorderCancel));
        assert!(!h.log.contains(&Call::RecorderStop));
    }

    #[test]
    fn test_playback_double_tap_stops_and_returns() {
        let mut h = Harness::booted();
        h.machine.dispatch_gesture(Gesture::SingleTap);
        h.log.take();

        h.machine.dispatch_gesture(Gesture::DoubleTap);
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert!(h.log.contains(&Call::Signal(BackendSignal::ResetPlaybackState)));
        h.advance_ms(10_000);
        assert_eq!(h.machine.mode(), Mode::Clock);
    }

    #[test]
    fn test_unlisted_gestures_change_nothing() {
        let mut h = Harness::booted();
        h.machine.request_transition(Mode::Processing, None).unwrap();
        h.drain_events();

        for gesture in [Gesture::SingleTap, Gesture::DoubleTap, Gesture::LongTap] {
            h.machine.dispatch_gesture(gesture);
        }
        assert_eq!(h.machine.mode(), Mode::Processing);
        assert!(h.drain_events().is_empty());
    }

    #[test]
    fn test_gesture_table_resulting_modes() {
        let cases = [
            (Mode::Clock, Gesture::SingleTap, Mode::Playback),
            (Mode::Clock, Gesture::DoubleTap, Mode::Recording),
            (Mode::Clock, Gesture::LongTap, Mode::ScreenSleep),
            (Mode::Recording, Gesture::SingleTap, Mode::Processing),
            (Mode::Recording, Gesture::DoubleTap, Mode::Clock),
            (Mode::Playback, Gesture::SingleTap, Mode::Playback),
            (Mode::Playback, Gesture::DoubleTap, Mode::Clock),
            (Mode::Error, Gesture::SingleTap, Mode::Clock),
            (Mode::ScreenSleep, Gesture::SingleTap, Mode::Clock),
            (Mode::ScreenSleep, Gesture::DoubleTap, Mode::Clock),
        ];

        for (from, gesture, expected) in cases {
            let mut h = Harness::booted();
            if from != Mode::Clock {
                h.machine.request_transition(from, None).unwrap();
            }
            h.drain_events();

            h.machine.dispatch_gesture(gesture);
            assert_eq!(h.machine.mode(), expected, "{gesture} in {from}");
            assert_eq!(h.drain_events().len(), 1, "{gesture} in {from}");
        }
    }

    #[test]
    fn test_start_recording_is_idempotent() {
        let mut h = Harness::booted();
        h.machine.start_recording().unwrap();
        h.drain_events();
        h.machine.start_recording().unwrap();
        assert_eq!(h.log.count(&Call::RecorderStart), 1);
        assert!(h.drain_events().is_empty());
    }

    #[test]
    fn test_stop_recording_outside_recording_is_noop() {
        let mut h = Harness::booted();
        h.machine.stop_recording().unwrap();
        assert_eq!(h.machine.mode(), Mode::Clock);
        assert!(!h.log.contains(&Call::RecorderStop));
    }

    #[test]
    fn test_stop_playback_keeps_mode() {
        let mut h = Harness::booted();
        h.machine.play_most_recent().unwrap();
        h.machine.stop_playback();
        assert_eq!(h.machine.mode(), Mode::Playback);
        h.advance_ms(10_000);
        assert_eq!(h.machine.mode(), Mode::Playback);
    }

    #[test]
    fn test_update_timings_applies_to_next_transition() {
        let mut h = Harness::booted();
        h.machine.update_timings(&TransitionConfigPatch {
            clock_fade_out_duration: Some(90),
            ..Default::default()
        });
        assert_eq!(h.machine.config().clock_fade_out_duration, 90);

        h.machine.request_transition(Mode::Recording, None).unwrap();
        assert!(h.log.contains(&Call::FadeOut(
            Element::Clock,
            Some(Duration::from_millis(90))
        )));
    }

    #[test]
    fn test_effects_run_before_subscribers() {
        let mut h = Harness::booted();
        let log = h.log.clone();
        h.machine.register_subscriber(move |_, _| {
            assert!(log.contains(&Call::Show(Element::VideoContainer)));
        });
        h.machine.request_transition(Mode::Playback, None).unwrap();
    }
}
