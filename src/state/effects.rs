//! Visual side effects of a transition
//!
//! Given the target and previous mode, issue the fade sequence for the
//! video surface, the screen-sleep state and the clock surface. The three
//! concerns are independent of each other. Completions are scheduled as
//! guarded timers and applied by [`complete`] once they fire.

use crate::config::TransitionConfig;
use crate::state::Mode;
use crate::surface::{Backend, BackendSignal, Element, Presenter};
use crate::timer::{ModeGuard, Timer, TimerAction, TimerRegistry};

/// What the effects layer may touch
pub struct Effects<'a> {
    pub presenter: &'a mut dyn Presenter,
    pub backend: &'a dyn Backend,
    pub timers: &'a mut TimerRegistry,
    pub config: &'a TransitionConfig,
}

/// Issue the effects of moving from `previous` into `target`
pub fn drive(target: Mode, previous: Mode, fx: &mut Effects<'_>) {
    video_surface(target, previous, fx);
    screen_sleep(target, previous, fx);
    clock_surface(target, previous, fx);
}

fn video_surface(target: Mode, previous: Mode, fx: &mut Effects<'_>) {
    if target == Mode::Playback {
        fx.presenter.show(Element::VideoContainer);
        fx.presenter.fade_in(Element::VideoContainer, None);
        fx.timers.arm(
            fx.config.transition_delay(),
            Timer::new(TimerAction::RevealVideo, ModeGuard::StillIn(Mode::Playback)),
        );
    } else if previous == Mode::Playback {
        fx.backend.signal(BackendSignal::ResetPlaybackState);
        fx.presenter.fade_out(Element::Video, None);
        fx.presenter.fade_out(Element::VideoContainer, None);
        fx.timers.arm(
            fx.config.logo_fade_out(),
            Timer::new(TimerAction::HideContainer, ModeGuard::NotIn(Mode::Playback)),
        );
    }
}

fn screen_sleep(target: Mode, previous: Mode, fx: &mut Effects<'_>) {
    if target == Mode::ScreenSleep {
        fx.presenter.set_sleep_visual(true);
        fx.presenter
            .fade_out(Element::Clock, Some(fx.config.screen_sleep_fade_out()));
        fx.timers.arm(
            fx.config.screen_sleep_fade_out(),
            Timer::new(TimerAction::HideClock, ModeGuard::StillIn(Mode::ScreenSleep)),
        );
        fx.presenter.stop_clock();
    } else if previous == Mode::ScreenSleep {
        fx.presenter.set_sleep_visual(false);
        if target == Mode::Clock {
            fx.presenter.show(Element::Clock);
            fx.presenter
                .fade_in(Element::Clock, Some(fx.config.screen_wake_fade_in()));
            ensure_clock_running(fx.presenter);
        }
    }
}

fn clock_surface(target: Mode, previous: Mode, fx: &mut Effects<'_>) {
    if target == Mode::Clock && previous != Mode::ScreenSleep {
        fx.presenter.show(Element::Clock);
        fx.presenter
            .fade_in(Element::Clock, Some(fx.config.clock_fade_in()));
        ensure_clock_running(fx.presenter);
    } else if previous == Mode::Clock && target != Mode::ScreenSleep {
        fx.presenter
            .fade_out(Element::Clock, Some(fx.config.clock_fade_out()));
        fx.timers.arm(
            fx.config.clock_fade_out(),
            Timer::new(TimerAction::HideClock, ModeGuard::NotIn(Mode::Clock)),
        );
    }
}

fn ensure_clock_running(presenter: &mut dyn Presenter) {
    if !presenter.clock_running() {
        presenter.start_clock();
    }
}

/// Begin the logo animation. Only the clock may follow it.
pub fn begin_startup(fx: &mut Effects<'_>) {
    fx.presenter.hide(Element::Clock);
    fx.presenter.fade_out(Element::Clock, Some(std::time::Duration::ZERO));

    fx.presenter.fade_out(Element::Logo, Some(std::time::Duration::ZERO));
    fx.presenter.show(Element::Logo);
    fx.presenter
        .fade_in(Element::Logo, Some(fx.config.logo_fade_in()));

    fx.timers.arm(
        fx.config.logo_fade_in() + fx.config.transition_delay(),
        Timer::new(
            TimerAction::StartupFadeOutLogo,
            ModeGuard::StillIn(Mode::Startup),
        ),
    );
}

/// Apply the visual part of a fired timer whose guard still holds
pub fn complete(action: TimerAction, fx: &mut Effects<'_>) {
    match action {
        TimerAction::StartupFadeOutLogo => {
            fx.presenter
                .fade_out(Element::Logo, Some(fx.config.logo_fade_out()));
            fx.timers.arm(
                fx.config.logo_fade_out(),
                Timer::new(TimerAction::StartupFinish, ModeGuard::StillIn(Mode::Startup)),
            );
        }
        TimerAction::StartupFinish => {
            fx.presenter.hide(Element::Logo);
        }
        TimerAction::RevealVideo => {
            fx.presenter.fade_in(Element::Video, None);
            fx.presenter.play_video();
        }
        TimerAction::HideContainer => {
            fx.presenter.hide(Element::VideoContainer);
            fx.presenter.reset_video();
        }
        TimerAction::HideClock => {
            fx.presenter.hide(Element::Clock);
        }
        TimerAction::ReturnToClock | TimerAction::RecordAfterWake => {}
    }
}
