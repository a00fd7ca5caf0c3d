//! Goal browser host (`buzz` with no subcommand)
//!
//! The component owns no session logic. Terminal input is turned into
//! [`Event`]s and pushed onto a channel; a single async pump drains the
//! channel through the reducer, hands effects to the [`EffectRunner`] and
//! publishes the rendered [`Frame`] back to the component.

use std::path::PathBuf;
use std::sync::Arc;

use iocraft::prelude::*;
use jiff::Timestamp;
use tokio::sync::{Mutex, mpsc};

use super::keymap::key_from_event;
use super::model::{Event, SessionSettings, Viewport};
use super::reducer;
use super::render::{Frame, Span, render};
use super::runner::EffectRunner;
use super::theme::theme;
use crate::refresh;
use crate::remote::BeeminderClient;

/// Props for the GoalBrowser component
#[derive(Default, Props)]
pub struct GoalBrowserProps {
    pub client: Option<Arc<BeeminderClient>>,
    pub settings: Option<SessionSettings>,
    /// Flag file polled for refresh requests from other processes
    pub refresh_flag: Option<PathBuf>,
}

/// Full-screen goal grid
#[component]
pub fn GoalBrowser<'a>(props: &GoalBrowserProps, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();

    // Sender and receiver must come from the same channel, so both live in
    // one state slot.
    struct EventChannel {
        tx: mpsc::UnboundedSender<Event>,
        rx: Arc<Mutex<mpsc::UnboundedReceiver<Event>>>,
    }
    let channel: State<EventChannel> = hooks.use_state(|| {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        EventChannel {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    });
    let event_sender = channel.read().tx.clone();
    let event_receiver = channel.read().rx.clone();

    let frame: State<Frame> = hooks.use_state(|| Frame::new(width, height));
    let mut should_exit = hooks.use_state(|| false);
    let mut last_viewport = hooks.use_state(|| Viewport { width, height });

    let session_pump: Handler<()> = hooks.use_async_handler({
        let client = props.client.clone();
        let settings = props.settings.clone().unwrap_or_default();
        let refresh_flag = props.refresh_flag.clone();
        let event_sender = event_sender.clone();
        let frame_setter = frame;
        let exit_setter = should_exit;

        move |()| {
            let client = client.clone();
            let mut settings = settings.clone();
            let refresh_flag = refresh_flag.clone();
            let event_sender = event_sender.clone();
            let event_receiver = event_receiver.clone();
            let mut frame_setter = frame_setter;
            let mut exit_setter = exit_setter;

            settings.viewport = Viewport { width, height };

            async move {
                let Some(client) = client else {
                    tracing::error!("goal browser started without a client");
                    exit_setter.set(true);
                    return;
                };
                let runner = EffectRunner::new(client, event_sender.clone());

                let (mut state, effects) = reducer::initial(settings);
                frame_setter.set(render(&state));
                runner.spawn_all(effects);

                if let Some(path) = refresh_flag {
                    let sender = event_sender.clone();
                    tokio::spawn(refresh::watch(path, refresh::POLL_INTERVAL, move || {
                        sender.send(Event::ExternalRefreshRequested).is_ok()
                    }));
                }

                let mut events = event_receiver.lock().await;
                while let Some(event) = events.recv().await {
                    tracing::trace!(?event, "session event");
                    let (next, effects) = reducer::handle(state, event);
                    state = next;
                    runner.spawn_all(effects);
                    frame_setter.set(render(&state));
                    if state.should_exit {
                        break;
                    }
                }
                exit_setter.set(true);
            }
        }
    });

    // Start the session once on mount
    let mut pump_started = hooks.use_state(|| false);
    if !pump_started.get() {
        pump_started.set(true);
        session_pump(());
    }

    let viewport = Viewport { width, height };
    if last_viewport.get() != viewport {
        last_viewport.set(viewport);
        if event_sender.send(Event::Resize(viewport)).is_err() {
            tracing::debug!("resize after session ended");
        }
    }

    hooks.use_terminal_events({
        let event_sender = event_sender.clone();
        move |event| {
            let TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                return;
            };
            if let Some(key) = key_from_event(code, modifiers, kind) {
                let event = Event::Key {
                    key,
                    at: Timestamp::now(),
                };
                if event_sender.send(event).is_err() {
                    tracing::debug!("key after session ended");
                }
            }
        }
    });

    if should_exit.get() {
        system.exit();
    }

    let theme = theme();
    let rows: Vec<Vec<Span>> = {
        let frame = frame.read();
        (0..frame.height()).map(|y| frame.spans(y)).collect()
    };

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            #(rows.into_iter().map(|spans| element! {
                View(
                    height: 1,
                    flex_direction: FlexDirection::Row,
                    flex_shrink: 0.0,
                ) {
                    #(spans.into_iter().map(|span| {
                        let span_width =
                            u16::try_from(span.text.chars().count()).unwrap_or(u16::MAX);
                        element! {
                            View(width: span_width, flex_shrink: 0.0) {
                                Text(
                                    content: span.text,
                                    color: theme.tone_color(span.tone),
                                    weight: if span.strong { Weight::Bold } else { Weight::Normal },
                                )
                            }
                        }
                    }))
                }
            }))
        }
    }
}
