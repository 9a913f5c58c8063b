//! pokebattle - fighter picker TUI built on tui-dispatch

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokebattle::action::Action;
use pokebattle::api::{self, HttpFeedClient};
use pokebattle::components::{
    BattleScreen, BattleScreenProps, Component, DetailViewer, DetailViewerProps,
};
use pokebattle::config::FeedConfig;
use pokebattle::effect::Effect;
use pokebattle::logging::init_logging;
use pokebattle::record::Feed;
use pokebattle::reducer::reducer;
use pokebattle::sprite_backend::{self, clear_sprites, SpriteBackend};
use pokebattle::state::{AppState, TICK_MS};

const AUTOSCROLL_TASK: &str = "autoscroll";

/// Pick two fighters from a ranked list and a scrolling gallery
#[derive(Parser, Debug)]
#[command(name = "pokebattle")]
#[command(about = "Pick two fighters from a ranked list and a scrolling gallery")]
struct Args {
    #[command(flatten)]
    feeds: FeedConfig,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum BattleComponentId {
    Screen,
    Viewer,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum BattleContext {
    Main,
    Viewer,
}

impl EventRoutingState<BattleComponentId, BattleContext> for AppState {
    fn focused(&self) -> Option<BattleComponentId> {
        if self.viewer.is_open() {
            Some(BattleComponentId::Viewer)
        } else {
            Some(BattleComponentId::Screen)
        }
    }

    fn modal(&self) -> Option<BattleComponentId> {
        if self.viewer.is_open() {
            Some(BattleComponentId::Viewer)
        } else {
            None
        }
    }

    fn binding_context(&self, id: BattleComponentId) -> BattleContext {
        match id {
            BattleComponentId::Screen => BattleContext::Main,
            BattleComponentId::Viewer => BattleContext::Viewer,
        }
    }

    fn default_context(&self) -> BattleContext {
        BattleContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        feeds,
        debug: debug_args,
    } = Args::parse();

    let log_dir = feeds.resolved_log_dir();
    let _log_guard = init_logging(&log_dir).map_err(|error| {
        io::Error::new(
            error.kind(),
            format!("cannot log to {}: {error}", log_dir.display()),
        )
    })?;
    tracing::info!(
        ranked_url = %feeds.ranked_url,
        gallery_url = %feeds.gallery_url,
        "starting"
    );

    let debug = DebugSession::new(debug_args);

    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            let mut state = AppState::with_config(&feeds);
            if let Ok((width, _)) = crossterm::terminal::size() {
                state.terminal_width = width;
            }
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = SpriteBackend::new(stdout, sprite_backend::sprite_registry());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("exiting");
    Ok(())
}

struct BattleUi {
    screen: BattleScreen,
    viewer: DetailViewer,
}

impl BattleUi {
    fn new() -> Self {
        Self {
            screen: BattleScreen::new(),
            viewer: DetailViewer::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<BattleComponentId>,
    ) {
        clear_sprites();
        event_ctx.set_component_area(BattleComponentId::Screen, area);

        let props = BattleScreenProps {
            state,
            is_focused: render_ctx.is_focused() && !state.viewer.is_open(),
        };
        self.screen.render(frame, area, props);

        if let Some(session) = state.viewer.session() {
            // Slot portraits would be painted over the modal.
            clear_sprites();
            event_ctx.set_component_area(BattleComponentId::Viewer, DetailViewer::modal_area(area));
            let props = DetailViewerProps {
                session,
                record: state.viewed_record(),
                len: state.store.len(session.feed),
                is_focused: render_ctx.is_focused(),
            };
            self.viewer.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&BattleComponentId::Viewer);
        }
    }

    fn handle_screen_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = BattleScreenProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .screen
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_viewer_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(session) = state.viewer.session() else {
            return HandlerResponse::ignored();
        };
        let props = DetailViewerProps {
            session,
            record: state.viewed_record(),
            len: state.store.len(session.feed),
            is_focused: true,
        };
        let actions: Vec<_> = self.viewer.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(BattleUi::new()));
    let mut bus: EventBus<AppState, Action, BattleComponentId, BattleContext> = EventBus::new();
    let keybindings: Keybindings<BattleContext> = Keybindings::new();

    let ui_screen = Rc::clone(&ui);
    bus.register(BattleComponentId::Screen, move |event, state| {
        ui_screen
            .borrow_mut()
            .handle_screen_event(&event.kind, state)
    });

    let ui_viewer = Rc::clone(&ui);
    bus.register(BattleComponentId::Viewer, move |event, state| {
        ui_viewer
            .borrow_mut()
            .handle_viewer_event(&event.kind, state)
    });

    // The gallery viewport follows the terminal width.
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => HandlerResponse {
            actions: vec![Action::UiTerminalResize(width, height)],
            consumed: false,
            needs_render: true,
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn feed_task(feed: Feed) -> &'static str {
    match feed {
        Feed::Ranked => "feed_ranked",
        Feed::Gallery => "feed_gallery",
    }
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadFeed {
            feed,
            generation,
            url,
            retry,
        } => {
            ctx.tasks().spawn(feed_task(feed), async move {
                match api::load_feed(&HttpFeedClient, feed, &url, retry).await {
                    Ok(records) => Action::FeedDidLoad {
                        feed,
                        generation,
                        records,
                    },
                    Err(e) => Action::FeedDidError {
                        feed,
                        generation,
                        error: e.to_string(),
                    },
                }
            });
        }
        Effect::ScrollSchedule {
            generation,
            interval_ms,
        } => {
            ctx.tasks().spawn(AUTOSCROLL_TASK, async move {
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                Action::AutoscrollTick(generation)
            });
        }
        Effect::ScrollCancel => {
            ctx.tasks().cancel(&TaskKey::new(AUTOSCROLL_TASK));
        }
    }
}
