use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::i18n::LocaleContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    History,
    Learn,
    Settings,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::History, Route::Learn, Route::Settings];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::History => "/history",
            Route::Learn => "/learn",
            Route::Settings => "/settings",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = format!("/{}", path.trim().trim_start_matches('/'));
        Route::ALL.iter().copied().find(|route| route.path() == path)
    }

    fn label_key(&self) -> &'static str {
        match self {
            Route::Home => "nav.home",
            Route::History => "nav.history",
            Route::Learn => "nav.learn",
            Route::Settings => "nav.settings",
        }
    }
}

/// Mount generation of one screen. Every mount and unmount bumps it, so a
/// token taken before an await tells whether the screen was left meanwhile.
#[derive(Debug, Clone, Default)]
pub struct ScreenLifecycle {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct MountToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl ScreenLifecycle {
    pub fn mount(&self) -> MountToken {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.token()
    }

    pub fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn token(&self) -> MountToken {
        MountToken {
            generation: self.generation.load(Ordering::SeqCst),
            current: Arc::clone(&self.generation),
        }
    }
}

impl MountToken {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// Tracks the active route and the lifecycle of every screen.
#[derive(Debug)]
pub struct Navigator {
    active: Route,
    lifecycles: HashMap<Route, ScreenLifecycle>,
}

impl Navigator {
    pub fn new(start: Route) -> Navigator {
        let lifecycles: HashMap<Route, ScreenLifecycle> = Route::ALL
            .iter()
            .map(|route| (*route, ScreenLifecycle::default()))
            .collect();

        lifecycles[&start].mount();

        Navigator {
            active: start,
            lifecycles,
        }
    }

    pub fn active(&self) -> Route {
        self.active
    }

    pub fn lifecycle(&self, route: Route) -> ScreenLifecycle {
        self.lifecycles[&route].clone()
    }

    /// Switches screens; returns false when `to` is already active.
    pub fn navigate(&mut self, to: Route) -> bool {
        if to == self.active {
            return false;
        }

        debug!("Navigate {} -> {}", self.active.path(), to.path());

        self.lifecycles[&self.active].unmount();
        self.lifecycles[&to].mount();
        self.active = to;

        true
    }

    pub fn render_nav_bar(&self, locale: &LocaleContext) -> String {
        Route::ALL
            .iter()
            .map(|route| {
                let label = locale.t(route.label_key());
                if *route == self.active {
                    format!("[{}]", label)
                } else {
                    format!(" {} ", label)
                }
            })
            .collect::<Vec<String>>()
            .join(" | ")
    }
}
