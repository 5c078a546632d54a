use anyhow::{anyhow, Error};
use log::{info, warn};
use std::sync::Arc;

use crate::i18n::LocaleContext;
use crate::models::language::Language;
use crate::screens::history_screen::HistoryScreen;
use crate::screens::home_screen::HomeScreen;
use crate::screens::learn_screen::LearnScreen;
use crate::screens::navigation::{Navigator, Route};
use crate::screens::settings_screen::SettingsScreen;
use crate::services::media_service::MediaPicker;
use crate::services::plant_api_service::PlantApi;
use crate::services::prompt_service::Prompter;

pub const HELP: &str = "\
Commands:
  home | history | learn | settings   switch screen
  pick                                choose an image file (home)
  camera                              capture a photo (home)
  remove                              drop the selected image (home)
  analyse                             submit the selected image (home)
  refresh                             reload the history (history)
  delete <id>                         delete a history record (history)
  expand <n>                          show or hide details of card n (learn)
  lang <en|hi|ta|te>                  change language (settings)
  about                               about this app (settings)
  help                                show this help
  quit                                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Route),
    Pick,
    Camera,
    Remove,
    Analyse,
    Refresh,
    Delete(String),
    Expand(usize),
    Language(Language),
    About,
    Help,
    Quit,
}

impl AppCommand {
    pub fn parse(line: &str) -> Result<AppCommand, Error> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        let argument = words.next();

        let command = match (name.as_str(), argument) {
            ("pick", None) | ("upload", None) => AppCommand::Pick,
            ("camera", None) => AppCommand::Camera,
            ("remove", None) => AppCommand::Remove,
            ("analyse", None) | ("analyze", None) => AppCommand::Analyse,
            ("refresh", None) => AppCommand::Refresh,
            ("delete", Some(id)) => AppCommand::Delete(id.to_string()),
            ("expand", Some(n)) => {
                let n: usize = n
                    .parse()
                    .map_err(|_| anyhow!("Card number expected, got {}", n))?;
                if n == 0 {
                    return Err(anyhow!("Cards are numbered from 1"));
                }
                AppCommand::Expand(n - 1)
            }
            ("lang", Some(code)) => AppCommand::Language(
                Language::from_code(code).ok_or_else(|| anyhow!("Unsupported language {}", code))?,
            ),
            ("about", None) => AppCommand::About,
            ("help", None) => AppCommand::Help,
            ("quit", None) | ("exit", None) => AppCommand::Quit,
            (path, None) => AppCommand::Navigate(
                Route::from_path(path).ok_or_else(|| anyhow!("Unknown command {}", line.trim()))?,
            ),
            _ => return Err(anyhow!("Unknown command {}", line.trim())),
        };

        Ok(command)
    }

    /// Screen the command belongs to, if it is screen-specific.
    pub fn route(&self) -> Option<Route> {
        match self {
            AppCommand::Pick | AppCommand::Camera | AppCommand::Remove | AppCommand::Analyse => {
                Some(Route::Home)
            }
            AppCommand::Refresh | AppCommand::Delete(_) => Some(Route::History),
            AppCommand::Expand(_) => Some(Route::Learn),
            AppCommand::Language(_) | AppCommand::About => Some(Route::Settings),
            AppCommand::Navigate(_) | AppCommand::Help | AppCommand::Quit => None,
        }
    }
}

/// Owns the screens and the collaborators they are driven with.
pub struct App {
    api: Arc<dyn PlantApi>,
    picker: Arc<dyn MediaPicker>,
    prompter: Arc<dyn Prompter>,
    locale: LocaleContext,
    navigator: Navigator,
    home: HomeScreen,
    history: HistoryScreen,
    learn: LearnScreen,
    settings: SettingsScreen,
}

impl App {
    pub fn new(
        api: Arc<dyn PlantApi>,
        picker: Arc<dyn MediaPicker>,
        prompter: Arc<dyn Prompter>,
        locale: LocaleContext,
    ) -> App {
        let navigator = Navigator::new(Route::Home);

        App {
            home: HomeScreen::new(navigator.lifecycle(Route::Home)),
            history: HistoryScreen::new(navigator.lifecycle(Route::History)),
            learn: LearnScreen::new(),
            settings: SettingsScreen::new(locale.language()),
            api,
            picker,
            prompter,
            locale,
            navigator,
        }
    }

    pub fn locale(&self) -> &LocaleContext {
        &self.locale
    }

    pub fn active(&self) -> Route {
        self.navigator.active()
    }

    pub fn home(&self) -> &HomeScreen {
        &self.home
    }

    pub fn history(&self) -> &HistoryScreen {
        &self.history
    }

    pub fn learn(&self) -> &LearnScreen {
        &self.learn
    }

    pub async fn navigate(&mut self, route: Route) {
        if !self.navigator.navigate(route) {
            return;
        }

        match route {
            Route::Home => self.home.on_mount(),
            Route::History => {
                self.history.on_mount();
                self.history.fetch_history(self.api.as_ref()).await;
            }
            Route::Learn | Route::Settings => {}
        }
    }

    /// Runs one command; returns false once the user asked to quit.
    pub async fn execute(&mut self, command: AppCommand) -> bool {
        if let Some(route) = command.route() {
            if route != self.active() {
                warn!("{:?} is only available on {}", command, route.path());
                return true;
            }
        }

        match command {
            AppCommand::Navigate(route) => self.navigate(route).await,
            AppCommand::Pick => {
                self.home.pick_image(self.picker.as_ref()).await;
            }
            AppCommand::Camera => {
                self.home.take_photo(self.picker.as_ref()).await;
            }
            AppCommand::Remove => self.home.remove_image(),
            AppCommand::Analyse => {
                self.home
                    .analyse(self.api.as_ref(), self.prompter.as_ref(), &self.locale)
                    .await;
            }
            AppCommand::Refresh => {
                self.history.fetch_history(self.api.as_ref()).await;
            }
            AppCommand::Delete(id) => {
                self.history
                    .delete_record(&id, self.api.as_ref(), self.prompter.as_ref(), &self.locale)
                    .await;
            }
            AppCommand::Expand(index) => self.learn.toggle(index),
            AppCommand::Language(language) => {
                self.locale =
                    self.settings
                        .change_language(&self.locale, language, self.prompter.as_ref());
            }
            AppCommand::About => self.settings.about(self.prompter.as_ref(), &self.locale),
            AppCommand::Help => self.prompter.alert("", HELP),
            AppCommand::Quit => {
                info!("Bye");
                return false;
            }
        }

        true
    }

    /// Active screen followed by the navigation bar.
    pub fn render(&self) -> String {
        let screen = match self.active() {
            Route::Home => self.home.render(&self.locale),
            Route::History => self.history.render(&self.locale),
            Route::Learn => self.learn.render(&self.locale),
            Route::Settings => self.settings.render(&self.locale),
        };

        format!("{}\n\n{}", screen, self.navigator.render_nav_bar(&self.locale))
    }
}
