//! Application controller
//!
//! Wires the store, the conversation engine and the menu workspace into one
//! session: pick a mode, chat until the conversation materializes, generate
//! the dish or menu, then edit or analyze the result.
//!
//! The store is shared behind a `tokio::sync::Mutex` so a front end can
//! navigate while a generation is pending. The lock is never held across a
//! service call; an answer that arrives after navigation is dropped as stale.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::conversation::{ConversationEngine, ConversationError, TurnOutcome};
use crate::domain::{CreationMode, GenerationStatus, MarketReport, MaterializeRequest, MenuProject, Recipe};
use crate::generation::{GenerationError, GenerationService, LlmGenerationService, SessionMode};
use crate::i18n::{Locale, Text};
use crate::sor::SorLibrary;
use crate::store::{ModeStore, StoreError};
use crate::workspace::{MenuWorkspace, WorkspaceError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no creation mode selected")]
    NoMode,

    #[error("{0} mode has no conversational generation")]
    NotGenerative(CreationMode),

    #[error("no conversation in progress")]
    NoConversation,

    #[error("no dish to analyze")]
    NoDish,

    #[error("no menu to edit")]
    NoMenu,

    #[error("no previous request to retry")]
    NothingToRetry,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// `notice` is the localized sentence shown to the user
    #[error("{notice}")]
    Generation {
        notice: String,
        #[source]
        source: GenerationError,
    },
}

impl AppError {
    /// The localized sentence a front end shows for this error
    ///
    /// Internal details stay in the `Display` chain for the log.
    pub fn notice(&self, locale: Locale) -> &str {
        match self {
            Self::NoMode => locale.text(Text::NoMode),
            Self::NotGenerative(_) => locale.text(Text::ModeUnavailable),
            Self::NoConversation => locale.text(Text::NoConversation),
            Self::NoDish => locale.text(Text::NoDish),
            Self::NoMenu => locale.text(Text::NoMenu),
            Self::NothingToRetry => locale.text(Text::NothingToRetry),
            Self::Store(e) => e.notice(locale),
            Self::Conversation(e) => e.notice(locale),
            Self::Workspace(e) => e.notice(locale),
            Self::Generation { notice, .. } => notice,
        }
    }
}

pub struct App {
    store: Arc<Mutex<ModeStore>>,
    service: Arc<dyn GenerationService>,
    locale: Locale,
    sor: Arc<SorLibrary>,
    default_courses: u32,
    engine: Option<ConversationEngine>,
    workspace: Option<MenuWorkspace>,
    dish_report: Option<MarketReport>,
    last_request: Option<MaterializeRequest>,
}

impl App {
    pub fn new(service: Arc<dyn GenerationService>, locale: Locale) -> Self {
        debug!(%locale, "App::new: called");
        Self {
            store: Arc::new(Mutex::new(ModeStore::new())),
            service,
            locale,
            sor: Arc::new(SorLibrary::default()),
            default_courses: 5,
            engine: None,
            workspace: None,
            dish_report: None,
            last_request: None,
        }
    }

    pub fn with_sor(mut self, sor: SorLibrary) -> Self {
        self.sor = Arc::new(sor);
        self
    }

    pub fn with_default_courses(mut self, courses: u32) -> Self {
        self.default_courses = courses.max(1);
        self
    }

    /// Build the production app: provider client, prompts and SOR library
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        debug!(provider = %config.llm.provider, "App::from_config: called");
        let service = LlmGenerationService::from_config(config)?.with_default_courses(config.menu.default_courses);
        let sor = match &config.sor.library_path {
            Some(path) => SorLibrary::load(path),
            None => SorLibrary::default(),
        };
        Ok(Self::new(Arc::new(service), config.locale)
            .with_sor(sor)
            .with_default_courses(config.menu.default_courses))
    }

    /// Shared handle to the store
    pub fn store(&self) -> Arc<Mutex<ModeStore>> {
        Arc::clone(&self.store)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn sor(&self) -> &SorLibrary {
        &self.sor
    }

    pub async fn status(&self) -> GenerationStatus {
        self.store.lock().await.status()
    }

    pub async fn mode(&self) -> Option<CreationMode> {
        self.store.lock().await.mode()
    }

    pub fn engine(&self) -> Option<&ConversationEngine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut ConversationEngine> {
        self.engine.as_mut()
    }

    pub fn workspace(&self) -> Option<&MenuWorkspace> {
        self.workspace.as_ref()
    }

    pub fn workspace_mut(&mut self) -> Option<&mut MenuWorkspace> {
        self.workspace.as_mut()
    }

    pub fn dish_report(&self) -> Option<&MarketReport> {
        self.dish_report.as_ref()
    }

    fn drop_session(&mut self) {
        self.engine = None;
        self.workspace = None;
        self.dish_report = None;
    }

    /// Choose a creation mode and open its dashboard
    pub async fn select_mode(&mut self, mode: CreationMode) {
        debug!(%mode, "select_mode: called");
        let mut store = self.store.lock().await;
        if store.mode() != Some(mode) {
            self.engine = None;
            self.workspace = None;
            self.dish_report = None;
            self.last_request = None;
        }
        store.set_mode(mode);
    }

    /// Back to mode selection, abandoning whatever is in flight
    pub async fn go_home(&mut self) {
        debug!("go_home: called");
        self.store.lock().await.go_home();
        self.drop_session();
        self.last_request = None;
    }

    /// Open a fresh conversation for the current mode
    pub async fn start_conversation(&mut self) -> Result<&mut ConversationEngine, AppError> {
        debug!("start_conversation: called");
        let mode = self.store.lock().await.mode().ok_or(AppError::NoMode)?;
        let session_mode = SessionMode::for_mode(mode).ok_or(AppError::NotGenerative(mode))?;

        let mut engine = ConversationEngine::start(Arc::clone(&self.service), session_mode, self.locale).await?;
        if session_mode == SessionMode::Menu {
            engine = engine.with_course_count(self.default_courses);
        }
        info!(session = %engine.session_id(), %mode, "Conversation opened");
        Ok(self.engine.insert(engine))
    }

    /// Send a chat turn; a materialized conversation goes straight to generation
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, AppError> {
        debug!(text_len = text.len(), "send_message: called");
        let engine = self.engine.as_mut().ok_or(AppError::NoConversation)?;
        let outcome = engine.send_message(text).await?;
        if let TurnOutcome::Materialized(request) = &outcome {
            self.engine = None;
            self.evoke(request.clone()).await?;
        }
        Ok(outcome)
    }

    /// Explicit hand-off: summarize the conversation and generate
    pub async fn materialize(&mut self) -> Result<MaterializeRequest, AppError> {
        debug!("materialize: called");
        let engine = self.engine.as_mut().ok_or(AppError::NoConversation)?;
        let request = engine.materialize().await?;
        self.engine = None;
        self.evoke(request.clone()).await?;
        Ok(request)
    }

    /// Run one generation attempt for the current mode
    ///
    /// Matching SOR cards are appended as an extra constraint. The result or
    /// the localized failure lands in the store, unless the user navigated
    /// away in the meantime, in which case `StoreError::Stale` is returned.
    pub async fn evoke(&mut self, mut request: MaterializeRequest) -> Result<(), AppError> {
        debug!(ingredients = ?request.ingredients, "evoke: called");
        let (ticket, mode) = {
            let mut store = self.store.lock().await;
            let mode = store.mode().ok_or(AppError::NoMode)?;
            if !mode.is_generative() {
                return Err(AppError::NotGenerative(mode));
            }
            (store.start_loading()?, mode)
        };
        self.workspace = None;
        self.dish_report = None;
        self.last_request = Some(request.clone());

        if let Some(enrichment) = self.sor.enrichment(&request.ingredients) {
            debug!("evoke: adding SOR context");
            request.constraints.push(enrichment);
        }

        let outcome = match mode {
            CreationMode::Menu => {
                request.course_count.get_or_insert(self.default_courses);
                self.service.generate_menu(&request).await.map(Generated::Menu)
            }
            _ => self.service.generate_dish(&request).await.map(Generated::Dish),
        };

        let mut store = self.store.lock().await;
        match outcome {
            Ok(Generated::Dish(recipe)) => {
                store.set_single_dish(ticket, recipe)?;
                info!("Dish generated");
            }
            Ok(Generated::Menu(menu)) => {
                store.set_menu_project(ticket, menu.clone())?;
                info!(courses = menu.courses.len(), "Menu generated");
                self.workspace = Some(MenuWorkspace::new(menu, Arc::clone(&self.service), self.locale));
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                let notice = self.locale.text(Text::GenerationError).to_string();
                store.set_error(ticket, notice.clone())?;
                return Err(AppError::Generation { notice, source: e });
            }
        }
        Ok(())
    }

    /// Clear the last outcome and run the same request again
    pub async fn retry(&mut self) -> Result<(), AppError> {
        debug!("retry: called");
        let request = self.last_request.clone().ok_or(AppError::NothingToRetry)?;
        self.store.lock().await.reset_data();
        self.evoke(request).await
    }

    /// Apply a natural-language change to the menu and store the result
    pub async fn modify_menu(&mut self, request: &str) -> Result<&MenuProject, AppError> {
        debug!(%request, "modify_menu: called");
        let ws = self.workspace.as_mut().ok_or(AppError::NoMenu)?;
        ws.send_modification(request).await?;
        self.sync_menu().await
    }

    /// Regenerate one course (0-based) and store the result
    pub async fn regenerate_course(&mut self, index: usize) -> Result<&MenuProject, AppError> {
        debug!(%index, "regenerate_course: called");
        let ws = self.workspace.as_mut().ok_or(AppError::NoMenu)?;
        ws.regenerate_course(index).await?;
        self.sync_menu().await
    }

    /// Step back one menu edit; `Ok(None)` when there is nothing to undo
    pub async fn undo(&mut self) -> Result<Option<&MenuProject>, AppError> {
        debug!("undo: called");
        let ws = self.workspace.as_mut().ok_or(AppError::NoMenu)?;
        if !ws.undo() {
            return Ok(None);
        }
        self.sync_menu().await.map(Some)
    }

    /// Write the workspace menu back so the store never shows an older one
    async fn sync_menu(&mut self) -> Result<&MenuProject, AppError> {
        let ws = self.workspace.as_ref().ok_or(AppError::NoMenu)?;
        self.store.lock().await.replace_menu(ws.snapshot())?;
        debug!(undo_depth = ws.undo_depth(), "sync_menu: store updated");
        Ok(ws.menu())
    }

    /// Cost report for the current single dish
    ///
    /// Runs outside the store's loading state; a failure leaves the dish as is.
    pub async fn analyze_dish_market(&mut self) -> Result<&MarketReport, AppError> {
        debug!("analyze_dish_market: called");
        let recipe = self.store.lock().await.single_dish().cloned().ok_or(AppError::NoDish)?;
        match self.service.analyze_dish_market(&recipe).await {
            Ok(report) => Ok(self.dish_report.insert(report)),
            Err(e) => {
                warn!(error = %e, "Dish market analysis failed");
                Err(AppError::Generation {
                    notice: self.locale.text(Text::MarketAnalysisFailed).to_string(),
                    source: e,
                })
            }
        }
    }
}

enum Generated {
    Dish(Recipe),
    Menu(MenuProject),
}
