//! Mode/Result Store
//!
//! The single state container for what the user is doing: app screen,
//! creation mode, and the loading/error/result triple. Loading, error and
//! result are mutually exclusive; every setter clears the other two.
//!
//! Each generation attempt gets a [`GenerationTicket`]. Navigation bumps the
//! store's epoch, so the answer to an abandoned attempt is rejected as stale
//! instead of overwriting newer state.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{AppState, CreationMode, GenerationStatus, MenuProject, Recipe};
use crate::i18n::{Locale, Text};

/// The last successful generation
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    SingleDish(Recipe),
    Menu(MenuProject),
}

impl GenerationResult {
    fn kind(&self) -> &'static str {
        match self {
            Self::SingleDish(_) => "single dish",
            Self::Menu(_) => "menu",
        }
    }
}

/// Proof that a generation attempt was started, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a generation is already in progress")]
    AlreadyLoading,

    #[error("no creation mode selected")]
    NoMode,

    #[error("cannot store a {result} result in {mode:?} mode")]
    ModeMismatch {
        mode: Option<CreationMode>,
        result: &'static str,
    },

    #[error("result belongs to an abandoned generation")]
    Stale,

    #[error("no menu result to replace")]
    NoMenu,
}

impl StoreError {
    pub fn notice(&self, locale: Locale) -> &'static str {
        match self {
            Self::AlreadyLoading => locale.text(Text::Busy),
            Self::NoMode => locale.text(Text::NoMode),
            Self::ModeMismatch { .. } => locale.text(Text::GenerationError),
            Self::Stale => locale.text(Text::ResultDiscarded),
            Self::NoMenu => locale.text(Text::NoMenu),
        }
    }
}

#[derive(Debug, Default)]
pub struct ModeStore {
    app_state: AppState,
    mode: Option<CreationMode>,
    loading: bool,
    error: Option<String>,
    result: Option<GenerationResult>,
    epoch: u64,
}

impl ModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    pub fn mode(&self) -> Option<CreationMode> {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn single_dish(&self) -> Option<&Recipe> {
        match &self.result {
            Some(GenerationResult::SingleDish(recipe)) => Some(recipe),
            _ => None,
        }
    }

    pub fn menu_project(&self) -> Option<&MenuProject> {
        match &self.result {
            Some(GenerationResult::Menu(menu)) => Some(menu),
            _ => None,
        }
    }

    /// Derived, never stored
    pub fn status(&self) -> GenerationStatus {
        GenerationStatus::derive(self.loading, self.error.is_some(), self.result.is_some())
    }

    fn clear(&mut self) {
        self.loading = false;
        self.error = None;
        self.result = None;
        self.epoch += 1;
    }

    /// Choose a mode and open the dashboard; repeating the current choice is a no-op
    pub fn set_mode(&mut self, mode: CreationMode) {
        debug!(%mode, current = ?self.mode, "set_mode: called");
        if self.app_state == AppState::Dashboard && self.mode == Some(mode) {
            debug!("set_mode: already active");
            return;
        }
        self.clear();
        self.mode = Some(mode);
        self.app_state = AppState::Dashboard;
        info!(%mode, "Mode selected");
    }

    /// Back to mode selection; any in-flight answer becomes stale
    pub fn go_home(&mut self) {
        debug!(loading = self.loading, "go_home: called");
        self.clear();
        self.app_state = AppState::Home;
    }

    /// Clear loading/error/result but stay in the current mode
    pub fn reset_data(&mut self) {
        debug!("reset_data: called");
        self.clear();
    }

    /// Begin a generation attempt
    pub fn start_loading(&mut self) -> Result<GenerationTicket, StoreError> {
        debug!(loading = self.loading, "start_loading: called");
        if self.loading {
            return Err(StoreError::AlreadyLoading);
        }
        if self.mode.is_none() {
            return Err(StoreError::NoMode);
        }
        self.clear();
        self.loading = true;
        Ok(GenerationTicket { epoch: self.epoch })
    }

    /// A ticket is only good for the attempt it started, and only once
    fn check_ticket(&self, ticket: GenerationTicket) -> Result<(), StoreError> {
        if ticket.epoch != self.epoch || !self.loading {
            warn!(ticket = ticket.epoch, epoch = self.epoch, "Discarding stale generation result");
            return Err(StoreError::Stale);
        }
        Ok(())
    }

    fn set_result(&mut self, ticket: GenerationTicket, result: GenerationResult) -> Result<(), StoreError> {
        self.check_ticket(ticket)?;
        let expected = match &result {
            GenerationResult::SingleDish(_) => CreationMode::Single,
            GenerationResult::Menu(_) => CreationMode::Menu,
        };
        if self.mode != Some(expected) {
            return Err(StoreError::ModeMismatch {
                mode: self.mode,
                result: result.kind(),
            });
        }
        info!(kind = result.kind(), "Generation succeeded");
        self.loading = false;
        self.error = None;
        self.result = Some(result);
        Ok(())
    }

    pub fn set_single_dish(&mut self, ticket: GenerationTicket, recipe: Recipe) -> Result<(), StoreError> {
        debug!(dish = %recipe.name(), "set_single_dish: called");
        self.set_result(ticket, GenerationResult::SingleDish(recipe))
    }

    pub fn set_menu_project(&mut self, ticket: GenerationTicket, menu: MenuProject) -> Result<(), StoreError> {
        debug!(courses = menu.courses.len(), "set_menu_project: called");
        self.set_result(ticket, GenerationResult::Menu(menu))
    }

    /// Write an edited menu over the current menu result
    ///
    /// Edits happen after the generation settled, so no ticket is involved;
    /// a new attempt in flight or a non-menu result rejects the write.
    pub fn replace_menu(&mut self, menu: Arc<MenuProject>) -> Result<(), StoreError> {
        debug!(courses = menu.courses.len(), "replace_menu: called");
        if self.loading {
            return Err(StoreError::AlreadyLoading);
        }
        match &mut self.result {
            Some(GenerationResult::Menu(current)) => {
                *current = Arc::unwrap_or_clone(menu);
                Ok(())
            }
            _ => Err(StoreError::NoMenu),
        }
    }

    /// Record a failed attempt with a user-facing message
    pub fn set_error(&mut self, ticket: GenerationTicket, message: impl Into<String>) -> Result<(), StoreError> {
        let message = message.into();
        debug!(%message, "set_error: called");
        self.check_ticket(ticket)?;
        self.loading = false;
        self.result = None;
        self.error = Some(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dashboard(mode: CreationMode) -> ModeStore {
        let mut store = ModeStore::new();
        store.set_mode(mode);
        store
    }

    fn menu() -> MenuProject {
        MenuProject {
            courses: vec![Recipe::default()],
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let store = ModeStore::new();
        assert_eq!(store.app_state(), AppState::Home);
        assert_eq!(store.mode(), None);
        assert_eq!(store.status(), GenerationStatus::Idle);
    }

    #[test]
    fn test_set_mode_opens_dashboard_and_is_idempotent() {
        let mut store = dashboard(CreationMode::Menu);
        assert_eq!(store.app_state(), AppState::Dashboard);

        let ticket = store.start_loading().unwrap();
        store.set_mode(CreationMode::Menu);
        // Redundant call did not reset the attempt
        assert!(store.is_loading());
        assert!(store.set_menu_project(ticket, menu()).is_ok());
    }

    #[test]
    fn test_success_flow() {
        let mut store = dashboard(CreationMode::Menu);
        let ticket = store.start_loading().unwrap();
        assert_eq!(store.status(), GenerationStatus::Loading);

        store.set_menu_project(ticket, menu()).unwrap();
        assert_eq!(store.status(), GenerationStatus::Success);
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
        assert_eq!(store.menu_project().unwrap().courses.len(), 1);
        assert!(store.single_dish().is_none());
    }

    #[test]
    fn test_second_start_rejected() {
        let mut store = dashboard(CreationMode::Single);
        store.start_loading().unwrap();
        assert_eq!(store.start_loading(), Err(StoreError::AlreadyLoading));
    }

    #[test]
    fn test_start_without_mode_rejected() {
        let mut store = ModeStore::new();
        assert_eq!(store.start_loading(), Err(StoreError::NoMode));
    }

    #[test]
    fn test_wrong_setter_for_mode_is_rejected() {
        let mut store = dashboard(CreationMode::Single);
        let ticket = store.start_loading().unwrap();
        assert!(matches!(
            store.set_menu_project(ticket, menu()),
            Err(StoreError::ModeMismatch { .. })
        ));
        assert!(store.is_loading());
        store.set_single_dish(ticket, Recipe::default()).unwrap();
    }

    #[test]
    fn test_late_result_after_go_home_is_discarded() {
        let mut store = dashboard(CreationMode::Single);
        let ticket = store.start_loading().unwrap();
        store.go_home();

        assert_eq!(store.set_single_dish(ticket, Recipe::default()), Err(StoreError::Stale));
        assert_eq!(store.set_error(ticket, "boom"), Err(StoreError::Stale));
        assert_eq!(store.app_state(), AppState::Home);
        assert_eq!(store.status(), GenerationStatus::Idle);
    }

    #[test]
    fn test_ticket_used_once() {
        let mut store = dashboard(CreationMode::Single);
        let ticket = store.start_loading().unwrap();
        store.set_error(ticket, "failed").unwrap();
        assert_eq!(store.status(), GenerationStatus::Error);
        assert_eq!(store.set_single_dish(ticket, Recipe::default()), Err(StoreError::Stale));
        assert_eq!(store.error(), Some("failed"));
    }

    #[test]
    fn test_reset_data_keeps_mode() {
        let mut store = dashboard(CreationMode::Menu);
        let ticket = store.start_loading().unwrap();
        store.set_error(ticket, "failed").unwrap();
        store.reset_data();
        assert_eq!(store.status(), GenerationStatus::Idle);
        assert_eq!(store.mode(), Some(CreationMode::Menu));
        assert_eq!(store.app_state(), AppState::Dashboard);
    }

    #[test]
    fn test_replace_menu_overwrites_result() {
        let mut store = dashboard(CreationMode::Menu);
        let ticket = store.start_loading().unwrap();
        store.set_menu_project(ticket, menu()).unwrap();

        let edited = MenuProject {
            courses: vec![Recipe::default(), Recipe::default()],
            ..Default::default()
        };
        store.replace_menu(Arc::new(edited.clone())).unwrap();
        assert_eq!(store.menu_project(), Some(&edited));
        assert_eq!(store.status(), GenerationStatus::Success);
    }

    #[test]
    fn test_replace_menu_needs_settled_menu() {
        let mut store = dashboard(CreationMode::Menu);
        assert_eq!(store.replace_menu(Arc::new(menu())), Err(StoreError::NoMenu));

        store.start_loading().unwrap();
        assert_eq!(store.replace_menu(Arc::new(menu())), Err(StoreError::AlreadyLoading));
        assert!(store.is_loading());

        let mut store = dashboard(CreationMode::Single);
        let ticket = store.start_loading().unwrap();
        store.set_single_dish(ticket, Recipe::default()).unwrap();
        assert_eq!(store.replace_menu(Arc::new(menu())), Err(StoreError::NoMenu));
        assert!(store.single_dish().is_some());
    }

    #[derive(Debug, Clone)]
    enum Op {
        SetMode(CreationMode),
        GoHome,
        StartLoading,
        SetDish { stale: bool },
        SetMenu { stale: bool },
        SetError { stale: bool },
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop::sample::select(CreationMode::ALL.to_vec()).prop_map(Op::SetMode),
            Just(Op::GoHome),
            Just(Op::StartLoading),
            any::<bool>().prop_map(|stale| Op::SetDish { stale }),
            any::<bool>().prop_map(|stale| Op::SetMenu { stale }),
            any::<bool>().prop_map(|stale| Op::SetError { stale }),
            Just(Op::Reset),
        ]
    }

    proptest! {
        /// Property: after any call sequence at most one of loading/error/result is set
        #[test]
        fn prop_loading_error_result_mutually_exclusive(ops in prop::collection::vec(op(), 0..60)) {
            let mut store = ModeStore::new();
            let mut ticket = None;
            let old = GenerationTicket { epoch: u64::MAX };

            for op in ops {
                let current = ticket;
                let pick = move |stale: bool| if stale { Some(old) } else { current };
                match op {
                    Op::SetMode(mode) => store.set_mode(mode),
                    Op::GoHome => store.go_home(),
                    Op::StartLoading => {
                        if let Ok(t) = store.start_loading() {
                            ticket = Some(t);
                        }
                    }
                    Op::SetDish { stale } => {
                        if let Some(t) = pick(stale) {
                            let _ = store.set_single_dish(t, Recipe::default());
                        }
                    }
                    Op::SetMenu { stale } => {
                        if let Some(t) = pick(stale) {
                            let _ = store.set_menu_project(t, MenuProject::default());
                        }
                    }
                    Op::SetError { stale } => {
                        if let Some(t) = pick(stale) {
                            let _ = store.set_error(t, "failed");
                        }
                    }
                    Op::Reset => store.reset_data(),
                }

                let set = [store.is_loading(), store.error().is_some(), store.result().is_some()];
                prop_assert!(set.iter().filter(|b| **b).count() <= 1);
            }
        }
    }
}
