//! Menu Workspace Controller
//!
//! Post-generation editing of a menu. Every edit pushes a snapshot of the
//! current menu before calling the service, and the menu is only replaced
//! after a successful answer. Snapshots are `Arc`s, so pushing one and
//! undoing are both reference swaps.
//!
//! Edits and undo go through `App`, which copies the new menu into the
//! store after each one.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{MenuMarketReport, MenuProject, Recipe};
use crate::generation::{GenerationError, GenerationService};
use crate::i18n::{Locale, Text};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("modification request is empty")]
    EmptyRequest,

    #[error("another request is in flight")]
    Busy,

    #[error("course {index} does not exist (menu has {len})")]
    CourseOutOfRange { index: usize, len: usize },

    /// `notice` is the localized sentence shown to the user
    #[error("{notice}")]
    Failed {
        notice: String,
        #[source]
        source: GenerationError,
    },
}

impl WorkspaceError {
    pub fn notice(&self, locale: Locale) -> &str {
        match self {
            Self::EmptyRequest => locale.text(Text::EmptyMessage),
            Self::Busy => locale.text(Text::Busy),
            Self::CourseOutOfRange { .. } => locale.text(Text::NoSuchCourse),
            Self::Failed { notice, .. } => notice,
        }
    }
}

/// Which part of the menu an edit replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditScope {
    Everything,
    CoursesOnly,
}

pub struct MenuWorkspace {
    service: Arc<dyn GenerationService>,
    locale: Locale,
    menu: Arc<MenuProject>,
    undo: Vec<Arc<MenuProject>>,
    selected_course: Option<usize>,
    market_report: Option<MenuMarketReport>,
    updating: bool,
    notice: Option<String>,
}

impl MenuWorkspace {
    pub fn new(menu: MenuProject, service: Arc<dyn GenerationService>, locale: Locale) -> Self {
        debug!(courses = menu.courses.len(), "MenuWorkspace::new: called");
        Self {
            service,
            locale,
            menu: Arc::new(menu),
            undo: Vec::new(),
            selected_course: None,
            market_report: None,
            updating: false,
            notice: None,
        }
    }

    pub fn menu(&self) -> &MenuProject {
        &self.menu
    }

    /// Shared handle to the current menu
    pub fn snapshot(&self) -> Arc<MenuProject> {
        Arc::clone(&self.menu)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn market_report(&self) -> Option<&MenuMarketReport> {
        self.market_report.as_ref()
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Last user-visible failure, if the latest request failed
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn selected_course_index(&self) -> Option<usize> {
        self.selected_course
    }

    pub fn selected_course(&self) -> Option<&Recipe> {
        self.selected_course.and_then(|i| self.menu.course(i))
    }

    /// Select a course for the detail view
    pub fn view_course(&mut self, index: usize) -> Result<&Recipe, WorkspaceError> {
        debug!(%index, "view_course: called");
        let len = self.menu.courses.len();
        if index >= len {
            return Err(WorkspaceError::CourseOutOfRange { index, len });
        }
        self.selected_course = Some(index);
        Ok(&self.menu.courses[index])
    }

    pub fn back_to_menu(&mut self) {
        debug!("back_to_menu: called");
        self.selected_course = None;
    }

    /// Clear the updating flag after a request future was dropped
    pub fn abandon_request(&mut self) {
        debug!("abandon_request: called");
        self.updating = false;
    }

    /// Apply a natural-language change to the whole menu
    ///
    /// Crate-internal: `App` writes every edit back to the store.
    pub(crate) async fn send_modification(&mut self, request: &str) -> Result<(), WorkspaceError> {
        let request = request.trim();
        debug!(%request, "send_modification: called");
        if request.is_empty() {
            return Err(WorkspaceError::EmptyRequest);
        }
        self.edit(request, EditScope::Everything, Text::ModificationFailed).await
    }

    /// Regenerate one course (0-based index) from scratch
    pub(crate) async fn regenerate_course(&mut self, index: usize) -> Result<(), WorkspaceError> {
        debug!(%index, "regenerate_course: called");
        let len = self.menu.courses.len();
        if index >= len {
            return Err(WorkspaceError::CourseOutOfRange { index, len });
        }
        let instruction = format!("Regenerate course {} completely with a new creative approach", index + 1);
        self.edit(&instruction, EditScope::CoursesOnly, Text::RegenerationFailed)
            .await
    }

    async fn edit(&mut self, instruction: &str, scope: EditScope, failure: Text) -> Result<(), WorkspaceError> {
        if self.updating {
            return Err(WorkspaceError::Busy);
        }
        self.undo.push(Arc::clone(&self.menu));
        self.updating = true;
        self.notice = None;

        let result = self.service.modify_menu(&self.menu, instruction).await;
        self.updating = false;

        match result {
            Ok(modified) => {
                let next = match scope {
                    EditScope::Everything => modified,
                    EditScope::CoursesOnly => MenuProject {
                        concept: self.menu.concept.clone(),
                        courses: modified.courses,
                    },
                };
                self.menu = Arc::new(next);
                if self.selected_course.is_some_and(|i| i >= self.menu.courses.len()) {
                    self.selected_course = None;
                }
                info!(?scope, undo_depth = self.undo.len(), "Menu updated");
                Ok(())
            }
            Err(e) => {
                warn!(?scope, error = %e, "Menu edit failed");
                let notice = self.locale.text(failure).to_string();
                self.notice = Some(notice.clone());
                Err(WorkspaceError::Failed { notice, source: e })
            }
        }
    }

    /// Restore the most recent snapshot; returns false on an empty stack
    pub(crate) fn undo(&mut self) -> bool {
        debug!(depth = self.undo.len(), "undo: called");
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        self.menu = previous;
        if self.selected_course.is_some_and(|i| i >= self.menu.courses.len()) {
            self.selected_course = None;
        }
        true
    }

    /// Request a cost report; never touches the menu or the undo stack
    pub async fn analyze_market(&mut self) -> Result<&MenuMarketReport, WorkspaceError> {
        debug!("analyze_market: called");
        let menu = Arc::clone(&self.menu);
        match self.service.analyze_menu_market(&menu).await {
            Ok(report) => {
                self.notice = None;
                Ok(self.market_report.insert(report))
            }
            Err(e) => {
                warn!(error = %e, "Market analysis failed");
                let notice = self.locale.text(Text::MarketAnalysisFailed).to_string();
                self.notice = Some(notice.clone());
                Err(WorkspaceError::Failed { notice, source: e })
            }
        }
    }
}
