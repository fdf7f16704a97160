//! Ownership of the currently open project.
//!
//! # Responsibility
//! - Hold the visible board value and route every structural edit through
//!   the sync cycle as a whole-project write.
//! - Bridge drag gestures from the move resolver into card moves.
//! - Collect user-facing notices for the host to drain.
//!
//! # Invariants
//! - Card and column edits are optimistic; project rename is confirm-first.
//! - At most one write per open project is in flight.
//! - A validation no-op never reaches the store.
//! - Each failed write yields exactly one failure notice.

use crate::board::{self, CardIdGenerator, MoveResolver};
use crate::model::now_epoch_ms;
use crate::model::project::{Card, CardId, Project};
use crate::model::EpochMs;
use crate::repo::ProjectRepository;
use crate::sync::{
    Action, Category, Notice, Subject, SyncCycle, SyncError, SyncOutcome, WriteDiscipline,
    WriteRequest, WriteTicket,
};
use log::info;
use std::fmt::Display;

pub const RENAME_COLUMN: Category = Category::new(Subject::Column, Action::Update);
pub const ADD_COLUMN: Category = Category::new(Subject::Column, Action::Create);
pub const ADD_CARD: Category = Category::new(Subject::Card, Action::Create);
pub const UPDATE_CARD: Category = Category::new(Subject::Card, Action::Update);
pub const DELETE_CARD: Category = Category::new(Subject::Card, Action::Delete);
pub const MOVE_CARD: Category = Category::new(Subject::Card, Action::Move);
pub const RENAME_PROJECT: Category = Category::new(Subject::Project, Action::Update);

pub type BoardWrite = Result<Option<WriteRequest<Project>>, SyncError>;

/// Open project plus its in-flight write and drag gesture.
#[derive(Debug, Clone)]
pub struct BoardSession {
    board: SyncCycle<Project>,
    card_ids: CardIdGenerator,
    drag: MoveResolver,
    notices: Vec<Notice>,
}

impl BoardSession {
    pub fn open(project: Project) -> Self {
        info!(
            "event=board_open module=board_session status=ok project_id={} columns={} cards={}",
            project.id,
            project.columns.len(),
            project.card_count()
        );
        Self {
            board: SyncCycle::new(project),
            card_ids: CardIdGenerator::new(),
            drag: MoveResolver::new(),
            notices: Vec::new(),
        }
    }

    /// Board value currently shown.
    pub fn project(&self) -> &Project {
        self.board.current()
    }

    pub fn is_write_pending(&self) -> bool {
        self.board.is_pending()
    }

    pub fn drag(&self) -> &MoveResolver {
        &self.drag
    }

    /// Drains accumulated notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replaces the board with a freshly loaded value.
    ///
    /// # Errors
    /// - `WriteInFlight` while a write is pending.
    pub fn reload(&mut self, project: Project) -> Result<(), SyncError> {
        self.drag.cancel();
        self.board.reset(project)
    }

    pub fn begin_rename_column(&mut self, column_id: &str, new_title: &str) -> BoardWrite {
        let next = board::rename_column(self.project(), column_id, new_title);
        self.begin(next, RENAME_COLUMN, WriteDiscipline::Optimistic)
    }

    /// Starts adding a card; `now_ms` feeds the id generator.
    pub fn begin_add_card(&mut self, column_id: &str, title: &str, now_ms: EpochMs) -> BoardWrite {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let stamp = self.card_ids.next_stamp(self.board.current(), now_ms);
        let next = board::add_card(self.project(), column_id, title, stamp);
        self.begin(next, ADD_CARD, WriteDiscipline::Optimistic)
    }

    pub fn begin_update_card(&mut self, column_id: &str, updated: &Card) -> BoardWrite {
        let next = board::update_card(self.project(), column_id, updated);
        self.begin(next, UPDATE_CARD, WriteDiscipline::Optimistic)
    }

    pub fn begin_delete_card(&mut self, column_id: &str, card_id: CardId) -> BoardWrite {
        let next = board::delete_card(self.project(), column_id, card_id);
        self.begin(next, DELETE_CARD, WriteDiscipline::Optimistic)
    }

    pub fn begin_move_card(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        card_id: CardId,
    ) -> BoardWrite {
        let next = board::move_card(self.project(), source_column_id, target_column_id, card_id);
        self.begin(next, MOVE_CARD, WriteDiscipline::Optimistic)
    }

    pub fn begin_add_column(&mut self, title: &str) -> BoardWrite {
        let next = board::add_column(self.project(), title);
        self.begin(next, ADD_COLUMN, WriteDiscipline::Optimistic)
    }

    /// Starts a project rename; the visible name changes only once stored.
    pub fn begin_rename_project(&mut self, new_name: &str) -> BoardWrite {
        let next = board::rename_project(self.project(), new_name);
        self.begin(next, RENAME_PROJECT, WriteDiscipline::ConfirmFirst)
    }

    /// Starts a drag gesture on a card.
    pub fn pick_up_card(&mut self, source_column_id: &str, card_id: CardId) -> bool {
        let project = self.board.current();
        self.drag.pick_up(project, source_column_id, card_id)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Ends the gesture over `target_column_id` (`None`: outside any column).
    pub fn begin_drop(&mut self, target_column_id: Option<&str>) -> BoardWrite {
        let project = self.board.current();
        match self.drag.drop_on(project, target_column_id) {
            Some(next) => self.begin(next, MOVE_CARD, WriteDiscipline::Optimistic),
            None => Ok(None),
        }
    }

    /// Applies the store's answer to the pending write and records a notice.
    pub fn complete<E: Display>(
        &mut self,
        ticket: WriteTicket,
        result: Result<Project, E>,
    ) -> Result<SyncOutcome, SyncError> {
        let outcome = self.board.complete(ticket, result)?;
        if let Some(notice) = outcome.notice() {
            self.notices.push(notice);
        }
        Ok(outcome)
    }

    pub fn rename_column<R: ProjectRepository>(
        &mut self,
        repo: &R,
        column_id: &str,
        new_title: &str,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_rename_column(column_id, new_title)?;
        self.persist(repo, request)
    }

    pub fn add_card<R: ProjectRepository>(
        &mut self,
        repo: &R,
        column_id: &str,
        title: &str,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_add_card(column_id, title, now_epoch_ms())?;
        self.persist(repo, request)
    }

    pub fn update_card<R: ProjectRepository>(
        &mut self,
        repo: &R,
        column_id: &str,
        updated: &Card,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_update_card(column_id, updated)?;
        self.persist(repo, request)
    }

    pub fn delete_card<R: ProjectRepository>(
        &mut self,
        repo: &R,
        column_id: &str,
        card_id: CardId,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_delete_card(column_id, card_id)?;
        self.persist(repo, request)
    }

    pub fn move_card<R: ProjectRepository>(
        &mut self,
        repo: &R,
        source_column_id: &str,
        target_column_id: &str,
        card_id: CardId,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_move_card(source_column_id, target_column_id, card_id)?;
        self.persist(repo, request)
    }

    pub fn add_column<R: ProjectRepository>(
        &mut self,
        repo: &R,
        title: &str,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_add_column(title)?;
        self.persist(repo, request)
    }

    pub fn rename_project<R: ProjectRepository>(
        &mut self,
        repo: &R,
        new_name: &str,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_rename_project(new_name)?;
        self.persist(repo, request)
    }

    pub fn drop_card<R: ProjectRepository>(
        &mut self,
        repo: &R,
        target_column_id: Option<&str>,
    ) -> Result<SyncOutcome, SyncError> {
        let request = self.begin_drop(target_column_id)?;
        self.persist(repo, request)
    }

    fn begin(
        &mut self,
        next: Project,
        category: Category,
        discipline: WriteDiscipline,
    ) -> BoardWrite {
        self.board.begin(next, category, discipline)
    }

    fn persist<R: ProjectRepository>(
        &mut self,
        repo: &R,
        request: Option<WriteRequest<Project>>,
    ) -> Result<SyncOutcome, SyncError> {
        let Some(request) = request else {
            return Ok(SyncOutcome::NoOp);
        };
        let result = repo.update_project(&request.value);
        self.complete(request.ticket, result)
    }
}
