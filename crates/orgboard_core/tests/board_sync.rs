use orgboard_core::model::organization::OrganizationId;
use orgboard_core::repo::{ProjectRepository, RepoError, RepoResult};
use orgboard_core::sync::NoticeLevel;
use orgboard_core::{
    open_db_in_memory, AccessGate, BoardSession, Directory, NewOrganization, NewProject, Project,
    ProjectId, SqliteStore, SyncOutcome,
};
use std::cell::Cell;

/// Project store that rejects every write.
struct RejectingStore {
    writes: Cell<usize>,
}

impl RejectingStore {
    fn new() -> Self {
        Self {
            writes: Cell::new(0),
        }
    }
}

impl ProjectRepository for RejectingStore {
    fn list_projects(&self, _organization_id: OrganizationId) -> RepoResult<Vec<Project>> {
        Ok(Vec::new())
    }

    fn get_project(&self, _id: ProjectId) -> RepoResult<Option<Project>> {
        Ok(None)
    }

    fn create_project(&self, _draft: &NewProject) -> RepoResult<Project> {
        Err(RepoError::InvalidData("store offline".to_string()))
    }

    fn update_project(&self, _project: &Project) -> RepoResult<Project> {
        self.writes.set(self.writes.get() + 1);
        Err(RepoError::InvalidData("store offline".to_string()))
    }

    fn delete_project(&self, _id: ProjectId) -> RepoResult<()> {
        Err(RepoError::InvalidData("store offline".to_string()))
    }
}

#[test]
fn acme_launch_card_moves_from_todo_to_doing() {
    let conn = open_db_in_memory().unwrap();
    let mut directory = Directory::new(SqliteStore::try_new(&conn).unwrap());
    let mut gate = AccessGate::new();

    let acme = directory
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    gate.select(&acme).unwrap();
    let launch = directory
        .create_project(&NewProject::new("Launch", acme.id, "user-1"))
        .unwrap();
    assert!(launch.columns.iter().all(|column| column.cards.is_empty()));

    let mut session = directory.open_project(launch.id).unwrap().unwrap();
    let outcome = session
        .add_card(directory.store(), "todo", "Write spec")
        .unwrap();
    assert!(outcome.is_confirmed());
    let card_id = session.project().column("todo").unwrap().cards[0].id;

    let outcome = session
        .move_card(directory.store(), "todo", "doing", card_id)
        .unwrap();
    assert!(outcome.is_confirmed());

    let stored = directory.open_project(launch.id).unwrap().unwrap();
    let board = stored.project();
    assert!(board.column("todo").unwrap().cards.is_empty());
    let doing = &board.column("doing").unwrap().cards;
    assert_eq!(doing.len(), 1);
    assert_eq!(doing[0].title, "Write spec");
    assert_eq!(doing[0].id, card_id);

    let titles: Vec<_> = session
        .take_notices()
        .into_iter()
        .map(|notice| notice.title)
        .collect();
    assert_eq!(titles, vec!["Card created", "Card moved"]);
}

#[test]
fn rejected_write_restores_board_and_reports_once() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let mut directory = Directory::new(store);
    let acme = directory
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let launch = directory
        .create_project(&NewProject::new("Launch", acme.id, "user-1"))
        .unwrap();

    let rejecting = RejectingStore::new();
    let mut session = BoardSession::open(launch.clone());
    let outcome = session.add_card(&rejecting, "todo", "Write spec").unwrap();

    assert!(matches!(outcome, SyncOutcome::RolledBack(_)));
    assert_eq!(session.project(), &launch);
    assert_eq!(rejecting.writes.get(), 1);

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Failure);
    assert_eq!(notices[0].category.to_string(), "create card");
    assert_eq!(notices[0].title, "Error creating card");
}

#[test]
fn validation_noops_never_touch_the_store() {
    let conn = open_db_in_memory().unwrap();
    let mut directory = Directory::new(SqliteStore::try_new(&conn).unwrap());
    let acme = directory
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let launch = directory
        .create_project(&NewProject::new("Launch", acme.id, "user-1"))
        .unwrap();

    let rejecting = RejectingStore::new();
    let mut session = BoardSession::open(launch.clone());
    assert_eq!(session.add_card(&rejecting, "todo", "   "), Ok(SyncOutcome::NoOp));
    assert_eq!(session.rename_column(&rejecting, "todo", ""), Ok(SyncOutcome::NoOp));
    assert_eq!(
        session.move_card(&rejecting, "todo", "doing", 12345),
        Ok(SyncOutcome::NoOp)
    );
    assert_eq!(session.drop_card(&rejecting, Some("done")), Ok(SyncOutcome::NoOp));
    assert_eq!(rejecting.writes.get(), 0);
    assert!(session.take_notices().is_empty());
    assert_eq!(session.project(), &launch);
}

#[test]
fn drag_and_drop_persists_the_move() {
    let conn = open_db_in_memory().unwrap();
    let mut directory = Directory::new(SqliteStore::try_new(&conn).unwrap());
    let acme = directory
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let launch = directory
        .create_project(&NewProject::new("Launch", acme.id, "user-1"))
        .unwrap();

    let mut session = directory.open_project(launch.id).unwrap().unwrap();
    session
        .add_card(directory.store(), "todo", "Write spec")
        .unwrap();
    let card_id = session.project().column("todo").unwrap().cards[0].id;

    assert!(session.pick_up_card("todo", card_id));
    assert_eq!(
        session.drop_card(directory.store(), Some("todo")),
        Ok(SyncOutcome::NoOp)
    );

    assert!(session.pick_up_card("todo", card_id));
    let outcome = session.drop_card(directory.store(), Some("done")).unwrap();
    assert!(outcome.is_confirmed());

    let stored = directory.store().get_project(launch.id).unwrap().unwrap();
    assert!(stored.column("done").unwrap().contains(card_id));
    assert!(!stored.column("todo").unwrap().contains(card_id));
}

#[test]
fn column_and_project_edits_are_persisted() {
    let conn = open_db_in_memory().unwrap();
    let mut directory = Directory::new(SqliteStore::try_new(&conn).unwrap());
    let acme = directory
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let launch = directory
        .create_project(&NewProject::new("Launch", acme.id, "user-1"))
        .unwrap();

    let mut session = directory.open_project(launch.id).unwrap().unwrap();
    let store = directory.store();
    assert!(session.rename_column(store, "todo", "Backlog").unwrap().is_confirmed());
    assert!(session.add_column(store, "In Review").unwrap().is_confirmed());
    assert!(session.rename_project(store, "Liftoff").unwrap().is_confirmed());

    let stored = store.get_project(launch.id).unwrap().unwrap();
    assert_eq!(stored.name, "Liftoff");
    assert_eq!(stored.column("todo").unwrap().title, "Backlog");
    assert_eq!(stored.column("in-review").unwrap().title, "In Review");
    assert_eq!(stored.columns.len(), 4);
}

#[test]
fn edit_then_delete_card_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let mut directory = Directory::new(SqliteStore::try_new(&conn).unwrap());
    let acme = directory
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let launch = directory
        .create_project(&NewProject::new("Launch", acme.id, "user-1"))
        .unwrap();

    let mut session = directory.open_project(launch.id).unwrap().unwrap();
    let store = directory.store();
    session.add_card(store, "todo", "Write spec").unwrap();
    let mut card = session.project().column("todo").unwrap().cards[0].clone();
    card.description = "One page, no more".to_string();
    assert!(session.update_card(store, "todo", &card).unwrap().is_confirmed());
    assert_eq!(
        store.get_project(launch.id).unwrap().unwrap().column("todo").unwrap().cards[0],
        card
    );

    assert!(session.delete_card(store, "todo", card.id).unwrap().is_confirmed());
    assert_eq!(store.get_project(launch.id).unwrap().unwrap().card_count(), 0);
    assert_eq!(session.project().columns, launch.columns);
}
