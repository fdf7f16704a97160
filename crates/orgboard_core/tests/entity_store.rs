use orgboard_core::model::EntityKind;
use orgboard_core::repo::{
    OrganizationRepository, ProjectRepository, TeamMemberRepository, TeamRepository,
};
use orgboard_core::{
    open_db_in_memory, ModelValidationError, NewOrganization, NewProject, NewTeam, NewTeamMember,
    RepoError, SqliteStore,
};
use rusqlite::Connection;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn organizations_list_newest_first_per_owner() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();

    let first = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let second = store
        .create_organization(&NewOrganization::new("Globex", "user-1"))
        .unwrap();
    store
        .create_organization(&NewOrganization::new("Initech", "user-2"))
        .unwrap();

    let listed = store.list_organizations("user-1").unwrap();
    let ids: Vec<_> = listed.iter().map(|org| org.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn organization_update_keeps_protection_and_trims_fields() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let created = store
        .create_organization(
            &NewOrganization::new("Acme", "user-1")
                .with_description("Rockets")
                .with_password("hunter2"),
        )
        .unwrap();

    let mut edited = created.clone();
    edited.name = "  Acme Corp  ".to_string();
    edited.description = Some("   ".to_string());
    let updated = store.update_organization(&edited).unwrap();

    assert_eq!(updated.name, "Acme Corp");
    assert_eq!(updated.description, None);
    assert!(updated.is_password_protected);
    assert_eq!(updated.password_hash, created.password_hash);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn blank_organization_name_is_rejected() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let err = store
        .create_organization(&NewOrganization::new("   ", "user-1"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::BlankName(EntityKind::Organization))
    ));
}

#[test]
fn password_can_be_set_changed_and_removed() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let org = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    assert!(!org.is_password_protected);
    assert!(store.verify_organization_password(org.id, "anything").unwrap());

    let locked = store.set_organization_password(org.id, Some("first")).unwrap();
    assert!(locked.is_password_protected);
    let stored = locked.password_hash.clone().unwrap();
    assert!(!stored.contains("first"));
    assert!(store.verify_organization_password(org.id, "first").unwrap());
    assert!(!store.verify_organization_password(org.id, "second").unwrap());

    store.set_organization_password(org.id, Some("second")).unwrap();
    assert!(!store.verify_organization_password(org.id, "first").unwrap());
    assert!(store.verify_organization_password(org.id, "second").unwrap());

    let open = store.set_organization_password(org.id, None).unwrap();
    assert!(!open.is_password_protected);
    assert_eq!(open.password_hash, None);

    assert!(matches!(
        store.set_organization_password(org.id, Some("  ")),
        Err(RepoError::Validation(ModelValidationError::BlankSecret))
    ));
}

#[test]
fn unknown_organization_never_verifies() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    assert!(!store
        .verify_organization_password(Uuid::new_v4(), "hunter2")
        .unwrap());
}

#[test]
fn new_project_gets_three_empty_default_columns() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let org = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let project = store
        .create_project(&NewProject::new("Launch", org.id, "user-1"))
        .unwrap();

    let ids: Vec<_> = project.columns.iter().map(|c| c.id.as_str()).collect();
    let titles: Vec<_> = project.columns.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(ids, vec!["todo", "doing", "done"]);
    assert_eq!(titles, vec!["To Do", "Doing", "Done"]);
    assert_eq!(project.card_count(), 0);

    let loaded = store.get_project(project.id).unwrap().unwrap();
    assert_eq!(loaded, project);
}

#[test]
fn project_board_is_stored_as_one_camel_case_blob() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let org = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let project = store
        .create_project(&NewProject::new("Launch", org.id, "user-1"))
        .unwrap();

    let mut edited = project.clone();
    edited.columns[0].cards.push(orgboard_core::Card {
        id: 42,
        title: "Write spec".to_string(),
        description: String::new(),
        created_at: 7,
    });
    let stored = store.update_project(&edited).unwrap();
    assert_eq!(stored.columns, edited.columns);

    let raw: String = conn
        .query_row(
            "SELECT columns_json FROM projects WHERE id = ?1;",
            [project.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert!(raw.contains("\"createdAt\":7"));
    assert!(raw.contains("\"id\":\"todo\""));
}

#[test]
fn update_of_missing_project_is_not_found() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let org = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let project = store
        .create_project(&NewProject::new("Launch", org.id, "user-1"))
        .unwrap();
    store.delete_project(project.id).unwrap();

    assert!(matches!(
        store.update_project(&project),
        Err(RepoError::NotFound {
            kind: EntityKind::Project,
            ..
        })
    ));
    assert!(store.get_project(project.id).unwrap().is_none());
}

#[test]
fn corrupted_board_blob_is_reported_not_masked() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let org = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let project = store
        .create_project(&NewProject::new("Launch", org.id, "user-1"))
        .unwrap();

    conn.execute(
        "UPDATE projects SET columns_json = 'not json' WHERE id = ?1;",
        [project.id.to_string()],
    )
    .unwrap();
    assert!(matches!(
        store.get_project(project.id),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn teams_and_members_round_trip_and_list_newest_first() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let org = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();

    let core = store
        .create_team(&NewTeam {
            organization_id: org.id,
            name: "Core".to_string(),
            description: None,
            created_by: "user-1".to_string(),
        })
        .unwrap();
    let web = store
        .create_team(&NewTeam {
            organization_id: org.id,
            name: "Web".to_string(),
            description: Some("Frontend".to_string()),
            created_by: "user-1".to_string(),
        })
        .unwrap();
    let teams: Vec<_> = store
        .list_teams(org.id)
        .unwrap()
        .into_iter()
        .map(|team| team.id)
        .collect();
    assert_eq!(teams, vec![web.id, core.id]);

    let mut renamed = core.clone();
    renamed.name = "Platform".to_string();
    assert_eq!(store.update_team(&renamed).unwrap().name, "Platform");

    let ada = store
        .create_team_member(&NewTeamMember {
            team_id: core.id,
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            role: Some("Lead".to_string()),
            created_by: "user-1".to_string(),
        })
        .unwrap();
    assert!(matches!(
        store.create_team_member(&NewTeamMember {
            team_id: core.id,
            name: "Bob".to_string(),
            email: Some("bob-at-example".to_string()),
            role: None,
            created_by: "user-1".to_string(),
        }),
        Err(RepoError::Validation(ModelValidationError::InvalidEmail(_)))
    ));

    let mut promoted = ada.clone();
    promoted.role = Some("Director".to_string());
    let updated = store.update_team_member(&promoted).unwrap();
    assert_eq!(updated.role.as_deref(), Some("Director"));
    assert_eq!(store.list_team_members(core.id).unwrap().len(), 1);

    store.delete_team_member(ada.id).unwrap();
    assert!(store.get_team_member(ada.id).unwrap().is_none());
    assert!(matches!(
        store.delete_team_member(ada.id),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn deleting_organization_cascades_to_projects_teams_and_members() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let org = store
        .create_organization(&NewOrganization::new("Acme", "user-1"))
        .unwrap();
    let project = store
        .create_project(&NewProject::new("Launch", org.id, "user-1"))
        .unwrap();
    let team = store
        .create_team(&NewTeam {
            organization_id: org.id,
            name: "Core".to_string(),
            description: None,
            created_by: "user-1".to_string(),
        })
        .unwrap();
    let member = store
        .create_team_member(&NewTeamMember {
            team_id: team.id,
            name: "Ada".to_string(),
            email: None,
            role: None,
            created_by: "user-1".to_string(),
        })
        .unwrap();

    store.delete_organization(org.id).unwrap();

    assert!(store.get_organization(org.id).unwrap().is_none());
    assert!(store.get_project(project.id).unwrap().is_none());
    assert!(store.get_team(team.id).unwrap().is_none());
    assert!(store.get_team_member(member.id).unwrap().is_none());
}
