//! Board state operations over the project aggregate.
//!
//! # Responsibility
//! - Compute the next immutable `Project` value for each structural edit.
//! - Keep persistence out: callers hand the result to the sync cycle.
//!
//! # Invariants
//! - Inputs are never mutated; every operation returns a new value.
//! - Invalid input (blank titles, unknown columns/cards, same-column moves)
//!   returns a value structurally equal to the input.
//! - A card is owned by exactly one column before and after every operation.
//! - Moves append to the end of the target column; no intra-column reorder.

pub mod card_ids;
pub mod drag;

use crate::model::project::{Card, CardId, Column, Project};
use once_cell::sync::Lazy;
use regex::Regex;

pub use card_ids::{CardIdGenerator, CardStamp};
pub use drag::{DragPayload, MoveResolver};

static SLUG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

const FALLBACK_COLUMN_SLUG: &str = "column";

/// Replaces one column's title with the trimmed `new_title`.
pub fn rename_column(project: &Project, column_id: &str, new_title: &str) -> Project {
    let title = new_title.trim();
    if title.is_empty() {
        return project.clone();
    }
    with_column(project, column_id, |column| {
        column.title = title.to_string();
    })
}

/// Appends a new card with the given stamp to the end of a column.
///
/// A stamp whose id already exists on the board leaves the project unchanged;
/// use [`CardIdGenerator`] to obtain stamps.
pub fn add_card(project: &Project, column_id: &str, title: &str, stamp: CardStamp) -> Project {
    let title = title.trim();
    if title.is_empty() || project.find_card(stamp.id).is_some() {
        return project.clone();
    }
    with_column(project, column_id, |column| {
        column.cards.push(Card {
            id: stamp.id,
            title: title.to_string(),
            description: String::new(),
            created_at: stamp.created_at,
        });
    })
}

/// Replaces the card matching `updated.id` inside `column_id`, in place.
pub fn update_card(project: &Project, column_id: &str, updated: &Card) -> Project {
    if updated.title.trim().is_empty() {
        return project.clone();
    }
    with_column(project, column_id, |column| {
        if let Some(card) = column.cards.iter_mut().find(|card| card.id == updated.id) {
            *card = updated.clone();
        }
    })
}

/// Removes the matching card from a column.
pub fn delete_card(project: &Project, column_id: &str, card_id: CardId) -> Project {
    with_column(project, column_id, |column| {
        column.cards.retain(|card| card.id != card_id);
    })
}

/// Moves a card from the source column to the end of the target column.
///
/// Unchanged when source equals target, when the card is not in the source
/// column (stale drag state), or when the target column does not exist.
pub fn move_card(
    project: &Project,
    source_column_id: &str,
    target_column_id: &str,
    card_id: CardId,
) -> Project {
    if source_column_id == target_column_id || project.column(target_column_id).is_none() {
        return project.clone();
    }
    let Some(source) = project.column(source_column_id) else {
        return project.clone();
    };
    let Some(position) = source.cards.iter().position(|card| card.id == card_id) else {
        return project.clone();
    };

    let mut next = project.clone();
    let mut carried = None;
    for column in &mut next.columns {
        if column.id == source_column_id {
            carried = Some(column.cards.remove(position));
        }
    }
    if let (Some(card), Some(target)) = (
        carried,
        next.columns
            .iter_mut()
            .find(|column| column.id == target_column_id),
    ) {
        target.cards.push(card);
    }
    next
}

/// Appends an empty column whose id is a slug derived from `title`.
///
/// The slug gets a numeric suffix when already taken.
pub fn add_column(project: &Project, title: &str) -> Project {
    let title = title.trim();
    if title.is_empty() {
        return project.clone();
    }
    let id = unique_column_id(project, &slugify(title));
    let mut next = project.clone();
    next.columns.push(Column::new(id, title));
    next
}

/// Renames the project itself.
pub fn rename_project(project: &Project, new_name: &str) -> Project {
    let name = new_name.trim();
    if name.is_empty() {
        return project.clone();
    }
    let mut next = project.clone();
    next.name = name.to_string();
    next
}

fn with_column(project: &Project, column_id: &str, edit: impl FnOnce(&mut Column)) -> Project {
    let mut next = project.clone();
    if let Some(column) = next.columns.iter_mut().find(|column| column.id == column_id) {
        edit(column);
    }
    next
}

fn slugify(title: &str) -> String {
    let lowered = title.to_ascii_lowercase();
    let slug = SLUG_SEPARATOR_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_COLUMN_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

fn unique_column_id(project: &Project, base: &str) -> String {
    if project.column(base).is_none() {
        return base.to_string();
    }
    (2..)
        .map(|suffix| format!("{base}-{suffix}"))
        .find(|candidate| project.column(candidate).is_none())
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        add_card, add_column, delete_card, move_card, rename_column, rename_project, slugify,
        update_card, CardStamp,
    };
    use crate::model::project::{Card, Project};
    use uuid::Uuid;

    fn board() -> Project {
        let mut project = Project {
            id: Uuid::new_v4(),
            name: "Launch".to_string(),
            organization_id: Uuid::new_v4(),
            owner_id: "user-1".to_string(),
            columns: Project::default_columns(),
            created_at: 1,
            updated_at: 1,
        };
        for (index, id) in [10, 11, 12].into_iter().enumerate() {
            project.columns[0].cards.push(Card {
                id,
                title: format!("todo {index}"),
                description: String::new(),
                created_at: id,
            });
        }
        project.columns[1].cards.push(Card {
            id: 20,
            title: "doing 0".to_string(),
            description: "in flight".to_string(),
            created_at: 20,
        });
        project
    }

    fn stamp(id: i64) -> CardStamp {
        CardStamp { id, created_at: id }
    }

    fn ids(project: &Project, column_id: &str) -> Vec<i64> {
        project
            .column(column_id)
            .unwrap()
            .cards
            .iter()
            .map(|card| card.id)
            .collect()
    }

    #[test]
    fn rename_column_trims_and_keeps_id() {
        let project = board();
        let next = rename_column(&project, "doing", "  In Progress ");
        assert_eq!(next.column("doing").unwrap().title, "In Progress");
        assert_eq!(next.columns.len(), 3);
        assert_eq!(project.column("doing").unwrap().title, "Doing");
    }

    #[test]
    fn blank_rename_is_noop() {
        let project = board();
        assert_eq!(rename_column(&project, "todo", "   "), project);
        assert_eq!(rename_column(&project, "missing", "Title"), project);
    }

    #[test]
    fn add_card_appends_to_end() {
        let project = board();
        let next = add_card(&project, "todo", " Write spec ", stamp(99));
        assert_eq!(ids(&next, "todo"), vec![10, 11, 12, 99]);
        let (_, card) = next.find_card(99).unwrap();
        assert_eq!(card.title, "Write spec");
        assert!(card.description.is_empty());
    }

    #[test]
    fn add_card_validation_noops() {
        let project = board();
        assert_eq!(add_card(&project, "todo", "", stamp(99)), project);
        assert_eq!(add_card(&project, "todo", "   ", stamp(99)), project);
        assert_eq!(add_card(&project, "nope", "x", stamp(99)), project);
        assert_eq!(add_card(&project, "done", "dup", stamp(20)), project);
    }

    #[test]
    fn add_then_delete_is_identity() {
        let project = board();
        let added = add_card(&project, "done", "X", stamp(77));
        assert_ne!(added, project);
        assert_eq!(delete_card(&added, "done", 77), project);
    }

    #[test]
    fn update_card_preserves_position() {
        let project = board();
        let mut edited = project.find_card(11).unwrap().1.clone();
        edited.description = "details".to_string();
        let next = update_card(&project, "todo", &edited);
        assert_eq!(ids(&next, "todo"), vec![10, 11, 12]);
        assert_eq!(next.find_card(11).unwrap().1.description, "details");
    }

    #[test]
    fn update_card_in_wrong_column_is_noop() {
        let project = board();
        let mut edited = project.find_card(11).unwrap().1.clone();
        edited.title = "moved?".to_string();
        assert_eq!(update_card(&project, "doing", &edited), project);
    }

    #[test]
    fn move_card_moves_exactly_one_card() {
        let project = board();
        let next = move_card(&project, "todo", "doing", 11);
        assert_eq!(ids(&next, "todo"), vec![10, 12]);
        assert_eq!(ids(&next, "doing"), vec![20, 11]);
        assert_eq!(ids(&next, "done"), Vec::<i64>::new());
        assert_eq!(next.card_count(), project.card_count());
        assert_eq!(next.find_card(11).unwrap().1, project.find_card(11).unwrap().1);
    }

    #[test]
    fn move_card_noops() {
        let project = board();
        assert_eq!(move_card(&project, "todo", "todo", 11), project);
        assert_eq!(move_card(&project, "todo", "doing", 404), project);
        assert_eq!(move_card(&project, "doing", "done", 11), project);
        assert_eq!(move_card(&project, "todo", "archive", 11), project);
    }

    #[test]
    fn add_column_derives_unique_slug() {
        let project = board();
        let next = add_column(&project, "Code Review!");
        assert_eq!(next.columns.last().unwrap().id, "code-review");
        let again = add_column(&next, "code review");
        assert_eq!(again.columns.last().unwrap().id, "code-review-2");
        let todo_again = add_column(&project, "TODO");
        assert_eq!(todo_again.columns.last().unwrap().id, "todo-2");
        assert!(again.validate().is_ok());
    }

    #[test]
    fn slugify_falls_back_for_symbol_titles() {
        assert_eq!(slugify("***"), "column");
        assert_eq!(slugify("Été 2"), "t-2");
    }

    #[test]
    fn rename_project_trims() {
        let project = board();
        assert_eq!(rename_project(&project, "  Relaunch ").name, "Relaunch");
        assert_eq!(rename_project(&project, " "), project);
    }
}
