//! In-memory todo collection.
//!
//! # Design
//! Records live in a `Vec` so storage order is insertion order; lookups are a
//! linear scan. The store owns id assignment through an [`IdScheme`], so the
//! handlers never compute ids themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A single todo record as it appears on the wire.
///
/// Every field defaults to its zero value when absent from a request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_complete: bool,
}

/// Policy for picking the id of the next created record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdScheme {
    /// `last id + 1`, or `1` when empty. Reissues an id once the record
    /// holding the highest id is deleted.
    #[default]
    LastPlusOne,
    /// Counter that only moves forward; ids are never reissued.
    Monotonic,
}

impl FromStr for IdScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(IdScheme::Monotonic),
            "last-plus-one" | "last_plus_one" => Ok(IdScheme::LastPlusOne),
            other => Err(ConfigError::InvalidIdScheme(other.to_string())),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdScheme::Monotonic => f.write_str("monotonic"),
            IdScheme::LastPlusOne => f.write_str("last-plus-one"),
        }
    }
}

#[derive(Debug, Default)]
pub struct TodoStore {
    todos: Vec<Todo>,
    scheme: IdScheme,
    last_issued: i64,
}

impl TodoStore {
    pub fn new(scheme: IdScheme) -> Self {
        Self {
            todos: Vec::new(),
            scheme,
            last_issued: 0,
        }
    }

    /// All records in storage order.
    pub fn all(&self) -> &[Todo] {
        &self.todos
    }

    /// First record whose id matches, with its position.
    pub fn find(&self, id: i64) -> Option<(usize, &Todo)> {
        self.todos.iter().enumerate().find(|(_, todo)| todo.id == id)
    }

    pub fn next_id(&self) -> i64 {
        let last = self.todos.last().map_or(0, |todo| todo.id);
        match self.scheme {
            IdScheme::LastPlusOne => last + 1,
            IdScheme::Monotonic => self.last_issued.max(last) + 1,
        }
    }

    /// Append `todo` under a freshly assigned id, discarding whatever id it
    /// carried.
    pub fn insert(&mut self, mut todo: Todo) -> Todo {
        todo.id = self.next_id();
        self.last_issued = todo.id;
        self.todos.push(todo.clone());
        todo
    }

    /// Overwrite the mutable fields of the record at `index`. The id is kept.
    pub fn replace_at(&mut self, index: usize, replacement: Todo) -> Option<Todo> {
        let todo = self.todos.get_mut(index)?;
        todo.title = replacement.title;
        todo.description = replacement.description;
        todo.is_complete = replacement.is_complete;
        Some(todo.clone())
    }

    /// Remove the record with `id`, shifting later records down.
    pub fn remove(&mut self, id: i64) -> Option<Todo> {
        let (index, _) = self.find(id)?;
        Some(self.todos.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(title: &str) -> Todo {
        Todo {
            title: title.to_string(),
            ..Todo::default()
        }
    }

    #[test]
    fn todo_serializes_with_camel_case_fields() {
        let todo = Todo {
            id: 7,
            title: "Test".to_string(),
            description: "desc".to_string(),
            is_complete: true,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], "desc");
        assert_eq!(json["isComplete"], true);
        assert!(json.get("is_complete").is_none());
    }

    #[test]
    fn todo_missing_fields_take_zero_values() {
        let todo: Todo = serde_json::from_str(r#"{"title":"only title"}"#).unwrap();
        assert_eq!(todo.id, 0);
        assert_eq!(todo.title, "only title");
        assert_eq!(todo.description, "");
        assert!(!todo.is_complete);
    }

    #[test]
    fn todo_ignores_unknown_fields() {
        let todo: Todo = serde_json::from_str(r#"{"title":"x","priority":3}"#).unwrap();
        assert_eq!(todo.title, "x");
    }

    #[test]
    fn todo_rejects_wrong_field_type() {
        let result: Result<Todo, _> = serde_json::from_str(r#"{"isComplete":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn first_id_is_one() {
        for scheme in [IdScheme::Monotonic, IdScheme::LastPlusOne] {
            let mut store = TodoStore::new(scheme);
            assert_eq!(store.next_id(), 1);
            assert_eq!(store.insert(todo("a")).id, 1);
        }
    }

    #[test]
    fn insert_overwrites_client_id_and_preserves_order() {
        let mut store = TodoStore::default();
        let created = store.insert(Todo {
            id: 42,
            ..todo("a")
        });
        store.insert(todo("b"));
        store.insert(todo("c"));

        assert_eq!(created.id, 1);
        let titles: Vec<_> = store.all().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        let ids: Vec<_> = store.all().iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn find_returns_position() {
        let mut store = TodoStore::default();
        store.insert(todo("a"));
        store.insert(todo("b"));

        let (index, found) = store.find(2).unwrap();
        assert_eq!(index, 1);
        assert_eq!(found.title, "b");
        assert!(store.find(999).is_none());
    }

    #[test]
    fn default_scheme_reissues_deleted_maximum() {
        let mut store = TodoStore::default();
        store.insert(todo("a"));
        store.insert(todo("b"));
        store.remove(2).unwrap();

        assert_eq!(store.insert(todo("c")).id, 2);
    }

    #[test]
    fn monotonic_never_reissues() {
        let mut store = TodoStore::new(IdScheme::Monotonic);
        store.insert(todo("a"));
        store.insert(todo("b"));
        store.remove(2).unwrap();
        assert_eq!(store.insert(todo("c")).id, 3);

        store.remove(1).unwrap();
        store.remove(3).unwrap();
        assert!(store.all().is_empty());
        assert_eq!(store.insert(todo("d")).id, 4);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut store = TodoStore::default();
        for title in ["a", "b", "c", "d"] {
            store.insert(todo(title));
        }
        let removed = store.remove(2).unwrap();

        assert_eq!(removed.title, "b");
        assert_eq!(store.all().len(), 3);
        let ids: Vec<_> = store.all().iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 3, 4]);
        assert!(store.remove(2).is_none());
    }

    #[test]
    fn update_replaces_fields_but_not_id() {
        let mut store = TodoStore::default();
        store.insert(todo("a"));
        store.insert(todo("b"));

        let (index, _) = store.find(1).unwrap();
        let updated = store
            .replace_at(
                index,
                Todo {
                    id: 99,
                    title: "a2".to_string(),
                    description: "new".to_string(),
                    is_complete: true,
                },
            )
            .unwrap();

        assert_eq!(updated.id, 1);
        assert_eq!(updated.title, "a2");
        assert!(updated.is_complete);
        assert_eq!(store.all()[0], updated);
        assert_eq!(store.all()[1].title, "b");
        assert!(store.replace_at(5, todo("x")).is_none());
    }

    #[test]
    fn id_scheme_parses_from_str() {
        assert_eq!("monotonic".parse::<IdScheme>().unwrap(), IdScheme::Monotonic);
        assert_eq!("Last-Plus-One".parse::<IdScheme>().unwrap(), IdScheme::LastPlusOne);
        assert!(matches!(
            "random".parse::<IdScheme>(),
            Err(ConfigError::InvalidIdScheme(_))
        ));
    }
}
