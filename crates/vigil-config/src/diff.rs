//! The difference engine: partitions two ordered configuration sets into
//! added, deleted and modified elements.

use std::cmp::Ordering;

use crate::{object::ConfigObject, set::OrderedSet};

/// The (added, deleted, modified) partition produced by diffing two ordered
/// configuration sets of the same kind.
///
/// `modified` holds the new version of each changed element; appliers that
/// need the old value re-fetch it from the live registry by key before
/// overwriting.
#[derive(Clone, Debug)]
pub struct Difference<T> {
    added: Vec<T>,
    deleted: Vec<T>,
    modified: Vec<T>,
}

impl<T: ConfigObject> Difference<T> {
    /// Computes the difference between two ordered sets with a single linear
    /// merge-scan over their key-sorted elements.
    ///
    /// An element whose key exists on both sides but whose content differs is
    /// always classified as modified, never as a delete/add pair: deletion
    /// and addition have side effects a structural update does not.
    pub fn between(old: &OrderedSet<T>, new: &OrderedSet<T>) -> Self {
        let mut diff = Self {
            added: Vec::new(),
            deleted: Vec::new(),
            modified: Vec::new(),
        };

        let mut old_iter = old.iter().peekable();
        let mut new_iter = new.iter().peekable();
        loop {
            match (old_iter.peek(), new_iter.peek()) {
                (Some(o), Some(n)) => match o.key().cmp(&n.key()) {
                    Ordering::Less => {
                        diff.deleted.push((*o).clone());
                        old_iter.next();
                    }
                    Ordering::Greater => {
                        diff.added.push((*n).clone());
                        new_iter.next();
                    }
                    Ordering::Equal => {
                        if o != n {
                            diff.modified.push((*n).clone());
                        }
                        old_iter.next();
                        new_iter.next();
                    }
                },
                (Some(_), None) => {
                    diff.deleted.extend(old_iter.cloned());
                    break;
                }
                (None, Some(_)) => {
                    diff.added.extend(new_iter.cloned());
                    break;
                }
                (None, None) => break,
            }
        }
        diff
    }

    pub fn added(&self) -> &[T] {
        &self.added
    }

    pub fn deleted(&self) -> &[T] {
        &self.deleted
    }

    pub fn modified(&self) -> &[T] {
        &self.modified
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    fn command(name: &str, line: &str) -> Command {
        Command {
            command_name: name.to_string(),
            command_line: Some(line.to_string()),
            ..Command::default()
        }
    }

    fn set(commands: &[Command]) -> OrderedSet<Command> {
        let mut set = OrderedSet::new();
        for command in commands {
            set.insert(command.clone()).expect("unique keys");
        }
        set
    }

    #[test]
    fn diff_against_empty_old_classifies_everything_as_added() {
        let old = OrderedSet::new();
        let new = set(&[command("a", "1"), command("b", "2")]);
        let diff = Difference::between(&old, &new);
        assert_eq!(diff.added().len(), 2);
        assert!(diff.deleted().is_empty());
        assert!(diff.modified().is_empty());
    }

    #[test]
    fn diff_of_a_set_against_itself_is_empty() {
        let state = set(&[command("a", "1"), command("b", "2"), command("c", "3")]);
        let diff = Difference::between(&state, &state);
        assert!(diff.is_empty());
    }

    #[test]
    fn partition_is_exact() {
        let old = set(&[command("a", "1"), command("b", "2"), command("d", "4")]);
        let new = set(&[command("b", "2"), command("c", "3"), command("d", "changed")]);
        let diff = Difference::between(&old, &new);

        let added: Vec<_> = diff.added().iter().map(|c| c.command_name.as_str()).collect();
        let deleted: Vec<_> = diff.deleted().iter().map(|c| c.command_name.as_str()).collect();
        let modified: Vec<_> = diff.modified().iter().map(|c| c.command_name.as_str()).collect();
        assert_eq!(added, ["c"]);
        assert_eq!(deleted, ["a"]);
        assert_eq!(modified, ["d"]);
        // Modified carries the new version.
        assert_eq!(diff.modified()[0].command_line.as_deref(), Some("changed"));
    }

    #[test]
    fn same_key_different_content_is_modified_not_delete_add() {
        let old = set(&[command("a", "1")]);
        let new = set(&[command("a", "2")]);
        let diff = Difference::between(&old, &new);
        assert!(diff.added().is_empty());
        assert!(diff.deleted().is_empty());
        assert_eq!(diff.modified().len(), 1);
    }

    #[test]
    fn exhausted_sides_are_bulk_classified() {
        let old = set(&[command("a", "1"), command("b", "2"), command("c", "3")]);
        let new = set(&[command("a", "1")]);
        let diff = Difference::between(&old, &new);
        assert_eq!(diff.deleted().len(), 2);
        assert!(diff.added().is_empty());
    }
}
