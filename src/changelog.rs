//! Changelog generation between two documentation snapshots.

use std::collections::HashMap;

use crate::types::{AssetChanges, ChangeEntry, ChangelogRecord, DesignChanges, DocumentationObject};

/// Three-way diff keyed by `key`.
///
/// Adds and changes follow the order of `new`; deletes follow the order of
/// `prev`. Items present in both lists produce a change only when they differ.
pub fn diff<T, K, F>(prev: &[T], new: &[T], key: F) -> Vec<ChangeEntry<T>>
where
    T: Clone + PartialEq,
    K: Eq + std::hash::Hash,
    F: Fn(&T) -> K,
{
    let previous: HashMap<K, &T> = prev.iter().map(|item| (key(item), item)).collect();
    let current: HashMap<K, &T> = new.iter().map(|item| (key(item), item)).collect();

    let mut entries = Vec::new();
    for item in new {
        match previous.get(&key(item)) {
            None => entries.push(ChangeEntry::Add {
                object: item.clone(),
            }),
            Some(old) if *old != item => entries.push(ChangeEntry::Change {
                old: (*old).clone(),
                new: item.clone(),
            }),
            Some(_) => {}
        }
    }
    for item in prev {
        if !current.contains_key(&key(item)) {
            entries.push(ChangeEntry::Delete {
                object: item.clone(),
            });
        }
    }
    entries
}

fn non_empty<T>(entries: Vec<T>) -> Option<Vec<T>> {
    (!entries.is_empty()).then_some(entries)
}

/// Changelog from `prev` to `new`, or `None` when nothing changed.
/// A missing previous snapshot diffs as empty.
pub fn generate_changelog(
    prev: Option<&DocumentationObject>,
    new: &DocumentationObject,
) -> Option<ChangelogRecord> {
    let empty = DocumentationObject::default();
    let prev = prev.unwrap_or(&empty);

    let colors = non_empty(diff(&prev.design.color, &new.design.color, |c| c.sass.clone()));
    let typography = non_empty(diff(&prev.design.typography, &new.design.typography, |t| {
        t.name.clone()
    }));
    let icons = non_empty(diff(&prev.assets.icons, &new.assets.icons, |a| a.path.clone()));
    let logos = non_empty(diff(&prev.assets.logos, &new.assets.logos, |a| a.path.clone()));

    let design = (colors.is_some() || typography.is_some())
        .then_some(DesignChanges { colors, typography });
    let assets = (icons.is_some() || logos.is_some()).then_some(AssetChanges { icons, logos });

    if design.is_none() && assets.is_none() {
        return None;
    }
    Some(ChangelogRecord {
        timestamp: new.timestamp.clone(),
        design,
        assets,
    })
}
