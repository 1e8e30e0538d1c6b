//! Best-effort loading and repair of persisted state.

use std::collections::{HashMap, HashSet, VecDeque};

use serde_json::Value;

use super::{ITEMS_KEY, SCHEDULE_KEY, SKIPPED_KEY};
use crate::{
    kv::KeyValueStore,
    models::{Item, WeeklySchedule},
    ordering,
};

pub(crate) struct LoadedState {
    pub items: Vec<Item>,
    pub skipped: VecDeque<String>,
    pub schedule: WeeklySchedule,
    /// Set when loading dropped or rewrote anything
    pub repaired: bool,
}

pub(crate) fn load_state<K: KeyValueStore>(kv: &K) -> LoadedState {
    let mut repaired = false;

    let mut items = read_items(kv, &mut repaired);
    let renames = migrate_legacy_ids(&mut items);
    repaired |= !renames.is_empty();

    for item in &mut items {
        if let Some(task) = item.as_task_mut() {
            if let Some(new_id) = task.parent_id.as_ref().and_then(|p| renames.get(p)) {
                task.parent_id = Some(new_id.clone());
            }
        }
    }

    let before: Vec<(String, Option<String>)> = items
        .iter()
        .map(|item| (item.id().to_string(), item.parent_id().map(str::to_string)))
        .collect();
    let items = ordering::normalize(items);
    let after: Vec<(String, Option<String>)> = items
        .iter()
        .map(|item| (item.id().to_string(), item.parent_id().map(str::to_string)))
        .collect();
    repaired |= before != after;

    let cluster_ids: HashSet<&str> = items
        .iter()
        .filter(|item| item.is_cluster())
        .map(Item::id)
        .collect();
    let task_ids: HashSet<&str> = items
        .iter()
        .filter(|item| !item.is_cluster())
        .map(Item::id)
        .collect();

    let raw_skipped: Vec<String> = read_json(kv, SKIPPED_KEY).unwrap_or_default();
    let raw_len = raw_skipped.len();
    let mut skipped = VecDeque::new();
    for id in raw_skipped {
        let id = renames.get(&id).cloned().unwrap_or(id);
        if cluster_ids.contains(id.as_str()) && !skipped.contains(&id) {
            skipped.push_back(id);
        }
    }
    repaired |= skipped.len() != raw_len;

    let mut schedule: WeeklySchedule = read_json(kv, SCHEDULE_KEY).unwrap_or_default();
    let raw_schedule = schedule.clone();
    schedule.remap(&renames, |id| task_ids.contains(id));
    repaired |= schedule != raw_schedule;

    if repaired {
        log::debug!("Repaired persisted state while loading");
    }

    LoadedState {
        items,
        skipped,
        schedule,
        repaired,
    }
}

/// Reads the item array, keeping every record that converts and dropping
/// duplicates after the first occurrence.
fn read_items<K: KeyValueStore>(kv: &K, repaired: &mut bool) -> Vec<Item> {
    let Some(value) = read_json::<Value, K>(kv, ITEMS_KEY) else {
        return Vec::new();
    };
    let Value::Array(records) = value else {
        log::warn!("Ignoring '{ITEMS_KEY}': expected a JSON array");
        *repaired = true;
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Item>(record) {
            Ok(item) if seen.insert(item.id().to_string()) => items.push(item),
            Ok(item) => {
                log::warn!("Discarding duplicate item {} at index {index}", item.id());
                *repaired = true;
            }
            Err(e) => {
                log::warn!("Discarding malformed item record at index {index}: {e}");
                *repaired = true;
            }
        }
    }
    items
}

/// Rewrites ids without a `-` to `<id>-<8 hex>` and returns the renames.
fn migrate_legacy_ids(items: &mut [Item]) -> HashMap<String, String> {
    let mut renames = HashMap::new();
    for item in items.iter_mut() {
        if item.id().contains('-') {
            continue;
        }
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let new_id = format!("{}-{}", item.id(), &suffix[..8]);
        log::debug!("Migrating legacy id {} to {new_id}", item.id());
        renames.insert(item.id().to_string(), new_id.clone());
        item.set_id(new_id);
    }
    renames
}

fn read_json<T, K>(kv: &K, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
    K: KeyValueStore,
{
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read '{key}': {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable '{key}': {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{kv::MemoryKv, models::Weekday};

    #[test]
    fn test_empty_backend_loads_empty_state() {
        let state = load_state(&MemoryKv::new());
        assert!(state.items.is_empty());
        assert!(state.skipped.is_empty());
        assert!(!state.repaired);
    }

    #[test]
    fn test_non_array_payload_yields_empty_state() {
        let kv = MemoryKv::with_entries([(ITEMS_KEY, r#"{"id":"a-1"}"#)]);
        let state = load_state(&kv);
        assert!(state.items.is_empty());
        assert!(state.repaired);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let kv = MemoryKv::with_entries([(
            ITEMS_KEY,
            r#"[{"id":"a-1","label":"first"},{"id":"a-1","label":"second"}]"#,
        )]);
        let state = load_state(&kv);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].label(), "first");
    }

    #[test]
    fn test_legacy_ids_are_migrated_with_references() {
        let kv = MemoryKv::with_entries([
            (
                ITEMS_KEY,
                r#"[{"id":"100","label":"Home","isCluster":true},{"id":"200","label":"Sweep","parentId":"100"}]"#,
            ),
            (SKIPPED_KEY, r#"["100","100"]"#),
            (SCHEDULE_KEY, r#"{"monday":["200"]}"#),
        ]);
        let state = load_state(&kv);

        let cluster_id = state.items[0].id().to_string();
        let task_id = state.items[1].id().to_string();
        assert!(cluster_id.starts_with("100-"));
        assert_eq!(cluster_id.len(), "100-".len() + 8);
        assert_eq!(state.items[1].parent_id(), Some(cluster_id.as_str()));
        assert_eq!(state.skipped, VecDeque::from([cluster_id]));
        assert_eq!(state.schedule.tasks(Weekday::Monday), [task_id]);
        assert!(state.repaired);
    }

    #[test]
    fn test_stale_skip_and_schedule_entries_are_dropped() {
        let kv = MemoryKv::with_entries([
            (
                ITEMS_KEY,
                r#"[{"id":"c-1","label":"Home","isCluster":true},{"id":"t-1","label":"Sweep"}]"#,
            ),
            (SKIPPED_KEY, r#"["t-1","c-9","c-1"]"#),
            (SCHEDULE_KEY, r#"{"friday":["c-1","t-1","t-9"]}"#),
        ]);
        let state = load_state(&kv);
        assert_eq!(state.skipped, VecDeque::from(["c-1".to_string()]));
        assert_eq!(state.schedule.tasks(Weekday::Friday), ["t-1"]);
    }
}
