#[cfg(test)]
mod store_tests {
    use std::{cell::Cell, rc::Rc};

    use pretty_assertions::assert_eq;

    use crate::{
        error::{Result, TallyError},
        kv::{KeyValueStore, MemoryKv},
        models::{ItemUpdate, Priority, Section, Weekday},
        ordering::{DropPosition, Position},
        store::{DeleteOutcome, Store, StoreEvent, ITEMS_KEY},
    };

    struct Fixture {
        store: Store<MemoryKv>,
        c1: String,
        t1: String,
        t2: String,
        c2: String,
        t3: String,
    }

    /// C1 [t1, t2], C2 [t3]
    fn fixture() -> Fixture {
        let mut store = Store::open(MemoryKv::new());
        let c1 = store.create_cluster("C1").unwrap();
        let t1 = store.add_task("t1").unwrap();
        let t2 = store.add_task("t2").unwrap();
        let c2 = store.create_cluster("C2").unwrap();
        let t3 = store.add_task("t3").unwrap();
        store.move_to_cluster(&t1, &c1).unwrap();
        store.move_to_cluster(&t2, &c1).unwrap();
        store.move_to_cluster(&t3, &c2).unwrap();
        Fixture {
            store,
            c1,
            t1,
            t2,
            c2,
            t3,
        }
    }

    fn labels<K: KeyValueStore>(store: &Store<K>) -> Vec<String> {
        store
            .items()
            .iter()
            .map(|item| item.label().to_string())
            .collect()
    }

    #[test]
    fn test_add_trims_and_sets_section() {
        let mut store = Store::open(MemoryKv::new());
        let task = store.add_task("  Buy milk  ").unwrap();
        let cluster = store.create_cluster("Errands").unwrap();

        assert_eq!(store.get(&task).unwrap().label(), "Buy milk");
        assert_eq!(store.get(&task).unwrap().section(), Section::TaskManager);
        assert_eq!(store.get(&cluster).unwrap().section(), Section::MainContainer);
        assert_eq!(store.version(), 2);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_add_rejects_empty_label() {
        let mut store = Store::open(MemoryKv::new());
        match store.add("   ", false).unwrap_err() {
            TallyError::InvalidInput { field, .. } => assert_eq!(field, "label"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
        assert!(store.items().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_add_draft_goes_first() {
        let mut store = Store::open(MemoryKv::new());
        store.add_task("Existing").unwrap();
        let draft = store.add_draft().unwrap();
        assert_eq!(store.items()[0].id(), draft);
        assert_eq!(labels(&store), vec!["New Task", "Existing"]);
    }

    #[test]
    fn test_delete_cluster_cascades_exactly() {
        let mut f = fixture();
        let root = f.store.add_task("root").unwrap();

        let outcome = f.store.delete(&f.c1).unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::Deleted(vec![f.c1.clone(), f.t1.clone(), f.t2.clone()])
        );
        assert_eq!(labels(&f.store), vec!["C2", "t3", "root"]);
        assert!(f.store.get(&root).is_some());
    }

    #[test]
    fn test_delete_cleans_skip_set_and_schedule() {
        let mut f = fixture();
        f.store.schedule_task(Weekday::Monday, &f.t1).unwrap();
        assert_eq!(f.store.skip_current_cluster().unwrap(), Some(f.c1.clone()));

        f.store.delete(&f.c1).unwrap();
        assert!(f.store.skipped_clusters().is_empty());
        assert!(f.store.tasks_for_day(Weekday::Monday).is_empty());
        assert!(f.store.schedule().is_empty());
    }

    #[test]
    fn test_delete_pinned_cluster_needs_confirmation() {
        let mut f = fixture();
        f.store.set_pinned(&f.c1, true).unwrap();
        let events = f.store.subscribe();
        let version = f.store.version();

        assert_eq!(
            f.store.delete(&f.c1).unwrap(),
            DeleteOutcome::ConfirmationRequired
        );
        assert_eq!(f.store.items().len(), 5);
        assert_eq!(f.store.version(), version);
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::DeletionNeedsConfirmation { id: f.c1.clone() }
        );

        let removed = f.store.delete_confirmed(&f.c1).unwrap();
        assert_eq!(removed.len(), 3);
    }

    #[test]
    fn test_delete_missing_item() {
        let mut store = Store::open(MemoryKv::new());
        match store.delete("nope").unwrap_err() {
            TallyError::ItemNotFound { id } => assert_eq!(id, "nope"),
            other => panic!("Expected ItemNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_completed_and_section() {
        let mut f = fixture();
        f.store.toggle_complete(&f.t1).unwrap();
        f.store.toggle_complete(&f.t3).unwrap();

        let removed = f.store.delete_completed().unwrap();
        assert_eq!(removed, vec![f.t1.clone(), f.t3.clone()]);
        assert_eq!(labels(&f.store), vec!["C1", "t2", "C2"]);

        f.store.set_pinned(&f.c2, true).unwrap();
        let events = f.store.subscribe();
        let removed = f.store.delete_section(Section::MainContainer).unwrap();
        assert_eq!(removed, vec![f.c1.clone(), f.t2.clone()]);
        assert_eq!(labels(&f.store), vec!["C2"]);
        assert!(events.try_iter().any(|event| matches!(
            event,
            StoreEvent::DeletionNeedsConfirmation { id } if id == f.c2
        )));

        let version = f.store.version();
        assert!(f.store.delete_completed().unwrap().is_empty());
        assert_eq!(f.store.version(), version);
    }

    #[test]
    fn test_toggle_complete_round_trip() {
        let mut store = Store::open(MemoryKv::new());
        let id = store.add_task("Task").unwrap();

        assert_eq!(store.toggle_complete(&id).unwrap(), Some(true));
        let task = store.get(&id).unwrap().as_task().unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());
        assert_eq!(task.section, Section::Completed);

        assert_eq!(store.toggle_complete(&id).unwrap(), Some(false));
        let task = store.get(&id).unwrap().as_task().unwrap();
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.section, Section::TaskManager);
    }

    #[test]
    fn test_toggle_complete_on_cluster_is_noop() {
        let mut f = fixture();
        let version = f.store.version();
        assert_eq!(f.store.toggle_complete(&f.c1).unwrap(), None);
        assert_eq!(f.store.version(), version);
        assert!(!f.store.get(&f.c1).unwrap().is_completed());
    }

    #[test]
    fn test_toggle_complete_cascades_to_subtasks() {
        let mut store = Store::open(MemoryKv::new());
        let id = store.add_task("Task").unwrap();
        store.add_subtask(&id, "one").unwrap();
        store.add_subtask(&id, "two").unwrap();

        store.toggle_complete(&id).unwrap();
        let task = store.get(&id).unwrap().as_task().unwrap();
        assert!(task.subtasks.iter().all(|s| s.completed));
    }

    #[test]
    fn test_subtasks_drive_completion() {
        let mut store = Store::open(MemoryKv::new());
        let id = store.add_task("Task").unwrap();
        let a = store.add_subtask(&id, "a").unwrap();
        let b = store.add_subtask(&id, "b").unwrap();

        store.toggle_subtask(&id, &a).unwrap();
        assert!(!store.get(&id).unwrap().is_completed());
        store.toggle_subtask(&id, &b).unwrap();
        assert!(store.get(&id).unwrap().is_completed());
        assert_eq!(store.get(&id).unwrap().section(), Section::Completed);

        store.toggle_subtask(&id, &a).unwrap();
        assert!(!store.get(&id).unwrap().is_completed());

        store.toggle_subtask(&id, &a).unwrap();
        store.add_subtask(&id, "c").unwrap();
        assert!(!store.get(&id).unwrap().is_completed());
    }

    #[test]
    fn test_remove_subtask() {
        let mut store = Store::open(MemoryKv::new());
        let id = store.add_task("Task").unwrap();
        let a = store.add_subtask(&id, "a").unwrap();
        let b = store.add_subtask(&id, "b").unwrap();
        store.toggle_subtask(&id, &a).unwrap();

        store.remove_subtask(&id, &b).unwrap();
        assert!(store.get(&id).unwrap().is_completed());

        match store.remove_subtask(&id, &b).unwrap_err() {
            TallyError::SubtaskNotFound { subtask_id, .. } => assert_eq!(subtask_id, b),
            other => panic!("Expected SubtaskNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_subtask_on_cluster_is_rejected() {
        let mut f = fixture();
        assert!(matches!(
            f.store.add_subtask(&f.c1, "nope").unwrap_err(),
            TallyError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_update_rules() {
        let mut f = fixture();

        f.store
            .update(
                &f.c1,
                ItemUpdate {
                    label: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(f.store.get(&f.c1).unwrap().label(), "C1");

        let err = f
            .store
            .update(
                &f.t1,
                ItemUpdate {
                    label: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TallyError::InvalidInput { .. }));

        assert!(f.store.set_pinned(&f.t1, true).is_err());
        assert!(f
            .store
            .update(
                &f.c1,
                ItemUpdate {
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .is_err());

        f.store
            .update(
                &f.t1,
                ItemUpdate {
                    label: Some(" Renamed ".to_string()),
                    priority: Some(Priority::Low),
                    ..Default::default()
                },
            )
            .unwrap();
        let task = f.store.get(&f.t1).unwrap().as_task().unwrap();
        assert_eq!(task.label, "Renamed");
        assert_eq!(task.priority, Priority::Low);
    }

    #[test]
    fn test_set_section_keeps_order() {
        let mut f = fixture();
        let before = labels(&f.store);
        f.store.set_section(&f.t2, Section::Completed).unwrap();
        assert_eq!(labels(&f.store), before);
        assert_eq!(f.store.get(&f.t2).unwrap().section(), Section::Completed);
        assert!(!f.store.get(&f.t2).unwrap().is_completed());
    }

    #[test]
    fn test_self_reorder_is_noop() {
        let mut f = fixture();
        let version = f.store.version();
        f.store.reorder(&f.t1, &f.t1, Position::Above).unwrap();
        assert_eq!(f.store.version(), version);
    }

    #[test]
    fn test_reorder_missing_item() {
        let mut f = fixture();
        assert!(matches!(
            f.store.reorder("ghost", &f.t1, Position::Above).unwrap_err(),
            TallyError::ItemNotFound { .. }
        ));
    }

    #[test]
    fn test_cluster_block_moves_atomically() {
        let mut f = fixture();
        f.store.reorder(&f.c1, &f.c2, Position::Below).unwrap();
        assert_eq!(labels(&f.store), vec!["C2", "t3", "C1", "t1", "t2"]);
        assert_eq!(f.store.get(&f.t1).unwrap().parent_id(), Some(f.c1.as_str()));
    }

    #[test]
    fn test_rejected_reorder_leaves_state() {
        let mut f = fixture();
        let before = labels(&f.store);
        let version = f.store.version();
        assert!(f.store.reorder(&f.t3, &f.t1, Position::Below).is_err());
        assert_eq!(labels(&f.store), before);
        assert_eq!(f.store.version(), version);
    }

    #[test]
    fn test_move_into_and_out_round_trip() {
        let mut f = fixture();
        let root = f.store.add_task("root").unwrap();

        f.store.move_to_cluster(&root, &f.c1).unwrap();
        assert_eq!(f.store.children_of(&f.c1).len(), 3);
        f.store.remove_from_cluster(&root).unwrap();

        assert_eq!(labels(&f.store), vec!["C1", "t1", "t2", "root", "C2", "t3"]);
        let task = f.store.get(&root).unwrap();
        assert!(task.is_root());
        assert_eq!(task.section(), Section::MainContainer);
    }

    #[test]
    fn test_move_to_same_cluster_is_noop() {
        let mut f = fixture();
        let version = f.store.version();
        f.store.move_to_cluster(&f.t1, &f.c1).unwrap();
        f.store.remove_from_cluster(&f.c1).unwrap_err();
        assert_eq!(f.store.version(), version);
    }

    #[test]
    fn test_move_up_down_and_positions() {
        let mut f = fixture();
        assert!(f.store.is_first(&f.t1).unwrap());
        assert!(f.store.is_last(&f.t2).unwrap());
        assert_eq!(f.store.position_of(&f.c2).unwrap(), 2);

        f.store.move_down(&f.t1).unwrap();
        assert_eq!(labels(&f.store), vec!["C1", "t2", "t1", "C2", "t3"]);

        let version = f.store.version();
        f.store.move_down(&f.t1).unwrap();
        f.store.move_up(&f.c1).unwrap();
        assert_eq!(f.store.version(), version);

        f.store.move_up(&f.c2).unwrap();
        assert_eq!(labels(&f.store), vec!["C2", "t3", "C1", "t2", "t1"]);
        assert!(f.store.is_first(&f.c2).unwrap());
    }

    #[test]
    fn test_apply_drop() {
        let mut f = fixture();
        let root = f.store.add_task("root").unwrap();

        f.store.apply_drop(&root, &f.c2, DropPosition::Into).unwrap();
        assert_eq!(f.store.get(&root).unwrap().parent_id(), Some(f.c2.as_str()));

        f.store.apply_drop(&f.t1, &f.c2, DropPosition::Above).unwrap();
        assert_eq!(labels(&f.store), vec!["C1", "t2", "t1", "C2", "t3", "root"]);
        assert!(f.store.get(&f.t1).unwrap().is_root());
        assert_eq!(f.store.get(&f.t1).unwrap().section(), Section::MainContainer);

        assert!(matches!(
            f.store.apply_drop(&f.c1, &f.c2, DropPosition::Into).unwrap_err(),
            TallyError::InvalidMove { .. }
        ));
    }

    #[test]
    fn test_current_task_prefers_priority() {
        let mut f = fixture();
        assert_eq!(f.store.current_task().unwrap().id, f.t1);

        f.store
            .update(
                &f.t3,
                ItemUpdate {
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(f.store.current_task().unwrap().id, f.t3);
    }

    #[test]
    fn test_skip_cycles_through_clusters() {
        let mut f = fixture();
        let c3 = f.store.create_cluster("C3").unwrap();
        let t4 = f.store.add_task("t4").unwrap();
        f.store.move_to_cluster(&t4, &c3).unwrap();

        let first = f.store.current_task().unwrap().id.clone();
        assert_eq!(first, f.t1);

        let mut visited = Vec::new();
        for _ in 0..3 {
            visited.push(f.store.skip_current_cluster().unwrap().unwrap());
        }
        assert_eq!(visited, vec![f.c1.clone(), f.c2.clone(), c3.clone()]);
        assert_eq!(f.store.current_task().unwrap().id, first);
        assert_eq!(f.store.skipped_clusters().len(), 2);
    }

    /// C1 [a], C2 [b], C3 [c] with C1 and C2 skipped.
    fn three_clusters_two_skipped() -> (Store<MemoryKv>, Vec<String>, Vec<String>) {
        let mut store = Store::open(MemoryKv::new());
        let mut clusters = Vec::new();
        let mut tasks = Vec::new();
        for (cluster, task) in [("C1", "a"), ("C2", "b"), ("C3", "c")] {
            let cluster = store.create_cluster(cluster).unwrap();
            let task = store.add_task(task).unwrap();
            store.move_to_cluster(&task, &cluster).unwrap();
            clusters.push(cluster);
            tasks.push(task);
        }
        store.skip_current_cluster().unwrap();
        store.skip_current_cluster().unwrap();
        assert_eq!(store.skipped_clusters(), vec![clusters[0].as_str(), clusters[1].as_str()]);
        assert_eq!(store.current_task().unwrap().id, tasks[2]);
        (store, clusters, tasks)
    }

    #[test]
    fn test_focus_survives_last_unskipped_cluster_finishing() {
        let (mut store, clusters, tasks) = three_clusters_two_skipped();
        store.toggle_complete(&tasks[2]).unwrap();

        assert_eq!(store.current_task().unwrap().id, tasks[0]);
        assert_eq!(store.skip_current_cluster().unwrap(), Some(clusters[0].clone()));
        assert_eq!(store.skipped_clusters(), vec![clusters[0].as_str()]);
        assert_eq!(store.current_task().unwrap().id, tasks[1]);
    }

    #[test]
    fn test_focus_survives_last_unskipped_cluster_deleted() {
        let (mut store, clusters, tasks) = three_clusters_two_skipped();
        store.delete(&clusters[2]).unwrap();

        assert_eq!(store.current_task().unwrap().id, tasks[0]);
        store.skip_current_cluster().unwrap();
        assert_eq!(store.current_task().unwrap().id, tasks[1]);
        store.skip_current_cluster().unwrap();
        assert_eq!(store.current_task().unwrap().id, tasks[0]);
        assert_eq!(store.skipped_clusters().len(), 1);
    }

    #[test]
    fn test_skip_needs_two_clusters() {
        let mut store = Store::open(MemoryKv::new());
        let cluster = store.create_cluster("Only").unwrap();
        let task = store.add_task("t").unwrap();
        store.move_to_cluster(&task, &cluster).unwrap();
        assert_eq!(store.skip_current_cluster().unwrap(), None);
        assert!(store.skipped_clusters().is_empty());
    }

    #[test]
    fn test_skip_ignores_root_current_task() {
        let mut f = fixture();
        let root = f.store.add_draft().unwrap();
        assert_eq!(f.store.current_task().unwrap().id, root);
        assert_eq!(f.store.skip_current_cluster().unwrap(), None);
    }

    #[test]
    fn test_skip_prunes_finished_clusters() {
        let mut f = fixture();
        f.store.skip_current_cluster().unwrap();
        assert_eq!(f.store.skipped_clusters(), vec![f.c1.as_str()]);

        f.store.toggle_complete(&f.t1).unwrap();
        f.store.toggle_complete(&f.t2).unwrap();
        assert_eq!(f.store.skip_current_cluster().unwrap(), None);
        assert!(f.store.skipped_clusters().is_empty());
    }

    #[test]
    fn test_clear_skipped() {
        let mut f = fixture();
        f.store.skip_current_cluster().unwrap();
        f.store.clear_skipped().unwrap();
        assert!(f.store.skipped_clusters().is_empty());
        assert_eq!(f.store.current_task().unwrap().id, f.t1);
    }

    #[test]
    fn test_queries() {
        let mut f = fixture();
        f.store.toggle_complete(&f.t3).unwrap();

        let roots: Vec<&str> = f.store.root_items().iter().map(|i| i.id()).collect();
        assert_eq!(roots, vec![f.c1.as_str(), f.c2.as_str()]);
        assert_eq!(f.store.cluster_ids_with_incomplete_tasks(), vec![f.c1.clone()]);
        let open: Vec<&str> = f
            .store
            .incomplete_tasks()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(open, vec![f.t1.as_str(), f.t2.as_str()]);
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let kv = MemoryKv::with_entries([(
            ITEMS_KEY,
            r#"[{"id":"abc-1","label":"one"},{"id":"abd-2","label":"two"}]"#,
        )]);
        let store = Store::open(kv);

        assert_eq!(store.resolve_id("abc").unwrap(), "abc-1");
        assert_eq!(store.resolve_id("abd-2").unwrap(), "abd-2");
        match store.resolve_id("ab").unwrap_err() {
            TallyError::AmbiguousId { matches, .. } => assert_eq!(matches, 2),
            other => panic!("Expected AmbiguousId error, got {other:?}"),
        }
        assert!(matches!(
            store.resolve_id("zz").unwrap_err(),
            TallyError::ItemNotFound { .. }
        ));
    }

    #[test]
    fn test_schedule_rules() {
        let mut f = fixture();
        assert!(f.store.schedule_task(Weekday::Friday, &f.t2).unwrap());
        assert!(!f.store.schedule_task(Weekday::Friday, &f.t2).unwrap());
        assert!(f.store.schedule_task(Weekday::Friday, &f.c1).is_err());

        let friday: Vec<&str> = f
            .store
            .tasks_for_day(Weekday::Friday)
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(friday, vec!["t2"]);

        assert!(f.store.unschedule_task(Weekday::Friday, &f.t2).unwrap());
        assert!(!f.store.unschedule_task(Weekday::Friday, &f.t2).unwrap());
    }

    #[test]
    fn test_events_reach_subscribers() {
        let mut store = Store::open(MemoryKv::new());
        let events = store.subscribe();
        let dropped = store.subscribe();
        drop(dropped);

        let id = store.add_task("Task").unwrap();
        store.toggle_complete(&id).unwrap();

        assert_eq!(events.try_recv().unwrap(), StoreEvent::ItemAdded { id: id.clone() });
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::ItemToggled {
                id,
                completed: true
            }
        );
        assert_eq!(store.subscribers.len(), 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let mut f = fixture();
        f.store.schedule_task(Weekday::Sunday, &f.t3).unwrap();
        f.store.skip_current_cluster().unwrap();
        let before = labels(&f.store);

        let store = Store::open(f.store.into_inner());
        assert_eq!(labels(&store), before);
        assert_eq!(store.skipped_clusters(), vec![f.c1.as_str()]);
        assert_eq!(store.tasks_for_day(Weekday::Sunday)[0].id, f.t3);
        assert!(!store.is_dirty());
    }

    /// Backend whose writes fail while the shared flag is set.
    struct FlakyKv {
        inner: MemoryKv,
        failing: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyKv {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.failing.get() {
                return Err(TallyError::database("disk full")
                    .with_source(rusqlite::Error::InvalidQuery));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_save_errors_are_surfaced() {
        let failing = Rc::new(Cell::new(true));
        let mut store = Store::open(FlakyKv {
            inner: MemoryKv::new(),
            failing: Rc::clone(&failing),
        });

        let err = store.add_task("Task").unwrap_err();
        assert!(matches!(err, TallyError::Database { .. }));
        assert_eq!(store.items().len(), 1);
        assert!(store.is_dirty());

        failing.set(false);
        store.save().unwrap();
        assert!(!store.is_dirty());
        assert!(store.kv().get(ITEMS_KEY).unwrap().is_some());
    }
}
