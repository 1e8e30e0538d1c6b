#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;
    use pretty_assertions::assert_eq;

    use crate::models::{Item, ItemRecord, Priority, Section, Subtask, Task, Weekday, WeeklySchedule};

    fn ts(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    fn create_test_task() -> Task {
        Task {
            id: "1700000000000-a1b2c3d4".to_string(),
            label: "Write report".to_string(),
            completed: false,
            parent_id: Some("1700000000000-c1c1c1c1".to_string()),
            section: Section::TaskManager,
            priority: Priority::Medium,
            subtasks: vec![Subtask {
                id: "s-1".to_string(),
                label: "Outline".to_string(),
                completed: true,
                created_at: ts(1640995200),
            }],
            created_at: ts(1640995200), // 2022-01-01 00:00:00 UTC
            updated_at: Some(ts(1641081600)),
            completed_at: None,
        }
    }

    #[test]
    fn test_task_serializes_to_flat_record() {
        let item = Item::Task(create_test_task());
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["id"], "1700000000000-a1b2c3d4");
        assert_eq!(value["label"], "Write report");
        assert_eq!(value["isCluster"], false);
        assert_eq!(value["parentId"], "1700000000000-c1c1c1c1");
        assert_eq!(value["section"], "taskManager");
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["subtasks"][0]["label"], "Outline");
        assert!(value.get("isPinned").is_none());
        assert!(value.get("completedAt").is_none());
    }

    #[test]
    fn test_record_round_trip_preserves_task() {
        let item = Item::Task(create_test_task());
        let json = serde_json::to_string(&item).unwrap();
        let parsed: Item = serde_json::from_str(&json).unwrap();
        // Completion follows the subtasks: the only subtask is done.
        let task = parsed.as_task().unwrap();
        assert!(task.completed);
        assert_eq!(task.label, "Write report");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_cluster_record_ignores_task_fields() {
        let raw = r#"{
            "id": "c-1",
            "label": "Errands",
            "isCluster": true,
            "isPinned": true,
            "parentId": "c-0",
            "completed": true,
            "priority": "high"
        }"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        let cluster = item.as_cluster().unwrap();
        assert!(cluster.is_pinned);
        assert_eq!(item.parent_id(), None);
        assert!(!item.is_completed());
        assert_eq!(item.section(), Section::MainContainer);
    }

    #[test]
    fn test_legacy_todo_field_is_accepted() {
        let raw = r#"{"id":"t-1","todo":"Buy milk","completed":false}"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.label(), "Buy milk");
        assert_eq!(item.section(), Section::TaskManager);
        assert!(item.is_root());
    }

    #[test]
    fn test_empty_label_is_rejected() {
        let raw = r#"{"id":"t-1","label":"   "}"#;
        assert!(serde_json::from_str::<Item>(raw).is_err());
    }

    #[test]
    fn test_blank_subtask_is_rejected() {
        let raw = r#"{"id":"t-1","label":"Task","subtasks":[{"id":"","label":"x","createdAt":"2022-01-01T00:00:00Z"}]}"#;
        assert!(serde_json::from_str::<Item>(raw).is_err());
    }

    #[test]
    fn test_incomplete_subtask_clears_completion() {
        let mut record: ItemRecord = Item::Task(create_test_task()).into();
        record.completed = true;
        record.completed_at = Some(ts(1641081600));
        record.subtasks.push(Subtask {
            id: "s-2".to_string(),
            label: "Draft".to_string(),
            completed: false,
            created_at: ts(1640995200),
        });

        let item = Item::try_from(record).unwrap();
        let task = item.as_task().unwrap();
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_blank_parent_id_means_root() {
        let raw = r#"{"id":"t-1","label":"Task","parentId":""}"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert!(item.is_root());
    }

    #[test]
    fn test_short_id() {
        let item = Item::Task(create_test_task());
        assert_eq!(item.short_id(), "17000000");

        let mut task = create_test_task();
        task.id = "abc".to_string();
        assert_eq!(Item::Task(task).short_id(), "abc");
    }

    #[test]
    fn test_apply_completion_moves_section() {
        let mut task = create_test_task();
        task.apply_completion(true, ts(1641168000));
        assert_eq!(task.section, Section::Completed);
        assert_eq!(task.completed_at, Some(ts(1641168000)));

        task.apply_completion(false, ts(1641254400));
        assert_eq!(task.section, Section::TaskManager);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_apply_completion_unchanged_keeps_section() {
        let mut task = create_test_task();
        task.section = Section::MainContainer;
        task.apply_completion(false, ts(1641168000));
        assert_eq!(task.section, Section::MainContainer);
    }

    #[test]
    fn test_priority_parsing_and_order() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("med".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
        assert!(Priority::High > Priority::Low);
        assert!(Priority::Low > Priority::None);
    }

    #[test]
    fn test_section_parsing() {
        assert_eq!("mainContainer".parse::<Section>().unwrap(), Section::MainContainer);
        assert_eq!("tasks".parse::<Section>().unwrap(), Section::TaskManager);
        assert_eq!("Completed".parse::<Section>().unwrap(), Section::Completed);
        assert!("archive".parse::<Section>().is_err());
    }

    #[test]
    fn test_weekday_parsing() {
        assert_eq!("Friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!("sun".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert_eq!(
            "someday".parse::<Weekday>().unwrap_err(),
            "Invalid day: someday"
        );
    }

    #[test]
    fn test_weekly_schedule_add_remove() {
        let mut schedule = WeeklySchedule::default();
        assert!(schedule.add(Weekday::Monday, "t-1"));
        assert!(!schedule.add(Weekday::Monday, "t-1"));
        assert!(schedule.add(Weekday::Monday, "t-2"));
        assert_eq!(schedule.tasks(Weekday::Monday), ["t-1", "t-2"]);

        assert!(schedule.remove(Weekday::Monday, "t-1"));
        assert!(!schedule.remove(Weekday::Tuesday, "t-1"));
        assert!(schedule.remove(Weekday::Monday, "t-2"));
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_weekly_schedule_serializes_by_day_name() {
        let schedule: WeeklySchedule = [(Weekday::Tuesday, vec!["t-1".to_string()])]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#"{"tuesday":["t-1"]}"#);
    }
}
