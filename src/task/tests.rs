#[cfg(test)]
mod tests {
    use crate::api::snapshot::{Snapshot, SnapshotSource};
    use crate::api::types::*;
    use crate::task::*;
    use std::collections::BTreeSet;

    // Helper functions to build catalog entries for testing
    fn project(id: &str, name: &str, order: i64) -> Project {
        Project {
            id: Id::from(id),
            name: name.to_string(),
            order,
            ..Default::default()
        }
    }

    fn child_project(id: &str, name: &str, order: i64, parent: &str) -> Project {
        Project {
            parent_id: Some(Id::from(parent)),
            ..project(id, name, order)
        }
    }

    fn label(id: &str, name: &str, order: i64) -> Label {
        Label {
            id: Id::from(id),
            name: name.to_string(),
            order,
            ..Default::default()
        }
    }

    fn task(id: &str, project_id: &str, priority: u8, order: i64) -> Task {
        Task {
            id: Id::from(id),
            project_id: Id::from(project_id),
            content: format!("Task {}", id),
            priority,
            order,
            ..Default::default()
        }
    }

    fn due_on(mut task: Task, date: &str) -> Task {
        task.due = Some(Due {
            date: Some(date.to_string()),
            string: Some(date.to_string()),
            ..Default::default()
        });
        task
    }

    fn labelled(mut task: Task, label_ids: &[&str]) -> Task {
        task.label_ids = label_ids.iter().map(|id| Id::from(*id)).collect();
        task
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    fn scenario_board() -> TaskBoard {
        TaskBoard::new(
            vec![project("1", "Work", 0), project("2", "Home", 1)],
            vec![label("10", "urgent", 0)],
            vec![
                task("100", "1", 4, 0),
                labelled(due_on(task("101", "2", 1, 0), "2024-06-01"), &["10"]),
            ],
        )
    }

    fn flat_ids(report: &Report) -> Vec<String> {
        match report {
            Report::Flat { tasks } => tasks.iter().map(|t| t.id.to_string()).collect(),
            Report::Grouped { sections } => sections
                .iter()
                .flat_map(|s| s.tasks.iter().map(|t| t.id.to_string()))
                .collect(),
            Report::Tree { roots, unplaced } => {
                fn walk(node: &ProjectNode, out: &mut Vec<String>) {
                    out.extend(node.tasks.iter().map(|t| t.id.to_string()));
                    for child in &node.children {
                        walk(child, out);
                    }
                }
                let mut out = Vec::new();
                for root in roots {
                    walk(root, &mut out);
                }
                out.extend(unplaced.iter().map(|t| t.id.to_string()));
                out
            }
        }
    }

    #[test]
    fn test_catalog_duplicates_last_write_wins() {
        let catalog = ProjectCatalog::build(vec![
            project("1", "First", 0),
            project("2", "Other", 1),
            project("1", "Replaced", 5),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&Id::from("1")).unwrap().name, "Replaced");
        assert_eq!(catalog.order_of(&Id::from("1")), Some(5));
        // first-seen position is kept
        assert_eq!(catalog.ids(), &[Id::from("1"), Id::from("2")]);
    }

    #[test]
    fn test_catalog_empty() {
        let catalog = LabelCatalog::build(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.find_by_name("anything").is_none());
    }

    #[test]
    fn test_catalog_find_by_name_is_exact_and_prefers_last() {
        let catalog = LabelCatalog::build(vec![
            label("1", "errand", 0),
            label("2", "Errand", 1),
            label("3", "errand", 2),
        ]);

        assert_eq!(catalog.find_by_name("errand").unwrap().id, Id::from("3"));
        assert_eq!(catalog.find_by_name("Errand").unwrap().id, Id::from("2"));
        assert!(catalog.find_by_name("ERRAND").is_none());
    }

    #[test]
    fn test_catalog_sorted_by_order_is_stable() {
        let catalog = LabelCatalog::build(vec![
            label("a", "a", 2),
            label("b", "b", 1),
            label("c", "c", 2),
            label("d", "d", 0),
        ]);
        let names: Vec<&str> = catalog
            .sorted_by_order()
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_hierarchy_every_project_in_exactly_one_list() {
        let catalog = ProjectCatalog::build(vec![
            project("1", "Work", 0),
            child_project("2", "Reports", 1, "1"),
            child_project("3", "Meetings", 0, "1"),
            project("4", "Home", 1),
            child_project("5", "Garden", 0, "4"),
            child_project("6", "Lost", 0, "999"),
        ]);
        let hierarchy = ProjectHierarchy::resolve(&catalog);

        let total: usize = hierarchy.child_lists().map(|(_, c)| c.len()).sum();
        assert_eq!(total, catalog.len());

        for project in catalog.iter() {
            let hits = hierarchy
                .child_lists()
                .filter(|(_, children)| children.contains(&project.id))
                .count();
            assert_eq!(hits, 1, "project {} listed {} times", project.id, hits);
        }

        // input order, not sorted by `order`
        assert_eq!(hierarchy.children(&Id::from("1")), &[Id::from("2"), Id::from("3")]);
        assert_eq!(hierarchy.roots(), &[Id::from("1"), Id::from("4")]);
        assert_eq!(hierarchy.parent_of(&Id::from("5")), Some(&Id::from("4")));
    }

    #[test]
    fn test_hierarchy_records_dangling_parents() {
        let catalog = ProjectCatalog::build(vec![
            project("1", "Work", 0),
            child_project("2", "Orphan", 0, "404"),
        ]);
        let hierarchy = ProjectHierarchy::resolve(&catalog);

        assert_eq!(hierarchy.children(&Id::from("404")), &[Id::from("2")]);
        assert_eq!(hierarchy.unresolved_parents(&catalog), vec![&Id::from("404")]);
        assert!(hierarchy.find_cycle().is_none());
    }

    #[test]
    fn test_hierarchy_empty_catalog() {
        let hierarchy = ProjectHierarchy::resolve(&ProjectCatalog::default());
        assert!(hierarchy.is_empty());
        assert!(hierarchy.roots().is_empty());
        assert!(hierarchy.find_cycle().is_none());
    }

    #[test]
    fn test_hierarchy_detects_cycles() {
        let catalog = ProjectCatalog::build(vec![
            project("1", "Root", 0),
            child_project("2", "A", 0, "3"),
            child_project("3", "B", 0, "2"),
        ]);
        let hierarchy = ProjectHierarchy::resolve(&catalog);
        let cycle = hierarchy.find_cycle().expect("cycle should be found");
        assert!(cycle == Id::from("2") || cycle == Id::from("3"));

        let self_parent = ProjectCatalog::build(vec![child_project("7", "Loop", 0, "7")]);
        assert_eq!(
            ProjectHierarchy::resolve(&self_parent).find_cycle(),
            Some(Id::from("7"))
        );
    }

    #[test]
    fn test_filter_disabled_returns_input_unchanged() {
        let tasks = vec![
            task("3", "1", 1, 2),
            task("1", "2", 4, 0),
            task("2", "1", 2, 1),
        ];
        let filter = TaskFilter::new();
        assert!(filter.is_disabled());
        assert_eq!(ids(&filter.apply(&tasks)), vec!["3", "1", "2"]);

        // empty ids disable a criterion as well
        let filter = TaskFilter::new().label(Id::root()).project("");
        assert!(filter.is_disabled());
        assert_eq!(filter.apply(&tasks).len(), 3);
    }

    #[test]
    fn test_filter_criteria_compose_by_and() {
        let tasks = vec![
            labelled(task("a", "1", 4, 0), &["10"]),
            labelled(task("b", "1", 1, 0), &["10"]),
            labelled(task("c", "2", 4, 0), &["10"]),
            task("d", "1", 4, 0),
        ];

        let filter = TaskFilter::new()
            .label("10")
            .project("1")
            .priorities([DisplayPriority::P1]);

        for t in &tasks {
            let expected = t.has_label(&Id::from("10"))
                && t.project_id == Id::from("1")
                && t.display_priority() == Some(DisplayPriority::P1);
            assert_eq!(filter.matches(t), expected, "task {}", t.id);
        }
        assert_eq!(ids(&filter.apply(&tasks)), vec!["a"]);
    }

    #[test]
    fn test_filter_priorities_use_display_values() {
        let tasks = vec![task("urgent", "1", 4, 0), task("normal", "1", 1, 0), task("odd", "1", 0, 0)];

        let filter = TaskFilter::new().priorities([DisplayPriority::P4]);
        assert_eq!(ids(&filter.apply(&tasks)), vec!["normal"]);

        let filter = TaskFilter::new().priorities(DisplayPriority::ALL);
        assert_eq!(ids(&filter.apply(&tasks)), vec!["urgent", "normal"]);
    }

    #[test]
    fn test_filter_criteria_resolution() {
        let projects = ProjectCatalog::build(vec![project("1", "Work", 0)]);
        let labels = LabelCatalog::build(vec![label("10", "urgent", 0)]);

        let resolved = FilterCriteria::default()
            .with_label("urgent")
            .with_project("Work")
            .resolve(&projects, &labels)
            .unwrap();
        assert_eq!(resolved.label_id, Some(Id::from("10")));
        assert_eq!(resolved.project_id, Some(Id::from("1")));

        let err = FilterCriteria::default()
            .with_label("nope")
            .resolve(&projects, &labels)
            .unwrap_err();
        assert_eq!(err, ResolutionError::UnknownLabel("nope".to_string()));
        assert_eq!(err.to_string(), "Label \"nope\" not found");

        let err = FilterCriteria::default()
            .with_project("Play")
            .resolve(&projects, &labels)
            .unwrap_err();
        assert_eq!(err, ResolutionError::UnknownProject("Play".to_string()));

        let resolved = FilterCriteria::default()
            .with_label("")
            .resolve(&projects, &labels)
            .unwrap();
        assert!(resolved.is_disabled());
    }

    #[test]
    fn test_sort_key_precedence() {
        let projects = ProjectCatalog::build(vec![project("w", "Work", 0), project("h", "Home", 1)]);
        let tasks = vec![
            task("home-urgent", "h", 4, 0),
            due_on(task("work-late", "w", 2, 0), "2024-09-01"),
            due_on(task("work-early", "w", 2, 5), "2024-01-01"),
            task("work-undated", "w", 2, 0),
            task("work-urgent", "w", 4, 9),
        ];
        let mut refs: Vec<&Task> = tasks.iter().collect();

        TaskOrdering::new(&projects, SortMode::ByProject).sort(&mut refs);
        assert_eq!(
            ids(&refs),
            vec!["work-urgent", "work-early", "work-late", "work-undated", "home-urgent"]
        );

        TaskOrdering::new(&projects, SortMode::Ungrouped).sort(&mut refs);
        assert_eq!(
            ids(&refs),
            vec!["home-urgent", "work-urgent", "work-early", "work-late", "work-undated"]
        );
    }

    #[test]
    fn test_sort_missing_due_date_last() {
        let projects = ProjectCatalog::build(vec![project("1", "Work", 0)]);
        let mut tasks = vec![
            task("none", "1", 3, 0),
            due_on(task("far", "1", 3, 1), "2999-12-31"),
            due_on(task("soon", "1", 3, 2), "2024-01-01"),
        ];
        TaskOrdering::new(&projects, SortMode::ByProject).sort(&mut tasks);
        let order: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["soon", "far", "none"]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let projects = ProjectCatalog::build(vec![project("1", "Work", 0)]);
        let tasks = vec![
            task("first", "1", 2, 0),
            task("second", "1", 2, 0),
            task("third", "1", 3, 0),
            task("fourth", "1", 2, 0),
        ];
        let ordering = TaskOrdering::new(&projects, SortMode::ByProject);

        let mut once: Vec<&Task> = tasks.iter().collect();
        ordering.sort(&mut once);
        assert_eq!(ids(&once), vec!["third", "first", "second", "fourth"]);

        let mut twice = once.clone();
        ordering.sort(&mut twice);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_sort_unknown_projects_after_known() {
        let projects = ProjectCatalog::build(vec![project("1", "Work", 10)]);
        let mut tasks = vec![task("stray", "gone", 4, 0), task("known", "1", 1, 0)];
        TaskOrdering::new(&projects, SortMode::ByProject).sort(&mut tasks);
        assert_eq!(tasks[0].id, Id::from("known"));
    }

    #[test]
    fn test_display_task_resolves_names_and_colors() {
        let projects = ProjectCatalog::build(vec![Project {
            color: ColorKey::from("berry_red"),
            ..project("1", "Work", 0)
        }]);
        let labels = LabelCatalog::build(vec![
            Label {
                color: ColorKey::Legacy(47),
                ..label("20", "later", 3)
            },
            Label {
                color: ColorKey::from("red"),
                ..label("10", "urgent", 0)
            },
        ]);
        let palette = Palette::standard();
        let projection = DisplayProjection::new(&projects, &labels, &palette);

        let t = labelled(due_on(task("100", "1", 4, 0), "2024-06-01"), &["20", "10", "99"]);
        let display = projection.task(&t);

        assert_eq!(display.project_name, "Work");
        assert_eq!(display.project_color, "#b8256f");
        let names: Vec<&str> = display.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["urgent", "later"]);
        assert_eq!(display.labels[0].color, "#db4035");
        assert_eq!(display.labels[1].color, "#808080");
        assert_eq!(display.priority, Some(DisplayPriority::P1));
        assert_eq!(display.priority_color, "#d1453b");
        assert_eq!(display.due, "2024-06-01");
        assert_eq!(display.due_date.as_deref(), Some("2024-06-01"));

        let undated = projection.task(&task("101", "missing", 1, 0));
        assert_eq!(undated.due, "");
        assert_eq!(undated.due_date, None);
        assert_eq!(undated.project_name, "");
        assert_eq!(undated.project_color, palette.fallback());
    }

    #[test]
    fn test_grouped_sections_in_first_encounter_order() {
        let board = TaskBoard::new(
            vec![project("1", "Work", 0), project("2", "Home", 1)],
            vec![],
            vec![
                task("h1", "2", 4, 0),
                task("w1", "1", 1, 0),
                task("h2", "2", 1, 1),
                task("w2", "1", 4, 1),
            ],
        );
        let report = board
            .build_report(&FilterCriteria::default(), ReportShape::Grouped, &Palette::standard())
            .unwrap();

        let Report::Grouped { sections } = &report else {
            panic!("expected grouped report, got {:?}", report.shape());
        };
        let names: Vec<&str> = sections.iter().map(|s| s.project_name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Home"]);
        assert_eq!(flat_ids(&report), vec!["w2", "w1", "h1", "h2"]);
        assert_eq!(report.task_count(), 4);
    }

    #[test]
    fn test_grouped_interleaved_projects_get_a_section_per_run() {
        // order is per parent, so sibling projects under different parents
        // can share it and their tasks interleave after sorting
        let board = TaskBoard::new(
            vec![
                project("1", "Work", 0),
                project("2", "Home", 1),
                child_project("3", "Ops", 0, "1"),
                child_project("4", "Garden", 0, "2"),
            ],
            vec![],
            vec![
                task("a_low", "3", 1, 0),
                task("b_mid", "4", 3, 0),
                task("a_urgent", "3", 4, 0),
            ],
        );
        let report = board
            .build_report(&FilterCriteria::default(), ReportShape::Grouped, &Palette::standard())
            .unwrap();

        let Report::Grouped { sections } = &report else {
            panic!("expected grouped report, got {:?}", report.shape());
        };
        let runs: Vec<(&str, Vec<String>)> = sections
            .iter()
            .map(|s| {
                (
                    s.project_name.as_str(),
                    s.tasks.iter().map(|t| t.id.to_string()).collect(),
                )
            })
            .collect();
        assert_eq!(
            runs,
            vec![
                ("Ops", vec!["a_urgent".to_string()]),
                ("Garden", vec!["b_mid".to_string()]),
                ("Ops", vec!["a_low".to_string()]),
            ]
        );
        assert_eq!(flat_ids(&report), vec!["a_urgent", "b_mid", "a_low"]);
    }

    #[test]
    fn test_tree_prunes_empty_projects_and_orders_siblings() {
        let board = TaskBoard::new(
            vec![
                project("1", "Work", 0),
                child_project("11", "Reports", 2, "1"),
                child_project("12", "Meetings", 1, "1"),
                child_project("121", "Standup", 0, "12"),
                project("2", "Empty", 1),
                child_project("21", "Also empty", 0, "2"),
                project("3", "Home", 2),
            ],
            vec![],
            vec![
                task("r", "11", 1, 0),
                task("s", "121", 1, 0),
                task("h", "3", 1, 0),
            ],
        );
        let report = board
            .build_report(&FilterCriteria::default(), ReportShape::Tree, &Palette::standard())
            .unwrap();

        let Report::Tree { roots, unplaced } = &report else {
            panic!("expected tree report");
        };
        assert!(unplaced.is_empty());

        let root_names: Vec<&str> = roots.iter().map(|n| n.project_name.as_str()).collect();
        assert_eq!(root_names, vec!["Work", "Home"]);

        let work = &roots[0];
        assert!(work.tasks.is_empty());
        let child_names: Vec<&str> = work.children.iter().map(|n| n.project_name.as_str()).collect();
        assert_eq!(child_names, vec!["Meetings", "Reports"]);
        assert_eq!(work.children[0].children[0].project_name, "Standup");
        assert_eq!(work.children[0].children[0].depth, 2);
        assert_eq!(flat_ids(&report), vec!["s", "r", "h"]);
    }

    #[test]
    fn test_tree_keeps_orphans_and_unplaced_tasks() {
        let board = TaskBoard::new(
            vec![project("1", "Work", 0), child_project("2", "Orphan", 0, "404")],
            vec![],
            vec![
                task("w", "1", 1, 0),
                task("o", "2", 1, 0),
                task("x", "nowhere", 1, 0),
            ],
        );
        let report = board
            .build_report(&FilterCriteria::default(), ReportShape::Tree, &Palette::standard())
            .unwrap();

        let Report::Tree { roots, unplaced } = &report else {
            panic!("expected tree report");
        };
        let root_names: Vec<&str> = roots.iter().map(|n| n.project_name.as_str()).collect();
        assert_eq!(root_names, vec!["Work", "Orphan"]);
        assert_eq!(unplaced.len(), 1);
        assert_eq!(unplaced[0].id, Id::from("x"));
        assert_eq!(report.task_count(), 3);
    }

    #[test]
    fn test_tree_cycle_is_an_error() {
        let board = TaskBoard::new(
            vec![
                project("1", "Root", 0),
                child_project("2", "A", 0, "3"),
                child_project("3", "B", 0, "2"),
            ],
            vec![],
            vec![task("t", "2", 1, 0)],
        );
        let err = board
            .build_report(&FilterCriteria::default(), ReportShape::Tree, &Palette::standard())
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Projection(ProjectionError::Cycle { .. })
        ));
        assert!(!err.is_user_error());

        // flat and grouped shapes never walk the hierarchy
        assert!(board
            .build_report(&FilterCriteria::default(), ReportShape::Grouped, &Palette::standard())
            .is_ok());
    }

    #[test]
    fn test_scenario_project_grouping_order() {
        let board = scenario_board();
        let report = board
            .build_report(&FilterCriteria::default(), ReportShape::Grouped, &Palette::standard())
            .unwrap();
        assert_eq!(flat_ids(&report), vec!["100", "101"]);
    }

    #[test]
    fn test_scenario_label_filter() {
        let board = scenario_board();
        let criteria = FilterCriteria::default().with_label("urgent");
        let report = board
            .build_report(&criteria, ReportShape::Flat, &Palette::standard())
            .unwrap();
        assert_eq!(flat_ids(&report), vec!["101"]);
    }

    #[test]
    fn test_scenario_unknown_label_is_resolution_error() {
        let board = scenario_board();
        let criteria = FilterCriteria::default().with_label("nope");
        let err = board
            .build_report(&criteria, ReportShape::Flat, &Palette::standard())
            .unwrap_err();
        assert!(err.is_user_error());
        assert!(matches!(
            err,
            ReportError::Resolution(ResolutionError::UnknownLabel(ref name)) if name == "nope"
        ));
    }

    #[test]
    fn test_priority_filter_in_report() {
        let board = scenario_board();
        let criteria = FilterCriteria {
            priorities: BTreeSet::from([DisplayPriority::P4]),
            ..Default::default()
        };
        let report = board
            .build_report(&criteria, ReportShape::Flat, &Palette::standard())
            .unwrap();
        assert_eq!(flat_ids(&report), vec!["101"]);
    }

    #[tokio::test]
    async fn test_run_report_from_snapshot_source() {
        let board = scenario_board();
        let source = SnapshotSource::new(Snapshot {
            projects: board.projects().iter().cloned().collect(),
            labels: board.labels().iter().cloned().collect(),
            tasks: board.tasks().to_vec(),
        });

        let report = run_report(
            &source,
            &TaskQuery::default(),
            &FilterCriteria::default(),
            ReportShape::Tree,
            &Palette::standard(),
        )
        .await
        .unwrap();
        assert_eq!(flat_ids(&report), vec!["100", "101"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_pipeline() {
        let source = SnapshotSource::new(Snapshot::default());
        let query = TaskQuery {
            filter: Some("today".to_string()),
            ..Default::default()
        };

        let err = run_report(
            &source,
            &query,
            &FilterCriteria::default(),
            ReportShape::Flat,
            &Palette::standard(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReportError::Fetch(ApiError::Unsupported(_))));
    }
}
