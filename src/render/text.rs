use crate::task::display::{DisplayTask, ProjectNode, Report};

const INDENT: &str = "  ";

/// Plain-text report: a `#Project` heading per section, then each task's
/// content with a `P<n> <due> @label` detail line underneath.
pub fn render(report: &Report) -> String {
    let mut out = String::new();

    match report {
        Report::Flat { tasks } => {
            for task in tasks {
                write_task(&mut out, task, "");
            }
        }
        Report::Grouped { sections } => {
            for section in sections {
                write_heading(&mut out, &section.project_name, "");
                for task in &section.tasks {
                    write_task(&mut out, task, INDENT);
                }
            }
        }
        Report::Tree { roots, unplaced } => {
            for root in roots {
                write_node(&mut out, root);
            }
            if !unplaced.is_empty() {
                write_heading(&mut out, "(no project)", "");
                for task in unplaced {
                    write_task(&mut out, task, INDENT);
                }
            }
        }
    }

    out
}

fn write_node(out: &mut String, node: &ProjectNode) {
    let indent = INDENT.repeat(node.depth);
    write_heading(out, &node.project_name, &indent);

    let task_indent = format!("{}{}", indent, INDENT);
    for task in &node.tasks {
        write_task(out, task, &task_indent);
    }
    for child in &node.children {
        write_node(out, child);
    }
}

fn write_heading(out: &mut String, name: &str, indent: &str) {
    out.push_str(&format!("{}#{}\n", indent, name));
}

fn write_task(out: &mut String, task: &DisplayTask, indent: &str) {
    out.push_str(&format!("{}{}\n", indent, task.content));
    out.push_str(&format!("{}{}\n", indent, detail_line(task)));
}

/// `P1 <tomorrow> @urgent @home`
pub fn detail_line(task: &DisplayTask) -> String {
    let mut parts = vec![match task.priority {
        Some(priority) => priority.to_string(),
        None => "P-".to_string(),
    }];
    if !task.due.is_empty() {
        parts.push(format!("<{}>", task.due));
    }
    parts.extend(task.labels.iter().map(|label| format!("@{}", label.name)));
    parts.join(" ")
}
