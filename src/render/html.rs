use crate::task::display::{DisplayTask, ProjectNode, Report};

const HEADER: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Tasks</title>\n</head>\n<body>\n";
const FOOTER: &str = "</body>\n</html>\n";

pub fn render(report: &Report) -> String {
    let mut out = String::from(HEADER);

    match report {
        Report::Flat { tasks } => write_list(&mut out, tasks),
        Report::Grouped { sections } => {
            for section in sections {
                write_heading(&mut out, 1, &section.project_name, &section.project_color);
                write_list(&mut out, &section.tasks);
            }
        }
        Report::Tree { roots, unplaced } => {
            for root in roots {
                write_node(&mut out, root);
            }
            if !unplaced.is_empty() {
                write_heading(&mut out, 1, "(no project)", "");
                write_list(&mut out, unplaced);
            }
        }
    }

    out.push_str(FOOTER);
    out
}

fn write_node(out: &mut String, node: &ProjectNode) {
    // h1..h6
    let level = (node.depth + 1).min(6);
    write_heading(out, level, &node.project_name, &node.project_color);
    write_list(out, &node.tasks);
    for child in &node.children {
        write_node(out, child);
    }
}

fn write_heading(out: &mut String, level: usize, name: &str, color: &str) {
    if color.is_empty() {
        out.push_str(&format!("<h{level}>{}</h{level}>\n", escape(name)));
    } else {
        out.push_str(&format!(
            "<h{level} style=\"color: {}\">{}</h{level}>\n",
            escape(color),
            escape(name)
        ));
    }
}

fn write_list(out: &mut String, tasks: &[DisplayTask]) {
    if tasks.is_empty() {
        return;
    }
    out.push_str("<ul>\n");
    for task in tasks {
        out.push_str(&format!("<li>{}</li>\n", task_item(task)));
    }
    out.push_str("</ul>\n");
}

fn task_item(task: &DisplayTask) -> String {
    let priority = match task.priority {
        Some(priority) => priority.value().to_string(),
        None => "-".to_string(),
    };

    let mut details = vec![colored(&task.priority_color, &format!("Priority {}", priority))];
    if !task.due.is_empty() {
        details.push(format!("Due {}", escape(&task.due)));
    }
    for label in &task.labels {
        details.push(colored(&label.color, &format!("@{}", label.name)));
    }

    format!("{} <em>({})</em>", escape(&task.content), details.join(", "))
}

fn colored(color: &str, text: &str) -> String {
    if color.is_empty() {
        escape(text)
    } else {
        format!(
            "<span style=\"color: {}\">{}</span>",
            escape(color),
            escape(text)
        )
    }
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
