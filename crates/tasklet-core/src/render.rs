use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Local};
use tasklet_shared::TaskDto;
use tasklet_shared::stats::TaskStats;
use tasklet_shared::view::TaskListState;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

const STATS_BAR_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let wanted = cfg.get_bool("color")?.unwrap_or(true);
        Ok(Self {
            color: wanted && io::stdout().is_terminal(),
        })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn print_task_list(&self, state: &TaskListState) -> anyhow::Result<()> {
        self.write_task_list(io::stdout().lock(), state)
    }

    /// Rows are numbered from 1 in visible order; `browse` addresses them
    /// by that number.
    pub fn write_task_list<W: Write>(&self, mut out: W, state: &TaskListState) -> anyhow::Result<()> {
        if let Some(error) = state.error() {
            writeln!(out, "{}", self.paint(&format!("error: {error}"), "31"))?;
        }

        let visible = state.visible();
        if visible.is_empty() {
            if state.is_loading() {
                writeln!(out, "Loading tasks...")?;
            } else {
                writeln!(out, "No tasks found.")?;
            }
        } else {
            let headers = vec![
                "#".to_string(),
                "Done".to_string(),
                "Name".to_string(),
                "Description".to_string(),
                "ID".to_string(),
            ];
            let rows = visible
                .iter()
                .enumerate()
                .map(|(idx, task)| {
                    let mark = if task.status {
                        self.paint("[x]", "32")
                    } else {
                        "[ ]".to_string()
                    };
                    vec![
                        self.paint(&(idx + 1).to_string(), "33"),
                        mark,
                        task.name.clone(),
                        task.description.clone(),
                        self.paint(&task.id, "2"),
                    ]
                })
                .collect();
            write_table(&mut out, headers, rows)?;
        }

        writeln!(out)?;
        writeln!(out, "{}", page_footer(state))?;
        Ok(())
    }

    pub fn print_task_info(&self, task: &TaskDto) -> anyhow::Result<()> {
        self.write_task_info(io::stdout().lock(), task)
    }

    pub fn write_task_info<W: Write>(&self, mut out: W, task: &TaskDto) -> anyhow::Result<()> {
        let status = if task.status {
            self.paint(task.status_label(), "32")
        } else {
            self.paint(task.status_label(), "33")
        };

        writeln!(out, "id          {}", task.id)?;
        writeln!(out, "name        {}", task.name)?;
        writeln!(out, "description {}", task.description)?;
        writeln!(out, "status      {status}")?;
        if let Some(created) = &task.created_at {
            writeln!(out, "created     {}", format_timestamp(created))?;
        }
        if let Some(updated) = &task.updated_at {
            writeln!(out, "updated     {}", format_timestamp(updated))?;
        }
        Ok(())
    }

    pub fn print_stats(&self, stats: &TaskStats) -> anyhow::Result<()> {
        self.write_stats(io::stdout().lock(), stats)
    }

    pub fn write_stats<W: Write>(&self, mut out: W, stats: &TaskStats) -> anyhow::Result<()> {
        writeln!(out, "Total Tasks: {}", stats.total)?;
        writeln!(out, "Completed:   {}", stats.completed_label())?;
        writeln!(out, "Active:      {}", stats.active_label())?;

        let filled =
            ((stats.completed_percent / 100.0) * STATS_BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(STATS_BAR_WIDTH);
        writeln!(
            out,
            "[{}{}]",
            self.paint(&"#".repeat(filled), "32"),
            self.paint(&"-".repeat(STATS_BAR_WIDTH - filled), "34")
        )?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

pub fn page_footer(state: &TaskListState) -> String {
    let mut parts = vec![
        format!("page {}", state.page()),
        format!("filter {}", state.filter().label()),
        format!(
            "showing {} of {}",
            state.visible().len(),
            state.tasks().len()
        ),
    ];
    if !state.search().is_empty() {
        parts.push(format!("search \"{}\"", state.search()));
    }
    if state.has_prev() {
        parts.push("prev".to_string());
    }
    if state.has_more() {
        parts.push("next".to_string());
    }
    parts.join(" | ")
}

/// Gateway timestamps in local time; anything unparsable is shown as is.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| {
            ts.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| UnicodeWidthStr::width(header.as_str()))
        .collect();

    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, &width) in headers.iter().zip(&widths) {
        write!(writer, "{header:width$} ")?;
    }
    writeln!(writer)?;

    for &width in &widths {
        write!(writer, "{:-<width$} ", "")?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, &width) in row.iter().zip(&widths).take(column_count) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
