use crate::db::log::load_log;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;
use std::sync::OnceLock;

const OP_WIDTH_LIMIT: usize = 60;

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    match RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// ANSI colour per logged operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Red,
        "break_start" | "break_end" => Colour::Yellow,
        "lead_claim" => Colour::Cyan,
        "report_submit" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" | "settings" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Render the internal log table, one line per entry.
    pub fn render(conn: &Connection) -> AppResult<Vec<String>> {
        let entries = load_log(conn)?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let op_w = entries
            .iter()
            .map(|(_, _, op, target, _)| op_target(op, target).len())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_LIMIT);
        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, ..)| date.len())
            .max()
            .unwrap_or(10);

        let mut out = Vec::with_capacity(entries.len());
        for (id, date, op, target, message) in entries {
            let color = color_for_operation(&op);

            let mut visible = op_target(&op, &target);
            if visible.len() > OP_WIDTH_LIMIT {
                visible = visible.chars().take(OP_WIDTH_LIMIT - 3).collect::<String>() + "...";
            }

            // only the operation word is coloured
            let colored = match visible.split_once(' ') {
                Some((word, rest)) => format!("{} {}", color.paint(word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).len()));

            out.push(format!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            ));
        }
        Ok(out)
    }
}

fn op_target(op: &str, target: &str) -> String {
    if target.is_empty() {
        op.to_string()
    } else {
        format!("{op} ({target})")
    }
}
