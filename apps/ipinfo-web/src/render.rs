use askama::Template;
use ipinfo_shared::{Record, Section};
use serde::Serialize;

use crate::config::HtmlMode;
use crate::error::PipelineError;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    sections: &'a [Section],
}

#[derive(Template)]
#[template(path = "data_island.html")]
struct DataIslandTemplate<'a> {
    /// Already script-safe; emitted without HTML escaping.
    payload: &'a str,
}

pub fn render_html(record: &Record, mode: HtmlMode) -> Result<String, PipelineError> {
    match mode {
        HtmlMode::Report => render_report(record),
        HtmlMode::DataIsland => render_data_island(record),
    }
}

pub fn render_report(record: &Record) -> Result<String, PipelineError> {
    let sections = record.sections();
    Ok(ReportTemplate {
        sections: &sections,
    }
    .render()?)
}

pub fn render_data_island(record: &Record) -> Result<String, PipelineError> {
    let payload = script_safe_json(record).map_err(PipelineError::Encode)?;
    Ok(DataIslandTemplate { payload: &payload }.render()?)
}

/// Serializes `value` so it can sit inside a `<script>` element: no `</script>`,
/// `<!--` or line separators survive, and the text is still valid JSON.
pub fn script_safe_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let raw = serde_json::to_string(value)?;
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}
