use crate::output::Output;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use popcorn_core::{DetailState, SearchState};
use popcorn_models::{MovieDetail, WatchedEntry, WatchedSummary};
use serde_json::json;
use std::time::Duration;

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(label: &str) -> Cell {
    Cell::new(label).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

/// Hidden unless a person is watching the terminal.
pub fn spinner(output: &Output, message: &str) -> ProgressBar {
    if !output.is_interactive() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn search_state(state: &SearchState, output: &Output) {
    if !output.is_human() {
        output.json(&json!(state));
        return;
    }

    if state.is_loading {
        output.info("Loading...");
        return;
    }
    if !state.error.is_empty() {
        output.error(&state.error);
        return;
    }

    output.println(format!("Found {} results", state.results.len().bold()));
    if state.results.is_empty() {
        return;
    }

    let mut results = table();
    results.set_header(vec![header("#"), header("Title"), header("Year"), header("IMDb ID")]);
    for (index, item) in state.results.iter().enumerate() {
        results.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&item.title),
            Cell::new(format!("📅 {}", item.year)),
            Cell::new(&item.id).fg(Color::DarkGrey),
        ]);
    }
    output.println(results.to_string());
}

pub fn detail_state(state: &DetailState, existing: Option<&WatchedEntry>, output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "detail": state,
            "watched": existing,
        }));
        return;
    }

    if state.is_loading {
        output.info("Loading...");
        return;
    }
    if !state.error.is_empty() {
        output.error(&state.error);
        return;
    }
    let Some(detail) = &state.detail else {
        return;
    };

    movie_detail(detail, output);
    match existing {
        Some(entry) => output.println(format!("You have already rated this movie {} ⭐.", entry.user_rating)),
        None => output.println("Rate it 1-10 to add it to your list.".bright_black().to_string()),
    }
}

fn movie_detail(detail: &MovieDetail, output: &Output) {
    let mut overview = table();
    overview.set_header(vec![header(&detail.title), Cell::new(&detail.year)]);
    overview.add_row(vec![Cell::new("Released"), Cell::new(format!("{} • {}", detail.released, detail.runtime))]);
    overview.add_row(vec![Cell::new("Genre"), Cell::new(&detail.genre)]);
    overview.add_row(vec![Cell::new("IMDb rating"), Cell::new(format!("⭐ {}", detail.imdb_rating))]);
    overview.add_row(vec![Cell::new("Starring"), Cell::new(&detail.actors)]);
    overview.add_row(vec![Cell::new("Directed by"), Cell::new(&detail.director)]);
    overview.add_row(vec![Cell::new("Poster"), Cell::new(&detail.poster_url).fg(Color::DarkGrey)]);
    output.println(overview.to_string());
    if !detail.plot.is_empty() {
        output.println(detail.plot.italic().to_string());
    }
}

pub fn watched(summary: &WatchedSummary, entries: &[WatchedEntry], output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "summary": summary,
            "watched": entries,
        }));
        return;
    }

    output.println("Movies you watched".bold().to_string());
    output.println(format!(
        "#️⃣ {} movies   ⭐️ {}   🌟 {}   ⏳ {}",
        summary.count,
        summary.imdb_rating_display(),
        summary.user_rating_display(),
        summary.runtime_display(),
    ));

    if entries.is_empty() {
        return;
    }

    let mut list = table();
    list.set_header(vec![
        header("Title"),
        header("IMDb"),
        header("You"),
        header("Runtime"),
        header("IMDb ID"),
    ]);
    for entry in entries {
        list.add_row(vec![
            Cell::new(&entry.title),
            Cell::new(entry.imdb_rating.map_or_else(|| "N/A".to_string(), |r| format!("{:.1}", r))),
            Cell::new(entry.user_rating),
            Cell::new(entry.runtime_minutes.map_or_else(|| "N/A".to_string(), |m| format!("{} min", m))),
            Cell::new(&entry.id).fg(Color::DarkGrey),
        ]);
    }
    output.println(list.to_string());
}
