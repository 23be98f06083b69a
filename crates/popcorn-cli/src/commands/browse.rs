use super::AppContext;
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_core::{Session, ESCAPE};
use popcorn_models::UserRating;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Type to search (at least 3 characters). Commands:
  :open N      open result N (again to close)
  :rate N      rate the open movie 1-10 and add it to your list (alias :add)
  esc          close the open movie
  :watched     show your watched list
  :delete ID   remove a movie from your watched list
  :help        show this help
  :quit        leave";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Query(&'a str),
    Open(usize),
    Rate(&'a str),
    Key(&'a str),
    Watched,
    Delete(&'a str),
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("esc") || trimmed.eq_ignore_ascii_case(ESCAPE) {
        return Input::Key(ESCAPE);
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Query(line);
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command, ""));

    match name {
        "open" | "o" => arg.parse().map(Input::Open).unwrap_or(Input::Unknown(trimmed)),
        "rate" | "add" | "r" => Input::Rate(arg),
        "watched" | "w" => Input::Watched,
        "delete" | "d" if !arg.is_empty() => Input::Delete(arg),
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(trimmed),
    }
}

fn parse_rating(arg: &str) -> Result<UserRating, String> {
    let value: i64 = arg.trim().parse::<i64>().map_err(|e| e.to_string())?;
    UserRating::new(value).map_err(|e| e.to_string())
}

pub async fn run_browse(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut session = ctx.session()?;
    let mut updates = session.search().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    output.println(format!("🍿 {}", session.title_line().bold()));
    output.println(HELP.bright_black().to_string());
    prompt(&session, output)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(&mut session, &line, output).await? {
                    break;
                }
                prompt(&session, output)?;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                // Loading is announced when the query is typed.
                if !state.is_loading {
                    output.println("");
                    render::search_state(&state, output);
                    prompt(&session, output)?;
                }
            }
        }
    }

    session.search().cancel();
    Ok(())
}

fn prompt(session: &Session, output: &Output) -> Result<()> {
    output
        .prompt(format!("{} › ", session.title_line().cyan()))
        .map_err(|e| eyre!("Failed to write prompt: {}", e))
}

/// Returns `false` when the session should end.
async fn handle_line(session: &mut Session, line: &str, output: &Output) -> Result<bool> {
    match parse_input(line) {
        Input::Query(query) => {
            debug!(query, "Query changed");
            // Runs in the background; the outcome arrives through the search subscription.
            if !session.set_query(query).was_skipped() {
                output.info("Loading...");
            }
        }
        Input::Open(index) => {
            let results = session.search().snapshot().results;
            let Some(item) = index.checked_sub(1).and_then(|i| results.get(i)) else {
                output.warn(format!("No result #{} (have {})", index, results.len()));
                return Ok(true);
            };
            let id = item.id.clone();
            if session.toggle_movie(&id).await {
                let state = session.detail().snapshot();
                render::detail_state(&state, session.watched().find(&id), output);
            } else {
                render::watched(&session.watched().summary(), session.watched().watched(), output);
            }
        }
        Input::Rate(arg) => {
            let rating = match parse_rating(arg) {
                Ok(rating) => rating,
                Err(e) => {
                    output.error(format!("Give a rating from 1 to 10 ({})", e));
                    return Ok(true);
                }
            };
            match session.add_open_movie(rating) {
                Ok(entry) => {
                    output.success(format!(
                        "Added {} with your rating {} ⭐",
                        entry.title, entry.user_rating
                    ));
                    render::watched(&session.watched().summary(), session.watched().watched(), output);
                }
                Err(e) => output.error(e.to_string()),
            }
        }
        Input::Key(key) => {
            if session.press_key(key) > 0 {
                render::watched(&session.watched().summary(), session.watched().watched(), output);
            }
        }
        Input::Watched => {
            render::watched(&session.watched().summary(), session.watched().watched(), output);
        }
        Input::Delete(id) => match session.remove_watched(id) {
            Ok(0) => output.warn(format!("{} is not on your watched list", id)),
            Ok(_) => output.success(format!("Removed {}", id)),
            Err(e) => output.error(e.to_string()),
        },
        Input::Help => output.println(HELP),
        Input::Quit => return Ok(false),
        Input::Unknown(text) => output.warn(format!("Unknown command: {} (try :help)", text)),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("inception"), Input::Query("inception"));
        assert_eq!(parse_input("  in "), Input::Query("  in "));
        assert_eq!(parse_input(":open 2"), Input::Open(2));
        assert_eq!(parse_input(":open two"), Input::Unknown(":open two"));
        assert_eq!(parse_input(":rate 8"), Input::Rate("8"));
        assert_eq!(parse_input(":add 10"), Input::Rate("10"));
        assert_eq!(parse_input("ESC"), Input::Key(ESCAPE));
        assert_eq!(parse_input("escape"), Input::Key(ESCAPE));
        assert_eq!(parse_input(":delete tt1375666"), Input::Delete("tt1375666"));
        assert_eq!(parse_input(":delete"), Input::Unknown(":delete"));
        assert_eq!(parse_input(":q"), Input::Quit);
        assert_eq!(parse_input(":watched"), Input::Watched);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("8").unwrap().value(), 8);
        assert_eq!(parse_rating(" 10 ").unwrap().value(), 10);
        assert!(parse_rating("11").is_err());
        assert!(parse_rating("0").is_err());
        assert!(parse_rating("great").is_err());
    }
}
