use super::AppContext;
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::SearchController;
use popcorn_models::UserRating;

pub async fn run_search(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    let controller = SearchController::new(ctx.source()?, ctx.config.search.min_query_len);

    let handle = controller.set_query(query);
    if handle.was_skipped() {
        output.warn(format!(
            "Type at least {} characters to search",
            controller.min_query_len()
        ));
        render::search_state(&controller.snapshot(), output);
        return Ok(());
    }

    let spinner = render::spinner(output, &format!("Searching for \"{}\"...", query.trim()));
    handle.finished().await;
    spinner.finish_and_clear();

    let state = controller.snapshot();
    render::search_state(&state, output);
    if !state.error.is_empty() {
        return Err(eyre!("{}", state.error));
    }
    Ok(())
}

pub async fn run_show(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let mut session = ctx.session()?;

    let spinner = render::spinner(output, "Loading...");
    session.toggle_movie(id).await;
    spinner.finish_and_clear();

    let state = session.detail().snapshot();
    render::detail_state(&state, session.watched().find(id), output);
    if !state.error.is_empty() {
        return Err(eyre!("{}", state.error));
    }
    Ok(())
}

pub async fn run_add(ctx: &AppContext, id: &str, rating: u8, output: &Output) -> Result<()> {
    let rating = UserRating::new(i64::from(rating)).map_err(|e| eyre!("{}", e))?;
    let mut session = ctx.session()?;

    if let Some(existing) = session.watched().find(id) {
        output.warn(format!("You have already rated this movie {} ⭐.", existing.user_rating));
        return Ok(());
    }

    let spinner = render::spinner(output, "Loading...");
    session.toggle_movie(id).await;
    spinner.finish_and_clear();

    let error = session.detail().snapshot().error;
    if !error.is_empty() {
        return Err(eyre!("{}", error));
    }

    let entry = session.add_open_movie(rating).map_err(|e| eyre!("{}", e))?;
    output.success(format!(
        "Added {} ({}) with your rating {} ⭐",
        entry.title, entry.year, entry.user_rating
    ));
    output.json(&serde_json::json!({ "added": entry }));
    Ok(())
}
