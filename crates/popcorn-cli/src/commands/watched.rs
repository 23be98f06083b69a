use super::prompts;
use super::AppContext;
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub async fn run_watched(ctx: &AppContext, output: &Output) -> Result<()> {
    let watched = ctx.open_watched()?;
    render::watched(&watched.summary(), watched.watched(), output);
    Ok(())
}

pub async fn run_remove(ctx: &AppContext, id: &str, yes: bool, output: &Output) -> Result<()> {
    let mut watched = ctx.open_watched()?;

    let Some(entry) = watched.find(id) else {
        output.warn(format!("{} is not on your watched list", id));
        return Ok(());
    };

    if !yes && output.is_interactive() {
        let confirmed = prompts::prompt_yes_no(&format!("Remove \"{}\" from your watched list?", entry.title), true)?;
        if !confirmed {
            output.info("Nothing removed");
            return Ok(());
        }
    }

    let removed = watched.remove(id).map_err(|e| eyre!("{}", e))?;
    output.success(format!("Removed {} entr{} for {}", removed, if removed == 1 { "y" } else { "ies" }, id));
    Ok(())
}
