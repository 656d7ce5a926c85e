use anyhow::{Result, bail};
use pinsync_application::SyncUseCase;
use pinsync_core::bookmark::Post;

use crate::Commands;

pub async fn execute(usecase: &SyncUseCase, command: Commands) -> Result<()> {
    match command {
        Commands::Login { token } => login(usecase, &token).await,
        Commands::Logout => {
            usecase.logout().await?;
            println!("Logged out");
            Ok(())
        }
        Commands::Status { url } => status(usecase, url).await,
        Commands::Suggest => suggest(usecase).await,
        Commands::Save { tags } => save(usecase, tags).await,
        Commands::SaveAll => save_all(usecase).await,
    }
}

async fn login(usecase: &SyncUseCase, token: &str) -> Result<()> {
    if !usecase.login(token).await? {
        bail!("Pinboard rejected the token");
    }
    let user = token.split_once(':').map_or(token, |(user, _)| user);
    println!("Logged in as {}", user);
    Ok(())
}

/// Restores the stored session and fails unless it is authenticated.
async fn restore(usecase: &SyncUseCase) -> Result<()> {
    usecase.bootstrap().await?;
    if !usecase.store().state().is_authenticated() {
        bail!("not logged in; run `pinsync login <token>` first");
    }
    Ok(())
}

async fn status(usecase: &SyncUseCase, url: Option<String>) -> Result<()> {
    restore(usecase).await?;

    if let Some(url) = url {
        let saved = usecase.fetch_url_saved_status(&url).await?;
        print_status(&url, saved.as_ref(), false);
        return Ok(());
    }

    let tabs = usecase.store().state().tabs.clone().unwrap_or_default();
    for tab in &tabs {
        let saved = usecase.fetch_url_saved_status(&tab.url).await?;
        print_status(&tab.url, saved.as_ref(), tab.active);
    }
    Ok(())
}

fn print_status(url: &str, saved: Option<&Post>, active: bool) {
    let marker = if active { "*" } else { " " };
    match saved {
        Some(post) => println!("{} saved    {} [{}]", marker, url, post.tags),
        None => println!("{} unsaved  {}", marker, url),
    }
}

async fn suggest(usecase: &SyncUseCase) -> Result<()> {
    restore(usecase).await?;

    let state = usecase.store().state();
    let Some(suggested) = state.suggested_tags.as_ref() else {
        bail!("no active tab to suggest tags for");
    };
    println!("popular:     {}", suggested.popular.join(" "));
    println!("recommended: {}", suggested.recommended.join(" "));
    println!("scrubbed:    {}", suggested.scrubbed_text());
    println!("tags:        {}", state.tags.as_deref().unwrap_or_default());
    Ok(())
}

async fn save(usecase: &SyncUseCase, tags: Option<String>) -> Result<()> {
    restore(usecase).await?;

    if let Some(tags) = tags {
        usecase.update_tags(tags);
    }
    match usecase.save_active_tab().await? {
        Some(post) => {
            println!("Saved {} [{}]", post.url, post.tags);
            Ok(())
        }
        None => bail!("Pinboard rejected the token; log in again"),
    }
}

async fn save_all(usecase: &SyncUseCase) -> Result<()> {
    restore(usecase).await?;

    usecase.save_all().await?;
    let state = usecase.store().state();
    if !state.saved_all {
        bail!("Pinboard rejected the token; log in again");
    }
    println!(
        "All {} tab(s) saved",
        state.tabs.as_ref().map_or(0, Vec::len)
    );
    Ok(())
}
