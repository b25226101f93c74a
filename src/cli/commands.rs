use anyhow::{anyhow, Context, Result};
use colored::*;
use std::sync::{Arc, Mutex};

use super::args::{Commands, FolderCommands};
use crate::clipboard::{resolve_and_copy, ClipboardWriter, CopyOutcome, FallbackClipboard, ValuesDialog};
use crate::context::AppContext;
use crate::db::models::sort_for_display;
use crate::db::{Folder, Prompt};
use crate::sync::{ConnectionStatus, ImportData};
use crate::ui::{pick_prompt, InteractiveDialog, PresetDialog};
use crate::utils::params::{extract_variables, parse_assignments};
use crate::utils::time::format_millis;

pub async fn handle_command(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Ls { folder, tag, favorites } => {
            let prompts = list_prompts(ctx, folder.as_deref(), tag.as_deref(), favorites).await;
            print_prompts(&prompts);
        }
        Commands::Show { id } => {
            let prompt = find_prompt(ctx, &id).await?;
            print_prompt_detail(&prompt);
        }
        Commands::Add { title, tags, folder, favorite, pinned, content } => {
            let mut prompt = Prompt::new(title, content.join(" ")).with_tags(tags);
            prompt.folder_id = folder;
            prompt.is_favorite = favorite;
            prompt.is_pinned = pinned;
            let saved = ctx.store.create(prompt).await?;
            println!("Prompt added with ID: {}", saved.id);
        }
        Commands::Edit { id, title, content, tags, folder } => {
            let mut prompt = find_prompt(ctx, &id).await?;
            if let Some(title) = title {
                prompt.title = title;
            }
            if let Some(content) = content {
                prompt.content = content;
            }
            if !tags.is_empty() {
                prompt.set_tags(tags);
            }
            if let Some(folder) = folder {
                prompt.folder_id = if folder.is_empty() { None } else { Some(folder) };
            }
            ctx.store.update(prompt).await?;
            println!("Prompt updated successfully");
        }
        Commands::Rm { id } => {
            ctx.store.delete::<Prompt>(&id).await?;
            println!("Prompt deleted successfully");
        }
        Commands::Fav { id } => {
            let mut prompt = find_prompt(ctx, &id).await?;
            prompt.is_favorite = !prompt.is_favorite;
            let saved = ctx.store.update(prompt).await?;
            println!("Favorite: {}", if saved.is_favorite { "on" } else { "off" });
        }
        Commands::Pin { id } => {
            let mut prompt = find_prompt(ctx, &id).await?;
            prompt.is_pinned = !prompt.is_pinned;
            let saved = ctx.store.update(prompt).await?;
            println!("Pinned: {}", if saved.is_pinned { "on" } else { "off" });
        }
        Commands::Copy { id, vars } => {
            let id = match id {
                Some(id) => id,
                None => {
                    let mut prompts = ctx.store.load::<Prompt>().await;
                    sort_for_display(&mut prompts);
                    match pick_prompt(&prompts)? {
                        Some(index) => prompts[index].id.clone(),
                        None => return Ok(()),
                    }
                }
            };

            let writer = FallbackClipboard::platform();
            let outcome = if vars.is_empty() {
                copy_prompt(ctx, &id, &writer, &InteractiveDialog::new()).await?
            } else {
                let values = parse_assignments(&vars).map_err(|e| anyhow!(e))?;
                copy_prompt(ctx, &id, &writer, &PresetDialog::new(values)).await?
            };

            match outcome {
                CopyOutcome::Copied(_) => println!("{}", "Prompt copied to clipboard!".green()),
                CopyOutcome::Cancelled => println!("Copy cancelled"),
                CopyOutcome::Failed(e) => return Err(anyhow!("Failed to copy prompt: {}", e)),
            }
        }
        Commands::Snapshot { id } => {
            ctx.store.load::<Prompt>().await;
            let prompt = ctx.store.create_prompt_version(&id).await?;
            match prompt.versions.first() {
                Some(version) => {
                    println!("Saved version {} ({} kept)", version.id, prompt.versions.len())
                }
                None => return Err(anyhow!("Server did not keep the snapshot of {}", id)),
            }
        }
        Commands::Versions { id } => {
            let prompt = find_prompt(ctx, &id).await?;
            print_versions(&prompt);
        }
        Commands::Restore { id, version_id } => {
            ctx.store.load::<Prompt>().await;
            let prompt = ctx.store.restore_prompt_version(&id, &version_id).await?;
            println!("Restored \"{}\"", prompt.title);
        }
        Commands::Folder { action } => match action {
            FolderCommands::Ls => {
                let folders = ctx.store.load::<Folder>().await;
                print_folders(&folders);
            }
            FolderCommands::Add { name, icon, color } => {
                let mut folder = Folder::new(name);
                if let Some(icon) = icon {
                    folder.icon = icon;
                }
                if let Some(color) = color {
                    folder.color = color;
                }
                let saved = ctx.store.create(folder).await?;
                println!("Folder added with ID: {}", saved.id);
            }
            FolderCommands::Rm { id } => {
                ctx.store.delete::<Folder>(&id).await?;
                println!("Folder deleted successfully");
            }
        },
        Commands::Export { output, remote } => {
            let json = if remote {
                serde_json::to_string_pretty(&ctx.store.remote().export().await?)?
            } else {
                export_json(ctx).await?
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let (prompts, folders) = import_json(ctx, &raw).await?;
            println!("Imported {} prompts and {} folders", prompts, folders);
        }
        Commands::Status { watch } => {
            if watch {
                watch_status(ctx).await?;
            } else {
                let status = ctx.monitor.check_now().await;
                println!("{} {}", ctx.config.api_url, colored_status(status));
            }
        }
    }
    Ok(())
}

pub async fn list_prompts(
    ctx: &AppContext,
    folder: Option<&str>,
    tag: Option<&str>,
    favorites_only: bool,
) -> Vec<Prompt> {
    let mut prompts: Vec<Prompt> = ctx
        .store
        .load::<Prompt>()
        .await
        .into_iter()
        .filter(|p| folder.map_or(true, |f| p.folder_id.as_deref() == Some(f)))
        .filter(|p| tag.map_or(true, |t| p.tags.iter().any(|pt| pt == t)))
        .filter(|p| !favorites_only || p.is_favorite)
        .collect();
    sort_for_display(&mut prompts);
    prompts
}

pub async fn find_prompt(ctx: &AppContext, id: &str) -> Result<Prompt> {
    ctx.store
        .load::<Prompt>()
        .await
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| anyhow!("Prompt not found: {}", id))
}

pub async fn copy_prompt(
    ctx: &AppContext,
    id: &str,
    writer: &dyn ClipboardWriter,
    dialog: &dyn ValuesDialog,
) -> Result<CopyOutcome> {
    let prompt = find_prompt(ctx, id).await?;
    Ok(resolve_and_copy(&prompt, writer, dialog))
}

/// Refresh both collections, then serialize the cache as an export envelope.
pub async fn export_json(ctx: &AppContext) -> Result<String> {
    ctx.store.load::<Prompt>().await;
    ctx.store.load::<Folder>().await;
    Ok(serde_json::to_string_pretty(&ctx.store.export())?)
}

pub async fn import_json(ctx: &AppContext, raw: &str) -> Result<(usize, usize)> {
    let data = ImportData::parse(raw)?;
    let counts = (data.prompts.len(), data.folders.len());
    ctx.store.import(data.prompts, data.folders).await?;
    Ok(counts)
}

async fn watch_status(ctx: &AppContext) -> Result<()> {
    let api_url = ctx.config.api_url.clone();
    let last = Arc::new(Mutex::new(None));
    let subscription = ctx.monitor.subscribe(move |status| {
        // Every probe passes through `checking`; only print settled states.
        if status == ConnectionStatus::Checking {
            return;
        }
        let mut last = last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *last != Some(status) {
            println!("{} {}", api_url, colored_status(status));
            *last = Some(status);
        }
    });
    ctx.monitor.start();
    tokio::signal::ctrl_c().await?;
    subscription.unsubscribe();
    ctx.shutdown();
    Ok(())
}

fn colored_status(status: ConnectionStatus) -> ColoredString {
    match status {
        ConnectionStatus::Connected => status.to_string().green(),
        ConnectionStatus::Disconnected => status.to_string().red(),
        ConnectionStatus::Checking => status.to_string().yellow(),
    }
}

fn print_prompts(prompts: &[Prompt]) {
    if prompts.is_empty() {
        println!("No prompts found.");
        return;
    }

    println!("\nFound {} prompts:", prompts.len());
    println!("─────────────────────────────────────────────");

    for prompt in prompts {
        let mut marks = String::new();
        if prompt.is_pinned {
            marks.push_str("📌 ");
        }
        if prompt.is_favorite {
            marks.push_str("★ ");
        }
        println!("{}{} {}", marks, prompt.title.bold(), format!("({})", prompt.id).dimmed());
        println!("    Updated: {}", format_millis(prompt.updated_at));

        let variables = extract_variables(&prompt.content);
        if !variables.is_empty() {
            let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
            println!("    Variables: {}", names.join(", "));
        }
        if !prompt.tags.is_empty() {
            println!("    Tags: {}", prompt.tags.join(", "));
        }
        println!("─────────────────────────────────────────────");
    }
}

fn print_prompt_detail(prompt: &Prompt) {
    println!("{} {}", prompt.title.bold(), format!("({})", prompt.id).dimmed());
    println!("─────────────────────────────────────────────");
    println!("{}", prompt.content);
    println!("─────────────────────────────────────────────");
    if !prompt.tags.is_empty() {
        println!("Tags: {}", prompt.tags.join(", "));
    }
    if let Some(folder) = &prompt.folder_id {
        println!("Folder: {}", folder);
    }
    println!("Created: {}", format_millis(prompt.created_at));
    println!("Updated: {}", format_millis(prompt.updated_at));
    if !prompt.versions.is_empty() {
        println!("Versions: {}", prompt.versions.len());
    }
}

fn print_versions(prompt: &Prompt) {
    if prompt.versions.is_empty() {
        println!("No saved versions for \"{}\".", prompt.title);
        return;
    }
    for version in &prompt.versions {
        println!(
            "({}) [{}] {}",
            version.id,
            format_millis(version.saved_at),
            version.title
        );
    }
}

fn print_folders(folders: &[Folder]) {
    if folders.is_empty() {
        println!("No folders found.");
        return;
    }
    for folder in folders {
        println!("{} {} {}", folder.icon, folder.name, format!("({})", folder.id).dimmed());
    }
}
