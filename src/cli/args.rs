use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{API_URL_ENV, HOME_ENV};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the prompt API
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Directory holding the local cache
    #[arg(long, global = true, env = HOME_ENV)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List prompts, pinned and favorites first
    Ls {
        /// Only prompts in this folder
        #[arg(short, long)]
        folder: Option<String>,

        /// Only prompts with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Show a prompt with its content and history
    Show {
        id: String,
    },
    /// Add a prompt
    ///
    /// Content may contain placeholders filled in when copying:
    ///   - {{name}}
    ///   - {{name:default value}}
    Add {
        /// Prompt title
        #[arg(long)]
        title: String,

        /// Tags to add to the prompt
        #[arg(short, long)]
        tags: Vec<String>,

        /// Folder to put the prompt in
        #[arg(short, long)]
        folder: Option<String>,

        #[arg(long)]
        favorite: bool,

        #[arg(long)]
        pinned: bool,

        /// Prompt content
        #[arg(last = true, required = true)]
        content: Vec<String>,
    },
    /// Change a prompt's title, content, tags or folder
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        /// Replace the tags
        #[arg(short, long)]
        tags: Vec<String>,

        /// Move to a folder; pass an empty string to remove it from its folder
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Delete a prompt
    Rm {
        id: String,
    },
    /// Toggle a prompt's favorite flag
    Fav {
        id: String,
    },
    /// Toggle a prompt's pinned flag
    Pin {
        id: String,
    },
    /// Copy a prompt to the clipboard, filling in its placeholders
    Copy {
        /// Prompt to copy; pick interactively when omitted
        id: Option<String>,

        /// Placeholder value as name=value, skips the dialog
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },
    /// Save the current title and content into the prompt's history
    Snapshot {
        id: String,
    },
    /// List a prompt's saved versions
    Versions {
        id: String,
    },
    /// Restore a saved version of a prompt
    Restore {
        id: String,
        version_id: String,
    },
    /// Folder related operations
    Folder {
        #[command(subcommand)]
        action: FolderCommands,
    },
    /// Export prompts and folders as JSON
    Export {
        /// File to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ask the server for its export instead of exporting the local cache
        #[arg(long)]
        remote: bool,
    },
    /// Import prompts and folders from an export file
    Import {
        file: PathBuf,
    },
    /// Check whether the API is reachable
    Status {
        /// Keep checking until interrupted
        #[arg(short, long)]
        watch: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum FolderCommands {
    /// List folders
    Ls,
    /// Create a folder
    Add {
        name: String,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a folder
    Rm {
        id: String,
    },
}
