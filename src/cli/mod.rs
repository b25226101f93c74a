pub mod args;
pub mod commands;

pub use args::{Cli, Commands, FolderCommands};
pub use commands::{copy_prompt, export_json, find_prompt, handle_command, import_json, list_prompts};
