use clap::Parser;
use prompt_vault::cli::args::{Cli, Commands, FolderCommands};
use std::path::PathBuf;

#[test]
fn test_parse_args_add() {
    let args = vec!["pv", "add", "--title", "Greeting", "--", "Hello", "{{name:World}}"];
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::Add { title, tags, folder, favorite, pinned, content } => {
            assert_eq!(title, "Greeting");
            assert_eq!(content, vec!["Hello", "{{name:World}}"]);
            assert!(tags.is_empty());
            assert!(folder.is_none());
            assert!(!favorite);
            assert!(!pinned);
        }
        _ => panic!("Expected Add command"),
    }
}

#[test]
fn test_parse_args_add_with_options() {
    let args = vec![
        "pv", "add", "--title", "Review", "-t", "code", "-t", "review", "-f", "work",
        "--favorite", "--pinned", "--", "Review", "this",
    ];
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::Add { tags, folder, favorite, pinned, content, .. } => {
            assert_eq!(tags, vec!["code", "review"]);
            assert_eq!(folder.as_deref(), Some("work"));
            assert!(favorite);
            assert!(pinned);
            assert_eq!(content.join(" "), "Review this");
        }
        _ => panic!("Expected Add command"),
    }
}

#[test]
fn test_parse_args_add_requires_content() {
    assert!(Cli::try_parse_from(["pv", "add", "--title", "Empty"]).is_err());
}

#[test]
fn test_parse_args_ls() {
    let cli = Cli::parse_from(["pv", "ls"]);
    match cli.command {
        Commands::Ls { folder, tag, favorites } => {
            assert!(folder.is_none());
            assert!(tag.is_none());
            assert!(!favorites);
        }
        _ => panic!("Expected Ls command"),
    }

    let cli = Cli::parse_from(["pv", "ls", "--folder", "f1", "--tag", "rust", "--favorites"]);
    match cli.command {
        Commands::Ls { folder, tag, favorites } => {
            assert_eq!(folder.as_deref(), Some("f1"));
            assert_eq!(tag.as_deref(), Some("rust"));
            assert!(favorites);
        }
        _ => panic!("Expected Ls command"),
    }
}

#[test]
fn test_parse_args_edit() {
    let cli = Cli::parse_from(["pv", "edit", "p1", "--title", "New", "--folder", ""]);
    match cli.command {
        Commands::Edit { id, title, content, tags, folder } => {
            assert_eq!(id, "p1");
            assert_eq!(title.as_deref(), Some("New"));
            assert!(content.is_none());
            assert!(tags.is_empty());
            assert_eq!(folder.as_deref(), Some(""));
        }
        _ => panic!("Expected Edit command"),
    }
}

#[test]
fn test_parse_args_copy() {
    let cli = Cli::parse_from(["pv", "copy"]);
    match cli.command {
        Commands::Copy { id, vars } => {
            assert!(id.is_none());
            assert!(vars.is_empty());
        }
        _ => panic!("Expected Copy command"),
    }

    let cli = Cli::parse_from(["pv", "copy", "p1", "--var", "name=Alice", "--var", "place=Rust"]);
    match cli.command {
        Commands::Copy { id, vars } => {
            assert_eq!(id.as_deref(), Some("p1"));
            assert_eq!(vars, vec!["name=Alice", "place=Rust"]);
        }
        _ => panic!("Expected Copy command"),
    }
}

#[test]
fn test_parse_args_versions() {
    match Cli::parse_from(["pv", "snapshot", "p1"]).command {
        Commands::Snapshot { id } => assert_eq!(id, "p1"),
        _ => panic!("Expected Snapshot command"),
    }
    match Cli::parse_from(["pv", "versions", "p1"]).command {
        Commands::Versions { id } => assert_eq!(id, "p1"),
        _ => panic!("Expected Versions command"),
    }
    match Cli::parse_from(["pv", "restore", "p1", "v1"]).command {
        Commands::Restore { id, version_id } => {
            assert_eq!(id, "p1");
            assert_eq!(version_id, "v1");
        }
        _ => panic!("Expected Restore command"),
    }
}

#[test]
fn test_parse_args_folder() {
    match Cli::parse_from(["pv", "folder", "ls"]).command {
        Commands::Folder { action: FolderCommands::Ls } => {}
        _ => panic!("Expected Folder Ls command"),
    }

    let cli = Cli::parse_from(["pv", "folder", "add", "Work", "--icon", "💼"]);
    match cli.command {
        Commands::Folder { action: FolderCommands::Add { name, icon, color } } => {
            assert_eq!(name, "Work");
            assert_eq!(icon.as_deref(), Some("💼"));
            assert!(color.is_none());
        }
        _ => panic!("Expected Folder Add command"),
    }

    match Cli::parse_from(["pv", "folder", "rm", "f1"]).command {
        Commands::Folder { action: FolderCommands::Rm { id } } => assert_eq!(id, "f1"),
        _ => panic!("Expected Folder Rm command"),
    }
}

#[test]
fn test_parse_args_export_import() {
    match Cli::parse_from(["pv", "export", "-o", "out.json", "--remote"]).command {
        Commands::Export { output, remote } => {
            assert_eq!(output, Some(PathBuf::from("out.json")));
            assert!(remote);
        }
        _ => panic!("Expected Export command"),
    }
    match Cli::parse_from(["pv", "import", "backup.json"]).command {
        Commands::Import { file } => assert_eq!(file, PathBuf::from("backup.json")),
        _ => panic!("Expected Import command"),
    }
}

#[test]
fn test_parse_args_status() {
    match Cli::parse_from(["pv", "status", "--watch"]).command {
        Commands::Status { watch } => assert!(watch),
        _ => panic!("Expected Status command"),
    }
}

#[test]
fn test_parse_args_global_flags() {
    let cli = Cli::parse_from([
        "pv", "ls", "--api-url", "http://example.test/api", "--data-dir", "/tmp/pv",
    ]);
    assert_eq!(cli.api_url.as_deref(), Some("http://example.test/api"));
    assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/pv")));
}

#[test]
fn test_parse_args_unknown_command() {
    assert!(Cli::try_parse_from(["pv", "frobnicate"]).is_err());
    assert!(Cli::try_parse_from(["pv"]).is_err());
}
