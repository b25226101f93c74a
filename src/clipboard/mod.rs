pub mod resolver;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use std::{
    io::{self, Write},
    process::{Command, Stdio},
    sync::Mutex,
};
use thiserror::Error;

pub use resolver::{resolve_and_copy, CopyOutcome, DialogResponse, ValuesDialog};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: String },

    #[error("terminal write failed: {0}")]
    Terminal(io::Error),

    #[error("no clipboard strategy available")]
    Unavailable,
}

/// Something that can put text on the user's clipboard.
pub trait ClipboardWriter {
    fn name(&self) -> &str;
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Pipes text into a clipboard program such as `pbcopy` or `xclip`.
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The clipboard program for this platform, if there is a known one.
    pub fn for_platform() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::new("pbcopy", &[]))
        } else if cfg!(target_os = "windows") {
            Some(Self::new("clip", &[]))
        } else if cfg!(target_os = "linux") {
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                Some(Self::new("wl-copy", &[]))
            } else {
                Some(Self::new("xclip", &["-selection", "clipboard"]))
            }
        } else {
            None
        }
    }
}

impl ClipboardWriter for CommandClipboard {
    fn name(&self) -> &str {
        &self.program
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let spawn_err = |source| ClipboardError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(spawn_err)?;
        }

        let status = child.wait().map_err(spawn_err)?;
        if !status.success() {
            return Err(ClipboardError::Exit {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Copies through the terminal's own selection clipboard (OSC 52).
pub struct TerminalClipboard<W: Write> {
    out: Mutex<W>,
}

impl TerminalClipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

impl<W: Write> ClipboardWriter for TerminalClipboard<W> {
    fn name(&self) -> &str {
        "terminal"
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| out.flush())
            .map_err(ClipboardError::Terminal)
    }
}

/// Tries each writer in order until one succeeds.
pub struct FallbackClipboard {
    tiers: Vec<Box<dyn ClipboardWriter>>,
}

impl FallbackClipboard {
    pub fn new(tiers: Vec<Box<dyn ClipboardWriter>>) -> Self {
        Self { tiers }
    }

    /// System clipboard program first, terminal selection second.
    pub fn platform() -> Self {
        let mut tiers: Vec<Box<dyn ClipboardWriter>> = Vec::new();
        if let Some(command) = CommandClipboard::for_platform() {
            tiers.push(Box::new(command));
        }
        tiers.push(Box::new(TerminalClipboard::stdout()));
        Self::new(tiers)
    }
}

impl ClipboardWriter for FallbackClipboard {
    fn name(&self) -> &str {
        "fallback"
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last_err = ClipboardError::Unavailable;
        for tier in &self.tiers {
            match tier.write_text(text) {
                Ok(()) => {
                    debug!("Copied {} bytes with {}", text.len(), tier.name());
                    return Ok(());
                }
                Err(e) => {
                    warn!("Clipboard strategy {} failed: {}", tier.name(), e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}
