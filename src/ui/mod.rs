pub mod dialog;

pub use dialog::{pick_prompt, InteractiveDialog, PresetDialog};
