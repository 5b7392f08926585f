//! User commands.
//!
//! Every button and shortcut maps to one `Command`. Each has a stable ID,
//! the short button label, a category for grouping, and a default key.

use serde::{Deserialize, Serialize};

/// Button groups in the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandCategory {
    Session,
    Transport,
    Flip,
    Scale,
    Pan,
    Loop,
    Effects,
}

/// A zero-argument user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Quit,
    TogglePause,
    Step,
    FlipHorizontal,
    FlipVertical,
    ScaleUp,
    ScaleReset,
    ScaleDown,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    PanReset,
    MarkLoopStart,
    ResetLoopRegion,
    MarkLoopEnd,
    Rotate,
    ToggleGrayscale,
}

impl Command {
    /// All commands in control-panel order.
    pub const ALL: [Command; 18] = [
        Command::Quit,
        Command::TogglePause,
        Command::Step,
        Command::FlipHorizontal,
        Command::FlipVertical,
        Command::ScaleUp,
        Command::ScaleReset,
        Command::ScaleDown,
        Command::PanLeft,
        Command::PanRight,
        Command::PanUp,
        Command::PanDown,
        Command::PanReset,
        Command::MarkLoopStart,
        Command::ResetLoopRegion,
        Command::MarkLoopEnd,
        Command::Rotate,
        Command::ToggleGrayscale,
    ];

    /// Stable ID (e.g., "loop.mark_start").
    pub fn id(self) -> &'static str {
        match self {
            Self::Quit => "session.quit",
            Self::TogglePause => "transport.pause",
            Self::Step => "transport.step",
            Self::FlipHorizontal => "flip.horizontal",
            Self::FlipVertical => "flip.vertical",
            Self::ScaleUp => "scale.up",
            Self::ScaleReset => "scale.reset",
            Self::ScaleDown => "scale.down",
            Self::PanLeft => "pan.left",
            Self::PanRight => "pan.right",
            Self::PanUp => "pan.up",
            Self::PanDown => "pan.down",
            Self::PanReset => "pan.reset",
            Self::MarkLoopStart => "loop.mark_start",
            Self::ResetLoopRegion => "loop.reset",
            Self::MarkLoopEnd => "loop.mark_end",
            Self::Rotate => "effects.rotate",
            Self::ToggleGrayscale => "effects.grayscale",
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::TogglePause => "Pause",
            Self::Step => "Frame+",
            Self::FlipHorizontal => "F-H",
            Self::FlipVertical => "F-V",
            Self::ScaleUp => "+",
            Self::ScaleReset | Self::PanReset => "0",
            Self::ScaleDown => "-",
            Self::PanLeft => "L",
            Self::PanRight => "R",
            Self::PanUp => "U",
            Self::PanDown => "D",
            Self::MarkLoopStart => "A",
            Self::ResetLoopRegion => "Reset",
            Self::MarkLoopEnd => "B",
            Self::Rotate => "Rotate",
            Self::ToggleGrayscale => "Gray",
        }
    }

    pub fn category(self) -> CommandCategory {
        match self {
            Self::Quit => CommandCategory::Session,
            Self::TogglePause | Self::Step => CommandCategory::Transport,
            Self::FlipHorizontal | Self::FlipVertical => CommandCategory::Flip,
            Self::ScaleUp | Self::ScaleReset | Self::ScaleDown => CommandCategory::Scale,
            Self::PanLeft | Self::PanRight | Self::PanUp | Self::PanDown | Self::PanReset => {
                CommandCategory::Pan
            }
            Self::MarkLoopStart | Self::ResetLoopRegion | Self::MarkLoopEnd => {
                CommandCategory::Loop
            }
            Self::Rotate | Self::ToggleGrayscale => CommandCategory::Effects,
        }
    }

    /// Default key, by egui key name.
    pub fn shortcut(self) -> &'static str {
        match self {
            Self::Quit => "Q",
            Self::TogglePause => "Space",
            Self::Step => "Period",
            Self::FlipHorizontal => "H",
            Self::FlipVertical => "V",
            Self::ScaleUp => "Plus",
            Self::ScaleReset => "Num0",
            Self::ScaleDown => "Minus",
            Self::PanLeft => "ArrowLeft",
            Self::PanRight => "ArrowRight",
            Self::PanUp => "ArrowUp",
            Self::PanDown => "ArrowDown",
            Self::PanReset => "Backspace",
            Self::MarkLoopStart => "OpenBracket",
            Self::ResetLoopRegion => "Backslash",
            Self::MarkLoopEnd => "CloseBracket",
            Self::Rotate => "R",
            Self::ToggleGrayscale => "G",
        }
    }

    /// Look up a command by ID.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.id() == id)
    }

    /// Look up a command by key name.
    pub fn from_shortcut(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.shortcut() == key)
    }
}
