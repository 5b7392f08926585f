//! Control panel buttons and keyboard shortcuts.

use eframe::egui;
use loopview_playback::{Command, CommandCategory};
use tracing::warn;

/// Panel rows, top to bottom.
const GROUPS: [CommandCategory; 7] = [
    CommandCategory::Session,
    CommandCategory::Transport,
    CommandCategory::Flip,
    CommandCategory::Scale,
    CommandCategory::Pan,
    CommandCategory::Loop,
    CommandCategory::Effects,
];

fn group_title(category: CommandCategory) -> &'static str {
    match category {
        CommandCategory::Session => "Session",
        CommandCategory::Transport => "Transport",
        CommandCategory::Flip => "Flip",
        CommandCategory::Scale => "Scale",
        CommandCategory::Pan => "Pan",
        CommandCategory::Loop => "Loop",
        CommandCategory::Effects => "Effects",
    }
}

/// Resolved key bindings.
pub struct KeyMap {
    bindings: Vec<(egui::Key, Command)>,
}

impl KeyMap {
    pub fn new() -> Self {
        let mut bindings: Vec<(egui::Key, Command)> = Command::ALL
            .into_iter()
            .filter_map(|cmd| match egui::Key::from_name(cmd.shortcut()) {
                Some(key) => Some((key, cmd)),
                None => {
                    warn!("No key named {:?} for {}", cmd.shortcut(), cmd.id());
                    None
                }
            })
            .collect();
        bindings.push((egui::Key::Escape, Command::Quit));
        Self { bindings }
    }

    /// Commands for keys pressed this frame, in press order.
    pub fn pressed(&self, ctx: &egui::Context) -> Vec<Command> {
        if ctx.wants_keyboard_input() {
            return Vec::new();
        }
        ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => self
                        .bindings
                        .iter()
                        .find(|(bound, _)| bound == key)
                        .map(|&(_, cmd)| cmd),
                    _ => None,
                })
                .collect()
        })
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the button column; returns the commands clicked this frame.
pub fn show_panel(ui: &mut egui::Ui, status: &str) -> Vec<Command> {
    let mut clicked = Vec::new();

    ui.heading(status);
    ui.separator();

    for category in GROUPS {
        ui.label(group_title(category));
        ui.horizontal_wrapped(|ui| {
            for cmd in Command::ALL.into_iter().filter(|c| c.category() == category) {
                if ui
                    .button(cmd.label())
                    .on_hover_text(cmd.shortcut())
                    .clicked()
                {
                    clicked.push(cmd);
                }
            }
        });
        ui.add_space(4.0);
    }

    clicked
}
