//! 把 `UiState` 画成几行纯文本。
use std::fmt;

use chipster_core::model::UiState;

pub fn render(ui: &UiState) -> String {
    Screen(ui).to_string()
}

struct Screen<'a>(&'a UiState);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ui = self.0;
        let chips: Vec<String> = ui
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let text = match e.icon() {
                    Some(icon) => format!("{icon} {}", e.text()),
                    None => e.text().to_owned(),
                };
                if ui.highlighted_index == Some(i) {
                    format!("[>{text}<]")
                } else {
                    format!("[{text}]")
                }
            })
            .collect();
        if chips.is_empty() {
            writeln!(f, "chips: (none)")?;
        } else {
            writeln!(f, "chips: {}", chips.join(" "))?;
        }
        writeln!(f, "input: {:?}", ui.input_text)?;
        if ui.suggestions_visible() {
            for (i, c) in ui.suggestions.iter().enumerate() {
                let marker = if ui.selected_suggestion == Some(i) { '>' } else { ' ' };
                match c.icon() {
                    Some(icon) => writeln!(f, "{marker} {}. {icon} {}", i + 1, c.label())?,
                    None => writeln!(f, "{marker} {}. {}", i + 1, c.label())?,
                }
            }
        }
        if let Some(error) = &ui.error {
            writeln!(f, "error: {error}")?;
        }
        Ok(())
    }
}
