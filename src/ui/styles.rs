use eframe::egui::{Color32, RichText, Ui};

use crate::ui::config::UI_CONFIG;

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Small text in the label colour.
    fn label_subdued(&mut self, text: impl Into<String>);

    /// "Label: value" with the value coloured.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    /// Toolbar title in the accent colour.
    fn label_title(&mut self, text: impl Into<String>);

    fn label_error(&mut self, text: impl Into<String>);

    fn label_warning(&mut self, text: impl Into<String>);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.label));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().monospace().color(color));
        });
    }

    fn label_title(&mut self, text: impl Into<String>) {
        self.label(
            RichText::new(text)
                .strong()
                .monospace()
                .color(UI_CONFIG.colors.accent),
        );
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.status_error));
    }

    fn label_warning(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.status_warning));
    }
}
