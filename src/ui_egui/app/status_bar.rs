use super::TimepaneApp;

impl TimepaneApp {
    pub(super) fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let timed = self.events.iter().filter(|e| !e.is_all_day()).count();
            let all_day = self.events.len() - timed;
            ui.label(format!("{timed} events, {all_day} all-day"));

            if self.loading {
                ui.separator();
                ui.spinner();
                ui.label("Refreshing…");
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(description) = self.undo.next_description() {
                    ui.label(
                        egui::RichText::new(format!("Ctrl+Z undoes the {description}"))
                            .weak()
                            .size(11.0),
                    );
                }
            });
        });
    }
}
