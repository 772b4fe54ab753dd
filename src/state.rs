use std::collections::BTreeSet;
use std::path::Path;

use crate::color::ClassColors;
use crate::config::DashboardConfig;
use crate::data::error::RosterError;
use crate::data::export::{write_export, ExportFormat};
use crate::data::filter::{class_options, filter_by_min_score, search, View};
use crate::data::model::{ClassId, Roster};

// ---------------------------------------------------------------------------
// Add-student form
// ---------------------------------------------------------------------------

/// Raw input of the add-student form.
#[derive(Debug, Clone)]
pub struct AddForm {
    pub name: String,
    pub class_id: i64,
    pub score: i64,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            class_id: 1,
            score: 60,
        }
    }
}

/// Inline feedback shown under the form after a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFeedback {
    Added(String),
    Rejected(RosterError),
}

/// Line shown in the top bar after an export or a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering. Owns the roster;
/// panel functions receive it by `&mut`.
pub struct AppState {
    pub config: DashboardConfig,

    pub roster: Roster,

    /// Search box contents.
    pub search_term: String,

    /// Minimum-score slider.
    pub min_score: u8,

    /// Indices of records passing search and min-score (cached).
    pub visible_indices: View,

    /// Class chosen in the class-comparison selector.
    pub selected_class: Option<ClassId>,

    pub add_form: AddForm,
    pub form_feedback: Option<FormFeedback>,

    /// Names ticked for bulk deletion.
    pub delete_selection: BTreeSet<String>,

    pub class_colors: ClassColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<StatusMessage>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    /// Start a session with the seed roster.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self {
            config,
            roster: Roster::seeded(),
            search_term: String::new(),
            min_score: 0,
            visible_indices: Vec::new(),
            selected_class: None,
            add_form: AddForm::default(),
            form_feedback: None,
            delete_selection: BTreeSet::new(),
            class_colors: ClassColors::default(),
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Recompute `visible_indices` after a filter change or mutation, and
    /// keep the class selector pointing at a class that is still visible.
    pub fn refilter(&mut self) {
        let searched = search(&self.roster, &self.search_term);
        self.visible_indices = filter_by_min_score(&self.roster, &searched, self.min_score);

        let options = self.class_options();
        if !self.selected_class.is_some_and(|c| options.contains(&c)) {
            self.selected_class = options.first().copied();
        }

        let visible_names: BTreeSet<&str> = self
            .visible_indices
            .iter()
            .map(|&i| self.roster.records()[i].name.as_str())
            .collect();
        self.delete_selection
            .retain(|n| visible_names.contains(n.as_str()));
    }

    pub fn set_search_term(&mut self, term: String) {
        self.search_term = term;
        self.refilter();
    }

    pub fn set_min_score(&mut self, min_score: u8) {
        self.min_score = min_score;
        self.refilter();
    }

    /// Classes present in the current view.
    pub fn class_options(&self) -> Vec<ClassId> {
        class_options(&self.roster, &self.visible_indices)
    }

    /// Submit the add form. On success the form is cleared; on failure the
    /// roster and form input are left as they were.
    pub fn submit_add_form(&mut self) {
        let AddForm {
            name,
            class_id,
            score,
        } = &self.add_form;
        match self.roster.add(name, *class_id, *score) {
            Ok(record) => {
                log::info!(
                    "Added {} (class {}, score {}, {})",
                    record.name,
                    record.class_id,
                    record.score,
                    record.status()
                );
                self.form_feedback = Some(FormFeedback::Added(record.name.clone()));
                self.add_form.name.clear();
                self.refilter();
            }
            Err(e) => {
                log::warn!("Rejected new student: {e}");
                self.form_feedback = Some(FormFeedback::Rejected(e));
            }
        }
    }

    /// Delete every ticked name from the whole roster.
    pub fn confirm_delete(&mut self) {
        if self.delete_selection.is_empty() {
            return;
        }
        let names: Vec<String> = std::mem::take(&mut self.delete_selection)
            .into_iter()
            .collect();
        let removed = self.roster.delete(&names);
        log::info!("Deleted {removed} record(s) named {names:?}");
        self.status_message = None;
        self.refilter();
    }

    /// Write the full, unfiltered roster to `path`.
    pub fn export_to(&mut self, path: &Path, format: ExportFormat) {
        if self.roster.is_empty() {
            log::warn!("Exporting an empty roster, only the header row is written");
        }
        match write_export(path, format, &self.roster) {
            Ok(bytes) => {
                log::info!(
                    "Exported {} records ({bytes} bytes) to {}",
                    self.roster.len(),
                    path.display()
                );
                self.status_message = Some(StatusMessage::Info(format!(
                    "已导出 {}",
                    path.display()
                )));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(StatusMessage::Error(format!("Error: {e:#}")));
            }
        }
    }

    pub fn toggle_delete(&mut self, name: &str) {
        if !self.delete_selection.remove(name) {
            self.delete_selection.insert(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::full_view;
    use crate::data::stats::compute_stats;

    fn visible_names(state: &AppState) -> Vec<String> {
        state
            .visible_indices
            .iter()
            .map(|&i| state.roster.records()[i].name.clone())
            .collect()
    }

    #[test]
    fn new_session_shows_seed_roster() {
        let state = AppState::default();
        assert_eq!(state.visible_indices, full_view(&state.roster));
        assert_eq!(state.selected_class.map(ClassId::get), Some(1));
    }

    #[test]
    fn add_through_form_updates_view_and_stats() {
        let mut state = AppState::default();
        state.add_form = AddForm {
            name: "新生".into(),
            class_id: 2,
            score: 45,
        };
        state.submit_add_form();
        assert_eq!(state.form_feedback, Some(FormFeedback::Added("新生".into())));
        assert!(state.add_form.name.is_empty());
        assert_eq!(state.visible_indices.len(), 11);

        let stats = compute_stats(&state.roster, &state.visible_indices).unwrap();
        assert!((stats.pass_rate - 8.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn rejected_add_leaves_roster_unchanged() {
        let mut state = AppState::default();
        state.add_form.name = "  ".into();
        state.submit_add_form();
        assert_eq!(
            state.form_feedback,
            Some(FormFeedback::Rejected(RosterError::EmptyName))
        );
        assert_eq!(state.roster.len(), 10);
    }

    #[test]
    fn delete_is_global_even_under_search() {
        let mut state = AppState::default();
        state.toggle_delete("丁一");
        state.toggle_delete("刘二");
        state.set_search_term("丁".into());
        // 刘二 is no longer visible, so it drops out of the selection.
        assert_eq!(state.delete_selection.len(), 1);
        state.toggle_delete("刘二");
        state.confirm_delete();

        assert_eq!(state.roster.len(), 8);
        state.set_search_term(String::new());
        let names = visible_names(&state);
        assert!(!names.iter().any(|n| n == "丁一" || n == "刘二"));
    }

    #[test]
    fn min_score_and_search_compose() {
        let mut state = AppState::default();
        state.set_min_score(80);
        assert_eq!(visible_names(&state), vec!["丁一", "王五", "赵六", "周八"]);
        state.set_search_term("王".into());
        assert_eq!(visible_names(&state), vec!["王五"]);
        assert_eq!(state.selected_class.map(ClassId::get), Some(3));
    }

    #[test]
    fn edits_survive_repeated_refilter() {
        let mut state = AppState::default();
        state.add_form.name = "新生".into();
        state.submit_add_form();
        state.toggle_delete("郑十");
        state.confirm_delete();

        for _ in 0..5 {
            state.refilter();
        }
        state.set_search_term(String::new());
        state.set_min_score(0);

        assert_eq!(state.roster.len(), 10);
        let names = visible_names(&state);
        assert_eq!(names.last().map(String::as_str), Some("新生"));
        assert!(!names.iter().any(|n| n == "郑十"));
        assert_ne!(state.roster.records(), Roster::seeded().records());
    }

    #[test]
    fn export_of_empty_roster_still_succeeds() {
        let mut state = AppState::default();
        let all: Vec<String> = state.roster.records().iter().map(|r| r.name.clone()).collect();
        state.roster.delete(&all);
        state.refilter();
        assert!(state.roster.is_empty());

        let path = std::env::temp_dir().join(format!("grade-panda-empty-{}.csv", std::process::id()));
        state.export_to(&path, ExportFormat::Csv);
        assert!(matches!(state.status_message, Some(StatusMessage::Info(_))));
        let text = std::fs::read_to_string(&path).expect("read export");
        assert_eq!(text.lines().count(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn export_reports_outcome() {
        let mut state = AppState::default();
        state.set_search_term("张".into());

        let path = std::env::temp_dir().join(format!("grade-panda-state-{}.csv", std::process::id()));
        state.export_to(&path, ExportFormat::Csv);
        assert!(matches!(state.status_message, Some(StatusMessage::Info(_))));
        // The export ignores the active search.
        let text = std::fs::read_to_string(&path).expect("read export");
        assert_eq!(text.lines().count(), 11);
        let _ = std::fs::remove_file(&path);

        let bad = std::env::temp_dir().join("grade-panda-missing-dir").join("x.xlsx");
        state.export_to(&bad, ExportFormat::Xlsx);
        assert!(matches!(state.status_message, Some(StatusMessage::Error(_))));
    }

    #[test]
    fn empty_view_clears_class_selection() {
        let mut state = AppState::default();
        state.set_search_term("没有这个人".into());
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.selected_class, None);
        assert_eq!(compute_stats(&state.roster, &state.visible_indices), None);
    }
}
