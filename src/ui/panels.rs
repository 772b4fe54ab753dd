use std::collections::BTreeSet;

use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::ExportFormat;
use crate::data::filter::{failing, group_by_class, sort_all, top_scorers};
use crate::data::model::{Roster, Status, CLASS_RANGE, COLUMN_HEADERS, SCORE_RANGE};
use crate::data::stats::compute_stats;
use crate::state::{AppState, FormFeedback, StatusMessage};

const FAIL_BACKGROUND: Color32 = Color32::from_rgb(0xff, 0xcc, 0xcc);
const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Record table
// ---------------------------------------------------------------------------

/// Read-only table of the records at `view`, failing status cells tinted.
pub fn record_table(
    ui: &mut Ui,
    id: &str,
    roster: &Roster,
    view: &[usize],
    max_height: f32,
    with_status: bool,
) {
    let n_cols = if with_status { 4 } else { 3 };
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(80.0))
            .columns(Column::auto().at_least(48.0), n_cols - 1)
            .min_scrolled_height(0.0)
            .max_scroll_height(max_height)
            .header(ROW_HEIGHT, |mut header| {
                for title in &COLUMN_HEADERS[..n_cols] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*title);
                    });
                }
            })
            .body(|mut body| {
                for &idx in view {
                    let Some(r) = roster.get(idx) else {
                        continue;
                    };
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(&r.name);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(r.class_id.to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(r.score.to_string());
                        });
                        if with_status {
                            row.col(|ui: &mut Ui| {
                                let status = r.status();
                                let mut text = RichText::new(status.label());
                                if status == Status::Fail {
                                    text = text
                                        .background_color(FAIL_BACKGROUND)
                                        .color(Color32::BLACK);
                                }
                                ui.label(text);
                            });
                        }
                    });
                }
            });
    });
    if view.is_empty() {
        ui.weak("无数据");
    }
}

// ---------------------------------------------------------------------------
// Data management column: search, add form, roster
// ---------------------------------------------------------------------------

pub fn data_column(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 数据管理");

    let mut term = state.search_term.clone();
    let response = ui
        .add(egui::TextEdit::singleline(&mut term).hint_text("学生姓名搜索"))
        .on_hover_text("支持模糊查询");
    if response.changed() {
        state.set_search_term(term);
    }

    egui::CollapsingHeader::new("➕ 添加新学生")
        .default_open(false)
        .show(ui, |ui: &mut Ui| add_form(ui, state));

    ui.add_space(4.0);
    record_table(
        ui,
        "roster_table",
        &state.roster,
        &state.visible_indices,
        400.0,
        true,
    );
}

fn add_form(ui: &mut Ui, state: &mut AppState) {
    egui::Grid::new("add_form")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("姓名");
            ui.text_edit_singleline(&mut state.add_form.name);
            ui.end_row();

            ui.label("班级");
            ui.add(egui::DragValue::new(&mut state.add_form.class_id).range(CLASS_RANGE));
            ui.end_row();

            ui.label("分数");
            ui.add(egui::DragValue::new(&mut state.add_form.score).range(SCORE_RANGE));
            ui.end_row();
        });

    if ui.button("提交添加").clicked() {
        state.submit_add_form();
    }

    match &state.form_feedback {
        Some(FormFeedback::Added(_)) => {
            ui.colored_label(Color32::DARK_GREEN, "添加成功！");
        }
        Some(FormFeedback::Rejected(e)) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Analysis column: metrics
// ---------------------------------------------------------------------------

pub fn metrics(ui: &mut Ui, state: &AppState) {
    ui.heading("📈 分数分析");

    let stats = compute_stats(&state.roster, &state.visible_indices);
    let (count, mean, max, pass_rate) = match stats {
        Some(s) => (
            s.count.to_string(),
            format!("{:.1}", s.mean_score),
            s.max_score.to_string(),
            format!("{:.1}%", s.pass_rate * 100.0),
        ),
        None => {
            let none = "无数据".to_string();
            ("0".to_string(), none.clone(), none.clone(), none)
        }
    };

    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric(ui, "人数", &count);
        metric(ui, "平均分", &mean);
        metric(ui, "最高分", &max);
        metric(ui, "及格率", &pass_rate);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.weak(label);
            ui.label(RichText::new(value).size(20.0).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Class comparison column
// ---------------------------------------------------------------------------

pub fn class_column(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🏫 班级对比");

    let options = state.class_options();
    let selected_text = state
        .selected_class
        .map(|c| format!("{c} 班"))
        .unwrap_or_else(|| "无数据".to_string());
    egui::ComboBox::from_id_salt("class_select")
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            for class_id in &options {
                ui.selectable_value(
                    &mut state.selected_class,
                    Some(*class_id),
                    format!("{class_id} 班"),
                );
            }
        });

    let view = match state.selected_class {
        Some(class_id) => group_by_class(&state.roster, &state.visible_indices, class_id),
        None => Vec::new(),
    };
    record_table(ui, "class_table", &state.roster, &view, 200.0, true);
}

// ---------------------------------------------------------------------------
// Left side panel – export, min score, bulk delete
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("⚙️ 高级功能");
    ui.separator();

    if ui.button("📥 导出Excel文件").clicked() {
        save_file_dialog(state, ExportFormat::Xlsx);
    }
    if ui.button("📄 导出CSV文件").clicked() {
        save_file_dialog(state, ExportFormat::Csv);
    }
    ui.separator();

    ui.strong("🔎 高级筛选");
    let mut min_score = state.min_score;
    let slider = egui::Slider::new(&mut min_score, 0..=100).text("最低分数");
    if ui.add(slider).changed() {
        state.set_min_score(min_score);
    }
    ui.weak(format!("当前显示分数 ≥ {} 的学生", state.min_score));
    ui.separator();

    egui::CollapsingHeader::new("🗑️ 批量删除")
        .default_open(false)
        .show(ui, |ui: &mut Ui| bulk_delete(ui, state));
}

fn bulk_delete(ui: &mut Ui, state: &mut AppState) {
    ui.label("选择要删除的学生");
    let names: Vec<String> = state
        .visible_indices
        .iter()
        .filter_map(|&i| state.roster.get(i))
        .map(|r| r.name.clone())
        .collect();

    ScrollArea::vertical()
        .max_height(200.0)
        .show(ui, |ui: &mut Ui| {
            // Duplicate names share one checkbox.
            let mut seen = BTreeSet::new();
            for name in names.iter().filter(|n| seen.insert(n.as_str())) {
                let mut checked = state.delete_selection.contains(name);
                if ui.checkbox(&mut checked, name).changed() {
                    state.toggle_delete(name);
                }
            }
        });

    let can_delete = !state.delete_selection.is_empty();
    if ui
        .add_enabled(can_delete, egui::Button::new("确认删除"))
        .clicked()
    {
        state.confirm_delete();
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – fixed queries over the full roster
// ---------------------------------------------------------------------------

pub fn answers_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("📝 作业答案");
    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.columns(3, |cols| {
            cols[0].strong("低于及格分数的学生");
            record_table(
                &mut cols[0],
                "failing_table",
                &state.roster,
                &failing(&state.roster),
                180.0,
                false,
            );

            cols[1].strong("最高分学生");
            record_table(
                &mut cols[1],
                "top_table",
                &state.roster,
                &top_scorers(&state.roster, 1),
                180.0,
                false,
            );

            cols[2].strong("分班成绩排序");
            record_table(
                &mut cols[2],
                "class_sorted_table",
                &state.roster,
                &sort_all(&state.roster),
                180.0,
                false,
            );
        });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(&state.config.window_title);
        ui.separator();
        ui.label(format!(
            "{} 名学生, {} 名显示中",
            state.roster.len(),
            state.visible_indices.len()
        ));

        match &state.status_message {
            Some(StatusMessage::Info(msg)) => {
                ui.separator();
                ui.label(msg);
            }
            Some(StatusMessage::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState, format: ExportFormat) {
    let file_name = match format {
        ExportFormat::Xlsx => state.config.export_file_name.clone(),
        ExportFormat::Csv => state.config.csv_file_name.clone(),
    };
    let file = rfd::FileDialog::new()
        .set_title("导出成绩数据")
        .set_file_name(&file_name)
        .add_filter(format.filter_name(), &[format.extension()])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path, format);
    }
}
