use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use eframe::{App, CreationContext, Frame, egui};
use egui::{Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_aesthetix::Aesthetix;
use egui_aesthetix::themes::{NordDark, NordLight};
use egui_extras::{Column, DatePickerButton, TableBuilder};
use log::{info, warn};

mod catalog;
mod models;
mod store;

use catalog::NutritionGuide;
use models::{Category, ExerciseInfo, ProgressDraft};
use store::{ProgressStore, StoreError};

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280 as f32, 800 as f32]),
        ..Default::default()
    };

    eframe::run_native(
        "Fitness Guide",
        options,
        Box::new(|cc| Ok(Box::new(FitnessApp::new(cc)))),
    )
}

#[derive(PartialEq, Clone, Copy)]
enum Page {
    Home,
    Exercises,
    Nutrition,
    Progress,
}

struct FitnessApp {
    page: Page,
    dark_mode: bool,
    exercises: Vec<ExerciseInfo>,
    nutrition: NutritionGuide,
    expanded: HashSet<String>,
    selected_category: Option<Category>,
    store: ProgressStore,
    draft_date: NaiveDate,
    draft_weight: String,
    draft_workout: String,
    draft_notes: String,
    confirm_clear: bool,
    banner: Option<String>,
}

impl FitnessApp {
    fn new(cc: &CreationContext) -> Self {
        cc.egui_ctx.set_style(NordDark.custom_style());

        let mut store = ProgressStore::open(ProgressStore::default_path());
        let banner = match store.load() {
            Ok(count) => {
                info!("loaded {count} progress entries");
                None
            }
            Err(err @ StoreError::Corrupt { .. }) => {
                warn!("{err}");
                Some("Saved progress could not be read; starting with an empty log.".to_string())
            }
            Err(err) => {
                warn!("{err}");
                Some(
                    "Saved progress could not be opened; entries will be kept for this session only."
                        .to_string(),
                )
            }
        };

        FitnessApp {
            page: Page::Home,
            dark_mode: true,
            exercises: catalog::load_exercises(),
            nutrition: catalog::load_nutrition(),
            expanded: HashSet::new(),
            selected_category: None,
            store,
            draft_date: Local::now().date_naive(),
            draft_weight: String::new(),
            draft_workout: String::new(),
            draft_notes: String::new(),
            confirm_clear: false,
            banner,
        }
    }
}

impl App for FitnessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    ui.label(RichText::new("Fitness Guide").size(26.0).strong());
                    ui.add_space(20.0);
                    for (label, page) in [
                        ("Home", Page::Home),
                        ("Exercises", Page::Exercises),
                        ("Nutrition", Page::Nutrition),
                        ("Progress Tracker", Page::Progress),
                    ] {
                        if ui.selectable_label(self.page == page, label).clicked() {
                            self.page = page;
                        }
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let label = if self.dark_mode { "Light" } else { "Dark" };
                        if ui.button(label).clicked() {
                            self.dark_mode = !self.dark_mode;
                            apply_theme(ctx, self.dark_mode);
                        }
                    });
                });

                if let Some(message) = self.banner.clone() {
                    ui.add_space(5.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(message).color(Color32::YELLOW));
                        if ui.button("Dismiss").clicked() {
                            self.banner = None;
                        }
                    });
                }

                ui.add_space(20.0);

                match self.page {
                    Page::Home => self.show_home(ui),
                    Page::Exercises => self.show_exercises(ui),
                    Page::Nutrition => self.show_nutrition(ui),
                    Page::Progress => self.show_progress(ui),
                }
            });
        });

        if self.confirm_clear {
            self.show_clear_confirm(ctx);
        }
    }
}

impl FitnessApp {
    fn show_home(&mut self, ui: &mut Ui) {
        ui.add_space(30.0);
        ui.label(
            RichText::new("Start Your Fitness Journey")
                .heading()
                .size(40.0)
                .strong(),
        );
        ui.add_space(10.0);
        ui.label(
            RichText::new("Simple workouts, nutrition tips, and progress tracking for beginners")
                .size(20.0),
        );
        ui.add_space(15.0);
        if ui.button(RichText::new("Get Started").size(20.0).strong()).clicked() {
            self.page = Page::Exercises;
        }
        ui.add_space(40.0);

        for (title, description, target) in [
            (
                "Exercises",
                "Explore beginner-friendly workouts designed to help you build strength, endurance, and flexibility.",
                Page::Exercises,
            ),
            (
                "Nutrition",
                "Get practical nutrition advice and meal ideas to fuel your workouts and support your fitness goals.",
                Page::Nutrition,
            ),
            (
                "Progress Tracker",
                "Track your fitness journey with our simple progress tracker to stay motivated and see your improvements.",
                Page::Progress,
            ),
        ] {
            ui.group(|ui| {
                ui.label(RichText::new(title).size(24.0).strong());
                ui.label(description);
                ui.add_space(5.0);
                if ui.button("Learn More").clicked() {
                    self.page = target;
                }
            });
            ui.add_space(10.0);
        }
    }

    fn show_exercises(&mut self, ui: &mut Ui) {
        ui.label(
            RichText::new("Beginner-Friendly Exercises")
                .heading()
                .size(32.0)
                .strong(),
        );
        ui.add_space(20.0);

        ui.horizontal(|ui| {
            ui.label("Filter by:");
            egui::ComboBox::from_id_source("category_filter")
                .selected_text(match self.selected_category {
                    None => "All Exercises",
                    Some(category) => category.label(),
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.selected_category, None, "All Exercises");
                    ui.selectable_value(&mut self.selected_category, Some(Category::Cardio), "Cardio");
                    ui.selectable_value(&mut self.selected_category, Some(Category::Strength), "Strength");
                    ui.selectable_value(
                        &mut self.selected_category,
                        Some(Category::Flexibility),
                        "Flexibility",
                    );
                });
            ui.add_space(20.0);
            let count = catalog::filter_by_category(&self.exercises, self.selected_category).len();
            ui.label(RichText::new(format!("Showing {count} exercises")).weak());
        });
        ui.add_space(20.0);

        ScrollArea::vertical().show(ui, |ui| {
            for exercise in catalog::filter_by_category(&self.exercises, self.selected_category) {
                let open = self.expanded.contains(&exercise.title);
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&exercise.title).size(22.0).strong());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.label(
                                RichText::new(exercise.category.label())
                                    .color(category_color(exercise.category))
                                    .strong(),
                            );
                        });
                    });
                    ui.label(&exercise.description);
                    if open {
                        ui.add_space(5.0);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Recommended:").strong());
                            ui.label(&exercise.reps);
                        });
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Tips:").strong());
                            ui.label(&exercise.tips);
                        });
                    }
                    ui.add_space(5.0);
                    if ui
                        .button(if open { "Hide Details" } else { "View Details" })
                        .clicked()
                    {
                        if open {
                            self.expanded.remove(&exercise.title);
                        } else {
                            self.expanded.insert(exercise.title.clone());
                        }
                    }
                });
                ui.add_space(10.0);
            }
        });
    }

    fn show_nutrition(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Nutrition Guide").heading().size(32.0).strong());
        ui.add_space(20.0);

        ScrollArea::vertical().show(ui, |ui| {
            ui.label(RichText::new("Nutrition Tips").size(24.0).strong());
            ui.add_space(5.0);
            for (i, tip) in self.nutrition.tips.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("{}.", i + 1))
                            .color(Color32::BLUE)
                            .strong(),
                    );
                    ui.label(tip);
                });
            }
            ui.add_space(20.0);

            ui.label(RichText::new("Sample Meals").size(24.0).strong());
            ui.add_space(5.0);
            for meal in &self.nutrition.meals {
                ui.group(|ui| {
                    ui.label(RichText::new(&meal.meal_type).size(20.0).strong());
                    ui.label(RichText::new(&meal.title).strong());
                    ui.label(&meal.description);
                    ui.push_id(&meal.meal_type, |ui| {
                        ui.collapsing("Ingredients", |ui| {
                            for ingredient in &meal.ingredients {
                                ui.label(format!("• {ingredient}"));
                            }
                        });
                    });
                });
                ui.add_space(10.0);
            }

            ui.add_space(20.0);
            ui.label(RichText::new("Ready to Track Your Progress?").size(24.0).strong());
            ui.label("Start logging your workouts and nutrition to see your improvements over time.");
            ui.add_space(5.0);
            if ui.button("Go to Progress Tracker").clicked() {
                self.page = Page::Progress;
            }
        });
    }

    fn show_progress(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Progress Tracker").heading().size(32.0).strong());
        ui.add_space(20.0);
        ui.columns(2, |columns| {
            self.show_progress_form(&mut columns[0]);
            self.show_progress_log(&mut columns[1]);
        });
    }

    fn show_progress_form(&mut self, ui: &mut Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Log Your Progress").size(24.0).strong());
            ui.add_space(10.0);

            required_label(ui, "Date");
            ui.add(DatePickerButton::new(&mut self.draft_date));
            ui.add_space(8.0);

            required_label(ui, "Weight (kg/lbs)");
            ui.add(egui::TextEdit::singleline(&mut self.draft_weight).hint_text("Enter your weight"));
            ui.add_space(8.0);

            required_label(ui, "Workout Completed");
            ui.add(
                egui::TextEdit::singleline(&mut self.draft_workout)
                    .hint_text("e.g., Push-Ups, 3 sets of 10"),
            );
            ui.add_space(8.0);

            ui.label("Notes/Goals");
            ui.add(
                egui::TextEdit::multiline(&mut self.draft_notes)
                    .hint_text("Any notes or goals for today")
                    .desired_rows(3)
                    .char_limit(100),
            );
            ui.label(
                RichText::new(format!("{}/100 characters", self.draft_notes.chars().count()))
                    .size(12.0)
                    .weak(),
            );
            ui.add_space(10.0);

            if ui.button(RichText::new("Save Entry").strong()).clicked() {
                self.save_entry();
            }
        });
    }

    fn show_progress_log(&mut self, ui: &mut Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Your Progress").size(24.0).strong());
                if !self.store.entries().is_empty() {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button(RichText::new("Clear All").color(Color32::RED)).clicked() {
                            self.confirm_clear = true;
                        }
                    });
                }
            });
            ui.add_space(10.0);

            if self.store.entries().is_empty() {
                ui.add_space(30.0);
                ui.label(RichText::new("No entries yet. Start logging your progress!").weak());
                ui.add_space(30.0);
            } else {
                TableBuilder::new(ui)
                    .striped(true)
                    .max_scroll_height(400.0)
                    .column(Column::auto().at_least(90.0))
                    .column(Column::auto().at_least(70.0))
                    .column(Column::remainder())
                    .column(Column::remainder())
                    .header(24.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("Date");
                        });
                        header.col(|ui| {
                            ui.strong("Weight");
                        });
                        header.col(|ui| {
                            ui.strong("Workout");
                        });
                        header.col(|ui| {
                            ui.strong("Notes");
                        });
                    })
                    .body(|mut body| {
                        for entry in self.store.entries() {
                            body.row(22.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(&entry.date);
                                });
                                row.col(|ui| {
                                    ui.label(&entry.weight);
                                });
                                row.col(|ui| {
                                    ui.label(&entry.workout);
                                });
                                row.col(|ui| {
                                    ui.label(if entry.notes.is_empty() {
                                        "-"
                                    } else {
                                        entry.notes.as_str()
                                    });
                                });
                            });
                        }
                    });
            }
        });
    }

    fn show_clear_confirm(&mut self, ctx: &egui::Context) {
        egui::Window::new("Are you sure?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("This action will delete all your progress entries. This cannot be undone.");
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.confirm_clear = false;
                    }
                    if ui
                        .button(RichText::new("Yes, clear all").color(Color32::RED))
                        .clicked()
                    {
                        if let Err(err) = self.store.clear_all() {
                            warn!("clearing progress log: {err}");
                            self.banner = Some(
                                "Entries cleared for this session, but the saved log could not be rewritten."
                                    .to_string(),
                            );
                        }
                        self.confirm_clear = false;
                    }
                });
            });
    }

    fn save_entry(&mut self) {
        let draft = ProgressDraft {
            date: self.draft_date.format("%Y-%m-%d").to_string(),
            weight: self.draft_weight.clone(),
            workout: self.draft_workout.clone(),
            notes: self.draft_notes.clone(),
        };

        match self.store.submit(draft) {
            Ok(()) => {
                self.banner = None;
                self.reset_draft();
            }
            Err(StoreError::MissingField(_)) => {
                self.banner = Some("Please fill in all required fields".to_string());
            }
            Err(err) => {
                // the entry was accepted; only the disk write failed
                warn!("saving progress entry: {err}");
                self.banner =
                    Some("Entry kept for this session, but saving to disk failed.".to_string());
                self.reset_draft();
            }
        }
    }

    fn reset_draft(&mut self) {
        self.draft_date = Local::now().date_naive();
        self.draft_weight.clear();
        self.draft_workout.clear();
        self.draft_notes.clear();
    }
}

fn required_label(ui: &mut Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.label(text);
        ui.label(RichText::new("*").color(Color32::RED));
    });
}

fn category_color(category: Category) -> Color32 {
    match category {
        Category::Cardio => Color32::RED,
        Category::Strength => Color32::BLUE,
        Category::Flexibility => Color32::GREEN,
    }
}

fn apply_theme(ctx: &egui::Context, dark: bool) {
    if dark {
        ctx.set_style(NordDark.custom_style());
    } else {
        ctx.set_style(NordLight.custom_style());
    }
}
