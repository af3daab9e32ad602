use lift_storage::{Backend, Key, KeyValueStore};
use log::error;

pub trait SettingsRepository {
    fn read_settings(&self) -> Settings;
    fn write_settings(&self, settings: &Settings);
}

impl<B: Backend> SettingsRepository for KeyValueStore<B> {
    fn read_settings(&self) -> Settings {
        self.read(Key::Settings, Settings::default())
    }

    fn write_settings(&self, settings: &Settings) {
        self.write(Key::Settings, settings);
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub weight_unit: WeightUnit,
    pub theme: Theme,
    pub show_form_rating: bool,
}

impl Settings {
    #[must_use]
    pub fn format_weight(&self, weight: f32) -> String {
        format!("{weight} {}", self.weight_unit)
    }

    #[must_use]
    pub fn current_theme(&self) -> Theme {
        match self.theme {
            Theme::System => {
                let Some(window) = web_sys::window() else {
                    error!("failed to access window to determine preferred color scheme");
                    return Theme::Light;
                };
                match window.match_media("(prefers-color-scheme: dark)") {
                    Ok(Some(media_query_list)) => {
                        if media_query_list.matches() {
                            Theme::Dark
                        } else {
                            Theme::Light
                        }
                    }
                    Ok(None) => {
                        error!("failed to determine preferred color scheme");
                        Theme::Light
                    }
                    Err(_) => {
                        error!("failed to match media to determine preferred color scheme");
                        Theme::Light
                    }
                }
            }
            Theme::Light | Theme::Dark => self.theme,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Pounds,
            theme: Theme::System,
            show_form_rating: true,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    #[default]
    Pounds,
    Kilograms,
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightUnit::Pounds => write!(f, "lbs"),
            WeightUnit::Kilograms => write!(f, "kg"),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}
