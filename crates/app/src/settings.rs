use setlist_domain::{DEFAULT_REST_ADJUSTMENT, DEFAULT_REST_TIME};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

/// Repositories return the default settings if none have been written.
#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Percentage of the maximum volume.
    pub beep_volume: u8,
    /// Duration of a rest in seconds.
    pub rest_time: u32,
    /// Seconds added or removed by the rest time buttons.
    pub rest_adjustment: u32,
}

impl Settings {
    /// Beep volume as gain between 0 and 1.
    #[must_use]
    pub fn beep_gain(&self) -> f32 {
        f32::from(self.beep_volume.min(100)) / 100.
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            beep_volume: 80,
            rest_time: DEFAULT_REST_TIME,
            rest_adjustment: DEFAULT_REST_ADJUSTMENT,
        }
    }
}
