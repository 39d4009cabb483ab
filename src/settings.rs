//! User settings and preferences
//!
//! Persisted in LocalStorage. Holds presentation choices and an optional
//! tuning override; never simulation state.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_BLOBS;
use crate::sim::SimConfig;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Fraction of device pixels the field is evaluated at
    pub fn render_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 0.75,
            QualityPreset::High => 1.0,
        }
    }

    /// Blob count for this preset
    pub fn blob_count(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => MAX_BLOBS,
            QualityPreset::High => MAX_BLOBS,
        }
    }
}

/// User settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Number of blobs to spawn (capped at `MAX_BLOBS`)
    pub blob_count: usize,
    /// Show FPS counter
    pub show_fps: bool,
    /// Motion tuning override; `None` uses the built-in defaults
    #[serde(default)]
    pub sim: Option<SimConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            blob_count: QualityPreset::Medium.blob_count(),
            show_fps: true,
            sim: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.blob_count = preset.blob_count();
    }

    /// Blob count clamped to the renderer's capacity
    pub fn effective_blob_count(&self) -> usize {
        self.blob_count.min(MAX_BLOBS)
    }

    /// Tuning to run with; an invalid override falls back to defaults
    pub fn sim_config(&self) -> SimConfig {
        match self.sim {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    log::warn!("Ignoring saved sim config: {}", e);
                    SimConfig::default()
                }
            },
            None => SimConfig::default(),
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "quicksilver_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
