//! Persisted game aggregate and its parts.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Background theme, bought with feathers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Morning,
    Sunset,
    Night,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Morning, Theme::Sunset, Theme::Night];

    /// Price in feathers.
    pub fn cost(&self) -> u32 {
        match self {
            Theme::Morning => 0,
            Theme::Sunset => 50,
            Theme::Night => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Morning => "morning",
            Theme::Sunset => "sunset",
            Theme::Night => "night",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Morning
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

/// A falling feather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u64,
    /// Centre, in field units. y grows downward.
    pub position: Vec2,
    /// Degrees, wrapped to `0..360`.
    pub rotation: f32,
    /// Units per tick.
    pub fall_speed: f32,
    /// Degrees per tick.
    pub rotation_speed: f32,
    pub scale: f32,
    #[serde(default)]
    pub collected: bool,
    /// Ticks left before a collected feather disappears.
    #[serde(default)]
    pub despawn_in_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub score: u32,
    pub feathers_collected: u32,
    pub is_active: bool,
    /// Player centre normalized to the field, `0.0..=1.0` on both axes.
    pub player_position: Vec2,
    pub collectibles: Vec<Collectible>,
    pub theme: Theme,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            feathers_collected: 0,
            is_active: false,
            player_position: Vec2::splat(0.5),
            collectibles: Vec::new(),
            theme: Theme::default(),
        }
    }
}
