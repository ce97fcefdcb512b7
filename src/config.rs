use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::song::SongMeta;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gen: GenConfig,
    #[serde(default)]
    pub play: PlayConfig,
    #[serde(default)]
    pub songs: Vec<SongMeta>,
}

#[derive(Debug, Deserialize)]
pub struct GenConfig {
    #[serde(default = "default_density_nps")]
    pub density_nps: f64,
    #[serde(default = "default_scratch_ratio")]
    pub scratch_ratio: f64,
}

#[derive(Debug, Deserialize)]
pub struct PlayConfig {
    /// Calibration offset added to the play clock.
    #[serde(default)]
    pub offset_ms: f64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            density_nps: default_density_nps(),
            scratch_ratio: default_scratch_ratio(),
        }
    }
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            offset_ms: 0.0,
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_density_nps() -> f64 { 4.0 }
fn default_scratch_ratio() -> f64 { 0.06 }
fn default_tick_ms() -> f64 { 16.0 }

/// Explicit path, else `djrp.toml`, else the user config locations.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("djrp.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("djrp").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("djrp").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Invalid config {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.gen.density_nps, 4.0);
        assert_eq!(cfg.gen.scratch_ratio, 0.06);
        assert_eq!(cfg.play.offset_ms, 0.0);
        assert_eq!(cfg.play.tick_ms, 16.0);
        assert!(cfg.songs.is_empty());
    }

    #[test]
    fn parses_sections_and_songs() {
        let cfg: Config = toml::from_str(
            r#"
            [gen]
            density_nps = 6.5

            [play]
            offset_ms = -24

            [[songs]]
            id = "night-drive"
            title = "Night Drive"
            bpm = 174
            duration = 95.5
            audio = "audio/night-drive.ogg"
            offset_ms = 8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gen.density_nps, 6.5);
        assert_eq!(cfg.gen.scratch_ratio, 0.06);
        assert_eq!(cfg.play.offset_ms, -24.0);
        assert_eq!(cfg.songs.len(), 1);
        assert_eq!(cfg.songs[0].bpm, 174.0);
        assert_eq!(cfg.songs[0].audio, PathBuf::from("audio/night-drive.ogg"));
    }

    #[test]
    fn missing_file_loads_nothing() {
        assert!(load_config(Path::new("/no/such/djrp.toml")).is_none());
    }
}
