use serde::Deserialize;
use std::path::PathBuf;

use crate::chart::generate::GenerateParams;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SongMeta {
    pub id: String,
    pub title: String,
    pub bpm: f64,
    /// Seconds.
    pub duration: f64,
    pub audio: PathBuf,
    #[serde(default)]
    pub offset_ms: f64,
}

impl SongMeta {
    fn builtin(id: &str, title: &str, bpm: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            bpm,
            duration,
            audio: PathBuf::from("audio").join(format!("{}.mp3", id)),
            offset_ms: 0.0,
        }
    }

    pub fn generate_params(
        &self,
        duration_sec: f64,
        density_nps: Option<f64>,
        scratch_ratio: Option<f64>,
    ) -> GenerateParams {
        GenerateParams {
            song_id: self.id.clone(),
            bpm: self.bpm,
            duration_sec,
            density_nps,
            scratch_ratio,
        }
    }
}

pub struct Catalog {
    songs: Vec<SongMeta>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            songs: vec![
                SongMeta::builtin("pop-spark", "Pop Spark", 140.0, 120.0),
                SongMeta::builtin("neon-groove", "Neon Groove", 128.0, 90.0),
            ],
        }
    }

    /// Built-in songs plus configured ones; a configured song replaces a
    /// built-in with the same id.
    pub fn with_extra(extra: Vec<SongMeta>) -> Self {
        let mut catalog = Self::builtin();
        for song in extra {
            match catalog.songs.iter_mut().find(|s| s.id == song.id) {
                Some(existing) => *existing = song,
                None => catalog.songs.push(song),
            }
        }
        catalog
    }

    pub fn songs(&self) -> &[SongMeta] {
        &self.songs
    }

    pub fn get(&self, id: &str) -> Result<&SongMeta> {
        self.songs
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::UnknownSong(id.to_string()))
    }
}
