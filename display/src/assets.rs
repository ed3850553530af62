use net::MoodLabel;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maps each mood to the picture shown for it.
#[derive(Debug, Clone)]
pub struct AssetMap {
    base_dir: PathBuf,
    check_exists: bool,
}

impl AssetMap {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            check_exists: false,
        }
    }

    /// Verify files on disk before using them.
    pub fn checked(mut self) -> Self {
        self.check_exists = true;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn file_name(mood: MoodLabel) -> &'static str {
        match mood {
            MoodLabel::Happy | MoodLabel::Smart | MoodLabel::Neutral => "happy_plant.jpeg",
            MoodLabel::Thirsty => "plant_thirsty.jpeg",
            MoodLabel::Sad | MoodLabel::Overwatered | MoodLabel::LowLight => "plant_in_dark.jpeg",
            MoodLabel::HighLight => "plant_enjoying_sun.jpeg",
            MoodLabel::Touched => "plant_touched.jpeg",
            MoodLabel::Cold => "plant_cold.jpeg",
            MoodLabel::Hot => "plant_hot.jpeg",
        }
    }

    pub fn path(&self, mood: MoodLabel) -> PathBuf {
        self.base_dir.join(Self::file_name(mood))
    }

    /// The asset to show for `mood`.
    ///
    /// When checking is on, a missing file falls back to the neutral asset
    /// and `None` means not even that exists.
    pub fn resolve(&self, mood: MoodLabel) -> Option<PathBuf> {
        let path = self.path(mood);
        if !self.check_exists || path.exists() {
            return Some(path);
        }
        let neutral = self.path(MoodLabel::Neutral);
        if neutral.exists() {
            warn!(%mood, path = %path.display(), "asset missing, using neutral");
            Some(neutral)
        } else {
            warn!(%mood, path = %path.display(), "asset and neutral fallback both missing");
            None
        }
    }
}

impl Default for AssetMap {
    fn default() -> Self {
        Self::new("assets")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_pictures() {
        let map = AssetMap::new("/img");
        assert_eq!(map.path(MoodLabel::Smart), map.path(MoodLabel::Happy));
        assert_eq!(map.path(MoodLabel::LowLight), PathBuf::from("/img/plant_in_dark.jpeg"));
    }

    #[test]
    fn unchecked_map_trusts_paths() {
        let map = AssetMap::new("/definitely/not/here");
        assert!(map.resolve(MoodLabel::Hot).is_some());
    }

    #[test]
    fn checked_map_falls_back_then_gives_up() {
        let dir = std::env::temp_dir().join(format!("plant-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let map = AssetMap::new(&dir).checked();
        assert_eq!(map.resolve(MoodLabel::Cold), None);

        std::fs::write(dir.join("happy_plant.jpeg"), b"jpeg").unwrap();
        assert_eq!(map.resolve(MoodLabel::Cold), Some(dir.join("happy_plant.jpeg")));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
