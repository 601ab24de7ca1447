//! Fire-and-forget sound triggers; playback problems never reach the game loop

use log::{debug, warn};
use macroquad::audio::{load_sound, play_sound_once, Sound};

const COLLISION_SOUND_PATH: &str = "assets/crash.ogg";
const FOOD_EATEN_SOUND_PATH: &str = "assets/food_eaten.ogg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Collision,
    FoodEaten,
}

pub struct SoundBank {
    collision: Option<Sound>,
    food_eaten: Option<Sound>,
}

impl SoundBank {
    /// Loads the session sounds. A missing or unreadable asset downgrades
    /// that trigger to silence instead of failing startup.
    pub async fn load() -> Self {
        Self {
            collision: Self::try_load(COLLISION_SOUND_PATH).await,
            food_eaten: Self::try_load(FOOD_EATEN_SOUND_PATH).await,
        }
    }

    async fn try_load(path: &str) -> Option<Sound> {
        match load_sound(path).await {
            Ok(sound) => Some(sound),
            Err(e) => {
                warn!("failed to load sound {}: {}", path, e);
                None
            }
        }
    }

    pub fn play(&self, kind: SoundKind) {
        let sound = match kind {
            SoundKind::Collision => &self.collision,
            SoundKind::FoodEaten => &self.food_eaten,
        };

        match sound {
            Some(sound) => play_sound_once(sound),
            None => debug!("sound {:?} not loaded, skipping playback", kind),
        }
    }
}
