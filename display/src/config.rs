use std::time::Duration;

use crate::AssetMap;

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Pause between preparing the incoming layer and starting the fade.
    pub fade_delay: Duration,
    pub fade_duration: Duration,
    /// How long a touch override lasts.
    pub touch_revert: Duration,
    /// Render a mood suppressed by a modal once the last modal closes.
    pub replay_pending_on_close: bool,
    pub assets: AssetMap,
}

impl DisplayConfig {
    pub const FADE_DELAY: Duration = Duration::from_millis(50);
    pub const FADE_DURATION: Duration = Duration::from_millis(700);
    pub const TOUCH_REVERT: Duration = Duration::from_secs(2);
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fade_delay: Self::FADE_DELAY,
            fade_duration: Self::FADE_DURATION,
            touch_revert: Self::TOUCH_REVERT,
            replay_pending_on_close: false,
            assets: AssetMap::default(),
        }
    }
}
