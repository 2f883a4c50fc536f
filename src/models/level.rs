use serde::{Deserialize, Serialize};

use crate::domain::TimeframeRole;

/// One horizontal price line for the renderer: a zone top or bottom tagged with its timeframe role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: f64,
    pub role: TimeframeRole,
}

impl Level {
    pub fn color(&self) -> &'static str {
        self.role.overlay_color()
    }
}
