use crate::CONFY_APP_NAME;

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Caller-supplied knobs for one import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Joint influences kept per vertex after reduction/padding.
    pub max_weights: usize,
    /// Rotate the authoring tool's Z-up space into Y-up.
    pub correct_up_axis: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_weights: 3,
            correct_up_axis: true,
        }
    }
}

impl ImportSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "import").unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf, confy::ConfyError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), confy::ConfyError> {
        confy::store_path(path, self)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    pub fn config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(CONFY_APP_NAME, "import")
    }

    /// Quarter turn about +X taking (0, 0, 1) to (0, 1, 0), or identity.
    pub fn correction_matrix(&self) -> glm::Mat4 {
        if self.correct_up_axis {
            glm::rotation(-std::f32::consts::FRAC_PI_2, &glm::vec3(1.0, 0.0, 0.0))
        } else {
            glm::Mat4::identity()
        }
    }
}
