//! Tunable limits for descriptor building and validation.

use serde::{Deserialize, Serialize};

use crate::recursion::RecursionProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Maximum nesting of value validation (containers, record fields,
    /// deferred self-references).
    pub max_depth: u32,
    /// Maximum length of a chain of names resolving to one another.
    pub max_resolution_depth: u32,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: RecursionProfile::Validation.max_depth(),
            max_resolution_depth: RecursionProfile::TypeResolution.max_depth(),
        }
    }
}

impl ValidationOptions {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_resolution_depth(mut self, depth: u32) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    pub(crate) fn resolution_profile(&self) -> RecursionProfile {
        RecursionProfile::Custom {
            max_depth: self.max_resolution_depth,
            max_iterations: RecursionProfile::TypeResolution.max_iterations(),
        }
    }

    pub(crate) fn validation_profile(&self) -> RecursionProfile {
        RecursionProfile::Custom {
            max_depth: self.max_depth,
            max_iterations: RecursionProfile::Validation.max_iterations(),
        }
    }
}
