use serde::{Deserialize, Serialize};

/// Repacking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepackConfig {
    /// Pixels between placed sprites and around the composite edge.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Canvas over-allocation factor applied to the summed sprite area before
    /// the initial square canvas estimate. Must lie in [1.1, 1.3].
    #[serde(default = "default_slack")]
    pub slack: f64,
    /// Optional maximum canvas dimension. Sprites that cannot fit a capped
    /// canvas are skipped rather than failing the batch.
    #[serde(default)]
    pub max_dim: Option<u32>,
    /// Allow 90-degree rotations for sprites that only fit rotated.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
}

impl Default for RepackConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            slack: default_slack(),
            max_dim: None,
            allow_rotation: default_allow_rotation(),
        }
    }
}

impl RepackConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::RepackError;

        if !(1.1..=1.3).contains(&self.slack) {
            return Err(RepackError::InvalidConfig(format!(
                "slack ({}) must lie in [1.1, 1.3]",
                self.slack
            )));
        }
        if let Some(dim) = self.max_dim {
            if dim == 0 {
                return Err(RepackError::InvalidConfig("max_dim must be non-zero".into()));
            }
            if self.padding.saturating_mul(2) >= dim {
                return Err(RepackError::InvalidConfig(format!(
                    "padding ({}) leaves no usable space within max_dim ({})",
                    self.padding, dim
                )));
            }
        }
        Ok(())
    }

    /// Create a fluent builder for `RepackConfig`.
    pub fn builder() -> RepackConfigBuilder {
        RepackConfigBuilder::new()
    }
}

fn default_padding() -> u32 {
    2
}
fn default_slack() -> f64 {
    1.3
}
fn default_allow_rotation() -> bool {
    true
}

/// Builder for `RepackConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct RepackConfigBuilder {
    cfg: RepackConfig,
}

impl RepackConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: RepackConfig::default(),
        }
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn slack(mut self, v: f64) -> Self {
        self.cfg.slack = v;
        self
    }
    pub fn max_dim(mut self, v: Option<u32>) -> Self {
        self.cfg.max_dim = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn build(self) -> RepackConfig {
        self.cfg
    }
}
