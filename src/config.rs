use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::Fps;
use crate::foundation::error::{RevealError, RevealResult};
use crate::reveal::strategy::{RevealOpts, StrategyKind};
use crate::reveal::threshold::DEFAULT_FADE_WINDOW;

/// JSON-facing reveal configuration.
///
/// Every field is optional in the file; missing fields take the defaults below.
///
/// ```json
/// { "strategy": "scatter_delay", "duration_ms": 4000, "seed": 7 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Reveal algorithm.
    pub strategy: StrategyKind,
    /// Run duration in milliseconds.
    pub duration_ms: u64,
    /// Threshold fade band in normalized progress.
    pub fade_window: f64,
    /// Scatter shuffle seed; omitted means a fresh shuffle per run.
    pub seed: Option<u64>,
    /// Tick rate of the offline driver.
    pub fps: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::ThresholdFade,
            duration_ms: 3000,
            fade_window: DEFAULT_FADE_WINDOW,
            seed: None,
            fps: 60,
        }
    }
}

impl RevealConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> RevealResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| RevealError::serde(format!("parse reveal config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RevealResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RevealError::validation(format!("open reveal config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check ranges the types cannot express.
    pub fn validate(&self) -> RevealResult<()> {
        self.opts().validate()?;
        self.fps()?;
        Ok(())
    }

    /// Per-run options derived from this configuration.
    pub fn opts(&self) -> RevealOpts {
        RevealOpts {
            strategy: self.strategy,
            duration: Duration::from_millis(self.duration_ms),
            fade_window: self.fade_window,
            seed: self.seed,
        }
    }

    /// Offline driver tick rate.
    pub fn fps(&self) -> RevealResult<Fps> {
        Fps::new(self.fps, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = RevealConfig::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(cfg, RevealConfig::default());
        cfg.validate().unwrap();
        assert_eq!(cfg.opts().duration, Duration::from_millis(3000));
    }

    #[test]
    fn parses_strategy_and_seed() {
        let cfg = RevealConfig::from_reader(
            r#"{ "strategy": "scatter_delay", "duration_ms": 4000, "seed": 7 }"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(cfg.strategy, StrategyKind::ScatterDelay);
        assert_eq!(cfg.opts().seed, Some(7));
        assert_eq!(cfg.opts().duration, Duration::from_millis(4000));
    }

    #[test]
    fn rejects_unknown_fields_and_bad_ranges() {
        assert!(RevealConfig::from_reader(r#"{ "speed": 2 }"#.as_bytes()).is_err());

        let cfg = RevealConfig {
            duration_ms: 0,
            ..RevealConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = RevealConfig {
            fps: 0,
            ..RevealConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = RevealConfig {
            fade_window: 0.0,
            ..RevealConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
