use crate::config::generation::{OverlayConfig, OverlaySource};
use crate::config::ConfigError;
use crate::core::cell::Ground;
use crate::core::params::{check_percent, resolve_frequency};
use crate::core::random::RandomSource;

/// 合成覆盖层（已解析）
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub key: String,
    pub source: LayerSource,
    pub rule: OverlayRule,
}

/// 二值覆盖层的来源（频率已解析为具体值）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerSource {
    Noise { frequency: f64, threshold: f64 },
    Percent { percent: u32 },
}

/// 覆盖规则：只改写恰好为 `open` 的陆地格；覆盖层 0 → `clear`，1 → `claimed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRule {
    pub open: Ground,
    pub clear: Ground,
    pub claimed: Ground,
}

pub fn build_overlay_layers(
    configs: &[OverlayConfig],
    rng: &mut RandomSource,
) -> Result<Vec<OverlayLayer>, ConfigError> {
    let mut layers = Vec::with_capacity(configs.len());

    for config in configs.iter().filter(|c| c.enabled) {
        let source = match config.source {
            OverlaySource::Noise {
                frequency,
                threshold,
            } => {
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(ConfigError::InvalidValue {
                        field: format!("overlays.{}.threshold", config.key),
                        detail: format!("{threshold} 超出 [0, 1]"),
                    });
                }
                let frequency = resolve_frequency(
                    &format!("overlays.{}.frequency", config.key),
                    &frequency,
                    rng,
                )?;
                LayerSource::Noise {
                    frequency,
                    threshold,
                }
            }
            OverlaySource::Percent { percent } => {
                check_percent(&format!("overlays.{}.percent", config.key), percent, 100)?;
                LayerSource::Percent { percent }
            }
        };

        layers.push(OverlayLayer {
            key: config.key.clone(),
            source,
            rule: OverlayRule {
                open: config.open,
                clear: config.clear,
                claimed: config.claimed,
            },
        });
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::generation::FrequencyConfig;

    fn overlay(key: &str, source: OverlaySource, enabled: bool) -> OverlayConfig {
        OverlayConfig {
            key: key.to_string(),
            source,
            open: Ground::Clear,
            clear: Ground::Clear,
            claimed: Ground::Grove,
            enabled,
        }
    }

    #[test]
    fn disabled_layers_are_skipped_and_order_kept() {
        let configs = vec![
            overlay("a", OverlaySource::Percent { percent: 10 }, true),
            overlay("b", OverlaySource::Percent { percent: 20 }, false),
            overlay(
                "c",
                OverlaySource::Noise {
                    frequency: FrequencyConfig::default(),
                    threshold: 0.5,
                },
                true,
            ),
        ];
        let mut rng = RandomSource::from_seed(0);
        let layers = build_overlay_layers(&configs, &mut rng).unwrap();
        let keys: Vec<_> = layers.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(
            layers[1].source,
            LayerSource::Noise {
                frequency: 0.05,
                threshold: 0.5
            }
        );
    }

    #[test]
    fn bad_percent_and_threshold_rejected() {
        let mut rng = RandomSource::from_seed(0);
        let bad_percent = [overlay("a", OverlaySource::Percent { percent: 150 }, true)];
        assert!(build_overlay_layers(&bad_percent, &mut rng).is_err());

        let bad_threshold = [overlay(
            "b",
            OverlaySource::Noise {
                frequency: FrequencyConfig::default(),
                threshold: 1.5,
            },
            true,
        )];
        assert!(build_overlay_layers(&bad_threshold, &mut rng).is_err());
    }
}
