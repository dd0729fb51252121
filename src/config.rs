//! Serializable encoder configuration.
//!
//! ```json
//! { "kind": "poisson", "time": 250, "dt": 0.5, "approx": true }
//! ```
//!
//! Omitted knobs take the usual defaults: `dt = 1.0`, `sparsity = 0.5`,
//! `max_prob = 1.0`, `approx = false`. Nothing is validated until
//! [`EncoderConfig::build`].

use serde::{Deserialize, Serialize};

use crate::encoder::Encoder;
use crate::error::Result;
use crate::transform::PoissonMode;

pub const DEFAULT_DT: f64 = 1.0;
pub const DEFAULT_SPARSITY: f32 = 0.5;
pub const DEFAULT_MAX_PROB: f32 = 1.0;

fn default_dt() -> f64 {
    DEFAULT_DT
}

fn default_sparsity() -> f32 {
    DEFAULT_SPARSITY
}

fn default_max_prob() -> f32 {
    DEFAULT_MAX_PROB
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncoderConfig {
    Null,
    Single {
        time: f64,
        #[serde(default = "default_dt")]
        dt: f64,
        #[serde(default = "default_sparsity")]
        sparsity: f32,
    },
    Repeat {
        time: f64,
        #[serde(default = "default_dt")]
        dt: f64,
    },
    Bernoulli {
        time: f64,
        #[serde(default = "default_dt")]
        dt: f64,
        #[serde(default = "default_max_prob")]
        max_prob: f32,
    },
    Poisson {
        time: f64,
        #[serde(default = "default_dt")]
        dt: f64,
        #[serde(default)]
        approx: bool,
    },
    RankOrder {
        time: f64,
        #[serde(default = "default_dt")]
        dt: f64,
    },
}

impl EncoderConfig {
    /// Validate and bind into an [`Encoder`].
    pub fn build(&self) -> Result<Encoder> {
        match *self {
            Self::Null => Ok(Encoder::Null),
            Self::Single { time, dt, sparsity } => Encoder::single(time, dt, sparsity),
            Self::Repeat { time, dt } => Encoder::repeat(time, dt),
            Self::Bernoulli { time, dt, max_prob } => Encoder::bernoulli(time, dt, max_prob),
            Self::Poisson { time, dt, approx } => {
                let mode = if approx { PoissonMode::Approx } else { PoissonMode::Exact };
                Encoder::poisson(time, dt, mode)
            }
            Self::RankOrder { time, dt } => Encoder::rank_order(time, dt),
        }
    }
}

impl From<&Encoder> for EncoderConfig {
    fn from(encoder: &Encoder) -> Self {
        match *encoder {
            Encoder::Null => Self::Null,
            Encoder::Single(p) => Self::Single {
                time: p.horizon.time(),
                dt: p.horizon.dt(),
                sparsity: p.sparsity,
            },
            Encoder::Repeat(p) => Self::Repeat { time: p.horizon.time(), dt: p.horizon.dt() },
            Encoder::Bernoulli(p) => Self::Bernoulli {
                time: p.horizon.time(),
                dt: p.horizon.dt(),
                max_prob: p.max_prob,
            },
            Encoder::Poisson(p) => Self::Poisson {
                time: p.horizon.time(),
                dt: p.horizon.dt(),
                approx: p.mode == PoissonMode::Approx,
            },
            Encoder::RankOrder(p) => Self::RankOrder { time: p.horizon.time(), dt: p.horizon.dt() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncoderKind;
    use crate::error::EncodeError;

    #[test]
    fn defaults_fill_omitted_knobs() {
        let cfg: EncoderConfig = serde_json::from_str(r#"{"kind": "single", "time": 20}"#).unwrap();
        assert_eq!(cfg, EncoderConfig::Single { time: 20.0, dt: 1.0, sparsity: 0.5 });

        let cfg: EncoderConfig = serde_json::from_str(r#"{"kind": "bernoulli", "time": 5}"#).unwrap();
        assert_eq!(cfg, EncoderConfig::Bernoulli { time: 5.0, dt: 1.0, max_prob: 1.0 });
    }

    #[test]
    fn poisson_approx_flag_selects_mode() {
        let cfg: EncoderConfig =
            serde_json::from_str(r#"{"kind": "poisson", "time": 250, "dt": 0.5, "approx": true}"#).unwrap();
        let enc = cfg.build().unwrap();
        assert_eq!(enc.num_steps(), Some(500));
        match enc {
            Encoder::Poisson(p) => assert_eq!(p.mode, PoissonMode::Approx),
            other => panic!("expected poisson, got {other:?}"),
        }
    }

    #[test]
    fn approx_must_be_boolean() {
        let parsed: std::result::Result<EncoderConfig, _> =
            serde_json::from_str(r#"{"kind": "poisson", "time": 10, "approx": "yes"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn build_validates() {
        let cfg = EncoderConfig::Bernoulli { time: 10.0, dt: 1.0, max_prob: 2.0 };
        assert!(matches!(cfg.build(), Err(EncodeError::InvalidMaxProb(_))));
        assert_eq!(EncoderConfig::Null.build().unwrap().kind(), EncoderKind::Null);
    }

    #[test]
    fn encoder_round_trips_through_config() {
        let enc = Encoder::rank_order(30.0, 1.5).unwrap();
        let json = serde_json::to_string(&EncoderConfig::from(&enc)).unwrap();
        let back: EncoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.build().unwrap(), enc);
    }
}
