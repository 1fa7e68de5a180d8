// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation configuration.
//!
//! Hosts either embed [`ReconcileConfig`] in their own serde config or load it
//! from `IFC_VIEWPORT_*` environment variables. Unset or unparsable variables
//! fall back to the defaults. Both paths end in [`ReconcileConfig::validated`],
//! which [`Reconciler::new`](crate::Reconciler::new) also applies.

use ifc_viewport_scene::camera::{DEFAULT_FAR, DEFAULT_NEAR};
use serde::{Deserialize, Serialize};

use crate::sanitize::SanitizePolicy;

/// Visual margin around the fitted model
pub const DEFAULT_PADDING_FACTOR: f64 = 1.5;
/// Camera position used when there is nothing to frame
pub const FALLBACK_POSITION: [f64; 3] = [10.0, 10.0, 10.0];

/// Tuning for the reconciliation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Multiplier on the fitting distance (> 0)
    pub padding_factor: f64,
    /// Fallback camera position when the model is empty or zero-size
    pub fallback_position: [f64; 3],
    /// Fallback look-at target
    pub fallback_target: [f64; 3],
    /// Near plane used for the fallback frame
    pub default_near: f64,
    /// Far plane used for the fallback frame
    pub default_far: f64,
    /// Lower bound of the recommended near plane
    pub min_near: f64,
    /// Lower bound of the recommended far plane
    pub min_far: f64,
    pub sanitize: SanitizePolicy,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            padding_factor: DEFAULT_PADDING_FACTOR,
            fallback_position: FALLBACK_POSITION,
            fallback_target: [0.0, 0.0, 0.0],
            default_near: DEFAULT_NEAR,
            default_far: DEFAULT_FAR,
            min_near: DEFAULT_NEAR,
            min_far: DEFAULT_FAR,
            sanitize: SanitizePolicy::default(),
        }
    }
}

impl ReconcileConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |key: &str, default: f64| -> f64 {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(default)
        };
        let flag = |key: &str, default: bool| -> bool {
            lookup(key)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };
        let triple = |key: &str, default: [f64; 3]| -> [f64; 3] {
            lookup(key).and_then(|v| parse_triple(&v)).unwrap_or(default)
        };

        let policy = defaults.sanitize;
        Self {
            padding_factor: number("IFC_VIEWPORT_PADDING_FACTOR", defaults.padding_factor),
            fallback_position: triple("IFC_VIEWPORT_FALLBACK_POSITION", defaults.fallback_position),
            fallback_target: triple("IFC_VIEWPORT_FALLBACK_TARGET", defaults.fallback_target),
            default_near: number("IFC_VIEWPORT_DEFAULT_NEAR", defaults.default_near),
            default_far: number("IFC_VIEWPORT_DEFAULT_FAR", defaults.default_far),
            min_near: number("IFC_VIEWPORT_MIN_NEAR", defaults.min_near),
            min_far: number("IFC_VIEWPORT_MIN_FAR", defaults.min_far),
            sanitize: SanitizePolicy {
                restore_opacity: flag("IFC_VIEWPORT_RESTORE_OPACITY", policy.restore_opacity),
                double_side: flag("IFC_VIEWPORT_DOUBLE_SIDE", policy.double_side),
                replace_black: flag("IFC_VIEWPORT_REPLACE_BLACK", policy.replace_black),
                force_visible: flag("IFC_VIEWPORT_FORCE_VISIBLE", policy.force_visible),
                replacement_color: policy.replacement_color,
            },
        }
        .validated()
    }

    /// Replaces out-of-range values with their defaults.
    ///
    /// Distances and the padding factor must be finite and positive, the far
    /// planes must lie beyond their near planes and the fallback points must
    /// be finite. Deserialized configs are not checked until this runs.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f64, default: f64, name: &str| -> f64 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                tracing::warn!(name, value, default, "Invalid reconcile setting, using default");
                default
            }
        };
        let point = |value: [f64; 3], default: [f64; 3], name: &str| -> [f64; 3] {
            if value.iter().all(|c| c.is_finite()) {
                value
            } else {
                tracing::warn!(name, ?value, "Invalid reconcile setting, using default");
                default
            }
        };

        let mut config = Self {
            padding_factor: positive(self.padding_factor, defaults.padding_factor, "padding_factor"),
            fallback_position: point(self.fallback_position, defaults.fallback_position, "fallback_position"),
            fallback_target: point(self.fallback_target, defaults.fallback_target, "fallback_target"),
            default_near: positive(self.default_near, defaults.default_near, "default_near"),
            default_far: positive(self.default_far, defaults.default_far, "default_far"),
            min_near: positive(self.min_near, defaults.min_near, "min_near"),
            min_far: positive(self.min_far, defaults.min_far, "min_far"),
            sanitize: self.sanitize,
        };
        if config.default_far <= config.default_near {
            tracing::warn!(
                near = config.default_near,
                far = config.default_far,
                "Fallback far plane not beyond near plane, using defaults"
            );
            config.default_near = defaults.default_near;
            config.default_far = defaults.default_far;
        }
        if config.min_far <= config.min_near {
            tracing::warn!(
                near = config.min_near,
                far = config.min_far,
                "Minimum far plane not beyond minimum near plane, using defaults"
            );
            config.min_near = defaults.min_near;
            config.min_far = defaults.min_far;
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses `"x,y,z"`
fn parse_triple(value: &str) -> Option<[f64; 3]> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => Some([*x, *y, *z]),
        _ => None,
    }
}
