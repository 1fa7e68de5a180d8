// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material state attached to geometry nodes.
//!
//! Loaders deliver materials as loosely typed bags where any field may be
//! missing. [`RawMaterial`] captures that shape; converting it into a
//! [`MaterialState`] validates it once, after which every channel is either
//! present with a sane value or absent because the [`MaterialKind`] cannot
//! carry it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which faces of a triangle are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSide {
    /// Only faces whose normal points toward the camera
    #[default]
    Front,
    /// Only faces whose normal points away from the camera
    Back,
    /// Both sides
    Double,
}

/// Linear RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    /// Neutral mid-gray used to replace pure black
    pub const NEUTRAL_GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// All three channels exactly zero
    #[inline]
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    fn validated(components: [f32; 3]) -> Result<Self> {
        for c in components {
            if !(0.0..=1.0).contains(&c) {
                return Err(Error::InvalidColor(c));
            }
        }
        Ok(Rgb::new(components[0], components[1], components[2]))
    }
}

/// Material kinds the viewer renders, and which channels each carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Physically based, lit
    #[default]
    Standard,
    /// Lambertian, lit
    Lambert,
    /// Unlit flat color
    Basic,
    /// Line segments (no faces)
    Line,
    /// Point sprites (no faces)
    Points,
    /// Custom shader; color lives in uniforms the viewer does not interpret
    Shader,
}

impl MaterialKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Standard => "standard",
            MaterialKind::Lambert => "lambert",
            MaterialKind::Basic => "basic",
            MaterialKind::Line => "line",
            MaterialKind::Points => "points",
            MaterialKind::Shader => "shader",
        }
    }

    /// Whether the kind has a base color channel
    pub fn has_color(&self) -> bool {
        !matches!(self, MaterialKind::Shader)
    }

    /// Whether the kind rasterizes triangles (and so has a face side)
    pub fn has_faces(&self) -> bool {
        !matches!(self, MaterialKind::Line | MaterialKind::Points)
    }
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-material rendering attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialState {
    pub kind: MaterialKind,
    pub visible: bool,
    /// `0.0..=1.0`
    pub opacity: f32,
    pub transparent: bool,
    /// Ignored for kinds without faces
    pub side: FaceSide,
    /// `None` for kinds without a color channel
    pub color: Option<Rgb>,
    /// Set when the renderer must rebuild its state for this material
    pub needs_update: bool,
}

impl MaterialState {
    /// Opaque, visible, front-sided material of the given kind (white when
    /// the kind has a color channel)
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            visible: true,
            opacity: 1.0,
            transparent: false,
            side: FaceSide::Front,
            color: kind.has_color().then_some(Rgb::WHITE),
            needs_update: false,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        if self.kind.has_color() {
            self.color = Some(color);
        }
        self
    }

    pub fn with_opacity(mut self, opacity: f32, transparent: bool) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = transparent;
        self
    }

    pub fn with_side(mut self, side: FaceSide) -> Self {
        self.side = side;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

impl Default for MaterialState {
    fn default() -> Self {
        Self::new(MaterialKind::default())
    }
}

/// Material as delivered by a loader: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMaterial {
    pub kind: Option<MaterialKind>,
    pub visible: Option<bool>,
    pub opacity: Option<f32>,
    pub transparent: Option<bool>,
    pub side: Option<FaceSide>,
    pub color: Option<[f32; 3]>,
}

impl TryFrom<RawMaterial> for MaterialState {
    type Error = Error;

    fn try_from(raw: RawMaterial) -> Result<Self> {
        let kind = raw.kind.unwrap_or_default();
        let mut state = MaterialState::new(kind);

        if let Some(visible) = raw.visible {
            state.visible = visible;
        }
        if let Some(opacity) = raw.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(Error::InvalidOpacity(opacity));
            }
            state.opacity = opacity;
        }
        if let Some(transparent) = raw.transparent {
            state.transparent = transparent;
        }
        if let Some(side) = raw.side {
            if !kind.has_faces() {
                return Err(Error::UnsupportedChannel {
                    kind: kind.as_str(),
                    channel: "side",
                });
            }
            state.side = side;
        }
        if let Some(color) = raw.color {
            if !kind.has_color() {
                return Err(Error::UnsupportedChannel {
                    kind: kind.as_str(),
                    channel: "color",
                });
            }
            state.color = Some(Rgb::validated(color)?);
        }

        Ok(state)
    }
}
