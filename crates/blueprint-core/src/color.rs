//! Color handling for rendered diagrams.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Element styles are configured as CSS color strings
//! and validated through it before any artifact is written.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parses a CSS color string such as "#ff0000", "rgb(255, 0, 0)" or "red".
    ///
    /// # Examples
    ///
    /// ```
    /// use blueprint_core::color::Color;
    ///
    /// let person = Color::new("#08427b").unwrap();
    /// let white = Color::new("white").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the alpha (transparency) component, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the color as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let rgba = self.color.to_alpha_color::<color::Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }

    /// Returns black or white, whichever reads better on top of this color.
    pub fn contrasting_text(&self) -> Self {
        let [r, g, b, _] = self
            .color
            .convert(color::ColorSpaceTag::Srgb)
            .components;
        let luminance = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        let name = if luminance > 0.5 { "black" } else { "white" };
        Self::new(name).expect("named CSS colors always parse")
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
