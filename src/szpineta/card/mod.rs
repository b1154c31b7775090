//! # Story Cards
//!
//! Portrait PNG images of a single poem, sized for social story formats.
//!
//! [`layout`] is pure geometry: greedy word wrap and a shrinking font size search,
//! measured through the [`TextMeasure`] trait so it can be tested without a font.
//! [`raster`] draws the result with `fontdue` onto a gradient background and
//! encodes it with `image`.

pub mod layout;
pub mod raster;

pub use layout::{CardLayout, CardStyle, TextMeasure};
pub use raster::CardRenderer;
