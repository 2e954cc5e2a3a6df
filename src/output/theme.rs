//! Theme and color definitions for rich output.

use crate::model::FeatureFlag;
use rich_rust::r#box::ROUNDED;
use rich_rust::prelude::*;

fn color(name: &str) -> Color {
    Color::parse(name).unwrap_or_else(|_| panic!("Invalid color name: {name}"))
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub variant_baseline: Style,
    pub variant_accelerated: Style,

    pub table_border: Style,
    pub table_title: Style,

    pub box_style: &'static BoxChars,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            variant_baseline: Style::new().color(color("bright_black")).bold(),
            variant_accelerated: Style::new().color(color("magenta")).bold(),

            table_border: Style::new().color(color("bright_black")),
            table_title: Style::new().bold(),

            box_style: &ROUNDED,
        }
    }
}

impl Theme {
    #[must_use]
    pub fn variant_style(&self, flag: FeatureFlag) -> Style {
        match flag {
            FeatureFlag::Disabled => self.variant_baseline.clone(),
            FeatureFlag::Enabled => self.variant_accelerated.clone(),
        }
    }
}
