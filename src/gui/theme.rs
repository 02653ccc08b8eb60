use crate::config::{ColorOverrides, HexColor};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use strum::{Display as StrumDisplay, EnumIter};

/// Named theme colors the knob reads from the style context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumIter)]
pub enum ColorRole {
    #[strum(serialize = "success_color")]
    Highlight,
    #[strum(serialize = "theme_unfocused_fg_color")]
    Neutral,
    #[strum(serialize = "error_color")]
    Indicator,
}

impl ColorRole {
    fn fallback(&self) -> Srgba<f64> {
        match self {
            Self::Highlight => Srgba::new(0.0, 1.0, 0.0, 1.0),
            Self::Neutral => Srgba::new(0.827, 0.827, 0.827, 1.0),
            Self::Indicator => Srgba::new(1.0, 0.0, 0.0, 1.0),
        }
    }

    fn override_from(&self, overrides: &ColorOverrides) -> Option<HexColor> {
        match self {
            Self::Highlight => overrides.highlight,
            Self::Neutral => overrides.neutral,
            Self::Indicator => overrides.indicator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobColors {
    pub highlight: Srgba<f64>,
    pub neutral: Srgba<f64>,
    pub indicator: Srgba<f64>,
}

impl Default for KnobColors {
    fn default() -> Self {
        Self::resolve(&ColorOverrides::default(), ColorRole::fallback)
    }
}

impl KnobColors {
    pub fn from_context(context: &gtk::StyleContext, overrides: &ColorOverrides) -> Self {
        Self::resolve(overrides, |role| Self::lookup_color(context, role))
    }

    /// Config overrides win over `lookup`.
    fn resolve(
        overrides: &ColorOverrides,
        lookup: impl Fn(&ColorRole) -> Srgba<f64>,
    ) -> Self {
        let pick = |role: ColorRole| {
            role.override_from(overrides)
                .map(HexColor::to_srgba)
                .unwrap_or_else(|| lookup(&role))
        };

        Self {
            highlight: pick(ColorRole::Highlight),
            neutral: pick(ColorRole::Neutral),
            indicator: pick(ColorRole::Indicator),
        }
    }

    fn lookup_color(context: &gtk::StyleContext, role: &ColorRole) -> Srgba<f64> {
        context
            .lookup_color(&role.to_string())
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                )
            })
            .unwrap_or_else(|| role.fallback())
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.knob-window {
    background-color: @theme_bg_color;
}
.knob-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
