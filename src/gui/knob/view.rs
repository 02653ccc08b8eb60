use super::model::{KnobState, Tick};
use super::{INDICATOR_INSET, INDICATOR_RADIUS};
use crate::config::KnobConfig;
use crate::geometry::Point;
use crate::gui::theme::KnobColors;
use cairo::{Context, RadialGradient};
use palette::Srgba;
use std::f64::consts::PI;

const DIAL_CENTER_GRAY: f64 = 0.827;

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct TickRenderer<'a> {
    tick: Tick,
    config: &'a KnobConfig,
    center: Point,
}

impl<'a> TickRenderer<'a> {
    fn new(tick: Tick, config: &'a KnobConfig, center: Point) -> Self {
        Self {
            tick,
            config,
            center,
        }
    }

    fn color(&self, colors: &KnobColors) -> Srgba<f64> {
        if self.tick.highlighted {
            colors.highlight
        } else {
            colors.neutral
        }
    }

    /// Strokes the tick pointing straight up from the dial edge, then lets the
    /// rotation carry it to its angle.
    fn draw(&self, cr: &Context, colors: &KnobColors) -> Result<(), cairo::Error> {
        cr.save()?;
        cr.translate(self.center.x, self.center.y);
        cr.rotate(self.tick.angle.to_radians());

        set_source(cr, self.color(colors));
        cr.set_line_width(self.config.tick_width);
        cr.move_to(0.0, -self.config.radius);
        cr.line_to(0.0, -(self.config.radius + self.config.tick_height));
        cr.stroke()?;

        cr.restore()
    }
}

pub fn draw(cr: &Context, state: &KnobState, colors: &KnobColors) -> Result<(), cairo::Error> {
    log::debug!("Drawing knob at {}", state.rotation);

    draw_dial(cr, state)?;

    for tick in state.ticks() {
        TickRenderer::new(tick, &state.config, state.center).draw(cr, colors)?;
    }

    draw_indicator(cr, state, colors)
}

fn draw_dial(cr: &Context, state: &KnobState) -> Result<(), cairo::Error> {
    let Point { x, y } = state.center;
    let radius = state.config.radius;

    let gradient = RadialGradient::new(x, y, 0.0, x, y, radius);
    gradient.add_color_stop_rgb(0.0, DIAL_CENTER_GRAY, DIAL_CENTER_GRAY, DIAL_CENTER_GRAY);
    gradient.add_color_stop_rgb(1.0, 0.0, 0.0, 0.0);

    cr.set_source(&gradient)?;
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

fn draw_indicator(
    cr: &Context,
    state: &KnobState,
    colors: &KnobColors,
) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.translate(state.center.x, state.center.y);
    cr.rotate(state.rotation.to_radians());

    set_source(cr, colors.indicator);
    cr.arc(
        0.0,
        -(state.config.radius - INDICATOR_INSET),
        INDICATOR_RADIUS,
        0.0,
        2.0 * PI,
    );
    cr.fill()?;

    cr.restore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Degrees;
    use cairo::{Format, ImageSurface};

    const SIZE: i32 = 226;

    /// Renders the knob offscreen and returns a pixel reader over the result.
    fn render(state: &KnobState) -> impl Fn(Point) -> (u8, u8, u8, u8) {
        let mut surface = ImageSurface::create(Format::ARgb32, SIZE, SIZE).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, state, &KnobColors::default()).unwrap();
        }
        surface.flush();

        let stride = surface.stride() as usize;
        let data = surface.data().unwrap().to_vec();

        move |p: Point| {
            let offset = p.y.floor() as usize * stride + p.x.floor() as usize * 4;
            let px = u32::from_ne_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ]);
            (
                (px >> 16) as u8,
                (px >> 8) as u8,
                px as u8,
                (px >> 24) as u8,
            )
        }
    }

    fn knob() -> KnobState {
        let mut state = KnobState::new(KnobConfig::default());
        state.layout(SIZE as f64, SIZE as f64);
        state
    }

    /// Middle of the tick band at `angle`.
    fn tick_point(state: &KnobState, angle: f64) -> Point {
        let distance = state.config.radius + state.config.tick_height / 2.0;
        Point::new(state.center.x, state.center.y - distance)
            .rotate_around(state.center, Degrees::new(angle))
    }

    #[test]
    fn test_ticks_colored_by_rotation() {
        let state = knob();
        let pixel = render(&state);

        // rotation starts at 10: only the first tick is lit
        let (r, g, b, a) = pixel(tick_point(&state, 10.0));
        assert_eq!(a, 255);
        assert!(g > 200 && r < 50 && b < 50, "{:?}", (r, g, b));

        let (r, g, b, a) = pixel(tick_point(&state, 20.0));
        assert_eq!(a, 255);
        assert!(r > 150 && r == g && g == b, "{:?}", (r, g, b));
    }

    #[test]
    fn test_indicator_drawn_at_rotation() {
        let mut state = knob();
        state.rotation = Degrees::new(120.0);
        let pixel = render(&state);

        let (r, g, b, a) = pixel(state.indicator_center());
        assert_eq!(a, 255);
        assert!(r > 200 && g < 50 && b < 50, "{:?}", (r, g, b));

        // the dead zone holds no tick
        let (_, _, _, a) = pixel(tick_point(&state, 0.0));
        assert_eq!(a, 0);
    }

    #[test]
    fn test_dial_fades_to_black() {
        let state = knob();
        let pixel = render(&state);

        let (r, _, _, a) = pixel(Point::new(state.center.x, state.center.y + 2.0));
        assert_eq!(a, 255);
        assert!(r > 180, "{r}");

        let (r, _, _, a) = pixel(Point::new(state.center.x, state.center.y + 97.0));
        assert_eq!(a, 255);
        assert!(r < 30, "{r}");
    }
}
