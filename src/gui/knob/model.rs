use crate::config::KnobConfig;
use crate::geometry::{Degrees, Point};
use crate::gui::knob::{GATE_OFFSET, INDICATOR_INSET};
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    pub consumed: bool,
    pub should_redraw: bool,
}

impl PointerResponse {
    pub fn new(consumed: bool, should_redraw: bool) -> Self {
        Self {
            consumed,
            should_redraw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub angle: Degrees,
    pub highlighted: bool,
}

pub struct KnobState {
    pub config: KnobConfig,
    pub center: Point,
    pub pointer: Option<Point>,
    pub rotation: Degrees,
}

impl KnobState {
    /// Center stays at the origin until the first [`KnobState::layout`].
    pub fn new(config: KnobConfig) -> Self {
        let rotation = Degrees::new(config.initial_rotation).normalized();
        Self {
            config,
            center: Point::default(),
            pointer: None,
            rotation,
        }
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    /// Re-derives the center from the surface size. Returns whether it moved.
    pub fn layout(&mut self, width: f64, height: f64) -> bool {
        let center = Point::new(width / 2.0, height / 2.0);
        let changed = self.center != center;
        self.center = center;
        changed
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        match event.kind {
            PointerKind::Down | PointerKind::Move => {
                self.pointer = Some(event.position);

                let raw = self.raw_angle(event.position);
                if !self.accepts(raw) {
                    return PointerResponse::new(true, false);
                }

                let rotation = raw.normalized();
                let changed = rotation != self.rotation;
                self.rotation = rotation;
                PointerResponse::new(true, changed)
            }
            PointerKind::Up | PointerKind::Cancel => PointerResponse::new(false, false),
        }
    }

    /// Angle of `p` around the center in `(-180, 180]`, 0 straight up, clockwise positive.
    pub fn raw_angle(&self, p: Point) -> Degrees {
        let (dx, dy) = (self.center.x - p.x, self.center.y - p.y);
        Degrees::new(-dx.atan2(dy).to_degrees())
    }

    /// Dead zone gate, evaluated on the raw angle. Asymmetric: the
    /// counter-clockwise edge sits `GATE_OFFSET` degrees closer to the top.
    pub fn accepts(&self, raw: Degrees) -> bool {
        let half = self.config.limiting_angle / 2.0;
        let raw = raw.value();
        raw >= half || raw <= -half + GATE_OFFSET
    }

    pub fn tick_spacing(&self) -> Option<Degrees> {
        (self.config.tick_count >= 2).then(|| {
            Degrees::new(
                (360.0 - self.config.limiting_angle) / (self.config.tick_count - 1) as f64,
            )
        })
    }

    /// Tick angles from the dead zone's clockwise edge round to its other edge, both included.
    pub fn tick_angles(&self) -> impl Iterator<Item = Degrees> + '_ {
        let start = self.config.limiting_angle / 2.0;
        let spacing = self.tick_spacing().map_or(0.0, Degrees::value);
        let count = self.config.tick_count.max(1);

        (0..count).map(move |i| Degrees::new(start + i as f64 * spacing))
    }

    pub fn ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        self.tick_angles().map(|angle| Tick {
            angle,
            highlighted: self.rotation >= angle,
        })
    }

    pub fn indicator_center(&self) -> Point {
        let distance = self.config.radius - INDICATOR_INSET;
        Point::new(self.center.x, self.center.y - distance).rotate_around(self.center, self.rotation)
    }
}
