//! Circuit: a fixed background overlay whose traces draw in as the page scrolls
//!
//! The overlay covers the viewport and takes no room in the page flow. Its
//! geometry lives in a 1920x1080 artboard that is stretched over the
//! viewport; trigger windows are resolved from where each trace sits with
//! the page at the top.

use scrollwork_animation::{Easing, Repeat, TransitionSpec, VisualState};
use scrollwork_core::{Document, ElementId, LayoutHost, Point, Property, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, BindingSpec, OwnerId, RegistryHandle, Scrub, TriggerSpec};

use super::{Mounter, Section, REVEAL_END};
use crate::error::Result;

const ARTBOARD_WIDTH: f32 = 1920.0;
const ARTBOARD_HEIGHT: f32 = 1080.0;

/// Lag of the scrubbed stroke, in seconds
const STROKE_LAG_SECS: f32 = 1.0;

const TRACES: [&[Point]; 5] = [
    &[
        Point::new(0.0, 200.0),
        Point::new(300.0, 200.0),
        Point::new(300.0, 400.0),
        Point::new(600.0, 400.0),
        Point::new(600.0, 600.0),
        Point::new(900.0, 600.0),
    ],
    &[
        Point::new(1920.0, 300.0),
        Point::new(1600.0, 300.0),
        Point::new(1600.0, 500.0),
        Point::new(1300.0, 500.0),
        Point::new(1300.0, 700.0),
        Point::new(1000.0, 700.0),
    ],
    &[
        Point::new(200.0, 0.0),
        Point::new(200.0, 300.0),
        Point::new(400.0, 300.0),
        Point::new(400.0, 600.0),
        Point::new(600.0, 600.0),
        Point::new(600.0, 900.0),
    ],
    &[
        Point::new(1720.0, 0.0),
        Point::new(1720.0, 400.0),
        Point::new(1500.0, 400.0),
        Point::new(1500.0, 700.0),
        Point::new(1200.0, 700.0),
        Point::new(1200.0, 1080.0),
    ],
    &[
        Point::new(500.0, 100.0),
        Point::new(800.0, 100.0),
        Point::new(800.0, 300.0),
        Point::new(1100.0, 300.0),
        Point::new(1100.0, 500.0),
        Point::new(1400.0, 500.0),
    ],
];

/// Junction nodes and their pulse period in seconds
const NODES: [(Point, f32); 5] = [
    (Point::new(300.0, 200.0), 2.0),
    (Point::new(600.0, 400.0), 2.5),
    (Point::new(900.0, 600.0), 3.0),
    (Point::new(1300.0, 500.0), 2.2),
    (Point::new(800.0, 300.0), 2.8),
];

/// Node radius at rest; pulses grow it to twice this
const NODE_RADIUS: f32 = 4.0;

/// Total length of a polyline in artboard units
pub(crate) fn trace_length(points: &[Point]) -> f32 {
    points
        .windows(2)
        .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
        .sum()
}

fn trace_bounds(points: &[Point]) -> Rect {
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        return Rect::ZERO;
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

fn to_viewport(rect: Rect, viewport: Viewport) -> Rect {
    let sx = viewport.width / ARTBOARD_WIDTH;
    let sy = viewport.height / ARTBOARD_HEIGHT;
    Rect::new(
        rect.origin.x * sx,
        rect.origin.y * sy,
        rect.size.width * sx,
        rect.size.height * sy,
    )
}

pub struct Circuit {
    traces: Vec<ElementId>,
    nodes: Vec<ElementId>,
    handles: Vec<BindingHandle>,
}

impl Circuit {
    pub fn new(doc: &mut Document) -> Self {
        Self {
            traces: (0..TRACES.len())
                .map(|i| doc.insert(format!("circuit-trace-{i}"), Rect::ZERO))
                .collect(),
            nodes: (0..NODES.len())
                .map(|i| doc.insert(format!("circuit-node-{i}"), Rect::ZERO))
                .collect(),
            handles: Vec::new(),
        }
    }

    pub fn traces(&self) -> &[ElementId] {
        &self.traces
    }

    pub fn nodes(&self) -> &[ElementId] {
        &self.nodes
    }

    /// Dash offset that hides trace `index` completely
    pub fn hidden_offset(index: usize) -> f32 {
        TRACES.get(index).map_or(0.0, |points| trace_length(points))
    }

    fn draw(index: usize) -> Result<TransitionSpec> {
        let length = Self::hidden_offset(index);
        Ok(TransitionSpec::builder(
            VisualState::new().with(Property::StrokeDashOffset, length),
            VisualState::new().with(Property::StrokeDashOffset, 0.0),
        )
        .duration_secs(2.0)
        .easing(Easing::QuadInOut)
        .build()?)
    }

    fn pulse(period_secs: f32) -> Result<TransitionSpec> {
        Ok(TransitionSpec::builder(
            VisualState::new().with(Property::Scale, 1.0),
            VisualState::new().with(Property::Scale, 2.0),
        )
        .duration_secs(period_secs / 2.0)
        .repeat(Repeat::infinite_yoyo())
        .build()?)
    }
}

impl Section for Circuit {
    fn owner(&self) -> OwnerId {
        OwnerId::new("circuit")
    }

    /// Fixed overlay, outside the page flow
    fn height(&self, _viewport: Viewport) -> f32 {
        0.0
    }

    fn place(&self, doc: &mut Document, _top: f32) {
        let viewport = doc.viewport();
        for (&trace, points) in self.traces.iter().zip(TRACES) {
            doc.set_rect(trace, to_viewport(trace_bounds(points), viewport));
        }
        for (&node, (center, _)) in self.nodes.iter().zip(NODES) {
            let dot = Rect::new(
                center.x - NODE_RADIUS,
                center.y - NODE_RADIUS,
                NODE_RADIUS * 2.0,
                NODE_RADIUS * 2.0,
            );
            doc.set_rect(node, to_viewport(dot, viewport));
        }
    }

    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()> {
        let mut mounter = Mounter::new(doc, registry, self.owner());

        for (i, &trace) in self.traces.iter().enumerate() {
            let trigger = TriggerSpec::parse(trace, "top 80%", REVEAL_END)?
                .scrub(Scrub::smoothed(STROKE_LAG_SECS)?);
            let spec = BindingSpec::triggered(trigger, Self::draw(i)?, [trace])
                .named(format!("circuit-trace-{i}"));
            mounter.register(spec);
        }
        for (i, (&node, (_, period))) in self.nodes.iter().zip(NODES).enumerate() {
            let spec = BindingSpec::autoplay(Self::pulse(period)?, [node])
                .named(format!("circuit-node-{i}"));
            mounter.register(spec);
        }

        self.handles = mounter.finish();
        Ok(())
    }

    fn handles(&self) -> &[BindingHandle] {
        &self.handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_trigger::BindingRegistry;

    const FRAME: f32 = 1.0 / 60.0;

    fn mounted() -> (Document, BindingRegistry, Circuit) {
        let mut doc = Document::new(Viewport::new(ARTBOARD_WIDTH, ARTBOARD_HEIGHT));
        let mut circuit = Circuit::new(&mut doc);
        circuit.place(&mut doc, 0.0);
        let registry = BindingRegistry::new();
        circuit.mount(&mut doc, &registry.handle()).unwrap();
        (doc, registry, circuit)
    }

    fn settle(registry: &BindingRegistry, doc: &mut Document) {
        // Node pulses never stop; give the strokes time to catch up
        for _ in 0..300 {
            registry.tick(doc, FRAME);
        }
    }

    #[test]
    fn test_trace_lengths() {
        assert_eq!(trace_length(TRACES[0]), 1300.0);
        assert_eq!(trace_length(TRACES[3]), 400.0 + 220.0 + 300.0 + 300.0 + 380.0);
        assert_eq!(trace_length(&[]), 0.0);
        assert_eq!(Circuit::hidden_offset(99), 0.0);
    }

    #[test]
    fn test_bounds_follow_viewport() {
        let mut doc = Document::new(Viewport::new(960.0, 540.0));
        let circuit = Circuit::new(&mut doc);
        circuit.place(&mut doc, 5000.0);
        let first = doc.bounds(circuit.traces()[0]).unwrap();
        assert_eq!(first, Rect::new(0.0, 100.0, 450.0, 200.0));
    }

    #[test]
    fn test_strokes_start_hidden() {
        let (doc, registry, circuit) = mounted();
        assert_eq!(registry.bindings_for("circuit"), 10);
        for (i, &trace) in circuit.traces().iter().enumerate() {
            assert_eq!(
                doc.style(trace, Property::StrokeDashOffset),
                Some(Circuit::hidden_offset(i))
            );
        }
    }

    #[test]
    fn test_scrub_draws_and_undraws() {
        let (mut doc, registry, circuit) = mounted();
        let trace = circuit.traces()[0];
        let length = Circuit::hidden_offset(0);
        // Window for the first trace: 200 - 864 .. 600 - 216
        let (start, end) = (-664.0, 384.0);

        // Already partway in with the page at the top
        registry.on_scroll(&mut doc, 0.0);
        settle(&registry, &mut doc);
        let expected = length * (1.0 - (0.0 - start) / (end - start));
        let at_top = doc.resolved_style(trace, Property::StrokeDashOffset);
        assert!((at_top - expected).abs() < 0.5, "{at_top} vs {expected}");

        // The smoothed stroke lags behind the scroll
        registry.on_scroll(&mut doc, end);
        registry.tick(&mut doc, FRAME);
        let lagging = doc.resolved_style(trace, Property::StrokeDashOffset);
        assert!(lagging > 0.0 && lagging < at_top);

        settle(&registry, &mut doc);
        assert_eq!(doc.style(trace, Property::StrokeDashOffset), Some(0.0));

        registry.on_scroll(&mut doc, 0.0);
        settle(&registry, &mut doc);
        let back = doc.resolved_style(trace, Property::StrokeDashOffset);
        assert!((back - expected).abs() < 0.5);
    }

    #[test]
    fn test_nodes_pulse() {
        let (mut doc, registry, circuit) = mounted();
        registry.tick(&mut doc, 0.5);
        let scale = doc.resolved_style(circuit.nodes()[0], Property::Scale);
        assert!(scale > 1.0 && scale <= 2.0);
        assert_eq!(registry.release_all("circuit"), 10);
    }
}
