//! Headless Annotation Session Example
//!
//! Drives a full drawing session through the public API without a GUI:
//! loads an image size, draws a rectangle, a polygon and a text label,
//! exercises undo/redo, and renders the result through a surface that
//! prints draw calls to stdout.
//!
//! Run with: cargo run --example annotate

use overmark::prelude::*;

/// A draw surface that prints every primitive instead of painting pixels.
struct ConsoleSurface;

impl DrawSurface for ConsoleSurface {
    fn stroke_path(&mut self, points: &[Point], _color: Color, width: f32) {
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("({:.0}, {:.0})", p.x, p.y))
            .collect();
        println!("  path   [{}] width {width:.1}", coords.join(" -> "));
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color, width: f32) {
        println!(
            "  rect   {:.0}x{:.0} at ({:.0}, {:.0}) width {width:.1}",
            rect.width, rect.height, rect.x, rect.y
        );
    }

    fn stroke_oval(&mut self, rect: Rect, _color: Color, width: f32) {
        println!(
            "  oval   in {:.0}x{:.0} at ({:.0}, {:.0}) width {width:.1}",
            rect.width, rect.height, rect.x, rect.y
        );
    }

    fn draw_text(&mut self, center: Point, text: &str, font_px: f32, _color: Color) {
        println!(
            "  text   {text:?} centered at ({:.0}, {:.0}) {font_px:.0}px",
            center.x, center.y
        );
    }
}

fn main() {
    env_logger::init();

    let mut controller = AnnotationController::new(ControllerConfig {
        detections: vec![Detection {
            label: "cat".to_string(),
            confidence: 0.92,
            points: vec![NormPoint::new(0.55, 0.1), NormPoint::new(0.9, 0.45)],
        }],
        ..Default::default()
    });
    controller.subscribe(|event| println!("event: {event:?}"));

    // The image resource resolves before any gestures are forwarded.
    pollster::block_on(controller.load_image_size(Size::new(1024.0, 768.0)));
    assert!(controller.is_ready());

    // The displayed image is smaller than the original; pointer input
    // arrives in these render-space pixels.
    let render = Size::new(512.0, 384.0);

    // Drag a rectangle from (102, 77) to (410, 230) on screen.
    controller.start_shape(AnnotationKind::Rectangle);
    controller.extend(transform::to_normalized(Point::new(102.4, 76.8), render));
    controller.extend(transform::to_normalized(Point::new(409.6, 230.4), render));
    controller.drag_released();

    // Tap out a triangle and confirm it.
    controller.start_shape(AnnotationKind::Polygon);
    controller.extend(transform::to_normalized(Point::new(100.0, 300.0), render));
    controller.extend(transform::to_normalized(Point::new(200.0, 300.0), render));
    controller.extend(transform::to_normalized(Point::new(150.0, 200.0), render));
    controller.complete_polygon();

    // Label it, 24px as measured against the original image height.
    let font_size = transform::normalized_font_size(24.0, Size::new(1024.0, 768.0));
    controller.add_text(Point::new(0.3, 0.9), "triangle", font_size);

    // Change of heart about the label, then not.
    controller.undo();
    controller.redo();

    println!(
        "\n{} annotation(s) at {}x{}:",
        controller.annotations().len(),
        render.width,
        render.height
    );
    controller.draw_all(&mut ConsoleSurface, render);
}
