//! Drawing controller and state machine.
//!
//! The controller owns the ordered annotation list, the batched redo stack,
//! the current drawing session, and the mutable drawing settings. It is
//! designed to be called from fire-and-forget UI event handlers: policy
//! rejections (limit reached, nothing to undo, a drag leaving the image)
//! are silent no-ops traced at debug level, never errors. Contract
//! violations — malformed direct entity construction — panic early instead.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::event::{ChangeEvent, ListenerId, Listeners};
use crate::geometry::{NormPoint, Point, Size};
use crate::model::{
    Annotation, AnnotationKind, DetectedAnnotation, PolygonAnnotation, ShapeAnnotation, ShapeKind,
    TextAnnotation,
};
use crate::render::{self, DrawSurface};
use crate::source::{ImageSource, LoadState};

// ============================================================================
// Settings & Configuration
// ============================================================================

/// Mutable drawing settings, read by the boundary to populate its chrome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawSettings {
    /// Stroke/text color for new annotations
    pub color: Color,
    /// Stroke width in render pixels for new shapes
    pub stroke_width: f32,
    /// Font size for new text labels, as a fraction of image height
    pub font_size: f32,
    /// Selected annotation kind
    pub kind: AnnotationKind,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            color: Color::default(),
            stroke_width: 4.0,
            font_size: 0.05,
            kind: AnnotationKind::default(),
        }
    }
}

/// A detection record supplied by an external pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Score in `0.0..=1.0`; records outside the range are skipped
    pub confidence: f32,
    /// Normalized bounding points
    pub points: Vec<NormPoint>,
}

/// Construction-time configuration.
///
/// Immutable after construction except where explicit setters exist
/// (the `settings` fields).
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    pub settings: DrawSettings,
    /// Cap on the total annotation count; `None` means unlimited
    pub annotation_limit: Option<usize>,
    /// When set, line/rectangle/oval shapes lock as soon as the initiating
    /// drag gesture ends instead of staying editable indefinitely
    pub finalize_on_release: bool,
    /// Detection records seeded into the list at construction
    pub detections: Vec<Detection>,
}

// ============================================================================
// Draw Phase
// ============================================================================

/// Session phase for the current annotation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DrawPhase {
    /// No in-progress annotation
    #[default]
    Idle,
    /// The last annotation is accepting more points
    Drawing,
    /// The last annotation is finalized; further points are rejected until
    /// a new annotation starts
    Locked,
}

// ============================================================================
// Controller
// ============================================================================

/// The annotation overlay's state machine.
///
/// Single-threaded and event-driven: all mutation methods are synchronous
/// and must be called from the thread that owns the controller. The only
/// suspending operation is [`AnnotationController::load_image_size`].
#[derive(Debug, Default)]
pub struct AnnotationController {
    annotations: Vec<Annotation>,
    /// Batches of annotations removed together; one redo restores one batch
    redo_stack: Vec<Vec<Annotation>>,
    settings: DrawSettings,
    annotation_limit: Option<usize>,
    finalize_on_release: bool,
    phase: DrawPhase,
    load_state: LoadState,
    listeners: Listeners,
}

impl AnnotationController {
    pub fn new(config: ControllerConfig) -> Self {
        let mut controller = Self {
            settings: config.settings,
            annotation_limit: config.annotation_limit,
            finalize_on_release: config.finalize_on_release,
            ..Default::default()
        };
        if !config.detections.is_empty() {
            controller.add_detected(config.detections);
        }
        controller
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register a change listener. Listeners run synchronously, in
    /// subscription order, on the controller's thread.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(ChangeEvent) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn notify(&mut self, event: ChangeEvent) {
        self.listeners.emit(event);
    }

    // ========================================================================
    // Boundary Read Surface
    // ========================================================================

    /// Read-only view of the annotation list, in draw order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn settings(&self) -> DrawSettings {
        self.settings
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// The original image size, once resolved.
    pub fn original_image_size(&self) -> Option<Size> {
        self.load_state.size()
    }

    pub fn is_ready(&self) -> bool {
        self.load_state.is_ready()
    }

    pub fn can_undo(&self) -> bool {
        !self.annotations.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Whether the most-recently-added annotation may still be extended.
    ///
    /// This is the gate the rendering boundary checks before forwarding
    /// further drag events: with finalize-on-release active and the
    /// annotation limit reached, editing stops.
    pub fn can_edit_current_annotation(&self) -> bool {
        !self.finalize_on_release
            || match self.annotation_limit {
                None => true,
                Some(limit) => self.annotations.len() < limit,
            }
    }

    /// True while a polygon or polyline is mid-construction. The boundary
    /// uses this to show confirm/cancel affordances.
    pub fn poly_in_progress(&self) -> bool {
        self.phase == DrawPhase::Drawing
            && self
                .annotations
                .last()
                .is_some_and(|a| a.kind().is_multi_gesture())
    }

    fn limit_reached(&self) -> bool {
        self.annotation_limit
            .is_some_and(|limit| self.annotations.len() >= limit)
    }

    // ========================================================================
    // Drawing Session
    // ========================================================================

    /// Start a new shape of the given kind and enter the drawing session.
    ///
    /// No-op for [`AnnotationKind::Text`] (text enters via
    /// [`AnnotationController::add_text`]) and when the annotation limit is
    /// reached. Starting a shape discards the redo history.
    pub fn start_shape(&mut self, kind: AnnotationKind) {
        if kind == AnnotationKind::Text {
            log::debug!("✏️ start_shape(Text) ignored, text is added atomically");
            return;
        }
        if self.limit_reached() {
            log::debug!("🚧 Annotation limit reached, not starting a new shape");
            return;
        }

        let annotation = match kind {
            AnnotationKind::Polygon => Annotation::Polygon(PolygonAnnotation::new(
                self.settings.color,
                self.settings.stroke_width,
            )),
            AnnotationKind::Line => self.new_shape(ShapeKind::Line),
            AnnotationKind::Polyline => self.new_shape(ShapeKind::Polyline),
            AnnotationKind::Rectangle => self.new_shape(ShapeKind::Rectangle),
            AnnotationKind::Oval => self.new_shape(ShapeKind::Oval),
            AnnotationKind::Text => unreachable!("handled above"),
        };

        self.redo_stack.clear();
        self.annotations.push(annotation);
        self.phase = DrawPhase::Drawing;
        log::debug!("✏️ Started {} annotation", kind.name());
        self.notify(ChangeEvent::ContentChanged);
    }

    fn new_shape(&self, kind: ShapeKind) -> Annotation {
        Annotation::Shape(ShapeAnnotation::new(
            kind,
            self.settings.color,
            self.settings.stroke_width,
        ))
    }

    /// Append a normalized point candidate to the in-progress shape.
    ///
    /// Only meaningful in the drawing session; candidates outside the unit
    /// square (the pointer left the image) are dropped silently.
    pub fn extend(&mut self, candidate: Point) {
        if self.phase != DrawPhase::Drawing {
            log::debug!("✋ extend() outside a drawing session, ignoring");
            return;
        }
        let Ok(point) = NormPoint::try_from(candidate) else {
            log::debug!(
                "✋ Point ({:.3}, {:.3}) outside the unit square, ignoring",
                candidate.x,
                candidate.y
            );
            return;
        };

        match self.annotations.last_mut() {
            Some(Annotation::Shape(shape)) => shape.push(point),
            Some(Annotation::Polygon(polygon)) => polygon.push(point),
            // Drawing phase implies a shape or polygon sits at the end.
            _ => return,
        }
        self.notify(ChangeEvent::ContentChanged);
    }

    /// Lock the in-progress shape. Further `extend` calls are rejected
    /// until a new annotation starts.
    pub fn finalize(&mut self) {
        if self.phase != DrawPhase::Drawing {
            return;
        }
        self.phase = DrawPhase::Locked;
        log::debug!("🔒 Finalized current annotation");
        self.notify(ChangeEvent::ContentChanged);
    }

    /// Apply the finalize-on-release policy at the end of a drag gesture.
    ///
    /// Locks line/rectangle/oval shapes when the policy is active; polygon
    /// and polyline wait for their explicit completion action.
    pub fn drag_released(&mut self) {
        if !self.finalize_on_release || self.phase != DrawPhase::Drawing {
            return;
        }
        let multi_gesture = self
            .annotations
            .last()
            .is_some_and(|a| a.kind().is_multi_gesture());
        if !multi_gesture {
            self.finalize();
        }
    }

    /// Close the in-progress polygon's ring and lock it.
    pub fn complete_polygon(&mut self) {
        if self.phase != DrawPhase::Drawing {
            return;
        }
        let Some(Annotation::Polygon(polygon)) = self.annotations.last_mut() else {
            return;
        };
        polygon.close();
        let valid = polygon.is_valid();
        self.phase = DrawPhase::Locked;
        log::debug!("⭕ Closed polygon (valid: {valid})");
        self.notify(ChangeEvent::ContentChanged);
    }

    /// Discard the in-progress polygon.
    pub fn cancel_polygon(&mut self) {
        if self.phase == DrawPhase::Drawing
            && matches!(self.annotations.last(), Some(Annotation::Polygon(_)))
        {
            log::debug!("🚫 Cancelled in-progress polygon");
            self.undo();
        }
    }

    /// Lock the in-progress polyline.
    pub fn complete_polyline(&mut self) {
        if self.phase != DrawPhase::Drawing {
            return;
        }
        let is_polyline = matches!(
            self.annotations.last(),
            Some(annotation) if annotation.kind() == AnnotationKind::Polyline
        );
        if is_polyline {
            self.finalize();
        }
    }

    /// Discard the in-progress polyline.
    pub fn cancel_polyline(&mut self) {
        let is_polyline = matches!(
            self.annotations.last(),
            Some(annotation) if annotation.kind() == AnnotationKind::Polyline
        );
        if self.phase == DrawPhase::Drawing && is_polyline {
            log::debug!("🚫 Cancelled in-progress polyline");
            self.undo();
        }
    }

    // ========================================================================
    // Atomic Adds
    // ========================================================================

    /// Append a complete text annotation in one step.
    ///
    /// `font_size` is a fraction of the original image height, as produced
    /// by [`crate::transform::normalized_font_size`]. Born locked: text
    /// never passes through the drawing session.
    pub fn add_text(&mut self, position: Point, text: impl Into<String>, font_size: f32) {
        if self.limit_reached() {
            log::debug!("🚧 Annotation limit reached, not adding text");
            return;
        }
        let Ok(position) = NormPoint::try_from(position) else {
            log::debug!("✋ Text position outside the unit square, ignoring");
            return;
        };
        if font_size <= 0.0 {
            log::debug!("✋ Non-positive font size {font_size}, ignoring");
            return;
        }

        let annotation = TextAnnotation::new(position, text, font_size, self.settings.color);
        self.redo_stack.clear();
        self.annotations.push(Annotation::Text(annotation));
        self.phase = DrawPhase::Idle;
        log::debug!("📝 Added text annotation");
        self.notify(ChangeEvent::ContentChanged);
    }

    /// Append detection records as complete rectangle annotations.
    ///
    /// Records are colored from the golden-angle palette so overlapping
    /// detections stay distinguishable. Invalid records are skipped with a
    /// warning; the remainder is dropped once the annotation limit is hit.
    pub fn add_detected(&mut self, records: Vec<Detection>) {
        let mut added = 0usize;
        for (index, record) in records.into_iter().enumerate() {
            if self.limit_reached() {
                log::debug!("🚧 Annotation limit reached, dropping remaining detections");
                break;
            }
            match DetectedAnnotation::try_new(
                record.label,
                record.confidence,
                record.points,
                Color::palette(index as u32),
                self.settings.stroke_width,
            ) {
                Ok(detected) => {
                    if added == 0 {
                        self.redo_stack.clear();
                    }
                    self.annotations.push(Annotation::Detected(detected));
                    added += 1;
                }
                Err(err) => log::warn!("Skipping detection record: {err}"),
            }
        }

        if added > 0 {
            self.phase = DrawPhase::Idle;
            log::debug!("📦 Added {added} detected annotation(s)");
            self.notify(ChangeEvent::ContentChanged);
        }
    }

    // ========================================================================
    // Undo / Redo / Clear
    // ========================================================================

    /// Remove the last annotation and push it onto the redo stack as a
    /// singleton batch. No-op on an empty list.
    pub fn undo(&mut self) {
        let Some(annotation) = self.annotations.pop() else {
            log::debug!("⏪ Nothing to undo");
            return;
        };
        log::debug!("⏪ Undid {} annotation", annotation.kind().name());
        self.redo_stack.push(vec![annotation]);
        self.phase = DrawPhase::Idle;
        self.notify(ChangeEvent::ContentChanged);
    }

    /// Restore the most recently undone batch, order preserved within the
    /// batch. No-op when the redo stack is empty.
    pub fn redo(&mut self) {
        let Some(batch) = self.redo_stack.pop() else {
            log::debug!("⏩ Nothing to redo");
            return;
        };
        log::debug!("⏩ Restored {} annotation(s)", batch.len());
        self.annotations.extend(batch);
        self.phase = DrawPhase::Idle;
        self.notify(ChangeEvent::ContentChanged);
    }

    /// Move the entire annotation list onto the redo stack as one batch.
    /// No-op on an empty list (no empty batch is pushed).
    pub fn clear(&mut self) {
        if self.annotations.is_empty() {
            log::debug!("🗑️ Nothing to clear");
            return;
        }
        let batch = std::mem::take(&mut self.annotations);
        log::debug!("🗑️ Cleared {} annotation(s)", batch.len());
        self.redo_stack.push(batch);
        self.phase = DrawPhase::Idle;
        self.notify(ChangeEvent::ContentChanged);
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Set the stroke/text color. No-op when unchanged.
    pub fn set_color(&mut self, color: Color) {
        if self.settings.color == color {
            return;
        }
        self.settings.color = color;
        log::debug!("🎨 Color changed");
        self.notify(ChangeEvent::SettingsChanged);
    }

    /// Set the stroke width. Rejects non-positive values; no-op when
    /// unchanged.
    pub fn set_stroke_width(&mut self, width: f32) {
        if width <= 0.0 || width == self.settings.stroke_width {
            return;
        }
        self.settings.stroke_width = width;
        log::debug!("🖊️ Stroke width: {width:.1}");
        self.notify(ChangeEvent::SettingsChanged);
    }

    /// Set the normalized font size. Rejects non-positive values; no-op
    /// when unchanged.
    pub fn set_font_size(&mut self, size: f32) {
        if size <= 0.0 || size == self.settings.font_size {
            return;
        }
        self.settings.font_size = size;
        log::debug!("🔤 Font size: {size:.3}");
        self.notify(ChangeEvent::SettingsChanged);
    }

    /// Select the annotation kind for new shapes. No-op when unchanged.
    pub fn set_kind(&mut self, kind: AnnotationKind) {
        if self.settings.kind == kind {
            return;
        }
        self.settings.kind = kind;
        log::debug!("🔧 Annotation kind: {}", kind.name());
        self.notify(ChangeEvent::SettingsChanged);
    }

    // ========================================================================
    // Image Size
    // ========================================================================

    /// Resolve and record the original image size.
    ///
    /// Suspends until the source resolves; failure lands in
    /// [`LoadState::Failed`] rather than an error return, because the
    /// boundary consumes it as a display state. The future borrows the
    /// controller mutably, so a second load cannot start while one is in
    /// flight; a sequential re-load replaces the recorded size.
    pub async fn load_image_size<S: ImageSource>(&mut self, source: S) {
        self.load_state = LoadState::Loading;
        self.notify(ChangeEvent::ReadyStateChanged);

        self.load_state = match source.resolve().await {
            Ok(size) => {
                log::debug!("🖼️ Image size resolved: {}x{}", size.width, size.height);
                LoadState::Ready(size)
            }
            Err(err) => {
                log::warn!("Image size resolution failed: {err}");
                LoadState::Failed
            }
        };
        self.notify(ChangeEvent::ReadyStateChanged);
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw every annotation through the surface at the given render size.
    pub fn draw_all(&self, surface: &mut dyn DrawSurface, render: Size) {
        render::draw_annotations(&self.annotations, surface, render);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller() -> AnnotationController {
        AnnotationController::new(ControllerConfig::default())
    }

    fn norm(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_draw_rectangle_scenario() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Rectangle);
        c.extend(norm(0.2, 0.2));
        c.extend(norm(0.8, 0.6));

        assert_eq!(c.annotations().len(), 1);
        let Annotation::Shape(shape) = &c.annotations()[0] else {
            panic!("expected a shape annotation");
        };
        assert_eq!(shape.points().first(), Some(&NormPoint::new(0.2, 0.2)));
        assert_eq!(shape.points().last(), Some(&NormPoint::new(0.8, 0.6)));
    }

    #[test]
    fn test_out_of_range_extend_is_noop() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Line);
        c.extend(norm(0.5, 0.5));
        c.extend(norm(1.2, 0.5));
        c.extend(norm(-0.1, 0.5));

        assert_eq!(c.annotations()[0].point_count(), 1);
    }

    #[test]
    fn test_extend_without_session_is_noop() {
        let mut c = controller();
        c.extend(norm(0.5, 0.5));
        assert!(c.annotations().is_empty());
    }

    #[test]
    fn test_extend_after_finalize_is_noop() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Line);
        c.extend(norm(0.1, 0.1));
        c.finalize();
        c.extend(norm(0.9, 0.9));

        assert_eq!(c.annotations()[0].point_count(), 1);
    }

    #[test]
    fn test_undo_then_redo_restores_sequence() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Line);
        c.extend(norm(0.1, 0.1));
        c.finalize();
        c.start_shape(AnnotationKind::Oval);
        c.extend(norm(0.3, 0.3));
        c.finalize();

        let before = c.annotations().to_vec();
        c.undo();
        assert_eq!(c.annotations().len(), 1);
        c.redo();
        assert_eq!(c.annotations(), &before[..]);
    }

    #[test]
    fn test_new_add_clears_redo() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Line);
        c.finalize();
        c.undo();
        assert!(c.can_redo());

        c.start_shape(AnnotationKind::Line);
        assert!(!c.can_redo());

        // A redo is now a no-op.
        c.redo();
        assert_eq!(c.annotations().len(), 1);
    }

    #[test]
    fn test_clear_restores_as_one_batch() {
        let mut c = controller();
        for _ in 0..3 {
            c.start_shape(AnnotationKind::Line);
            c.extend(norm(0.2, 0.2));
            c.finalize();
        }
        let before = c.annotations().to_vec();

        c.clear();
        assert!(c.annotations().is_empty());
        assert!(c.can_redo());

        c.redo();
        assert_eq!(c.annotations(), &before[..]);
    }

    #[test]
    fn test_clear_on_empty_is_noop() {
        let mut c = controller();
        c.clear();
        assert!(!c.can_redo());
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut c = controller();
        c.undo();
        assert!(c.annotations().is_empty());
        assert!(!c.can_redo());
    }

    #[test]
    fn test_annotation_limit_caps_adds() {
        let mut c = AnnotationController::new(ControllerConfig {
            annotation_limit: Some(2),
            ..Default::default()
        });
        c.start_shape(AnnotationKind::Line);
        c.finalize();
        c.start_shape(AnnotationKind::Line);
        c.finalize();
        c.start_shape(AnnotationKind::Line);

        assert_eq!(c.annotations().len(), 2);
    }

    #[test]
    fn test_finalize_on_release_with_limit_locks_editing() {
        let mut c = AnnotationController::new(ControllerConfig {
            annotation_limit: Some(1),
            finalize_on_release: true,
            ..Default::default()
        });
        assert!(c.can_edit_current_annotation());

        c.start_shape(AnnotationKind::Rectangle);
        c.extend(norm(0.2, 0.2));
        c.extend(norm(0.8, 0.6));
        c.drag_released();

        assert!(!c.can_edit_current_annotation());
        c.extend(norm(0.9, 0.9));
        assert_eq!(c.annotations()[0].point_count(), 2);
    }

    #[test]
    fn test_drag_released_ignores_multi_gesture_shapes() {
        let mut c = AnnotationController::new(ControllerConfig {
            finalize_on_release: true,
            ..Default::default()
        });
        c.start_shape(AnnotationKind::Polygon);
        c.extend(norm(0.1, 0.1));
        c.drag_released();

        // Still drawing: polygons complete explicitly.
        c.extend(norm(0.5, 0.1));
        assert_eq!(c.annotations()[0].point_count(), 2);
    }

    #[test]
    fn test_polygon_complete_closes_ring() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Polygon);
        c.extend(norm(0.1, 0.1));
        c.extend(norm(0.5, 0.1));
        c.extend(norm(0.5, 0.5));
        assert!(c.poly_in_progress());

        c.complete_polygon();
        assert!(!c.poly_in_progress());

        let Annotation::Polygon(polygon) = &c.annotations()[0] else {
            panic!("expected a polygon annotation");
        };
        assert_eq!(polygon.points().len(), 4);
        assert!(polygon.is_valid());
    }

    #[test]
    fn test_cancel_polygon_discards_in_progress() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Polygon);
        c.extend(norm(0.1, 0.1));
        c.cancel_polygon();

        assert!(c.annotations().is_empty());
        assert!(!c.poly_in_progress());
    }

    #[test]
    fn test_polyline_complete_and_cancel() {
        let mut c = controller();
        c.start_shape(AnnotationKind::Polyline);
        c.extend(norm(0.1, 0.1));
        c.extend(norm(0.4, 0.2));
        assert!(c.poly_in_progress());

        c.complete_polyline();
        assert!(!c.poly_in_progress());
        c.extend(norm(0.9, 0.9));
        assert_eq!(c.annotations()[0].point_count(), 2);

        c.start_shape(AnnotationKind::Polyline);
        c.extend(norm(0.2, 0.2));
        c.cancel_polyline();
        assert_eq!(c.annotations().len(), 1);
    }

    #[test]
    fn test_add_text_is_atomic_and_locked() {
        let mut c = controller();
        c.add_text(norm(0.5, 0.5), "hello", 0.04);

        assert_eq!(c.annotations().len(), 1);
        assert_eq!(c.annotations()[0].kind(), AnnotationKind::Text);
        assert!(!c.poly_in_progress());

        // Text never opens a drawing session.
        c.extend(norm(0.6, 0.6));
        assert_eq!(c.annotations()[0].point_count(), 1);
    }

    #[test]
    fn test_add_text_rejects_bad_inputs_silently() {
        let mut c = controller();
        c.add_text(norm(1.5, 0.5), "off image", 0.04);
        c.add_text(norm(0.5, 0.5), "no size", 0.0);
        assert!(c.annotations().is_empty());
    }

    #[test]
    fn test_detections_seeded_at_construction() {
        let detections = vec![
            Detection {
                label: "cat".to_string(),
                confidence: 0.92,
                points: vec![NormPoint::new(0.1, 0.1), NormPoint::new(0.4, 0.3)],
            },
            Detection {
                label: "bad".to_string(),
                confidence: 1.7,
                points: vec![],
            },
            Detection {
                label: "dog".to_string(),
                confidence: 0.81,
                points: vec![NormPoint::new(0.5, 0.5), NormPoint::new(0.9, 0.9)],
            },
        ];
        let c = AnnotationController::new(ControllerConfig {
            detections,
            ..Default::default()
        });

        // The out-of-range record is skipped, the rest survive in order.
        assert_eq!(c.annotations().len(), 2);
        let Annotation::Detected(first) = &c.annotations()[0] else {
            panic!("expected a detected annotation");
        };
        assert_eq!(first.label(), "cat");
    }

    #[test]
    fn test_add_detected_respects_limit() {
        let mut c = AnnotationController::new(ControllerConfig {
            annotation_limit: Some(1),
            ..Default::default()
        });
        c.add_detected(vec![
            Detection {
                label: "a".to_string(),
                confidence: 0.5,
                points: vec![],
            },
            Detection {
                label: "b".to_string(),
                confidence: 0.5,
                points: vec![],
            },
        ]);
        assert_eq!(c.annotations().len(), 1);
    }

    #[test]
    fn test_settings_setters_detect_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller();
        let sink = Rc::clone(&events);
        c.subscribe(move |event| sink.borrow_mut().push(event));

        c.set_stroke_width(4.0); // unchanged default
        c.set_stroke_width(-1.0); // invalid
        c.set_stroke_width(6.0); // real change
        c.set_kind(AnnotationKind::Oval);
        c.set_kind(AnnotationKind::Oval); // unchanged

        assert_eq!(c.settings().stroke_width, 6.0);
        assert_eq!(c.settings().kind, AnnotationKind::Oval);
        assert_eq!(
            *events.borrow(),
            vec![ChangeEvent::SettingsChanged, ChangeEvent::SettingsChanged]
        );
    }

    #[test]
    fn test_content_and_settings_channels_are_distinct() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller();
        let sink = Rc::clone(&events);
        c.subscribe(move |event| sink.borrow_mut().push(event));

        c.start_shape(AnnotationKind::Line);
        c.set_color(Color::rgb(0.0, 0.5, 1.0));

        assert_eq!(
            *events.borrow(),
            vec![ChangeEvent::ContentChanged, ChangeEvent::SettingsChanged]
        );
    }

    #[test]
    fn test_load_image_size_flips_ready_state() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut c = controller();
        let sink = Rc::clone(&events);
        c.subscribe(move |event| sink.borrow_mut().push(event));

        assert!(!c.is_ready());
        pollster::block_on(c.load_image_size(Size::new(1024.0, 768.0)));

        assert!(c.is_ready());
        assert_eq!(c.original_image_size(), Some(Size::new(1024.0, 768.0)));
        assert_eq!(
            *events.borrow(),
            vec![
                ChangeEvent::ReadyStateChanged,
                ChangeEvent::ReadyStateChanged
            ]
        );
    }

    #[test]
    fn test_load_image_size_failure_is_distinct_state() {
        let mut c = controller();
        pollster::block_on(c.load_image_size(Size::new(0.0, 0.0)));

        assert_eq!(c.load_state(), LoadState::Failed);
        assert!(!c.is_ready());
        assert_eq!(c.original_image_size(), None);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let events = Rc::new(RefCell::new(0));
        let mut c = controller();
        let sink = Rc::clone(&events);
        let id = c.subscribe(move |_| *sink.borrow_mut() += 1);

        c.start_shape(AnnotationKind::Line);
        assert!(c.unsubscribe(id));
        c.start_shape(AnnotationKind::Line);

        assert_eq!(*events.borrow(), 1);
    }
}
