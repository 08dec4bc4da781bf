//! The mask-and-crop editor widget.
//!
//! [`MaskCropEditor`] owns the source image, the view transform and the mask
//! for one editing session. Hosts feed it viewport sizes and pointer events,
//! ask it to render when [`MaskCropEditor::take_redraw`] reports a change, and
//! call [`MaskCropEditor::crop`] to extract the painted region.
//!
//! ```text
//! pointer events ─▶ GestureClassifier ─▶ Transform (pan / zoom)
//!                                    └─▶ MaskLayer (paint / erase)
//!                                              │
//!                         redraw flag ◀────────┘ ─▶ render / crop
//! ```
//!
//! Everything runs on the caller's thread; each call completes before it
//! returns.

use image::RgbaImage;

use crate::composite::{export_cropped, render_frame, RenderOptions};
use crate::config::{normalize_zoom_range, EditorConfig, PrimaryMode};
use crate::error::EditorError;
use crate::geometry::{Point, Size};
use crate::gesture::{GestureAction, GestureClassifier, GestureState, PointerEvent, ScaleEvent};
use crate::io::decode_image;
use crate::mask::{Brush, BrushStyle, MaskLayer, Stroke};
use crate::raster::{MaskRaster, SourceImage};
use crate::transform::{fit_to_viewport, PanBounds, Transform, ZoomLimits};

/// Interactive zoom/pan/mask editor.
#[derive(Debug)]
pub struct MaskCropEditor {
    config: EditorConfig,
    image: Option<SourceImage>,
    mask: MaskLayer,
    transform: Transform,
    fit_scale: f32,
    limits: ZoomLimits,
    viewport: Size,
    classifier: GestureClassifier,
    stroke: Option<Stroke>,
    brush: Brush,
    needs_redraw: bool,
}

impl MaskCropEditor {
    /// Create an editor with no image.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::InvalidZoomRange` for unusable zoom bounds.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        let config = config.validated()?;
        let limits = ZoomLimits::for_fit(1.0, config.min_zoom, config.max_zoom);
        Ok(Self {
            image: None,
            mask: MaskLayer::empty(config.mask_mode),
            transform: Transform::new(limits.clamp(1.0), 0.0, 0.0),
            fit_scale: 1.0,
            limits,
            viewport: Size::default(),
            classifier: GestureClassifier::new(config.primary_mode, config.pinch_source),
            stroke: None,
            brush: config.mask_mode.default_brush(),
            needs_redraw: false,
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn mask(&self) -> &MaskRaster {
        self.mask.raster()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn gesture_state(&self) -> GestureState {
        self.classifier.state()
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Switch between painting and erasing for subsequent strokes.
    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    /// Choose what a single finger does on its next touch-down.
    pub fn set_primary_mode(&mut self, mode: PrimaryMode) {
        self.config.primary_mode = mode;
        self.classifier.set_primary_mode(mode);
    }

    /// Replace the image, starting a new session.
    ///
    /// The mask is reallocated at the image's size with the configured mode's
    /// initial fill, any stroke in progress is dropped and the view is refit.
    pub fn set_image(&mut self, image: SourceImage) {
        let (width, height) = image.dimensions();
        log::debug!("set_image {width}x{height}");

        self.mask = MaskLayer::new(width, height, self.config.mask_mode);
        self.brush = self.config.mask_mode.default_brush();
        self.stroke = None;
        self.classifier.reset();
        self.image = Some(image);
        self.refit();
        self.needs_redraw = true;
    }

    /// Decode PNG/JPEG bytes and load them with [`Self::set_image`].
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), EditorError> {
        let image = decode_image(bytes)?;
        self.set_image(image);
        Ok(())
    }

    /// The host measured a new viewport size; the view is refit to it.
    pub fn on_viewport_resize(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
        self.refit();
        self.needs_redraw = true;
    }

    /// Set the upper zoom bound and re-clamp the current view.
    pub fn set_max_zoom(&mut self, max_zoom: f32) -> Result<(), EditorError> {
        let (min, max) = normalize_zoom_range(self.config.min_zoom, max_zoom)?;
        self.config.min_zoom = min;
        self.config.max_zoom = max;
        self.update_limits();
        Ok(())
    }

    /// Set the lower zoom bound and re-clamp the current view.
    pub fn set_min_zoom(&mut self, min_zoom: f32) -> Result<(), EditorError> {
        let (min, max) = normalize_zoom_range(Some(min_zoom), self.config.max_zoom)?;
        self.config.min_zoom = min;
        self.config.max_zoom = max;
        self.update_limits();
        Ok(())
    }

    /// Feed one pointer event. Always consumes the event.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        for action in self.classifier.handle(event) {
            self.apply(action);
        }
        true
    }

    /// Feed one incremental scale from a host pinch detector.
    pub fn on_scale(&mut self, event: ScaleEvent) {
        for action in self.classifier.handle_scale(event) {
            self.apply(action);
        }
    }

    /// Make the whole mask transparent and drop any stroke in progress.
    pub fn clear_mask(&mut self) {
        self.stroke = None;
        self.mask.clear();
        self.needs_redraw = true;
    }

    /// Whether something changed since the last call. Clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Draw the current view into a host-provided frame.
    pub fn render(&self, frame: &mut RgbaImage) {
        render_frame(
            frame,
            self.image.as_ref(),
            self.mask.raster(),
            &self.transform,
            &self.render_options(),
        );
    }

    /// Allocate a viewport-sized frame and draw into it.
    pub fn render_to_image(&self) -> RgbaImage {
        let (width, height) = if self.viewport.is_degenerate() {
            (0, 0)
        } else {
            (self.viewport.width.ceil() as u32, self.viewport.height.ceil() as u32)
        };
        let mut frame = RgbaImage::new(width, height);
        self.render(&mut frame);
        frame
    }

    /// Extract the masked region of the image.
    ///
    /// Without an image the (empty) mask is returned instead, tinted with the
    /// paint color.
    pub fn crop(&self) -> RgbaImage {
        match &self.image {
            Some(image) => export_cropped(image, self.mask.raster()),
            None => self.mask.raster().to_rgba(self.config.paint_color),
        }
    }

    fn apply(&mut self, action: GestureAction) {
        match action {
            GestureAction::BeginStroke(screen) => {
                let Some(p) = self.map_to_image(screen) else {
                    return;
                };
                let style = self.brush_style();
                let stroke = self.stroke.insert(Stroke::begin(p));
                self.mask.apply(self.brush, stroke.last_segment(), &style);
                self.needs_redraw = true;
            }
            GestureAction::ExtendStroke(screen) => {
                let Some(p) = self.map_to_image(screen) else {
                    return;
                };
                // A stroke dropped mid-gesture (clear_mask) restarts here
                let extended = match self.stroke.as_mut() {
                    Some(stroke) => stroke.push(p),
                    None => {
                        self.stroke = Some(Stroke::begin(p));
                        true
                    }
                };
                if let (true, Some(stroke)) = (extended, &self.stroke) {
                    let style = self.brush_style();
                    self.mask.apply(self.brush, stroke.last_segment(), &style);
                    self.needs_redraw = true;
                }
            }
            GestureAction::EndStroke => {
                self.stroke = None;
            }
            GestureAction::Pan { dx, dy } => {
                let next = self.transform.with_pan(dx, dy, &self.bounds());
                self.set_transform(next);
            }
            GestureAction::Zoom(ScaleEvent { factor, focal }) => {
                let next = self
                    .transform
                    .with_zoom(focal, factor, &self.limits, &self.bounds());
                self.set_transform(next);
            }
        }
    }

    fn map_to_image(&self, screen: Point) -> Option<Point> {
        let mapped = self.transform.screen_to_image(screen);
        if mapped.is_none() {
            log::warn!("transform {:?} is not invertible; skipping point", self.transform);
        }
        mapped
    }

    fn set_transform(&mut self, next: Transform) {
        if next != self.transform {
            self.transform = next;
            self.needs_redraw = true;
        }
    }

    fn refit(&mut self) {
        let image_size = self.image_size();
        let fit = fit_to_viewport(self.viewport, image_size);
        self.fit_scale = fit.scale;
        self.limits = self.limits_for_fit();
        // A configured min_zoom above the fit scale zooms in from the top-left corner
        self.transform =
            Transform::new(self.limits.clamp(fit.scale), 0.0, 0.0).clamped(&self.bounds());
        log::debug!(
            "fit {:?} in {:?}: scale {} limits [{}, {}]",
            image_size,
            self.viewport,
            self.transform.scale,
            self.limits.min,
            self.limits.max
        );
    }

    fn update_limits(&mut self) {
        self.limits = self.limits_for_fit();
        // A unit zoom re-clamps scale and pan against the new limits
        let next = self
            .transform
            .with_zoom(Point::default(), 1.0, &self.limits, &self.bounds());
        self.set_transform(next);
    }

    fn limits_for_fit(&self) -> ZoomLimits {
        ZoomLimits::for_fit(self.fit_scale, self.config.min_zoom, self.config.max_zoom)
    }

    fn image_size(&self) -> Size {
        self.image
            .as_ref()
            .map_or(Size::default(), |img| Size::from(img.dimensions()))
    }

    fn bounds(&self) -> PanBounds {
        PanBounds::new(self.image_size(), self.viewport)
    }

    fn brush_style(&self) -> BrushStyle {
        BrushStyle {
            paint_width: self.config.paint_stroke_width,
            erase_width: self.config.erase_stroke_width,
            paint_alpha: self.config.paint_alpha,
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            filter: self.config.filter,
            overlay: self.config.overlay,
            tint: self.config.paint_color,
            background: self.config.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OverlayAlignment, PinchSource};
    use crate::gesture::PointerAction;
    use crate::mask::MaskMode;
    use image::Rgba;

    fn gray_image(width: u32, height: u32) -> SourceImage {
        SourceImage::from_rgb(width, height, vec![128u8; (width * height * 3) as usize]).unwrap()
    }

    fn editor_with(
        config: EditorConfig,
        image: (u32, u32),
        viewport: (f32, f32),
    ) -> MaskCropEditor {
        let mut editor = MaskCropEditor::new(config).unwrap();
        editor.on_viewport_resize(viewport.0, viewport.1);
        editor.set_image(gray_image(image.0, image.1));
        editor
    }

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::single(PointerAction::Down, x, y)
    }

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::single(PointerAction::Move, x, y)
    }

    fn up(x: f32, y: f32) -> PointerEvent {
        PointerEvent::single(PointerAction::Up, x, y)
    }

    fn two(action: PointerAction, a: (f32, f32), b: (f32, f32)) -> PointerEvent {
        PointerEvent::new(action, vec![Point::new(a.0, a.1), Point::new(b.0, b.1)])
    }

    #[test]
    fn test_fit_and_zoom_scenario() {
        let mut editor = editor_with(EditorConfig::default(), (2000, 1000), (1000.0, 800.0));
        assert!((editor.transform().scale - 0.8).abs() < 1e-6);
        assert!((editor.zoom_limits().min - 0.8).abs() < 1e-6);

        editor.on_scale(ScaleEvent {
            factor: 5.0,
            focal: Point::new(500.0, 400.0),
        });
        assert!((editor.transform().scale - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_draw_stroke_scenario() {
        let mut editor = editor_with(EditorConfig::default(), (600, 600), (600.0, 600.0));
        assert_eq!(editor.transform(), Transform::IDENTITY);

        editor.on_pointer_event(&down(100.0, 100.0));
        editor.on_pointer_event(&moved(150.0, 100.0));
        editor.on_pointer_event(&up(150.0, 100.0));

        assert!(editor.mask().alpha(125, 100) > 0);
        assert_eq!(editor.mask().alpha(500, 500), 0);
        assert_eq!(editor.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn test_stroke_maps_through_transform() {
        // Image 400x400 in a 200x200 viewport zoomed 2x past fit
        let mut editor = editor_with(EditorConfig::default(), (400, 400), (200.0, 200.0));
        editor.on_scale(ScaleEvent {
            factor: 2.0,
            focal: Point::new(0.0, 0.0),
        });
        editor.on_pointer_event(&up(0.0, 0.0));
        assert_eq!(editor.transform().scale, 1.0);

        editor.on_pointer_event(&down(50.0, 50.0));
        editor.on_pointer_event(&up(50.0, 50.0));
        // Screen (50,50) at scale 1 with zero translate is image (50,50)
        assert!(editor.mask().alpha(50, 50) > 0);
        // Screen (50,50) would be image (100,100) at the fit scale of 0.5
        assert_eq!(editor.mask().alpha(100, 100), 0);
    }

    #[test]
    fn test_pinch_release_does_not_resume_painting() {
        let mut editor = editor_with(EditorConfig::default(), (300, 300), (300.0, 300.0));
        editor.on_pointer_event(&down(10.0, 10.0));
        editor.on_pointer_event(&two(PointerAction::PointerDown, (10.0, 10.0), (200.0, 200.0)));
        editor.on_pointer_event(&two(PointerAction::PointerUp, (10.0, 10.0), (200.0, 200.0)));
        editor.on_pointer_event(&moved(250.0, 250.0));

        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(editor.mask().alpha(250, 250), 0);
    }

    #[test]
    fn test_pan_mode_moves_view() {
        let config = EditorConfig {
            primary_mode: PrimaryMode::Pan,
            ..Default::default()
        };
        // 1000x500 image in 500x500 viewport: fit 1.0, 500px horizontal slack
        let mut editor = editor_with(config, (1000, 500), (500.0, 500.0));
        editor.take_redraw();

        editor.on_pointer_event(&down(400.0, 250.0));
        editor.on_pointer_event(&moved(100.0, 250.0));
        assert_eq!(editor.transform().translate_x, -300.0);
        assert!(editor.take_redraw());

        // Past the right edge clamps
        editor.on_pointer_event(&moved(-1000.0, 250.0));
        assert_eq!(editor.transform().translate_x, -500.0);
        editor.on_pointer_event(&up(-1000.0, 250.0));

        assert!(editor.mask().is_uniform(0));
    }

    #[test]
    fn test_pointer_pinch_source() {
        let config = EditorConfig {
            pinch_source: PinchSource::Pointers,
            ..Default::default()
        };
        let mut editor = editor_with(config, (400, 400), (400.0, 400.0));
        editor.on_pointer_event(&down(100.0, 200.0));
        editor.on_pointer_event(&two(PointerAction::PointerDown, (100.0, 200.0), (300.0, 200.0)));
        editor.on_pointer_event(&two(PointerAction::Move, (0.0, 200.0), (400.0, 200.0)));
        assert!((editor.transform().scale - 2.0).abs() < 1e-6);

        // Detector events are ignored in this configuration
        editor.on_scale(ScaleEvent {
            factor: 1.2,
            focal: Point::new(0.0, 0.0),
        });
        assert!((editor.transform().scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_draw_mode_erases() {
        let config = EditorConfig {
            mask_mode: MaskMode::NoDraw,
            ..Default::default()
        };
        let mut editor = editor_with(config, (200, 200), (200.0, 200.0));
        assert!(editor.mask().is_uniform(255));
        assert_eq!(editor.brush(), Brush::Erase);

        editor.on_pointer_event(&down(20.0, 100.0));
        editor.on_pointer_event(&moved(180.0, 100.0));
        editor.on_pointer_event(&up(180.0, 100.0));

        assert_eq!(editor.mask().alpha(100, 100), 0);
        assert_eq!(editor.mask().alpha(100, 10), 255);

        let cropped = editor.crop();
        assert_eq!(cropped.get_pixel(100, 100).0[3], 0);
        assert_eq!(*cropped.get_pixel(100, 10), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_set_brush_erase_in_draw_mode() {
        let mut editor = editor_with(EditorConfig::default(), (100, 100), (100.0, 100.0));
        editor.on_pointer_event(&down(50.0, 50.0));
        editor.on_pointer_event(&up(50.0, 50.0));
        assert!(editor.mask().alpha(50, 50) > 0);

        editor.set_brush(Brush::Erase);
        editor.on_pointer_event(&down(50.0, 50.0));
        editor.on_pointer_event(&up(50.0, 50.0));
        assert_eq!(editor.mask().alpha(50, 50), 0);
    }

    #[test]
    fn test_clear_mask() {
        let mut editor = editor_with(EditorConfig::default(), (100, 100), (100.0, 100.0));
        editor.on_pointer_event(&down(50.0, 50.0));
        editor.take_redraw();

        editor.clear_mask();
        assert!(editor.mask().is_uniform(0));
        assert!(editor.take_redraw());
        assert!(!editor.take_redraw());

        // The interrupted stroke does not come back on the next move
        editor.on_pointer_event(&moved(60.0, 50.0));
        assert!(editor.mask().alpha(55, 50) > 0);
        assert_eq!(editor.mask().alpha(30, 50), 0);
    }

    #[test]
    fn test_crop_without_image_returns_empty_mask() {
        let editor = MaskCropEditor::new(EditorConfig::default()).unwrap();
        let out = editor.crop();
        assert_eq!(out.dimensions(), (0, 0));
    }

    #[test]
    fn test_crop_after_painting() {
        let config = EditorConfig {
            paint_alpha: 255,
            ..Default::default()
        };
        let mut editor = editor_with(config, (200, 100), (200.0, 100.0));
        editor.on_pointer_event(&down(50.0, 50.0));
        editor.on_pointer_event(&up(50.0, 50.0));

        let out = editor.crop();
        assert_eq!(out.dimensions(), (200, 100));
        assert_eq!(*out.get_pixel(50, 50), Rgba([128, 128, 128, 255]));
        assert_eq!(out.get_pixel(150, 50).0[3], 0);
        // Source untouched
        assert_eq!(editor.image().unwrap().pixel(150, 50), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_zoom_setters_normalize() {
        let mut editor = editor_with(EditorConfig::default(), (100, 100), (100.0, 100.0));
        editor.set_min_zoom(5.0).unwrap();
        // Swapped against the max of 3.0
        assert_eq!(editor.config().min_zoom, Some(3.0));
        assert_eq!(editor.config().max_zoom, 5.0);
        assert_eq!(editor.transform().scale, 3.0);

        assert!(editor.set_max_zoom(-1.0).is_err());
        editor.set_max_zoom(4.0).unwrap();
        assert_eq!(editor.zoom_limits().max, 4.0);
    }

    #[test]
    fn test_max_zoom_reclamps_view() {
        let mut editor = editor_with(EditorConfig::default(), (100, 100), (100.0, 100.0));
        editor.on_scale(ScaleEvent {
            factor: 3.0,
            focal: Point::new(50.0, 50.0),
        });
        assert_eq!(editor.transform().scale, 3.0);

        editor.set_max_zoom(2.0).unwrap();
        assert_eq!(editor.transform().scale, 2.0);
        assert!(editor.transform().translate_x <= 0.0);
        assert!(editor.transform().translate_x >= -100.0);
    }

    #[test]
    fn test_zero_viewport_is_identity() {
        let mut editor = MaskCropEditor::new(EditorConfig::default()).unwrap();
        editor.set_image(gray_image(50, 50));
        assert_eq!(editor.transform(), Transform::IDENTITY);
        assert_eq!(editor.render_to_image().dimensions(), (0, 0));

        editor.on_viewport_resize(100.0, 100.0);
        assert_eq!(editor.transform().scale, 2.0);
    }

    #[test]
    fn test_new_image_resets_session() {
        let mut editor = editor_with(EditorConfig::default(), (100, 100), (100.0, 100.0));
        editor.on_pointer_event(&down(50.0, 50.0));
        assert_eq!(editor.gesture_state(), GestureState::Painting);

        editor.set_image(gray_image(40, 20));
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(editor.mask().dimensions(), (40, 20));
        assert!(editor.mask().is_uniform(0));
    }

    #[test]
    fn test_render_shows_overlay() {
        let config = EditorConfig {
            paint_alpha: 255,
            overlay: OverlayAlignment::Transformed,
            ..Default::default()
        };
        let mut editor = editor_with(config, (100, 100), (100.0, 100.0));
        editor.on_pointer_event(&down(50.0, 50.0));
        editor.on_pointer_event(&up(50.0, 50.0));

        let frame = editor.render_to_image();
        assert_eq!(frame.dimensions(), (100, 100));
        assert_eq!(*frame.get_pixel(50, 50), Rgba([255, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(95, 5), Rgba([128, 128, 128, 255]));
    }

    fn assert_scale_within_limits(editor: &MaskCropEditor) {
        let (scale, limits) = (editor.transform().scale, editor.zoom_limits());
        assert!(
            limits.contains(scale),
            "scale {scale} outside [{}, {}]",
            limits.min,
            limits.max
        );
    }

    #[test]
    fn test_configured_min_above_fit_clamps_initial_scale() {
        let config = EditorConfig {
            min_zoom: Some(2.0),
            ..Default::default()
        };
        let mut editor = MaskCropEditor::new(config).unwrap();
        assert_scale_within_limits(&editor);

        editor.on_viewport_resize(100.0, 100.0);
        editor.set_image(gray_image(100, 100));
        assert_scale_within_limits(&editor);
        assert_eq!(editor.transform().scale, 2.0);
        assert_eq!(editor.transform().translate_x, 0.0);

        // Pans use the clamped scale: 100px of slack at 2x
        editor.set_primary_mode(PrimaryMode::Pan);
        editor.on_pointer_event(&down(90.0, 50.0));
        editor.on_pointer_event(&moved(-200.0, 50.0));
        assert_eq!(editor.transform().translate_x, -100.0);
        editor.on_pointer_event(&up(-200.0, 50.0));

        editor.on_viewport_resize(50.0, 80.0);
        assert_scale_within_limits(&editor);
        assert_eq!(editor.transform().scale, 2.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EditorConfig {
            max_zoom: f32::NAN,
            ..Default::default()
        };
        assert!(MaskCropEditor::new(config).is_err());
    }
}
