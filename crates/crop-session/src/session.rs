use crop_types::{
    AspectRatio, GuideLine, ImageGeometry, Point, Rect, apply_zoom, clamp_translate, derive_box,
    golden_guides, to_source_box,
};
use tracing::debug;

/// Zoom step while no modifier is held.
pub const DEFAULT_ZOOM_STEP_PX: u32 = 8;
/// Fine-grained zoom step while the modifier is held.
pub const SMOOTH_ZOOM_STEP_PX: u32 = 1;

/// Where the session currently is in the press/drag/release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoBox,
    Creating,
    Moving,
    HasBox,
}

/// The in-progress selection over one displayed image.
///
/// A single logical actor (the input-handling collaborator) drives all
/// transitions; every method is a bounded, synchronous state mutation.
/// Out-of-bounds input is ignored or clamped, never an error.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    geometry: ImageGeometry,
    aspect_ratio: Option<AspectRatio>,
    press_point: Point,
    current_point: Point,
    box_owned: bool,
    creating: bool,
    current_box: Option<Rect>,
    guides: Option<[GuideLine; 4]>,
    modifier_mode: bool,
    zoom_step_px: u32,
}

impl SelectionSession {
    pub fn new(geometry: ImageGeometry, aspect_ratio: Option<AspectRatio>) -> Self {
        Self {
            geometry,
            aspect_ratio,
            press_point: Point::new(0, 0),
            current_point: Point::new(0, 0),
            box_owned: false,
            creating: false,
            current_box: None,
            guides: None,
            modifier_mode: false,
            zoom_step_px: DEFAULT_ZOOM_STEP_PX,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.box_owned {
            SessionState::Moving
        } else if self.creating {
            SessionState::Creating
        } else if self.current_box.is_some() {
            SessionState::HasBox
        } else {
            SessionState::NoBox
        }
    }

    pub fn current_box(&self) -> Option<Rect> {
        self.current_box
    }

    pub fn guides(&self) -> Option<&[GuideLine; 4]> {
        self.guides.as_ref()
    }

    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, ratio: Option<AspectRatio>) {
        self.aspect_ratio = ratio;
    }

    /// Swaps the configured ratio's axes, e.g. 4:3 to 3:4. No-op for
    /// free-form sessions.
    pub fn rotate_aspect_ratio(&mut self) {
        self.aspect_ratio = self.aspect_ratio.map(AspectRatio::rotated);
    }

    pub fn on_press(&mut self, p: Point) {
        if !self.in_image(p) {
            return;
        }
        self.press_point = p;
        self.current_point = p;

        if self.modifier_mode {
            // Selection mode forces re-creation, discarding any box.
            self.discard_box();
            self.creating = true;
            debug!(?p, "press: creating (selection mode)");
        } else if let Some(rect) = self.current_box
            && rect.contains(p)
        {
            self.box_owned = true;
            self.creating = false;
            debug!(?p, "press: moving existing box");
        } else {
            self.creating = self.current_box.is_none();
        }
    }

    pub fn on_drag(&mut self, p: Point) {
        if !self.in_image(p) {
            return;
        }
        // A box exists but was not grabbed and selection mode is off:
        // an ordinary drag is not a move gesture, so nothing happens.
        if !self.box_owned && !self.creating {
            return;
        }

        let prev = self.current_point;
        self.current_point = p;

        if self.box_owned {
            if let Some(rect) = self.current_box {
                let dx = p.x - prev.x;
                let dy = p.y - prev.y;
                if let Some((dx, dy)) =
                    clamp_translate(rect, dx, dy, self.geometry.displayed())
                {
                    self.set_box(rect.translated(dx, dy));
                }
            }
        } else {
            let rect = derive_box(
                self.geometry.displayed(),
                self.press_point,
                self.current_point,
                self.aspect_ratio,
            );
            self.set_box(rect);
        }
    }

    pub fn on_release(&mut self) {
        self.box_owned = false;
        self.creating = false;
    }

    pub fn on_zoom(&mut self, delta_sign: i32) {
        if let Some(rect) = self.current_box {
            let zoomed = apply_zoom(
                rect,
                delta_sign,
                self.zoom_step_px,
                self.aspect_ratio,
                self.geometry.displayed(),
            );
            self.set_box(zoomed);
        }
    }

    pub fn on_escape(&mut self) {
        self.reset();
    }

    /// Replaces the image geometry wholesale and discards the
    /// selection; called on load, rotation and canvas resize.
    pub fn on_load_new_image(&mut self, geometry: ImageGeometry) {
        self.geometry = geometry;
        self.reset();
        debug!(?geometry, "new image geometry");
    }

    pub fn enter_modifier_mode(&mut self) {
        self.modifier_mode = true;
        self.zoom_step_px = SMOOTH_ZOOM_STEP_PX;
    }

    pub fn exit_modifier_mode(&mut self) {
        self.modifier_mode = false;
        self.zoom_step_px = DEFAULT_ZOOM_STEP_PX;
    }

    /// Seeds the maximal selection box by replaying the user gesture
    /// path with selection mode forced on, so the initial box goes
    /// through the identical clamped derivation as real input.
    pub fn seed_initial_box(&mut self) {
        let was_modifier = self.modifier_mode;
        self.enter_modifier_mode();

        let (w, h) = self.geometry.displayed();
        self.on_press(Point::new(0, 0));
        self.on_drag(Point::new(w as i32, h as i32));
        self.on_release();

        if was_modifier {
            self.enter_modifier_mode();
        } else {
            self.exit_modifier_mode();
        }
        debug!(rect = ?self.current_box, "seeded initial box");
    }

    /// The current selection mapped to source-image pixel space.
    pub fn source_crop_box(&self) -> Option<Rect> {
        self.current_box.map(|rect| {
            to_source_box(rect, self.geometry.source(), self.geometry.displayed())
        })
    }

    fn in_image(&self, p: Point) -> bool {
        let (w, h) = self.geometry.displayed();
        p.x >= 0 && p.x <= w as i32 && p.y >= 0 && p.y <= h as i32
    }

    fn set_box(&mut self, rect: Rect) {
        self.current_box = Some(rect);
        self.guides = Some(golden_guides(rect));
    }

    fn discard_box(&mut self) {
        self.current_box = None;
        self.guides = None;
        self.box_owned = false;
    }

    fn reset(&mut self) {
        self.discard_box();
        self.creating = false;
        self.press_point = Point::new(0, 0);
        self.current_point = Point::new(0, 0);
    }
}
