pub mod session;

pub use session::{DEFAULT_ZOOM_STEP_PX, SMOOTH_ZOOM_STEP_PX, SelectionSession, SessionState};
