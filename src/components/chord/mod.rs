mod component;
pub mod gradient;
pub mod layout;
pub mod palette;
mod render;
pub mod scene;
mod state;
pub mod step;
pub mod tooltip;

pub use component::ChordDiagram;
pub use scene::Scene;
pub use state::{ChordState, PendingTooltips};
pub use step::{FocusTemplate, InteractionPolicy, Step, UnknownStep, apply_step};
