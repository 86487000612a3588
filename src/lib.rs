//! Force-directed layout and interaction engine for research paper graphs.

pub mod derive;
pub mod edges;
pub mod engine;
pub mod interaction;
pub mod item;
pub mod layout;
pub mod node;
pub mod profile;
pub mod search;
pub mod util;
pub mod view;

pub use edges::{Dimension, Edge, EdgePolicy};
pub use engine::{EngineConfig, GraphEngine, GraphEvent, GraphStats};
pub use interaction::PointerEvent;
pub use item::{Item, load_items};
pub use node::Node;
pub use profile::Profile;
pub use view::ViewTransform;
