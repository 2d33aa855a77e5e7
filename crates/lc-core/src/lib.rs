pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod patch;
pub mod template;

pub use document::{Document, DocumentEvent, DocumentSnapshot, SubscriptionId, ZOrder};
pub use error::{LoadError, ModelError};
pub use geometry::{Point, Rect, bounding_box};
pub use id::{ElementId, PresentationId, SlideId};
pub use model::*;
pub use patch::{ContentPatch, ElementPatch};
pub use template::{Template, TemplateError, resolve_template};
