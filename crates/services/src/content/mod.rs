mod loader;
mod registry;

pub use registry::{ContentProvider, ContentRegistry};
