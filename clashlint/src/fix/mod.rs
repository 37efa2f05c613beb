mod apply;
mod suggest;
mod target;

pub use apply::*;
pub use suggest::*;
pub use target::*;
