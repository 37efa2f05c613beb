mod fix;
mod issue;

pub use fix::*;
pub use issue::*;
