pub mod feature;
pub mod record;
pub mod work;

pub use feature::*;
pub use record::*;
pub use work::*;
