mod anchor;
mod fingerprint;
mod overrides;
mod record;

pub use anchor::*;
pub use fingerprint::*;
pub use overrides::*;
pub use record::*;
