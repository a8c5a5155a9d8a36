pub mod types;
pub mod classification;
pub mod policy;
pub mod message;

pub use types::*;
pub use classification::*;
pub use policy::*;
pub use message::*;
