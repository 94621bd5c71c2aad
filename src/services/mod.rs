pub mod ai_client;
pub mod comparison;
pub mod fixture_client;
pub mod grouping;
pub mod session;

pub use ai_client::*;
pub use comparison::*;
pub use fixture_client::*;
pub use grouping::*;
pub use session::*;
