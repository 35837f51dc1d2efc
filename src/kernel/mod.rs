pub mod dispatcher;
pub mod driver;
pub mod event;
pub mod formatter;
pub mod intent;
pub mod presence;
pub mod state;
pub mod telemetry;
pub mod time;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use driver::{drive, SessionEnd};
