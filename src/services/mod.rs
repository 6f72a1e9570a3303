pub mod attendance;
pub mod auth;
pub mod cache;
pub mod clock;
pub mod reports;
pub mod status_engine;

pub use attendance::AttendanceService;
pub use auth::{AuthService, Claims};
pub use cache::{AttendanceCache, UserDirectory};
pub use clock::{Clock, FixedClock, SystemClock};
