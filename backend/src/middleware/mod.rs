pub mod locale;
pub mod timezone;

pub use locale::locale_middleware;
pub use timezone::{TIMEZONE_HEADER, timezone_middleware};
