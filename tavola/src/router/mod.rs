pub mod backoff;
pub mod table;
pub mod util;
