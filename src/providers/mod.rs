pub mod caching;
pub mod cbr;
pub mod fmp;
pub mod util;
