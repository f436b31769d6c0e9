//! Resort data: the daily conditions feed and its preparation.
//!
//! - `resort`: the record type and CSV feed parser used by the map
//! - `etl`: reshaping scraped report cells into the feed CSV

pub mod etl;
mod resort;

pub use resort::{parse_feed, ResortRecord};
