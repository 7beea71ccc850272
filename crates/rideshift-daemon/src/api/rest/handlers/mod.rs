//! API request handlers

mod drivers;
mod governance;
mod health;
mod maps;
mod nft;
mod payments;
mod realtime;
mod rides;
mod users;

pub use drivers::*;
pub use governance::*;
pub use health::*;
pub use maps::*;
pub use nft::*;
pub use payments::*;
pub use realtime::*;
pub use rides::*;
pub use users::*;
