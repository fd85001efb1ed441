//! Download of finished recordings
//!
//! - `ExportGateway` generates a date-derived file name and drives the save
//! - `SaveTarget` is the platform save mechanism (`DirectorySaveTarget` on disk)

mod gateway;
mod target;

pub use gateway::{ExportGateway, ExportReceipt};
pub use target::{DirectorySaveTarget, ExportHandle, SaveTarget};
