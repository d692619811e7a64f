mod changelog;
mod client;
mod license;
mod product;
mod release;
mod settings;
mod update_log;

pub use changelog::*;
pub use client::*;
pub use license::*;
pub use product::*;
pub use release::*;
pub use settings::*;
pub use update_log::*;
