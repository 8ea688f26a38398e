// This is free and unencumbered software released into the public domain.

mod config;
pub use config::*;

mod descriptor;
pub use descriptor::*;

mod driver;
pub use driver::*;

pub mod drivers {
    pub mod catalog;

    #[cfg(all(feature = "android", target_os = "android"))]
    pub mod android;

    #[cfg(all(feature = "android", target_os = "android"))]
    pub mod camera2;
}

mod error;
pub use error::*;

mod geometry;
pub use geometry::*;

mod host;
pub use host::*;

mod open;
pub use open::*;

mod preview;
pub use preview::*;

mod selector;
pub use selector::*;

mod worker;
pub use worker::*;
