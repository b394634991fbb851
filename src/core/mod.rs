pub mod clock;
pub mod gpu;
pub mod ring;
pub mod timeline;
