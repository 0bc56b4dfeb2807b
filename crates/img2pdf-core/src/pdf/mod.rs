mod encode;

pub use encode::{PDF_VERSION, encode_pages};
