//! Track file decoding: the 48-byte binary frame layout and the text exchange format.

pub(crate) mod frame;
pub(crate) mod text;
