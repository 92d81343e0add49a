pub(crate) mod render;
pub(crate) mod storage;

pub mod cell;
pub mod editor;
pub mod editor_app;
pub mod error;
pub mod grid;
pub mod input;
pub mod layout;
pub mod metadata;
pub mod palette;
pub mod position;
pub mod resources;
pub mod sprites;
pub mod viewport;
