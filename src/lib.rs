// Library exports for notsy

pub mod config;
pub mod richtext;
pub mod script;
pub mod theme;
