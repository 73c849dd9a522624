pub mod app;
pub mod canvas;
pub mod painter;
pub mod passivegram;
pub mod puzzle;
pub mod theme;
