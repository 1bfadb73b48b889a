pub mod galaxy;
pub mod graphics;
pub mod prelude;
pub mod ui;
