pub mod border;
pub mod color;
pub mod edges;
pub mod length;
pub mod shadow;

pub use border::{Border, BorderSide, BorderStyle};
pub use color::Color;
pub use edges::Edges;
pub use length::Length;
pub use shadow::BoxShadow;
