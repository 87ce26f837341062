pub mod fs;
pub mod math;

pub use fs::read_all_text;
pub use math::normal_matrix;
