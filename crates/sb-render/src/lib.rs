pub mod hit;
pub mod paint;

pub use hit::{HitTarget, hit_test};
pub use paint::{DisplayList, build_display_list};
