pub mod legend;
pub mod timesweep;

pub use legend::render_legend;
pub use timesweep::{drawing_size, render_timesweep};
