mod real_main;

pub use real_main::*;
