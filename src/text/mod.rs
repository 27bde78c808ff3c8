//! Greedy word wrap for fitting text into a pixel-width box.

pub(crate) mod layout;
pub(crate) mod measure;
