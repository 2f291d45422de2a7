/// Data organization utilities for the site map generator.
///
/// This module arranges validated entries into the folder structure the
/// rendered document uses.
///
/// Submodules:
/// - `groupings` — organizes validated entries into per-classification groups.

pub mod groupings;
