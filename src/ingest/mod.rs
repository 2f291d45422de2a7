/// Input providers for the site inventory.
///
/// Submodules:
/// - `sheet` — published-spreadsheet CSV fetch and parsing.

pub mod sheet;
