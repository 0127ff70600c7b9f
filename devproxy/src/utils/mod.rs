// Utilities module
//
// This module contains common utility functions:
// - mime: Extension to content-type table for static files
// - path: Request path and address path helpers
// - validation: Common validation helpers

pub mod mime;
pub mod path;
pub mod validation;
