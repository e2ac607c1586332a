//! User-facing notice strings
//!
//! Rendered locally by the widget; none of these come from the server.

pub const AUTH_FAILED: &str = "Authentication failed. Please refresh the page.";
pub const SESSION_EXPIRED: &str = "Session expired. Please refresh the page.";
pub const RATE_LIMITED: &str = "Too many requests. Please wait a moment before trying again.";
pub const ACCESS_DENIED: &str = "Access denied. Please contact support.";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const DEFAULT_REPLY: &str = "I'm here to help!";

pub const CART_ADDING: &str = "Adding to cart…";
pub const CART_REMOVING: &str = "Removing from cart…";
pub const CART_FAILURE: &str = "Unable to update cart. Please try again.";
pub const PRODUCT_INCOMPLETE: &str = "Product information is incomplete.";
