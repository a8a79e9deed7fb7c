// SPDX-License-Identifier: MPL-2.0
//! Localization of the overlay and drop-zone strings.
//!
//! Translations are Fluent `.ftl` files embedded at build time. The locale is
//! picked from the CLI, then the config file, then the system, then `en-US`.

pub mod fluent;

pub use fluent::I18n;
