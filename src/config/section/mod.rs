//! Configuration section definitions.
//!
//! Each module corresponds to a section of the config file:
//!
//! | Module   | TOML Section | Purpose                                  |
//! |----------|--------------|------------------------------------------|
//! | `site`   | `[site]`     | Site origin and document root            |
//! | `filter` | `[filter]`   | Which links to annotate and how          |
//! | `image`  | `[image]`    | Remote image fetch limits                |

mod filter;
mod image;
mod site;

pub use filter::{ExcludeOptions, FilterOptions, Mode};
pub use image::ImageOptions;
pub use site::SiteOptions;
