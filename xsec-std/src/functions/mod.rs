//! Standard section Functions

mod material;
mod section;
mod actions;
mod analysis;

pub use material::CreateMaterial;
pub use section::{CreateRectangularSection, SectionCorners};
pub use actions::{CreateLoad, CreateDeformation};
pub use analysis::{SolveLoad, SolveDeformation};

use xsec_core::Messages;
use crate::engine::Advisory;

/// Copy engine advisories onto a Function's messages
fn report(messages: &mut Messages, advisories: &[Advisory], prefix: Option<&str>) {
    for advisory in advisories {
        match prefix {
            Some(p) => messages.push(advisory.level, format!("{}: {}", p, advisory.message)),
            None => messages.push(advisory.level, advisory.message.as_str()),
        }
    }
}
