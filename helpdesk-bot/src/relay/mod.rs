//! Relay core: topic routing, message relay in both directions, edit propagation.

mod edit;
mod engine;
mod locks;
mod routing;
mod visitor_card;

pub use edit::{EditOutcome, EditPropagator};
pub use engine::{RelayContext, RelayEngine};
pub use locks::UserLocks;
pub use routing::{RoutingResolver, TopicCache};
pub use visitor_card::{topic_title, visitor_card, MAX_TOPIC_NAME_LEN};

use relay_core::EditOrigin;
use storage::LinkSide;

/// Links store the private-chat side as `from`, so user-side keys are looked up there.
pub fn lookup_side(origin: EditOrigin) -> LinkSide {
    match origin {
        EditOrigin::User => LinkSide::From,
        EditOrigin::Group => LinkSide::To,
    }
}
