use std::sync::Arc;

use tracing::warn;

use crate::{errors::Error, Result};

/// Label of events whose family could not be named.
pub const UNNAMED_EVENT: &str = "Event";

/// `"<Family>.Event"` for a family that declares an inner event type.
pub fn name_inner_event(family: &str, has_inner_event: bool) -> Result<String> {
    if has_inner_event {
        Ok(format!("{family}.Event"))
    } else {
        Err(Error::MisconfiguredEventFamily(format!(
            "{family} does not have an inner Event"
        )))
    }
}

/// Label stamped on every event a family produces.
///
/// A misconfigured family is not fatal: it is logged and its events keep the
/// unnamed label.
pub fn event_label(family: &str, has_inner_event: bool) -> Arc<str> {
    match name_inner_event(family, has_inner_event) {
        Ok(name) => Arc::from(name),
        Err(e) => {
            warn!(family, error = %e, "event family registered without an inner event");
            Arc::from(UNNAMED_EVENT)
        }
    }
}
